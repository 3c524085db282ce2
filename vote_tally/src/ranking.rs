use std::collections::HashMap;

use log::debug;

use crate::config::Candidate;

/// A candidate, with its place in the ranking.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RankedCandidate<'a> {
    /// 1-based.
    pub place: usize,
    pub candidate: &'a Candidate,
    /// Another candidate has the same (non-zero) number of votes.
    pub tied: bool,
    /// First in the ranking, with at least one vote.
    pub leading: bool,
}

/// Sorts the candidates by decreasing number of votes.
///
/// Candidates with the same number of votes keep their relative order.
/// A candidate is marked as tied when another candidate has the same number
/// of votes, unless this number is zero.
pub fn rank_candidates(candidates: &[Candidate]) -> Vec<RankedCandidate<'_>> {
    let mut sorted: Vec<&Candidate> = candidates.iter().collect();
    // sort_by is stable.
    sorted.sort_by(|a, b| b.votes.cmp(&a.votes));

    let mut counts: HashMap<u64, usize> = HashMap::new();
    for c in candidates.iter().filter(|c| c.votes > 0) {
        *counts.entry(c.votes).or_insert(0) += 1;
    }
    debug!("rank_candidates: vote counts: {:?}", counts);

    sorted
        .into_iter()
        .enumerate()
        .map(|(idx, candidate)| RankedCandidate {
            place: idx + 1,
            candidate,
            tied: counts.get(&candidate.votes).map_or(false, |n| *n > 1),
            leading: idx == 0 && candidate.votes > 0,
        })
        .collect()
}
