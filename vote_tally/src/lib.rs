mod config;
pub mod builder;
pub mod guidance;
pub mod manual;
mod pdf;
pub mod ranking;
pub mod report;

use log::{debug, info};

pub use crate::config::*;

/// Applies an action to a tally and returns the new tally.
///
/// Actions that cannot be applied (unknown ids, empty names, removing a vote
/// from a candidate without votes) leave the tally unchanged. The input is
/// never modified.
///
/// ```
/// use vote_tally::builder::Builder;
/// use vote_tally::{reduce, Action};
/// # use vote_tally::TallyErrors;
///
/// let state = Builder::new()
///     .position("Diácono")?
///     .candidates(&["Ana".to_string()])?
///     .build();
/// let pid = state.positions[0].id.clone();
/// let cid = state.positions[0].candidates[0].id.clone();
///
/// let next = reduce(&state, &Action::AddVote { position_id: pid, candidate_id: cid });
/// assert_eq!(next.positions[0].candidates[0].votes, 1);
/// assert_eq!(state.positions[0].candidates[0].votes, 0);
/// # Ok::<(), TallyErrors>(())
/// ```
pub fn reduce(state: &TallyState, action: &Action) -> TallyState {
    reduce_with_notice(state, action).0
}

/// Applies an action to a tally, and also returns the notice for the user if
/// the action was applied.
///
/// Ignored actions return a copy of the input and no notice.
pub fn reduce_with_notice(state: &TallyState, action: &Action) -> (TallyState, Option<Notice>) {
    match apply_action(state, action) {
        Ok((next, notice)) => {
            info!("{:?}: {}", action, notice);
            (next, Some(notice))
        }
        Err(e) => {
            debug!("reduce: ignoring {:?}: {}", action, e);
            (state.clone(), None)
        }
    }
}

/// Applies an action to a tally.
///
/// On success, returns the new tally and a notice describing what changed.
/// Otherwise, returns the reason why the action does not apply.
pub fn apply_action(
    state: &TallyState,
    action: &Action,
) -> Result<(TallyState, Notice), TallyErrors> {
    let mut next = state.clone();
    let notice = match action {
        Action::AddVote {
            position_id,
            candidate_id,
        } => {
            let votes = candidate_votes(state, position_id, candidate_id)?
                .checked_add(1)
                .ok_or_else(|| TallyErrors::VoteLimit(candidate_id.clone()))?;
            let cand = candidate_mut(&mut next, position_id, candidate_id)?;
            cand.votes = votes;
            Notice::VoteAdded {
                candidate: cand.name.clone(),
            }
        }
        Action::RemoveVote {
            position_id,
            candidate_id,
        } => {
            let cand = candidate_mut(&mut next, position_id, candidate_id)?;
            // Floor at zero.
            if cand.votes == 0 {
                return Err(TallyErrors::NoVotes(candidate_id.clone()));
            }
            cand.votes -= 1;
            Notice::VoteRemoved {
                candidate: cand.name.clone(),
            }
        }
        Action::AddCandidate { position_id, name } => {
            let name = valid_name(name)?;
            let pidx = position_index(&next, position_id)?;
            let id = allocate_id(&mut next);
            next.positions[pidx].candidates.push(Candidate {
                id: id.clone(),
                name: name.clone(),
                votes: 0,
            });
            Notice::CandidateAdded { id, name }
        }
        Action::EditCandidateName {
            position_id,
            candidate_id,
            name,
        } => {
            let name = valid_name(name)?;
            let cand = candidate_mut(&mut next, position_id, candidate_id)?;
            cand.name = name.clone();
            Notice::CandidateRenamed { name }
        }
        Action::DeleteCandidate {
            position_id,
            candidate_id,
        } => {
            let pidx = position_index(&next, position_id)?;
            let candidates = &mut next.positions[pidx].candidates;
            let cidx = candidates
                .iter()
                .position(|c| c.id == *candidate_id)
                .ok_or_else(|| TallyErrors::UnknownCandidate(candidate_id.clone()))?;
            let removed = candidates.remove(cidx);
            Notice::CandidateDeleted { name: removed.name }
        }
        Action::AddPosition { name } => {
            let name = valid_name(name)?;
            let id = allocate_id(&mut next);
            next.positions.push(Position {
                id: id.clone(),
                name: name.clone(),
                candidates: Vec::new(),
            });
            next.active = Some(id.clone());
            Notice::PositionAdded { id, name }
        }
        Action::EditPositionName { position_id, name } => {
            let name = valid_name(name)?;
            let pidx = position_index(&next, position_id)?;
            next.positions[pidx].name = name.clone();
            Notice::PositionRenamed { name }
        }
        Action::SelectPosition { position_id } => {
            let pidx = position_index(&next, position_id)?;
            next.active = Some(position_id.clone());
            Notice::PositionSelected {
                name: next.positions[pidx].name.clone(),
            }
        }
        Action::DeletePosition { position_id } => {
            let pidx = position_index(&next, position_id)?;
            let removed = next.positions.remove(pidx);
            let active_gone = match next.active.as_deref() {
                Some(pid) => next.find_position(pid).is_none(),
                None => true,
            };
            if active_gone {
                next.active = next.positions.first().map(|p| p.id.clone());
                debug!(
                    "apply_action: active position {:?} deleted, falling back to {:?}",
                    removed.id, next.active
                );
            }
            Notice::PositionDeleted { name: removed.name }
        }
        Action::ResetVotes { position_id } => {
            let pidx = position_index(&next, position_id)?;
            let position = &mut next.positions[pidx];
            for cand in position.candidates.iter_mut() {
                cand.votes = 0;
            }
            Notice::VotesReset {
                position: position.name.clone(),
            }
        }
    };
    Ok((next, notice))
}

fn valid_name(name: &str) -> Result<String, TallyErrors> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(TallyErrors::EmptyName)
    } else {
        Ok(trimmed.to_string())
    }
}

fn allocate_id(state: &mut TallyState) -> String {
    state.next_id += 1;
    state.next_id.to_string()
}

fn position_index(state: &TallyState, position_id: &str) -> Result<usize, TallyErrors> {
    state
        .positions
        .iter()
        .position(|p| p.id == position_id)
        .ok_or_else(|| TallyErrors::UnknownPosition(position_id.to_string()))
}

fn candidate_votes(
    state: &TallyState,
    position_id: &str,
    candidate_id: &str,
) -> Result<u64, TallyErrors> {
    let position = state
        .find_position(position_id)
        .ok_or_else(|| TallyErrors::UnknownPosition(position_id.to_string()))?;
    position
        .find_candidate(candidate_id)
        .map(|c| c.votes)
        .ok_or_else(|| TallyErrors::UnknownCandidate(candidate_id.to_string()))
}

fn candidate_mut<'a>(
    state: &'a mut TallyState,
    position_id: &str,
    candidate_id: &str,
) -> Result<&'a mut Candidate, TallyErrors> {
    let pidx = position_index(state, position_id)?;
    state.positions[pidx]
        .candidates
        .iter_mut()
        .find(|c| c.id == candidate_id)
        .ok_or_else(|| TallyErrors::UnknownCandidate(candidate_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use crate::ranking::rank_candidates;
    use proptest::prelude::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn two_positions() -> TallyState {
        Builder::new()
            .position("Diácono")
            .and_then(|b| {
                b.candidates(&[
                    "João Silva".to_string(),
                    "Maria Santos".to_string(),
                    "Pedro Oliveira".to_string(),
                ])
            })
            .and_then(|b| b.position("Presbítero"))
            .and_then(|b| b.candidate("Paulo", 4))
            .unwrap()
            .build()
    }

    fn ids(state: &TallyState, pidx: usize, cidx: usize) -> (String, String) {
        let p = &state.positions[pidx];
        (p.id.clone(), p.candidates[cidx].id.clone())
    }

    fn vote(state: &TallyState, pidx: usize, cidx: usize) -> TallyState {
        let (position_id, candidate_id) = ids(state, pidx, cidx);
        reduce(
            state,
            &Action::AddVote {
                position_id,
                candidate_id,
            },
        )
    }

    fn unvote(state: &TallyState, pidx: usize, cidx: usize) -> TallyState {
        let (position_id, candidate_id) = ids(state, pidx, cidx);
        reduce(
            state,
            &Action::RemoveVote {
                position_id,
                candidate_id,
            },
        )
    }

    #[test]
    fn add_vote_increments_only_target() {
        init();
        let s0 = two_positions();
        let s1 = vote(&s0, 0, 1);
        assert_eq!(s1.positions[0].candidates[1].votes, 1);
        assert_eq!(s1.positions[0].candidates[0].votes, 0);
        assert_eq!(s1.positions[1].candidates[0].votes, 4);
        // The input snapshot is untouched.
        assert_eq!(s0.positions[0].candidates[1].votes, 0);
    }

    #[test]
    fn add_vote_unknown_ids_is_noop() {
        init();
        let s0 = two_positions();
        let pid = s0.positions[0].id.clone();
        let s1 = reduce(
            &s0,
            &Action::AddVote {
                position_id: pid,
                candidate_id: "nope".to_string(),
            },
        );
        assert_eq!(s0, s1);
        let s2 = reduce(
            &s0,
            &Action::AddVote {
                position_id: "nope".to_string(),
                candidate_id: s0.positions[0].candidates[0].id.clone(),
            },
        );
        assert_eq!(s0, s2);
    }

    #[test]
    fn remove_vote_floors_at_zero() {
        init();
        let s0 = two_positions();
        let s1 = unvote(&s0, 0, 0);
        assert_eq!(s1.positions[0].candidates[0].votes, 0);
        assert_eq!(s0, s1);

        let (position_id, candidate_id) = ids(&s0, 0, 0);
        let res = apply_action(
            &s0,
            &Action::RemoveVote {
                position_id,
                candidate_id: candidate_id.clone(),
            },
        );
        assert_eq!(res, Err(TallyErrors::NoVotes(candidate_id)));
    }

    #[test]
    fn notice_only_for_applied_actions() {
        init();
        let s0 = two_positions();
        let (position_id, candidate_id) = ids(&s0, 0, 1);
        let (s1, notice) = reduce_with_notice(
            &s0,
            &Action::AddVote {
                position_id: position_id.clone(),
                candidate_id: candidate_id.clone(),
            },
        );
        assert_eq!(s1.positions[0].candidates[1].votes, 1);
        assert_eq!(
            notice.map(|n| n.to_string()),
            Some("Voto registrado com sucesso!".to_string())
        );

        let (s2, notice) = reduce_with_notice(
            &s0,
            &Action::RemoveVote {
                position_id,
                candidate_id,
            },
        );
        assert_eq!(s2, s0);
        assert_eq!(notice, None);
    }

    #[test]
    fn add_vote_at_limit_is_ignored() {
        init();
        let s0 = Builder::new()
            .position("Diácono")
            .and_then(|b| b.candidate("Ana", u64::MAX))
            .and_then(|b| b.candidate("Bia", 1))
            .unwrap()
            .build();
        let (position_id, candidate_id) = ids(&s0, 0, 0);
        let res = apply_action(
            &s0,
            &Action::AddVote {
                position_id,
                candidate_id: candidate_id.clone(),
            },
        );
        assert_eq!(res, Err(TallyErrors::VoteLimit(candidate_id)));
        let s1 = vote(&s0, 0, 0);
        assert_eq!(s1, s0);
        // Totals saturate.
        assert_eq!(s1.positions[0].total_votes(), u64::MAX);
        assert_eq!(s1.total_votes(), u64::MAX);
        let s2 = vote(&s1, 0, 1);
        assert_eq!(s2.positions[0].candidates[1].votes, 2);
    }

    fn vote_ops() -> impl Strategy<Value = Vec<(bool, usize)>> {
        proptest::collection::vec((any::<bool>(), 0..3usize), 0..200)
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

        #[test]
        fn votes_follow_saturating_counter(ops in vote_ops()) {
            init();
            let mut state = two_positions();
            let mut expected = [0u64; 3];
            for (add, cidx) in ops {
                if add {
                    state = vote(&state, 0, cidx);
                    expected[cidx] += 1;
                } else {
                    state = unvote(&state, 0, cidx);
                    expected[cidx] = expected[cidx].saturating_sub(1);
                }
            }
            let votes: Vec<u64> = state.positions[0]
                .candidates
                .iter()
                .map(|c| c.votes)
                .collect();
            prop_assert_eq!(votes, expected.to_vec());
            prop_assert_eq!(state.positions[1].candidates[0].votes, 4);
        }

        #[test]
        fn reset_leaves_other_positions_unchanged(
            ops in proptest::collection::vec((0..2usize, 0..3usize), 0..60),
            target in 0..2usize,
        ) {
            init();
            let mut state = two_positions();
            for (pidx, cidx) in ops {
                let n = state.positions[pidx].candidates.len();
                state = vote(&state, pidx, cidx % n);
            }
            let position_id = state.positions[target].id.clone();
            let next = reduce(&state, &Action::ResetVotes { position_id });
            prop_assert!(next.positions[target].candidates.iter().all(|c| c.votes == 0));
            prop_assert_eq!(
                next.positions[target].candidates.len(),
                state.positions[target].candidates.len()
            );
            for (idx, (before, after)) in state.positions.iter().zip(next.positions.iter()).enumerate() {
                if idx != target {
                    prop_assert_eq!(before, after);
                }
            }
        }
    }

    #[test]
    fn add_candidate_rejects_blank_names() {
        init();
        let s0 = two_positions();
        let pid = s0.positions[0].id.clone();
        for name in ["", "   ", "\t\n"] {
            let res = apply_action(
                &s0,
                &Action::AddCandidate {
                    position_id: pid.clone(),
                    name: name.to_string(),
                },
            );
            assert_eq!(res, Err(TallyErrors::EmptyName));
            let s1 = reduce(
                &s0,
                &Action::AddCandidate {
                    position_id: pid.clone(),
                    name: name.to_string(),
                },
            );
            assert_eq!(s1.positions[0].candidates, s0.positions[0].candidates);
        }
    }

    #[test]
    fn add_candidate_appends_trimmed_with_fresh_id() {
        init();
        let s0 = two_positions();
        let pid = s0.positions[0].id.clone();
        let (s1, notice) = apply_action(
            &s0,
            &Action::AddCandidate {
                position_id: pid,
                name: "  Ana Costa ".to_string(),
            },
        )
        .unwrap();
        let cands = &s1.positions[0].candidates;
        assert_eq!(cands.len(), 4);
        let added = cands.last().unwrap();
        assert_eq!(added.name, "Ana Costa");
        assert_eq!(added.votes, 0);
        assert!(cands[..3].iter().all(|c| c.id != added.id));
        assert_eq!(notice.to_string(), "Ana Costa adicionado à votação");
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        init();
        let s0 = two_positions();
        let (position_id, candidate_id) = ids(&s0, 0, 2);
        let s1 = reduce(
            &s0,
            &Action::DeleteCandidate {
                position_id: position_id.clone(),
                candidate_id: candidate_id.clone(),
            },
        );
        let s2 = reduce(
            &s1,
            &Action::AddCandidate {
                position_id,
                name: "Novo".to_string(),
            },
        );
        let added = s2.positions[0].candidates.last().unwrap();
        assert_ne!(added.id, candidate_id);
        let all_ids: Vec<&String> = s2
            .positions
            .iter()
            .flat_map(|p| std::iter::once(&p.id).chain(p.candidates.iter().map(|c| &c.id)))
            .collect();
        let mut dedup = all_ids.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), all_ids.len());
    }

    #[test]
    fn edit_candidate_name() {
        init();
        let s0 = two_positions();
        let (position_id, candidate_id) = ids(&s0, 0, 0);
        let blank = reduce(
            &s0,
            &Action::EditCandidateName {
                position_id: position_id.clone(),
                candidate_id: candidate_id.clone(),
                name: "  ".to_string(),
            },
        );
        assert_eq!(blank, s0);
        let s1 = reduce(
            &s0,
            &Action::EditCandidateName {
                position_id,
                candidate_id,
                name: " João S. ".to_string(),
            },
        );
        assert_eq!(s1.positions[0].candidates[0].name, "João S.");
    }

    #[test]
    fn delete_candidate_keeps_other_votes() {
        init();
        let s0 = vote(&vote(&two_positions(), 0, 0), 0, 2);
        let (position_id, candidate_id) = ids(&s0, 0, 1);
        let s1 = reduce(
            &s0,
            &Action::DeleteCandidate {
                position_id,
                candidate_id,
            },
        );
        let remaining: Vec<(&str, u64)> = s1.positions[0]
            .candidates
            .iter()
            .map(|c| (c.name.as_str(), c.votes))
            .collect();
        assert_eq!(remaining, vec![("João Silva", 1), ("Pedro Oliveira", 1)]);
    }

    #[test]
    fn add_position_becomes_active() {
        init();
        let s0 = two_positions();
        let blank = reduce(
            &s0,
            &Action::AddPosition {
                name: " ".to_string(),
            },
        );
        assert_eq!(blank, s0);
        let s1 = reduce(
            &s0,
            &Action::AddPosition {
                name: "Pastor".to_string(),
            },
        );
        assert_eq!(s1.positions.len(), 3);
        let added = s1.positions.last().unwrap();
        assert!(added.candidates.is_empty());
        assert_eq!(s1.active.as_deref(), Some(added.id.as_str()));
        assert_eq!(s1.active_position().unwrap().name, "Pastor");
    }

    #[test]
    fn edit_position_name() {
        init();
        let s0 = two_positions();
        let pid = s0.positions[1].id.clone();
        let blank = reduce(
            &s0,
            &Action::EditPositionName {
                position_id: pid.clone(),
                name: "".to_string(),
            },
        );
        assert_eq!(blank, s0);
        let s1 = reduce(
            &s0,
            &Action::EditPositionName {
                position_id: pid,
                name: "Presbítero docente".to_string(),
            },
        );
        assert_eq!(s1.positions[1].name, "Presbítero docente");
    }

    #[test]
    fn reset_only_touches_one_position() {
        init();
        let s0 = vote(&vote(&two_positions(), 0, 0), 0, 1);
        let pid = s0.positions[0].id.clone();
        let (s1, notice) = apply_action(&s0, &Action::ResetVotes { position_id: pid }).unwrap();
        assert!(s1.positions[0].candidates.iter().all(|c| c.votes == 0));
        assert_eq!(s1.positions[1], s0.positions[1]);
        assert_eq!(s1.positions[1].candidates[0].votes, 4);
        assert_eq!(notice.to_string(), "Votação reiniciada");
    }

    #[test]
    fn select_position() {
        init();
        let s0 = two_positions();
        assert_eq!(s0.active_position().unwrap().name, "Diácono");
        let pid = s0.positions[1].id.clone();
        let s1 = reduce(&s0, &Action::SelectPosition { position_id: pid });
        assert_eq!(s1.active_position().unwrap().name, "Presbítero");
        let s2 = reduce(
            &s1,
            &Action::SelectPosition {
                position_id: "unknown".to_string(),
            },
        );
        assert_eq!(s2, s1);
    }

    #[test]
    fn deleting_active_position_falls_back_to_first() {
        init();
        let s0 = two_positions();
        let p2 = s0.positions[1].id.clone();
        let s1 = reduce(
            &s0,
            &Action::SelectPosition {
                position_id: p2.clone(),
            },
        );
        let s2 = reduce(&s1, &Action::DeletePosition { position_id: p2 });
        assert_eq!(s2.positions.len(), 1);
        assert_eq!(s2.active.as_deref(), Some(s0.positions[0].id.as_str()));

        let p1 = s2.positions[0].id.clone();
        let s3 = reduce(&s2, &Action::DeletePosition { position_id: p1 });
        assert!(s3.positions.is_empty());
        assert_eq!(s3.active, None);
        assert_eq!(s3.active_position(), None);
    }

    #[test]
    fn deleting_other_position_keeps_active() {
        init();
        let s0 = two_positions();
        let p1 = s0.positions[0].id.clone();
        let p2 = s0.positions[1].id.clone();
        let s1 = reduce(
            &s0,
            &Action::SelectPosition {
                position_id: p2.clone(),
            },
        );
        let s2 = reduce(&s1, &Action::DeletePosition { position_id: p1 });
        assert_eq!(s2.active, Some(p2));
    }

    #[test]
    fn end_to_end_diacono() {
        init();
        let mut state = Builder::new()
            .position("Diácono")
            .and_then(|b| b.candidates(&["A".to_string(), "B".to_string(), "C".to_string()]))
            .unwrap()
            .build();
        for _ in 0..3 {
            state = vote(&state, 0, 0);
        }
        state = vote(&state, 0, 1);
        let ranking = rank_candidates(&state.positions[0].candidates);
        let summary: Vec<(&str, u64, bool)> = ranking
            .iter()
            .map(|r| (r.candidate.name.as_str(), r.candidate.votes, r.tied))
            .collect();
        assert_eq!(
            summary,
            vec![("A", 3, false), ("B", 1, false), ("C", 0, false)]
        );
        assert_eq!(state.total_votes(), 4);
    }
}
