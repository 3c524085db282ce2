// ********* Tally data structures ***********

use std::error::Error;
use std::fmt::Display;

/// A person nominated for a position, with the votes counted so far.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Candidate {
    /// Unique within the owning position.
    pub id: String,
    /// Never empty after trimming.
    pub name: String,
    pub votes: u64,
}

/// An electable role (a "cargo") and its candidates, in insertion order.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Position {
    pub id: String,
    pub name: String,
    pub candidates: Vec<Candidate>,
}

impl Position {
    /// The sum of the votes of all the candidates. Saturates at `u64::MAX`.
    pub fn total_votes(&self) -> u64 {
        self.candidates
            .iter()
            .fold(0u64, |acc, c| acc.saturating_add(c.votes))
    }

    pub fn find_candidate(&self, candidate_id: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == candidate_id)
    }
}

/// A complete snapshot of the tally.
///
/// Snapshots are never modified in place: every action produces a new one
/// (see [crate::reduce]).
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct TallyState {
    pub positions: Vec<Position>,
    /// The position currently displayed. It may point to nothing, in which
    /// case the first position is used.
    pub active: Option<String>,
    // Shared by positions and candidates, never decreases.
    pub(crate) next_id: u64,
}

impl TallyState {
    /// An empty tally, without any position.
    pub fn new() -> TallyState {
        TallyState::default()
    }

    pub fn find_position(&self, position_id: &str) -> Option<&Position> {
        self.positions.iter().find(|p| p.id == position_id)
    }

    /// The position to display.
    ///
    /// Falls back to the first position if the active id does not exist
    /// anymore, and returns None only if there is no position at all.
    pub fn active_position(&self) -> Option<&Position> {
        self.active
            .as_deref()
            .and_then(|pid| self.find_position(pid))
            .or_else(|| self.positions.first())
    }

    /// The total number of votes, over all the positions. Saturates at
    /// `u64::MAX`.
    pub fn total_votes(&self) -> u64 {
        self.positions
            .iter()
            .fold(0u64, |acc, p| acc.saturating_add(p.total_votes()))
    }
}

// ********* Actions **********

/// All the user intents that can change a tally.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Action {
    AddVote {
        position_id: String,
        candidate_id: String,
    },
    RemoveVote {
        position_id: String,
        candidate_id: String,
    },
    AddCandidate {
        position_id: String,
        name: String,
    },
    EditCandidateName {
        position_id: String,
        candidate_id: String,
        name: String,
    },
    DeleteCandidate {
        position_id: String,
        candidate_id: String,
    },
    AddPosition {
        name: String,
    },
    EditPositionName {
        position_id: String,
        name: String,
    },
    SelectPosition {
        position_id: String,
    },
    DeletePosition {
        position_id: String,
    },
    ResetVotes {
        position_id: String,
    },
}

/// Feedback for an action that was applied, meant for a transient
/// notification.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Notice {
    VoteAdded { candidate: String },
    VoteRemoved { candidate: String },
    CandidateAdded { id: String, name: String },
    CandidateRenamed { name: String },
    CandidateDeleted { name: String },
    PositionAdded { id: String, name: String },
    PositionRenamed { name: String },
    PositionSelected { name: String },
    PositionDeleted { name: String },
    VotesReset { position: String },
}

impl Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::VoteAdded { .. } => write!(f, "Voto registrado com sucesso!"),
            Notice::VoteRemoved { .. } => write!(f, "Voto removido"),
            Notice::CandidateAdded { name, .. } => write!(f, "{} adicionado à votação", name),
            Notice::CandidateRenamed { .. } => write!(f, "Nome atualizado com sucesso!"),
            Notice::CandidateDeleted { name } => write!(f, "{} removido da votação", name),
            Notice::PositionAdded { name, .. } => write!(f, "Cargo \"{}\" adicionado", name),
            Notice::PositionRenamed { .. } => write!(f, "Nome do cargo atualizado"),
            Notice::PositionSelected { name } => write!(f, "Cargo selecionado: {}", name),
            Notice::PositionDeleted { name } => write!(f, "Cargo \"{}\" removido", name),
            Notice::VotesReset { .. } => write!(f, "Votação reiniciada"),
        }
    }
}

/// The reasons for which an action has no effect on a tally.
///
/// None of them is fatal: the tally is simply left unchanged.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TallyErrors {
    UnknownPosition(String),
    UnknownCandidate(String),
    /// The name is empty or only contains whitespace.
    EmptyName,
    /// The candidate has no vote left to remove.
    NoVotes(String),
    /// The candidate cannot receive any more votes.
    VoteLimit(String),
}

impl Error for TallyErrors {}

impl Display for TallyErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TallyErrors::UnknownPosition(pid) => write!(f, "unknown position {:?}", pid),
            TallyErrors::UnknownCandidate(cid) => write!(f, "unknown candidate {:?}", cid),
            TallyErrors::EmptyName => write!(f, "empty name"),
            TallyErrors::NoVotes(cid) => write!(f, "candidate {:?} has no votes", cid),
            TallyErrors::VoteLimit(cid) => {
                write!(f, "candidate {:?} reached the maximum number of votes", cid)
            }
        }
    }
}
