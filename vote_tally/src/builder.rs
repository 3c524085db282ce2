pub use crate::config::*;

use crate::apply_action;

/// A builder for the initial state of a tally.
///
/// Names are validated with the same rules as the actions: blank names are
/// rejected. Candidates are added to the last position declared.
///
/// ```
/// pub use vote_tally::builder::Builder;
/// # use vote_tally::TallyErrors;
///
/// let state = Builder::new()
///     .position("Diácono")?
///     .candidates(&["João Silva".to_string(), "Maria Santos".to_string()])?
///     .position("Presbítero")?
///     .candidate("Pedro Oliveira", 2)?
///     .build();
///
/// assert_eq!(state.positions.len(), 2);
/// assert_eq!(state.active_position().unwrap().name, "Diácono");
/// assert_eq!(state.total_votes(), 2);
///
/// # Ok::<(), TallyErrors>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    pub(crate) _state: TallyState,
    pub(crate) _current: Option<String>,
    pub(crate) _active: Option<String>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder::default()
    }

    /// Declares a new position. The following candidates are attached to it.
    pub fn position(self, name: &str) -> Result<Builder, TallyErrors> {
        let (state, notice) = apply_action(
            &self._state,
            &Action::AddPosition {
                name: name.to_string(),
            },
        )?;
        let current = match notice {
            Notice::PositionAdded { id, .. } => Some(id),
            _ => state.active.clone(),
        };
        Ok(Builder {
            _state: state,
            _current: current,
            _active: self._active,
        })
    }

    /// Adds candidates without any vote to the current position.
    pub fn candidates(self, names: &[String]) -> Result<Builder, TallyErrors> {
        let mut builder = self;
        for name in names {
            builder = builder.candidate(name, 0)?;
        }
        Ok(builder)
    }

    /// Adds a candidate to the current position, with some votes already counted.
    pub fn candidate(self, name: &str, votes: u64) -> Result<Builder, TallyErrors> {
        let position_id = self
            ._current
            .clone()
            .ok_or_else(|| TallyErrors::UnknownPosition(String::new()))?;
        let (mut state, _) = apply_action(
            &self._state,
            &Action::AddCandidate {
                position_id: position_id.clone(),
                name: name.to_string(),
            },
        )?;
        if let Some(cand) = state
            .positions
            .iter_mut()
            .find(|p| p.id == position_id)
            .and_then(|p| p.candidates.last_mut())
        {
            cand.votes = votes;
        }
        Ok(Builder {
            _state: state,
            _current: self._current,
            _active: self._active,
        })
    }

    /// Marks the current position as the one displayed first.
    ///
    /// By default, the first position is active.
    pub fn active(self) -> Builder {
        Builder {
            _active: self._current.clone(),
            ..self
        }
    }

    pub fn build(self) -> TallyState {
        let mut state = self._state;
        state.active = self
            ._active
            .or_else(|| state.positions.first().map(|p| p.id.clone()));
        state
    }
}
