use crate::toggle::{ReactionCounts, ToggleState};

/// Canonical, already-normalized result of one settled toggle request. The
/// per-kind parsers in `crate::kinds` produce this from the raw response body;
/// the controller never looks at raw payloads.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// The server-confirmed state. Authoritative, not necessarily equal to
    /// what the user asked for.
    pub state: ToggleState,
    /// Per-reaction tallies, present for reaction toggles only.
    pub reaction_counts: Option<ReactionCounts>,
    pub total_reactions: Option<u64>,
    /// Human-readable server message, when one was sent.
    pub message: Option<String>,
}

impl ToggleOutcome {
    pub fn of_state(state: ToggleState) -> Self {
        ToggleOutcome {
            state,
            reaction_counts: None,
            total_reactions: None,
            message: None,
        }
    }
}
