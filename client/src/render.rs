use crate::toggle::{ReactionCounts, ToggleKey, ToggleState};

/// Consumer contract for applying toggle state to a UI.
///
/// `render` must be idempotent: repeating the state a key already shows
/// performs no visual mutation. The controller relies on this to keep
/// optimistic and confirmed renders cheap to interleave.
pub trait RenderBinder {
    fn render(&mut self, key: &ToggleKey, state: ToggleState);

    /// Confirmed per-reaction tallies. Only ever called with server-confirmed
    /// numbers; optimistic renders never guess at counts.
    fn render_counts(&mut self, key: &ToggleKey, counts: &ReactionCounts, total: u64);

    /// Transient, auto-dismissing user-visible notice. Raised once per failed
    /// toggle; never fatal to the page.
    fn notify(&mut self, message: &str);
}
