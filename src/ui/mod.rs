pub mod components;
pub mod renderfns;
pub mod view;
pub mod views;

use ratatui::widgets::ListState;

/// Clamp a list selection to `len` items, selecting the first item when
/// nothing is selected and clearing the selection for empty lists.
pub fn ensure_valid_selection(state: &mut ListState, len: usize) {
  if len == 0 {
    state.select(None);
    return;
  }
  match state.selected() {
    Some(i) if i >= len => state.select(Some(len - 1)),
    None => state.select(Some(0)),
    _ => {}
  }
}
