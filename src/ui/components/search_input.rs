use super::input::{InputResult, TextInput};
use super::KeyResult;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Events emitted by search input that parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
  /// Search query changed (emitted on each keystroke, empty string on cancel)
  Changed(String),
  /// Search submitted; the query stays applied
  Submitted,
}

/// Live search bar. While active it captures typing; after submit the query
/// stays visible until cleared with Esc or a new search.
#[derive(Debug, Clone, Default)]
pub struct SearchInput {
  input: TextInput,
  active: bool,
}

impl SearchInput {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  pub fn query(&self) -> &str {
    self.input.value()
  }

  /// Whether a non-blank query is applied
  pub fn has_query(&self) -> bool {
    !self.input.value().trim().is_empty()
  }

  pub fn activate(&mut self) {
    self.active = true;
    self.input.clear();
  }

  /// Handle a key event.
  /// Call this regardless of active state - it handles activation too
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<SearchEvent> {
    if !self.active {
      return match key.code {
        KeyCode::Char('/') => {
          self.activate();
          KeyResult::Event(SearchEvent::Changed(String::new()))
        }
        // Esc on an applied query clears it before anything else sees the key
        KeyCode::Esc if !self.input.is_empty() => {
          self.input.clear();
          KeyResult::Event(SearchEvent::Changed(String::new()))
        }
        _ => KeyResult::NotHandled,
      };
    }

    match self.input.handle_key(key) {
      InputResult::Submitted(_) => {
        self.active = false;
        KeyResult::Event(SearchEvent::Submitted)
      }
      InputResult::Cancelled => {
        self.active = false;
        self.input.clear();
        KeyResult::Event(SearchEvent::Changed(String::new()))
      }
      InputResult::Consumed => {
        KeyResult::Event(SearchEvent::Changed(self.input.value().to_string()))
      }
      // Swallow everything else so list shortcuts don't fire mid-typing
      InputResult::NotHandled => KeyResult::Handled,
    }
  }

  /// Height the search bar needs, zero when hidden
  pub fn height(&self) -> u16 {
    if self.active || !self.input.is_empty() {
      1
    } else {
      0
    }
  }

  /// Render the search bar with an optional status such as a match count
  pub fn render(&self, frame: &mut Frame, area: Rect, status: Option<&str>) {
    if area.height == 0 {
      return;
    }

    let prompt_style = if self.active {
      Style::default().fg(Color::Yellow)
    } else {
      Style::default().fg(Color::DarkGray)
    };

    let (before, after) = self.input.split_at_cursor();
    let mut spans = vec![Span::styled(" /", prompt_style), Span::raw(before)];
    if self.active {
      spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
    }
    spans.push(Span::raw(after));
    if let Some(status) = status {
      spans.push(Span::styled(
        format!("  {}", status),
        Style::default().fg(Color::DarkGray),
      ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
  }
}
