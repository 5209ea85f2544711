use crate::ui::view::ShortcutInfo;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the header bar with title, caught badge and the active view's shortcuts
pub fn draw_header(frame: &mut Frame, area: Rect, caught: usize, shortcuts: &[ShortcutInfo]) {
  let mut spans = vec![
    Span::styled(" Pokédex ", Style::default().fg(Color::Red).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(
      format!(" {} ", caught_badge(caught)),
      Style::default().fg(Color::Yellow).bold(),
    ),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
  ];

  let mut shortcuts = shortcuts.to_vec();
  shortcuts.sort_by_key(|s| s.priority);
  for shortcut in shortcuts {
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
      format!("<{}>", shortcut.key),
      Style::default().fg(Color::Cyan),
    ));
    spans.push(Span::styled(
      format!(" {}", shortcut.label),
      Style::default().fg(Color::DarkGray),
    ));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}

fn caught_badge(caught: usize) -> String {
  format!("● {} caught", caught)
}
