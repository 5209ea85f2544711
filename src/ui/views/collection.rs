use crate::collection::CollectionStore;
use crate::pokeapi::types::CaughtPokemon;
use crate::pokeapi::CachedPokeClient;
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{capitalize, dex_number, truncate, type_color};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::PokemonDetailView;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

/// The caught Pokémon, in catch order
pub struct CollectionView {
  client: CachedPokeClient,
  collection: CollectionStore,
  /// Snapshot refreshed every tick so catches from other views show up
  caught: Vec<CaughtPokemon>,
  list_state: ListState,
}

impl CollectionView {
  pub fn new(client: CachedPokeClient, collection: CollectionStore) -> Self {
    let caught = collection.caught();
    Self {
      client,
      collection,
      caught,
      list_state: ListState::default(),
    }
  }

  fn selected(&self) -> Option<&CaughtPokemon> {
    self.list_state.selected().and_then(|i| self.caught.get(i))
  }

  fn release_selected(&mut self) {
    if let Some(id) = self.selected().map(|p| p.id) {
      self.collection.release(id);
      self.caught = self.collection.caught();
      ensure_valid_selection(&mut self.list_state, self.caught.len());
    }
  }

  fn render_empty(&self, frame: &mut Frame, area: Rect, block: Block) {
    let text = vec![
      Line::default(),
      Line::styled(
        "No Pokémon caught yet.",
        Style::default().fg(Color::White).bold(),
      ),
      Line::default(),
      Line::styled(
        "Open one from the Pokédex (:pokedex) and press c to catch it.",
        Style::default().fg(Color::DarkGray),
      ),
    ];
    let paragraph = Paragraph::new(text)
      .block(block)
      .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
  }
}

impl View for CollectionView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.list_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Char('g') | KeyCode::Home => self.list_state.select_first(),
      KeyCode::Char('G') | KeyCode::End => self.list_state.select_last(),
      KeyCode::Char('x') | KeyCode::Delete => self.release_selected(),
      KeyCode::Enter => {
        if let Some(pokemon) = self.selected() {
          return ViewAction::Push(Box::new(PokemonDetailView::new(
            pokemon.id,
            self.client.clone(),
            self.collection.clone(),
          )));
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let block = Block::default()
      .title(format!(" My Collection ({}) ", self.caught.len()))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow));

    if self.caught.is_empty() {
      self.render_empty(frame, area, block);
      return;
    }

    ensure_valid_selection(&mut self.list_state, self.caught.len());

    let items: Vec<ListItem> = self
      .caught
      .iter()
      .map(|pokemon| {
        let mut spans = vec![
          Span::styled(
            format!("{:<6}", dex_number(pokemon.id)),
            Style::default().fg(Color::DarkGray),
          ),
          Span::raw(format!("{:<16}", truncate(&capitalize(&pokemon.name), 16))),
        ];
        for type_name in &pokemon.types {
          spans.push(Span::styled(
            format!("{:<10}", type_name),
            Style::default().fg(type_color(type_name)),
          ));
        }
        ListItem::new(Line::from(spans))
      })
      .collect();

    let list = List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }

  fn breadcrumb_label(&self) -> String {
    "Collection".to_string()
  }

  fn tick(&mut self) {
    self.caught = self.collection.caught();
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("enter", "details").with_priority(20),
      ShortcutInfo::new("x", "release").with_priority(30),
      ShortcutInfo::new("q", "back").with_priority(90),
    ]
  }
}
