use crate::collection::CollectionStore;
use crate::pokeapi::types::PokemonDetail;
use crate::pokeapi::CachedPokeClient;
use crate::query::{Query, QueryState};
use crate::ui::renderfns::{ability_label, capitalize, dex_number, stat_bar, stat_label, type_color};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

const STAT_BAR_WIDTH: usize = 30;

/// Details of one Pokémon with a catch/release toggle
pub struct PokemonDetailView {
  id: u32,
  client: CachedPokeClient,
  collection: CollectionStore,
  query: Query<PokemonDetail>,
  scroll: u16,
}

impl PokemonDetailView {
  pub fn new(id: u32, client: CachedPokeClient, collection: CollectionStore) -> Self {
    let client_for_query = client.clone();
    let mut query = Query::new(move || {
      let client = client_for_query.clone();
      async move { client.detail(id).await.map_err(|e| e.to_string()) }
    })
    .enabled(id > 0);

    query.fetch();

    Self {
      id,
      client,
      collection,
      query,
      scroll: 0,
    }
  }

  fn toggle_caught(&self) {
    let Some(pokemon) = self.query.data() else {
      return;
    };

    if self.collection.is_caught(pokemon.id) {
      self.collection.release(pokemon.id);
    } else {
      self.collection.catch(pokemon.to_caught());
    }
  }

  fn refresh(&mut self) {
    let client = self.client.clone();
    let id = self.id;
    self
      .query
      .fetch_with(async move { client.refresh_detail(id).await.map_err(|e| e.to_string()) });
  }

  fn detail_lines(&self, pokemon: &PokemonDetail) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::DarkGray);
    let caught = self.collection.is_caught(pokemon.id);

    let mut lines = vec![Line::from(vec![
      Span::styled(
        capitalize(&pokemon.name),
        Style::default().fg(Color::White).bold(),
      ),
      Span::raw("  "),
      Span::styled(dex_number(pokemon.id), label),
      Span::raw("  "),
      if caught {
        Span::styled("● Caught", Style::default().fg(Color::Red).bold())
      } else {
        Span::styled("○ Not caught", label)
      },
    ])];

    let mut types = vec![Span::styled("Types      ", label)];
    for type_name in &pokemon.types {
      types.push(Span::styled(
        format!(" {} ", type_name.to_uppercase()),
        Style::default()
          .fg(Color::Black)
          .bg(type_color(type_name))
          .bold(),
      ));
      types.push(Span::raw(" "));
    }
    lines.push(Line::default());
    lines.push(Line::from(types));

    lines.push(Line::from(vec![
      Span::styled("Height     ", label),
      Span::raw(format!("{:.1} m", pokemon.height_metres())),
    ]));
    lines.push(Line::from(vec![
      Span::styled("Weight     ", label),
      Span::raw(format!("{:.1} kg", pokemon.weight_kilograms())),
    ]));

    let abilities: Vec<String> = pokemon
      .abilities
      .iter()
      .map(|a| {
        if a.is_hidden {
          format!("{} (hidden)", ability_label(&a.name))
        } else {
          ability_label(&a.name)
        }
      })
      .collect();
    lines.push(Line::from(vec![
      Span::styled("Abilities  ", label),
      Span::raw(abilities.join(", ")),
    ]));

    lines.push(Line::from(vec![
      Span::styled("Image      ", label),
      Span::raw(pokemon.image_url().unwrap_or("none").to_string()),
    ]));

    lines.push(Line::default());
    lines.push(Line::styled("Base stats", Style::default().fg(Color::Cyan).bold()));

    let bar_color = pokemon
      .primary_type()
      .map(type_color)
      .unwrap_or(Color::Cyan);
    for stat in &pokemon.stats {
      lines.push(Line::from(vec![
        Span::styled(format!("{:<9}", stat_label(&stat.name)), label),
        Span::raw(format!("{:>4} ", stat.base_stat)),
        Span::styled(
          stat_bar(stat.base_stat, STAT_BAR_WIDTH),
          Style::default().fg(bar_color),
        ),
      ]));
    }

    lines
  }
}

impl View for PokemonDetailView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('c') | KeyCode::Char(' ') => self.toggle_caught(),
      KeyCode::Char('r') => self.refresh(),
      KeyCode::Char('j') | KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
      KeyCode::Char('k') | KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let title = match self.query.state() {
      QueryState::Idle | QueryState::Loading => format!(" {} (loading...) ", dex_number(self.id)),
      _ if self.query.is_fetching() => format!(" {} (refreshing...) ", dex_number(self.id)),
      _ => format!(" {} ", dex_number(self.id)),
    };

    let border_color = self
      .query
      .data()
      .and_then(|p| p.primary_type())
      .map(type_color)
      .unwrap_or(Color::Blue);

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(border_color));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let paragraph = match self.query.state() {
      QueryState::Success(pokemon) => {
        let mut lines = self.detail_lines(pokemon);
        if let Some(error) = self.query.error() {
          lines.push(Line::default());
          lines.push(Line::styled(
            format!("Refresh failed: {}", error),
            Style::default().fg(Color::Red),
          ));
        }
        Paragraph::new(lines).scroll((self.scroll, 0))
      }
      QueryState::Error(error) => Paragraph::new(format!("Error: {}\n\nPress 'r' to retry.", error))
        .style(Style::default().fg(Color::Red)),
      QueryState::Idle if self.id == 0 => {
        Paragraph::new("No Pokémon selected.").style(Style::default().fg(Color::DarkGray))
      }
      QueryState::Idle | QueryState::Loading => {
        Paragraph::new("Loading Pokémon...").style(Style::default().fg(Color::DarkGray))
      }
    };

    frame.render_widget(paragraph.wrap(Wrap { trim: false }), inner);
  }

  fn breadcrumb_label(&self) -> String {
    match self.query.data() {
      Some(pokemon) => capitalize(&pokemon.name),
      None => dex_number(self.id),
    }
  }

  fn tick(&mut self) {
    self.query.poll();
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    let catch_label = match self.query.data() {
      Some(pokemon) if self.collection.is_caught(pokemon.id) => "release",
      _ => "catch",
    };
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("c", catch_label).with_priority(20),
      ShortcutInfo::new("r", "refresh").with_priority(50),
      ShortcutInfo::new("q", "back").with_priority(90),
    ]
  }
}
