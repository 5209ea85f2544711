use crate::collection::CollectionStore;
use crate::pokeapi::types::{PokemonListItem, PokemonPages};
use crate::pokeapi::CachedPokeClient;
use crate::query::{Query, QueryState};
use crate::ui::components::{KeyResult, SearchEvent, SearchInput};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{capitalize, dex_number};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::PokemonDetailView;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

/// Paged list of every Pokémon with live name search
pub struct PokemonListView {
  client: CachedPokeClient,
  collection: CollectionStore,
  pages: Query<PokemonPages>,
  /// Results for the applied search query, if any
  results: Option<Query<Vec<PokemonListItem>>>,
  search: SearchInput,
  list_state: ListState,
}

impl PokemonListView {
  pub fn new(client: CachedPokeClient, collection: CollectionStore) -> Self {
    let client_for_query = client.clone();
    let mut pages = Query::new(move || {
      let client = client_for_query.clone();
      async move { client.list_pages().await.map_err(|e| e.to_string()) }
    });
    pages.fetch();

    Self {
      client,
      collection,
      pages,
      results: None,
      search: SearchInput::new(),
      list_state: ListState::default(),
    }
  }

  /// Items currently shown: search hits while searching, loaded pages otherwise
  fn items(&self) -> Vec<&PokemonListItem> {
    match &self.results {
      Some(results) => results.data().map(|v| v.iter().collect()).unwrap_or_default(),
      None => self
        .pages
        .data()
        .map(|pages| pages.items().collect())
        .unwrap_or_default(),
    }
  }

  fn selected_item(&self) -> Option<&PokemonListItem> {
    let idx = self.list_state.selected()?;
    self.items().get(idx).copied()
  }

  fn has_next_page(&self) -> bool {
    self.pages.data().is_some_and(|pages| pages.has_next_page())
  }

  fn load_more(&mut self) {
    if self.results.is_some() || !self.has_next_page() {
      return;
    }
    let Some(current) = self.pages.data().cloned() else {
      return;
    };
    let client = self.client.clone();
    self.pages.fetch_with(async move {
      client
        .fetch_next_page(&current)
        .await
        .map_err(|e| e.to_string())
    });
  }

  fn refresh(&mut self) {
    if let Some(results) = &mut self.results {
      results.refetch();
      return;
    }
    let Some(current) = self.pages.data().cloned() else {
      self.pages.refetch();
      return;
    };
    let client = self.client.clone();
    self.pages.fetch_with(async move {
      client
        .refresh_list(&current)
        .await
        .map_err(|e| e.to_string())
    });
  }

  fn apply_search(&mut self, query: String) {
    self.list_state.select(Some(0));

    if query.trim().is_empty() {
      self.results = None;
      return;
    }

    let client = self.client.clone();
    let mut results = Query::new(move || {
      let client = client.clone();
      let query = query.clone();
      async move { client.search(&query).await.map_err(|e| e.to_string()) }
    });
    results.fetch();
    self.results = Some(results);
  }

  fn search_status(&self) -> Option<String> {
    let results = self.results.as_ref()?;
    let status = match results.state() {
      QueryState::Success(hits) if hits.is_empty() => {
        format!("No Pokémon found matching \"{}\"", self.search.query().trim())
      }
      QueryState::Success(hits) => format!("found {} matching", hits.len()),
      QueryState::Error(e) => format!("search failed: {}", e),
      _ => "searching...".to_string(),
    };
    Some(status)
  }

  fn handle_search(&mut self, key: KeyEvent) -> KeyResult<ViewAction> {
    match self.search.handle_key(key) {
      KeyResult::Event(SearchEvent::Changed(query)) => {
        self.apply_search(query);
        KeyResult::Handled
      }
      KeyResult::Event(SearchEvent::Submitted) | KeyResult::Handled => KeyResult::Handled,
      KeyResult::NotHandled => KeyResult::NotHandled,
    }
  }

  fn handle_navigation(&mut self, key: KeyEvent) -> KeyResult<ViewAction> {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.list_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Char('g') | KeyCode::Home => self.list_state.select_first(),
      KeyCode::Char('G') | KeyCode::End => self.list_state.select_last(),
      KeyCode::PageDown => self.list_state.scroll_down_by(10),
      KeyCode::PageUp => self.list_state.scroll_up_by(10),
      _ => return KeyResult::NotHandled,
    }
    KeyResult::Handled
  }

  fn handle_actions(&mut self, key: KeyEvent) -> KeyResult<ViewAction> {
    match key.code {
      KeyCode::Enter => match self.selected_item() {
        Some(item) => KeyResult::Event(ViewAction::Push(Box::new(PokemonDetailView::new(
          item.id,
          self.client.clone(),
          self.collection.clone(),
        )))),
        None => KeyResult::Handled,
      },
      KeyCode::Char('n') => {
        self.load_more();
        KeyResult::Handled
      }
      KeyCode::Char('r') => {
        self.refresh();
        KeyResult::Handled
      }
      KeyCode::Char('q') | KeyCode::Esc => KeyResult::Event(ViewAction::Pop),
      _ => KeyResult::NotHandled,
    }
  }

  fn title(&self) -> String {
    match self.pages.state() {
      QueryState::Idle | QueryState::Loading => " Pokédex (loading...) ".to_string(),
      QueryState::Error(e) => format!(" Pokédex (error: {}) ", e),
      QueryState::Success(pages) => {
        let fetching = if self.pages.is_fetching() { " ..." } else { "" };
        format!(
          " Pokédex ({} of {}){} ",
          pages.loaded(),
          pages.total().unwrap_or(0),
          fetching
        )
      }
    }
  }

  /// Hint under the list about loading more
  fn pagination_hint(&self) -> Option<String> {
    if self.results.is_some() {
      return None;
    }
    let pages = self.pages.data()?;
    let hint = if self.pages.is_fetching() {
      "Loading more...".to_string()
    } else if let Some(error) = self.pages.error() {
      format!("{} (n to try again)", error)
    } else if pages.has_next_page() {
      "Press n to load more".to_string()
    } else {
      format!("All {} Pokémon loaded", pages.loaded())
    };
    Some(hint)
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect) {
    let block = Block::default()
      .title(self.title())
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Red));

    let items = self.items();
    let len = items.len();

    if items.is_empty() {
      let content = if let Some(error) = self.pages.error().filter(|_| self.results.is_none()) {
        format!("Failed to load Pokémon: {}\n\nPress 'r' to retry.", error)
      } else if self.pages.is_loading() {
        "Loading Pokémon...".to_string()
      } else {
        String::new()
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let list_items: Vec<ListItem> = items
      .iter()
      .map(|item| {
        let marker = if self.collection.is_caught(item.id) {
          Span::styled("● ", Style::default().fg(Color::Red))
        } else {
          Span::raw("  ")
        };
        ListItem::new(Line::from(vec![
          marker,
          Span::styled(
            format!("{:<6}", dex_number(item.id)),
            Style::default().fg(Color::DarkGray),
          ),
          Span::raw(capitalize(&item.name)),
        ]))
      })
      .collect();

    ensure_valid_selection(&mut self.list_state, len);

    let list = List::new(list_items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }
}

impl View for PokemonListView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match self
      .handle_search(key)
      .or_else(|| self.handle_navigation(key))
      .or_else(|| self.handle_actions(key))
    {
      KeyResult::Event(action) => action,
      KeyResult::Handled | KeyResult::NotHandled => ViewAction::None,
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let hint = self.pagination_hint();
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(self.search.height()),
        Constraint::Min(0),
        Constraint::Length(u16::from(hint.is_some())),
      ])
      .split(area);

    let status = self.search_status();
    self.search.render(frame, chunks[0], status.as_deref());
    self.render_list(frame, chunks[1]);

    if let Some(hint) = hint {
      let paragraph = Paragraph::new(hint)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
      frame.render_widget(paragraph, chunks[2]);
    }
  }

  fn breadcrumb_label(&self) -> String {
    "Pokédex".to_string()
  }

  fn tick(&mut self) {
    self.pages.poll();
    if let Some(results) = &mut self.results {
      results.poll();
    }
  }

  fn is_capturing_input(&self) -> bool {
    self.search.is_active()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    let mut shortcuts = vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("/", "search").with_priority(20),
      ShortcutInfo::new("enter", "details").with_priority(30),
      ShortcutInfo::new("r", "refresh").with_priority(50),
      ShortcutInfo::new("q", "back").with_priority(90),
    ];
    if self.results.is_none() && self.has_next_page() {
      shortcuts.push(ShortcutInfo::new("n", "load more").with_priority(40));
    }
    shortcuts
  }
}
