use crate::collection::CollectionStore;
use crate::commands::{self, Action};
use crate::event::{Event, EventHandler};
use crate::pokeapi::CachedPokeClient;
use crate::ui::components::{CommandEvent, CommandInput, KeyResult};
use crate::ui::renderfns::{draw_footer, draw_header};
use crate::ui::view::{View, ViewAction};
use crate::ui::views::{CollectionView, PokemonDetailView, PokemonListView};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::{stdout, Stdout};
use std::time::Duration;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Main application state
pub struct App {
  client: CachedPokeClient,
  collection: CollectionStore,

  /// Navigation stack - root is always at index 0
  view_stack: Vec<Box<dyn View>>,

  /// `:` command palette
  command: CommandInput,

  /// One-shot message shown in the footer until the next key press
  status: Option<String>,

  should_quit: bool,
}

impl App {
  pub fn new(client: CachedPokeClient, collection: CollectionStore) -> Self {
    let root = PokemonListView::new(client.clone(), collection.clone());
    Self {
      client,
      collection,
      view_stack: vec![Box::new(root)],
      command: CommandInput::new(),
      status: None,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = self.event_loop(&mut terminal).await;

    // Restore the terminal even when the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
  }

  async fn event_loop(&mut self, terminal: &mut Tui) -> Result<()> {
    let mut events = EventHandler::new(Duration::from_millis(100));

    while !self.should_quit {
      terminal.draw(|frame| self.draw(frame))?;

      match events.next().await {
        Some(Event::Key(key)) => self.handle_key(key),
        Some(Event::Tick) => {}
        None => break,
      }

      for view in &mut self.view_stack {
        view.tick();
      }
    }

    Ok(())
  }

  fn handle_key(&mut self, key: KeyEvent) {
    self.status = None;

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    let view_capturing = self
      .view_stack
      .last()
      .is_some_and(|view| view.is_capturing_input());

    if !view_capturing {
      match self.command.handle_key(key) {
        KeyResult::Event(CommandEvent::Submitted(cmd)) => {
          self.execute_command(&cmd);
          return;
        }
        KeyResult::Event(CommandEvent::Cancelled) | KeyResult::Handled => return,
        KeyResult::NotHandled => {}
      }
    }

    let Some(view) = self.view_stack.last_mut() else {
      return;
    };

    match view.handle_key(key) {
      ViewAction::None => {}
      ViewAction::Push(view) => self.view_stack.push(view),
      ViewAction::Pop => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        } else {
          self.should_quit = true;
        }
      }
    }
  }

  fn execute_command(&mut self, input: &str) {
    let Some(action) = commands::parse(input) else {
      if !input.is_empty() {
        tracing::debug!("Unknown command: {}", input);
        self.status = Some(format!("Unknown command: {}", input));
      }
      return;
    };

    match action {
      Action::Pokedex => self.set_root(Box::new(PokemonListView::new(
        self.client.clone(),
        self.collection.clone(),
      ))),
      Action::Collection => self.set_root(Box::new(CollectionView::new(
        self.client.clone(),
        self.collection.clone(),
      ))),
      Action::Pokemon(id) => self.view_stack.push(Box::new(PokemonDetailView::new(
        id,
        self.client.clone(),
        self.collection.clone(),
      ))),
      Action::Quit => self.should_quit = true,
    }
  }

  fn set_root(&mut self, view: Box<dyn View>) {
    self.view_stack.clear();
    self.view_stack.push(view);
  }

  fn draw(&mut self, frame: &mut Frame) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(1), // Header
        Constraint::Min(1),    // Main content
        Constraint::Length(1), // Footer
      ])
      .split(frame.area());

    let shortcuts = self
      .view_stack
      .last()
      .map(|view| view.shortcuts())
      .unwrap_or_default();
    draw_header(frame, chunks[0], self.collection.len(), &shortcuts);

    if let Some(view) = self.view_stack.last_mut() {
      view.render(frame, chunks[1]);
    }
    self.command.render_overlay(frame, chunks[1]);

    let breadcrumb: Vec<String> = self
      .view_stack
      .iter()
      .map(|view| view.breadcrumb_label())
      .collect();
    draw_footer(frame, chunks[2], &breadcrumb, self.status.as_deref());
  }
}
