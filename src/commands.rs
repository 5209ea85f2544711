/// Available commands and autocomplete logic

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub description: &'static str,
}

/// All available commands
pub const COMMANDS: &[Command] = &[
  Command {
    name: "pokedex",
    aliases: &["p", "list", "all"],
    description: "Browse every Pokémon",
  },
  Command {
    name: "collection",
    aliases: &["c", "caught", "mine"],
    description: "Your caught Pokémon",
  },
  Command {
    name: "pokemon",
    aliases: &["id", "show"],
    description: "Open a Pokémon by number, e.g. pokemon 25",
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    description: "Exit pokedex",
  },
];

/// A resolved command ready to execute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  Pokedex,
  Collection,
  Pokemon(u32),
  Quit,
}

/// Parse a submitted command line such as `collection` or `pokemon 25`.
///
/// The command word may be a name or an alias. Returns None for unknown
/// commands and for `pokemon` without a positive numeric id.
pub fn parse(input: &str) -> Option<Action> {
  let mut words = input.split_whitespace();
  let word = words.next()?.to_lowercase();
  let command = COMMANDS
    .iter()
    .find(|cmd| cmd.name == word || cmd.aliases.contains(&word.as_str()))?;

  match command.name {
    "pokedex" => Some(Action::Pokedex),
    "collection" => Some(Action::Collection),
    "pokemon" => {
      let id: u32 = words.next()?.trim_start_matches('#').parse().ok()?;
      (id > 0).then_some(Action::Pokemon(id))
    }
    "quit" => Some(Action::Quit),
    _ => None,
  }
}

/// Get autocomplete suggestions for a given input.
///
/// Only the command word is matched; arguments after it are ignored.
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input_lower = input
    .split_whitespace()
    .next()
    .unwrap_or("")
    .to_lowercase();

  if input_lower.is_empty() {
    return COMMANDS.iter().collect();
  }

  let mut matches: Vec<(&Command, u32)> = Vec::new();

  for cmd in COMMANDS {
    // Exact match on name
    if cmd.name == input_lower {
      matches.push((cmd, 0)); // Highest priority
      continue;
    }

    // Exact match on alias
    if cmd.aliases.contains(&input_lower.as_str()) {
      matches.push((cmd, 1));
      continue;
    }

    // Prefix match on name
    if cmd.name.starts_with(&input_lower) {
      matches.push((cmd, 2));
      continue;
    }

    // Prefix match on alias
    if cmd.aliases.iter().any(|a| a.starts_with(&input_lower)) {
      matches.push((cmd, 3));
      continue;
    }

    // Fuzzy match (contains)
    if cmd.name.contains(&input_lower) {
      matches.push((cmd, 4));
      continue;
    }

    // Fuzzy match on alias
    if cmd.aliases.iter().any(|a| a.contains(&input_lower)) {
      matches.push((cmd, 5));
    }
  }

  // Sort by priority
  matches.sort_by_key(|(_, priority)| *priority);

  matches.into_iter().map(|(cmd, _)| cmd).collect()
}
