use ratatui::prelude::Color;

/// Highest base stat any Pokémon can have
const MAX_BASE_STAT: f64 = 255.0;

/// Colour for unknown types
const FALLBACK_TYPE_COLOR: Color = Color::Rgb(0x68, 0xA0, 0x90);

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Display colour of a Pokémon type, matched case-insensitively
pub fn type_color(type_name: &str) -> Color {
  let rgb = match type_name.to_ascii_lowercase().as_str() {
    "normal" => 0xA8A878,
    "fire" => 0xF08030,
    "water" => 0x6890F0,
    "grass" => 0x78C850,
    "electric" => 0xF8D030,
    "ice" => 0x98D8D8,
    "fighting" => 0xC03028,
    "poison" => 0xA040A0,
    "ground" => 0xE0C068,
    "flying" => 0xA890F0,
    "psychic" => 0xF85888,
    "bug" => 0xA8B820,
    "rock" => 0xB8A038,
    "ghost" => 0x705898,
    "dragon" => 0x7038F8,
    "dark" => 0x705848,
    "steel" => 0xB8B8D0,
    "fairy" => 0xEE99AC,
    _ => return FALLBACK_TYPE_COLOR,
  };
  Color::from_u32(rgb)
}

/// Uppercase the first letter: "pikachu" -> "Pikachu"
pub fn capitalize(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

/// "#001" style number, zero padded to three digits
pub fn dex_number(id: u32) -> String {
  format!("#{:03}", id)
}

/// Readable ability name: "solar-power" -> "solar power"
pub fn ability_label(name: &str) -> String {
  name.replace('-', " ")
}

/// Short label for a stat name. Unknown stats are shown as-is.
pub fn stat_label(name: &str) -> &str {
  match name {
    "hp" => "HP",
    "attack" => "Attack",
    "defense" => "Defense",
    "special-attack" => "Sp. Atk",
    "special-defense" => "Sp. Def",
    "speed" => "Speed",
    other => other,
  }
}

/// Fill ratio of a stat bar, `base / 255` capped at 1.0
pub fn stat_ratio(base_stat: u8) -> f64 {
  (f64::from(base_stat) / MAX_BASE_STAT).min(1.0)
}

/// Text bar of `width` cells filled according to `stat_ratio`
pub fn stat_bar(base_stat: u8, width: usize) -> String {
  let filled = (stat_ratio(base_stat) * width as f64).round() as usize;
  format!("{}{}", "█".repeat(filled), "░".repeat(width - filled.min(width)))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("pikachu", 10), "pikachu");
  }

  #[test]
  fn test_truncate_exact_length() {
    assert_eq!(truncate("pikachu", 7), "pikachu");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("crabominable", 8), "crabo...");
    assert_eq!(truncate("flabébébébé", 7), "flab...");
  }

  #[test]
  fn test_type_color_known() {
    assert_eq!(type_color("fire"), Color::Rgb(0xF0, 0x80, 0x30));
    assert_eq!(type_color("water"), Color::Rgb(0x68, 0x90, 0xF0));
    assert_eq!(type_color("grass"), Color::Rgb(0x78, 0xC8, 0x50));
    assert_eq!(type_color("electric"), Color::Rgb(0xF8, 0xD0, 0x30));
  }

  #[test]
  fn test_type_color_is_case_insensitive() {
    assert_eq!(type_color("FIRE"), type_color("fire"));
    assert_eq!(type_color("Psychic"), Color::Rgb(0xF8, 0x58, 0x88));
  }

  #[test]
  fn test_type_color_fallback() {
    assert_eq!(type_color("shadow"), Color::Rgb(0x68, 0xA0, 0x90));
    assert_eq!(type_color(""), Color::Rgb(0x68, 0xA0, 0x90));
  }

  #[test]
  fn test_capitalize() {
    assert_eq!(capitalize("bulbasaur"), "Bulbasaur");
    assert_eq!(capitalize(""), "");
  }

  #[test]
  fn test_dex_number() {
    assert_eq!(dex_number(1), "#001");
    assert_eq!(dex_number(25), "#025");
    assert_eq!(dex_number(1025), "#1025");
  }

  #[test]
  fn test_ability_label_replaces_every_hyphen() {
    assert_eq!(ability_label("solar-power"), "solar power");
    assert_eq!(ability_label("as-one-glastrier"), "as one glastrier");
  }

  #[test]
  fn test_stat_labels() {
    assert_eq!(stat_label("hp"), "HP");
    assert_eq!(stat_label("special-attack"), "Sp. Atk");
    assert_eq!(stat_label("special-defense"), "Sp. Def");
    assert_eq!(stat_label("accuracy"), "accuracy");
  }

  #[test]
  fn test_stat_ratio_capped() {
    assert_eq!(stat_ratio(255), 1.0);
    assert_eq!(stat_ratio(0), 0.0);
    assert!((stat_ratio(51) - 0.2).abs() < 1e-9);
  }

  #[test]
  fn test_stat_bar_width() {
    assert_eq!(stat_bar(255, 10), "██████████");
    assert_eq!(stat_bar(0, 4), "░░░░");
    assert_eq!(stat_bar(51, 10).chars().count(), 10);
  }
}
