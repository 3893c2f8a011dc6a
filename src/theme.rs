use ratatui::style::Color;

pub struct Theme {
  pub name: &'static str,
  pub bg: Color,
  pub fg: Color,
  pub accent: Color,
  pub muted: Color,
  pub border: Color,
  pub highlight_fg: Color,
  pub highlight_bg: Color,
  pub stripe_bg: Color,
  pub status: Color,
  pub error: Color,
  pub key_fg: Color,
  pub key_bg: Color,
}

pub const THEMES: [Theme; 3] = [
  Theme {
    name: "Ember",
    bg: Color::Rgb(24, 22, 22),
    fg: Color::Rgb(230, 224, 218),
    accent: Color::Rgb(255, 92, 72),
    muted: Color::Rgb(130, 122, 116),
    border: Color::Rgb(70, 62, 60),
    highlight_fg: Color::Rgb(24, 22, 22),
    highlight_bg: Color::Rgb(255, 146, 110),
    stripe_bg: Color::Rgb(32, 29, 29),
    status: Color::Rgb(250, 200, 90),
    error: Color::Rgb(255, 90, 90),
    key_fg: Color::Rgb(24, 22, 22),
    key_bg: Color::Rgb(160, 150, 144),
  },
  Theme {
    name: "Dusk",
    bg: Color::Rgb(26, 27, 38),
    fg: Color::Rgb(192, 202, 245),
    accent: Color::Rgb(122, 162, 247),
    muted: Color::Rgb(86, 95, 137),
    border: Color::Rgb(59, 66, 97),
    highlight_fg: Color::Rgb(26, 27, 38),
    highlight_bg: Color::Rgb(187, 154, 247),
    stripe_bg: Color::Rgb(31, 35, 53),
    status: Color::Rgb(224, 175, 104),
    error: Color::Rgb(247, 118, 142),
    key_fg: Color::Rgb(26, 27, 38),
    key_bg: Color::Rgb(169, 177, 214),
  },
  Theme {
    name: "Paper",
    bg: Color::Rgb(250, 248, 242),
    fg: Color::Rgb(46, 52, 64),
    accent: Color::Rgb(196, 36, 48),
    muted: Color::Rgb(140, 140, 140),
    border: Color::Rgb(200, 196, 186),
    highlight_fg: Color::Rgb(250, 248, 242),
    highlight_bg: Color::Rgb(76, 86, 106),
    stripe_bg: Color::Rgb(242, 239, 230),
    status: Color::Rgb(176, 120, 0),
    error: Color::Rgb(190, 30, 45),
    key_fg: Color::Rgb(250, 248, 242),
    key_bg: Color::Rgb(110, 110, 110),
  },
];

/// Index of the theme called `name`, or the first theme.
pub fn theme_index(name: Option<&str>) -> usize {
  name.and_then(|n| THEMES.iter().position(|t| t.name == n)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lookup_by_name() {
    assert_eq!(theme_index(Some("Dusk")), 1);
    assert_eq!(theme_index(Some("nope")), 0);
    assert_eq!(theme_index(None), 0);
  }
}
