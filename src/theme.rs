//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::Palette;
use crate::piece::BlockColor;

#[derive(Debug, Clone)]
pub struct Theme {
    /// One colour per [`BlockColor`], indexed by `BlockColor::index`.
    pub blocks: [Color; 10],
    /// Screen background.
    pub bg: Color,
    /// Empty board cells.
    pub grid: Color,
    /// Borders.
    pub div_line: Color,
    /// Body text.
    pub main_fg: Color,
    /// Titles and labels.
    pub title: Color,
    /// Neon highlight for menus and the next-piece panel.
    pub accent: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::neon()
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

impl Theme {
    /// Neon block colours on a dark blue background.
    pub fn neon() -> Self {
        Self {
            blocks: BlockColor::ALL.map(|c| rgb(c.rgb())),
            bg: Color::Rgb(0x12, 0x0C, 0x2A),
            grid: Color::Rgb(0x28, 0x28, 0x3C),
            div_line: Color::Rgb(0x32, 0xFF, 0xFF),
            main_fg: Color::Rgb(0xFF, 0xFF, 0xFF),
            title: Color::Rgb(0xFF, 0xFF, 0x32),
            accent: Color::Rgb(0xFF, 0x32, 0xFF),
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to the neon defaults if path is None or file is missing.
    pub fn load(path: Option<&Path>, palette: Palette) -> Result<Self, ThemeError> {
        let mut theme = match path {
            Some(p) if p.exists() => Self::from_map(&parse_theme_file(&std::fs::read_to_string(p)?)),
            _ => Self::neon(),
        };
        theme.apply_palette(palette);
        Ok(theme)
    }

    /// Swap block colours for the high-contrast variant.
    pub fn apply_palette(&mut self, palette: Palette) {
        match palette {
            Palette::Normal => {}
            Palette::HighContrast => {
                self.blocks = [
                    Color::Rgb(0xFF, 0x00, 0x00),
                    Color::Rgb(0x00, 0xFF, 0x00),
                    Color::Rgb(0x00, 0x66, 0xFF),
                    Color::Rgb(0x00, 0xFF, 0xFF),
                    Color::Rgb(0xFF, 0x00, 0xFF),
                    Color::Rgb(0xFF, 0xFF, 0x00),
                    Color::Rgb(0xFF, 0x88, 0x00),
                    Color::Rgb(0x99, 0x00, 0xFF),
                    Color::Rgb(0x99, 0xFF, 0x00),
                    Color::Rgb(0xFF, 0x66, 0xAA),
                ];
                self.grid = Color::Rgb(0x50, 0x50, 0x50);
            }
        }
    }

    /// Unknown keys are ignored; missing or invalid values keep the default.
    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).and_then(|v| parse_hex(v).ok());
        let d = Self::neon();
        let mut blocks = d.blocks;
        for (slot, color) in blocks.iter_mut().zip(BlockColor::ALL) {
            if let Some(c) = get(color.key()) {
                *slot = c;
            }
        }
        Self {
            blocks,
            bg: get("main_bg").unwrap_or(d.bg),
            grid: get("grid").unwrap_or(d.grid),
            div_line: get("div_line").unwrap_or(d.div_line),
            main_fg: get("main_fg").unwrap_or(d.main_fg),
            title: get("title").unwrap_or(d.title),
            accent: get("hi_fg").unwrap_or(d.accent),
        }
    }

    #[inline]
    pub fn block(&self, color: BlockColor) -> Color {
        self.blocks[color.index()]
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(stripped) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some(end) = stripped.find(']') else {
            continue;
        };
        let key = stripped[..end].trim();
        let rest = stripped[end + 1..].trim();
        if let Some(value) = rest.strip_prefix('=') {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                map.insert(key.to_string(), value.to_string());
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.to_string());
    let channel = |range: std::ops::Range<usize>| {
        s.get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or_else(invalid)
    };
    match s.len() {
        6 => Ok(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        3 => Ok(Color::Rgb(
            channel(0..1)? * 17,
            channel(1..2)? * 17,
            channel(2..3)? * 17,
        )),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_6() {
        let c = parse_hex("#FF3232").unwrap();
        assert!(matches!(c, Color::Rgb(0xFF, 0x32, 0x32)));
    }

    #[test]
    fn test_parse_hex_3() {
        let c = parse_hex("#FFF").unwrap();
        assert!(matches!(c, Color::Rgb(255, 255, 255)));
    }

    #[test]
    fn test_parse_hex_invalid() {
        assert!(matches!(parse_hex("#GG0000"), Err(ThemeError::InvalidHex(_))));
        assert!(matches!(parse_hex("#12345"), Err(ThemeError::InvalidHex(_))));
    }

    #[test]
    fn test_parse_theme_line() {
        let map = parse_theme_file(r##"theme[block_red]="#31353F""##);
        assert_eq!(map.get("block_red"), Some(&"#31353F".to_string()));
    }

    #[test]
    fn test_theme_file_overrides_block() {
        let map = parse_theme_file(
            r##"
            # comment
            theme[block_lime]='#010203'
            theme[main_bg]="#000000"
            theme[unknown]="#FFFFFF"
            theme[title]="nonsense"
            "##,
        );
        let theme = Theme::from_map(&map);
        assert_eq!(theme.block(BlockColor::Lime), Color::Rgb(1, 2, 3));
        assert_eq!(theme.bg, Color::Rgb(0, 0, 0));
        assert_eq!(theme.title, Theme::neon().title);
        assert_eq!(theme.block(BlockColor::Red), Color::Rgb(255, 50, 50));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let theme = Theme::load(Some(Path::new("/nonexistent/neontris.theme")), Palette::Normal)
            .unwrap();
        assert_eq!(theme.block(BlockColor::Cyan), Color::Rgb(50, 255, 255));
    }

    #[test]
    fn test_high_contrast_palette() {
        let theme = Theme::load(None, Palette::HighContrast).unwrap();
        assert_eq!(theme.block(BlockColor::Red), Color::Rgb(0xFF, 0, 0));
    }
}
