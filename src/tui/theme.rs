use anyhow::{Context, Result};
use ratatui::style::Color;

use crate::config::Config;

/// Colors used across panels and popups
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub accent: Color,
    pub foreground: Color,
    pub popup: Color,
    pub now_playing: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Rgb(0x00, 0x8B, 0x8B),
            foreground: Color::Rgb(0xFF, 0xFF, 0xFF),
            popup: Color::Rgb(0x0A, 0x0F, 0x14),
            now_playing: Color::Rgb(0x01, 0x77, 0x02),
        }
    }
}

impl Theme {
    /// Read the `color` section, keeping defaults for invalid entries
    pub fn from_config(config: &Config) -> Self {
        let defaults = Self::default();
        let color = |key: &str, fallback: Color| {
            let Some(hex) = config.get_string(key) else {
                return fallback;
            };
            match hex_to_color(&hex) {
                Ok(color) => color,
                Err(e) => {
                    log::error!("Invalid color for {}: {:#}", key, e);
                    fallback
                }
            }
        };

        Self {
            accent: color("color.accent", defaults.accent),
            foreground: color("color.foreground", defaults.foreground),
            popup: color("color.popup", defaults.popup),
            now_playing: color("color.now_playing_title", defaults.now_playing),
        }
    }
}

/// Parse a `#RRGGBB` hex string
pub fn hex_to_color(hex: &str) -> Result<Color> {
    let hex = hex.trim_start_matches('#');

    if hex.len() != 6 || !hex.is_ascii() {
        anyhow::bail!("Invalid hex color format: expected 6 characters, got {:?}", hex);
    }

    let r = u8::from_str_radix(&hex[0..2], 16).context("Failed to parse red component")?;
    let g = u8::from_str_radix(&hex[2..4], 16).context("Failed to parse green component")?;
    let b = u8::from_str_radix(&hex[4..6], 16).context("Failed to parse blue component")?;

    Ok(Color::Rgb(r, g, b))
}
