use anyhow::{Context, Result};
use ratatui::style::Color;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use strum_macros::{Display, EnumString};

/// The persisted theme preference. Exactly two values exist; the lowercase
/// tokens ("light"/"dark") are what lands in the preference file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Glyph shown in the top bar for the theme toggle: a sun while dark,
    /// a moon while light, naming the theme a press switches to.
    pub fn indicator(&self) -> &'static str {
        match self {
            Theme::Dark => "☀",
            Theme::Light => "☾",
        }
    }

    /// Derive a default theme from the terminal environment when no
    /// preference has been persisted yet.
    ///
    /// COLORFGBG is usually "fg;bg"; background 0-6 means a dark terminal.
    pub fn detect_system() -> Self {
        if let Ok(colorfgbg) = std::env::var("COLORFGBG") {
            let parts: Vec<&str> = colorfgbg.split(';').collect();
            if parts.len() >= 2
                && let Some(last) = parts.last()
                && let Ok(bg) = last.parse::<u8>()
            {
                return match bg {
                    0..=6 => Theme::Dark,
                    _ => Theme::Light,
                };
            }
            // Variable present but unparseable: assume dark, the common case.
            return Theme::Dark;
        }

        Theme::Dark
    }
}

/// Colors used by the renderer. One palette per theme variant.
#[derive(Debug, Clone)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub heading: Color,
    pub accent: Color,
    pub muted: Color,
    pub border: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub ok: Color,
    pub alert: Color,
}

impl Palette {
    pub fn light() -> Self {
        Self {
            background: Color::Rgb(0xfb, 0xfb, 0xfd),
            foreground: Color::Rgb(0x1f, 0x24, 0x2b),
            heading: Color::Rgb(0x10, 0x14, 0x1a),
            accent: Color::Rgb(0x0b, 0x69, 0xd4),
            muted: Color::Rgb(0x6b, 0x72, 0x80),
            border: Color::Rgb(0xc9, 0xce, 0xd6),
            selection_bg: Color::Rgb(0x0b, 0x69, 0xd4),
            selection_fg: Color::Rgb(0xff, 0xff, 0xff),
            ok: Color::Rgb(0x1a, 0x7f, 0x37),
            alert: Color::Rgb(0xdc, 0x14, 0x3c),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(0x0e, 0x11, 0x16),
            foreground: Color::Rgb(0xd6, 0xda, 0xe2),
            heading: Color::Rgb(0xf2, 0xf4, 0xf8),
            accent: Color::Rgb(0x4f, 0x9c, 0xf0),
            muted: Color::Rgb(0x7d, 0x85, 0x94),
            border: Color::Rgb(0x3a, 0x41, 0x4d),
            selection_bg: Color::Rgb(0x4f, 0x9c, 0xf0),
            selection_fg: Color::Rgb(0x0e, 0x11, 0x16),
            ok: Color::Rgb(0x3f, 0xb9, 0x50),
            alert: Color::Rgb(0xf8, 0x51, 0x49),
        }
    }

    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self::light(),
            Theme::Dark => Self::dark(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PaletteFile {
    #[allow(dead_code)]
    pub name: String,
    pub themes: Vec<PaletteVariant>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PaletteVariant {
    #[allow(dead_code)]
    pub name: String,
    pub mode: String, // "light" or "dark"
    pub colors: HashMap<String, String>,
}

/// Load one palette variant from a theme JSON file. Colors missing from the
/// file fall back to the built-in palette for that theme.
#[tracing::instrument(skip(path), fields(path = ?path, theme = %theme))]
pub fn load_palette(path: &Path, theme: Theme) -> Result<Palette> {
    let content = fs::read_to_string(path).context("Failed to read theme file")?;
    let file: PaletteFile = serde_json::from_str(&content).context("Failed to parse theme JSON")?;

    let mode = theme.to_string();
    let variant = file
        .themes
        .iter()
        .find(|v| v.mode.eq_ignore_ascii_case(&mode))
        .or_else(|| file.themes.first())
        .context("No matching palette variant found")?;

    let base = Palette::for_theme(theme);
    let pick = |key: &str, fallback: Color| -> Color {
        variant
            .colors
            .get(key)
            .map(|hex| parse_color(hex))
            .unwrap_or(fallback)
    };

    Ok(Palette {
        background: pick("background", base.background),
        foreground: pick("foreground", base.foreground),
        heading: pick("heading", base.heading),
        accent: pick("accent", base.accent),
        muted: pick("muted", base.muted),
        border: pick("border", base.border),
        selection_bg: pick("selection.background", base.selection_bg),
        selection_fg: pick("selection.foreground", base.selection_fg),
        ok: pick("ok", base.ok),
        alert: pick("alert", base.alert),
    })
}

fn parse_color(hex: &str) -> Color {
    if let Ok(c) = hex.parse::<Color>() {
        return c;
    }

    let hex = hex.trim_start_matches('#');
    match hex.len() {
        6 | 8 => {
            // For 8-char hex (with alpha), ignore the alpha and use the RGB components.
            let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
            let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
            let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
            Color::Rgb(r, g, b)
        }
        _ => Color::Reset,
    }
}
