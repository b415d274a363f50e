//! StreamVibe visual theme
//!
//! Dark slate backdrop with the cyan→blue brand gradient and a rose accent
//! for the watchlist heart. Style helpers for the renderers.

use ratatui::style::{Color, Modifier, Style};

/// StreamVibe color palette
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // CORE PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// Background: slate-900
    pub const BACKGROUND: Color = Color::Rgb(0x11, 0x18, 0x27);

    /// Primary: cyan-500 (brand gradient start)
    pub const PRIMARY: Color = Color::Rgb(0x06, 0xb6, 0xd4);

    /// Secondary: blue-500 (brand gradient end)
    pub const SECONDARY: Color = Color::Rgb(0x3b, 0x82, 0xf6);

    /// Accent: rose-500 (watchlist heart)
    pub const ACCENT: Color = Color::Rgb(0xf4, 0x3f, 0x5e);

    /// Text: gray-200
    pub const TEXT: Color = Color::Rgb(0xe5, 0xe7, 0xeb);

    /// Dim: gray-500
    pub const DIM: Color = Color::Rgb(0x6b, 0x72, 0x80);

    /// Success: green-500
    pub const SUCCESS: Color = Color::Rgb(0x22, 0xc5, 0x5e);

    /// Warning: amber-500
    pub const WARNING: Color = Color::Rgb(0xf5, 0x9e, 0x0b);

    /// Error: red-500
    pub const ERROR: Color = Color::Rgb(0xef, 0x44, 0x44);

    // ═══════════════════════════════════════════════════════════════════════
    // DERIVED COLORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Panel background: slate-800
    pub const PANEL: Color = Color::Rgb(0x1f, 0x29, 0x37);

    /// Border color (muted blue)
    pub const BORDER: Color = Color::Rgb(0x33, 0x4a, 0x68);

    /// Border color when focused (full cyan)
    pub const BORDER_FOCUSED: Color = Self::PRIMARY;

    // ═══════════════════════════════════════════════════════════════════════
    // STYLE HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    /// Default text style
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT)
    }

    /// Selected item (inverted on the primary color)
    pub fn highlighted() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Dimmed/muted text
    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    /// Accent text (watchlist heart, active markers)
    pub fn accent() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Secondary brand color
    pub fn secondary() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    /// Error style
    pub fn error() -> Style {
        Style::default()
            .fg(Self::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    /// Success style
    pub fn success() -> Style {
        Style::default()
            .fg(Self::SUCCESS)
            .add_modifier(Modifier::BOLD)
    }

    /// Warning style
    pub fn warning() -> Style {
        Style::default()
            .fg(Self::WARNING)
            .add_modifier(Modifier::BOLD)
    }

    /// Title/header style
    pub fn title() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Loading indicator style
    pub fn loading() -> Style {
        Style::default()
            .fg(Self::SECONDARY)
            .add_modifier(Modifier::SLOW_BLINK)
    }

    /// Keybind hint style
    pub fn keybind() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::DIM)
            .add_modifier(Modifier::BOLD)
    }

    /// Default border style
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    /// Focused border style
    pub fn border_focused() -> Style {
        Style::default().fg(Self::BORDER_FOCUSED)
    }

    /// Input field style
    pub fn input() -> Style {
        Style::default().fg(Self::TEXT)
    }

    /// Status bar style
    pub fn status_bar() -> Style {
        Style::default().fg(Self::DIM).bg(Self::PANEL)
    }

    /// Rating style scaled by score
    pub fn rating(vote_average: f32) -> Style {
        if vote_average >= 7.0 {
            Self::success()
        } else if vote_average >= 5.0 {
            Self::warning()
        } else {
            Self::dimmed()
        }
    }
}
