//! Color palettes and style helpers for the tour TUI.
//!
//! Two palettes, switched at runtime by the theme preference. Everything that
//! renders asks the active palette instead of reaching for constants.

use ratatui::style::{Color, Modifier, Style};
use tour_core::prefs::Theme;

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg: Color,
    pub accent: Color,
    pub playing: Color,
    pub visited: Color,
    pub error: Color,
    pub muted: Color,
    pub separator: Color,
    pub secondary: Color,
    pub primary: Color,
    pub selection_bg: Color,
    pub panel_border: Color,
    pub panel_border_focused: Color,
    pub modal_bg: Color,
    pub toast_info: Color,
    pub toast_warning: Color,
    pub toast_error: Color,
}

pub const DARK: Palette = Palette {
    bg: Color::Rgb(18, 18, 18),
    accent: Color::Rgb(255, 95, 95),
    playing: Color::Rgb(80, 200, 120),
    visited: Color::Rgb(100, 160, 130),
    error: Color::Rgb(255, 80, 80),
    muted: Color::Rgb(72, 72, 88),
    separator: Color::Rgb(40, 40, 52),
    secondary: Color::Rgb(115, 115, 138),
    primary: Color::Rgb(210, 210, 225),
    selection_bg: Color::Rgb(28, 28, 40),
    panel_border: Color::Rgb(40, 40, 52),
    panel_border_focused: Color::Rgb(120, 100, 200),
    modal_bg: Color::Rgb(18, 18, 26),
    toast_info: Color::Rgb(80, 160, 220),
    toast_warning: Color::Rgb(255, 184, 80),
    toast_error: Color::Rgb(255, 95, 95),
};

pub const LIGHT: Palette = Palette {
    bg: Color::Rgb(244, 242, 236),
    accent: Color::Rgb(190, 40, 40),
    playing: Color::Rgb(30, 130, 70),
    visited: Color::Rgb(60, 120, 90),
    error: Color::Rgb(190, 40, 40),
    muted: Color::Rgb(165, 160, 150),
    separator: Color::Rgb(210, 206, 196),
    secondary: Color::Rgb(120, 115, 105),
    primary: Color::Rgb(40, 38, 34),
    selection_bg: Color::Rgb(226, 222, 210),
    panel_border: Color::Rgb(200, 196, 186),
    panel_border_focused: Color::Rgb(120, 90, 190),
    modal_bg: Color::Rgb(250, 248, 242),
    toast_info: Color::Rgb(40, 110, 180),
    toast_warning: Color::Rgb(180, 120, 20),
    toast_error: Color::Rgb(190, 40, 40),
};

pub fn palette(theme: Theme) -> &'static Palette {
    match theme {
        Theme::Dark => &DARK,
        Theme::Light => &LIGHT,
    }
}

impl Palette {
    pub fn style_default(&self) -> Style {
        Style::default().fg(self.primary)
    }

    pub fn style_secondary(&self) -> Style {
        Style::default().fg(self.secondary)
    }

    pub fn style_accent(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn style_playing(&self) -> Style {
        Style::default().fg(self.playing)
    }

    pub fn style_muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn style_selected_focused(&self) -> Style {
        Style::default()
            .bg(self.selection_bg)
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn style_border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.panel_border_focused)
        } else {
            Style::default().fg(self.panel_border)
        }
    }
}
