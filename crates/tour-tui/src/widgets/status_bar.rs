//! Status bar — bottom lines with the keybinding hints and a separator.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::Palette;

/// Draw a horizontal separator line.
pub fn draw_separator(frame: &mut Frame, area: Rect, palette: &Palette) {
    let line = Line::from(Span::styled(
        "─".repeat(area.width as usize),
        Style::default().fg(palette.separator),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, modal_open: bool, palette: &Palette) {
    let (label, keys) = if modal_open {
        (
            " NEXT? ",
            " ←→ choose  Enter/y continue  Esc/n stay",
        )
    } else {
        (
            " TOUR ",
            " ↑↓/jk select  Enter play/pause  ,/. seek  s speed  l language  t transcript  o settings  ? help  q quit",
        )
    };

    let spans = vec![
        Span::styled(
            label,
            Style::default()
                .fg(palette.secondary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(keys, palette.style_muted()),
    ];
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
