//! Error banner with title, message and recovery suggestions

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::error::{DashboardError, Severity};
use crate::ui::palette::Palette;

fn icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "✖",
        Severity::Warning => "⚠",
        Severity::Info => "ℹ",
    }
}

pub fn render(frame: &mut Frame, area: Rect, error: &DashboardError, palette: &Palette) {
    let severity = error.severity();
    let color = palette.severity(severity);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(Span::styled(
            format!(" {} {} ", icon(severity), error.title()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));

    let mut lines = vec![Line::from(Span::styled(
        error.message().to_string(),
        Style::default().fg(palette.text),
    ))];
    lines.extend(error.suggestions().iter().map(|s| {
        Line::from(vec![
            Span::styled("  • ", Style::default().fg(color)),
            Span::styled(*s, palette.muted()),
        ])
    }));

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
