//! UI rendering module for the weather dashboard
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components. Everything is drawn from an
//! immutable [`App`]; colours come from the [`Palette`] of the resolved theme.

pub mod current;
pub mod daily;
pub mod error_banner;
pub mod help_overlay;
pub mod hourly;
pub mod layout;
pub mod palette;
pub mod widgets;

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, AppState, SequenceKind, Tab};
use layout::dashboard_layout;
pub use palette::Palette;

/// Renders the whole dashboard
pub fn render(frame: &mut Frame, app: &App) {
    let palette = Palette::for_theme(app.is_dark());
    let area = frame.area();
    frame.render_widget(Block::default().style(palette.base()), area);

    let regions = dashboard_layout(area, app.error().is_some());
    render_header(frame, regions.header, app, &palette);
    render_tabs(frame, regions.tabs, app, &palette);
    if let (Some(banner), Some(error)) = (regions.error, app.error()) {
        error_banner::render(frame, banner, error, &palette);
    }

    if app.state == AppState::Loading && app.snapshot.current.is_none() {
        render_loading(frame, regions.body, app, &palette);
    } else {
        render_body(frame, regions.body, app, &palette);
    }

    render_footer(frame, regions.footer, app, &palette);

    if app.show_help {
        help_overlay::render(frame, &palette);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let theme = app.theme.state();
    let resolved = if theme.resolved_dark { "dark" } else { "light" };
    let mut status = vec![Span::styled(
        format!("Theme: {} ({resolved})", theme.mode),
        palette.muted(),
    )];
    if let Some(at) = app.last_refresh {
        status.push(Span::styled(
            format!("  ·  Updated {}", at.format("%H:%M")),
            palette.muted(),
        ));
    }
    if app.is_loading() {
        status.push(Span::styled(
            "  ·  Loading…",
            Style::default().fg(palette.info),
        ));
    }

    let lines = vec![
        Line::from(vec![
            Span::styled(" weatherdash ", palette.title()),
            Span::styled(
                app.location.display_name(),
                Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(
            std::iter::once(Span::raw(" "))
                .chain(status)
                .collect::<Vec<_>>(),
        ),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let titles: Vec<String> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| format!("{} {}", i + 1, tab.title()))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .style(palette.muted())
        .highlight_style(palette.title().add_modifier(Modifier::UNDERLINED))
        .divider("│");
    frame.render_widget(tabs, area);
}

fn render_body(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    match app.tab {
        Tab::Current => current::render(frame, area, app.snapshot.current.as_ref(), palette),
        Tab::Daily => daily::render(frame, area, app.snapshot.daily_forecast.as_ref(), palette),
        Tab::Hourly | Tab::History => {
            let kind = app.tab.sequence().unwrap_or(SequenceKind::Forecast);
            let title = match kind {
                SequenceKind::Forecast => "Hourly forecast",
                SequenceKind::History => "Past 24 hours",
            };
            let (hours, view) = app.sequence(kind);
            hourly::render(frame, area, title, hours, view, palette);
        }
    }
}

fn render_loading(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let message = Paragraph::new(vec![
        Line::from(Span::styled("Loading weather…", palette.title())),
        Line::from(Span::styled(app.location.display_name(), palette.muted())),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(message, help_overlay::centered_rect(area.width, 2, area));
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let line = if app.state == AppState::Search {
        Line::from(vec![
            Span::styled(" Address: ", palette.title()),
            Span::styled(format!("{}_", app.search_input), Style::default().fg(palette.text)),
            Span::styled("  Enter search · Esc cancel", palette.muted()),
        ])
    } else if app.tab.sequence().is_some() {
        Line::from(Span::styled(
            " q quit · Tab switch · ←/→ hour · m metric · t theme · r refresh · ? help",
            palette.muted(),
        ))
    } else {
        Line::from(Span::styled(
            " q quit · Tab switch · / search · t theme · r refresh · ? help",
            palette.muted(),
        ))
    };
    frame.render_widget(Paragraph::new(line), area);
}
