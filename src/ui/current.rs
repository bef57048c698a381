//! Current conditions tab

use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::data::format::{self, UvLevel};
use crate::data::{CurrentWeather, Measurement};
use crate::ui::palette::{glyph, Palette};

pub fn render(frame: &mut Frame, area: Rect, current: Option<&CurrentWeather>, palette: &Palette) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border())
        .title(Span::styled(" Current conditions ", palette.title()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(current) = current else {
        let placeholder = Paragraph::new(Line::from(Span::styled(
            "No current conditions available",
            palette.muted(),
        )));
        frame.render_widget(placeholder, inner);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(inner);

    frame.render_widget(summary(current, palette), chunks[0]);
    frame.render_widget(details(current, palette), chunks[1]);
}

fn summary<'a>(current: &'a CurrentWeather, palette: &Palette) -> Paragraph<'a> {
    let m = &current.measurements;
    let condition = &current.condition;
    let accent = palette.weather(condition.kind);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("{} ", glyph(condition.kind)), Style::default().fg(accent)),
            Span::styled(
                format::temperature(&m.temperature),
                Style::default().fg(palette.text).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            condition.type_text.clone(),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
    ];
    if !condition.description_text.is_empty() && condition.description_text != condition.type_text {
        lines.push(Line::from(Span::styled(
            condition.description_text.clone(),
            palette.muted(),
        )));
    }
    lines.push(Line::from(vec![
        Span::styled("Feels like ", palette.muted()),
        Span::raw(format::temperature(&m.apparent_temperature)),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        condition.kind.activity_suggestion(),
        Style::default().fg(palette.text),
    )));
    lines.push(Line::from(""));
    let observed = current
        .observation_time
        .map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    lines.push(Line::from(Span::styled(
        format!("Observed at {observed}"),
        palette.muted(),
    )));
    lines.push(Line::from(Span::styled(
        condition.icon_uri.clone(),
        palette.muted(),
    )));

    Paragraph::new(lines).wrap(Wrap { trim: true })
}

fn details<'a>(current: &'a CurrentWeather, palette: &Palette) -> Paragraph<'a> {
    let m = &current.measurements;
    let (visibility, visibility_band) = format::visibility(&m.visibility);
    let (humidity_band, _) = format::humidity_description(m.humidity.value);
    let uv = UvLevel::from_index(m.uv_index.value);
    let (r, g, b) = uv.rgb();

    let mut wind = format::wind_speed(&m.wind_speed);
    if let Some(cardinal) = m.wind_direction.cardinal.as_deref() {
        wind.push_str(&format!(
            " {} ({})",
            format::compass_abbrev(m.wind_direction.value),
            format::cardinal_label(cardinal)
        ));
    }

    let lines = vec![
        detail_line("Humidity", format!("{} ({humidity_band})", format::percent(&m.humidity)), palette),
        detail_line("Dew point", format::temperature(&m.dew_point), palette),
        detail_line("Wind", wind, palette),
        Line::from(vec![
            Span::styled(format!("{:<14}", "UV index"), palette.muted()),
            Span::raw(format!("{:.0} ", m.uv_index.value)),
            Span::styled(uv.label(), Style::default().fg(Color::Rgb(r, g, b))),
            Span::styled(format!("  {}", uv.advice()), palette.muted()),
        ]),
        detail_line("Visibility", format!("{visibility} ({visibility_band})"), palette),
        detail_line("Pressure", format::pressure(&m.pressure), palette),
        detail_line(
            "Cloud cover",
            format!(
                "{} ({})",
                format::percent(&m.cloud_cover),
                format::cloud_cover_description(m.cloud_cover.value)
            ),
            palette,
        ),
        detail_line("Precipitation", precipitation(&m.precipitation_probability), palette),
    ];

    Paragraph::new(lines)
}

fn precipitation(m: &Measurement) -> String {
    format!(
        "{} ({})",
        format::percent(m),
        format::precipitation_description(m.value)
    )
}

fn detail_line(label: &str, value: String, palette: &Palette) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<14}"), palette.muted()),
        Span::styled(value, Style::default().fg(palette.text)),
    ])
}
