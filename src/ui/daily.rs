//! Daily forecast tab

use chrono::Local;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::data::format::{self, UvLevel};
use crate::data::{DailyForecast, DayRecord};
use crate::ui::palette::{glyph, Palette};

pub fn render(frame: &mut Frame, area: Rect, daily: Option<&DailyForecast>, palette: &Palette) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border())
        .title(Span::styled(" Daily forecast ", palette.title()));

    let days = daily.map(|d| d.days.as_slice()).unwrap_or(&[]);
    if days.is_empty() {
        let placeholder = Paragraph::new(Line::from(Span::styled(
            "No daily forecast available",
            palette.muted(),
        )))
        .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let header = Row::new(["Day", "Sky", "High", "Low", "Precip", "UV", "Wind", "Sun"])
        .style(palette.muted().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = days.iter().map(|day| row(day, palette)).collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Min(18),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Length(7),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(13),
        ],
    )
    .header(header)
    .block(block)
    .column_spacing(1);

    frame.render_widget(table, area);
}

fn row<'a>(day: &'a DayRecord, palette: &Palette) -> Row<'a> {
    let kind = day.condition.kind;
    let uv = UvLevel::from_index(day.uv_index.value);
    let sun = match (day.sunrise, day.sunset) {
        (Some(rise), Some(set)) => format!(
            "{}-{}",
            rise.with_timezone(&Local).format("%H:%M"),
            set.with_timezone(&Local).format("%H:%M")
        ),
        _ => "-".to_string(),
    };

    Row::new(vec![
        Cell::from(day.date.format("%a %d").to_string()),
        Cell::from(Line::from(vec![
            Span::styled(glyph(kind), Style::default().fg(palette.weather(kind))),
            Span::raw(" "),
            Span::raw(day.condition.type_text.clone()),
        ])),
        Cell::from(format::temperature(&day.high)).style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from(format::temperature(&day.low)).style(palette.muted()),
        Cell::from(format::percent(&day.precipitation_probability)),
        Cell::from(format!("{:.0} {}", day.uv_index.value, uv.label())),
        Cell::from(format::wind_speed(&day.wind_speed)),
        Cell::from(sun),
    ])
    .style(Style::default().fg(palette.text))
}
