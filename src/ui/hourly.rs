//! Hour sequence view: metric chart, card strip and detail lines
//!
//! Used for both the forecast and the history tab. The chart and the strip
//! share one highlight; the strip scrolls horizontally by the offset of the
//! view's [`SmoothScroll`](crate::highlight::SmoothScroll). The chart plots
//! the view's [`ChartMetric`].

use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{block::Title, Block, Borders, Paragraph, Widget},
    Frame,
};

use crate::app::{ChartMetric, SequenceView};
use crate::data::{format, HourRecord, Measurement};
use crate::ui::layout::{cards_content_width, sequence_layout, CARD_WIDTH};
use crate::ui::palette::{glyph, Palette};
use crate::ui::widgets::MetricSparkline;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    hours: &[HourRecord],
    view: &SequenceView,
    palette: &Palette,
) {
    if hours.is_empty() {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border())
            .title(Span::styled(format!(" {title} "), palette.title()));
        let placeholder = Paragraph::new(Line::from(Span::styled(
            "No hourly data available",
            palette.muted(),
        )))
        .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let layout = sequence_layout(area);
    let highlight = view.highlight.active();

    render_chart(frame, layout.chart, title, hours, view, palette);
    render_strip(frame, layout.list, hours, view, palette);
    frame.render_widget(detail(hours, highlight, palette), layout.detail);
}

fn render_chart(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    hours: &[HourRecord],
    view: &SequenceView,
    palette: &Palette,
) {
    let metric = view.metric;
    let values: Vec<f64> = hours
        .iter()
        .map(|h| metric.measurement(&h.measurements).value)
        .collect();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let unit = &metric.measurement(&hours[0].measurements).unit;
    let range = format!(
        " {}  {} .. {} ",
        metric.label(),
        metric.format(&Measurement::new(min, unit.as_str())),
        metric.format(&Measurement::new(max, unit.as_str())),
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border())
        .title(Span::styled(format!(" {title} "), palette.title()))
        .title(Title::from(Span::styled(range, palette.muted())).alignment(Alignment::Right));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let sparkline = MetricSparkline::new(&values)
        .highlight(view.highlight.active())
        .style(Style::default().fg(chart_color(metric, palette)))
        .marker_style(Style::default().fg(palette.warning));
    frame.render_widget(sparkline, inner);
}

fn chart_color(metric: ChartMetric, palette: &Palette) -> ratatui::style::Color {
    match metric {
        ChartMetric::Temperature | ChartMetric::WindSpeed => palette.accent,
        ChartMetric::PrecipitationProbability | ChartMetric::Humidity => palette.info,
    }
}

fn render_strip(
    frame: &mut Frame,
    area: Rect,
    hours: &[HourRecord],
    view: &SequenceView,
    palette: &Palette,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border());
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    // Draw every card off-screen, then copy the visible window
    let strip_area = Rect::new(0, 0, cards_content_width(hours.len()), inner.height);
    let mut strip = Buffer::empty(strip_area);
    for (i, hour) in hours.iter().enumerate() {
        let card_area = Rect::new(i as u16 * CARD_WIDTH, 0, CARD_WIDTH, inner.height);
        card(hour, view.highlight.active() == Some(i), palette).render(card_area, &mut strip);
    }

    let offset = view.scroll.offset();
    let buf = frame.buffer_mut();
    for row in 0..inner.height {
        for col in 0..inner.width {
            let Some(source) = strip.cell((offset.saturating_add(col), row)) else {
                continue;
            };
            if let Some(target) = buf.cell_mut((inner.x + col, inner.y + row)) {
                *target = source.clone();
            }
        }
    }
}

fn card<'a>(hour: &'a HourRecord, highlighted: bool, palette: &Palette) -> Paragraph<'a> {
    let m = &hour.measurements;
    let border = if highlighted {
        Style::default().fg(palette.accent)
    } else {
        palette.border()
    };
    let base = if highlighted {
        palette.highlighted().fg(palette.text)
    } else {
        Style::default().fg(palette.text)
    };

    let lines = vec![
        Line::from(Span::styled(
            hour.timestamp.with_timezone(&Local).format("%H:%M").to_string(),
            palette.muted(),
        )),
        Line::from(vec![
            Span::styled(
                glyph(hour.condition.kind),
                Style::default().fg(palette.weather(hour.condition.kind)),
            ),
            Span::raw(" "),
            Span::styled(format::temperature(&m.temperature), base.add_modifier(Modifier::BOLD)),
        ]),
        Line::from(Span::styled(
            format::percent(&m.precipitation_probability),
            palette.muted(),
        )),
    ];

    Paragraph::new(lines)
        .style(base)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(border))
}

fn detail<'a>(hours: &'a [HourRecord], highlight: Option<usize>, palette: &Palette) -> Paragraph<'a> {
    let Some(hour) = highlight.and_then(|i| hours.get(i)) else {
        return Paragraph::new(Line::from(Span::styled(
            " Hover the chart or use ←/→ to inspect an hour",
            palette.muted(),
        )));
    };
    let m = &hour.measurements;
    let summary = Line::from(vec![
        Span::styled(
            format!(" {} ", hour.timestamp.with_timezone(&Local).format("%a %H:%M")),
            palette.title(),
        ),
        Span::styled(
            format!("{} ", hour.condition.type_text),
            Style::default().fg(palette.weather(hour.condition.kind)),
        ),
        Span::raw(format!(
            "{}  feels {}  wind {}  humidity {}  precip {}",
            format::temperature(&m.temperature),
            format::temperature(&m.apparent_temperature),
            format::wind_speed(&m.wind_speed),
            format::percent(&m.humidity),
            format::percent(&m.precipitation_probability),
        )),
    ]);
    let icon = Line::from(Span::styled(
        format!(" icon {}", hour.condition.icon_uri),
        palette.muted(),
    ));
    Paragraph::new(vec![summary, icon])
}
