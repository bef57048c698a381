//! Bar chart of one measurement per hour

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::ui::layout::chart_column;

/// Block characters for partial cell heights (8 levels)
const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Bars of one value per hour, spread evenly across the area
pub struct MetricSparkline<'a> {
    /// One value per hour
    values: &'a [f64],
    /// Highlighted hour, drawn with the marker style
    highlight: Option<usize>,
    style: Style,
    marker_style: Style,
}

impl<'a> MetricSparkline<'a> {
    pub fn new(values: &'a [f64]) -> Self {
        Self {
            values,
            highlight: None,
            style: Style::default().fg(Color::Cyan),
            marker_style: Style::default().fg(Color::Yellow),
        }
    }

    pub fn highlight(mut self, index: Option<usize>) -> Self {
        self.highlight = index;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn marker_style(mut self, style: Style) -> Self {
        self.marker_style = style;
        self
    }

    fn range(&self) -> (f64, f64) {
        let min = self.values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (min, max)
    }

    /// Bar height in eighths of a cell for `value`, at least one eighth
    fn eighths(&self, value: f64, rows: u16) -> u32 {
        let (min, max) = self.range();
        let span = max - min;
        let normalized = if span > f64::EPSILON {
            ((value - min) / span).clamp(0.0, 1.0)
        } else {
            0.5
        };
        let total = u32::from(rows) * 8;
        ((normalized * f64::from(total.saturating_sub(1))).round() as u32 + 1).min(total)
    }
}

impl<'a> Widget for MetricSparkline<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 || self.values.is_empty() {
            return;
        }

        let len = self.values.len();
        for (i, value) in self.values.iter().enumerate() {
            let start = chart_column(area.width, len, i);
            let end = if i + 1 == len {
                area.width
            } else {
                chart_column(area.width, len, i + 1)
            };
            let style = if self.highlight == Some(i) {
                self.marker_style
            } else {
                self.style
            };
            let mut remaining = self.eighths(*value, area.height);

            // Fill from the bottom row upwards
            for row in (0..area.height).rev() {
                if remaining == 0 {
                    break;
                }
                let level = remaining.min(8);
                remaining -= level;
                let symbol = BLOCKS[(level - 1) as usize];
                for col in start..end.max(start + 1).min(area.width) {
                    if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                        cell.set_char(symbol).set_style(style);
                    }
                }
            }
        }
    }
}
