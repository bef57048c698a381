//! Screen geometry shared by rendering and mouse hit-testing
//!
//! The same functions compute where things are drawn and which hour a pointer
//! position refers to, so the two can never disagree.

use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};

/// Width of one hourly card, borders included
pub const CARD_WIDTH: u16 = 10;

/// Height of the error banner when shown
pub const ERROR_BANNER_HEIGHT: u16 = 6;

/// Top-level regions of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardLayout {
    pub header: Rect,
    pub tabs: Rect,
    pub error: Option<Rect>,
    pub body: Rect,
    pub footer: Rect,
}

pub fn dashboard_layout(area: Rect, show_error: bool) -> DashboardLayout {
    let error_height = if show_error { ERROR_BANNER_HEIGHT } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(error_height),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    DashboardLayout {
        header: chunks[0],
        tabs: chunks[1],
        error: show_error.then_some(chunks[2]),
        body: chunks[3],
        footer: chunks[4],
    }
}

/// Regions of an hour-sequence view (forecast or history)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceLayout {
    /// Chart block, including its border
    pub chart: Rect,
    /// Card strip block, including its border
    pub list: Rect,
    /// Summary of the highlighted hour and its icon
    pub detail: Rect,
}

impl SequenceLayout {
    /// Drawable area inside the chart border
    pub fn chart_inner(&self) -> Rect {
        self.chart.inner(Margin::new(1, 1))
    }

    /// Drawable area inside the card strip border
    pub fn list_inner(&self) -> Rect {
        self.list.inner(Margin::new(1, 1))
    }
}

pub fn sequence_layout(body: Rect) -> SequenceLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),
            Constraint::Length(7),
            Constraint::Length(2),
        ])
        .split(body);

    SequenceLayout {
        chart: chunks[0],
        list: chunks[1],
        detail: chunks[2],
    }
}

pub fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

/// Column of hour `index` inside a chart of `width` columns showing `len` hours
pub fn chart_column(width: u16, len: usize, index: usize) -> u16 {
    if len == 0 || width == 0 {
        return 0;
    }
    ((index as u32 * u32::from(width)) / len as u32) as u16
}

/// Hour under a pointer column inside the chart, if any
pub fn chart_index_at(chart_inner: Rect, len: usize, column: u16) -> Option<usize> {
    if len == 0 || chart_inner.width == 0 {
        return None;
    }
    if column < chart_inner.x || column >= chart_inner.x + chart_inner.width {
        return None;
    }
    let offset = u32::from(column - chart_inner.x);
    let index = (offset * len as u32) / u32::from(chart_inner.width);
    Some((index as usize).min(len - 1))
}

/// Card under a pointer column inside the strip, accounting for scroll
pub fn card_index_at(list_inner: Rect, scroll_offset: u16, len: usize, column: u16) -> Option<usize> {
    if column < list_inner.x || column >= list_inner.x + list_inner.width {
        return None;
    }
    let content_x = u32::from(column - list_inner.x) + u32::from(scroll_offset);
    let index = (content_x / u32::from(CARD_WIDTH)) as usize;
    (index < len).then_some(index)
}

/// Total strip width for `len` cards
pub fn cards_content_width(len: usize) -> u16 {
    (len as u32 * u32::from(CARD_WIDTH)).min(u32::from(u16::MAX)) as u16
}
