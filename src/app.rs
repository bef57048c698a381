//! Application state management for the weather dashboard
//!
//! [`App`] owns the displayed snapshot, the theme controller and one
//! highlight per hour sequence. It never performs I/O itself: fetch results
//! arrive as [`RefreshMessage`]s and requests for work are raised as flags the
//! event loop acts on.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tracing::{debug, info, warn};

use crate::data::aggregate::{self, retheme};
use crate::data::{
    format, HourRecord, HourlyForecast, LocationData, Measurement, Measurements, WeatherSnapshot,
};
use crate::error::DashboardError;
use crate::highlight::{HighlightEvent, HighlightSync, ItemBounds, SmoothScroll};
use crate::refresh::{Category, RefreshCycle, RefreshMessage};
use crate::store::{write_value, PreferenceStore, LAST_LOCATION_KEY};
use crate::theme::{ThemeController, ThemeMode};
use crate::ui::layout::{
    self, card_index_at, cards_content_width, chart_index_at, dashboard_layout, sequence_layout,
    CARD_WIDTH,
};

/// Application state enum representing the current mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Nothing received yet for the current location
    Loading,
    /// Showing the dashboard
    Dashboard,
    /// Typing an address to look up
    Search,
}

/// Dashboard tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Current,
    Hourly,
    Daily,
    History,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Current, Tab::Hourly, Tab::Daily, Tab::History];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Current => "Now",
            Tab::Hourly => "Hourly",
            Tab::Daily => "Daily",
            Tab::History => "Past 24h",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Current => 0,
            Tab::Hourly => 1,
            Tab::Daily => 2,
            Tab::History => 3,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Hour sequence shown by this tab, if any
    pub fn sequence(&self) -> Option<SequenceKind> {
        match self {
            Tab::Hourly => Some(SequenceKind::Forecast),
            Tab::History => Some(SequenceKind::History),
            Tab::Current | Tab::Daily => None,
        }
    }
}

/// The two hour sequences that get a chart and a card strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceKind {
    Forecast,
    History,
}

/// Measurement plotted by an hour-sequence chart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChartMetric {
    #[default]
    Temperature,
    PrecipitationProbability,
    Humidity,
    WindSpeed,
}

impl ChartMetric {
    pub const ALL: [ChartMetric; 4] = [
        ChartMetric::Temperature,
        ChartMetric::PrecipitationProbability,
        ChartMetric::Humidity,
        ChartMetric::WindSpeed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ChartMetric::Temperature => "Temperature",
            ChartMetric::PrecipitationProbability => "Precipitation",
            ChartMetric::Humidity => "Humidity",
            ChartMetric::WindSpeed => "Wind",
        }
    }

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn measurement<'a>(&self, measurements: &'a Measurements) -> &'a Measurement {
        match self {
            ChartMetric::Temperature => &measurements.temperature,
            ChartMetric::PrecipitationProbability => &measurements.precipitation_probability,
            ChartMetric::Humidity => &measurements.humidity,
            ChartMetric::WindSpeed => &measurements.wind_speed,
        }
    }

    /// Display text of a value of this metric, unit included
    pub fn format(&self, m: &Measurement) -> String {
        match self {
            ChartMetric::Temperature => format::temperature(m),
            ChartMetric::PrecipitationProbability | ChartMetric::Humidity => format::percent(m),
            ChartMetric::WindSpeed => format::wind_speed(m),
        }
    }
}

/// Highlight, scroll and chart state of one displayed hour sequence
#[derive(Debug, Clone, Default)]
pub struct SequenceView {
    pub highlight: HighlightSync,
    pub scroll: SmoothScroll,
    /// Kept across refreshes
    pub metric: ChartMetric,
}

impl SequenceView {
    /// Discards view state for a replaced sequence
    fn replace(&mut self, len: usize) {
        self.highlight.replace_sequence(len);
        self.scroll.jump_to(0);
    }
}

/// Where the pointer was last seen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PointerRegion {
    Chart,
    List,
    Elsewhere,
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Selected tab
    pub tab: Tab,
    /// Location being displayed
    pub location: LocationData,
    /// Everything currently displayed
    pub snapshot: WeatherSnapshot,
    /// Theme mode and persisted preferences
    pub theme: ThemeController<Box<dyn PreferenceStore>>,
    pub forecast_view: SequenceView,
    pub history_view: SequenceView,
    /// First-error-wins state of the running refresh
    pub cycle: RefreshCycle,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating a refresh has been requested
    pub refresh_requested: bool,
    /// Address typed in search mode
    pub search_input: String,
    /// Address submitted for geocoding
    pub pending_address: Option<String>,
    /// Timestamp of last refresh start
    pub last_refresh: Option<DateTime<Local>>,
    /// Terminal area used for hit-testing
    area: Rect,
    pointer: PointerRegion,
}

impl App {
    pub fn new(location: LocationData, store: Box<dyn PreferenceStore>, system_dark: bool) -> Self {
        Self {
            state: AppState::Loading,
            tab: Tab::Current,
            location,
            snapshot: WeatherSnapshot::default(),
            theme: ThemeController::load(store, system_dark),
            forecast_view: SequenceView::default(),
            history_view: SequenceView::default(),
            cycle: RefreshCycle::default(),
            should_quit: false,
            show_help: false,
            refresh_requested: false,
            search_input: String::new(),
            pending_address: None,
            last_refresh: None,
            area: Rect::default(),
            pointer: PointerRegion::Elsewhere,
        }
    }

    /// Records the terminal size for mouse hit-testing
    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }

    pub fn is_dark(&self) -> bool {
        self.theme.is_dark()
    }

    /// Error currently surfaced to the user
    pub fn error(&self) -> Option<&DashboardError> {
        self.cycle.error()
    }

    pub fn is_loading(&self) -> bool {
        self.cycle.is_loading()
    }

    pub fn forecast_hours(&self) -> &[HourRecord] {
        self.snapshot
            .hourly_forecast
            .as_ref()
            .map(|f| f.hours.as_slice())
            .unwrap_or(&[])
    }

    pub fn history_hours(&self) -> &[HourRecord] {
        self.snapshot
            .hourly_history
            .as_ref()
            .map(|h| h.hours.as_slice())
            .unwrap_or(&[])
    }

    pub fn sequence(&self, kind: SequenceKind) -> (&[HourRecord], &SequenceView) {
        match kind {
            SequenceKind::Forecast => (self.forecast_hours(), &self.forecast_view),
            SequenceKind::History => (self.history_hours(), &self.history_view),
        }
    }

    fn view_mut(&mut self, kind: SequenceKind) -> &mut SequenceView {
        match kind {
            SequenceKind::Forecast => &mut self.forecast_view,
            SequenceKind::History => &mut self.history_view,
        }
    }

    /// Starts bookkeeping for a refresh cycle issued by the event loop
    pub fn begin_refresh(&mut self, generation: u64) {
        self.cycle.begin(generation);
        self.refresh_requested = false;
        self.last_refresh = Some(Local::now());
    }

    /// Switches to a new location and persists it
    ///
    /// The previous location's data stays visible until replacements arrive.
    pub fn set_location(&mut self, location: LocationData) {
        info!(location = %location.display_name(), "location changed");
        if let Err(err) = write_value(self.theme.store_mut(), LAST_LOCATION_KEY, &location) {
            warn!(%err, "failed to persist last location");
        }
        self.location = location;
        self.refresh_requested = true;
    }

    /// Surfaces an error outside a fetch, e.g. from address lookup
    pub fn report_error(&mut self, err: DashboardError) {
        self.record_failure(true, err);
    }

    /// Applies one message from the background tasks
    pub fn apply(&mut self, message: RefreshMessage) {
        let current = message
            .fetch_info()
            .map_or(true, |(generation, category)| self.accept(generation, category));
        let ctx = self.theme.icon_context();
        let dark = self.theme.is_dark();

        match message {
            RefreshMessage::Current { result, .. } => match result {
                Ok(response) => {
                    self.snapshot.current = Some(aggregate::aggregate_current(&response, &ctx, dark));
                }
                Err(err) => {
                    self.snapshot.current = None;
                    self.record_failure(current, err);
                }
            },
            RefreshMessage::HourlyForecast { result, .. } => {
                let forecast = match result {
                    Ok(response) => aggregate::aggregate_hourly_forecast(&response, &ctx, dark),
                    Err(err) => {
                        self.record_failure(current, err);
                        HourlyForecast::default()
                    }
                };
                self.forecast_view.replace(forecast.hours.len());
                self.snapshot.hourly_forecast = Some(forecast);
            }
            RefreshMessage::DailyForecast { result, .. } => match result {
                Ok(response) => {
                    self.snapshot.daily_forecast =
                        Some(aggregate::aggregate_daily_forecast(&response, &ctx, dark));
                }
                Err(err) => {
                    self.snapshot.daily_forecast = None;
                    self.record_failure(current, err);
                }
            },
            RefreshMessage::HourlyHistory { result, .. } => match result {
                Ok(response) => {
                    let history = aggregate::aggregate_hourly_history(&response, &ctx, dark);
                    self.history_view.replace(history.hours.len());
                    self.snapshot.hourly_history = Some(history);
                }
                Err(err) => {
                    self.history_view.replace(0);
                    self.snapshot.hourly_history = None;
                    self.record_failure(current, err);
                }
            },
            RefreshMessage::RefreshDue => {
                self.refresh_requested = true;
            }
            RefreshMessage::SystemThemeChanged(dark) => {
                if self.theme.system_preference_changed(dark).is_some() {
                    self.apply_theme();
                }
            }
        }
    }

    /// Marks `category` done for its cycle; false for a superseded generation
    fn accept(&mut self, generation: u64, category: Category) -> bool {
        let current = generation == self.cycle.generation();
        if current {
            self.cycle.complete(category);
        } else {
            // Not discarded: a superseded location may still overwrite newer data
            warn!(
                generation,
                current = self.cycle.generation(),
                category = category.label(),
                "applying result from a superseded refresh"
            );
        }
        if self.state == AppState::Loading {
            self.state = AppState::Dashboard;
        }
        current
    }

    /// Superseded failures clear their slice but never claim the error slot
    fn record_failure(&mut self, current: bool, err: DashboardError) {
        if current {
            self.cycle.record_failure(err);
        } else {
            debug!(%err, "ignoring error from a superseded refresh");
        }
    }

    /// Explicit theme selection
    pub fn set_theme_mode(&mut self, mode: ThemeMode) {
        if self.theme.set_mode(mode).is_some() {
            self.apply_theme();
        }
    }

    /// Recomputes every displayed icon for the current theme without refetching
    fn apply_theme(&mut self) {
        let ctx = self.theme.icon_context();
        let touched = retheme(&mut self.snapshot, &ctx, self.theme.is_dark());
        debug!(touched, dark = self.theme.is_dark(), "icons rethemed");
    }

    /// Routes a highlight event to one sequence and scrolls its strip if needed
    pub fn highlight(&mut self, kind: SequenceKind, event: HighlightEvent) {
        let changed = self.view_mut(kind).highlight.apply(event);
        if let Some(index) = changed {
            self.reveal(kind, index);
        }
    }

    fn step_highlight(&mut self, kind: SequenceKind, delta: isize) {
        if let Some(index) = self.view_mut(kind).highlight.step(delta) {
            self.reveal(kind, index);
        }
    }

    fn reveal(&mut self, kind: SequenceKind, index: usize) {
        let list_width = self.list_width();
        let view = self.view_mut(kind);
        let content = cards_content_width(view.highlight.len());
        let item = ItemBounds {
            start: (index as u16).saturating_mul(CARD_WIDTH),
            len: CARD_WIDTH,
        };
        if view.scroll.reveal(item, list_width, content) {
            debug!(index, target = view.scroll.target(), "scrolling card into view");
        }
    }

    fn sequence_layout(&self) -> layout::SequenceLayout {
        let dashboard = dashboard_layout(self.area, self.error().is_some());
        sequence_layout(dashboard.body)
    }

    fn list_width(&self) -> u16 {
        self.sequence_layout().list_inner().width
    }

    /// Advances animations; returns true while something is moving
    pub fn tick(&mut self) -> bool {
        let forecast = self.forecast_view.scroll.tick();
        let history = self.history_view.scroll.tick();
        forecast || history
    }

    /// Handles keyboard input
    ///
    /// - `q` / `Ctrl-C`: Quit
    /// - `Tab` / `Shift-Tab` / `1`-`4`: Switch tab
    /// - `←`/`h`, `→`/`l`: Move the chart cursor
    /// - `↑`/`k`, `↓`/`j`: Move through the hour cards
    /// - `Enter`: Select the highlighted card
    /// - `Esc`: Clear the highlight
    /// - `t`: Cycle theme (auto, light, dark)
    /// - `/`: Search for an address
    /// - `r`: Refresh
    /// - `?`: Toggle help
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('c')
        {
            self.should_quit = true;
            return;
        }

        // Help overlay intercepts all keys when shown
        if self.show_help {
            if matches!(
                key_event.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return;
        }

        match self.state {
            AppState::Loading => match key_event.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('t') => self.cycle_theme(),
                KeyCode::Char('/') => self.state = AppState::Search,
                _ => {}
            },
            AppState::Search => match key_event.code {
                KeyCode::Esc => {
                    self.search_input.clear();
                    self.state = self.resting_state();
                }
                KeyCode::Enter => {
                    let address = self.search_input.trim().to_string();
                    self.search_input.clear();
                    if !address.is_empty() {
                        self.pending_address = Some(address);
                    }
                    self.state = self.resting_state();
                }
                KeyCode::Backspace => {
                    self.search_input.pop();
                }
                KeyCode::Char(c) => self.search_input.push(c),
                _ => {}
            },
            AppState::Dashboard => self.handle_dashboard_key(key_event),
        }
    }

    fn resting_state(&self) -> AppState {
        if self.cycle.generation() == 0 && self.snapshot.current.is_none() {
            AppState::Loading
        } else {
            AppState::Dashboard
        }
    }

    fn cycle_theme(&mut self) {
        if self.theme.cycle_mode().is_some() {
            self.apply_theme();
        }
    }

    fn handle_dashboard_key(&mut self, key_event: KeyEvent) {
        let sequence = self.tab.sequence();
        match key_event.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::BackTab => self.tab = self.tab.prev(),
            KeyCode::Char('1') => self.tab = Tab::Current,
            KeyCode::Char('2') => self.tab = Tab::Hourly,
            KeyCode::Char('3') => self.tab = Tab::Daily,
            KeyCode::Char('4') => self.tab = Tab::History,
            KeyCode::Char('r') => self.refresh_requested = true,
            KeyCode::Char('t') => self.cycle_theme(),
            KeyCode::Char('/') => self.state = AppState::Search,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('m') => {
                if let Some(kind) = sequence {
                    let view = self.view_mut(kind);
                    view.metric = view.metric.next();
                    debug!(metric = view.metric.label(), "chart metric changed");
                }
            }
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Up | KeyCode::Char('k') => {
                if let Some(kind) = sequence {
                    self.step_highlight(kind, -1);
                }
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Down | KeyCode::Char('j') => {
                if let Some(kind) = sequence {
                    self.step_highlight(kind, 1);
                }
            }
            KeyCode::Enter => {
                if let Some(kind) = sequence {
                    if let Some(index) = self.sequence(kind).1.highlight.active() {
                        self.highlight(kind, HighlightEvent::ListTap(index));
                    }
                }
            }
            KeyCode::Esc => {
                if let Some(kind) = sequence {
                    self.highlight(kind, HighlightEvent::ChartLeave);
                }
            }
            _ => {}
        }
    }

    /// Handles pointer input over the chart and card strip
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.state != AppState::Dashboard || self.show_help {
            return;
        }
        let Some(kind) = self.tab.sequence() else {
            return;
        };
        let seq = self.sequence_layout();
        let (chart, list) = (seq.chart_inner(), seq.list_inner());
        let (len, offset) = {
            let view = self.sequence(kind).1;
            (view.highlight.len(), view.scroll.offset())
        };
        let (col, row) = (mouse.column, mouse.row);

        let region = if layout::contains(chart, col, row) {
            PointerRegion::Chart
        } else if layout::contains(list, col, row) {
            PointerRegion::List
        } else {
            PointerRegion::Elsewhere
        };

        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                if region != self.pointer {
                    match self.pointer {
                        PointerRegion::Chart => self.highlight(kind, HighlightEvent::ChartLeave),
                        PointerRegion::List => self.highlight(kind, HighlightEvent::ListLeave),
                        PointerRegion::Elsewhere => {}
                    }
                }
                self.pointer = region;
                match region {
                    PointerRegion::Chart => {
                        if let Some(i) = chart_index_at(chart, len, col) {
                            self.highlight(kind, HighlightEvent::ChartEnter(i));
                        }
                    }
                    PointerRegion::List => match card_index_at(list, offset, len, col) {
                        Some(i) => self.highlight(kind, HighlightEvent::ListEnter(i)),
                        None => self.highlight(kind, HighlightEvent::ListLeave),
                    },
                    PointerRegion::Elsewhere => {}
                }
            }
            MouseEventKind::Down(MouseButton::Left) if region == PointerRegion::List => {
                if let Some(i) = card_index_at(list, offset, len, col) {
                    self.highlight(kind, HighlightEvent::ListTap(i));
                }
            }
            MouseEventKind::ScrollDown | MouseEventKind::ScrollUp
                if region == PointerRegion::List =>
            {
                let max = cards_content_width(len).saturating_sub(list.width);
                let view = self.view_mut(kind);
                let current = view.scroll.target();
                let target = if mouse.kind == MouseEventKind::ScrollDown {
                    current.saturating_add(CARD_WIDTH).min(max)
                } else {
                    current.saturating_sub(CARD_WIDTH)
                };
                view.scroll.scroll_to(target);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::upstream::{
        CurrentConditionsResponse, DailyForecastResponse, HourlyForecastResponse,
        HourlyHistoryResponse,
    };
    use crate::store::{read_value, MemoryPreferenceStore};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    /// Helper to create a KeyEvent for testing
    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn test_app() -> App {
        let mut app = App::new(
            LocationData::new(31.2304, 121.4737),
            Box::new(MemoryPreferenceStore::new()),
            false,
        );
        app.set_area(Rect::new(0, 0, 120, 40));
        app
    }

    fn hours_json(n: usize) -> String {
        let hours: Vec<String> = (0..n)
            .map(|h| {
                format!(
                    r#"{{"interval": {{"startTime": "2025-01-28T{h:02}:00:00Z"}},
                        "weatherCondition": {{"iconBaseUri": "https://x/icon/rain", "description": {{"text": "Light rain"}}, "type": "LIGHT_RAIN"}},
                        "temperature": {{"degrees": {t}, "unit": "CELSIUS"}}}}"#,
                    t = 5 + h
                )
            })
            .collect();
        hours.join(",")
    }

    fn forecast(n: usize) -> HourlyForecastResponse {
        serde_json::from_str(&format!(r#"{{"forecastHours": [{}]}}"#, hours_json(n))).unwrap()
    }

    fn history(n: usize) -> HourlyHistoryResponse {
        serde_json::from_str(&format!(r#"{{"historyHours": [{}]}}"#, hours_json(n))).unwrap()
    }

    fn current() -> CurrentConditionsResponse {
        serde_json::from_str(
            r#"{"currentTime": "2025-01-28T22:04:12Z",
                "weatherCondition": {"iconBaseUri": "https://x/icon/sunny", "description": {"text": "Sunny"}, "type": "CLEAR"},
                "temperature": {"degrees": 13.7, "unit": "CELSIUS"}}"#,
        )
        .unwrap()
    }

    fn daily() -> DailyForecastResponse {
        serde_json::from_str(
            r#"{"forecastDays": [{"interval": {"startTime": "2025-01-28T16:00:00Z"},
                "daytimeForecast": {"weatherCondition": {"iconBaseUri": "https://x/icon/cloudy", "type": "CLOUDY"}}}]}"#,
        )
        .unwrap()
    }

    fn load_all(app: &mut App, generation: u64) {
        app.begin_refresh(generation);
        app.apply(RefreshMessage::Current { generation, result: Ok(current()) });
        app.apply(RefreshMessage::HourlyForecast { generation, result: Ok(forecast(24)) });
        app.apply(RefreshMessage::DailyForecast { generation, result: Ok(daily()) });
        app.apply(RefreshMessage::HourlyHistory { generation, result: Ok(history(24)) });
    }

    fn all_icons(app: &mut App) -> Vec<String> {
        app.snapshot.conditions_mut().map(|c| c.icon_uri.clone()).collect()
    }

    #[test]
    fn test_initial_state_is_loading() {
        let app = test_app();
        assert_eq!(app.state, AppState::Loading);
        assert!(!app.should_quit);
        assert!(app.error().is_none());
    }

    #[test]
    fn test_first_result_shows_dashboard() {
        let mut app = test_app();
        app.begin_refresh(1);
        assert!(app.is_loading());
        app.apply(RefreshMessage::DailyForecast { generation: 1, result: Ok(daily()) });
        assert_eq!(app.state, AppState::Dashboard);
        assert!(app.is_loading());
    }

    #[test]
    fn test_all_categories_populate() {
        let mut app = test_app();
        load_all(&mut app, 1);
        assert!(!app.is_loading());
        assert!(app.snapshot.current.is_some());
        assert_eq!(app.forecast_hours().len(), 24);
        assert_eq!(app.history_hours().len(), 24);
        assert_eq!(app.snapshot.daily_forecast.as_ref().map(|d| d.days.len()), Some(1));
        assert!(app.error().is_none());
    }

    #[test]
    fn test_only_hourly_failure_leaves_other_slices() {
        let mut app = test_app();
        app.begin_refresh(1);
        app.apply(RefreshMessage::Current { generation: 1, result: Ok(current()) });
        app.apply(RefreshMessage::HourlyForecast {
            generation: 1,
            result: Err(DashboardError::NetworkError("timeout".into())),
        });
        app.apply(RefreshMessage::DailyForecast { generation: 1, result: Ok(daily()) });
        app.apply(RefreshMessage::HourlyHistory { generation: 1, result: Ok(history(3)) });

        assert!(app.snapshot.current.is_some());
        assert!(app.snapshot.daily_forecast.is_some());
        assert_eq!(app.history_hours().len(), 3);
        assert_eq!(app.snapshot.hourly_forecast.as_ref().map(|f| f.hours.len()), Some(0));
        assert_eq!(app.error(), Some(&DashboardError::NetworkError("timeout".into())));
    }

    #[test]
    fn test_later_failures_do_not_replace_error() {
        let mut app = test_app();
        app.begin_refresh(1);
        app.apply(RefreshMessage::Current {
            generation: 1,
            result: Err(DashboardError::LocationNotSupported("first".into())),
        });
        app.apply(RefreshMessage::DailyForecast {
            generation: 1,
            result: Err(DashboardError::NetworkError("second".into())),
        });
        assert!(app.snapshot.current.is_none());
        assert!(app.snapshot.daily_forecast.is_none());
        assert_eq!(app.error(), Some(&DashboardError::LocationNotSupported("first".into())));

        app.begin_refresh(2);
        assert!(app.error().is_none());
    }

    #[test]
    fn test_history_failure_clears_slice() {
        let mut app = test_app();
        load_all(&mut app, 1);
        app.begin_refresh(2);
        app.apply(RefreshMessage::HourlyHistory {
            generation: 2,
            result: Err(DashboardError::NetworkError("x".into())),
        });
        assert!(app.snapshot.hourly_history.is_none());
        assert_eq!(app.history_view.highlight.len(), 0);
    }

    #[test]
    fn test_theme_change_rethemes_without_fetch() {
        let mut app = test_app();
        app.set_theme_mode(ThemeMode::Light);
        load_all(&mut app, 1);
        assert!(all_icons(&mut app).iter().all(|u| !u.contains("_dark")));

        app.set_theme_mode(ThemeMode::Dark);
        let icons = all_icons(&mut app);
        assert!(!icons.is_empty());
        assert!(icons.iter().all(|u| u.ends_with("_dark.svg")));
        assert!(!app.refresh_requested, "theme change must not refetch");
    }

    #[test]
    fn test_theme_mode_is_persisted() {
        let mut app = test_app();
        app.set_theme_mode(ThemeMode::Dark);
        let stored: Option<ThemeMode> = read_value(app.theme.store(), crate::store::THEME_MODE_KEY);
        assert_eq!(stored, Some(ThemeMode::Dark));
    }

    #[test]
    fn test_system_change_rethemes_in_auto() {
        let mut app = test_app();
        load_all(&mut app, 1);
        assert!(!app.is_dark());
        app.apply(RefreshMessage::SystemThemeChanged(true));
        assert!(app.is_dark());
        assert!(all_icons(&mut app).iter().all(|u| u.ends_with("_dark.svg")));
    }

    #[test]
    fn test_replacement_clears_highlight() {
        let mut app = test_app();
        load_all(&mut app, 1);
        app.highlight(SequenceKind::Forecast, HighlightEvent::ChartEnter(20));
        assert_eq!(app.forecast_view.highlight.active(), Some(20));

        app.begin_refresh(2);
        app.apply(RefreshMessage::HourlyForecast { generation: 2, result: Ok(forecast(10)) });
        assert_eq!(app.forecast_view.highlight.active(), None);
        assert_eq!(app.forecast_view.highlight.len(), 10);
    }

    #[test]
    fn test_stale_generation_still_applies() {
        let mut app = test_app();
        app.begin_refresh(1);
        app.begin_refresh(2);
        app.apply(RefreshMessage::HourlyForecast { generation: 1, result: Ok(forecast(5)) });
        assert_eq!(app.forecast_hours().len(), 5);
        // the current cycle is still waiting on its own hourly result
        assert!(app.cycle.pending().contains(&Category::HourlyForecast));
    }

    #[test]
    fn test_stale_failure_does_not_take_error_slot() {
        let mut app = test_app();
        app.begin_refresh(1);
        app.begin_refresh(2);
        app.apply(RefreshMessage::Current {
            generation: 1,
            result: Err(DashboardError::NetworkError("old location".into())),
        });
        assert!(app.snapshot.current.is_none());
        assert!(app.error().is_none());

        app.apply(RefreshMessage::DailyForecast {
            generation: 2,
            result: Err(DashboardError::LocationNotSupported("new location".into())),
        });
        assert_eq!(
            app.error(),
            Some(&DashboardError::LocationNotSupported("new location".into()))
        );
    }

    #[test]
    fn test_highlight_far_card_starts_scroll() {
        let mut app = test_app();
        load_all(&mut app, 1);
        app.highlight(SequenceKind::Forecast, HighlightEvent::ChartEnter(23));
        assert!(app.forecast_view.scroll.is_animating());
        while app.tick() {}
        assert!(app.forecast_view.scroll.offset() > 0);

        let before = app.forecast_view.scroll.offset();
        app.highlight(SequenceKind::Forecast, HighlightEvent::ListEnter(22));
        assert!(!app.forecast_view.scroll.is_animating());
        assert_eq!(app.forecast_view.scroll.offset(), before);
    }

    #[test]
    fn test_keyboard_moves_highlight() {
        let mut app = test_app();
        load_all(&mut app, 1);
        app.handle_key(key_event(KeyCode::Char('2')));
        assert_eq!(app.tab, Tab::Hourly);
        app.handle_key(key_event(KeyCode::Right));
        app.handle_key(key_event(KeyCode::Down));
        assert_eq!(app.forecast_view.highlight.active(), Some(1));
        app.handle_key(key_event(KeyCode::Esc));
        assert_eq!(app.forecast_view.highlight.active(), None);
    }

    #[test]
    fn test_metric_key_cycles_current_sequence_only() {
        let mut app = test_app();
        load_all(&mut app, 1);
        app.handle_key(key_event(KeyCode::Char('m')));
        assert_eq!(app.forecast_view.metric, ChartMetric::Temperature, "no chart on Now");

        app.handle_key(key_event(KeyCode::Char('2')));
        app.handle_key(key_event(KeyCode::Char('m')));
        app.handle_key(key_event(KeyCode::Char('m')));
        assert_eq!(app.forecast_view.metric, ChartMetric::Humidity);
        assert_eq!(app.history_view.metric, ChartMetric::Temperature);

        // a new sequence keeps the chosen metric
        app.begin_refresh(2);
        app.apply(RefreshMessage::HourlyForecast { generation: 2, result: Ok(forecast(4)) });
        assert_eq!(app.forecast_view.metric, ChartMetric::Humidity);

        app.handle_key(key_event(KeyCode::Char('m')));
        app.handle_key(key_event(KeyCode::Char('m')));
        assert_eq!(app.forecast_view.metric, ChartMetric::Temperature);
    }

    #[test]
    fn test_mouse_over_chart_and_list() {
        let mut app = test_app();
        load_all(&mut app, 1);
        app.tab = Tab::Hourly;
        let seq = app.sequence_layout();
        let chart = seq.chart_inner();
        let list = seq.list_inner();

        app.handle_mouse(mouse(MouseEventKind::Moved, chart.x, chart.y));
        assert_eq!(app.forecast_view.highlight.active(), Some(0));

        app.handle_mouse(mouse(MouseEventKind::Moved, list.x + CARD_WIDTH, list.y));
        assert_eq!(app.forecast_view.highlight.active(), Some(1));

        app.handle_mouse(mouse(MouseEventKind::Moved, 0, 0));
        assert_eq!(app.forecast_view.highlight.active(), None);

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), list.x + 2, list.y));
        assert_eq!(app.forecast_view.highlight.active(), Some(0));
    }

    #[test]
    fn test_mouse_ignored_on_current_tab() {
        let mut app = test_app();
        load_all(&mut app, 1);
        app.handle_mouse(mouse(MouseEventKind::Moved, 5, 10));
        assert_eq!(app.forecast_view.highlight.active(), None);
    }

    #[test]
    fn test_theme_key_cycles() {
        let mut app = test_app();
        load_all(&mut app, 1);
        app.handle_key(key_event(KeyCode::Char('t')));
        assert_eq!(app.theme.mode(), ThemeMode::Light);
        app.handle_key(key_event(KeyCode::Char('t')));
        assert_eq!(app.theme.mode(), ThemeMode::Dark);
        assert!(app.is_dark());
    }

    #[test]
    fn test_search_submits_address() {
        let mut app = test_app();
        load_all(&mut app, 1);
        app.handle_key(key_event(KeyCode::Char('/')));
        assert_eq!(app.state, AppState::Search);
        for c in "Paris".chars() {
            app.handle_key(key_event(KeyCode::Char(c)));
        }
        app.handle_key(key_event(KeyCode::Backspace));
        app.handle_key(key_event(KeyCode::Enter));
        assert_eq!(app.pending_address.as_deref(), Some("Pari"));
        assert_eq!(app.state, AppState::Dashboard);
    }

    #[test]
    fn test_set_location_persists_and_requests_refresh() {
        let mut app = test_app();
        app.set_location(LocationData::new(48.85, 2.35));
        assert!(app.refresh_requested);
        let stored: Option<LocationData> = read_value(app.theme.store(), LAST_LOCATION_KEY);
        assert_eq!(stored.map(|l| l.lat), Some(48.85));
    }

    #[test]
    fn test_q_quits_and_help_intercepts() {
        let mut app = test_app();
        load_all(&mut app, 1);
        app.handle_key(key_event(KeyCode::Char('?')));
        assert!(app.show_help);
        app.handle_key(key_event(KeyCode::Char('r')));
        assert!(!app.refresh_requested);
        app.handle_key(key_event(KeyCode::Esc));
        assert!(!app.show_help);
        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_refresh_due_sets_flag() {
        let mut app = test_app();
        app.apply(RefreshMessage::RefreshDue);
        assert!(app.refresh_requested);
    }

    #[test]
    fn test_tab_cycle() {
        assert_eq!(Tab::History.next(), Tab::Current);
        assert_eq!(Tab::Current.prev(), Tab::History);
    }
}
