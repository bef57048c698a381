//! Background data refresh
//!
//! Each refresh fetches the four weather categories as independent tokio
//! tasks. Results come back over an mpsc channel, one message per category, in
//! whatever order they finish. A periodic ticker asks the app to refresh and a
//! probe task reports system colour-scheme changes on the same channel.

use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::data::client::{DEFAULT_DAYS, DEFAULT_HOURS};
use crate::data::upstream::{
    CurrentConditionsResponse, DailyForecastResponse, HourlyForecastResponse,
    HourlyHistoryResponse,
};
use crate::data::{LocationData, WeatherClient};
use crate::error::DashboardError;
use crate::theme;

/// The four independently fetched categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Current,
    HourlyForecast,
    DailyForecast,
    HourlyHistory,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Current,
        Category::HourlyForecast,
        Category::DailyForecast,
        Category::HourlyHistory,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Current => "current conditions",
            Category::HourlyForecast => "hourly forecast",
            Category::DailyForecast => "daily forecast",
            Category::HourlyHistory => "hourly history",
        }
    }
}

/// Result of one category fetch
pub type Fetched<T> = Result<T, DashboardError>;

/// Messages sent from background tasks to the app
#[derive(Debug, Clone)]
pub enum RefreshMessage {
    Current {
        generation: u64,
        result: Fetched<CurrentConditionsResponse>,
    },
    HourlyForecast {
        generation: u64,
        result: Fetched<HourlyForecastResponse>,
    },
    DailyForecast {
        generation: u64,
        result: Fetched<DailyForecastResponse>,
    },
    HourlyHistory {
        generation: u64,
        result: Fetched<HourlyHistoryResponse>,
    },
    /// Periodic refresh is due
    RefreshDue,
    /// System colour scheme probe result changed
    SystemThemeChanged(bool),
}

impl RefreshMessage {
    /// Generation and category of a fetch result
    pub fn fetch_info(&self) -> Option<(u64, Category)> {
        match self {
            RefreshMessage::Current { generation, .. } => Some((*generation, Category::Current)),
            RefreshMessage::HourlyForecast { generation, .. } => {
                Some((*generation, Category::HourlyForecast))
            }
            RefreshMessage::DailyForecast { generation, .. } => {
                Some((*generation, Category::DailyForecast))
            }
            RefreshMessage::HourlyHistory { generation, .. } => {
                Some((*generation, Category::HourlyHistory))
            }
            RefreshMessage::RefreshDue | RefreshMessage::SystemThemeChanged(_) => None,
        }
    }
}

/// Configuration for fetch sizes and refresh intervals
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Forecast and history hours to request
    pub hours: u32,
    /// Forecast days to request
    pub days: u32,
    /// Interval for automatic refresh
    pub interval: Duration,
    /// Interval between system colour-scheme probes
    pub theme_probe_interval: Duration,
    /// Whether periodic tasks run
    pub enabled: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            hours: DEFAULT_HOURS,
            days: DEFAULT_DAYS,
            interval: Duration::from_secs(600),              // 10 minutes
            theme_probe_interval: Duration::from_secs(5),
            enabled: true,
        }
    }
}

/// First-error-wins bookkeeping for one refresh cycle
#[derive(Debug, Clone, Default)]
pub struct RefreshCycle {
    generation: u64,
    pending: Vec<Category>,
    error: Option<DashboardError>,
}

impl RefreshCycle {
    /// Starts a new cycle, clearing the previous error
    pub fn begin(&mut self, generation: u64) {
        self.generation = generation;
        self.pending = Category::ALL.to_vec();
        self.error = None;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Marks a category as finished
    pub fn complete(&mut self, category: Category) {
        self.pending.retain(|c| *c != category);
    }

    /// Records a failure; only the first one in a cycle is kept
    ///
    /// Returns true if `err` became the surfaced error.
    pub fn record_failure(&mut self, err: DashboardError) -> bool {
        if self.error.is_some() {
            debug!(%err, "suppressing later failure in the same cycle");
            return false;
        }
        self.error = Some(err);
        true
    }

    pub fn error(&self) -> Option<&DashboardError> {
        self.error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending(&self) -> &[Category] {
        &self.pending
    }
}

fn to_dashboard<T>(category: Category, result: Result<T, crate::data::WeatherError>) -> Fetched<T> {
    result.map_err(|err| {
        warn!(category = category.label(), %err, "category fetch failed");
        DashboardError::from(err)
    })
}

/// Handle for controlling the background refresh system
pub struct RefreshHandle {
    /// Channel for receiving refresh messages
    pub receiver: mpsc::Receiver<RefreshMessage>,
    sender: mpsc::Sender<RefreshMessage>,
    client: WeatherClient,
    config: RefreshConfig,
    generation: u64,
    shutdown_tx: mpsc::Sender<()>,
}

impl RefreshHandle {
    /// Creates the channel and spawns the periodic tasks
    pub fn spawn(client: WeatherClient, config: RefreshConfig, system_dark: Option<bool>) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(32);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        if config.enabled {
            let refresh_interval = config.interval;
            let probe_interval = config.theme_probe_interval;
            let tx = msg_tx.clone();

            tokio::spawn(async move {
                let mut refresh = tokio::time::interval(refresh_interval);
                let mut probe = tokio::time::interval(probe_interval);
                // Skip the first tick (immediate)
                refresh.tick().await;
                probe.tick().await;
                let mut last_dark = system_dark;

                loop {
                    tokio::select! {
                        _ = refresh.tick() => {
                            if tx.send(RefreshMessage::RefreshDue).await.is_err() {
                                break;
                            }
                        }
                        _ = probe.tick() => {
                            let dark = theme::probe_system_dark().await;
                            if dark.is_some() && dark != last_dark {
                                last_dark = dark;
                                if let Some(dark) = dark {
                                    if tx.send(RefreshMessage::SystemThemeChanged(dark)).await.is_err() {
                                        break;
                                    }
                                }
                            }
                        }
                        _ = shutdown_rx.recv() => {
                            break;
                        }
                    }
                }
            });
        }

        Self {
            receiver: msg_rx,
            sender: msg_tx,
            client,
            config,
            generation: 0,
            shutdown_tx,
        }
    }

    /// Starts a refresh cycle for `location`, returning its generation
    ///
    /// Earlier cycles are not cancelled; their late results still arrive.
    pub fn refresh(&mut self, location: &LocationData) -> u64 {
        self.generation += 1;
        let generation = self.generation;
        info!(generation, lat = location.lat, lng = location.lng, "refresh started");

        let (client, tx, loc) = (self.client.clone(), self.sender.clone(), location.clone());
        tokio::spawn(async move {
            let result = to_dashboard(Category::Current, client.fetch_current(&loc).await);
            let _ = tx.send(RefreshMessage::Current { generation, result }).await;
        });

        let (client, tx, loc) = (self.client.clone(), self.sender.clone(), location.clone());
        let hours = self.config.hours;
        tokio::spawn(async move {
            let result = to_dashboard(
                Category::HourlyForecast,
                client.fetch_hourly_forecast(&loc, hours).await,
            );
            let _ = tx.send(RefreshMessage::HourlyForecast { generation, result }).await;
        });

        let (client, tx, loc) = (self.client.clone(), self.sender.clone(), location.clone());
        let days = self.config.days;
        tokio::spawn(async move {
            let result = to_dashboard(
                Category::DailyForecast,
                client.fetch_daily_forecast(&loc, days).await,
            );
            let _ = tx.send(RefreshMessage::DailyForecast { generation, result }).await;
        });

        let (client, tx, loc) = (self.client.clone(), self.sender.clone(), location.clone());
        tokio::spawn(async move {
            let result = to_dashboard(
                Category::HourlyHistory,
                client.fetch_hourly_history(&loc, hours).await,
            );
            let _ = tx.send(RefreshMessage::HourlyHistory { generation, result }).await;
        });

        generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Shuts down the periodic tasks
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

/// Checks for pending refresh messages without blocking
pub fn try_recv(handle: &mut RefreshHandle) -> Option<RefreshMessage> {
    handle.receiver.try_recv().ok()
}

/// All four categories fetched concurrently, used by one-shot output
#[derive(Debug)]
pub struct FetchResults {
    pub current: Fetched<CurrentConditionsResponse>,
    pub hourly_forecast: Fetched<HourlyForecastResponse>,
    pub daily_forecast: Fetched<DailyForecastResponse>,
    pub hourly_history: Fetched<HourlyHistoryResponse>,
}

/// Fetches every category at once without the channel
pub async fn fetch_all(
    client: &WeatherClient,
    location: &LocationData,
    config: &RefreshConfig,
) -> FetchResults {
    let (current, hourly_forecast, daily_forecast, hourly_history) = futures::join!(
        client.fetch_current(location),
        client.fetch_hourly_forecast(location, config.hours),
        client.fetch_daily_forecast(location, config.days),
        client.fetch_hourly_history(location, config.hours),
    );
    FetchResults {
        current: to_dashboard(Category::Current, current),
        hourly_forecast: to_dashboard(Category::HourlyForecast, hourly_forecast),
        daily_forecast: to_dashboard(Category::DailyForecast, daily_forecast),
        hourly_history: to_dashboard(Category::HourlyHistory, hourly_history),
    }
}
