//! weatherdash - terminal weather dashboard
//!
//! Shows current conditions, an hourly forecast, a daily forecast and the past
//! 24 hours for one location, with a temperature chart and card strip that
//! highlight the same hour.

use std::io;
use std::panic;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tracing::{debug, info, warn};

use weatherdash::app::App;
use weatherdash::cli::{Cli, StartupConfig};
use weatherdash::data::{GeocodeClient, LocationData, WeatherClient};
use weatherdash::refresh::{self, fetch_all, RefreshConfig, RefreshHandle, RefreshMessage};
use weatherdash::store::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
use weatherdash::{logging, theme, ui};

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Preferences on disk, or in memory when there is no home directory
fn open_store() -> Box<dyn PreferenceStore> {
    match FilePreferenceStore::new() {
        Some(store) => {
            debug!(dir = %store.dir().display(), "preference store opened");
            Box::new(store)
        }
        None => {
            warn!("no config directory, preferences will not persist");
            Box::new(MemoryPreferenceStore::new())
        }
    }
}

/// Fills in a display address for bare coordinates
async fn label_location(geocoder: &GeocodeClient, location: &mut LocationData) {
    if location.address.is_some() || location.name.is_some() {
        return;
    }
    match geocoder.reverse(location.lat, location.lng).await {
        Ok(address) => location.address = Some(address),
        Err(err) => debug!(%err, "reverse geocoding failed, showing coordinates"),
    }
}

/// Fetches once and prints the aggregated snapshot as JSON
async fn dump(
    mut app: App,
    client: &WeatherClient,
    refresh_config: &RefreshConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    app.begin_refresh(1);
    let results = fetch_all(client, &app.location, refresh_config).await;
    app.apply(RefreshMessage::Current { generation: 1, result: results.current });
    app.apply(RefreshMessage::HourlyForecast { generation: 1, result: results.hourly_forecast });
    app.apply(RefreshMessage::DailyForecast { generation: 1, result: results.daily_forecast });
    app.apply(RefreshMessage::HourlyHistory { generation: 1, result: results.hourly_history });

    if let Some(err) = app.error() {
        eprintln!("{}: {}", err.title(), err.message());
    }
    println!("{}", serde_json::to_string_pretty(&app.snapshot)?);
    Ok(())
}

async fn run_tui(
    mut app: App,
    client: WeatherClient,
    geocoder: GeocodeClient,
    refresh_config: RefreshConfig,
    system_dark: Option<bool>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    app.set_area(Rect::new(0, 0, size.width, size.height));

    let mut handle = RefreshHandle::spawn(client, refresh_config, system_dark);
    if app.pending_address.is_none() {
        app.refresh_requested = true;
    }

    // Main event loop
    loop {
        terminal.draw(|f| ui::render(f, &app))?;

        // Poll for input with a short timeout so scrolling animates
        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                Event::Resize(width, height) => app.set_area(Rect::new(0, 0, width, height)),
                _ => {}
            }
        }

        while let Some(message) = refresh::try_recv(&mut handle) {
            app.apply(message);
        }

        if let Some(address) = app.pending_address.take() {
            info!(%address, "geocoding address");
            match geocoder.geocode(&address).await {
                Ok(location) => app.set_location(location),
                Err(err) => {
                    warn!(%err, %address, "geocoding failed");
                    app.report_error(err.into());
                }
            }
        }

        if app.refresh_requested {
            let generation = handle.refresh(&app.location);
            app.begin_refresh(generation);
        }

        app.tick();

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    handle.shutdown().await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let log_path = logging::init_logging(cli.log_file.clone());

    let store = open_store();
    let config = match StartupConfig::from_cli(&cli, store.as_ref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(2);
        }
    };
    info!(
        log = ?log_path,
        location = %config.location.display_name(),
        address = ?config.address,
        "starting weatherdash"
    );

    let client = WeatherClient::new(config.api_key.clone()).with_language(config.language.clone());
    let geocoder = GeocodeClient::new(config.api_key.clone());
    let refresh_config = RefreshConfig {
        hours: config.hours,
        days: config.days,
        enabled: !config.dump,
        ..RefreshConfig::default()
    };

    let system_dark = theme::probe_system_dark().await;
    let mut location = config.location.clone();
    if config.address.is_none() {
        label_location(&geocoder, &mut location).await;
    }

    let mut app = App::new(location, store, system_dark.unwrap_or(false));
    if let Some(mode) = config.theme {
        app.set_theme_mode(mode);
    }

    if config.dump {
        if let Some(address) = config.address.as_deref() {
            match geocoder.geocode(address).await {
                Ok(location) => app.location = location,
                Err(err) => {
                    eprintln!("Error: {err}");
                    std::process::exit(1);
                }
            }
        }
        return dump(app, &client, &refresh_config).await;
    }

    app.pending_address = config.address.clone();
    run_tui(app, client, geocoder, refresh_config, system_dark).await
}
