//! Tri-state theme mode and its resolution to light or dark
//!
//! [`ThemeController`] is the single writer of the persisted mode. The
//! resolved darkness is never stored: it is recomputed from the mode and the
//! latest system preference every time it is asked for.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

use crate::icon::IconContext;
use crate::store::{read_value, write_value, PreferenceStore, THEME_MODE_KEY};

/// User-selected theme mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Follow the system colour scheme
    #[default]
    Auto,
    Light,
    Dark,
}

impl ThemeMode {
    /// Next mode in the auto → light → dark cycle
    pub fn next(self) -> Self {
        match self {
            ThemeMode::Auto => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Auto,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Auto => "auto",
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mode plus the darkness it currently resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeState {
    pub mode: ThemeMode,
    pub resolved_dark: bool,
}

/// Pure resolution of darkness from mode and system preference
pub fn resolve_dark(mode: ThemeMode, system_prefers_dark: bool) -> bool {
    match mode {
        ThemeMode::Dark => true,
        ThemeMode::Light => false,
        ThemeMode::Auto => system_prefers_dark,
    }
}

/// Reads the terminal's colour-scheme hints
///
/// `COLORFGBG` is `fg;bg` (or `fg;x;bg`) with ANSI colour indices. Background
/// 7, 15 and the bright greys 248-255 are light, anything else is dark.
/// `GTK_THEME` values ending in `:dark` mark a dark desktop.
pub fn system_dark_from(colorfgbg: Option<&str>, gtk_theme: Option<&str>) -> Option<bool> {
    if let Some(code) = colorfgbg
        .and_then(|v| v.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u8>().ok())
    {
        return Some(!(code == 7 || code == 15 || (248..=255).contains(&code)));
    }
    gtk_theme.map(|theme| theme.to_lowercase().ends_with(":dark"))
}

/// Probes the environment for a system dark preference
pub fn detect_system_dark() -> Option<bool> {
    let colorfgbg = std::env::var("COLORFGBG").ok();
    let gtk_theme = std::env::var("GTK_THEME").ok();
    system_dark_from(colorfgbg.as_deref(), gtk_theme.as_deref())
}

/// Reads a GNOME `color-scheme` value such as `'prefer-dark'`
///
/// `'default'` says nothing about darkness and yields `None`.
pub fn parse_gnome_color_scheme(output: &str) -> Option<bool> {
    match output.trim().trim_matches('\'') {
        "prefer-dark" => Some(true),
        "prefer-light" => Some(false),
        _ => None,
    }
}

/// Reads `defaults read -g AppleInterfaceStyle`, which fails in light mode
pub fn parse_macos_interface_style(success: bool, output: &str) -> bool {
    success && output.trim().eq_ignore_ascii_case("dark")
}

async fn query_desktop_dark() -> Option<bool> {
    use tokio::process::Command;

    if cfg!(target_os = "macos") {
        let out = Command::new("defaults")
            .args(["read", "-g", "AppleInterfaceStyle"])
            .output()
            .await
            .ok()?;
        return Some(parse_macos_interface_style(
            out.status.success(),
            &String::from_utf8_lossy(&out.stdout),
        ));
    }

    let out = Command::new("gsettings")
        .args(["get", "org.gnome.desktop.interface", "color-scheme"])
        .output()
        .await
        .ok()?;
    if !out.status.success() {
        return None;
    }
    parse_gnome_color_scheme(&String::from_utf8_lossy(&out.stdout))
}

/// Live system preference: desktop setting first, then terminal hints
pub async fn probe_system_dark() -> Option<bool> {
    match query_desktop_dark().await {
        Some(dark) => Some(dark),
        None => detect_system_dark(),
    }
}

/// Owns the theme mode, its persistence, and the live system signal
#[derive(Debug)]
pub struct ThemeController<S: PreferenceStore> {
    store: S,
    mode: ThemeMode,
    system_prefers_dark: bool,
}

impl<S: PreferenceStore> ThemeController<S> {
    /// Restores the persisted mode, defaulting to auto
    pub fn load(store: S, system_prefers_dark: bool) -> Self {
        let mode: ThemeMode = read_value(&store, THEME_MODE_KEY).unwrap_or_default();
        info!(%mode, system_prefers_dark, "theme loaded");
        Self {
            store,
            mode,
            system_prefers_dark,
        }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn state(&self) -> ThemeState {
        ThemeState {
            mode: self.mode,
            resolved_dark: resolve_dark(self.mode, self.system_prefers_dark),
        }
    }

    pub fn is_dark(&self) -> bool {
        self.state().resolved_dark
    }

    /// Signals handed to the icon resolver
    ///
    /// Explicit modes act as a document-level override; auto mode defers to
    /// the system preference.
    pub fn icon_context(&self) -> IconContext {
        match self.mode {
            ThemeMode::Auto => IconContext {
                document_override: None,
                system_prefers_dark: Some(self.system_prefers_dark),
            },
            ThemeMode::Light | ThemeMode::Dark => IconContext {
                document_override: Some(self.mode == ThemeMode::Dark),
                system_prefers_dark: Some(self.system_prefers_dark),
            },
        }
    }

    /// Explicit user selection
    ///
    /// Persists the mode and returns the new state, or `None` when the mode
    /// did not change. A failed write is logged and the selection still
    /// applies for this session.
    pub fn set_mode(&mut self, mode: ThemeMode) -> Option<ThemeState> {
        if mode == self.mode {
            return None;
        }
        self.mode = mode;
        if let Err(err) = write_value(&mut self.store, THEME_MODE_KEY, &mode) {
            warn!(%err, "failed to persist theme mode");
        }
        let state = self.state();
        info!(%mode, resolved_dark = state.resolved_dark, "theme mode selected");
        Some(state)
    }

    /// Advances auto → light → dark → auto
    pub fn cycle_mode(&mut self) -> Option<ThemeState> {
        self.set_mode(self.mode.next())
    }

    /// System colour scheme changed
    ///
    /// Returns the new state only if it changes what is displayed, which can
    /// only happen in auto mode. Nothing is persisted.
    pub fn system_preference_changed(&mut self, prefers_dark: bool) -> Option<ThemeState> {
        if prefers_dark == self.system_prefers_dark {
            return None;
        }
        let before = self.state();
        self.system_prefers_dark = prefers_dark;
        let after = self.state();
        if after == before {
            return None;
        }
        info!(resolved_dark = after.resolved_dark, "system colour scheme changed");
        Some(after)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryPreferenceStore;

    fn controller(mode: Option<ThemeMode>, system_dark: bool) -> ThemeController<MemoryPreferenceStore> {
        let mut store = MemoryPreferenceStore::new();
        if let Some(mode) = mode {
            write_value(&mut store, THEME_MODE_KEY, &mode).unwrap();
        }
        ThemeController::load(store, system_dark)
    }

    #[test]
    fn test_resolve_dark_is_pure() {
        for system in [false, true] {
            assert!(resolve_dark(ThemeMode::Dark, system));
            assert!(!resolve_dark(ThemeMode::Light, system));
            assert_eq!(resolve_dark(ThemeMode::Auto, system), system);
        }
    }

    #[test]
    fn test_load_defaults_to_auto() {
        let theme = controller(None, true);
        assert_eq!(theme.mode(), ThemeMode::Auto);
        assert!(theme.is_dark());
    }

    #[test]
    fn test_load_restores_persisted_mode() {
        let theme = controller(Some(ThemeMode::Light), true);
        assert_eq!(
            theme.state(),
            ThemeState { mode: ThemeMode::Light, resolved_dark: false }
        );
    }

    #[test]
    fn test_set_mode_persists() {
        let mut theme = controller(None, false);
        let state = theme.set_mode(ThemeMode::Dark).expect("mode changed");
        assert!(state.resolved_dark);
        let stored: ThemeMode = read_value(theme.store(), THEME_MODE_KEY).unwrap();
        assert_eq!(stored, ThemeMode::Dark);
        assert!(theme.set_mode(ThemeMode::Dark).is_none());
    }

    #[test]
    fn test_system_change_only_matters_in_auto() {
        let mut theme = controller(None, false);
        let state = theme.system_preference_changed(true).expect("auto follows system");
        assert!(state.resolved_dark);

        theme.set_mode(ThemeMode::Light);
        assert!(theme.system_preference_changed(false).is_none());
        assert!(theme.system_preference_changed(true).is_none());
        assert!(!theme.is_dark());
    }

    #[test]
    fn test_system_change_is_not_persisted() {
        let mut theme = controller(None, false);
        theme.system_preference_changed(true);
        assert!(theme.store().load(THEME_MODE_KEY).is_none());
    }

    #[test]
    fn test_icon_context_override() {
        let mut theme = controller(None, true);
        assert_eq!(theme.icon_context().document_override, None);
        assert!(theme.icon_context().effective_dark(false));

        theme.set_mode(ThemeMode::Light);
        assert_eq!(theme.icon_context().document_override, Some(false));
        assert!(!theme.icon_context().effective_dark(true));
    }

    #[test]
    fn test_cycle_order() {
        let mut theme = controller(None, false);
        assert_eq!(theme.cycle_mode().map(|s| s.mode), Some(ThemeMode::Light));
        assert_eq!(theme.cycle_mode().map(|s| s.mode), Some(ThemeMode::Dark));
        assert_eq!(theme.cycle_mode().map(|s| s.mode), Some(ThemeMode::Auto));
    }

    #[test]
    fn test_mode_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ThemeMode::Dark).unwrap(), "\"dark\"");
        let parsed: ThemeMode = serde_json::from_str("\"auto\"").unwrap();
        assert_eq!(parsed, ThemeMode::Auto);
    }

    #[test]
    fn test_system_dark_from_env_values() {
        assert_eq!(system_dark_from(Some("15;0"), None), Some(true));
        assert_eq!(system_dark_from(Some("0;15"), None), Some(false));
        assert_eq!(system_dark_from(Some("0;default;7"), None), Some(false));
        assert_eq!(system_dark_from(Some("garbage"), Some("Adwaita:dark")), Some(true));
        assert_eq!(system_dark_from(None, Some("Adwaita")), Some(false));
        assert_eq!(system_dark_from(None, None), None);
    }

    #[test]
    fn test_desktop_setting_parsers() {
        assert_eq!(parse_gnome_color_scheme("'prefer-dark'\n"), Some(true));
        assert_eq!(parse_gnome_color_scheme("'prefer-light'"), Some(false));
        assert_eq!(parse_gnome_color_scheme("'default'"), None);
        assert!(parse_macos_interface_style(true, "Dark\n"));
        assert!(!parse_macos_interface_style(false, ""));
    }
}
