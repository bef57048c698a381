//! Theme-aware weather icon addresses
//!
//! Upstream hands out an icon base URI such as
//! `https://maps.gstatic.com/weather/v1/sunny`; the displayed icon is that
//! base plus an optional `_dark` suffix plus `.svg`. Resolution always strips
//! both markers first, so feeding an already resolved URI back in is safe.

/// Suffix marking the dark-theme variant of an icon
pub const DARK_SUFFIX: &str = "_dark";

/// File extension of every icon
pub const ICON_EXTENSION: &str = ".svg";

/// Theme signals consulted when resolving an icon, strongest first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IconContext {
    /// Explicit light/dark theme applied to the whole display, if any
    pub document_override: Option<bool>,
    /// Live system colour-scheme preference, if known
    pub system_prefers_dark: Option<bool>,
}

impl IconContext {
    /// Effective darkness: override, then system preference, then the request
    pub fn effective_dark(&self, is_dark_requested: bool) -> bool {
        self.document_override
            .or(self.system_prefers_dark)
            .unwrap_or(is_dark_requested)
    }
}

/// Strips trailing extension and dark markers, leaving the icon base URI
///
/// Markers are removed until neither remains at the end, so stacked inputs
/// like `sunny_dark_dark.svg` collapse to the same base as `sunny.svg`.
pub fn base_uri(uri: &str) -> &str {
    let mut base = uri;
    while let Some(rest) = base
        .strip_suffix(ICON_EXTENSION)
        .or_else(|| base.strip_suffix(DARK_SUFFIX))
    {
        base = rest;
    }
    base
}

/// Builds the themed icon URI for `uri`
///
/// Idempotent for a fixed context and flag. Inputs lacking either marker are
/// accepted as they are.
pub fn resolve(uri: &str, is_dark_requested: bool, ctx: &IconContext) -> String {
    let base = base_uri(uri);
    let suffix = if ctx.effective_dark(is_dark_requested) {
        DARK_SUFFIX
    } else {
        ""
    };
    format!("{base}{suffix}{ICON_EXTENSION}")
}
