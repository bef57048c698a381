//! Light and dark colour palettes

use ratatui::style::{Color, Modifier, Style};

use crate::data::CanonicalType;
use crate::error::Severity;

/// Colours applied to the whole dashboard for one resolved theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub border: Color,
    pub highlight_bg: Color,
    pub error: Color,
    pub warning: Color,
    pub info: Color,
}

impl Palette {
    pub const LIGHT: Palette = Palette {
        background: Color::Rgb(0xFF, 0xFF, 0xFF),
        text: Color::Rgb(0x20, 0x21, 0x24),
        muted: Color::Rgb(0x5F, 0x63, 0x68),
        accent: Color::Rgb(0x1A, 0x73, 0xE8),
        border: Color::Rgb(0xDA, 0xDC, 0xE0),
        highlight_bg: Color::Rgb(0xE8, 0xF0, 0xFE),
        error: Color::Rgb(0xC5, 0x22, 0x1F),
        warning: Color::Rgb(0xE3, 0x74, 0x00),
        info: Color::Rgb(0x19, 0x67, 0xD2),
    };

    pub const DARK: Palette = Palette {
        background: Color::Rgb(0x20, 0x21, 0x24),
        text: Color::Rgb(0xE8, 0xEA, 0xED),
        muted: Color::Rgb(0x9A, 0xA0, 0xA6),
        accent: Color::Rgb(0x8A, 0xB4, 0xF8),
        border: Color::Rgb(0x5F, 0x63, 0x68),
        highlight_bg: Color::Rgb(0x22, 0x2E, 0x43),
        error: Color::Rgb(0xF2, 0xB8, 0xB5),
        warning: Color::Rgb(0xFD, 0xD6, 0x63),
        info: Color::Rgb(0x8A, 0xB4, 0xF8),
    };

    pub fn for_theme(is_dark: bool) -> Self {
        if is_dark {
            Self::DARK
        } else {
            Self::LIGHT
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn title(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn highlighted(&self) -> Style {
        Style::default()
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn severity(&self, severity: Severity) -> Color {
        match severity {
            Severity::Error => self.error,
            Severity::Warning => self.warning,
            Severity::Info => self.info,
        }
    }

    /// Accent colour of a weather type
    pub fn weather(&self, kind: CanonicalType) -> Color {
        let (r, g, b) = kind.accent_rgb();
        Color::Rgb(r, g, b)
    }
}

/// Single-cell glyph for a weather type
pub fn glyph(kind: CanonicalType) -> &'static str {
    use CanonicalType::*;
    match kind {
        Clear | MostlyClear => "☀",
        PartlyCloudy | MostlyCloudy => "⛅",
        Cloudy => "☁",
        Windy | WindAndRain => "≋",
        Thunderstorm | Thundershower | LightThunderstormRain | ScatteredThunderstorms
        | HeavyThunderstorm => "ϟ",
        Hail | HailShowers => "◆",
        Sleet | FreezingRain | RainAndSnow => "✱",
        LightSnowShowers | ChanceOfSnowShowers | ScatteredSnowShowers | SnowShowers
        | HeavySnowShowers | LightToModerateSnow | ModerateToHeavySnow | Snow | LightSnow
        | HeavySnow | Snowstorm | SnowPeriodicallyHeavy | HeavySnowStorm | BlowingSnow => "❄",
        LightRainShowers | ChanceOfShowers | ScatteredShowers | RainShowers | HeavyRainShowers
        | LightToModerateRain | ModerateToHeavyRain | Rain | LightRain | HeavyRain
        | RainPeriodicallyHeavy => "☂",
        TypeUnspecified => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palettes_differ() {
        assert_ne!(Palette::for_theme(true), Palette::for_theme(false));
        assert_eq!(Palette::for_theme(true), Palette::DARK);
    }

    #[test]
    fn test_every_type_has_a_glyph() {
        for kind in CanonicalType::ALL {
            assert!(!glyph(kind).is_empty());
        }
        assert_eq!(glyph(CanonicalType::LightRain), "☂");
    }
}
