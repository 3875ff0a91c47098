// orientation.rs: display mode and the look-around angles

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the source frames are laid out, and therefore what they get projected onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Flat video on a framed rectangle.
    Mono,
    /// Front hemisphere only.
    #[default]
    #[serde(rename = "180")]
    Half360,
    /// Full equirectangular surround.
    #[serde(rename = "360")]
    Full360,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 3] = [
        DisplayMode::Mono,
        DisplayMode::Half360,
        DisplayMode::Full360,
    ];

    /// Largest |latitude| the viewer may look up or down, in degrees.
    pub fn latitude_limit(self) -> f32 {
        match self {
            DisplayMode::Mono => 20.0,
            DisplayMode::Half360 | DisplayMode::Full360 => 85.0,
        }
    }

    /// Short tag used on buttons, CLI flags and config files.
    pub fn tag(self) -> &'static str {
        match self {
            DisplayMode::Mono => "mono",
            DisplayMode::Half360 => "180",
            DisplayMode::Full360 => "360",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModeError(pub String);

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown display mode `{}` (mono, 180, 360)", self.0)
    }
}

impl std::error::Error for ParseModeError {}

impl FromStr for DisplayMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mono" | "flat" => Ok(DisplayMode::Mono),
            "180" | "half" | "half360" => Ok(DisplayMode::Half360),
            "360" | "full" | "full360" => Ok(DisplayMode::Full360),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

/// Viewer look angles in degrees.
///
/// Longitude is left unbounded: every consumer goes through sin/cos, so it wraps
/// on its own.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    pub latitude_deg: f32,
    pub longitude_deg: f32,
}

impl Orientation {
    pub fn new(latitude_deg: f32, longitude_deg: f32) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
        }
    }

    /// Add the deltas, then clamp latitude to the mode's bound.
    pub fn adjust(&mut self, delta_lon_deg: f32, delta_lat_deg: f32, mode: DisplayMode) {
        let limit = mode.latitude_limit();
        self.longitude_deg += delta_lon_deg;
        self.latitude_deg = (self.latitude_deg + delta_lat_deg).clamp(-limit, limit);
    }

    pub fn reset(&mut self) {
        self.latitude_deg = 0.0;
        self.longitude_deg = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latitude_is_clamped_per_mode() {
        let mut o = Orientation::default();
        o.adjust(0.0, 500.0, DisplayMode::Mono);
        assert_eq!(o.latitude_deg, 20.0);
        o.adjust(0.0, -500.0, DisplayMode::Mono);
        assert_eq!(o.latitude_deg, -20.0);

        let mut o = Orientation::default();
        o.adjust(0.0, 500.0, DisplayMode::Half360);
        assert_eq!(o.latitude_deg, 85.0);
        o.adjust(0.0, -500.0, DisplayMode::Full360);
        assert_eq!(o.latitude_deg, -85.0);
    }

    #[test]
    fn longitude_is_not_wrapped() {
        let mut o = Orientation::default();
        for _ in 0..10 {
            o.adjust(100.0, 0.0, DisplayMode::Full360);
        }
        assert_eq!(o.longitude_deg, 1000.0);
    }

    #[test]
    fn full360_large_negative_latitude() {
        let mut o = Orientation::default();
        o.adjust(100.0, -1000.0, DisplayMode::Full360);
        assert_eq!(o.longitude_deg, 100.0);
        assert_eq!(o.latitude_deg, -85.0);
    }

    #[test]
    fn reset_zeroes_both_angles() {
        let mut o = Orientation::new(12.0, -370.0);
        o.reset();
        assert_eq!(o, Orientation::default());
    }

    #[test]
    fn mode_parses_from_tags() {
        assert_eq!("mono".parse::<DisplayMode>(), Ok(DisplayMode::Mono));
        assert_eq!(" 180 ".parse::<DisplayMode>(), Ok(DisplayMode::Half360));
        assert_eq!("FULL".parse::<DisplayMode>(), Ok(DisplayMode::Full360));
        assert!("stereo".parse::<DisplayMode>().is_err());
        for mode in DisplayMode::ALL {
            assert_eq!(mode.tag().parse::<DisplayMode>(), Ok(mode));
        }
        assert_eq!(DisplayMode::default(), DisplayMode::Half360);
    }
}
