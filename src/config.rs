// config.rs: startup settings
//
// Sources, later ones win:
// - built-in defaults
// - JSON settings file: --config <path>, env VR_PLAYER_CONFIG, or ./vr_player.json
// - env: VR_PLAYER_LANG, VR_PLAYER_MODE
// - command line flags (see `Cli`)

use crate::error::ConfigError;
use crate::orientation::DisplayMode;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_CONFIG_FILE: &str = "vr_player.json";

/// Command line flags for the player.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "vr_video_player", version)]
#[command(about = "Panoramic / VR video player", long_about = None)]
pub struct Cli {
    /// JSON settings file (defaults to ./vr_player.json when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// UI language code (en, zh-Hans, ja, fr)
    #[arg(long, value_name = "CODE")]
    pub lang: Option<String>,

    /// Display mode: mono, 180 or 360
    #[arg(long, value_name = "MODE", value_parser = DisplayMode::from_str)]
    pub mode: Option<DisplayMode>,

    /// Vertical field of view in degrees, 10 to 150
    #[arg(long, value_name = "DEG", value_parser = parse_finite)]
    pub fov: Option<f32>,

    /// Initial volume, 0.0 to 1.0
    #[arg(long, value_name = "LEVEL", value_parser = parse_finite)]
    pub volume: Option<f32>,

    /// Present without vertical sync
    #[arg(long)]
    pub no_vsync: bool,

    /// Video to open at startup
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

fn parse_finite(value: &str) -> Result<f32, String> {
    match value.trim().parse::<f32>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("`{value}` is not a finite number")),
    }
}

fn parse_env_mode(value: String) -> Result<DisplayMode, ConfigError> {
    match value.parse() {
        Ok(mode) => Ok(mode),
        Err(_) => Err(ConfigError::InvalidValue {
            key: "VR_PLAYER_MODE",
            value,
        }),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub lang: String,
    pub mode: DisplayMode,
    pub fov_y_deg: f32,
    pub vsync: bool,
    pub volume: f32,
    pub file: Option<PathBuf>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            lang: "en".to_string(),
            mode: DisplayMode::Half360,
            fov_y_deg: 75.0,
            vsync: true,
            volume: 1.0,
            file: None,
        }
    }
}

impl PlayerConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Resolve from the process environment and arguments.
    ///
    /// Bad flags print clap's usage message and exit.
    pub fn resolve() -> Result<Self, ConfigError> {
        let env = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self::resolve_from(Cli::parse(), env)
    }

    pub fn resolve_from(
        cli: Cli,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let explicit_file = match &cli.config {
            Some(path) => Some(path.clone()),
            None => env("VR_PLAYER_CONFIG").map(PathBuf::from),
        };

        let mut cfg = match explicit_file {
            Some(path) => Self::from_json_file(&path)?,
            None => {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                if local.exists() {
                    Self::from_json_file(&local)?
                } else {
                    Self::default()
                }
            }
        };

        if let Some(lang) = env("VR_PLAYER_LANG") {
            cfg.lang = lang;
        }
        if let Some(value) = env("VR_PLAYER_MODE") {
            cfg.mode = parse_env_mode(value)?;
        }

        cfg.apply_cli(cli);
        Ok(cfg)
    }

    fn apply_cli(&mut self, cli: Cli) {
        if let Some(lang) = cli.lang {
            self.lang = lang;
        }
        if let Some(mode) = cli.mode {
            self.mode = mode;
        }
        if let Some(fov) = cli.fov {
            self.fov_y_deg = fov.clamp(10.0, 150.0);
        }
        if let Some(volume) = cli.volume {
            self.volume = volume.clamp(0.0, 1.0);
        }
        if cli.no_vsync {
            self.vsync = false;
        }
        if cli.file.is_some() {
            self.file = cli.file;
        }
    }
}
