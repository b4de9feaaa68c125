use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::constants::{SCROLL_SPEED_MAX, SCROLL_SPEED_MIN};
use crate::display::{DisplayMode, ScrollStyle};

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// General options
    pub log_level: Option<String>, // e.g., "info" | "debug"
    /// Panel content and behavior
    pub panel: Option<PanelConfig>,
    /// Emulator window options
    pub emulator: Option<EmulatorConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PanelConfig {
    /// Text shown at startup (text mode)
    pub text: Option<String>,
    /// Lit-dot color as [r, g, b]
    pub pixel_color: Option<[u8; 3]>,
    /// Unlit-dot color as [r, g, b]
    pub background_color: Option<[u8; 3]>,
    pub mode: Option<ModeKind>,
    pub scroll: Option<ScrollKind>,
    /// Scroll speed level 1..=5
    pub speed: Option<u8>,
    /// Paint the idle grid of unlit dots
    pub idle_grid: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EmulatorConfig {
    /// Window pixels per logical surface pixel
    pub scale: Option<u32>,
    /// Logical surface width
    pub width: Option<u32>,
    /// Logical surface height
    pub height: Option<u32>,
}

/// Strongly-typed display mode selection for YAML/CLI.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
    Text,
    Clock,
}

impl From<ModeKind> for DisplayMode {
    fn from(kind: ModeKind) -> Self {
        match kind {
            ModeKind::Text => DisplayMode::Text,
            ModeKind::Clock => DisplayMode::Clock,
        }
    }
}

/// Scroll selection: off, or one of the two styles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScrollKind {
    Off,
    Wrap,
    Bounce,
}

impl ScrollKind {
    /// Split into the panel's (enabled, style) pair.
    pub fn to_panel(self) -> (bool, ScrollStyle) {
        match self {
            ScrollKind::Off => (false, ScrollStyle::Wrap),
            ScrollKind::Wrap => (true, ScrollStyle::Wrap),
            ScrollKind::Bounce => (true, ScrollStyle::Bounce),
        }
    }
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone)]
#[command(name = "Matryx", about = "Matryx dot-matrix panel emulator", disable_help_flag = false)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    /// Startup text for the panel
    #[arg(long)]
    pub text: Option<String>,
    #[arg(long, value_enum)]
    pub mode: Option<ModeKind>,
    #[arg(long, value_enum)]
    pub scroll: Option<ScrollKind>,
    /// Scroll speed level 1..=5
    #[arg(long)]
    pub speed: Option<u8>,
    /// Disable the idle grid of unlit dots
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_idle_grid: bool,
    /// Emulator window scale factor
    #[arg(long)]
    pub scale: Option<u32>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<Config, ConfigError> {
    load_from(Cli::parse())
}

/// Same as [`load`], but with pre-parsed CLI args (testable).
pub fn load_from(cli: Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, &cli);

    // 4) Validate
    validate(&cfg)?;

    if cli.dump_config {
        // Pretty YAML of effective config (nice for debugging)
        let s = serde_yaml::to_string(&cfg)?;
        println!("{s}");
        std::process::exit(0);
    }

    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/matryx/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/matryx/config.yaml");
        if p.exists() {
            return Some(p);
        }
        let p = home.join(".config/matryx.yaml");
        if p.exists() {
            return Some(p);
        }
    }
    // project local
    for candidate in &["matryx.yaml", "config.yaml", "config/matryx.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() {
            return Some(p);
        }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    // top-level
    if src.log_level.is_some() {
        dst.log_level = src.log_level;
    }
    // panel
    match (&mut dst.panel, src.panel) {
        (None, Some(c)) => dst.panel = Some(c),
        (Some(d), Some(s)) => merge_panel(d, s),
        _ => {}
    }
    // emulator
    match (&mut dst.emulator, src.emulator) {
        (None, Some(c)) => dst.emulator = Some(c),
        (Some(d), Some(s)) => merge_emulator(d, s),
        _ => {}
    }
}

fn merge_panel(dst: &mut PanelConfig, src: PanelConfig) {
    if src.text.is_some() {
        dst.text = src.text;
    }
    if src.pixel_color.is_some() {
        dst.pixel_color = src.pixel_color;
    }
    if src.background_color.is_some() {
        dst.background_color = src.background_color;
    }
    if src.mode.is_some() {
        dst.mode = src.mode;
    }
    if src.scroll.is_some() {
        dst.scroll = src.scroll;
    }
    if src.speed.is_some() {
        dst.speed = src.speed;
    }
    if src.idle_grid.is_some() {
        dst.idle_grid = src.idle_grid;
    }
}

fn merge_emulator(dst: &mut EmulatorConfig, src: EmulatorConfig) {
    if src.scale.is_some() {
        dst.scale = src.scale;
    }
    if src.width.is_some() {
        dst.width = src.width;
    }
    if src.height.is_some() {
        dst.height = src.height;
    }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some() {
        cfg.log_level = cli.log_level.clone();
    }
    let panel = cfg.panel.get_or_insert_with(PanelConfig::default);
    if cli.text.is_some() {
        panel.text = cli.text.clone();
    }
    if cli.mode.is_some() {
        panel.mode = cli.mode;
    }
    if cli.scroll.is_some() {
        panel.scroll = cli.scroll;
    }
    if cli.speed.is_some() {
        panel.speed = cli.speed;
    }
    if cli.no_idle_grid {
        panel.idle_grid = Some(false);
    }
    if cli.scale.is_some() {
        let emulator = cfg.emulator.get_or_insert_with(EmulatorConfig::default);
        emulator.scale = cli.scale;
    }
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(panel) = &cfg.panel {
        if let Some(speed) = panel.speed {
            if !(SCROLL_SPEED_MIN..=SCROLL_SPEED_MAX).contains(&speed) {
                return Err(ConfigError::Validation(format!(
                    "scroll speed {} outside {}..={}",
                    speed, SCROLL_SPEED_MIN, SCROLL_SPEED_MAX
                )));
            }
        }
    }
    if let Some(emulator) = &cfg.emulator {
        if emulator.scale == Some(0) {
            return Err(ConfigError::Validation("emulator scale must be >= 1".into()));
        }
        if emulator.width == Some(0) || emulator.height == Some(0) {
            return Err(ConfigError::Validation(
                "emulator surface dimensions must be >= 1".into(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_precedence() {
        let mut dst = Config {
            log_level: Some("info".into()),
            panel: Some(PanelConfig {
                text: Some("HELLO".into()),
                speed: Some(2),
                ..Default::default()
            }),
            emulator: None,
        };
        let src = Config {
            log_level: Some("debug".into()),
            panel: Some(PanelConfig {
                speed: Some(4),
                ..Default::default()
            }),
            emulator: Some(EmulatorConfig {
                scale: Some(6),
                ..Default::default()
            }),
        };
        merge(&mut dst, src);
        assert_eq!(dst.log_level.as_deref(), Some("debug"));
        let panel = dst.panel.unwrap();
        assert_eq!(panel.text.as_deref(), Some("HELLO")); // untouched
        assert_eq!(panel.speed, Some(4)); // overridden
        assert_eq!(dst.emulator.unwrap().scale, Some(6));
    }

    #[test]
    fn test_validate_speed_range() {
        let cfg = Config {
            panel: Some(PanelConfig {
                speed: Some(9),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(matches!(validate(&cfg), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_yaml_round_trip() {
        let yaml = "panel:\n  text: matrix\n  scroll: bounce\n  pixel_color: [0, 255, 0]\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        let panel = cfg.panel.unwrap();
        assert_eq!(panel.text.as_deref(), Some("matrix"));
        assert_eq!(panel.scroll, Some(ScrollKind::Bounce));
        assert_eq!(panel.pixel_color, Some([0, 255, 0]));
    }

    #[test]
    fn test_scroll_kind_mapping() {
        assert_eq!(ScrollKind::Off.to_panel(), (false, ScrollStyle::Wrap));
        assert_eq!(ScrollKind::Wrap.to_panel(), (true, ScrollStyle::Wrap));
        assert_eq!(ScrollKind::Bounce.to_panel(), (true, ScrollStyle::Bounce));
    }
}
