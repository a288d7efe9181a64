//! Table configuration resolved from defaults, an optional TOML file and
//! `HOLDEM_*` environment variables, in that order of precedence.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use holdem_engine::lifecycle::{MAX_SEATS, MIN_SEATS};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub seats: usize,
    pub small_blind: u32,
    pub big_blind: u32,
    pub starting_stack: u32,
    pub seed: Option<u64>,
    /// Delay before an all-in runout deals the next street.
    pub auto_advance_ms: u64,
    pub history_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seats: 6,
            small_blind: 20,
            big_blind: 40,
            starting_stack: 10_000,
            seed: None,
            auto_advance_ms: 1_500,
            history_path: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
    Flag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigSources {
    pub seats: ValueSource,
    pub small_blind: ValueSource,
    pub big_blind: ValueSource,
    pub starting_stack: ValueSource,
    pub seed: ValueSource,
    pub auto_advance_ms: ValueSource,
    pub history_path: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seats: ValueSource::Default,
            small_blind: ValueSource::Default,
            big_blind: ValueSource::Default,
            starting_stack: ValueSource::Default,
            seed: ValueSource::Default,
            auto_advance_ms: ValueSource::Default,
            history_path: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

/// Command-line values that override the resolved configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub seats: Option<usize>,
    pub starting_stack: Option<u32>,
    pub seed: Option<u64>,
    pub auto_advance_ms: Option<u64>,
    pub history_path: Option<PathBuf>,
}

impl ConfigResolved {
    /// Applies command-line flags on top of the file and environment, then
    /// validates the result again.
    pub fn with_overrides(mut self, flags: ConfigOverrides) -> Result<Self, ConfigError> {
        if let Some(v) = flags.seats {
            self.config.seats = v;
            self.sources.seats = ValueSource::Flag;
        }
        if let Some(v) = flags.starting_stack {
            self.config.starting_stack = v;
            self.sources.starting_stack = ValueSource::Flag;
        }
        if let Some(v) = flags.seed {
            self.config.seed = Some(v);
            self.sources.seed = ValueSource::Flag;
        }
        if let Some(v) = flags.auto_advance_ms {
            self.config.auto_advance_ms = v;
            self.sources.auto_advance_ms = ValueSource::Flag;
        }
        if let Some(v) = flags.history_path {
            self.config.history_path = Some(v);
            self.sources.history_path = ValueSource::Flag;
        }
        validate(&self.config)?;
        Ok(self)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("HOLDEM_CONFIG")
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.seats {
            cfg.seats = v;
            sources.seats = ValueSource::File;
        }
        if let Some(v) = f.small_blind {
            cfg.small_blind = v;
            sources.small_blind = ValueSource::File;
        }
        if let Some(v) = f.big_blind {
            cfg.big_blind = v;
            sources.big_blind = ValueSource::File;
        }
        if let Some(v) = f.starting_stack {
            cfg.starting_stack = v;
            sources.starting_stack = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.auto_advance_ms {
            cfg.auto_advance_ms = v;
            sources.auto_advance_ms = ValueSource::File;
        }
        if let Some(v) = f.history_path {
            cfg.history_path = Some(v);
            sources.history_path = ValueSource::File;
        }
    }

    if let Some(v) = env_value("HOLDEM_SEATS")? {
        cfg.seats = v;
        sources.seats = ValueSource::Env;
    }
    if let Some(v) = env_value("HOLDEM_SMALL_BLIND")? {
        cfg.small_blind = v;
        sources.small_blind = ValueSource::Env;
    }
    if let Some(v) = env_value("HOLDEM_BIG_BLIND")? {
        cfg.big_blind = v;
        sources.big_blind = ValueSource::Env;
    }
    if let Some(v) = env_value("HOLDEM_STACK")? {
        cfg.starting_stack = v;
        sources.starting_stack = ValueSource::Env;
    }
    if let Some(v) = env_value("HOLDEM_SEED")? {
        cfg.seed = Some(v);
        sources.seed = ValueSource::Env;
    }
    if let Some(v) = env_value("HOLDEM_AUTO_ADVANCE_MS")? {
        cfg.auto_advance_ms = v;
        sources.auto_advance_ms = ValueSource::Env;
    }
    if let Ok(path) = std::env::var("HOLDEM_HISTORY")
        && !path.is_empty()
    {
        cfg.history_path = Some(PathBuf::from(path));
        sources.history_path = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

fn env_value<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(raw) if !raw.is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("Invalid {}: {}", key, raw))),
        _ => Ok(None),
    }
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    seats: Option<usize>,
    #[serde(default)]
    small_blind: Option<u32>,
    #[serde(default)]
    big_blind: Option<u32>,
    #[serde(default)]
    starting_stack: Option<u32>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    auto_advance_ms: Option<u64>,
    #[serde(default)]
    history_path: Option<PathBuf>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if !(MIN_SEATS..=MAX_SEATS).contains(&cfg.seats) {
        return Err(ConfigError::Invalid(format!(
            "seats must be between {} and {}",
            MIN_SEATS, MAX_SEATS
        )));
    }
    if cfg.small_blind == 0 {
        return Err(ConfigError::Invalid(
            "small_blind must be >0".into(),
        ));
    }
    if cfg.big_blind < cfg.small_blind {
        return Err(ConfigError::Invalid(
            "big_blind must be >= small_blind".into(),
        ));
    }
    if cfg.starting_stack < cfg.big_blind {
        return Err(ConfigError::Invalid(
            "starting_stack must cover the big blind".into(),
        ));
    }
    if u32::try_from(cfg.seats)
        .ok()
        .and_then(|n| n.checked_mul(cfg.starting_stack))
        .is_none()
    {
        return Err(ConfigError::Invalid(format!(
            "starting_stack {} is too large for {} seats",
            cfg.starting_stack, cfg.seats
        )));
    }
    Ok(())
}
