mod api;
mod defaults;
mod validation;

use crate::cli::Args;
use crate::error::{Result as ToolcallResult, ToolcallError};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub use api::{ApiConfig, DispatchConfig, ModelConfig, SessionConfig, WeatherConfig};
pub use defaults::{
    API_KEY_ENV, DEFAULT_API_ENDPOINT, DEFAULT_MODEL, DEFAULT_WEATHER_BASE_URL,
};
pub use validation::{expand_with, normalize_endpoint, parse_bool};

use defaults::{default_follow_up, default_max_rounds, default_temperature, default_timeout_secs};

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_endpoint: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub system_prompt: Option<String>,
    pub timeout_secs: u64,
    pub weather_base_url: String,
    pub follow_up: bool,
    pub max_rounds: usize,
    pub verbose: bool,
}

/// On-disk configuration, read from YAML or JSON.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> ToolcallResult<Self> {
        let file_config = match &args.config {
            Some(path) => FileConfig::load_from(path)?,
            None => FileConfig::load()?,
        };

        Self::resolve(args, &file_config, |key| env::var(key).ok())
    }

    /// Merge CLI args > env vars > config file > defaults.
    pub fn resolve(
        args: &Args,
        file_config: &FileConfig,
        env_lookup: impl Fn(&str) -> Option<String>,
    ) -> ToolcallResult<Self> {
        let expand = |value: String| expand_with(&value, &env_lookup);

        // The credential only ever comes from the environment
        let api_key = env_lookup(API_KEY_ENV)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ToolcallError::Configuration(format!(
                    "{} environment variable not set",
                    API_KEY_ENV
                ))
            })?;

        let api_endpoint = args
            .api_endpoint
            .clone()
            .or_else(|| env_lookup("TOOLCALL_API_ENDPOINT"))
            .or_else(|| file_config.api.endpoint.clone())
            .map(expand)
            .map(|endpoint| normalize_endpoint(&endpoint))
            .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string());

        let model = args
            .model
            .clone()
            .or_else(|| env_lookup("TOOLCALL_MODEL"))
            .or_else(|| file_config.model.default_model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let env_temperature = match env_lookup("TOOLCALL_TEMPERATURE") {
            Some(raw) => Some(raw.trim().parse::<f32>().map_err(|_| {
                ToolcallError::Configuration(format!(
                    "TOOLCALL_TEMPERATURE must be a number, got '{}'",
                    raw
                ))
            })?),
            None => None,
        };
        let temperature = args
            .temperature
            .or(env_temperature)
            .or(file_config.model.temperature)
            .unwrap_or_else(default_temperature);
        if !temperature.is_finite() || temperature < 0.0 {
            return Err(ToolcallError::Configuration(format!(
                "temperature must be a non-negative number, got {}",
                temperature
            )));
        }
        let temperature = Some(temperature);

        let system_prompt = env_lookup("TOOLCALL_SYSTEM_PROMPT")
            .or_else(|| file_config.model.system_prompt.clone())
            .map(expand);

        let timeout_secs = match env_lookup("TOOLCALL_TIMEOUT") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                ToolcallError::Configuration(format!(
                    "TOOLCALL_TIMEOUT must be a whole number of seconds, got '{}'",
                    raw
                ))
            })?,
            None => file_config
                .api
                .timeout_secs
                .unwrap_or_else(default_timeout_secs),
        };

        let weather_base_url = args
            .weather_url
            .clone()
            .or_else(|| env_lookup("TOOLCALL_WEATHER_URL"))
            .or_else(|| file_config.weather.base_url.clone())
            .map(expand)
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_WEATHER_BASE_URL.to_string());

        let follow_up = args.follow_up
            || file_config
                .dispatch
                .follow_up
                .unwrap_or_else(default_follow_up);

        let max_rounds = args
            .max_rounds
            .or(file_config.dispatch.max_rounds)
            .unwrap_or_else(default_max_rounds);
        if max_rounds == 0 {
            return Err(ToolcallError::Configuration(
                "max_rounds must be at least 1".to_string(),
            ));
        }

        let verbose = args.verbose
            || env_lookup("TOOLCALL_VERBOSE")
                .and_then(|v| parse_bool(&v))
                .or(file_config.session.verbose)
                .unwrap_or(false);

        Ok(Config {
            api_key,
            api_endpoint,
            model,
            temperature,
            system_prompt,
            timeout_secs,
            weather_base_url,
            follow_up,
            max_rounds,
            verbose,
        })
    }
}

/// Load `.env` from the current directory or its parents. A missing file is
/// not an error; an unreadable or unparseable one is.
pub fn load_dotenv() -> ToolcallResult<()> {
    ignore_missing(dotenvy::dotenv().map(|path| {
        tracing::debug!(path = %path.display(), "loaded .env file");
    }))
}

pub fn load_dotenv_from(path: &Path) -> ToolcallResult<()> {
    ignore_missing(dotenvy::from_path(path))
}

fn ignore_missing(result: std::result::Result<(), dotenvy::Error>) -> ToolcallResult<()> {
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(ToolcallError::Configuration(format!(
            "Failed to load .env file: {}",
            e
        ))),
    }
}

impl FileConfig {
    pub fn load() -> Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        // No config file found, return default
        Ok(FileConfig::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|s| s.to_str());
        let config = if matches!(extension, Some("yaml") | Some("yml")) {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))?
        } else {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))?
        };

        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. Current directory (local override)
        paths.push(PathBuf::from(".toolcall.yaml"));
        paths.push(PathBuf::from(".toolcall.yml"));
        paths.push(PathBuf::from(".toolcall.json"));

        // 2. User's config directory
        if let Some(path) = Self::user_config_path() {
            let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
            paths.push(path);
            paths.push(dir.join("toolcall.yml"));
            paths.push(dir.join("toolcall.json"));
        }

        paths
    }

    pub fn user_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("toolcall").join("toolcall.yaml"))
    }

    /// A fully populated example with the built-in defaults.
    pub fn example() -> Self {
        FileConfig {
            api: ApiConfig {
                endpoint: Some(DEFAULT_API_ENDPOINT.to_string()),
                timeout_secs: Some(default_timeout_secs()),
            },
            model: ModelConfig {
                default_model: Some(DEFAULT_MODEL.to_string()),
                temperature: Some(default_temperature()),
                system_prompt: None,
            },
            weather: WeatherConfig {
                base_url: Some(DEFAULT_WEATHER_BASE_URL.to_string()),
            },
            dispatch: DispatchConfig {
                follow_up: Some(default_follow_up()),
                max_rounds: Some(default_max_rounds()),
            },
            session: SessionConfig {
                verbose: Some(false),
            },
        }
    }

    /// Write the example config to `path`, refusing to overwrite.
    pub fn write_example(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists: {}", path.display());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let yaml = serde_yaml::to_string(&Self::example()).context("Failed to render example config")?;
        fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}
