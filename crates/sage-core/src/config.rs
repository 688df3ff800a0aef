//! Configuration for providers, data locations, summarization and logging.

use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use toml::{from_str, to_string_pretty};

use crate::{Error, Result};

/// Env var key for the Groq API key.
pub const ENV_GROQ_API_KEY: &str = "GROQ_API_KEY";

/// Complete configuration.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SageConfig {
    /// Completion service settings
    pub provider: ProviderConfig,
    /// Dataset and document locations
    pub data: DataConfig,
    /// Summarization bounds
    pub summarization: SummarizationConfig,
    /// Vectorizer settings
    pub features: FeatureConfig,
    /// Log output settings
    pub logging: LoggingConfig,
}

/// Completion service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Model name passed to the completion API
    pub model: String,
    /// Sampling temperature for every request
    pub temperature: f32,
    /// Maximum completion length in tokens
    pub max_tokens: usize,
    /// Groq API key; the `GROQ_API_KEY` environment variable is used when absent
    pub groq_api_key: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: "llama-3.1-8b-instant".to_owned(),
            temperature: 0.0,
            max_tokens: 2048,
            groq_api_key: None,
        }
    }
}

/// Dataset and document locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Folder of PDF or text documents for summarization mode
    pub documents_dir: PathBuf,
    /// Category-per-subfolder corpus for classification mode
    pub corpus_dir: PathBuf,
    /// Upper bound on samples read from the corpus
    pub max_samples: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            documents_dir: PathBuf::from("data/documents"),
            corpus_dir: PathBuf::from("data/20news-bydate-train"),
            max_samples: 500,
        }
    }
}

/// Bounds on how much text is sent for summarization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizationConfig {
    /// Maximum number of documents summarized per run
    pub max_documents: usize,
    /// Maximum number of chunks summarized per document
    pub max_chunks: usize,
    /// Chunk length in characters
    pub chunk_chars: usize,
}

impl Default for SummarizationConfig {
    fn default() -> Self {
        Self {
            max_documents: 3,
            max_chunks: 3,
            chunk_chars: 2000,
        }
    }
}

/// Vectorizer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Vocabulary cap
    pub max_features: usize,
    /// Drop common English stop words
    pub stop_words: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            max_features: 5000,
            stop_words: true,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Diagnostic log file, appended to on every run
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("logs/agent.log"),
        }
    }
}

impl SageConfig {
    /// Get the default config directory path (`~/.sage`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn config_dir() -> Result<PathBuf> {
        let home = home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_owned()))?;
        Ok(home.join(".sage"))
    }

    /// Get the default config file path (`~/.sage/config.toml`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from `path` if given, else from the default location.
    ///
    /// The default location goes through [`Self::load_or_create`], so a
    /// missing or broken file there never stops a run. The second element is
    /// the problem that was worked around, if any, for the caller to report.
    ///
    /// # Errors
    /// Returns an error if an explicit path cannot be read or parsed, or the
    /// home directory cannot be determined
    pub fn load(path: Option<&Path>) -> Result<(Self, Option<Error>)> {
        if let Some(explicit) = path {
            return Ok((Self::load_from_file(explicit)?, None));
        }

        Ok(Self::load_or_create(&Self::config_path()?))
    }

    /// Load config from `path`, or write the defaults there if it does not exist.
    ///
    /// An unreadable or malformed file is replaced by the defaults in memory
    /// and left untouched on disk. Either way the defaults come back together
    /// with the error that caused the fallback.
    pub fn load_or_create(path: &Path) -> (Self, Option<Error>) {
        if path.exists() {
            return match Self::load_from_file(path) {
                Ok(config) => (config, None),
                Err(error) => (Self::default(), Some(error)),
            };
        }

        let config = Self::default();
        match config.save_to_file(path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Created default config");
                (config, None)
            }
            Err(error) => (config, Some(error)),
        }
    }

    /// Load config from a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|error| Error::Config(format!("Failed to read {}: {error}", path.display())))?;
        let config: Self = from_str(&contents)?;

        tracing::debug!(
            "Loaded config from {:?}: model={}, groq_api_key={}",
            path,
            config.provider.model,
            if config.provider.groq_api_key.is_some() {
                "present"
            } else {
                "missing"
            }
        );

        Ok(config)
    }

    /// Save config to a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = to_string_pretty(self)
            .map_err(|error| Error::Config(format!("Failed to serialize config: {error}")))?;

        fs::write(path, format!("# Sage configuration\n\n{contents}"))?;
        Ok(())
    }

    /// Resolves the Groq API key, checking config first, then the environment.
    ///
    /// # Errors
    /// Returns [`Error::MissingApiKey`] if neither source provides a non-empty key
    pub fn groq_api_key(&self) -> Result<String> {
        self.resolve_groq_key(env::var(ENV_GROQ_API_KEY).ok())
    }

    fn resolve_groq_key(&self, env_key: Option<String>) -> Result<String> {
        let non_blank = |key: &String| !key.trim().is_empty();
        self.provider
            .groq_api_key
            .clone()
            .filter(non_blank)
            .or_else(|| env_key.filter(non_blank))
            .ok_or_else(|| Error::MissingApiKey(ENV_GROQ_API_KEY.to_owned()))
    }
}
