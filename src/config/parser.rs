use crate::config::types::{Config, Target, Viewport};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use visreg::config::load_config;
///
/// let config = load_config(Path::new("config/visreg.toml")).unwrap();
/// println!("Max depth: {}", config.crawler.max_depth);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let config: Config = toml::from_str(&content)?;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

/// Loads a configuration file, falling back to defaults when it does not exist
///
/// A file that exists but cannot be parsed or validated is still an error.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        Ok(Config::default())
    }
}

/// Writes a configuration to disk as TOML, creating parent directories
pub fn save_config(path: &Path, config: &Config) -> Result<(), ConfigError> {
    validate(config)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;

    tracing::info!("Configuration saved to {}", path.display());
    Ok(())
}

/// Builds the sample configuration written by `visreg init`
pub fn sample_config() -> Config {
    let mut config = Config::default();
    config.targets = vec![
        Target {
            name: "homepage".to_string(),
            url: "/".to_string(),
            selector: "body".to_string(),
            viewport: Viewport::default(),
        },
        Target {
            name: "header".to_string(),
            url: "/".to_string(),
            selector: "header".to_string(),
            viewport: Viewport {
                width: 1200,
                height: 200,
            },
        },
        Target {
            name: "mobile-homepage".to_string(),
            url: "/".to_string(),
            selector: "body".to_string(),
            viewport: Viewport {
                width: 375,
                height: 667,
            },
        },
    ];
    config
}

/// Computes a SHA-256 hash of the configuration file content
///
/// This is used to tell configuration revisions apart in the logs.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}
