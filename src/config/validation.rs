use crate::config::types::{Config, CrawlerConfig, Target, Viewport};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_base_url(&config.base_url)?;
    validate_crawler_config(&config.crawler)?;
    validate_targets(&config.targets)?;
    Ok(())
}

/// Validates the site the targets are relative to
fn validate_base_url(base_url: &str) -> Result<(), ConfigError> {
    let url = Url::parse(base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", base_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            base_url
        )));
    }

    Ok(())
}

/// Validates crawler configuration
pub fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth >= 0 is always true for u32, so no check needed

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.concurrency < 1 || config.concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 100, got {}",
            config.concurrency
        )));
    }

    if config.navigation_timeout < 100 {
        return Err(ConfigError::Validation(format!(
            "navigation-timeout must be >= 100ms, got {}ms",
            config.navigation_timeout
        )));
    }

    if let Some(user_agent) = &config.user_agent {
        if user_agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "user-agent cannot be empty".to_string(),
            ));
        }
    }

    validate_selector(&config.selector)?;
    validate_viewport(&config.viewport, "crawler")?;

    Ok(())
}

/// Validates configured targets
fn validate_targets(targets: &[Target]) -> Result<(), ConfigError> {
    for (index, target) in targets.iter().enumerate() {
        if target.name.is_empty() {
            return Err(ConfigError::Validation(format!(
                "Target {}: name is required",
                index
            )));
        }

        if !target
            .name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ConfigError::Validation(format!(
                "Target {}: name '{}' must contain only letters, digits, '-' and '_'",
                index, target.name
            )));
        }

        if !target.url.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "Target {}: url '{}' must be a path starting with '/'",
                index, target.url
            )));
        }

        validate_selector(&target.selector)?;
        validate_viewport(&target.viewport, &format!("Target {}", index))?;
    }

    Ok(())
}

/// Checks that a selector parses as CSS
pub fn validate_selector(selector: &str) -> Result<(), ConfigError> {
    if selector.trim().is_empty() {
        return Err(ConfigError::Validation(
            "selector cannot be empty".to_string(),
        ));
    }

    scraper::Selector::parse(selector).map_err(|e| {
        ConfigError::Validation(format!("Invalid selector '{}': {:?}", selector, e))
    })?;

    Ok(())
}

fn validate_viewport(viewport: &Viewport, owner: &str) -> Result<(), ConfigError> {
    if viewport.width == 0 || viewport.height == 0 {
        return Err(ConfigError::Validation(format!(
            "{}: viewport must have positive width and height, got {}x{}",
            owner, viewport.width, viewport.height
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(name: &str, url: &str) -> Target {
        Target {
            name: name.to_string(),
            url: url.to_string(),
            selector: "body".to_string(),
            viewport: Viewport::default(),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_base_url() {
        assert!(validate_base_url("http://localhost:3000").is_ok());
        assert!(validate_base_url("https://example.com/app").is_ok());

        assert!(validate_base_url("").is_err());
        assert!(validate_base_url("localhost:3000/").is_err());
        assert!(validate_base_url("ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_crawler_bounds() {
        let mut config = CrawlerConfig::default();
        config.max_depth = 0;
        assert!(validate_crawler_config(&config).is_ok());

        config.max_pages = 0;
        assert!(validate_crawler_config(&config).is_err());

        let mut config = CrawlerConfig::default();
        config.concurrency = 101;
        assert!(validate_crawler_config(&config).is_err());

        let mut config = CrawlerConfig::default();
        config.navigation_timeout = 50;
        assert!(validate_crawler_config(&config).is_err());

        let mut config = CrawlerConfig::default();
        config.user_agent = Some("  ".to_string());
        assert!(validate_crawler_config(&config).is_err());
    }

    #[test]
    fn test_validate_selector() {
        assert!(validate_selector("body").is_ok());
        assert!(validate_selector("#main > .content").is_ok());
        assert!(validate_selector("header nav a[href]").is_ok());

        assert!(validate_selector("").is_err());
        assert!(validate_selector("div[").is_err());
        assert!(validate_selector("##").is_err());
    }

    #[test]
    fn test_validate_viewport() {
        let mut config = CrawlerConfig::default();
        config.viewport = Viewport {
            width: 0,
            height: 800,
        };
        assert!(validate_crawler_config(&config).is_err());
    }

    #[test]
    fn test_validate_targets() {
        assert!(validate_targets(&[target("homepage", "/"), target("a-x-1", "/a?x=1")]).is_ok());

        assert!(validate_targets(&[target("", "/")]).is_err());
        assert!(validate_targets(&[target("has space", "/")]).is_err());
        assert!(validate_targets(&[target("about", "about")]).is_err());

        let mut bad_viewport = target("about", "/about");
        bad_viewport.viewport.height = 0;
        assert!(validate_targets(&[bad_viewport]).is_err());
    }
}
