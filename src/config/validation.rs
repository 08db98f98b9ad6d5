use crate::config::types::{CacheConfig, Config, CountryEntry, CrawlerConfig, OutputConfig};
use crate::url::normalize_url;
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_cache_config(&config.cache)?;
    validate_output_config(&config.output)?;
    validate_url("browser.webdriver-url", &config.browser.webdriver_url)?;
    validate_url("sources.ranking-url", &config.sources.ranking_url)?;
    validate_url("sources.cost-of-living-url", &config.sources.cost_of_living_url)?;
    validate_countries(&config.countries)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > 4 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 4, got {}",
            config.workers
        )));
    }

    if config.retry_attempts < 1 || config.retry_attempts > 10 {
        return Err(ConfigError::Validation(format!(
            "retry-attempts must be between 1 and 10, got {}",
            config.retry_attempts
        )));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(
            "request-timeout must be >= 1 second".to_string(),
        ));
    }

    if config.render_timeout < 1 {
        return Err(ConfigError::Validation(
            "render-timeout must be >= 1 second".to_string(),
        ));
    }

    if config.min_jitter_ms > config.max_jitter_ms {
        return Err(ConfigError::Validation(format!(
            "min-jitter-ms ({}) must not exceed max-jitter-ms ({})",
            config.min_jitter_ms, config.max_jitter_ms
        )));
    }

    if config.snapshot_every < 1 {
        return Err(ConfigError::Validation(
            "snapshot-every must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "cache.directory cannot be empty".to_string(),
        ));
    }

    if config.freshness_days < 1 {
        return Err(ConfigError::Validation(format!(
            "freshness-days must be >= 1, got {}",
            config.freshness_days
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    let paths = [
        ("database-path", &config.database_path),
        ("references-path", &config.references_path),
        ("checkpoint-path", &config.checkpoint_path),
        ("partial-directory", &config.partial_directory),
    ];

    for (key, value) in paths {
        if value.is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", key)));
        }
    }

    Ok(())
}

fn validate_url(key: &str, value: &str) -> Result<(), ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidUrl(format!("Invalid {}: {}", key, e)))?;
    Ok(())
}

/// Validates the target countries and their universities
fn validate_countries(countries: &[CountryEntry]) -> Result<(), ConfigError> {
    if countries.is_empty() {
        return Err(ConfigError::Validation(
            "At least one [[country]] must be configured".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for country in countries {
        if country.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "country name cannot be empty".to_string(),
            ));
        }

        if !seen.insert(country.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "country '{}' is listed more than once",
                country.name
            )));
        }

        for university in &country.universities {
            if university.name.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "university name cannot be empty (country '{}')",
                    country.name
                )));
            }

            normalize_url(&university.url).map_err(|e| {
                ConfigError::InvalidUrl(format!("{} ({}): {}", university.name, university.url, e))
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{
        BrowserConfig, CacheConfig, OutputConfig, SourcesConfig, UniversityEntry,
    };

    fn create_valid_config() -> Config {
        Config {
            crawler: CrawlerConfig::default(),
            cache: CacheConfig::default(),
            browser: BrowserConfig::default(),
            sources: SourcesConfig::default(),
            output: OutputConfig::default(),
            countries: vec![CountryEntry {
                name: "España".to_string(),
                universities: vec![UniversityEntry {
                    name: "Universidad Complutense de Madrid".to_string(),
                    city: "Madrid".to_string(),
                    url: "https://www.ucm.es".to_string(),
                }],
            }],
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&create_valid_config()).is_ok());
    }

    #[test]
    fn test_workers_out_of_range() {
        let mut config = create_valid_config();
        config.crawler.workers = 0;
        assert!(validate(&config).is_err());

        config.crawler.workers = 5;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_retry_attempts_zero() {
        let mut config = create_valid_config();
        config.crawler.retry_attempts = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_jitter_bounds_inverted() {
        let mut config = create_valid_config();
        config.crawler.min_jitter_ms = 6000;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_freshness_zero() {
        let mut config = create_valid_config();
        config.cache.freshness_days = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_database_path() {
        let mut config = create_valid_config();
        config.output.database_path = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_invalid_webdriver_url() {
        let mut config = create_valid_config();
        config.browser.webdriver_url = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_no_countries() {
        let mut config = create_valid_config();
        config.countries.clear();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_duplicate_country() {
        let mut config = create_valid_config();
        let dup = config.countries[0].clone();
        config.countries.push(dup);
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_university_without_scheme_is_accepted() {
        let mut config = create_valid_config();
        config.countries[0].universities[0].url = "www.ucm.es".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_university_bad_url() {
        let mut config = create_valid_config();
        config.countries[0].universities[0].url = "ftp://ucm.es".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }
}
