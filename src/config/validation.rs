//! Configuration validation.
//!
//! Every rule is checked and every violation reported, so a user fixes the
//! whole file in one pass instead of one error per run.

use super::constants::{
    CONCURRENCY_RANGE, MAX_DOMAIN_DELAY_MS, MAX_JSON_INDENTATION, MAX_PAGE_SIZE_LIMIT,
    MAX_SCREENSHOT_QUALITY, NAVIGATION_TIMEOUT_RANGE_MS, PER_DOMAIN_CONCURRENCY_RANGE,
};
use super::types::Config;
use crate::error_handling::ConfigError;

impl Config {
    /// Validates every field and returns all violations at once.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` listing each violated rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        check_range(
            &mut errors,
            "concurrency",
            self.concurrency,
            CONCURRENCY_RANGE,
        );
        check_range(
            &mut errors,
            "per_domain_concurrency",
            self.per_domain_concurrency,
            PER_DOMAIN_CONCURRENCY_RANGE,
        );
        check_range(
            &mut errors,
            "domain_delay_ms",
            self.domain_delay_ms,
            (0, MAX_DOMAIN_DELAY_MS),
        );
        check_range(
            &mut errors,
            "navigation_timeout_ms",
            self.navigation_timeout_ms,
            NAVIGATION_TIMEOUT_RANGE_MS,
        );
        check_range(
            &mut errors,
            "json_indentation",
            self.json_indentation,
            (0, MAX_JSON_INDENTATION),
        );
        check_range(
            &mut errors,
            "screenshot_quality",
            self.screenshot_quality,
            (0, MAX_SCREENSHOT_QUALITY),
        );
        check_range(
            &mut errors,
            "max_page_size",
            self.max_page_size,
            (0, MAX_PAGE_SIZE_LIMIT),
        );

        if self.url_list.as_os_str().is_empty() {
            errors.push("url_list must not be empty".to_string());
        }
        if self.output_directory.as_os_str().is_empty() {
            errors.push("output_directory must not be empty".to_string());
        }
        if self.axe_script_path.as_os_str().is_empty() {
            errors.push("axe_script_path must not be empty".to_string());
        }
        if self.locale.trim().is_empty() {
            errors.push("locale must not be empty".to_string());
        }

        if self.tags.is_empty() {
            errors.push("tags must contain at least one rule tag".to_string());
        }
        for tag in &self.tags {
            if tag.is_empty()
                || !tag
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '_')
            {
                errors.push(format!("tags: invalid rule tag '{}'", tag));
            }
        }

        for (list, entries) in [
            ("allowed_domains", &self.allowed_domains),
            ("blocked_domains", &self.blocked_domains),
        ] {
            for entry in entries {
                if entry.trim().is_empty() {
                    errors.push(format!("{}: entries must not be empty", list));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }
}

fn check_range<T>(errors: &mut Vec<String>, name: &str, value: T, (min, max): (T, T))
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min || value > max {
        errors.push(format!(
            "{} must be between {} and {} (got {})",
            name, min, max, value
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid_items(config: &Config) -> Vec<String> {
        match config.validate() {
            Err(ConfigError::Invalid(items)) => items,
            other => panic!("expected invalid config, got {:?}", other),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_concurrency_bounds() {
        let mut config = Config::default();
        config.concurrency = 0;
        assert_eq!(invalid_items(&config).len(), 1);

        config.concurrency = 11;
        assert!(invalid_items(&config)[0].contains("concurrency"));

        config.concurrency = 10;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_every_violation_is_reported() {
        let config = Config {
            concurrency: 0,
            per_domain_concurrency: 20,
            domain_delay_ms: 60_001,
            navigation_timeout_ms: 999,
            json_indentation: 11,
            screenshot_quality: 101,
            max_page_size: MAX_PAGE_SIZE_LIMIT + 1,
            tags: Vec::new(),
            ..Default::default()
        };
        let items = invalid_items(&config);
        assert_eq!(items.len(), 8, "{:?}", items);
    }

    #[test]
    fn test_rejects_malformed_tag() {
        let config = Config {
            tags: vec!["wcag2a".into(), "bad tag'".into()],
            ..Default::default()
        };
        let items = invalid_items(&config);
        assert_eq!(items.len(), 1);
        assert!(items[0].contains("bad tag'"));
    }

    #[test]
    fn test_rejects_empty_domain_entry() {
        let config = Config {
            blocked_domains: vec!["  ".into()],
            ..Default::default()
        };
        assert!(invalid_items(&config)[0].contains("blocked_domains"));
    }

    #[test]
    fn test_zero_page_size_means_unlimited() {
        let config = Config {
            max_page_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
