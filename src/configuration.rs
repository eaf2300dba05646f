use std::{path::Path, time::Duration};

use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::{
    domain::{PageTarget, PriceParser, DEFAULT_PRICE_SELECTOR},
    error::ConfigurationError,
    services::ExtractOptions,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub browser: BrowserSettings,
    #[serde(default)]
    pub scrape: ScrapeSettings,
    #[serde(default)]
    pub pricing: PricingSettings,
    #[serde(default)]
    pub logging: LogSettings,
    #[serde(default)]
    pub targets: Vec<TargetSettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    pub webdriver_url: String,
    #[serde(default = "default_true")]
    pub headless: bool,
    #[serde(default)]
    pub maximize_window: bool,
    #[serde(
        default = "default_poll_interval_millis",
        deserialize_with = "deserialize_number_from_string"
    )]
    pub poll_interval_millis: u64,
}

impl BrowserSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_millis)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeSettings {
    #[serde(
        default = "default_max_products",
        deserialize_with = "deserialize_number_from_string"
    )]
    pub max_products: usize,
    #[serde(
        default = "default_timeout_secs",
        deserialize_with = "deserialize_number_from_string"
    )]
    pub timeout_secs: u64,
    #[serde(default = "default_selector")]
    pub default_selector: String,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        ScrapeSettings {
            max_products: default_max_products(),
            timeout_secs: default_timeout_secs(),
            default_selector: default_selector(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl ScrapeSettings {
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            max_products: self.max_products,
            timeout: Duration::from_secs(self.timeout_secs),
            default_selector: self.default_selector.clone(),
        }
    }
}

/// What a failed page does to the rest of the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failed page.
    #[default]
    Abort,
    /// Record the failure and scrape the remaining pages.
    Continue,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PricingSettings {
    pub currency_symbols: Vec<String>,
    pub thousands_separator: char,
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            currency_symbols: vec!["$".to_string()],
            thousands_separator: ',',
        }
    }
}

impl PricingSettings {
    pub fn parser(&self) -> PriceParser {
        PriceParser::new(self.currency_symbols.clone(), self.thousands_separator)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    pub destination: LogDestination,
}

impl Default for LogSettings {
    fn default() -> Self {
        LogSettings {
            level: "info".to_string(),
            destination: LogDestination::Stderr,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogDestination {
    Stdout,
    Stderr,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TargetSettings {
    pub url: String,
    pub selector: Option<String>,
}

impl Settings {
    /// Rejects values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.scrape.max_products == 0 {
            return Err(ConfigurationError::Zero {
                field: "scrape.max_products",
            });
        }
        if self.scrape.timeout_secs == 0 {
            return Err(ConfigurationError::Zero {
                field: "scrape.timeout_secs",
            });
        }
        self.page_targets().map(|_| ())
    }

    pub fn page_targets(&self) -> Result<Vec<PageTarget>, ConfigurationError> {
        self.targets
            .iter()
            .map(|t| PageTarget::new(&t.url, t.selector.as_deref()))
            .collect()
    }
}

fn default_true() -> bool {
    true
}

fn default_poll_interval_millis() -> u64 {
    500
}

fn default_max_products() -> usize {
    10
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_selector() -> String {
    DEFAULT_PRICE_SELECTOR.to_string()
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = ConfigurationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(ConfigurationError::UnknownEnvironment(other.to_string())),
        }
    }
}

/// Reads `configuration/base.yaml`, then the file for `APP_ENVIRONMENT`,
/// then `APP_`-prefixed environment variables (`APP_SCRAPE__TIMEOUT_SECS=20`).
///
/// Nothing is validated here; call [`Settings::validate`] once the command
/// line has been layered on top.
pub fn get_configuration() -> Result<Settings, ConfigurationError> {
    let base_path = std::env::current_dir().map_err(|e| {
        ConfigurationError::Load(config::ConfigError::Message(format!(
            "Failed to determine the current directory: {}",
            e
        )))
    })?;
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()?;

    load_settings(&configuration_directory, &environment, app_env_source())
}

fn app_env_source() -> config::Environment {
    config::Environment::with_prefix("APP")
        .prefix_separator("_")
        .separator("__")
}

fn load_settings(
    configuration_directory: &Path,
    environment: &Environment,
    env_source: config::Environment,
) -> Result<Settings, ConfigurationError> {
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(
            config::File::from(configuration_directory.join(environment_filename)).required(false),
        )
        .add_source(env_source)
        .build()?;

    Ok(settings.try_deserialize::<Settings>()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_from_yaml(yaml: &str) -> Settings {
        config::Config::builder()
            .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let settings = settings_from_yaml(
            r#"
browser:
  webdriver_url: "http://localhost:9515"
"#,
        );

        assert!(settings.browser.headless);
        assert_eq!(settings.browser.poll_interval(), Duration::from_millis(500));
        assert_eq!(settings.scrape.max_products, 10);
        assert_eq!(settings.scrape.timeout_secs, 10);
        assert_eq!(settings.scrape.default_selector, "span.price-item");
        assert_eq!(settings.scrape.failure_policy, FailurePolicy::Abort);
        assert_eq!(settings.logging.destination, LogDestination::Stderr);
        assert!(settings.targets.is_empty());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn targets_become_page_targets() {
        let settings = settings_from_yaml(
            r#"
browser:
  webdriver_url: "http://localhost:9515"
scrape:
  max_products: "5"
  failure_policy: continue
targets:
  - url: "https://hatworld.com.au/collections/leather-hats-1"
  - url: "https://www.outbacktrading.com/collections/leather-hats"
    selector: "strong.price__current"
"#,
        );

        let targets = settings.page_targets().unwrap();
        assert_eq!(settings.scrape.max_products, 5);
        assert_eq!(settings.scrape.failure_policy, FailurePolicy::Continue);
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].selector, None);
        assert_eq!(targets[1].selector.as_deref(), Some("strong.price__current"));
    }

    #[test]
    fn validate_rejects_zero_max_products() {
        let settings = settings_from_yaml(
            r#"
browser:
  webdriver_url: "http://localhost:9515"
scrape:
  max_products: 0
"#,
        );

        assert!(matches!(
            settings.validate(),
            Err(ConfigurationError::Zero {
                field: "scrape.max_products"
            })
        ));
    }

    #[test]
    fn validate_rejects_bad_target_url() {
        let settings = settings_from_yaml(
            r#"
browser:
  webdriver_url: "http://localhost:9515"
targets:
  - url: "not a url"
"#,
        );

        assert!(matches!(
            settings.validate(),
            Err(ConfigurationError::InvalidUrl { .. })
        ));
    }

    fn repository_configuration() -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("configuration")
    }

    #[test]
    fn env_variables_override_environment_file_and_base() {
        let vars: config::Map<String, String> = [
            ("APP_SCRAPE__TIMEOUT_SECS", "20"),
            ("APP_SCRAPE__MAX_PRODUCTS", "3"),
            ("APP_SCRAPE__FAILURE_POLICY", "continue"),
            ("UNRELATED_SCRAPE__TIMEOUT_SECS", "99"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let settings = load_settings(
            &repository_configuration(),
            &Environment::Production,
            app_env_source().source(Some(vars)),
        )
        .unwrap();

        assert_eq!(settings.scrape.timeout_secs, 20);
        assert_eq!(settings.scrape.max_products, 3);
        assert_eq!(settings.scrape.failure_policy, FailurePolicy::Continue);
        // production.yaml over base.yaml
        assert_eq!(settings.browser.webdriver_url, "http://chrome:4444/wd/hub");
        assert_eq!(settings.logging.level, "warn");
        // base.yaml only
        assert_eq!(settings.scrape.default_selector, "span.price-item");
        assert_eq!(settings.targets.len(), 2);
    }

    #[test]
    fn local_environment_without_overrides_keeps_base_values() {
        let settings = load_settings(
            &repository_configuration(),
            &Environment::Local,
            app_env_source().source(Some(config::Map::new())),
        )
        .unwrap();

        assert_eq!(settings.scrape.timeout_secs, 10);
        assert_eq!(settings.browser.webdriver_url, "http://localhost:9515");
        assert!(!settings.browser.headless);
        assert_eq!(settings.logging.level, "debug");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn unknown_environment_is_an_error() {
        let result: Result<Environment, _> = "staging".to_string().try_into();
        assert!(result.is_err());
    }
}
