use std::env;
use std::fmt;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::diagnosis::{presets, VariantConfig};

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub variant: VariantSource,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("DIAGNOSIS_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let preset = env::var("DIAGNOSIS_VARIANT").unwrap_or_else(|_| presets::STANDARD.to_string());
        let file = env::var("DIAGNOSIS_VARIANT_FILE")
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        let log_level = env::var("DIAGNOSIS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            variant: VariantSource { preset, file },
            telemetry: TelemetryConfig { log_level },
        })
    }

    /// Resolves the variant once; a configured file wins over the preset name.
    pub fn variant(&self) -> Result<VariantConfig, ConfigError> {
        self.variant.resolve()
    }
}

/// Where the active variant configuration comes from.
#[derive(Debug, Clone)]
pub struct VariantSource {
    pub preset: String,
    pub file: Option<PathBuf>,
}

impl VariantSource {
    pub fn resolve(&self) -> Result<VariantConfig, ConfigError> {
        if let Some(path) = &self.file {
            let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::VariantFile {
                path: path.clone(),
                source,
            })?;
            let config: VariantConfig =
                serde_json::from_str(&raw).map_err(|source| ConfigError::VariantParse {
                    path: path.clone(),
                    source,
                })?;
            info!(variant = %config.name, path = %path.display(), "loaded variant file");
            return Ok(config);
        }

        let config = presets::by_name(&self.preset)
            .ok_or_else(|| ConfigError::UnknownVariant(self.preset.clone()))?;
        debug!(variant = %config.name, "using built-in variant");
        Ok(config)
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    UnknownVariant(String),
    VariantFile {
        path: PathBuf,
        source: std::io::Error,
    },
    VariantParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownVariant(name) => write!(
                f,
                "DIAGNOSIS_VARIANT '{}' is not one of: {}",
                name,
                presets::names().join(", ")
            ),
            ConfigError::VariantFile { path, .. } => {
                write!(f, "unable to read variant file {}", path.display())
            }
            ConfigError::VariantParse { path, .. } => {
                write!(f, "variant file {} is not a valid variant", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::UnknownVariant(_) => None,
            ConfigError::VariantFile { source, .. } => Some(source),
            ConfigError::VariantParse { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("DIAGNOSIS_ENV");
        env::remove_var("DIAGNOSIS_VARIANT");
        env::remove_var("DIAGNOSIS_VARIANT_FILE");
        env::remove_var("DIAGNOSIS_LOG_LEVEL");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.variant.preset, "standard");
        assert!(config.variant.file.is_none());
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.variant().expect("preset resolves").name, "standard");
    }

    #[test]
    fn unknown_preset_is_reported() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("DIAGNOSIS_VARIANT", "mystery");
        let config = AppConfig::load().expect("config loads");
        let err = config.variant().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownVariant(ref name) if name == "mystery"));
        assert!(err.to_string().contains("standard"));
        reset_env();
    }

    #[test]
    fn variant_file_overrides_preset() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let mut custom = presets::brand();
        custom.name = "salon-a".to_string();
        let path = env::temp_dir().join(format!("variant-{}.json", std::process::id()));
        std::fs::write(&path, serde_json::to_string(&custom).expect("serializes"))
            .expect("temp file written");

        env::set_var("DIAGNOSIS_ENV", "prod");
        env::set_var("DIAGNOSIS_VARIANT_FILE", &path);
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.variant().expect("file resolves").name, "salon-a");

        std::fs::remove_file(&path).ok();
        reset_env();
    }

    #[test]
    fn malformed_variant_file_is_a_parse_error() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let path = env::temp_dir().join(format!("variant-bad-{}.json", std::process::id()));
        std::fs::write(&path, "{ \"name\": 3 }").expect("temp file written");

        let source = VariantSource {
            preset: "standard".to_string(),
            file: Some(path.clone()),
        };
        assert!(matches!(
            source.resolve(),
            Err(ConfigError::VariantParse { .. })
        ));

        std::fs::remove_file(&path).ok();
    }
}
