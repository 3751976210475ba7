use crate::adapters::file_repository::DEFAULT_DATA_FILE;
use crate::core::booking::{BookingRules, DEFAULT_PAST_DATE_MESSAGE, DEFAULT_VISIT_HOUR};
use crate::utils::error::{ClinicError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClinicConfig {
    #[serde(default)]
    pub clinic: ClinicSection,
    #[serde(default)]
    pub storage: StorageConfig,
    pub booking: Option<BookingConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicSection {
    pub name: String,
}

impl Default for ClinicSection {
    fn default() -> Self {
        Self {
            name: "Pet Clinic".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Memory,
    #[default]
    File,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub kind: StorageKind,
    pub path: Option<String>,
    pub file_name: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: StorageKind::File,
            path: None,
            file_name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingConfig {
    pub past_date_message: Option<String>,
    pub default_visit_hour: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<LogFormat>,
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static pattern is valid"))
}

impl ClinicConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ClinicError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Load from `path` if it exists, otherwise fall back to the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ClinicError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are
    /// left untouched.
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("clinic.name", &self.clinic.name)?;

        if self.storage.kind == StorageKind::File {
            validation::validate_path("storage.path", self.storage_path())?;
            validation::validate_path("storage.file_name", self.data_file_name())?;
        }

        if let Some(booking) = &self.booking {
            if let Some(hour) = booking.default_visit_hour {
                validation::validate_range("booking.default_visit_hour", hour, 0, 23)?;
            }
            if let Some(message) = &booking.past_date_message {
                validation::validate_non_empty_string("booking.past_date_message", message)?;
            }
        }

        if let Some(level) = self.log_level() {
            validation::validate_one_of("logging.level", level, &LOG_LEVELS)?;
        }

        Ok(())
    }

    pub fn storage_path(&self) -> &str {
        self.storage.path.as_deref().unwrap_or("./clinic-data")
    }

    pub fn data_file_name(&self) -> &str {
        self.storage.file_name.as_deref().unwrap_or(DEFAULT_DATA_FILE)
    }

    pub fn booking_rules(&self) -> BookingRules {
        let booking = self.booking.as_ref();
        BookingRules {
            past_date_message: booking
                .and_then(|b| b.past_date_message.clone())
                .unwrap_or_else(|| DEFAULT_PAST_DATE_MESSAGE.to_string()),
            default_visit_hour: booking
                .and_then(|b| b.default_visit_hour)
                .unwrap_or(DEFAULT_VISIT_HOUR),
        }
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn log_format(&self) -> LogFormat {
        self.logging
            .as_ref()
            .and_then(|l| l.format)
            .unwrap_or_default()
    }
}

impl Validate for ClinicConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[clinic]
name = "Happy Paws"

[storage]
kind = "file"
path = "/var/lib/happy-paws"
file_name = "records.json"

[booking]
past_date_message = "Esa fecha ya pasó"
default_visit_hour = 10

[logging]
level = "debug"
format = "json"
"#;

        let config = ClinicConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.clinic.name, "Happy Paws");
        assert_eq!(config.storage_path(), "/var/lib/happy-paws");
        assert_eq!(config.data_file_name(), "records.json");
        assert_eq!(config.log_level(), Some("debug"));
        assert_eq!(config.log_format(), LogFormat::Json);

        let rules = config.booking_rules();
        assert_eq!(rules.past_date_message, "Esa fecha ya pasó");
        assert_eq!(rules.default_visit_hour, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ClinicConfig::from_toml_str("").unwrap();

        assert_eq!(config, ClinicConfig::default());
        assert_eq!(config.storage.kind, StorageKind::File);
        assert_eq!(config.storage_path(), "./clinic-data");
        assert_eq!(config.data_file_name(), "clinic.json");
        assert_eq!(config.booking_rules(), BookingRules::default());
        assert_eq!(config.log_format(), LogFormat::Compact);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PET_CLINIC_TEST_DATA_DIR", "/tmp/clinic-test");

        let toml_content = r#"
[storage]
path = "${PET_CLINIC_TEST_DATA_DIR}"
file_name = "${PET_CLINIC_UNSET_VARIABLE}"
"#;

        let config = ClinicConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.storage_path(), "/tmp/clinic-test");
        assert_eq!(config.data_file_name(), "${PET_CLINIC_UNSET_VARIABLE}");

        std::env::remove_var("PET_CLINIC_TEST_DATA_DIR");
    }

    #[test]
    fn test_config_validation() {
        let bad_hour = ClinicConfig::from_toml_str("[booking]\ndefault_visit_hour = 24\n").unwrap();
        assert!(bad_hour.validate().is_err());

        let bad_level = ClinicConfig::from_toml_str("[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(bad_level.validate().is_err());

        let empty_path = ClinicConfig::from_toml_str("[storage]\npath = \"\"\n").unwrap();
        assert!(empty_path.validate().is_err());

        // path is irrelevant for in-memory storage
        let memory = ClinicConfig::from_toml_str("[storage]\nkind = \"memory\"\npath = \"\"\n").unwrap();
        assert!(memory.validate().is_ok());
    }

    #[test]
    fn test_unknown_storage_kind_fails_to_parse() {
        let result = ClinicConfig::from_toml_str("[storage]\nkind = \"postgres\"\n");
        assert!(matches!(
            result,
            Err(ClinicError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[clinic]\nname = \"File Clinic\"\n")
            .unwrap();

        let config = ClinicConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.clinic.name, "File Clinic");

        let missing = ClinicConfig::load_or_default("/definitely/not/here.toml").unwrap();
        assert_eq!(missing, ClinicConfig::default());
    }
}
