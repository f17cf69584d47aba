use chrono_tz::Tz;
use daybook_core::error::CoreError;
use daybook_core::recurrence::ExpansionConfig;
use daybook_core::timezone::{parse_timezone, validate_timezone};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "daybook.toml";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// SQLite database file
    pub database_path: String,
    /// User's timezone (IANA format); decides what "today" is
    pub timezone: String,
    /// Offset used by `add --remind` without explicit minutes
    pub default_reminder_minutes: u32,
    pub expansion: ExpansionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: "daybook.db".to_string(),
            timezone: detect_system_timezone(),
            default_reminder_minutes: 15,
            expansion: ExpansionConfig::default(),
        }
    }
}

impl Config {
    /// Defaults, then `daybook.toml`, then `DAYBOOK_*` variables.
    ///
    /// Nested keys use a double underscore, e.g. `DAYBOOK_EXPANSION__MAX_ITERATIONS`.
    pub fn new() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed("DAYBOOK_").ignore(&["log"]).split("__"))
    }

    pub fn tz(&self) -> Result<Tz, CoreError> {
        parse_timezone(&self.timezone)
    }
}

/// Detects the system timezone, falling back to UTC if detection fails
pub fn detect_system_timezone() -> String {
    if let Ok(tz) = std::env::var("TZ") {
        if !tz.is_empty() && validate_timezone(&tz).is_ok() {
            return tz;
        }
    }

    if let Ok(tz) = iana_time_zone::get_timezone() {
        if validate_timezone(&tz).is_ok() {
            return tz;
        }
    }

    "UTC".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults() {
        Jail::expect_with(|_jail| {
            let config = Config::new()?;
            assert_eq!(config.database_path, "daybook.db");
            assert_eq!(config.default_reminder_minutes, 15);
            assert_eq!(config.expansion, ExpansionConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_file_and_env_layers() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                database_path = "planner.db"
                timezone = "Europe/Berlin"

                [expansion]
                max_iterations = 100
                "#,
            )?;
            jail.set_env("DAYBOOK_DATABASE_PATH", "/tmp/override.db");
            jail.set_env("DAYBOOK_EXPANSION__HORIZON_MONTHS", "6");

            let config = Config::new()?;
            assert_eq!(config.database_path, "/tmp/override.db");
            assert_eq!(config.timezone, "Europe/Berlin");
            assert_eq!(config.expansion.max_iterations, 100);
            assert_eq!(config.expansion.horizon_months, 6);
            assert!(config.tz().is_ok());
            Ok(())
        });
    }
}
