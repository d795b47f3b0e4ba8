//! Key/value settings storage.

use rusqlite::{OptionalExtension, params};

use crate::{
    error::{DatabaseResultExt, PlannerError, Result},
    models::{
        Settings,
        clock::{format_hhmm, parse_hhmm},
    },
};

const SELECT_SETTING_SQL: &str = "SELECT value FROM settings WHERE key = ?1";
const UPSERT_SETTING_SQL: &str = "INSERT INTO settings (key, value) VALUES (?1, ?2) \
     ON CONFLICT(key) DO UPDATE SET value = excluded.value";

const DAY_START_KEY: &str = "day_start";
const DAY_END_KEY: &str = "day_end";

impl super::Database {
    fn get_setting(&self, key: &str) -> Result<Option<String>> {
        self.connection
            .query_row(SELECT_SETTING_SQL, params![key], |row| row.get(0))
            .optional()
            .db_context("Failed to query setting")
    }

    /// Loads settings, falling back to defaults for keys never written.
    pub fn get_settings(&self) -> Result<Settings> {
        let defaults = Settings::default();
        let day_start = match self.get_setting(DAY_START_KEY)? {
            Some(value) => parse_hhmm(DAY_START_KEY, &value)?,
            None => defaults.day_start,
        };
        let day_end = match self.get_setting(DAY_END_KEY)? {
            Some(value) => parse_hhmm(DAY_END_KEY, &value)?,
            None => defaults.day_end,
        };

        let settings = Settings { day_start, day_end };
        settings
            .validate()
            .map_err(|e| PlannerError::Configuration {
                message: format!("Stored settings are invalid: {e}"),
            })?;
        Ok(settings)
    }

    /// Validates and stores settings.
    pub fn save_settings(&mut self, settings: &Settings) -> Result<()> {
        settings.validate()?;

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;
        for (key, value) in [
            (DAY_START_KEY, settings.day_start),
            (DAY_END_KEY, settings.day_end),
        ] {
            tx.execute(UPSERT_SETTING_SQL, params![key, format_hhmm(value)])
                .db_context("Failed to write setting")?;
        }
        tx.commit().db_context("Failed to commit transaction")
    }
}
