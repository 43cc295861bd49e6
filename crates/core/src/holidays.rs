//! Holiday blackout dates.
//!
//! The holiday document is maintained by hand outside the application:
//!
//! ```json
//! { "feriados": ["2026-01-01", "2026-05-25"] }
//! ```
//!
//! A missing or malformed document never stops the salon from taking bookings; it
//! only means no date is treated as a holiday, and a warning is logged.

use crate::constants::DATE_FORMAT;
use crate::{SalonError, SalonResult};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Immutable set of dates on which no bookings are taken.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HolidaySet {
    dates: BTreeSet<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct HolidayFileWire {
    feriados: Vec<Value>,
}

impl HolidaySet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }

    /// Loads the holiday document at `path`.
    ///
    /// Any failure (missing file, unreadable file, invalid JSON, missing `feriados`
    /// key) is logged as a warning and yields an empty set.
    pub fn load(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(
                    "holiday file not found: {}; no dates will be treated as holidays",
                    path.display()
                );
                return Self::empty();
            }
            Err(e) => {
                tracing::warn!("failed to read holiday file {}: {}", path.display(), e);
                return Self::empty();
            }
        };

        match Self::parse(&contents) {
            Ok(set) => {
                tracing::debug!("loaded {} holidays from {}", set.len(), path.display());
                set
            }
            Err(e) => {
                tracing::warn!("ignoring holiday file {}: {}", path.display(), e);
                Self::empty()
            }
        }
    }

    /// Parses holiday JSON text.
    ///
    /// Entries that are not `YYYY-MM-DD` strings are skipped with a warning; the rest
    /// of the document is still used.
    ///
    /// # Errors
    ///
    /// Returns `SalonError::Deserialization` if the text is not an object with a
    /// `feriados` list. The message names the failing path, e.g. `feriados`.
    pub fn parse(json_text: &str) -> SalonResult<Self> {
        let mut deserializer = serde_json::Deserializer::from_str(json_text);
        let wire: HolidayFileWire = serde_path_to_error::deserialize(&mut deserializer)
            .map_err(|err| {
                let path = err.path().to_string();
                let source = err.into_inner();
                SalonError::Deserialization {
                    what: "holiday file",
                    reason: format!("schema mismatch at {path}: {source}"),
                }
            })?;

        let mut dates = BTreeSet::new();
        for raw in wire.feriados {
            let parsed = raw
                .as_str()
                .and_then(|s| NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok());
            match parsed {
                Some(date) => {
                    dates.insert(date);
                }
                None => tracing::warn!("skipping invalid holiday date {}", raw),
            }
        }

        Ok(Self { dates })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn loads_dates_from_document() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("feriados.json");
        fs::write(&path, r#"{"feriados": ["2026-05-25", "2026-07-09"]}"#).unwrap();

        let set = HolidaySet::load(&path);
        assert_eq!(set.len(), 2);
        assert!(set.contains(date("2026-05-25")));
        assert!(set.contains(date("2026-07-09")));
        assert!(!set.contains(date("2026-07-10")));
    }

    #[test]
    fn missing_file_yields_empty_set() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let set = HolidaySet::load(&temp_dir.path().join("absent.json"));
        assert!(set.is_empty());
    }

    #[test]
    fn malformed_json_yields_empty_set() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("feriados.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(HolidaySet::load(&path).is_empty());
    }

    #[test]
    fn non_string_entries_do_not_discard_the_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("feriados.json");
        fs::write(&path, r#"{"feriados": ["2026-05-25", 7, "2026-07-09"]}"#).unwrap();

        let set = HolidaySet::load(&path);
        assert_eq!(set.len(), 2);
        assert!(set.contains(date("2026-07-09")));
    }

    #[test]
    fn missing_key_yields_empty_set() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("feriados.json");
        fs::write(&path, r#"{"holidays": ["2026-05-25"]}"#).unwrap();

        assert!(HolidaySet::load(&path).is_empty());
    }

    #[test]
    fn parse_reports_failing_path() {
        let err = HolidaySet::parse(r#"{"feriados": "2026-05-25"}"#)
            .expect_err("a single string is not a list");
        match err {
            SalonError::Deserialization { reason, .. } => {
                assert!(reason.contains("feriados"), "unexpected reason: {reason}")
            }
            other => panic!("expected Deserialization error, got {other:?}"),
        }
    }

    #[test]
    fn parse_skips_invalid_entries() {
        let set = HolidaySet::parse(
            r#"{"feriados": ["2026-05-25", "25/05/2026", "", 7, null, ["2026-07-09"]]}"#,
        )
        .expect("document shape is valid");
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![date("2026-05-25")]);
    }
}
