//! Appointment records and booking proposals.

use crate::constants::{
    DATE_FORMAT, PLACEHOLDER_CATEGORY, PLACEHOLDER_DATE, PLACEHOLDER_NAME, PLACEHOLDER_SERVICE,
    PLACEHOLDER_TIME,
};
use chrono::NaiveDate;
use salon_types::TimeSlot;

/// A stored appointment.
///
/// Every field is present. Records written by this crate always carry a validated
/// name, a catalog category/service pair and canonical date and time; records
/// recovered from older documents may hold empty strings where the source had no
/// value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Appointment {
    pub id: u32,
    pub client_name: String,
    pub category: String,
    pub service: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
}

impl Appointment {
    /// Parsed booking date, if the stored text is a valid date.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).ok()
    }

    /// Whether this appointment takes up the given date and time.
    pub fn occupies(&self, date: NaiveDate, time: TimeSlot) -> bool {
        self.parsed_date() == Some(date) && TimeSlot::parse(self.time.trim()) == Ok(time)
    }

    /// One-line description used by listings:
    /// `2026-03-05 11:00 - Ana Gomez (Uñas - Manicura)`.
    pub fn summary(&self) -> String {
        format!(
            "{} {} - {} ({} - {})",
            or_placeholder(&self.date, PLACEHOLDER_DATE),
            or_placeholder(&self.time, PLACEHOLDER_TIME),
            or_placeholder(&self.client_name, PLACEHOLDER_NAME),
            or_placeholder(&self.category, PLACEHOLDER_CATEGORY),
            or_placeholder(&self.service, PLACEHOLDER_SERVICE),
        )
    }
}

/// Returns `value`, or `placeholder` when `value` is blank.
pub fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

/// A requested booking as entered by a user, before any rule has been applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proposal {
    pub client_name: String,
    pub category: String,
    pub service: String,
    pub date: String,
    pub time: String,
}

impl Proposal {
    pub fn new(
        client_name: impl Into<String>,
        category: impl Into<String>,
        service: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            client_name: client_name.into(),
            category: category.into(),
            service: service.into(),
            date: date.into(),
            time: time.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, time: &str) -> Appointment {
        Appointment {
            id: 1,
            client_name: "Ana Gomez".into(),
            category: "Uñas".into(),
            service: "Manicura".into(),
            date: date.into(),
            time: time.into(),
        }
    }

    #[test]
    fn occupies_compares_parsed_values() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let slot = TimeSlot::parse("11:00").unwrap();

        assert!(record("2026-01-05", "11:00").occupies(date, slot));
        assert!(record("2026-1-5", "11:00").occupies(date, slot));
        assert!(!record("2026-01-05", "11:30").occupies(date, slot));
        assert!(!record("", "").occupies(date, slot));
    }

    #[test]
    fn summary_uses_placeholders_for_missing_fields() {
        let mut appointment = record("", "11:00");
        appointment.service.clear();
        assert_eq!(
            appointment.summary(),
            "Sin fecha 11:00 - Ana Gomez (Uñas - Sin servicio)"
        );
    }
}
