//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core
//! services as `Arc<CoreConfig>`. Core code never reads environment variables; the
//! CLI does that before constructing the config.

use crate::constants::{
    BOOKING_HORIZON_DAYS, DEFAULT_APPOINTMENTS_FILE, DEFAULT_HOLIDAYS_FILE, LEAD_TIME_HOURS,
    SLOT_CAPACITY,
};
use crate::{SalonError, SalonResult};
use chrono::{Duration, Weekday};
use std::path::{Path, PathBuf};

/// Tunable business rules applied by the scheduling engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchedulingPolicy {
    /// Maximum bookings for one category at one date and time.
    pub slot_capacity: usize,
    /// Minimum interval between now and the booked slot.
    pub lead_time: Duration,
    /// Furthest bookable date, in days after today.
    pub horizon_days: i64,
    /// Days of the week on which no bookings are taken.
    pub closed_weekdays: Vec<Weekday>,
}

impl Default for SchedulingPolicy {
    fn default() -> Self {
        Self {
            slot_capacity: SLOT_CAPACITY,
            lead_time: Duration::hours(LEAD_TIME_HOURS),
            horizon_days: BOOKING_HORIZON_DAYS,
            closed_weekdays: vec![Weekday::Sun],
        }
    }
}

impl SchedulingPolicy {
    fn validate(&self) -> SalonResult<()> {
        if self.slot_capacity == 0 {
            return Err(SalonError::InvalidInput(
                "slot_capacity must be at least 1".into(),
            ));
        }
        if self.lead_time < Duration::zero() {
            return Err(SalonError::InvalidInput(
                "lead_time cannot be negative".into(),
            ));
        }
        if self.horizon_days < 0 {
            return Err(SalonError::InvalidInput(
                "horizon_days cannot be negative".into(),
            ));
        }
        Ok(())
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    appointments_path: PathBuf,
    holidays_path: PathBuf,
    policy: SchedulingPolicy,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `SalonError::InvalidInput` if either path is empty, if the appointments
    /// path names an existing directory, or if the policy is inconsistent.
    pub fn new(
        appointments_path: PathBuf,
        holidays_path: PathBuf,
        policy: SchedulingPolicy,
    ) -> SalonResult<Self> {
        if appointments_path.as_os_str().is_empty() {
            return Err(SalonError::InvalidInput(
                "appointments path cannot be empty".into(),
            ));
        }
        if holidays_path.as_os_str().is_empty() {
            return Err(SalonError::InvalidInput(
                "holidays path cannot be empty".into(),
            ));
        }
        if appointments_path.is_dir() {
            return Err(SalonError::InvalidInput(format!(
                "appointments path {} is a directory",
                appointments_path.display()
            )));
        }
        policy.validate()?;

        Ok(Self {
            appointments_path,
            holidays_path,
            policy,
        })
    }

    pub fn appointments_path(&self) -> &Path {
        &self.appointments_path
    }

    pub fn holidays_path(&self) -> &Path {
        &self.holidays_path
    }

    pub fn policy(&self) -> &SchedulingPolicy {
        &self.policy
    }
}

/// Pick the document paths from optional overrides, falling back to the defaults
/// in the working directory.
pub fn resolve_paths(
    appointments_override: Option<PathBuf>,
    holidays_override: Option<PathBuf>,
) -> (PathBuf, PathBuf) {
    fn non_empty(path: Option<PathBuf>) -> Option<PathBuf> {
        path.filter(|p| !p.as_os_str().is_empty())
    }

    (
        non_empty(appointments_override).unwrap_or_else(|| PathBuf::from(DEFAULT_APPOINTMENTS_FILE)),
        non_empty(holidays_override).unwrap_or_else(|| PathBuf::from(DEFAULT_HOLIDAYS_FILE)),
    )
}
