//! Booking rules.
//!
//! Each rule checks one constraint and returns either the value it validated or a
//! [`Rejection`] describing why the booking is refused. Rules are pure: they only
//! look at their arguments, and "now" is always passed in.
//!
//! [`validate`] applies every rule in a fixed order and stops at the first failure,
//! so a refused booking always reports exactly one reason:
//!
//! 1. date format
//! 2. past date
//! 3. holiday
//! 4. closed weekday
//! 5. booking horizon
//! 6. time slot
//! 7. lead time
//! 8. client name
//! 9. category and service
//! 10. duplicate booking
//! 11. slot capacity

use crate::appointment::{Appointment, Proposal};
use crate::config::SchedulingPolicy;
use crate::constants::DATE_FORMAT;
use crate::holidays::HolidaySet;
use crate::store::count_matching;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike, Weekday};
use salon_types::{normalize_name, Category, ClientName, TimeSlot, TypeError};

/// Broad class of a rejection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectionKind {
    /// The input could not be parsed.
    MalformedInput,
    /// The input is well formed but breaks a business rule.
    PolicyViolation,
    /// The booking clashes with existing appointments.
    Conflict,
}

/// Why a booking was refused.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("invalid date '{0}', use the YYYY-MM-DD format")]
    MalformedDate(String),

    #[error("appointments cannot be booked on past dates ({0})")]
    PastDate(NaiveDate),

    #[error("appointments cannot be booked on holidays ({0})")]
    Holiday(NaiveDate),

    #[error("the salon is closed on {} ({date})", weekday_name(.weekday))]
    ClosedWeekday { date: NaiveDate, weekday: Weekday },

    #[error("appointments cannot be booked more than {horizon_days} days ahead ({date} is after {limit})")]
    BeyondHorizon {
        date: NaiveDate,
        limit: NaiveDate,
        horizon_days: i64,
    },

    #[error("invalid time '{0}', only on-the-hour or half-past times between 10:00 and 18:00 are bookable")]
    InvalidTimeSlot(String),

    #[error("appointments must be booked at least {hours} hours in advance")]
    InsufficientLeadTime { hours: i64 },

    #[error("invalid client name: {0}")]
    InvalidClientName(TypeError),

    #[error("unknown category '{0}'")]
    UnknownCategory(String),

    #[error("service '{service}' is not offered under {category}")]
    UnknownService { category: Category, service: String },

    #[error("{name} already has an appointment on {date} at {time}")]
    Duplicate {
        name: String,
        date: NaiveDate,
        time: TimeSlot,
    },

    #[error("there are already {capacity} appointments for {category} on {date} at {time}")]
    CapacityExceeded {
        category: Category,
        date: NaiveDate,
        time: TimeSlot,
        capacity: usize,
    },
}

impl Rejection {
    pub fn kind(&self) -> RejectionKind {
        match self {
            Rejection::MalformedDate(_)
            | Rejection::InvalidTimeSlot(_)
            | Rejection::UnknownCategory(_)
            | Rejection::UnknownService { .. } => RejectionKind::MalformedInput,
            Rejection::PastDate(_)
            | Rejection::Holiday(_)
            | Rejection::ClosedWeekday { .. }
            | Rejection::BeyondHorizon { .. }
            | Rejection::InsufficientLeadTime { .. }
            | Rejection::InvalidClientName(_) => RejectionKind::PolicyViolation,
            Rejection::Duplicate { .. } | Rejection::CapacityExceeded { .. } => {
                RejectionKind::Conflict
            }
        }
    }
}

fn weekday_name(weekday: &Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mondays",
        Weekday::Tue => "Tuesdays",
        Weekday::Wed => "Wednesdays",
        Weekday::Thu => "Thursdays",
        Weekday::Fri => "Fridays",
        Weekday::Sat => "Saturdays",
        Weekday::Sun => "Sundays",
    }
}

/// A proposal that passed every rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedSlot {
    pub client_name: ClientName,
    pub category: Category,
    pub service: String,
    pub date: NaiveDate,
    pub time: TimeSlot,
}

impl ValidatedSlot {
    /// Canonical stored form of the date.
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    pub fn into_appointment(self, id: u32) -> Appointment {
        Appointment {
            id,
            date: self.date_string(),
            time: self.time.to_string(),
            client_name: self.client_name.into_inner(),
            category: self.category.as_wire().to_string(),
            service: self.service,
        }
    }
}

pub fn well_formed_date(raw: &str) -> Result<NaiveDate, Rejection> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| Rejection::MalformedDate(raw.to_string()))
}

/// The date must be today or later. Only the calendar date is compared.
pub fn not_past(date: NaiveDate, today: NaiveDate) -> Result<(), Rejection> {
    if date < today {
        return Err(Rejection::PastDate(date));
    }
    Ok(())
}

pub fn not_holiday(date: NaiveDate, holidays: &HolidaySet) -> Result<(), Rejection> {
    if holidays.contains(date) {
        return Err(Rejection::Holiday(date));
    }
    Ok(())
}

pub fn valid_weekday(date: NaiveDate, policy: &SchedulingPolicy) -> Result<(), Rejection> {
    let weekday = date.weekday();
    if policy.closed_weekdays.contains(&weekday) {
        return Err(Rejection::ClosedWeekday { date, weekday });
    }
    Ok(())
}

/// The date may be at most `horizon_days` after today, boundary included.
pub fn within_horizon(
    date: NaiveDate,
    today: NaiveDate,
    policy: &SchedulingPolicy,
) -> Result<(), Rejection> {
    let limit = today
        .checked_add_signed(Duration::days(policy.horizon_days))
        .unwrap_or(NaiveDate::MAX);
    if date > limit {
        return Err(Rejection::BeyondHorizon {
            date,
            limit,
            horizon_days: policy.horizon_days,
        });
    }
    Ok(())
}

pub fn valid_time_slot(raw: &str) -> Result<TimeSlot, Rejection> {
    TimeSlot::parse(raw.trim()).map_err(|_| Rejection::InvalidTimeSlot(raw.to_string()))
}

/// The slot must start at least `policy.lead_time` after `now`.
///
/// Compared at minute precision: the seconds of `now` are dropped.
pub fn lead_time(
    date: NaiveDate,
    time: TimeSlot,
    now: NaiveDateTime,
    policy: &SchedulingPolicy,
) -> Result<(), Rejection> {
    let starts_at = date
        .and_hms_opt(time.hour(), time.minute(), 0)
        .ok_or_else(|| Rejection::InvalidTimeSlot(time.to_string()))?;
    let now = now
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now);

    if starts_at < now + policy.lead_time {
        return Err(Rejection::InsufficientLeadTime {
            hours: policy.lead_time.num_hours(),
        });
    }
    Ok(())
}

pub fn valid_client_name(raw: &str) -> Result<ClientName, Rejection> {
    ClientName::new(raw).map_err(Rejection::InvalidClientName)
}

/// The category must exist and offer the requested service.
pub fn known_service(category: &str, service: &str) -> Result<Category, Rejection> {
    let parsed = Category::from_wire(category.trim())
        .ok_or_else(|| Rejection::UnknownCategory(category.to_string()))?;
    if !parsed.offers(service.trim()) {
        return Err(Rejection::UnknownService {
            category: parsed,
            service: service.to_string(),
        });
    }
    Ok(parsed)
}

/// The client must not already hold an appointment at the same date and time.
pub fn not_duplicate(
    records: &[Appointment],
    client_name: &ClientName,
    date: NaiveDate,
    time: TimeSlot,
) -> Result<(), Rejection> {
    let key = client_name.normalized();
    let clash = records
        .iter()
        .any(|r| normalize_name(&r.client_name) == key && r.occupies(date, time));
    if clash {
        return Err(Rejection::Duplicate {
            name: client_name.to_string(),
            date,
            time,
        });
    }
    Ok(())
}

/// Fewer than `policy.slot_capacity` bookings may already share the category and slot.
pub fn capacity(
    records: &[Appointment],
    category: Category,
    date: NaiveDate,
    time: TimeSlot,
    policy: &SchedulingPolicy,
) -> Result<(), Rejection> {
    if count_matching(records, category.as_wire(), date, time) >= policy.slot_capacity {
        return Err(Rejection::CapacityExceeded {
            category,
            date,
            time,
            capacity: policy.slot_capacity,
        });
    }
    Ok(())
}

/// Runs every rule in order and returns the first failure.
///
/// `others` must not contain the appointment being moved when this is called for a
/// modification, so the appointment cannot conflict with itself.
pub fn validate(
    proposal: &Proposal,
    others: &[Appointment],
    holidays: &HolidaySet,
    policy: &SchedulingPolicy,
    now: NaiveDateTime,
) -> Result<ValidatedSlot, Rejection> {
    let today = now.date();

    let date = well_formed_date(&proposal.date)?;
    not_past(date, today)?;
    not_holiday(date, holidays)?;
    valid_weekday(date, policy)?;
    within_horizon(date, today, policy)?;

    let time = valid_time_slot(&proposal.time)?;
    lead_time(date, time, now, policy)?;

    let client_name = valid_client_name(&proposal.client_name)?;
    let category = known_service(&proposal.category, &proposal.service)?;

    not_duplicate(others, &client_name, date, time)?;
    capacity(others, category, date, time, policy)?;

    Ok(ValidatedSlot {
        client_name,
        category,
        service: proposal.service.trim().to_string(),
        date,
        time,
    })
}
