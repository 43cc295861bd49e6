//! # Salon Core
//!
//! Booking rules and appointment storage for the salon.
//!
//! This crate contains the scheduling logic and the JSON document it persists to:
//! - The ordered rule pipeline that accepts or refuses a booking
//! - Holiday blackout dates loaded from a hand-maintained document
//! - Reading and rewriting the appointment document, including older record shapes
//! - Search and statistics over the stored appointments
//!
//! **No interface concerns**: argument parsing, terminal output and CSV export
//! belong in `salon-cli` and `salon-export`.

pub mod appointment;
pub mod config;
pub mod constants;
pub mod error;
pub mod holidays;
pub mod rules;
pub mod scheduling;
pub mod statistics;
pub mod store;

pub use appointment::{Appointment, Proposal};
pub use config::{resolve_paths, CoreConfig, SchedulingPolicy};
pub use error::{SalonError, SalonResult};
pub use holidays::HolidaySet;
pub use rules::{Rejection, RejectionKind, ValidatedSlot};
pub use scheduling::{SchedulingService, SearchOutcome, NO_RESULTS_MESSAGE};
pub use statistics::{Statistics, TimeBand};
pub use store::AppointmentStore;

pub use salon_types::{Category, ClientName, TimeSlot};
