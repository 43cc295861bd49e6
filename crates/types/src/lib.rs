//! Validated domain primitives shared by the salon crates.
//!
//! Types in this crate guarantee their invariants once constructed, so code that
//! receives a [`ClientName`], [`TimeSlot`] or [`Category`] never needs to re-check
//! the raw text it came from.

mod catalog;
mod name;
mod slot;

pub use catalog::Category;
pub use name::{normalize_name, ClientName};
pub use slot::TimeSlot;

/// Errors that can occur when creating validated domain types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,

    /// The client name is shorter than the minimum length after trimming
    #[error("client name must have at least {min} characters")]
    NameTooShort { min: usize },

    /// The client name contains something other than letters and spaces
    #[error("client name may only contain letters and spaces (found '{0}')")]
    InvalidNameCharacter(char),

    /// The time is not one of the bookable half-hour slots
    #[error("'{0}' is not a bookable time slot")]
    InvalidTimeSlot(String),

    /// The category is not part of the service catalog
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
}
