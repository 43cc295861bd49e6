//! Constants used throughout the salon core crate.
//!
//! File names, business-rule defaults and the placeholder labels shown for fields
//! missing from legacy records live here so every consumer agrees on them.

/// Default appointment document, relative to the working directory.
pub const DEFAULT_APPOINTMENTS_FILE: &str = "clientes.json";

/// Default holiday document, relative to the working directory.
pub const DEFAULT_HOLIDAYS_FILE: &str = "feriados.json";

/// Date format used for storage and for parsing user input.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Maximum bookings sharing one category at one date and time.
pub const SLOT_CAPACITY: usize = 2;

/// Minimum hours between now and the start of a booking.
pub const LEAD_TIME_HOURS: i64 = 2;

/// Furthest a booking may be placed, in days after today (inclusive).
pub const BOOKING_HORIZON_DAYS: i64 = 120;

/// Number of clients listed in the statistics ranking.
pub const TOP_CLIENTS: usize = 5;

pub const PLACEHOLDER_ID: &str = "Sin ID";
pub const PLACEHOLDER_NAME: &str = "Desconocido";
pub const PLACEHOLDER_CATEGORY: &str = "Sin categoría";
pub const PLACEHOLDER_SERVICE: &str = "Sin servicio";
pub const PLACEHOLDER_DATE: &str = "Sin fecha";
pub const PLACEHOLDER_TIME: &str = "Sin hora";
