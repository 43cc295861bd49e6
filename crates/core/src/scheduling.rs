//! Scheduling service.
//!
//! [`SchedulingService`] is the only entry point adapters use to change the
//! appointment document. Each mutating call reads the document, runs the rule
//! pipeline from [`crate::rules`], and either writes the whole document back or
//! returns a single reason and leaves the file untouched.
//!
//! Every time-sensitive operation has an `*_as_of` form that takes the current
//! moment explicitly; the plain form uses the local clock.

use crate::appointment::{or_placeholder, Appointment, Proposal};
use crate::constants::{
    PLACEHOLDER_CATEGORY, PLACEHOLDER_DATE, PLACEHOLDER_NAME, PLACEHOLDER_SERVICE,
    PLACEHOLDER_TIME,
};
use crate::holidays::HolidaySet;
use crate::rules::{self, Rejection};
use crate::statistics::Statistics;
use crate::store::{self, AppointmentStore};
use crate::{CoreConfig, SalonError, SalonResult};
use chrono::NaiveDateTime;
use std::sync::Arc;

/// Line returned by [`SearchOutcome::lines`] when nothing matched.
pub const NO_RESULTS_MESSAGE: &str = "No appointments found for that name.";

/// Result of a name search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Vec<Appointment>),
    NoResults,
}

impl SearchOutcome {
    /// One line per match: `name - category - service - date - time`.
    pub fn lines(&self) -> Vec<String> {
        match self {
            SearchOutcome::NoResults => vec![NO_RESULTS_MESSAGE.to_string()],
            SearchOutcome::Found(records) => records
                .iter()
                .map(|r| {
                    format!(
                        "{} - {} - {} - {} - {}",
                        or_placeholder(&r.client_name, PLACEHOLDER_NAME),
                        or_placeholder(&r.category, PLACEHOLDER_CATEGORY),
                        or_placeholder(&r.service, PLACEHOLDER_SERVICE),
                        or_placeholder(&r.date, PLACEHOLDER_DATE),
                        or_placeholder(&r.time, PLACEHOLDER_TIME),
                    )
                })
                .collect(),
        }
    }
}

/// Booking operations over the configured appointment document.
#[derive(Clone, Debug)]
pub struct SchedulingService {
    cfg: Arc<CoreConfig>,
    holidays: Arc<HolidaySet>,
    store: AppointmentStore,
}

impl SchedulingService {
    pub fn new(cfg: Arc<CoreConfig>, holidays: Arc<HolidaySet>) -> Self {
        let store = AppointmentStore::new(cfg.appointments_path());
        Self {
            cfg,
            holidays,
            store,
        }
    }

    pub fn store(&self) -> &AppointmentStore {
        &self.store
    }

    pub fn holidays(&self) -> &HolidaySet {
        &self.holidays
    }

    /// Every appointment in document order.
    pub fn list(&self) -> Vec<Appointment> {
        self.store.load()
    }

    /// Books `proposal` using the local clock.
    pub fn create(&self, proposal: &Proposal) -> SalonResult<Appointment> {
        self.create_as_of(proposal, local_now())
    }

    /// Books `proposal` as of `now`.
    ///
    /// # Errors
    ///
    /// Returns `SalonError::Rejected` with the first failing rule,
    /// `SalonError::InvalidInput` if no unused id is left above the highest one, or
    /// `SalonError::FileWrite` if the document could not be saved. The document is
    /// unchanged in every case.
    pub fn create_as_of(&self, proposal: &Proposal, now: NaiveDateTime) -> SalonResult<Appointment> {
        let mut records = self.store.load();
        let slot = self.check(proposal, &records, now)?;

        let appointment = slot.into_appointment(store::next_id(&records)?);
        records.push(appointment.clone());
        self.store.save(&records)?;

        tracing::info!(
            "booked appointment {} for {} on {} at {}",
            appointment.id,
            appointment.client_name,
            appointment.date,
            appointment.time
        );
        Ok(appointment)
    }

    /// Removes every appointment whose client name equals `client_name` exactly.
    ///
    /// Returns the removed appointments.
    ///
    /// # Errors
    ///
    /// Returns `SalonError::NotFound` if no appointment matches.
    pub fn cancel(&self, client_name: &str) -> SalonResult<Vec<Appointment>> {
        let records = self.store.load();
        let (removed, kept): (Vec<_>, Vec<_>) = records
            .into_iter()
            .partition(|r| r.client_name == client_name);

        if removed.is_empty() {
            return Err(SalonError::NotFound(client_name.to_string()));
        }
        self.store.save(&kept)?;

        if removed.len() > 1 {
            tracing::warn!(
                "cancelled {} appointments sharing the name {}",
                removed.len(),
                client_name
            );
        } else {
            tracing::info!("cancelled appointment {} for {}", removed[0].id, client_name);
        }
        Ok(removed)
    }

    /// Removes exactly the appointment at 1-based `position` in [`Self::list`].
    ///
    /// # Errors
    ///
    /// Returns `SalonError::InvalidSelection` if `position` is outside the list.
    pub fn cancel_selected(&self, position: usize) -> SalonResult<Appointment> {
        let mut records = self.store.load();
        let index = selection_index(position, records.len())?;

        let removed = records.remove(index);
        self.store.save(&records)?;

        tracing::info!(
            "cancelled appointment {} for {}",
            removed.id,
            removed.client_name
        );
        Ok(removed)
    }

    /// Moves the first appointment named `client_name` using the local clock.
    pub fn modify(
        &self,
        client_name: &str,
        new_date: &str,
        new_time: &str,
    ) -> SalonResult<Appointment> {
        self.modify_as_of(client_name, new_date, new_time, local_now())
    }

    /// Moves the first appointment whose client name equals `client_name` exactly to
    /// `new_date` and `new_time`, as of `now`.
    ///
    /// The rules run against every other appointment, so the moved appointment
    /// never conflicts with itself.
    ///
    /// # Errors
    ///
    /// Returns `SalonError::NotFound` if no appointment matches, or
    /// `SalonError::Rejected` with the first failing rule.
    pub fn modify_as_of(
        &self,
        client_name: &str,
        new_date: &str,
        new_time: &str,
        now: NaiveDateTime,
    ) -> SalonResult<Appointment> {
        let records = self.store.load();
        let index = store::position_by_name(&records, client_name)
            .ok_or_else(|| SalonError::NotFound(client_name.to_string()))?;
        self.reschedule(records, index, new_date, new_time, now)
    }

    /// Moves the appointment at 1-based `position` using the local clock.
    pub fn modify_selected(
        &self,
        position: usize,
        new_date: &str,
        new_time: &str,
    ) -> SalonResult<Appointment> {
        self.modify_selected_as_of(position, new_date, new_time, local_now())
    }

    /// Moves the appointment at 1-based `position` in [`Self::list`], as of `now`.
    pub fn modify_selected_as_of(
        &self,
        position: usize,
        new_date: &str,
        new_time: &str,
        now: NaiveDateTime,
    ) -> SalonResult<Appointment> {
        let records = self.store.load();
        let index = selection_index(position, records.len())?;
        self.reschedule(records, index, new_date, new_time, now)
    }

    /// Appointments whose client name contains `fragment`, ignoring case.
    pub fn search(&self, fragment: &str) -> SearchOutcome {
        let records = self.store.load();
        let matches: Vec<Appointment> = store::find_all_by_name_substring(&records, fragment)
            .into_iter()
            .cloned()
            .collect();

        if matches.is_empty() {
            SearchOutcome::NoResults
        } else {
            SearchOutcome::Found(matches)
        }
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::from_records(&self.store.load())
    }

    fn reschedule(
        &self,
        mut records: Vec<Appointment>,
        index: usize,
        new_date: &str,
        new_time: &str,
        now: NaiveDateTime,
    ) -> SalonResult<Appointment> {
        let current = records.remove(index);
        let proposal = Proposal::new(
            current.client_name.as_str(),
            current.category.as_str(),
            current.service.as_str(),
            new_date,
            new_time,
        );
        let slot = self.check(&proposal, &records, now)?;

        let updated = Appointment {
            date: slot.date_string(),
            time: slot.time.to_string(),
            ..current
        };
        records.insert(index, updated.clone());
        self.store.save(&records)?;

        tracing::info!(
            "moved appointment {} for {} to {} at {}",
            updated.id,
            updated.client_name,
            updated.date,
            updated.time
        );
        Ok(updated)
    }

    fn check(
        &self,
        proposal: &Proposal,
        others: &[Appointment],
        now: NaiveDateTime,
    ) -> Result<rules::ValidatedSlot, Rejection> {
        rules::validate(proposal, others, &self.holidays, self.cfg.policy(), now).map_err(
            |rejection| {
                tracing::debug!(
                    "rejected booking for '{}': {}",
                    proposal.client_name,
                    rejection
                );
                rejection
            },
        )
    }
}

fn selection_index(position: usize, len: usize) -> SalonResult<usize> {
    if position == 0 || position > len {
        return Err(SalonError::InvalidSelection { position, len });
    }
    Ok(position - 1)
}

fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}
