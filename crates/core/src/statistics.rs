//! Booking statistics.

use crate::appointment::{or_placeholder, Appointment};
use crate::constants::{PLACEHOLDER_CATEGORY, PLACEHOLDER_NAME};
use std::collections::BTreeMap;
use std::fmt;

/// Part of the day an appointment falls in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeBand {
    /// 10:00 to 15:00 inclusive.
    Morning,
    /// 15:30 to 18:00 inclusive.
    Afternoon,
    /// Anything else, including unreadable times.
    Other,
}

impl TimeBand {
    pub const ALL: [TimeBand; 3] = [TimeBand::Morning, TimeBand::Afternoon, TimeBand::Other];

    /// Classify a stored `H:MM` / `HH:MM` time.
    pub fn classify(time: &str) -> Self {
        let minutes = time.trim().split_once(':').and_then(|(h, m)| {
            let h: u32 = h.trim().parse().ok()?;
            let m: u32 = m.trim().parse().ok()?;
            (m < 60).then_some(h * 60 + m)
        });

        match minutes {
            Some(600..=900) => TimeBand::Morning,
            Some(930..=1080) => TimeBand::Afternoon,
            _ => TimeBand::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeBand::Morning => "Morning (10:00-15:00)",
            TimeBand::Afternoon => "Afternoon (15:30-18:00)",
            TimeBand::Other => "Other times",
        }
    }
}

impl fmt::Display for TimeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Aggregate counts over a set of appointments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
    pub total: usize,
    pub by_category: BTreeMap<String, usize>,
    pub by_band: BTreeMap<TimeBand, usize>,
    /// Appointments per client, in order of first appearance.
    client_counts: Vec<(String, usize)>,
}

impl Statistics {
    pub fn from_records(records: &[Appointment]) -> Self {
        let mut stats = Statistics {
            total: records.len(),
            ..Statistics::default()
        };

        for record in records {
            let category = or_placeholder(&record.category, PLACEHOLDER_CATEGORY);
            *stats.by_category.entry(category.to_string()).or_insert(0) += 1;
            *stats
                .by_band
                .entry(TimeBand::classify(&record.time))
                .or_insert(0) += 1;

            let name = or_placeholder(&record.client_name, PLACEHOLDER_NAME);
            match stats.client_counts.iter_mut().find(|(n, _)| n == name) {
                Some((_, count)) => *count += 1,
                None => stats.client_counts.push((name.to_string(), 1)),
            }
        }

        stats
    }

    /// The `n` clients with the most appointments, busiest first.
    ///
    /// Ties keep the order in which the clients first appear in the document.
    pub fn top_clients(&self, n: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .client_counts
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        // Stable sort keeps first-appearance order among equal counts.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }

    pub fn band_count(&self, band: TimeBand) -> usize {
        self.by_band.get(&band).copied().unwrap_or(0)
    }
}
