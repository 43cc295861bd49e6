use crate::TypeError;
use std::fmt;
use std::str::FromStr;

/// A bookable wall-clock time: on the hour or half past, from 10:00 to 18:00 inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot {
    minutes: u16,
}

impl TimeSlot {
    const OPENING_MINUTES: u16 = 10 * 60;
    const CLOSING_MINUTES: u16 = 18 * 60;
    const STEP_MINUTES: u16 = 30;

    /// Number of distinct slots in a day.
    pub const COUNT: usize =
        ((Self::CLOSING_MINUTES - Self::OPENING_MINUTES) / Self::STEP_MINUTES) as usize + 1;

    /// Iterates over every slot of the day in chronological order.
    pub fn all() -> impl Iterator<Item = TimeSlot> {
        (Self::OPENING_MINUTES..=Self::CLOSING_MINUTES)
            .step_by(Self::STEP_MINUTES as usize)
            .map(|minutes| TimeSlot { minutes })
    }

    /// Parses a slot written exactly as `HH:MM`.
    ///
    /// Only the canonical zero-padded spelling is accepted, so `9:30` or `10:0` are
    /// rejected even though they name a plausible time.
    pub fn parse(input: &str) -> Result<Self, TypeError> {
        let (h, m) = input
            .split_once(':')
            .filter(|(h, m)| h.len() == 2 && m.len() == 2)
            .ok_or_else(|| TypeError::InvalidTimeSlot(input.to_string()))?;

        let hour: u16 = h
            .parse()
            .map_err(|_| TypeError::InvalidTimeSlot(input.to_string()))?;
        let minute: u16 = m
            .parse()
            .map_err(|_| TypeError::InvalidTimeSlot(input.to_string()))?;

        let minutes = hour * 60 + minute;
        Self::all()
            .find(|slot| slot.minutes == minutes && minute < 60)
            .ok_or_else(|| TypeError::InvalidTimeSlot(input.to_string()))
    }

    pub fn hour(self) -> u32 {
        u32::from(self.minutes / 60)
    }

    pub fn minute(self) -> u32 {
        u32::from(self.minutes % 60)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeSlot {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for TimeSlot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for TimeSlot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        TimeSlot::parse(&s).map_err(serde::de::Error::custom)
    }
}
