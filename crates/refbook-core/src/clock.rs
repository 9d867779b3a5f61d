//! Source of "today" for version resolution.

use std::sync::Arc;

use chrono::{Local, NaiveDate};

/// Supplies the current calendar date.
pub trait Clock: Send + Sync {
    /// Today's date in the service's time zone.
    fn today(&self) -> NaiveDate;
}

/// Shared clock handle.
pub type SharedClock = Arc<dyn Clock>;

/// Clock reading the local system time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a single date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Shared handle to the local clock.
pub fn local_clock() -> SharedClock {
    Arc::new(LocalClock)
}
