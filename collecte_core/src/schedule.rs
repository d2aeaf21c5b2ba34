//! Yearly collection schedules and the seeding of a store from them.
//!
//! Schedules are hand-curated per municipality and kept as TOML files:
//!
//! ```toml
//! annee = 2026
//! commune = "Pont-sur-Yonne (Bourg)"
//! jaune = ["2026-01-07", "2026-01-14"]
//! gris = ["2026-01-03"]
//!
//! [[feries]]
//! date = "2026-01-01"
//! nom = "Jour de l'An"
//! ```

use std::{collections::HashSet, fs, path::Path};

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use tracing::info;

use crate::{
    model::CollectionType,
    store::{ScheduleStore, StoreError},
};

static BUILTIN_2026: &str = include_str!("../data/2026.toml");

#[derive(thiserror::Error, Debug)]
pub enum ScheduleError {
    #[error("Cannot read schedule: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid schedule: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Date {date} does not belong to year {year}")]
    YearMismatch { date: NaiveDate, year: i32 },
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScheduledHoliday {
    pub date: NaiveDate,
    #[serde(rename = "nom")]
    pub name: String,
}

/// The collection schedule of one year.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Schedule {
    #[serde(rename = "annee")]
    pub year: i32,
    #[serde(rename = "commune", default)]
    pub municipality: Option<String>,
    #[serde(rename = "jaune", default)]
    pub yellow: Vec<NaiveDate>,
    #[serde(rename = "gris", default)]
    pub grey: Vec<NaiveDate>,
    #[serde(rename = "feries", default)]
    pub holidays: Vec<ScheduledHoliday>,
}

/// Counts of what a seeding run wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub year: i32,
    pub yellow: usize,
    pub grey: usize,
    pub merged: usize,
    pub holidays: usize,
}

impl Schedule {
    /// Parse and check a schedule.
    pub fn from_toml(source: &str) -> Result<Self, ScheduleError> {
        let schedule: Schedule = toml::from_str(source)?;
        schedule.check_year()?;
        Ok(schedule)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScheduleError> {
        Self::from_toml(&fs::read_to_string(path)?)
    }

    /// The 2026 schedule of Pont-sur-Yonne (Bourg).
    pub fn builtin() -> Result<Self, ScheduleError> {
        Self::from_toml(BUILTIN_2026)
    }

    fn check_year(&self) -> Result<(), ScheduleError> {
        let dates = self
            .yellow
            .iter()
            .chain(self.grey.iter())
            .chain(self.holidays.iter().map(|holiday| &holiday.date));
        for date in dates {
            if date.year() != self.year {
                return Err(ScheduleError::YearMismatch {
                    date: *date,
                    year: self.year,
                });
            }
        }
        Ok(())
    }
}

/// Replace the schedule's year in `store` with the schedule's content.
///
/// Yellow dates are written first; a grey date landing on an existing yellow
/// date merges into a single `jaune+gris` event.
pub async fn seed<S>(store: &S, schedule: &Schedule) -> Result<SeedReport, ScheduleError>
where
    S: ScheduleStore + ?Sized,
{
    store.delete_year(schedule.year).await?;
    let mut report = SeedReport {
        year: schedule.year,
        ..SeedReport::default()
    };

    let mut holiday_dates = HashSet::new();
    for holiday in &schedule.holidays {
        store.insert_holiday(holiday.date, &holiday.name).await?;
        holiday_dates.insert(holiday.date);
        report.holidays += 1;
    }

    for date in &schedule.yellow {
        let is_holiday = holiday_dates.contains(date);
        store
            .upsert_collection(*date, CollectionType::Yellow, is_holiday)
            .await?;
        report.yellow += 1;
    }

    for date in &schedule.grey {
        let is_holiday = holiday_dates.contains(date);
        let event = store
            .upsert_collection(*date, CollectionType::Grey, is_holiday)
            .await?;
        if event.collection_type.has_yellow() {
            report.merged += 1;
        }
        report.grey += 1;
    }

    info!(
        year = report.year,
        yellow = report.yellow,
        grey = report.grey,
        merged = report.merged,
        holidays = report.holidays,
        "seeded collection schedule"
    );
    Ok(report)
}
