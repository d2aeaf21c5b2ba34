//! Storage ports for collection events and holidays, plus an in-memory store.

use std::{collections::BTreeMap, sync::RwLock};

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};

use crate::model::{CollectionEvent, CollectionType, Holiday};

#[derive(thiserror::Error, Debug)]
/// Errors raised by a store.
pub enum StoreError {
    /// The backing store cannot be reached or is in an inconsistent state.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    /// A holiday already exists for the date.
    #[error("Duplicate holiday on {0}")]
    DuplicateHoliday(NaiveDate),
}

#[async_trait]
/// Read access to the collection calendar.
pub trait CollectionStore: Send + Sync {
    /// Events whose date lies in `[first, last]`, ascending by date.
    async fn collections_between(
        &self,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<Vec<CollectionEvent>, StoreError>;

    /// The event on exactly `date`, if any.
    async fn collection_on(&self, date: NaiveDate) -> Result<Option<CollectionEvent>, StoreError>;

    /// Holidays of `year`, ascending by date.
    async fn holidays_for_year(&self, year: i32) -> Result<Vec<Holiday>, StoreError>;
}

#[async_trait]
/// Write access used by the seeding process.
pub trait ScheduleStore: CollectionStore {
    /// Remove every event and holiday of `year`.
    async fn delete_year(&self, year: i32) -> Result<(), StoreError>;

    async fn insert_holiday(&self, date: NaiveDate, name: &str) -> Result<Holiday, StoreError>;

    /// Record a pickup of `bins` on `date`.
    ///
    /// An existing event on the same date is merged: its bins become the union
    /// of both, so yellow and grey on one day end up as `jaune+gris`.
    async fn upsert_collection(
        &self,
        date: NaiveDate,
        bins: CollectionType,
        is_holiday: bool,
    ) -> Result<CollectionEvent, StoreError>;
}

#[derive(Debug, Default)]
struct Tables {
    collections: BTreeMap<NaiveDate, CollectionEvent>,
    holidays: BTreeMap<NaiveDate, Holiday>,
    next_collection_id: u32,
    next_holiday_id: u32,
}

/// A store keeping both tables in ordered maps keyed by date.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|err| StoreError::Unavailable(err.to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|err| StoreError::Unavailable(err.to_string()))
    }
}

#[async_trait]
impl CollectionStore for MemoryStore {
    async fn collections_between(
        &self,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<Vec<CollectionEvent>, StoreError> {
        if first > last {
            return Ok(vec![]);
        }
        let tables = self.read()?;
        Ok(tables
            .collections
            .range(first..=last)
            .map(|(_, event)| event.clone())
            .collect())
    }

    async fn collection_on(&self, date: NaiveDate) -> Result<Option<CollectionEvent>, StoreError> {
        Ok(self.read()?.collections.get(&date).cloned())
    }

    async fn holidays_for_year(&self, year: i32) -> Result<Vec<Holiday>, StoreError> {
        Ok(self
            .read()?
            .holidays
            .values()
            .filter(|holiday| holiday.year == year)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ScheduleStore for MemoryStore {
    async fn delete_year(&self, year: i32) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        tables.collections.retain(|date, _| date.year() != year);
        tables.holidays.retain(|date, _| date.year() != year);
        Ok(())
    }

    async fn insert_holiday(&self, date: NaiveDate, name: &str) -> Result<Holiday, StoreError> {
        let mut tables = self.write()?;
        if tables.holidays.contains_key(&date) {
            return Err(StoreError::DuplicateHoliday(date));
        }
        tables.next_holiday_id += 1;
        let holiday = Holiday::new(tables.next_holiday_id, date, name);
        tables.holidays.insert(date, holiday.clone());
        Ok(holiday)
    }

    async fn upsert_collection(
        &self,
        date: NaiveDate,
        bins: CollectionType,
        is_holiday: bool,
    ) -> Result<CollectionEvent, StoreError> {
        let mut tables = self.write()?;
        if let Some(existing) = tables.collections.get_mut(&date) {
            existing.collection_type |= bins;
            existing.is_holiday |= is_holiday;
            return Ok(existing.clone());
        }
        tables.next_collection_id += 1;
        let event = CollectionEvent::new(tables.next_collection_id, date, bins, is_holiday);
        tables.collections.insert(date, event.clone());
        Ok(event)
    }
}
