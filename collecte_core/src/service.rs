//! Lookups answering "what is collected when" over an injected store.

use std::sync::Arc;

use chrono::{Month, NaiveDate, NaiveDateTime};

use crate::{
    model::{CollectionEvent, CollectionType, Holiday},
    period::{self, Period},
    store::{CollectionStore, StoreError},
};

#[derive(thiserror::Error, Debug)]
pub enum LookupError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Year {0} is out of range")]
    YearOutOfRange(i32),
}

/// Collections of one week and which bins they concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekSummary {
    pub period: Period,
    pub events: Vec<CollectionEvent>,
    pub has_yellow: bool,
    pub has_grey: bool,
}

/// Collections of one month alongside the holidays of its whole year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthSummary {
    pub year: i32,
    pub month: Month,
    pub events: Vec<CollectionEvent>,
    pub holidays: Vec<Holiday>,
}

/// Public entry point for calendar lookups.
#[derive(Clone)]
pub struct CollecteService {
    store: Arc<dyn CollectionStore>,
}

impl CollecteService {
    pub fn new(store: Arc<dyn CollectionStore>) -> Self {
        Self { store }
    }

    /// Events inside `period`, ascending by date, bounds included.
    pub async fn collections_in_range(
        &self,
        period: &Period,
    ) -> Result<Vec<CollectionEvent>, LookupError> {
        let mut events = self
            .store
            .collections_between(period.first_day(), period.last_day())
            .await?;
        events.retain(|event| period.contains_day(event.date));
        events.sort_by_key(|event| event.date);
        Ok(events)
    }

    pub async fn holidays_for_year(&self, year: i32) -> Result<Vec<Holiday>, LookupError> {
        let mut holidays = self.store.holidays_for_year(year).await?;
        holidays.sort_by_key(|holiday| holiday.date);
        Ok(holidays)
    }

    pub async fn week_summary(&self, period: Period) -> Result<WeekSummary, LookupError> {
        let events = self.collections_in_range(&period).await?;
        let has_yellow = events
            .iter()
            .any(|event| event.collection_type.has_yellow());
        let has_grey = events.iter().any(|event| event.collection_type.has_grey());
        Ok(WeekSummary {
            period,
            events,
            has_yellow,
            has_grey,
        })
    }

    /// Summary of the Monday-to-Sunday week containing `now`.
    pub async fn current_week_summary(
        &self,
        now: NaiveDateTime,
    ) -> Result<WeekSummary, LookupError> {
        self.week_summary(period::current_week(now)).await
    }

    pub async fn month_summary(
        &self,
        year: i32,
        month: Month,
    ) -> Result<MonthSummary, LookupError> {
        let period = period::month_period(year, month).ok_or(LookupError::YearOutOfRange(year))?;
        let events = self.collections_in_range(&period).await?;
        let holidays = self.holidays_for_year(year).await?;
        Ok(MonthSummary {
            year,
            month,
            events,
            holidays,
        })
    }

    pub async fn event_on_date(
        &self,
        date: NaiveDate,
    ) -> Result<Option<CollectionEvent>, LookupError> {
        Ok(self.store.collection_on(date).await?)
    }

    /// The earliest event on or after the calendar day of `after`.
    ///
    /// With a filter, only events carrying that bin qualify, so `jaune+gris`
    /// matches both filters.
    pub async fn next_collection(
        &self,
        after: NaiveDateTime,
        filter: Option<CollectionType>,
    ) -> Result<Option<CollectionEvent>, LookupError> {
        let mut events = self
            .store
            .collections_between(after.date(), NaiveDate::MAX)
            .await?;
        events.sort_by_key(|event| event.date);
        Ok(events.into_iter().find(|event| {
            event.date >= after.date()
                && filter.map_or(true, |bins| event.collection_type.contains(bins))
        }))
    }
}
