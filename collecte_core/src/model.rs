//! Collection events, holidays and the bin bitmask shared by every layer.

use std::{fmt, str::FromStr};

use bitmask_enum::bitmask;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

static LABEL_YELLOW: &str = "jaune";
static LABEL_GREY: &str = "gris";
static LABEL_BOTH: &str = "jaune+gris";

/// The bins picked up on a collection day.
///
/// A day with both pickups carries both flags and is labelled `jaune+gris`.
#[bitmask(u8)]
pub enum CollectionType {
    Yellow,
    Grey,
}

impl CollectionType {
    /// The French label used on the wire and in schedule files.
    pub fn label(self) -> &'static str {
        match (self.contains(Self::Yellow), self.contains(Self::Grey)) {
            (true, true) => LABEL_BOTH,
            (true, false) => LABEL_YELLOW,
            (false, true) => LABEL_GREY,
            (false, false) => "aucune",
        }
    }

    pub fn has_yellow(self) -> bool {
        self.contains(Self::Yellow)
    }

    pub fn has_grey(self) -> bool {
        self.contains(Self::Grey)
    }
}

impl fmt::Display for CollectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown collection type `{0}`")]
pub struct UnknownCollectionType(pub String);

impl FromStr for CollectionType {
    type Err = UnknownCollectionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "jaune" => Ok(Self::Yellow),
            "gris" => Ok(Self::Grey),
            "jaune+gris" | "gris+jaune" => Ok(Self::Yellow | Self::Grey),
            other => Err(UnknownCollectionType(other.to_string())),
        }
    }
}

impl Serialize for CollectionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for CollectionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(de::Error::custom)
    }
}

/// A scheduled pickup. At most one event exists per date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionEvent {
    pub id: u32,
    #[serde(serialize_with = "wire_date::serialize")]
    pub date: NaiveDate,
    #[serde(rename = "typeCollecte")]
    pub collection_type: CollectionType,
    #[serde(rename = "annee")]
    pub year: i32,
    #[serde(rename = "mois")]
    pub month: u32,
    #[serde(rename = "jour")]
    pub day: u32,
    #[serde(rename = "estFerie")]
    pub is_holiday: bool,
    pub description: Option<String>,
}

impl CollectionEvent {
    /// Build an event, denormalizing year, month and day from `date`.
    pub fn new(id: u32, date: NaiveDate, collection_type: CollectionType, is_holiday: bool) -> Self {
        Self {
            id,
            date,
            collection_type,
            year: date.year(),
            month: date.month(),
            day: date.day(),
            is_holiday,
            description: None,
        }
    }
}

/// A named public holiday. At most one holiday exists per date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Holiday {
    pub id: u32,
    #[serde(serialize_with = "wire_date::serialize")]
    pub date: NaiveDate,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "annee")]
    pub year: i32,
}

impl Holiday {
    pub fn new(id: u32, date: NaiveDate, name: impl Into<String>) -> Self {
        Self {
            id,
            date,
            name: name.into(),
            year: date.year(),
        }
    }
}

/// Parse a calendar date from an ISO date (`2026-01-07`) or an ISO timestamp.
///
/// Timestamps keep the date as written, whatever their time of day or offset.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date_time) = DateTime::parse_from_rfc3339(input) {
        return Some(date_time.date_naive());
    }
    NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|date_time| date_time.date())
}

/// Dates leave the service as full ISO-8601 UTC timestamps pinned at noon.
pub mod wire_date {
    use chrono::{NaiveDate, NaiveTime};
    use serde::Serializer;

    static FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

    pub fn format(date: &NaiveDate) -> String {
        date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default())
            .format(FORMAT)
            .to_string()
    }

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(date))
    }
}
