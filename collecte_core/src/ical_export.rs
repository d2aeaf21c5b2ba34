//! iCalendar export of a collection schedule.

use std::sync::OnceLock;

use chrono::NaiveDate;
use ical::{
    generator::{IcalCalendar, IcalCalendarBuilder, IcalEvent, IcalEventBuilder, Property},
    ical_param, ical_property,
};
use regex::Regex;

use crate::model::{CollectionEvent, CollectionType};

static PROD_ID: [&str; 2] = ["Calendrier des collectes", "pont-sur-yonne.fr"];
static TIMEZONE: &str = "Europe/Paris";
static FORMAT: &str = "%Y%m%d";
static LOCATION: &str = "Pont-sur-Yonne";

static LABEL_YELLOW: &str = "Bac jaune";
static LABEL_GREY: &str = "Bac gris";
static DESCRIPTION_YELLOW: &str = "Emballages et papiers";
static DESCRIPTION_GREY: &str = "Ordures ménagères";

/// Build a calendar with one recurring all-day event per bin.
///
/// Bins in `excluded` are left out; a `jaune+gris` day appears in both events.
pub fn calendar(
    events: &[CollectionEvent],
    excluded: CollectionType,
    changed: &str,
) -> IcalCalendar {
    let prod_id_label = if excluded == CollectionType::Grey {
        Some(LABEL_YELLOW)
    } else if excluded == CollectionType::Yellow {
        Some(LABEL_GREY)
    } else {
        None
    };
    let mut calendar = IcalCalendarBuilder::version("2.0")
        .gregorian()
        .prodid(prod_id(prod_id_label))
        .build();
    for (label, description, bins) in [
        (LABEL_YELLOW, DESCRIPTION_YELLOW, CollectionType::Yellow),
        (LABEL_GREY, DESCRIPTION_GREY, CollectionType::Grey),
    ] {
        if excluded.contains(bins) {
            continue;
        }
        let dates: Vec<NaiveDate> = events
            .iter()
            .filter(|event| event.collection_type.contains(bins))
            .map(|event| event.date)
            .collect();
        if let Some(event) = recurring_event(&dates, label, description, changed) {
            calendar.events.push(event);
        }
    }
    calendar
}

fn recurring_event(
    dates: &[NaiveDate],
    summary: &str,
    description: &str,
    changed: &str,
) -> Option<IcalEvent> {
    let first = dates.first()?;
    Some(
        IcalEventBuilder::tzid(TIMEZONE)
            .uid(uid(summary))
            .changed(changed)
            .one_day(first.format(FORMAT).to_string())
            .set(ical_property!("SUMMARY", summary))
            .set(ical_property!(
                "RDATE",
                dates
                    .iter()
                    .map(|date| date.format(FORMAT).to_string())
                    .collect::<Vec<String>>()
                    .join(","),
                ical_param!("VALUE", "DATE")
            ))
            .set(ical_property!("LOCATION", LOCATION))
            .set(ical_property!("DESCRIPTION", description))
            .set(ical_property!("TRANSP", "TRANSPARENT"))
            .build(),
    )
}

fn prod_id(label: Option<&str>) -> String {
    let mut parts: Vec<&str> = vec!["-"];
    parts.extend(label);
    parts.extend(PROD_ID);
    parts.join("//")
}

/// A stable id per bin.
///
/// Changing this function is a breaking change for subscribed calendars!
fn uid(summary: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    let whitespace =
        WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));
    let location = whitespace.replace_all(LOCATION, "-");
    let summary = whitespace.replace_all(summary, "-");
    format!("Collecte_{location}_{summary}@pont-sur-yonne.fr")
}
