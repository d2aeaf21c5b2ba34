//! Plain-text rendering of weeks, months and single collections.

use std::fmt::Write;

use collecte_core::{
    chrono::{Datelike, Month, NaiveDate, Weekday},
    model::{CollectionEvent, Holiday},
    period,
    service::{MonthSummary, WeekSummary},
};

static WEEKDAYS: [&str; 7] = [
    "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche",
];
static MONTHS: [&str; 12] = [
    "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août", "septembre",
    "octobre", "novembre", "décembre",
];

fn weekday_name(weekday: Weekday) -> &'static str {
    WEEKDAYS[weekday.num_days_from_monday() as usize]
}

fn month_name(month: Month) -> &'static str {
    MONTHS[month.number_from_month() as usize - 1]
}

/// `mercredi 7 janvier 2026`
pub fn long_date(date: NaiveDate) -> String {
    let month = MONTHS[date.month0() as usize];
    format!(
        "{} {} {month} {}",
        weekday_name(date.weekday()),
        date.day(),
        date.year()
    )
}

fn bins(event: &CollectionEvent) -> &'static str {
    match (
        event.collection_type.has_yellow(),
        event.collection_type.has_grey(),
    ) {
        (true, true) => "bacs jaune et gris",
        (true, false) => "bac jaune",
        (false, true) => "bac gris",
        (false, false) => "aucun bac",
    }
}

pub fn event_line(event: &CollectionEvent) -> String {
    let mut line = format!("{} : {}", long_date(event.date), bins(event));
    if event.is_holiday {
        line.push_str(" (jour férié)");
    }
    line
}

/// The headline shown above a week's collections.
pub fn week_alert(summary: &WeekSummary) -> &'static str {
    match (summary.has_yellow, summary.has_grey) {
        (true, true) => "Cette semaine : collecte des bacs jaune ET gris !",
        (true, false) => "Cette semaine : collecte du bac jaune (emballages + papiers)",
        (false, true) => "Cette semaine : collecte du bac gris (ordures ménagères)",
        (false, false) => "Aucune collecte cette semaine",
    }
}

pub fn week(summary: &WeekSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Semaine du {} au {}",
        long_date(summary.period.first_day()),
        long_date(summary.period.last_day())
    );
    let _ = writeln!(out, "{}", week_alert(summary));
    match summary.events.len() {
        0 => {}
        1 => {
            let _ = writeln!(out, "1 collecte prévue");
        }
        count => {
            let _ = writeln!(out, "{count} collectes prévues");
        }
    }
    for event in &summary.events {
        let _ = writeln!(out, "  {}", event_line(event));
    }
    out
}

fn marker(date: NaiveDate, events: &[CollectionEvent], holidays: &[&Holiday]) -> &'static str {
    let holiday = holidays.iter().any(|holiday| holiday.date == date);
    let bins = events
        .iter()
        .find(|event| event.date == date)
        .map(|event| event.collection_type);
    match bins {
        Some(bins) if bins.has_yellow() && bins.has_grey() => "B",
        Some(bins) if bins.has_yellow() => "J",
        Some(bins) if bins.has_grey() => "G",
        _ if holiday => "*",
        _ => " ",
    }
}

/// A Monday-first grid of the month, then the month's holidays.
pub fn month(summary: &MonthSummary) -> String {
    let mut out = String::new();
    let Some(month_period) = period::month_period(summary.year, summary.month) else {
        return out;
    };
    // The summary carries the whole year's holidays.
    let holidays: Vec<&Holiday> = summary
        .holidays
        .iter()
        .filter(|holiday| month_period.contains_day(holiday.date))
        .collect();

    let _ = writeln!(out, "{} {}", month_name(summary.month), summary.year);
    let _ = writeln!(out, " lu  ma  me  je  ve  sa  di");
    let first = month_period.first_day();
    let offset = first.weekday().num_days_from_monday() as usize;
    let mut line = "    ".repeat(offset);
    for date in first.iter_days().take_while(|date| month_period.contains_day(*date)) {
        let _ = write!(
            line,
            "{:>3}{}",
            date.day(),
            marker(date, &summary.events, &holidays)
        );
        if date.weekday() == Weekday::Sun {
            let _ = writeln!(out, "{}", line.trim_end());
            line.clear();
        }
    }
    if !line.is_empty() {
        let _ = writeln!(out, "{}", line.trim_end());
    }
    let _ = writeln!(out, "J bac jaune  G bac gris  B jaune et gris  * jour férié");
    for holiday in holidays {
        let _ = writeln!(out, "  {} : {}", long_date(holiday.date), holiday.name);
    }
    out
}
