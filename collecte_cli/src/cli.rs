//! This module implements the commands of the CLI.

use std::{env::current_dir, fs::write, path::PathBuf, sync::Arc};

use anyhow::{anyhow, Context, Result};
use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand, ValueEnum};
use collecte_core::{
    chrono::{Datelike, Month, NaiveDateTime, Utc},
    ical::generator::Emitter,
    ical_export,
    model::CollectionType,
    period,
    schedule::{seed, Schedule},
    service::CollecteService,
    store::MemoryStore,
};
use tracing::debug;

use crate::render;

#[derive(Debug, Parser)]
#[command(about = "Waste collection calendar of Pont-sur-Yonne")]
pub struct Arguments {
    /// schedule files to read, the built-in 2026 schedule when none is given
    #[arg(long, global = true, value_delimiter = ',')]
    pub schedule: Vec<PathBuf>,
    /// the time zone defining "today"
    #[arg(long, global = true, default_value = "Europe/Paris")]
    pub timezone: String,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// show the collections of the current week
    Semaine,
    /// show the calendar of a month
    Mois {
        /// the month, 1 to 12
        #[arg(value_parser = clap::value_parser!(u8).range(1..=12))]
        mois: u8,
        /// the year, the current one by default
        #[arg(long)]
        annee: Option<i32>,
    },
    /// show the next collection
    Prochaine {
        /// only consider this bin
        #[arg(long = "type", value_enum)]
        bin: Option<Bin>,
    },
    /// write an iCalendar file
    Ical {
        #[command(flatten)]
        args: IcalArgs,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Bin {
    Jaune,
    Gris,
}

impl From<Bin> for CollectionType {
    fn from(value: Bin) -> Self {
        match value {
            Bin::Jaune => CollectionType::Yellow,
            Bin::Gris => CollectionType::Grey,
        }
    }
}

#[derive(Debug, Args)]
pub struct IcalArgs {
    /// the year, the current one by default
    #[arg(long)]
    pub annee: Option<i32>,
    /// exclude yellow bin collection dates
    #[arg(long)]
    pub exclure_jaune: bool,
    /// exclude grey bin collection dates
    #[arg(long)]
    pub exclure_gris: bool,
    /// where to write the calendar, `calendar.ics` in the current directory by default
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl From<&IcalArgs> for CollectionType {
    fn from(value: &IcalArgs) -> Self {
        let mut excluded = CollectionType::none();
        if value.exclure_jaune {
            excluded |= CollectionType::Yellow;
        }
        if value.exclure_gris {
            excluded |= CollectionType::Grey;
        }
        excluded
    }
}

pub async fn run(arguments: Arguments) -> Result<()> {
    let timezone: Tz = arguments
        .timezone
        .parse()
        .map_err(|err| anyhow!("invalid time zone `{}`: {err}", arguments.timezone))?;
    let now = Utc::now().with_timezone(&timezone).naive_local();
    let service = load_service(&arguments.schedule).await?;
    let output = execute(&service, arguments.command, now).await?;
    print!("{output}");
    Ok(())
}

/// Run `command` as of `now` and return what to print.
async fn execute(
    service: &CollecteService,
    command: Command,
    now: NaiveDateTime,
) -> Result<String> {
    let output = match command {
        Command::Semaine => render::week(&service.current_week_summary(now).await?),
        Command::Mois { mois, annee } => {
            let month = Month::try_from(mois).map_err(|_| anyhow!("invalid month {mois}"))?;
            let year = annee.unwrap_or(now.year());
            render::month(&service.month_summary(year, month).await?)
        }
        Command::Prochaine { bin } => {
            match service.next_collection(now, bin.map(CollectionType::from)).await? {
                Some(event) => format!("Prochaine collecte : {}\n", render::event_line(&event)),
                None => String::from("Aucune collecte à venir\n"),
            }
        }
        Command::Ical { args } => {
            let path = write_ical(service, &args, now).await?;
            format!("Calendrier écrit dans {}\n", path.display())
        }
    };
    Ok(output)
}

async fn write_ical(
    service: &CollecteService,
    args: &IcalArgs,
    now: NaiveDateTime,
) -> Result<PathBuf> {
    let year = args.annee.unwrap_or(now.year());
    let year_period = period::year_period(year).ok_or_else(|| anyhow!("invalid year {year}"))?;
    let events = service.collections_in_range(&year_period).await?;
    let changed = now.format("%Y%m%dT%H%M%S").to_string();
    let calendar = ical_export::calendar(&events, CollectionType::from(args), &changed);
    let path = match &args.output {
        Some(path) => path.clone(),
        None => {
            let mut path = current_dir()?;
            path.push("calendar.ics");
            path
        }
    };
    write(&path, calendar.generate())?;
    Ok(path)
}

async fn load_service(schedules: &[PathBuf]) -> Result<CollecteService> {
    let store = MemoryStore::new();
    if schedules.is_empty() {
        seed(&store, &Schedule::builtin()?).await?;
    }
    for path in schedules {
        let schedule = Schedule::load(path)
            .with_context(|| format!("cannot load schedule {}", path.display()))?;
        let report = seed(&store, &schedule).await?;
        debug!(path = %path.display(), year = report.year, "loaded schedule");
    }
    Ok(CollecteService::new(Arc::new(store)))
}

#[cfg(test)]
mod tests {
    use std::env::temp_dir;

    use collecte_core::chrono::NaiveDate;

    use super::*;

    fn friday() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_arguments() {
        let arguments =
            Arguments::try_parse_from(["collecte_cli", "prochaine", "--type", "jaune"]).unwrap();
        assert!(matches!(
            arguments.command,
            Command::Prochaine { bin: Some(Bin::Jaune) }
        ));
        assert!(Arguments::try_parse_from(["collecte_cli", "mois", "13"]).is_err());
        let arguments = Arguments::try_parse_from(["collecte_cli", "mois", "2", "--annee", "2026"])
            .unwrap();
        assert!(matches!(
            arguments.command,
            Command::Mois { mois: 2, annee: Some(2026) }
        ));
    }

    #[tokio::test]
    async fn test_execute_week_and_next() {
        let service = load_service(&[]).await.unwrap();
        let week = execute(&service, Command::Semaine, friday()).await.unwrap();
        assert!(week.contains("Cette semaine : collecte des bacs jaune ET gris !"));
        assert!(week.contains("2 collectes prévues"));

        let next = execute(&service, Command::Prochaine { bin: Some(Bin::Jaune) }, friday())
            .await
            .unwrap();
        assert_eq!(
            next,
            "Prochaine collecte : mercredi 21 octobre 2026 : bac jaune\n"
        );
    }

    #[tokio::test]
    async fn test_execute_ical() {
        let service = load_service(&[]).await.unwrap();
        let output = temp_dir().join("collecte_cli_test_calendar.ics");
        let args = IcalArgs {
            annee: Some(2026),
            exclure_jaune: true,
            exclure_gris: false,
            output: Some(output.clone()),
        };
        execute(&service, Command::Ical { args }, friday()).await.unwrap();
        let ics = std::fs::read_to_string(&output).unwrap();
        assert!(ics.contains("SUMMARY:Bac gris"));
        assert!(!ics.contains("SUMMARY:Bac jaune"));
        let _ = std::fs::remove_file(output);
    }
}
