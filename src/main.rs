use std::path::PathBuf;

use anyhow::Context;
use chrono::{Datelike, Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod api;
mod availability;
mod calendar;
mod conflict;
mod load;
mod models;
mod recurrence;
mod report;
mod semester;

use api::{ApiClient, Session};
use calendar::ScheduleFilter;
use models::{Activity, WeeklySchedule};

#[derive(Parser)]
#[command(name = "escola-calendario")]
#[command(about = "Class calendar, day timeline and scheduling checks for the school portal", long_about = None)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,
    #[command(subcommand)]
    command: Commands,
}

/// Where schedules and activities come from. Without files the REST API
/// configured through ESCOLA_API_URL is used.
#[derive(Args)]
struct SourceArgs {
    /// JSON export of the /aulas collection
    #[arg(long, global = true)]
    schedules: Option<PathBuf>,
    /// CSV export of weekly schedules
    #[arg(long, global = true)]
    schedules_csv: Option<PathBuf>,
    /// JSON export of the /atividades collection
    #[arg(long, global = true)]
    activities: Option<PathBuf>,
}

impl SourceArgs {
    fn uses_files(&self) -> bool {
        self.schedules.is_some() || self.schedules_csv.is_some() || self.activities.is_some()
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Render the calendar for a year, optionally one month
    Calendar {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
        #[arg(long)]
        turma: Option<String>,
        #[arg(long)]
        professor: Option<String>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show the timeline of a single day
    Day {
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        turma: Option<String>,
        #[arg(long)]
        professor: Option<String>,
    },
    /// Check whether a new weekly schedule overlaps an existing one
    Conflict {
        #[arg(long)]
        turma: String,
        #[arg(long)]
        materia: String,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=7))]
        dia: u32,
        #[arg(long)]
        semestre: String,
        #[arg(long)]
        inicio: String,
        #[arg(long)]
        fim: String,
    },
    /// List class dates still free for a new activity
    Available {
        #[arg(long)]
        turma: String,
        #[arg(long)]
        materia: String,
        #[arg(long)]
        semestre: String,
        #[arg(long)]
        year: Option<i32>,
    },
}

async fn load_data(source: &SourceArgs) -> anyhow::Result<(Vec<WeeklySchedule>, Vec<Activity>)> {
    if source.uses_files() {
        let mut schedules = Vec::new();
        if let Some(path) = &source.schedules {
            schedules.extend(load::load_schedules(path)?);
        }
        if let Some(path) = &source.schedules_csv {
            schedules.extend(load::import_schedules_csv(path)?);
        }
        let activities = match &source.activities {
            Some(path) => load::load_activities(path)?,
            None => Vec::new(),
        };
        return Ok((schedules, activities));
    }

    let base_url = std::env::var("ESCOLA_API_URL")
        .context("ESCOLA_API_URL must be set when no --schedules/--activities files are given")?;
    let token = std::env::var("ESCOLA_API_TOKEN").ok();
    let session = Session::new(&base_url, token).context("invalid ESCOLA_API_URL")?;
    let client = ApiClient::new(session).context("failed to set up the API client")?;

    let loaded = client
        .load_view()
        .await
        .context("failed to fetch schedules and activities")?;
    client
        .session()
        .accept(loaded)
        .context("view was superseded before its data arrived")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let (schedules, activities) = load_data(&cli.source).await?;
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Calendar {
            year,
            month,
            turma,
            professor,
            out,
        } => {
            let year = year.unwrap_or(today.year());
            let filter = ScheduleFilter {
                class_group: turma,
                teacher: professor,
            };
            let (schedules, activities) = filter.apply(&schedules, &activities);
            let events = calendar::events_in(
                &calendar::materialize_events(&schedules, &activities, year),
                year,
                month,
            );

            let heading = match month {
                Some(month) => format!("Calendar {year}-{month:02}"),
                None => format!("Calendar {year}"),
            };
            let agenda = report::render_agenda(&events, &heading);

            match out {
                Some(out) => {
                    std::fs::write(&out, agenda)
                        .with_context(|| format!("failed to write {}", out.display()))?;
                    println!("Calendar written to {}.", out.display());
                }
                None => print!("{agenda}"),
            }
        }
        Commands::Day {
            date,
            turma,
            professor,
        } => {
            let filter = ScheduleFilter {
                class_group: turma,
                teacher: professor,
            };
            let (schedules, activities) = filter.apply(&schedules, &activities);
            let events = calendar::materialize_events(&schedules, &activities, date.year());
            let entries = calendar::build_day_timeline(&calendar::events_on(&events, date));
            print!("{}", report::render_day(date, &entries));
        }
        Commands::Conflict {
            turma,
            materia,
            dia,
            semestre,
            inicio,
            fim,
        } => {
            let candidate = conflict::ScheduleCandidate {
                class_group_id: turma,
                subject_id: materia,
                day_of_week: dia,
                semester: semestre,
                start_time: inicio,
                end_time: fim,
            };

            if conflict::has_conflict(&candidate, &schedules) {
                println!(
                    "Conflict: another active class for this turma and materia overlaps {} - {}.",
                    candidate.start_time, candidate.end_time
                );
            } else {
                println!("No conflict found.");
            }
        }
        Commands::Available {
            turma,
            materia,
            semestre,
            year,
        } => {
            let scope = availability::SlotScope {
                class_group_id: turma,
                subject_id: materia,
                semester: semestre,
            };
            let offers = availability::available_dates(
                &scope,
                &schedules,
                &activities,
                today,
                year.unwrap_or(today.year()),
            );
            print!("{}", report::render_available(&offers));
        }
    }

    Ok(())
}
