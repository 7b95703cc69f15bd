//! NutriTrack CLI
//!
//! Command-line interface for logging meals and reading the dashboard.
//! Works directly against the local mirror and, when configured, the remote
//! store; no server needs to be running.

use anyhow::{bail, Context};
use chrono::Local;
use clap::{Parser, Subcommand};
use nutritrack::export::write_history_csv;
use nutritrack::logging::init_tracing;
use nutritrack::model::{format_date, parse_date};
use nutritrack::{
    AggregationResult, Config, DateRange, DayLog, HistoryEntry, Macros, MealSlot, Tracker,
    UserSettings, WriteOutcome,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nutritrack")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Calorie and macro tracker")]
#[command(long_about = "NutriTrack logs meals and exercise per day and shows your energy balance.\nMacros are given as calories[,protein[,carbs[,fat]]], e.g. 650,40,70,20")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record meals and exercise for a day (merges into the existing log)
    Log {
        /// Date (YYYY-MM-DD, default: today)
        date: Option<String>,
        #[arg(long)]
        breakfast: Option<Macros>,
        #[arg(long)]
        lunch: Option<Macros>,
        #[arg(long)]
        dinner: Option<Macros>,
        #[arg(long)]
        snack: Option<Macros>,
        /// Calories burned through exercise
        #[arg(short, long)]
        exercise: Option<f64>,
    },

    /// Show one day's log
    Show {
        /// Date (YYYY-MM-DD, default: today)
        date: Option<String>,
    },

    /// Delete one day's log
    Delete {
        date: String,
    },

    /// Show or update settings
    Settings {
        /// Basal metabolic rate (kcal/day)
        #[arg(long)]
        tmb: Option<f64>,
        /// Display name
        #[arg(long)]
        name: Option<String>,
    },

    /// Totals, balance and projected weight change
    Dashboard {
        #[arg(short, long)]
        start: Option<String>,
        #[arg(short, long)]
        end: Option<String>,
    },

    /// Per-day history, newest first
    History {
        #[arg(short, long)]
        start: Option<String>,
        #[arg(short, long)]
        end: Option<String>,
    },

    /// Written summary of a range
    Insight {
        #[arg(short, long)]
        start: Option<String>,
        #[arg(short, long)]
        end: Option<String>,
    },

    /// Export history as CSV
    Export {
        #[arg(short, long)]
        start: Option<String>,
        #[arg(short, long)]
        end: Option<String>,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the user id, or adopt another device's id
    Identity {
        /// User id to switch to
        #[arg(long)]
        set: Option<String>,
    },

    /// Show sync status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        return write_default_config(output.as_ref());
    }

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    init_tracing(&config.logging);

    let tracker = Tracker::from_config(&config).context("failed to open tracker")?;
    let loaded = tracker.load().await;
    if !loaded.online {
        tracing::warn!("Remote store unreachable, using local data");
    }

    let json = cli.format == "json";

    match cli.command {
        Commands::Log {
            date,
            breakfast,
            lunch,
            dinner,
            snack,
            exercise,
        } => {
            let date = date_or_today(date)?;
            let mut log = tracker
                .log(&date)
                .await
                .unwrap_or_else(|| DayLog::empty(&date));

            for (slot, macros) in [
                (MealSlot::Breakfast, breakfast),
                (MealSlot::Lunch, lunch),
                (MealSlot::Dinner, dinner),
                (MealSlot::Snack, snack),
            ] {
                if let Some(macros) = macros {
                    log.meals.set(slot, macros);
                }
            }
            if let Some(exercise) = exercise {
                log.exercise_calories = exercise;
            }

            let outcome = tracker.save_log(log.clone()).await?;
            if json {
                print_json(&log)?;
            } else {
                print_log(&log);
            }
            report(&outcome);
        }

        Commands::Show { date } => {
            let date = date_or_today(date)?;
            let log = tracker
                .log(&date)
                .await
                .unwrap_or_else(|| DayLog::empty(&date));
            if json {
                print_json(&log)?;
            } else {
                print_log(&log);
            }
        }

        Commands::Delete { date } => {
            let outcome = tracker.delete_log(&date).await?;
            println!("Deleted {}", date);
            report(&outcome);
        }

        Commands::Settings { tmb, name } => {
            let mut settings = tracker.settings().await;
            if tmb.is_some() || name.is_some() {
                settings = UserSettings {
                    tmb: tmb.unwrap_or(settings.tmb),
                    name: name.unwrap_or(settings.name),
                };
                let outcome = tracker.save_settings(settings.clone()).await?;
                report(&outcome);
            }
            if json {
                print_json(&settings)?;
            } else {
                println!("Name: {}", settings.name);
                println!("BMR:  {:.0} kcal/day", settings.tmb);
            }
        }

        Commands::Dashboard { start, end } => {
            let range = tracker.resolve_range(start.as_deref(), end.as_deref())?;
            let result = tracker.dashboard(&range).await;
            if json {
                print_json(&result)?;
            } else {
                print_dashboard(&range, &result);
            }
        }

        Commands::History { start, end } => {
            let range = tracker.resolve_range(start.as_deref(), end.as_deref())?;
            let entries = tracker.history(&range).await;
            if json {
                print_json(&entries)?;
            } else {
                print_history(&entries);
            }
        }

        Commands::Insight { start, end } => {
            let range = tracker.resolve_range(start.as_deref(), end.as_deref())?;
            println!("{}", tracker.generate_insight(&range).await);
        }

        Commands::Export { start, end, output } => {
            let range = tracker.resolve_range(start.as_deref(), end.as_deref())?;
            let entries = tracker.history(&range).await;

            match output {
                Some(path) => {
                    let file = std::fs::File::create(&path)
                        .with_context(|| format!("cannot create {:?}", path))?;
                    write_history_csv(&entries, file)?;
                    eprintln!("Exported {} days to {:?}", entries.len(), path);
                }
                None => write_history_csv(&entries, std::io::stdout().lock())?,
            }
        }

        Commands::Identity { set } => {
            if let Some(user_id) = set {
                let outcome = tracker.set_user_id(&user_id).await?;
                if !outcome.online {
                    eprintln!("Switched identity, but the remote store is unreachable");
                }
            }
            println!("{}", tracker.user_id().await);
        }

        Commands::Status => {
            let status = tracker.status().await;
            if json {
                print_json(&status)?;
            } else {
                println!("NutriTrack v{}", env!("CARGO_PKG_VERSION"));
                println!();
                println!("User:   {}", status.user_id);
                println!("Store:  {}", if status.online { "online" } else { "offline" });
                println!("Logs:   {}", status.log_count);
                if let Some(error) = status.last_error {
                    println!("Error:  {}", error);
                }
            }
        }

        // Handled before the tracker is opened
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn date_or_today(date: Option<String>) -> anyhow::Result<String> {
    match date {
        Some(date) => {
            parse_date(&date)?;
            Ok(date)
        }
        None => Ok(format_date(Local::now().date_naive())),
    }
}

fn write_default_config(output: Option<&PathBuf>) -> anyhow::Result<()> {
    let config = nutritrack::config::generate_default_config();

    match output {
        Some(path) => {
            if path.exists() {
                bail!("{:?} already exists", path);
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &config)?;
            println!("Config written to {:?}", path);
        }
        None => {
            print!("{}", config);
        }
    }
    Ok(())
}

fn report(outcome: &WriteOutcome) {
    match outcome {
        WriteOutcome::Synced => eprintln!("Saved"),
        WriteOutcome::LocalOnly { error } => {
            eprintln!("Saved locally; remote store unavailable ({})", error)
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_log(log: &DayLog) {
    println!("{}", log.date);
    println!("{}", "-".repeat(56));
    println!(
        "{:<10} {:>10} {:>10} {:>10} {:>10}",
        "Meal", "kcal", "Protein", "Carbs", "Fat"
    );
    for (slot, m) in log.meals.iter() {
        println!(
            "{:<10} {:>10.0} {:>10.1} {:>10.1} {:>10.1}",
            slot.as_str(),
            m.calories,
            m.protein,
            m.carbs,
            m.fat
        );
    }
    let total = nutritrack::engine::sum_macros(log);
    println!(
        "{:<10} {:>10.0} {:>10.1} {:>10.1} {:>10.1}",
        "total", total.calories, total.protein, total.carbs, total.fat
    );
    println!();
    println!("Exercise: {:.0} kcal", log.exercise_calories);
}

fn print_dashboard(range: &DateRange, r: &AggregationResult) {
    println!("{} to {} ({} days, {} logged)", range.start_date, range.end_date, r.days_count, r.log_count);
    println!();
    println!("Intake:         {:>10.0} kcal", r.totals.calories);
    println!("Basal burn:     {:>10.0} kcal", r.total_basal_burn);
    println!("Exercise burn:  {:>10.0} kcal", r.total_exercise_burn);
    println!("Total burned:   {:>10.0} kcal", r.total_burned);
    println!("Balance:        {:>+10.0} kcal", r.calorie_balance);
    println!("Basal balance:  {:>+10.0} kcal", r.basal_balance);
    println!("Weight change:  {:>+10.2} kg", r.weight_change_kg);
    println!();
    println!(
        "Macros: {:.0} g protein, {:.0} g carbs, {:.0} g fat",
        r.totals.protein, r.totals.carbs, r.totals.fat
    );
    println!(
        "Daily average: {:.0} kcal, {:.0} g protein, {:.0} g carbs, {:.0} g fat",
        r.daily_average.calories, r.daily_average.protein, r.daily_average.carbs, r.daily_average.fat
    );
}

fn print_history(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("No logs in the selected range");
        return;
    }

    println!(
        "{:<12} {:>10} {:>10} {:>9} {:>9} {:>9}",
        "Date", "Intake", "Exercise", "Protein", "Carbs", "Fat"
    );
    println!("{}", "-".repeat(64));
    for e in entries {
        println!(
            "{:<12} {:>10.0} {:>10.0} {:>9.1} {:>9.1} {:>9.1}",
            e.date, e.intake, e.exercise_calories, e.protein, e.carbs, e.fat
        );
    }
}
