use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use libcedar::format::{format_arabic_date, format_lbp_with_symbol, parse_amount, to_arabic_numerals};
use libcedar::report::GeneralLedgerFilters;
use libcedar::settings::{Lang, DEFAULT_LBP_SYMBOL};
use libcedar::{Actor, Checklist, Document};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cedar", version, about = "Lebanese audit checklists and formatting")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show status, completion and item counts of every checklist in a file
    Status { file: PathBuf },
    /// Print audit reports of the completed checklists in a file
    Report { file: PathBuf },
    /// Mark every item completed and print the resulting checklists
    MarkAll {
        file: PathBuf,
        #[arg(long)]
        user: String,
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Format an amount in Lebanese Pounds
    Lbp {
        value: String,
        #[arg(long, default_value_t = 0)]
        precision: usize,
        #[arg(long, default_value = DEFAULT_LBP_SYMBOL)]
        symbol: String,
    },
    /// Format an ISO date as DD/MM/YYYY
    Date {
        iso: String,
        #[arg(long)]
        arabic: bool,
    },
    /// Replace ASCII digits with Arabic-Indic digits
    Numerals { text: String },
    /// Print the default general ledger filters as JSON
    Filters {
        #[arg(long)]
        company: String,
        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

fn today_or_local(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Local::now().date_naive())
}

fn load(file: &Path) -> Result<Document> {
    let doc = libcedar::parse_file(file)?;
    debug!(file = %file.display(), checklists = doc.checklists.len(), "loaded");
    Ok(doc)
}

fn print_status(doc: &Document, checklist: &Checklist) {
    let dashboard = checklist.dashboard();
    println!(
        "{}: {} ({}%)",
        checklist.title,
        checklist.status(),
        doc.settings.localize_digits(&dashboard.completion_percentage.to_string())
    );
    for (status, count) in &dashboard.status_counts {
        println!("  {:<15} {}", status, count);
    }
    for (priority, count) in &dashboard.priority_counts {
        println!("  {:<15} {}", priority, count);
    }
    let actions: Vec<String> = checklist
        .actions()
        .iter()
        .map(|a| format!("{:?}", a))
        .collect();
    println!("  actions: {}", actions.join(", "));
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Status { file } => {
            let doc = load(&file)?;
            for checklist in &doc.checklists {
                print_status(&doc, checklist);
            }
        }
        Command::Report { file } => {
            let doc = load(&file)?;
            for checklist in &doc.checklists {
                let report = checklist.generate_report()?;
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        Command::MarkAll { file, user, today } => {
            let mut doc = load(&file)?;
            let actor = Actor::new(user, today_or_local(today));
            for checklist in doc.checklists.iter_mut() {
                checklist.mark_all_completed(&actor);
                println!("{}", serde_json::to_string_pretty(checklist)?);
            }
        }
        Command::Lbp {
            value,
            precision,
            symbol,
        } => {
            let amount =
                parse_amount(&value).ok_or(anyhow!(format!("not an amount: `{}'", value)))?;
            println!("{}", format_lbp_with_symbol(Some(amount), precision, &symbol));
        }
        Command::Date { iso, arabic } => {
            let lang = if arabic { Lang::Ar } else { Lang::En };
            println!("{}", format_arabic_date(&iso, lang));
        }
        Command::Numerals { text } => println!("{}", to_arabic_numerals(&text)),
        Command::Filters { company, today } => {
            let filters = GeneralLedgerFilters::new(company, today_or_local(today));
            println!("{}", serde_json::to_string_pretty(&filters.to_json()?)?);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("CEDAR_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse())
}
