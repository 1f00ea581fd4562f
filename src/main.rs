mod aliases;
mod app;
mod catalog;
mod check;
mod cli;
mod insights;
mod presets;
mod resolver;
mod sync;
mod ui;

use std::io::{self, BufRead, Write};

use clap::Parser;

use crate::app::{App, AppError};
use crate::cli::Commands;

fn main() {
    if let Err(err) = run() {
        if let AppError::GenreNotFound { query, available } = &err {
            eprintln!("error: no close match found for genre '{}'", query);
            eprintln!("available genres: {}", available.join(", "));
        } else {
            eprintln!("error: {}", err);
        }
        std::process::exit(1);
    }
}

fn print_json(value: &impl serde::Serialize) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).expect("json serialization should work")
    );
}

fn run() -> Result<(), AppError> {
    let cli = cli::Cli::parse();
    let app = App::open(cli.library)?;

    match cli.command {
        Commands::Recommend(args) => {
            let query = match args.query {
                Some(query) => query,
                None => prompt_for_genre()?,
            };
            let recommendation = app.recommend(&query)?;
            if args.json {
                print_json(&recommendation);
            } else {
                ui::print_recommendation(&recommendation);
            }
        }
        Commands::Search(args) => {
            let result = app.search(&args.query);
            if args.json {
                print_json(&result);
            } else {
                ui::print_search_result(&args.query, &result);
            }
        }
        Commands::Block(args) => {
            let lookup = app.block(&args.name);
            if args.json {
                print_json(&lookup);
            } else {
                ui::print_block_lookup(&lookup);
            }
        }
        Commands::Insights(args) => {
            let records = app.insights(&args.names);
            if args.json {
                print_json(&records);
            } else {
                ui::print_insights(&records);
            }
        }
        Commands::Genres(args) => {
            let genres = app.genres()?;
            if args.json {
                print_json(&genres);
            } else {
                ui::print_genres(&genres);
            }
        }
        Commands::Sync(args) => {
            let report = app.sync()?;
            if args.json {
                print_json(&report);
            } else {
                ui::print_sync_report(&report);
            }
        }
        Commands::Check(args) => {
            let report = app.check()?;
            if args.json {
                print_json(&report);
            } else {
                ui::print_check_report(&report);
            }
            if !report.ok() {
                return Err(AppError::InvalidArgument(format!(
                    "check found {} issue(s)",
                    report.issues.len()
                )));
            }
        }
    }

    Ok(())
}

fn prompt_for_genre() -> Result<String, AppError> {
    print!("Enter a genre (e.g. grunge, psychedelic, classic_rock): ");
    io::stdout()
        .flush()
        .map_err(|err| AppError::InvalidArgument(format!("unable to prompt: {err}")))?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|err| AppError::InvalidArgument(format!("unable to read query: {err}")))?;

    let query = line.trim().to_string();
    if query.is_empty() {
        return Err(AppError::InvalidArgument("empty genre query".to_string()));
    }
    Ok(query)
}
