use std::fs;
use std::io::Write;
use std::path::PathBuf;
use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use crate::config::Config;
use crate::controller::{App, Response};
use crate::editor::TrackerHelper;
use crate::repository::TransactionRepository;
use crate::store::{FileStorage, Store};

mod aggregate;
mod categorizer;
mod chart;
mod common;
mod config;
mod controller;
mod editor;
mod form;
mod parser;
mod repository;
mod store;
mod transaction;
mod util;
mod view;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// Directory holding the saved transactions
    #[clap(long)]
    data_dir: Option<PathBuf>,

    /// Config file with currency and category rules
    #[clap(long)]
    config: Option<PathBuf>,
}

static COMMAND_HISTORY_FILE: &str = ".expense_tracker_history";
static PROMPT: &str = "$ ";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli: Cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(config::default_config_path);
    let mut config = Config::load_from_file(&config_path);
    if cli.data_dir.is_some() {
        config.data_dir = cli.data_dir;
    }
    let data_dir = config.resolve_data_dir();
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Unable to create data directory {}", data_dir.display()))?;

    let storage = FileStorage::new(&data_dir);
    info!("Using {}", storage.path_of(store::STORAGE_KEY).display());
    let repo = TransactionRepository::load(Store::new(storage));
    let mut app = App::new(repo, &config);

    let mut rl: Editor<TrackerHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(TrackerHelper::new(PROMPT)));
    let history_file = data_dir.join(COMMAND_HISTORY_FILE);
    if rl.load_history(&history_file).is_err() {
        println!("No previous history.");
    }

    println!("{}", app.screen());
    loop {
        let readline = rl.readline(PROMPT);
        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;

                match app.parse_and_run_command(line, &mut prompt_confirm) {
                    Ok(Response::Output(output)) => println!("{output}"),
                    Ok(Response::Quit) => break,
                    Err(err) => println!("{err:#}"),
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break
            },
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break
            },
            Err(err) => {
                println!("Error: {:?}", err);
                break
            }
        }
    }
    rl.save_history(&history_file)?;
    Ok(())
}

/// Ask a yes/no question on the terminal. Anything but yes counts as no.
fn prompt_confirm(question: &str) -> bool {
    print!("{question} yes or no, default is 'no': ");
    if std::io::stdout().flush().is_err() {
        return false;
    }

    let mut user_input = String::new();
    if std::io::stdin().read_line(&mut user_input).is_err() {
        return false;
    }
    let user_input = user_input.trim().to_lowercase();
    user_input == "yes" || user_input == "y"
}
