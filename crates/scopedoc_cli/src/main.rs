//! `scopedoc` command-line driver.
//!
//! # Responsibility
//! - Open the SQLite key/value store and run scripted editor steps.
//! - Print the resulting document snapshot as JSON on stdout.

mod presenter;
mod steps;

use clap::{Parser, Subcommand};
use log::warn;
use presenter::ConsolePresenter;
use scopedoc_core::db::open_db;
use scopedoc_core::{
    decode_snapshot, encode_snapshot, init_logging, load_config, Clock, Command,
    CommandOutcome, EditorConfig, ManualClock, PersistenceStore, ScopeEditor, Serializer,
    SqliteKvStore, SystemClock, ThemePreference, PROJECT_DATA_KEY, THEME_KEY,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use steps::{parse_step, Step};

#[derive(Parser)]
#[command(name = "scopedoc")]
#[command(about = "Edit and persist a scope definition document", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding the SQLite store.
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,
    /// Optional JSON config file. Missing file means defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Absolute directory for rolling log files. Logging is off when omitted.
    #[arg(long)]
    log_dir: Option<String>,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Run editor steps in order, e.g. `run edit add-objective save`.
    Run {
        /// Answer "yes" to delete confirmations.
        #[arg(short, long)]
        yes: bool,
        /// Print the final snapshot in compact form.
        #[arg(long)]
        compact: bool,
        steps: Vec<String>,
    },
    /// Print the stored keys, theme and snapshot.
    Show,
    /// Delete the stored theme and snapshot.
    Reset,
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => EditorConfig::default(),
    };

    if let Some(log_dir) = &cli.log_dir {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    std::fs::create_dir_all(&cli.data_dir)?;
    let conn = open_db(config.db_path(&cli.data_dir))?;
    let store = SqliteKvStore::new(&conn);

    match cli.command {
        CliCommand::Run {
            yes,
            compact,
            steps,
        } => {
            let steps = steps
                .iter()
                .map(|raw| parse_step(raw))
                .collect::<Result<Vec<_>, _>>()?;
            run_steps(&config, &store, yes, compact, steps)
        }
        CliCommand::Show => {
            println!("keys: {}", store.keys()?.join(", "));
            let theme = stored_theme(store.load(THEME_KEY)?.as_deref());
            println!("theme: {theme}");
            match store.load(PROJECT_DATA_KEY)?.as_deref().and_then(decode_snapshot) {
                Some(snapshot) => println!("{}", serde_json::to_string_pretty(&snapshot)?),
                None => println!("no stored document"),
            }
            Ok(())
        }
        CliCommand::Reset => {
            store.remove(THEME_KEY)?;
            store.remove(PROJECT_DATA_KEY)?;
            println!("stored document cleared");
            Ok(())
        }
    }
}

/// Resolves a stored theme string the same way editor startup does.
fn stored_theme(raw: Option<&str>) -> ThemePreference {
    raw.and_then(ThemePreference::parse).unwrap_or_default()
}

fn run_steps(
    config: &EditorConfig,
    store: &SqliteKvStore<'_>,
    assume_yes: bool,
    compact: bool,
    steps: Vec<Step>,
) -> Result<(), Box<dyn Error>> {
    let clock = ManualClock::new(SystemClock.now_ms());
    let mut editor = ScopeEditor::start(
        config,
        store,
        ConsolePresenter { assume_yes },
        &clock,
    );

    let mut failed_saves = 0usize;
    for step in steps {
        let command = match step {
            Step::Dispatch(command) => command,
            Step::Wait(ms) => {
                clock.advance(ms);
                Command::Tick
            }
        };
        match editor.dispatch(command) {
            Ok(CommandOutcome::Navigation(decision)) => eprintln!("[navigation] {decision:?}"),
            Ok(
                CommandOutcome::Saved(save)
                | CommandOutcome::Ticked(Some(save))
                | CommandOutcome::CriterionToggled { save, .. },
            ) if !save.is_saved() => failed_saves += 1,
            Ok(outcome) => log::debug!("event=cli_step module=cli status=ok outcome={outcome:?}"),
            Err(err) => {
                warn!("event=cli_step module=cli status=rejected error={err}");
                eprintln!("[rejected] {err}");
            }
        }
    }

    let snapshot = Serializer::new().snapshot(editor.model(), clock.now_ms());
    if compact {
        println!("{}", encode_snapshot(&snapshot)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }

    if failed_saves > 0 {
        return Err(format!("{failed_saves} save(s) failed; stored document may be stale").into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::stored_theme;
    use scopedoc_core::ThemePreference;

    #[test]
    fn stored_theme_falls_back_to_light() {
        assert_eq!(stored_theme(Some("dark")), ThemePreference::Dark);
        assert_eq!(stored_theme(Some("solarized")), ThemePreference::Light);
        assert_eq!(stored_theme(None), ThemePreference::Light);
    }
}
