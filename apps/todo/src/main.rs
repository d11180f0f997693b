//! Terminal front end for the todo list.
//!
//! Reads one command per line from stdin and re-renders the lists after
//! every command. Logs go to stderr.

use anyhow::Context;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use todolist::command::{self, Command, Flow, HELP};
use todolist::{view, Config, FileStorage, Outcome, TodoEnvironment, TodoStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "todolist={level},todolist_runtime={level}",
                    level = config.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    tracing::info!(
        path = %config.storage.path.display(),
        key = %config.storage.key,
        "Opening todo list"
    );

    let storage = Arc::new(FileStorage::new(config.storage.path.clone()));
    let env = TodoEnvironment::new(storage, config.storage.key.clone());
    let mut store =
        TodoStore::open(env, config.store_config()).context("failed to open todo list")?;

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    write!(stdout, "{}", view::render(&store.state(Clone::clone)))?;
    writeln!(stdout, "\nType `help` for commands.")?;
    prompt(&mut stdout)?;

    for line in stdin.lock().lines() {
        let line = line.context("failed to read command")?;

        let flow = match line.parse::<Command>() {
            Ok(cmd) => command::execute(&mut store, cmd)?,
            Err(error) => {
                writeln!(stdout, "{error}")?;
                prompt(&mut stdout)?;
                continue;
            },
        };

        match flow {
            Flow::Quit => break,
            Flow::Help => writeln!(stdout, "{HELP}")?,
            Flow::Continue(outcome) => {
                if let Some(Outcome::Rejected(rejection)) = outcome {
                    writeln!(stdout, "! {rejection}")?;
                }
                if let Some(error) = store.last_error() {
                    writeln!(stdout, "! could not save: {error}")?;
                }
                writeln!(stdout)?;
                write!(stdout, "{}", view::render(&store.state(Clone::clone)))?;
            },
        }
        prompt(&mut stdout)?;
    }

    tracing::info!("Goodbye");
    Ok(())
}

fn prompt(out: &mut impl Write) -> io::Result<()> {
    write!(out, "> ")?;
    out.flush()
}
