//! packlist - replay a packing-list action script and print the result
//!
//! Reads JSON-lines actions from a file (or stdin), dispatches them through
//! the store, prints notifications as they fire, then renders the panes,
//! suggestions, recently added items and the activity history.
//!
//! # Usage
//!
//! ```sh
//! # Start from the sample list and replay a script
//! packlist --sample trip.jsonl
//!
//! # Read from stdin, sort by category, emit JSON
//! cat trip.jsonl | packlist --sort category --json
//!
//! # Trace dispatches of item actions and show the last 20
//! RUST_LOG=packlist=debug packlist trip.jsonl --log-include 'Item*' --history 20
//! ```

mod report;
mod script;

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::Parser;
use packlist::logger::{ActionLogConfig, ActionLoggerConfig, ActionLoggerMiddleware};
use packlist::view::SortOrder;
use packlist::{sample_items, Store};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::report::{ActionTally, Report};
use crate::script::Step;

/// Replay packing-list actions and render the resulting list
#[derive(Parser, Debug)]
#[command(name = "packlist")]
#[command(about = "Replay packing-list actions and render the resulting list")]
struct Args {
    /// JSON-lines action script; reads stdin when omitted or "-"
    script: Option<PathBuf>,

    /// Sort order for both panes (unsorted, alphabetical, category, tags)
    #[arg(long, short, default_value = "unsorted", value_parser = parse_sort)]
    sort: SortOrder,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Start from the sample packing list instead of an empty one
    #[arg(long)]
    sample: bool,

    /// Only log actions matching these comma-separated glob patterns
    #[arg(long)]
    log_include: Option<String>,

    /// Never log actions matching these comma-separated glob patterns
    #[arg(long)]
    log_exclude: Option<String>,

    /// Show the last N dispatched actions
    #[arg(long, default_value = "0")]
    history: usize,
}

fn parse_sort(id: &str) -> Result<SortOrder, String> {
    SortOrder::from_id(id).ok_or_else(|| {
        let known: Vec<_> = SortOrder::ALL.iter().map(SortOrder::id).collect();
        format!("unknown sort order '{}' (expected one of: {})", id, known.join(", "))
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn read_script(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display())),
        _ => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("failed to read script from stdin")?;
            Ok(source)
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let source = read_script(args.script.as_ref())?;
    let lines = script::parse(&source)?;

    let filter = ActionLoggerConfig::new(args.log_include.as_deref(), args.log_exclude.as_deref());
    let logger = ActionLoggerMiddleware::with_log(ActionLogConfig::new(args.history, filter));
    let items = if args.sample { sample_items() } else { Vec::new() };
    let mut store = Store::builder().items(items).middleware(logger).build();

    let mut notifications = Vec::new();
    let mut tally = ActionTally::default();
    for line in lines {
        match line.step {
            Step::Dispatch(action) => {
                let category = action.category_enum();
                let changed = store.dispatch(action);
                tally.record(category, changed);
            }
            Step::AddCategory(new) => {
                let style = new.style(store.registry());
                if let Err(err) = store.add_category(&new.name, style) {
                    tracing::warn!(line = line.number, error = %err, "category not added");
                }
            }
        }

        for notification in store.drain_notifications() {
            if !args.json {
                println!("✓ {}", notification.message);
            }
            notifications.push(notification);
        }
    }

    let dispatch_log = store
        .middleware()
        .log()
        .map(|log| log.recent(args.history).collect::<Vec<_>>())
        .unwrap_or_default();

    let mut report = Report::build(
        store.state(),
        store.registry(),
        args.sort,
        Utc::now(),
        &Local,
        notifications,
        dispatch_log,
    );
    report.actions = tally.finish();

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        if !report.notifications.is_empty() {
            println!();
        }
        print!("{}", report.to_text());
    }
    Ok(())
}
