//! `socialgraph`: Redis-inspired CLI over an in-memory social graph.
//!
//! With arguments after the flags, runs that one command and exits.
//! Without, starts an interactive REPL.

mod format;
mod parse;

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context as _;
use clap::{Arg, ArgAction};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tokio::runtime::Runtime;

use socialgraph_engine::GraphConfig;
use socialgraph_executor::Executor;

use parse::Action;

struct Options {
    config: Option<PathBuf>,
    log_level: tracing::Level,
    json: bool,
    command: Vec<String>,
}

fn cli() -> clap::Command {
    clap::Command::new("socialgraph")
        .about("Edge-consistent social graph shell")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .default_value("warn")
                .help("trace, debug, info, warn or error"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print raw JSON responses"),
        )
        .arg(
            Arg::new("command")
                .num_args(0..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .help("Command to run once, e.g. USER.CREATE name=Alice"),
        )
}

fn options() -> anyhow::Result<Options> {
    let matches = cli().get_matches();
    let level = matches
        .get_one::<String>("log-level")
        .map(String::as_str)
        .unwrap_or("warn");
    Ok(Options {
        config: matches.get_one::<String>("config").map(PathBuf::from),
        log_level: tracing::Level::from_str(level)
            .map_err(|e| anyhow::anyhow!("invalid --log-level '{}': {}", level, e))?,
        json: matches.get_flag("json"),
        command: matches
            .get_many::<String>("command")
            .map(|words| words.cloned().collect())
            .unwrap_or_default(),
    })
}

fn main() -> anyhow::Result<()> {
    let opts = options()?;

    tracing_subscriber::fmt()
        .with_max_level(opts.log_level)
        .with_writer(std::io::stderr)
        .init();

    let config = match &opts.config {
        Some(path) => GraphConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => GraphConfig::default(),
    };
    tracing::info!(
        collection = %config.collection,
        timeout_ms = config.operation_timeout_ms,
        repair_policy = ?config.repair_policy,
        "Opening in-memory graph"
    );

    let runtime = Runtime::new().context("starting tokio runtime")?;
    let executor = Executor::in_memory_with_config(config);

    if !opts.command.is_empty() {
        let ok = match parse::parse_words(&opts.command) {
            Ok(Some(action)) => run(&runtime, &executor, action, opts.json).0,
            Ok(None) => true,
            Err(msg) => {
                eprintln!("(error) {}", msg);
                false
            }
        };
        if !ok {
            std::process::exit(1);
        }
        return Ok(());
    }

    repl(&runtime, &executor, opts.json)
}

/// Run one action; returns (succeeded, keep going)
fn run(runtime: &Runtime, executor: &Executor, action: Action, json: bool) -> (bool, bool) {
    match action {
        Action::Help => {
            println!("{}", parse::HELP);
            (true, true)
        }
        Action::Quit => (true, false),
        Action::Execute(command) if json => {
            let request = match serde_json::to_string(&command) {
                Ok(request) => request,
                Err(e) => {
                    eprintln!("(error) {}", e);
                    return (false, true);
                }
            };
            let response = runtime.block_on(executor.execute_json(&request));
            println!("{}", response.to_json());
            (response.status() == 200, true)
        }
        Action::Execute(command) => match runtime.block_on(executor.execute(command)) {
            Ok(output) => {
                println!("{}", format::output(&output));
                (true, true)
            }
            Err(e) => {
                println!("{}", format::error(&e));
                (false, true)
            }
        },
    }
}

fn repl(runtime: &Runtime, executor: &Executor, json: bool) -> anyhow::Result<()> {
    let mut editor = DefaultEditor::new()?;
    let history = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(".socialgraph_history"));
    if let Some(path) = &history {
        let _ = editor.load_history(path);
    }

    println!("socialgraph {} (type HELP for commands)", env!("CARGO_PKG_VERSION"));
    loop {
        match editor.readline("socialgraph> ") {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                match parse::parse_line(&line) {
                    Ok(Some(action)) => {
                        if !run(runtime, executor, action, json).1 {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(msg) => println!("(error) {}", msg),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    if let Some(path) = &history {
        let _ = editor.save_history(path);
    }
    Ok(())
}
