use clap::Parser;
use postm::types::{DEFAULT_HALT_STATE, DEFAULT_START_STATE, MAX_EXECUTION_STEPS};
use postm::{
    analyze, parse, History, MachineConfig, PostMachine, PostMachineError, RunOutcome, RunReport,
    TableEntry, TableLoader, TableManager, Trace, TransitionTable,
};
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use tracing::warn;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  postm-cli --table tables/anbncn.post --input aaabbbccc
  postm-cli --builtin anbn --input aabb --input aab -d
  postm-cli --table tables --input aabb
  cat tables/even-a.post | postm-cli --input aaaa")]
struct Cli {
    /// The transition table file to execute, or a directory whose `.post` tables all run
    #[clap(short, long, conflicts_with = "builtin")]
    table: Option<PathBuf>,

    /// A built-in transition table to execute (see --list)
    #[clap(short, long)]
    builtin: Option<String>,

    /// A word to process; repeat to process several words
    #[clap(short, long)]
    input: Vec<String>,

    /// Maximum number of steps per word
    #[clap(long, default_value_t = MAX_EXECUTION_STEPS)]
    max_steps: usize,

    /// Name of the start state
    #[clap(long, default_value = DEFAULT_START_STATE)]
    start: String,

    /// Name of the halt state
    #[clap(long, default_value = DEFAULT_HALT_STATE)]
    halt: String,

    /// Print the machine after each step
    #[clap(short = 'd', long)]
    debug: bool,

    /// Write the tape history of every word into this directory
    #[clap(long)]
    history_dir: Option<PathBuf>,

    /// Print a JSON report for every word instead of a summary line
    #[clap(long)]
    json: bool,

    /// Only analyze the table and print its diagnostics
    #[clap(long)]
    check: bool,

    /// Print the table source and exit
    #[clap(long)]
    show: bool,

    /// List the built-in tables and exit
    #[clap(long)]
    list: bool,
}

/// Installs a compact stderr subscriber filtered by `RUST_LOG`, `warn` when unset.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).compact())
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if cli.list {
        for index in 0..TableManager::get_table_count() {
            if let Ok(info) = TableManager::get_table_info(index) {
                println!(
                    "{:<10} states: {}, transitions: {}, writes: {}",
                    info.name, info.state_count, info.transition_count, info.write_count
                );
            }
        }
        return;
    }

    let tables = match load_tables(&cli) {
        Ok(tables) => tables,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let config = MachineConfig::default()
        .with_start_state(cli.start.clone())
        .with_halt_state(cli.halt.clone())
        .with_max_steps(cli.max_steps);

    let mut succeeded = true;
    for (name, table) in &tables {
        if tables.len() > 1 {
            println!("== {name}");
        }

        match table {
            Ok(table) => succeeded &= process_table(&cli, name, table, &config),
            Err(e) => {
                eprintln!("Error in {}: {}", name, e);
                succeeded = false;
            }
        }
    }

    process::exit(if succeeded { 0 } else { 1 });
}

/// Loads the tables from `--table`, `--builtin`, or piped stdin, in that order.
///
/// Only a `--table` directory yields more than one table.
fn load_tables(cli: &Cli) -> Result<Vec<TableEntry<String>>, PostMachineError> {
    if let Some(path) = &cli.table {
        TableLoader::load_path(path)
    } else if let Some(name) = &cli.builtin {
        Ok(vec![(name.clone(), Ok(TableManager::get_table_by_name(name)?))])
    } else if atty::isnt(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).map_err(|e| {
            PostMachineError::TableSourceUnavailable(format!("Failed to read from stdin: {}", e))
        })?;
        Ok(vec![("stdin".to_string(), Ok(parse(&buffer)?))])
    } else {
        Err(PostMachineError::TableSourceUnavailable(
            "No table given: use --table, --builtin, or pipe one into stdin".to_string(),
        ))
    }
}

/// Shows, checks or runs one table according to the flags. Returns whether it succeeded:
/// no diagnostics under `--check`, otherwise every word halted.
fn process_table(cli: &Cli, name: &str, table: &TransitionTable, config: &MachineConfig) -> bool {
    if cli.show {
        match cli.builtin.as_deref().map(TableManager::get_table_text) {
            Some(Ok(text)) => print!("{text}"),
            _ => print!("{table}"),
        }
        return true;
    }

    let diagnostics = analyze(table, config);

    if cli.check {
        for diagnostic in &diagnostics {
            println!("{diagnostic}");
        }
        return diagnostics.is_empty();
    }

    for diagnostic in &diagnostics {
        warn!(table = %name, "{diagnostic}");
    }

    let words = if cli.input.is_empty() {
        vec![String::new()]
    } else {
        cli.input.clone()
    };

    let mut all_halted = true;
    for word in &words {
        match run_word(cli, name, table, config, word) {
            Ok(outcome) => all_halted &= outcome == RunOutcome::Halted,
            Err(e) => {
                eprintln!("Error: {}", e);
                all_halted = false;
            }
        }
    }

    all_halted
}

/// Runs one word and prints its result.
fn run_word(
    cli: &Cli,
    name: &str,
    table: &TransitionTable,
    config: &MachineConfig,
    word: &str,
) -> Result<RunOutcome, PostMachineError> {
    let mut machine = PostMachine::new(word, table, config.clone());

    let outcome = if cli.debug {
        println!("{}", Trace::new(&machine, 0));
        let mut iteration = 0;
        machine.run_with_observer(config.max_steps, |m| {
            iteration += 1;
            println!("{}", Trace::new(m, iteration));
        })
    } else {
        machine.run(config.max_steps)
    };

    if let Some(dir) = &cli.history_dir {
        let path = History::from_machine(&machine).write_text(dir, name)?;
        eprintln!("History written to {}", path.display());
    }

    if cli.json {
        println!("{}", RunReport::new(name, &machine, outcome).to_json()?);
        return Ok(outcome);
    }

    let verdict = match outcome {
        RunOutcome::Halted => "accepted",
        RunOutcome::Stuck(_) => "cannot be processed",
        RunOutcome::StepLimitExceeded => "step limit reached without halt",
    };

    println!(
        "'{}': {} ({}, {} steps, final tape '{}')",
        machine.word(),
        verdict,
        outcome,
        machine.step_count(),
        machine.tape_string()
    );

    Ok(outcome)
}
