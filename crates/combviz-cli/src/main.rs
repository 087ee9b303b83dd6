//! combviz CLI.
//!
//! Runs the traced combinatorial algorithms on JSON input files and prints
//! the result (optionally with the full replayable trace) as JSON on stdout.
//! Diagnostics go to stderr through `tracing`.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use serde_json::Value;

use combviz_algo::BinPackStrategy;
use combviz_cli::error::CliError;
use combviz_cli::input::{load_graph, load_json, BinPackInput, KnapsackInput};
use combviz_cli::run::{run_binpack, run_dijkstra, run_knapsack};

/// Replayable combinatorial algorithms.
#[derive(Parser)]
#[command(name = "combviz", about = "Replayable combinatorial algorithms")]
struct Cli {
    /// Log level for diagnostics on stderr: error, warn, info, debug, trace.
    #[arg(long, global = true, env = "COMBVIZ_LOG", default_value = "warn")]
    log_level: tracing::Level,

    /// Pretty-print the JSON output.
    #[arg(long, global = true, env = "COMBVIZ_PRETTY")]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shortest paths from a start node.
    Dijkstra {
        /// Graph snapshot file.
        #[arg(short, long)]
        graph: PathBuf,

        /// Start node id.
        #[arg(short, long)]
        start: String,

        /// Include the step-event log.
        #[arg(long)]
        steps: bool,
    },
    /// 0/1 knapsack over `{values, weights, capacity}`.
    Knapsack {
        #[arg(short, long)]
        input: PathBuf,

        /// Include the replayable command trace.
        #[arg(long)]
        steps: bool,
    },
    /// Bin packing over `{items: [{size, quantity}]}`.
    Binpack {
        #[arg(short, long)]
        input: PathBuf,

        /// next-fit, first-fit, first-fit-decreasing or next-fit-decreasing.
        #[arg(long, default_value = "first-fit")]
        strategy: BinPackStrategy,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match execute(cli.command) {
        Ok(output) => print(&output, cli.pretty),
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

fn execute(command: Commands) -> Result<Value, CliError> {
    match command {
        Commands::Dijkstra { graph, start, steps } => {
            let graph = load_graph(&graph)?;
            run_dijkstra(&graph, &start, steps)
        }
        Commands::Knapsack { input, steps } => {
            let input: KnapsackInput = load_json(&input)?;
            run_knapsack(&input, steps)
        }
        Commands::Binpack { input, strategy } => {
            let input: BinPackInput = load_json(&input)?;
            run_binpack(&input, strategy)
        }
    }
}

/// Writes `output` to stdout. Returns the exit code.
fn print(output: &Value, pretty: bool) -> i32 {
    let text = if pretty {
        serde_json::to_string_pretty(output)
    } else {
        serde_json::to_string(output)
    };
    match text {
        Ok(text) => {
            println!("{}", text);
            0
        }
        Err(e) => {
            eprintln!("Error: failed to serialize result: {}", e);
            1
        }
    }
}
