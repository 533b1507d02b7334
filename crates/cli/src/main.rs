//! MAU hash and gateway model CLI.
//!
//! This binary runs packets through a stage described in JSON. It performs:
//! 1. **Eval:** Extract a packet into a PHV and evaluate one gateway table.
//! 2. **Hash:** Print every hash unit and hash group value for a packet.
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (e.g. `RUST_LOG=mausim_core=trace`).

use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use mausim_core::Mau;
use mausim_core::Phv;
use mausim_core::common::{GatewayId, HashGroupId, UnitId};
use mausim_core::gateway::{Thread, ThreadContext};
use mausim_core::loader::StageSpec;

#[derive(Parser, Debug)]
#[command(
    name = "mausim",
    author,
    version,
    about = "Match-action unit hash and gateway model",
    long_about = "Load a JSON stage description, extract a packet into a PHV, and report hash and gateway results.\n\nExamples:\n  mausim eval -c stage.json -p 0800450000... --row 2 --table 1\n  mausim hash -c stage.json -p 0800450000..."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThreadArg {
    Ingress,
    Egress,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate one gateway table for a packet.
    Eval {
        /// Stage description (JSON).
        #[arg(short, long)]
        config: String,

        /// Packet bytes as hex (whitespace and ':' are ignored).
        #[arg(short, long)]
        packet: String,

        /// Gateway row.
        #[arg(long)]
        row: u8,

        /// Gateway table slot within the row.
        #[arg(long)]
        table: u8,

        /// Thread the packet travels in.
        #[arg(long, value_enum, default_value = "ingress")]
        thread: ThreadArg,

        /// Packet version (0-3).
        #[arg(long, default_value_t = 0)]
        version: u8,

        /// Print statistics after evaluation.
        #[arg(long)]
        stats: bool,
    },

    /// Print every hash unit and hash group value for a packet.
    Hash {
        /// Stage description (JSON).
        #[arg(short, long)]
        config: String,

        /// Packet bytes as hex (whitespace and ':' are ignored).
        #[arg(short, long)]
        packet: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Eval {
            config,
            packet,
            row,
            table,
            thread,
            version,
            stats,
        } => {
            let thread = match thread {
                ThreadArg::Ingress => Thread::Ingress,
                ThreadArg::Egress => Thread::Egress,
            };
            cmd_eval(
                &config,
                &packet,
                GatewayId::new(row, table),
                ThreadContext::new(thread, version),
                stats,
            )
        }
        Commands::Hash { config, packet } => cmd_hash(&config, &packet),
    };
    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Decodes a hex string into bytes, ignoring whitespace and ':' separators.
fn parse_packet(text: &str) -> Result<Vec<u8>, String> {
    let digits: Vec<u8> = text
        .bytes()
        .filter(|b| !b.is_ascii_whitespace() && *b != b':')
        .collect();
    if digits.len() % 2 != 0 {
        return Err(format!("packet hex has odd length {}", digits.len()));
    }
    digits
        .chunks(2)
        .map(|pair| {
            let s = std::str::from_utf8(pair).map_err(|e| e.to_string())?;
            u8::from_str_radix(s, 16).map_err(|e| format!("bad hex byte '{s}': {e}"))
        })
        .collect()
}

/// Loads the stage and extracts the packet.
fn load(config: &str, packet: &str) -> Result<(Mau, Phv), String> {
    let spec = StageSpec::from_path(config).map_err(|e| e.to_string())?;
    let bytes = parse_packet(packet)?;
    let phv = spec
        .extractor()
        .map_err(|e| e.to_string())?
        .extract(&bytes)
        .map_err(|e| e.to_string())?;
    let mau = spec.build().map_err(|e| e.to_string())?;
    Ok((mau, phv))
}

/// Evaluates one gateway and prints the live word and the result.
fn cmd_eval(
    config: &str,
    packet: &str,
    gateway: GatewayId,
    ctx: ThreadContext,
    stats: bool,
) -> Result<(), String> {
    let (mau, phv) = load(config, packet)?;
    let live = mau
        .snapshot()
        .gateway_live(gateway, &phv)
        .map_err(|e| e.to_string())?;
    let result = mau
        .evaluate_gateway(gateway, &phv, ctx)
        .map_err(|e| e.to_string())?;

    println!("{gateway}: live={live}");
    match (result.index, result.payload) {
        (Some(index), Some(payload)) => println!("  hit  index={index} payload={payload}"),
        (Some(index), None) => println!("  hit  index={index}"),
        (None, _) => println!("  miss"),
    }
    if stats {
        println!("{}", mau.stats().snapshot());
    }
    Ok(())
}

/// Prints every unit hash and group value.
fn cmd_hash(config: &str, packet: &str) -> Result<(), String> {
    let (mau, phv) = load(config, packet)?;
    let snapshot = mau.snapshot();
    for unit in snapshot.hash().units() {
        let id: UnitId = unit.id();
        let hash = snapshot.compute_hash(id, &phv).map_err(|e| e.to_string())?;
        println!("{id}: {hash}");
    }
    for group in snapshot.hash().groups() {
        let id: HashGroupId = group.id();
        let value = snapshot
            .compute_hash_group(id, &phv)
            .map_err(|e| e.to_string())?;
        println!("{id} ({}): {value}", group.unit());
    }
    Ok(())
}
