use crate::listing::{Framing, Listing, UnrecognizedPolicy};
use clap::Parser;
use env_logger::Env;
use log::{info, warn};
use mips_disasm::{decode_parallel, DecodedInstruction, Disassembler};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

mod listing;

const DEFAULT_OUTPUT: &str = "mips32_disass_output.s";

fn parse_address(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid address {s:?}: {e}"))
}

/// Disassembles raw little-endian MIPS32 binaries into assembly listings.
#[derive(Parser, Debug)]
#[command(version, about)]
struct CommandLineInterface {
    /// The raw binary to disassemble.
    #[clap(short, long, value_name = "path")]
    file: PathBuf,

    /// Where to write the listing.
    #[clap(short, long, value_name = "path", default_value = DEFAULT_OUTPUT)]
    save: PathBuf,

    /// Write the listing to stdout instead of a file.
    #[clap(long)]
    stdout: bool,

    /// The 32-bit address of the first instruction, in decimal or `0x` prefixed hexadecimal.
    #[clap(short, long, value_name = "address", default_value = "0", value_parser = parse_address)]
    base: u32,

    /// Omit the `.text`/`main:` prologue and the exit syscall epilogue.
    #[clap(long)]
    no_framing: bool,

    /// Write unrecognized words as comments instead of aborting.
    #[clap(short, long)]
    keep_going: bool,

    /// The number of threads to decode on.
    #[clap(short, long, value_name = "count", default_value_t = 1)]
    jobs: usize,
}

fn open_output(cli: &CommandLineInterface) -> io::Result<Box<dyn Write>> {
    if cli.stdout {
        Ok(Box::new(io::stdout().lock()))
    } else {
        Ok(Box::new(BufWriter::new(File::create(&cli.save)?)))
    }
}

fn check_extension(path: &Path) {
    if path.extension().and_then(|ext| ext.to_str()) != Some("bin") {
        warn!(
            "{} does not have a .bin extension, treating it as a raw binary anyway",
            path.display()
        );
    }
}

/// Logs warnings and errors unless the environment asks for something else.
fn logger(env: Env<'_>) -> env_logger::Builder {
    env_logger::Builder::from_env(env.default_filter_or("warn"))
}

fn main() {
    logger(Env::default()).init();
    let cli = CommandLineInterface::parse();

    check_extension(&cli.file);
    let bin = std::fs::read(&cli.file).unwrap_or_else(|e| {
        eprintln!("failed to read {}: {e}", cli.file.display());
        std::process::exit(1);
    });

    let instructions: Box<dyn Iterator<Item = mips_disasm::Result<DecodedInstruction>>> =
        if cli.jobs > 1 {
            Box::new(decode_parallel(&bin, cli.base, cli.jobs).into_iter())
        } else {
            Box::new(Disassembler::new(bin.as_slice(), cli.base))
        };

    let framing = if cli.no_framing {
        Framing::none()
    } else {
        Framing::default()
    };
    let policy = if cli.keep_going {
        UnrecognizedPolicy::Comment
    } else {
        UnrecognizedPolicy::Abort
    };

    let output = open_output(&cli).unwrap_or_else(|e| {
        eprintln!("failed to open {}: {e}", cli.save.display());
        std::process::exit(1);
    });

    match Listing::new(output, framing, policy).write(instructions) {
        Ok(summary) => info!(
            "wrote {} instructions ({} unrecognized)",
            summary.instructions, summary.unrecognized
        ),
        Err(e) => {
            eprintln!("failed to disassemble {}: {e}", cli.file.display());
            std::process::exit(1);
        }
    }
}
