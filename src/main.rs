use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use tinyc::ast::Block;
use tinyc::ast_printer::AstPrinter;
use tinyc::checker::Checker;
use tinyc::error::FrontError;
use tinyc::parser::{Parser, DEFAULT_MAX_CHAIN, DEFAULT_MAX_DEPTH};
use tinyc::reader::LineReader;
use tinyc::scanner::Scanner;

#[derive(ClapParser, Debug)]
#[command(version, about = "tinyc language front end", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to tinyc.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes a file, printing each token
    Tokenize { filename: PathBuf },

    /// Parses a file and prints its canonical tree
    Parse {
        filename: PathBuf,

        /// Print the tree as JSON instead
        #[arg(long)]
        json: bool,

        /// Maximum syntactic nesting depth
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,

        /// Maximum number of operators in one flat chain
        #[arg(long, default_value_t = DEFAULT_MAX_CHAIN)]
        max_chain: usize,
    },

    /// Parses and checks a file, printing its canonical tree if it is valid
    Check {
        filename: PathBuf,

        /// Maximum syntactic nesting depth
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,

        /// Maximum number of operators in one flat chain
        #[arg(long, default_value_t = DEFAULT_MAX_CHAIN)]
        max_chain: usize,
    },
}

/// Opens `filename` and wraps it in a line reader.
fn open_file(filename: &PathBuf) -> Result<LineReader<BufReader<File>>> {
    info!("Opening file: {:?}", filename);

    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;

    Ok(LineReader::new(BufReader::new(file)))
}

fn init_logger() -> Result<()> {
    let log_file = File::create("tinyc.log").context("Failed to create tinyc.log")?;

    Builder::new()
        .format(|buf, record| {
            // Strip 'tinyc::' from module path
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("tinyc::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug)
        .init();

    info!("Logger initialized, writing to tinyc.log");
    Ok(())
}

/// Report a front‑end error and exit with its status.
fn fail(e: FrontError) -> ! {
    debug!("Front end failed: {:?}", e);
    eprintln!("{}", e);
    std::process::exit(e.exit_code());
}

fn parse_file(filename: &PathBuf, max_depth: usize, max_chain: usize) -> Result<Block> {
    let reader = open_file(filename)?;

    let program = Parser::new(Scanner::new(reader))
        .and_then(|parser| {
            parser
                .with_max_depth(max_depth)
                .with_max_chain(max_chain)
                .parse()
        })
        .unwrap_or_else(|e| fail(e));

    info!("Parsed {} statements", program.len());

    Ok(program)
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands {
        Commands::Tokenize { filename } => {
            info!("Running Tokenize subcommand");

            let scanner = Scanner::new(open_file(&filename)?);

            for token in scanner {
                let token = token.unwrap_or_else(|e| fail(e));

                println!("{}", token);
            }

            info!("Tokenization completed successfully");
        }

        Commands::Parse {
            filename,
            json,
            max_depth,
            max_chain,
        } => {
            info!("Running Parse subcommand");

            let program = parse_file(&filename, max_depth, max_chain)?;

            if json {
                let out =
                    serde_json::to_string_pretty(&program).context("Failed to serialize tree")?;
                println!("{}", out);
            } else {
                println!("{}", AstPrinter::print_block(&program));
            }
        }

        Commands::Check {
            filename,
            max_depth,
            max_chain,
        } => {
            info!("Running Check subcommand");

            let program = parse_file(&filename, max_depth, max_chain)?;

            if let Err(e) = Checker::new().check(&program) {
                fail(e);
            }

            println!("{}", AstPrinter::print_block(&program));

            info!("Program checked successfully");
        }
    }

    Ok(())
}
