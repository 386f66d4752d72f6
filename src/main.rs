use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use rand::Rng;
use serde::Serialize;
use tracing::{error, info, warn};

use tofcode_rs::coding::{CodeSet, GrayVariant, SchemeKind, TemporalCode};
use tofcode_rs::decoding::Decoder;
use tofcode_rs::matrix::CodingMatrix;
use tofcode_rs::utils::consts::*;
use tofcode_rs::utils::logging::init_logging;

#[derive(Parser)]
#[command(author, version, about = "Generate and decode temporal coding schemes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ItofKind {
    Gray,
    Hamiltonian,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a Gray coding matrix as JSON
    Gray {
        #[arg(short, long, default_value_t = DEFAULT_GRAY_WIDTH)]
        width: u32,
        /// Use {-1, +1} levels instead of {0, 1}
        #[arg(long)]
        zero_mean: bool,
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Write a truncated Fourier coding matrix as JSON
    Fourier {
        #[arg(short = 'n', long, default_value_t = DEFAULT_DOMAIN_LEN)]
        domain_len: usize,
        #[arg(short = 'f', long, default_value_t = DEFAULT_FOURIER_FREQS)]
        n_freqs: usize,
        #[arg(long)]
        include_zeroth: bool,
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Write an iToF code set (modfs, demodfs, corrfs) as JSON
    Itof {
        #[arg(value_enum)]
        kind: ItofKind,
        /// Code length (bits for gray, 3..=5 for hamiltonian)
        #[arg(short, long, default_value_t = DEFAULT_HAMILTONIAN_K)]
        k: usize,
        /// Samples per period (hamiltonian only; gray uses 2^k)
        #[arg(short, long, default_value_t = DEFAULT_ITOF_SAMPLES)]
        n: usize,
        #[arg(long)]
        complementary: bool,
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Encode random indices and decode them back
    Roundtrip {
        /// Scheme as JSON, e.g. '{"scheme": "fourier", "domain_len": 256, "n_freqs": 4}'
        #[arg(short, long, conflicts_with = "config")]
        scheme: Option<String>,
        /// File holding the scheme JSON
        #[arg(short, long)]
        config: Option<String>,
        #[arg(short, long, default_value_t = DEFAULT_ROUNDTRIP_TRIALS)]
        trials: usize,
    },
    /// Decode one measurement, given as comma separated values
    Decode {
        #[arg(short, long, conflicts_with = "config")]
        scheme: Option<String>,
        #[arg(short, long)]
        config: Option<String>,
        #[arg(short, long, allow_hyphen_values = true)]
        measurement: String,
    },
}

const CODE_TOLERANCE: f64 = 1e-9;

#[derive(Serialize)]
struct NamedMatrix<'a> {
    name: String,
    matrix: &'a CodingMatrix,
}

fn open_output(output: Option<String>) -> io::Result<Box<dyn Write>> {
    let dst: Box<dyn Write> = match output {
        Some(path) if path == "-" => Box::new(io::stdout()),
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    };
    Ok(dst)
}

fn write_json<T: Serialize>(value: &T, output: Option<String>) -> Result<(), Box<dyn Error>> {
    let mut dst = open_output(output)?;
    serde_json::to_writer(&mut dst, value)?;
    writeln!(dst)?;
    dst.flush()?;
    Ok(())
}

fn load_scheme(scheme: Option<String>, config: Option<String>) -> Result<SchemeKind, Box<dyn Error>> {
    let kind = match (scheme, config) {
        (Some(json), _) => serde_json::from_str(&json)?,
        (None, Some(path)) => serde_json::from_reader(BufReader::new(File::open(path)?))?,
        (None, None) => {
            warn!("No scheme given, using {}-bit zero-mean gray", DEFAULT_GRAY_WIDTH);
            SchemeKind::Gray {
                width: DEFAULT_GRAY_WIDTH,
                variant: GrayVariant::ZeroMean,
            }
        }
    };
    Ok(kind)
}

fn parse_measurement(text: &str) -> Result<Vec<f64>, Box<dyn Error>> {
    let values = text
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(values)
}

fn same_code(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < CODE_TOLERANCE)
}

fn emit_matrix(code: &dyn TemporalCode, output: Option<String>) -> Result<(), Box<dyn Error>> {
    let matrix = code.coding_matrix()?;
    let name = code.name();
    info!("{}: {} x {} coding matrix", name, matrix.rows(), matrix.cols());
    write_json(&NamedMatrix { name, matrix: &matrix }, output)
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Commands::Gray {
            width,
            zero_mean,
            output,
        } => {
            let variant = if zero_mean {
                GrayVariant::ZeroMean
            } else {
                GrayVariant::Binary
            };
            let code = SchemeKind::Gray { width, variant }.create()?;
            emit_matrix(code.as_ref(), output)?;
        }
        Commands::Fourier {
            domain_len,
            n_freqs,
            include_zeroth,
            output,
        } => {
            let code = SchemeKind::Fourier {
                domain_len,
                n_freqs,
                include_zeroth,
            }
            .create()?;
            emit_matrix(code.as_ref(), output)?;
        }
        Commands::Itof {
            kind,
            k,
            n,
            complementary,
            output,
        } => {
            let set = match kind {
                ItofKind::Gray => {
                    let width = u32::try_from(k)?;
                    CodeSet::gray(width)?
                }
                ItofKind::Hamiltonian => CodeSet::hamiltonian(k, n)?,
            };
            let set = if complementary { set.complementary()? } else { set };
            info!(
                "{}: mean of light modulation functions = {:?}",
                set.name(),
                set.modulation_means()
            );
            write_json(&set, output)?;
        }
        Commands::Roundtrip {
            scheme,
            config,
            trials,
        } => {
            let code = load_scheme(scheme, config)?.create()?;
            let decoder = Decoder::new(&code.coding_matrix()?, code.correlation())?;
            info!("Round trip over {} ({} trials)", code.name(), trials);

            let mut rng = rand::rng();
            let mut failures = 0;
            for _ in 0..trials {
                let index = rng.random_range(0..code.domain_len());
                let encoded = code.encode(index)?;
                let decoded = decoder.decode(&encoded)?;
                info!("index {} -> code {:.3?} -> decoded {}", index, encoded, decoded);
                // indices sharing a code cannot be told apart by any decoder
                if !same_code(&encoded, &code.encode(decoded)?) {
                    warn!("Decoded {} instead of {}", decoded, index);
                    failures += 1;
                }
            }
            if failures > 0 {
                return Err(format!("{} of {} round trips failed", failures, trials).into());
            }
        }
        Commands::Decode {
            scheme,
            config,
            measurement,
        } => {
            let code = load_scheme(scheme, config)?.create()?;
            let decoder = Decoder::new(&code.coding_matrix()?, code.correlation())?;
            let index = decoder.decode(&parse_measurement(&measurement)?)?;
            println!("{}", index);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
