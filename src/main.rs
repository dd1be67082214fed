use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use log::{info, warn};

use darken::{DecodeError, EncodeError, Lightness, ParseLightnessError, PixelBuffer, Strategy};

// Exit statuses -1, -2 and -3 as the process sees them.
const EXIT_USAGE: u8 = 255;
const EXIT_DECODE: u8 = 254;
const EXIT_ENCODE: u8 = 253;

/// Darken the RGB channels of an image by `lightness / 256`.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input image. The format is detected from the file content.
    input: PathBuf,

    /// Output file, always written as an RGBA PNG.
    output: PathBuf,

    /// Lightness level, nominally 0-255.
    ///
    /// Levels of 0 or below give black. 256 leaves colors unchanged; higher
    /// levels wrap rather than saturate.
    #[arg(allow_negative_numbers = true, value_parser = parse_level)]
    lightness: Level,

    /// Kernel implementation to run.
    #[arg(long, value_enum, default_value_t = StrategyArg::Auto)]
    strategy: StrategyArg,

    #[arg(hide = true)]
    extra: Vec<String>,
}

/// The lightness argument as typed, plus its parsed factor.
#[derive(Clone, Debug)]
struct Level {
    text: String,
    lightness: Lightness,
}

impl Level {
    fn is_nominal(&self) -> bool {
        self.text.parse::<u8>().is_ok()
    }
}

fn parse_level(s: &str) -> Result<Level, ParseLightnessError> {
    Ok(Level {
        text: s.to_owned(),
        lightness: s.parse()?,
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// Vector if the CPU supports it, otherwise scalar.
    Auto,
    Scalar,
    Vector,
}

impl StrategyArg {
    fn strategy(self) -> Strategy {
        match self {
            StrategyArg::Auto => Strategy::detect(),
            StrategyArg::Scalar => Strategy::Scalar,
            StrategyArg::Vector => Strategy::Vector,
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    if !args.extra.is_empty() {
        warn!("ignoring extra arguments: {}", args.extra.join(" "));
    }
    let lightness = args.lightness.lightness;
    if !args.lightness.is_nominal() {
        warn!(
            "lightness {} is outside 0-255, using factor {}",
            args.lightness.text,
            lightness.factor()
        );
    }

    let mut img = PixelBuffer::load(&args.input)?;
    let ran = img.darken(lightness, args.strategy.strategy());
    if args.strategy == StrategyArg::Vector && ran != Strategy::Vector {
        warn!("vector kernel unavailable on this CPU, used {ran}");
    }
    info!(
        "darkened {}x{} pixels with the {} kernel",
        img.width(),
        img.height(),
        ran
    );

    img.save(&args.output)?;
    img.release();
    Ok(())
}

fn exit_code(err: &anyhow::Error) -> u8 {
    if err.is::<DecodeError>() {
        EXIT_DECODE
    } else if err.is::<EncodeError>() {
        EXIT_ENCODE
    } else {
        1
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_micros()
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(EXIT_USAGE),
            };
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}
