use std::fs::File;
use std::io::{self, BufReader, Read};
use std::process::ExitCode;

use clap::Parser;

use ppmpack::diff;
use ppmpack::error::CodecError;
use ppmpack::ppm;

#[derive(Parser)]
#[command(about = "Print the root-mean-square difference between two pixmaps")]
struct Args {
  /// First image; '-' reads it from stdin
  first: String,

  /// Second image; '-' reads it from stdin
  second: String,
}

fn main() -> ExitCode {
  let args = Args::parse();

  if args.first == "-" && args.second == "-" {
    eprintln!("ppmdiff: at most one input may come from stdin");
    return ExitCode::FAILURE;
  }

  match run(&args) {
    Ok(difference) => {
      println!("{:.4}", difference);
      ExitCode::SUCCESS
    }
    Err(err) => {
      eprintln!("ppmdiff: {}", err);
      ExitCode::FAILURE
    }
  }
}

fn run(args: &Args) -> Result<f64, CodecError> {
  let image1 = ppm::read_ppm(&mut open(&args.first)?)?;
  let image2 = ppm::read_ppm(&mut open(&args.second)?)?;

  match diff::rms_difference(&image1, &image2) {
    Ok(difference) => Ok(difference),
    Err(err) => {
      // Mismatched shapes still print a result; the complaint goes to stderr
      eprintln!("ppmdiff: {}", err);
      Ok(1.0)
    }
  }
}

fn open(name: &str) -> Result<Box<dyn Read>, CodecError> {
  if name == "-" {
    Ok(Box::new(BufReader::new(io::stdin().lock())))
  } else {
    Ok(Box::new(BufReader::new(File::open(name)?)))
  }
}
