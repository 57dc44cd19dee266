use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Parser};

use ppmpack::error::CodecError;
use ppmpack::pipeline;

#[derive(Parser)]
#[command(about = "Compress portable pixmaps into 32-bit codewords, and back")]
#[command(group(ArgGroup::new("mode").required(true).args(["compress", "decompress"])))]
struct Args {
  /// Compress a portable pixmap to a codeword stream on stdout
  #[arg(short = 'c')]
  compress: bool,

  /// Decompress a codeword stream to a portable pixmap on stdout
  #[arg(short = 'd')]
  decompress: bool,

  /// Input file; read stdin when omitted
  file: Option<PathBuf>,
}

fn main() -> ExitCode {
  let args = Args::parse();

  match run(&args) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("codec: {}", err);
      ExitCode::FAILURE
    }
  }
}

fn run(args: &Args) -> Result<(), CodecError> {
  let mut input: Box<dyn Read> = match &args.file {
    Some(path) => Box::new(BufReader::new(File::open(path)?)),
    None => Box::new(BufReader::new(io::stdin().lock())),
  };

  let stdout = io::stdout();
  let mut output = BufWriter::new(stdout.lock());

  if args.compress {
    pipeline::compress(&mut input, &mut output)?;
  } else {
    pipeline::decompress(&mut input, &mut output)?;
  }

  output.flush()?;

  Ok(())
}
