use std::io::{self, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use bytemuck::Zeroable;

use crate::error::CodecError;
use crate::grid::Grid;

// Binary "P6" portable pixmap reader and writer
// The header is ASCII: magic, width, height and the maximum color value,
// separated by whitespace, with '#' comments allowed between fields. The
// raster follows after a single whitespace byte: one byte per sample when
// the maximum fits a byte, two big-endian bytes otherwise.

const PPM_MAGIC: &[u8; 2] = b"P6";

const MAX_DENOMINATOR: usize = 65535;

#[derive(Clone, Copy, Zeroable)]
pub struct Rgb {
  pub red: u16,
  pub green: u16,
  pub blue: u16,
}

pub struct Ppm {
  pub width: usize,
  pub height: usize,
  pub denominator: u16,
  pub pixels: Grid<Rgb>,
}

pub fn read_ppm<R: Read>(r: &mut R) -> Result<Ppm, CodecError> {
  let mut magic = [0u8; 2];
  r.read_exact(&mut magic)
    .map_err(|e| eof_to_format(e, "the pixmap magic"))?;

  if &magic != PPM_MAGIC {
    return Err(CodecError::Format("not a raw (P6) portable pixmap".to_string()));
  }

  let width = read_header_field(r)?;
  let height = read_header_field(r)?;
  let denominator = read_header_field(r)?;

  if denominator == 0 || denominator > MAX_DENOMINATOR {
    return Err(CodecError::Format(
      format!("pixmap maximum color value {} is out of range", denominator)));
  }

  let mut pixels = Grid::zeroed(width, height);
  for y in 0..height {
    for x in 0..width {
      let red = read_sample(r, denominator)?;
      let green = read_sample(r, denominator)?;
      let blue = read_sample(r, denominator)?;
      pixels[(x, y)] = Rgb { red: red, green: green, blue: blue };
    }
  }

  Ok(Ppm {
    width: width,
    height: height,
    denominator: denominator as u16,
    pixels: pixels,
  })
}

pub fn write_ppm<W: Write>(w: &mut W, image: &Ppm) -> Result<(), CodecError> {
  write!(w, "P6\n{} {}\n{}\n", image.width, image.height, image.denominator)?;

  for y in 0..image.height {
    for x in 0..image.width {
      let pixel = image.pixels[(x, y)];
      if image.denominator < 256 {
        w.write_u8(pixel.red as u8)?;
        w.write_u8(pixel.green as u8)?;
        w.write_u8(pixel.blue as u8)?;
      } else {
        w.write_u16::<BigEndian>(pixel.red)?;
        w.write_u16::<BigEndian>(pixel.green)?;
        w.write_u16::<BigEndian>(pixel.blue)?;
      }
    }
  }

  Ok(())
}

fn read_sample<R: Read>(r: &mut R, denominator: usize) -> Result<u16, CodecError> {
  let sample = if denominator < 256 {
    r.read_u8().map_err(|e| eof_to_format(e, "the pixmap raster"))? as u16
  } else {
    r.read_u16::<BigEndian>().map_err(|e| eof_to_format(e, "the pixmap raster"))?
  };

  Ok(sample)
}

// Skip whitespace and comments, then read one decimal header field. The
// byte terminating the digits must itself be whitespace; for the last field
// it doubles as the single separator before the raster.
fn read_header_field<R: Read>(r: &mut R) -> Result<usize, CodecError> {
  let mut byte = read_header_byte(r)?;

  loop {
    match byte {
      b' ' | b'\t' | b'\r' | b'\n' => {
        byte = read_header_byte(r)?;
      },
      b'#' => {
        // Comment runs to the end of its line
        while read_header_byte(r)? != b'\n' {}
        byte = read_header_byte(r)?;
      },
      _ => break,
    }
  }

  let mut value: usize = 0;
  let mut digits = 0;

  loop {
    match byte {
      b'0'..=b'9' => {
        value = value
          .checked_mul(10)
          .and_then(|v| v.checked_add((byte - b'0') as usize))
          .ok_or_else(|| CodecError::Format("pixmap header field is too large".to_string()))?;
        digits += 1;
      },
      b' ' | b'\t' | b'\r' | b'\n' => break,
      _ => {
        return Err(CodecError::Format(
          format!("unexpected byte {:#04x} in pixmap header", byte)));
      }
    }

    byte = read_header_byte(r)?;
  }

  if digits == 0 {
    return Err(CodecError::Format("missing field in pixmap header".to_string()));
  }

  return Ok(value);
}

fn read_header_byte<R: Read>(r: &mut R) -> Result<u8, CodecError> {
  r.read_u8().map_err(|e| eof_to_format(e, "the pixmap header"))
}

fn eof_to_format(err: io::Error, what: &str) -> CodecError {
  if err.kind() == io::ErrorKind::UnexpectedEof {
    CodecError::Format(format!("unexpected end of input while reading {}", what))
  } else {
    CodecError::Io(err)
  }
}
