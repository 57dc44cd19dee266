use std::io::{self, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::error::CodecError;

// Framing of the compressed stream: a two-line textual header carrying the
// trimmed image dimensions, then one 4-byte codeword per 2x2 block in
// row-major block order. Codewords are serialized most significant byte
// first, explicitly, never by reinterpreting memory.

pub const HEADER_MAGIC: &str = "COMP40 Compressed image format 2";

pub fn write_stream<W: Write>(w: &mut W, width: usize, height: usize,
                              codewords: &[u32]) -> Result<(), CodecError> {
  write!(w, "{}\n{} {}\n", HEADER_MAGIC, width, height)?;

  for &codeword in codewords {
    w.write_u32::<BigEndian>(codeword)?;
  }

  Ok(())
}

// Parse the header and read exactly (width/2)*(height/2) codewords.
// Anything short of that, or any deviation in the header bytes, is a
// format error.
pub fn read_stream<R: Read>(r: &mut R) -> Result<(usize, usize, Vec<u32>), CodecError> {
  let mut prefix = vec![0u8; HEADER_MAGIC.len() + 1];
  r.read_exact(&mut prefix)
    .map_err(|e| eof_to_format(e, "the stream magic"))?;

  if &prefix[..HEADER_MAGIC.len()] != HEADER_MAGIC.as_bytes()
      || prefix[HEADER_MAGIC.len()] != b'\n' {
    return Err(CodecError::Format("not a compressed image: bad magic".to_string()));
  }

  let (width, separator) = read_decimal(r)?;
  if separator != b' ' {
    return Err(CodecError::Format("expected a single space between dimensions".to_string()));
  }

  let (height, separator) = read_decimal(r)?;
  if separator != b'\n' {
    return Err(CodecError::Format("expected a newline after the dimensions".to_string()));
  }

  let num_codewords = (width / 2) * (height / 2);
  let mut codewords = Vec::with_capacity(num_codewords);

  for _ in 0..num_codewords {
    let codeword = r.read_u32::<BigEndian>()
      .map_err(|e| eof_to_format(e, "the codeword stream"))?;
    codewords.push(codeword);
  }

  return Ok((width, height, codewords));
}

// Read a decimal integer, returning it along with the byte that ended it
fn read_decimal<R: Read>(r: &mut R) -> Result<(usize, u8), CodecError> {
  let mut value: usize = 0;
  let mut digits = 0;

  loop {
    let byte = r.read_u8()
      .map_err(|e| eof_to_format(e, "the stream header"))?;

    match byte {
      b'0'..=b'9' => {
        value = value
          .checked_mul(10)
          .and_then(|v| v.checked_add((byte - b'0') as usize))
          .ok_or_else(|| CodecError::Format("image dimension is too large".to_string()))?;
        digits += 1;
      },
      _ => {
        if digits == 0 {
          return Err(CodecError::Format("missing dimension in header".to_string()));
        }
        return Ok((value, byte));
      }
    }
  }
}

fn eof_to_format(err: io::Error, what: &str) -> CodecError {
  if err.kind() == io::ErrorKind::UnexpectedEof {
    CodecError::Format(format!("unexpected end of input while reading {}", what))
  } else {
    CodecError::Io(err)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Cursor;

  #[test]
  fn header_literal_and_byte_order() {
    let mut buffer = Vec::new();
    write_stream(&mut buffer, 4, 4, &[0x11223344, 0, 0, 0xAABBCCDD]).unwrap();

    assert_eq!(&buffer[..33], b"COMP40 Compressed image format 2\n");
    assert_eq!(&buffer[33..37], b"4 4\n");
    assert_eq!(buffer.len(), 37 + 4 * 4);
    assert_eq!(&buffer[37..41], &[0x11, 0x22, 0x33, 0x44]);
    assert_eq!(&buffer[49..53], &[0xAA, 0xBB, 0xCC, 0xDD]);
  }

  #[test]
  fn read_inverts_write() {
    let codewords = vec![1u32, 2, 3, 4, 0xFFFFFFFF, 6];
    let mut buffer = Vec::new();
    write_stream(&mut buffer, 6, 4, &codewords).unwrap();

    let (width, height, decoded) = read_stream(&mut Cursor::new(buffer)).unwrap();
    assert_eq!(width, 6);
    assert_eq!(height, 4);
    assert_eq!(decoded, codewords);
  }

  #[test]
  fn bad_magic_is_a_format_error() {
    let mut data = Vec::new();
    write_stream(&mut data, 2, 2, &[0]).unwrap();
    data[0] = b'X';

    match read_stream(&mut Cursor::new(data)) {
      Err(CodecError::Format(_)) => {},
      other => panic!("expected a format error, got {:?}", other.map(|_| ())),
    }
  }

  #[test]
  fn short_codeword_stream_is_a_format_error() {
    let mut data = Vec::new();
    write_stream(&mut data, 4, 4, &[1, 2, 3, 4]).unwrap();
    data.truncate(data.len() - 6);

    match read_stream(&mut Cursor::new(data)) {
      Err(CodecError::Format(_)) => {},
      other => panic!("expected a format error, got {:?}", other.map(|_| ())),
    }
  }

  #[test]
  fn missing_dimension_is_a_format_error() {
    let data = b"COMP40 Compressed image format 2\n4\n".to_vec();
    assert!(matches!(read_stream(&mut Cursor::new(data)),
                     Err(CodecError::Format(_))));
  }
}
