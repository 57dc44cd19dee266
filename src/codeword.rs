use crate::bitpack;
use crate::bitpack::Overflow;
use crate::dct::{DctBlock, BCD_MAX};

// Scalar quantization of a DctBlock and its packing into one 32-bit
// codeword. The field layout is fixed; both directions use the same scheme,
// so it lives in one place.

// Where each value sits inside a codeword
pub struct PackingScheme {
  pub a_width: u32, pub a_lsb: u32,
  pub b_width: u32, pub b_lsb: u32,
  pub c_width: u32, pub c_lsb: u32,
  pub d_width: u32, pub d_lsb: u32,
  pub pb_width: u32, pub pb_lsb: u32,
  pub pr_width: u32, pub pr_lsb: u32,
}

// The six fields partition bits [0, 32) exactly
pub const SCHEME: PackingScheme = PackingScheme {
  a_width: 9, a_lsb: 23,
  b_width: 5, b_lsb: 18,
  c_width: 5, c_lsb: 13,
  d_width: 5, d_lsb: 8,
  pb_width: 4, pb_lsb: 4,
  pr_width: 4, pr_lsb: 0,
};

// Map a value in [0, 1] onto the full unsigned range of a field, rounding
// half away from zero
fn quantize_unsigned(value: f64, width: u32) -> u64 {
  let capacity = (1u64 << width) - 1;
  let scaled = (value * capacity as f64).round();

  scaled.clamp(0.0, capacity as f64) as u64
}

fn dequantize_unsigned(value: u64, width: u32) -> f64 {
  let capacity = (1u64 << width) - 1;
  value as f64 / capacity as f64
}

// Map a value in [-maxval, maxval] onto a signed field, truncating toward
// zero. The scale factor is itself truncated to a whole number first, so for
// width 5 and maxval 0.3 it is exactly 50; decoders must divide by the same
// constant.
fn quantize_signed(value: f64, width: u32, maxval: f64) -> i64 {
  let scale = (((1u64 << (width - 1)) - 1) as f64 / maxval) as u64;

  (value * scale as f64) as i64
}

fn dequantize_signed(value: i64, width: u32, maxval: f64) -> f64 {
  let scale = (((1u64 << (width - 1)) - 1) as f64 / maxval) as u64;

  value as f64 / scale as f64
}

// Quantize a block and pack it. The b/c/d clamp and the index widths keep
// every quantized value inside its field, so Overflow is unreachable for
// blocks produced by the forward transform.
pub fn pack(block: &DctBlock) -> Result<u32, Overflow> {
  let pc = &SCHEME;

  let a = quantize_unsigned(block.a, pc.a_width);
  let b = quantize_signed(block.b, pc.b_width, BCD_MAX);
  let c = quantize_signed(block.c, pc.c_width, BCD_MAX);
  let d = quantize_signed(block.d, pc.d_width, BCD_MAX);

  let mut word = 0u64;
  word = bitpack::put_unsigned(word, pc.a_width, pc.a_lsb, a)?;
  word = bitpack::put_signed(word, pc.b_width, pc.b_lsb, b)?;
  word = bitpack::put_signed(word, pc.c_width, pc.c_lsb, c)?;
  word = bitpack::put_signed(word, pc.d_width, pc.d_lsb, d)?;
  word = bitpack::put_unsigned(word, pc.pb_width, pc.pb_lsb, block.pb_index as u64)?;
  word = bitpack::put_unsigned(word, pc.pr_width, pc.pr_lsb, block.pr_index as u64)?;

  return Ok(word as u32);
}

pub fn unpack(codeword: u32) -> DctBlock {
  let pc = &SCHEME;
  let word = codeword as u64;

  let a = bitpack::get_unsigned(word, pc.a_width, pc.a_lsb);
  let b = bitpack::get_signed(word, pc.b_width, pc.b_lsb);
  let c = bitpack::get_signed(word, pc.c_width, pc.c_lsb);
  let d = bitpack::get_signed(word, pc.d_width, pc.d_lsb);

  let pb_index = bitpack::get_unsigned(word, pc.pb_width, pc.pb_lsb);
  let pr_index = bitpack::get_unsigned(word, pc.pr_width, pc.pr_lsb);

  DctBlock {
    a: dequantize_unsigned(a, pc.a_width),
    b: dequantize_signed(b, pc.b_width, BCD_MAX),
    c: dequantize_signed(c, pc.c_width, BCD_MAX),
    d: dequantize_signed(d, pc.d_width, BCD_MAX),
    pb_index: pb_index as u8,
    pr_index: pr_index as u8,
  }
}
