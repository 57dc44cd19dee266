//! Lossy compressor for portable pixmaps.
//!
//! An image is compressed 4:1 by converting each pixel to component video,
//! averaging the two chroma channels over every 2x2 block, transforming the
//! four luminance values of a block into one average and three difference
//! coefficients, and quantizing everything into a single 32-bit codeword:
//!
//! ```text
//! bit 31                                                        bit 0
//! .--------------+--------+--------+--------+----------+----------.
//! |  a (9 bits)  | b (5)  | c (5)  | d (5)  | pb (4)   | pr (4)   |
//! `--------------+--------+--------+--------+----------+----------`
//! ```
//!
//! where `a` is unsigned, `b`/`c`/`d` are two's-complement signed, and the
//! two 4-bit fields index a fixed chroma table. The compressed stream is a
//! short textual header followed by one big-endian codeword per block.

pub mod bitpack;
pub mod chroma;
pub mod codeword;
pub mod colorspace;
pub mod dct;
pub mod diff;
pub mod error;
pub mod framing;
pub mod grid;
pub mod pipeline;
pub mod ppm;
