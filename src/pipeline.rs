use std::io::{Read, Write};

use crate::chroma;
use crate::codeword;
use crate::colorspace::{self, CvPixel};
use crate::dct::{self, DctBlock};
use crate::error::CodecError;
use crate::framing;
use crate::grid::Grid;
use crate::ppm::{self, Ppm, Rgb};

// The two end-to-end pipelines. Each stage owns the grid it produces and
// hands it to the next stage; every grid dies before the function returns.
// Block traversal is row-major (y outer, x inner) on both sides, which is
// what fixes the codeword order on the wire.

// Every decompressed image is written with this denominator. Smaller values
// lose precision, larger ones only make the file bigger.
const OUTPUT_DENOMINATOR: u16 = 255;

pub fn compress<R: Read, W: Write>(input: &mut R, output: &mut W) -> Result<(), CodecError> {
  let image = ppm::read_ppm(input)?;

  // Round both dimensions down to even, dropping the rightmost column
  // and/or bottom row of odd-sized images
  let width = image.width & !1;
  let height = image.height & !1;
  let denominator = image.denominator as f64;

  // Pixel space -> component video, normalized by the source denominator
  let mut cv = Grid::new_with(width, height, |x, y| {
    let pixel = image.pixels[(x, y)];
    colorspace::rgb_to_cv(
      pixel.red as f64 / denominator,
      pixel.green as f64 / denominator,
      pixel.blue as f64 / denominator,
    )
  });

  average_chroma(&mut cv);

  // Component video -> one DctBlock per 2x2 block
  let dct = Grid::new_with(width / 2, height / 2, |bx, by| {
    let x = bx * 2;
    let y = by * 2;

    let pix1 = cv[(x, y)];
    let pix2 = cv[(x + 1, y)];
    let pix3 = cv[(x, y + 1)];
    let pix4 = cv[(x + 1, y + 1)];

    let (a, b, c, d) = dct::forward(pix1.y, pix2.y, pix3.y, pix4.y);

    DctBlock {
      a: a,
      b: b,
      c: c,
      d: d,
      // All four pixels carry the block's indices; take the bottom-right
      pb_index: pix4.pb_index,
      pr_index: pix4.pr_index,
    }
  });

  let mut codewords = Vec::with_capacity(dct.width() * dct.height());
  for by in 0..dct.height() {
    for bx in 0..dct.width() {
      codewords.push(codeword::pack(&dct[(bx, by)])?);
    }
  }

  framing::write_stream(output, width, height, &codewords)
}

pub fn decompress<R: Read, W: Write>(input: &mut R, output: &mut W) -> Result<(), CodecError> {
  let (width, height, codewords) = framing::read_stream(input)?;

  let block_width = width / 2;
  let block_height = height / 2;

  let mut dct: Grid<DctBlock> = Grid::zeroed(block_width, block_height);
  for by in 0..block_height {
    for bx in 0..block_width {
      dct[(bx, by)] = codeword::unpack(codewords[by * block_width + bx]);
    }
  }

  // DctBlocks -> component video: each block reconstructs its four Y
  // values and shares its dequantized chromas across the 2x2 pixels
  let mut cv: Grid<CvPixel> = Grid::zeroed(block_width * 2, block_height * 2);
  for by in 0..block_height {
    for bx in 0..block_width {
      let block = dct[(bx, by)];
      let (y1, y2, y3, y4) = dct::inverse(block.a, block.b, block.c, block.d);

      let pb = chroma::chroma_of_index(block.pb_index);
      let pr = chroma::chroma_of_index(block.pr_index);

      let x = bx * 2;
      let y = by * 2;
      cv[(x, y)] = cv_pixel(y1, pb, pr, &block);
      cv[(x + 1, y)] = cv_pixel(y2, pb, pr, &block);
      cv[(x, y + 1)] = cv_pixel(y3, pb, pr, &block);
      cv[(x + 1, y + 1)] = cv_pixel(y4, pb, pr, &block);
    }
  }

  // Component video -> RGB at the fixed output denominator, truncating
  // toward zero after the [0, 1] clamp
  let denominator = OUTPUT_DENOMINATOR as f64;
  let pixels = Grid::new_with(cv.width(), cv.height(), |x, y| {
    let pixel = cv[(x, y)];
    let (r, g, b) = colorspace::cv_to_rgb(pixel.y, pixel.pb, pixel.pr);

    Rgb {
      red: (r * denominator) as u16,
      green: (g * denominator) as u16,
      blue: (b * denominator) as u16,
    }
  });

  let image = Ppm {
    width: pixels.width(),
    height: pixels.height(),
    denominator: OUTPUT_DENOMINATOR,
    pixels: pixels,
  };

  ppm::write_ppm(output, &image)
}

// Average Pb and Pr over each 2x2 block, quantize the averages once per
// channel, and write the shared pair of indices into all four member pixels
fn average_chroma(cv: &mut Grid<CvPixel>) {
  for by in 0..cv.height() / 2 {
    for bx in 0..cv.width() / 2 {
      let x = bx * 2;
      let y = by * 2;

      let avg_pb = (cv[(x, y)].pb + cv[(x + 1, y)].pb
                    + cv[(x, y + 1)].pb + cv[(x + 1, y + 1)].pb) / 4.0;
      let avg_pr = (cv[(x, y)].pr + cv[(x + 1, y)].pr
                    + cv[(x, y + 1)].pr + cv[(x + 1, y + 1)].pr) / 4.0;

      let pb_index = chroma::index_of_chroma(avg_pb);
      let pr_index = chroma::index_of_chroma(avg_pr);

      for dy in 0..2 {
        for dx in 0..2 {
          let pixel = &mut cv[(x + dx, y + dy)];
          pixel.pb_index = pb_index;
          pixel.pr_index = pr_index;
        }
      }
    }
  }
}

fn cv_pixel(y: f64, pb: f64, pr: f64, block: &DctBlock) -> CvPixel {
  CvPixel {
    y: y,
    pb: pb,
    pr: pr,
    pb_index: block.pb_index,
    pr_index: block.pr_index,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Cursor;

  fn solid_ppm(width: usize, height: usize, value: u16) -> Vec<u8> {
    let image = Ppm {
      width: width,
      height: height,
      denominator: 255,
      pixels: Grid::new_with(width, height, |_, _| {
        Rgb { red: value, green: value, blue: value }
      }),
    };

    let mut buffer = Vec::new();
    ppm::write_ppm(&mut buffer, &image).unwrap();
    return buffer;
  }

  fn compress_bytes(ppm_bytes: Vec<u8>) -> Vec<u8> {
    let mut compressed = Vec::new();
    compress(&mut Cursor::new(ppm_bytes), &mut compressed).unwrap();
    return compressed;
  }

  #[test]
  fn gray_block_round_trips_within_one_step() {
    let compressed = compress_bytes(solid_ppm(2, 2, 128));

    // Header, "2 2" dimension line, one codeword
    assert_eq!(compressed.len(), 33 + 4 + 4);

    let mut decompressed = Vec::new();
    decompress(&mut Cursor::new(compressed), &mut decompressed).unwrap();

    let image = ppm::read_ppm(&mut Cursor::new(decompressed)).unwrap();
    assert_eq!(image.width, 2);
    assert_eq!(image.height, 2);
    assert_eq!(image.denominator, 255);

    for y in 0..2 {
      for x in 0..2 {
        let pixel = image.pixels[(x, y)];
        assert!((pixel.red as i32 - 128).abs() <= 1);
        assert!((pixel.green as i32 - 128).abs() <= 1);
        assert!((pixel.blue as i32 - 128).abs() <= 1);
      }
    }
  }

  #[test]
  fn four_by_four_yields_four_codewords() {
    let compressed = compress_bytes(solid_ppm(4, 4, 40));

    assert_eq!(&compressed[..33], b"COMP40 Compressed image format 2\n");
    assert_eq!(&compressed[33..37], b"4 4\n");
    assert_eq!(compressed.len(), 37 + 4 * 4);

    // A solid image compresses every block to the same codeword
    assert_eq!(&compressed[37..41], &compressed[49..53]);
  }

  #[test]
  fn odd_dimensions_are_trimmed_to_even() {
    let compressed = compress_bytes(solid_ppm(5, 3, 200));

    assert_eq!(&compressed[33..37], b"4 2\n");

    let mut decompressed = Vec::new();
    decompress(&mut Cursor::new(compressed), &mut decompressed).unwrap();

    let image = ppm::read_ppm(&mut Cursor::new(decompressed)).unwrap();
    assert_eq!(image.width, 4);
    assert_eq!(image.height, 2);
  }

  #[test]
  fn recompression_is_stable() {
    // Once an image has been through the codec, its dimensions are even
    // and compressing the decompressed output keeps them
    let first = compress_bytes(solid_ppm(5, 5, 90));
    assert_eq!(&first[33..37], b"4 4\n");

    let mut decompressed = Vec::new();
    decompress(&mut Cursor::new(first), &mut decompressed).unwrap();

    let second = compress_bytes(decompressed);
    assert_eq!(&second[33..37], b"4 4\n");
  }

  #[test]
  fn colored_image_round_trips_closely() {
    // A gentle two-tone image: quantization error stays small
    let image = Ppm {
      width: 4,
      height: 2,
      denominator: 255,
      pixels: Grid::new_with(4, 2, |x, _| {
        if x < 2 {
          Rgb { red: 120, green: 130, blue: 110 }
        } else {
          Rgb { red: 130, green: 120, blue: 140 }
        }
      }),
    };

    let mut ppm_bytes = Vec::new();
    ppm::write_ppm(&mut ppm_bytes, &image).unwrap();

    let compressed = compress_bytes(ppm_bytes);
    let mut decompressed = Vec::new();
    decompress(&mut Cursor::new(compressed), &mut decompressed).unwrap();

    let decoded = ppm::read_ppm(&mut Cursor::new(decompressed)).unwrap();
    for y in 0..2 {
      for x in 0..4 {
        let before = image.pixels[(x, y)];
        let after = decoded.pixels[(x, y)];
        assert!((before.red as i32 - after.red as i32).abs() <= 12);
        assert!((before.green as i32 - after.green as i32).abs() <= 12);
        assert!((before.blue as i32 - after.blue as i32).abs() <= 12);
      }
    }
  }
}
