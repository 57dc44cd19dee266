use thiserror::Error;

use crate::ppm::Ppm;

// Root-mean-square per-channel difference between two pixmaps, each
// channel normalized by its own image's denominator. Images may disagree
// by one row or column (the codec trims odd edges); anything more is not
// a comparable pair.

#[derive(Debug, Error)]
#[error("width or height of images differ by more than 1")]
pub struct DimensionMismatch;

pub fn rms_difference(first: &Ppm, second: &Ppm) -> Result<f64, DimensionMismatch> {
  let width_gap = first.width as i64 - second.width as i64;
  let height_gap = first.height as i64 - second.height as i64;

  if width_gap.abs() > 1 || height_gap.abs() > 1 {
    return Err(DimensionMismatch);
  }

  let width = first.width.min(second.width);
  let height = first.height.min(second.height);

  if width == 0 || height == 0 {
    return Ok(0.0);
  }

  let denominator1 = first.denominator as f64;
  let denominator2 = second.denominator as f64;

  let mut sum = 0.0;
  for y in 0..height {
    for x in 0..width {
      let pix1 = first.pixels[(x, y)];
      let pix2 = second.pixels[(x, y)];

      let red = pix1.red as f64 / denominator1 - pix2.red as f64 / denominator2;
      let green = pix1.green as f64 / denominator1 - pix2.green as f64 / denominator2;
      let blue = pix1.blue as f64 / denominator1 - pix2.blue as f64 / denominator2;

      sum += red * red + green * green + blue * blue;
    }
  }

  Ok((sum / (3 * width * height) as f64).sqrt())
}
