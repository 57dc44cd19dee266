use bytemuck::Zeroable;

// RGB <-> component video conversion
// Both directions are fixed linear matrices over channels normalized to
// [0, 1]. The forward direction is unclamped; the inverse clamps each RGB
// channel back into [0, 1] because quantization can push it outside.

// One component-video sample. pb_index/pr_index hold the shared 4-bit
// chroma indices of the enclosing 2x2 block once chroma averaging has run.
#[derive(Clone, Copy, Zeroable)]
pub struct CvPixel {
  pub y: f64,
  pub pb: f64,
  pub pr: f64,
  pub pb_index: u8,
  pub pr_index: u8,
}

pub fn rgb_to_cv(r: f64, g: f64, b: f64) -> CvPixel {
  let y = 0.299 * r + 0.587 * g + 0.114 * b;
  let pb = -0.168736 * r - 0.331264 * g + 0.5 * b;
  let pr = 0.5 * r - 0.418688 * g - 0.081312 * b;

  CvPixel {
    y: y,
    pb: pb,
    pr: pr,
    pb_index: 0,
    pr_index: 0,
  }
}

pub fn cv_to_rgb(y: f64, pb: f64, pr: f64) -> (f64, f64, f64) {
  let r = y + 1.402 * pr;
  let g = y - 0.344136 * pb - 0.714136 * pr;
  let b = y + 1.772 * pb;

  (clamp_01(r), clamp_01(g), clamp_01(b))
}

fn clamp_01(value: f64) -> f64 {
  if value < 0.0 {
    return 0.0;
  }
  if value > 1.0 {
    return 1.0;
  }

  value
}
