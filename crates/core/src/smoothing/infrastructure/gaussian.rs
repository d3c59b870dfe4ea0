/// Upper bound on kernel taps so absurd radii cannot stall a frame.
const MAX_KERNEL_SIZE: usize = 201;

/// Normalized 1D Gaussian kernel for the given sigma.
///
/// Size is `2 * ceil(3 * sigma) + 1` (capped), which keeps ~99.7% of the
/// distribution. A non-positive sigma yields the identity kernel `[1.0]`.
pub fn kernel_for_sigma(sigma: f64) -> Vec<f32> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return vec![1.0];
    }
    let half = ((3.0 * sigma).ceil() as usize).min(MAX_KERNEL_SIZE / 2);
    let mut weights: Vec<f64> = (0..=2 * half)
        .map(|i| {
            let x = i as f64 - half as f64;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights.iter().map(|&w| w as f32).collect()
}

/// Separable Gaussian blur of interleaved `u8` pixels, edges clamped.
///
/// Returns the blurred values as `f32` so callers can mix them with the
/// source before quantizing. `temp` is a reusable scratch buffer.
pub fn blur_separable(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    kernel: &[f32],
    temp: &mut Vec<f32>,
) -> Vec<f32> {
    let len = width * height * channels;
    if kernel.len() <= 1 || width == 0 || height == 0 {
        return data.iter().map(|&v| v as f32).collect();
    }
    let half = (kernel.len() / 2) as isize;

    temp.clear();
    temp.resize(len, 0.0);

    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut sum = 0.0f32;
                for (k, &w) in kernel.iter().enumerate() {
                    let sx = (x as isize + k as isize - half).clamp(0, width as isize - 1) as usize;
                    sum += data[(y * width + sx) * channels + c] as f32 * w;
                }
                temp[(y * width + x) * channels + c] = sum;
            }
        }
    }

    let mut out = vec![0.0f32; len];
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut sum = 0.0f32;
                for (k, &w) in kernel.iter().enumerate() {
                    let sy =
                        (y as isize + k as isize - half).clamp(0, height as isize - 1) as usize;
                    sum += temp[(sy * width + x) * channels + c] * w;
                }
                out[(y * width + x) * channels + c] = sum;
            }
        }
    }
    out
}
