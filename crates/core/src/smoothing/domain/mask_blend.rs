use crate::shared::face_region::PixelRect;
use crate::shared::frame::Frame;

use super::feather_mask::FeatherMask;
use super::region_error::RegionError;

/// Composites `smoothed` over `accumulator` inside `bounds`:
/// `out = alpha * smoothed + (1 - alpha) * accumulator`.
///
/// `smoothed` covers the frame area starting at `origin` and must contain
/// all of `bounds`. Writes are confined to the accumulator's extent, and
/// pixels with zero alpha are left byte-identical.
pub fn blend_masked(
    accumulator: &mut Frame,
    smoothed: &Frame,
    origin: (i32, i32),
    bounds: PixelRect,
    mask: &FeatherMask,
) -> Result<(), RegionError> {
    let Some(bounds) = bounds.clamp_to(accumulator.width(), accumulator.height()) else {
        return Ok(());
    };

    let (ox, oy) = origin;
    let covers = ox <= bounds.x
        && oy <= bounds.y
        && ox + smoothed.width() as i32 >= bounds.right()
        && oy + smoothed.height() as i32 >= bounds.bottom()
        && smoothed.channels() == accumulator.channels();
    if !covers {
        return Err(RegionError::ExtentMismatch {
            actual_w: smoothed.width(),
            actual_h: smoothed.height(),
            expected_w: bounds.width as u32,
            expected_h: bounds.height as u32,
        });
    }

    let channels = accumulator.channels() as usize;
    let src = smoothed.as_ndarray();
    let mut dst = accumulator.as_ndarray_mut();

    for y in bounds.y..bounds.bottom() {
        for x in bounds.x..bounds.right() {
            let alpha = mask.alpha_at_pixel(x, y);
            if alpha <= 0.0 {
                continue;
            }
            let (dy, dx) = (y as usize, x as usize);
            let (sy, sx) = ((y - oy) as usize, (x - ox) as usize);
            for c in 0..channels {
                let s = src[[sy, sx, c]] as f64;
                let a = dst[[dy, dx, c]] as f64;
                dst[[dy, dx, c]] = (alpha * s + (1.0 - alpha) * a).round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_at(cx: f64, cy: f64) -> FeatherMask {
        FeatherMask::new((cx, cy), 4.0, 8.0).unwrap()
    }

    #[test]
    fn test_opaque_center_takes_smoothed_value() {
        let mut acc = Frame::filled(20, 20, 10, 0);
        let smoothed = Frame::filled(20, 20, 200, 0);
        let mask = mask_at(10.0, 10.0);
        let bounds = mask.bounds(20, 20).unwrap();
        blend_masked(&mut acc, &smoothed, (0, 0), bounds, &mask).unwrap();
        assert_eq!(acc.pixel(10, 10), &[200, 200, 200]);
    }

    #[test]
    fn test_outside_outer_radius_untouched() {
        let mut acc = Frame::filled(40, 40, 10, 0);
        let smoothed = Frame::filled(40, 40, 200, 0);
        let mask = mask_at(20.0, 20.0);
        blend_masked(&mut acc, &smoothed, (0, 0), PixelRect::new(0, 0, 40, 40), &mask).unwrap();
        assert_eq!(acc.pixel(0, 0), &[10, 10, 10]);
        assert_eq!(acc.pixel(20, 29), &[10, 10, 10]);
    }

    #[test]
    fn test_feather_band_is_weighted_average() {
        let mut acc = Frame::filled(40, 40, 0, 0);
        let smoothed = Frame::filled(40, 40, 100, 0);
        let mask = mask_at(20.0, 20.0);
        blend_masked(&mut acc, &smoothed, (0, 0), PixelRect::new(0, 0, 40, 40), &mask).unwrap();
        let alpha = mask.alpha_at_pixel(26, 19);
        assert!(alpha > 0.0 && alpha < 1.0);
        let expected = (alpha * 100.0).round() as u8;
        assert_eq!(acc.pixel(26, 19)[0], expected);
    }

    #[test]
    fn test_smoothed_crop_with_origin() {
        let mut acc = Frame::filled(30, 30, 0, 0);
        let mask = mask_at(15.0, 15.0);
        let bounds = mask.bounds(30, 30).unwrap();
        let crop = Frame::filled(bounds.width as u32, bounds.height as u32, 90, 0);
        blend_masked(&mut acc, &crop, (bounds.x, bounds.y), bounds, &mask).unwrap();
        assert_eq!(acc.pixel(15, 15), &[90, 90, 90]);
        assert_eq!(acc.pixel(0, 0), &[0, 0, 0]);
    }

    #[test]
    fn test_smoothed_too_small_is_rejected() {
        let mut acc = Frame::filled(30, 30, 0, 0);
        let mask = mask_at(15.0, 15.0);
        let bounds = mask.bounds(30, 30).unwrap();
        let crop = Frame::filled(4, 4, 90, 0);
        let err = blend_masked(&mut acc, &crop, (bounds.x, bounds.y), bounds, &mask).unwrap_err();
        assert!(matches!(err, RegionError::ExtentMismatch { actual_w: 4, .. }));
        assert!(acc.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_bounds_beyond_frame_never_grow_canvas() {
        let mut acc = Frame::filled(10, 10, 0, 0);
        let smoothed = Frame::filled(10, 10, 50, 0);
        let mask = mask_at(9.0, 9.0);
        blend_masked(&mut acc, &smoothed, (0, 0), PixelRect::new(0, 0, 50, 50), &mask).unwrap();
        assert_eq!(acc.extent(), (10, 10));
        assert_eq!(acc.data().len(), 300);
    }
}
