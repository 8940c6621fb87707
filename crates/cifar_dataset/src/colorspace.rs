//! Full-range BT.601 RGB <-> YUV conversion.

use crate::types::PLANE_LEN;

/// Convert one RGB pixel (each component in [0, 1]) to YUV.
pub fn rgb_to_yuv(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let u = -0.14713 * r - 0.28886 * g + 0.436 * b;
    let v = 0.615 * r - 0.51499 * g - 0.10001 * b;
    (y, u, v)
}

/// Convert one YUV pixel back to RGB (components clamped to [0, 1]).
pub fn yuv_to_rgb(y: f32, u: f32, v: f32) -> (f32, f32, f32) {
    let r = y + 1.13983 * v;
    let g = y - 0.39465 * u - 0.58060 * v;
    let b = y + 2.03211 * u;
    (r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0))
}

/// Convert a channel-planar RGB byte record (R plane, G plane, B plane) into
/// Y,U,V planes in the same plane-major layout.
pub fn rgb_planes_to_yuv(rgb: &[u8]) -> Vec<f32> {
    debug_assert_eq!(rgb.len(), 3 * PLANE_LEN);
    let mut planes = vec![0.0f32; 3 * PLANE_LEN];
    for i in 0..PLANE_LEN {
        let r = rgb[i] as f32 / 255.0;
        let g = rgb[PLANE_LEN + i] as f32 / 255.0;
        let b = rgb[2 * PLANE_LEN + i] as f32 / 255.0;
        let (y, u, v) = rgb_to_yuv(r, g, b);
        planes[i] = y;
        planes[PLANE_LEN + i] = u;
        planes[2 * PLANE_LEN + i] = v;
    }
    planes
}

/// Render Y,U,V planes as interleaved 8-bit RGB pixels (row-major).
pub fn yuv_planes_to_rgb8(y: &[f32], u: &[f32], v: &[f32]) -> Vec<u8> {
    debug_assert_eq!(y.len(), u.len());
    debug_assert_eq!(y.len(), v.len());
    let mut rgb = Vec::with_capacity(y.len() * 3);
    for i in 0..y.len() {
        let (r, g, b) = yuv_to_rgb(y[i], u[i], v[i]);
        rgb.push((r * 255.0).round() as u8);
        rgb.push((g * 255.0).round() as u8);
        rgb.push((b * 255.0).round() as u8);
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray_pixels_have_zero_chroma() {
        for value in [0.0, 0.25, 0.5, 1.0] {
            let (y, u, v) = rgb_to_yuv(value, value, value);
            assert!((y - value).abs() < 1e-5);
            assert!(u.abs() < 1e-5);
            assert!(v.abs() < 1e-5);
        }
    }

    #[test]
    fn rgb_round_trips_within_quantization_tolerance() {
        for (r, g, b) in [(1.0, 0.0, 0.0), (0.2, 0.7, 0.4), (0.9, 0.9, 0.1)] {
            let (y, u, v) = rgb_to_yuv(r, g, b);
            let (r2, g2, b2) = yuv_to_rgb(y, u, v);
            assert!((r - r2).abs() < 2.0 / 255.0, "r: {r} vs {r2}");
            assert!((g - g2).abs() < 2.0 / 255.0, "g: {g} vs {g2}");
            assert!((b - b2).abs() < 2.0 / 255.0, "b: {b} vs {b2}");
        }
    }
}
