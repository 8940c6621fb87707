//! Train/validation splitting.

use crate::types::YuvImage;

/// Split an already shuffled dataset, taking the validation fraction from the
/// tail. `val_ratio` is clamped to [0, 1].
pub fn split_train_val(mut images: Vec<YuvImage>, val_ratio: f32) -> (Vec<YuvImage>, Vec<YuvImage>) {
    let ratio = val_ratio.clamp(0.0, 1.0);
    let val_len = (images.len() as f32 * ratio).round() as usize;
    let train_len = images.len() - val_len.min(images.len());
    let val = images.split_off(train_len);
    (images, val)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PLANE_LEN;

    fn image(fill: f32) -> YuvImage {
        YuvImage {
            planes: vec![fill; 3 * PLANE_LEN],
        }
    }

    #[test]
    fn tail_fraction_becomes_validation() {
        let images: Vec<_> = (0..10).map(|i| image(i as f32)).collect();
        let (train, val) = split_train_val(images, 0.1);
        assert_eq!(train.len(), 9);
        assert_eq!(val.len(), 1);
        assert_eq!(val[0].planes[0], 9.0);
    }

    #[test]
    fn zero_ratio_keeps_everything_in_train() {
        let images: Vec<_> = (0..4).map(|i| image(i as f32)).collect();
        let (train, val) = split_train_val(images, 0.0);
        assert_eq!(train.len(), 4);
        assert!(val.is_empty());
    }
}
