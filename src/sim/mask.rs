//! Bit-packed solidity masks for pixel-exact overlap tests
//!
//! Each row is stored as a run of `u64` words, bit `i` of word `w` being the
//! pixel at `x = 64 * w + i`. Bits past the mask width are always zero, so a
//! row-word AND never reports phantom overlaps.

use glam::IVec2;

use super::track::TrackError;

const WORD_BITS: i64 = 64;

/// A per-pixel solidity bitmap
#[derive(Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    /// Words per row
    stride: usize,
    words: Vec<u64>,
}

impl std::fmt::Debug for Mask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mask")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("solid", &self.count())
            .finish()
    }
}

impl Mask {
    /// Create an empty (fully clear) mask
    pub fn new(width: u32, height: u32) -> Self {
        let stride = (width as usize).div_ceil(WORD_BITS as usize);
        Self {
            width,
            height,
            stride,
            words: vec![0; stride * height as usize],
        }
    }

    /// Create a fully solid mask
    pub fn full(width: u32, height: u32) -> Self {
        Self::from_fn(width, height, |_, _| true)
    }

    /// Build a mask by evaluating `solid` for every pixel
    pub fn from_fn(width: u32, height: u32, mut solid: impl FnMut(u32, u32) -> bool) -> Self {
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if solid(x, y) {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    /// Build a mask from a row-major alpha channel.
    ///
    /// A pixel is solid when its alpha is strictly above `threshold`.
    pub fn from_alpha(
        width: u32,
        height: u32,
        alpha: &[u8],
        threshold: u8,
    ) -> Result<Self, TrackError> {
        let expected = width as usize * height as usize;
        if alpha.len() != expected {
            return Err(TrackError::AlphaSize {
                expected,
                actual: alpha.len(),
            });
        }
        Ok(Self::from_fn(width, height, |x, y| {
            alpha[y as usize * width as usize + x as usize] > threshold
        }))
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the pixel at (x, y) is solid; out-of-bounds reads are clear
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return false;
        }
        let word = self.words[y as usize * self.stride + x as usize / 64];
        (word >> (x as u32 % 64)) & 1 == 1
    }

    /// Set a pixel; out-of-bounds writes are ignored
    pub fn set(&mut self, x: u32, y: u32, solid: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = y as usize * self.stride + x as usize / 64;
        let bit = 1u64 << (x % 64);
        if solid {
            self.words[idx] |= bit;
        } else {
            self.words[idx] &= !bit;
        }
    }

    /// Number of solid pixels
    pub fn count(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    /// True if no pixel is solid
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Word `idx` of a row, zero outside the row
    #[inline]
    fn row_word(&self, row: usize, idx: i64) -> u64 {
        if idx < 0 || idx >= self.stride as i64 {
            return 0;
        }
        self.words[row * self.stride + idx as usize]
    }

    /// 64 pixels of a row starting at column `start` (may be negative)
    #[inline]
    fn row_bits_from(&self, row: usize, start: i64) -> u64 {
        let idx = start.div_euclid(WORD_BITS);
        let shift = start.rem_euclid(WORD_BITS) as u32;
        let lo = self.row_word(row, idx);
        if shift == 0 {
            lo
        } else {
            (lo >> shift) | (self.row_word(row, idx + 1) << (64 - shift))
        }
    }

    /// First pixel where `other`, placed at `offset` in this mask's space,
    /// overlaps this mask.
    ///
    /// Rows are scanned top to bottom and each row left to right, so the
    /// returned point has the smallest `y` of any overlap. The point is in
    /// this mask's local coordinates.
    pub fn overlap(&self, other: &Mask, offset: IVec2) -> Option<IVec2> {
        let y_start = offset.y.max(0);
        let y_end = (offset.y + other.height as i32).min(self.height as i32);
        if y_start >= y_end {
            return None;
        }
        let x_start = offset.x.max(0);
        let x_end = (offset.x + other.width as i32).min(self.width as i32);
        if x_start >= x_end {
            return None;
        }

        let first_word = x_start as usize / 64;
        let last_word = (x_end as usize - 1) / 64;

        for y in y_start..y_end {
            let other_row = (y - offset.y) as usize;
            for w in first_word..=last_word {
                let mine = self.words[y as usize * self.stride + w];
                if mine == 0 {
                    continue;
                }
                let theirs = other.row_bits_from(other_row, w as i64 * WORD_BITS - offset.x as i64);
                let hit = mine & theirs;
                if hit != 0 {
                    let x = w as i32 * 64 + hit.trailing_zeros() as i32;
                    return Some(IVec2::new(x, y));
                }
            }
        }
        None
    }

    /// Rotate counter-clockwise (as seen on screen) by `degrees` about the
    /// mask centre, sampling nearest pixels.
    ///
    /// Returns the rotated mask, sized to the rotated bounding box, and the
    /// shift of its top-left corner relative to the unrotated top-left.
    pub fn rotated(&self, degrees: f32) -> (Mask, IVec2) {
        let turns = degrees.rem_euclid(360.0);
        if turns == 0.0 {
            return (self.clone(), IVec2::ZERO);
        }

        let (sin, cos) = turns.to_radians().sin_cos();
        let (w, h) = (self.width as f32, self.height as f32);
        let new_w = (w * cos.abs() + h * sin.abs() - 1e-3).ceil().max(1.0) as u32;
        let new_h = (w * sin.abs() + h * cos.abs() - 1e-3).ceil().max(1.0) as u32;

        let src_cx = w / 2.0;
        let src_cy = h / 2.0;
        let dst_cx = new_w as f32 / 2.0;
        let dst_cy = new_h as f32 / 2.0;

        let rotated = Mask::from_fn(new_w, new_h, |x, y| {
            let dx = x as f32 + 0.5 - dst_cx;
            let dy = y as f32 + 0.5 - dst_cy;
            // Inverse of the on-screen counter-clockwise rotation (Y down)
            let sx = dx * cos - dy * sin + src_cx;
            let sy = dx * sin + dy * cos + src_cy;
            self.get(sx.floor() as i32, sy.floor() as i32)
        });

        let shift = IVec2::new(
            (self.width / 2) as i32 - (new_w / 2) as i32,
            (self.height / 2) as i32 - (new_h / 2) as i32,
        );
        (rotated, shift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_and_count() {
        let mut mask = Mask::new(130, 3);
        mask.set(0, 0, true);
        mask.set(64, 1, true);
        mask.set(129, 2, true);
        mask.set(500, 0, true); // ignored
        assert!(mask.get(0, 0));
        assert!(mask.get(64, 1));
        assert!(mask.get(129, 2));
        assert!(!mask.get(-1, 0));
        assert_eq!(mask.count(), 3);

        mask.set(64, 1, false);
        assert_eq!(mask.count(), 2);
    }

    #[test]
    fn test_overlap_reports_first_row_then_column() {
        let target = Mask::full(10, 10);
        let car = Mask::full(3, 3);
        assert_eq!(target.overlap(&car, IVec2::new(4, 5)), Some(IVec2::new(4, 5)));
        // Partially above the target: clipped to row 0
        assert_eq!(target.overlap(&car, IVec2::new(2, -1)), Some(IVec2::new(2, 0)));
        // Entirely outside
        assert_eq!(target.overlap(&car, IVec2::new(10, 0)), None);
        assert_eq!(target.overlap(&car, IVec2::new(-3, 0)), None);
    }

    #[test]
    fn test_overlap_is_shape_exact() {
        // Hollow square: bounding boxes overlap but pixels do not
        let ring = Mask::from_fn(20, 20, |x, y| x == 0 || y == 0 || x == 19 || y == 19);
        let dot = Mask::full(2, 2);
        assert_eq!(ring.overlap(&dot, IVec2::new(9, 9)), None);
        assert_eq!(ring.overlap(&dot, IVec2::new(18, 9)), Some(IVec2::new(19, 9)));
    }

    #[test]
    fn test_overlap_across_word_boundaries() {
        let mut target = Mask::new(200, 1);
        target.set(130, 0, true);
        let mut probe = Mask::new(70, 1);
        probe.set(69, 0, true);
        // probe pixel 69 lands on target column 130 when offset is 61
        assert_eq!(target.overlap(&probe, IVec2::new(61, 0)), Some(IVec2::new(130, 0)));
        assert_eq!(target.overlap(&probe, IVec2::new(60, 0)), None);
        // Negative offsets shift the probe left
        let mut far = Mask::new(300, 1);
        far.set(250, 0, true);
        let mut left = Mask::new(200, 1);
        left.set(130, 0, true);
        assert_eq!(left.overlap(&far, IVec2::new(-120, 0)), Some(IVec2::new(130, 0)));
    }

    #[test]
    fn test_from_alpha_threshold() {
        let alpha = [0, 127, 128, 255];
        let mask = Mask::from_alpha(2, 2, &alpha, 127).unwrap();
        assert!(!mask.get(0, 0));
        assert!(!mask.get(1, 0));
        assert!(mask.get(0, 1));
        assert!(mask.get(1, 1));

        assert!(Mask::from_alpha(3, 3, &alpha, 127).is_err());
    }

    #[test]
    fn test_rotation_quarter_turn_swaps_dimensions() {
        let bar = Mask::full(4, 10);
        let (rotated, shift) = bar.rotated(90.0);
        assert_eq!((rotated.width(), rotated.height()), (10, 4));
        assert_eq!(rotated.count(), 40);
        assert_eq!(shift, IVec2::new(2 - 5, 5 - 2));
    }

    #[test]
    fn test_rotation_direction_is_counter_clockwise() {
        // Single marker at the top of a vertical bar
        let marker = Mask::from_fn(4, 10, |_, y| y == 0);
        let (rotated, _) = marker.rotated(90.0);
        // Counter-clockwise on screen moves the top edge to the left edge
        assert!((0..4).all(|y| rotated.get(0, y)));
        assert!(!rotated.get(9, 0));
    }

    #[test]
    fn test_zero_rotation_is_identity() {
        let mask = Mask::from_fn(7, 5, |x, y| (x + y) % 2 == 0);
        let (rotated, shift) = mask.rotated(360.0);
        assert_eq!(rotated, mask);
        assert_eq!(shift, IVec2::ZERO);
    }
}
