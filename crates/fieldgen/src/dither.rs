//! Ordered dithering against a fixed 8x8 Bayer matrix.

/// Side length of the threshold matrix; lookups are periodic with this
/// period in both axes.
pub const BAYER_SIDE: u32 = 8;

/// The 64 threshold levels, a fixed permutation of 0..=63.
const BAYER_LEVELS: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Threshold level at a pixel coordinate (wraps every 8 pixels).
pub fn threshold(x: u32, y: u32) -> u8 {
    BAYER_LEVELS[(y % BAYER_SIDE) as usize][(x % BAYER_SIDE) as usize]
}

/// Thresholds a field value in roughly `[0, 1]` at a pixel position.
///
/// Both sides are shifted by the matrix midpoint, so a mid-grey field
/// lights exactly half the cell. Purely spatial; no temporal jitter.
pub fn quantize(value: f32, x: u32, y: u32) -> bool {
    let level = (threshold(x, y) as f32 + 0.5) / 64.0;
    (value - 0.5) > (level - 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_periodic_in_both_axes() {
        for y in 0..24 {
            for x in 0..24 {
                assert_eq!(threshold(x, y), threshold(x + BAYER_SIDE, y));
                assert_eq!(threshold(x, y), threshold(x, y + BAYER_SIDE));
            }
        }
    }

    #[test]
    fn levels_are_a_permutation_of_0_to_63() {
        let mut seen = [false; 64];
        for y in 0..BAYER_SIDE {
            for x in 0..BAYER_SIDE {
                let level = threshold(x, y) as usize;
                assert!(level < 64);
                assert!(!seen[level], "level {level} appears twice");
                seen[level] = true;
            }
        }
        assert!(seen.iter().all(|&hit| hit));
    }

    #[test]
    fn quantize_extremes_are_uniform() {
        for y in 0..BAYER_SIDE {
            for x in 0..BAYER_SIDE {
                assert!(!quantize(0.0, x, y), "empty field lit ({x},{y})");
                assert!(quantize(1.0, x, y), "full field dark ({x},{y})");
            }
        }
    }

    #[test]
    fn mid_grey_lights_half_the_cell() {
        let mut lit = 0;
        for y in 0..BAYER_SIDE {
            for x in 0..BAYER_SIDE {
                if quantize(0.5, x, y) {
                    lit += 1;
                }
            }
        }
        assert_eq!(lit, 32);
    }
}
