//! 3D value noise and fractal Brownian motion.
//!
//! The lattice hash is the classic dot-product/sine construction so the CPU
//! path and the WGSL port in the renderer agree bit-for-bit in spirit (the
//! GPU evaluates the same formula in f32). Interpolation is straight
//! trilinear: sampling exactly on a lattice point returns that corner's hash
//! value, and the midpoint of a cell is the plain average of its 8 corners.

/// Constant hash kernel; any fixed irrational-ish vector works, this one is
/// the widely used shader folklore triple.
const HASH_KERNEL: [f32; 3] = [12.9898, 78.233, 37.719];
const HASH_SCALE: f32 = 43758.5453;

/// GLSL-style fract: always in `[0, 1)`, even for negative input.
fn fract(value: f32) -> f32 {
    value - value.floor()
}

/// Hash of an integer lattice point into `[0, 1)`.
pub fn lattice_hash(x: i32, y: i32, z: i32) -> f32 {
    let dot = x as f32 * HASH_KERNEL[0] + y as f32 * HASH_KERNEL[1] + z as f32 * HASH_KERNEL[2];
    fract(dot.sin() * HASH_SCALE)
}

/// Trilinearly interpolated value noise over the integer lattice.
pub fn value_noise(x: f32, y: f32, z: f32) -> f32 {
    let (ix, iy, iz) = (x.floor() as i32, y.floor() as i32, z.floor() as i32);
    let (fx, fy, fz) = (x - x.floor(), y - y.floor(), z - z.floor());

    let corner = |dx: i32, dy: i32, dz: i32| lattice_hash(ix + dx, iy + dy, iz + dz);
    let lerp = |a: f32, b: f32, t: f32| a + (b - a) * t;

    let x00 = lerp(corner(0, 0, 0), corner(1, 0, 0), fx);
    let x10 = lerp(corner(0, 1, 0), corner(1, 1, 0), fx);
    let x01 = lerp(corner(0, 0, 1), corner(1, 0, 1), fx);
    let x11 = lerp(corner(0, 1, 1), corner(1, 1, 1), fx);

    let y0 = lerp(x00, x10, fy);
    let y1 = lerp(x01, x11, fy);
    lerp(y0, y1, fz)
}

/// Octave stack parameters for [`fbm`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FbmParams {
    pub octaves: u32,
    pub lacunarity: f32,
    pub gain: f32,
}

impl Default for FbmParams {
    fn default() -> Self {
        Self {
            octaves: 5,
            lacunarity: 1.25,
            gain: 1.0,
        }
    }
}

/// Fractal Brownian motion: value noise summed across octaves, normalized
/// back into `[0, 1)`.
pub fn fbm(x: f32, y: f32, z: f32, params: &FbmParams) -> f32 {
    let octaves = params.octaves.max(1);
    let mut sum = 0.0;
    let mut total_amplitude = 0.0;
    let mut frequency = 1.0;
    let mut amplitude = 1.0;
    for _ in 0..octaves {
        sum += amplitude * value_noise(x * frequency, y * frequency, z * frequency);
        total_amplitude += amplitude;
        frequency *= params.lacunarity;
        amplitude *= params.gain;
    }
    sum / total_amplitude
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_is_exact_at_lattice_points() {
        for &(x, y, z) in &[(0, 0, 0), (3, -2, 7), (-5, 11, -1)] {
            let sampled = value_noise(x as f32, y as f32, z as f32);
            let expected = lattice_hash(x, y, z);
            assert!(
                (sampled - expected).abs() < 1e-6,
                "lattice ({x},{y},{z}): {sampled} != {expected}"
            );
        }
    }

    #[test]
    fn noise_at_cell_midpoint_is_corner_average() {
        let (ix, iy, iz) = (2, 3, 1);
        let mut sum = 0.0;
        for dx in 0..2 {
            for dy in 0..2 {
                for dz in 0..2 {
                    sum += lattice_hash(ix + dx, iy + dy, iz + dz);
                }
            }
        }
        let expected = sum / 8.0;
        let sampled = value_noise(ix as f32 + 0.5, iy as f32 + 0.5, iz as f32 + 0.5);
        assert!((sampled - expected).abs() < 1e-5);
    }

    #[test]
    fn hash_stays_in_unit_interval() {
        for x in -20..20 {
            for y in -20..20 {
                let value = lattice_hash(x, y, x ^ y);
                assert!((0.0..1.0).contains(&value), "hash escaped range: {value}");
            }
        }
    }

    #[test]
    fn fbm_stays_in_unit_interval() {
        let params = FbmParams::default();
        for step in 0..100 {
            let t = step as f32 * 0.173;
            let value = fbm(t, t * 0.7, t * 0.05, &params);
            assert!((0.0..1.0).contains(&value), "fbm escaped range: {value}");
        }
    }

    #[test]
    fn single_octave_fbm_matches_value_noise() {
        let params = FbmParams {
            octaves: 1,
            ..FbmParams::default()
        };
        let (x, y, z) = (4.3, -1.7, 0.2);
        assert!((fbm(x, y, z, &params) - value_noise(x, y, z)).abs() < 1e-6);
    }
}
