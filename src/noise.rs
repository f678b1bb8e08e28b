use std::collections::HashMap;

use rand::{Rng, SeedableRng, rngs::StdRng};

/// Gradient noise over an `N`-dimensional unit integer lattice.
///
/// Every lattice corner carries a pseudorandom unit gradient drawn from a
/// seed derived from the corner coordinates and the field seed, so two
/// fields with the same seed agree everywhere, including across cell
/// boundaries. Values are bounded by sqrt(N)/2 and cluster well inside
/// [-0.5, 0.5]; the value at exact lattice points is 0.
pub struct Perlin<const N: usize> {
    seed: u64,
    gradients: HashMap<[i64; N], [f64; N]>,
}

impl<const N: usize> Perlin<N> {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            gradients: HashMap::new(),
        }
    }

    /// Noise value at `point`: the fade-weighted blend of every cell
    /// corner's gradient dotted with the offset from that corner.
    pub fn sample(&mut self, point: [f64; N]) -> f64 {
        let base: [i64; N] = point.map(|f| f.floor() as i64);
        let mut frac = [0.0f64; N];
        for d in 0..N {
            frac[d] = point[d] - base[d] as f64;
        }
        let fade_by_dim = frac.map(fade);

        let mut value = 0.0;
        for mask in 0..1usize << N {
            let mut corner = base;
            let mut offset = frac;
            let mut weight = 1.0;
            for d in 0..N {
                if mask & (1 << d) != 0 {
                    corner[d] += 1;
                    offset[d] -= 1.0;
                    weight *= fade_by_dim[d];
                } else {
                    weight *= 1.0 - fade_by_dim[d];
                }
            }
            let gradient = self.gradient(corner);
            value += weight * dot(&offset, &gradient);
        }
        value
    }

    fn gradient(&mut self, corner: [i64; N]) -> [f64; N] {
        let seed = self.seed;
        *self
            .gradients
            .entry(corner)
            .or_insert_with(|| corner_gradient(seed, &corner))
    }
}

/// Quintic smoothstep; zero first and second derivative at both ends.
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn dot<const N: usize>(a: &[f64; N], b: &[f64; N]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// FNV-1a over the corner coordinates, folded with the field seed.
fn corner_seed<const N: usize>(seed: u64, corner: &[i64; N]) -> u64 {
    let mut h = 0xcbf29ce484222325u64 ^ seed;
    for &c in corner {
        for b in (c as u64).to_le_bytes() {
            h ^= b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
    }
    h
}

/// Uniform unit vector: normalized standard normals, redrawn in the
/// degenerate all-zero case.
fn corner_gradient<const N: usize>(seed: u64, corner: &[i64; N]) -> [f64; N] {
    let mut rng = StdRng::seed_from_u64(corner_seed(seed, corner));
    loop {
        let mut v = [0.0f64; N];
        let mut i = 0;
        while i < N {
            let (a, b) = gaussian_pair(&mut rng);
            v[i] = a;
            if i + 1 < N {
                v[i + 1] = b;
            }
            i += 2;
        }
        let norm = dot(&v, &v).sqrt();
        if norm > 1e-12 {
            return v.map(|x| x / norm);
        }
    }
}

/// Two independent standard normals via the Box-Muller transform.
fn gaussian_pair(rng: &mut StdRng) -> (f64, f64) {
    let u1 = 1.0 - rng.gen_range(0.0..1.0);
    let u2 = rng.gen_range(0.0..1.0);
    let r = (-2.0 * f64::ln(u1)).sqrt();
    let theta = std::f64::consts::TAU * u2;
    (r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_hits_the_anchor_points() {
        assert_eq!(fade(0.0), 0.0);
        assert_eq!(fade(0.5), 0.5);
        assert_eq!(fade(1.0), 1.0);
    }

    #[test]
    fn lattice_points_are_zero() {
        let mut field = Perlin::<2>::new(7);
        assert_eq!(field.sample([0.0, 0.0]), 0.0);
        assert_eq!(field.sample([3.0, -2.0]), 0.0);
    }

    #[test]
    fn same_seed_agrees_across_instances() {
        let mut a = Perlin::<3>::new(42);
        let mut b = Perlin::<3>::new(42);
        for i in 0..8 {
            let p = [0.3 + i as f64 * 0.7, 1.9 - i as f64 * 0.2, i as f64 * 0.11];
            assert_eq!(a.sample(p), b.sample(p));
        }
    }

    #[test]
    fn repeated_sampling_is_stable() {
        let mut field = Perlin::<2>::new(5);
        let p = [0.25, 0.75];
        let first = field.sample(p);
        assert_eq!(field.sample(p), first);
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = Perlin::<2>::new(0);
        let mut b = Perlin::<2>::new(1);
        let p = [0.5, 0.5];
        assert_ne!(a.sample(p), b.sample(p));
    }

    #[test]
    fn gradients_are_unit_length() {
        for c in [[0i64, 0], [1, -4], [100, 3]] {
            let g = corner_gradient(9, &c);
            let norm = dot(&g, &g).sqrt();
            assert!((norm - 1.0).abs() < 1e-12, "norm was {norm}");
        }
    }

    #[test]
    fn field_is_continuous_across_cell_boundaries() {
        let mut field = Perlin::<2>::new(11);
        let left = field.sample([0.999_999, 0.5]);
        let right = field.sample([1.000_001, 0.5]);
        assert!((left - right).abs() < 1e-2, "jump of {}", (left - right).abs());
    }

    #[test]
    fn values_stay_bounded() {
        let mut field = Perlin::<2>::new(3);
        let bound = (2.0f64).sqrt() / 2.0 + 1e-9;
        for yi in 0..32 {
            for xi in 0..32 {
                let v = field.sample([xi as f64 * 0.37, yi as f64 * 0.29]);
                assert!(v.abs() <= bound, "sample {v} out of range");
            }
        }
    }
}
