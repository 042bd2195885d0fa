use rand::Rng;

/// Number of fireflies, fixed for the whole session.
pub const FIREFLY_COUNT: usize = 30;

/// Half-extent of the square spawn region in x/z.
const SPAWN_HALF_EXTENT: f32 = 2.0;
/// Vertical spawn range, measured up from the floor.
const SPAWN_HEIGHT: f32 = 1.5;

/// The generated firefly cloud: one position and one scale per particle.
///
/// Sampled once at startup and immutable afterwards; the renderer uploads
/// the data to an instance buffer a single time. Particles are independent
/// of each other.
#[derive(Debug, Clone)]
pub struct Fireflies {
    positions: Vec<[f32; 3]>,
    scales: Vec<f32>,
}

impl Fireflies {
    /// Sample a cloud from thread-local entropy.
    pub fn new() -> Self {
        Self::generate(&mut rand::thread_rng())
    }

    /// Sample a cloud from the given RNG.
    ///
    /// x and z are uniform in [-2, 2), y in [0, 1.5), scale in [0, 1).
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut positions = Vec::with_capacity(FIREFLY_COUNT);
        let mut scales = Vec::with_capacity(FIREFLY_COUNT);

        for _ in 0..FIREFLY_COUNT {
            positions.push([
                (rng.r#gen::<f32>() - 0.5) * SPAWN_HALF_EXTENT * 2.0,
                rng.r#gen::<f32>() * SPAWN_HEIGHT,
                (rng.r#gen::<f32>() - 0.5) * SPAWN_HALF_EXTENT * 2.0,
            ]);
            scales.push(rng.r#gen::<f32>());
        }

        Self { positions, scales }
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn scales(&self) -> &[f32] {
        &self.scales
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl Default for Fireflies {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn buffers_have_fixed_lengths() {
        let cloud = Fireflies::new();
        assert_eq!(cloud.len(), FIREFLY_COUNT);
        assert_eq!(cloud.positions().len(), FIREFLY_COUNT);
        assert_eq!(cloud.scales().len(), FIREFLY_COUNT);
    }

    #[test]
    fn samples_stay_inside_spawn_volume() {
        let mut rng = StdRng::seed_from_u64(7);
        let cloud = Fireflies::generate(&mut rng);

        for [x, y, z] in cloud.positions() {
            assert!((-2.0..2.0).contains(x), "x out of range: {x}");
            assert!((0.0..1.5).contains(y), "y out of range: {y}");
            assert!((-2.0..2.0).contains(z), "z out of range: {z}");
        }
        for s in cloud.scales() {
            assert!((0.0..1.0).contains(s), "scale out of range: {s}");
        }
    }

    #[test]
    fn same_seed_reproduces_cloud() {
        let a = Fireflies::generate(&mut StdRng::seed_from_u64(42));
        let b = Fireflies::generate(&mut StdRng::seed_from_u64(42));
        assert_eq!(a.positions(), b.positions());
        assert_eq!(a.scales(), b.scales());
    }

    #[test]
    fn distinct_seeds_give_distinct_clouds() {
        let a = Fireflies::generate(&mut StdRng::seed_from_u64(1));
        let b = Fireflies::generate(&mut StdRng::seed_from_u64(2));
        assert_ne!(a.positions(), b.positions());
    }
}
