use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

/// Create a deterministic StdRng from a u64 seed.
/// Every random frame-time perturbation in the preview and tests comes
/// from an RNG created here.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Random extra frame time in `0..=max_ms` milliseconds.
pub fn jitter_ms(rng: &mut StdRng, max_ms: u64) -> u64 {
    if max_ms == 0 {
        0
    } else {
        rng.random_range(0..=max_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_produces_same_sequence() {
        let mut rng1 = create_rng(42);
        let mut rng2 = create_rng(42);

        let seq1: Vec<u64> = (0..10).map(|_| rng1.random::<u64>()).collect();
        let seq2: Vec<u64> = (0..10).map(|_| rng2.random::<u64>()).collect();

        assert_eq!(seq1, seq2);
    }

    #[test]
    fn different_seeds_produce_different_sequences() {
        let mut rng1 = create_rng(42);
        let mut rng2 = create_rng(99);

        let val1: u64 = rng1.random();
        let val2: u64 = rng2.random();

        assert_ne!(val1, val2);
    }

    #[test]
    fn jitter_stays_in_range() {
        let mut rng = create_rng(7);
        for _ in 0..200 {
            assert!(jitter_ms(&mut rng, 5) <= 5);
        }
        assert_eq!(jitter_ms(&mut rng, 0), 0);
    }
}
