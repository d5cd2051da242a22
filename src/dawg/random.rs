/// A source of uniformly distributed integers, used for random word sampling.
///
/// With the `rand` feature, every [`rand::Rng`] is a `RandomSource`.
pub trait RandomSource {
    /// Returns an integer in `0..n`. `n` is never zero.
    fn uniform(&mut self, n: usize) -> usize;
}

#[cfg(feature = "rand")]
impl<R: rand::Rng> RandomSource for R {
    #[inline]
    fn uniform(&mut self, n: usize) -> usize {
        self.gen_range(0..n)
    }
}

#[cfg(test)]
#[cfg(feature = "rand")]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn rng_is_a_random_source() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = [false; 4];
        for _ in 0..200 {
            seen[rng.uniform(4)] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert_eq!(rng.uniform(1), 0);
    }
}
