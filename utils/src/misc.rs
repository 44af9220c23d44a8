use ark_std::{rand::RngCore, UniformRand};

/// Generates an iterator of randoms producing `count` elements using the supplied `rng`.
pub fn n_rand<T: UniformRand, R: RngCore>(
    rng: &'_ mut R,
    count: usize,
) -> impl Iterator<Item = T> + '_ {
    (0..count).map(move |_| rand(rng))
}

/// Generates a random using given `rng`.
pub fn rand<T: UniformRand, R: RngCore>(rng: &mut R) -> T {
    UniformRand::rand(rng)
}
