use ark_ff::PrimeField;
use ark_std::{vec, vec::Vec};

/// Powers of a field element, i.e. `[1, s, s^2, .., s^{n-1}]`
pub fn powers<F: PrimeField>(s: &F, n: usize) -> Vec<F> {
    let mut p = vec![F::one(); n];
    for i in 1..n {
        p[i] = p[i - 1] * s;
    }
    p
}
