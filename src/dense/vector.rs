use anyhow::bail;

use crate::dense::HADAMARD_BLOCK;
use crate::kernel;
use crate::random;
use crate::utils::{ensure_len, sgn};

/// Copies the first `n` elements of `input` into `out`.
pub fn copy_vector(out: &mut [f64], input: &[f64], n: usize) -> anyhow::Result<()> {
    if n > out.len() || n > input.len() {
        bail!(
            "Cannot copy {} elements from a vector of length {} into a vector of length {}",
            n,
            input.len(),
            out.len()
        );
    }
    kernel::copy(n, input, out);
    Ok(())
}

/// `out = a - b`
pub fn vector_diff(out: &mut [f64], a: &[f64], b: &[f64]) -> anyhow::Result<()> {
    ensure_len("out", out.len(), "a", a.len())?;
    ensure_len("b", b.len(), "a", a.len())?;
    let n = a.len();
    kernel::copy(n, a, out);
    kernel::axpy(n, -1.0, b, out);
    Ok(())
}

/// `a := a + scale * b`
pub fn vector_increment(a: &mut [f64], scale: f64, b: &[f64]) -> anyhow::Result<()> {
    ensure_len("b", b.len(), "a", a.len())?;
    kernel::axpy(a.len(), scale, b, a);
    Ok(())
}

/// `c_i := scale * a_i * b_i`. The previous content of `c` is discarded.
pub fn vector_hadamard(c: &mut [f64], scale: f64, a: &[f64], b: &[f64]) -> anyhow::Result<()> {
    ensure_len("a", a.len(), "c", c.len())?;
    ensure_len("b", b.len(), "c", c.len())?;
    kernel::sbmv_diagonal(c.len(), scale, a, b, 0.0, c);
    Ok(())
}

/// In-place element-wise product `a_i := a_i * scale * b_i`.
pub fn vector_hadamard_increment(a: &mut [f64], scale: f64, b: &[f64]) -> anyhow::Result<()> {
    ensure_len("b", b.len(), "a", a.len())?;
    for (block_a, block_b) in a
        .chunks_mut(HADAMARD_BLOCK)
        .zip(b.chunks(HADAMARD_BLOCK))
    {
        for (ai, &bi) in block_a.iter_mut().zip(block_b) {
            *ai *= scale * bi;
        }
    }
    Ok(())
}

pub fn vector_dot(a: &[f64], b: &[f64]) -> anyhow::Result<f64> {
    ensure_len("b", b.len(), "a", a.len())?;
    Ok(kernel::dot(a.len(), a, b))
}

/// Writes the sign of every element of `vec` (-1, 0 or 1) into `sgn_vec`.
pub fn vector_sgn(sgn_vec: &mut [f64], vec: &[f64]) -> anyhow::Result<()> {
    ensure_len("sgn_vec", sgn_vec.len(), "vec", vec.len())?;
    for (s, &v) in sgn_vec.iter_mut().zip(vec) {
        *s = sgn(v);
    }
    Ok(())
}

/// Squared L2 norm, `sum_i a_i^2`. Not square-rooted.
pub fn vector_l2(a: &[f64]) -> f64 {
    kernel::dot(a.len(), a, a)
}

/// L1 norm, `sum_i |a_i|`.
pub fn vector_l1(a: &[f64]) -> f64 {
    kernel::asum(a.len(), a)
}

pub fn vector_sum(a: &[f64]) -> f64 {
    let ones = vec![1.0; a.len()];
    kernel::dot(a.len(), a, &ones)
}

/// `output := scale * input`
pub fn vector_scale(output: &mut [f64], scale: f64, input: &[f64]) -> anyhow::Result<()> {
    ensure_len("output", output.len(), "input", input.len())?;
    output.fill(0.0);
    kernel::axpy(input.len(), scale, input, output);
    Ok(())
}

/// Fills `vec` with values drawn uniformly from `[-scale, scale]`. The same
/// `seed` always reproduces the same values.
pub fn set_to_random_vector(vec: &mut [f64], scale: f64, seed: u32) -> anyhow::Result<()> {
    random::fill_seeded(vec, scale, seed)
}
