//! # Sub-vector packing
//!
//! Moves values between a *sub* vector that contains designated skip positions
//! and a contiguous *compact* window of another vector starting at `offset`.
//! Every maximal run of sub positions between two skips maps, in order, onto
//! the next stretch of the compact window. Skipped sub positions are never
//! read or written.
//!
//! ```text
//! zeros = [1, 4]
//! sub      : s0  --  s2  s3  --  s5
//! compact  : c0      c1  c2      c3     (c_k = other[offset + k])
//! ```

use anyhow::bail;
use log::trace;

use crate::kernel;
use crate::utils::ensure_strictly_increasing;

/// One contiguous stretch shared by the sub and compact index spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipRun {
    pub sub_start: usize,
    pub compact_start: usize,
    pub len: usize,
}

/// Iterator over the runs between skip positions, including the zero-length
/// runs produced by a skip at either end or by adjacent skips.
#[derive(Debug, Clone)]
pub struct SkipRuns<'a> {
    zeros: std::slice::Iter<'a, usize>,
    sub_len: usize,
    sub_pos: usize,
    compact_pos: usize,
    finished: bool,
}

impl<'a> SkipRuns<'a> {
    /// Validates `zeros` against a sub vector of `sub_len` elements.
    pub fn new(sub_len: usize, zeros: &'a [usize], offset: usize) -> anyhow::Result<Self> {
        ensure_strictly_increasing(zeros, sub_len)?;
        Ok(SkipRuns {
            zeros: zeros.iter(),
            sub_len,
            sub_pos: 0,
            compact_pos: offset,
            finished: false,
        })
    }
}

impl Iterator for SkipRuns<'_> {
    type Item = SkipRun;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let run = match self.zeros.next() {
            Some(&zero) => {
                let run = SkipRun {
                    sub_start: self.sub_pos,
                    compact_start: self.compact_pos,
                    len: zero - self.sub_pos,
                };
                self.sub_pos = zero + 1;
                run
            }
            None => {
                self.finished = true;
                SkipRun {
                    sub_start: self.sub_pos,
                    compact_start: self.compact_pos,
                    len: self.sub_len.saturating_sub(self.sub_pos),
                }
            }
        };
        self.compact_pos += run.len;
        Some(run)
    }
}

/// Number of values a sub vector of `sub_len` elements holds once the skip
/// positions are removed.
pub fn packed_len(sub_len: usize, zeros: &[usize]) -> usize {
    sub_len.saturating_sub(zeros.len())
}

fn ensure_window(offset: usize, len: usize, other_len: usize) -> anyhow::Result<()> {
    match offset.checked_add(len) {
        Some(end) if end <= other_len => Ok(()),
        _ => bail!(
            "Compact window of {} elements at offset {} exceeds vector length {}",
            len,
            offset,
            other_len
        ),
    }
}

/// Copies `sub.len()` contiguous values of `input`, starting at `offset`, into `sub`.
pub fn to_sub_vector(sub: &mut [f64], input: &[f64], offset: usize) -> anyhow::Result<()> {
    ensure_window(offset, sub.len(), input.len())?;
    kernel::copy(sub.len(), &input[offset..], sub);
    Ok(())
}

/// Gathers the compact window of `input` at `offset` into the non-skipped
/// positions of `sub`.
pub fn to_sub_vector_with_zeros(
    sub: &mut [f64],
    input: &[f64],
    offset: usize,
    zeros: &[usize],
) -> anyhow::Result<()> {
    let runs = SkipRuns::new(sub.len(), zeros, offset)?;
    ensure_window(offset, packed_len(sub.len(), zeros), input.len())?;
    for run in runs {
        if run.len == 0 {
            continue;
        }
        trace!(
            "to_sub_vector: {} values from {} into {}",
            run.len,
            run.compact_start,
            run.sub_start
        );
        kernel::copy(run.len, &input[run.compact_start..], &mut sub[run.sub_start..]);
    }
    Ok(())
}

/// Copies all of `sub` into `output`, starting at `offset`.
pub fn from_sub_vector(sub: &[f64], output: &mut [f64], offset: usize) -> anyhow::Result<()> {
    ensure_window(offset, sub.len(), output.len())?;
    kernel::copy(sub.len(), sub, &mut output[offset..]);
    Ok(())
}

/// Scatters the non-skipped positions of `sub` into the compact window of
/// `output` at `offset`. Inverse of [`to_sub_vector_with_zeros`].
pub fn from_sub_vector_with_zeros(
    sub: &[f64],
    output: &mut [f64],
    offset: usize,
    zeros: &[usize],
) -> anyhow::Result<()> {
    let runs = SkipRuns::new(sub.len(), zeros, offset)?;
    ensure_window(offset, packed_len(sub.len(), zeros), output.len())?;
    for run in runs {
        if run.len == 0 {
            continue;
        }
        trace!(
            "from_sub_vector: {} values from {} into {}",
            run.len,
            run.sub_start,
            run.compact_start
        );
        kernel::copy(run.len, &sub[run.sub_start..], &mut output[run.compact_start..]);
    }
    Ok(())
}
