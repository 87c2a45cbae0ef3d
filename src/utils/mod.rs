use anyhow::bail;

pub trait ZeroVec {
    fn zero_len(&mut self, len: usize);
}

impl<T: Default + Clone> ZeroVec for Vec<T> {
    fn zero_len(&mut self, len: usize) {
        self.clear();
        self.reserve(len);
        self.extend(std::iter::repeat_n(T::default(), len));
    }
}

/// Fails unless `other` has exactly `expected` elements.
pub(crate) fn ensure_len(
    name: &str,
    other: usize,
    reference_name: &str,
    expected: usize,
) -> anyhow::Result<()> {
    if other != expected {
        bail!(
            "Length of {} ({}) does not match length of {} ({})",
            name,
            other,
            reference_name,
            expected
        );
    }
    Ok(())
}

/// Sign of `value` as -1, 0 or 1. Zero of either sign and NaN map to 0.
pub(crate) fn sgn(value: f64) -> f64 {
    ((value > 0.0) as i8 - (value < 0.0) as i8) as f64
}

/// Fails unless `positions` is strictly increasing and every entry is below `bound`.
pub(crate) fn ensure_strictly_increasing(positions: &[usize], bound: usize) -> anyhow::Result<()> {
    for window in positions.windows(2) {
        if window[1] <= window[0] {
            bail!(
                "Skip positions must be strictly increasing, found {} followed by {}",
                window[0],
                window[1]
            );
        }
    }
    if let Some(&last) = positions.last() {
        if last >= bound {
            bail!("Skip position {} is out of range for length {}", last, bound);
        }
    }
    Ok(())
}
