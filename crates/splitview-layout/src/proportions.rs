//! Last-settled size distribution.
//!
//! Proportions are snapshotted from item sizes after every settle and
//! consumed when the container changes size. They are never derived from
//! minimums or maximums, so a user-chosen ratio survives any number of
//! container resizes.

/// Fractional share of the content size per item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Proportions {
    values: Option<Vec<f64>>,
}

impl Proportions {
    #[must_use]
    pub const fn new() -> Self {
        Self { values: None }
    }

    /// Snapshot `sizes`.
    ///
    /// With a zero content size the previous snapshot is kept, unless its
    /// length no longer matches `sizes`, in which case it is dropped so a
    /// stale distribution is never read across an add/remove.
    pub fn save(&mut self, sizes: &[u32]) {
        let total: u64 = sizes.iter().map(|&size| u64::from(size)).sum();
        if total > 0 {
            let total = total as f64;
            self.values = Some(
                sizes
                    .iter()
                    .map(|&size| f64::from(size) / total)
                    .collect(),
            );
        } else if self
            .values
            .as_ref()
            .is_some_and(|values| values.len() != sizes.len())
        {
            self.values = None;
        }
    }

    /// The snapshot, if one is valid for `count` items.
    #[must_use]
    pub fn for_count(&self, count: usize) -> Option<&[f64]> {
        self.values
            .as_deref()
            .filter(|values| values.len() == count)
    }

    /// The raw snapshot.
    #[must_use]
    pub fn get(&self) -> Option<&[f64]> {
        self.values.as_deref()
    }

    /// Scale the snapshot to `total`, rounding half up.
    #[must_use]
    pub fn scale(&self, total: u32) -> Option<Vec<i64>> {
        let values = self.values.as_ref()?;
        Some(
            values
                .iter()
                .map(|&proportion| round_half_up(proportion * f64::from(total)))
                .collect(),
        )
    }
}

/// Round to the nearest integer, ties toward positive infinity.
#[must_use]
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_computes_fractions() {
        let mut proportions = Proportions::new();
        proportions.save(&[100, 300]);
        assert_eq!(proportions.get(), Some(&[0.25, 0.75][..]));
    }

    #[test]
    fn zero_content_keeps_matching_snapshot() {
        let mut proportions = Proportions::new();
        proportions.save(&[50, 50]);
        proportions.save(&[0, 0]);
        assert_eq!(proportions.get(), Some(&[0.5, 0.5][..]));
    }

    #[test]
    fn zero_content_drops_stale_snapshot() {
        let mut proportions = Proportions::new();
        proportions.save(&[50, 50]);
        proportions.save(&[0, 0, 0]);
        assert_eq!(proportions.get(), None);
        assert_eq!(proportions.for_count(3), None);
    }

    #[test]
    fn for_count_rejects_length_mismatch() {
        let mut proportions = Proportions::new();
        proportions.save(&[1, 1, 2]);
        assert!(proportions.for_count(3).is_some());
        assert!(proportions.for_count(2).is_none());
    }

    #[test]
    fn scale_rounds_half_up() {
        let mut proportions = Proportions::new();
        proportions.save(&[1, 1]);
        assert_eq!(proportions.scale(201), Some(vec![101, 101]));
        assert_eq!(proportions.scale(400), Some(vec![200, 200]));
    }

    #[test]
    fn round_half_up_tie_breaks() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.4999), 2);
        assert_eq!(round_half_up(0.0), 0);
    }
}
