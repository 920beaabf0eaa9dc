use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use serde::{Deserialize, Serialize};

use lamoon_core::{DomainError, DomainResult};

/// Relative weights for a categorical draw.
///
/// Weights need not sum to one; only their ratios matter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightTable<T> {
    entries: Vec<(T, f64)>,
}

impl<T: Copy> WeightTable<T> {
    pub fn new(entries: impl IntoIterator<Item = (T, f64)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn entries(&self) -> &[(T, f64)] {
        &self.entries
    }

    /// Values that can actually be drawn (positive weight).
    pub fn drawable(&self) -> impl Iterator<Item = T> + '_ {
        self.entries.iter().filter(|(_, w)| *w > 0.0).map(|(v, _)| *v)
    }

    /// Validate the table and prepare it for sampling.
    ///
    /// Fails with `InvalidConfiguration` when the table is empty, holds a
    /// negative or non-finite weight, or every weight is zero.
    pub fn sampler(&self, table: &str) -> DomainResult<WeightedChoice<T>> {
        if let Some((_, w)) = self.entries.iter().find(|(_, w)| !w.is_finite()) {
            return Err(DomainError::invalid_configuration(format!(
                "{table} weights: non-finite weight {w}"
            )));
        }
        let index = WeightedIndex::new(self.entries.iter().map(|(_, w)| *w)).map_err(|e| {
            DomainError::invalid_configuration(format!("{table} weights: {e}"))
        })?;
        Ok(WeightedChoice {
            values: self.entries.iter().map(|(v, _)| *v).collect(),
            index,
        })
    }
}

/// A validated weight table ready for drawing.
#[derive(Debug, Clone)]
pub struct WeightedChoice<T> {
    values: Vec<T>,
    index: WeightedIndex<f64>,
}

impl<T: Copy> WeightedChoice<T> {
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        self.values[self.index.sample(rng)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn all_zero_weights_are_rejected() {
        let table = WeightTable::new([("a", 0.0), ("b", 0.0)]);
        match table.sampler("channel") {
            Err(DomainError::InvalidConfiguration(msg)) => assert!(msg.starts_with("channel weights")),
            other => panic!("expected InvalidConfiguration, got {other:?}"),
        }
    }

    #[test]
    fn empty_negative_and_nan_weights_are_rejected() {
        for table in [
            WeightTable::<u8>::new([]),
            WeightTable::new([(1u8, -1.0), (2u8, 3.0)]),
            WeightTable::new([(1u8, f64::NAN)]),
            WeightTable::new([(1u8, f64::INFINITY)]),
        ] {
            assert!(matches!(
                table.sampler("test"),
                Err(DomainError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn zero_weight_entries_are_never_drawn() {
        let table = WeightTable::new([("never", 0.0), ("always", 2.5)]);
        let choice = table.sampler("test").unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            assert_eq!(choice.draw(&mut rng), "always");
        }
        assert_eq!(table.drawable().collect::<Vec<_>>(), vec!["always"]);
    }

    #[test]
    fn draws_roughly_follow_weights() {
        let table = WeightTable::new([(0usize, 1.0), (1usize, 3.0)]);
        let choice = table.sampler("test").unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts = [0u32; 2];
        for _ in 0..4_000 {
            counts[choice.draw(&mut rng)] += 1;
        }
        let share = f64::from(counts[1]) / 4_000.0;
        assert!((0.70..0.80).contains(&share), "share was {share}");
    }
}
