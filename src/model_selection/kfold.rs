//! K-Fold cross-validation splitter

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::DEFAULT_RANDOM_STATE;
use crate::{Error, Result};

/// One round of cross-validation: indices to train on and indices to hold out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    /// Training sample indices
    pub train: Vec<usize>,
    /// Held-out validation sample indices
    pub test: Vec<usize>,
}

/// K-Fold cross-validation splitter.
///
/// Shuffles sample indices with a seeded RNG (unless shuffling is disabled)
/// and cuts them into `n_splits` contiguous validation folds. The first
/// `n_samples % n_splits` folds hold one extra sample.
///
/// # Example
///
/// ```rust
/// use model_history::model_selection::KFold;
///
/// let folds = KFold::new(3).with_seed(7).split(10)?;
/// assert_eq!(folds.len(), 3);
/// assert_eq!(folds[0].test.len(), 4);
/// # Ok::<(), model_history::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KFold {
    n_splits: usize,
    shuffle: bool,
    seed: u64,
}

impl KFold {
    /// Create a shuffling splitter seeded with the default random state.
    #[must_use]
    pub const fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            shuffle: true,
            seed: DEFAULT_RANDOM_STATE,
        }
    }

    /// Set random seed for shuffling
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable shuffling
    #[must_use]
    pub const fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Disable shuffling
    #[must_use]
    pub const fn without_shuffle(self) -> Self {
        self.with_shuffle(false)
    }

    /// Number of folds.
    #[must_use]
    pub const fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Whether indices are shuffled before splitting.
    #[must_use]
    pub const fn shuffle(&self) -> bool {
        self.shuffle
    }

    /// Shuffle seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate train/test indices for each fold.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFolds`] if `n_splits < 2` or
    /// `n_splits > n_samples`.
    pub fn split(&self, n_samples: usize) -> Result<Vec<Fold>> {
        let indices = self.ordered_indices(n_samples)?;
        let bounds = self.fold_bounds(n_samples);

        Ok(bounds
            .into_iter()
            .map(|(start, end)| Fold {
                test: indices[start..end].to_vec(),
                train: indices[..start]
                    .iter()
                    .chain(&indices[end..])
                    .copied()
                    .collect(),
            })
            .collect())
    }

    /// Validation fold index of every sample, indexed by sample.
    ///
    /// # Errors
    ///
    /// Same conditions as [`KFold::split`].
    pub fn assignments(&self, n_samples: usize) -> Result<Vec<usize>> {
        let indices = self.ordered_indices(n_samples)?;
        let mut assignment = vec![0; n_samples];

        for (fold, (start, end)) in self.fold_bounds(n_samples).into_iter().enumerate() {
            for &sample in &indices[start..end] {
                assignment[sample] = fold;
            }
        }

        Ok(assignment)
    }

    fn ordered_indices(&self, n_samples: usize) -> Result<Vec<usize>> {
        if self.n_splits < 2 || self.n_splits > n_samples {
            return Err(Error::InvalidFolds {
                n_splits: self.n_splits,
                n_samples,
            });
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        if self.shuffle {
            let mut rng = StdRng::seed_from_u64(self.seed);
            indices.shuffle(&mut rng);
        }
        Ok(indices)
    }

    fn fold_bounds(&self, n_samples: usize) -> Vec<(usize, usize)> {
        let fold_size = n_samples / self.n_splits;
        let remainder = n_samples % self.n_splits;

        let mut bounds = Vec::with_capacity(self.n_splits);
        let mut start = 0;
        for i in 0..self.n_splits {
            let end = start + fold_size + usize::from(i < remainder);
            bounds.push((start, end));
            start = end;
        }
        bounds
    }
}
