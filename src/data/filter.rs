use std::sync::Arc;

use super::model::{Dataset, Observation};

// ---------------------------------------------------------------------------
// FilteredView: the rows of the dataset matching one year
// ---------------------------------------------------------------------------

/// A derived subset of the shared [`Dataset`].
///
/// Holds the dataset handle plus row indices, so building a view never copies
/// observations.
#[derive(Debug, Clone)]
pub struct FilteredView {
    dataset: Arc<Dataset>,
    year: i32,
    indices: Vec<usize>,
}

impl FilteredView {
    /// The year this view was filtered on.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Indices into [`Dataset::observations`] of the rows in this view.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Iterate over the observations in dataset order.
    pub fn rows(&self) -> impl Iterator<Item = &Observation> + '_ {
        let all = self.dataset.observations();
        self.indices.iter().map(move |&i| &all[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Narrow this view further to rows whose year equals `year`.
    pub fn filter_year(&self, year: i32) -> FilteredView {
        let all = self.dataset.observations();
        FilteredView {
            dataset: Arc::clone(&self.dataset),
            year,
            indices: matching(self.indices.iter().copied(), all, year),
        }
    }
}

/// Return the view of all rows whose year equals `year`.
///
/// A year with no rows yields an empty view, never an error.
pub fn filter_by_year(dataset: &Arc<Dataset>, year: i32) -> FilteredView {
    let all = dataset.observations();
    FilteredView {
        dataset: Arc::clone(dataset),
        year,
        indices: matching(0..all.len(), all, year),
    }
}

fn matching(
    candidates: impl Iterator<Item = usize>,
    all: &[Observation],
    year: i32,
) -> Vec<usize> {
    candidates.filter(|&i| all[i].year == year).collect()
}
