use std::sync::Arc;

use crate::color::ColorMap;
use crate::data::filter::{FilteredView, filter_by_year};
use crate::data::model::Dataset;
use crate::figure::{ChartStyle, Figure, render};

// ---------------------------------------------------------------------------
// Calc: a memoised derived value
// ---------------------------------------------------------------------------

/// Caches the last value computed for a key. Asking again with the same key
/// returns the cached handle; a new key recomputes.
#[derive(Debug)]
pub struct Calc<K, V> {
    cached: Option<(K, Arc<V>)>,
    evaluations: u64,
}

impl<K, V> Default for Calc<K, V> {
    fn default() -> Self {
        Calc {
            cached: None,
            evaluations: 0,
        }
    }
}

impl<K: PartialEq + Copy, V> Calc<K, V> {
    pub fn get(&mut self, key: K, compute: impl FnOnce() -> V) -> Arc<V> {
        if let Some((k, v)) = &self.cached {
            if *k == key {
                return Arc::clone(v);
            }
        }
        let value = Arc::new(compute());
        self.evaluations += 1;
        self.cached = Some((key, Arc::clone(&value)));
        value
    }

    /// How many times `compute` has run.
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }
}

// ---------------------------------------------------------------------------
// Reactor: Selected Year → FilteredView → Figure
// ---------------------------------------------------------------------------

/// Per-session chain of derived nodes. The dataset and colour map are shared
/// handles; the two caches belong to this reactor alone.
#[derive(Debug)]
pub struct Reactor {
    dataset: Arc<Dataset>,
    colors: Arc<ColorMap>,
    style: ChartStyle,
    filtered: Calc<i32, FilteredView>,
    figure: Calc<i32, Figure>,
}

impl Reactor {
    pub fn new(dataset: Arc<Dataset>, colors: Arc<ColorMap>, style: ChartStyle) -> Self {
        Reactor {
            dataset,
            colors,
            style,
            filtered: Calc::default(),
            figure: Calc::default(),
        }
    }

    pub fn filtered(&mut self, year: i32) -> Arc<FilteredView> {
        let dataset = &self.dataset;
        self.filtered.get(year, || {
            let view = filter_by_year(dataset, year);
            log::debug!("filtered {} rows for {year}", view.len());
            view
        })
    }

    pub fn figure(&mut self, year: i32) -> Arc<Figure> {
        let view = self.filtered(year);
        let (colors, style) = (&self.colors, &self.style);
        self.figure.get(year, || {
            let figure = render(&view, colors, style);
            log::debug!("rendered {} points for {year}", figure.point_count());
            figure
        })
    }

    /// `(filter, render)` evaluation counts.
    pub fn evaluations(&self) -> (u64, u64) {
        (self.filtered.evaluations(), self.figure.evaluations())
    }
}
