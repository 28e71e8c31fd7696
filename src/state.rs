use std::sync::Arc;
use std::time::Instant;

use crate::color::ColorMap;
use crate::control::{AnimationConfig, Playback, YearControl};
use crate::data::filter::FilteredView;
use crate::data::model::Dataset;
use crate::figure::{ChartStyle, Figure};
use crate::reactive::Reactor;

// ---------------------------------------------------------------------------
// Shared, read-only handles
// ---------------------------------------------------------------------------

/// Everything sessions share. Cloning copies handles, never the table.
#[derive(Debug, Clone)]
pub struct Shared {
    pub dataset: Arc<Dataset>,
    pub colors: Arc<ColorMap>,
    pub control: YearControl,
    pub style: ChartStyle,
    pub animation: AnimationConfig,
}

impl Shared {
    /// Returns `None` if the dataset has no years.
    pub fn new(
        dataset: Arc<Dataset>,
        preferred_year: i32,
        year_step: i32,
        style: ChartStyle,
        animation: AnimationConfig,
    ) -> Option<Self> {
        let control =
            YearControl::from_years(dataset.available_years(), preferred_year, year_step)?;
        let colors = Arc::new(ColorMap::new(dataset.continents()));
        Some(Shared {
            dataset,
            colors,
            control,
            style,
            animation,
        })
    }
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    AwaitingFirstRender,
    Rendered { year: i32 },
}

/// One independent dashboard: its own Selected Year and derived cache.
#[derive(Debug)]
pub struct SessionState {
    pub id: u64,
    pub control: YearControl,
    pub playback: Playback,
    /// Whether the data table under the plot is expanded.
    pub show_table: bool,
    year: i32,
    reactor: Reactor,
    phase: RenderPhase,
}

impl SessionState {
    pub fn new(id: u64, shared: &Shared) -> Self {
        SessionState {
            id,
            control: shared.control,
            playback: Playback::new(shared.animation.clone()),
            show_table: false,
            year: shared.control.default,
            reactor: Reactor::new(
                Arc::clone(&shared.dataset),
                Arc::clone(&shared.colors),
                shared.style.clone(),
            ),
            phase: RenderPhase::AwaitingFirstRender,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Publish a new Selected Year, snapped into the control's bounds.
    pub fn set_year(&mut self, year: i32) {
        let year = self.control.clamp(year);
        if year != self.year {
            log::debug!("session {}: year {} -> {year}", self.id, self.year);
            self.year = year;
        }
    }

    pub fn phase(&self) -> RenderPhase {
        self.phase
    }

    pub fn filtered(&mut self) -> Arc<FilteredView> {
        self.reactor.filtered(self.year)
    }

    /// The figure for the current year, recomputed only if the year changed.
    pub fn figure(&mut self) -> Arc<Figure> {
        let figure = self.reactor.figure(self.year);
        self.phase = RenderPhase::Rendered { year: self.year };
        figure
    }

    pub fn toggle_play(&mut self, now: Instant) {
        if self.playback.is_playing() {
            self.playback.pause();
        } else if let Some(restart) = self.playback.play(now, &self.control, self.year) {
            self.set_year(restart);
        }
    }

    /// Advance play mode. Returns `true` if the year changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.playback.tick(now, &self.control, self.year) {
            Some(next) => {
                self.set_year(next);
                true
            }
            None => false,
        }
    }
}
