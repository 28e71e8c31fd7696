use std::time::Instant;

use eframe::egui;

use crate::state::{Shared, SessionState};
use crate::ui::panels::{self, Status, TopBarAction};

// ---------------------------------------------------------------------------
// Extra session windows
// ---------------------------------------------------------------------------

pub struct SessionWindow {
    pub session: SessionState,
    pub open: bool,
}

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

/// Hosts the primary session in the central panel and any further sessions
/// in floating windows. Sessions share only [`Shared`].
pub struct GapminderApp {
    pub shared: Shared,
    pub primary: SessionState,
    pub windows: Vec<SessionWindow>,
    pub status: Option<Status>,
    next_session_id: u64,
}

impl GapminderApp {
    pub fn new(shared: Shared) -> Self {
        let primary = SessionState::new(0, &shared);
        Self {
            shared,
            primary,
            windows: Vec::new(),
            status: None,
            next_session_id: 1,
        }
    }

    /// Start an independent session at the default year.
    pub fn open_session(&mut self) -> u64 {
        let id = self.next_session_id;
        self.next_session_id += 1;
        log::info!("Opening session {id}");
        self.windows.push(SessionWindow {
            session: SessionState::new(id, &self.shared),
            open: true,
        });
        id
    }

    /// Drop windows the user closed.
    pub fn prune_closed(&mut self) {
        self.windows.retain(|w| {
            if !w.open {
                log::info!("Session {} closed", w.session.id);
            }
            w.open
        });
    }

    pub fn session_count(&self) -> usize {
        1 + self.windows.len()
    }

    /// Advance play mode in every session. Returns whether any is playing.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut playing = false;
        for session in std::iter::once(&mut self.primary)
            .chain(self.windows.iter_mut().map(|w| &mut w.session))
        {
            session.tick(now);
            playing |= session.playback.is_playing();
        }
        playing
    }

    fn summary(&self) -> String {
        let ds = &self.shared.dataset;
        let years = ds.available_years();
        format!(
            "{} observations, {} years ({}–{})",
            ds.len(),
            years.len(),
            self.shared.control.min,
            self.shared.control.max
        )
    }
}

impl eframe::App for GapminderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.tick(Instant::now()) {
            ctx.request_repaint_after(self.shared.animation.interval());
        }

        // ---- Top panel: menu bar ----
        let summary = self.summary();
        let action = egui::TopBottomPanel::top("top_bar")
            .show(ctx, |ui| {
                panels::top_bar(ui, &summary, self.session_count(), self.status.as_ref())
            })
            .inner;
        if action == Some(TopBarAction::NewSession) {
            self.open_session();
        }

        // ---- Bottom panel: attribution ----
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            panels::footer(ui);
        });

        // ---- Central panel: primary session ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(status) = panels::dashboard(ui, &mut self.primary) {
                self.status = Some(status);
            }
        });

        // ---- Floating windows: extra sessions ----
        for window in &mut self.windows {
            let id = window.session.id;
            let mut status = None;
            egui::Window::new(format!("Session {id}"))
                .id(egui::Id::new(("session_window", id)))
                .open(&mut window.open)
                .default_size([800.0, 600.0])
                .show(ctx, |ui| {
                    status = panels::dashboard(ui, &mut window.session);
                });
            if status.is_some() {
                self.status = status;
            }
        }
        self.prune_closed();
    }
}
