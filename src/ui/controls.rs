use std::time::Instant;

use eframe::egui::{self, Ui};

use crate::control::YEAR_INPUT_ID;
use crate::state::SessionState;

// ---------------------------------------------------------------------------
// Year control: slider + play button
// ---------------------------------------------------------------------------

/// Render the year slider for a session and publish any change.
///
/// The slider runs over step indices so every value it can produce is a
/// year inside the control's bounds.
pub fn year_control(ui: &mut Ui, session: &mut SessionState) {
    let control = session.control;

    ui.push_id((YEAR_INPUT_ID, session.id), |ui: &mut Ui| {
        ui.horizontal(|ui: &mut Ui| {
            let playing = session.playback.is_playing();
            let label = if playing { "⏸" } else { "▶" };
            if ui
                .button(label)
                .on_hover_text(if playing { "Pause" } else { "Animate" })
                .clicked()
            {
                session.toggle_play(Instant::now());
            }

            let mut index = control.index_of(session.year());
            let slider = egui::Slider::new(&mut index, 0..=control.steps())
                .text("Select year")
                .custom_formatter(move |v, _| control.year_at(v.round() as usize).to_string())
                .custom_parser(move |s| {
                    let year: i32 = s.trim().parse().ok()?;
                    Some(control.index_of(year) as f64)
                });

            if ui.add(slider).changed() {
                session.set_year(control.year_at(index));
            }
        });
    });
}
