use eframe::egui::{self, Color32, RichText, Ui};

use crate::export;
use crate::state::SessionState;
use crate::ui::{controls, plot, table};

/// A message for the top bar.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Info(String),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopBarAction {
    NewSession,
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(
    ui: &mut Ui,
    summary: &str,
    open_sessions: usize,
    status: Option<&Status>,
) -> Option<TopBarAction> {
    let mut action = None;

    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Session", |ui: &mut Ui| {
            if ui.button("New session").clicked() {
                action = Some(TopBarAction::NewSession);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(summary);
        ui.separator();
        ui.label(format!("{open_sessions} session(s)"));

        match status {
            Some(Status::Info(msg)) => {
                ui.separator();
                ui.label(msg);
            }
            Some(Status::Error(msg)) => {
                ui.separator();
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            None => {}
        }
    });

    action
}

// ---------------------------------------------------------------------------
// Footer
// ---------------------------------------------------------------------------

pub fn footer(ui: &mut Ui) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Source:");
        ui.hyperlink_to("Gapminder", "https://www.gapminder.org/data/");
        ui.label("| Built with");
        ui.hyperlink_to("egui", "https://github.com/emilk/egui");
    });
}

// ---------------------------------------------------------------------------
// One session's dashboard
// ---------------------------------------------------------------------------

/// Control surface, scatter output and optional data table for a session.
pub fn dashboard(ui: &mut Ui, session: &mut SessionState) -> Option<Status> {
    let mut status = None;

    ui.heading("🌍 Gapminder live dashboard");
    controls::year_control(ui, session);

    ui.horizontal(|ui: &mut Ui| {
        ui.checkbox(&mut session.show_table, "Show data");
        if ui.button("Export figure…").clicked() {
            status = export_figure_dialog(session);
        }
        if ui.button("Export data…").clicked() {
            status = export_view_dialog(session);
        }
    });
    ui.separator();

    if session.show_table {
        let view = session.filtered();
        egui::TopBottomPanel::bottom(egui::Id::new(("table_panel", session.id)))
            .resizable(true)
            .default_height(200.0)
            .show_inside(ui, |ui: &mut Ui| {
                table::data_table(ui, session.id, &view);
            });
    }

    let figure = session.figure();
    plot::scatter(ui, &figure, session.id);

    status
}

// ---------------------------------------------------------------------------
// Export dialogs
// ---------------------------------------------------------------------------

fn report(result: anyhow::Result<()>, path: &std::path::Path) -> Status {
    match result {
        Ok(()) => {
            log::info!("Exported {}", path.display());
            Status::Info(format!("Saved {}", path.display()))
        }
        Err(e) => {
            log::error!("Export failed: {e:#}");
            Status::Error(format!("Error: {e:#}"))
        }
    }
}

fn export_figure_dialog(session: &mut SessionState) -> Option<Status> {
    let path = rfd::FileDialog::new()
        .set_title("Export figure")
        .add_filter("JSON", &["json"])
        .set_file_name(format!("gapminder-{}.json", session.year()))
        .save_file()?;

    let figure = session.figure();
    Some(report(export::write_figure_json(&path, &figure), &path))
}

fn export_view_dialog(session: &mut SessionState) -> Option<Status> {
    let path = rfd::FileDialog::new()
        .set_title("Export data")
        .add_filter("CSV", &["csv"])
        .set_file_name(format!("gapminder-{}.csv", session.year()))
        .save_file()?;

    let view = session.filtered();
    Some(report(export::write_view_csv(&path, &view), &path))
}
