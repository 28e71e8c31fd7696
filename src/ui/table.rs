use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::filter::FilteredView;
use crate::data::model::Observation;

const HEADERS: [&str; 6] = ["country", "continent", "year", "lifeExp", "pop", "gdpPercap"];

/// Tabular view of the rows behind the current figure.
pub fn data_table(ui: &mut Ui, session_id: u64, view: &FilteredView) {
    let rows: Vec<&Observation> = view.rows().collect();

    ui.push_id(("data_table", session_id), |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .column(Column::auto().at_least(120.0))
            .columns(Column::auto().at_least(70.0), HEADERS.len() - 2)
            .column(Column::remainder())
            .header(20.0, |mut header| {
                for title in HEADERS {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, rows.len(), |mut row| {
                    let obs = rows[row.index()];
                    row.col(|ui| {
                        ui.label(obs.country.as_str());
                    });
                    row.col(|ui| {
                        ui.label(obs.continent.as_str());
                    });
                    row.col(|ui| {
                        ui.label(obs.year.to_string());
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.3}", obs.life_exp));
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.0}", obs.pop));
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.2}", obs.gdp_percap));
                    });
                });
            });
    });
}
