use eframe::egui::{self, Ui};
use egui_plot::{Legend, MarkerShape, Plot, PlotPoint, PlotPoints, Points, log_grid_spacer};

use crate::control::SCATTER_OUTPUT_ID;
use crate::figure::{AxisScale, Figure};

// ---------------------------------------------------------------------------
// Scatter output (central panel)
// ---------------------------------------------------------------------------

/// Screen-space position of a data value on an axis.
fn project(scale: AxisScale, value: f64) -> f64 {
    match scale {
        AxisScale::Linear => value,
        AxisScale::Log => value.log10(),
    }
}

/// Tick label for a log10 grid mark: `100`, `2k`, `50k`, ...
pub fn log_tick_label(exponent: f64) -> String {
    let value = (10f64.powf(exponent) * 1000.0).round() / 1000.0;
    if value >= 1e6 {
        format!("{}M", trim(value / 1e6))
    } else if value >= 1e3 {
        format!("{}k", trim(value / 1e3))
    } else {
        trim(value)
    }
}

fn trim(v: f64) -> String {
    let s = format!("{v:.1}");
    s.strip_suffix(".0").map(str::to_string).unwrap_or(s)
}

/// egui margins are `i8`; larger values saturate.
fn margin_px(px: u16) -> i8 {
    i8::try_from(px).unwrap_or(i8::MAX)
}

/// One hoverable point, in plot coordinates.
struct HoverEntry {
    trace: String,
    at: [f64; 2],
    text: String,
}

fn hover_entries(figure: &Figure) -> Vec<HoverEntry> {
    figure
        .traces
        .iter()
        .flat_map(|trace| {
            trace.markers.iter().map(move |m| HoverEntry {
                trace: trace.name.clone(),
                at: [project(figure.x_axis.scale, m.x), project(figure.y_axis.scale, m.y)],
                text: format!(
                    "{}\ncontinent={}\n{}={:.2}\n{}={:.2}\npop={:.0}",
                    m.hover, trace.name, figure.x_axis.title, m.x, figure.y_axis.title, m.y, m.pop
                ),
            })
        })
        .collect()
}

/// Render a figure into the session's `scatter` slot.
pub fn scatter(ui: &mut Ui, figure: &Figure, session_id: u64) {
    let m = figure.margin;
    let margin = egui::Margin {
        left: margin_px(m.left),
        right: margin_px(m.right),
        top: margin_px(m.top),
        bottom: margin_px(m.bottom),
    };

    let entries = hover_entries(figure);
    let x_log = figure.x_axis.scale == AxisScale::Log;

    egui::Frame::NONE.inner_margin(margin).show(ui, |ui: &mut Ui| {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.heading(figure.title.as_str());
        });

        let mut plot = Plot::new((SCATTER_OUTPUT_ID, session_id))
            .legend(Legend::default())
            .x_axis_label(figure.x_axis.title.clone())
            .y_axis_label(figure.y_axis.title.clone())
            .allow_boxed_zoom(true)
            .allow_drag(true)
            .allow_scroll(true)
            .allow_zoom(true)
            .label_formatter(move |name: &str, value: &PlotPoint| {
                if name.is_empty() {
                    return String::new();
                }
                entries
                    .iter()
                    .filter(|e| e.trace == name)
                    .min_by(|a, b| {
                        let da = (a.at[0] - value.x).powi(2) + (a.at[1] - value.y).powi(2);
                        let db = (b.at[0] - value.x).powi(2) + (b.at[1] - value.y).powi(2);
                        da.total_cmp(&db)
                    })
                    .map(|e| e.text.clone())
                    .unwrap_or_default()
            });

        if x_log {
            plot = plot
                .x_grid_spacer(log_grid_spacer(10))
                .x_axis_formatter(|mark, _range| log_tick_label(mark.value));
        }

        plot.show(ui, |plot_ui| {
            for trace in &figure.traces {
                for marker in &trace.markers {
                    let at = [
                        project(figure.x_axis.scale, marker.x),
                        project(figure.y_axis.scale, marker.y),
                    ];
                    let point = Points::new(PlotPoints::new(vec![at]))
                        .name(&trace.name)
                        .color(trace.color.gamma_multiply(0.8))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(marker.size / 2.0);

                    plot_ui.points(point);
                }
            }
        });
    });
}
