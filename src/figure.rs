use std::collections::BTreeMap;

use eframe::egui::Color32;
use serde::{Deserialize, Serialize};

use crate::color::ColorMap;
use crate::data::filter::FilteredView;

// ---------------------------------------------------------------------------
// Chart style: the fixed visual-encoding parameters
// ---------------------------------------------------------------------------

/// Pixel margins around the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub left: u16,
    pub right: u16,
    pub top: u16,
    pub bottom: u16,
}

impl Default for Margin {
    fn default() -> Self {
        Margin {
            left: 20,
            right: 20,
            top: 60,
            bottom: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    /// Diameter in pixels of the largest marker in a view.
    pub size_max: f32,
    pub margin: Margin,
}

impl Default for ChartStyle {
    fn default() -> Self {
        ChartStyle {
            size_max: 60.0,
            margin: Margin::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Figure – the renderable scatter specification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisScale {
    Linear,
    Log,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: String,
    pub scale: AxisScale,
}

/// One point of the scatter. Coordinates are in data space; the display
/// surface applies the axis scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub x: f64,
    pub y: f64,
    /// Marker diameter in pixels.
    pub size: f32,
    /// Hover label (country name).
    pub hover: String,
    pub pop: f64,
}

/// All markers sharing one colour category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub name: String,
    #[serde(serialize_with = "crate::color::serialize_hex")]
    pub color: Color32,
    pub markers: Vec<Marker>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub title: String,
    pub year: i32,
    pub x_axis: Axis,
    pub y_axis: Axis,
    /// Traces ordered by category name.
    pub traces: Vec<Trace>,
    pub size_max: f32,
    pub margin: Margin,
}

impl Figure {
    pub fn point_count(&self) -> usize {
        self.traces.iter().map(|t| t.markers.len()).sum()
    }
}

pub fn title_for(year: i32) -> String {
    format!("Gapminder — {year}")
}

// ---------------------------------------------------------------------------
// Render step
// ---------------------------------------------------------------------------

/// Build the scatter figure for a filtered view.
///
/// x = GDP per capita (log), y = life expectancy, marker area ∝ population,
/// colour = continent, hover = country. Rows with non-positive GDP have no
/// position on a log axis and are left out.
pub fn render(view: &FilteredView, colors: &ColorMap, style: &ChartStyle) -> Figure {
    let max_pop = view
        .rows()
        .filter(|o| o.gdp_percap > 0.0)
        .map(|o| o.pop)
        .filter(|p| p.is_finite())
        .fold(0.0_f64, f64::max);

    let mut traces: BTreeMap<&str, Trace> = BTreeMap::new();
    for obs in view.rows() {
        if !(obs.gdp_percap > 0.0) {
            log::debug!(
                "{} {}: gdpPercap {} not representable on log axis",
                obs.country,
                obs.year,
                obs.gdp_percap
            );
            continue;
        }

        let trace = traces.entry(obs.continent.as_str()).or_insert_with(|| Trace {
            name: obs.continent.clone(),
            color: colors.color_for(&obs.continent),
            markers: Vec::new(),
        });
        trace.markers.push(Marker {
            x: obs.gdp_percap,
            y: obs.life_exp,
            size: marker_size(obs.pop, max_pop, style.size_max),
            hover: obs.country.clone(),
            pop: obs.pop,
        });
    }

    Figure {
        title: title_for(view.year()),
        year: view.year(),
        x_axis: Axis {
            title: "gdpPercap".to_string(),
            scale: AxisScale::Log,
        },
        y_axis: Axis {
            title: "lifeExp".to_string(),
            scale: AxisScale::Linear,
        },
        traces: traces.into_values().collect(),
        size_max: style.size_max,
        margin: style.margin,
    }
}

/// Diameter with marker area proportional to `value`; `max` maps to `size_max`.
pub fn marker_size(value: f64, max: f64, size_max: f32) -> f32 {
    if !(value > 0.0) || !(max > 0.0) || !value.is_finite() {
        return 0.0;
    }
    (f64::from(size_max) * (value / max).sqrt()) as f32
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::data::filter::filter_by_year;
    use crate::data::fixtures::{gapminder_fixture, observation};
    use crate::data::model::Dataset;

    fn colors(ds: &Dataset) -> ColorMap {
        ColorMap::new(ds.continents())
    }

    #[test]
    fn encodes_fixed_axes_and_title() {
        let ds = Arc::new(gapminder_fixture());
        let fig = render(&filter_by_year(&ds, 2007), &colors(&ds), &ChartStyle::default());

        assert_eq!(fig.title, "Gapminder — 2007");
        assert_eq!(fig.x_axis.scale, AxisScale::Log);
        assert_eq!(fig.y_axis.scale, AxisScale::Linear);
        assert_eq!(fig.x_axis.title, "gdpPercap");
        assert_eq!(fig.y_axis.title, "lifeExp");
        assert_eq!(fig.margin, Margin { left: 20, right: 20, top: 60, bottom: 20 });
        assert_eq!(fig.size_max, 60.0);
    }

    #[test]
    fn one_trace_per_continent_with_country_hover() {
        let ds = Arc::new(gapminder_fixture());
        let cmap = colors(&ds);
        let fig = render(&filter_by_year(&ds, 2007), &cmap, &ChartStyle::default());

        let names: Vec<&str> = fig.traces.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Africa", "Americas", "Asia", "Europe", "Oceania"]);
        for trace in &fig.traces {
            assert_eq!(trace.color, cmap.color_for(&trace.name));
        }
        let asia = &fig.traces[2];
        let hovers: Vec<&str> = asia.markers.iter().map(|m| m.hover.as_str()).collect();
        assert_eq!(hovers, vec!["Japan", "India"]);
    }

    #[test]
    fn largest_population_gets_size_max() {
        let ds = Arc::new(gapminder_fixture());
        let fig = render(&filter_by_year(&ds, 1952), &colors(&ds), &ChartStyle::default());

        let sizes: Vec<f32> = fig
            .traces
            .iter()
            .flat_map(|t| t.markers.iter().map(|m| m.size))
            .collect();
        let max = sizes.iter().cloned().fold(0.0_f32, f32::max);
        assert!((max - 60.0).abs() < 1e-4);
        assert!(sizes.iter().all(|&s| s > 0.0 && s <= 60.0));
    }

    #[test]
    fn marker_area_scales_with_population() {
        assert!((marker_size(25.0, 100.0, 60.0) - 30.0).abs() < 1e-4);
        assert_eq!(marker_size(0.0, 100.0, 60.0), 0.0);
        assert_eq!(marker_size(10.0, 0.0, 60.0), 0.0);
        assert_eq!(marker_size(f64::NAN, 100.0, 60.0), 0.0);
    }

    #[test]
    fn render_is_pure() {
        let ds = Arc::new(gapminder_fixture());
        let cmap = colors(&ds);
        let view = filter_by_year(&ds, 1982);
        let a = render(&view, &cmap, &ChartStyle::default());
        let b = render(&view, &cmap, &ChartStyle::default());
        assert_eq!(a.title, b.title);
        assert_eq!(a.point_count(), b.point_count());
        assert_eq!(a.x_axis, b.x_axis);
        assert_eq!(a.y_axis, b.y_axis);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_view_renders_zero_points() {
        let ds = Arc::new(gapminder_fixture());
        let fig = render(&filter_by_year(&ds, 1900), &colors(&ds), &ChartStyle::default());
        assert_eq!(fig.point_count(), 0);
        assert!(fig.traces.is_empty());
        assert_eq!(fig.title, "Gapminder — 1900");
    }

    #[test]
    fn non_positive_gdp_is_skipped() {
        let ds = Arc::new(Dataset::from_observations(vec![
            observation("A", "Asia", 2007, 60.0, 1.0e6, 0.0),
            observation("B", "Asia", 2007, 61.0, 2.0e6, 900.0),
        ]));
        let fig = render(&filter_by_year(&ds, 2007), &colors(&ds), &ChartStyle::default());
        assert_eq!(fig.point_count(), 1);
        assert_eq!(fig.traces[0].markers[0].hover, "B");
    }

    #[test]
    fn size_max_ignores_unplotted_rows() {
        let ds = Arc::new(Dataset::from_observations(vec![
            observation("A", "Asia", 2007, 60.0, 9.0e8, -1.0),
            observation("B", "Asia", 2007, 61.0, 2.0e6, 900.0),
        ]));
        let fig = render(&filter_by_year(&ds, 2007), &colors(&ds), &ChartStyle::default());
        assert_eq!(fig.point_count(), 1);
        assert!((fig.traces[0].markers[0].size - 60.0).abs() < 1e-4);
    }

    #[test]
    fn exports_as_json_with_hex_colours() {
        let ds = Arc::new(gapminder_fixture());
        let fig = render(&filter_by_year(&ds, 2007), &colors(&ds), &ChartStyle::default());
        let json: serde_json::Value = serde_json::to_value(&fig).unwrap();
        assert_eq!(json["x_axis"]["scale"], "log");
        assert!(json["traces"][0]["color"].as_str().unwrap().starts_with('#'));
    }
}
