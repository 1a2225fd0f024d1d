//! Scatter-plot figure recomputed on every axis change
//!
//! The figure is a Plotly.js description (`data` + `layout`) built from typed
//! structs and handed to the browser as JSON. Nothing is cached: every call
//! rebuilds the whole figure from the dataset.

use crate::dataset::Dataset;
use crate::error::Result;
use crate::schema::AxisSelection;
use serde::Serialize;

pub const COLOR_SCALE: &str = "Viridis";
pub const MARKER_SIZE: f64 = 10.0;
pub const MARKER_OPACITY: f64 = 0.7;
const OUTLINE_COLOR: &str = "DarkSlateGrey";
const GRID_COLOR: &str = "lightgrey";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<ScatterTrace>,
    pub layout: Layout,
}

impl Figure {
    /// Number of plotted points
    pub fn point_count(&self) -> usize {
        self.data.iter().map(|t| t.x.len()).sum()
    }

    pub fn title(&self) -> &str {
        &self.layout.title.text
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterTrace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub mode: &'static str,
    pub x: Vec<Option<f64>>,
    pub y: Vec<Option<f64>>,
    /// Every column's value for the row, shown in the tooltip
    pub customdata: Vec<Vec<serde_json::Value>>,
    pub hovertemplate: String,
    pub marker: Marker,
    pub showlegend: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub color: Vec<Option<f64>>,
    pub colorscale: &'static str,
    pub showscale: bool,
    pub colorbar: ColorBar,
    pub size: f64,
    pub opacity: f64,
    pub line: Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBar {
    pub title: Text,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub width: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Text {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

impl Text {
    fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), font: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub size: u32,
    pub color: &'static str,
    pub family: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Text,
    pub template: Template,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub plot_bgcolor: &'static str,
    pub margin: Margin,
    pub legend: Legend,
}

/// Plotly.js only applies template objects, not the named templates of
/// plotly.py, so the "plotly_white" look is spelled out here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Template {
    pub layout: TemplateLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateLayout {
    pub paper_bgcolor: &'static str,
    pub plot_bgcolor: &'static str,
    pub font: FontColor,
    pub hovermode: &'static str,
    pub xaxis: TemplateAxis,
    pub yaxis: TemplateAxis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FontColor {
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateAxis {
    pub gridcolor: &'static str,
    pub linecolor: &'static str,
    pub zerolinecolor: &'static str,
}

impl Template {
    pub fn plotly_white() -> Self {
        let axis = TemplateAxis { gridcolor: "#EBF0F8", linecolor: "#EBF0F8", zerolinecolor: "#EBF0F8" };
        Self {
            layout: TemplateLayout {
                paper_bgcolor: "white",
                plot_bgcolor: "white",
                font: FontColor { color: "#2a3f5f" },
                hovermode: "closest",
                xaxis: axis.clone(),
                yaxis: axis,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: Text,
    pub showgrid: bool,
    pub gridcolor: &'static str,
}

impl Axis {
    fn gridded(title: &str) -> Self {
        Self { title: Text::plain(title), showgrid: true, gridcolor: GRID_COLOR }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub title: Text,
    pub orientation: &'static str,
    pub yanchor: &'static str,
    pub y: f64,
    pub xanchor: &'static str,
    pub x: f64,
}

/// Build the scatter plot of `selection.x` against `selection.y`
pub fn update_graph(dataset: &Dataset, selection: &AxisSelection) -> Result<Figure> {
    selection.validate()?;

    let x = dataset.numeric_column(&selection.x)?;
    let y = dataset.numeric_column(&selection.y)?;

    let customdata = dataset
        .rows()
        .iter()
        .map(|row| row.iter().map(|cell| cell.to_json()).collect())
        .collect();

    let trace = ScatterTrace {
        kind: "scatter",
        mode: "markers",
        x,
        y: y.clone(),
        customdata,
        hovertemplate: hover_template(dataset.columns()),
        marker: Marker {
            color: y,
            colorscale: COLOR_SCALE,
            showscale: true,
            colorbar: ColorBar { title: Text::plain(selection.y.as_str()) },
            size: MARKER_SIZE,
            opacity: MARKER_OPACITY,
            line: Line { width: 1.0, color: OUTLINE_COLOR },
        },
        showlegend: false,
    };

    let layout = Layout {
        title: Text {
            text: format!("Correlation between {} and {}", selection.x, selection.y),
            font: Some(Font { size: 20, color: OUTLINE_COLOR, family: "Arial" }),
        },
        template: Template::plotly_white(),
        xaxis: Axis::gridded(&selection.x),
        yaxis: Axis::gridded(&selection.y),
        plot_bgcolor: "white",
        margin: Margin { l: 40, r: 40, t: 40, b: 40 },
        legend: Legend {
            title: Text::plain("Legend"),
            orientation: "h",
            yanchor: "bottom",
            y: 1.02,
            xanchor: "right",
            x: 1.0,
        },
    };

    log::debug!("Figure for {:?} vs {:?}: {} points", selection.x, selection.y, dataset.len());
    Ok(Figure { data: vec![trace], layout })
}

/// One `name=value` line per column; `<extra></extra>` hides the trace name box
fn hover_template(columns: &[String]) -> String {
    let mut lines: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}=%{{customdata[{}]}}", escape_hover(name), i))
        .collect();
    lines.push("<extra></extra>".to_string());
    lines.join("<br>")
}

// Plotly treats `%{` as a placeholder and the text as HTML
fn escape_hover(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace("%{", "%&#123;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::sample_dataset;
    use crate::error::DashError;
    use crate::schema::{OUTPUT_COLUMNS, PARAMETER_COLUMNS};

    // ==========================================================================
    // FIGURE SHAPE TESTS
    // ==========================================================================

    #[test]
    fn test_point_count_and_title_for_every_pair() {
        let ds = sample_dataset(7);
        for x in PARAMETER_COLUMNS {
            for y in OUTPUT_COLUMNS {
                let fig = update_graph(&ds, &AxisSelection::new(x, y)).unwrap();
                assert_eq!(fig.point_count(), 7);
                assert!(fig.title().contains(x), "title {:?} lacks {:?}", fig.title(), x);
                assert!(fig.title().contains(y), "title {:?} lacks {:?}", fig.title(), y);
            }
        }
    }

    #[test]
    fn test_color_follows_y_values() {
        let ds = sample_dataset(3);
        let fig = update_graph(&ds, &AxisSelection::default()).unwrap();
        let trace = &fig.data[0];
        assert_eq!(trace.marker.color, trace.y);
        assert_eq!(trace.marker.colorscale, "Viridis");
        assert_eq!(trace.marker.colorbar.title.text, OUTPUT_COLUMNS[0]);
    }

    #[test]
    fn test_x_values_come_from_selected_column() {
        let ds = sample_dataset(3);
        let sel = AxisSelection::new(PARAMETER_COLUMNS[0], OUTPUT_COLUMNS[1]);
        let fig = update_graph(&ds, &sel).unwrap();
        assert_eq!(fig.data[0].x, vec![Some(0.0), Some(2.5), Some(5.0)]);
        assert_eq!(fig.data[0].y, vec![Some(0.0), Some(120.25), Some(240.5)]);
    }

    #[test]
    fn test_hover_lists_every_column() {
        let ds = sample_dataset(2);
        let fig = update_graph(&ds, &AxisSelection::default()).unwrap();
        let trace = &fig.data[0];
        assert_eq!(trace.customdata.len(), 2);
        assert_eq!(trace.customdata[0].len(), ds.columns().len());
        for (i, col) in ds.columns().iter().enumerate() {
            assert!(trace.hovertemplate.contains(&format!("{}=%{{customdata[{}]}}", col, i)));
        }
    }

    #[test]
    fn test_marker_and_layout_styling() {
        let ds = sample_dataset(1);
        let fig = update_graph(&ds, &AxisSelection::default()).unwrap();
        let marker = &fig.data[0].marker;
        assert_eq!(marker.size, 10.0);
        assert_eq!(marker.opacity, 0.7);
        assert_eq!(marker.line.color, "DarkSlateGrey");

        let legend = &fig.layout.legend;
        assert_eq!(legend.orientation, "h");
        assert_eq!((legend.xanchor, legend.x), ("right", 1.0));
        assert_eq!((legend.yanchor, legend.y), ("bottom", 1.02));
        assert!(fig.layout.xaxis.showgrid && fig.layout.yaxis.showgrid);
    }

    #[test]
    fn test_idempotent() {
        let ds = sample_dataset(4);
        let sel = AxisSelection::new(PARAMETER_COLUMNS[3], OUTPUT_COLUMNS[1]);
        let a = update_graph(&ds, &sel).unwrap();
        let b = update_graph(&ds, &sel).unwrap();
        assert_eq!(a, b);
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }

    #[test]
    fn test_empty_dataset_gives_empty_figure() {
        let ds = sample_dataset(0);
        let fig = update_graph(&ds, &AxisSelection::default()).unwrap();
        assert_eq!(fig.point_count(), 0);
        assert!(fig.data[0].customdata.is_empty());
    }

    #[test]
    fn test_invalid_axis_rejected() {
        let ds = sample_dataset(2);
        let sel = AxisSelection::new("Sample", OUTPUT_COLUMNS[0]);
        assert!(matches!(update_graph(&ds, &sel), Err(DashError::InvalidAxis { axis: 'x', .. })));
    }

    // ==========================================================================
    // JSON SHAPE TESTS
    // ==========================================================================
    //
    // Plotly.js reads these keys by name, so the serialized form matters.
    // ==========================================================================

    #[test]
    fn test_serialized_keys() {
        let ds = sample_dataset(1);
        let fig = update_graph(&ds, &AxisSelection::default()).unwrap();
        let json = serde_json::to_value(&fig).unwrap();
        assert_eq!(json["data"][0]["type"], "scatter");
        assert_eq!(json["data"][0]["mode"], "markers");
        assert_eq!(json["layout"]["title"]["font"]["family"], "Arial");
        assert!(json["layout"]["xaxis"]["title"].get("font").is_none());
    }

    #[test]
    fn test_template_is_an_object() {
        // A bare template name is ignored by Plotly.js
        let ds = sample_dataset(1);
        let fig = update_graph(&ds, &AxisSelection::default()).unwrap();
        let json = serde_json::to_value(&fig).unwrap();
        let template = &json["layout"]["template"]["layout"];
        assert!(json["layout"]["template"].is_object());
        assert_eq!(template["paper_bgcolor"], "white");
        assert_eq!(template["plot_bgcolor"], "white");
        assert_eq!(template["font"]["color"], "#2a3f5f");
        assert_eq!(template["hovermode"], "closest");
        for axis in ["xaxis", "yaxis"] {
            assert_eq!(template[axis]["zerolinecolor"], "#EBF0F8");
            assert_eq!(template[axis]["linecolor"], "#EBF0F8");
        }
    }

    #[test]
    fn test_missing_values_serialize_as_null() {
        let mut csv = crate::dataset::tests::header();
        csv.push_str("\nS0,,1,1,60,0,5,100,9.5,120\n");
        let ds = Dataset::from_reader(csv.as_bytes()).unwrap();
        let fig = update_graph(&ds, &AxisSelection::default()).unwrap();
        assert_eq!(fig.point_count(), 1);
        let json = serde_json::to_value(&fig).unwrap();
        assert!(json["data"][0]["x"][0].is_null());
    }

    #[test]
    fn test_hover_escapes_markup() {
        assert_eq!(escape_hover("a<b>"), "a&lt;b&gt;");
        assert_eq!(escape_hover("Average coverage (%)"), "Average coverage (%)");
    }
}
