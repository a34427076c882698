//! 2×2 PNG bar-chart comparison.
//!
//! Panels: mean response time, operations/sec, error rate and p95 response
//! time. Each test case is a cluster with one bar per application. The two
//! response-time panels use a logarithmic y-axis.

use std::path::Path;

use compare_core::error::{CompareError, Result};
use compare_core::models::{Application, PerApplication};
use compare_data::analysis::{BenchmarkAnalysis, TestCaseResult};
use plotters::coord::{CoordTranslate, Shift};
use plotters::prelude::*;
use tracing::debug;

/// Pixel size of the rendered image.
pub const CHART_SIZE: (u32, u32) = (1500, 1200);

const CLUSTER_WIDTH: f64 = 0.8;

/// Fixed bar color per application.
pub fn app_color(app: Application) -> RGBColor {
    match app {
        Application::Go => RGBColor(0, 173, 216),
        Application::CsharpEf => RGBColor(104, 33, 122),
        Application::CsharpDapper => RGBColor(255, 127, 14),
    }
}

// ── Panels ────────────────────────────────────────────────────────────────────

/// One quadrant of the chart image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    MeanResponseTime,
    OpsPerSec,
    ErrorRate,
    P95ResponseTime,
}

impl Panel {
    /// Quadrants in row-major order.
    pub const ALL: [Panel; 4] = [
        Panel::MeanResponseTime,
        Panel::OpsPerSec,
        Panel::ErrorRate,
        Panel::P95ResponseTime,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Panel::MeanResponseTime => "Average Response Time",
            Panel::OpsPerSec => "Operations per Second",
            Panel::ErrorRate => "Error Rate",
            Panel::P95ResponseTime => "95th Percentile Response Time",
        }
    }

    pub fn y_label(self) -> &'static str {
        match self {
            Panel::MeanResponseTime | Panel::P95ResponseTime => "Response Time (ms, log scale)",
            Panel::OpsPerSec => "Ops/sec",
            Panel::ErrorRate => "Error Rate (%)",
        }
    }

    pub fn log_scale(self) -> bool {
        matches!(self, Panel::MeanResponseTime | Panel::P95ResponseTime)
    }

    /// The plotted value for one test case and application, if any.
    pub fn value(self, test_case: &TestCaseResult, app: Application) -> Option<f64> {
        match self {
            Panel::MeanResponseTime => test_case.response_time.get(app).as_ref().map(|s| s.mean),
            Panel::P95ResponseTime => test_case.response_time.get(app).as_ref().map(|s| s.p95),
            Panel::OpsPerSec => test_case.throughput.get(app).as_ref().map(|s| s.ops_per_sec),
            Panel::ErrorRate => test_case
                .throughput
                .get(app)
                .as_ref()
                .map(|s| s.error_rate_percent),
        }
    }
}

/// Bar heights for one panel, one column per plotted test case.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelData {
    pub panel: Panel,
    pub test_names: Vec<String>,
    pub values: PerApplication<Vec<Option<f64>>>,
}

impl PanelData {
    /// Collect values for `panel` from every test case that has data.
    pub fn collect(panel: Panel, analysis: &BenchmarkAnalysis) -> Self {
        let cases: Vec<&TestCaseResult> = analysis
            .test_cases
            .iter()
            .filter(|tc| !tc.is_empty())
            .collect();
        Self {
            panel,
            test_names: cases.iter().map(|tc| tc.name.clone()).collect(),
            values: PerApplication::from_fn(|app| {
                cases.iter().map(|tc| panel.value(tc, app)).collect()
            }),
        }
    }

    /// Values that can be drawn on this panel's axis.
    fn drawable(&self) -> impl Iterator<Item = f64> + '_ {
        let log = self.panel.log_scale();
        self.values
            .iter()
            .flat_map(|(_, column)| column.iter().flatten().copied())
            .filter(move |v| v.is_finite() && (!log || *v > 0.0))
    }

    pub fn has_values(&self) -> bool {
        self.drawable().next().is_some()
    }

    /// Y-axis range: `[min/2, max*2]` on log panels, `[0, max*1.1]` otherwise.
    pub fn y_range(&self) -> (f64, f64) {
        let (min, max) = self
            .drawable()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if self.panel.log_scale() {
            if min.is_finite() {
                (min / 2.0, max * 2.0)
            } else {
                (0.1, 10.0)
            }
        } else if max > 0.0 {
            (0.0, max * 1.1)
        } else {
            (0.0, 1.0)
        }
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

fn chart_error<E: std::fmt::Display>(e: E) -> CompareError {
    CompareError::Chart(e.to_string())
}

/// Render the four-panel comparison to `output_path`.
///
/// Fails with [`CompareError::NoChartData`] before touching the file when no
/// panel has anything to draw.
pub fn render_charts(analysis: &BenchmarkAnalysis, output_path: &Path) -> Result<()> {
    let panels: Vec<PanelData> = Panel::ALL
        .iter()
        .map(|p| PanelData::collect(*p, analysis))
        .collect();
    if !panels.iter().any(PanelData::has_values) {
        return Err(CompareError::NoChartData);
    }

    let root = BitMapBackend::new(output_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;
    let areas = root.split_evenly((2, 2));

    for (area, data) in areas.iter().zip(&panels) {
        debug!("Drawing panel: {}", data.panel.title());
        draw_panel(area, data)?;
    }

    root.present().map_err(chart_error)?;
    Ok(())
}

fn x_label(names: &[String], x: f64) -> String {
    let index = x.round();
    if (x - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    names.get(index as usize).cloned().unwrap_or_default()
}

fn draw_panel<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, data: &PanelData) -> Result<()> {
    let columns = data.test_names.len().max(1);
    let x_range = -0.5f64..(columns as f64 - 0.5);
    let (y_min, y_max) = data.y_range();
    let names = &data.test_names;

    let mut builder = ChartBuilder::on(area);
    builder
        .caption(data.panel.title(), ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(80);

    if data.panel.log_scale() {
        let mut chart = builder
            .build_cartesian_2d(x_range, (y_min..y_max).log_scale())
            .map_err(chart_error)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(columns)
            .x_label_formatter(&|x: &f64| x_label(names, *x))
            .y_desc(data.panel.y_label())
            .draw()
            .map_err(chart_error)?;
        draw_bars(&mut chart, data, y_min)
    } else {
        let mut chart = builder
            .build_cartesian_2d(x_range, y_min..y_max)
            .map_err(chart_error)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(columns)
            .x_label_formatter(&|x: &f64| x_label(names, *x))
            .y_desc(data.panel.y_label())
            .draw()
            .map_err(chart_error)?;
        draw_bars(&mut chart, data, y_min)
    }
}

fn draw_bars<'a, DB, CT>(
    chart: &mut ChartContext<'a, DB, CT>,
    data: &PanelData,
    baseline: f64,
) -> Result<()>
where
    DB: DrawingBackend + 'a,
    CT: CoordTranslate<From = (f64, f64)>,
{
    let bar_width = CLUSTER_WIDTH / Application::ALL.len() as f64;
    let log = data.panel.log_scale();

    for (slot, (app, column)) in data.values.iter().enumerate() {
        let color = app_color(app);
        let bars: Vec<Rectangle<(f64, f64)>> = column
            .iter()
            .enumerate()
            .filter_map(|(i, value)| {
                let v = (*value)?;
                if !v.is_finite() || (log && v <= 0.0) {
                    return None;
                }
                let x0 = i as f64 - CLUSTER_WIDTH / 2.0 + slot as f64 * bar_width;
                Some(Rectangle::new(
                    [(x0, baseline), (x0 + bar_width, v)],
                    color.filled(),
                ))
            })
            .collect();
        if bars.is_empty() {
            continue;
        }

        chart
            .draw_series(bars)
            .map_err(chart_error)?
            .label(app.display_name())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(chart_error)?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
