//! Chart geometry for the dashboard equity curve.
//!
//! Maps numeric series onto a pixel canvas without touching any rendering
//! surface, so the math is unit-testable on its own. The same inputs always
//! produce the same geometry.

/// Minimum display range as a fraction of the range midpoint. Guards
/// against visually flat charts when equity barely moves.
const MIN_RANGE_FRACTION: f64 = 0.02;

/// Number of horizontal gridlines (intervals) on the value axis.
const Y_TICKS: usize = 4;

#[derive(Debug, Clone, Copy)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
}

impl Canvas {
    fn plot_width(&self) -> f64 {
        self.width - self.margins.left - self.margins.right
    }

    fn plot_height(&self) -> f64 {
        self.height - self.margins.top - self.margins.bottom
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct Gridline {
    pub value: f64,
    pub y: f64,
}

#[derive(Debug, Clone)]
pub struct ChartGeometry {
    pub min: f64,
    pub max: f64,
    pub primary: Vec<Point>,
    pub overlays: Vec<Vec<Point>>,
    pub comparison: Vec<Point>,
    pub gridlines: Vec<Gridline>,
}

/// Compute the shared pixel geometry for one primary series, any number of
/// overlay series and an optional comparison series.
///
/// All series share one global value range so their lines are directly
/// comparable on the same axes. Larger values map to smaller y (screen
/// coordinates).
pub fn compute_geometry(
    primary: &[f64],
    overlays: &[Vec<f64>],
    comparison: &[f64],
    canvas: Canvas,
) -> ChartGeometry {
    let (min, max) = display_range(primary, overlays, comparison);
    let range = max - min;

    let project = |series: &[f64]| -> Vec<Point> {
        let len = series.len();
        series
            .iter()
            .enumerate()
            .map(|(i, &v)| Point {
                x: x_for(i, len, canvas),
                y: y_for(v, min, range, canvas),
            })
            .collect()
    };

    let gridlines = (0..=Y_TICKS)
        .map(|i| {
            let value = min + range * i as f64 / Y_TICKS as f64;
            Gridline {
                value,
                y: y_for(value, min, range, canvas),
            }
        })
        .collect();

    ChartGeometry {
        min,
        max,
        primary: project(primary),
        overlays: overlays.iter().map(|s| project(s)).collect(),
        comparison: project(comparison),
        gridlines,
    }
}

/// Global [min, max] across every provided series, expanded to the 2%
/// degenerate-range floor when the raw span is too narrow to chart.
fn display_range(primary: &[f64], overlays: &[Vec<f64>], comparison: &[f64]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    let mut scan = |series: &[f64]| {
        for &v in series {
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
        }
    };
    scan(primary);
    for series in overlays {
        scan(series);
    }
    scan(comparison);

    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }

    let mid = (min + max) / 2.0;
    let floor = mid * MIN_RANGE_FRACTION;
    if max - min < floor {
        min = mid - floor / 2.0;
        max = mid + floor / 2.0;
    }
    if max == min {
        max = min + 1.0;
    }
    (min, max)
}

fn x_for(index: usize, len: usize, canvas: Canvas) -> f64 {
    let fraction = if len > 1 {
        index as f64 / (len - 1) as f64
    } else {
        0.0
    };
    canvas.margins.left + fraction * canvas.plot_width()
}

fn y_for(value: f64, min: f64, range: f64, canvas: Canvas) -> f64 {
    canvas.margins.top + canvas.plot_height() - ((value - min) / range) * canvas.plot_height()
}
