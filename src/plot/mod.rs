//! # Plot Geometry Compiler
//!
//! Turns numeric samples into a flat list of annotated primitives (points,
//! lines and text) laid out in a fixed 20x20 viewport. Data y is negated so
//! that larger values render higher on a y-down screen.
//!
//! Output order:
//!
//! 1. per sample, its point followed by its stem (discrete) or by the segment
//!    joining it to the previous sample (continuous);
//! 2. the visible axes, x axis first;
//! 3. the bounding box: top, bottom, left, right;
//! 4. title, abscissa label and ordinate label, when given;
//! 5. tick labels: y max, y min, x min, x max.

pub mod bounds;
pub mod primitives;

use std::f64::consts::FRAC_PI_2;

use tracing::debug;

use crate::ast::number::format_significant;
use crate::ast::Expression;
use crate::atoms::helpers::{extract_list, require_arity, require_min_arity};
use crate::atoms::Procedure;
use crate::errors::{ErrorContext, ErrorReporting, PlotscriptError, RUNTIME};
use crate::runtime::Environment;

pub use bounds::{BoundingBox, Frame};
use primitives::{line, point, text, Coord};

// ============================================================================
// LAYOUT CONSTANTS
// ============================================================================

/// Width and height of the viewport the data is scaled into.
pub const VIEWPORT_EXTENT: f64 = 20.0;
/// Offset of the title and axis labels from the bounding box.
pub const LABEL_MARGIN: f64 = 3.0;
/// Offset of the tick labels from the bounding box.
pub const TICK_MARGIN: f64 = 2.0;
/// Marker radius for discrete plots.
pub const DISCRETE_POINT_SIZE: f64 = 0.5;
/// Continuous plots anchor their segments on invisible points.
pub const CONTINUOUS_POINT_SIZE: f64 = 0.0;
pub const LINE_THICKNESS: f64 = 0.0;
/// Samples taken by `continuous-plot`, end points included.
pub const SAMPLE_COUNT: usize = 51;
/// Significant digits in tick labels.
pub const TICK_PRECISION: usize = 2;

// ============================================================================
// INPUTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    Discrete,
    Continuous,
}

impl PlotKind {
    pub fn point_size(self) -> f64 {
        match self {
            PlotKind::Discrete => DISCRETE_POINT_SIZE,
            PlotKind::Continuous => CONTINUOUS_POINT_SIZE,
        }
    }
}

/// Recognised plot options. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    pub title: Option<String>,
    pub abscissa_label: Option<String>,
    pub ordinate_label: Option<String>,
    pub text_scale: f64,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            title: None,
            abscissa_label: None,
            ordinate_label: None,
            text_scale: 1.0,
        }
    }
}

impl PlotOptions {
    /// Reads a list of `("key" value)` pairs.
    pub fn from_expression(options: &Expression) -> Result<Self, PlotscriptError> {
        let mut parsed = Self::default();

        for option in extract_list("plot options", options)? {
            let pair = extract_list("plot options", option)?;
            let [key, value] = pair else {
                return Err(RUNTIME.type_mismatch("plot options", "(key value) pairs", option.type_name()));
            };
            let Some(key) = key.as_str() else {
                return Err(RUNTIME.type_mismatch("plot options", "a string key", key.type_name()));
            };

            match key {
                "title" => parsed.title = Some(option_text(key, value)?),
                "abscissa-label" => parsed.abscissa_label = Some(option_text(key, value)?),
                "ordinate-label" => parsed.ordinate_label = Some(option_text(key, value)?),
                "text-scale" => {
                    parsed.text_scale = value
                        .as_number()
                        .filter(|scale| *scale > 0.0)
                        .ok_or_else(|| RUNTIME.type_mismatch(key, "a positive number", value.type_name()))?;
                }
                other => debug!(option = other, "ignoring unknown plot option"),
            }
        }

        Ok(parsed)
    }
}

fn option_text(key: &str, value: &Expression) -> Result<String, PlotscriptError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| RUNTIME.type_mismatch(key, "a string", value.type_name()))
}

/// Reads a list of `(x y)` pairs of real numbers.
pub fn extract_samples(form: &str, data: &Expression) -> Result<Vec<Coord>, PlotscriptError> {
    let items = extract_list(form, data)?;
    if items.is_empty() {
        return Err(ErrorContext::plot().plot_domain("no data to plot"));
    }

    items
        .iter()
        .map(|item| {
            let coords = extract_list(form, item)?;
            match coords {
                [x, y] => match (x.as_number(), y.as_number()) {
                    (Some(x), Some(y)) => Ok((x, y)),
                    _ => Err(RUNTIME.type_mismatch(form, "real coordinates", "a non-real coordinate")),
                },
                _ => Err(RUNTIME.type_mismatch(form, "(x y) pairs", &format!("{} coordinates", coords.len()))),
            }
        })
        .collect()
}

/// Reads the `(list xmin xmax)` range of a continuous plot.
pub fn extract_bounds(range: &Expression) -> Result<(f64, f64), PlotscriptError> {
    let items = extract_list("continuous-plot", range)?;
    let (x_min, x_max) = match items {
        [lo, hi] => match (lo.as_number(), hi.as_number()) {
            (Some(lo), Some(hi)) => (lo, hi),
            _ => return Err(RUNTIME.type_mismatch("continuous-plot", "numeric bounds", "a non-real bound")),
        },
        _ => return Err(RUNTIME.arity("continuous-plot bounds", "2", items.len())),
    };
    if !(x_min < x_max) {
        return Err(ErrorContext::plot().plot_domain("the lower bound must be below the upper bound"));
    }
    Ok((x_min, x_max))
}

/// Evenly spaced abscissas from `x_min` to `x_max` inclusive.
pub fn sample_abscissas(x_min: f64, x_max: f64) -> impl Iterator<Item = f64> {
    let intervals = (SAMPLE_COUNT - 1) as f64;
    let step = (x_max - x_min) / intervals;
    (0..SAMPLE_COUNT).map(move |i| {
        if i == SAMPLE_COUNT - 1 {
            x_max
        } else {
            x_min + i as f64 * step
        }
    })
}

// ============================================================================
// COMPILATION
// ============================================================================

/// Compiles samples into the primitive list described in the module docs.
pub fn compile(samples: &[Coord], kind: PlotKind, options: &PlotOptions) -> Result<Expression, PlotscriptError> {
    if samples.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
        return Err(ErrorContext::plot().plot_domain("samples must be finite"));
    }
    let bounds = BoundingBox::from_samples(samples)
        .ok_or_else(|| ErrorContext::plot().plot_domain("no data to plot"))?;
    let frame = Frame::new(bounds)?;
    debug!(?kind, samples = samples.len(), ?bounds, "compiling plot");

    let mut scene = Vec::new();
    push_data(&mut scene, &frame, samples, kind);
    push_axes(&mut scene, &frame);
    push_bounding_box(&mut scene, &frame);
    push_labels(&mut scene, &frame, options);
    push_ticks(&mut scene, &frame, options);
    Ok(Expression::list(scene))
}

fn push_data(scene: &mut Vec<Expression>, frame: &Frame, samples: &[Coord], kind: PlotKind) {
    let mut previous: Option<Coord> = None;
    for &sample in samples {
        let at = frame.to_screen(sample);
        scene.push(point(at, kind.point_size()));
        match kind {
            PlotKind::Discrete => scene.push(line(at, (at.0, frame.baseline()), LINE_THICKNESS)),
            PlotKind::Continuous => {
                if let Some(prev) = previous {
                    scene.push(line(prev, at, LINE_THICKNESS));
                }
            }
        }
        previous = Some(at);
    }
}

fn push_axes(scene: &mut Vec<Expression>, frame: &Frame) {
    if frame.bounds.x_axis_visible() {
        scene.push(line((frame.left(), 0.0), (frame.right(), 0.0), LINE_THICKNESS));
    }
    if frame.bounds.y_axis_visible() {
        scene.push(line((0.0, frame.bottom()), (0.0, frame.top()), LINE_THICKNESS));
    }
}

fn push_bounding_box(scene: &mut Vec<Expression>, frame: &Frame) {
    let (left, right, top, bottom) = (frame.left(), frame.right(), frame.top(), frame.bottom());
    scene.push(line((left, top), (right, top), LINE_THICKNESS));
    scene.push(line((left, bottom), (right, bottom), LINE_THICKNESS));
    scene.push(line((left, top), (left, bottom), LINE_THICKNESS));
    scene.push(line((right, top), (right, bottom), LINE_THICKNESS));
}

fn push_labels(scene: &mut Vec<Expression>, frame: &Frame, options: &PlotOptions) {
    let scale = options.text_scale;
    if let Some(title) = &options.title {
        scene.push(text(title, (frame.x_mid(), frame.top() - LABEL_MARGIN), scale, 0.0));
    }
    if let Some(label) = &options.abscissa_label {
        scene.push(text(label, (frame.x_mid(), frame.bottom() + LABEL_MARGIN), scale, 0.0));
    }
    if let Some(label) = &options.ordinate_label {
        scene.push(text(
            label,
            (frame.left() - LABEL_MARGIN, frame.y_mid()),
            scale,
            -FRAC_PI_2,
        ));
    }
}

fn push_ticks(scene: &mut Vec<Expression>, frame: &Frame, options: &PlotOptions) {
    let scale = options.text_scale;
    let b = frame.bounds;
    let label = |value: f64| format_significant(value, TICK_PRECISION);

    scene.push(text(&label(b.y_max), (frame.left() - TICK_MARGIN, frame.top()), scale, 0.0));
    scene.push(text(&label(b.y_min), (frame.left() - TICK_MARGIN, frame.bottom()), scale, 0.0));
    scene.push(text(&label(b.x_min), (frame.left(), frame.bottom() + TICK_MARGIN), scale, 0.0));
    scene.push(text(&label(b.x_max), (frame.right(), frame.bottom() + TICK_MARGIN), scale, 0.0));
}

// ============================================================================
// PROCEDURE FORMS
// ============================================================================

fn options_argument(args: &[Expression], index: usize) -> Result<PlotOptions, PlotscriptError> {
    match args.get(index) {
        Some(options) => PlotOptions::from_expression(options),
        None => Ok(PlotOptions::default()),
    }
}

fn require_at_most(name: &str, args: &[Expression], max: usize) -> Result<(), PlotscriptError> {
    if args.len() > max {
        require_arity(name, args, max)?;
    }
    Ok(())
}

/// Usage: (discrete-plot <data> [<options>])
///   - <data>: list of (x y) lists
///   - <options>: list of ("key" value) lists
///
///   Returns: list of point, line and text primitives
///
/// Example:
///   (discrete-plot (list (list -1 -1) (list 1 1)))
pub const ATOM_DISCRETE_PLOT: Procedure = |args| {
    require_min_arity("discrete-plot", args, 1)?;
    require_at_most("discrete-plot", args, 2)?;
    let samples = extract_samples("discrete-plot", &args[0])?;
    compile(&samples, PlotKind::Discrete, &options_argument(args, 1)?)
};

/// Procedure form of `continuous-plot` over samples already taken, so it
/// can be reached through `apply` and `map`. The special form samples a
/// function itself.
///
/// Usage: (continuous-plot <samples> [<options>])
pub const ATOM_CONTINUOUS_PLOT: Procedure = |args| {
    require_min_arity("continuous-plot", args, 1)?;
    require_at_most("continuous-plot", args, 2)?;
    let samples = extract_samples("continuous-plot", &args[0])?;
    compile(&samples, PlotKind::Continuous, &options_argument(args, 1)?)
};

pub fn register_plot_procedures(env: &mut Environment) {
    env.add_procedure("discrete-plot", ATOM_DISCRETE_PLOT);
    env.add_procedure("continuous-plot", ATOM_CONTINUOUS_PLOT);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abscissas_span_the_range() {
        let xs: Vec<f64> = sample_abscissas(-1.0, 1.0).collect();
        assert_eq!(xs.len(), SAMPLE_COUNT);
        assert_eq!(xs[0], -1.0);
        assert!(xs[25].abs() < 1e-12);
        assert_eq!(xs[50], 1.0);
    }

    #[test]
    fn options_are_parsed() {
        let options = Expression::list(vec![
            Expression::list(vec![Expression::string("title"), Expression::string("T")]),
            Expression::list(vec![Expression::string("text-scale"), Expression::number(2.0)]),
            Expression::list(vec![Expression::string("colour"), Expression::string("red")]),
        ]);
        let parsed = PlotOptions::from_expression(&options).unwrap();
        assert_eq!(parsed.title.as_deref(), Some("T"));
        assert_eq!(parsed.text_scale, 2.0);
        assert!(parsed.abscissa_label.is_none());
    }

    #[test]
    fn malformed_options_are_rejected() {
        let bad_pair = Expression::list(vec![Expression::list(vec![Expression::string("title")])]);
        assert!(PlotOptions::from_expression(&bad_pair).is_err());
        let bad_scale = Expression::list(vec![Expression::list(vec![
            Expression::string("text-scale"),
            Expression::string("big"),
        ])]);
        assert!(PlotOptions::from_expression(&bad_scale).is_err());
    }

    #[test]
    fn bounds_must_be_ordered() {
        let range = Expression::list(vec![Expression::number(1.0), Expression::number(1.0)]);
        assert!(extract_bounds(&range).is_err());
    }
}
