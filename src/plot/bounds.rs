//! Bounding box and per-axis scaling of plot data into the fixed viewport.

use crate::errors::{ErrorContext, ErrorReporting, PlotscriptError};
use crate::plot::primitives::Coord;
use crate::plot::VIEWPORT_EXTENT;

/// The data's extent along both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl BoundingBox {
    /// Single linear scan over the samples.
    pub fn from_samples(samples: &[Coord]) -> Option<Self> {
        let (&(x0, y0), rest) = samples.split_first()?;
        Some(rest.iter().fold(
            Self {
                x_min: x0,
                x_max: x0,
                y_min: y0,
                y_max: y0,
            },
            |b, &(x, y)| Self {
                x_min: b.x_min.min(x),
                x_max: b.x_max.max(x),
                y_min: b.y_min.min(y),
                y_max: b.y_max.max(y),
            },
        ))
    }

    /// The vertical axis is drawn only when the x range straddles zero.
    pub fn y_axis_visible(&self) -> bool {
        self.x_min <= 0.0 && 0.0 <= self.x_max
    }

    /// The horizontal axis is drawn only when the y range straddles zero.
    pub fn x_axis_visible(&self) -> bool {
        self.y_min <= 0.0 && 0.0 <= self.y_max
    }
}

/// A bounding box together with the scale factors that map it onto the
/// viewport. Screen y grows downward, so data y is negated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub bounds: BoundingBox,
    pub x_scale: f64,
    pub y_scale: f64,
}

impl Frame {
    pub fn new(bounds: BoundingBox) -> Result<Self, PlotscriptError> {
        let x_extent = bounds.x_max - bounds.x_min;
        let y_extent = bounds.y_max - bounds.y_min;
        if x_extent <= 0.0 {
            return Err(ErrorContext::plot().plot_domain("all samples share the same x value"));
        }
        if y_extent <= 0.0 {
            return Err(ErrorContext::plot().plot_domain("all samples share the same y value"));
        }
        Ok(Self {
            bounds,
            x_scale: VIEWPORT_EXTENT / x_extent,
            y_scale: VIEWPORT_EXTENT / y_extent,
        })
    }

    pub fn to_screen(&self, (x, y): Coord) -> Coord {
        (x * self.x_scale, -y * self.y_scale)
    }

    pub fn left(&self) -> f64 {
        self.bounds.x_min * self.x_scale
    }

    pub fn right(&self) -> f64 {
        self.bounds.x_max * self.x_scale
    }

    pub fn top(&self) -> f64 {
        -self.bounds.y_max * self.y_scale
    }

    pub fn bottom(&self) -> f64 {
        -self.bounds.y_min * self.y_scale
    }

    pub fn x_mid(&self) -> f64 {
        (self.left() + self.right()) / 2.0
    }

    pub fn y_mid(&self) -> f64 {
        (self.top() + self.bottom()) / 2.0
    }

    /// Screen y that stems drop to: the x axis when visible, otherwise the
    /// viewport edge nearer to zero.
    pub fn baseline(&self) -> f64 {
        if self.bounds.x_axis_visible() {
            0.0
        } else if self.bounds.y_min > 0.0 {
            self.bottom()
        } else {
            self.top()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_finds_extremes() {
        let b = BoundingBox::from_samples(&[(1.0, 5.0), (-2.0, 3.0), (4.0, -1.0)]).unwrap();
        assert_eq!(
            b,
            BoundingBox {
                x_min: -2.0,
                x_max: 4.0,
                y_min: -1.0,
                y_max: 5.0
            }
        );
        assert!(BoundingBox::from_samples(&[]).is_none());
    }

    #[test]
    fn scales_map_extent_to_viewport() {
        let b = BoundingBox::from_samples(&[(0.0, 0.0), (10.0, 40.0)]).unwrap();
        let frame = Frame::new(b).unwrap();
        assert_eq!(frame.x_scale, 2.0);
        assert_eq!(frame.y_scale, 0.5);
        assert_eq!(frame.to_screen((10.0, 40.0)), (20.0, -20.0));
    }

    #[test]
    fn zero_extent_is_rejected() {
        let b = BoundingBox::from_samples(&[(1.0, 0.0), (1.0, 5.0)]).unwrap();
        assert!(Frame::new(b).is_err());
    }

    #[test]
    fn baseline_falls_back_to_nearer_edge() {
        let above = Frame::new(BoundingBox::from_samples(&[(0.0, 1.0), (1.0, 2.0)]).unwrap()).unwrap();
        assert_eq!(above.baseline(), above.bottom());
        let below = Frame::new(BoundingBox::from_samples(&[(0.0, -1.0), (1.0, -2.0)]).unwrap()).unwrap();
        assert_eq!(below.baseline(), below.top());
        let straddle = Frame::new(BoundingBox::from_samples(&[(0.0, -1.0), (1.0, 2.0)]).unwrap()).unwrap();
        assert_eq!(straddle.baseline(), 0.0);
    }
}
