//! Builders for the annotated geometric primitives a renderer consumes.
//!
//! Points and lines are `list` expressions; text is a string expression. All
//! of them are tagged with an `"object-name"` property.

use crate::ast::Expression;

pub const OBJECT_NAME: &str = "object-name";
pub const SIZE: &str = "size";
pub const THICKNESS: &str = "thickness";
pub const POSITION: &str = "position";
pub const TEXT_SCALE: &str = "text-scale";
pub const TEXT_ROTATION: &str = "text-rotation";

/// A screen-space coordinate.
pub type Coord = (f64, f64);

fn tagged(expr: Expression, name: &str) -> Expression {
    expr.with_property(OBJECT_NAME, Expression::string(name))
}

/// A bare point, as used for line endpoints and text anchors.
pub fn anchor((x, y): Coord) -> Expression {
    tagged(
        Expression::list(vec![Expression::number(x), Expression::number(y)]),
        "point",
    )
}

/// A point marker with a radius.
pub fn point(at: Coord, size: f64) -> Expression {
    anchor(at).with_property(SIZE, Expression::number(size))
}

pub fn line(from: Coord, to: Coord, thickness: f64) -> Expression {
    tagged(Expression::list(vec![anchor(from), anchor(to)]), "line")
        .with_property(THICKNESS, Expression::number(thickness))
}

/// A text label; `rotation` is in radians.
pub fn text(content: &str, at: Coord, scale: f64, rotation: f64) -> Expression {
    tagged(Expression::string(content), "text")
        .with_property(POSITION, anchor(at))
        .with_property(TEXT_SCALE, Expression::number(scale))
        .with_property(TEXT_ROTATION, Expression::number(rotation))
}

/// The `"object-name"` of a primitive, if it has one.
pub fn object_name(expr: &Expression) -> Option<&str> {
    expr.get_property(OBJECT_NAME).and_then(Expression::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_endpoints_are_points() {
        let l = line((0.0, 1.0), (2.0, 3.0), 0.0);
        assert_eq!(object_name(&l), Some("line"));
        assert_eq!(l.tail.len(), 2);
        assert!(l.tail.iter().all(|p| object_name(p) == Some("point")));
        assert_eq!(l.get_property(THICKNESS), Some(&Expression::number(0.0)));
    }

    #[test]
    fn text_carries_layout_properties() {
        let t = text("hi", (1.0, -2.0), 2.0, 0.0);
        assert_eq!(t.as_str(), Some("hi"));
        assert_eq!(object_name(&t), Some("text"));
        let position = t.get_property(POSITION).unwrap();
        assert_eq!(position.tail, vec![Expression::number(1.0), Expression::number(-2.0)]);
        assert_eq!(t.get_property(TEXT_SCALE), Some(&Expression::number(2.0)));
    }
}
