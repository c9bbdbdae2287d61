pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Vector = euclid::Vector2D<f64, Unit>;
pub type Box2D = euclid::Box2D<f64, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

/// Builds a box from `[x1, y1, x2, y2]`. Inverted corners are kept as-is (the box is empty).
pub fn box_from_corners(coords: [f64; 4]) -> Box2D {
    Box2D::new(point(coords[0], coords[1]), point(coords[2], coords[3]))
}

/// Area with negative extents clamped to zero.
pub fn clamped_area(b: &Box2D) -> f64 {
    b.width().max(0.0) * b.height().max(0.0)
}

/// Area of the overlap of two boxes; `0.0` when they only touch or are disjoint.
pub fn intersection_area(a: &Box2D, b: &Box2D) -> f64 {
    a.intersection(b).map(|i| clamped_area(&i)).unwrap_or(0.0)
}

/// Intersection over union. Symmetric, in `[0, 1]`, `0` for disjoint boxes.
pub fn iou(a: &Box2D, b: &Box2D) -> f64 {
    let inter = intersection_area(a, b);
    if inter <= 0.0 {
        return 0.0;
    }
    let union = clamped_area(a) + clamped_area(b) - inter;
    if union <= 0.0 {
        return 0.0;
    }
    (inter / union).clamp(0.0, 1.0)
}

pub fn distance(a: Point, b: Point) -> f64 {
    (a - b).length()
}

/// Rounds half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iou_is_symmetric_and_bounded() {
        let a = box_from_corners([0.0, 0.0, 0.4, 0.2]);
        let b = box_from_corners([0.1, 0.05, 0.5, 0.3]);
        let ab = iou(&a, &b);
        let ba = iou(&b, &a);
        assert_eq!(ab, ba);
        assert!(ab > 0.0 && ab < 1.0);
    }

    #[test]
    fn iou_of_identical_boxes_is_one() {
        let a = box_from_corners([0.1, 0.1, 0.3, 0.4]);
        assert!((iou(&a, &a) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn iou_of_disjoint_or_touching_boxes_is_zero() {
        let a = box_from_corners([0.0, 0.0, 0.1, 0.1]);
        let b = box_from_corners([0.5, 0.5, 0.6, 0.6]);
        let touching = box_from_corners([0.1, 0.0, 0.2, 0.1]);
        assert_eq!(iou(&a, &b), 0.0);
        assert_eq!(iou(&a, &touching), 0.0);
    }

    #[test]
    fn inverted_boxes_have_no_area() {
        let inverted = box_from_corners([0.5, 0.5, 0.1, 0.1]);
        assert_eq!(clamped_area(&inverted), 0.0);
        assert_eq!(iou(&inverted, &inverted), 0.0);
    }

    #[test]
    fn round_to_keeps_requested_precision() {
        assert_eq!(round_to(0.123456, 4), 0.1235);
        assert_eq!(round_to(-4.25, 1), -4.3);
        assert_eq!(round_to(7.0, 1), 7.0);
    }
}
