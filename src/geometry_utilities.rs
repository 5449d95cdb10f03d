use types::*;

pub mod types {
    pub struct CanvasSpace;
    pub type CanvasPoint = euclid::Point2D<f32, CanvasSpace>;
    pub type CanvasVector = euclid::Vector2D<f32, CanvasSpace>;
    pub type CanvasRect = euclid::Rect<f32, CanvasSpace>;
}

/// Vectors shorter than this have no usable direction.
pub const DIRECTION_EPSILON: f32 = 0.000001;

pub fn evaluate_cubic_bezier<U>(
    p0: euclid::Point2D<f32, U>,
    p1: euclid::Point2D<f32, U>,
    p2: euclid::Point2D<f32, U>,
    p3: euclid::Point2D<f32, U>,
    t: f32,
) -> euclid::Point2D<f32, U> {
    let p0 = p0.to_untyped().to_vector();
    let p1 = p1.to_untyped().to_vector();
    let p2 = p2.to_untyped().to_vector();
    let p3 = p3.to_untyped().to_vector();
    let t1 = 1.0 - t;
    let t2 = t1 * t1;
    let t3 = t1 * t1 * t1;
    (p0 * t3 + p1 * (3.0 * t2 * t) + p2 * (3.0 * t1 * t * t) + p3 * (t * t * t))
        .to_point()
        .cast_unit()
}

/// Unit vector in the direction of `v`, or the zero vector when `v` is degenerate.
pub fn normalize_safe<U>(v: euclid::Vector2D<f32, U>) -> euclid::Vector2D<f32, U> {
    let len = v.length();
    if len < DIRECTION_EPSILON || !len.is_finite() {
        euclid::Vector2D::zero()
    } else {
        v / len
    }
}

/// Cheap, upward biased length estimate of a cubic segment: the chord plus half the control net.
pub fn estimate_cubic_length(pts: &[CanvasPoint; 4]) -> f32 {
    let control_net_length =
        (pts[0] - pts[1]).length() + (pts[1] - pts[2]).length() + (pts[2] - pts[3]).length();
    (pts[0] - pts[3]).length() + control_net_length * 0.5
}

/// Cross product of the two handle vectors around `anchor`. Zero when the handles are collinear.
pub fn handle_cross(before: CanvasPoint, anchor: CanvasPoint, after: CanvasPoint) -> f32 {
    (before - anchor).cross(after - anchor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use lyon::math::point;

    fn canvas(x: f32, y: f32) -> CanvasPoint {
        point(x, y).cast_unit()
    }

    #[test]
    fn test_cubic_endpoints() {
        let (a, b, c, d) = (canvas(0.0, 0.0), canvas(1.0, 2.0), canvas(3.0, 2.0), canvas(4.0, 0.0));
        assert_eq!(evaluate_cubic_bezier(a, b, c, d, 0.0), a);
        assert_eq!(evaluate_cubic_bezier(a, b, c, d, 1.0), d);
        let mid = evaluate_cubic_bezier(a, b, c, d, 0.5);
        assert_abs_diff_eq!(mid.x, 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(mid.y, 1.5, epsilon = 1e-5);
    }

    #[test]
    fn test_normalize_safe() {
        let v = normalize_safe(CanvasVector::new(3.0, 4.0));
        assert_abs_diff_eq!(v.length(), 1.0, epsilon = 1e-6);
        assert_eq!(normalize_safe(CanvasVector::new(0.0, 0.0)), CanvasVector::zero());
        assert_eq!(normalize_safe(CanvasVector::new(f32::NAN, 0.0)), CanvasVector::zero());
    }

    #[test]
    fn test_length_estimate_of_straight_segment() {
        let pts = [canvas(0.0, 0.0), canvas(1.0, 0.0), canvas(2.0, 0.0), canvas(3.0, 0.0)];
        // Chord 3 plus half of a control net of length 3
        assert_abs_diff_eq!(estimate_cubic_length(&pts), 4.5, epsilon = 1e-6);
    }

    #[test]
    fn test_handle_cross() {
        assert_abs_diff_eq!(handle_cross(canvas(-1.0, -1.0), canvas(0.0, 0.0), canvas(2.0, 2.0)), 0.0);
        assert!(handle_cross(canvas(-1.0, 0.0), canvas(0.0, 0.0), canvas(0.0, 1.0)).abs() > 0.5);
    }
}
