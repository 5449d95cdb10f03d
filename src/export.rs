use crate::path::BezierPath;
use kurbo::{BezPath, Point as KurboPoint};

fn to_kurbo_point(p: crate::geometry_utilities::types::CanvasPoint) -> KurboPoint {
    KurboPoint::new(p.x as f64, p.y as f64)
}

impl BezierPath {
    /// Emits the path as a single lyon sub-path with one cubic per segment.
    pub fn build(&self, builder: &mut lyon::path::Builder) {
        builder.begin(self[0].to_untyped());
        for segment in 0..self.num_segments() {
            let [_, ctrl1, ctrl2, to] = self.segment_points(segment);
            builder.cubic_bezier_to(ctrl1.to_untyped(), ctrl2.to_untyped(), to.to_untyped());
        }
        builder.end(self.is_closed());
    }

    pub fn to_lyon_path(&self) -> lyon::path::Path {
        let mut builder = lyon::path::Path::builder();
        self.build(&mut builder);
        builder.build()
    }

    pub fn to_kurbo(&self) -> BezPath {
        let mut result = BezPath::new();
        result.move_to(to_kurbo_point(self[0]));
        for segment in 0..self.num_segments() {
            let [_, ctrl1, ctrl2, to] = self.segment_points(segment);
            result.curve_to(to_kurbo_point(ctrl1), to_kurbo_point(ctrl2), to_kurbo_point(to));
        }
        if self.is_closed() {
            result.close_path();
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use crate::geometry_utilities::types::CanvasPoint;
    use crate::path::BezierPath;
    use approx::assert_abs_diff_eq;
    use kurbo::ParamCurveArclen;
    use lyon::path::PathEvent;

    fn sample_path() -> BezierPath {
        let mut path = BezierPath::new(CanvasPoint::new(0.0, 0.0));
        path.add_segment(CanvasPoint::new(2.0, 3.0));
        path.add_segment(CanvasPoint::new(4.0, 0.0));
        path.set_auto_set_control_points(true);
        path
    }

    #[test]
    fn test_lyon_export() {
        let mut path = sample_path();
        let lyon_path = path.to_lyon_path();
        let cubics = lyon_path
            .iter()
            .filter(|event| matches!(event, PathEvent::Cubic { .. }))
            .count();
        assert_eq!(cubics, 3);
        assert!(lyon_path
            .iter()
            .any(|event| matches!(event, PathEvent::End { close: false, .. })));

        path.set_closed(true);
        let lyon_path = path.to_lyon_path();
        let mut cubics = 0;
        for event in lyon_path.iter() {
            match event {
                PathEvent::Cubic { ctrl1, ctrl2, to, .. } => {
                    let expected = path.points_in_segment(cubics).unwrap();
                    assert_eq!(ctrl1, expected[1].to_untyped());
                    assert_eq!(ctrl2, expected[2].to_untyped());
                    assert_eq!(to, expected[3].to_untyped());
                    cubics += 1;
                }
                PathEvent::End { close, .. } => assert!(close),
                _ => {}
            }
        }
        assert_eq!(cubics, 4);
    }

    #[test]
    fn test_kurbo_export_matches_resampling() {
        let path = sample_path();
        let bez = path.to_kurbo();
        assert_eq!(bez.segments().count(), path.num_segments());

        let arclen: f64 = bez.segments().map(|segment| segment.arclen(1e-6)).sum();
        assert!(arclen <= path.estimated_length() as f64);

        let spacing = 0.05;
        let points = path.evenly_spaced_points(spacing, 4.0).unwrap();
        let resampled_length = spacing * (points.len() - 1) as f32;
        // The remainder after the last emitted point is always shorter than the spacing
        assert_abs_diff_eq!(resampled_length as f64, arclen, epsilon = spacing as f64 * 1.5);
    }
}
