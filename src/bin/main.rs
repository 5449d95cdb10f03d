use pathedit::geometry_utilities::types::CanvasPoint;
use pathedit::{BezierPath, PathError, SamplingConfig};

fn parse_config() -> Result<SamplingConfig, String> {
    let mut config = SamplingConfig::default();
    let mut args = std::env::args().skip(1);
    if let Some(spacing) = args.next() {
        config.spacing = spacing.parse().map_err(|e| format!("invalid spacing {:?}: {}", spacing, e))?;
    }
    if let Some(resolution) = args.next() {
        config.resolution = resolution
            .parse()
            .map_err(|e| format!("invalid resolution {:?}: {}", resolution, e))?;
    }
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn demo_path() -> Result<BezierPath, PathError> {
    let mut path = BezierPath::new(CanvasPoint::new(0.0, 0.0));
    path.set_auto_set_control_points(true);
    path.add_segment(CanvasPoint::new(2.0, 2.0));
    path.add_segment(CanvasPoint::new(4.0, -1.0));
    path.split_segment(CanvasPoint::new(0.0, 1.5), 0)?;
    path.move_point(6, CanvasPoint::new(2.5, 2.5))?;
    path.set_closed(true);
    Ok(path)
}

fn main() {
    env_logger::init();

    let config = match parse_config() {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("usage: pathedit [spacing] [resolution]");
            std::process::exit(2);
        }
    };

    let result = demo_path().and_then(|path| {
        log::info!(
            "path with {} segments, {} points, closed: {}",
            path.num_segments(),
            path.num_points(),
            path.is_closed()
        );
        log::info!("estimated length {:.3}", path.estimated_length());
        path.evenly_spaced_points_with(&config)
    });

    match result {
        Ok(points) => {
            log::info!("{} evenly spaced points at spacing {}", points.len(), config.spacing);
            for p in points {
                println!("{} {}", p.x, p.y);
            }
        }
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}
