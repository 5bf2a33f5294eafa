use crate::model::Coordinates;

/// Compass label for the travel direction from `start` to `end`.
///
/// Display only; nothing downstream computes with it.
pub fn direction(start: Coordinates, end: Coordinates) -> Option<&'static str> {
    let delta_lon = end.longitude - start.longitude;
    let delta_lat = end.latitude - start.latitude;
    let angle = delta_lon.atan2(delta_lat).to_degrees();

    to_bearing(angle)
}

/// Bucket an angle into one of eight compass labels.
///
/// The range boundaries carry small gaps (22.5..=22.6 and so on) where no
/// label applies; those dead zones are kept as-is, see DESIGN.md.
pub fn to_bearing(angle: f64) -> Option<&'static str> {
    let orientation = angle.abs();

    if orientation < 22.5 {
        Some("N")
    } else if orientation > 337.5 && orientation < 360.0 {
        Some("N")
    } else if orientation > 22.6 && orientation < 67.5 {
        Some("NNE")
    } else if orientation > 67.6 && orientation < 112.5 {
        Some("E")
    } else if orientation > 112.6 && orientation < 157.5 {
        Some("SSE")
    } else if orientation > 157.6 && orientation < 202.5 {
        Some("S")
    } else if orientation > 202.6 && orientation < 247.5 {
        Some("SSW")
    } else if orientation > 247.6 && orientation < 292.5 {
        Some("W")
    } else if orientation > 292.6 && orientation < 337.5 {
        Some("NNW")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinal_angles() {
        assert_eq!(to_bearing(0.0), Some("N"));
        assert_eq!(to_bearing(90.0), Some("E"));
        assert_eq!(to_bearing(180.0), Some("S"));
        assert_eq!(to_bearing(270.0), Some("W"));
    }

    #[test]
    fn negative_angles_use_magnitude() {
        assert_eq!(to_bearing(-45.0), Some("NNE"));
        assert_eq!(to_bearing(-90.0), Some("E"));
    }

    #[test]
    fn boundary_gap_has_no_label() {
        assert_eq!(to_bearing(22.55), None);
        assert_eq!(to_bearing(157.55), None);
    }

    #[test]
    fn direction_between_route_endpoints() {
        let home = Coordinates::new(-2.788885, 54.039055);
        let work = Coordinates::new(-2.784804, 54.008047);

        // Work lies almost due south of home, so the morning leg is "S"
        // and the return leg is "N".
        assert_eq!(direction(home, work), Some("S"));
        assert_eq!(direction(work, home), Some("N"));
    }
}
