pub fn deg_to_rad(deg: f64) -> f64 {
    deg * (std::f64::consts::PI / 180.0)
}

pub fn rad_to_deg(rad: f64) -> f64 {
    rad * (180.0 / std::f64::consts::PI)
}

/// Wraps to [0, 360).
pub fn normalize_angle(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

/// Wraps to (-180, 180].
pub fn normalize_pm180(angle: f64) -> f64 {
    let d = angle.rem_euclid(360.0);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// Smallest signed difference `a - b` in degrees.
pub fn angle_difference(a: f64, b: f64) -> f64 {
    normalize_pm180(a - b)
}

pub fn sin_deg(deg: f64) -> f64 {
    deg_to_rad(deg).sin()
}

pub fn cos_deg(deg: f64) -> f64 {
    deg_to_rad(deg).cos()
}
