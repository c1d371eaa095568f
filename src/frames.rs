// Matrices act on column vectors. Horizontal frame: +x north, +y west, +z zenith.

use crate::angles::{cos_deg, normalize_angle, rad_to_deg, sin_deg};

pub type Vector3 = [f64; 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationMatrix {
    pub rows: [[f64; 3]; 3],
}

impl RotationMatrix {
    pub const IDENTITY: RotationMatrix = RotationMatrix {
        rows: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    pub fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self { rows }
    }

    /// Counter-clockwise rotation by `angle_deg` about `axis`, seen from the
    /// positive end of the axis.
    pub fn about(axis: Axis, angle_deg: f64) -> Self {
        let (s, c) = (sin_deg(angle_deg), cos_deg(angle_deg));
        let rows = match axis {
            Axis::X => [[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]],
            Axis::Y => [[c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c]],
            Axis::Z => [[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]],
        };
        Self { rows }
    }

    /// `self` applied first, then `other`.
    pub fn then(&self, other: &RotationMatrix) -> RotationMatrix {
        let mut rows = [[0.0; 3]; 3];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| other.rows[i][k] * self.rows[k][j]).sum();
            }
        }
        RotationMatrix { rows }
    }

    /// Re-orients the target frame by turning it about one of its own axes.
    pub fn pivot(&self, axis: Axis, angle_deg: f64) -> RotationMatrix {
        self.then(&RotationMatrix::about(axis, angle_deg))
    }

    pub fn rotate(&self, v: &Vector3) -> Vector3 {
        let r = &self.rows;
        [
            r[0][0] * v[0] + r[0][1] * v[1] + r[0][2] * v[2],
            r[1][0] * v[0] + r[1][1] * v[1] + r[1][2] * v[2],
            r[2][0] * v[0] + r[2][1] * v[1] + r[2][2] * v[2],
        ]
    }

    pub fn transpose(&self) -> RotationMatrix {
        let r = &self.rows;
        RotationMatrix {
            rows: [
                [r[0][0], r[1][0], r[2][0]],
                [r[0][1], r[1][1], r[2][1]],
                [r[0][2], r[1][2], r[2][2]],
            ],
        }
    }
}

pub fn equatorial_to_horizontal(local_sidereal_deg: f64, latitude_deg: f64) -> RotationMatrix {
    let (sin_lst, cos_lst) = (sin_deg(local_sidereal_deg), cos_deg(local_sidereal_deg));
    let (sin_lat, cos_lat) = (sin_deg(latitude_deg), cos_deg(latitude_deg));
    let north = [-sin_lat * cos_lst, -sin_lat * sin_lst, cos_lat];
    let west = [sin_lst, -cos_lst, 0.0];
    let zenith = [cos_lat * cos_lst, cos_lat * sin_lst, sin_lat];
    RotationMatrix::from_rows([north, west, zenith])
}

pub fn ecliptic_to_equatorial(eps_deg: f64) -> RotationMatrix {
    RotationMatrix::about(Axis::X, eps_deg)
}

pub fn length(v: &Vector3) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

pub fn subtract(a: &Vector3, b: &Vector3) -> Vector3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn from_spherical(lon_deg: f64, lat_deg: f64, distance: f64) -> Vector3 {
    let cos_lat = cos_deg(lat_deg);
    [
        distance * cos_lat * cos_deg(lon_deg),
        distance * cos_lat * sin_deg(lon_deg),
        distance * sin_deg(lat_deg),
    ]
}

/// `(longitude [0, 360), latitude, distance)`, longitude measured from +x toward +y.
pub fn to_spherical(v: &Vector3) -> (f64, f64, f64) {
    let r = length(v);
    if r == 0.0 {
        return (0.0, 0.0, 0.0);
    }
    let lon = normalize_angle(rad_to_deg(v[1].atan2(v[0])));
    let lat = rad_to_deg((v[2] / r).clamp(-1.0, 1.0).asin());
    (lon, lat, r)
}

/// Azimuth (north through east) and altitude of a horizontal-frame vector.
pub fn horizontal_angles(v: &Vector3) -> (f64, f64) {
    let r = length(v);
    if r == 0.0 {
        return (0.0, 0.0);
    }
    let azimuth = normalize_angle(rad_to_deg((-v[1]).atan2(v[0])));
    let altitude = rad_to_deg((v[2] / r).clamp(-1.0, 1.0).asin());
    (azimuth, altitude)
}
