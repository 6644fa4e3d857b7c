//! Geometric primitives.
//!
//! Points, vectors and matrices come from [`nalgebra`]. This module adds the
//! few extra pieces the mesh code needs: an oriented [`Plane`] and small
//! helpers over point sets.

use nalgebra::{Point3, Vector3};

/// Squared length below which a vector is treated as zero.
pub const EPSILON_SQ: f64 = 1e-24;

/// An oriented plane `n · x = d` with unit normal `n`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal.
    pub normal: Vector3<f64>,
    /// Signed offset along the normal.
    pub offset: f64,
}

impl Plane {
    /// Plane through `origin` with the given normal.
    ///
    /// Returns `None` if the normal has zero length.
    pub fn from_point_normal(origin: Point3<f64>, normal: Vector3<f64>) -> Option<Self> {
        let normal = safe_normalize(&normal)?;
        Some(Self {
            normal,
            offset: normal.dot(&origin.coords),
        })
    }

    /// Plane through three points, oriented by the winding `a -> b -> c`.
    ///
    /// Returns `None` for collinear points.
    pub fn from_points(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Option<Self> {
        Self::from_point_normal(*a, (b - a).cross(&(c - a)))
    }

    /// The XY plane through the origin.
    pub fn xy() -> Self {
        Self {
            normal: Vector3::z(),
            offset: 0.0,
        }
    }

    /// A point on the plane.
    pub fn origin(&self) -> Point3<f64> {
        Point3::from(self.normal * self.offset)
    }

    /// Signed distance from `p` to the plane (positive on the normal side).
    #[inline]
    pub fn signed_distance(&self, p: &Point3<f64>) -> f64 {
        self.normal.dot(&p.coords) - self.offset
    }

    /// Orthogonal projection of `p` onto the plane.
    pub fn project(&self, p: &Point3<f64>) -> Point3<f64> {
        p - self.normal * self.signed_distance(p)
    }

    /// Mirror image of `p` across the plane.
    pub fn reflect(&self, p: &Point3<f64>) -> Point3<f64> {
        p - self.normal * (2.0 * self.signed_distance(p))
    }
}

/// Normalize `v`, or `None` if it is (numerically) zero.
#[inline]
pub fn safe_normalize(v: &Vector3<f64>) -> Option<Vector3<f64>> {
    let len_sq = v.norm_squared();
    if len_sq <= EPSILON_SQ {
        None
    } else {
        Some(v / len_sq.sqrt())
    }
}

/// Arithmetic mean of a set of points. `None` for an empty set.
pub fn centroid<'a, It>(points: It) -> Option<Point3<f64>>
where
    It: IntoIterator<Item = &'a Point3<f64>>,
{
    let mut sum = Vector3::zeros();
    let mut count = 0usize;
    for p in points {
        sum += p.coords;
        count += 1;
    }
    (count > 0).then(|| Point3::from(sum / count as f64))
}

/// Midpoint of two points.
#[inline]
pub fn midpoint(a: &Point3<f64>, b: &Point3<f64>) -> Point3<f64> {
    Point3::from((a.coords + b.coords) * 0.5)
}

/// Newell normal of a closed polygon (unnormalized, twice the vector area).
pub fn newell_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let n = points.len();
    let mut normal = Vector3::zeros();
    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    normal
}

/// Interior angle at `a` in the triangle `(a, b, c)`.
pub fn angle_at(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> f64 {
    let ab = b - a;
    let ac = c - a;
    let denom = ab.norm() * ac.norm();
    if denom < 1e-12 {
        return 0.0;
    }
    (ab.dot(&ac) / denom).clamp(-1.0, 1.0).acos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_plane_from_points() {
        let plane = Plane::from_points(
            &Point3::new(0.0, 0.0, 1.0),
            &Point3::new(1.0, 0.0, 1.0),
            &Point3::new(0.0, 1.0, 1.0),
        )
        .unwrap();
        assert!((plane.normal - Vector3::z()).norm() < 1e-12);
        assert!((plane.offset - 1.0).abs() < 1e-12);
        assert!((plane.signed_distance(&Point3::new(5.0, 5.0, 3.0)) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_plane_collinear() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(2.0, 0.0, 0.0);
        assert!(Plane::from_points(&a, &b, &c).is_none());
    }

    #[test]
    fn test_reflect_and_project() {
        let plane = Plane::xy();
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(plane.reflect(&p), Point3::new(1.0, 2.0, -3.0));
        assert_eq!(plane.project(&p), Point3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_newell_unit_square() {
        let square = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let n = newell_normal(&square);
        assert!((n - Vector3::new(0.0, 0.0, 2.0)).norm() < 1e-12);
        assert_eq!(centroid(&square), Some(Point3::new(0.5, 0.5, 0.0)));
    }

    #[test]
    fn test_angle_at() {
        let a = Point3::origin();
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(0.0, 3.0, 0.0);
        assert!((angle_at(&a, &b, &c) - FRAC_PI_2).abs() < 1e-12);
        assert!(safe_normalize(&Vector3::zeros()).is_none());
    }
}
