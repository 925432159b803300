// Polygon utilities and convex partitioning

use glam::Vec2;
use parry2d::math::Point;
use parry2d::transformation::vhacd::{VHACDParameters, VHACD};

/// A simple polygon stored as an ordered vertex ring
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vec2>,
}

impl Polygon {
    pub fn new(vertices: Vec<Vec2>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Signed area (positive for clockwise rings in y-down space)
    pub fn signed_area(&self) -> f32 {
        let n = self.vertices.len();
        if n < 3 {
            return 0.0;
        }
        (0..n)
            .map(|i| {
                let a = self.vertices[i];
                let b = self.vertices[(i + 1) % n];
                a.perp_dot(b)
            })
            .sum::<f32>()
            * 0.5
    }

    /// Area centroid, or the vertex average for degenerate rings
    pub fn centroid(&self) -> Vec2 {
        let n = self.vertices.len();
        if n == 0 {
            return Vec2::ZERO;
        }

        let area = self.signed_area();
        if area.abs() <= f32::EPSILON {
            return self.vertices.iter().copied().sum::<Vec2>() / n as f32;
        }

        let mut sum = Vec2::ZERO;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            sum += (a + b) * a.perp_dot(b);
        }
        sum / (6.0 * area)
    }

    pub fn translate(&mut self, offset: Vec2) {
        for v in &mut self.vertices {
            *v += offset;
        }
    }

    /// Drop vertices closer than `distance` to the previously kept vertex
    ///
    /// Returns the polygon unchanged if the reduction would leave fewer than
    /// three vertices.
    pub fn reduce_by_distance(&self, distance: f32) -> Polygon {
        let Some(&first) = self.vertices.first() else {
            return self.clone();
        };

        let min_sq = distance * distance;
        let mut kept = vec![first];
        for &v in &self.vertices[1..] {
            if let Some(&last) = kept.last() {
                if v.distance_squared(last) >= min_sq {
                    kept.push(v);
                }
            }
        }

        // Close the ring: the last vertex must also be far enough from the first
        while kept.len() > 1 {
            match kept.last() {
                Some(&last) if last.distance_squared(first) < min_sq => {
                    kept.pop();
                }
                _ => break,
            }
        }

        if kept.len() < 3 {
            return self.clone();
        }
        Polygon::new(kept)
    }

    /// True when every turn goes the same way (collinear runs allowed)
    pub fn is_convex(&self) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }

        let mut sign = 0.0f32;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let c = self.vertices[(i + 2) % n];
            let cross = (b - a).perp_dot(c - b);
            if cross.abs() <= f32::EPSILON {
                continue;
            }
            if sign == 0.0 {
                sign = cross.signum();
            } else if cross.signum() != sign {
                return false;
            }
        }
        sign != 0.0
    }
}

fn to_point(v: Vec2) -> Point<f32> {
    Point::new(v.x, v.y)
}

fn from_point(p: &Point<f32>) -> Vec2 {
    Vec2::new(p.x, p.y)
}

/// Convex hull of a point set
pub fn convex_hull(points: &[Vec2]) -> Vec<Vec2> {
    let points: Vec<Point<f32>> = points.iter().copied().map(to_point).collect();
    parry2d::transformation::convex_hull(&points)
        .iter()
        .map(from_point)
        .collect()
}

/// Split a polygon into convex parts
///
/// Convex input is returned as its own hull. Concave input goes through
/// parry's approximate convex decomposition; if that yields nothing usable
/// the convex hull of the whole ring is used instead.
pub fn convex_partition(polygon: &Polygon) -> Vec<Vec<Vec2>> {
    if polygon.len() < 3 {
        return Vec::new();
    }

    if polygon.is_convex() {
        return vec![convex_hull(polygon.vertices())];
    }

    let points: Vec<Point<f32>> = polygon.vertices().iter().copied().map(to_point).collect();
    let n = points.len() as u32;
    let indices: Vec<[u32; 2]> = (0..n).map(|i| [i, (i + 1) % n]).collect();

    let decomposition = VHACD::decompose(&VHACDParameters::default(), &points, &indices, true);
    let parts: Vec<Vec<Vec2>> = decomposition
        .compute_exact_convex_hulls(&points, &indices)
        .iter()
        // Re-hull each part so collinear vertices on its edges are dropped
        .map(|hull| convex_hull(&hull.iter().map(from_point).collect::<Vec<_>>()))
        .filter(|hull| hull.len() >= 3)
        .collect();

    if parts.is_empty() {
        log::debug!("Convex decomposition produced no parts, using hull");
        let hull = convex_hull(polygon.vertices());
        if hull.len() >= 3 {
            return vec![hull];
        }
        return Vec::new();
    }
    parts
}
