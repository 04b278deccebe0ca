//! Intersection area of two simple planar polygons.
//!
//! Coordinates are snapped onto a shared integer grid spanning both polygons. Every
//! vertex gets distinct low-order bits (parity of its index, plus a per-polygon offset),
//! so no vertex of one polygon lies exactly on an edge of the other and no two edges are
//! exactly collinear. Edge crossings and winding numbers are then decided with exact
//! integer orientation tests, and the area is accumulated as signed trapezoids.

use nalgebra::Point2;

/// Width of the integer grid both polygons are mapped onto.
const GAMUT: f64 = 5.0e8;
const MID: f64 = GAMUT / 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GridPoint {
    x: i64,
    y: i64,
}

#[derive(Debug, Clone, Copy)]
struct Span {
    min: i64,
    max: i64,
}

impl Span {
    fn new(a: i64, b: i64) -> Self {
        if a < b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    fn overlaps(&self, other: &Span) -> bool {
        self.min < other.max && other.min < self.max
    }
}

/// Vertex together with the extent of the edge that starts at it.
#[derive(Debug, Clone, Copy)]
struct Vertex {
    ip: GridPoint,
    rx: Span,
    ry: Span,
    crossings: i64,
}

#[derive(Debug, Clone, Copy)]
struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Bounds {
    fn of(points: &[Point2<f64>]) -> Self {
        let mut bounds = Bounds {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        };
        bounds.extend(points);
        bounds
    }

    fn extend(&mut self, points: &[Point2<f64>]) {
        for p in points {
            self.min_x = self.min_x.min(p.x);
            self.min_y = self.min_y.min(p.y);
            self.max_x = self.max_x.max(p.x);
            self.max_y = self.max_y.max(p.y);
        }
    }

    fn intersects(&self, other: &Bounds) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }
}

/// Twice the signed area of the triangle `(a, p, q)`.
fn orientation(a: GridPoint, p: GridPoint, q: GridPoint) -> f64 {
    let (ax, ay) = (a.x as i128, a.y as i128);
    let (px, py) = (p.x as i128, p.y as i128);
    let (qx, qy) = (q.x as i128, q.y as i128);
    (px * qy - py * qx + ax * (py - qy) + ay * (qx - px)) as f64
}

fn contribute(from: GridPoint, to: GridPoint, weight: i64, sum: &mut f64) {
    *sum += weight as f64 * (to.x - from.x) as f64 * (to.y + from.y) as f64 / 2.0;
}

struct Grid {
    bounds: Bounds,
    scale_x: f64,
    scale_y: f64,
}

impl Grid {
    fn snap(&self, points: &[Point2<f64>], fudge: i64) -> Vec<Vertex> {
        let n = points.len();
        let mut ip: Vec<GridPoint> = points
            .iter()
            .enumerate()
            .map(|(c, p)| GridPoint {
                x: (((p.x - self.bounds.min_x) * self.scale_x - MID) as i64 & !7)
                    | fudge
                    | (c as i64 & 1),
                y: (((p.y - self.bounds.min_y) * self.scale_y - MID) as i64 & !7) | fudge,
            })
            .collect();
        ip[0].y += (n & 1) as i64;
        ip.push(ip[0]);

        (0..=n)
            .map(|c| {
                let next = ip[(c + 1).min(n)];
                Vertex {
                    ip: ip[c],
                    rx: Span::new(ip[c].x, next.x),
                    ry: Span::new(ip[c].y, next.y),
                    crossings: 0,
                }
            })
            .collect()
    }
}

/// Records the two partial edges produced where edge `a→b` crosses edge `c→d`.
#[allow(clippy::too_many_arguments)]
fn cross(
    a: usize,
    b: usize,
    first: &mut [Vertex],
    c: usize,
    d: usize,
    second: &mut [Vertex],
    (a1, a2, a3, a4): (f64, f64, f64, f64),
    sum: &mut f64,
) {
    let r1 = a1 / (a1 + a2);
    let r2 = a3 / (a3 + a4);
    let (pa, pb) = (first[a].ip, first[b].ip);
    let (pc, pd) = (second[c].ip, second[d].ip);

    let on_first = GridPoint {
        x: (pa.x as f64 + r1 * (pb.x - pa.x) as f64) as i64,
        y: (pa.y as f64 + r1 * (pb.y - pa.y) as f64) as i64,
    };
    let on_second = GridPoint {
        x: (pc.x as f64 + r2 * (pd.x - pc.x) as f64) as i64,
        y: (pc.y as f64 + r2 * (pd.y - pc.y) as f64) as i64,
    };
    contribute(on_first, pb, 1, sum);
    contribute(pd, on_second, 1, sum);
    first[a].crossings += 1;
    second[c].crossings -= 1;
}

/// Adds the edges of `p` that lie inside `q`, weighted by winding number.
fn inness(p: &[Vertex], q: &[Vertex], sum: &mut f64) {
    let np = p.len() - 1;
    let nq = q.len() - 1;
    let start = p[0].ip;
    let mut winding: i64 = 0;

    for c in (0..nq).rev() {
        if q[c].rx.min < start.x && start.x < q[c].rx.max {
            let positive = 0.0 < orientation(start, q[c].ip, q[c + 1].ip);
            if positive == (q[c].ip.x < q[c + 1].ip.x) {
                winding += if positive { -1 } else { 1 };
            }
        }
    }

    for j in 0..np {
        if winding != 0 {
            contribute(p[j].ip, p[j + 1].ip, winding, sum);
        }
        winding += p[j].crossings;
    }
}

/// Area of the intersection of two simple polygons.
///
/// Vertices may be given in either winding direction; the result is always
/// non-negative. Polygons with fewer than three vertices, and polygons whose bounding
/// boxes do not meet, have zero overlap.
///
/// # Arguments
///
/// * `a` - Vertices of the first polygon, in perimeter order.
/// * `b` - Vertices of the second polygon, in perimeter order.
///
/// # Returns
///
/// The intersection area in the squared units of the input coordinates.
pub fn polygon_intersection_area(a: &[Point2<f64>], b: &[Point2<f64>]) -> f64 {
    if a.len() < 3 || b.len() < 3 {
        return 0.0;
    }

    let bounds_a = Bounds::of(a);
    let bounds_b = Bounds::of(b);
    if !bounds_a.intersects(&bounds_b) {
        return 0.0;
    }

    let mut bounds = bounds_a;
    bounds.extend(b);
    let range_x = bounds.max_x - bounds.min_x;
    let range_y = bounds.max_y - bounds.min_y;
    if !(range_x > 0.0 && range_y > 0.0) || !range_x.is_finite() || !range_y.is_finite() {
        return 0.0;
    }

    let grid = Grid {
        bounds,
        scale_x: GAMUT / range_x,
        scale_y: GAMUT / range_y,
    };
    let mut ipa = grid.snap(a, 0);
    let mut ipb = grid.snap(b, 2);
    let na = a.len();
    let nb = b.len();

    let mut sum = 0.0;
    for j in 0..na {
        for k in 0..nb {
            if !(ipa[j].rx.overlaps(&ipb[k].rx) && ipa[j].ry.overlaps(&ipb[k].ry)) {
                continue;
            }
            let a1 = -orientation(ipa[j].ip, ipb[k].ip, ipb[k + 1].ip);
            let a2 = orientation(ipa[j + 1].ip, ipb[k].ip, ipb[k + 1].ip);
            let o = a1 < 0.0;
            if o != (a2 < 0.0) {
                continue;
            }
            let a3 = orientation(ipb[k].ip, ipa[j].ip, ipa[j + 1].ip);
            let a4 = -orientation(ipb[k + 1].ip, ipa[j].ip, ipa[j + 1].ip);
            if (a3 < 0.0) != (a4 < 0.0) {
                continue;
            }
            if o {
                cross(j, j + 1, &mut ipa, k, k + 1, &mut ipb, (a1, a2, a3, a4), &mut sum);
            } else {
                cross(k, k + 1, &mut ipb, j, j + 1, &mut ipa, (a3, a4, a1, a2), &mut sum);
            }
        }
    }

    inness(&ipa, &ipb, &mut sum);
    inness(&ipb, &ipa, &mut sum);

    (sum / (grid.scale_x * grid.scale_y)).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Shoelace area of a simple polygon.
    fn polygon_area(points: &[Point2<f64>]) -> f64 {
        if points.len() < 3 {
            return 0.0;
        }
        let twice: f64 = points
            .iter()
            .zip(points.iter().cycle().skip(1))
            .map(|(p, q)| p.x * q.y - q.x * p.y)
            .sum();
        (twice / 2.0).abs()
    }

    fn square(x0: f64, y0: f64, side: f64) -> Vec<Point2<f64>> {
        vec![
            Point2::new(x0, y0),
            Point2::new(x0 + side, y0),
            Point2::new(x0 + side, y0 + side),
            Point2::new(x0, y0 + side),
        ]
    }

    fn hexagon(radius: f64) -> Vec<Point2<f64>> {
        (0..6)
            .map(|i| {
                let angle = (60.0 * i as f64 + 15.0).to_radians();
                Point2::new(radius * angle.cos(), radius * angle.sin())
            })
            .collect()
    }

    fn assert_relative(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            ((actual - expected) / expected).abs() < tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn polygon_with_itself_returns_its_own_area() {
        let hex = hexagon(1.4);
        let expected = polygon_area(&hex);

        assert_relative(polygon_intersection_area(&hex, &hex), expected, 1e-6);
    }

    #[test]
    fn disjoint_bounding_boxes_have_zero_overlap() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(5.0, 5.0, 1.0);

        assert_eq!(polygon_intersection_area(&a, &b), 0.0);
    }

    #[test]
    fn partially_overlapping_squares() {
        let a = square(0.0, 0.0, 2.0);
        let b = square(1.0, 1.0, 2.0);

        assert_relative(polygon_intersection_area(&a, &b), 1.0, 1e-6);
    }

    #[test]
    fn nested_polygon_returns_inner_area() {
        let outer = square(-3.0, -3.0, 6.0);
        let inner = hexagon(1.0);

        assert_relative(
            polygon_intersection_area(&outer, &inner),
            polygon_area(&inner),
            1e-6,
        );
        assert_relative(
            polygon_intersection_area(&inner, &outer),
            polygon_area(&inner),
            1e-6,
        );
    }

    #[test]
    fn winding_direction_does_not_change_result() {
        let a = square(0.0, 0.0, 2.0);
        let mut b = square(1.0, 0.5, 2.0);
        let forward = polygon_intersection_area(&a, &b);
        b.reverse();
        let backward = polygon_intersection_area(&a, &b);

        assert_relative(forward, 1.5, 1e-6);
        assert_relative(backward, 1.5, 1e-6);
    }

    #[test]
    fn degenerate_inputs_have_zero_overlap() {
        let a = square(0.0, 0.0, 1.0);
        let segment = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)];

        assert_eq!(polygon_intersection_area(&a, &segment), 0.0);
        assert_eq!(polygon_intersection_area(&[], &a), 0.0);
    }

    #[test]
    fn polygon_area_of_unit_square() {
        assert!((polygon_area(&square(0.0, 0.0, 1.0)) - 1.0).abs() < 1e-12);
    }
}
