//! Least-squares superposition of two congruent point sets.
//!
//! The optimal rotation is taken from the unit quaternion that maximizes the
//! correlation between the centered point sets: the eigenvector belonging to the largest
//! eigenvalue of a symmetric 4×4 matrix built from their cross-covariance. The eigenvector
//! is found with a cyclic Jacobi sweep whose order, thresholds, and final ascending sort
//! are fixed, so identical inputs always yield bit-identical results.

use crate::geometry::XEPS;
use crate::model::types::Point;
use crate::ops::error::Error;
use nalgebra::{Matrix3, Matrix4, Vector3, Vector4};

const MAX_SWEEPS: usize = 100;
const CONVERGENCE: f64 = 1.0e-7;

/// Rigid transform that maps the first point set onto the second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitResult {
    pub rotation: Matrix3<f64>,
    pub translation: Vector3<f64>,
    /// Root-mean-square deviation after superposition.
    pub rms: f64,
}

impl FitResult {
    pub fn apply(&self, point: &Point) -> Point {
        Point::from(self.rotation * point.coords + self.translation)
    }
}

pub struct LeastSquaresFitter;

impl LeastSquaresFitter {
    /// Finds `(R, t)` minimizing `Σ |R·templateᵢ + t − experimentalᵢ|²`.
    ///
    /// # Arguments
    ///
    /// * `template` - Reference coordinates (moved by the transform).
    /// * `experimental` - Target coordinates, paired by index with `template`.
    ///
    /// # Returns
    ///
    /// The rotation, translation, and RMS deviation of the superposition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Input`] when the slices differ in length or hold fewer than three
    /// points, and [`Error::Fit`] when either set collapses onto its centroid, the
    /// cross-covariance is not finite or vanishes, or the eigen solver does not converge.
    pub fn fit(template: &[Point], experimental: &[Point]) -> Result<FitResult, Error> {
        if template.len() != experimental.len() {
            return Err(Error::input(format!(
                "point sets differ in length ({} vs {})",
                template.len(),
                experimental.len()
            )));
        }
        let n = template.len();
        if n < 3 {
            return Err(Error::input(format!(
                "at least 3 point pairs are required, got {n}"
            )));
        }

        let c1 = centroid(template);
        let c2 = centroid(experimental);
        if spread(template, &c1) < XEPS || spread(experimental, &c2) < XEPS {
            return Err(Error::fit("point set has no spread about its centroid"));
        }

        let mut cov = Matrix3::zeros();
        for (p, q) in template.iter().zip(experimental) {
            cov += (p.coords - c1) * (q.coords - c2).transpose();
        }
        cov /= (n - 1) as f64;

        if cov.iter().any(|v| !v.is_finite()) {
            return Err(Error::fit("cross-covariance matrix is not finite"));
        }
        if cov.amax() < XEPS {
            return Err(Error::fit("cross-covariance matrix is singular"));
        }

        let (_, eigenvectors) = jacobi(quaternion_matrix(&cov))?;
        let q: Vector4<f64> = eigenvectors.column(3).into_owned();
        let rotation = quaternion_to_rotation(&q);
        let translation = c2 - rotation * c1;

        let sum_sq: f64 = template
            .iter()
            .zip(experimental)
            .map(|(p, e)| (rotation * p.coords + translation - e.coords).norm_squared())
            .sum();
        let rms = (sum_sq / n as f64).sqrt();

        Ok(FitResult {
            rotation,
            translation,
            rms,
        })
    }
}

fn centroid(points: &[Point]) -> Vector3<f64> {
    points.iter().map(|p| p.coords).sum::<Vector3<f64>>() / points.len() as f64
}

/// Largest distance of any point from `center`.
fn spread(points: &[Point], center: &Vector3<f64>) -> f64 {
    points
        .iter()
        .map(|p| (p.coords - center).norm())
        .fold(0.0, f64::max)
}

fn quaternion_matrix(u: &Matrix3<f64>) -> Matrix4<f64> {
    let (u11, u12, u13) = (u[(0, 0)], u[(0, 1)], u[(0, 2)]);
    let (u21, u22, u23) = (u[(1, 0)], u[(1, 1)], u[(1, 2)]);
    let (u31, u32, u33) = (u[(2, 0)], u[(2, 1)], u[(2, 2)]);

    let n12 = u23 - u32;
    let n13 = u31 - u13;
    let n14 = u12 - u21;
    let n23 = u12 + u21;
    let n24 = u31 + u13;
    let n34 = u23 + u32;

    Matrix4::new(
        u11 + u22 + u33,
        n12,
        n13,
        n14,
        n12,
        u11 - u22 - u33,
        n23,
        n24,
        n13,
        n23,
        -u11 + u22 - u33,
        n34,
        n14,
        n24,
        n34,
        -u11 - u22 + u33,
    )
}

fn quaternion_to_rotation(q: &Vector4<f64>) -> Matrix3<f64> {
    let nn = q * q.transpose();
    let (q00, q11, q22, q33) = (nn[(0, 0)], nn[(1, 1)], nn[(2, 2)], nn[(3, 3)]);

    Matrix3::new(
        q00 + q11 - q22 - q33,
        2.0 * (nn[(1, 2)] - nn[(0, 3)]),
        2.0 * (nn[(1, 3)] + nn[(0, 2)]),
        2.0 * (nn[(2, 1)] + nn[(0, 3)]),
        q00 - q11 + q22 - q33,
        2.0 * (nn[(2, 3)] - nn[(0, 1)]),
        2.0 * (nn[(3, 1)] - nn[(0, 2)]),
        2.0 * (nn[(3, 2)] + nn[(0, 1)]),
        q00 - q11 - q22 + q33,
    )
}

#[inline]
fn rotate(m: &mut Matrix4<f64>, s: f64, tau: f64, ij: (usize, usize), kl: (usize, usize)) {
    let g = m[ij];
    let h = m[kl];
    m[ij] = g - s * (h + g * tau);
    m[kl] = h + s * (g - h * tau);
}

/// Eigen-decomposition of a symmetric 4×4 matrix by cyclic Jacobi rotations.
///
/// Returns eigenvalues in ascending order with the eigenvectors as the matching columns.
fn jacobi(mut a: Matrix4<f64>) -> Result<(Vector4<f64>, Matrix4<f64>), Error> {
    const N: usize = 4;
    let mut v = Matrix4::identity();
    let mut d: Vector4<f64> = a.diagonal();
    let mut b = d;
    let mut z = Vector4::zeros();

    for sweep in 1..=MAX_SWEEPS {
        let mut sm = 0.0;
        for p in 0..N - 1 {
            for q in p + 1..N {
                sm += a[(p, q)].abs();
            }
        }
        if sm < CONVERGENCE {
            sort_ascending(&mut d, &mut v);
            return Ok((d, v));
        }

        let tresh = if sweep < 4 {
            0.2 * sm / (N * N) as f64
        } else {
            0.0
        };

        for p in 0..N - 1 {
            for q in p + 1..N {
                let g = 100.0 * a[(p, q)].abs();
                if sweep > 4 && d[p].abs() + g == d[p].abs() && d[q].abs() + g == d[q].abs() {
                    a[(p, q)] = 0.0;
                } else if a[(p, q)].abs() > tresh {
                    let h = d[q] - d[p];
                    let t = if h.abs() + g == h.abs() {
                        a[(p, q)] / h
                    } else {
                        let theta = 0.5 * h / a[(p, q)];
                        let t = 1.0 / (theta.abs() + (1.0 + theta * theta).sqrt());
                        if theta < 0.0 { -t } else { t }
                    };
                    let c = 1.0 / (1.0 + t * t).sqrt();
                    let s = t * c;
                    let tau = s / (1.0 + c);
                    let h = t * a[(p, q)];
                    z[p] -= h;
                    z[q] += h;
                    d[p] -= h;
                    d[q] += h;
                    a[(p, q)] = 0.0;

                    for j in 0..p {
                        rotate(&mut a, s, tau, (j, p), (j, q));
                    }
                    for j in p + 1..q {
                        rotate(&mut a, s, tau, (p, j), (j, q));
                    }
                    for j in q + 1..N {
                        rotate(&mut a, s, tau, (p, j), (q, j));
                    }
                    for j in 0..N {
                        rotate(&mut v, s, tau, (j, p), (j, q));
                    }
                }
            }
        }

        b += z;
        d = b;
        z = Vector4::zeros();
    }

    Err(Error::fit(format!(
        "Jacobi eigen-decomposition did not converge in {MAX_SWEEPS} sweeps"
    )))
}

fn sort_ascending(d: &mut Vector4<f64>, v: &mut Matrix4<f64>) {
    for i in 0..3 {
        let mut k = i;
        let mut p = d[i];
        for j in i + 1..4 {
            if d[j] < p {
                k = j;
                p = d[j];
            }
        }
        if k != i {
            d[k] = d[i];
            d[i] = p;
            v.swap_columns(i, k);
        }
    }
}
