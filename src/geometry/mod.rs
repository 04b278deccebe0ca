//! Angle and rotation helpers shared by the fitter, the validator, and the step transform.
//!
//! All angles are in degrees. Degenerate inputs (vectors shorter than [`XEPS`]) produce
//! neutral results (zero angles, identity rotations) rather than NaN.

pub mod overlap;
pub mod step;

use nalgebra::{Matrix3, Vector3};

/// Length below which a vector is treated as zero.
pub const XEPS: f64 = 1.0e-7;

/// Angle in degrees for a cosine, clamping round-off outside `[-1, 1]`.
pub fn dot2ang(cosine: f64) -> f64 {
    cosine.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Unsigned angle between two vectors in degrees; `0` when either is degenerate.
pub fn magang(va: &Vector3<f64>, vb: &Vector3<f64>) -> f64 {
    let la = va.norm();
    let lb = vb.norm();
    if la < XEPS || lb < XEPS {
        return 0.0;
    }
    dot2ang(va.dot(vb) / (la * lb))
}

/// Component of `va` orthogonal to `vref`, normalized.
///
/// Returns the zero vector when nothing is left after projection.
pub fn vec_orth(va: &Vector3<f64>, vref: &Vector3<f64>) -> Vector3<f64> {
    let unit_ref = match vref.try_normalize(XEPS) {
        Some(v) => v,
        None => return va.try_normalize(XEPS).unwrap_or_else(Vector3::zeros),
    };
    let orth = va - unit_ref * va.dot(&unit_ref);
    orth.try_normalize(XEPS).unwrap_or_else(Vector3::zeros)
}

/// Signed angle from `va` to `vb` about `vref`, after projecting both onto the plane
/// perpendicular to `vref`.
pub fn vec_ang(va: &Vector3<f64>, vb: &Vector3<f64>, vref: &Vector3<f64>) -> f64 {
    let a = vec_orth(va, vref);
    let b = vec_orth(vb, vref);
    let angle = magang(&a, &b);
    if a.cross(&b).dot(vref) < 0.0 {
        -angle
    } else {
        angle
    }
}

/// Right-handed rotation of `angle_deg` degrees about `axis`.
///
/// # Arguments
///
/// * `axis` - Rotation axis; need not be normalized.
/// * `angle_deg` - Rotation angle in degrees.
///
/// # Returns
///
/// The rotation matrix, or the identity when `axis` is degenerate.
pub fn arb_rotation(axis: &Vector3<f64>, angle_deg: f64) -> Matrix3<f64> {
    let Some(u) = axis.try_normalize(XEPS) else {
        return Matrix3::identity();
    };
    let (s, c) = angle_deg.to_radians().sin_cos();
    let dc = 1.0 - c;
    let (x, y, z) = (u.x, u.y, u.z);

    Matrix3::new(
        dc * x * x + c,
        dc * x * y - z * s,
        dc * x * z + y * s,
        dc * x * y + z * s,
        dc * y * y + c,
        dc * y * z - x * s,
        dc * x * z - y * s,
        dc * y * z + x * s,
        dc * z * z + c,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Rotation3;

    #[test]
    fn dot2ang_clamps_out_of_range_cosines() {
        assert!((dot2ang(1.0000001) - 0.0).abs() < 1e-12);
        assert!((dot2ang(-1.0000001) - 180.0).abs() < 1e-12);
        assert!((dot2ang(0.0) - 90.0).abs() < 1e-12);
    }

    #[test]
    fn magang_is_zero_for_degenerate_vectors() {
        assert_eq!(magang(&Vector3::zeros(), &Vector3::x()), 0.0);
        assert!((magang(&Vector3::x(), &Vector3::y()) - 90.0).abs() < 1e-12);
        assert!((magang(&Vector3::x(), &-Vector3::x()) - 180.0).abs() < 1e-12);
    }

    #[test]
    fn vec_orth_removes_reference_component() {
        let v = vec_orth(&Vector3::new(1.0, 1.0, 5.0), &Vector3::z());

        assert!(v.z.abs() < 1e-12);
        assert!((v.norm() - 1.0).abs() < 1e-12);
        assert_eq!(vec_orth(&Vector3::z(), &Vector3::z()), Vector3::zeros());
    }

    #[test]
    fn vec_ang_sign_follows_reference_axis() {
        let angle = vec_ang(&Vector3::x(), &Vector3::y(), &Vector3::z());
        let reversed = vec_ang(&Vector3::x(), &Vector3::y(), &-Vector3::z());

        assert!((angle - 90.0).abs() < 1e-12);
        assert!((reversed + 90.0).abs() < 1e-12);
    }

    #[test]
    fn arb_rotation_matches_axis_angle_rotation() {
        let axis = Vector3::new(0.3, -1.2, 0.5);
        let expected = Rotation3::from_axis_angle(
            &nalgebra::Unit::new_normalize(axis),
            37.0_f64.to_radians(),
        );
        let rotation = arb_rotation(&axis, 37.0);

        assert!((rotation - expected.into_inner()).amax() < 1e-12);
    }

    #[test]
    fn arb_rotation_with_zero_axis_is_identity() {
        assert_eq!(arb_rotation(&Vector3::zeros(), 45.0), Matrix3::identity());
    }
}
