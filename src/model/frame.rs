//! Local coordinate systems attached to nucleobase rings.
//!
//! A [`ReferenceFrame`] is produced once per residue by the frame calculator and never
//! mutated afterwards. Residues hold their frame in a [`FrameSlot`], which makes the
//! "no frame yet" state explicit instead of relying on sentinel values.

use super::types::Point;
use nalgebra::{Matrix3, Vector3};
use std::fmt;

/// Orthonormal rotation plus origin describing a base's local coordinate system.
///
/// Columns of `rotation` are the x, y, and z axes expressed in the global frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceFrame {
    rotation: Matrix3<f64>,
    origin: Point,
}

impl ReferenceFrame {
    /// Tolerance used when asserting orthonormality in debug builds.
    pub const ORTHONORMAL_TOLERANCE: f64 = 1e-6;

    pub fn new(rotation: Matrix3<f64>, origin: Point) -> Self {
        debug_assert!(
            is_orthonormal(&rotation, Self::ORTHONORMAL_TOLERANCE),
            "reference frame rotation is not orthonormal: {}",
            rotation
        );
        Self { rotation, origin }
    }

    /// The frame coinciding with the global axes.
    pub fn identity() -> Self {
        Self {
            rotation: Matrix3::identity(),
            origin: Point::origin(),
        }
    }

    pub fn rotation(&self) -> &Matrix3<f64> {
        &self.rotation
    }

    pub fn origin(&self) -> &Point {
        &self.origin
    }

    pub fn x_axis(&self) -> Vector3<f64> {
        self.rotation.column(0).into_owned()
    }

    pub fn y_axis(&self) -> Vector3<f64> {
        self.rotation.column(1).into_owned()
    }

    pub fn z_axis(&self) -> Vector3<f64> {
        self.rotation.column(2).into_owned()
    }

    /// Returns the frame flipped 180° about its x-axis (y and z columns negated).
    ///
    /// Used to bring an antiparallel partner into the same sense before measuring the
    /// pair transform.
    pub fn reversed(&self) -> Self {
        let mut rotation = self.rotation;
        for row in 0..3 {
            rotation[(row, 1)] = -rotation[(row, 1)];
            rotation[(row, 2)] = -rotation[(row, 2)];
        }
        Self {
            rotation,
            origin: self.origin,
        }
    }

    /// Largest absolute entry of `R·Rᵗ − I`.
    pub fn orthonormality_error(&self) -> f64 {
        orthonormality_error(&self.rotation)
    }
}

impl fmt::Display for ReferenceFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let z = self.z_axis();
        write!(
            f,
            "ReferenceFrame {{ origin: [{:.3}, {:.3}, {:.3}], z: [{:.3}, {:.3}, {:.3}] }}",
            self.origin.x, self.origin.y, self.origin.z, z.x, z.y, z.z
        )
    }
}

/// Frame storage on a residue.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FrameSlot {
    /// No frame has been computed, or the residue failed frame calculation.
    #[default]
    Unset,
    /// Frame produced by a successful fit.
    Set(ReferenceFrame),
}

impl FrameSlot {
    pub fn get(&self) -> Option<&ReferenceFrame> {
        match self {
            FrameSlot::Unset => None,
            FrameSlot::Set(frame) => Some(frame),
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, FrameSlot::Set(_))
    }
}

pub(crate) fn orthonormality_error(rotation: &Matrix3<f64>) -> f64 {
    (rotation * rotation.transpose() - Matrix3::identity()).amax()
}

pub(crate) fn is_orthonormal(rotation: &Matrix3<f64>, tolerance: f64) -> bool {
    orthonormality_error(rotation) < tolerance
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Rotation3;

    #[test]
    fn identity_frame_has_unit_axes() {
        let frame = ReferenceFrame::identity();

        assert_eq!(frame.x_axis(), Vector3::x());
        assert_eq!(frame.y_axis(), Vector3::y());
        assert_eq!(frame.z_axis(), Vector3::z());
        assert_eq!(*frame.origin(), Point::origin());
    }

    #[test]
    fn reversed_negates_y_and_z_columns_only() {
        let rotation = Rotation3::from_euler_angles(0.3, -0.2, 1.1).into_inner();
        let frame = ReferenceFrame::new(rotation, Point::new(1.0, 2.0, 3.0));
        let reversed = frame.reversed();

        assert_eq!(reversed.x_axis(), frame.x_axis());
        assert_eq!(reversed.y_axis(), -frame.y_axis());
        assert_eq!(reversed.z_axis(), -frame.z_axis());
        assert_eq!(reversed.origin(), frame.origin());
        assert!(reversed.orthonormality_error() < 1e-12);
    }

    #[test]
    fn frame_slot_reports_state() {
        let unset = FrameSlot::default();
        let set = FrameSlot::Set(ReferenceFrame::identity());

        assert!(!unset.is_set());
        assert!(unset.get().is_none());
        assert!(set.is_set());
        assert_eq!(set.get(), Some(&ReferenceFrame::identity()));
    }

    #[test]
    fn orthonormality_error_detects_scaled_matrix() {
        let scaled = Matrix3::identity() * 1.01;

        assert!(!is_orthonormal(&scaled, 1e-6));
        assert!(is_orthonormal(&Matrix3::identity(), 1e-6));
    }
}
