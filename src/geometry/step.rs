//! Rigid-body transform between two base frames, expressed in their middle frame.
//!
//! When the two frames belong to the bases of one pair the six components read as shear,
//! stretch, stagger, buckle, propeller, and opening; between consecutive pairs they are
//! shift, slide, rise, tilt, roll, and twist. Only the single-step form is provided here.

use super::{XEPS, arb_rotation, magang, vec_ang};
use crate::model::frame::ReferenceFrame;
use nalgebra::Vector3;

/// Six-parameter description of one frame relative to another.
///
/// Translations are in ångströms and rotations in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepParameters {
    pub shift: f64,
    pub slide: f64,
    pub rise: f64,
    pub tilt: f64,
    pub roll: f64,
    pub twist: f64,
}

impl StepParameters {
    /// x displacement; named shear when the frames form a base pair.
    pub fn shear(&self) -> f64 {
        self.shift
    }

    /// y displacement; named stretch when the frames form a base pair.
    pub fn stretch(&self) -> f64 {
        self.slide
    }

    /// z rotation; named opening when the frames form a base pair.
    pub fn opening(&self) -> f64 {
        self.twist
    }
}

/// Computes the step parameters that carry `first` onto `second`.
///
/// Both frames are first rotated halfway about the hinge axis `z1 × z2` so that their z
/// axes coincide; the middle frame is built from the averaged x and y axes of those
/// half-rotated frames, and the origin displacement is projected onto it.
pub fn step_parameters(first: &ReferenceFrame, second: &ReferenceFrame) -> StepParameters {
    let r1 = first.rotation();
    let r2 = second.rotation();
    let z1 = first.z_axis();
    let z2 = second.z_axis();

    let mut hinge = z1.cross(&z2);
    let roll_tilt = magang(&z1, &z2);
    if hinge.norm() < XEPS && ((roll_tilt - 180.0).abs() < XEPS || roll_tilt < XEPS) {
        hinge = first.x_axis() + second.x_axis() + first.y_axis() + second.y_axis();
    }

    let para2 = arb_rotation(&hinge, -0.5 * roll_tilt) * r2;
    let para1 = arb_rotation(&hinge, 0.5 * roll_tilt) * r1;

    let mst_z: Vector3<f64> = para2.column(2).into_owned();
    let y1: Vector3<f64> = para1.column(1).into_owned();
    let y2: Vector3<f64> = para2.column(1).into_owned();
    let x_sum: Vector3<f64> = para1.column(0) + para2.column(0);
    let mst_x = x_sum.try_normalize(XEPS).unwrap_or_else(Vector3::zeros);
    let mst_y = (y1 + y2).try_normalize(XEPS).unwrap_or_else(Vector3::zeros);

    let twist = vec_ang(&y1, &y2, &mst_z);

    let displacement = second.origin() - first.origin();
    let shift = displacement.dot(&mst_x);
    let slide = displacement.dot(&mst_y);
    let rise = displacement.dot(&mst_z);

    let phi = vec_ang(&hinge, &mst_y, &mst_z).to_radians();
    let roll = roll_tilt * phi.cos();
    let tilt = roll_tilt * phi.sin();

    StepParameters {
        shift,
        slide,
        rise,
        tilt,
        roll,
        twist,
    }
}
