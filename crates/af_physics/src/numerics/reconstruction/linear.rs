// crates/af_physics/src/numerics/reconstruction/linear.rs

//! 无限制线性重构
//!
//! u_f = u_c + ∇u_c · (r_g − r_c)，两侧对称。光滑解的标准二阶重构。

use af_mesh::FlowMesh;
use glam::DVec2;
use rayon::prelude::*;

use super::{extrapolate, SolutionReconstruction};
use crate::state::{CellGradient, NVARS};

/// 无限制线性重构
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearReconstruction;

impl SolutionReconstruction for LinearReconstruction {
    fn name(&self) -> &'static str {
        "LinearUnlimited"
    }

    fn compute_face_values(
        &self,
        mesh: &FlowMesh,
        rc: &[DVec2],
        gauss: &[DVec2],
        u: &[f64],
        ug: &[f64],
        grads: &[CellGradient],
        uleft: &mut [f64],
        uright: &mut [f64],
    ) {
        let _ = ug;
        uleft
            .par_chunks_mut(NVARS)
            .zip(uright.par_chunks_mut(NVARS))
            .enumerate()
            .for_each(|(face, (ul, ur))| {
                let (left, right) = mesh.face_cells(face);
                let gp = gauss[face];
                ul.copy_from_slice(&extrapolate(u, grads, rc, left, gp));
                if right < mesh.n_cells() {
                    ur.copy_from_slice(&extrapolate(u, grads, rc, right, gp));
                }
            });
    }
}
