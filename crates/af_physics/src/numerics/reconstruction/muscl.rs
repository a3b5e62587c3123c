// crates/af_physics/src/numerics/reconstruction/muscl.rs

//! MUSCL + Van Albada 限制
//!
//! 沿形心连线的迎风差分由单元梯度构造：Δ_u = 2∇u·d − Δ_c，
//! d = r_R − r_L，Δ_c = u_R − u_L。限制函数 ψ(r) = 2r/(r²+1)
//! 逐分量作用于坡比 r = Δ_u/Δ_c（r < 0 时取 0），
//! 面值 u_L + ½ψΔ_c / u_R − ½ψΔ_c。

use af_foundation::MACHINE_ZERO;
use af_mesh::FlowMesh;
use glam::DVec2;
use rayon::prelude::*;

use super::super::gradient::neighbor_value;
use super::SolutionReconstruction;
use crate::state::{CellGradient, NVARS};

/// MUSCL Van Albada 重构
#[derive(Debug, Clone, Copy, Default)]
pub struct MusclVanAlbadaReconstruction;

/// Van Albada 限制函数，r < 0 时为 0
#[inline]
fn van_albada(r: f64) -> f64 {
    if r > 0.0 {
        2.0 * r / (r * r + 1.0)
    } else {
        0.0
    }
}

impl SolutionReconstruction for MusclVanAlbadaReconstruction {
    fn name(&self) -> &'static str {
        "MUSCLVanAlbada"
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
        let _ = gauss;
        let n_cells = mesh.n_cells();

        uleft
            .par_chunks_mut(NVARS)
            .zip(uright.par_chunks_mut(NVARS))
            .enumerate()
            .for_each(|(face, (ul, ur))| {
                let (left, right) = mesh.face_cells(face);
                let d = rc[right] - rc[left];
                let grad_l = &grads[left];

                for var in 0..NVARS {
                    let phi_l = u[left * NVARS + var];
                    let phi_r = neighbor_value(n_cells, u, ug, right, var);
                    let delta_c = phi_r - phi_l;

                    // 左侧
                    let proj_l = 2.0 * (grad_l[0][var] * d.x + grad_l[1][var] * d.y) - delta_c;
                    let psi_l = if delta_c.abs() < MACHINE_ZERO {
                        1.0
                    } else {
                        van_albada(proj_l / delta_c)
                    };
                    ul[var] = phi_l + 0.5 * psi_l * delta_c;

                    // 右侧（仅内部面）
                    if right < n_cells {
                        let grad_r = &grads[right];
                        let proj_r =
                            2.0 * (grad_r[0][var] * d.x + grad_r[1][var] * d.y) - delta_c;
                        let psi_r = if delta_c.abs() < MACHINE_ZERO {
                            1.0
                        } else {
                            van_albada(proj_r / delta_c)
                        };
                        ur[var] = phi_r - 0.5 * psi_r * delta_c;
                    }
                }
            });
    }
}
