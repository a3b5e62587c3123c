// crates/af_physics/src/numerics/reconstruction/barth_jespersen.rs

//! Barth-Jespersen 限制
//!
//! 逐单元限制因子 ψ_c = min_f min(1, Δ±/Δ_f)，Δ_f = ∇u·(r_g − r_c)，
//! Δ⁺ = u_max − u_c、Δ⁻ = u_min − u_c 取面邻居（含幽灵）极值。
//! 重构面值不产生新极值。

use af_foundation::MACHINE_ZERO;
use af_mesh::FlowMesh;
use glam::DVec2;
use rayon::prelude::*;

use super::{neighbor_extrema, SolutionReconstruction};
use crate::state::{CellGradient, Cons, NVARS};

/// Barth-Jespersen 重构
#[derive(Debug, Clone, Copy, Default)]
pub struct BarthJespersenReconstruction;

/// 单元的逐分量限制因子
pub(crate) fn limiter_factors(
    mesh: &FlowMesh,
    rc: &[DVec2],
    gauss: &[DVec2],
    u: &[f64],
    ug: &[f64],
    grads: &[CellGradient],
    cell: usize,
) -> Cons {
    let (umin, umax) = neighbor_extrema(mesh, u, ug, cell);
    let grad = &grads[cell];
    let mut psi: Cons = [1.0; NVARS];

    for face in mesh.cell_faces(cell) {
        let dr = gauss[face] - rc[cell];
        for var in 0..NVARS {
            let delta = grad[0][var] * dr.x + grad[1][var] * dr.y;
            let own = u[cell * NVARS + var];
            let factor = if delta > MACHINE_ZERO {
                ((umax[var] - own) / delta).min(1.0)
            } else if delta < -MACHINE_ZERO {
                ((umin[var] - own) / delta).min(1.0)
            } else {
                1.0
            };
            psi[var] = psi[var].min(factor);
        }
    }
    psi
}

/// 带限制因子的线性外推
#[inline]
pub(crate) fn limited_extrapolate(
    u: &[f64],
    grads: &[CellGradient],
    rc: &[DVec2],
    cell: usize,
    psi: &Cons,
    point: DVec2,
) -> Cons {
    let dr = point - rc[cell];
    let grad = &grads[cell];
    let mut out = [0.0; NVARS];
    for var in 0..NVARS {
        out[var] = u[cell * NVARS + var]
            + psi[var] * (grad[0][var] * dr.x + grad[1][var] * dr.y);
    }
    out
}

impl SolutionReconstruction for BarthJespersenReconstruction {
    fn name(&self) -> &'static str {
        "BarthJespersen"
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
        uleft
            .par_chunks_mut(NVARS)
            .zip(uright.par_chunks_mut(NVARS))
            .enumerate()
            .for_each(|(face, (ul, ur))| {
                let (left, right) = mesh.face_cells(face);
                let gp = gauss[face];

                let psi_l = limiter_factors(mesh, rc, gauss, u, ug, grads, left);
                ul.copy_from_slice(&limited_extrapolate(u, grads, rc, left, &psi_l, gp));

                if right < mesh.n_cells() {
                    let psi_r = limiter_factors(mesh, rc, gauss, u, ug, grads, right);
                    ur.copy_from_slice(&limited_extrapolate(u, grads, rc, right, &psi_r, gp));
                }
            });
    }
}
