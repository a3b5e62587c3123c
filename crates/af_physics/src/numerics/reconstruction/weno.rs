// crates/af_physics/src/numerics/reconstruction/weno.rs

//! WENO 重构
//!
//! 候选线性重构取本单元与内部面邻居的梯度，按光滑度非线性加权：
//! ω_k = γ_k / (|g_k|² + ε)²，本单元候选权重 γ = 中心权重参数，
//! 邻居候选 γ = 1。光滑区趋向中心梯度保持二阶，间断附近偏向
//! 更平缓的候选梯度。

use af_mesh::FlowMesh;
use glam::DVec2;
use rayon::prelude::*;

use super::SolutionReconstruction;
use crate::state::{CellGradient, Cons, NVARS};

/// 光滑度指示子正则化参数
const WENO_EPS: f64 = 1e-10;

/// WENO 重构
#[derive(Debug, Clone, Copy)]
pub struct WenoReconstruction {
    /// 本单元候选的中心权重
    central_weight: f64,
}

impl WenoReconstruction {
    /// 创建，`central_weight` 为本单元候选的权重倍数
    pub fn new(central_weight: f64) -> Self {
        Self { central_weight }
    }

    /// 单元的逐分量混合梯度
    fn blended_gradient(
        &self,
        mesh: &FlowMesh,
        grads: &[CellGradient],
        cell: usize,
    ) -> CellGradient {
        let n_cells = mesh.n_cells();
        let mut blended = [[0.0; NVARS]; 2];

        for var in 0..NVARS {
            let mut wsum = 0.0;
            let mut gx = 0.0;
            let mut gy = 0.0;

            // 本单元候选
            let own = &grads[cell];
            let si_own = own[0][var] * own[0][var] + own[1][var] * own[1][var];
            let w_own = self.central_weight / ((si_own + WENO_EPS) * (si_own + WENO_EPS));
            wsum += w_own;
            gx += w_own * own[0][var];
            gy += w_own * own[1][var];

            // 内部面邻居候选（幽灵单元无梯度）
            for face in mesh.cell_faces(cell) {
                let (left, right) = mesh.face_cells(face);
                let other = if left == cell { right } else { left };
                if other >= n_cells {
                    continue;
                }
                let g = &grads[other];
                let si = g[0][var] * g[0][var] + g[1][var] * g[1][var];
                let w = 1.0 / ((si + WENO_EPS) * (si + WENO_EPS));
                wsum += w;
                gx += w * g[0][var];
                gy += w * g[1][var];
            }

            blended[0][var] = gx / wsum;
            blended[1][var] = gy / wsum;
        }
        blended
    }

    /// 混合梯度的线性外推
    fn reconstruct(
        &self,
        mesh: &FlowMesh,
        rc: &[DVec2],
        u: &[f64],
        grads: &[CellGradient],
        cell: usize,
        point: DVec2,
    ) -> Cons {
        let blended = self.blended_gradient(mesh, grads, cell);
        let dr = point - rc[cell];
        let mut out = [0.0; NVARS];
        for var in 0..NVARS {
            out[var] =
                u[cell * NVARS + var] + blended[0][var] * dr.x + blended[1][var] * dr.y;
        }
        out
    }
}

impl SolutionReconstruction for WenoReconstruction {
    fn name(&self) -> &'static str {
        "WENO"
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
                ul.copy_from_slice(&self.reconstruct(mesh, rc, u, grads, left, gp));
                if right < mesh.n_cells() {
                    ur.copy_from_slice(&self.reconstruct(mesh, rc, u, grads, right, gp));
                }
            });
    }
}
