// crates/af_physics/src/numerics/reconstruction/venkatakrishnan.rs

//! Venkatakrishnan 限制
//!
//! Barth-Jespersen 的光滑化变体：min 运算换为有理光滑函数，
//! 定常收敛性更好。ε² = (K h)³，h 取单元面积的平方根。
//!
//! K 参数小则限制强（激波），大则限制弱（光滑流动）。

use af_foundation::MACHINE_ZERO;
use af_mesh::FlowMesh;
use glam::DVec2;
use rayon::prelude::*;

use super::barth_jespersen::limited_extrapolate;
use super::{neighbor_extrema, SolutionReconstruction};
use crate::state::{CellGradient, Cons, NVARS};

/// Venkatakrishnan 重构
#[derive(Debug, Clone, Copy)]
pub struct VenkatakrishnanReconstruction {
    /// K 参数
    k: f64,
}

impl VenkatakrishnanReconstruction {
    /// 创建，`k` 控制限制强度
    pub fn new(k: f64) -> Self {
        Self { k }
    }

    /// 光滑限制函数 ψ(Δ₂, Δ) ∈ (0, 1]
    ///
    /// Δ₂ 为允许变化（Δ⁺ 或 Δ⁻），Δ 为重构增量。
    #[inline]
    fn phi(delta2: f64, delta: f64, eps_sq: f64) -> f64 {
        let num = (delta2 * delta2 + eps_sq) * delta + 2.0 * delta * delta * delta2;
        let den = delta2 * delta2 + 2.0 * delta * delta + delta2 * delta + eps_sq;
        (num / (den * delta)).min(1.0)
    }

    /// 单元的逐分量限制因子
    fn limiter_factors(
        &self,
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
        let h = mesh.cell_area(cell).sqrt();
        let kh = self.k * h;
        let eps_sq = kh * kh * kh;

        let mut psi: Cons = [1.0; NVARS];
        for face in mesh.cell_faces(cell) {
            let dr = gauss[face] - rc[cell];
            for var in 0..NVARS {
                let delta = grad[0][var] * dr.x + grad[1][var] * dr.y;
                let own = u[cell * NVARS + var];
                let factor = if delta > MACHINE_ZERO {
                    Self::phi(umax[var] - own, delta, eps_sq)
                } else if delta < -MACHINE_ZERO {
                    Self::phi(umin[var] - own, delta, eps_sq)
                } else {
                    1.0
                };
                psi[var] = psi[var].min(factor);
            }
        }
        psi
    }
}

impl SolutionReconstruction for VenkatakrishnanReconstruction {
    fn name(&self) -> &'static str {
        "Venkatakrishnan"
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

                let psi_l = self.limiter_factors(mesh, rc, gauss, u, ug, grads, left);
                ul.copy_from_slice(&limited_extrapolate(u, grads, rc, left, &psi_l, gp));

                if right < mesh.n_cells() {
                    let psi_r = self.limiter_factors(mesh, rc, gauss, u, ug, grads, right);
                    ur.copy_from_slice(&limited_extrapolate(u, grads, rc, right, &psi_r, gp));
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phi_bounded() {
        let eps_sq = 1e-3;
        for &delta2 in &[0.0, 0.1, 1.0, 5.0] {
            for &delta in &[1e-6, 0.05, 0.5, 2.0] {
                let psi = VenkatakrishnanReconstruction::phi(delta2, delta, eps_sq);
                assert!(psi > 0.0 && psi <= 1.0, "ψ({}, {}) = {}", delta2, delta, psi);
            }
        }
    }

    #[test]
    fn test_phi_small_delta_unlimited() {
        // Δ ≪ ε：限制因子趋近 1
        let psi = VenkatakrishnanReconstruction::phi(0.5, 1e-8, 1e-3);
        assert!((psi - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_phi_large_overshoot_limited() {
        // Δ ≫ Δ₂：强限制
        let psi = VenkatakrishnanReconstruction::phi(0.01, 1.0, 1e-9);
        assert!(psi < 0.1);
    }

    #[test]
    fn test_k_monotonicity() {
        // K 越大限制越弱
        use af_mesh::generation::{rectangle, RectangleMarkers};

        let mesh = rectangle(3, 3, 1.0, 1.0, RectangleMarkers::default()).unwrap();
        let mut rc: Vec<DVec2> = (0..mesh.n_cells()).map(|c| mesh.cell_centroid(c)).collect();
        for b in 0..mesh.n_bfaces() {
            let (left, _) = mesh.face_cells(b);
            rc.push(2.0 * mesh.face_midpoint(b) - mesh.cell_centroid(left));
        }
        let gauss: Vec<DVec2> = (0..mesh.n_faces()).map(|f| mesh.face_midpoint(f)).collect();

        let mut u = vec![0.0; mesh.n_cells() * NVARS];
        for c in 0..mesh.n_cells() {
            for var in 0..NVARS {
                u[c * NVARS + var] = ((c * 31) % 5) as f64;
            }
        }
        let ug = vec![2.0; mesh.n_bfaces() * NVARS];
        let grads = vec![[[8.0; NVARS], [-6.0; NVARS]]; mesh.n_cells()];

        let weak = VenkatakrishnanReconstruction::new(5.0);
        let strong = VenkatakrishnanReconstruction::new(0.1);
        for c in 0..mesh.n_cells() {
            let psi_weak = weak.limiter_factors(&mesh, &rc, &gauss, &u, &ug, &grads, c);
            let psi_strong = strong.limiter_factors(&mesh, &rc, &gauss, &u, &ug, &grads, c);
            for var in 0..NVARS {
                assert!(psi_weak[var] + 1e-12 >= psi_strong[var]);
            }
        }
    }
}
