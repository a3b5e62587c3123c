// crates/af_physics/src/numerics/gradient/green_gauss.rs

//! Green-Gauss 梯度
//!
//! ∇φ|c = (1/|Ωc|) Σ_f φ_f n_f ℓ_f，面值 φ_f 为跨面两侧
//! 单元值的逆距离加权平均（边界面为单元与幽灵的加权平均）。

use af_mesh::FlowMesh;
use glam::DVec2;
use rayon::prelude::*;

use super::{neighbor_value, GradientScheme};
use crate::state::{CellGradient, NVARS};

/// Green-Gauss 梯度
#[derive(Debug, Clone, Copy, Default)]
pub struct GreenGaussGradient;

impl GreenGaussGradient {
    /// 创建格式
    pub fn new() -> Self {
        Self
    }
}

impl GradientScheme for GreenGaussGradient {
    fn name(&self) -> &'static str {
        "GreenGauss"
    }

    fn compute_gradients(
        &self,
        mesh: &FlowMesh,
        rc: &[DVec2],
        u: &[f64],
        ug: &[f64],
        grads: &mut [CellGradient],
    ) {
        let n_cells = mesh.n_cells();

        grads
            .par_iter_mut()
            .enumerate()
            .for_each(|(cell, grad)| {
                *grad = [[0.0; NVARS]; 2];
                let inv_area = 1.0 / mesh.cell_area(cell);

                for face in mesh.cell_faces(cell) {
                    let (left, right) = mesh.face_cells(face);
                    let midpoint = mesh.face_midpoint(face);
                    let len = mesh.face_length(face);
                    // 法向调整为本单元外法向
                    let sign = if left == cell { 1.0 } else { -1.0 };
                    let normal = sign * mesh.face_normal(face);

                    let w_l = 1.0 / (midpoint - rc[left]).length();
                    let w_r = 1.0 / (midpoint - rc[right]).length();
                    let inv_sum = 1.0 / (w_l + w_r);

                    for var in 0..NVARS {
                        let phi_l = u[left * NVARS + var];
                        let phi_r = neighbor_value(n_cells, u, ug, right, var);
                        let phi_f = (w_l * phi_l + w_r * phi_r) * inv_sum;
                        grad[0][var] += phi_f * normal.x * len * inv_area;
                        grad[1][var] += phi_f * normal.y * len * inv_area;
                    }
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use af_mesh::generation::{rectangle, RectangleMarkers};

    /// 在单元形心与幽灵形心上取样给定场
    fn sample_field(
        mesh: &FlowMesh,
        rc: &[DVec2],
        f: impl Fn(DVec2) -> f64,
    ) -> (Vec<f64>, Vec<f64>) {
        let mut u = vec![0.0; mesh.n_cells() * NVARS];
        let mut ug = vec![0.0; mesh.n_bfaces() * NVARS];
        for c in 0..mesh.n_cells() {
            for var in 0..NVARS {
                u[c * NVARS + var] = f(rc[c]);
            }
        }
        for b in 0..mesh.n_bfaces() {
            for var in 0..NVARS {
                ug[b * NVARS + var] = f(rc[mesh.n_cells() + b]);
            }
        }
        (u, ug)
    }

    /// 幽灵形心：关于面中点反射
    fn centroids_with_ghosts(mesh: &FlowMesh) -> Vec<DVec2> {
        let mut rc: Vec<DVec2> = (0..mesh.n_cells()).map(|c| mesh.cell_centroid(c)).collect();
        for b in 0..mesh.n_bfaces() {
            let (left, _) = mesh.face_cells(b);
            rc.push(2.0 * mesh.face_midpoint(b) - mesh.cell_centroid(left));
        }
        rc
    }

    #[test]
    fn test_constant_field_exact() {
        let mesh = rectangle(4, 3, 2.0, 1.5, RectangleMarkers::default()).unwrap();
        let rc = centroids_with_ghosts(&mesh);
        let (u, ug) = sample_field(&mesh, &rc, |_| 3.7);
        let mut grads = vec![[[0.0; NVARS]; 2]; mesh.n_cells()];
        GreenGaussGradient::new().compute_gradients(&mesh, &rc, &u, &ug, &mut grads);
        for grad in &grads {
            for dir in 0..2 {
                for var in 0..NVARS {
                    assert!(grad[dir][var].abs() < 1e-13);
                }
            }
        }
    }

    #[test]
    fn test_affine_field_exact_on_uniform_mesh() {
        // 均匀网格 + 中点反射幽灵：逆距离权重退化为算术平均，线性场精确
        let mesh = rectangle(5, 4, 1.0, 1.0, RectangleMarkers::default()).unwrap();
        let rc = centroids_with_ghosts(&mesh);
        let (u, ug) = sample_field(&mesh, &rc, |p| 1.5 + 2.0 * p.x - 0.7 * p.y);
        let mut grads = vec![[[0.0; NVARS]; 2]; mesh.n_cells()];
        GreenGaussGradient::new().compute_gradients(&mesh, &rc, &u, &ug, &mut grads);
        for (c, grad) in grads.iter().enumerate() {
            assert!((grad[0][0] - 2.0).abs() < 1e-12, "单元 {}: {:?}", c, grad);
            assert!((grad[1][0] + 0.7).abs() < 1e-12, "单元 {}: {:?}", c, grad);
        }
    }
}
