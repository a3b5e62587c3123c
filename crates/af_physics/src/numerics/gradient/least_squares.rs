// crates/af_physics/src/numerics/gradient/least_squares.rs

//! 加权最小二乘梯度
//!
//! 对每个单元，以面邻居（含幽灵）求解超定系统
//! { w_k (r_k − r_c)ᵀ g = w_k (φ_k − φ_c) }，权重 w_k = 1/|r_k − r_c|。
//! 2×2 法方程矩阵在构建时逐单元求逆缓存，每次调用只组装右端并作
//! 矩阵-向量乘。线性场逐单元精确。

use af_foundation::SMALL_NUMBER;
use af_mesh::FlowMesh;
use glam::DVec2;
use rayon::prelude::*;

use super::{neighbor_value, GradientScheme};
use crate::state::{CellGradient, NVARS};

/// 逐单元缓存的对称 2×2 逆矩阵 (inv11, inv12, inv22)
type InverseEntry = [f64; 3];

/// 加权最小二乘梯度
#[derive(Debug, Clone)]
pub struct WeightedLeastSquaresGradient {
    /// 逐单元法方程逆矩阵
    inverses: Vec<InverseEntry>,
}

impl WeightedLeastSquaresGradient {
    /// 构建并预计算逐单元法方程逆矩阵
    ///
    /// 法方程退化的单元（邻居共线）缓存零矩阵，梯度退化为零。
    pub fn new(mesh: &FlowMesh, rc: &[DVec2]) -> Self {
        let n_cells = mesh.n_cells();
        let mut inverses = vec![[0.0; 3]; n_cells];

        for cell in 0..n_cells {
            let mut a11 = 0.0;
            let mut a12 = 0.0;
            let mut a22 = 0.0;
            for face in mesh.cell_faces(cell) {
                let other = Self::other_side(mesh, face, cell);
                let dr = rc[other] - rc[cell];
                let w2 = 1.0 / dr.length_squared();
                a11 += w2 * dr.x * dr.x;
                a12 += w2 * dr.x * dr.y;
                a22 += w2 * dr.y * dr.y;
            }
            let det = a11 * a22 - a12 * a12;
            if det.abs() > SMALL_NUMBER {
                let inv = 1.0 / det;
                inverses[cell] = [a22 * inv, -a12 * inv, a11 * inv];
            }
        }

        Self { inverses }
    }

    #[inline]
    fn other_side(mesh: &FlowMesh, face: usize, cell: usize) -> usize {
        let (left, right) = mesh.face_cells(face);
        if left == cell {
            right
        } else {
            left
        }
    }
}

impl GradientScheme for WeightedLeastSquaresGradient {
    fn name(&self) -> &'static str {
        "WeightedLeastSquares"
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
                let mut b1 = [0.0; NVARS];
                let mut b2 = [0.0; NVARS];

                for face in mesh.cell_faces(cell) {
                    let other = Self::other_side(mesh, face, cell);
                    let dr = rc[other] - rc[cell];
                    let w2 = 1.0 / dr.length_squared();
                    for var in 0..NVARS {
                        let dphi =
                            neighbor_value(n_cells, u, ug, other, var) - u[cell * NVARS + var];
                        b1[var] += w2 * dr.x * dphi;
                        b2[var] += w2 * dr.y * dphi;
                    }
                }

                let [inv11, inv12, inv22] = self.inverses[cell];
                for var in 0..NVARS {
                    grad[0][var] = inv11 * b1[var] + inv12 * b2[var];
                    grad[1][var] = inv12 * b1[var] + inv22 * b2[var];
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use af_mesh::generation::{rectangle, RectangleMarkers};
    use af_mesh::RawFace;

    fn centroids_with_ghosts(mesh: &FlowMesh) -> Vec<DVec2> {
        let mut rc: Vec<DVec2> = (0..mesh.n_cells()).map(|c| mesh.cell_centroid(c)).collect();
        for b in 0..mesh.n_bfaces() {
            let (left, _) = mesh.face_cells(b);
            rc.push(2.0 * mesh.face_midpoint(b) - mesh.cell_centroid(left));
        }
        rc
    }

    fn sample_affine(
        mesh: &FlowMesh,
        rc: &[DVec2],
        a: f64,
        bx: f64,
        by: f64,
    ) -> (Vec<f64>, Vec<f64>) {
        let f = |p: DVec2| a + bx * p.x + by * p.y;
        let mut u = vec![0.0; mesh.n_cells() * NVARS];
        let mut ug = vec![0.0; mesh.n_bfaces() * NVARS];
        for c in 0..mesh.n_cells() {
            for var in 0..NVARS {
                u[c * NVARS + var] = f(rc[c]) * (var + 1) as f64;
            }
        }
        for b in 0..mesh.n_bfaces() {
            for var in 0..NVARS {
                ug[b * NVARS + var] = f(rc[mesh.n_cells() + b]) * (var + 1) as f64;
            }
        }
        (u, ug)
    }

    #[test]
    fn test_affine_exactness_quads() {
        let mesh = rectangle(4, 3, 2.0, 1.5, RectangleMarkers::default()).unwrap();
        let rc = centroids_with_ghosts(&mesh);
        let scheme = WeightedLeastSquaresGradient::new(&mesh, &rc);

        let (bx, by) = (2.0, -0.7);
        let (u, ug) = sample_affine(&mesh, &rc, 1.5, bx, by);
        let mut grads = vec![[[0.0; NVARS]; 2]; mesh.n_cells()];
        scheme.compute_gradients(&mesh, &rc, &u, &ug, &mut grads);

        for (c, grad) in grads.iter().enumerate() {
            for var in 0..NVARS {
                let scale = (var + 1) as f64;
                assert!(
                    (grad[0][var] - bx * scale).abs() < 1e-11,
                    "单元 {} 变量 {}: {:?}",
                    c,
                    var,
                    grad
                );
                assert!((grad[1][var] - by * scale).abs() < 1e-11);
            }
        }
    }

    #[test]
    fn test_affine_exactness_triangles() {
        // 两个三角形拼成的正方形
        let nodes = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(0.0, 1.0),
        ];
        let cells = vec![vec![0, 1, 2], vec![0, 2, 3]];
        let faces = vec![
            RawFace::interior(0, 1, [0, 2]),
            RawFace::boundary(0, [0, 1], 1),
            RawFace::boundary(0, [1, 2], 1),
            RawFace::boundary(1, [2, 3], 1),
            RawFace::boundary(1, [3, 0], 1),
        ];
        let mesh = FlowMesh::from_raw(nodes, cells, faces, vec![]).unwrap();
        let rc = centroids_with_ghosts(&mesh);
        let scheme = WeightedLeastSquaresGradient::new(&mesh, &rc);

        let (u, ug) = sample_affine(&mesh, &rc, 0.3, 1.2, 0.8);
        let mut grads = vec![[[0.0; NVARS]; 2]; mesh.n_cells()];
        scheme.compute_gradients(&mesh, &rc, &u, &ug, &mut grads);
        for grad in &grads {
            assert!((grad[0][0] - 1.2).abs() < 1e-11);
            assert!((grad[1][0] - 0.8).abs() < 1e-11);
        }
    }

    #[test]
    fn test_constant_field_zero_gradient() {
        let mesh = rectangle(3, 3, 1.0, 1.0, RectangleMarkers::default()).unwrap();
        let rc = centroids_with_ghosts(&mesh);
        let scheme = WeightedLeastSquaresGradient::new(&mesh, &rc);
        let (u, ug) = sample_affine(&mesh, &rc, 5.0, 0.0, 0.0);
        let mut grads = vec![[[0.0; NVARS]; 2]; mesh.n_cells()];
        scheme.compute_gradients(&mesh, &rc, &u, &ug, &mut grads);
        for grad in &grads {
            for dir in 0..2 {
                for var in 0..NVARS {
                    assert!(grad[dir][var].abs() < 1e-12);
                }
            }
        }
    }
}
