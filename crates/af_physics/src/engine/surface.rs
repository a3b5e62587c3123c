// crates/af_physics/src/engine/surface.rs

//! 壁面表面数据
//!
//! 给定收敛状态与守恒量梯度，在指定壁面标记上计算逐面
//! 压强系数 Cp = 2(p − p∞) 与摩擦系数 Cf = 2τ_w，并累计
//! 升力/压差阻力/摩擦阻力系数（按壁面总长归一）。
//! 壁面切向取 t = (ny, −nx)，速度梯度由守恒量梯度按商法则恢复。

use glam::DVec2;

use af_foundation::{SolverError, SolverResult};

use super::solver::FlowSolver;
use crate::state::{cons_at, CellGradient, NVARS};

/// 单个壁面面的采样
#[derive(Debug, Clone, Copy)]
pub struct SurfaceSample {
    /// 面中点坐标
    pub position: DVec2,
    /// 压强系数
    pub cp: f64,
    /// 摩擦系数
    pub cf: f64,
}

/// 壁面积分结果
#[derive(Debug, Clone)]
pub struct SurfaceData {
    /// 升力系数
    pub cl: f64,
    /// 压差阻力系数
    pub cdp: f64,
    /// 摩擦阻力系数
    pub cdf: f64,
    /// 逐面采样
    pub samples: Vec<SurfaceSample>,
}

impl<const SECOND_ORDER: bool, const CONST_VISC: bool> FlowSolver<SECOND_ORDER, CONST_VISC> {
    pub(crate) fn surface_data(
        &self,
        u: &[f64],
        grads: &[CellGradient],
        wall_marker: i32,
    ) -> SolverResult<SurfaceData> {
        let mesh = &*self.mesh;
        SolverError::check_size("state", mesh.n_cells() * NVARS, u.len())?;
        SolverError::check_size("gradients", mesh.n_cells(), grads.len())?;

        // 来流方向与其法向
        let flow_dir = DVec2::new(self.aoa.cos(), self.aoa.sin());
        let flow_normal = DVec2::new(-flow_dir.y, flow_dir.x);
        let pinf = self.gas.freestream_pressure();

        let mut samples = Vec::new();
        let mut total_len = 0.0;
        let mut cl = 0.0;
        let mut cdp = 0.0;
        let mut cdf = 0.0;

        for face in 0..mesh.n_bfaces() {
            if mesh.face_marker(face) != wall_marker {
                continue;
            }
            let (left, _) = mesh.face_cells(face);
            let normal = mesh.face_normal(face);
            let len = mesh.face_length(face);
            total_len += len;

            let state = cons_at(u, left);
            let cp = 2.0 * (self.gas.pressure(&state) - pinf);

            // 守恒量梯度 → 速度梯度（商法则）
            let rho = state[0];
            let grad = &grads[left];
            let mut gradv = [[0.0; 2]; 2];
            for comp in 0..2 {
                for dir in 0..2 {
                    gradv[comp][dir] = (grad[dir][comp + 1] * rho
                        - state[comp + 1] * grad[dir][0])
                        / (rho * rho);
                }
            }

            let muhat = self.gas.sutherland_viscosity(&state);
            let tau_w = muhat
                * ((2.0 * gradv[0][0] * normal.x + (gradv[0][1] + gradv[1][0]) * normal.y)
                    * normal.y
                    + ((gradv[1][0] + gradv[0][1]) * normal.x + 2.0 * gradv[1][1] * normal.y)
                        * (-normal.x));
            let cf = 2.0 * tau_w;

            samples.push(SurfaceSample {
                position: mesh.face_midpoint(face),
                cp,
                cf,
            });

            let ndotf = normal.dot(flow_dir);
            let ndotnf = normal.dot(flow_normal);
            let tdotf = normal.y * flow_dir.x - normal.x * flow_dir.y;

            cdp += cp * ndotf * len;
            cdf += cf * tdotf * len;
            cl += cp * ndotnf * len;
        }

        if samples.is_empty() {
            return Err(SolverError::config_invalid(format!(
                "壁面标记 {} 不存在对应边界面",
                wall_marker
            )));
        }

        Ok(SurfaceData {
            cl: cl / total_len,
            cdp: cdp / total_len,
            cdf: cdf / total_len,
            samples,
        })
    }
}
