// crates/af_physics/src/numerics/gradient/mod.rs

//! 单元梯度格式族
//!
//! 给定单元中心值与边界幽灵值，计算逐单元的空间梯度。
//! 幽灵单元以虚拟形心参与（形心数组 `rc` 前 `n_cells` 项为真实单元，
//! 其后 `n_bfaces` 项为幽灵形心）。

mod green_gauss;
mod least_squares;

pub use green_gauss::GreenGaussGradient;
pub use least_squares::WeightedLeastSquaresGradient;

use af_config::GradientKind;
use af_mesh::FlowMesh;
use glam::DVec2;
use tracing::info;

use crate::state::{CellGradient, NVARS};

/// 梯度格式接口
pub trait GradientScheme: Send + Sync {
    /// 格式名称
    fn name(&self) -> &'static str;

    /// 计算逐单元梯度
    ///
    /// # 参数
    /// - `mesh`: 网格
    /// - `rc`: 真实 + 幽灵形心（长度 n_cells + n_bfaces）
    /// - `u`: 单元中心值（n_cells × NVARS）
    /// - `ug`: 幽灵值（n_bfaces × NVARS）
    /// - `grads`: 输出逐单元梯度
    fn compute_gradients(
        &self,
        mesh: &FlowMesh,
        rc: &[DVec2],
        u: &[f64],
        ug: &[f64],
        grads: &mut [CellGradient],
    );
}

/// 零梯度（一阶格式）
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroGradient;

impl GradientScheme for ZeroGradient {
    fn name(&self) -> &'static str {
        "Zero"
    }

    fn compute_gradients(
        &self,
        _mesh: &FlowMesh,
        _rc: &[DVec2],
        _u: &[f64],
        _ug: &[f64],
        grads: &mut [CellGradient],
    ) {
        for grad in grads.iter_mut() {
            *grad = [[0.0; NVARS]; 2];
        }
    }
}

/// 由配置枚举创建梯度格式
///
/// 最小二乘格式在此完成逐单元法方程矩阵的预计算。
pub fn create_gradient_scheme(
    kind: GradientKind,
    mesh: &FlowMesh,
    rc: &[DVec2],
) -> Box<dyn GradientScheme> {
    let scheme: Box<dyn GradientScheme> = match kind {
        GradientKind::None => Box::new(ZeroGradient),
        GradientKind::GreenGauss => Box::new(GreenGaussGradient::new()),
        GradientKind::LeastSquares => {
            Box::new(WeightedLeastSquaresGradient::new(mesh, rc))
        }
    };
    info!(scheme = scheme.name(), "选择梯度格式");
    scheme
}

/// 面对侧的取值：真实单元取 `u`，幽灵取 `ug`
#[inline]
pub(crate) fn neighbor_value(
    n_cells: usize,
    u: &[f64],
    ug: &[f64],
    neighbor: usize,
    var: usize,
) -> f64 {
    if neighbor < n_cells {
        u[neighbor * NVARS + var]
    } else {
        ug[(neighbor - n_cells) * NVARS + var]
    }
}
