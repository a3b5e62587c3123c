// crates/af_physics/src/numerics/reconstruction/mod.rs

//! 面值重构 / 限制器族
//!
//! 由单元值、幽灵值与单元梯度生成每个面的左右状态（原始变量）。
//! 所有格式按面并行写出：左值由左单元重构，内部面的右值由右单元
//! 重构；边界面的右值留给引擎的边界状态覆盖。
//!
//! 限制器（Barth-Jespersen、Venkatakrishnan）与 WENO 在面循环内按需
//! 重算所属单元的限制因子 / 混合梯度，不修改传入的梯度数组——
//! 黏性通量仍使用未限制梯度。

mod barth_jespersen;
mod linear;
mod muscl;
mod venkatakrishnan;
mod weno;

pub use barth_jespersen::BarthJespersenReconstruction;
pub use linear::LinearReconstruction;
pub use muscl::MusclVanAlbadaReconstruction;
pub use venkatakrishnan::VenkatakrishnanReconstruction;
pub use weno::WenoReconstruction;

use af_config::LimiterKind;
use af_mesh::FlowMesh;
use glam::DVec2;
use tracing::info;

use super::gradient::neighbor_value;
use crate::state::{CellGradient, Cons, NVARS};

/// 面值重构接口
pub trait SolutionReconstruction: Send + Sync {
    /// 格式名称
    fn name(&self) -> &'static str;

    /// 计算全部面的左右状态
    ///
    /// # 参数
    /// - `mesh`: 网格
    /// - `rc`: 真实 + 幽灵形心
    /// - `gauss`: 逐面 Gauss 点
    /// - `u`: 单元中心值（原始变量）
    /// - `ug`: 幽灵值（原始变量）
    /// - `grads`: 逐单元梯度（只读）
    /// - `uleft`, `uright`: 输出面左右状态；边界面的右值不写
    #[allow(clippy::too_many_arguments)]
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
    );
}

/// 由配置枚举创建重构格式
///
/// `limiter_param` 为 Venkatakrishnan 的 K 或 WENO 的中心权重。
pub fn create_reconstruction(
    kind: LimiterKind,
    limiter_param: f64,
) -> Box<dyn SolutionReconstruction> {
    let scheme: Box<dyn SolutionReconstruction> = match kind {
        LimiterKind::None => Box::new(LinearReconstruction),
        LimiterKind::VanAlbada => Box::new(MusclVanAlbadaReconstruction),
        LimiterKind::BarthJespersen => Box::new(BarthJespersenReconstruction),
        LimiterKind::Venkatakrishnan => {
            Box::new(VenkatakrishnanReconstruction::new(limiter_param))
        }
        LimiterKind::Weno => Box::new(WenoReconstruction::new(limiter_param)),
    };
    info!(scheme = scheme.name(), "选择重构格式");
    scheme
}

/// 单元值在给定点的线性外推
#[inline]
pub(crate) fn extrapolate(
    u: &[f64],
    grads: &[CellGradient],
    rc: &[DVec2],
    cell: usize,
    point: DVec2,
) -> Cons {
    let dr = point - rc[cell];
    let grad = &grads[cell];
    let mut out = [0.0; NVARS];
    for var in 0..NVARS {
        out[var] = u[cell * NVARS + var] + grad[0][var] * dr.x + grad[1][var] * dr.y;
    }
    out
}

/// 单元面邻居（含幽灵）值的逐分量极值
pub(crate) fn neighbor_extrema(
    mesh: &FlowMesh,
    u: &[f64],
    ug: &[f64],
    cell: usize,
) -> (Cons, Cons) {
    let n_cells = mesh.n_cells();
    let mut umin = [f64::INFINITY; NVARS];
    let mut umax = [f64::NEG_INFINITY; NVARS];
    for var in 0..NVARS {
        let own = u[cell * NVARS + var];
        umin[var] = own;
        umax[var] = own;
    }
    for face in mesh.cell_faces(cell) {
        let (left, right) = mesh.face_cells(face);
        let other = if left == cell { right } else { left };
        for var in 0..NVARS {
            let val = neighbor_value(n_cells, u, ug, other, var);
            umin[var] = umin[var].min(val);
            umax[var] = umax[var].max(val);
        }
    }
    (umin, umax)
}
