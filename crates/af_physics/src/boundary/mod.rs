// crates/af_physics/src/boundary/mod.rs

//! 边界条件族
//!
//! 每个边界条件把内部单元状态与面外法向映射为幽灵状态，并提供
//! 幽灵状态对内部状态的 Jacobian。注册表按边界标记查找对应实现，
//! 未声明的标记返回配置错误。
//!
//! 周期边界不经幽灵状态计算，由空间引擎按配对面复制内部状态；
//! 注册表中的周期条目仅作占位（复制发生在引擎的边界状态循环之后）。

mod conditions;
mod registry;

pub use conditions::{
    AdiabaticWallBc, ExtrapolationBc, FarfieldBc, InFlowBc, InOutFlowBc, IsothermalWallBc,
    PeriodicBc, SlipwallBc,
};
pub use registry::BoundaryRegistry;

use glam::DVec2;

use crate::state::{Cons, Jac};

/// 边界条件接口
pub trait FlowBoundary: Send + Sync {
    /// 条件名称
    fn name(&self) -> &'static str;

    /// 由内部状态与单位外法向计算幽灵状态
    fn ghost_state(&self, interior: &Cons, n: DVec2, ghost: &mut Cons);

    /// 计算幽灵状态及其对内部状态的 Jacobian
    ///
    /// `dghost[i][k] = ∂uG_i/∂uI_k`（赋值输出）。
    fn ghost_and_jacobian(&self, interior: &Cons, n: DVec2, ghost: &mut Cons, dghost: &mut Jac);
}

/// 面切向单位向量 (ny, -nx)
///
/// 与壁面切向速度、表面摩擦系数使用同一约定。
#[inline]
pub fn tangent(n: DVec2) -> DVec2 {
    DVec2::new(n.y, -n.x)
}
