// crates/af_physics/src/engine/mod.rs

//! 空间离散引擎
//!
//! - solver: 残差与 Jacobian 装配、时间步估计
//! - viscous: 黏性面通量与薄层 Jacobian
//! - surface: 壁面表面数据
//! - workspace: 调用间复用的装配工作区

mod solver;
mod surface;
mod viscous;
mod workspace;

pub use solver::{FlowSolver, SpatialDiscretization};
pub use surface::{SurfaceData, SurfaceSample};
pub use workspace::FlowWorkspace;
