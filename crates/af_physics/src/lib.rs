// crates/af_physics/src/lib.rs

//! aerofv 物理层
//!
//! 二维可压缩 Euler / Navier-Stokes 方程的格心有限体积空间离散：
//! - 气体模型 (gas)：理想气体热力学与输运、转换 Jacobian、来流状态
//! - 无黏通量族 (schemes::riemann)：LLF / Van Leer / AUSM / AUSM+ /
//!   Roe / HLL / HLLC，含解析通量 Jacobian
//! - 边界条件族 (boundary)：幽灵状态及其 Jacobian、标记注册表
//! - 梯度与重构 (numerics)：Green-Gauss / 加权最小二乘梯度，
//!   无限制 / MUSCL-Van Albada / Barth-Jespersen / Venkatakrishnan /
//!   WENO 重构；块稀疏 Jacobian 后端
//! - 空间引擎 (engine)：残差与 Jacobian 装配、伪时间步估计、
//!   壁面表面数据
//!
//! 伪时间外层迭代、线性求解与网格读取由上层消费方提供。

pub mod boundary;
pub mod builder;
pub mod engine;
pub mod gas;
pub mod numerics;
pub mod schemes;
pub mod state;

// 常用类型重导出
pub use boundary::{BoundaryRegistry, FlowBoundary};
pub use builder::build_flow_solver;
pub use engine::{FlowSolver, FlowWorkspace, SpatialDiscretization, SurfaceData, SurfaceSample};
pub use gas::IdealGasModel;
pub use numerics::block::Block4;
pub use numerics::bsr::{BsrMatrix, BsrPattern, JacobianMatrix};
pub use numerics::gradient::{
    create_gradient_scheme, GradientScheme, GreenGaussGradient, WeightedLeastSquaresGradient,
    ZeroGradient,
};
pub use numerics::reconstruction::{create_reconstruction, SolutionReconstruction};
pub use schemes::riemann::{create_riemann_scheme, RiemannScheme};
pub use state::{CellGradient, Cons, Jac, NDIM, NVARS};
