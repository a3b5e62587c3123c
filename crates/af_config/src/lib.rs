// crates/af_config/src/lib.rs

//! aerofv 配置层
//!
//! 定义求解器的全部可识别配置项，使用 serde 支持 JSON 配置文件：
//! - 物理参数（流动类型、γ、来流 Mach/Reynolds/温度、攻角）
//! - 数值格式选择（无黏通量、梯度、限制器、二阶开关）
//! - 逐边界的边界条件记录（标记 + 类型 + 数值参数）
//!
//! 所有配置在构建求解器前经过 [`SolverConfig::validate`] 校验，
//! 无法识别或互斥的选项返回配置错误。

pub mod error;
pub mod solver_config;

pub use error::ConfigError;
pub use solver_config::{
    BoundaryKind, BoundarySpec, FlowKind, GradientKind, InviscidFluxKind, LimiterKind,
    NumericsSettings, PhysicsSettings, SolverConfig, ViscousJacobianKind,
};
