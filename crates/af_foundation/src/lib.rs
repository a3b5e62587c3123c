// crates/af_foundation/src/lib.rs

//! aerofv 基础层
//!
//! 提供整个工作区共享的底层设施：
//! - 统一错误类型 (error)
//! - 数值容差常量 (tolerance)
//!
//! 本 crate 不依赖工作区内其他 crate，可独立使用。

pub mod error;
pub mod tolerance;

pub use error::{SolverError, SolverResult};
pub use tolerance::{MACHINE_ZERO, SMALL_NUMBER};
