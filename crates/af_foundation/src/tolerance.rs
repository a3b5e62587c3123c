// crates/af_foundation/src/tolerance.rs

//! 数值容差常量
//!
//! 全工作区统一的浮点判零阈值，避免各模块散落魔法数字。

/// 机器零判定阈值（约为 f64 机器精度）
pub const MACHINE_ZERO: f64 = 2.2e-16;

/// 比多数收敛容差更小的小量，用于几何退化判定
pub const SMALL_NUMBER: f64 = 1e-12;

/// 判断两个浮点数在给定容差下是否相等
#[inline]
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}
