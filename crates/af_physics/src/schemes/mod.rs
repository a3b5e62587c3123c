// crates/af_physics/src/schemes/mod.rs

//! 数值格式
//!
//! 目前仅含无黏 Riemann 通量族 (riemann)。

pub mod riemann;

pub use riemann::{create_riemann_scheme, RiemannScheme};
