// crates/af_mesh/src/lib.rs

//! aerofv 网格层
//!
//! 提供求解器消费的只读非结构网格结构 [`FlowMesh`]：
//! - 三角形/四边形混合线性单元
//! - 面基拓扑：面→左右单元、面→节点、单元→面
//! - 面度量（单位法向、长度）与单元度量（面积、形心）
//! - 边界标记与周期面配对
//!
//! 网格文件读取不在本 crate 范围内；[`generation`] 提供测试与算例
//! 使用的结构化矩形网格生成。
//!
//! # 约定
//!
//! - 面编号前 `n_bfaces` 个为边界面，其余为内部面
//! - 面法向由左单元指向右单元，边界面的右单元为虚拟幽灵编号
//!   `n_cells + 边界面序号`

pub mod error;
pub mod generation;
pub mod mesh;

pub use error::MeshError;
pub use mesh::{FlowMesh, RawFace};
