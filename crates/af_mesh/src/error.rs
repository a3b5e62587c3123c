// crates/af_mesh/src/error.rs

//! 网格错误类型

use af_foundation::SolverError;
use thiserror::Error;

/// 网格构建与校验错误
#[derive(Debug, Error)]
pub enum MeshError {
    /// 索引越界
    #[error("索引越界: {what} 引用 {index}, 上界 {len}")]
    IndexOutOfBounds {
        /// 引用来源描述
        what: &'static str,
        /// 越界索引
        index: usize,
        /// 容器上界
        len: usize,
    },

    /// 退化几何
    #[error("退化几何: {message}")]
    DegenerateGeometry {
        /// 说明退化内容
        message: String,
    },

    /// 拓扑不一致
    #[error("拓扑不一致: {message}")]
    InconsistentTopology {
        /// 说明不一致内容
        message: String,
    },
}

impl From<MeshError> for SolverError {
    fn from(err: MeshError) -> Self {
        SolverError::mesh_inconsistent(err.to_string())
    }
}
