// crates/af_config/src/error.rs

//! 配置错误类型

use af_foundation::SolverError;
use thiserror::Error;

/// 配置层错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 参数取值非法
    #[error("参数非法: {name} = {value}, {reason}")]
    InvalidValue {
        /// 参数名称
        name: &'static str,
        /// 实际取值
        value: String,
        /// 非法原因
        reason: &'static str,
    },

    /// 边界标记重复声明
    #[error("边界标记 {marker} 被重复声明")]
    DuplicateMarker {
        /// 重复的标记
        marker: i32,
    },

    /// 互斥选项同时启用
    #[error("互斥选项: {message}")]
    ConflictingOptions {
        /// 说明冲突内容
        message: String,
    },
}

impl From<ConfigError> for SolverError {
    fn from(err: ConfigError) -> Self {
        SolverError::config_invalid(err.to_string())
    }
}
