// crates/af_foundation/src/error.rs

//! 统一错误类型
//!
//! 定义求解器各层共享的错误分类：
//! - `ConfigInvalid`: 配置错误（未知格式名、未声明的边界标记、互斥选项）
//! - `NumericInvalid`: 中间量出现非有限值（NaN/Inf）
//! - `UnphysicalState`: 校验后的状态出现非正密度或压强
//! - `MeshInconsistent`: 网格拓扑或度量不自洽
//!
//! # 错误策略
//!
//! 所有错误直接上抛给调用方，内部不做重试。残差装配相对失败是原子的：
//! 要么完整结束且输出有定义，要么失败且输出内容未定义。

use thiserror::Error;

/// 统一结果类型别名
pub type SolverResult<T> = Result<T, SolverError>;

/// 求解器基础错误
#[derive(Debug, Error)]
pub enum SolverError {
    /// 配置错误
    #[error("配置无效: {message}")]
    ConfigInvalid {
        /// 说明无效原因
        message: String,
    },

    /// 数值错误：中间量非有限
    #[error("数值无效: {context} 出现非有限值")]
    NumericInvalid {
        /// 出错位置描述
        context: String,
    },

    /// 非物理状态：密度或压强非正
    #[error("非物理状态: 单元 {cell} 密度 {density:.6e}, 压强 {pressure:.6e}")]
    UnphysicalState {
        /// 出错单元索引
        cell: usize,
        /// 该单元密度
        density: f64,
        /// 该单元压强
        pressure: f64,
    },

    /// 网格不自洽
    #[error("网格不自洽: {message}")]
    MeshInconsistent {
        /// 说明不自洽原因
        message: String,
    },

    /// 数组大小不匹配
    #[error("数组大小不匹配: {name} 期望 {expected}, 实际 {actual}")]
    SizeMismatch {
        /// 数据名称
        name: &'static str,
        /// 期望大小
        expected: usize,
        /// 实际大小
        actual: usize,
    },
}

impl SolverError {
    /// 创建配置错误
    #[inline]
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            message: message.into(),
        }
    }

    /// 创建数值错误
    #[inline]
    pub fn numeric_invalid(context: impl Into<String>) -> Self {
        Self::NumericInvalid {
            context: context.into(),
        }
    }

    /// 创建非物理状态错误
    #[inline]
    pub fn unphysical(cell: usize, density: f64, pressure: f64) -> Self {
        Self::UnphysicalState {
            cell,
            density,
            pressure,
        }
    }

    /// 创建网格不自洽错误
    #[inline]
    pub fn mesh_inconsistent(message: impl Into<String>) -> Self {
        Self::MeshInconsistent {
            message: message.into(),
        }
    }

    /// 验证数组大小是否匹配
    #[inline]
    pub fn check_size(name: &'static str, expected: usize, actual: usize) -> SolverResult<()> {
        if expected != actual {
            Err(Self::SizeMismatch {
                name,
                expected,
                actual,
            })
        } else {
            Ok(())
        }
    }
}
