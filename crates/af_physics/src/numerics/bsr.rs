// crates/af_physics/src/numerics/bsr.rs

//! 块稀疏行（BSR）矩阵
//!
//! Jacobian 装配的后端：4×4 块按 BSR 布局存储，稀疏模式在构建时
//! 由网格面邻接确定（对角块 ∪ 面邻接块）。并发写入通过逐标量的
//! 比较-交换原子加串行化，满足装配循环对"块级原子加"的要求。

use std::sync::atomic::{AtomicU64, Ordering};

use af_mesh::FlowMesh;

use super::atomic::atomic_add;
use super::block::Block4;
use crate::state::NVARS;

/// 每块标量数
const BLOCK_LEN: usize = NVARS * NVARS;

/// 抽象块矩阵接口
///
/// 空间引擎只依赖本接口："向 (i, j) 块累加"。任何提供块级原子加的
/// 压缩稀疏块格式均可作为后端接入。
pub trait JacobianMatrix: Sync {
    /// 块行数
    fn n_block_rows(&self) -> usize;

    /// 向 (row, col) 块原子累加
    ///
    /// 块必须位于稀疏模式内，否则 panic（模式由网格邻接预先确定，
    /// 装配只会访问模式内的块）。
    fn add_block(&self, row: usize, col: usize, block: &Block4);

    /// 全部清零（保留模式）
    fn clear(&self);
}

/// BSR 稀疏模式
#[derive(Debug, Clone)]
pub struct BsrPattern {
    n_brows: usize,
    brow_ptr: Vec<usize>,
    bcol_idx: Vec<usize>,
}

impl BsrPattern {
    /// 由网格面邻接构建：每行含对角块与所有面邻接块
    pub fn from_mesh(mesh: &FlowMesh) -> Self {
        let n = mesh.n_cells();
        let mut columns: Vec<Vec<usize>> = (0..n).map(|c| vec![c]).collect();
        for face in mesh.n_bfaces()..mesh.n_faces() {
            let (l, r) = mesh.face_cells(face);
            columns[l].push(r);
            columns[r].push(l);
        }

        let mut brow_ptr = Vec::with_capacity(n + 1);
        let mut bcol_idx = Vec::new();
        brow_ptr.push(0);
        for cols in &mut columns {
            cols.sort_unstable();
            cols.dedup();
            bcol_idx.extend_from_slice(cols);
            brow_ptr.push(bcol_idx.len());
        }

        Self {
            n_brows: n,
            brow_ptr,
            bcol_idx,
        }
    }

    /// 块行数
    #[inline]
    pub fn n_brows(&self) -> usize {
        self.n_brows
    }

    /// 非零块数
    #[inline]
    pub fn nnzb(&self) -> usize {
        self.bcol_idx.len()
    }

    /// 查找 (row, col) 块的序号
    ///
    /// 列索引有序，二分查找。
    pub fn find_block(&self, row: usize, col: usize) -> Option<usize> {
        let start = self.brow_ptr[row];
        let end = self.brow_ptr[row + 1];
        self.bcol_idx[start..end]
            .binary_search(&col)
            .ok()
            .map(|local| start + local)
    }
}

/// BSR 块稀疏矩阵
///
/// 值以位形式存于 `AtomicU64`，写入走原子加，读出转回 f64。
#[derive(Debug)]
pub struct BsrMatrix {
    pattern: BsrPattern,
    values: Vec<AtomicU64>,
}

impl BsrMatrix {
    /// 由网格邻接创建全零矩阵
    pub fn from_mesh(mesh: &FlowMesh) -> Self {
        Self::from_pattern(BsrPattern::from_mesh(mesh))
    }

    /// 由既有模式创建全零矩阵
    pub fn from_pattern(pattern: BsrPattern) -> Self {
        let nnzb = pattern.nnzb();
        Self {
            pattern,
            values: (0..nnzb * BLOCK_LEN).map(|_| AtomicU64::new(0)).collect(),
        }
    }

    /// 稀疏模式引用
    #[inline]
    pub fn pattern(&self) -> &BsrPattern {
        &self.pattern
    }

    /// 读取 (row, col) 块；模式外返回 None
    pub fn block(&self, row: usize, col: usize) -> Option<Block4> {
        let idx = self.pattern.find_block(row, col)?;
        let base = idx * BLOCK_LEN;
        let mut out = Block4::zero();
        for i in 0..NVARS {
            for j in 0..NVARS {
                out.data[i][j] =
                    f64::from_bits(self.values[base + i * NVARS + j].load(Ordering::Relaxed));
            }
        }
        Some(out)
    }

    /// 块稀疏矩阵-向量乘 y = A·x
    ///
    /// x, y 按单元块布局（长度 = 块行数 × 4）。
    pub fn mul_vec(&self, x: &[f64], y: &mut [f64]) {
        assert_eq!(x.len(), self.pattern.n_brows * NVARS);
        assert_eq!(y.len(), self.pattern.n_brows * NVARS);

        for row in 0..self.pattern.n_brows {
            let mut sum = [0.0; NVARS];
            for idx in self.pattern.brow_ptr[row]..self.pattern.brow_ptr[row + 1] {
                let col = self.pattern.bcol_idx[idx];
                let base = idx * BLOCK_LEN;
                for i in 0..NVARS {
                    for j in 0..NVARS {
                        sum[i] += f64::from_bits(
                            self.values[base + i * NVARS + j].load(Ordering::Relaxed),
                        ) * x[col * NVARS + j];
                    }
                }
            }
            y[row * NVARS..(row + 1) * NVARS].copy_from_slice(&sum);
        }
    }
}

impl JacobianMatrix for BsrMatrix {
    #[inline]
    fn n_block_rows(&self) -> usize {
        self.pattern.n_brows
    }

    fn add_block(&self, row: usize, col: usize, block: &Block4) {
        let idx = self
            .pattern
            .find_block(row, col)
            .unwrap_or_else(|| panic!("块 ({}, {}) 不在稀疏模式内", row, col));
        let base = idx * BLOCK_LEN;
        for i in 0..NVARS {
            for j in 0..NVARS {
                atomic_add(&self.values[base + i * NVARS + j], block.data[i][j]);
            }
        }
    }

    fn clear(&self) {
        for slot in &self.values {
            slot.store(0, Ordering::Relaxed);
        }
    }
}
