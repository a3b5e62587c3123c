// crates/af_physics/src/numerics/atomic.rs

//! 浮点原子累加
//!
//! 并行面循环向共享单元累加通量时的比较-交换原语：
//! f64 以位形式存入 `AtomicU64`，compare-exchange 循环实现原子加。

use std::sync::atomic::{AtomicU64, Ordering};

/// 对以位形式存储的 f64 做原子加
#[inline]
pub fn atomic_add(slot: &AtomicU64, val: f64) {
    let mut old = slot.load(Ordering::Relaxed);
    loop {
        let new = (f64::from_bits(old) + val).to_bits();
        match slot.compare_exchange_weak(old, new, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => break,
            Err(x) => old = x,
        }
    }
}

/// 固定长度的原子 f64 数组
///
/// 装配期间作为共享累加器使用，循环结束后整体读出。
#[derive(Debug)]
pub struct AtomicF64Array {
    bits: Vec<AtomicU64>,
}

impl AtomicF64Array {
    /// 创建全零数组
    pub fn new(len: usize) -> Self {
        Self {
            bits: (0..len).map(|_| AtomicU64::new(0)).collect(),
        }
    }

    /// 元素数量
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// 全部清零
    pub fn reset(&self) {
        for slot in &self.bits {
            slot.store(0, Ordering::Relaxed);
        }
    }

    /// 原子累加
    #[inline]
    pub fn add(&self, index: usize, val: f64) {
        atomic_add(&self.bits[index], val);
    }

    /// 读取单个元素
    #[inline]
    pub fn get(&self, index: usize) -> f64 {
        f64::from_bits(self.bits[index].load(Ordering::Relaxed))
    }

    /// 整体写出到普通切片
    pub fn write_to(&self, out: &mut [f64]) {
        debug_assert_eq!(out.len(), self.bits.len());
        for (dst, slot) in out.iter_mut().zip(&self.bits) {
            *dst = f64::from_bits(slot.load(Ordering::Relaxed));
        }
    }
}
