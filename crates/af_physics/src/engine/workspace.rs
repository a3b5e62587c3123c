// crates/af_physics/src/engine/workspace.rs

//! 残差装配工作区
//!
//! 一次残差/梯度调用所需的全部临时数组，由引擎在构建时分配、
//! 调用间复用；热循环内不发生任何分配。
//! 残差与谱半径累加器为原子数组，面循环并行写入后整体读出。

use af_mesh::FlowMesh;

use crate::numerics::atomic::AtomicF64Array;
use crate::state::{CellGradient, NVARS};

/// 残差装配工作区
#[derive(Debug)]
pub struct FlowWorkspace {
    /// 幽灵状态（n_bfaces × NVARS）
    pub ug: Vec<f64>,
    /// 面左状态（n_faces × NVARS）
    pub uleft: Vec<f64>,
    /// 面右状态（n_faces × NVARS）
    pub uright: Vec<f64>,
    /// 单元原始变量（n_cells × NVARS）
    pub up: Vec<f64>,
    /// 单元梯度
    pub grads: Vec<CellGradient>,
    /// 残差累加器（n_cells × NVARS）
    pub residual: AtomicF64Array,
    /// 谱半径积分累加器（n_cells）
    pub spectral: AtomicF64Array,
}

impl FlowWorkspace {
    /// 按网格尺寸分配工作区
    pub fn new(mesh: &FlowMesh) -> Self {
        let n_cells = mesh.n_cells();
        let n_faces = mesh.n_faces();
        let n_bfaces = mesh.n_bfaces();
        Self {
            ug: vec![0.0; n_bfaces * NVARS],
            uleft: vec![0.0; n_faces * NVARS],
            uright: vec![0.0; n_faces * NVARS],
            up: vec![0.0; n_cells * NVARS],
            grads: vec![[[0.0; NVARS]; 2]; n_cells],
            residual: AtomicF64Array::new(n_cells * NVARS),
            spectral: AtomicF64Array::new(n_cells),
        }
    }

    /// 清零累加器（面状态数组由各阶段整体覆盖，无需清零）
    pub fn reset(&self) {
        self.residual.reset();
        self.spectral.reset();
    }

    /// 工作区适配的单元数
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.spectral.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use af_mesh::generation::{rectangle, RectangleMarkers};

    #[test]
    fn test_sizes() {
        let mesh = rectangle(4, 3, 2.0, 1.5, RectangleMarkers::default()).unwrap();
        let ws = FlowWorkspace::new(&mesh);
        assert_eq!(ws.n_cells(), 12);
        assert_eq!(ws.ug.len(), mesh.n_bfaces() * NVARS);
        assert_eq!(ws.uleft.len(), mesh.n_faces() * NVARS);
        assert_eq!(ws.grads.len(), 12);
        assert_eq!(ws.residual.len(), 48);
    }

    #[test]
    fn test_reset_clears_accumulators() {
        let mesh = rectangle(2, 2, 1.0, 1.0, RectangleMarkers::default()).unwrap();
        let ws = FlowWorkspace::new(&mesh);
        ws.residual.add(0, 1.0);
        ws.spectral.add(1, 2.0);
        ws.reset();
        assert_eq!(ws.residual.get(0), 0.0);
        assert_eq!(ws.spectral.get(1), 0.0);
    }
}
