// crates/af_mesh/src/generation.rs

//! 结构化矩形网格生成
//!
//! 生成 `[0, lx] × [0, ly]` 上 `nx × ny` 的均匀四边形网格，
//! 四条边各带独立标记，可选 x/y 方向周期配对。
//! 主要供集成测试与验证算例使用。

use glam::DVec2;

use crate::error::MeshError;
use crate::mesh::{FlowMesh, RawFace};

/// 矩形四边的边界标记
#[derive(Debug, Clone, Copy)]
pub struct RectangleMarkers {
    /// 下边 (y = 0)
    pub south: i32,
    /// 右边 (x = lx)
    pub east: i32,
    /// 上边 (y = ly)
    pub north: i32,
    /// 左边 (x = 0)
    pub west: i32,
}

impl Default for RectangleMarkers {
    fn default() -> Self {
        Self {
            south: 1,
            east: 2,
            north: 3,
            west: 4,
        }
    }
}

/// 生成矩形网格
pub fn rectangle(
    nx: usize,
    ny: usize,
    lx: f64,
    ly: f64,
    markers: RectangleMarkers,
) -> Result<FlowMesh, MeshError> {
    rectangle_periodic(nx, ny, lx, ly, markers, false, false)
}

/// 生成矩形网格，可选周期方向
///
/// `periodic_x` 将左右两边逐行配对，`periodic_y` 将上下两边逐列配对。
/// 周期边仍携带各自的标记。
pub fn rectangle_periodic(
    nx: usize,
    ny: usize,
    lx: f64,
    ly: f64,
    markers: RectangleMarkers,
    periodic_x: bool,
    periodic_y: bool,
) -> Result<FlowMesh, MeshError> {
    if nx == 0 || ny == 0 {
        return Err(MeshError::InconsistentTopology {
            message: "矩形网格要求 nx, ny >= 1".to_string(),
        });
    }

    let dx = lx / nx as f64;
    let dy = ly / ny as f64;
    let node = |i: usize, j: usize| (j * (nx + 1) + i) as u32;
    let cell = |i: usize, j: usize| (j * nx + i) as u32;

    let mut node_coords = Vec::with_capacity((nx + 1) * (ny + 1));
    for j in 0..=ny {
        for i in 0..=nx {
            node_coords.push(DVec2::new(i as f64 * dx, j as f64 * dy));
        }
    }

    let mut cell_nodes = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            cell_nodes.push(vec![node(i, j), node(i + 1, j), node(i + 1, j + 1), node(i, j + 1)]);
        }
    }

    let mut faces = Vec::new();
    let mut west_faces = vec![0u32; ny];
    let mut east_faces = vec![0u32; ny];
    let mut south_faces = vec![0u32; nx];
    let mut north_faces = vec![0u32; nx];

    // 竖直面（沿 y 方向的边）
    for i in 0..=nx {
        for j in 0..ny {
            let nodes = [node(i, j), node(i, j + 1)];
            let idx = faces.len() as u32;
            if i == 0 {
                west_faces[j] = idx;
                faces.push(RawFace::boundary(cell(0, j), nodes, markers.west));
            } else if i == nx {
                east_faces[j] = idx;
                faces.push(RawFace::boundary(cell(nx - 1, j), nodes, markers.east));
            } else {
                faces.push(RawFace::interior(cell(i - 1, j), cell(i, j), nodes));
            }
        }
    }

    // 水平面（沿 x 方向的边）
    for j in 0..=ny {
        for i in 0..nx {
            let nodes = [node(i, j), node(i + 1, j)];
            let idx = faces.len() as u32;
            if j == 0 {
                south_faces[i] = idx;
                faces.push(RawFace::boundary(cell(i, 0), nodes, markers.south));
            } else if j == ny {
                north_faces[i] = idx;
                faces.push(RawFace::boundary(cell(i, ny - 1), nodes, markers.north));
            } else {
                faces.push(RawFace::interior(cell(i, j - 1), cell(i, j), nodes));
            }
        }
    }

    let mut periodic_pairs = Vec::new();
    if periodic_x {
        for j in 0..ny {
            periodic_pairs.push((west_faces[j], east_faces[j]));
        }
    }
    if periodic_y {
        for i in 0..nx {
            periodic_pairs.push((south_faces[i], north_faces[i]));
        }
    }

    FlowMesh::from_raw(node_coords, cell_nodes, faces, periodic_pairs)
}
