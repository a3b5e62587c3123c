// crates/af_mesh/src/mesh.rs

//! 冻结网格结构
//!
//! [`FlowMesh`] 以 SoA 布局保存拓扑与度量，构建后不可变。
//! 构建时由节点坐标和拓扑计算全部度量，并做一致性校验：
//! - 面长度为正（拒绝零长度面）
//! - 单元面积为正
//! - 周期配对对合：pmap(pmap(f)) == f
//! - 所有索引在界内

use glam::DVec2;

use crate::error::MeshError;

/// 无效索引哨兵
const INVALID: u32 = u32::MAX;

/// 构建输入的原始面描述
///
/// `right` 为 `None` 表示边界面，此时必须给出 `marker`。
#[derive(Debug, Clone)]
pub struct RawFace {
    /// 左单元
    pub left: u32,
    /// 右单元（内部面）
    pub right: Option<u32>,
    /// 面的两个端点
    pub nodes: [u32; 2],
    /// 边界标记（仅边界面）
    pub marker: Option<i32>,
}

impl RawFace {
    /// 内部面
    pub fn interior(left: u32, right: u32, nodes: [u32; 2]) -> Self {
        Self {
            left,
            right: Some(right),
            nodes,
            marker: None,
        }
    }

    /// 边界面
    pub fn boundary(left: u32, nodes: [u32; 2], marker: i32) -> Self {
        Self {
            left,
            right: None,
            nodes,
            marker: Some(marker),
        }
    }
}

/// 只读非结构网格
///
/// 面编号约定：`0..n_bfaces` 为边界面，其余为内部面。
/// 边界面的右单元为虚拟幽灵编号 `n_cells + 边界面序号`。
#[derive(Debug, Clone)]
pub struct FlowMesh {
    n_cells: usize,
    n_faces: usize,
    n_bfaces: usize,

    node_coords: Vec<DVec2>,

    cell_node_offsets: Vec<u32>,
    cell_node_indices: Vec<u32>,
    cell_face_offsets: Vec<u32>,
    cell_face_indices: Vec<u32>,
    cell_area: Vec<f64>,
    cell_centroid: Vec<DVec2>,

    face_left: Vec<u32>,
    face_right: Vec<u32>,
    face_nodes: Vec<[u32; 2]>,
    face_normal: Vec<DVec2>,
    face_length: Vec<f64>,

    /// 逐边界面的标记
    face_marker: Vec<i32>,
    /// 逐边界面的周期配对（INVALID 表示无配对）
    periodic_map: Vec<u32>,
}

impl FlowMesh {
    /// 从节点坐标与拓扑构建网格
    ///
    /// 面可以以任意顺序给出，构建时边界面被移到前部。
    /// `periodic_pairs` 中的面索引按 `faces` 的输入顺序解释。
    ///
    /// # 参数
    /// - `node_coords`: 节点坐标
    /// - `cell_nodes`: 逐单元节点列表（每个 3 或 4 个，逆时针）
    /// - `faces`: 面列表
    /// - `periodic_pairs`: 周期面对（输入顺序的面索引）
    pub fn from_raw(
        node_coords: Vec<DVec2>,
        cell_nodes: Vec<Vec<u32>>,
        faces: Vec<RawFace>,
        periodic_pairs: Vec<(u32, u32)>,
    ) -> Result<Self, MeshError> {
        let n_cells = cell_nodes.len();
        let n_nodes = node_coords.len();

        for (c, nodes) in cell_nodes.iter().enumerate() {
            if nodes.len() != 3 && nodes.len() != 4 {
                return Err(MeshError::InconsistentTopology {
                    message: format!("单元 {} 有 {} 个节点, 仅支持 3 或 4", c, nodes.len()),
                });
            }
            for &n in nodes {
                if n as usize >= n_nodes {
                    return Err(MeshError::IndexOutOfBounds {
                        what: "cell_nodes",
                        index: n as usize,
                        len: n_nodes,
                    });
                }
            }
        }

        // 边界面前置排序并记录输入顺序 → 新顺序映射
        let mut order: Vec<usize> = (0..faces.len()).collect();
        order.sort_by_key(|&i| faces[i].right.is_some());
        let mut new_index = vec![0u32; faces.len()];
        for (new, &old) in order.iter().enumerate() {
            new_index[old] = new as u32;
        }

        let n_faces = faces.len();
        let n_bfaces = faces.iter().filter(|f| f.right.is_none()).count();

        // 单元度量
        let mut cell_area = vec![0.0; n_cells];
        let mut cell_centroid = vec![DVec2::ZERO; n_cells];
        for c in 0..n_cells {
            let nodes = &cell_nodes[c];
            let mut area2 = 0.0;
            let mut centroid = DVec2::ZERO;
            for k in 0..nodes.len() {
                let p = node_coords[nodes[k] as usize];
                let q = node_coords[nodes[(k + 1) % nodes.len()] as usize];
                area2 += p.x * q.y - q.x * p.y;
                centroid += p;
            }
            let area = 0.5 * area2;
            if area <= 0.0 {
                return Err(MeshError::DegenerateGeometry {
                    message: format!("单元 {} 面积非正 ({:.3e}), 节点需逆时针排列", c, area),
                });
            }
            cell_area[c] = area;
            cell_centroid[c] = centroid / nodes.len() as f64;
        }

        // 面数组（新顺序）
        let mut face_left = vec![0u32; n_faces];
        let mut face_right = vec![0u32; n_faces];
        let mut face_nodes = vec![[0u32; 2]; n_faces];
        let mut face_normal = vec![DVec2::ZERO; n_faces];
        let mut face_length = vec![0.0; n_faces];
        let mut face_marker = vec![0i32; n_bfaces];

        for (old, face) in faces.iter().enumerate() {
            let new = new_index[old] as usize;
            if face.left as usize >= n_cells {
                return Err(MeshError::IndexOutOfBounds {
                    what: "face.left",
                    index: face.left as usize,
                    len: n_cells,
                });
            }
            for &n in &face.nodes {
                if n as usize >= n_nodes {
                    return Err(MeshError::IndexOutOfBounds {
                        what: "face.nodes",
                        index: n as usize,
                        len: n_nodes,
                    });
                }
            }

            let p1 = node_coords[face.nodes[0] as usize];
            let p2 = node_coords[face.nodes[1] as usize];
            let edge = p2 - p1;
            let len = edge.length();
            if len <= 0.0 {
                return Err(MeshError::DegenerateGeometry {
                    message: format!("面 ({},{}) 长度为零", face.nodes[0], face.nodes[1]),
                });
            }
            // 候选法向，调整为由左单元指向外
            let mut normal = DVec2::new(edge.y, -edge.x) / len;
            let midpoint = 0.5 * (p1 + p2);
            if normal.dot(midpoint - cell_centroid[face.left as usize]) < 0.0 {
                normal = -normal;
            }

            face_left[new] = face.left;
            face_nodes[new] = face.nodes;
            face_normal[new] = normal;
            face_length[new] = len;

            match face.right {
                Some(right) => {
                    if right as usize >= n_cells {
                        return Err(MeshError::IndexOutOfBounds {
                            what: "face.right",
                            index: right as usize,
                            len: n_cells,
                        });
                    }
                    face_right[new] = right;
                }
                None => {
                    let marker = face.marker.ok_or_else(|| MeshError::InconsistentTopology {
                        message: format!("边界面 ({},{}) 缺少标记", face.nodes[0], face.nodes[1]),
                    })?;
                    face_right[new] = (n_cells + new) as u32;
                    face_marker[new] = marker;
                }
            }
        }

        // 周期配对（换算到新编号）
        let mut periodic_map = vec![INVALID; n_bfaces];
        for &(a, b) in &periodic_pairs {
            if a as usize >= n_faces || b as usize >= n_faces {
                return Err(MeshError::IndexOutOfBounds {
                    what: "periodic_pairs",
                    index: a.max(b) as usize,
                    len: n_faces,
                });
            }
            let na = new_index[a as usize] as usize;
            let nb = new_index[b as usize] as usize;
            if na >= n_bfaces || nb >= n_bfaces {
                return Err(MeshError::InconsistentTopology {
                    message: "周期配对只能作用于边界面".to_string(),
                });
            }
            periodic_map[na] = nb as u32;
            periodic_map[nb] = na as u32;
        }
        for (f, &p) in periodic_map.iter().enumerate() {
            if p != INVALID && periodic_map[p as usize] != f as u32 {
                return Err(MeshError::InconsistentTopology {
                    message: format!("周期配对不对合: {} -> {}", f, p),
                });
            }
        }

        // 单元→面关联
        let mut counts = vec![0u32; n_cells];
        for f in 0..n_faces {
            counts[face_left[f] as usize] += 1;
            let r = face_right[f] as usize;
            if r < n_cells {
                counts[r] += 1;
            }
        }
        let mut cell_face_offsets = vec![0u32; n_cells + 1];
        for c in 0..n_cells {
            cell_face_offsets[c + 1] = cell_face_offsets[c] + counts[c];
        }
        let mut cell_face_indices = vec![0u32; cell_face_offsets[n_cells] as usize];
        let mut cursor = cell_face_offsets.clone();
        for f in 0..n_faces {
            let l = face_left[f] as usize;
            cell_face_indices[cursor[l] as usize] = f as u32;
            cursor[l] += 1;
            let r = face_right[f] as usize;
            if r < n_cells {
                cell_face_indices[cursor[r] as usize] = f as u32;
                cursor[r] += 1;
            }
        }

        // 单元→节点扁平化
        let mut cell_node_offsets = vec![0u32; n_cells + 1];
        for c in 0..n_cells {
            cell_node_offsets[c + 1] = cell_node_offsets[c] + cell_nodes[c].len() as u32;
        }
        let mut cell_node_indices = Vec::with_capacity(cell_node_offsets[n_cells] as usize);
        for nodes in &cell_nodes {
            cell_node_indices.extend_from_slice(nodes);
        }

        Ok(Self {
            n_cells,
            n_faces,
            n_bfaces,
            node_coords,
            cell_node_offsets,
            cell_node_indices,
            cell_face_offsets,
            cell_face_indices,
            cell_area,
            cell_centroid,
            face_left,
            face_right,
            face_nodes,
            face_normal,
            face_length,
            face_marker,
            periodic_map,
        })
    }

    // ============================================================
    // 计数
    // ============================================================

    /// 单元数量
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.n_cells
    }

    /// 面数量（含边界面）
    #[inline]
    pub fn n_faces(&self) -> usize {
        self.n_faces
    }

    /// 边界面数量
    #[inline]
    pub fn n_bfaces(&self) -> usize {
        self.n_bfaces
    }

    /// 节点数量
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.node_coords.len()
    }

    // ============================================================
    // 拓扑
    // ============================================================

    /// 面的左右单元
    ///
    /// 边界面的右单元为虚拟幽灵编号 `n_cells + 边界面序号`。
    #[inline]
    pub fn face_cells(&self, face: usize) -> (usize, usize) {
        (self.face_left[face] as usize, self.face_right[face] as usize)
    }

    /// 面的两个端点
    #[inline]
    pub fn face_nodes(&self, face: usize) -> [usize; 2] {
        let [a, b] = self.face_nodes[face];
        [a as usize, b as usize]
    }

    /// 面是否为边界面
    #[inline]
    pub fn is_boundary_face(&self, face: usize) -> bool {
        face < self.n_bfaces
    }

    /// 边界面的标记
    #[inline]
    pub fn face_marker(&self, bface: usize) -> i32 {
        self.face_marker[bface]
    }

    /// 周期配对面（仅边界面）
    #[inline]
    pub fn periodic_partner(&self, bface: usize) -> Option<usize> {
        let p = self.periodic_map[bface];
        (p != INVALID).then_some(p as usize)
    }

    /// 单元的面列表
    #[inline]
    pub fn cell_faces(&self, cell: usize) -> impl Iterator<Item = usize> + '_ {
        let start = self.cell_face_offsets[cell] as usize;
        let end = self.cell_face_offsets[cell + 1] as usize;
        self.cell_face_indices[start..end].iter().map(|&f| f as usize)
    }

    /// 单元的节点列表
    #[inline]
    pub fn cell_nodes(&self, cell: usize) -> impl Iterator<Item = usize> + '_ {
        let start = self.cell_node_offsets[cell] as usize;
        let end = self.cell_node_offsets[cell + 1] as usize;
        self.cell_node_indices[start..end].iter().map(|&n| n as usize)
    }

    /// 单元节点数量
    #[inline]
    pub fn n_cell_nodes(&self, cell: usize) -> usize {
        (self.cell_node_offsets[cell + 1] - self.cell_node_offsets[cell]) as usize
    }

    // ============================================================
    // 度量
    // ============================================================

    /// 面单位法向（左单元指向右单元）
    #[inline]
    pub fn face_normal(&self, face: usize) -> DVec2 {
        self.face_normal[face]
    }

    /// 面长度
    #[inline]
    pub fn face_length(&self, face: usize) -> f64 {
        self.face_length[face]
    }

    /// 面中点
    #[inline]
    pub fn face_midpoint(&self, face: usize) -> DVec2 {
        let [a, b] = self.face_nodes[face];
        0.5 * (self.node_coords[a as usize] + self.node_coords[b as usize])
    }

    /// 单元面积
    #[inline]
    pub fn cell_area(&self, cell: usize) -> f64 {
        self.cell_area[cell]
    }

    /// 单元形心（节点平均）
    #[inline]
    pub fn cell_centroid(&self, cell: usize) -> DVec2 {
        self.cell_centroid[cell]
    }

    /// 节点坐标
    #[inline]
    pub fn node_coord(&self, node: usize) -> DVec2 {
        self.node_coords[node]
    }
}
