// crates/af_physics/src/engine/solver.rs

//! 有限体积空间离散引擎
//!
//! 给定单元守恒状态场，装配残差向量（面数值通量沿单元边界的积分）
//! 与残差对状态的块稀疏 Jacobian；可同时给出逐单元允许伪时间步长。
//!
//! # 阶段结构（残差）
//!
//! 1. 累加器清零；边界面左值取左单元状态
//! 2. 二阶时：幽灵态 → 原始变量 → 单元梯度 → 面值重构 → 转回守恒
//! 3. 一阶时：面值直接取两侧单元状态
//! 4. 边界面右值由边界条件（或周期配对复制）给出
//! 5. 面并行的通量累加（原子加），可选谱半径积分
//! 6. dt[c] = |Ωc| / s[c]
//!
//! # 符号约定
//!
//! 输出向量为 −r，对应 du/dt + r(u) = 0 的左端移项形式：
//! 左单元减去通量积分，右单元加上。Jacobian 为 ∂r/∂u。
//!
//! 二阶/常黏性开关为编译期常量参数，四种特化由 builder 按配置选取，
//! 热循环内无逐面分支。

use std::sync::Arc;

use af_config::{SolverConfig, ViscousJacobianKind};
use af_foundation::{SolverError, SolverResult};
use af_mesh::FlowMesh;
use glam::DVec2;
use rayon::prelude::*;
use tracing::info;

use super::surface::SurfaceData;
use super::workspace::FlowWorkspace;
use crate::boundary::BoundaryRegistry;
use crate::gas::IdealGasModel;
use crate::numerics::block::Block4;
use crate::numerics::bsr::JacobianMatrix;
use crate::numerics::gradient::{create_gradient_scheme, GradientScheme};
use crate::numerics::reconstruction::{create_reconstruction, SolutionReconstruction};
use crate::schemes::riemann::{create_riemann_scheme, RiemannScheme};
use crate::state::{cons_at, CellGradient, Cons, Jac, NVARS};

/// 空间离散接口（伪时间驱动层消费）
pub trait SpatialDiscretization: Send + Sync {
    /// 分配与本引擎匹配的工作区
    fn create_workspace(&self) -> FlowWorkspace;

    /// 以来流状态填充未知量
    fn initialize_unknowns(&self, u: &mut [f64]);

    /// 装配残差；`dt` 给定时同时计算逐单元允许伪时间步长
    ///
    /// 失败时输出内容未定义；输入状态非物理时在写出任何内容前返回。
    fn assemble_residual(
        &self,
        u: &[f64],
        residual: &mut [f64],
        dt: Option<&mut [f64]>,
        ws: &mut FlowWorkspace,
    ) -> SolverResult<()>;

    /// 向块稀疏矩阵累加 Jacobian 贡献
    fn assemble_jacobian(&self, u: &[f64], matrix: &dyn JacobianMatrix) -> SolverResult<()>;

    /// 计算守恒量的单元梯度（后处理用）
    fn get_gradients(
        &self,
        u: &[f64],
        ws: &mut FlowWorkspace,
        grads: &mut [CellGradient],
    ) -> SolverResult<()>;

    /// 壁面标记上的表面数据 (Cl, Cdp, Cdf 与逐面采样)
    fn compute_surface_data(
        &self,
        u: &[f64],
        grads: &[CellGradient],
        wall_marker: i32,
    ) -> SolverResult<SurfaceData>;
}

/// 有限体积空间离散
///
/// `SECOND_ORDER` / `CONST_VISC` 为编译期特化开关。
pub struct FlowSolver<const SECOND_ORDER: bool, const CONST_VISC: bool> {
    pub(crate) mesh: Arc<FlowMesh>,
    pub(crate) gas: IdealGasModel,
    pub(crate) uinf: Cons,
    /// 是否包含黏性通量
    pub(crate) viscous: bool,
    pub(crate) aoa: f64,
    inviscid: Box<dyn RiemannScheme>,
    jacobian_flux: Box<dyn RiemannScheme>,
    gradient: Box<dyn GradientScheme>,
    reconstruction: Box<dyn SolutionReconstruction>,
    boundaries: BoundaryRegistry,
    viscous_jacobian: ViscousJacobianKind,
    /// 真实 + 幽灵形心（幽灵为关于面中点的反射）
    pub(crate) rc: Vec<DVec2>,
    /// 逐面 Gauss 点（沿面均布）
    gauss: Vec<DVec2>,
}

impl<const SECOND_ORDER: bool, const CONST_VISC: bool> FlowSolver<SECOND_ORDER, CONST_VISC> {
    /// 由配置与网格构建引擎
    ///
    /// 预计算幽灵形心与面 Gauss 点；校验每个边界面的标记均已声明。
    pub fn new(mesh: Arc<FlowMesh>, config: &SolverConfig) -> SolverResult<Self> {
        config.validate().map_err(SolverError::from)?;

        let p = &config.physics;
        let n = &config.numerics;
        let gas = IdealGasModel::new(p.gamma, p.mach_inf, p.t_inf, p.reynolds_inf, p.prandtl);
        let aoa = p.aoa_rad();
        let uinf = gas.freestream_state(aoa);

        let boundaries = BoundaryRegistry::from_config(&config.boundaries, gas, uinf)?;
        for bf in 0..mesh.n_bfaces() {
            boundaries.at(mesh.face_marker(bf))?;
        }

        // 真实形心 + 中点反射幽灵形心
        let mut rc: Vec<DVec2> = (0..mesh.n_cells()).map(|c| mesh.cell_centroid(c)).collect();
        for bf in 0..mesh.n_bfaces() {
            let (left, _) = mesh.face_cells(bf);
            rc.push(2.0 * mesh.face_midpoint(bf) - mesh.cell_centroid(left));
        }

        // 单点 Gauss 求积：点位于面中点
        let gauss: Vec<DVec2> = (0..mesh.n_faces()).map(|f| mesh.face_midpoint(f)).collect();

        let inviscid = create_riemann_scheme(n.inviscid_flux, gas, n.entropy_fix_eps);
        let jacobian_flux = create_riemann_scheme(n.jacobian_flux, gas, n.entropy_fix_eps);
        let gradient = create_gradient_scheme(n.gradient, &mesh, &rc);
        let reconstruction = create_reconstruction(n.limiter, n.limiter_param);

        info!(
            second_order = SECOND_ORDER,
            const_viscosity = CONST_VISC,
            viscous = p.flow_kind.is_viscous(),
            "构建空间离散引擎"
        );

        Ok(Self {
            mesh,
            gas,
            uinf,
            viscous: p.flow_kind.is_viscous(),
            aoa,
            inviscid,
            jacobian_flux,
            gradient,
            reconstruction,
            boundaries,
            viscous_jacobian: n.viscous_jacobian,
            rc,
            gauss,
        })
    }

    /// 气体模型
    #[inline]
    pub fn gas(&self) -> &IdealGasModel {
        &self.gas
    }

    /// 由边界面左状态计算全部幽灵态
    ///
    /// 周期面以配对面的左状态覆盖（在标准边界条件之后）。
    fn compute_boundary_states(&self, uleft: &[f64], out: &mut [f64]) -> SolverResult<()> {
        let n_bfaces = self.mesh.n_bfaces();
        out[..n_bfaces * NVARS]
            .par_chunks_mut(NVARS)
            .enumerate()
            .try_for_each(|(bf, ghost_out)| -> SolverResult<()> {
                let bc = self.boundaries.at(self.mesh.face_marker(bf))?;
                let interior = cons_at(uleft, bf);
                let mut ghost = [0.0; NVARS];
                bc.ghost_state(&interior, self.mesh.face_normal(bf), &mut ghost);
                if let Some(partner) = self.mesh.periodic_partner(bf) {
                    ghost = cons_at(uleft, partner);
                }
                ghost_out.copy_from_slice(&ghost);
                Ok(())
            })
    }

    /// 输入单元状态的物理性校验
    fn validate_cell_states(&self, u: &[f64]) -> SolverResult<()> {
        (0..self.mesh.n_cells())
            .into_par_iter()
            .try_for_each(|cell| {
                let state = cons_at(u, cell);
                let pressure = self.gas.pressure(&state);
                if state[0] <= 0.0 || pressure <= 0.0 {
                    Err(SolverError::unphysical(cell, state[0], pressure))
                } else {
                    Ok(())
                }
            })
    }

    /// 重构后的面状态物理性校验（归因到面的左单元）
    fn validate_face_states(&self, uleft: &[f64], uright: &[f64]) -> SolverResult<()> {
        (0..self.mesh.n_faces())
            .into_par_iter()
            .try_for_each(|face| {
                let (left, _) = self.mesh.face_cells(face);
                for side in [uleft, uright] {
                    let state = cons_at(side, face);
                    let pressure = self.gas.pressure(&state);
                    if state[0] <= 0.0 || pressure <= 0.0 {
                        return Err(SolverError::unphysical(left, state[0], pressure));
                    }
                }
                Ok(())
            })
    }

    /// 面通量累加与谱半径积分
    fn accumulate_fluxes(
        &self,
        u: &[f64],
        ws: &FlowWorkspace,
        want_dt: bool,
    ) {
        let mesh = &*self.mesh;
        let n_cells = mesh.n_cells();

        (0..mesh.n_faces()).into_par_iter().for_each(|face| {
            let normal = mesh.face_normal(face);
            let len = mesh.face_length(face);
            let (left, right) = mesh.face_cells(face);

            let ul = cons_at(&ws.uleft, face);
            let ur = cons_at(&ws.uright, face);

            let mut flux = [0.0; NVARS];
            self.inviscid.get_flux(&ul, &ur, normal, &mut flux);
            for value in flux.iter_mut() {
                *value *= len;
            }

            if self.viscous {
                let ucl = cons_at(u, left);
                let ucr = (right < n_cells).then(|| cons_at(u, right));
                let mut vflux = [0.0; NVARS];
                self.compute_viscous_flux(
                    face,
                    &ucl,
                    ucr.as_ref(),
                    &ws.ug,
                    &ws.grads,
                    &ws.uleft,
                    &ws.uright,
                    &mut vflux,
                );
                for (value, v) in flux.iter_mut().zip(vflux) {
                    *value += v * len;
                }
            }

            // 左单元减、右单元加（输出为 −r）
            for (k, &value) in flux.iter().enumerate() {
                ws.residual.add(left * NVARS + k, -value);
                if right < n_cells {
                    ws.residual.add(right * NVARS + k, value);
                }
            }

            if want_dt {
                let ci = self.gas.sound_speed(&ul);
                let cj = self.gas.sound_speed(&ur);
                let vni = self.gas.normal_velocity(&ul, normal);
                let vnj = self.gas.normal_velocity(&ur, normal);

                let mut specrad_i = (vni.abs() + ci) * len;
                let mut specrad_j = (vnj.abs() + cj) * len;

                if self.viscous {
                    let (mu_i, mu_j) = if CONST_VISC {
                        (self.gas.constant_viscosity(), self.gas.constant_viscosity())
                    } else {
                        (
                            self.gas.sutherland_viscosity(&ul),
                            self.gas.sutherland_viscosity(&ur),
                        )
                    };
                    let co_i = (4.0 / (3.0 * ul[0])).max(self.gas.gamma / ul[0]);
                    let co_j = (4.0 / (3.0 * ur[0])).max(self.gas.gamma / ur[0]);
                    specrad_i +=
                        co_i * mu_i / self.gas.prandtl * len * len / mesh.cell_area(left);
                    if right < n_cells {
                        specrad_j +=
                            co_j * mu_j / self.gas.prandtl * len * len / mesh.cell_area(right);
                    }
                }

                ws.spectral.add(left, specrad_i);
                if right < n_cells {
                    ws.spectral.add(right, specrad_j);
                }
            }
        });
    }
}

impl<const SECOND_ORDER: bool, const CONST_VISC: bool> SpatialDiscretization
    for FlowSolver<SECOND_ORDER, CONST_VISC>
{
    fn create_workspace(&self) -> FlowWorkspace {
        FlowWorkspace::new(&self.mesh)
    }

    fn initialize_unknowns(&self, u: &mut [f64]) {
        u.par_chunks_mut(NVARS)
            .for_each(|chunk| chunk.copy_from_slice(&self.uinf));
    }

    fn assemble_residual(
        &self,
        u: &[f64],
        residual: &mut [f64],
        dt: Option<&mut [f64]>,
        ws: &mut FlowWorkspace,
    ) -> SolverResult<()> {
        let mesh = &*self.mesh;
        let n_cells = mesh.n_cells();
        let n_bfaces = mesh.n_bfaces();

        SolverError::check_size("state", n_cells * NVARS, u.len())?;
        SolverError::check_size("residual", n_cells * NVARS, residual.len())?;
        if let Some(dt) = dt.as_deref() {
            SolverError::check_size("dt", n_cells, dt.len())?;
        }

        // 先校验输入，后写任何输出
        self.validate_cell_states(u)?;
        ws.reset();

        // 边界面左值 = 左单元状态
        ws.uleft[..n_bfaces * NVARS]
            .par_chunks_mut(NVARS)
            .enumerate()
            .for_each(|(bf, chunk)| {
                let (left, _) = mesh.face_cells(bf);
                chunk.copy_from_slice(&cons_at(u, left));
            });

        if SECOND_ORDER {
            // 幽灵态（守恒量）
            self.compute_boundary_states(&ws.uleft, &mut ws.ug)?;

            // 全部转原始变量
            ws.ug.par_chunks_mut(NVARS).for_each(|chunk| {
                let state = [chunk[0], chunk[1], chunk[2], chunk[3]];
                chunk.copy_from_slice(&self.gas.prim_from_cons(&state));
            });
            ws.up
                .par_chunks_mut(NVARS)
                .enumerate()
                .for_each(|(cell, chunk)| {
                    chunk.copy_from_slice(&self.gas.prim_from_cons(&cons_at(u, cell)));
                });

            // 原始变量梯度与面值重构
            self.gradient
                .compute_gradients(mesh, &self.rc, &ws.up, &ws.ug, &mut ws.grads);
            self.reconstruction.compute_face_values(
                mesh,
                &self.rc,
                &self.gauss,
                &ws.up,
                &ws.ug,
                &ws.grads,
                &mut ws.uleft,
                &mut ws.uright,
            );

            // 面值转回守恒（梯度保持原始变量）
            ws.uleft
                .par_chunks_mut(NVARS)
                .zip(ws.uright.par_chunks_mut(NVARS))
                .enumerate()
                .for_each(|(face, (ul, ur))| {
                    let wl = [ul[0], ul[1], ul[2], ul[3]];
                    ul.copy_from_slice(&self.gas.cons_from_prim(&wl));
                    if face >= n_bfaces {
                        let wr = [ur[0], ur[1], ur[2], ur[3]];
                        ur.copy_from_slice(&self.gas.cons_from_prim(&wr));
                    }
                });
        } else {
            // 一阶：内部面两侧取单元状态
            ws.uleft
                .par_chunks_mut(NVARS)
                .zip(ws.uright.par_chunks_mut(NVARS))
                .enumerate()
                .for_each(|(face, (ul, ur))| {
                    if face >= n_bfaces {
                        let (left, right) = mesh.face_cells(face);
                        ul.copy_from_slice(&cons_at(u, left));
                        ur.copy_from_slice(&cons_at(u, right));
                    }
                });
        }

        // 边界面右值：由（可能已重构的）左值经边界条件得到
        {
            let (uleft, uright) = (&ws.uleft, &mut ws.uright);
            self.compute_boundary_states(uleft, uright)?;
        }

        // 进入物理计算前校验面状态
        self.validate_face_states(&ws.uleft, &ws.uright)?;

        self.accumulate_fluxes(u, ws, dt.is_some());

        // 写出残差并做有限性检查
        ws.residual.write_to(residual);
        if residual.iter().any(|v| !v.is_finite()) {
            return Err(SolverError::numeric_invalid("残差向量"));
        }

        if let Some(dt) = dt {
            dt.par_iter_mut().enumerate().for_each(|(cell, value)| {
                *value = mesh.cell_area(cell) / ws.spectral.get(cell);
            });
        }

        Ok(())
    }

    fn assemble_jacobian(&self, u: &[f64], matrix: &dyn JacobianMatrix) -> SolverResult<()> {
        let mesh = &*self.mesh;
        let n_cells = mesh.n_cells();
        let n_bfaces = mesh.n_bfaces();

        SolverError::check_size("state", n_cells * NVARS, u.len())?;
        SolverError::check_size("matrix", n_cells, matrix.n_block_rows())?;
        self.validate_cell_states(u)?;

        // 边界面：D_LL += −ℓ(L − R·∂uG/∂uI)
        (0..n_bfaces)
            .into_par_iter()
            .try_for_each(|face| -> SolverResult<()> {
                let (left, _) = mesh.face_cells(face);
                let normal = mesh.face_normal(face);
                let len = mesh.face_length(face);
                let interior = cons_at(u, left);

                // 周期面：面对侧为配对面左单元状态，对本单元无幽灵导数；
                // 与配对单元的耦合块不在装配模式内，按对角近似处理
                let (uface, dghost) = if let Some(partner) = mesh.periodic_partner(face) {
                    let (pleft, _) = mesh.face_cells(partner);
                    (cons_at(u, pleft), [[0.0; NVARS]; NVARS])
                } else {
                    let bc = self.boundaries.at(mesh.face_marker(face))?;
                    let mut ghost = [0.0; NVARS];
                    let mut dghost: Jac = [[0.0; NVARS]; NVARS];
                    bc.ghost_and_jacobian(&interior, normal, &mut ghost, &mut dghost);
                    (ghost, dghost)
                };

                let mut dfdl: Jac = [[0.0; NVARS]; NVARS];
                let mut dfdr: Jac = [[0.0; NVARS]; NVARS];
                self.jacobian_flux
                    .get_jacobian(&interior, &uface, normal, &mut dfdl, &mut dfdr);

                if self.viscous {
                    match self.viscous_jacobian {
                        ViscousJacobianKind::Full => self.compute_viscous_flux_jacobian(
                            face, &interior, &uface, &mut dfdl, &mut dfdr,
                        ),
                        ViscousJacobianKind::Diagonal => self
                            .compute_viscous_flux_approximate_jacobian(
                                face, &interior, &uface, &mut dfdl, &mut dfdr,
                            ),
                    }
                }

                // block = −ℓ (dfdl − dfdr · ∂uG/∂uI)
                let mut block = Block4::from(dfdl);
                let coupling = Block4::from(dfdr).matmul(&Block4::from(dghost));
                block.add_assign(&coupling.scaled(-1.0));
                block.scale_mut(-len);
                matrix.add_block(left, left, &block);
                Ok(())
            })?;

        // 内部面：四个带符号块
        (n_bfaces..mesh.n_faces()).into_par_iter().for_each(|face| {
            let (left, right) = mesh.face_cells(face);
            let normal = mesh.face_normal(face);
            let len = mesh.face_length(face);
            let ul = cons_at(u, left);
            let ur = cons_at(u, right);

            let mut dfdl: Jac = [[0.0; NVARS]; NVARS];
            let mut dfdr: Jac = [[0.0; NVARS]; NVARS];
            self.jacobian_flux
                .get_jacobian(&ul, &ur, normal, &mut dfdl, &mut dfdr);

            if self.viscous {
                match self.viscous_jacobian {
                    ViscousJacobianKind::Full => {
                        self.compute_viscous_flux_jacobian(face, &ul, &ur, &mut dfdl, &mut dfdr)
                    }
                    ViscousJacobianKind::Diagonal => self
                        .compute_viscous_flux_approximate_jacobian(
                            face, &ul, &ur, &mut dfdl, &mut dfdr,
                        ),
                }
            }

            let lower = Block4::from(dfdl).scaled(len);
            let upper = Block4::from(dfdr).scaled(len);

            matrix.add_block(right, left, &lower);
            matrix.add_block(left, right, &upper);
            matrix.add_block(left, left, &lower.scaled(-1.0));
            matrix.add_block(right, right, &upper.scaled(-1.0));
        });

        Ok(())
    }

    fn get_gradients(
        &self,
        u: &[f64],
        ws: &mut FlowWorkspace,
        grads: &mut [CellGradient],
    ) -> SolverResult<()> {
        let mesh = &*self.mesh;
        SolverError::check_size("state", mesh.n_cells() * NVARS, u.len())?;
        SolverError::check_size("gradients", mesh.n_cells(), grads.len())?;

        // 守恒量幽灵态（左值 = 单元状态）
        ws.uleft[..mesh.n_bfaces() * NVARS]
            .par_chunks_mut(NVARS)
            .enumerate()
            .for_each(|(bf, chunk)| {
                let (left, _) = mesh.face_cells(bf);
                chunk.copy_from_slice(&cons_at(u, left));
            });
        self.compute_boundary_states(&ws.uleft, &mut ws.ug)?;

        self.gradient
            .compute_gradients(mesh, &self.rc, u, &ws.ug, grads);
        Ok(())
    }

    fn compute_surface_data(
        &self,
        u: &[f64],
        grads: &[CellGradient],
        wall_marker: i32,
    ) -> SolverResult<SurfaceData> {
        self.surface_data(u, grads, wall_marker)
    }
}
