// crates/af_physics/src/engine/viscous.rs

//! 黏性面通量与修正平均面梯度
//!
//! 面梯度取两侧单元梯度的平均，沿形心连线方向的分量以紧致差分替换：
//! g_face = ḡ − (ḡ·e)e + ((φ_R − φ_L)/d)e。
//! 抑制奇偶解耦同时保留横向精度。边界面两侧使用同一单侧梯度。
//!
//! Jacobian 路径使用薄层近似（面梯度 ≈ 紧致差分项），
//! 完整形式对动量与能量逐项链式求导；另提供 μ/(ρd) 对角近似。

use crate::state::{cons_at, CellGradient, Cons, Jac, NDIM, NVARS};

use super::solver::FlowSolver;

impl<const SECOND_ORDER: bool, const CONST_VISC: bool> FlowSolver<SECOND_ORDER, CONST_VISC> {
    /// 形心连线方向与距离（右侧可为幽灵形心）
    #[inline]
    fn centroid_direction(&self, face: usize) -> ([f64; NDIM], f64) {
        let (left, right) = self.mesh.face_cells(face);
        let dr = self.rc[right] - self.rc[left];
        let dist = dr.length();
        ([dr.x / dist, dr.y / dist], dist)
    }

    /// 修正平均面梯度
    ///
    /// `ucl`/`ucr` 为两侧原始-2 值，`gradl`/`gradr` 为两侧原始-2 梯度。
    fn face_gradient_modified_average(
        &self,
        face: usize,
        ucl: &Cons,
        ucr: &Cons,
        gradl: &CellGradient,
        gradr: &CellGradient,
    ) -> CellGradient {
        let (e, dist) = self.centroid_direction(face);
        let mut grad = [[0.0; NVARS]; NDIM];
        for var in 0..NVARS {
            let avg = [
                0.5 * (gradl[0][var] + gradr[0][var]),
                0.5 * (gradl[1][var] + gradr[1][var]),
            ];
            let corr = (ucr[var] - ucl[var]) / dist;
            let along = avg[0] * e[0] + avg[1] * e[1];
            for dir in 0..NDIM {
                grad[dir][var] = avg[dir] - along * e[dir] + corr * e[dir];
            }
        }
        grad
    }

    /// 黏性面通量
    ///
    /// 输出为加到总通量上的分量（动量 −τ·n、能量 −(τ·v̄ + k∇T)·n），
    /// 与残差 du/dt + r(u) = 0 的移项形式一致。
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn compute_viscous_flux(
        &self,
        face: usize,
        ucell_l: &Cons,
        ucell_r: Option<&Cons>,
        ug: &[f64],
        grads: &[CellGradient],
        uleft: &[f64],
        uright: &[f64],
        vflux: &mut Cons,
    ) {
        let mesh = &*self.mesh;
        let (left, right) = mesh.face_cells(face);
        let normal = mesh.face_normal(face);

        // 两侧单元值与单侧梯度；一阶时梯度为零
        let mut ucl = *ucell_l;
        let mut ucr = [0.0; NVARS];
        let mut gradl: CellGradient = [[0.0; NVARS]; NDIM];
        let mut gradr: CellGradient = [[0.0; NVARS]; NDIM];

        if mesh.is_boundary_face(face) {
            if SECOND_ORDER {
                // 幽灵值此时已是原始变量
                ucr = cons_at(ug, face);
                gradl = grads[left];
                let wl = self.gas.prim_from_cons(&ucl);
                // 单侧压强梯度换成温度梯度
                for dir in 0..NDIM {
                    gradl[dir][NVARS - 1] = self.gas.grad_temperature(
                        wl[0],
                        gradl[dir][0],
                        wl[NVARS - 1],
                        gradl[dir][NVARS - 1],
                    );
                }
                ucl = wl;
                // 边界面两侧使用同一单侧梯度
                gradr = gradl;
            } else {
                // 一阶：幽灵守恒态存于面右值
                ucr = cons_at(uright, face);
            }
        } else {
            if let Some(cell_r) = ucell_r {
                ucr = *cell_r;
            }
            if SECOND_ORDER {
                gradl = grads[left];
                gradr = grads[right];
                let wl = self.gas.prim_from_cons(&ucl);
                let wr = self.gas.prim_from_cons(&ucr);
                for dir in 0..NDIM {
                    gradl[dir][NVARS - 1] = self.gas.grad_temperature(
                        wl[0],
                        gradl[dir][0],
                        wl[NVARS - 1],
                        gradl[dir][NVARS - 1],
                    );
                    gradr[dir][NVARS - 1] = self.gas.grad_temperature(
                        wr[0],
                        gradr[dir][0],
                        wr[NVARS - 1],
                        gradr[dir][NVARS - 1],
                    );
                }
                ucl = wl;
                ucr = wr;
            }
        }

        // 单元值统一到原始-2 (ρ,u,v,T)
        if SECOND_ORDER {
            ucl[NVARS - 1] = self.gas.temperature(ucl[0], ucl[NVARS - 1]);
            ucr[NVARS - 1] = self.gas.temperature(ucr[0], ucr[NVARS - 1]);
        } else {
            ucl = self.gas.prim2_from_cons(&ucl);
            ucr = self.gas.prim2_from_cons(&ucr);
        }

        let grad = self.face_gradient_modified_average(face, &ucl, &ucr, &gradl, &gradr);

        // 黏性系数与热导率（面守恒态）
        let face_l = cons_at(uleft, face);
        let face_r = cons_at(uright, face);
        let mu = if CONST_VISC {
            self.gas.constant_viscosity()
        } else {
            0.5 * (self.gas.sutherland_viscosity(&face_l)
                + self.gas.sutherland_viscosity(&face_r))
        };
        let kdiff = self.gas.thermal_conductivity(mu);

        let stress = self.gas.stress_tensor(mu, &grad);
        let n = [normal.x, normal.y];

        vflux[0] = 0.0;
        for i in 0..NDIM {
            vflux[i + 1] = 0.0;
            for j in 0..NDIM {
                vflux[i + 1] -= stress[i][j] * n[j];
            }
        }

        // 能量耗散：摩擦功 + 热流
        let vavg = [
            0.5 * (face_l[1] / face_l[0] + face_r[1] / face_r[0]),
            0.5 * (face_l[2] / face_l[0] + face_r[2] / face_r[0]),
        ];
        vflux[NVARS - 1] = 0.0;
        for i in 0..NDIM {
            let mut comp = 0.0;
            for j in 0..NDIM {
                comp += stress[i][j] * vavg[j];
            }
            comp += kdiff * grad[i][NVARS - 1];
            vflux[NVARS - 1] -= comp * n[i];
        }
    }

    /// 黏性通量的完整薄层 Jacobian（累加到 `dvfi`/`dvfj`）
    ///
    /// 面梯度取薄层近似 g ≈ corr·e，故 ∂g/∂u 经原始-2 Jacobian 闭式给出。
    /// 符号与无黏 Jacobian 约定一致（dvfi 对应 −∂F/∂uL）。
    pub(crate) fn compute_viscous_flux_jacobian(
        &self,
        face: usize,
        ul: &Cons,
        ur: &Cons,
        dvfi: &mut Jac,
        dvfj: &mut Jac,
    ) {
        let normal = self.mesh.face_normal(face);
        let n = [normal.x, normal.y];
        let (e, dist) = self.centroid_direction(face);

        let upl = self.gas.prim2_from_cons(ul);
        let upr = self.gas.prim2_from_cons(ur);
        let dupl = self.gas.prim2_jacobian(ul);
        let dupr = self.gas.prim2_jacobian(ur);

        // 薄层面梯度及其两侧 Jacobian
        let mut grad: CellGradient = [[0.0; NVARS]; NDIM];
        let mut dgradl = [[[0.0; NVARS]; NVARS]; NDIM];
        let mut dgradr = [[[0.0; NVARS]; NVARS]; NDIM];
        for var in 0..NVARS {
            let corr = (upr[var] - upl[var]) / dist;
            for dir in 0..NDIM {
                grad[dir][var] = corr * e[dir];
                for k in 0..NVARS {
                    dgradl[dir][var][k] = -dupl[var][k] / dist * e[dir];
                    dgradr[dir][var][k] = dupr[var][k] / dist * e[dir];
                }
            }
        }

        let mu = if CONST_VISC {
            self.gas.constant_viscosity()
        } else {
            0.5 * (self.gas.sutherland_viscosity(ul) + self.gas.sutherland_viscosity(ur))
        };
        let kdiff = self.gas.thermal_conductivity(mu);

        let mut dmul = [0.0; NVARS];
        let mut dmur = [0.0; NVARS];
        let mut dkdl = [0.0; NVARS];
        let mut dkdr = [0.0; NVARS];
        if !CONST_VISC {
            dmul = self.gas.sutherland_viscosity_jacobian(ul);
            dmur = self.gas.sutherland_viscosity_jacobian(ur);
            for k in 0..NVARS {
                dmul[k] *= 0.5;
                dmur[k] *= 0.5;
            }
            dkdl = self.gas.thermal_conductivity_jacobian(&dmul);
            dkdr = self.gas.thermal_conductivity_jacobian(&dmur);
        }

        let stress = self.gas.stress_tensor(mu, &grad);
        let mut dstressl = [[[0.0; NVARS]; NDIM]; NDIM];
        let mut dstressr = [[[0.0; NVARS]; NDIM]; NDIM];
        self.gas
            .stress_tensor_jacobian(mu, &dmul, &grad, &dgradl, &mut dstressl);
        self.gas
            .stress_tensor_jacobian(mu, &dmur, &grad, &dgradr, &mut dstressr);

        // 动量分量
        for i in 0..NDIM {
            for j in 0..NDIM {
                for k in 0..NVARS {
                    dvfi[i + 1][k] += dstressl[i][j][k] * n[j];
                    dvfj[i + 1][k] -= dstressr[i][j][k] * n[j];
                }
            }
        }

        // 能量分量：面平均速度及其导数
        let mut vavg = [0.0; NDIM];
        let mut dvavgl = [[0.0; NVARS]; NDIM];
        let mut dvavgr = [[0.0; NVARS]; NDIM];
        for j in 0..NDIM {
            vavg[j] = 0.5 * (ul[j + 1] / ul[0] + ur[j + 1] / ur[0]);
            dvavgl[j][0] = -0.5 * ul[j + 1] / (ul[0] * ul[0]);
            dvavgr[j][0] = -0.5 * ur[j + 1] / (ur[0] * ur[0]);
            dvavgl[j][j + 1] = 0.5 / ul[0];
            dvavgr[j][j + 1] = 0.5 / ur[0];
        }

        for i in 0..NDIM {
            let mut dcompl = [0.0; NVARS];
            let mut dcompr = [0.0; NVARS];
            for j in 0..NDIM {
                for k in 0..NVARS {
                    dcompl[k] += dstressl[i][j][k] * vavg[j] + stress[i][j] * dvavgl[j][k];
                    dcompr[k] += dstressr[i][j][k] * vavg[j] + stress[i][j] * dvavgr[j][k];
                }
            }
            for k in 0..NVARS {
                dcompl[k] += dkdl[k] * grad[i][NVARS - 1] + kdiff * dgradl[i][NVARS - 1][k];
                dcompr[k] += dkdr[k] * grad[i][NVARS - 1] + kdiff * dgradr[i][NVARS - 1][k];
                dvfi[NVARS - 1][k] += dcompl[k] * n[i];
                dvfj[NVARS - 1][k] -= dcompr[k] * n[i];
            }
        }
    }

    /// 对角近似黏性 Jacobian：两侧对角块各减 μ/(ρ̄ d)
    pub(crate) fn compute_viscous_flux_approximate_jacobian(
        &self,
        face: usize,
        ul: &Cons,
        ur: &Cons,
        dvfi: &mut Jac,
        dvfj: &mut Jac,
    ) {
        let mu = if CONST_VISC {
            self.gas.constant_viscosity()
        } else {
            0.5 * (self.gas.sutherland_viscosity(ul) + self.gas.sutherland_viscosity(ur))
        };
        let rho = 0.5 * (ul[0] + ur[0]);
        let (_, dist) = self.centroid_direction(face);

        for i in 0..NVARS {
            dvfi[i][i] -= mu / (rho * dist);
            dvfj[i][i] -= mu / (rho * dist);
        }
    }
}
