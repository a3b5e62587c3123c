// crates/af_physics/src/schemes/riemann/hllc.rs

//! HLLC 通量（Batten 形式的接触波恢复）
//!
//! 在 HLL 波速 sL、sR 之上引入接触波速
//! sM = (pR − pL + ρL vnL(sL−vnL) − ρR vnR(sR−vnR)) /
//!      (ρL(sL−vnL) − ρR(sR−vnR))，
//! 黎曼扇内的星状态由跳跃条件给出。分支由 sL、sM、sR 的符号一致决定。
//! Jacobian 为完整精确线化（含波速与星状态的导数）。

use glam::DVec2;

use super::hll::{wave_speed_derivs, wave_speeds, WaveSpeeds};
use super::{RiemannScheme, SideState};
use crate::gas::IdealGasModel;
use crate::state::{Cons, Jac, NVARS};

/// HLLC 通量
#[derive(Debug, Clone, Copy)]
pub struct HllcScheme {
    gas: IdealGasModel,
}

impl HllcScheme {
    /// 创建格式
    pub fn new(gas: IdealGasModel) -> Self {
        Self { gas }
    }

    /// 接触波速 sM
    fn contact_speed(left: &SideState, right: &SideState, speeds: &WaveSpeeds) -> f64 {
        let num = right.p - left.p + left.rho * left.vn * (speeds.sl - left.vn)
            - right.rho * right.vn * (speeds.sr - right.vn);
        let den = left.rho * (speeds.sl - left.vn) - right.rho * (speeds.sr - right.vn);
        num / den
    }

    /// 接触波速对两侧守恒量的导数
    fn contact_speed_derivs(
        left: &SideState,
        right: &SideState,
        speeds: &WaveSpeeds,
        dsl: &[[f64; NVARS]; 2],
        dsr: &[[f64; NVARS]; 2],
    ) -> [[f64; NVARS]; 2] {
        let num = right.p - left.p + left.rho * left.vn * (speeds.sl - left.vn)
            - right.rho * right.vn * (speeds.sr - right.vn);
        let den = left.rho * (speeds.sl - left.vn) - right.rho * (speeds.sr - right.vn);

        let mut dsm = [[0.0; NVARS]; 2];
        for side in 0..2 {
            for k in 0..NVARS {
                let (dnum, dden) = if side == 0 {
                    let drho = if k == 0 { 1.0 } else { 0.0 };
                    let dnum = -left.dp[k]
                        + drho * left.vn * (speeds.sl - left.vn)
                        + left.rho * left.dvn[k] * (speeds.sl - left.vn)
                        + left.rho * left.vn * (dsl[0][k] - left.dvn[k])
                        - right.rho * right.vn * dsr[0][k];
                    let dden = drho * (speeds.sl - left.vn)
                        + left.rho * (dsl[0][k] - left.dvn[k])
                        - right.rho * dsr[0][k];
                    (dnum, dden)
                } else {
                    let drho = if k == 0 { 1.0 } else { 0.0 };
                    let dnum = right.dp[k] + left.rho * left.vn * dsl[1][k]
                        - drho * right.vn * (speeds.sr - right.vn)
                        - right.rho * right.dvn[k] * (speeds.sr - right.vn)
                        - right.rho * right.vn * (dsr[1][k] - right.dvn[k]);
                    let dden = left.rho * dsl[1][k]
                        - drho * (speeds.sr - right.vn)
                        - right.rho * (dsr[1][k] - right.dvn[k]);
                    (dnum, dden)
                };
                dsm[side][k] = (dnum * den - num * dden) / (den * den);
            }
        }
        dsm
    }

    /// 黎曼扇内信号速度 s 一侧的星状态
    ///
    /// ρ* = ρ(s−vn)/(s−sM)，法向速度替换为 sM、切向保持，
    /// E* 由跳跃条件的能量关系给出。
    fn star_state(u: &Cons, s: &SideState, n: DVec2, signal: f64, sm: f64) -> Cons {
        let q = signal - s.vn;
        let w = signal - sm;
        let rho_star = s.rho * q / w;
        let shift = sm - s.vn;
        [
            rho_star,
            rho_star * (s.vx + shift * n.x),
            rho_star * (s.vy + shift * n.y),
            rho_star * (u[3] / s.rho + shift * (sm + s.p / (s.rho * q))),
        ]
    }

    /// 星状态对本侧与另一侧守恒量的 Jacobian
    #[allow(clippy::too_many_arguments)]
    fn star_state_jacobian(
        u: &Cons,
        s: &SideState,
        n: DVec2,
        signal: f64,
        sm: f64,
        ds_this: &[f64; NVARS],
        ds_other: &[f64; NVARS],
        dsm_this: &[f64; NVARS],
        dsm_other: &[f64; NVARS],
    ) -> (Jac, Jac) {
        let q = signal - s.vn;
        let w = signal - sm;
        let rho_star = s.rho * q / w;
        let shift = sm - s.vn;
        let pq = s.p / (s.rho * q);
        let g = u[3] / s.rho + shift * (sm + pq);
        let vstar = [s.vx + shift * n.x, s.vy + shift * n.y];

        let mut d_this = [[0.0; NVARS]; NVARS];
        let mut d_other = [[0.0; NVARS]; NVARS];

        for k in 0..NVARS {
            // ---- 本侧 ----
            let drho = if k == 0 { 1.0 } else { 0.0 };
            let de = if k == 3 { 1.0 } else { 0.0 };
            let dq = ds_this[k] - s.dvn[k];
            let dw = ds_this[k] - dsm_this[k];
            let drho_star =
                (drho * q + s.rho * dq) / w - s.rho * q * dw / (w * w);
            let dshift = dsm_this[k] - s.dvn[k];
            let dvstar = [s.dvx[k] + dshift * n.x, s.dvy[k] + dshift * n.y];
            let de_over_rho = de / s.rho - u[3] / (s.rho * s.rho) * drho;
            let dpq = (s.dp[k] * s.rho * q - s.p * (drho * q + s.rho * dq))
                / (s.rho * q * s.rho * q);
            let dg = de_over_rho + dshift * (sm + pq) + shift * (dsm_this[k] + dpq);

            d_this[0][k] = drho_star;
            d_this[1][k] = drho_star * vstar[0] + rho_star * dvstar[0];
            d_this[2][k] = drho_star * vstar[1] + rho_star * dvstar[1];
            d_this[3][k] = drho_star * g + rho_star * dg;

            // ---- 另一侧（仅通过 s 与 sM） ----
            let dq_o = ds_other[k];
            let dw_o = ds_other[k] - dsm_other[k];
            let drho_star_o = s.rho * dq_o / w - s.rho * q * dw_o / (w * w);
            let dshift_o = dsm_other[k];
            let dvstar_o = [dshift_o * n.x, dshift_o * n.y];
            let dpq_o = -s.p * s.rho * dq_o / (s.rho * q * s.rho * q);
            let dg_o = dshift_o * (sm + pq) + shift * (dsm_other[k] + dpq_o);

            d_other[0][k] = drho_star_o;
            d_other[1][k] = drho_star_o * vstar[0] + rho_star * dvstar_o[0];
            d_other[2][k] = drho_star_o * vstar[1] + rho_star * dvstar_o[1];
            d_other[3][k] = drho_star_o * g + rho_star * dg_o;
        }

        (d_this, d_other)
    }
}

impl RiemannScheme for HllcScheme {
    fn name(&self) -> &'static str {
        "HLLC"
    }

    fn get_flux(&self, ul: &Cons, ur: &Cons, n: DVec2, flux: &mut Cons) {
        let left = SideState::evaluate(&self.gas, ul, n);
        let right = SideState::evaluate(&self.gas, ur, n);
        let speeds = wave_speeds(&self.gas, &left, &right, n);

        if speeds.sl > 0.0 {
            *flux = self.gas.euler_flux(ul, n);
            return;
        }
        if speeds.sr < 0.0 {
            *flux = self.gas.euler_flux(ur, n);
            return;
        }

        let sm = Self::contact_speed(&left, &right, &speeds);
        if sm >= 0.0 {
            let fl = self.gas.euler_flux(ul, n);
            let star = Self::star_state(ul, &left, n, speeds.sl, sm);
            for k in 0..NVARS {
                flux[k] = fl[k] + speeds.sl * (star[k] - ul[k]);
            }
        } else {
            let fr = self.gas.euler_flux(ur, n);
            let star = Self::star_state(ur, &right, n, speeds.sr, sm);
            for k in 0..NVARS {
                flux[k] = fr[k] + speeds.sr * (star[k] - ur[k]);
            }
        }
    }

    fn get_jacobian(&self, ul: &Cons, ur: &Cons, n: DVec2, dfdl: &mut Jac, dfdr: &mut Jac) {
        let left = SideState::evaluate(&self.gas, ul, n);
        let right = SideState::evaluate(&self.gas, ur, n);
        let speeds = wave_speeds(&self.gas, &left, &right, n);

        if speeds.sl > 0.0 {
            let al = self.gas.euler_flux_jacobian(ul, n);
            for i in 0..NVARS {
                for k in 0..NVARS {
                    dfdl[i][k] = -al[i][k];
                    dfdr[i][k] = 0.0;
                }
            }
            return;
        }
        if speeds.sr < 0.0 {
            let ar = self.gas.euler_flux_jacobian(ur, n);
            for i in 0..NVARS {
                for k in 0..NVARS {
                    dfdl[i][k] = 0.0;
                    dfdr[i][k] = ar[i][k];
                }
            }
            return;
        }

        let (dsl, dsr) = wave_speed_derivs(&self.gas, &left, &right, &speeds, n);
        let sm = Self::contact_speed(&left, &right, &speeds);
        let dsm = Self::contact_speed_derivs(&left, &right, &speeds, &dsl, &dsr);

        // 星侧选取：sM ≥ 0 取左，否则取右
        let (u_k, s_k, signal, ds_k, this_side) = if sm >= 0.0 {
            (ul, &left, speeds.sl, &dsl, 0usize)
        } else {
            (ur, &right, speeds.sr, &dsr, 1usize)
        };
        let other_side = 1 - this_side;

        let star = Self::star_state(u_k, s_k, n, signal, sm);
        let (dstar_this, dstar_other) = Self::star_state_jacobian(
            u_k,
            s_k,
            n,
            signal,
            sm,
            &ds_k[this_side],
            &ds_k[other_side],
            &dsm[this_side],
            &dsm[other_side],
        );

        let a_k = self.gas.euler_flux_jacobian(u_k, n);

        // F = F_K + s_K (u* − u_K)
        let mut d_this = [[0.0; NVARS]; NVARS];
        let mut d_other = [[0.0; NVARS]; NVARS];
        for i in 0..NVARS {
            for k in 0..NVARS {
                let id = if i == k { 1.0 } else { 0.0 };
                d_this[i][k] = a_k[i][k]
                    + ds_k[this_side][k] * (star[i] - u_k[i])
                    + signal * (dstar_this[i][k] - id);
                d_other[i][k] =
                    ds_k[other_side][k] * (star[i] - u_k[i]) + signal * dstar_other[i][k];
            }
        }

        for i in 0..NVARS {
            for k in 0..NVARS {
                if this_side == 0 {
                    dfdl[i][k] = -d_this[i][k];
                    dfdr[i][k] = d_other[i][k];
                } else {
                    dfdl[i][k] = -d_other[i][k];
                    dfdr[i][k] = d_this[i][k];
                }
            }
        }
    }
}
