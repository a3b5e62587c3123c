// crates/af_physics/src/schemes/riemann/hll.rs

//! HLL 通量
//!
//! 波速估计取物理值与 Roe 平均特征值的包络：
//! sL = min(vnL − cL, ṽn − c̃)，sR = max(vnR + cR, ṽn + c̃)。
//! 三分支：sL > 0 取左、sR < 0 取右、否则取中间平均通量。
//! Jacobian 为逐分支精确线化，含波速估计的导数（取得包络的一侧）。

use glam::DVec2;

use super::roe_average::{roe_average_derivs, roe_averages};
use super::{RiemannScheme, SideState};
use crate::gas::IdealGasModel;
use crate::state::{Cons, Jac, NVARS};

/// HLL 通量
#[derive(Debug, Clone, Copy)]
pub struct HllScheme {
    gas: IdealGasModel,
}

/// 波速估计及其来源
///
/// `left_physical` / `right_physical` 标记包络是否由物理波速取得
/// （否则由 Roe 平均特征值取得）。
pub(crate) struct WaveSpeeds {
    pub sl: f64,
    pub sr: f64,
    pub sl_physical: bool,
    pub sr_physical: bool,
}

/// Batten 波速估计
pub(crate) fn wave_speeds(
    gas: &IdealGasModel,
    left: &SideState,
    right: &SideState,
    n: DVec2,
) -> WaveSpeeds {
    let avg = roe_averages(gas, left, right, n);
    let sl_phys = left.vn - left.c;
    let sl_roe = avg.vn - avg.c;
    let sr_phys = right.vn + right.c;
    let sr_roe = avg.vn + avg.c;
    WaveSpeeds {
        sl: sl_phys.min(sl_roe),
        sr: sr_phys.max(sr_roe),
        sl_physical: sl_phys <= sl_roe,
        sr_physical: sr_phys >= sr_roe,
    }
}

/// 波速估计对左右守恒量的导数
///
/// 返回 `(dsl, dsr)`，下标 `[side][k]`。
pub(crate) fn wave_speed_derivs(
    gas: &IdealGasModel,
    left: &SideState,
    right: &SideState,
    speeds: &WaveSpeeds,
    n: DVec2,
) -> ([[f64; NVARS]; 2], [[f64; NVARS]; 2]) {
    let avg = roe_averages(gas, left, right, n);
    let dav = roe_average_derivs(gas, left, right, &avg, n);

    let mut dsl = [[0.0; NVARS]; 2];
    let mut dsr = [[0.0; NVARS]; 2];
    for k in 0..NVARS {
        if speeds.sl_physical {
            dsl[0][k] = left.dvn[k] - left.dc[k];
        } else {
            dsl[0][k] = dav.vn[0][k] - dav.c[0][k];
            dsl[1][k] = dav.vn[1][k] - dav.c[1][k];
        }
        if speeds.sr_physical {
            dsr[1][k] = right.dvn[k] + right.dc[k];
        } else {
            dsr[0][k] = dav.vn[0][k] + dav.c[0][k];
            dsr[1][k] = dav.vn[1][k] + dav.c[1][k];
        }
    }
    (dsl, dsr)
}

impl HllScheme {
    /// 创建格式
    pub fn new(gas: IdealGasModel) -> Self {
        Self { gas }
    }
}

impl RiemannScheme for HllScheme {
    fn name(&self) -> &'static str {
        "HLL"
    }

    fn get_flux(&self, ul: &Cons, ur: &Cons, n: DVec2, flux: &mut Cons) {
        let left = SideState::evaluate(&self.gas, ul, n);
        let right = SideState::evaluate(&self.gas, ur, n);
        let speeds = wave_speeds(&self.gas, &left, &right, n);

        if speeds.sl > 0.0 {
            *flux = self.gas.euler_flux(ul, n);
        } else if speeds.sr < 0.0 {
            *flux = self.gas.euler_flux(ur, n);
        } else {
            let fl = self.gas.euler_flux(ul, n);
            let fr = self.gas.euler_flux(ur, n);
            let inv = 1.0 / (speeds.sr - speeds.sl);
            for k in 0..NVARS {
                flux[k] = (speeds.sr * fl[k] - speeds.sl * fr[k]
                    + speeds.sl * speeds.sr * (ur[k] - ul[k]))
                    * inv;
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
        let fl = self.gas.euler_flux(ul, n);
        let fr = self.gas.euler_flux(ur, n);
        let al = self.gas.euler_flux_jacobian(ul, n);
        let ar = self.gas.euler_flux_jacobian(ur, n);

        let (sl, sr) = (speeds.sl, speeds.sr);
        let inv = 1.0 / (sr - sl);

        for side in 0..2 {
            for k in 0..NVARS {
                let dsl_k = dsl[side][k];
                let dsr_k = dsr[side][k];
                let dd = dsr_k - dsl_k;
                for i in 0..NVARS {
                    let du = ur[i] - ul[i];
                    let ddu = match (side, i == k) {
                        (0, true) => -1.0,
                        (1, true) => 1.0,
                        _ => 0.0,
                    };
                    let da_l = if side == 0 { al[i][k] } else { 0.0 };
                    let da_r = if side == 1 { ar[i][k] } else { 0.0 };

                    let numer = sr * fl[i] - sl * fr[i] + sl * sr * du;
                    let dnumer = dsr_k * fl[i] + sr * da_l - dsl_k * fr[i] - sl * da_r
                        + (dsl_k * sr + sl * dsr_k) * du
                        + sl * sr * ddu;
                    let d = dnumer * inv - numer * dd * inv * inv;

                    if side == 0 {
                        dfdl[i][k] = -d;
                    } else {
                        dfdr[i][k] = d;
                    }
                }
            }
        }
    }
}
