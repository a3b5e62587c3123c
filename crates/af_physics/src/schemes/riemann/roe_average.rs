// crates/af_physics/src/schemes/riemann/roe_average.rs

//! Roe 平均量及其对守恒量的导数
//!
//! Roe、HLL、HLLC 共享：密度平方根加权平均
//! ρ̃ = √(ρL ρR)，ṽ = (√ρL vL + √ρR vR)/(√ρL + √ρR)，H̃ 同理，
//! c̃ = √((γ-1)(H̃ - |ṽ|²/2))。

use glam::DVec2;

use super::SideState;
use crate::gas::IdealGasModel;
use crate::state::NVARS;

/// Roe 平均量
#[derive(Debug, Clone, Copy)]
pub(crate) struct RoeAverages {
    /// √(ρR/ρL)
    pub r: f64,
    pub rho: f64,
    pub vx: f64,
    pub vy: f64,
    /// |ṽ|²
    pub vm2: f64,
    /// ṽ·n
    pub vn: f64,
    pub h: f64,
    pub c: f64,
}

/// Roe 平均量对左右守恒量的导数
///
/// 下标 `[side][k]`，side 0 为左、1 为右。
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RoeAverageDerivs {
    pub rho: [[f64; NVARS]; 2],
    pub vx: [[f64; NVARS]; 2],
    pub vy: [[f64; NVARS]; 2],
    pub vm2: [[f64; NVARS]; 2],
    pub vn: [[f64; NVARS]; 2],
    pub h: [[f64; NVARS]; 2],
    pub c: [[f64; NVARS]; 2],
}

/// 计算 Roe 平均量
pub(crate) fn roe_averages(
    gas: &IdealGasModel,
    left: &SideState,
    right: &SideState,
    n: DVec2,
) -> RoeAverages {
    let r = (right.rho / left.rho).sqrt();
    let rho = r * left.rho;
    let denom = r + 1.0;
    let vx = (r * right.vx + left.vx) / denom;
    let vy = (r * right.vy + left.vy) / denom;
    let h = (r * right.h + left.h) / denom;
    let vm2 = vx * vx + vy * vy;
    let vn = vx * n.x + vy * n.y;
    let c = ((gas.gamma - 1.0) * (h - 0.5 * vm2)).sqrt();
    RoeAverages {
        r,
        rho,
        vx,
        vy,
        vm2,
        vn,
        h,
        c,
    }
}

/// 计算 Roe 平均量的导数
pub(crate) fn roe_average_derivs(
    gas: &IdealGasModel,
    left: &SideState,
    right: &SideState,
    avg: &RoeAverages,
    n: DVec2,
) -> RoeAverageDerivs {
    let mut d = RoeAverageDerivs::default();

    // dR: R² = ρR/ρL
    let mut dr = [[0.0; NVARS]; 2];
    dr[0][0] = -0.5 * avg.r / left.rho;
    dr[1][0] = 0.5 * avg.r / right.rho;

    let denom = avg.r + 1.0;
    for side in 0..2 {
        let this = if side == 0 { left } else { right };
        for k in 0..NVARS {
            let drho_self = if k == 0 { 1.0 } else { 0.0 };

            // ρ̃ = R ρL
            d.rho[side][k] = dr[side][k] * left.rho
                + if side == 0 { avg.r * drho_self } else { 0.0 };

            // 加权平均 q̃ = (R qR + qL)/(R+1):
            // dq̃ = dR (qR - q̃)/(R+1) + (本侧权重) dq/(R+1)
            let weight = if side == 0 { 1.0 } else { avg.r };
            d.vx[side][k] = dr[side][k] * (right.vx - avg.vx) / denom
                + weight * this.dvx[k] / denom;
            d.vy[side][k] = dr[side][k] * (right.vy - avg.vy) / denom
                + weight * this.dvy[k] / denom;
            d.h[side][k] =
                dr[side][k] * (right.h - avg.h) / denom + weight * this.dh[k] / denom;

            d.vm2[side][k] = 2.0 * (avg.vx * d.vx[side][k] + avg.vy * d.vy[side][k]);
            d.vn[side][k] = d.vx[side][k] * n.x + d.vy[side][k] * n.y;
            d.c[side][k] =
                (gas.gamma - 1.0) * (d.h[side][k] - 0.5 * d.vm2[side][k]) / (2.0 * avg.c);
        }
    }

    d
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemes::riemann::testing::test_gas;
    use crate::state::Cons;

    fn averages_of(gas: &IdealGasModel, ul: &Cons, ur: &Cons, n: DVec2) -> RoeAverages {
        let left = SideState::evaluate(gas, ul, n);
        let right = SideState::evaluate(gas, ur, n);
        roe_averages(gas, &left, &right, n)
    }

    #[test]
    fn test_equal_states_reduce_to_point_values() {
        let gas = test_gas();
        let u: Cons = [1.2, 0.36, -0.12, 2.1];
        let n = DVec2::new(0.6, 0.8);
        let left = SideState::evaluate(&gas, &u, n);
        let avg = averages_of(&gas, &u, &u, n);
        assert!((avg.rho - u[0]).abs() < 1e-13);
        assert!((avg.vx - left.vx).abs() < 1e-13);
        assert!((avg.h - left.h).abs() < 1e-13);
        assert!((avg.c - left.c).abs() < 1e-13);
    }

    #[test]
    fn test_derivs_match_fd() {
        let gas = test_gas();
        let ul: Cons = [1.0, 0.3, 0.1, 2.2];
        let ur: Cons = [0.5, -0.2, 0.05, 1.1];
        let n = DVec2::new(0.6, 0.8);
        let h = 1e-7;

        let left = SideState::evaluate(&gas, &ul, n);
        let right = SideState::evaluate(&gas, &ur, n);
        let avg = roe_averages(&gas, &left, &right, n);
        let derivs = roe_average_derivs(&gas, &left, &right, &avg, n);

        for side in 0..2 {
            for k in 0..NVARS {
                let (mut up, mut um) = (ul, ul);
                let (mut rp, mut rm) = (ur, ur);
                if side == 0 {
                    up[k] += h;
                    um[k] -= h;
                } else {
                    rp[k] += h;
                    rm[k] -= h;
                }
                let ap = averages_of(&gas, &up, &rp, n);
                let am = averages_of(&gas, &um, &rm, n);

                let checks = [
                    (derivs.rho[side][k], (ap.rho - am.rho) / (2.0 * h), "rho"),
                    (derivs.vx[side][k], (ap.vx - am.vx) / (2.0 * h), "vx"),
                    (derivs.vn[side][k], (ap.vn - am.vn) / (2.0 * h), "vn"),
                    (derivs.h[side][k], (ap.h - am.h) / (2.0 * h), "h"),
                    (derivs.c[side][k], (ap.c - am.c) / (2.0 * h), "c"),
                ];
                for (analytic, numeric, what) in checks {
                    assert!(
                        (analytic - numeric).abs() < 1e-6,
                        "{} side {} k {}: {} vs {}",
                        what,
                        side,
                        k,
                        analytic,
                        numeric
                    );
                }
            }
        }
    }
}
