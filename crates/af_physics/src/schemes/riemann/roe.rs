// crates/af_physics/src/schemes/riemann/roe.rs

//! Roe-Pike 通量差分裂
//!
//! 耗散按 Roe 平均的三组波（声学−、熵/剪切、声学+）展开，
//! Harten 熵修正仅作用于两个声学特征值：
//! |λ| < ε 时 |λ| ← (λ² + ε²)/(2ε)。
//! Jacobian 为完整精确线化，包含 Roe 平均量的导数。

use glam::DVec2;

use super::roe_average::{roe_average_derivs, roe_averages};
use super::{RiemannScheme, SideState};
use crate::gas::IdealGasModel;
use crate::state::{Cons, Jac, NVARS};

/// Roe-Pike 通量
#[derive(Debug, Clone, Copy)]
pub struct RoeScheme {
    gas: IdealGasModel,
    /// Harten 熵修正参数 ε
    fix_eps: f64,
}

impl RoeScheme {
    /// 创建格式
    pub fn new(gas: IdealGasModel, fix_eps: f64) -> Self {
        Self { gas, fix_eps }
    }

    /// 熵修正后的特征值模
    #[inline]
    fn fixed_abs(&self, lambda: f64) -> f64 {
        if lambda.abs() >= self.fix_eps {
            lambda.abs()
        } else {
            (lambda * lambda + self.fix_eps * self.fix_eps) / (2.0 * self.fix_eps)
        }
    }

    /// 熵修正特征值模对原始特征值的导数
    #[inline]
    fn fixed_abs_deriv(&self, lambda: f64) -> f64 {
        if lambda.abs() >= self.fix_eps {
            lambda.signum()
        } else {
            lambda / self.fix_eps
        }
    }
}

impl RiemannScheme for RoeScheme {
    fn name(&self) -> &'static str {
        "Roe"
    }

    fn get_flux(&self, ul: &Cons, ur: &Cons, n: DVec2, flux: &mut Cons) {
        let left = SideState::evaluate(&self.gas, ul, n);
        let right = SideState::evaluate(&self.gas, ur, n);
        let avg = roe_averages(&self.gas, &left, &right, n);

        let d_rho = right.rho - left.rho;
        let d_p = right.p - left.p;
        let d_vn = right.vn - left.vn;
        let d_vx = right.vx - left.vx;
        let d_vy = right.vy - left.vy;

        let a1 = self.fixed_abs(avg.vn - avg.c);
        let a234 = avg.vn.abs();
        let a5 = self.fixed_abs(avg.vn + avg.c);

        let c2 = avg.c * avg.c;
        let w1 = (d_p - avg.rho * avg.c * d_vn) / (2.0 * c2);
        let w5 = (d_p + avg.rho * avg.c * d_vn) / (2.0 * c2);
        let w2 = d_rho - d_p / c2;

        let r1 = [
            1.0,
            avg.vx - avg.c * n.x,
            avg.vy - avg.c * n.y,
            avg.h - avg.c * avg.vn,
        ];
        let r2 = [1.0, avg.vx, avg.vy, 0.5 * avg.vm2];
        let r3 = [
            0.0,
            d_vx - d_vn * n.x,
            d_vy - d_vn * n.y,
            avg.vx * d_vx + avg.vy * d_vy - avg.vn * d_vn,
        ];
        let r5 = [
            1.0,
            avg.vx + avg.c * n.x,
            avg.vy + avg.c * n.y,
            avg.h + avg.c * avg.vn,
        ];

        let fl = self.gas.euler_flux(ul, n);
        let fr = self.gas.euler_flux(ur, n);
        for i in 0..NVARS {
            let diss = a1 * w1 * r1[i] + a234 * (w2 * r2[i] + avg.rho * r3[i]) + a5 * w5 * r5[i];
            flux[i] = 0.5 * (fl[i] + fr[i]) - 0.5 * diss;
        }
    }

    fn get_jacobian(&self, ul: &Cons, ur: &Cons, n: DVec2, dfdl: &mut Jac, dfdr: &mut Jac) {
        let left = SideState::evaluate(&self.gas, ul, n);
        let right = SideState::evaluate(&self.gas, ur, n);
        let avg = roe_averages(&self.gas, &left, &right, n);
        let dav = roe_average_derivs(&self.gas, &left, &right, &avg, n);

        let d_rho = right.rho - left.rho;
        let d_p = right.p - left.p;
        let d_vn = right.vn - left.vn;
        let d_vx = right.vx - left.vx;
        let d_vy = right.vy - left.vy;

        let lam1 = avg.vn - avg.c;
        let lam5 = avg.vn + avg.c;
        let a1 = self.fixed_abs(lam1);
        let a234 = avg.vn.abs();
        let a5 = self.fixed_abs(lam5);

        let c2 = avg.c * avg.c;
        let w1 = (d_p - avg.rho * avg.c * d_vn) / (2.0 * c2);
        let w5 = (d_p + avg.rho * avg.c * d_vn) / (2.0 * c2);
        let w2 = d_rho - d_p / c2;

        let r1 = [
            1.0,
            avg.vx - avg.c * n.x,
            avg.vy - avg.c * n.y,
            avg.h - avg.c * avg.vn,
        ];
        let r2 = [1.0, avg.vx, avg.vy, 0.5 * avg.vm2];
        let r3 = [
            0.0,
            d_vx - d_vn * n.x,
            d_vy - d_vn * n.y,
            avg.vx * d_vx + avg.vy * d_vy - avg.vn * d_vn,
        ];
        let r5 = [
            1.0,
            avg.vx + avg.c * n.x,
            avg.vy + avg.c * n.y,
            avg.h + avg.c * avg.vn,
        ];

        let al = self.gas.euler_flux_jacobian(ul, n);
        let ar = self.gas.euler_flux_jacobian(ur, n);

        for side in 0..2 {
            let this = if side == 0 { &left } else { &right };
            // 跳跃量导数符号：左侧 −，右侧 +
            let sgn = if side == 0 { -1.0 } else { 1.0 };

            for k in 0..NVARS {
                let dd_rho = sgn * if k == 0 { 1.0 } else { 0.0 };
                let dd_p = sgn * this.dp[k];
                let dd_vn = sgn * this.dvn[k];
                let dd_vx = sgn * this.dvx[k];
                let dd_vy = sgn * this.dvy[k];

                let d_c = dav.c[side][k];
                let d_rho_avg = dav.rho[side][k];
                let d_vn_avg = dav.vn[side][k];
                let d_vx_avg = dav.vx[side][k];
                let d_vy_avg = dav.vy[side][k];
                let d_h_avg = dav.h[side][k];

                let da1 = self.fixed_abs_deriv(lam1) * (d_vn_avg - d_c);
                let da234 = avg.vn.signum() * d_vn_avg;
                let da5 = self.fixed_abs_deriv(lam5) * (d_vn_avg + d_c);

                // w1, w5 = (Δp ∓∓ ρ̃c̃Δvn)/(2c̃²)
                let d_rc = d_rho_avg * avg.c + avg.rho * d_c;
                let dw1 = (dd_p - d_rc * d_vn - avg.rho * avg.c * dd_vn) / (2.0 * c2)
                    - (d_p - avg.rho * avg.c * d_vn) * d_c / (c2 * avg.c);
                let dw5 = (dd_p + d_rc * d_vn + avg.rho * avg.c * dd_vn) / (2.0 * c2)
                    - (d_p + avg.rho * avg.c * d_vn) * d_c / (c2 * avg.c);
                let dw2 = dd_rho - dd_p / c2 + 2.0 * d_p * d_c / (c2 * avg.c);

                let dr1 = [
                    0.0,
                    d_vx_avg - d_c * n.x,
                    d_vy_avg - d_c * n.y,
                    d_h_avg - d_c * avg.vn - avg.c * d_vn_avg,
                ];
                let dr2 = [0.0, d_vx_avg, d_vy_avg, 0.5 * dav.vm2[side][k]];
                let dr3 = [
                    0.0,
                    dd_vx - dd_vn * n.x,
                    dd_vy - dd_vn * n.y,
                    d_vx_avg * d_vx + avg.vx * dd_vx + d_vy_avg * d_vy + avg.vy * dd_vy
                        - d_vn_avg * d_vn
                        - avg.vn * dd_vn,
                ];
                let dr5 = [
                    0.0,
                    d_vx_avg + d_c * n.x,
                    d_vy_avg + d_c * n.y,
                    d_h_avg + d_c * avg.vn + avg.c * d_vn_avg,
                ];

                for i in 0..NVARS {
                    let ddiss = da1 * w1 * r1[i]
                        + a1 * (dw1 * r1[i] + w1 * dr1[i])
                        + da234 * (w2 * r2[i] + avg.rho * r3[i])
                        + a234
                            * (dw2 * r2[i] + w2 * dr2[i] + d_rho_avg * r3[i] + avg.rho * dr3[i])
                        + da5 * w5 * r5[i]
                        + a5 * (dw5 * r5[i] + w5 * dr5[i]);

                    if side == 0 {
                        // ∂F/∂uL = ½A(uL) − ½ d(diss)
                        dfdl[i][k] = -(0.5 * al[i][k] - 0.5 * ddiss);
                    } else {
                        dfdr[i][k] = 0.5 * ar[i][k] - 0.5 * ddiss;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemes::riemann::testing;

    fn scheme() -> RoeScheme {
        RoeScheme::new(testing::test_gas(), 0.05)
    }

    #[test]
    fn test_consistency() {
        testing::check_consistency(&scheme(), 1e-13);
    }

    #[test]
    fn test_conservation() {
        testing::check_conservation(&scheme(), 1e-12);
    }

    #[test]
    fn test_jacobian_fd() {
        testing::check_jacobian_fd(&scheme(), 1e-7);
    }

    #[test]
    fn test_entropy_fix_caps_eigenvalue() {
        // |λ| < ε 时修正值位于 [ε/2, ε]，且在 |λ| = ε 处连续
        let s = scheme();
        assert!((s.fixed_abs(0.0) - 0.025).abs() < 1e-14);
        assert!((s.fixed_abs(0.05) - 0.05).abs() < 1e-14);
        assert!((s.fixed_abs(-0.05) - 0.05).abs() < 1e-14);
        let inside = s.fixed_abs(0.02);
        assert!(inside > 0.02 && inside <= 0.05);
    }

    #[test]
    fn test_sonic_rarefaction_has_dissipation() {
        // 声速点附近（λ₁ ≈ 0）耗散不为零：与未修正的 |λ₁| = 0 区分
        let gas = testing::test_gas();
        let s = RoeScheme::new(gas, 0.2);
        // 构造 vn ≈ c 的状态（λ₁ = vn − c ≈ 0）
        let u = gas.cons_from_prim(&[1.0, 1.0, 0.0, 1.0 / 1.4]);
        let mut ur = u;
        ur[0] *= 1.1;
        let n = DVec2::new(1.0, 0.0);

        let mut flux_fixed = [0.0; 4];
        s.get_flux(&u, &ur, n, &mut flux_fixed);
        let s0 = RoeScheme::new(gas, 1e-12);
        let mut flux_raw = [0.0; 4];
        s0.get_flux(&u, &ur, n, &mut flux_raw);
        // 两者应有可观差别（熵修正注入了耗散）
        let diff: f64 = (0..4).map(|k| (flux_fixed[k] - flux_raw[k]).abs()).sum();
        assert!(diff > 1e-6);
    }
}
