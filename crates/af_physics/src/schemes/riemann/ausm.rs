// crates/af_physics/src/schemes/riemann/ausm.rs

//! AUSM 族通量
//!
//! - [`AusmScheme`]: Liou-Steffen 对流/压强分裂，Mach 数按各侧自身声速
//! - [`AusmPlusScheme`]: Liou AUSM+，界面声速取两侧平均，
//!   Mach/压强多项式系数 β = 1/8、α = 3/16
//!
//! 两者的对流分裂解析 Jacobian 不可用，`get_jacobian` 退化为
//! 冻结谱半径的 Rusanov 线化（见 af_config 文档与 DESIGN.md）。

use glam::DVec2;

use super::llf::LlfScheme;
use super::{RiemannScheme, SideState};
use crate::gas::IdealGasModel;
use crate::state::{Cons, Jac, NVARS};

/// AUSM+ 的 Mach 多项式系数 β
const AUSM_PLUS_BETA: f64 = 1.0 / 8.0;
/// AUSM+ 的压强多项式系数 α
const AUSM_PLUS_ALPHA: f64 = 3.0 / 16.0;

/// 对流通量向量 ρc(1, u, v, H)
#[inline]
fn convective_vector(s: &SideState) -> Cons {
    let rc = s.rho * s.c;
    [rc, rc * s.vx, rc * s.vy, rc * s.h]
}

// ============================================================
// Liou-Steffen AUSM
// ============================================================

/// Liou-Steffen AUSM 通量
#[derive(Debug, Clone, Copy)]
pub struct AusmScheme {
    gas: IdealGasModel,
    fallback: LlfScheme,
}

impl AusmScheme {
    /// 创建格式
    pub fn new(gas: IdealGasModel) -> Self {
        Self {
            gas,
            fallback: LlfScheme::new(gas),
        }
    }

    /// Mach 分裂 M⁺
    #[inline]
    fn mach_plus(m: f64) -> f64 {
        if m.abs() <= 1.0 {
            0.25 * (m + 1.0) * (m + 1.0)
        } else {
            0.5 * (m + m.abs())
        }
    }

    /// Mach 分裂 M⁻
    #[inline]
    fn mach_minus(m: f64) -> f64 {
        if m.abs() <= 1.0 {
            -0.25 * (m - 1.0) * (m - 1.0)
        } else {
            0.5 * (m - m.abs())
        }
    }

    /// 压强分裂 p⁺
    #[inline]
    fn pressure_plus(m: f64, p: f64) -> f64 {
        if m.abs() <= 1.0 {
            0.25 * p * (m + 1.0) * (m + 1.0) * (2.0 - m)
        } else {
            0.5 * p * (m + m.abs()) / m
        }
    }

    /// 压强分裂 p⁻
    #[inline]
    fn pressure_minus(m: f64, p: f64) -> f64 {
        if m.abs() <= 1.0 {
            0.25 * p * (m - 1.0) * (m - 1.0) * (2.0 + m)
        } else {
            0.5 * p * (m - m.abs()) / m
        }
    }
}

impl RiemannScheme for AusmScheme {
    fn name(&self) -> &'static str {
        "AUSM"
    }

    fn get_flux(&self, ul: &Cons, ur: &Cons, n: DVec2, flux: &mut Cons) {
        let left = SideState::evaluate(&self.gas, ul, n);
        let right = SideState::evaluate(&self.gas, ur, n);

        let ml = left.vn / left.c;
        let mr = right.vn / right.c;
        let m_half = Self::mach_plus(ml) + Self::mach_minus(mr);
        let p_half = Self::pressure_plus(ml, left.p) + Self::pressure_minus(mr, right.p);

        let psi_l = convective_vector(&left);
        let psi_r = convective_vector(&right);

        // 对流部分按 m_half 符号迎风
        for k in 0..NVARS {
            flux[k] = 0.5 * m_half * (psi_l[k] + psi_r[k])
                - 0.5 * m_half.abs() * (psi_r[k] - psi_l[k]);
        }
        flux[1] += p_half * n.x;
        flux[2] += p_half * n.y;
    }

    fn get_jacobian(&self, ul: &Cons, ur: &Cons, n: DVec2, dfdl: &mut Jac, dfdr: &mut Jac) {
        // 对流分裂 Jacobian 不可用，使用 Rusanov 线化
        self.fallback.get_jacobian(ul, ur, n, dfdl, dfdr);
    }
}

// ============================================================
// Liou AUSM+
// ============================================================

/// Liou AUSM+ 通量
#[derive(Debug, Clone, Copy)]
pub struct AusmPlusScheme {
    gas: IdealGasModel,
    fallback: LlfScheme,
}

impl AusmPlusScheme {
    /// 创建格式
    pub fn new(gas: IdealGasModel) -> Self {
        Self {
            gas,
            fallback: LlfScheme::new(gas),
        }
    }

    /// 四阶 Mach 分裂 M⁺₄
    #[inline]
    fn mach_plus(m: f64) -> f64 {
        if m.abs() >= 1.0 {
            0.5 * (m + m.abs())
        } else {
            let q = m * m - 1.0;
            0.25 * (m + 1.0) * (m + 1.0) + AUSM_PLUS_BETA * q * q
        }
    }

    /// 四阶 Mach 分裂 M⁻₄
    #[inline]
    fn mach_minus(m: f64) -> f64 {
        if m.abs() >= 1.0 {
            0.5 * (m - m.abs())
        } else {
            let q = m * m - 1.0;
            -0.25 * (m - 1.0) * (m - 1.0) - AUSM_PLUS_BETA * q * q
        }
    }

    /// 五阶压强分裂 P⁺₅
    #[inline]
    fn pressure_plus(m: f64) -> f64 {
        if m.abs() >= 1.0 {
            0.5 * (1.0 + m.signum())
        } else {
            let q = m * m - 1.0;
            0.25 * (m + 1.0) * (m + 1.0) * (2.0 - m) + AUSM_PLUS_ALPHA * m * q * q
        }
    }

    /// 五阶压强分裂 P⁻₅
    #[inline]
    fn pressure_minus(m: f64) -> f64 {
        if m.abs() >= 1.0 {
            0.5 * (1.0 - m.signum())
        } else {
            let q = m * m - 1.0;
            0.25 * (m - 1.0) * (m - 1.0) * (2.0 + m) - AUSM_PLUS_ALPHA * m * q * q
        }
    }
}

impl RiemannScheme for AusmPlusScheme {
    fn name(&self) -> &'static str {
        "AUSM+"
    }

    fn get_flux(&self, ul: &Cons, ur: &Cons, n: DVec2, flux: &mut Cons) {
        let left = SideState::evaluate(&self.gas, ul, n);
        let right = SideState::evaluate(&self.gas, ur, n);

        // 界面声速取两侧平均
        let a_half = 0.5 * (left.c + right.c);
        let ml = left.vn / a_half;
        let mr = right.vn / a_half;

        let m_half = Self::mach_plus(ml) + Self::mach_minus(mr);
        let p_half = Self::pressure_plus(ml) * left.p + Self::pressure_minus(mr) * right.p;

        // 质量通量 ṁ = a_half · m_half · ρ_迎风
        let mdot = a_half
            * if m_half >= 0.0 {
                m_half * left.rho
            } else {
                m_half * right.rho
            };

        let up = if m_half >= 0.0 { &left } else { &right };
        flux[0] = mdot;
        flux[1] = mdot * up.vx + p_half * n.x;
        flux[2] = mdot * up.vy + p_half * n.y;
        flux[3] = mdot * up.h;
    }

    fn get_jacobian(&self, ul: &Cons, ur: &Cons, n: DVec2, dfdl: &mut Jac, dfdr: &mut Jac) {
        // 对流分裂 Jacobian 不可用，使用 Rusanov 线化
        self.fallback.get_jacobian(ul, ur, n, dfdl, dfdr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemes::riemann::testing;

    #[test]
    fn test_ausm_consistency() {
        let scheme = AusmScheme::new(testing::test_gas());
        testing::check_consistency(&scheme, 1e-13);
    }

    #[test]
    fn test_ausm_conservation() {
        let scheme = AusmScheme::new(testing::test_gas());
        testing::check_conservation(&scheme, 1e-13);
    }

    #[test]
    fn test_ausm_plus_consistency() {
        let scheme = AusmPlusScheme::new(testing::test_gas());
        testing::check_consistency(&scheme, 1e-13);
    }

    #[test]
    fn test_ausm_plus_conservation() {
        let scheme = AusmPlusScheme::new(testing::test_gas());
        testing::check_conservation(&scheme, 1e-13);
    }

    #[test]
    fn test_ausm_supersonic_upwinding() {
        let gas = testing::test_gas();
        let scheme = AusmScheme::new(gas);
        let ul = [1.0, 1.8, 0.0, 3.4];
        let ur = [0.5, -0.2, 0.05, 1.1];
        let n = DVec2::new(1.0, 0.0);
        let mut flux = [0.0; 4];
        scheme.get_flux(&ul, &ur, n, &mut flux);
        let exact = gas.euler_flux(&ul, n);
        for k in 0..4 {
            assert!((flux[k] - exact[k]).abs() < 1e-12, "分量 {}", k);
        }
    }

    #[test]
    fn test_jacobian_fallback_matches_llf() {
        let gas = testing::test_gas();
        let ausm = AusmScheme::new(gas);
        let llf = LlfScheme::new(gas);
        let ul = [1.0, 0.3, 0.1, 2.2];
        let ur = [0.5, -0.2, 0.05, 1.1];
        let n = DVec2::new(0.6, 0.8);

        let mut a_l = [[0.0; 4]; 4];
        let mut a_r = [[0.0; 4]; 4];
        let mut l_l = [[0.0; 4]; 4];
        let mut l_r = [[0.0; 4]; 4];
        ausm.get_jacobian(&ul, &ur, n, &mut a_l, &mut a_r);
        llf.get_jacobian(&ul, &ur, n, &mut l_l, &mut l_r);
        assert_eq!(a_l, l_l);
        assert_eq!(a_r, l_r);
    }

    #[test]
    fn test_mach_splittings_sum() {
        // M⁺(M) + M⁻(M) = M（两族均成立）
        for &m in &[-1.7, -0.8, -0.2, 0.0, 0.4, 0.95, 1.3] {
            assert!((AusmScheme::mach_plus(m) + AusmScheme::mach_minus(m) - m).abs() < 1e-14);
            assert!(
                (AusmPlusScheme::mach_plus(m) + AusmPlusScheme::mach_minus(m) - m).abs() < 1e-14
            );
        }
        // P⁺ + P⁻ = 1 (AUSM+)
        for &m in &[-1.2, -0.5, 0.0, 0.7, 1.6] {
            assert!(
                (AusmPlusScheme::pressure_plus(m) + AusmPlusScheme::pressure_minus(m) - 1.0)
                    .abs()
                    < 1e-14
            );
        }
    }
}
