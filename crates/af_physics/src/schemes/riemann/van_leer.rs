// crates/af_physics/src/schemes/riemann/van_leer.rs

//! Van Leer 通量矢量分裂
//!
//! F = F⁺(uL) + F⁻(uR)。法向 Mach 数超声速时退化为单侧解析通量，
//! 亚声速时使用标准 Van Leer 分裂多项式。Jacobian 为逐分支精确线化。

use glam::DVec2;

use super::{RiemannScheme, SideState};
use crate::gas::IdealGasModel;
use crate::state::{Cons, Jac, NVARS};

/// Van Leer 分裂通量
#[derive(Debug, Clone, Copy)]
pub struct VanLeerScheme {
    gas: IdealGasModel,
}

/// 分裂方向
#[derive(Clone, Copy, PartialEq)]
enum Split {
    Plus,
    Minus,
}

impl VanLeerScheme {
    /// 创建格式
    pub fn new(gas: IdealGasModel) -> Self {
        Self { gas }
    }

    /// 亚声速分裂通量
    ///
    /// F± 的质量分量 ±ρc(M±1)²/4，动量与能量分量按标准 Van Leer 公式。
    fn split_flux(&self, s: &SideState, n: DVec2, split: Split) -> Cons {
        let g = self.gas.gamma;
        let sgn = match split {
            Split::Plus => 1.0,
            Split::Minus => -1.0,
        };
        let m = s.vn / s.c;
        // fmass = ±ρc(M±1)²/4
        let fmass = sgn * s.rho * s.c * (m + sgn) * (m + sgn) / 4.0;
        // 动量方向修正项 (−vn ± 2c)/γ
        let vcorr = (-s.vn + sgn * 2.0 * s.c) / g;
        // 能量括号 ((γ−1)vn ± 2c)²/(2(γ²−1)) + (|v|²−vn²)/2
        let acoustic = (g - 1.0) * s.vn + sgn * 2.0 * s.c;
        let energy = acoustic * acoustic / (2.0 * (g * g - 1.0))
            + 0.5 * (s.vx * s.vx + s.vy * s.vy - s.vn * s.vn);
        [
            fmass,
            fmass * (s.vx + n.x * vcorr),
            fmass * (s.vy + n.y * vcorr),
            fmass * energy,
        ]
    }

    /// 亚声速分裂通量的 Jacobian（∂F±/∂u，对本侧状态）
    fn split_flux_jacobian(&self, s: &SideState, n: DVec2, split: Split) -> Jac {
        let g = self.gas.gamma;
        let sgn = match split {
            Split::Plus => 1.0,
            Split::Minus => -1.0,
        };
        let m = s.vn / s.c;
        let fmass = sgn * s.rho * s.c * (m + sgn) * (m + sgn) / 4.0;
        let vcorr = (-s.vn + sgn * 2.0 * s.c) / g;
        let acoustic = (g - 1.0) * s.vn + sgn * 2.0 * s.c;
        let energy = acoustic * acoustic / (2.0 * (g * g - 1.0))
            + 0.5 * (s.vx * s.vx + s.vy * s.vy - s.vn * s.vn);

        let bx = s.vx + n.x * vcorr;
        let by = s.vy + n.y * vcorr;

        let mut jac = [[0.0; NVARS]; NVARS];
        for k in 0..NVARS {
            let drho = if k == 0 { 1.0 } else { 0.0 };
            // fmass = ±ρ(vn ± c)²/(4c)
            let q = s.vn + sgn * s.c;
            let dq = s.dvn[k] + sgn * s.dc[k];
            let dfmass = sgn
                * (drho * q * q / (4.0 * s.c) + s.rho * q * dq / (2.0 * s.c)
                    - s.rho * q * q * s.dc[k] / (4.0 * s.c * s.c));

            let dvcorr = (-s.dvn[k] + sgn * 2.0 * s.dc[k]) / g;
            let dbx = s.dvx[k] + n.x * dvcorr;
            let dby = s.dvy[k] + n.y * dvcorr;
            let denergy = acoustic * ((g - 1.0) * s.dvn[k] + sgn * 2.0 * s.dc[k])
                / (g * g - 1.0)
                + s.vx * s.dvx[k]
                + s.vy * s.dvy[k]
                - s.vn * s.dvn[k];

            jac[0][k] = dfmass;
            jac[1][k] = dfmass * bx + fmass * dbx;
            jac[2][k] = dfmass * by + fmass * dby;
            jac[3][k] = dfmass * energy + fmass * denergy;
        }
        jac
    }
}

impl RiemannScheme for VanLeerScheme {
    fn name(&self) -> &'static str {
        "VanLeer"
    }

    fn get_flux(&self, ul: &Cons, ur: &Cons, n: DVec2, flux: &mut Cons) {
        let left = SideState::evaluate(&self.gas, ul, n);
        let right = SideState::evaluate(&self.gas, ur, n);
        let ml = left.vn / left.c;
        let mr = right.vn / right.c;

        let fplus = if ml >= 1.0 {
            self.gas.euler_flux(ul, n)
        } else if ml <= -1.0 {
            [0.0; NVARS]
        } else {
            self.split_flux(&left, n, Split::Plus)
        };

        let fminus = if mr <= -1.0 {
            self.gas.euler_flux(ur, n)
        } else if mr >= 1.0 {
            [0.0; NVARS]
        } else {
            self.split_flux(&right, n, Split::Minus)
        };

        for k in 0..NVARS {
            flux[k] = fplus[k] + fminus[k];
        }
    }

    fn get_jacobian(&self, ul: &Cons, ur: &Cons, n: DVec2, dfdl: &mut Jac, dfdr: &mut Jac) {
        let left = SideState::evaluate(&self.gas, ul, n);
        let right = SideState::evaluate(&self.gas, ur, n);
        let ml = left.vn / left.c;
        let mr = right.vn / right.c;

        let jplus = if ml >= 1.0 {
            self.gas.euler_flux_jacobian(ul, n)
        } else if ml <= -1.0 {
            [[0.0; NVARS]; NVARS]
        } else {
            self.split_flux_jacobian(&left, n, Split::Plus)
        };

        let jminus = if mr <= -1.0 {
            self.gas.euler_flux_jacobian(ur, n)
        } else if mr >= 1.0 {
            [[0.0; NVARS]; NVARS]
        } else {
            self.split_flux_jacobian(&right, n, Split::Minus)
        };

        for i in 0..NVARS {
            for k in 0..NVARS {
                dfdl[i][k] = -jplus[i][k];
                dfdr[i][k] = jminus[i][k];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemes::riemann::testing;

    #[test]
    fn test_consistency() {
        let scheme = VanLeerScheme::new(testing::test_gas());
        testing::check_consistency(&scheme, 1e-13);
    }

    #[test]
    fn test_conservation() {
        let scheme = VanLeerScheme::new(testing::test_gas());
        testing::check_conservation(&scheme, 1e-13);
    }

    #[test]
    fn test_jacobian_fd() {
        let scheme = VanLeerScheme::new(testing::test_gas());
        testing::check_jacobian_fd(&scheme, 1e-7);
    }

    #[test]
    fn test_supersonic_upwinding() {
        // 右行超声速：通量完全取左侧
        let gas = testing::test_gas();
        let scheme = VanLeerScheme::new(gas);
        let ul = [1.0, 1.8, 0.0, 3.4];
        let ur = [0.5, -0.2, 0.05, 1.1];
        let n = DVec2::new(1.0, 0.0);
        let mut flux = [0.0; 4];
        scheme.get_flux(&ul, &ur, n, &mut flux);
        let exact = gas.euler_flux(&ul, n);
        for k in 0..4 {
            assert!((flux[k] - exact[k]).abs() < 1e-13);
        }
    }

    #[test]
    fn test_split_fluxes_sum_to_full_flux() {
        // 亚声速时 F⁺(u) + F⁻(u) = F(u)
        let gas = testing::test_gas();
        let scheme = VanLeerScheme::new(gas);
        let u = [1.2, 0.36, -0.12, 2.1];
        let n = DVec2::new(0.6, 0.8);
        let s = SideState::evaluate(&gas, &u, n);
        let plus = scheme.split_flux(&s, n, Split::Plus);
        let minus = scheme.split_flux(&s, n, Split::Minus);
        let exact = gas.euler_flux(&u, n);
        for k in 0..4 {
            assert!(
                (plus[k] + minus[k] - exact[k]).abs() < 1e-13,
                "分量 {}",
                k
            );
        }
    }
}
