// crates/af_physics/src/schemes/riemann/llf.rs

//! 局部 Lax-Friedrichs（Rusanov）通量
//!
//! F = ½(F(uL) + F(uR)) − ½ λ_max (uR − uL)，
//! λ_max = max(|vn| + c)。
//!
//! 默认 Jacobian 冻结谱半径 λ_max（对无黏流动与精确线化表现相当），
//! [`LlfScheme::get_jacobian_exact`] 提供含 dλ 项的精确版本。

use glam::DVec2;

use super::{RiemannScheme, SideState};
use crate::gas::IdealGasModel;
use crate::state::{Cons, Jac, NVARS};

/// Rusanov 通量
#[derive(Debug, Clone, Copy)]
pub struct LlfScheme {
    gas: IdealGasModel,
}

impl LlfScheme {
    /// 创建格式
    pub fn new(gas: IdealGasModel) -> Self {
        Self { gas }
    }

    /// 谱半径及其归属侧（true = 左侧取得最大值）
    #[inline]
    fn spectral_radius(left: &SideState, right: &SideState) -> (f64, bool) {
        let lam_l = left.vn.abs() + left.c;
        let lam_r = right.vn.abs() + right.c;
        if lam_l >= lam_r {
            (lam_l, true)
        } else {
            (lam_r, false)
        }
    }

    /// 精确 Jacobian（含谱半径的导数项）
    pub fn get_jacobian_exact(
        &self,
        ul: &Cons,
        ur: &Cons,
        n: DVec2,
        dfdl: &mut Jac,
        dfdr: &mut Jac,
    ) {
        let left = SideState::evaluate(&self.gas, ul, n);
        let right = SideState::evaluate(&self.gas, ur, n);
        let (lambda, from_left) = Self::spectral_radius(&left, &right);

        let al = self.gas.euler_flux_jacobian(ul, n);
        let ar = self.gas.euler_flux_jacobian(ur, n);

        // dλ 只在取得最大值的一侧非零
        let mut dlam_l = [0.0; NVARS];
        let mut dlam_r = [0.0; NVARS];
        if from_left {
            let sign = left.vn.signum();
            for k in 0..NVARS {
                dlam_l[k] = sign * left.dvn[k] + left.dc[k];
            }
        } else {
            let sign = right.vn.signum();
            for k in 0..NVARS {
                dlam_r[k] = sign * right.dvn[k] + right.dc[k];
            }
        }

        for i in 0..NVARS {
            for k in 0..NVARS {
                let du = ur[i] - ul[i];
                let id = if i == k { 1.0 } else { 0.0 };
                // ∂F/∂uL = ½A(uL) + ½λI − ½ dλ_L (uR−uL)
                let dl = 0.5 * al[i][k] + 0.5 * lambda * id - 0.5 * dlam_l[k] * du;
                // ∂F/∂uR = ½A(uR) − ½λI − ½ dλ_R (uR−uL)
                let dr = 0.5 * ar[i][k] - 0.5 * lambda * id - 0.5 * dlam_r[k] * du;
                dfdl[i][k] = -dl;
                dfdr[i][k] = dr;
            }
        }
    }
}

impl RiemannScheme for LlfScheme {
    fn name(&self) -> &'static str {
        "LLF"
    }

    fn get_flux(&self, ul: &Cons, ur: &Cons, n: DVec2, flux: &mut Cons) {
        let left = SideState::evaluate(&self.gas, ul, n);
        let right = SideState::evaluate(&self.gas, ur, n);
        let (lambda, _) = Self::spectral_radius(&left, &right);

        let fl = self.gas.euler_flux(ul, n);
        let fr = self.gas.euler_flux(ur, n);
        for k in 0..NVARS {
            flux[k] = 0.5 * (fl[k] + fr[k]) - 0.5 * lambda * (ur[k] - ul[k]);
        }
    }

    fn get_jacobian(&self, ul: &Cons, ur: &Cons, n: DVec2, dfdl: &mut Jac, dfdr: &mut Jac) {
        let left = SideState::evaluate(&self.gas, ul, n);
        let right = SideState::evaluate(&self.gas, ur, n);
        let (lambda, _) = Self::spectral_radius(&left, &right);

        let al = self.gas.euler_flux_jacobian(ul, n);
        let ar = self.gas.euler_flux_jacobian(ur, n);
        for i in 0..NVARS {
            for k in 0..NVARS {
                let id = if i == k { 1.0 } else { 0.0 };
                dfdl[i][k] = -(0.5 * al[i][k] + 0.5 * lambda * id);
                dfdr[i][k] = 0.5 * ar[i][k] - 0.5 * lambda * id;
            }
        }
    }
}
