// crates/af_physics/src/schemes/riemann/mod.rs

//! 无黏数值通量族
//!
//! 每个格式实现 [`RiemannScheme`]：给定面两侧守恒状态与单位法向，
//! 计算法向数值通量及其对两侧状态的 Jacobian。
//!
//! # Jacobian 符号约定
//!
//! `get_jacobian` 输出 `dfdl = -∂F/∂uL`、`dfdr = +∂F/∂uR`（均为赋值，
//! 覆盖原内容）。该约定使装配时下/上三角块无需再取负：
//! 面 f 对残差 Jacobian 的贡献为
//! `A[R,L] += ℓ·dfdl`、`A[L,R] += ℓ·dfdr`、
//! `A[L,L] -= ℓ·dfdl`、`A[R,R] -= ℓ·dfdr`。

mod ausm;
mod hll;
mod hllc;
mod llf;
mod roe;
mod roe_average;
mod van_leer;

pub use ausm::{AusmPlusScheme, AusmScheme};
pub use hll::HllScheme;
pub use hllc::HllcScheme;
pub use llf::LlfScheme;
pub use roe::RoeScheme;
pub use van_leer::VanLeerScheme;

use af_config::InviscidFluxKind;
use glam::DVec2;
use tracing::info;

use crate::gas::IdealGasModel;
use crate::state::{Cons, Jac};

/// 无黏数值通量接口
pub trait RiemannScheme: Send + Sync {
    /// 格式名称
    fn name(&self) -> &'static str;

    /// 计算面法向数值通量（赋值输出）
    ///
    /// # 参数
    /// - `ul`, `ur`: 面左右守恒状态
    /// - `n`: 单位法向（左指向右）
    /// - `flux`: 输出通量
    fn get_flux(&self, ul: &Cons, ur: &Cons, n: DVec2, flux: &mut Cons);

    /// 计算通量对两侧状态的 Jacobian（赋值输出）
    ///
    /// 符号约定见模块文档：`dfdl = -∂F/∂uL`，`dfdr = +∂F/∂uR`。
    fn get_jacobian(&self, ul: &Cons, ur: &Cons, n: DVec2, dfdl: &mut Jac, dfdr: &mut Jac);
}

/// 由配置枚举创建通量格式
///
/// `entropy_fix_eps` 仅 Roe 使用（Harten 熵修正参数）。
pub fn create_riemann_scheme(
    kind: InviscidFluxKind,
    gas: IdealGasModel,
    entropy_fix_eps: f64,
) -> Box<dyn RiemannScheme> {
    let scheme: Box<dyn RiemannScheme> = match kind {
        InviscidFluxKind::Llf => Box::new(LlfScheme::new(gas)),
        InviscidFluxKind::VanLeer => Box::new(VanLeerScheme::new(gas)),
        InviscidFluxKind::Ausm => Box::new(AusmScheme::new(gas)),
        InviscidFluxKind::AusmPlus => Box::new(AusmPlusScheme::new(gas)),
        InviscidFluxKind::Roe => Box::new(RoeScheme::new(gas, entropy_fix_eps)),
        InviscidFluxKind::Hll => Box::new(HllScheme::new(gas)),
        InviscidFluxKind::Hllc => Box::new(HllcScheme::new(gas)),
    };
    info!(scheme = scheme.name(), "选择无黏通量格式");
    scheme
}

/// 每侧状态的基本量及其对守恒量的导数
///
/// 各通量格式共享的链式法则前件。
#[derive(Debug, Clone, Copy)]
pub(crate) struct SideState {
    pub rho: f64,
    pub vx: f64,
    pub vy: f64,
    pub vn: f64,
    pub p: f64,
    pub c: f64,
    pub h: f64,
    pub dvx: [f64; 4],
    pub dvy: [f64; 4],
    pub dvn: [f64; 4],
    pub dp: [f64; 4],
    pub dc: [f64; 4],
    pub dh: [f64; 4],
}

impl SideState {
    /// 从守恒状态求值
    pub fn evaluate(gas: &IdealGasModel, u: &Cons, n: DVec2) -> Self {
        let rho = u[0];
        let vx = u[1] / rho;
        let vy = u[2] / rho;
        let vn = vx * n.x + vy * n.y;
        let p = gas.pressure(u);
        let c = gas.sound_speed(u);
        let h = (u[3] + p) / rho;

        let dp = gas.pressure_jacobian(u);
        let dc = gas.sound_speed_jacobian(u);
        let dvx = [-vx / rho, 1.0 / rho, 0.0, 0.0];
        let dvy = [-vy / rho, 0.0, 1.0 / rho, 0.0];
        let dvn = [-vn / rho, n.x / rho, n.y / rho, 0.0];
        let dh = [
            dp[0] / rho - h / rho,
            dp[1] / rho,
            dp[2] / rho,
            (1.0 + dp[3]) / rho,
        ];

        Self {
            rho,
            vx,
            vy,
            vn,
            p,
            c,
            h,
            dvx,
            dvy,
            dvn,
            dp,
            dc,
            dh,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! 通量格式共享的测试辅助

    use super::*;

    pub fn test_gas() -> IdealGasModel {
        IdealGasModel::new(1.4, 0.5, 288.15, 5.0e5, 0.72)
    }

    /// 一批覆盖亚/跨声速的状态对
    pub fn state_pairs() -> Vec<(Cons, Cons)> {
        let gas = test_gas();
        let uinf = gas.freestream_state(0.3);
        vec![
            // 近似均匀
            (uinf, [1.01, 0.52, 0.02, 1.82]),
            // 强间断
            ([1.0, 0.3, 0.1, 2.2], [0.5, -0.2, 0.05, 1.1]),
            // 超声速左行
            ([1.0, 1.8, 0.0, 3.4], [1.0, 1.7, 0.1, 3.2]),
            // 超声速右行
            ([0.8, -1.5, 0.2, 2.9], [0.9, -1.6, 0.1, 3.1]),
            // 剪切为主
            ([1.2, 0.12, 0.6, 2.4], [1.2, 0.12, -0.55, 2.4]),
        ]
    }

    /// 法向样本（单位圆上）
    pub fn normals() -> Vec<DVec2> {
        vec![
            DVec2::new(1.0, 0.0),
            DVec2::new(0.0, -1.0),
            DVec2::new(0.6, 0.8),
            DVec2::new(-0.8, 0.6),
        ]
    }

    /// 一致性：F(u,u,n) 等于解析 Euler 通量
    pub fn check_consistency(scheme: &dyn RiemannScheme, tol: f64) {
        let gas = test_gas();
        for (ul, _) in state_pairs() {
            for n in normals() {
                let exact = gas.euler_flux(&ul, n);
                let mut flux = [0.0; 4];
                scheme.get_flux(&ul, &ul, n, &mut flux);
                for k in 0..4 {
                    assert!(
                        (flux[k] - exact[k]).abs() < tol,
                        "{} 一致性失败: 分量 {} 得 {} 期望 {}",
                        scheme.name(),
                        k,
                        flux[k],
                        exact[k]
                    );
                }
            }
        }
    }

    /// 守恒性：F(uL,uR,n) + F(uR,uL,-n) = 0
    pub fn check_conservation(scheme: &dyn RiemannScheme, tol: f64) {
        for (ul, ur) in state_pairs() {
            for n in normals() {
                let mut f_ab = [0.0; 4];
                let mut f_ba = [0.0; 4];
                scheme.get_flux(&ul, &ur, n, &mut f_ab);
                scheme.get_flux(&ur, &ul, -n, &mut f_ba);
                for k in 0..4 {
                    assert!(
                        (f_ab[k] + f_ba[k]).abs() < tol,
                        "{} 界面守恒失败: 分量 {}: {} vs {}",
                        scheme.name(),
                        k,
                        f_ab[k],
                        f_ba[k]
                    );
                }
            }
        }
    }

    /// 解析 Jacobian 与中心差分比较
    ///
    /// 注意符号约定：dfdl = -∂F/∂uL，dfdr = +∂F/∂uR。
    pub fn check_jacobian_fd(scheme: &dyn RiemannScheme, tol: f64) {
        let h = 1e-6;
        for (ul, ur) in state_pairs() {
            for n in normals() {
                let mut dfdl = [[0.0; 4]; 4];
                let mut dfdr = [[0.0; 4]; 4];
                scheme.get_jacobian(&ul, &ur, n, &mut dfdl, &mut dfdr);

                for k in 0..4 {
                    let mut ulp = ul;
                    let mut ulm = ul;
                    ulp[k] += h;
                    ulm[k] -= h;
                    let mut fp = [0.0; 4];
                    let mut fm = [0.0; 4];
                    scheme.get_flux(&ulp, &ur, n, &mut fp);
                    scheme.get_flux(&ulm, &ur, n, &mut fm);
                    for i in 0..4 {
                        let fd = (fp[i] - fm[i]) / (2.0 * h);
                        assert!(
                            (-dfdl[i][k] - fd).abs() < tol,
                            "{} 左 Jacobian ({},{}) 解析 {} FD {}",
                            scheme.name(),
                            i,
                            k,
                            -dfdl[i][k],
                            fd
                        );
                    }

                    let mut urp = ur;
                    let mut urm = ur;
                    urp[k] += h;
                    urm[k] -= h;
                    scheme.get_flux(&ul, &urp, n, &mut fp);
                    scheme.get_flux(&ul, &urm, n, &mut fm);
                    for i in 0..4 {
                        let fd = (fp[i] - fm[i]) / (2.0 * h);
                        assert!(
                            (dfdr[i][k] - fd).abs() < tol,
                            "{} 右 Jacobian ({},{}) 解析 {} FD {}",
                            scheme.name(),
                            i,
                            k,
                            dfdr[i][k],
                            fd
                        );
                    }
                }
            }
        }
    }
}
