// crates/af_physics/src/gas.rs

//! 理想气体模型
//!
//! 无量纲化约定：来流密度 ρ∞ = 1，来流声速 a∞ = 1（故来流速度模 = M∞），
//! 来流压强 p∞ = 1/γ，无量纲温度 T = γ p / ρ = c²（来流温度为 1）。
//! 黏性系数以 Sutherland 公式给出并除以来流 Reynolds 数。
//!
//! 所有函数均为参数结构上的纯函数：守恒↔原始转换及其 Jacobian、
//! 声速、温度、Sutherland 黏性及其 Jacobian、应力张量、解析 Euler
//! 法向通量及其 Jacobian、来流状态。

use glam::DVec2;

use crate::state::{CellGradient, Cons, Jac, NDIM, NVARS};

/// Sutherland 参考温度 [K]
const SUTHERLAND_S: f64 = 110.4;

/// 理想气体参数
#[derive(Debug, Clone, Copy)]
pub struct IdealGasModel {
    /// 比热比 γ
    pub gamma: f64,
    /// 来流 Mach 数
    pub mach_inf: f64,
    /// 来流温度 [K]（Sutherland 无量纲化基准）
    pub t_inf: f64,
    /// 来流 Reynolds 数
    pub reynolds_inf: f64,
    /// Prandtl 数
    pub prandtl: f64,
}

impl IdealGasModel {
    /// 创建气体模型
    pub fn new(gamma: f64, mach_inf: f64, t_inf: f64, reynolds_inf: f64, prandtl: f64) -> Self {
        Self {
            gamma,
            mach_inf,
            t_inf,
            reynolds_inf,
            prandtl,
        }
    }

    /// γ - 1
    #[inline]
    fn g1(&self) -> f64 {
        self.gamma - 1.0
    }

    // ============================================================
    // 来流
    // ============================================================

    /// 攻角 `aoa`（弧度）下的来流守恒状态
    pub fn freestream_state(&self, aoa: f64) -> Cons {
        let rho = 1.0;
        let vel = self.mach_inf * DVec2::new(aoa.cos(), aoa.sin());
        let p = self.freestream_pressure();
        [
            rho,
            rho * vel.x,
            rho * vel.y,
            p / self.g1() + 0.5 * rho * vel.length_squared(),
        ]
    }

    /// 无量纲来流压强 1/γ
    #[inline]
    pub fn freestream_pressure(&self) -> f64 {
        1.0 / self.gamma
    }

    // ============================================================
    // 热力学量
    // ============================================================

    /// 压强 p = (γ-1)(ρE - |ρv|²/(2ρ))
    #[inline]
    pub fn pressure(&self, u: &Cons) -> f64 {
        self.g1() * (u[3] - 0.5 * (u[1] * u[1] + u[2] * u[2]) / u[0])
    }

    /// 压强对守恒量的导数
    #[inline]
    pub fn pressure_jacobian(&self, u: &Cons) -> [f64; NVARS] {
        let vx = u[1] / u[0];
        let vy = u[2] / u[0];
        let g1 = self.g1();
        [0.5 * g1 * (vx * vx + vy * vy), -g1 * vx, -g1 * vy, g1]
    }

    /// 声速 c = √(γp/ρ)
    #[inline]
    pub fn sound_speed(&self, u: &Cons) -> f64 {
        (self.gamma * self.pressure(u) / u[0]).sqrt()
    }

    /// 声速对守恒量的导数
    pub fn sound_speed_jacobian(&self, u: &Cons) -> [f64; NVARS] {
        let p = self.pressure(u);
        let dp = self.pressure_jacobian(u);
        let c = (self.gamma * p / u[0]).sqrt();
        let rho = u[0];
        let factor = self.gamma / (2.0 * c * rho * rho);
        [
            factor * (dp[0] * rho - p),
            factor * dp[1] * rho,
            factor * dp[2] * rho,
            factor * dp[3] * rho,
        ]
    }

    /// 无量纲温度 T = γ p / ρ
    ///
    /// 声速无量纲化下 T = c²，来流温度为 1。
    #[inline]
    pub fn temperature(&self, rho: f64, p: f64) -> f64 {
        self.gamma * p / rho
    }

    /// 由温度与密度恢复压强
    #[inline]
    pub fn pressure_from_temperature(&self, rho: f64, t: f64) -> f64 {
        rho * t / self.gamma
    }

    /// 守恒量的温度
    #[inline]
    pub fn temperature_from_cons(&self, u: &Cons) -> f64 {
        self.temperature(u[0], self.pressure(u))
    }

    /// 温度梯度：由密度/压强及各自梯度按商法则得到
    #[inline]
    pub fn grad_temperature(&self, rho: f64, grad_rho: f64, p: f64, grad_p: f64) -> f64 {
        self.gamma * (grad_p * rho - p * grad_rho) / (rho * rho)
    }

    /// 法向速度 v·n
    #[inline]
    pub fn normal_velocity(&self, u: &Cons, n: DVec2) -> f64 {
        (u[1] * n.x + u[2] * n.y) / u[0]
    }

    /// 速度向量
    #[inline]
    pub fn velocity(&self, u: &Cons) -> DVec2 {
        DVec2::new(u[1] / u[0], u[2] / u[0])
    }

    /// 状态是否物理（ρ > 0 且 p > 0）
    #[inline]
    pub fn is_physical(&self, u: &Cons) -> bool {
        u[0] > 0.0 && self.pressure(u) > 0.0
    }

    // ============================================================
    // 守恒 ↔ 原始转换
    // ============================================================

    /// 守恒 → 原始 (ρ, u, v, p)
    #[inline]
    pub fn prim_from_cons(&self, u: &Cons) -> Cons {
        [u[0], u[1] / u[0], u[2] / u[0], self.pressure(u)]
    }

    /// 原始 (ρ, u, v, p) → 守恒
    #[inline]
    pub fn cons_from_prim(&self, w: &Cons) -> Cons {
        [
            w[0],
            w[0] * w[1],
            w[0] * w[2],
            w[3] / self.g1() + 0.5 * w[0] * (w[1] * w[1] + w[2] * w[2]),
        ]
    }

    /// 守恒 → 原始-2 (ρ, u, v, T)
    #[inline]
    pub fn prim2_from_cons(&self, u: &Cons) -> Cons {
        [
            u[0],
            u[1] / u[0],
            u[2] / u[0],
            self.temperature(u[0], self.pressure(u)),
        ]
    }

    /// 原始 (ρ,u,v,p) 对守恒量的 Jacobian
    pub fn prim_jacobian(&self, u: &Cons) -> Jac {
        let rho = u[0];
        let vx = u[1] / rho;
        let vy = u[2] / rho;
        let dp = self.pressure_jacobian(u);
        [
            [1.0, 0.0, 0.0, 0.0],
            [-vx / rho, 1.0 / rho, 0.0, 0.0],
            [-vy / rho, 0.0, 1.0 / rho, 0.0],
            dp,
        ]
    }

    /// 原始-2 (ρ,u,v,T) 对守恒量的 Jacobian
    pub fn prim2_jacobian(&self, u: &Cons) -> Jac {
        let rho = u[0];
        let vx = u[1] / rho;
        let vy = u[2] / rho;
        let p = self.pressure(u);
        let dp = self.pressure_jacobian(u);
        let gm2 = self.gamma;
        let mut jac = [
            [1.0, 0.0, 0.0, 0.0],
            [-vx / rho, 1.0 / rho, 0.0, 0.0],
            [-vy / rho, 0.0, 1.0 / rho, 0.0],
            [0.0; NVARS],
        ];
        for k in 0..NVARS {
            let drho = if k == 0 { 1.0 } else { 0.0 };
            jac[3][k] = gm2 * (dp[k] * rho - p * drho) / (rho * rho);
        }
        jac
    }

    // ============================================================
    // 输运系数
    // ============================================================

    /// Sutherland 黏性系数（已除以 Re∞）
    ///
    /// μ(T) = (1 + S*) / (T + S*) · T^{3/2} / Re∞，S* = 110.4/T∞。
    pub fn sutherland_viscosity(&self, u: &Cons) -> f64 {
        let t = self.temperature_from_cons(u);
        let s = SUTHERLAND_S / self.t_inf;
        (1.0 + s) / (t + s) * t.powf(1.5) / self.reynolds_inf
    }

    /// 常黏性系数 1/Re∞
    #[inline]
    pub fn constant_viscosity(&self) -> f64 {
        1.0 / self.reynolds_inf
    }

    /// Sutherland 黏性对守恒量的导数
    pub fn sutherland_viscosity_jacobian(&self, u: &Cons) -> [f64; NVARS] {
        let t = self.temperature_from_cons(u);
        let s = SUTHERLAND_S / self.t_inf;
        // dμ/dT
        let dmu_dt = (1.0 + s) / self.reynolds_inf
            * (1.5 * t.sqrt() * (t + s) - t.powf(1.5))
            / ((t + s) * (t + s));
        let dt = self.prim2_jacobian(u)[3];
        let mut dmu = [0.0; NVARS];
        for k in 0..NVARS {
            dmu[k] = dmu_dt * dt[k];
        }
        dmu
    }

    /// 热导率 k = μγ / (Pr (γ-1))
    #[inline]
    pub fn thermal_conductivity(&self, mu: f64) -> f64 {
        mu * self.gamma / (self.prandtl * self.g1())
    }

    /// 由黏性导数得到热导率导数
    #[inline]
    pub fn thermal_conductivity_jacobian(&self, dmu: &[f64; NVARS]) -> [f64; NVARS] {
        let factor = self.gamma / (self.prandtl * self.g1());
        [dmu[0] * factor, dmu[1] * factor, dmu[2] * factor, dmu[3] * factor]
    }

    // ============================================================
    // 应力张量
    // ============================================================

    /// 黏性应力张量 τ = μ(∇v + ∇vᵀ − (2/3) tr(∇v) I)
    ///
    /// `grad` 为原始-2 变量 (ρ,u,v,T) 的面梯度，速度分量位于下标 1、2。
    pub fn stress_tensor(&self, mu: f64, grad: &CellGradient) -> [[f64; NDIM]; NDIM] {
        let div = grad[0][1] + grad[1][2];
        let mut stress = [[0.0; NDIM]; NDIM];
        for i in 0..NDIM {
            for j in 0..NDIM {
                stress[i][j] = mu * (grad[i][j + 1] + grad[j][i + 1]);
            }
            stress[i][i] -= mu * 2.0 / 3.0 * div;
        }
        stress
    }

    /// 应力张量对守恒量的导数
    ///
    /// `dgrad[方向][变量][k] = ∂grad[方向][变量]/∂u_k`（某一侧状态），
    /// `dmu` 为 μ 对同侧守恒量的导数。输出按同一侧累加到 `dstress`。
    pub fn stress_tensor_jacobian(
        &self,
        mu: f64,
        dmu: &[f64; NVARS],
        grad: &CellGradient,
        dgrad: &[[[f64; NVARS]; NVARS]; NDIM],
        dstress: &mut [[[f64; NVARS]; NDIM]; NDIM],
    ) {
        let div = grad[0][1] + grad[1][2];
        for i in 0..NDIM {
            for j in 0..NDIM {
                for k in 0..NVARS {
                    let mut d = dmu[k] * (grad[i][j + 1] + grad[j][i + 1])
                        + mu * (dgrad[i][j + 1][k] + dgrad[j][i + 1][k]);
                    if i == j {
                        d -= dmu[k] * 2.0 / 3.0 * div
                            + mu * 2.0 / 3.0 * (dgrad[0][1][k] + dgrad[1][2][k]);
                    }
                    dstress[i][j][k] += d;
                }
            }
        }
    }

    // ============================================================
    // 解析 Euler 通量
    // ============================================================

    /// 法向解析 Euler 通量 F(u, n)
    pub fn euler_flux(&self, u: &Cons, n: DVec2) -> Cons {
        let vn = self.normal_velocity(u, n);
        let p = self.pressure(u);
        [
            u[0] * vn,
            u[1] * vn + p * n.x,
            u[2] * vn + p * n.y,
            (u[3] + p) * vn,
        ]
    }

    /// 法向 Euler 通量 Jacobian A = ∂F/∂u
    pub fn euler_flux_jacobian(&self, u: &Cons, n: DVec2) -> Jac {
        let rho = u[0];
        let vx = u[1] / rho;
        let vy = u[2] / rho;
        let vn = vx * n.x + vy * n.y;
        let g1 = self.g1();
        let phi = 0.5 * g1 * (vx * vx + vy * vy);
        let p = self.pressure(u);
        let h = (u[3] + p) / rho;
        [
            [0.0, n.x, n.y, 0.0],
            [
                phi * n.x - vx * vn,
                vn - (self.gamma - 2.0) * vx * n.x,
                vx * n.y - g1 * vy * n.x,
                g1 * n.x,
            ],
            [
                phi * n.y - vy * vn,
                vy * n.x - g1 * vx * n.y,
                vn - (self.gamma - 2.0) * vy * n.y,
                g1 * n.y,
            ],
            [
                (phi - h) * vn,
                h * n.x - g1 * vx * vn,
                h * n.y - g1 * vy * vn,
                self.gamma * vn,
            ],
        ]
    }
}
