// crates/af_physics/src/boundary/conditions.rs

//! 幽灵状态边界条件实现
//!
//! - [`SlipwallBc`]: 速度关于面反射
//! - [`FarfieldBc`]: 幽灵态取来流
//! - [`ExtrapolationBc`]: 零梯度外推
//! - [`InOutFlowBc`]: 入流取来流、亚声速出流给定背压
//! - [`InFlowBc`]: 总压/总温法向入流（声学 Riemann 不变量）
//! - [`AdiabaticWallBc`]: 无滑移绝热壁，法向温度梯度为零
//! - [`IsothermalWallBc`]: 无滑移等温壁，幽灵温度 2T_w − T_I
//! - [`PeriodicBc`]: 占位，复制由引擎按配对面完成

use glam::DVec2;

use super::{tangent, FlowBoundary};
use crate::gas::IdealGasModel;
use crate::state::{Cons, Jac, NVARS};

/// 单位 Jacobian
#[inline]
fn identity_jac() -> Jac {
    let mut jac = [[0.0; NVARS]; NVARS];
    for i in 0..NVARS {
        jac[i][i] = 1.0;
    }
    jac
}

// ============================================================
// 滑移固壁
// ============================================================

/// 滑移固壁：vG = vI − 2(vI·n)n，ρ 与 E 保持
///
/// 幽灵态对内部态为常系数线性映射。
#[derive(Debug, Clone, Copy)]
pub struct SlipwallBc;

impl SlipwallBc {
    /// 反射矩阵
    #[inline]
    fn reflection(n: DVec2) -> Jac {
        [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0 - 2.0 * n.x * n.x, -2.0 * n.x * n.y, 0.0],
            [0.0, -2.0 * n.x * n.y, 1.0 - 2.0 * n.y * n.y, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]
    }
}

impl FlowBoundary for SlipwallBc {
    fn name(&self) -> &'static str {
        "Slipwall"
    }

    fn ghost_state(&self, interior: &Cons, n: DVec2, ghost: &mut Cons) {
        let mn = interior[1] * n.x + interior[2] * n.y;
        ghost[0] = interior[0];
        ghost[1] = interior[1] - 2.0 * mn * n.x;
        ghost[2] = interior[2] - 2.0 * mn * n.y;
        ghost[3] = interior[3];
    }

    fn ghost_and_jacobian(&self, interior: &Cons, n: DVec2, ghost: &mut Cons, dghost: &mut Jac) {
        self.ghost_state(interior, n, ghost);
        *dghost = Self::reflection(n);
    }
}

// ============================================================
// 远场
// ============================================================

/// 远场：幽灵态恒为来流
#[derive(Debug, Clone, Copy)]
pub struct FarfieldBc {
    uinf: Cons,
}

impl FarfieldBc {
    /// 创建，`uinf` 为来流守恒状态
    pub fn new(uinf: Cons) -> Self {
        Self { uinf }
    }
}

impl FlowBoundary for FarfieldBc {
    fn name(&self) -> &'static str {
        "Farfield"
    }

    fn ghost_state(&self, _interior: &Cons, _n: DVec2, ghost: &mut Cons) {
        *ghost = self.uinf;
    }

    fn ghost_and_jacobian(&self, interior: &Cons, n: DVec2, ghost: &mut Cons, dghost: &mut Jac) {
        self.ghost_state(interior, n, ghost);
        *dghost = [[0.0; NVARS]; NVARS];
    }
}

// ============================================================
// 外推
// ============================================================

/// 零梯度外推：uG = uI
#[derive(Debug, Clone, Copy)]
pub struct ExtrapolationBc;

impl FlowBoundary for ExtrapolationBc {
    fn name(&self) -> &'static str {
        "Extrapolation"
    }

    fn ghost_state(&self, interior: &Cons, _n: DVec2, ghost: &mut Cons) {
        *ghost = *interior;
    }

    fn ghost_and_jacobian(&self, interior: &Cons, n: DVec2, ghost: &mut Cons, dghost: &mut Jac) {
        self.ghost_state(interior, n, ghost);
        *dghost = identity_jac();
    }
}

// ============================================================
// 入流/出流
// ============================================================

/// 入流/出流组合
///
/// 内法向速度判定流向：入流（vn < 0）幽灵态取来流；出流时超声速
/// 外推、亚声速给定背压 p∞ 并保留内部密度与速度（等熵出流假设）。
#[derive(Debug, Clone, Copy)]
pub struct InOutFlowBc {
    gas: IdealGasModel,
    uinf: Cons,
}

impl InOutFlowBc {
    /// 创建，`uinf` 为来流守恒状态
    pub fn new(gas: IdealGasModel, uinf: Cons) -> Self {
        Self { gas, uinf }
    }
}

impl FlowBoundary for InOutFlowBc {
    fn name(&self) -> &'static str {
        "InOutFlow"
    }

    fn ghost_state(&self, interior: &Cons, n: DVec2, ghost: &mut Cons) {
        let vn = self.gas.normal_velocity(interior, n);
        if vn < 0.0 {
            // 入流：取来流
            *ghost = self.uinf;
            return;
        }
        let mach_n = vn / self.gas.sound_speed(interior);
        if mach_n >= 1.0 {
            // 超声速出流：外推
            *ghost = *interior;
        } else {
            // 亚声速出流：给定背压，保留密度与速度
            let pinf = self.gas.freestream_pressure();
            ghost[0] = interior[0];
            ghost[1] = interior[1];
            ghost[2] = interior[2];
            ghost[3] = pinf / (self.gas.gamma - 1.0)
                + 0.5 * (interior[1] * interior[1] + interior[2] * interior[2]) / interior[0];
        }
    }

    fn ghost_and_jacobian(&self, interior: &Cons, n: DVec2, ghost: &mut Cons, dghost: &mut Jac) {
        self.ghost_state(interior, n, ghost);
        let vn = self.gas.normal_velocity(interior, n);
        if vn < 0.0 {
            *dghost = [[0.0; NVARS]; NVARS];
            return;
        }
        let mach_n = vn / self.gas.sound_speed(interior);
        if mach_n >= 1.0 {
            *dghost = identity_jac();
        } else {
            let rho = interior[0];
            let (mx, my) = (interior[1], interior[2]);
            *dghost = identity_jac();
            dghost[3] = [
                -0.5 * (mx * mx + my * my) / (rho * rho),
                mx / rho,
                my / rho,
                0.0,
            ];
        }
    }
}

// ============================================================
// 总压/总温入流
// ============================================================

/// 总压/总温法向入流
///
/// 给定无量纲总压 p0 与总温 T0，流动约束为垂直于边界进入。
/// 边界声速由内部声学 Riemann 不变量 R⁻ = vn − 2c/(γ−1) 与
/// 总焓关系的二次方程解出，静态量随等熵关系恢复。
#[derive(Debug, Clone, Copy)]
pub struct InFlowBc {
    gas: IdealGasModel,
    /// 无量纲总压
    total_pressure: f64,
    /// 无量纲总温
    total_temperature: f64,
}

/// 边界量对 R⁻ 的导数链
struct InflowChain {
    ghost: Cons,
    dghost_drm: [f64; NVARS],
}

impl InFlowBc {
    /// 创建
    pub fn new(gas: IdealGasModel, total_pressure: f64, total_temperature: f64) -> Self {
        Self {
            gas,
            total_pressure,
            total_temperature,
        }
    }

    /// 由 R⁻ 求边界状态及其对 R⁻ 的导数
    fn evaluate(&self, rm: f64, n: DVec2) -> InflowChain {
        let g = self.gas.gamma;
        let g1 = g - 1.0;

        // 滞止声速平方（无量纲下 T = c²）
        let c0_sq = self.total_temperature;

        // 二次方程 ((γ+1)/(γ−1)) c² + 2R⁻c + ((γ−1)/2 R⁻² − c0²) = 0 的正根
        let a = (g + 1.0) / g1;
        let inner = rm * rm * (1.0 - g) / 2.0 + a * c0_sq;
        let disc = inner.max(0.0).sqrt();
        let cb = (g1 / (g + 1.0)) * (-rm + disc);
        let ddisc_drm = if inner > 0.0 { (1.0 - g) * rm / (2.0 * disc) } else { 0.0 };
        let dcb_drm = (g1 / (g + 1.0)) * (-1.0 + ddisc_drm);

        // 法向速度由不变量恢复（入流时为负）
        let vnb = rm + 2.0 * cb / g1;
        let dvnb_drm = 1.0 + 2.0 * dcb_drm / g1;

        let tb = cb * cb;
        let dtb_drm = 2.0 * cb * dcb_drm;

        let mb_sq = vnb * vnb / (cb * cb);
        let dmb_sq_drm =
            2.0 * vnb * dvnb_drm / (cb * cb) - 2.0 * vnb * vnb * dcb_drm / (cb * cb * cb);

        // 等熵关系恢复静压
        let ratio = 1.0 + 0.5 * g1 * mb_sq;
        let pb = self.total_pressure * ratio.powf(-g / g1);
        let dpb_drm =
            -0.5 * g * self.total_pressure * ratio.powf(-g / g1 - 1.0) * dmb_sq_drm;

        let rhob = g * pb / tb;
        let drhob_drm = g * (dpb_drm * tb - pb * dtb_drm) / (tb * tb);

        let ghost = [
            rhob,
            rhob * vnb * n.x,
            rhob * vnb * n.y,
            pb / g1 + 0.5 * rhob * vnb * vnb,
        ];
        let dmom_drm = drhob_drm * vnb + rhob * dvnb_drm;
        let dghost_drm = [
            drhob_drm,
            dmom_drm * n.x,
            dmom_drm * n.y,
            dpb_drm / g1 + 0.5 * drhob_drm * vnb * vnb + rhob * vnb * dvnb_drm,
        ];

        InflowChain { ghost, dghost_drm }
    }
}

impl FlowBoundary for InFlowBc {
    fn name(&self) -> &'static str {
        "InFlow"
    }

    fn ghost_state(&self, interior: &Cons, n: DVec2, ghost: &mut Cons) {
        let g1 = self.gas.gamma - 1.0;
        let rm =
            self.gas.normal_velocity(interior, n) - 2.0 * self.gas.sound_speed(interior) / g1;
        *ghost = self.evaluate(rm, n).ghost;
    }

    fn ghost_and_jacobian(&self, interior: &Cons, n: DVec2, ghost: &mut Cons, dghost: &mut Jac) {
        let g1 = self.gas.gamma - 1.0;
        let vn = self.gas.normal_velocity(interior, n);
        let c = self.gas.sound_speed(interior);
        let rm = vn - 2.0 * c / g1;

        let chain = self.evaluate(rm, n);
        *ghost = chain.ghost;

        // dR⁻/du = dvn − 2dc/(γ−1)
        let rho = interior[0];
        let dvn = [-vn / rho, n.x / rho, n.y / rho, 0.0];
        let dc = self.gas.sound_speed_jacobian(interior);
        for i in 0..NVARS {
            for k in 0..NVARS {
                dghost[i][k] = chain.dghost_drm[i] * (dvn[k] - 2.0 * dc[k] / g1);
            }
        }
    }
}

// ============================================================
// 无滑移壁面
// ============================================================

/// 壁面动量镜像：面平均速度等于壁面速度
///
/// mG = 2ρI v_w − mI，v_w = v_t · (ny, −nx)。
#[inline]
fn wall_ghost_momentum(interior: &Cons, v_wall: DVec2) -> (f64, f64) {
    (
        2.0 * interior[0] * v_wall.x - interior[1],
        2.0 * interior[0] * v_wall.y - interior[2],
    )
}

/// 无滑移绝热壁
///
/// 密度与压强保持（即温度关于壁面反射，法向温度梯度为零），
/// 速度按壁面速度镜像。
#[derive(Debug, Clone, Copy)]
pub struct AdiabaticWallBc {
    gas: IdealGasModel,
    /// 壁面切向速度
    tangential_velocity: f64,
}

impl AdiabaticWallBc {
    /// 创建，`tangential_velocity` 为沿 (ny, −nx) 方向的壁面速度
    pub fn new(gas: IdealGasModel, tangential_velocity: f64) -> Self {
        Self {
            gas,
            tangential_velocity,
        }
    }
}

impl FlowBoundary for AdiabaticWallBc {
    fn name(&self) -> &'static str {
        "AdiabaticWall"
    }

    fn ghost_state(&self, interior: &Cons, n: DVec2, ghost: &mut Cons) {
        let v_wall = self.tangential_velocity * tangent(n);
        let (mgx, mgy) = wall_ghost_momentum(interior, v_wall);
        let p = self.gas.pressure(interior);
        ghost[0] = interior[0];
        ghost[1] = mgx;
        ghost[2] = mgy;
        ghost[3] = p / (self.gas.gamma - 1.0) + 0.5 * (mgx * mgx + mgy * mgy) / interior[0];
    }

    fn ghost_and_jacobian(&self, interior: &Cons, n: DVec2, ghost: &mut Cons, dghost: &mut Jac) {
        self.ghost_state(interior, n, ghost);

        let v_wall = self.tangential_velocity * tangent(n);
        let (mgx, mgy) = wall_ghost_momentum(interior, v_wall);
        let rho = interior[0];
        let dp = self.gas.pressure_jacobian(interior);
        let g1 = self.gas.gamma - 1.0;

        dghost[0] = [1.0, 0.0, 0.0, 0.0];
        dghost[1] = [2.0 * v_wall.x, -1.0, 0.0, 0.0];
        dghost[2] = [2.0 * v_wall.y, 0.0, -1.0, 0.0];
        for k in 0..NVARS {
            let drho = if k == 0 { 1.0 } else { 0.0 };
            dghost[3][k] = dp[k] / g1
                + (mgx * dghost[1][k] + mgy * dghost[2][k]) / rho
                - 0.5 * (mgx * mgx + mgy * mgy) / (rho * rho) * drho;
        }
    }
}

/// 无滑移等温壁
///
/// 速度镜像同绝热壁；幽灵温度 TG = 2T_w − TI，密度保持，
/// 压强由状态方程随 TG 恢复。
#[derive(Debug, Clone, Copy)]
pub struct IsothermalWallBc {
    gas: IdealGasModel,
    /// 壁面切向速度
    tangential_velocity: f64,
    /// 无量纲壁温
    wall_temperature: f64,
}

impl IsothermalWallBc {
    /// 创建
    pub fn new(gas: IdealGasModel, tangential_velocity: f64, wall_temperature: f64) -> Self {
        Self {
            gas,
            tangential_velocity,
            wall_temperature,
        }
    }
}

impl FlowBoundary for IsothermalWallBc {
    fn name(&self) -> &'static str {
        "IsothermalWall"
    }

    fn ghost_state(&self, interior: &Cons, n: DVec2, ghost: &mut Cons) {
        let v_wall = self.tangential_velocity * tangent(n);
        let (mgx, mgy) = wall_ghost_momentum(interior, v_wall);
        let t_ghost = 2.0 * self.wall_temperature - self.gas.temperature_from_cons(interior);
        let p_ghost = self.gas.pressure_from_temperature(interior[0], t_ghost);
        ghost[0] = interior[0];
        ghost[1] = mgx;
        ghost[2] = mgy;
        ghost[3] =
            p_ghost / (self.gas.gamma - 1.0) + 0.5 * (mgx * mgx + mgy * mgy) / interior[0];
    }

    fn ghost_and_jacobian(&self, interior: &Cons, n: DVec2, ghost: &mut Cons, dghost: &mut Jac) {
        self.ghost_state(interior, n, ghost);

        let v_wall = self.tangential_velocity * tangent(n);
        let (mgx, mgy) = wall_ghost_momentum(interior, v_wall);
        let rho = interior[0];
        let g1 = self.gas.gamma - 1.0;
        let gm2 = self.gas.gamma;

        let t_ghost = 2.0 * self.wall_temperature - self.gas.temperature_from_cons(interior);
        let dt = self.gas.prim2_jacobian(interior)[3];

        dghost[0] = [1.0, 0.0, 0.0, 0.0];
        dghost[1] = [2.0 * v_wall.x, -1.0, 0.0, 0.0];
        dghost[2] = [2.0 * v_wall.y, 0.0, -1.0, 0.0];
        for k in 0..NVARS {
            let drho = if k == 0 { 1.0 } else { 0.0 };
            // pG = ρ TG / (γM∞²)
            let dpg = (drho * t_ghost - rho * dt[k]) / gm2;
            dghost[3][k] = dpg / g1
                + (mgx * dghost[1][k] + mgy * dghost[2][k]) / rho
                - 0.5 * (mgx * mgx + mgy * mgy) / (rho * rho) * drho;
        }
    }
}

// ============================================================
// 周期占位
// ============================================================

/// 周期边界占位
///
/// 幽灵态先取内部态，随后由引擎以配对面左单元状态覆盖。
#[derive(Debug, Clone, Copy)]
pub struct PeriodicBc;

impl FlowBoundary for PeriodicBc {
    fn name(&self) -> &'static str {
        "Periodic"
    }

    fn ghost_state(&self, interior: &Cons, _n: DVec2, ghost: &mut Cons) {
        *ghost = *interior;
    }

    fn ghost_and_jacobian(&self, interior: &Cons, n: DVec2, ghost: &mut Cons, dghost: &mut Jac) {
        self.ghost_state(interior, n, ghost);
        *dghost = identity_jac();
    }
}
