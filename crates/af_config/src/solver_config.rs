// crates/af_config/src/solver_config.rs

//! 求解器配置记录
//!
//! 全部字段均可从 JSON 反序列化，缺省值通过 `#[serde(default)]` 提供。
//! 构建求解器前必须调用 [`SolverConfig::validate`]。

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ============================================================
// 格式选择枚举
// ============================================================

/// 流动类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FlowKind {
    /// 无黏 Euler 方程
    #[default]
    Euler,
    /// 层流 Navier-Stokes 方程
    NavierStokes,
}

impl FlowKind {
    /// 是否包含黏性通量
    #[inline]
    pub fn is_viscous(&self) -> bool {
        matches!(self, Self::NavierStokes)
    }
}

/// 无黏数值通量格式
///
/// 残差通量与 Jacobian 通量可以分别选择（例如残差用 HLLC、Jacobian 用 Roe）。
///
/// 注意：`Ausm` 与 `AusmPlus` 的解析 Jacobian 不可用，隐式装配时
/// 自动退化为冻结谱半径的 Rusanov 线化（见 DESIGN.md）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum InviscidFluxKind {
    /// 局部 Lax-Friedrichs（Rusanov）
    Llf,
    /// Van Leer 通量矢量分裂
    VanLeer,
    /// Liou-Steffen AUSM
    Ausm,
    /// Liou AUSM+
    AusmPlus,
    /// Roe-Pike 通量差分裂（带 Harten 熵修正）
    #[default]
    Roe,
    /// Harten-Lax-van Leer
    Hll,
    /// HLLC（接触波恢复）
    Hllc,
}

impl InviscidFluxKind {
    /// 该格式是否具有精确解析 Jacobian
    ///
    /// AUSM 族的 Jacobian 退化为 Rusanov 线化。
    #[inline]
    pub fn has_exact_jacobian(&self) -> bool {
        !matches!(self, Self::Ausm | Self::AusmPlus)
    }
}

/// 单元梯度格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum GradientKind {
    /// 不计算梯度（一阶）
    None,
    /// Green-Gauss 面积分
    GreenGauss,
    /// 加权最小二乘
    #[default]
    LeastSquares,
}

/// 重构限制器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LimiterKind {
    /// 无限制线性重构
    #[default]
    None,
    /// MUSCL + Van Albada 限制函数
    VanAlbada,
    /// Barth-Jespersen 逐单元限制
    BarthJespersen,
    /// Venkatakrishnan 光滑限制
    Venkatakrishnan,
    /// WENO 非线性加权
    Weno,
}

/// 黏性通量 Jacobian 形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ViscousJacobianKind {
    /// 完整薄层 Jacobian（默认）
    #[default]
    Full,
    /// 仅对角近似 μ/(ρd)
    Diagonal,
}

/// 边界条件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BoundaryKind {
    /// 滑移固壁（Euler 壁面）
    #[default]
    Slipwall,
    /// 远场：幽灵态取来流
    Farfield,
    /// 零梯度外推
    Extrapolation,
    /// 入流/出流组合（出流给定背压，入流取来流）
    InOutFlow,
    /// 总压/总温法向入流
    InFlow,
    /// 无滑移绝热壁（可给定壁面切向速度）
    AdiabaticWall,
    /// 无滑移等温壁（给定壁温）
    IsothermalWall,
    /// 周期边界（由引擎按配对面复制处理）
    Periodic,
}

impl BoundaryKind {
    /// 是否为无滑移壁面
    #[inline]
    pub fn is_no_slip_wall(&self) -> bool {
        matches!(self, Self::AdiabaticWall | Self::IsothermalWall)
    }

    /// 该类型需要的 values 数量下限
    pub fn required_values(&self) -> usize {
        match self {
            Self::AdiabaticWall => 1, // 壁面切向速度
            Self::IsothermalWall => 2, // 壁面切向速度 + 壁温
            Self::InFlow => 2, // 总压 + 总温
            _ => 0,
        }
    }
}

// ============================================================
// 配置记录
// ============================================================

/// 物理参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsSettings {
    /// 流动类型
    #[serde(default)]
    pub flow_kind: FlowKind,

    /// 比热比 γ
    #[serde(default = "default_gamma")]
    pub gamma: f64,

    /// 来流 Mach 数
    #[serde(default = "default_mach")]
    pub mach_inf: f64,

    /// 来流 Reynolds 数（仅黏性计算使用）
    #[serde(default = "default_reynolds")]
    pub reynolds_inf: f64,

    /// 来流温度 [K]（Sutherland 公式无量纲化基准）
    #[serde(default = "default_t_inf")]
    pub t_inf: f64,

    /// Prandtl 数
    #[serde(default = "default_prandtl")]
    pub prandtl: f64,

    /// 攻角 [度]
    #[serde(default)]
    pub aoa_deg: f64,

    /// 使用常黏性系数（替代 Sutherland 公式）
    #[serde(default)]
    pub constant_viscosity: bool,
}

fn default_gamma() -> f64 {
    1.4
}
fn default_mach() -> f64 {
    0.5
}
fn default_reynolds() -> f64 {
    5.0e5
}
fn default_t_inf() -> f64 {
    288.15
}
fn default_prandtl() -> f64 {
    0.72
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            flow_kind: FlowKind::Euler,
            gamma: default_gamma(),
            mach_inf: default_mach(),
            reynolds_inf: default_reynolds(),
            t_inf: default_t_inf(),
            prandtl: default_prandtl(),
            aoa_deg: 0.0,
            constant_viscosity: false,
        }
    }
}

impl PhysicsSettings {
    /// 攻角转弧度
    #[inline]
    pub fn aoa_rad(&self) -> f64 {
        self.aoa_deg.to_radians()
    }
}

/// 数值格式参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericsSettings {
    /// 残差使用的无黏通量
    #[serde(default)]
    pub inviscid_flux: InviscidFluxKind,

    /// Jacobian 使用的无黏通量（可与残差不同）
    #[serde(default)]
    pub jacobian_flux: InviscidFluxKind,

    /// 梯度格式
    #[serde(default)]
    pub gradient: GradientKind,

    /// 限制器
    #[serde(default)]
    pub limiter: LimiterKind,

    /// 限制器参数（Venkatakrishnan 的 K / WENO 的中心权重）
    #[serde(default = "default_limiter_param")]
    pub limiter_param: f64,

    /// 是否二阶重构
    #[serde(default = "default_second_order")]
    pub second_order: bool,

    /// Roe 熵修正参数 ε
    #[serde(default = "default_entropy_fix")]
    pub entropy_fix_eps: f64,

    /// 黏性通量 Jacobian 形式
    #[serde(default)]
    pub viscous_jacobian: ViscousJacobianKind,
}

fn default_limiter_param() -> f64 {
    2.0
}
fn default_second_order() -> bool {
    true
}
fn default_entropy_fix() -> f64 {
    0.05
}

impl Default for NumericsSettings {
    fn default() -> Self {
        Self {
            inviscid_flux: InviscidFluxKind::default(),
            jacobian_flux: InviscidFluxKind::default(),
            gradient: GradientKind::default(),
            limiter: LimiterKind::default(),
            limiter_param: default_limiter_param(),
            second_order: default_second_order(),
            entropy_fix_eps: default_entropy_fix(),
            viscous_jacobian: ViscousJacobianKind::default(),
        }
    }
}

/// 单个边界的边界条件记录
///
/// `values` 的含义随类型变化：
/// - `AdiabaticWall`: `[壁面切向速度]`
/// - `IsothermalWall`: `[壁面切向速度, 壁温]`
/// - `InFlow`: `[无量纲总压, 无量纲总温]`
/// - 其余类型不读取 values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundarySpec {
    /// 网格中的边界标记
    pub marker: i32,

    /// 边界条件类型
    pub kind: BoundaryKind,

    /// 数值参数
    #[serde(default)]
    pub values: Vec<f64>,

    /// 整型选项（保留给个别边界的开关位）
    #[serde(default)]
    pub opts: Vec<i32>,
}

impl BoundarySpec {
    /// 创建不带参数的记录
    pub fn new(marker: i32, kind: BoundaryKind) -> Self {
        Self {
            marker,
            kind,
            values: Vec::new(),
            opts: Vec::new(),
        }
    }

    /// 附加数值参数
    pub fn with_values(mut self, values: Vec<f64>) -> Self {
        self.values = values;
        self
    }
}

/// 求解器总配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SolverConfig {
    /// 物理参数
    #[serde(default)]
    pub physics: PhysicsSettings,

    /// 数值格式参数
    #[serde(default)]
    pub numerics: NumericsSettings,

    /// 逐边界条件记录
    #[serde(default)]
    pub boundaries: Vec<BoundarySpec>,
}

impl SolverConfig {
    /// 校验配置一致性
    ///
    /// 检查物理参数取值范围、边界标记唯一性以及各边界所需参数是否齐全。
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        if p.gamma <= 1.0 {
            return Err(ConfigError::InvalidValue {
                name: "gamma",
                value: p.gamma.to_string(),
                reason: "比热比必须大于 1",
            });
        }
        if p.mach_inf <= 0.0 {
            return Err(ConfigError::InvalidValue {
                name: "mach_inf",
                value: p.mach_inf.to_string(),
                reason: "来流 Mach 数必须为正",
            });
        }
        if p.prandtl <= 0.0 {
            return Err(ConfigError::InvalidValue {
                name: "prandtl",
                value: p.prandtl.to_string(),
                reason: "Prandtl 数必须为正",
            });
        }
        if p.flow_kind.is_viscous() && p.reynolds_inf <= 0.0 {
            return Err(ConfigError::InvalidValue {
                name: "reynolds_inf",
                value: p.reynolds_inf.to_string(),
                reason: "黏性计算要求来流 Reynolds 数为正",
            });
        }

        let n = &self.numerics;
        if n.limiter_param <= 0.0 {
            return Err(ConfigError::InvalidValue {
                name: "limiter_param",
                value: n.limiter_param.to_string(),
                reason: "限制器参数必须为正",
            });
        }
        if n.entropy_fix_eps < 0.0 {
            return Err(ConfigError::InvalidValue {
                name: "entropy_fix_eps",
                value: n.entropy_fix_eps.to_string(),
                reason: "熵修正参数不可为负",
            });
        }
        if n.second_order && n.gradient == GradientKind::None {
            return Err(ConfigError::ConflictingOptions {
                message: "二阶重构要求选择梯度格式 (gradient != none)".to_string(),
            });
        }

        let mut seen = std::collections::HashSet::new();
        for bc in &self.boundaries {
            if !seen.insert(bc.marker) {
                return Err(ConfigError::DuplicateMarker { marker: bc.marker });
            }
            if bc.values.len() < bc.kind.required_values() {
                return Err(ConfigError::InvalidValue {
                    name: "boundaries.values",
                    value: format!("marker {} 提供 {} 个参数", bc.marker, bc.values.len()),
                    reason: "该边界类型缺少必需参数",
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SolverConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_gamma() {
        let mut config = SolverConfig::default();
        config.physics.gamma = 0.9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_second_order_requires_gradient() {
        let mut config = SolverConfig::default();
        config.numerics.second_order = true;
        config.numerics.gradient = GradientKind::None;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ConflictingOptions { .. })
        ));
    }

    #[test]
    fn test_duplicate_marker_rejected() {
        let mut config = SolverConfig::default();
        config.boundaries.push(BoundarySpec::new(2, BoundaryKind::Slipwall));
        config.boundaries.push(BoundarySpec::new(2, BoundaryKind::Farfield));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateMarker { marker: 2 })
        ));
    }

    #[test]
    fn test_wall_values_required() {
        let mut config = SolverConfig::default();
        config
            .boundaries
            .push(BoundarySpec::new(3, BoundaryKind::IsothermalWall));
        assert!(config.validate().is_err());

        config.boundaries[0].values = vec![0.0, 1.2];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ausm_jacobian_fallback_flag() {
        assert!(!InviscidFluxKind::Ausm.has_exact_jacobian());
        assert!(!InviscidFluxKind::AusmPlus.has_exact_jacobian());
        assert!(InviscidFluxKind::Roe.has_exact_jacobian());
        assert!(InviscidFluxKind::Hllc.has_exact_jacobian());
    }

    #[test]
    fn test_serde_round_trip() {
        let mut config = SolverConfig::default();
        config.physics.mach_inf = 0.85;
        config.physics.aoa_deg = 1.0;
        config.numerics.inviscid_flux = InviscidFluxKind::Hllc;
        config.numerics.jacobian_flux = InviscidFluxKind::Roe;
        config
            .boundaries
            .push(BoundarySpec::new(4, BoundaryKind::Farfield));

        let json = serde_json::to_string(&config).unwrap();
        let back: SolverConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.physics.mach_inf, 0.85);
        assert_eq!(back.numerics.inviscid_flux, InviscidFluxKind::Hllc);
        assert_eq!(back.boundaries.len(), 1);
    }

    #[test]
    fn test_kebab_case_names() {
        let json = "\"navier-stokes\"";
        let kind: FlowKind = serde_json::from_str(json).unwrap();
        assert_eq!(kind, FlowKind::NavierStokes);
        assert!(kind.is_viscous());

        let json = "\"barth-jespersen\"";
        let kind: LimiterKind = serde_json::from_str(json).unwrap();
        assert_eq!(kind, LimiterKind::BarthJespersen);
    }
}
