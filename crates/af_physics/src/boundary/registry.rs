// crates/af_physics/src/boundary/registry.rs

//! 边界条件注册表
//!
//! 按边界标记保存边界条件实现。由配置记录构建，
//! 查找未声明的标记返回配置错误。

use std::collections::HashMap;

use af_config::{BoundaryKind, BoundarySpec};
use af_foundation::{SolverError, SolverResult};
use tracing::info;

use super::conditions::{
    AdiabaticWallBc, ExtrapolationBc, FarfieldBc, InFlowBc, InOutFlowBc, IsothermalWallBc,
    PeriodicBc, SlipwallBc,
};
use super::FlowBoundary;
use crate::gas::IdealGasModel;
use crate::state::Cons;

/// 标记 → 边界条件映射
pub struct BoundaryRegistry {
    map: HashMap<i32, Box<dyn FlowBoundary>>,
    /// 周期标记集合（引擎据此执行配对复制）
    periodic_markers: Vec<i32>,
}

impl BoundaryRegistry {
    /// 由配置记录构建注册表
    ///
    /// # 参数
    /// - `specs`: 逐边界配置记录
    /// - `gas`: 气体模型
    /// - `uinf`: 来流守恒状态（远场与入流/出流使用）
    pub fn from_config(
        specs: &[BoundarySpec],
        gas: IdealGasModel,
        uinf: Cons,
    ) -> SolverResult<Self> {
        let mut map: HashMap<i32, Box<dyn FlowBoundary>> = HashMap::new();
        let mut periodic_markers = Vec::new();

        for spec in specs {
            if spec.values.len() < spec.kind.required_values() {
                return Err(SolverError::config_invalid(format!(
                    "边界标记 {} 缺少必需参数: 需要 {} 个, 提供 {} 个",
                    spec.marker,
                    spec.kind.required_values(),
                    spec.values.len()
                )));
            }
            let bc: Box<dyn FlowBoundary> = match spec.kind {
                BoundaryKind::Slipwall => Box::new(SlipwallBc),
                BoundaryKind::Farfield => Box::new(FarfieldBc::new(uinf)),
                BoundaryKind::Extrapolation => Box::new(ExtrapolationBc),
                BoundaryKind::InOutFlow => Box::new(InOutFlowBc::new(gas, uinf)),
                BoundaryKind::InFlow => {
                    Box::new(InFlowBc::new(gas, spec.values[0], spec.values[1]))
                }
                BoundaryKind::AdiabaticWall => {
                    Box::new(AdiabaticWallBc::new(gas, spec.values[0]))
                }
                BoundaryKind::IsothermalWall => {
                    Box::new(IsothermalWallBc::new(gas, spec.values[0], spec.values[1]))
                }
                BoundaryKind::Periodic => {
                    periodic_markers.push(spec.marker);
                    Box::new(PeriodicBc)
                }
            };
            info!(marker = spec.marker, bc = bc.name(), "注册边界条件");
            if map.insert(spec.marker, bc).is_some() {
                return Err(SolverError::config_invalid(format!(
                    "边界标记 {} 被重复声明",
                    spec.marker
                )));
            }
        }

        Ok(Self {
            map,
            periodic_markers,
        })
    }

    /// 按标记查找边界条件
    pub fn at(&self, marker: i32) -> SolverResult<&dyn FlowBoundary> {
        self.map
            .get(&marker)
            .map(|bc| bc.as_ref())
            .ok_or_else(|| {
                SolverError::config_invalid(format!("边界标记 {} 未声明边界条件", marker))
            })
    }

    /// 标记是否为周期边界
    #[inline]
    pub fn is_periodic(&self, marker: i32) -> bool {
        self.periodic_markers.contains(&marker)
    }

    /// 已注册的标记数量
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gas() -> IdealGasModel {
        IdealGasModel::new(1.4, 0.5, 288.15, 5.0e5, 0.72)
    }

    #[test]
    fn test_build_and_lookup() {
        let gas = gas();
        let uinf = gas.freestream_state(0.0);
        let specs = vec![
            BoundarySpec::new(1, BoundaryKind::Slipwall),
            BoundarySpec::new(2, BoundaryKind::Farfield),
            BoundarySpec::new(7, BoundaryKind::AdiabaticWall).with_values(vec![0.0]),
        ];
        let registry = BoundaryRegistry::from_config(&specs, gas, uinf).unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.at(1).unwrap().name(), "Slipwall");
        assert_eq!(registry.at(7).unwrap().name(), "AdiabaticWall");
    }

    #[test]
    fn test_unknown_marker_is_config_error() {
        let gas = gas();
        let uinf = gas.freestream_state(0.0);
        let registry = BoundaryRegistry::from_config(&[], gas, uinf).unwrap();
        assert!(matches!(
            registry.at(99),
            Err(SolverError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn test_periodic_marker_tracked() {
        let gas = gas();
        let uinf = gas.freestream_state(0.0);
        let specs = vec![
            BoundarySpec::new(5, BoundaryKind::Periodic),
            BoundarySpec::new(2, BoundaryKind::Farfield),
        ];
        let registry = BoundaryRegistry::from_config(&specs, gas, uinf).unwrap();
        assert!(registry.is_periodic(5));
        assert!(!registry.is_periodic(2));
    }
}
