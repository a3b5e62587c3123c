// crates/af_physics/src/builder.rs

//! 求解器构建
//!
//! 按配置选择 (二阶, 常黏性) 的四种编译期特化之一，
//! 返回空间离散接口的 trait 对象。

use std::sync::Arc;

use af_config::SolverConfig;
use af_foundation::SolverResult;
use af_mesh::FlowMesh;
use tracing::info;

use crate::engine::{FlowSolver, SpatialDiscretization};

/// 构建空间离散引擎
///
/// 配置校验、气体模型、边界注册表与各格式的构建均在此完成；
/// 无法识别的选项返回配置错误。
pub fn build_flow_solver(
    config: &SolverConfig,
    mesh: Arc<FlowMesh>,
) -> SolverResult<Box<dyn SpatialDiscretization>> {
    let second_order = config.numerics.second_order;
    let const_visc = config.physics.constant_viscosity;
    info!(second_order, const_visc, "选择引擎特化");

    let solver: Box<dyn SpatialDiscretization> = match (second_order, const_visc) {
        (true, true) => Box::new(FlowSolver::<true, true>::new(mesh, config)?),
        (true, false) => Box::new(FlowSolver::<true, false>::new(mesh, config)?),
        (false, true) => Box::new(FlowSolver::<false, true>::new(mesh, config)?),
        (false, false) => Box::new(FlowSolver::<false, false>::new(mesh, config)?),
    };
    Ok(solver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use af_config::{BoundaryKind, BoundarySpec};
    use af_mesh::generation::{rectangle, RectangleMarkers};

    #[test]
    fn test_build_all_specializations() {
        let mesh = Arc::new(rectangle(3, 3, 1.0, 1.0, RectangleMarkers::default()).unwrap());
        for second_order in [false, true] {
            for const_visc in [false, true] {
                let mut config = SolverConfig::default();
                config.numerics.second_order = second_order;
                config.physics.constant_viscosity = const_visc;
                for marker in 1..=4 {
                    config
                        .boundaries
                        .push(BoundarySpec::new(marker, BoundaryKind::Farfield));
                }
                let solver = build_flow_solver(&config, mesh.clone());
                assert!(solver.is_ok());
            }
        }
    }

    #[test]
    fn test_missing_boundary_is_config_error() {
        let mesh = Arc::new(rectangle(3, 3, 1.0, 1.0, RectangleMarkers::default()).unwrap());
        // 只声明三条边
        let mut config = SolverConfig::default();
        for marker in 1..=3 {
            config
                .boundaries
                .push(BoundarySpec::new(marker, BoundaryKind::Slipwall));
        }
        let result = build_flow_solver(&config, mesh);
        assert!(result.is_err());
    }
}
