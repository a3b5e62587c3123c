// crates/af_physics/tests/flux_consistency.rs

//! 通量一致性与界面守恒的随机状态扫描
//!
//! 对全部七种格式：
//! - F(u,u,n) 与解析 Euler 通量逐分量一致
//! - F(uL,uR,n) + F(uR,uL,−n) = 0

use af_config::InviscidFluxKind;
use af_physics::{create_riemann_scheme, Cons, IdealGasModel, RiemannScheme};
use glam::DVec2;

/// 确定性线性同余伪随机序列
struct Lcg(u64);

impl Lcg {
    fn next_unit(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }

    fn in_range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_unit()
    }

    /// 正密度正压强的随机守恒状态
    fn state(&mut self, gas: &IdealGasModel) -> Cons {
        let prim = [
            self.in_range(0.1, 2.0),
            self.in_range(-1.5, 1.5),
            self.in_range(-1.5, 1.5),
            self.in_range(0.1, 2.0),
        ];
        gas.cons_from_prim(&prim)
    }

    /// 单位圆上的法向
    fn normal(&mut self) -> DVec2 {
        let theta = self.in_range(0.0, std::f64::consts::TAU);
        DVec2::new(theta.cos(), theta.sin())
    }
}

fn all_schemes() -> Vec<InviscidFluxKind> {
    vec![
        InviscidFluxKind::Llf,
        InviscidFluxKind::VanLeer,
        InviscidFluxKind::Ausm,
        InviscidFluxKind::AusmPlus,
        InviscidFluxKind::Roe,
        InviscidFluxKind::Hll,
        InviscidFluxKind::Hllc,
    ]
}

#[test]
fn all_fluxes_consistent_on_100_random_states() {
    let gas = IdealGasModel::new(1.4, 0.5, 288.15, 5.0e5, 0.72);
    for kind in all_schemes() {
        let scheme = create_riemann_scheme(kind, gas, 0.05);
        let mut rng = Lcg(0x9e37_79b9_7f4a_7c15);
        for _ in 0..100 {
            let u = rng.state(&gas);
            let n = rng.normal();
            let exact = gas.euler_flux(&u, n);
            let mut flux = [0.0; 4];
            scheme.get_flux(&u, &u, n, &mut flux);
            for k in 0..4 {
                assert!(
                    (flux[k] - exact[k]).abs() < 5e-14,
                    "{} 分量 {}: {} vs {}",
                    scheme.name(),
                    k,
                    flux[k],
                    exact[k]
                );
            }
        }
    }
}

#[test]
fn all_fluxes_conservative_on_random_pairs() {
    let gas = IdealGasModel::new(1.4, 0.5, 288.15, 5.0e5, 0.72);
    for kind in all_schemes() {
        let scheme = create_riemann_scheme(kind, gas, 0.05);
        let mut rng = Lcg(0x2545_f491_4f6c_dd1d);
        for _ in 0..100 {
            let ul = rng.state(&gas);
            let ur = rng.state(&gas);
            let n = rng.normal();
            let mut f_ab = [0.0; 4];
            let mut f_ba = [0.0; 4];
            scheme.get_flux(&ul, &ur, n, &mut f_ab);
            scheme.get_flux(&ur, &ul, -n, &mut f_ba);
            let scale = f_ab.iter().fold(1.0f64, |m, v| m.max(v.abs()));
            for k in 0..4 {
                assert!(
                    (f_ab[k] + f_ba[k]).abs() < 1e-12 * scale,
                    "{} 分量 {}: {} vs {}",
                    scheme.name(),
                    k,
                    f_ab[k],
                    f_ba[k]
                );
            }
        }
    }
}
