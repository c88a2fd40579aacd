//! 场景曲线生成
//!
//! 根据场景参数推导控制点序列。只在编辑器处于 Auto 模式时被调用，
//! 输出通过 `ControlPointStore::replace_all` 写入。
//!
//! 前置条件：参数已通过 `ScenarioParameters::validate`。生成器本身不做检查，
//! 非正的时长会产生退化的序列（随后会被 `replace_all` 拒绝）。

use crate::structure::{ControlPoint, ScenarioKind, ScenarioParameters};

/// 曲线生成的接缝，页面控制器通过它调用生成逻辑（测试里可以换成计数替身）
pub trait CurveGenerator {
    fn generate(&self, params: &ScenarioParameters) -> Vec<ControlPoint>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ScenarioCurveGenerator;

impl CurveGenerator for ScenarioCurveGenerator {
    fn generate(&self, params: &ScenarioParameters) -> Vec<ControlPoint> {
        generate(params)
    }
}

pub fn generate(params: &ScenarioParameters) -> Vec<ControlPoint> {
    let target = params.target_vus;
    let duration = params.total_duration;
    match params.scenario_kind {
        ScenarioKind::FixedVus => fixed_vus(target, duration),
        ScenarioKind::RampingVus => ramping_vus(target, duration, params.ramp_up, params.ramp_down),
        ScenarioKind::ConstantArrivalRate => constant_arrival_rate(target, duration),
    }
}

fn fixed_vus(target: f64, duration: f64) -> Vec<ControlPoint> {
    let ramp_time = (duration * 0.1).min(1.0);
    vec![
        ControlPoint::new(0.0, 0.0),
        ControlPoint::new(ramp_time, target),
        ControlPoint::new(duration - ramp_time, target),
        ControlPoint::new(duration, 0.0),
    ]
}

fn ramping_vus(target: f64, duration: f64, ramp_up: f64, ramp_down: f64) -> Vec<ControlPoint> {
    let ramp_up = if ramp_up > 0.0 { ramp_up } else { duration * 0.2 };
    let ramp_down = if ramp_down > 0.0 { ramp_down } else { duration * 0.1 };
    let plateau = duration - ramp_up - ramp_down;

    if plateau > 0.0 {
        vec![
            ControlPoint::new(0.0, 0.0),
            ControlPoint::new(ramp_up, target),
            ControlPoint::new(ramp_up + plateau, target),
            ControlPoint::new(duration, 0.0),
        ]
    } else {
        // 斜坡本身已占满时长：退化为三角形，避免斜坡重叠或倒置
        vec![
            ControlPoint::new(0.0, 0.0),
            ControlPoint::new(duration / 2.0, target),
            ControlPoint::new(duration, 0.0),
        ]
    }
}

fn constant_arrival_rate(target: f64, duration: f64) -> Vec<ControlPoint> {
    vec![ControlPoint::new(0.0, target), ControlPoint::new(duration, target)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::validate_sequence;

    fn params(kind: ScenarioKind, vus: f64, duration: f64, up: f64, down: f64) -> ScenarioParameters {
        ScenarioParameters {
            scenario_kind: kind,
            target_vus: vus,
            total_duration: duration,
            ramp_up: up,
            ramp_down: down,
        }
    }

    fn pairs(points: &[ControlPoint]) -> Vec<(f64, f64)> {
        points.iter().map(|p| (p.time, p.vus)).collect()
    }

    #[test]
    fn fixed_vus_ramps_one_minute_each_end() {
        let points = generate(&params(ScenarioKind::FixedVus, 50.0, 10.0, 0.0, 0.0));
        assert_eq!(pairs(&points), vec![(0.0, 0.0), (1.0, 50.0), (9.0, 50.0), (10.0, 0.0)]);
    }

    #[test]
    fn fixed_vus_short_duration_uses_tenth_ramp() {
        let points = generate(&params(ScenarioKind::FixedVus, 10.0, 5.0, 0.0, 0.0));
        assert_eq!(pairs(&points), vec![(0.0, 0.0), (0.5, 10.0), (4.5, 10.0), (5.0, 0.0)]);
    }

    #[test]
    fn ramping_vus_builds_trapezoid() {
        let points = generate(&params(ScenarioKind::RampingVus, 200.0, 10.0, 3.0, 1.0));
        assert_eq!(pairs(&points), vec![(0.0, 0.0), (3.0, 200.0), (9.0, 200.0), (10.0, 0.0)]);
    }

    #[test]
    fn ramping_vus_defaults_missing_ramps() {
        let points = generate(&params(ScenarioKind::RampingVus, 100.0, 10.0, 0.0, 0.0));
        assert_eq!(pairs(&points), vec![(0.0, 0.0), (2.0, 100.0), (9.0, 100.0), (10.0, 0.0)]);
    }

    #[test]
    fn ramping_vus_falls_back_to_triangle() {
        let points = generate(&params(ScenarioKind::RampingVus, 100.0, 5.0, 4.0, 4.0));
        assert_eq!(pairs(&points), vec![(0.0, 0.0), (2.5, 100.0), (5.0, 0.0)]);
    }

    #[test]
    fn constant_arrival_rate_is_flat() {
        let points = generate(&params(ScenarioKind::ConstantArrivalRate, 30.0, 8.0, 2.0, 2.0));
        assert_eq!(pairs(&points), vec![(0.0, 30.0), (8.0, 30.0)]);
    }

    #[test]
    fn generation_is_deterministic_and_valid() {
        for kind in ScenarioKind::ALL {
            for &(vus, duration, up, down) in &[(1.0, 0.5, 0.0, 0.0), (75.0, 30.0, 5.0, 2.0), (20.0, 600.0, 0.0, 50.0)] {
                let p = params(kind, vus, duration, up, down);
                let first = generate(&p);
                let second = ScenarioCurveGenerator.generate(&p);
                assert_eq!(first, second);
                assert!(validate_sequence(&first).is_ok(), "{:?} {:?}", kind, first);
                assert_eq!(first.last().map(|p| p.time), Some(duration));
            }
        }
    }
}
