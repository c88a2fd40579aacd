//! 数据结构模块
//!
//! 定义了负载曲线编辑器使用的核心数据结构：控制点、场景参数、
//! 时长单位、预设测试类型以及编辑器状态。
//!
//! 所有控制点的 `time` 一律以分钟存储，显示单位只影响标签格式。

use crate::error::{ProfileError, ProfileResult};
use serde::{Deserialize, Serialize};

/// 负载曲线上的一个顶点
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub time: f64, // 分钟
    pub vus: f64,  // 并发虚拟用户数
}

impl ControlPoint {
    pub const fn new(time: f64, vus: f64) -> Self {
        Self { time, vus }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioKind {
    FixedVus,
    RampingVus,
    ConstantArrivalRate,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 3] = [
        ScenarioKind::FixedVus,
        ScenarioKind::RampingVus,
        ScenarioKind::ConstantArrivalRate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ScenarioKind::FixedVus => "Fixed VUs",
            ScenarioKind::RampingVus => "Ramping VUs",
            ScenarioKind::ConstantArrivalRate => "Constant Arrival Rate",
        }
    }

    /// 首次选中某个场景时使用的参数（与表单初始值一致）
    pub fn default_parameters(&self) -> ScenarioParameters {
        ScenarioParameters {
            scenario_kind: *self,
            target_vus: 10.0,
            total_duration: 5.0,
            ramp_up: 0.0,
            ramp_down: 0.0,
        }
    }
}

impl Default for ScenarioKind {
    fn default() -> Self {
        ScenarioKind::FixedVus
    }
}

/// 由外部表单提供的场景参数，核心只读
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParameters {
    pub scenario_kind: ScenarioKind,
    pub target_vus: f64,
    pub total_duration: f64, // 分钟
    pub ramp_up: f64,
    pub ramp_down: f64,
}

impl Default for ScenarioParameters {
    fn default() -> Self {
        ScenarioKind::default().default_parameters()
    }
}

impl ScenarioParameters {
    /// 生成器要求的前置条件：时长和目标 VU 为正，斜坡非负
    pub fn validate(&self) -> ProfileResult<()> {
        if !self.total_duration.is_finite() || self.total_duration <= 0.0 {
            return Err(ProfileError::InvalidParameters(format!(
                "total duration must be positive, got {}",
                self.total_duration
            )));
        }
        if !self.target_vus.is_finite() || self.target_vus <= 0.0 {
            return Err(ProfileError::InvalidParameters(format!(
                "target VUs must be positive, got {}",
                self.target_vus
            )));
        }
        if !(self.ramp_up >= 0.0) || !(self.ramp_down >= 0.0) {
            return Err(ProfileError::InvalidParameters(format!(
                "ramp durations must be non-negative, got {} / {}",
                self.ramp_up, self.ramp_down
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Minutes,
    Hours,
}

impl Default for DurationUnit {
    fn default() -> Self {
        DurationUnit::Minutes
    }
}

impl DurationUnit {
    pub fn to_minutes(&self, value: f64) -> f64 {
        match self {
            DurationUnit::Minutes => value,
            DurationUnit::Hours => value * 60.0,
        }
    }

    pub fn from_minutes(&self, minutes: f64) -> f64 {
        match self {
            DurationUnit::Minutes => minutes,
            DurationUnit::Hours => minutes / 60.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DurationUnit::Minutes => "minutes",
            DurationUnit::Hours => "hours",
        }
    }
}

/// 命名的测试预设
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    Load,
    Stress,
    Spike,
    Soak,
}

impl Default for TestType {
    fn default() -> Self {
        TestType::Load
    }
}

impl TestType {
    pub const ALL: [TestType; 4] = [TestType::Load, TestType::Stress, TestType::Spike, TestType::Soak];

    pub fn label(&self) -> &'static str {
        match self {
            TestType::Load => "Load Test",
            TestType::Stress => "Stress Test",
            TestType::Spike => "Spike Test",
            TestType::Soak => "Soak Test",
        }
    }

    /// 预设参数及其显示单位。`total_duration` 已换算为分钟。
    pub fn preset(&self) -> (ScenarioParameters, DurationUnit) {
        let (kind, vus, duration, unit, ramp_up, ramp_down) = match self {
            TestType::Load => (ScenarioKind::RampingVus, 50.0, 5.0, DurationUnit::Minutes, 1.0, 0.5),
            TestType::Stress => (ScenarioKind::RampingVus, 200.0, 10.0, DurationUnit::Minutes, 3.0, 1.0),
            TestType::Spike => (ScenarioKind::RampingVus, 100.0, 1.0, DurationUnit::Minutes, 0.08, 0.08),
            TestType::Soak => (ScenarioKind::FixedVus, 20.0, 1.0, DurationUnit::Hours, 0.0, 0.0),
        };
        (
            ScenarioParameters {
                scenario_kind: kind,
                target_vus: vus,
                total_duration: unit.to_minutes(duration),
                ramp_up,
                ramp_down,
            },
            unit,
        )
    }
}

/// Auto：参数变化时重新生成曲线；Manual：保留用户编辑，只做按比例缩放
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Auto,
    Manual,
}

/// 供渲染读取的编辑器状态快照
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct EditorState {
    pub mode: EditMode,
    pub hovered_index: Option<usize>,
    pub dragged_index: Option<usize>,
    pub preview_point: Option<ControlPoint>,
}

/// 时间吸附步长：长场景粗，短场景细
pub fn time_step(total_duration: f64) -> f64 {
    if total_duration > 60.0 {
        5.0
    } else if total_duration > 10.0 {
        1.0
    } else {
        0.2
    }
}

/// 钳制到 `[0, total_duration]` 后对齐到步长网格
pub fn snap_time(time: f64, total_duration: f64) -> f64 {
    let step = time_step(total_duration);
    let clamped = time.clamp(0.0, total_duration);
    ((clamped / step).round() * step).clamp(0.0, total_duration)
}

/// 纵轴上限：目标 VU 与所有控制点 VU 的最大值，至少为 1
pub fn max_vus(target_vus: f64, points: &[ControlPoint]) -> f64 {
    points
        .iter()
        .map(|p| p.vus)
        .fold(target_vus.max(1.0), f64::max)
}

/// 检查序列不变量：至少两个点、值有限且非负、首点为 0、时间严格递增
pub fn validate_sequence(points: &[ControlPoint]) -> ProfileResult<()> {
    if points.len() < 2 {
        return Err(ProfileError::InvalidSequence(format!(
            "need at least 2 points, got {}",
            points.len()
        )));
    }
    for (i, p) in points.iter().enumerate() {
        if !p.time.is_finite() || !p.vus.is_finite() || p.time < 0.0 || p.vus < 0.0 {
            return Err(ProfileError::InvalidSequence(format!(
                "point {} is out of range: ({}, {})",
                i, p.time, p.vus
            )));
        }
    }
    if points[0].time != 0.0 {
        return Err(ProfileError::InvalidSequence(format!(
            "first point must start at 0, got {}",
            points[0].time
        )));
    }
    if let Some(i) = points.windows(2).position(|w| w[1].time <= w[0].time) {
        return Err(ProfileError::InvalidSequence(format!(
            "times must be strictly increasing (index {})",
            i + 1
        )));
    }
    Ok(())
}

/// 曲线在 `time` 处的线性插值
pub fn vus_at(points: &[ControlPoint], time: f64) -> f64 {
    let (first, last) = match (points.first(), points.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return 0.0,
    };
    if time <= first.time {
        return first.vus;
    }
    if time >= last.time {
        return last.vus;
    }
    for w in points.windows(2) {
        let (a, b) = (w[0], w[1]);
        if time >= a.time && time <= b.time {
            let span = b.time - a.time;
            if span <= 0.0 {
                return b.vus;
            }
            let t = (time - a.time) / span;
            return a.vus + (b.vus - a.vus) * t;
        }
    }
    last.vus
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseKind {
    Steady,
    RampUp,
    RampDown,
}

impl PhaseKind {
    pub fn label(&self) -> &'static str {
        match self {
            PhaseKind::Steady => "STEADY",
            PhaseKind::RampUp => "RAMP-UP",
            PhaseKind::RampDown => "RAMP-DOWN",
        }
    }
}

/// 两个相邻控制点之间的一段
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoadPhase {
    pub start: f64,
    pub end: f64,
    pub kind: PhaseKind,
}

pub fn classify_phases(points: &[ControlPoint]) -> Vec<LoadPhase> {
    points
        .windows(2)
        .map(|w| {
            let delta = w[1].vus - w[0].vus;
            let kind = if delta.abs() < 1.0 {
                PhaseKind::Steady
            } else if delta > 0.0 {
                PhaseKind::RampUp
            } else {
                PhaseKind::RampDown
            };
            LoadPhase {
                start: w[0].time,
                end: w[1].time,
                kind,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<ControlPoint> {
        raw.iter().map(|&(t, v)| ControlPoint::new(t, v)).collect()
    }

    #[test]
    fn time_step_depends_on_duration() {
        assert_eq!(time_step(120.0), 5.0);
        assert_eq!(time_step(60.0), 1.0);
        assert_eq!(time_step(11.0), 1.0);
        assert_eq!(time_step(10.0), 0.2);
        assert_eq!(time_step(1.0), 0.2);
    }

    #[test]
    fn snap_time_rounds_and_clamps() {
        assert_eq!(snap_time(3.02, 20.0), 3.0);
        assert_eq!(snap_time(-4.0, 20.0), 0.0);
        assert_eq!(snap_time(99.0, 20.0), 20.0);
        // 最后一格 10.0 超出终点，钳回 9.95
        assert_eq!(snap_time(9.95, 9.95), 9.95);
    }

    #[test]
    fn max_vus_has_floor_of_one() {
        assert_eq!(max_vus(0.0, &pts(&[(0.0, 0.0), (1.0, 0.0)])), 1.0);
        assert_eq!(max_vus(50.0, &pts(&[(0.0, 0.0), (1.0, 80.0)])), 80.0);
        assert_eq!(max_vus(50.0, &pts(&[(0.0, 0.0), (1.0, 20.0)])), 50.0);
    }

    #[test]
    fn validate_sequence_rejects_broken_sequences() {
        assert!(validate_sequence(&pts(&[(0.0, 0.0), (5.0, 10.0)])).is_ok());
        assert!(validate_sequence(&pts(&[(0.0, 0.0)])).is_err());
        assert!(validate_sequence(&pts(&[(1.0, 0.0), (5.0, 10.0)])).is_err());
        assert!(validate_sequence(&pts(&[(0.0, 0.0), (2.0, 1.0), (2.0, 3.0), (5.0, 0.0)])).is_err());
        assert!(validate_sequence(&pts(&[(0.0, -1.0), (5.0, 10.0)])).is_err());
        assert!(validate_sequence(&pts(&[(0.0, 0.0), (f64::NAN, 10.0)])).is_err());
    }

    #[test]
    fn vus_at_interpolates_segments() {
        let points = pts(&[(0.0, 0.0), (2.0, 100.0), (4.0, 100.0), (5.0, 0.0)]);
        assert_eq!(vus_at(&points, 1.0), 50.0);
        assert_eq!(vus_at(&points, 3.0), 100.0);
        assert_eq!(vus_at(&points, 4.5), 50.0);
        assert_eq!(vus_at(&points, 10.0), 0.0);
        assert_eq!(vus_at(&[], 1.0), 0.0);
    }

    #[test]
    fn phases_follow_vu_direction() {
        let points = pts(&[(0.0, 0.0), (1.0, 50.0), (9.0, 50.5), (10.0, 0.0)]);
        let kinds: Vec<_> = classify_phases(&points).iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![PhaseKind::RampUp, PhaseKind::Steady, PhaseKind::RampDown]);
    }

    #[test]
    fn presets_are_valid_parameters() {
        for test_type in TestType::ALL {
            let (params, _) = test_type.preset();
            assert!(params.validate().is_ok(), "{:?}", test_type);
        }
        let (soak, unit) = TestType::Soak.preset();
        assert_eq!(unit, DurationUnit::Hours);
        assert_eq!(soak.total_duration, 60.0);
    }

    #[test]
    fn parameter_validation_catches_degenerate_input() {
        let mut params = ScenarioParameters::default();
        params.total_duration = 0.0;
        assert!(params.validate().is_err());
        params.total_duration = 5.0;
        params.target_vus = -3.0;
        assert!(params.validate().is_err());
        params.target_vus = 3.0;
        params.ramp_up = f64::NAN;
        assert!(params.validate().is_err());
    }

    #[test]
    fn scenario_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&ScenarioKind::ConstantArrivalRate).unwrap();
        assert_eq!(json, "\"constant-arrival-rate\"");
    }
}
