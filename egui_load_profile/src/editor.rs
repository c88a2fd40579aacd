//! 编辑命令和事件模块
//!
//! 定义了负载曲线页面的命令系统和事件系统，用于与宿主应用交互。

use crate::structure::{ControlPoint, DurationUnit, EditMode, ScenarioKind, ScenarioParameters, TestType};

#[derive(Clone, Debug)]
pub enum ProfileEditorCommand {
    SelectScenario {
        kind: ScenarioKind,
    },
    UpdateParameters {
        params: ScenarioParameters,
    },
    SetDurationUnit {
        unit: DurationUnit,
    },
    ApplyPreset {
        test_type: TestType,
    },
    SetEditingEnabled {
        enabled: bool,
    },
    SetShowPhases {
        show: bool,
    },
    ResetActive,
    ResetAll,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ProfileEditorEvent {
    ScenarioSelected {
        kind: ScenarioKind,
    },
    /// 由生成器或缩放器整体替换
    PointsReplaced {
        kind: ScenarioKind,
        points: Vec<ControlPoint>,
    },
    PointAdded {
        kind: ScenarioKind,
        point_count: usize,
    },
    PointUpdated {
        kind: ScenarioKind,
        index: usize,
    },
    PointDeleted {
        kind: ScenarioKind,
        point_count: usize,
    },
    ModeChanged {
        kind: ScenarioKind,
        mode: EditMode,
    },
    ParametersRejected {
        reason: String,
    },
    DurationUnitChanged {
        unit: DurationUnit,
    },
    PresetApplied {
        test_type: TestType,
    },
    EditingChanged {
        enabled: bool,
    },
    ShowPhasesChanged {
        show: bool,
    },
}
