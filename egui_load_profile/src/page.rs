//! 负载曲线页面控制器
//!
//! 每种场景各自持有一份参数、显示单位、控制点和交互状态，互不影响。
//! 页面负责把表单参数变化分发到当前场景：Auto 模式重新生成曲线，
//! Manual 模式只做按比例缩放。所有修改都在回调里同步完成，
//! 渲染端通过 `is_dirty` 和只读访问器拉取状态。

use crate::editor::{ProfileEditorCommand, ProfileEditorEvent};
use crate::error::{ProfileError, ProfileResult};
use crate::generator::{CurveGenerator, ScenarioCurveGenerator};
use crate::hit_test::DEFAULT_HIT_RADIUS;
use crate::interaction::{EditorInteractionController, InteractionState, PointerEvent};
use crate::mapper::CoordinateMapper;
use crate::rescale::{normalize_to_end, rescale, DURATION_EPSILON};
use crate::store::ControlPointStore;
use crate::structure::{
    classify_phases, ControlPoint, DurationUnit, EditMode, EditorState, LoadPhase, ScenarioKind,
    ScenarioParameters, TestType,
};
use crate::submission::{LoadTestConfiguration, SubmissionMetadata};
use egui::{Margin, Rect};
use std::collections::BTreeMap;

pub type SubscriptionId = u64;

type EventListener = Box<dyn FnMut(&ProfileEditorEvent)>;

struct ScenarioSlot {
    params: ScenarioParameters,
    unit: DurationUnit,
    store: ControlPointStore,
    controller: EditorInteractionController,
}

pub struct ProfilePage {
    slots: BTreeMap<ScenarioKind, ScenarioSlot>,
    active: ScenarioKind,
    generator: Box<dyn CurveGenerator>,
    test_type: TestType,
    editing_enabled: bool,
    show_phases: bool,
    hit_radius: f32,
    dirty: bool,

    // Events
    pending_events: Vec<ProfileEditorEvent>,
    listeners: Vec<(SubscriptionId, EventListener)>,
    next_subscription: SubscriptionId,
}

impl Default for ProfilePage {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfilePage {
    pub fn new() -> Self {
        Self::with_generator(Box::new(ScenarioCurveGenerator))
    }

    pub fn with_generator(generator: Box<dyn CurveGenerator>) -> Self {
        let mut page = Self {
            slots: BTreeMap::new(),
            active: ScenarioKind::default(),
            generator,
            test_type: TestType::default(),
            editing_enabled: false,
            show_phases: true,
            hit_radius: DEFAULT_HIT_RADIUS,
            dirty: true,
            pending_events: Vec::new(),
            listeners: Vec::new(),
            next_subscription: 0,
        };
        page.ensure_slot(page.active);
        page
    }

    // ---- 只读访问 ----

    pub fn active_kind(&self) -> ScenarioKind {
        self.active
    }

    pub fn parameters(&self) -> ScenarioParameters {
        self.active_slot()
            .map(|s| s.params)
            .unwrap_or_else(|| self.active.default_parameters())
    }

    pub fn duration_unit(&self) -> DurationUnit {
        self.active_slot().map(|s| s.unit).unwrap_or_default()
    }

    /// 当前单位下的时长显示值
    pub fn display_duration(&self) -> f64 {
        let params = self.parameters();
        self.duration_unit().from_minutes(params.total_duration)
    }

    pub fn test_type(&self) -> TestType {
        self.test_type
    }

    pub fn points(&self) -> &[ControlPoint] {
        self.active_slot().map(|s| s.store.points()).unwrap_or(&[])
    }

    pub fn phases(&self) -> Vec<LoadPhase> {
        classify_phases(self.points())
    }

    pub fn max_vus(&self) -> f64 {
        self.active_slot().map(|s| s.store.max_vus()).unwrap_or(1.0)
    }

    pub fn mode(&self) -> EditMode {
        self.active_slot().map(|s| s.controller.mode()).unwrap_or_default()
    }

    pub fn editor_state(&self) -> EditorState {
        self.active_slot()
            .map(|s| s.controller.editor_state())
            .unwrap_or_default()
    }

    pub fn editing_enabled(&self) -> bool {
        self.editing_enabled
    }

    pub fn show_phases(&self) -> bool {
        self.show_phases
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// 为当前场景构造坐标映射
    pub fn mapper(&self, surface: Rect, margin: Margin) -> CoordinateMapper {
        let params = self.parameters();
        let duration = self
            .active_slot()
            .map(|s| s.store.total_duration())
            .unwrap_or(params.total_duration);
        CoordinateMapper::new(surface, margin, self.max_vus(), duration)
    }

    pub fn set_hit_radius(&mut self, radius: f32) {
        self.hit_radius = radius;
        for slot in self.slots.values_mut() {
            slot.controller.set_hit_radius(radius);
        }
    }

    // ---- 事件 ----

    pub fn subscribe(&mut self, listener: EventListener) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn take_events(&mut self) -> Vec<ProfileEditorEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn emit_event(&mut self, event: ProfileEditorEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
        self.pending_events.push(event);
    }

    pub fn execute_command(&mut self, command: ProfileEditorCommand) {
        match command {
            ProfileEditorCommand::SelectScenario { kind } => self.select_scenario(kind),
            ProfileEditorCommand::UpdateParameters { params } => {
                if let Err(e) = self.update_parameters(params) {
                    log::debug!("UpdateParameters command rejected: {}", e);
                }
            }
            ProfileEditorCommand::SetDurationUnit { unit } => self.set_duration_unit(unit),
            ProfileEditorCommand::ApplyPreset { test_type } => self.apply_preset(test_type),
            ProfileEditorCommand::SetEditingEnabled { enabled } => self.set_editing_enabled(enabled),
            ProfileEditorCommand::SetShowPhases { show } => self.set_show_phases(show),
            ProfileEditorCommand::ResetActive => self.reset_active(),
            ProfileEditorCommand::ResetAll => self.reset_all(),
        }
    }

    // ---- 参数 ----

    pub fn select_scenario(&mut self, kind: ScenarioKind) {
        if kind == self.active && self.slots.contains_key(&kind) {
            return;
        }
        if let Some(slot) = self.slots.get_mut(&self.active) {
            slot.controller.clear_interaction();
        }
        self.ensure_slot(kind);
        self.active = kind;
        self.dirty = true;
        log::info!("Scenario switched to {}", kind.label());
        self.emit_event(ProfileEditorEvent::ScenarioSelected { kind });
    }

    /// 应用表单参数。非法参数被拒绝且不改动任何状态。
    pub fn update_parameters(&mut self, params: ScenarioParameters) -> ProfileResult<()> {
        if let Err(e) = params.validate() {
            log::warn!("Ignoring scenario parameters: {}", e);
            self.emit_event(ProfileEditorEvent::ParametersRejected { reason: e.to_string() });
            return Err(e);
        }

        let kind = params.scenario_kind;
        if kind != self.active {
            self.select_scenario(kind);
        }

        let manual = match self.slots.get_mut(&kind) {
            Some(slot) => {
                slot.params = params;
                slot.store.set_target_vus(params.target_vus);
                slot.controller.is_manual()
            }
            None => return Ok(()),
        };
        self.dirty = true;

        if manual {
            self.rescale_manual(kind, params.total_duration)
        } else {
            self.regenerate(kind)
        }
    }

    /// 切换显示单位：显示数值不变，按新单位重新解释（5 分钟 → 5 小时）
    pub fn set_duration_unit(&mut self, unit: DurationUnit) {
        let kind = self.active;
        let manual = match self.slots.get_mut(&kind) {
            Some(slot) if slot.unit != unit => {
                let shown = slot.unit.from_minutes(slot.params.total_duration);
                slot.unit = unit;
                slot.params.total_duration = unit.to_minutes(shown);
                slot.controller.is_manual()
            }
            _ => return,
        };
        log::debug!("Duration unit changed to {}", unit.label());
        self.dirty = true;
        self.emit_event(ProfileEditorEvent::DurationUnitChanged { unit });

        let result = if manual {
            self.normalize_manual(kind)
        } else {
            self.regenerate(kind)
        };
        if let Err(e) = result {
            log::error!("Failed to apply duration unit change: {}", e);
        }
    }

    /// 用预设参数替换该场景（回到 Auto 模式）并激活它
    pub fn apply_preset(&mut self, test_type: TestType) {
        let (params, unit) = test_type.preset();
        let kind = params.scenario_kind;
        log::info!("Applying {} preset", test_type.label());

        let was_manual = self.slots.get(&kind).map(|s| s.controller.is_manual()).unwrap_or(false);
        let slot = self.build_slot(params, unit);
        self.slots.insert(kind, slot);
        self.test_type = test_type;
        self.dirty = true;

        self.emit_event(ProfileEditorEvent::PresetApplied { test_type });
        if kind != self.active {
            if let Some(slot) = self.slots.get_mut(&self.active) {
                slot.controller.clear_interaction();
            }
            self.active = kind;
            self.emit_event(ProfileEditorEvent::ScenarioSelected { kind });
        }
        if was_manual {
            self.emit_event(ProfileEditorEvent::ModeChanged {
                kind,
                mode: EditMode::Auto,
            });
        }
        let points = self.points().to_vec();
        self.emit_event(ProfileEditorEvent::PointsReplaced { kind, points });
    }

    pub fn set_test_type(&mut self, test_type: TestType) {
        self.test_type = test_type;
    }

    pub fn reset_active(&mut self) {
        self.reset_kind(self.active);
    }

    pub fn reset_all(&mut self) {
        let kinds: Vec<ScenarioKind> = self.slots.keys().copied().collect();
        for kind in kinds {
            self.reset_kind(kind);
        }
    }

    fn reset_kind(&mut self, kind: ScenarioKind) {
        let was_manual = match self.slots.get_mut(&kind) {
            Some(slot) => {
                let was_manual = slot.controller.is_manual();
                slot.controller.reset();
                was_manual
            }
            None => return,
        };
        log::info!("Resetting {} curve", kind.label());
        self.dirty = true;
        if was_manual {
            self.emit_event(ProfileEditorEvent::ModeChanged {
                kind,
                mode: EditMode::Auto,
            });
        }
        if let Err(e) = self.regenerate(kind) {
            log::error!("Failed to regenerate {} curve: {}", kind.label(), e);
        }
    }

    pub fn set_editing_enabled(&mut self, enabled: bool) {
        if self.editing_enabled == enabled {
            return;
        }
        self.editing_enabled = enabled;
        for slot in self.slots.values_mut() {
            slot.controller.set_editing_enabled(enabled);
        }
        self.dirty = true;
        self.emit_event(ProfileEditorEvent::EditingChanged { enabled });
    }

    pub fn set_show_phases(&mut self, show: bool) {
        if self.show_phases == show {
            return;
        }
        self.show_phases = show;
        self.dirty = true;
        self.emit_event(ProfileEditorEvent::ShowPhasesChanged { show });
    }

    // ---- 指针 ----

    pub fn handle_pointer(&mut self, event: PointerEvent, mapper: &CoordinateMapper) {
        let kind = self.active;
        let Some(slot) = self.slots.get_mut(&kind) else {
            return;
        };

        let len_before = slot.store.len();
        let mode_before = slot.controller.mode();
        let dragged = match slot.controller.state() {
            InteractionState::Dragging(i) => Some(i),
            _ => None,
        };

        let outcome = slot.controller.handle(&mut slot.store, mapper, event);
        let len_after = slot.store.len();
        let mode_after = slot.controller.mode();

        if outcome.state_changed {
            self.dirty = true;
        }
        if mode_after != mode_before {
            self.emit_event(ProfileEditorEvent::ModeChanged { kind, mode: mode_after });
        }
        if !outcome.points_changed {
            return;
        }
        if len_after > len_before {
            self.emit_event(ProfileEditorEvent::PointAdded {
                kind,
                point_count: len_after,
            });
        } else if len_after < len_before {
            self.emit_event(ProfileEditorEvent::PointDeleted {
                kind,
                point_count: len_after,
            });
        } else if let Some(index) = dragged {
            self.emit_event(ProfileEditorEvent::PointUpdated { kind, index });
        }
    }

    /// 每帧调用一次
    pub fn tick(&mut self) {
        if let Some(slot) = self.slots.get_mut(&self.active) {
            slot.controller.tick();
        }
    }

    // ---- 提交 ----

    pub fn build_submission(&self, meta: &SubmissionMetadata) -> ProfileResult<LoadTestConfiguration> {
        LoadTestConfiguration::build(
            meta,
            self.test_type,
            &self.parameters(),
            self.duration_unit(),
            self.points(),
        )
    }

    /// 从保存的提交记录恢复场景。曲线与参数生成的结果不同时进入 Manual 模式。
    pub fn load_configuration(&mut self, config: &LoadTestConfiguration) -> ProfileResult<()> {
        let params = ScenarioParameters {
            scenario_kind: config.scenario_type,
            target_vus: config.virtual_users,
            total_duration: config.duration_unit.to_minutes(config.duration),
            ramp_up: config.ramp_up_duration.unwrap_or(0.0),
            ramp_down: config.ramp_down_duration.unwrap_or(0.0),
        };
        params.validate()?;
        let store = ControlPointStore::new(config.control_points.clone(), params.target_vus)?;
        if (store.total_duration() - params.total_duration).abs() > 1e-9 {
            return Err(ProfileError::InvalidSequence(format!(
                "curve ends at {} but the scenario lasts {}",
                store.total_duration(),
                params.total_duration
            )));
        }

        let kind = params.scenario_kind;
        let mut controller = EditorInteractionController::new(self.hit_radius);
        controller.set_editing_enabled(self.editing_enabled);
        if self.generator.generate(&params) != config.control_points {
            controller.mark_manual();
        }
        let mode = controller.mode();

        if let Some(slot) = self.slots.get_mut(&self.active) {
            slot.controller.clear_interaction();
        }
        self.slots.insert(
            kind,
            ScenarioSlot {
                params,
                unit: config.duration_unit,
                store,
                controller,
            },
        );
        self.test_type = config.test_type;
        self.active = kind;
        self.dirty = true;
        log::info!("Loaded {} configuration for {}", kind.label(), config.component);

        self.emit_event(ProfileEditorEvent::ScenarioSelected { kind });
        self.emit_event(ProfileEditorEvent::ModeChanged { kind, mode });
        self.emit_event(ProfileEditorEvent::PointsReplaced {
            kind,
            points: config.control_points.clone(),
        });
        Ok(())
    }

    // ---- 内部 ----

    fn active_slot(&self) -> Option<&ScenarioSlot> {
        self.slots.get(&self.active)
    }

    fn ensure_slot(&mut self, kind: ScenarioKind) {
        if !self.slots.contains_key(&kind) {
            let slot = self.build_slot(kind.default_parameters(), DurationUnit::default());
            self.slots.insert(kind, slot);
        }
    }

    fn build_slot(&self, params: ScenarioParameters, unit: DurationUnit) -> ScenarioSlot {
        let points = self.generator.generate(&params);
        let store = match ControlPointStore::new(points, params.target_vus) {
            Ok(store) => store,
            Err(e) => {
                log::error!("Generated curve for {} is invalid: {}", params.scenario_kind.label(), e);
                ControlPointStore::flat(params.total_duration, params.target_vus)
            }
        };
        let mut controller = EditorInteractionController::new(self.hit_radius);
        controller.set_editing_enabled(self.editing_enabled);
        ScenarioSlot {
            params,
            unit,
            store,
            controller,
        }
    }

    fn regenerate(&mut self, kind: ScenarioKind) -> ProfileResult<()> {
        let Some(slot) = self.slots.get_mut(&kind) else {
            return Ok(());
        };
        let points = self.generator.generate(&slot.params);
        slot.store.replace_all(points)?;
        slot.controller.clear_interaction();
        let points = slot.store.points().to_vec();
        self.emit_event(ProfileEditorEvent::PointsReplaced { kind, points });
        Ok(())
    }

    fn rescale_manual(&mut self, kind: ScenarioKind, new_duration: f64) -> ProfileResult<()> {
        let Some(slot) = self.slots.get_mut(&kind) else {
            return Ok(());
        };
        if (slot.store.total_duration() - new_duration).abs() < DURATION_EPSILON {
            return Ok(());
        }
        let scaled = rescale(slot.store.points(), new_duration);
        slot.store.replace_all(scaled)?;
        slot.controller.clear_interaction();
        log::debug!("Rescaled manual curve for {} to {:.2} min", kind.label(), new_duration);
        let points = slot.store.points().to_vec();
        self.emit_event(ProfileEditorEvent::PointsReplaced { kind, points });
        Ok(())
    }

    fn normalize_manual(&mut self, kind: ScenarioKind) -> ProfileResult<()> {
        let Some(slot) = self.slots.get_mut(&kind) else {
            return Ok(());
        };
        let normalized = normalize_to_end(slot.store.points(), slot.params.total_duration);
        slot.store.replace_all(normalized)?;
        slot.controller.clear_interaction();
        let points = slot.store.points().to_vec();
        self.emit_event(ProfileEditorEvent::PointsReplaced { kind, points });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate;
    use crate::mapper::default_margin;
    use egui::Pos2;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// 计数替身：记录生成器被调用的次数
    struct SpyGenerator {
        calls: Rc<Cell<usize>>,
    }

    impl CurveGenerator for SpyGenerator {
        fn generate(&self, params: &ScenarioParameters) -> Vec<ControlPoint> {
            self.calls.set(self.calls.get() + 1);
            generate(params)
        }
    }

    fn spy_page() -> (ProfilePage, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let page = ProfilePage::with_generator(Box::new(SpyGenerator { calls: calls.clone() }));
        (page, calls)
    }

    fn surface() -> Rect {
        Rect::from_min_max(Pos2::ZERO, Pos2::new(660.0, 500.0))
    }

    fn params(kind: ScenarioKind, vus: f64, duration: f64) -> ScenarioParameters {
        ScenarioParameters {
            scenario_kind: kind,
            target_vus: vus,
            total_duration: duration,
            ramp_up: 0.0,
            ramp_down: 0.0,
        }
    }

    /// 在空白处点击一次，插入一个点，页面进入 Manual
    fn insert_by_click(page: &mut ProfilePage, time: f64, vus: f64) {
        page.set_editing_enabled(true);
        let mapper = page.mapper(surface(), default_margin());
        let pos = mapper.to_pixel(&ControlPoint::new(time, vus));
        page.handle_pointer(PointerEvent::Click(pos), &mapper);
    }

    #[test]
    fn starts_with_default_fixed_scenario() {
        let page = ProfilePage::new();
        assert_eq!(page.active_kind(), ScenarioKind::FixedVus);
        assert_eq!(page.mode(), EditMode::Auto);
        assert_eq!(page.points().len(), 4);
        assert_eq!(page.points().last().map(|p| p.time), Some(5.0));
        assert!(!page.editing_enabled());
    }

    #[test]
    fn auto_mode_regenerates_on_parameter_change() {
        let (mut page, calls) = spy_page();
        assert_eq!(calls.get(), 1);
        page.update_parameters(params(ScenarioKind::FixedVus, 50.0, 10.0)).unwrap();
        assert_eq!(calls.get(), 2);
        assert_eq!(page.points()[1], ControlPoint::new(1.0, 50.0));
    }

    #[test]
    fn manual_latch_stops_regeneration() {
        let (mut page, calls) = spy_page();
        page.update_parameters(params(ScenarioKind::FixedVus, 50.0, 20.0)).unwrap();
        insert_by_click(&mut page, 10.0, 30.0);
        assert_eq!(page.mode(), EditMode::Manual);
        let calls_after_edit = calls.get();

        page.update_parameters(params(ScenarioKind::FixedVus, 80.0, 20.0)).unwrap();
        page.update_parameters(params(ScenarioKind::FixedVus, 90.0, 40.0)).unwrap();
        assert_eq!(calls.get(), calls_after_edit);
        assert_eq!(page.points().len(), 5);
        assert_eq!(page.max_vus(), 90.0);
    }

    #[test]
    fn drag_move_latches_manual() {
        let (mut page, calls) = spy_page();
        page.update_parameters(params(ScenarioKind::FixedVus, 50.0, 20.0)).unwrap();
        page.set_editing_enabled(true);
        let mapper = page.mapper(surface(), default_margin());
        let grab = mapper.to_pixel(&ControlPoint::new(19.0, 50.0));
        let target = mapper.to_pixel(&ControlPoint::new(15.0, 40.0));
        page.handle_pointer(PointerEvent::Down(grab), &mapper);
        page.handle_pointer(PointerEvent::Move(target), &mapper);
        page.handle_pointer(PointerEvent::Up(target), &mapper);
        assert_eq!(page.mode(), EditMode::Manual);
        assert_eq!(page.points()[2], ControlPoint::new(15.0, 40.0));
        let calls_after_edit = calls.get();

        page.update_parameters(params(ScenarioKind::FixedVus, 80.0, 40.0)).unwrap();
        assert_eq!(calls.get(), calls_after_edit);
        assert_eq!(page.points().len(), 4);
        assert_eq!(page.points().last().map(|p| p.time), Some(40.0));
    }

    #[test]
    fn secondary_click_delete_latches_manual() {
        let (mut page, calls) = spy_page();
        page.update_parameters(params(ScenarioKind::FixedVus, 50.0, 20.0)).unwrap();
        page.set_editing_enabled(true);
        let mapper = page.mapper(surface(), default_margin());
        let pos = mapper.to_pixel(&ControlPoint::new(1.0, 50.0));
        page.handle_pointer(PointerEvent::SecondaryClick(pos), &mapper);
        assert_eq!(page.mode(), EditMode::Manual);
        assert_eq!(page.points().len(), 3);
        let calls_after_edit = calls.get();

        page.update_parameters(params(ScenarioKind::FixedVus, 80.0, 40.0)).unwrap();
        assert_eq!(calls.get(), calls_after_edit);
        assert_eq!(page.points().len(), 3);
        assert_eq!(page.max_vus(), 80.0);
    }

    #[test]
    fn manual_duration_change_rescales_points() {
        let mut page = ProfilePage::new();
        page.update_parameters(params(ScenarioKind::FixedVus, 50.0, 20.0)).unwrap();
        insert_by_click(&mut page, 10.0, 30.0);
        let before: Vec<ControlPoint> = page.points().to_vec();

        page.update_parameters(params(ScenarioKind::FixedVus, 50.0, 40.0)).unwrap();
        let after = page.points();
        assert_eq!(after.len(), before.len());
        for (a, b) in before.iter().zip(after) {
            assert!((a.time * 2.0 - b.time).abs() < 1e-9);
            assert_eq!(a.vus, b.vus);
        }
    }

    #[test]
    fn reset_returns_to_auto_and_regenerates() {
        let (mut page, calls) = spy_page();
        page.update_parameters(params(ScenarioKind::FixedVus, 50.0, 20.0)).unwrap();
        insert_by_click(&mut page, 10.0, 30.0);
        let before = calls.get();
        page.reset_active();
        assert_eq!(page.mode(), EditMode::Auto);
        assert_eq!(calls.get(), before + 1);
        assert_eq!(page.points().len(), 4);
    }

    #[test]
    fn invalid_parameters_are_rejected_without_side_effects() {
        let (mut page, calls) = spy_page();
        let points = page.points().to_vec();
        page.take_events();
        let result = page.update_parameters(params(ScenarioKind::FixedVus, 10.0, 0.0));
        assert!(matches!(result, Err(ProfileError::InvalidParameters(_))));
        assert_eq!(calls.get(), 1);
        assert_eq!(page.points(), points.as_slice());
        assert!(matches!(
            page.take_events().as_slice(),
            [ProfileEditorEvent::ParametersRejected { .. }]
        ));
    }

    #[test]
    fn rejected_update_command_only_reports_event() {
        let (mut page, calls) = spy_page();
        let points = page.points().to_vec();
        page.take_events();
        page.execute_command(ProfileEditorCommand::UpdateParameters {
            params: params(ScenarioKind::FixedVus, -5.0, 20.0),
        });
        assert_eq!(calls.get(), 1);
        assert_eq!(page.points(), points.as_slice());
        assert!(matches!(
            page.take_events().as_slice(),
            [ProfileEditorEvent::ParametersRejected { .. }]
        ));
    }

    #[test]
    fn scenarios_keep_independent_curves() {
        let mut page = ProfilePage::new();
        page.update_parameters(params(ScenarioKind::FixedVus, 50.0, 20.0)).unwrap();
        insert_by_click(&mut page, 10.0, 30.0);

        page.select_scenario(ScenarioKind::ConstantArrivalRate);
        assert_eq!(page.mode(), EditMode::Auto);
        assert_eq!(page.points().len(), 2);

        page.select_scenario(ScenarioKind::FixedVus);
        assert_eq!(page.mode(), EditMode::Manual);
        assert_eq!(page.points().len(), 5);
    }

    #[test]
    fn parameters_for_other_kind_switch_scenario() {
        let mut page = ProfilePage::new();
        page.update_parameters(params(ScenarioKind::RampingVus, 100.0, 10.0)).unwrap();
        assert_eq!(page.active_kind(), ScenarioKind::RampingVus);
        assert_eq!(page.points()[1], ControlPoint::new(2.0, 100.0));
    }

    #[test]
    fn unit_change_reinterprets_duration() {
        let mut page = ProfilePage::new();
        page.set_duration_unit(DurationUnit::Hours);
        assert_eq!(page.parameters().total_duration, 300.0);
        assert_eq!(page.display_duration(), 5.0);
        assert_eq!(page.points().last().map(|p| p.time), Some(300.0));
    }

    #[test]
    fn unit_change_in_manual_normalizes_to_end() {
        let mut page = ProfilePage::new();
        page.update_parameters(params(ScenarioKind::FixedVus, 50.0, 20.0)).unwrap();
        insert_by_click(&mut page, 10.0, 30.0);
        let interior: Vec<ControlPoint> = page.points()[1..4].to_vec();

        page.set_duration_unit(DurationUnit::Hours);
        let points = page.points();
        assert_eq!(page.mode(), EditMode::Manual);
        assert_eq!(&points[1..4], interior.as_slice());
        assert_eq!(points.last().map(|p| p.time), Some(1200.0));
    }

    #[test]
    fn preset_replaces_slot_in_auto_mode() {
        let mut page = ProfilePage::new();
        insert_by_click(&mut page, 2.0, 5.0);
        page.apply_preset(TestType::Soak);
        assert_eq!(page.active_kind(), ScenarioKind::FixedVus);
        assert_eq!(page.mode(), EditMode::Auto);
        assert_eq!(page.duration_unit(), DurationUnit::Hours);
        assert_eq!(page.test_type(), TestType::Soak);
        assert_eq!(page.points().last().map(|p| p.time), Some(60.0));

        page.apply_preset(TestType::Stress);
        assert_eq!(page.active_kind(), ScenarioKind::RampingVus);
        assert_eq!(page.points()[1], ControlPoint::new(3.0, 200.0));
    }

    #[test]
    fn pointer_edits_emit_events() {
        let mut page = ProfilePage::new();
        page.update_parameters(params(ScenarioKind::FixedVus, 50.0, 20.0)).unwrap();
        page.take_events();
        insert_by_click(&mut page, 10.0, 30.0);
        let events = page.take_events();
        assert!(events.contains(&ProfileEditorEvent::EditingChanged { enabled: true }));
        assert!(events.contains(&ProfileEditorEvent::ModeChanged {
            kind: ScenarioKind::FixedVus,
            mode: EditMode::Manual,
        }));
        assert!(events.contains(&ProfileEditorEvent::PointAdded {
            kind: ScenarioKind::FixedVus,
            point_count: 5,
        }));
    }

    #[test]
    fn listeners_receive_events_until_unsubscribed() {
        let mut page = ProfilePage::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let id = page.subscribe(Box::new(move |e| sink.borrow_mut().push(e.clone())));

        page.set_show_phases(false);
        assert_eq!(seen.borrow().len(), 1);
        assert!(page.unsubscribe(id));
        page.set_show_phases(true);
        assert_eq!(seen.borrow().len(), 1);
        assert!(!page.unsubscribe(id));
    }

    #[test]
    fn dirty_flag_tracks_changes() {
        let mut page = ProfilePage::new();
        assert!(page.is_dirty());
        page.clear_dirty();
        page.set_show_phases(true);
        assert!(!page.is_dirty());
        page.execute_command(ProfileEditorCommand::SetShowPhases { show: false });
        assert!(page.is_dirty());
    }

    #[test]
    fn submission_uses_active_scenario() {
        let mut page = ProfilePage::new();
        page.apply_preset(TestType::Load);
        let meta = SubmissionMetadata {
            component: "search".to_string(),
            target_url: "https://example.com".to_string(),
            ..Default::default()
        };
        let config = page.build_submission(&meta).unwrap();
        assert_eq!(config.test_type, TestType::Load);
        assert_eq!(config.scenario_type, ScenarioKind::RampingVus);
        assert_eq!(config.virtual_users, 50.0);
        assert_eq!(config.control_points, page.points());
    }

    #[test]
    fn loading_edited_configuration_restores_manual_curve() {
        let mut source = ProfilePage::new();
        source.update_parameters(params(ScenarioKind::FixedVus, 50.0, 20.0)).unwrap();
        insert_by_click(&mut source, 10.0, 30.0);
        let meta = SubmissionMetadata {
            component: "search".to_string(),
            target_url: "https://example.com".to_string(),
            ..Default::default()
        };
        let config = source.build_submission(&meta).unwrap();

        let mut page = ProfilePage::new();
        page.select_scenario(ScenarioKind::RampingVus);
        page.load_configuration(&config).unwrap();
        assert_eq!(page.active_kind(), ScenarioKind::FixedVus);
        assert_eq!(page.mode(), EditMode::Manual);
        assert_eq!(page.points(), source.points());
    }

    #[test]
    fn loading_generated_configuration_stays_auto() {
        let mut source = ProfilePage::new();
        source.apply_preset(TestType::Spike);
        let meta = SubmissionMetadata {
            component: "search".to_string(),
            target_url: "https://example.com".to_string(),
            ..Default::default()
        };
        let mut config = source.build_submission(&meta).unwrap();

        let mut page = ProfilePage::new();
        page.load_configuration(&config).unwrap();
        assert_eq!(page.mode(), EditMode::Auto);
        assert_eq!(page.test_type(), TestType::Spike);

        config.duration = 3.0;
        assert!(page.load_configuration(&config).is_err());
    }
}
