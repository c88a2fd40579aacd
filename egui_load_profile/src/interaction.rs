//! 编辑交互状态机
//!
//! 把指针事件翻译成对 `ControlPointStore` 的修改（悬停 / 拖拽 / 添加 / 删除 / 预览），
//! 并维护 Auto / Manual 模式：任何一次实际的手动编辑都会把模式永久切到 Manual，
//! 之后参数变化只能按比例缩放，不会再覆盖用户的曲线。

use crate::hit_test::{find_nearest, DEFAULT_HIT_RADIUS};
use crate::mapper::CoordinateMapper;
use crate::store::ControlPointStore;
use crate::structure::{snap_time, ControlPoint, EditMode, EditorState};
use egui::Pos2;

/// 宿主转发的指针事件，坐标为绘图表面的像素坐标
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Move(Pos2),
    Down(Pos2),
    Up(Pos2),
    Click(Pos2),
    SecondaryClick(Pos2),
    Leave,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InteractionState {
    Idle,
    Hovering(usize),
    Dragging(usize),
    Previewing(ControlPoint),
}

/// 单个事件处理后的结果，页面据此决定是否需要重绘 / 通知
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InteractionOutcome {
    pub points_changed: bool,
    pub state_changed: bool,
}

#[derive(Clone, Debug)]
pub struct EditorInteractionController {
    state: InteractionState,
    mode: EditMode,
    editing_enabled: bool,
    // 拖拽后的第一次 click 需要被吞掉，在下一次 tick 时清除
    was_dragging: bool,
    hit_radius: f32,
}

impl Default for EditorInteractionController {
    fn default() -> Self {
        Self::new(DEFAULT_HIT_RADIUS)
    }
}

impl EditorInteractionController {
    pub fn new(hit_radius: f32) -> Self {
        Self {
            state: InteractionState::Idle,
            mode: EditMode::Auto,
            editing_enabled: false,
            was_dragging: false,
            hit_radius,
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_manual(&self) -> bool {
        self.mode == EditMode::Manual
    }

    pub fn editing_enabled(&self) -> bool {
        self.editing_enabled
    }

    pub fn set_hit_radius(&mut self, radius: f32) {
        self.hit_radius = radius;
    }

    pub fn set_editing_enabled(&mut self, enabled: bool) {
        self.editing_enabled = enabled;
        if !enabled {
            // 退出编辑时不保留拖拽和预览
            self.state = match self.state {
                InteractionState::Dragging(i) => InteractionState::Hovering(i),
                InteractionState::Previewing(_) => InteractionState::Idle,
                other => other,
            };
        }
    }

    pub fn mark_manual(&mut self) {
        if self.mode == EditMode::Auto {
            log::info!("Control points edited by hand, switching to manual mode");
        }
        self.mode = EditMode::Manual;
    }

    /// 显式重置：回到 Auto 模式并清空交互状态
    pub fn reset(&mut self) {
        self.mode = EditMode::Auto;
        self.clear_interaction();
    }

    /// 序列被整体替换后调用，旧下标不再有效
    pub fn clear_interaction(&mut self) {
        self.state = InteractionState::Idle;
        self.was_dragging = false;
    }

    pub fn editor_state(&self) -> EditorState {
        let (hovered_index, dragged_index, preview_point) = match self.state {
            InteractionState::Idle => (None, None, None),
            InteractionState::Hovering(i) => (Some(i), None, None),
            InteractionState::Dragging(i) => (Some(i), Some(i), None),
            InteractionState::Previewing(p) => (None, None, Some(p)),
        };
        EditorState {
            mode: self.mode,
            hovered_index,
            dragged_index,
            preview_point,
        }
    }

    /// 每帧调用一次。拖拽结束后的下一帧清除 was-dragging 锁存。
    pub fn tick(&mut self) {
        if !matches!(self.state, InteractionState::Dragging(_)) {
            self.was_dragging = false;
        }
    }

    pub fn handle(
        &mut self,
        store: &mut ControlPointStore,
        mapper: &CoordinateMapper,
        event: PointerEvent,
    ) -> InteractionOutcome {
        let before = self.editor_state();
        let points_changed = match event {
            PointerEvent::Move(pos) => self.on_move(store, mapper, pos),
            PointerEvent::Down(pos) => {
                self.on_down(store, mapper, pos);
                false
            }
            PointerEvent::Up(pos) => {
                if matches!(self.state, InteractionState::Dragging(_)) {
                    self.state = self.hover_state(store, mapper, pos);
                }
                false
            }
            PointerEvent::Click(pos) => self.on_click(store, mapper, pos),
            PointerEvent::SecondaryClick(pos) => self.on_secondary_click(store, mapper, pos),
            PointerEvent::Leave => {
                self.state = InteractionState::Idle;
                false
            }
        };
        InteractionOutcome {
            points_changed,
            state_changed: points_changed || self.editor_state() != before,
        }
    }

    fn on_move(&mut self, store: &mut ControlPointStore, mapper: &CoordinateMapper, pos: Pos2) -> bool {
        if let InteractionState::Dragging(index) = self.state {
            if self.editing_enabled && index < store.len() {
                self.was_dragging = true;
                let target = mapper.to_domain(pos);
                let changed = store.move_point(index, target.time, target.vus.round());
                self.mark_manual();
                return changed;
            }
            self.state = InteractionState::Idle;
        }

        self.state = match find_nearest(store.points(), mapper, pos, self.hit_radius) {
            Some(i) => InteractionState::Hovering(i),
            None if self.editing_enabled && mapper.contains(pos) => {
                InteractionState::Previewing(self.preview_at(store, mapper, pos))
            }
            None => InteractionState::Idle,
        };
        false
    }

    fn on_down(&mut self, store: &ControlPointStore, mapper: &CoordinateMapper, pos: Pos2) {
        if !self.editing_enabled {
            return;
        }
        if let Some(i) = find_nearest(store.points(), mapper, pos, self.hit_radius) {
            log::debug!("Start dragging control point {}", i);
            self.state = InteractionState::Dragging(i);
            self.was_dragging = false;
        }
    }

    fn on_click(&mut self, store: &mut ControlPointStore, mapper: &CoordinateMapper, pos: Pos2) -> bool {
        if !self.editing_enabled || self.was_dragging {
            return false;
        }
        if find_nearest(store.points(), mapper, pos, self.hit_radius).is_some() {
            return false;
        }

        let target = mapper.to_domain(pos);
        let inserted = store.insert_point(target.time, target.vus.round());
        if inserted {
            self.mark_manual();
            self.state = self.hover_state(store, mapper, pos);
        }
        inserted
    }

    fn on_secondary_click(
        &mut self,
        store: &mut ControlPointStore,
        mapper: &CoordinateMapper,
        pos: Pos2,
    ) -> bool {
        if !self.editing_enabled {
            return false;
        }
        let Some(index) = find_nearest(store.points(), mapper, pos, self.hit_radius) else {
            return false;
        };

        let deleted = store.delete_point(index);
        if deleted {
            self.mark_manual();
            self.state = InteractionState::Idle;
        }
        deleted
    }

    fn hover_state(&self, store: &ControlPointStore, mapper: &CoordinateMapper, pos: Pos2) -> InteractionState {
        match find_nearest(store.points(), mapper, pos, self.hit_radius) {
            Some(i) => InteractionState::Hovering(i),
            None => InteractionState::Idle,
        }
    }

    fn preview_at(&self, store: &ControlPointStore, mapper: &CoordinateMapper, pos: Pos2) -> ControlPoint {
        let target = mapper.to_domain(pos);
        ControlPoint::new(snap_time(target.time, store.total_duration()), target.vus.round())
    }
}
