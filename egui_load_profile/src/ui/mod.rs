//! UI 模块
//!
//! 负载曲线编辑器的 egui 组件：工具栏、绘图区和状态栏。
//! 绘图区只读取页面状态进行绘制，指针输入被翻译成 `PointerEvent` 交给页面处理。

mod renderer;
mod statusbar;
mod toolbar;

use crate::editor::{ProfileEditorCommand, ProfileEditorEvent};
use crate::hit_test::DEFAULT_HIT_RADIUS;
use crate::interaction::PointerEvent;
use crate::mapper::default_margin;
use crate::page::{ProfilePage, SubscriptionId};
use egui::*;

#[derive(Clone)]
pub struct LoadProfileEditorOptions {
    pub margin: Margin,
    pub point_radius: f32,
    pub hit_radius: f32,
    pub height: f32,
}

impl Default for LoadProfileEditorOptions {
    fn default() -> Self {
        Self {
            margin: default_margin(),
            point_radius: 7.0,
            hit_radius: DEFAULT_HIT_RADIUS,
            height: 400.0,
        }
    }
}

pub struct LoadProfileEditor {
    page: ProfilePage,
    options: LoadProfileEditorOptions,

    // Interaction state
    was_hovered: bool,
    last_pointer: Option<Pos2>,
}

impl LoadProfileEditor {
    pub fn new(options: LoadProfileEditorOptions) -> Self {
        Self::with_page(ProfilePage::new(), options)
    }

    pub fn with_page(mut page: ProfilePage, options: LoadProfileEditorOptions) -> Self {
        page.set_hit_radius(options.hit_radius);
        Self {
            page,
            options,
            was_hovered: false,
            last_pointer: None,
        }
    }

    pub fn page(&self) -> &ProfilePage {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut ProfilePage {
        &mut self.page
    }

    pub fn options(&self) -> &LoadProfileEditorOptions {
        &self.options
    }

    pub fn subscribe(&mut self, listener: Box<dyn FnMut(&ProfileEditorEvent)>) -> SubscriptionId {
        self.page.subscribe(listener)
    }

    pub fn take_events(&mut self) -> Vec<ProfileEditorEvent> {
        self.page.take_events()
    }

    pub fn execute_command(&mut self, command: ProfileEditorCommand) {
        self.page.execute_command(command);
    }

    pub fn ui(&mut self, ui: &mut Ui) {
        self.page.tick();

        ui.vertical(|ui| {
            let mut toolbar = toolbar::Toolbar::new(&self.page);
            toolbar.ui(ui, &mut |cmd| {
                self.page.execute_command(cmd);
            });

            ui.separator();

            self.ui_plot(ui);

            ui.separator();

            let mut status = statusbar::StatusBar::new(&self.page);
            status.ui(ui);
        });

        // 拖拽期间持续重绘，其它情况只在状态变化时重绘
        if self.page.is_dirty() || self.page.editor_state().dragged_index.is_some() {
            ui.ctx().request_repaint();
            self.page.clear_dirty();
        }
    }

    fn ui_plot(&mut self, ui: &mut Ui) {
        let size = Vec2::new(ui.available_width(), self.options.height);
        let response = ui.allocate_response(size, Sense::click_and_drag());
        let surface = response.rect;
        let mapper = self.page.mapper(surface, self.options.margin);

        self.handle_pointer(ui, &response, &mapper);

        // 指针事件可能改变了 max_vus，重新取一次映射用于绘制
        let mapper = self.page.mapper(surface, self.options.margin);
        let painter = ui.painter_at(surface);
        let state = self.page.editor_state();
        let unit = self.page.duration_unit();

        painter.rect_filled(surface, 4.0, Color32::from_gray(24));
        renderer::draw_grid(&painter, &mapper);
        if self.page.show_phases() {
            renderer::draw_phases(&painter, &mapper, &self.page.phases());
        }
        renderer::draw_curve(&painter, &mapper, self.page.points());
        if let Some(preview) = state.preview_point {
            renderer::draw_preview(&painter, &mapper, &preview, self.options.point_radius);
        }
        renderer::draw_points(
            &painter,
            &mapper,
            self.page.points(),
            &state,
            self.options.point_radius,
            self.page.editing_enabled(),
        );
        renderer::draw_axes(&painter, &mapper, unit);

        let tooltip_point = state
            .hovered_index
            .and_then(|i| self.page.points().get(i).copied())
            .or(state.preview_point);
        if let Some(point) = tooltip_point {
            renderer::draw_tooltip(&painter, &mapper, &point, unit);
        }
    }

    fn handle_pointer(&mut self, ui: &Ui, response: &Response, mapper: &crate::mapper::CoordinateMapper) {
        let pointer = ui.input(|i| i.pointer.interact_pos());
        let dragging = self.page.editor_state().dragged_index.is_some();

        if response.drag_started() {
            if let Some(origin) = ui.input(|i| i.pointer.press_origin()) {
                self.page.handle_pointer(PointerEvent::Down(origin), mapper);
            }
        }

        let hovered = response.hovered() || response.dragged();
        if hovered {
            if let Some(pos) = pointer {
                if self.last_pointer != Some(pos) || response.drag_started() {
                    self.page.handle_pointer(PointerEvent::Move(pos), mapper);
                    self.last_pointer = Some(pos);
                }
            }
        } else if self.was_hovered && !dragging {
            self.page.handle_pointer(PointerEvent::Leave, mapper);
            self.last_pointer = None;
        }
        self.was_hovered = hovered;

        if response.drag_stopped() {
            if let Some(pos) = pointer {
                self.page.handle_pointer(PointerEvent::Up(pos), mapper);
            }
        }
        if response.clicked() {
            if let Some(pos) = pointer {
                self.page.handle_pointer(PointerEvent::Click(pos), mapper);
            }
        }
        if response.secondary_clicked() {
            if let Some(pos) = pointer {
                self.page.handle_pointer(PointerEvent::SecondaryClick(pos), mapper);
            }
        }
    }
}
