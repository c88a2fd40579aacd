//! Toolbar module
//!
//! 曲线上方的工具栏：编辑开关、阶段显示开关、时长单位和重置。

use crate::editor::ProfileEditorCommand;
use crate::page::ProfilePage;
use crate::structure::{DurationUnit, EditMode};
use egui::*;

pub struct Toolbar {
    editing_enabled: bool,
    show_phases: bool,
    unit: DurationUnit,
    mode: EditMode,
}

impl Toolbar {
    pub fn new(page: &ProfilePage) -> Self {
        Self {
            editing_enabled: page.editing_enabled(),
            show_phases: page.show_phases(),
            unit: page.duration_unit(),
            mode: page.mode(),
        }
    }

    pub fn ui(&mut self, ui: &mut Ui, command_callback: &mut dyn FnMut(ProfileEditorCommand)) {
        ui.horizontal(|ui| {
            let mut editing = self.editing_enabled;
            if ui.toggle_value(&mut editing, "✏ Edit Curve").changed() {
                command_callback(ProfileEditorCommand::SetEditingEnabled { enabled: editing });
            }

            let mut show_phases = self.show_phases;
            if ui.checkbox(&mut show_phases, "Phases").changed() {
                command_callback(ProfileEditorCommand::SetShowPhases { show: show_phases });
            }

            ui.separator();

            ui.label("Unit:");
            for unit in [DurationUnit::Minutes, DurationUnit::Hours] {
                if ui.selectable_label(self.unit == unit, unit.label()).clicked() && self.unit != unit {
                    command_callback(ProfileEditorCommand::SetDurationUnit { unit });
                }
            }

            ui.separator();

            // 只有手动编辑过的曲线才需要重置
            if ui
                .add_enabled(self.mode == EditMode::Manual, Button::new("⟲ Reset Curve"))
                .on_hover_text("Discard manual edits and regenerate from parameters")
                .clicked()
            {
                command_callback(ProfileEditorCommand::ResetActive);
            }
            if ui.button("Reset All").clicked() {
                command_callback(ProfileEditorCommand::ResetAll);
            }

            if self.editing_enabled {
                ui.separator();
                ui.weak("Click to add · drag to move · right-click to delete");
            }
        });
    }
}
