//! 参数表单
//!
//! 左侧面板：测试预设、场景参数和提交元数据。参数变化通过命令交给编辑器。

use crate::LoadProfileApp;
use eframe::egui;
use egui_load_profile::{KeyValue, ProfileEditorCommand, ScenarioKind, TestType, Threshold};

impl LoadProfileApp {
    pub fn ui_form(&mut self, ui: &mut egui::Ui) {
        ui.heading("Load Test");
        ui.add_space(4.0);

        self.ui_scenario(ui);

        ui.separator();
        ui.heading("Target");
        egui::Grid::new("target_grid").num_columns(2).show(ui, |ui| {
            ui.label("Component:");
            ui.text_edit_singleline(&mut self.meta.component);
            ui.end_row();
            ui.label("URL:");
            ui.text_edit_singleline(&mut self.meta.target_url);
            ui.end_row();
        });

        ui.separator();
        ui.collapsing("Headers", |ui| {
            key_value_rows(ui, "header", &mut self.meta.headers);
        });
        ui.collapsing("Environment Variables", |ui| {
            key_value_rows(ui, "env", &mut self.meta.environment_variables);
        });
        ui.collapsing("Thresholds", |ui| {
            threshold_rows(ui, &mut self.meta.thresholds);
        });
    }

    fn ui_scenario(&mut self, ui: &mut egui::Ui) {
        let page = self.editor.page();
        let current_test = page.test_type();
        let mut params = page.parameters();
        let unit = page.duration_unit();
        let mut commands = Vec::new();

        egui::Grid::new("scenario_grid").num_columns(2).show(ui, |ui| {
            ui.label("Preset:");
            egui::ComboBox::from_id_salt("test_type")
                .selected_text(current_test.label())
                .show_ui(ui, |ui| {
                    for test_type in TestType::ALL {
                        if ui.selectable_label(test_type == current_test, test_type.label()).clicked() {
                            commands.push(ProfileEditorCommand::ApplyPreset { test_type });
                        }
                    }
                });
            ui.end_row();

            ui.label("Scenario:");
            egui::ComboBox::from_id_salt("scenario_kind")
                .selected_text(params.scenario_kind.label())
                .show_ui(ui, |ui| {
                    for kind in ScenarioKind::ALL {
                        if ui.selectable_label(kind == params.scenario_kind, kind.label()).clicked() {
                            commands.push(ProfileEditorCommand::SelectScenario { kind });
                        }
                    }
                });
            ui.end_row();

            let mut changed = false;

            ui.label("Virtual users:");
            changed |= ui
                .add(egui::DragValue::new(&mut params.target_vus).speed(1.0).range(1.0..=100_000.0))
                .changed();
            ui.end_row();

            ui.label(format!("Duration ({}):", unit.label()));
            let mut shown = unit.from_minutes(params.total_duration);
            if ui
                .add(egui::DragValue::new(&mut shown).speed(0.1).range(0.1..=10_000.0))
                .changed()
            {
                params.total_duration = unit.to_minutes(shown);
                changed = true;
            }
            ui.end_row();

            if params.scenario_kind == ScenarioKind::RampingVus {
                ui.label("Ramp up (min):");
                changed |= ui
                    .add(egui::DragValue::new(&mut params.ramp_up).speed(0.1).range(0.0..=10_000.0))
                    .changed();
                ui.end_row();

                ui.label("Ramp down (min):");
                changed |= ui
                    .add(egui::DragValue::new(&mut params.ramp_down).speed(0.1).range(0.0..=10_000.0))
                    .changed();
                ui.end_row();
            }

            if changed {
                commands.push(ProfileEditorCommand::UpdateParameters { params });
            }
        });

        for command in commands {
            self.editor.execute_command(command);
        }
    }
}

fn key_value_rows(ui: &mut egui::Ui, id: &str, rows: &mut Vec<KeyValue>) {
    let mut remove = None;
    for (i, row) in rows.iter_mut().enumerate() {
        ui.push_id((id, i), |ui| {
            ui.horizontal(|ui| {
                ui.add(egui::TextEdit::singleline(&mut row.key).hint_text("key").desired_width(110.0));
                ui.add(egui::TextEdit::singleline(&mut row.value).hint_text("value").desired_width(110.0));
                if ui.small_button("✖").clicked() {
                    remove = Some(i);
                }
            });
        });
    }
    if let Some(i) = remove {
        rows.remove(i);
    }
    if ui.button("+ Add").clicked() {
        rows.push(KeyValue::default());
    }
}

fn threshold_rows(ui: &mut egui::Ui, rows: &mut Vec<Threshold>) {
    let mut remove = None;
    for (i, row) in rows.iter_mut().enumerate() {
        ui.push_id(("threshold", i), |ui| {
            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut row.metric)
                        .hint_text("http_req_duration")
                        .desired_width(110.0),
                );
                ui.add(
                    egui::TextEdit::singleline(&mut row.condition)
                        .hint_text("p(95)<500")
                        .desired_width(110.0),
                );
                if ui.small_button("✖").clicked() {
                    remove = Some(i);
                }
            });
        });
    }
    if let Some(i) = remove {
        rows.remove(i);
    }
    if ui.button("+ Add").clicked() {
        rows.push(Threshold::default());
    }
}
