mod files;
mod form;

use eframe::egui;
use egui_load_profile::{
    ExecutionState, ExecutionTracker, LoadProfileEditor, LoadProfileEditorOptions, ProfileEditorCommand,
    SubmissionMetadata, TestType,
};

// 模拟执行时每秒推进的分钟数
const SIMULATED_MINUTES_PER_SECOND: f64 = 1.0;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "egui_load_profile Example",
        native_options,
        Box::new(|_cc| Ok(Box::new(LoadProfileApp::new()))),
    )
}

pub struct LoadProfileApp {
    editor: LoadProfileEditor,
    meta: SubmissionMetadata,
    tracker: Option<ExecutionTracker>,
    run_started_at: Option<f64>,
    status_message: Option<String>,
}

impl LoadProfileApp {
    fn new() -> Self {
        let mut editor = LoadProfileEditor::new(LoadProfileEditorOptions::default());
        editor.execute_command(ProfileEditorCommand::ApplyPreset {
            test_type: TestType::Load,
        });
        editor.execute_command(ProfileEditorCommand::SetEditingEnabled { enabled: true });

        Self {
            editor,
            meta: SubmissionMetadata {
                component: "checkout-service".to_string(),
                target_url: "https://staging.example.com/api/health".to_string(),
                ..Default::default()
            },
            tracker: None,
            run_started_at: None,
            status_message: None,
        }
    }

    fn start_run(&mut self, now: f64) {
        match self.editor.page().build_submission(&self.meta) {
            Ok(config) => {
                log::info!("Starting simulated run for {}", config.component);
                let mut tracker = ExecutionTracker::new(config.control_points);
                tracker.advance(0.0);
                self.tracker = Some(tracker);
                self.run_started_at = Some(now);
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("Cannot start run: {}", e);
                self.status_message = Some(e.to_string());
            }
        }
    }

    fn ui_run(&mut self, ui: &mut egui::Ui) {
        let now = ui.input(|i| i.time);

        ui.horizontal(|ui| {
            let running = self
                .tracker
                .as_ref()
                .map(|t| t.status().state == ExecutionState::Running)
                .unwrap_or(false);

            if ui.add_enabled(!running, egui::Button::new("▶ Start Run")).clicked() {
                self.start_run(now);
            }
            if ui.add_enabled(running, egui::Button::new("⏹ Stop")).clicked() {
                if let Some(tracker) = self.tracker.as_mut() {
                    tracker.fail("stopped by user");
                }
            }

            ui.separator();

            if ui.button("Export JSON…").clicked() {
                self.export_configuration();
            }
            if ui.button("Import JSON…").clicked() {
                self.import_configuration();
            }
        });

        if let (Some(tracker), Some(started)) = (self.tracker.as_mut(), self.run_started_at) {
            let status = tracker.advance((now - started) * SIMULATED_MINUTES_PER_SECOND).clone();
            if status.state == ExecutionState::Running {
                ui.ctx().request_repaint();
            }
            let text = match &status.state {
                ExecutionState::Failed(reason) => format!("Failed: {}", reason),
                state => format!("{:?} · {:.0}% · {} VUs", state, status.progress, status.current_vus),
            };
            ui.add(egui::ProgressBar::new((status.progress / 100.0) as f32).text(text));
        }

        if let Some(message) = &self.status_message {
            ui.colored_label(egui::Color32::from_rgb(255, 120, 80), message);
        }
    }
}

impl eframe::App for LoadProfileApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::SidePanel::left("profile_form")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.ui_form(ui);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.editor.ui(ui);
            ui.separator();
            self.ui_run(ui);
        });

        // Handle events
        for event in self.editor.take_events() {
            log::info!("[ProfileEditorEvent] {:?}", event);
        }
    }
}
