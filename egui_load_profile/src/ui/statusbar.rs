//! Status bar module
//!
//! Displays the edit mode, point count and the hovered control point.

use crate::page::ProfilePage;
use crate::structure::{ControlPoint, DurationUnit, EditMode, ScenarioKind};
use crate::utils::format_time_label;
use egui::*;

pub struct StatusBar {
    kind: ScenarioKind,
    mode: EditMode,
    point_count: usize,
    total_duration: f64,
    unit: DurationUnit,
    hovered: Option<(usize, ControlPoint)>,
}

impl StatusBar {
    pub fn new(page: &ProfilePage) -> Self {
        let state = page.editor_state();
        let hovered = state
            .hovered_index
            .and_then(|i| page.points().get(i).map(|p| (i, *p)));
        Self {
            kind: page.active_kind(),
            mode: state.mode,
            point_count: page.points().len(),
            total_duration: page.parameters().total_duration,
            unit: page.duration_unit(),
            hovered,
        }
    }

    pub fn ui(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.label(format!("Scenario: {}", self.kind.label()));

            ui.separator();

            let mode = match self.mode {
                EditMode::Auto => "Auto",
                EditMode::Manual => "Manual",
            };
            ui.label(format!("Mode: {}", mode));

            ui.separator();

            ui.label(format!("Points: {}", self.point_count));

            ui.separator();

            ui.label(format!("Duration: {}", format_time_label(self.total_duration, self.unit)));

            if let Some((index, point)) = self.hovered {
                ui.separator();
                ui.label(format!(
                    "#{}: {} / {} VUs",
                    index,
                    format_time_label(point.time, self.unit),
                    point.vus.round()
                ));
            }
        });
    }
}
