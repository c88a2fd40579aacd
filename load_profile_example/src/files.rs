//! 提交记录文件操作
//!
//! 通过文件对话框导出 / 导入 JSON 提交记录。

use crate::LoadProfileApp;
use egui_load_profile::{LoadTestConfiguration, SubmissionMetadata};
use rfd::FileDialog;
use std::path::Path;

impl LoadProfileApp {
    /// 导出当前场景
    pub fn export_configuration(&mut self) {
        let config = match self.editor.page().build_submission(&self.meta) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Cannot export configuration: {}", e);
                self.status_message = Some(e.to_string());
                return;
            }
        };

        if let Some(path) = FileDialog::new()
            .add_filter("Load Test", &["json"])
            .set_title("Export Load Test")
            .set_file_name("load-test.json")
            .save_file()
        {
            match config.save_to_path(&path) {
                Ok(_) => {
                    log::info!("Configuration exported to: {:?}", path);
                    self.status_message = None;
                }
                Err(e) => {
                    log::error!("Failed to export configuration: {}", e);
                    self.status_message = Some(e.to_string());
                }
            }
        }
    }

    /// 打开导入对话框
    pub fn import_configuration(&mut self) {
        if let Some(path) = FileDialog::new()
            .add_filter("Load Test", &["json"])
            .set_title("Import Load Test")
            .pick_file()
        {
            self.load_configuration(&path);
        }
    }

    fn load_configuration(&mut self, path: &Path) {
        let result = LoadTestConfiguration::load_from_path(path)
            .and_then(|config| self.editor.page_mut().load_configuration(&config).map(|_| config));
        match result {
            Ok(config) => {
                log::info!("Configuration loaded: {:?}", path);
                self.meta = SubmissionMetadata {
                    component: config.component,
                    target_url: config.target_url,
                    headers: config.headers,
                    thresholds: config.thresholds,
                    environment_variables: config.environment_variables,
                };
                self.tracker = None;
                self.run_started_at = None;
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to load configuration: {}", e);
                self.status_message = Some(e.to_string());
            }
        }
    }
}
