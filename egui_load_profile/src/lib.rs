//! # egui_load_profile
//!
//! 一个用于编辑负载测试曲线（并发虚拟用户数随时间变化）的 egui 组件库。
//!
//! ## 功能特性
//!
//! - **曲线生成**：根据场景类型（Fixed VUs / Ramping VUs / Constant Arrival Rate）和参数自动生成控制点
//! - **手动编辑**：添加、拖拽、删除控制点，带时间吸附和最小间隔约束
//! - **Auto / Manual 模式**：手动编辑后参数变化只按比例缩放，不覆盖用户的曲线
//! - **预设**：Load / Stress / Spike / Soak 测试预设
//! - **提交记录**：导出为 JSON，并可按曲线跟踪执行进度
//!
//! ## 基本使用
//!
//! ```ignore
//! use egui_load_profile::{LoadProfileEditor, LoadProfileEditorOptions};
//!
//! let mut editor = LoadProfileEditor::new(LoadProfileEditorOptions::default());
//!
//! // 在 egui UI 中使用
//! editor.ui(ui);
//! ```
//!
//! ## 不依赖 UI 的页面控制器
//!
//! ```
//! use egui_load_profile::{ProfilePage, ScenarioKind, ScenarioParameters, TestType};
//!
//! let mut page = ProfilePage::new();
//! page.apply_preset(TestType::Stress);
//! assert_eq!(page.active_kind(), ScenarioKind::RampingVus);
//!
//! page.update_parameters(ScenarioParameters {
//!     scenario_kind: ScenarioKind::RampingVus,
//!     target_vus: 300.0,
//!     total_duration: 20.0,
//!     ramp_up: 5.0,
//!     ramp_down: 2.0,
//! })
//! .unwrap();
//! assert_eq!(page.points().last().map(|p| p.time), Some(20.0));
//!
//! for event in page.take_events() {
//!     println!("{:?}", event);
//! }
//! ```

pub mod editor;
pub mod error;
pub mod execution;
pub mod generator;
pub mod interaction;
pub mod mapper;
pub mod page;
pub mod rescale;
pub mod store;
pub mod structure;
pub mod submission;
pub mod ui;
pub mod utils;

pub use editor::{ProfileEditorCommand, ProfileEditorEvent};
pub use error::{ProfileError, ProfileResult};
pub use execution::{ExecutionState, ExecutionStatus, ExecutionTracker};
pub use generator::{CurveGenerator, ScenarioCurveGenerator};
pub use interaction::{EditorInteractionController, InteractionState, PointerEvent};
pub use mapper::CoordinateMapper;
pub use page::{ProfilePage, SubscriptionId};
pub use store::ControlPointStore;
pub use structure::{
    ControlPoint, DurationUnit, EditMode, EditorState, LoadPhase, PhaseKind, ScenarioKind, ScenarioParameters,
    TestType,
};
pub use submission::{KeyValue, LoadTestConfiguration, SubmissionMetadata, Threshold};
pub use ui::{LoadProfileEditor, LoadProfileEditorOptions};
