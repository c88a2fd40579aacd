//! 执行进度
//!
//! 提交后由宿主按经过时间推进，沿着提交时的曲线估算当前进度和 VU 数。

use crate::structure::{vus_at, ControlPoint};

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum ExecutionState {
    #[default]
    Idle,
    Running,
    Completed,
    Failed(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExecutionStatus {
    pub state: ExecutionState,
    pub progress: f64, // 百分比 0..=100
    pub elapsed: f64,  // 分钟
    pub current_vus: f64,
}

impl Default for ExecutionStatus {
    fn default() -> Self {
        Self {
            state: ExecutionState::Idle,
            progress: 0.0,
            elapsed: 0.0,
            current_vus: 0.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ExecutionTracker {
    points: Vec<ControlPoint>,
    status: ExecutionStatus,
}

impl ExecutionTracker {
    pub fn new(points: Vec<ControlPoint>) -> Self {
        Self {
            points,
            status: ExecutionStatus::default(),
        }
    }

    pub fn status(&self) -> &ExecutionStatus {
        &self.status
    }

    pub fn total_duration(&self) -> f64 {
        self.points.last().map(|p| p.time).unwrap_or(0.0)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status.state, ExecutionState::Completed | ExecutionState::Failed(_))
    }

    /// 推进到 `elapsed` 分钟。结束或失败后状态不再变化。
    pub fn advance(&mut self, elapsed: f64) -> &ExecutionStatus {
        if self.is_finished() {
            return &self.status;
        }

        let duration = self.total_duration();
        let elapsed = elapsed.max(0.0);
        if duration <= 0.0 || elapsed >= duration {
            log::info!("Execution completed after {:.2} min", elapsed);
            self.status = ExecutionStatus {
                state: ExecutionState::Completed,
                progress: 100.0,
                elapsed,
                current_vus: self.points.last().map(|p| p.vus.round()).unwrap_or(0.0),
            };
            return &self.status;
        }

        self.status = ExecutionStatus {
            state: ExecutionState::Running,
            progress: (elapsed / duration).min(1.0) * 100.0,
            elapsed,
            current_vus: vus_at(&self.points, elapsed).round(),
        };
        &self.status
    }

    /// 后端报告失败时调用，保留最后一次的进度
    pub fn fail(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        log::warn!("Execution failed: {}", reason);
        self.status.state = ExecutionState::Failed(reason);
    }
}
