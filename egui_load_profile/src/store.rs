//! 控制点存储
//!
//! 持有当前场景的有序控制点序列，并在插入、移动、删除时维护不变量：
//! - 至少两个点，时间严格递增
//! - 首点固定在 0，末点固定在总时长
//! - 用户编辑产生的内部点与相邻点至少相隔一个吸附步长
//!
//! 所有编辑操作都是全函数：非法输入被钳制、吸附或直接忽略，返回值只表示序列是否改变。

use crate::error::ProfileResult;
use crate::structure::{max_vus, snap_time, time_step, validate_sequence, ControlPoint};

// 步长网格上的浮点比较容差
const GAP_EPSILON: f64 = 1e-9;

#[derive(Clone, Debug, PartialEq)]
pub struct ControlPointStore {
    points: Vec<ControlPoint>,
    target_vus: f64,
}

impl ControlPointStore {
    pub fn new(points: Vec<ControlPoint>, target_vus: f64) -> ProfileResult<Self> {
        validate_sequence(&points)?;
        Ok(Self { points, target_vus })
    }

    /// 两点水平线。非正或非有限的时长按 1 分钟处理。
    pub fn flat(total_duration: f64, vus: f64) -> Self {
        let duration = if total_duration.is_finite() && total_duration > 0.0 {
            total_duration
        } else {
            1.0
        };
        let vus = if vus.is_finite() { vus.max(0.0) } else { 0.0 };
        Self {
            points: vec![ControlPoint::new(0.0, vus), ControlPoint::new(duration, vus)],
            target_vus: vus,
        }
    }

    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 末点时间即总时长（分钟）
    pub fn total_duration(&self) -> f64 {
        self.points.last().map(|p| p.time).unwrap_or(0.0)
    }

    pub fn target_vus(&self) -> f64 {
        self.target_vus
    }

    pub fn set_target_vus(&mut self, target_vus: f64) {
        self.target_vus = target_vus;
    }

    pub fn max_vus(&self) -> f64 {
        max_vus(self.target_vus, &self.points)
    }

    pub fn time_step(&self) -> f64 {
        time_step(self.total_duration())
    }

    /// 移动控制点。端点只允许修改 VU；内部点与相邻点至少相隔一个步长，
    /// 不足时推到相邻点 ± 步长处，相邻点太近放不下时保持原时间。
    pub fn move_point(&mut self, index: usize, new_time: f64, new_vus: f64) -> bool {
        let len = self.points.len();
        if index >= len || !new_time.is_finite() || !new_vus.is_finite() {
            return false;
        }

        let duration = self.total_duration();
        let step = time_step(duration);
        let vus = new_vus.clamp(0.0, self.max_vus());

        let time = if index == 0 {
            0.0
        } else if index == len - 1 {
            duration
        } else {
            let prev = self.points[index - 1].time;
            let next = self.points[index + 1].time;
            let mut time = snap_time(new_time, duration);
            if time < prev + step - GAP_EPSILON {
                time = prev + step;
            }
            if time > next - step + GAP_EPSILON {
                time = next - step;
            }
            if time < prev + step - GAP_EPSILON || time > next - step + GAP_EPSILON {
                self.points[index].time
            } else {
                time
            }
        };

        let updated = ControlPoint::new(time, vus);
        if self.points[index] == updated {
            return false;
        }
        self.points[index] = updated;
        true
    }

    /// 在吸附后的时间处插入新点；与相邻点重合或间距不足一个步长时拒绝
    pub fn insert_point(&mut self, time: f64, vus: f64) -> bool {
        if !time.is_finite() || !vus.is_finite() {
            return false;
        }

        let duration = self.total_duration();
        let step = time_step(duration);
        let time = snap_time(time, duration);
        let vus = vus.clamp(0.0, self.max_vus());

        let index = self
            .points
            .iter()
            .position(|p| p.time > time)
            .unwrap_or(self.points.len());
        // index == len 意味着 time 落在末点上
        if index == 0 || index == self.points.len() {
            return false;
        }

        let prev = self.points[index - 1].time;
        let next = self.points[index].time;
        if time - prev < step - GAP_EPSILON || next - time < step - GAP_EPSILON {
            return false;
        }

        self.points.insert(index, ControlPoint::new(time, vus));
        true
    }

    /// 删除内部点；端点固定，少于三个点时不删除
    pub fn delete_point(&mut self, index: usize) -> bool {
        let len = self.points.len();
        if len <= 2 || index == 0 || index >= len - 1 {
            return false;
        }
        self.points.remove(index);
        true
    }

    /// 整体替换序列（生成器 / 缩放器使用）。非法序列属于编程错误，记录后拒绝。
    pub fn replace_all(&mut self, points: Vec<ControlPoint>) -> ProfileResult<()> {
        if let Err(e) = validate_sequence(&points) {
            log::error!("Rejected control point sequence: {}", e);
            return Err(e);
        }
        self.points = points;
        Ok(())
    }
}
