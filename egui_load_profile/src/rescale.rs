//! 时长缩放
//!
//! 进入 Manual 模式后，时长变化不再重新生成曲线，而是按比例调整已有控制点，
//! 这样用户放置的内部点不会丢失。

use crate::structure::ControlPoint;

/// 新旧时长相差小于该值时视为未变化（分钟）
pub const DURATION_EPSILON: f64 = 0.01;

/// 按 `new_duration / old_duration` 缩放内部点；首点固定为 0，末点精确等于新时长
pub fn rescale(points: &[ControlPoint], new_duration: f64) -> Vec<ControlPoint> {
    let old_duration = match points.last() {
        Some(last) => last.time,
        None => return Vec::new(),
    };
    if (old_duration - new_duration).abs() < DURATION_EPSILON || old_duration <= 0.0 {
        return points.to_vec();
    }

    let ratio = new_duration / old_duration;
    let last_index = points.len() - 1;
    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let time = if i == 0 {
                0.0
            } else if i == last_index {
                new_duration
            } else {
                p.time * ratio
            };
            ControlPoint::new(time, p.vus)
        })
        .collect()
}

/// 单位切换时使用：丢弃落在新时长及之后的非末点，再把末点对齐到新时长
pub fn normalize_to_end(points: &[ControlPoint], new_duration: f64) -> Vec<ControlPoint> {
    if points.is_empty() {
        return Vec::new();
    }

    let last_index = points.len() - 1;
    let mut normalized: Vec<ControlPoint> = points
        .iter()
        .enumerate()
        .filter(|(i, p)| *i == 0 || *i == last_index || p.time < new_duration)
        .map(|(_, p)| *p)
        .collect();

    if let Some(last) = normalized.last_mut() {
        last.time = new_duration;
    }
    normalized
}
