//! 工具函数模块
//!
//! 包含通用的工具函数，如按显示单位格式化时间标签。

use crate::structure::DurationUnit;

/// 将时间（分钟）格式化为坐标轴 / 提示框使用的标签
///
/// # 参数
///
/// * `minutes` - 时间（分钟）
/// * `unit` - 当前显示单位
///
/// # 示例
///
/// ```
/// use egui_load_profile::utils::format_time_label;
/// use egui_load_profile::DurationUnit;
///
/// assert_eq!(format_time_label(4.6, DurationUnit::Minutes), "5m");
/// assert_eq!(format_time_label(90.0, DurationUnit::Hours), "1h 30m");
/// assert_eq!(format_time_label(120.0, DurationUnit::Hours), "2h");
/// ```
pub fn format_time_label(minutes: f64, unit: DurationUnit) -> String {
    match unit {
        DurationUnit::Hours => {
            let total = minutes.round() as u64;
            let (hours, rest) = (total / 60, total % 60);
            if rest == 0 {
                format!("{}h", hours)
            } else {
                format!("{}h {}m", hours, rest)
            }
        }
        DurationUnit::Minutes => format!("{}m", minutes.round() as u64),
    }
}
