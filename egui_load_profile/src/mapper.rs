//! 坐标转换模块
//!
//! 在领域空间（分钟, VU）与绘图表面的像素空间之间双向转换。
//! VU 轴是倒置的：0 VU 在绘图区底部。

use crate::structure::ControlPoint;
use egui::{Margin, Pos2, Rect};

/// 默认边距（上 40 / 右 40 / 下 60 / 左 60），为坐标轴标签留出空间
pub fn default_margin() -> Margin {
    Margin {
        left: 60.0,
        right: 40.0,
        top: 40.0,
        bottom: 60.0,
    }
}

/// 纯值类型：表面尺寸、`max_vus` 或总时长变化时直接重新构造即可
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapper {
    plot: Rect,
    max_vus: f64,
    total_duration: f64,
}

impl CoordinateMapper {
    pub fn new(surface: Rect, margin: Margin, max_vus: f64, total_duration: f64) -> Self {
        let min = Pos2::new(surface.min.x + margin.left, surface.min.y + margin.top);
        let max = Pos2::new(
            (surface.max.x - margin.right).max(min.x),
            (surface.max.y - margin.bottom).max(min.y),
        );
        Self {
            plot: Rect::from_min_max(min, max),
            max_vus: max_vus.max(1.0),
            total_duration,
        }
    }

    /// 扣除边距后的绘图区域
    pub fn plot_rect(&self) -> Rect {
        self.plot
    }

    pub fn max_vus(&self) -> f64 {
        self.max_vus
    }

    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    pub fn contains(&self, pos: Pos2) -> bool {
        self.plot.contains(pos)
    }

    pub fn time_to_x(&self, time: f64) -> f32 {
        if self.total_duration <= 0.0 {
            return self.plot.min.x;
        }
        self.plot.min.x + (time / self.total_duration) as f32 * self.plot.width()
    }

    pub fn vus_to_y(&self, vus: f64) -> f32 {
        self.plot.max.y - (vus / self.max_vus) as f32 * self.plot.height()
    }

    pub fn to_pixel(&self, point: &ControlPoint) -> Pos2 {
        Pos2::new(self.time_to_x(point.time), self.vus_to_y(point.vus))
    }

    /// 像素坐标转换为领域坐标，结果钳制在 `[0, total_duration] × [0, max_vus]`
    pub fn to_domain(&self, pos: Pos2) -> ControlPoint {
        let width = self.plot.width();
        let height = self.plot.height();
        let time = if width > 0.0 {
            ((pos.x - self.plot.min.x) / width) as f64 * self.total_duration
        } else {
            0.0
        };
        let vus = if height > 0.0 {
            ((self.plot.max.y - pos.y) / height) as f64 * self.max_vus
        } else {
            0.0
        };
        ControlPoint::new(
            time.clamp(0.0, self.total_duration.max(0.0)),
            vus.clamp(0.0, self.max_vus),
        )
    }
}
