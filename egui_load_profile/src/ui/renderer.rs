use crate::mapper::CoordinateMapper;
use crate::structure::{ControlPoint, DurationUnit, EditorState, LoadPhase, PhaseKind};
use crate::utils::format_time_label;
use egui::*;

const GRID_COLOR: Color32 = Color32::from_rgb(55, 55, 55);
const AXIS_COLOR: Color32 = Color32::from_rgb(160, 160, 160);
const CURVE_COLOR: Color32 = Color32::from_rgb(90, 160, 255);
const POINT_COLOR: Color32 = Color32::from_rgb(240, 240, 240);
const HOVER_COLOR: Color32 = Color32::from_rgb(255, 200, 80);
const DRAG_COLOR: Color32 = Color32::from_rgb(255, 120, 60);

// 纵轴固定分 5 格
const VU_DIVISIONS: usize = 5;

/// 横轴刻度间隔（分钟），保证最多约 10 格
fn time_tick_step(total_duration: f64) -> f64 {
    const STEPS: [f64; 12] = [0.5, 1.0, 2.0, 5.0, 10.0, 15.0, 30.0, 60.0, 120.0, 240.0, 480.0, 720.0];
    STEPS
        .iter()
        .copied()
        .find(|step| total_duration / step <= 10.0)
        .unwrap_or(1440.0)
}

fn time_ticks(total_duration: f64) -> Vec<f64> {
    if total_duration <= 0.0 {
        return vec![0.0];
    }
    let step = time_tick_step(total_duration);
    let count = (total_duration / step).floor() as usize;
    let mut ticks: Vec<f64> = (0..=count).map(|i| i as f64 * step).collect();
    // 终点总是带一个刻度，太靠近最后一格时替换掉它
    match ticks.last() {
        Some(&last) if total_duration - last < step * 0.3 => {
            ticks.pop();
            ticks.push(total_duration);
        }
        _ => ticks.push(total_duration),
    }
    ticks
}

/// 绘制背景网格
pub fn draw_grid(painter: &Painter, mapper: &CoordinateMapper) {
    let plot = mapper.plot_rect();
    let stroke = Stroke::new(1.0, GRID_COLOR);

    for time in time_ticks(mapper.total_duration()) {
        let x = mapper.time_to_x(time);
        painter.line_segment([Pos2::new(x, plot.top()), Pos2::new(x, plot.bottom())], stroke);
    }
    for i in 0..=VU_DIVISIONS {
        let vus = mapper.max_vus() * i as f64 / VU_DIVISIONS as f64;
        let y = mapper.vus_to_y(vus);
        painter.line_segment([Pos2::new(plot.left(), y), Pos2::new(plot.right(), y)], stroke);
    }
}

/// 绘制阶段色带和阶段名称
pub fn draw_phases(painter: &Painter, mapper: &CoordinateMapper, phases: &[LoadPhase]) {
    let plot = mapper.plot_rect();
    for phase in phases {
        let color = match phase.kind {
            PhaseKind::RampUp => Color32::from_rgba_unmultiplied(80, 200, 120, 28),
            PhaseKind::Steady => Color32::from_rgba_unmultiplied(90, 160, 255, 20),
            PhaseKind::RampDown => Color32::from_rgba_unmultiplied(255, 120, 80, 28),
        };
        let x0 = mapper.time_to_x(phase.start);
        let x1 = mapper.time_to_x(phase.end);
        let band = Rect::from_min_max(Pos2::new(x0, plot.top()), Pos2::new(x1, plot.bottom()));
        painter.rect_filled(band, 0.0, color);

        // 太窄的色带不写名称
        if band.width() > 60.0 {
            painter.text(
                Pos2::new(band.center().x, plot.top() + 4.0),
                Align2::CENTER_TOP,
                phase.kind.label(),
                FontId::proportional(10.0),
                Color32::from_gray(150),
            );
        }
    }
}

/// 绘制折线和下方填充
pub fn draw_curve(painter: &Painter, mapper: &CoordinateMapper, points: &[ControlPoint]) {
    if points.len() < 2 {
        return;
    }
    let bottom = mapper.plot_rect().bottom();
    let fill = Color32::from_rgba_unmultiplied(90, 160, 255, 40);

    // 每一段都是梯形，可以直接用凸多边形填充
    for w in points.windows(2) {
        let a = mapper.to_pixel(&w[0]);
        let b = mapper.to_pixel(&w[1]);
        painter.add(Shape::convex_polygon(
            vec![Pos2::new(a.x, bottom), a, b, Pos2::new(b.x, bottom)],
            fill,
            Stroke::NONE,
        ));
    }

    let line: Vec<Pos2> = points.iter().map(|p| mapper.to_pixel(p)).collect();
    painter.add(Shape::line(line, Stroke::new(2.0, CURVE_COLOR)));
}

/// 绘制控制点，悬停 / 拖拽的点高亮
pub fn draw_points(
    painter: &Painter,
    mapper: &CoordinateMapper,
    points: &[ControlPoint],
    state: &EditorState,
    radius: f32,
    editing: bool,
) {
    for (i, point) in points.iter().enumerate() {
        let center = mapper.to_pixel(point);
        let (color, r) = if state.dragged_index == Some(i) {
            (DRAG_COLOR, radius + 2.0)
        } else if state.hovered_index == Some(i) {
            (HOVER_COLOR, radius + 1.0)
        } else {
            (POINT_COLOR, radius)
        };
        // 只读模式下控制点画小一些
        let r = if editing { r } else { r * 0.6 };
        painter.circle_filled(center, r, color);
        painter.circle_stroke(center, r, Stroke::new(1.5, CURVE_COLOR));
    }
}

/// 绘制将要插入的预览点
pub fn draw_preview(painter: &Painter, mapper: &CoordinateMapper, point: &ControlPoint, radius: f32) {
    let center = mapper.to_pixel(point);
    let plot = mapper.plot_rect();
    let guide = Stroke::new(1.0, Color32::from_rgba_unmultiplied(255, 255, 255, 60));
    painter.line_segment([Pos2::new(center.x, plot.top()), Pos2::new(center.x, plot.bottom())], guide);
    painter.circle_stroke(center, radius, Stroke::new(1.5, Color32::from_rgba_unmultiplied(255, 255, 255, 160)));
}

/// 绘制坐标轴和刻度标签
pub fn draw_axes(painter: &Painter, mapper: &CoordinateMapper, unit: DurationUnit) {
    let plot = mapper.plot_rect();
    let stroke = Stroke::new(1.0, AXIS_COLOR);
    let font = FontId::proportional(11.0);

    painter.line_segment([plot.left_bottom(), plot.right_bottom()], stroke);
    painter.line_segment([plot.left_top(), plot.left_bottom()], stroke);

    for time in time_ticks(mapper.total_duration()) {
        let x = mapper.time_to_x(time);
        painter.line_segment([Pos2::new(x, plot.bottom()), Pos2::new(x, plot.bottom() + 4.0)], stroke);
        painter.text(
            Pos2::new(x, plot.bottom() + 6.0),
            Align2::CENTER_TOP,
            format_time_label(time, unit),
            font.clone(),
            AXIS_COLOR,
        );
    }

    for i in 0..=VU_DIVISIONS {
        let vus = mapper.max_vus() * i as f64 / VU_DIVISIONS as f64;
        let y = mapper.vus_to_y(vus);
        painter.line_segment([Pos2::new(plot.left() - 4.0, y), Pos2::new(plot.left(), y)], stroke);
        painter.text(
            Pos2::new(plot.left() - 6.0, y),
            Align2::RIGHT_CENTER,
            format!("{}", vus.round()),
            font.clone(),
            AXIS_COLOR,
        );
    }

    painter.text(
        Pos2::new(plot.center().x, plot.bottom() + 30.0),
        Align2::CENTER_TOP,
        format!("Time ({})", unit.label()),
        font.clone(),
        AXIS_COLOR,
    );
    painter.text(
        Pos2::new(plot.left(), plot.top() - 8.0),
        Align2::LEFT_BOTTOM,
        "Virtual Users",
        font,
        AXIS_COLOR,
    );
}

/// 在点的右上方绘制时间 / VU 提示框，超出绘图区时翻到另一侧
pub fn draw_tooltip(painter: &Painter, mapper: &CoordinateMapper, point: &ControlPoint, unit: DurationUnit) {
    let plot = mapper.plot_rect();
    let anchor = mapper.to_pixel(point);
    let text = format!("{} · {} VUs", format_time_label(point.time, unit), point.vus.round());
    let galley = painter.layout_no_wrap(text, FontId::proportional(12.0), Color32::WHITE);
    let padding = Vec2::new(6.0, 4.0);
    let size = galley.size() + padding * 2.0;

    let mut min = anchor + Vec2::new(12.0, -12.0 - size.y);
    if min.x + size.x > plot.right() {
        min.x = anchor.x - 12.0 - size.x;
    }
    if min.y < plot.top() {
        min.y = anchor.y + 12.0;
    }
    let rect = Rect::from_min_size(min, size);

    painter.rect_filled(rect, 3.0, Color32::from_rgba_unmultiplied(20, 20, 20, 230));
    painter.rect_stroke(rect, 3.0, Stroke::new(1.0, Color32::from_gray(90)));
    painter.galley(rect.min + padding, galley, Color32::WHITE);
}
