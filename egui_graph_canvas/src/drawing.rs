//! Drawing utilities: background grid, bezier connections, arrowheads.

use egui::emath::Rot2;
use egui::{Color32, Pos2, Rect, Stroke, Vec2};

/// Maximum horizontal control-point offset for connection curves, canvas
/// units. Keeps far-apart nodes from producing extreme curves.
const MAX_CONTROL_OFFSET: f32 = 100.0;
/// Arrowhead chevron length, canvas units.
const ARROW_LEN: f32 = 8.0;
/// Arrowhead half-angle (30 degrees).
const ARROW_HALF_ANGLE: f32 = std::f32::consts::FRAC_PI_6;

const CONNECTION_STROKE_WIDTH: f32 = 2.0;
const BEZIER_SEGMENTS: usize = 24;

/// Draw a background grid aligned to the pan offset.
pub fn draw_grid(painter: &egui::Painter, rect: Rect, pan: Vec2, color: Color32, spacing: f32) {
    if spacing < 2.0 {
        return;
    }
    let start_x = rect.min.x + (pan.x % spacing);
    let start_y = rect.min.y + (pan.y % spacing);

    let mut x = start_x;
    while x < rect.max.x {
        painter.line_segment(
            [Pos2::new(x, rect.min.y), Pos2::new(x, rect.max.y)],
            Stroke::new(1.0, color),
        );
        x += spacing;
    }

    let mut y = start_y;
    while y < rect.max.y {
        painter.line_segment(
            [Pos2::new(rect.min.x, y), Pos2::new(rect.max.x, y)],
            Stroke::new(1.0, color),
        );
        y += spacing;
    }
}

/// Horizontal control-point offset: half the horizontal span, capped.
pub(crate) fn control_offset(dx: f32, zoom: f32) -> f32 {
    (dx.abs() * 0.5).min(MAX_CONTROL_OFFSET * zoom)
}

/// Sample the connection curve from `from` to `to` (screen space) as a
/// cubic bezier with horizontal control points. Produces an S-curve when
/// the target sits left of the source.
pub(crate) fn connection_path(from: Pos2, to: Pos2, zoom: f32) -> Vec<Pos2> {
    let off = control_offset(to.x - from.x, zoom);
    let cp1 = Pos2::new(from.x + off, from.y);
    let cp2 = Pos2::new(to.x - off, to.y);
    sample_cubic(from, cp1, cp2, to, BEZIER_SEGMENTS)
}

fn sample_cubic(p0: Pos2, p1: Pos2, p2: Pos2, p3: Pos2, segments: usize) -> Vec<Pos2> {
    let mut points = Vec::with_capacity(segments + 1);
    for i in 0..=segments {
        let t = i as f32 / segments as f32;
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        let x = mt3 * p0.x + 3.0 * mt2 * t * p1.x + 3.0 * mt * t2 * p2.x + t3 * p3.x;
        let y = mt3 * p0.y + 3.0 * mt2 * t * p1.y + 3.0 * mt * t2 * p2.y + t3 * p3.y;
        points.push(Pos2::new(x, y));
    }
    points
}

/// Unit direction of the curve as it arrives at its last point.
pub(crate) fn incoming_tangent(points: &[Pos2]) -> Vec2 {
    if let [.., a, b] = points {
        let v = *b - *a;
        if v.length() > f32::EPSILON {
            return v.normalized();
        }
    }
    Vec2::X
}

/// The two chevron points trailing behind `tip` along `-dir`.
pub(crate) fn arrowhead_points(tip: Pos2, dir: Vec2, zoom: f32) -> [Pos2; 2] {
    let len = ARROW_LEN * zoom;
    let back = -dir;
    [
        tip + (Rot2::from_angle(ARROW_HALF_ANGLE) * back) * len,
        tip + (Rot2::from_angle(-ARROW_HALF_ANGLE) * back) * len,
    ]
}

/// Draw a solid connection curve with an arrowhead at the target anchor.
pub(crate) fn draw_connection(
    painter: &egui::Painter,
    from: Pos2,
    to: Pos2,
    zoom: f32,
    color: Color32,
) {
    let points = connection_path(from, to, zoom);
    let stroke = Stroke::new(CONNECTION_STROKE_WIDTH, color);
    for window in points.windows(2) {
        painter.line_segment([window[0], window[1]], stroke);
    }
    let [a, b] = arrowhead_points(to, incoming_tangent(&points), zoom);
    painter.line_segment([a, to], stroke);
    painter.line_segment([b, to], stroke);
}

/// Dashed in-progress curve while a new connection is being dragged out.
pub(crate) fn draw_pending_connection(
    painter: &egui::Painter,
    from: Pos2,
    to: Pos2,
    zoom: f32,
    color: Color32,
) {
    let points = connection_path(from, to, zoom);
    painter.extend(egui::Shape::dashed_line(
        &points,
        Stroke::new(CONNECTION_STROKE_WIDTH, color),
        6.0,
        4.0,
    ));
}
