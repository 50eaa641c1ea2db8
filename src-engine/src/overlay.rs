//! Ink stroke overlay: accumulation, erasing, and rasterization.
//!
//! The canvas widget owns pointer capture; this module owns the recorded
//! stroke data. Strokes live in frame pixel coordinates and overlay
//! whatever frame is currently displayed, so they persist across playback
//! ticks until cleared or a new source is loaded.

use crate::frame::Frame;
use markpad_common::{StrokeColor, StrokePoint, StrokeRecord, ToolMode};

/// Multiplier on the erase stroke's width that gives the erase radius.
const ERASE_RADIUS_FACTOR: f32 = 2.0;

/// Stroke overlay with a current tool mode.
#[derive(Debug, Default)]
pub struct AnnotationOverlay {
    strokes: Vec<StrokeRecord>,
    mode: ToolMode,
    color: StrokeColor,
    width: f32,
    /// Stroke currently being captured, if any
    active: Option<StrokeRecord>,
}

impl AnnotationOverlay {
    pub fn new() -> Self {
        Self {
            strokes: Vec::new(),
            mode: ToolMode::None,
            color: StrokeColor::default(),
            width: 3.0,
            active: None,
        }
    }

    /// Current tool mode.
    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    /// Switch tools. An in-progress stroke is finished first so a mode
    /// change mid-gesture cannot mix tools within one record.
    pub fn set_mode(&mut self, mode: ToolMode) {
        if self.active.is_some() {
            self.finish_stroke();
        }
        self.mode = mode;
    }

    /// Set the ink style used for subsequently drawn strokes.
    pub fn set_style(&mut self, color: StrokeColor, width: f32) {
        self.color = color;
        self.width = width.max(0.5);
    }

    /// Recorded strokes (draw strokes only; erase gestures are applied,
    /// not stored).
    pub fn strokes(&self) -> &[StrokeRecord] {
        &self.strokes
    }

    /// True when nothing would render.
    pub fn is_empty(&self) -> bool {
        self.strokes.iter().all(|s| s.points.is_empty()) && self.active.is_none()
    }

    /// Begin a stroke at `point`. Ignored while the tool is `None`.
    pub fn begin_stroke(&mut self, point: StrokePoint) {
        if self.mode == ToolMode::None {
            return;
        }
        let mut stroke = StrokeRecord::new(self.mode, self.color, self.width);
        stroke.points.push(point);
        self.active = Some(stroke);
    }

    /// Extend the in-progress stroke. Ignored when no stroke is active.
    pub fn extend_stroke(&mut self, point: StrokePoint) {
        if let Some(stroke) = self.active.as_mut() {
            stroke.points.push(point);
        }
    }

    /// Finish the in-progress stroke: draw strokes are appended to the
    /// record, erase strokes remove nearby recorded points.
    pub fn finish_stroke(&mut self) {
        let Some(stroke) = self.active.take() else {
            return;
        };
        match stroke.mode {
            ToolMode::Draw => self.strokes.push(stroke),
            ToolMode::Erase => self.erase_along(&stroke),
            ToolMode::None => {}
        }
    }

    /// Install a pre-recorded stroke set (headless callers and stroke
    /// sidecar files). Erase records are applied in order, like a replay.
    pub fn install_strokes(&mut self, strokes: Vec<StrokeRecord>) {
        for stroke in strokes {
            match stroke.mode {
                ToolMode::Draw => self.strokes.push(stroke),
                ToolMode::Erase => self.erase_along(&stroke),
                ToolMode::None => {}
            }
        }
    }

    /// Drop all recorded strokes and any in-progress stroke.
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.active = None;
    }

    /// Remove recorded points within the erase radius of the erase path,
    /// splitting strokes into surviving runs.
    fn erase_along(&mut self, erase: &StrokeRecord) {
        let radius = erase.width * ERASE_RADIUS_FACTOR;
        let mut survivors = Vec::with_capacity(self.strokes.len());

        for stroke in self.strokes.drain(..) {
            let StrokeRecord {
                points,
                mode,
                color,
                width,
            } = stroke;
            let mut run: Vec<StrokePoint> = Vec::new();
            for point in points {
                let erased = erase.points.iter().any(|e| e.distance(&point) <= radius);
                if erased {
                    if !run.is_empty() {
                        survivors.push(StrokeRecord {
                            points: std::mem::take(&mut run),
                            mode,
                            color,
                            width,
                        });
                    }
                } else {
                    run.push(point);
                }
            }
            if !run.is_empty() {
                survivors.push(StrokeRecord {
                    points: run,
                    mode,
                    color,
                    width,
                });
            }
        }

        self.strokes = survivors;
    }

    /// Rasterize the recorded strokes into an RGBA buffer of the given
    /// dimensions. Pixels not covered by ink stay fully transparent black,
    /// so additive compositing leaves them untouched.
    pub fn render(&self, width: u32, height: u32) -> Frame {
        let mut canvas = Frame::blank(width, height);
        for stroke in &self.strokes {
            rasterize_stroke(&mut canvas, stroke);
        }
        if let Some(active) = &self.active {
            if active.mode == ToolMode::Draw {
                rasterize_stroke(&mut canvas, active);
            }
        }
        canvas
    }
}

/// Stamp a stroke's polyline onto the canvas as filled squares along each
/// segment.
fn rasterize_stroke(canvas: &mut Frame, stroke: &StrokeRecord) {
    let rgba = [
        stroke.color.r,
        stroke.color.g,
        stroke.color.b,
        stroke.color.a,
    ];
    match stroke.points.len() {
        0 => {}
        1 => stamp(canvas, stroke.points[0], stroke.width, rgba),
        _ => {
            for pair in stroke.points.windows(2) {
                stamp_segment(canvas, pair[0], pair[1], stroke.width, rgba);
            }
        }
    }
}

fn stamp_segment(canvas: &mut Frame, a: StrokePoint, b: StrokePoint, width: f32, rgba: [u8; 4]) {
    let len = a.distance(&b);
    let steps = (len * 2.0).ceil() as i32;
    for i in 0..=steps.max(1) {
        let t = i as f32 / steps.max(1) as f32;
        let point = StrokePoint::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);
        stamp(canvas, point, width, rgba);
    }
}

fn stamp(canvas: &mut Frame, center: StrokePoint, width: f32, rgba: [u8; 4]) {
    let half = ((width / 2.0).max(0.5)) as i32;
    let cx = center.x.round() as i32;
    let cy = center.y.round() as i32;
    for oy in -half..=half {
        for ox in -half..=half {
            let x = cx + ox;
            let y = cy + oy;
            if x >= 0 && y >= 0 {
                canvas.put_pixel(x as u32, y as u32, rgba);
            }
        }
    }
}
