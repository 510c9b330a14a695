use super::render::{Color, DrawingContext};
use super::surface::Surface;

/// One call made against a [`RecordingCanvas`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    SetTransform([f64; 6]),
    ClearRect { x: f64, y: f64, width: f64, height: f64 },
    Save,
    Restore,
    BeginPath,
    FillColor(Color),
    GlobalAlpha(f64),
    ShadowColor(Color),
    ShadowBlur(f64),
    Rect { x: f64, y: f64, width: f64, height: f64 },
    Fill,
    Stroke,
}

/// Headless [`Surface`] that keeps every draw call in memory.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
    backing_size: (u32, u32),
    display_size: (f64, f64),
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            backing_size: (300, 150),
            display_size: (300.0, 150.0),
        }
    }
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn count(&self, predicate: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| predicate(c)).count()
    }

    /// Drops recorded commands, keeping sizes.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn backing_size(&self) -> (u32, u32) {
        self.backing_size
    }

    pub fn display_size(&self) -> (f64, f64) {
        self.display_size
    }
}

impl DrawingContext for RecordingCanvas {
    fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        self.commands.push(DrawCommand::SetTransform([a, b, c, d, e, f]));
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::ClearRect { x, y, width, height });
    }

    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn set_fill_color(&mut self, color: Color) {
        self.commands.push(DrawCommand::FillColor(color));
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.commands.push(DrawCommand::GlobalAlpha(alpha));
    }

    fn set_shadow_color(&mut self, color: Color) {
        self.commands.push(DrawCommand::ShadowColor(color));
    }

    fn set_shadow_blur(&mut self, blur: f64) {
        self.commands.push(DrawCommand::ShadowBlur(blur));
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::Rect { x, y, width, height });
    }

    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill);
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }
}

impl Surface for RecordingCanvas {
    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.backing_size = (width, height);
    }

    fn set_display_size(&mut self, width: f64, height: f64) {
        self.display_size = (width, height);
    }
}
