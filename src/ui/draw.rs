use super::Rect;

/// Font family for text rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FontFamily {
    #[default]
    Serif,
    Mono,
}

/// Intermediate draw command for a panel quad.
#[derive(Debug, Clone)]
pub struct PanelCommand {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub bg_color: [f32; 4],     // sRGB RGBA
    pub border_color: [f32; 4], // sRGB RGBA
    pub border_width: f32,
    pub shadow_width: f32,
}

/// Intermediate draw command for a text run.
#[derive(Debug, Clone)]
pub struct TextCommand {
    pub text: String,
    /// Left edge after horizontal offsets; may sit left of `clip`.
    pub x: f32,
    pub y: f32,
    pub color: [f32; 4], // sRGB RGBA
    pub font_size: f32,
    pub font_family: FontFamily,
    /// Scissor rect from the nearest clipping ancestors, if any.
    pub clip: Option<Rect>,
}

/// Collects draw commands from the widget tree.
/// Decouples widget logic from renderers.
pub struct DrawList {
    pub panels: Vec<PanelCommand>,
    pub texts: Vec<TextCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self {
            panels: Vec::new(),
            texts: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.panels.clear();
        self.texts.clear();
    }
}

impl Default for DrawList {
    fn default() -> Self {
        Self::new()
    }
}
