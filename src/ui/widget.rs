use super::draw::FontFamily;

/// Cross-axis alignment for Row and Column containers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum CrossAlign {
    #[default]
    Start,
    Center,
    End,
    Stretch,
}

/// Flat enum widget identity.
/// Closed set — we know all widget types. No trait objects.
#[derive(Debug, Clone)]
pub enum Widget {
    /// Horizontal auto-layout container.
    /// Children laid out left-to-right with `gap` spacing.
    /// Row itself emits no draw commands (transparent container).
    Row {
        gap: f32,          // pixels between children
        align: CrossAlign, // vertical alignment of children within row height
    },

    /// Vertical auto-layout container.
    /// Children laid out top-to-bottom with `gap` spacing.
    Column {
        gap: f32,          // pixels between children
        align: CrossAlign, // horizontal alignment of children within column width
    },

    /// Container with background, border, and optional inner shadow.
    Panel {
        bg_color: [f32; 4],     // sRGB RGBA
        border_color: [f32; 4], // sRGB RGBA
        border_width: f32,      // pixels
        shadow_width: f32,      // pixels
    },

    /// Transparent container that clips descendants to its rect
    /// (overflow hidden). Hosts the text of a marquee.
    Clip,

    /// Single-line text.
    Label {
        text: String,
        color: [f32; 4], // sRGB RGBA
        font_size: f32,  // pixels
        font_family: FontFamily,
    },
}

impl Widget {
    /// Plain label with the given text and style.
    pub fn label(
        text: impl Into<String>,
        color: [f32; 4],
        font_size: f32,
        font_family: FontFamily,
    ) -> Self {
        Widget::Label {
            text: text.into(),
            color,
            font_size,
            font_family,
        }
    }

    pub fn is_label(&self) -> bool {
        matches!(self, Widget::Label { .. })
    }
}
