use super::draw::FontFamily;

/// Centralized visual style constants.
///
/// Single global theme. No runtime switching. Widgets read from Theme
/// at construction time instead of hardcoding colors.
#[derive(Debug, Clone)]
pub struct Theme {
    // -- Color palette (sRGB RGBA) --
    /// Parchment background: #D4B896
    pub bg_parchment: [f32; 4],
    /// Dark text (on light backgrounds): #3C2A1A
    pub text_dark: [f32; 4],

    // -- Panel defaults --
    /// Default panel border color (gold).
    pub panel_border_color: [f32; 4],
    /// Default panel border width in pixels.
    pub panel_border_width: f32,
    /// Default panel inner shadow width in pixels.
    pub panel_shadow_width: f32,
    /// Default panel padding in pixels.
    pub panel_padding: f32,

    // -- Font defaults --
    /// Body font family.
    pub font_body_family: FontFamily,
    /// Body font size in pixels (12pt).
    pub font_body_size: f32,

    // -- Marquee defaults --
    /// Text color of labels created by marquee widgets.
    pub marquee_text_color: [f32; 4],
    /// Gap between children of markup rows/columns when unspecified.
    pub stack_gap: f32,
}

/// Convert a hex color (#RRGGBB) to sRGB [f32; 4] with alpha 1.0.
const fn hex(r: u8, g: u8, b: u8) -> [f32; 4] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

/// Convert a hex color with custom alpha.
const fn hex_a(r: u8, g: u8, b: u8, a: f32) -> [f32; 4] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a]
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg_parchment: hex_a(0xD4, 0xB8, 0x96, 0.95),
            text_dark: hex(0x3C, 0x2A, 0x1A),

            panel_border_color: hex(0xC8, 0xA8, 0x50), // gold
            panel_border_width: 2.0,
            panel_shadow_width: 6.0,
            panel_padding: 4.0,

            font_body_family: FontFamily::Serif,
            font_body_size: 12.0,

            marquee_text_color: hex(0x3C, 0x2A, 0x1A), // dark on parchment
            stack_gap: 4.0,
        }
    }
}
