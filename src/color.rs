// Simple color struct, created from an unsigned 32 representing RRGGBBAA
#[derive(Copy, Clone)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn from_u32(num: u32) -> Color {
        let r = (num >> 24) as u8;
        let g = (num >> 16) as u8;
        let b = (num >> 8) as u8;
        let a = (num >> 0) as u8;

        Color { r, g, b, a }
    }

    // Same color with the embedded alpha swapped out, `alpha` in 0.0..=1.0
    pub fn with_alpha(&self, alpha: f64) -> Color {
        let a = (alpha.max(0.0).min(1.0) * 255.0).round() as u8;

        Color { a, ..*self }
    }

    // The 2d canvas context takes CSS color strings for fill and stroke styles
    pub fn to_css(&self) -> String {
        self.to_css_with_alpha(self.a as f64 / 255.0)
    }

    pub fn to_css_with_alpha(&self, alpha: f64) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }
}
