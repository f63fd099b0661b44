use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            // Start at blue so a single series keeps the classic chart colour.
            let hue = 210.0 + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Themes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    DarkBlack,
    DarkGray,
}

/// Colours a theme paints the window with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeColors {
    pub background: Color32,
    pub text: Color32,
    pub sidebar: Color32,
    pub sidebar_text: Color32,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::DarkBlack, Theme::DarkGray];

    pub fn label(self) -> &'static str {
        match self {
            Theme::DarkBlack => "Dark Black",
            Theme::DarkGray => "Dark Gray",
        }
    }

    pub fn colors(self) -> ThemeColors {
        match self {
            Theme::DarkBlack => ThemeColors {
                background: Color32::from_rgb(0x12, 0x12, 0x12),
                text: Color32::WHITE,
                sidebar: Color32::from_rgb(0x2C, 0x2C, 0x2C),
                sidebar_text: Color32::from_rgb(0xF5, 0xF5, 0xF5),
            },
            Theme::DarkGray => ThemeColors {
                background: Color32::from_rgb(0x42, 0x42, 0x42),
                text: Color32::WHITE,
                sidebar: Color32::from_rgb(0xBD, 0xBD, 0xBD),
                sidebar_text: Color32::from_rgb(0x21, 0x21, 0x21),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_is_distinct() {
        let colors = generate_palette(4);
        assert_eq!(colors.len(), 4);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn gray_theme_has_light_sidebar() {
        let colors = Theme::DarkGray.colors();
        assert!(colors.sidebar.r() > colors.background.r());
        assert_eq!(Theme::default(), Theme::DarkBlack);
    }
}
