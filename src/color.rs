use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Categorical palette
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            hsl_to_color32(Hsl::new(hue, 0.75, 0.55))
        })
        .collect()
}

fn hsl_to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Sequential scale: bar magnitude → Color32
// ---------------------------------------------------------------------------

/// A two-stop HSL ramp used to shade bars by their value.
#[derive(Debug, Clone, Copy)]
pub struct ColorScale {
    /// (hue°, saturation, lightness) at the low end.
    low: (f32, f32, f32),
    /// (hue°, saturation, lightness) at the high end.
    high: (f32, f32, f32),
}

impl ColorScale {
    /// Dark purple → yellow-green.
    pub const VIRIDIS: ColorScale = ColorScale {
        low: (280.0, 0.60, 0.25),
        high: (60.0, 0.85, 0.55),
    };
    /// Deep blue → orange.
    pub const PLASMA: ColorScale = ColorScale {
        low: (250.0, 0.80, 0.35),
        high: (40.0, 0.95, 0.55),
    };
    /// Navy → khaki.
    pub const CIVIDIS: ColorScale = ColorScale {
        low: (220.0, 0.55, 0.25),
        high: (50.0, 0.55, 0.60),
    };
    /// Pale yellow → green.
    pub const YELLOW_GREEN: ColorScale = ColorScale {
        low: (60.0, 0.80, 0.75),
        high: (140.0, 0.70, 0.30),
    };

    /// Colour at position `t` in `[0, 1]`.
    pub fn color_at(&self, t: f32) -> Color32 {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let lerp = |a: f32, b: f32| a + (b - a) * t;
        let (h0, s0, l0) = self.low;
        let (h1, s1, l1) = self.high;
        hsl_to_color32(Hsl::new(lerp(h0, h1), lerp(s0, s1), lerp(l0, l1)))
    }

    /// One colour per value, scaled between the smallest and largest value.
    pub fn colors_for(&self, values: &[f64]) -> Vec<Color32> {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = max - min;
        values
            .iter()
            .map(|&v| {
                if range.abs() < f64::EPSILON {
                    self.color_at(1.0)
                } else {
                    self.color_at(((v - min) / range) as f32)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_size_and_distinct_colours() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(5);
        assert_eq!(p.len(), 5);
        assert_ne!(p[0], p[1]);
    }

    #[test]
    fn test_scale_ends_match_min_and_max() {
        let scale = ColorScale::VIRIDIS;
        let colors = scale.colors_for(&[10.0, 5.0, 0.0]);
        assert_eq!(colors[0], scale.color_at(1.0));
        assert_eq!(colors[2], scale.color_at(0.0));
        assert_ne!(colors[0], colors[2]);
    }

    #[test]
    fn test_flat_values_use_one_colour() {
        let colors = ColorScale::PLASMA.colors_for(&[3.0, 3.0]);
        assert_eq!(colors[0], colors[1]);
        assert_eq!(ColorScale::PLASMA.color_at(f32::NAN), ColorScale::PLASMA.color_at(0.0));
    }
}
