use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Height gradient
// ---------------------------------------------------------------------------

/// Colour for `t` in `[0, 1]` on a blue (low) → red (high) hue ramp.
pub fn gradient_color(t: f32) -> Color32 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let hue = 240.0 * (1.0 - t);
    let hsl = Hsl::new(hue, 0.75, 0.55);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Color mapping: step height → Color32
// ---------------------------------------------------------------------------

/// Maps step heights of a run onto the gradient, min blue, max red.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightColorMap {
    pub min: f64,
    pub max: f64,
}

impl HeightColorMap {
    /// `None` when there is no height to scale against.
    pub fn new(heights: impl IntoIterator<Item = f64>) -> Option<Self> {
        let (min, max) = heights
            .into_iter()
            .filter(|h| h.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), h| {
                (lo.min(h), hi.max(h))
            });
        (min <= max).then_some(HeightColorMap { min, max })
    }

    pub fn color_for(&self, height: f64) -> Color32 {
        let range = self.max - self.min;
        if range.abs() < f64::EPSILON {
            return gradient_color(0.5);
        }
        gradient_color(((height - self.min) / range) as f32)
    }

    /// `n` evenly spaced (label, colour) stops for a legend.
    pub fn legend_entries(&self, n: usize) -> Vec<(String, Color32)> {
        let n = n.max(2);
        (0..n)
            .map(|i| {
                let h = self.min + (self.max - self.min) * i as f64 / (n - 1) as f64;
                (format!("{h:.3}"), self.color_for(h))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ends_of_the_ramp() {
        let low = gradient_color(0.0);
        let high = gradient_color(1.0);
        assert!(low.b() > low.r());
        assert!(high.r() > high.b());
    }

    #[test]
    fn map_spans_finite_heights() {
        let map = HeightColorMap::new([3.0, f64::NAN, 1.0, 2.0]).unwrap();
        assert_eq!((map.min, map.max), (1.0, 3.0));
        assert_eq!(map.color_for(1.0), gradient_color(0.0));
        assert_eq!(map.color_for(3.0), gradient_color(1.0));
        assert_eq!(map.legend_entries(3)[1].0, "2.000");
        assert!(HeightColorMap::new(std::iter::empty()).is_none());
    }
}
