use crate::constants::{DEFAULT_CANVAS_ID, MAX_DEVICE_PIXEL_RATIO};

/// Mount-time settings. Defaults come from `constants.rs`; a page can
/// override them with `data-max-dpr` and `data-panel` on the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectConfig {
    pub canvas_id: String,
    pub max_device_pixel_ratio: f64,
    pub panel: bool,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            canvas_id: DEFAULT_CANVAS_ID.to_string(),
            max_device_pixel_ratio: MAX_DEVICE_PIXEL_RATIO,
            panel: true,
        }
    }
}

impl EffectConfig {
    pub fn with_canvas_id(canvas_id: &str) -> Self {
        Self {
            canvas_id: canvas_id.to_string(),
            ..Self::default()
        }
    }

    /// Applies attribute overrides; unparsable values keep the default.
    pub fn apply_overrides(&mut self, max_dpr: Option<&str>, panel: Option<&str>) {
        if let Some(v) = max_dpr.and_then(|s| s.trim().parse::<f64>().ok()) {
            if v.is_finite() && v > 0.0 {
                self.max_device_pixel_ratio = v;
            } else {
                log::warn!("[config] ignoring data-max-dpr={}", v);
            }
        }
        if let Some(p) = panel {
            match p.trim() {
                "off" | "false" | "0" | "hidden" => self.panel = false,
                "on" | "true" | "1" | "" => self.panel = true,
                other => log::warn!("[config] ignoring data-panel={:?}", other),
            }
        }
    }

    /// Effective pixel ratio for the canvas backing store.
    #[inline]
    pub fn pixel_ratio(&self, device_pixel_ratio: f64) -> f64 {
        device_pixel_ratio.min(self.max_device_pixel_ratio).max(0.0)
    }
}
