pub mod math;
mod svg;

use crate::settings::Settings;

pub use math::{
    brightness_factor, color_temperature_slopes, contrast_factor, hue_rotation_degrees,
    needs_advanced_filter, saturation_factor, sharpen_kernel, temperature_label, ChannelSlopes,
    SharpenKernel,
};
pub use svg::{AdvancedFilter, ADVANCED_FILTER_ID, SVG_CONTAINER_ID};

/// Everything the applier needs for one pass over the page.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterChain {
    pub primitives: String,
    pub advanced: Option<AdvancedFilter>,
}

impl FilterChain {
    pub fn from_settings(settings: &Settings) -> Self {
        let primitives = format!(
            "brightness({}) contrast({}) saturate({})",
            math::format_number(brightness_factor(settings.brightness)),
            math::format_number(contrast_factor(settings.contrast)),
            math::format_number(saturation_factor(settings.saturation)),
        );
        let advanced = needs_advanced_filter(settings).then(|| AdvancedFilter {
            gamma: settings.gamma,
            slopes: color_temperature_slopes(settings.color_temp),
            kernel: sharpen_kernel(settings.sharpness),
        });
        Self {
            primitives,
            advanced,
        }
    }

    /// Value written to each element's `filter` style property.
    pub fn css_value(&self) -> String {
        match &self.advanced {
            Some(advanced) => format!("{} {}", self.primitives, advanced.css_reference()),
            None => self.primitives.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_adjustments_produce_css_only_chain() {
        let settings = Settings {
            brightness: 20.0,
            contrast: -10.0,
            saturation: 0.0,
            gamma: 1.0,
            color_temp: 0.0,
            sharpness: 0.0,
            ..Settings::default()
        };
        let chain = FilterChain::from_settings(&settings);

        assert_eq!(chain.css_value(), "brightness(1.2) contrast(0.9) saturate(1)");
        assert!(chain.advanced.is_none());
    }

    #[test]
    fn advanced_fields_append_svg_reference() {
        let settings = Settings {
            color_temp: 50.0,
            sharpness: 10.0,
            ..Settings::default()
        };
        let chain = FilterChain::from_settings(&settings);

        assert_eq!(
            chain.css_value(),
            "brightness(1) contrast(1) saturate(1) url(#vivideo-advanced-filter)"
        );
        let advanced = chain.advanced.expect("advanced filter should be present");
        assert!(advanced.kernel.is_some());
        assert_eq!(advanced.gamma, 1.0);
    }
}
