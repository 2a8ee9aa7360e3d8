use crate::settings::Settings;

/// Scales applied to the red, green and blue transfer functions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelSlopes {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl ChannelSlopes {
    pub const NEUTRAL: ChannelSlopes = ChannelSlopes {
        red: 1.0,
        green: 1.0,
        blue: 1.0,
    };
}

/// 3x3 sharpening convolution, row-major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SharpenKernel {
    pub weights: [f64; 9],
}

impl SharpenKernel {
    pub fn center(&self) -> f64 {
        self.weights[4]
    }
}

pub fn brightness_factor(brightness: f64) -> f64 {
    1.0 + brightness / 100.0
}

pub fn contrast_factor(contrast: f64) -> f64 {
    1.0 + contrast / 100.0
}

pub fn saturation_factor(saturation: f64) -> f64 {
    (1.0 + saturation / 100.0).max(0.0)
}

/// Linear hue mapping kept for hosts that can only use `hue-rotate`.
pub fn hue_rotation_degrees(color_temp: f64) -> f64 {
    color_temp * 1.8
}

pub fn color_temperature_slopes(color_temp: f64) -> ChannelSlopes {
    let t = color_temp / 100.0;
    if t > 0.0 {
        ChannelSlopes {
            red: 1.0 + 0.3 * t,
            green: 1.0 + 0.15 * t,
            blue: (1.0 - 0.4 * t).max(0.4),
        }
    } else if t < 0.0 {
        let c = t.abs();
        ChannelSlopes {
            red: (1.0 - 0.3 * c).max(0.5),
            green: (1.0 - 0.1 * c).max(0.7),
            blue: 1.0 + 0.4 * c,
        }
    } else {
        ChannelSlopes::NEUTRAL
    }
}

pub fn sharpen_kernel(sharpness: f64) -> Option<SharpenKernel> {
    if sharpness <= 0.0 {
        return None;
    }
    let s = sharpness / 100.0 * 0.8;
    let mut weights = [-s; 9];
    weights[4] = 1.0 + 4.0 * s;
    Some(SharpenKernel { weights })
}

pub fn needs_advanced_filter(settings: &Settings) -> bool {
    settings.gamma != 1.0 || settings.color_temp != 0.0 || settings.sharpness > 0.0
}

pub fn temperature_label(color_temp: f64) -> &'static str {
    let magnitude = color_temp.abs();
    let warm = color_temp > 0.0;
    match magnitude {
        m if m > 75.0 => pick(warm, "Very Warm", "Very Cold"),
        m if m > 40.0 => pick(warm, "Warm", "Cold"),
        m if m > 15.0 => pick(warm, "Cozy", "Cool"),
        m if m > 5.0 => pick(warm, "Slightly Warm", "Slightly Cool"),
        _ => "Neutral",
    }
}

const fn pick(warm: bool, warm_label: &'static str, cool_label: &'static str) -> &'static str {
    if warm {
        warm_label
    } else {
        cool_label
    }
}

/// Formats a filter argument without float noise: at most four decimals,
/// trailing zeros dropped.
pub fn format_number(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let text = format!("{rounded:.4}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    text.to_string()
}
