use super::Control;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Slider domains, one table per limit mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub brightness: ValueRange,
    pub contrast: ValueRange,
    pub saturation: ValueRange,
    pub gamma: ValueRange,
    pub color_temp: ValueRange,
    pub sharpness: ValueRange,
    pub speed: ValueRange,
}

impl Limits {
    pub const fn range(&self, control: Control) -> ValueRange {
        match control {
            Control::Brightness => self.brightness,
            Control::Contrast => self.contrast,
            Control::Saturation => self.saturation,
            Control::Gamma => self.gamma,
            Control::ColorTemp => self.color_temp,
            Control::Sharpness => self.sharpness,
            Control::Speed => self.speed,
        }
    }
}

pub const STANDARD_LIMITS: Limits = Limits {
    brightness: ValueRange::new(-100.0, 100.0),
    contrast: ValueRange::new(-100.0, 100.0),
    saturation: ValueRange::new(-90.0, 100.0),
    gamma: ValueRange::new(0.1, 3.0),
    color_temp: ValueRange::new(-100.0, 100.0),
    sharpness: ValueRange::new(0.0, 100.0),
    speed: ValueRange::new(0.05, 25.0),
};

pub const EXTENDED_LIMITS: Limits = Limits {
    brightness: ValueRange::new(-200.0, 200.0),
    contrast: ValueRange::new(-200.0, 200.0),
    saturation: ValueRange::new(-100.0, 300.0),
    gamma: ValueRange::new(0.1, 5.0),
    color_temp: ValueRange::new(-200.0, 200.0),
    sharpness: ValueRange::new(0.0, 300.0),
    speed: ValueRange::new(0.05, 25.0),
};
