use super::math::{format_number, ChannelSlopes, SharpenKernel};

pub const SVG_CONTAINER_ID: &str = "vivideo-svg-filters";
pub const ADVANCED_FILTER_ID: &str = "vivideo-advanced-filter";

/// Parameters of the gamma / color temperature / sharpen composite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdvancedFilter {
    pub gamma: f64,
    pub slopes: ChannelSlopes,
    pub kernel: Option<SharpenKernel>,
}

impl AdvancedFilter {
    pub fn css_reference(&self) -> String {
        format!("url(#{ADVANCED_FILTER_ID})")
    }

    /// Serializes the filter as a hidden inline `<svg>` element.
    pub fn to_markup(&self) -> String {
        let exponent = format_number(self.gamma);
        let mut markup = format!(
            "<svg id=\"{SVG_CONTAINER_ID}\" xmlns=\"http://www.w3.org/2000/svg\" \
             width=\"0\" height=\"0\" style=\"position:absolute\">\
             <defs><filter id=\"{ADVANCED_FILTER_ID}\" color-interpolation-filters=\"sRGB\">\
             <feComponentTransfer>"
        );
        for (channel, amplitude) in [
            ('R', self.slopes.red),
            ('G', self.slopes.green),
            ('B', self.slopes.blue),
        ] {
            markup.push_str(&format!(
                "<feFunc{channel} type=\"gamma\" amplitude=\"{}\" exponent=\"{exponent}\" offset=\"0\"/>",
                format_number(amplitude)
            ));
        }
        markup.push_str("</feComponentTransfer>");

        if let Some(kernel) = self.kernel {
            let matrix = kernel
                .weights
                .iter()
                .map(|weight| format_number(*weight))
                .collect::<Vec<_>>()
                .join(" ");
            markup.push_str(&format!(
                "<feConvolveMatrix order=\"3\" kernelMatrix=\"{matrix}\" divisor=\"1\" preserveAlpha=\"true\"/>"
            ));
        }

        markup.push_str("</filter></defs></svg>");
        markup
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::math::{color_temperature_slopes, sharpen_kernel};

    #[test]
    fn markup_carries_per_channel_gamma() {
        let filter = AdvancedFilter {
            gamma: 1.5,
            slopes: color_temperature_slopes(50.0),
            kernel: None,
        };
        let markup = filter.to_markup();

        assert!(markup.contains("id=\"vivideo-advanced-filter\""));
        assert!(markup.contains(
            "<feFuncR type=\"gamma\" amplitude=\"1.15\" exponent=\"1.5\" offset=\"0\"/>"
        ));
        assert!(markup.contains("<feFuncG type=\"gamma\" amplitude=\"1.075\""));
        assert!(markup.contains("<feFuncB type=\"gamma\" amplitude=\"0.8\""));
        assert!(!markup.contains("feConvolveMatrix"));
    }

    #[test]
    fn markup_includes_kernel_when_sharpening() {
        let filter = AdvancedFilter {
            gamma: 1.0,
            slopes: ChannelSlopes::NEUTRAL,
            kernel: sharpen_kernel(50.0),
        };
        let markup = filter.to_markup();

        assert!(markup.contains(
            "kernelMatrix=\"-0.4 -0.4 -0.4 -0.4 2.6 -0.4 -0.4 -0.4 -0.4\""
        ));
    }
}
