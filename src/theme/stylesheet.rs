use super::ThemeHsl;

pub const THEME_STYLE_ID: &str = "vivideo-theme-style";

pub fn render_stylesheet(hsl: ThemeHsl) -> String {
    let ThemeHsl {
        font_hue,
        background_hue,
        saturation,
        lightness,
    } = hsl;
    let (text_lightness, muted_lightness, border_lightness) = if hsl.is_dark() {
        (92.0, 70.0, (lightness + 14.0).min(100.0))
    } else {
        (12.0, 38.0, (lightness - 14.0).max(0.0))
    };
    let surface_lightness = if hsl.is_dark() {
        (lightness + 6.0).min(100.0)
    } else {
        (lightness - 6.0).max(0.0)
    };
    format!(
        "
.vivideo-panel {{
  background: hsla({background_hue}, {saturation}%, {lightness}%, 0.94);
  color: hsl({font_hue}, {saturation}%, {text_lightness}%);
  border: 1px solid hsl({background_hue}, {saturation}%, {border_lightness}%);
  border-radius: 12px;
  box-shadow: 0 8px 28px rgba(0, 0, 0, 0.28);
}}
.vivideo-panel label,
.vivideo-panel .vivideo-value {{
  color: hsl({font_hue}, {saturation}%, {text_lightness}%);
}}
.vivideo-panel .vivideo-muted {{
  color: hsl({font_hue}, {saturation}%, {muted_lightness}%);
}}
.vivideo-panel button,
.vivideo-panel .vivideo-subpanel {{
  background: hsl({background_hue}, {saturation}%, {surface_lightness}%);
  color: hsl({font_hue}, {saturation}%, {text_lightness}%);
  border: 1px solid hsl({background_hue}, {saturation}%, {border_lightness}%);
  border-radius: 8px;
}}
.vivideo-panel button:hover {{
  border-color: hsl({font_hue}, {saturation}%, {muted_lightness}%);
}}
.vivideo-panel input[type=range] {{
  accent-color: hsl({font_hue}, {saturation}%, {muted_lightness}%);
}}
.vivideo-panel .vivideo-modified {{
  color: hsl(35, 90%, 55%);
}}
"
    )
}
