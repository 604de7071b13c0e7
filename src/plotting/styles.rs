use plotters::style::RGBAColor;

use crate::config::Theme;

/// Chart theme configuration
#[derive(Clone, Debug, PartialEq)]
pub struct ChartTheme {
    pub background_color: RGBAColor,
    pub text_color: RGBAColor,
    pub muted_color: RGBAColor,
    pub grid_color: RGBAColor,
    pub axis_color: RGBAColor,
    /// Fixed series palette; series `i` uses `palette[i % len]`
    pub palette: [RGBAColor; 8],
}

const PALETTE: [RGBAColor; 8] = [
    RGBAColor(79, 140, 255, 1.0),
    RGBAColor(34, 211, 238, 1.0),
    RGBAColor(34, 197, 94, 1.0),
    RGBAColor(245, 158, 11, 1.0),
    RGBAColor(239, 68, 68, 1.0),
    RGBAColor(168, 85, 247, 1.0),
    RGBAColor(249, 115, 22, 1.0),
    RGBAColor(236, 72, 153, 1.0),
];

impl ChartTheme {
    pub fn dark() -> Self {
        Self {
            background_color: RGBAColor(18, 21, 28, 1.0),
            text_color: RGBAColor(233, 238, 247, 1.0),
            muted_color: RGBAColor(154, 164, 178, 1.0),
            grid_color: RGBAColor(154, 164, 178, 0.15),
            axis_color: RGBAColor(154, 164, 178, 0.6),
            palette: PALETTE,
        }
    }

    pub fn light() -> Self {
        Self {
            background_color: RGBAColor(255, 255, 255, 1.0),
            text_color: RGBAColor(17, 24, 39, 1.0),
            muted_color: RGBAColor(100, 116, 139, 1.0),
            grid_color: RGBAColor(100, 116, 139, 0.15),
            axis_color: RGBAColor(100, 116, 139, 0.6),
            palette: PALETTE,
        }
    }

    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    pub fn series_color(&self, index: usize) -> RGBAColor {
        self.palette[index % self.palette.len()]
    }
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self::dark()
    }
}

/// Chart style configuration, in logical pixels
#[derive(Clone, Debug, PartialEq)]
pub struct ChartStyle {
    pub line_width: f64,
    pub font_size: f64,
    pub title_size: f64,
    pub marker_radius: f64,
    pub margin: f64,
    pub label_area_size: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            line_width: 2.0,
            font_size: 11.0,
            title_size: 15.0,
            marker_radius: 3.0,
            margin: 10.0,
            label_area_size: 50.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_wraps_around() {
        let theme = ChartTheme::dark();
        assert_eq!(theme.series_color(0), theme.series_color(8));
        assert_ne!(theme.series_color(0), theme.series_color(1));
    }

    #[test]
    fn light_theme_differs_only_in_surface_colors() {
        let dark = ChartTheme::for_theme(Theme::Dark);
        let light = ChartTheme::for_theme(Theme::Light);
        assert_ne!(dark.background_color, light.background_color);
        assert_eq!(dark.palette, light.palette);
    }
}
