use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

/// Value Object - Space reserved around the plot area
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }

    pub const fn uniform(margin: f64) -> Self {
        Self::new(margin, margin, margin, margin)
    }
}

/// Value Object - Outer chart size plus margins
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
}

impl Dimensions {
    /// Charts narrower than this are not drawn at all.
    pub const MIN_RENDER_WIDTH: f64 = 10.0;

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, margin: Margin::default() }
    }

    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    pub fn inner_width(&self) -> f64 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    pub fn inner_height(&self) -> f64 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }

    pub fn is_renderable(&self) -> bool {
        self.width >= Self::MIN_RENDER_WIDTH
    }
}

/// Value Object - Light/dark UI mode
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[display(fmt = "light")]
    #[strum(serialize = "light")]
    Light,
    #[default]
    #[display(fmt = "dark")]
    #[strum(serialize = "dark")]
    Dark,
}

impl ColorMode {
    pub fn toggled(self) -> Self {
        match self {
            ColorMode::Light => ColorMode::Dark,
            ColorMode::Dark => ColorMode::Light,
        }
    }

    /// Pick between the light and the dark variant of a value.
    pub fn pick<T>(self, light: T, dark: T) -> T {
        match self {
            ColorMode::Light => light,
            ColorMode::Dark => dark,
        }
    }

    pub fn palette(self) -> Palette {
        Palette {
            page_background: self.pick("#ffffff", "#080A0C"),
            page_text: self.pick("#1A202C", "#ffffff"),
            chart_background: self.pick("#ffffff", "#050309"),
            accent: self.pick("#4A29A8", "#0091EA"),
            accent_dark: self.pick("#920ECF", "#F19837"),
            card_background: self.pick("#ffffff", "#15181C"),
            card_border: self.pick("#000000", "#15181C"),
        }
    }
}

/// CSS colors for one color mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub page_background: &'static str,
    pub page_text: &'static str,
    pub chart_background: &'static str,
    pub accent: &'static str,
    pub accent_dark: &'static str,
    pub card_background: &'static str,
    pub card_border: &'static str,
}
