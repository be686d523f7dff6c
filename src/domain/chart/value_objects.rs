use crate::domain::market_data::Candle;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

/// Value Object - series type a surface can host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, AsRefStr)]
pub enum SeriesKind {
    #[display(fmt = "Candlestick")]
    #[strum(serialize = "candlestick")]
    Candlestick,
    #[display(fmt = "Area")]
    #[strum(serialize = "area")]
    Area,
    #[display(fmt = "Line")]
    #[strum(serialize = "line")]
    Line,
}

/// Opaque id of a series attached to one surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "series#{}", _0)]
pub struct SeriesHandle(pub u32);

/// Value Object - time/value point of line and area series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Epoch seconds.
    pub time: i64,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(time: i64, value: f64) -> Self {
        Self { time, value }
    }
}

/// Full dataset handed to a series; always replaces what it had.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesData {
    Candles(Vec<Candle>),
    Points(Vec<SeriesPoint>),
}

impl SeriesData {
    pub fn len(&self) -> usize {
        match self {
            SeriesData::Candles(candles) => candles.len(),
            SeriesData::Points(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Value Object - a CSS color string as read from a style source
#[derive(Debug, Clone, PartialEq, Eq, Display, From)]
#[display(fmt = "{}", _0)]
pub struct CssColor(String);

impl CssColor {
    /// Trimmed color, or `None` for the empty string a missing CSS custom
    /// property reads back as.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() { None } else { Some(Self(trimmed.to_string())) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CssColor {
    fn from(value: &str) -> Self {
        Self(value.trim().to_string())
    }
}

/// Value Object - active color theme
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash,
    Display, EnumIter, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum ThemeName {
    #[default]
    #[display(fmt = "dark")]
    #[strum(serialize = "dark")]
    #[serde(rename = "dark")]
    Dark,
    #[display(fmt = "light")]
    #[strum(serialize = "light")]
    #[serde(rename = "light")]
    Light,
}

impl ThemeName {
    /// Attribute value to theme; unknown or missing values mean dark.
    pub fn from_attribute(value: Option<&str>) -> Self {
        value.and_then(|raw| raw.trim().parse().ok()).unwrap_or_default()
    }

    pub fn toggled(&self) -> Self {
        match self {
            ThemeName::Dark => ThemeName::Light,
            ThemeName::Light => ThemeName::Dark,
        }
    }
}

/// The four surface options that follow the theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum ThemedOption {
    #[display(fmt = "background")]
    Background,
    #[display(fmt = "text")]
    Text,
    #[display(fmt = "grid")]
    Grid,
    #[display(fmt = "border")]
    Border,
}

impl ThemedOption {
    /// CSS custom property the color is read from.
    pub fn css_variable(&self) -> &'static str {
        match self {
            ThemedOption::Background => "--chart-background",
            ThemedOption::Text => "--chart-text",
            ThemedOption::Grid => "--chart-grid",
            ThemedOption::Border => "--chart-border",
        }
    }

    /// Color used when the style source has nothing for this option.
    pub fn fallback(&self, theme: ThemeName) -> &'static str {
        match (theme, self) {
            (ThemeName::Dark, ThemedOption::Background) => "#0b0e11",
            (ThemeName::Dark, ThemedOption::Text) => "#d1d4dc",
            (ThemeName::Dark, ThemedOption::Grid) => "#1e2329",
            (ThemeName::Dark, ThemedOption::Border) => "#2b3139",
            (ThemeName::Light, ThemedOption::Background) => "#ffffff",
            (ThemeName::Light, ThemedOption::Text) => "#1e2329",
            (ThemeName::Light, ThemedOption::Grid) => "#eaecef",
            (ThemeName::Light, ThemedOption::Border) => "#d5d9de",
        }
    }
}

/// Resolved colors for the themed options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemedColors {
    pub background: CssColor,
    pub text: CssColor,
    pub grid: CssColor,
    pub border: CssColor,
}

impl ThemedColors {
    /// Built-in palette of a theme, no style source involved.
    pub fn fallback(theme: ThemeName) -> Self {
        Self::resolve(theme, |_| None)
    }

    /// Looks up each option through `lookup`, falling back per option.
    pub fn resolve(theme: ThemeName, mut lookup: impl FnMut(ThemedOption) -> Option<CssColor>) -> Self {
        let mut pick = |option: ThemedOption| {
            lookup(option).unwrap_or_else(|| CssColor::from(option.fallback(theme)))
        };
        Self {
            background: pick(ThemedOption::Background),
            text: pick(ThemedOption::Text),
            grid: pick(ThemedOption::Grid),
            border: pick(ThemedOption::Border),
        }
    }
}

/// Partial update of surface options; `None` leaves an option untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionsPatch {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub background: Option<CssColor>,
    pub text_color: Option<CssColor>,
    pub grid_color: Option<CssColor>,
    pub border_color: Option<CssColor>,
}

impl OptionsPatch {
    pub fn width(width: u32) -> Self {
        Self { width: Some(width), ..Default::default() }
    }

    pub fn themed(colors: &ThemedColors) -> Self {
        Self {
            background: Some(colors.background.clone()),
            text_color: Some(colors.text.clone()),
            grid_color: Some(colors.grid.clone()),
            border_color: Some(colors.border.clone()),
            ..Default::default()
        }
    }

    /// Names of the options this patch sets, in declaration order.
    pub fn touched(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.width.is_some() {
            names.push("width");
        }
        if self.height.is_some() {
            names.push("height");
        }
        if self.background.is_some() {
            names.push("background");
        }
        if self.text_color.is_some() {
            names.push("text_color");
        }
        if self.grid_color.is_some() {
            names.push("grid_color");
        }
        if self.border_color.is_some() {
            names.push("border_color");
        }
        names
    }
}

/// Full option set a surface is created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceOptions {
    pub width: u32,
    pub height: u32,
    pub colors: ThemedColors,
}

impl SurfaceOptions {
    pub fn new(width: u32, height: u32, colors: ThemedColors) -> Self {
        Self { width, height, colors }
    }

    pub fn apply(&mut self, patch: &OptionsPatch) {
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(color) = &patch.background {
            self.colors.background = color.clone();
        }
        if let Some(color) = &patch.text_color {
            self.colors.text = color.clone();
        }
        if let Some(color) = &patch.grid_color {
            self.colors.grid = color.clone();
        }
        if let Some(color) = &patch.border_color {
            self.colors.border = color.clone();
        }
    }
}
