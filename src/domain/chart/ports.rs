//! Seams between the chart core and its environment.
//!
//! Browser adapters live in `infrastructure::browser`, in-memory ones in
//! `infrastructure::headless`.

use super::value_objects::{
    CssColor, OptionsPatch, SeriesData, SeriesHandle, SeriesKind, SurfaceOptions, ThemeName,
    ThemedOption,
};
use crate::domain::errors::ChartResult;

/// Rendering surface owning its series.
pub trait ChartSurface {
    fn apply_options(&mut self, patch: &OptionsPatch);

    /// Dedicated constructor for `kind` (candlestick, area).
    fn add_native_series(&mut self, kind: SeriesKind) -> ChartResult<SeriesHandle>;

    /// Generic constructor taking the kind as a parameter.
    fn add_series(&mut self, kind: SeriesKind) -> ChartResult<SeriesHandle>;

    /// Line series; every surface supports it.
    fn add_line_series(&mut self) -> SeriesHandle;

    /// Replace the whole dataset of `series`.
    fn set_data(&mut self, series: SeriesHandle, data: SeriesData);

    /// Release the surface and every series on it.
    fn remove(&mut self);
}

pub trait SurfaceFactory {
    type Surface: ChartSurface + 'static;

    fn create(&self, options: &SurfaceOptions) -> ChartResult<Self::Surface>;
}

/// Mountable region the surface lives in.
pub trait ContainerEnvironment {
    fn width(&self) -> u32;
}

pub trait ResizeSource {
    fn on_resize(&self, handler: Box<dyn FnMut()>) -> Subscription;
}

pub trait ThemeSource {
    fn current_theme(&self) -> ThemeName;

    fn read_color(&self, option: ThemedOption) -> Option<CssColor>;

    fn on_theme_change(&self, handler: Box<dyn FnMut(ThemeName)>) -> Subscription;
}

/// Live subscription; cancelled on `cancel()` or drop, whichever is first.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self { cancel: Some(Box::new(cancel)) }
    }

    /// Subscription with nothing to release.
    pub fn empty() -> Self {
        Self { cancel: None }
    }

    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("active", &self.cancel.is_some()).finish()
    }
}
