use super::config::ChartConfig;
use crate::domain::chart::{
    BoundSeries, ChartSurface, ContainerEnvironment, OptionsPatch, ResizeSource, SeriesData,
    SeriesKind, SeriesPoint, Subscription, SurfaceFactory, SurfaceOptions, ThemeName, ThemeSource,
    ThemedColors,
};
use crate::domain::errors::ChartResult;
use crate::domain::logging::{LogComponent, TimeProvider};
use crate::domain::market_data::{DepthLevel, DepthSnapshot, Tick, TickAggregator};
use crate::{log_debug, log_info, log_warn};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Everything outside the chart that it reads from or listens to.
#[derive(Clone)]
pub struct ChartEnvironment {
    pub container: Rc<dyn ContainerEnvironment>,
    pub resize: Rc<dyn ResizeSource>,
    pub theme: Rc<dyn ThemeSource>,
    pub clock: Rc<dyn TimeProvider>,
}

/// Surface plus the three series bound to it.
struct ChartState<S> {
    surface: S,
    candles: BoundSeries,
    bids: BoundSeries,
    asks: BoundSeries,
}

/// Resources held while active; released together by `deactivate`.
struct Mounted<S> {
    state: Rc<RefCell<ChartState<S>>>,
    resize: Subscription,
    theme: Subscription,
}

/// Owns one rendering surface with a candle series and two depth series,
/// and keeps it in step with data, container width and theme.
pub struct TradeChart<F: SurfaceFactory> {
    config: ChartConfig,
    aggregator: TickAggregator,
    factory: F,
    env: ChartEnvironment,
    mounted: Option<Mounted<F::Surface>>,
    /// Last inputs given to `update`, redrawn by every `activate`.
    latest_ticks: Vec<Tick>,
    latest_depth: Option<DepthSnapshot>,
}

impl<F: SurfaceFactory> TradeChart<F> {
    pub fn new(config: ChartConfig, factory: F, env: ChartEnvironment) -> Self {
        Self {
            aggregator: config.aggregator(),
            config,
            factory,
            env,
            mounted: None,
            latest_ticks: Vec::new(),
            latest_depth: None,
        }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.mounted.is_some()
    }

    /// Series as created on activation: candles, bid depth, ask depth.
    pub fn series(&self) -> Option<[BoundSeries; 3]> {
        self.mounted.as_ref().map(|mounted| {
            let state = mounted.state.borrow();
            [state.candles, state.bids, state.asks]
        })
    }

    /// Create the surface and its series, then start listening for resize
    /// and theme changes. No-op when already active.
    pub fn activate(&mut self) -> ChartResult<()> {
        if self.mounted.is_some() {
            return Ok(());
        }

        let theme = self.env.theme.current_theme();
        let options = SurfaceOptions::new(
            self.env.container.width(),
            self.config.height,
            themed_colors(self.env.theme.as_ref(), theme),
        );
        let mut surface = self.factory.create(&options)?;

        let candles = BoundSeries::create(&mut surface, SeriesKind::Candlestick);
        let bids = BoundSeries::create(&mut surface, SeriesKind::Area);
        let asks = BoundSeries::create(&mut surface, SeriesKind::Area);
        for series in [&candles, &bids, &asks] {
            if series.is_degraded() {
                log_info!(
                    LogComponent::Application("TradeChart"),
                    "{} series degraded to {}",
                    series.requested,
                    series.kind
                );
            }
        }

        let state = Rc::new(RefCell::new(ChartState { surface, candles, bids, asks }));
        let resize = self.subscribe_resize(Rc::downgrade(&state));
        let theme_subscription = self.subscribe_theme(Rc::downgrade(&state));
        self.mounted = Some(Mounted { state, resize, theme: theme_subscription });

        log_info!(
            LogComponent::Application("TradeChart"),
            "activated {}x{} ({} theme)",
            options.width,
            options.height,
            theme
        );

        let ticks = std::mem::take(&mut self.latest_ticks);
        let depth = self.latest_depth.take();
        if !ticks.is_empty() || depth.is_some() {
            self.update(&ticks, depth.as_ref());
        }

        Ok(())
    }

    fn subscribe_resize(&self, state: Weak<RefCell<ChartState<F::Surface>>>) -> Subscription {
        let container = Rc::clone(&self.env.container);
        self.env.resize.on_resize(Box::new(move || {
            let Some(state) = state.upgrade() else { return };
            let Ok(mut state) = state.try_borrow_mut() else {
                log_warn!(LogComponent::Application("TradeChart"), "resize skipped: chart busy");
                return;
            };
            let width = container.width();
            state.surface.apply_options(&OptionsPatch::width(width));
            log_debug!(LogComponent::Application("TradeChart"), "width -> {}", width);
        }))
    }

    fn subscribe_theme(&self, state: Weak<RefCell<ChartState<F::Surface>>>) -> Subscription {
        let source = Rc::downgrade(&self.env.theme);
        self.env.theme.on_theme_change(Box::new(move |theme| {
            let (Some(state), Some(source)) = (state.upgrade(), source.upgrade()) else {
                return;
            };
            let Ok(mut state) = state.try_borrow_mut() else {
                log_warn!(LogComponent::Application("TradeChart"), "theme skipped: chart busy");
                return;
            };
            let colors = themed_colors(source.as_ref(), theme);
            state.surface.apply_options(&OptionsPatch::themed(&colors));
            log_debug!(LogComponent::Application("TradeChart"), "theme -> {}", theme);
        }))
    }

    /// Recompute candles from `ticks` and replace the series data.
    ///
    /// An empty candle set leaves the candle series alone. Depth series are
    /// replaced only when a snapshot is given. The inputs are kept, so a
    /// later `activate` (first or after `deactivate`) redraws them. Returns
    /// the candle count.
    pub fn update(&mut self, ticks: &[Tick], depth: Option<&DepthSnapshot>) -> usize {
        let candles = self.aggregator.aggregate(ticks);
        let count = candles.len();

        self.latest_ticks = ticks.to_vec();
        if let Some(depth) = depth {
            self.latest_depth = Some(depth.clone());
        }

        let Some(mounted) = &self.mounted else {
            return count;
        };

        let mut state = mounted.state.borrow_mut();
        if !candles.is_empty() {
            let series = state.candles;
            state.surface.set_data(series.handle, series.candle_data(candles));
        }

        if let Some(depth) = depth {
            let now = self.env.clock.current_second();
            let (bids, asks) = (state.bids.handle, state.asks.handle);
            state.surface.set_data(bids, depth_points(&depth.bids, now));
            state.surface.set_data(asks, depth_points(&depth.asks, now));
        }

        count
    }

    /// Forget the kept ticks and write an empty candle dataset, so the next
    /// `update` with no ticks leaves the candle series blank. Depth is kept.
    pub fn clear_candles(&mut self) {
        self.latest_ticks.clear();
        let Some(mounted) = &self.mounted else { return };
        let mut state = mounted.state.borrow_mut();
        let series = state.candles;
        state.surface.set_data(series.handle, series.candle_data(Vec::new()));
    }

    /// Cancel both subscriptions and remove the surface. No-op when inactive.
    pub fn deactivate(&mut self) {
        let Some(Mounted { state, resize, theme }) = self.mounted.take() else {
            return;
        };
        resize.cancel();
        theme.cancel();
        state.borrow_mut().surface.remove();
        log_info!(LogComponent::Application("TradeChart"), "deactivated");
    }
}

impl<F: SurfaceFactory> Drop for TradeChart<F> {
    fn drop(&mut self) {
        self.deactivate();
    }
}

/// Theme colors from the style source, each missing one replaced by the
/// theme's built-in value.
pub fn themed_colors(source: &dyn ThemeSource, theme: ThemeName) -> ThemedColors {
    ThemedColors::resolve(theme, |option| {
        let color = source.read_color(option);
        if color.is_none() {
            log_debug!(
                LogComponent::Application("TradeChart"),
                "{} unset, using {} fallback",
                option.css_variable(),
                theme
            );
        }
        color
    })
}

/// Depth levels as series points, all stamped with `now` (epoch seconds).
pub fn depth_points(levels: &[DepthLevel], now: i64) -> SeriesData {
    SeriesData::Points(levels.iter().map(|level| SeriesPoint::new(now, level.price)).collect())
}
