use crate::domain::chart::{
    ChartSurface, OptionsPatch, SeriesData, SeriesHandle, SeriesKind, SurfaceFactory,
    SurfaceOptions,
};
use crate::domain::errors::{ChartError, ChartResult};
use crate::domain::logging::LogComponent;
use crate::domain::market_data::Candle;
use crate::{log_debug, log_warn};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement};

/// Right-hand strip reserved for price labels.
pub const PRICE_AXIS_WIDTH: f64 = 60.0;
pub const PLOT_PADDING: f64 = 10.0;
const GRID_LINES: usize = 5;
const BULL_COLOR: &str = "#0ecb81";
const BEAR_COLOR: &str = "#f6465d";
const BID_COLOR: &str = "#0ecb81";
const ASK_COLOR: &str = "#f6465d";
const LINE_COLOR: &str = "#f0b90b";

/// Maps time (epoch seconds) and price onto canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotScale {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub min_time: i64,
    pub max_time: i64,
    pub min_price: f64,
    pub max_price: f64,
}

impl PlotScale {
    /// Scale fitting every candle and point of `series`, or `None` when
    /// there is nothing to draw.
    pub fn fit<'a>(
        series: impl IntoIterator<Item = &'a SeriesData>,
        canvas_width: u32,
        canvas_height: u32,
    ) -> Option<Self> {
        let mut bounds: Option<(i64, i64, f64, f64)> = None;
        let mut include = |time: i64, low: f64, high: f64| {
            bounds = Some(match bounds {
                None => (time, time, low, high),
                Some((t0, t1, p0, p1)) => (t0.min(time), t1.max(time), p0.min(low), p1.max(high)),
            });
        };

        for data in series {
            match data {
                SeriesData::Candles(candles) => {
                    candles.iter().for_each(|c| include(c.time, c.low, c.high));
                }
                SeriesData::Points(points) => {
                    points.iter().for_each(|p| include(p.time, p.value, p.value));
                }
            }
        }

        let (min_time, max_time, min_price, max_price) = bounds?;
        Some(Self {
            left: PLOT_PADDING,
            top: PLOT_PADDING,
            width: (canvas_width as f64 - PRICE_AXIS_WIDTH - PLOT_PADDING * 2.0).max(1.0),
            height: (canvas_height as f64 - PLOT_PADDING * 2.0).max(1.0),
            min_time,
            max_time,
            min_price,
            max_price,
        })
    }

    pub fn x(&self, time: i64) -> f64 {
        if self.max_time == self.min_time {
            return self.left + self.width / 2.0;
        }
        let ratio = (time - self.min_time) as f64 / (self.max_time - self.min_time) as f64;
        self.left + ratio * self.width
    }

    pub fn y(&self, price: f64) -> f64 {
        let range = self.max_price - self.min_price;
        if range <= f64::EPSILON {
            return self.top + self.height / 2.0;
        }
        self.top + (self.max_price - price) / range * self.height
    }

    /// Horizontal slot per candle when `count` candles share the width.
    pub fn slot_width(&self, count: usize) -> f64 {
        self.width / count.max(1) as f64
    }
}

struct CanvasSeries {
    handle: SeriesHandle,
    kind: SeriesKind,
    color: &'static str,
    data: SeriesData,
}

/// Canvas 2D surface appended to a container element.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    options: SurfaceOptions,
    series: Vec<CanvasSeries>,
    next_handle: u32,
    removed: bool,
}

impl CanvasSurface {
    fn attach(&mut self, kind: SeriesKind) -> SeriesHandle {
        self.next_handle += 1;
        let handle = SeriesHandle(self.next_handle);
        // Area series alternate bid/ask coloring in creation order.
        let areas = self.series.iter().filter(|s| s.kind == SeriesKind::Area).count();
        let color = match kind {
            SeriesKind::Candlestick => BULL_COLOR,
            SeriesKind::Area if areas % 2 == 0 => BID_COLOR,
            SeriesKind::Area => ASK_COLOR,
            SeriesKind::Line => LINE_COLOR,
        };
        self.series.push(CanvasSeries { handle, kind, color, data: SeriesData::Points(Vec::new()) });
        handle
    }

    fn redraw(&self) {
        if self.removed {
            return;
        }
        let ctx = &self.context;
        let width = self.options.width as f64;
        let height = self.options.height as f64;
        let colors = &self.options.colors;

        ctx.set_fill_style_str(colors.background.as_str());
        ctx.fill_rect(0.0, 0.0, width, height);

        let Some(scale) =
            PlotScale::fit(self.series.iter().map(|s| &s.data), self.options.width, self.options.height)
        else {
            self.draw_border();
            return;
        };

        self.draw_grid(&scale);
        for series in &self.series {
            match (&series.data, series.kind) {
                (SeriesData::Candles(candles), _) => self.draw_candles(&scale, candles),
                (SeriesData::Points(points), kind) => {
                    let coords: Vec<(f64, f64)> =
                        points.iter().map(|p| (scale.x(p.time), scale.y(p.value))).collect();
                    self.draw_line(&coords, series.color, kind == SeriesKind::Area, &scale);
                }
            }
        }
        self.draw_price_labels(&scale);
        self.draw_border();
    }

    fn draw_grid(&self, scale: &PlotScale) {
        let ctx = &self.context;
        ctx.set_stroke_style_str(self.options.colors.grid.as_str());
        ctx.set_line_width(1.0);
        ctx.begin_path();
        for i in 0..=GRID_LINES {
            let y = scale.top + scale.height * i as f64 / GRID_LINES as f64;
            ctx.move_to(scale.left, y);
            ctx.line_to(scale.left + scale.width, y);
            let x = scale.left + scale.width * i as f64 / GRID_LINES as f64;
            ctx.move_to(x, scale.top);
            ctx.line_to(x, scale.top + scale.height);
        }
        ctx.stroke();
    }

    fn draw_candles(&self, scale: &PlotScale, candles: &[Candle]) {
        let ctx = &self.context;
        let body_width = (scale.slot_width(candles.len()) * 0.6).clamp(1.0, 24.0);

        for candle in candles {
            let x = scale.x(candle.time);
            let color = if candle.close >= candle.open { BULL_COLOR } else { BEAR_COLOR };
            ctx.set_stroke_style_str(color);
            ctx.set_fill_style_str(color);

            ctx.begin_path();
            ctx.move_to(x, scale.y(candle.high));
            ctx.line_to(x, scale.y(candle.low));
            ctx.stroke();

            let open_y = scale.y(candle.open);
            let close_y = scale.y(candle.close);
            let body_height = (open_y - close_y).abs().max(1.0);
            ctx.fill_rect(x - body_width / 2.0, open_y.min(close_y), body_width, body_height);
        }
    }

    fn draw_line(&self, coords: &[(f64, f64)], color: &str, filled: bool, scale: &PlotScale) {
        let Some(&(first_x, first_y)) = coords.first() else { return };
        let ctx = &self.context;

        ctx.set_stroke_style_str(color);
        ctx.set_line_width(1.5);
        ctx.begin_path();
        ctx.move_to(first_x, first_y);
        for &(x, y) in &coords[1..] {
            ctx.line_to(x, y);
        }
        ctx.stroke();

        if filled {
            let bottom = scale.top + scale.height;
            let last_x = coords.last().map(|&(x, _)| x).unwrap_or(first_x);
            ctx.line_to(last_x, bottom);
            ctx.line_to(first_x, bottom);
            ctx.close_path();
            ctx.set_fill_style_str(color);
            ctx.set_global_alpha(0.2);
            ctx.fill();
            ctx.set_global_alpha(1.0);
        }
    }

    fn draw_price_labels(&self, scale: &PlotScale) {
        let ctx = &self.context;
        ctx.set_fill_style_str(self.options.colors.text.as_str());
        ctx.set_font("11px sans-serif");
        let label_x = scale.left + scale.width + 6.0;
        for i in 0..=GRID_LINES {
            let ratio = i as f64 / GRID_LINES as f64;
            let price = scale.max_price - (scale.max_price - scale.min_price) * ratio;
            let y = scale.top + scale.height * ratio;
            let _ = ctx.fill_text(&format!("{:.2}", price), label_x, y + 4.0);
        }
    }

    fn draw_border(&self) {
        let ctx = &self.context;
        ctx.set_stroke_style_str(self.options.colors.border.as_str());
        ctx.set_line_width(1.0);
        ctx.stroke_rect(
            0.5,
            0.5,
            self.options.width as f64 - 1.0,
            self.options.height as f64 - 1.0,
        );
    }
}

impl ChartSurface for CanvasSurface {
    fn apply_options(&mut self, patch: &OptionsPatch) {
        self.options.apply(patch);
        if patch.width.is_some() || patch.height.is_some() {
            // Resizing the backing store clears it.
            self.canvas.set_width(self.options.width);
            self.canvas.set_height(self.options.height);
        }
        self.redraw();
    }

    fn add_native_series(&mut self, kind: SeriesKind) -> ChartResult<SeriesHandle> {
        Ok(self.attach(kind))
    }

    fn add_series(&mut self, kind: SeriesKind) -> ChartResult<SeriesHandle> {
        Ok(self.attach(kind))
    }

    fn add_line_series(&mut self) -> SeriesHandle {
        self.attach(SeriesKind::Line)
    }

    fn set_data(&mut self, series: SeriesHandle, data: SeriesData) {
        match self.series.iter_mut().find(|s| s.handle == series) {
            Some(slot) => slot.data = data,
            None => {
                log_warn!(LogComponent::Infrastructure("Canvas"), "unknown {}", series);
                return;
            }
        }
        self.redraw();
    }

    fn remove(&mut self) {
        self.series.clear();
        self.canvas.remove();
        self.removed = true;
        log_debug!(LogComponent::Infrastructure("Canvas"), "surface removed");
    }
}

/// Creates canvas surfaces inside one container element.
pub struct CanvasSurfaceFactory {
    container: HtmlElement,
}

impl CanvasSurfaceFactory {
    pub fn new(container: HtmlElement) -> Self {
        Self { container }
    }
}

impl SurfaceFactory for CanvasSurfaceFactory {
    type Surface = CanvasSurface;

    fn create(&self, options: &SurfaceOptions) -> ChartResult<CanvasSurface> {
        let document = self
            .container
            .owner_document()
            .ok_or_else(|| ChartError::Mount("container has no document".to_string()))?;
        let canvas = document
            .create_element("canvas")
            .map_err(|e| ChartError::Mount(format!("create canvas: {:?}", e)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| ChartError::Mount("element is not a canvas".to_string()))?;
        canvas.set_width(options.width);
        canvas.set_height(options.height);

        let context = canvas
            .get_context("2d")
            .map_err(|e| ChartError::Mount(format!("2d context: {:?}", e)))?
            .ok_or_else(|| ChartError::Mount("2d context unavailable".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| ChartError::Mount("failed to cast to 2d context".to_string()))?;

        self.container
            .append_child(&canvas)
            .map_err(|e| ChartError::Mount(format!("append canvas: {:?}", e)))?;

        let surface = CanvasSurface {
            canvas,
            context,
            options: options.clone(),
            series: Vec::new(),
            next_handle: 0,
            removed: false,
        };
        surface.redraw();
        Ok(surface)
    }
}
