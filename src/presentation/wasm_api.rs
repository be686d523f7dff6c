use wasm_bindgen::prelude::*;

use crate::application::ChartConfig;
use crate::domain::errors::ChartError;
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{DepthSnapshot, Tick, TickBuffer};
use crate::infrastructure::browser::{BrowserTradeChart, ElementContainer, browser_chart};
use crate::{log_info, log_warn};

fn to_js(err: ChartError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// JS numbers to a tick; `None` when the time is not a finite number.
fn tick_from_js(time: f64, value: f64) -> Option<Tick> {
    time.is_finite().then(|| Tick::new(time.trunc() as i64, value))
}

/// JS-facing chart bound to one container element.
///
/// Keeps the tick history itself, so hosts only push new ticks.
#[wasm_bindgen]
pub struct TradeChartHandle {
    chart: BrowserTradeChart,
    buffer: TickBuffer,
    depth: Option<DepthSnapshot>,
}

#[wasm_bindgen]
impl TradeChartHandle {
    /// `config_json` is an optional `ChartConfig` object serialized as JSON.
    #[wasm_bindgen(constructor)]
    pub fn new(container_id: &str, config_json: Option<String>) -> Result<TradeChartHandle, JsValue> {
        let config = match config_json.as_deref() {
            Some(json) => ChartConfig::from_json(json).map_err(to_js)?,
            None => ChartConfig::default(),
        };
        let container = ElementContainer::by_id(container_id).map_err(to_js)?;
        let buffer = TickBuffer::new(config.tick_capacity);
        let chart = browser_chart(container.element().clone(), config).map_err(to_js)?;

        log_info!(LogComponent::Presentation("TradeChartHandle"), "created in #{}", container_id);
        Ok(Self { chart, buffer, depth: None })
    }

    pub fn mount(&mut self) -> Result<(), JsValue> {
        self.chart.activate().map_err(to_js)
    }

    pub fn unmount(&mut self) {
        self.chart.deactivate();
    }

    #[wasm_bindgen(getter, js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.chart.is_active()
    }

    /// Append one tick and redraw; returns the candle count. Ticks whose
    /// time is NaN or infinite are dropped.
    #[wasm_bindgen(js_name = pushTick)]
    pub fn push_tick(&mut self, time: f64, value: f64) -> usize {
        match tick_from_js(time, value) {
            Some(tick) => self.buffer.push(tick),
            None => {
                log_warn!(LogComponent::Presentation("TradeChartHandle"), "dropped tick at {}", time);
            }
        }
        self.render()
    }

    /// Append a JSON array of `{time, value}` ticks; returns the candle count.
    #[wasm_bindgen(js_name = pushTicks)]
    pub fn push_ticks(&mut self, json: &str) -> Result<usize, JsValue> {
        let ticks: Vec<Tick> =
            serde_json::from_str(json).map_err(|e| to_js(ChartError::from(e)))?;
        self.buffer.extend(ticks);
        Ok(self.render())
    }

    /// Replace the depth snapshot from `{"bids": [[p, s]], "asks": [[p, s]]}`.
    #[wasm_bindgen(js_name = setDepth)]
    pub fn set_depth(&mut self, json: &str) -> Result<(), JsValue> {
        let depth = DepthSnapshot::from_json(json).map_err(|e| to_js(ChartError::from(e)))?;
        self.chart.update(&self.buffer.to_vec(), Some(&depth));
        self.depth = Some(depth);
        Ok(())
    }

    /// Drop the buffered ticks and blank the candle series.
    #[wasm_bindgen(js_name = clearTicks)]
    pub fn clear_ticks(&mut self) {
        self.buffer.clear();
        self.chart.clear_candles();
    }

    /// Re-run aggregation over the buffered ticks; returns the candle count.
    pub fn render(&mut self) -> usize {
        self.chart.update(&self.buffer.to_vec(), None)
    }

    #[wasm_bindgen(getter, js_name = tickCount)]
    pub fn tick_count(&self) -> usize {
        self.buffer.len()
    }

    #[wasm_bindgen(getter, js_name = hasDepth)]
    pub fn has_depth(&self) -> bool {
        self.depth.as_ref().is_some_and(|depth| !depth.is_empty())
    }
}
