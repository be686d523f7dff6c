use leptos::html::Div;
use leptos::*;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;

use crate::{
    application::{ChartConfig, MockTickFeed},
    domain::{
        chart::ThemeName,
        logging::LogComponent,
        market_data::{DepthSnapshot, Tick, TickBuffer},
    },
    infrastructure::browser::{BrowserTradeChart, browser_chart},
    log_error, log_info,
};

/// Candle chart bound to tick and depth signals.
///
/// The chart mounts once the container div exists, follows the signals,
/// and is torn down with the component.
#[component]
pub fn TradeChartView(
    #[prop(into)] ticks: Signal<Vec<Tick>>,
    #[prop(into)] depth: Signal<Option<DepthSnapshot>>,
    #[prop(optional)] config: Option<ChartConfig>,
) -> impl IntoView {
    let container_ref = create_node_ref::<Div>();
    let chart = store_value::<Option<BrowserTradeChart>>(None);
    let config = config.unwrap_or_default();

    create_effect(move |_| {
        let Some(container) = container_ref.get() else { return };
        if chart.with_value(Option::is_some) {
            return;
        }

        let element = container.unchecked_ref::<web_sys::HtmlElement>().clone();
        let mut trade_chart = match browser_chart(element, config.clone()) {
            Ok(trade_chart) => trade_chart,
            Err(err) => {
                log_error!(LogComponent::Presentation("TradeChartView"), "{}", err);
                return;
            }
        };
        if let Err(err) = trade_chart.activate() {
            log_error!(LogComponent::Presentation("TradeChartView"), "{}", err);
            return;
        }

        let current_depth = depth.get_untracked();
        trade_chart.update(&ticks.get_untracked(), current_depth.as_ref());
        chart.set_value(Some(trade_chart));
    });

    create_effect(move |_| {
        let ticks = ticks.get();
        let depth = depth.get();
        chart.update_value(|chart| {
            if let Some(chart) = chart {
                chart.update(&ticks, depth.as_ref());
            }
        });
    });

    on_cleanup(move || {
        chart.try_update_value(|chart| {
            if let Some(mut chart) = chart.take() {
                chart.deactivate();
            }
        });
    });

    view! { <div class="trade-chart" node_ref=container_ref></div> }
}

fn root_element() -> Option<web_sys::Element> {
    web_sys::window()?.document()?.document_element()
}

/// Demo page: mock feed into the chart plus a theme toggle.
#[component]
pub fn App() -> impl IntoView {
    let config = ChartConfig::default();
    let attribute = config.theme_attribute.clone();

    let initial_theme = ThemeName::from_attribute(
        root_element().and_then(|root| root.get_attribute(&attribute)).as_deref(),
    );
    let (theme, set_theme) = create_signal(initial_theme);
    let (ticks, set_ticks) = create_signal(Vec::<Tick>::new());
    let (depth, set_depth) = create_signal(None::<DepthSnapshot>);

    let buffer = Rc::new(RefCell::new(TickBuffer::new(config.tick_capacity)));
    let feed = Rc::new(RefCell::new(
        MockTickFeed::new(js_sys::Math::random, 100.0, js_sys::Date::now() as i64)
            .with_depth_levels(config.depth_levels),
    ));

    let interval = gloo_timers::callback::Interval::new(250, move || {
        let (tick, snapshot) = {
            let mut feed = feed.borrow_mut();
            (feed.next_tick(), feed.depth())
        };
        let mut buffer = buffer.borrow_mut();
        buffer.push(tick);
        set_ticks.set(buffer.to_vec());
        set_depth.set(Some(snapshot));
    });
    on_cleanup(move || drop(interval));

    let toggle_theme = move |_| {
        let next = theme.get_untracked().toggled();
        if let Some(root) = root_element() {
            let _ = root.set_attribute(&attribute, next.as_ref());
        }
        log_info!(LogComponent::Presentation("App"), "theme -> {}", next);
        set_theme.set(next);
    };

    let last_price = move || {
        ticks.with(|ticks| ticks.last().map(|tick| format!("{:.2}", tick.value)).unwrap_or_default())
    };

    view! {
        <style>
            {r#"
            :root[data-theme="dark"], :root:not([data-theme]) {
                --chart-background: #0b0e11;
                --chart-text: #d1d4dc;
                --chart-grid: #1e2329;
                --chart-border: #2b3139;
            }
            :root[data-theme="light"] {
                --chart-background: #ffffff;
                --chart-text: #1e2329;
                --chart-grid: #eaecef;
                --chart-border: #d5d9de;
            }
            .trade-chart-app {
                font-family: -apple-system, BlinkMacSystemFont, sans-serif;
                background: var(--chart-background);
                color: var(--chart-text);
                min-height: 100vh;
                padding: 20px;
            }
            .header {
                display: flex;
                align-items: center;
                justify-content: space-between;
                margin-bottom: 12px;
            }
            .price {
                font-family: 'Courier New', monospace;
                font-size: 20px;
            }
            .theme-btn {
                background: var(--chart-grid);
                color: var(--chart-text);
                border: 1px solid var(--chart-border);
                padding: 5px 10px;
                border-radius: 5px;
                cursor: pointer;
            }
            .trade-chart {
                width: 100%;
            }
            "#}
        </style>
        <div class="trade-chart-app">
            <div class="header">
                <h1>"Trade Chart"</h1>
                <span class="price">{last_price}</span>
                <button class="theme-btn" on:click=toggle_theme>
                    {move || format!("Theme: {}", theme.get())}
                </button>
            </div>
            <TradeChartView ticks=ticks depth=depth config=config />
        </div>
    }
}
