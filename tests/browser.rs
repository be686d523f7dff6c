#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;
use trade_chart_wasm::application::ChartConfig;
use trade_chart_wasm::domain::chart::{ResizeSource, ThemeName, ThemeSource, ThemedOption};
use trade_chart_wasm::domain::market_data::Tick;
use trade_chart_wasm::infrastructure::browser::{
    DocumentThemeSource, WindowResizeSource, browser_chart,
};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn window() -> web_sys::Window {
    web_sys::window().unwrap()
}

fn root() -> web_sys::Element {
    window().document().unwrap().document_element().unwrap()
}

fn container() -> web_sys::HtmlElement {
    let document = window().document().unwrap();
    let div = document.create_element("div").unwrap().dyn_into::<web_sys::HtmlElement>().unwrap();
    div.style().set_property("width", "480px").unwrap();
    document.body().unwrap().append_child(&div).unwrap();
    div
}

/// Resolves after queued mutation records have been delivered.
async fn next_task() {
    let promise = js_sys::Promise::new(&mut |resolve, _| {
        window()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, 0)
            .unwrap();
    });
    wasm_bindgen_futures::JsFuture::from(promise).await.unwrap();
}

#[wasm_bindgen_test]
async fn theme_attribute_change_reaches_handler_until_cancelled() {
    root().set_attribute("data-theme", "dark").unwrap();
    let source = DocumentThemeSource::new("data-theme").unwrap();
    let seen = Rc::new(Cell::new(None));

    let sink = seen.clone();
    let subscription = source.on_theme_change(Box::new(move |theme| sink.set(Some(theme))));

    root().set_attribute("data-theme", "light").unwrap();
    next_task().await;
    assert_eq!(seen.get(), Some(ThemeName::Light));
    assert_eq!(source.current_theme(), ThemeName::Light);

    subscription.cancel();
    seen.set(None);
    root().set_attribute("data-theme", "dark").unwrap();
    next_task().await;
    assert_eq!(seen.get(), None);
}

#[wasm_bindgen_test]
fn custom_property_colors_are_read_from_root() {
    let style = root().dyn_into::<web_sys::HtmlElement>().unwrap().style();
    style.set_property("--chart-grid", "#010203").unwrap();
    let source = DocumentThemeSource::new("data-theme").unwrap();

    let grid = source.read_color(ThemedOption::Grid);

    style.remove_property("--chart-grid").unwrap();
    assert_eq!(grid.as_ref().map(|c| c.as_str()), Some("#010203"));
}

#[wasm_bindgen_test]
fn window_resize_reaches_handler_until_cancelled() {
    let source = WindowResizeSource::new().unwrap();
    let calls = Rc::new(Cell::new(0));

    let counter = calls.clone();
    let subscription = source.on_resize(Box::new(move || counter.set(counter.get() + 1)));

    let resize = web_sys::Event::new("resize").unwrap();
    window().dispatch_event(&resize).unwrap();
    assert_eq!(calls.get(), 1);

    subscription.cancel();
    window().dispatch_event(&web_sys::Event::new("resize").unwrap()).unwrap();
    assert_eq!(calls.get(), 1);
}

#[wasm_bindgen_test]
fn canvas_lives_exactly_as_long_as_activation() {
    let div = container();
    let mut chart = browser_chart(div.clone(), ChartConfig::default()).unwrap();
    assert_eq!(div.child_element_count(), 0);

    chart.activate().unwrap();
    assert_eq!(div.child_element_count(), 1);
    let canvas = div.first_element_child().unwrap();
    assert_eq!(canvas.tag_name(), "CANVAS");
    assert_eq!(canvas.get_attribute("width").as_deref(), Some("480"));
    assert_eq!(chart.update(&[Tick::new(1000, 1.0), Tick::new(2000, 2.0)], None), 2);

    chart.deactivate();
    assert_eq!(div.child_element_count(), 0);

    chart.activate().unwrap();
    assert_eq!(div.child_element_count(), 1);
    drop(chart);
    assert_eq!(div.child_element_count(), 0);
    div.remove();
}
