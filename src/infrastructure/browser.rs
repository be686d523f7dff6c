//! Browser-backed implementations of the chart ports.

use crate::application::{ChartConfig, ChartEnvironment, TradeChart};
use crate::domain::chart::{
    ContainerEnvironment, CssColor, ResizeSource, Subscription, ThemeName, ThemeSource,
    ThemedOption,
};
use crate::domain::errors::{ChartError, ChartResult};
use crate::domain::logging::LogComponent;
use crate::infrastructure::rendering::CanvasSurfaceFactory;
use crate::infrastructure::services::BrowserTimeProvider;
use crate::{log_debug, log_warn};
use gloo::events::EventListener;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement, MutationObserver, MutationObserverInit, Window};

pub type BrowserTradeChart = TradeChart<CanvasSurfaceFactory>;

fn window() -> ChartResult<Window> {
    web_sys::window().ok_or_else(|| ChartError::Mount("window not available".to_string()))
}

/// Element whose client width sizes the chart.
pub struct ElementContainer {
    element: HtmlElement,
}

impl ElementContainer {
    pub fn new(element: HtmlElement) -> Self {
        Self { element }
    }

    pub fn by_id(id: &str) -> ChartResult<Self> {
        let element = window()?
            .document()
            .ok_or_else(|| ChartError::Mount("document not available".to_string()))?
            .get_element_by_id(id)
            .ok_or_else(|| ChartError::Mount(format!("element #{} not found", id)))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| ChartError::Mount(format!("#{} is not an HTML element", id)))?;
        Ok(Self::new(element))
    }

    pub fn element(&self) -> &HtmlElement {
        &self.element
    }
}

impl ContainerEnvironment for ElementContainer {
    fn width(&self) -> u32 {
        self.element.client_width().max(0) as u32
    }
}

/// `resize` events on the window.
pub struct WindowResizeSource {
    window: Window,
}

impl WindowResizeSource {
    pub fn new() -> ChartResult<Self> {
        Ok(Self { window: window()? })
    }
}

impl ResizeSource for WindowResizeSource {
    fn on_resize(&self, mut handler: Box<dyn FnMut()>) -> Subscription {
        let listener = EventListener::new(&self.window, "resize", move |_| handler());
        Subscription::new(move || drop(listener))
    }
}

/// Theme attribute on `<html>`, colors from computed CSS custom properties.
pub struct DocumentThemeSource {
    window: Window,
    root: Element,
    attribute: String,
}

impl DocumentThemeSource {
    pub fn new(attribute: &str) -> ChartResult<Self> {
        let window = window()?;
        let root = window
            .document()
            .and_then(|document| document.document_element())
            .ok_or_else(|| ChartError::Mount("document element not available".to_string()))?;
        Ok(Self { window, root, attribute: attribute.to_string() })
    }

    fn theme_of(root: &Element, attribute: &str) -> ThemeName {
        ThemeName::from_attribute(root.get_attribute(attribute).as_deref())
    }
}

impl ThemeSource for DocumentThemeSource {
    fn current_theme(&self) -> ThemeName {
        Self::theme_of(&self.root, &self.attribute)
    }

    fn read_color(&self, option: ThemedOption) -> Option<CssColor> {
        let Some(style) = self.window.get_computed_style(&self.root).ok().flatten() else {
            log_debug!(
                LogComponent::Infrastructure("Theme"),
                "{}",
                ChartError::StyleSourceUnavailable(option.css_variable().to_string())
            );
            return None;
        };
        let raw = style.get_property_value(option.css_variable()).ok()?;
        CssColor::parse(&raw)
    }

    fn on_theme_change(&self, mut handler: Box<dyn FnMut(ThemeName)>) -> Subscription {
        let root = self.root.clone();
        let attribute = self.attribute.clone();
        let callback = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
            move |_records: js_sys::Array, _observer: MutationObserver| {
                handler(Self::theme_of(&root, &attribute));
            },
        );

        let observer = match MutationObserver::new(callback.as_ref().unchecked_ref()) {
            Ok(observer) => observer,
            Err(err) => {
                log_warn!(LogComponent::Infrastructure("Theme"), "observer: {:?}", err);
                return Subscription::empty();
            }
        };

        let init = MutationObserverInit::new();
        init.set_attributes(true);
        init.set_attribute_filter(&js_sys::Array::of1(&JsValue::from_str(&self.attribute)));
        if let Err(err) = observer.observe_with_options(&self.root, &init) {
            log_warn!(LogComponent::Infrastructure("Theme"), "observe: {:?}", err);
            return Subscription::empty();
        }

        Subscription::new(move || {
            observer.disconnect();
            drop(callback);
        })
    }
}

/// Chart wired to the page: canvas in `container`, window resize, document
/// theme and the browser clock.
pub fn browser_chart(container: HtmlElement, config: ChartConfig) -> ChartResult<BrowserTradeChart> {
    let env = ChartEnvironment {
        container: Rc::new(ElementContainer::new(container.clone())),
        resize: Rc::new(WindowResizeSource::new()?),
        theme: Rc::new(DocumentThemeSource::new(&config.theme_attribute)?),
        clock: Rc::new(BrowserTimeProvider::new()),
    };
    Ok(TradeChart::new(config, CanvasSurfaceFactory::new(container), env))
}
