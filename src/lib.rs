use wasm_bindgen::prelude::*;

use crate::app::App;
use crate::domain::logging::{LogComponent, get_logger};

pub mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

/// Installs the panic hook, console logger and browser clock.
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();

    let console_logger = Box::new(infrastructure::services::ConsoleLogger::new_development());
    domain::logging::init_logger(console_logger);

    let browser_time_provider = Box::new(infrastructure::services::BrowserTimeProvider::new());
    domain::logging::init_time_provider(browser_time_provider);

    get_logger().info(LogComponent::Presentation("Initialize"), "trade chart ready");
}

/// Mount the demo page with a mock tick feed into `<body>`.
#[wasm_bindgen(js_name = mountDemo)]
pub fn mount_demo() {
    leptos::mount_to_body(|| leptos::view! { <App /> });
}
