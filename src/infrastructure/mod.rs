pub mod browser;
pub mod headless;
pub mod rendering;
pub mod services;
