pub mod config;
pub mod mock_feed;
pub mod trade_chart;

pub use config::*;
pub use mock_feed::*;
pub use trade_chart::*;
