use crate::domain::errors::ChartResult;
use crate::domain::market_data::{TickAggregator, TieBreak, TimeInterval};
use serde::{Deserialize, Serialize};

/// Chart settings; every field has a default so hosts pass only overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Fixed surface height in pixels.
    pub height: u32,
    pub interval: TimeInterval,
    pub tie_break: TieBreak,
    /// Ticks a host-side `TickBuffer` keeps.
    pub tick_capacity: usize,
    /// Root element attribute carrying the theme name.
    pub theme_attribute: String,
    /// Levels per side produced by the mock feed.
    pub depth_levels: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            height: 400,
            interval: TimeInterval::OneSecond,
            tie_break: TieBreak::ArrivalOrder,
            tick_capacity: 5_000,
            theme_attribute: "data-theme".to_string(),
            depth_levels: 10,
        }
    }
}

impl ChartConfig {
    pub fn from_json(json: &str) -> ChartResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn aggregator(&self) -> TickAggregator {
        TickAggregator::new(self.interval, self.tie_break)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ChartError;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ChartConfig::from_json(r#"{"height": 320, "interval": "1m"}"#).unwrap();
        assert_eq!(config.height, 320);
        assert_eq!(config.interval, TimeInterval::OneMinute);
        assert_eq!(config.tick_capacity, 5_000);
        assert_eq!(config.theme_attribute, "data-theme");
    }

    #[test]
    fn invalid_json_is_a_config_error() {
        let err = ChartConfig::from_json(r#"{"interval": "7s"}"#).unwrap_err();
        assert!(matches!(err, ChartError::Config(_)));
    }
}
