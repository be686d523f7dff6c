use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

/// Value Object - bucket width used to fold ticks into candles
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash,
    StrumDisplay, EnumIter, EnumString, AsRefStr, Serialize, Deserialize,
)]
pub enum TimeInterval {
    #[default]
    #[strum(serialize = "1s")]
    #[serde(rename = "1s")]
    OneSecond,

    #[strum(serialize = "1m")]
    #[serde(rename = "1m")]
    OneMinute,

    #[strum(serialize = "5m")]
    #[serde(rename = "5m")]
    FiveMinutes,

    #[strum(serialize = "15m")]
    #[serde(rename = "15m")]
    FifteenMinutes,

    #[strum(serialize = "1h")]
    #[serde(rename = "1h")]
    OneHour,

    #[strum(serialize = "4h")]
    #[serde(rename = "4h")]
    FourHours,

    #[strum(serialize = "1d")]
    #[serde(rename = "1d")]
    OneDay,
}

impl TimeInterval {
    pub fn duration_ms(&self) -> i64 {
        match self {
            Self::OneSecond => 1000,
            Self::OneMinute => 60 * 1000,
            Self::FiveMinutes => 5 * 60 * 1000,
            Self::FifteenMinutes => 15 * 60 * 1000,
            Self::OneHour => 60 * 60 * 1000,
            Self::FourHours => 4 * 60 * 60 * 1000,
            Self::OneDay => 24 * 60 * 60 * 1000,
        }
    }

    /// Bucket index of an epoch-millisecond timestamp (floor division).
    pub fn bucket_key(&self, time_ms: i64) -> i64 {
        time_ms.div_euclid(self.duration_ms())
    }

    /// Bucket start in epoch seconds for a bucket index.
    pub fn bucket_start_secs(&self, key: i64) -> i64 {
        key * (self.duration_ms() / 1000)
    }
}

/// Which tick of a bucket supplies `open` and `close`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq,
    StrumDisplay, EnumString, AsRefStr, Serialize, Deserialize,
)]
pub enum TieBreak {
    /// First and last tick in the order they were supplied.
    #[default]
    #[strum(serialize = "arrival")]
    #[serde(rename = "arrival")]
    ArrivalOrder,
    /// Earliest and latest `time`; equal times keep arrival order.
    #[strum(serialize = "timestamp")]
    #[serde(rename = "timestamp")]
    Timestamp,
}

/// Value Object - one bid or ask level, `[price, size]` on the wire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct DepthLevel {
    pub price: f64,
    pub size: f64,
}

impl DepthLevel {
    pub fn new(price: f64, size: f64) -> Self {
        Self { price, size }
    }
}

impl From<(f64, f64)> for DepthLevel {
    fn from((price, size): (f64, f64)) -> Self {
        Self { price, size }
    }
}

impl From<DepthLevel> for (f64, f64) {
    fn from(level: DepthLevel) -> Self {
        (level.price, level.size)
    }
}

/// Value Object - the current book snapshot; replaces the previous one
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepthSnapshot {
    #[serde(default)]
    pub bids: Vec<DepthLevel>,
    #[serde(default)]
    pub asks: Vec<DepthLevel>,
}

impl DepthSnapshot {
    pub fn new(bids: Vec<DepthLevel>, asks: Vec<DepthLevel>) -> Self {
        Self { bids, asks }
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
