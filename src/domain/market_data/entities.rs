use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Domain entity - one observed price sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Epoch milliseconds.
    pub time: i64,
    pub value: f64,
}

impl Tick {
    pub fn new(time: i64, value: f64) -> Self {
        Self { time, value }
    }
}

/// Domain entity - OHLC bar for one bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Bucket start, epoch seconds.
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self { time, open, high, low, close }
    }

    /// Zero-range candle seeded by a single value.
    pub fn flat(time: i64, value: f64) -> Self {
        Self::new(time, value, value, value, value)
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// `low <= open, close <= high`.
    pub fn is_valid(&self) -> bool {
        self.low <= self.high
            && self.low <= self.open
            && self.open <= self.high
            && self.low <= self.close
            && self.close <= self.high
    }
}

/// Bounded tick history a producer keeps between chart updates.
///
/// The aggregator is stateless, so continuity across updates depends on the
/// caller re-supplying everything it wants drawn.
#[derive(Debug, Clone)]
pub struct TickBuffer {
    ticks: VecDeque<Tick>,
    max_size: usize,
}

impl TickBuffer {
    pub fn new(max_size: usize) -> Self {
        Self { ticks: VecDeque::new(), max_size: max_size.max(1) }
    }

    pub fn push(&mut self, tick: Tick) {
        self.ticks.push_back(tick);
        while self.ticks.len() > self.max_size {
            self.ticks.pop_front();
        }
    }

    pub fn extend<I: IntoIterator<Item = Tick>>(&mut self, ticks: I) {
        for tick in ticks {
            self.push(tick);
        }
    }

    pub fn clear(&mut self) {
        self.ticks.clear();
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_size
    }

    pub fn latest(&self) -> Option<&Tick> {
        self.ticks.back()
    }

    /// Contiguous copy in arrival order, ready for aggregation.
    pub fn to_vec(&self) -> Vec<Tick> {
        self.ticks.iter().copied().collect()
    }
}
