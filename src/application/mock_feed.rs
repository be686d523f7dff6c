use crate::domain::market_data::{DepthLevel, DepthSnapshot, Tick};

/// Demo tick producer: a bounded random walk with a synthetic book around
/// the current price.
///
/// Randomness comes from `random`, a uniform source over `[0, 1)`, so the
/// browser can plug in `Math.random` and tests a fixed sequence.
pub struct MockTickFeed<R: FnMut() -> f64> {
    random: R,
    price: f64,
    time: i64,
    step_ms: i64,
    volatility: f64,
    tick_size: f64,
    depth_levels: usize,
}

impl<R: FnMut() -> f64> MockTickFeed<R> {
    pub fn new(random: R, start_price: f64, start_time: i64) -> Self {
        Self {
            random,
            price: start_price,
            time: start_time,
            step_ms: 250,
            volatility: 0.0005,
            tick_size: 0.01,
            depth_levels: 10,
        }
    }

    pub fn with_step_ms(mut self, step_ms: i64) -> Self {
        self.step_ms = step_ms.max(1);
        self
    }

    pub fn with_volatility(mut self, volatility: f64) -> Self {
        self.volatility = volatility.abs();
        self
    }

    pub fn with_depth_levels(mut self, depth_levels: usize) -> Self {
        self.depth_levels = depth_levels;
        self
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    /// Advance one step and return the new tick.
    pub fn next_tick(&mut self) -> Tick {
        let shock = ((self.random)() - 0.5) * 2.0 * self.volatility;
        let next = self.price * (1.0 + shock);
        self.price = self.round(next.max(self.tick_size));
        self.time += self.step_ms;
        Tick::new(self.time, self.price)
    }

    /// Advance `count` steps.
    pub fn take_ticks(&mut self, count: usize) -> Vec<Tick> {
        (0..count).map(|_| self.next_tick()).collect()
    }

    /// Book of `depth_levels` per side, one tick size apart, around the
    /// current price.
    pub fn depth(&mut self) -> DepthSnapshot {
        let mut bids = Vec::with_capacity(self.depth_levels);
        let mut asks = Vec::with_capacity(self.depth_levels);
        for level in 1..=self.depth_levels {
            let offset = self.tick_size * level as f64;
            let bid_size = self.size();
            let ask_size = self.size();
            bids.push(DepthLevel::new(self.round(self.price - offset), bid_size));
            asks.push(DepthLevel::new(self.round(self.price + offset), ask_size));
        }
        DepthSnapshot::new(bids, asks)
    }

    fn size(&mut self) -> f64 {
        ((0.1 + (self.random)() * 4.9) * 1000.0).round() / 1000.0
    }

    fn round(&self, value: f64) -> f64 {
        (value / self.tick_size).round() * self.tick_size
    }
}
