use crate::domain::logging::LogComponent;
use crate::domain::market_data::{Candle, Tick, TieBreak, TimeInterval};
use crate::{log_trace, log_warn};
use std::collections::BTreeMap;

/// Candle under construction plus the tick times that set its open/close.
#[derive(Debug, Clone, Copy)]
struct Bucket {
    candle: Candle,
    open_time: i64,
    close_time: i64,
}

impl Bucket {
    fn seed(time_secs: i64, tick: &Tick) -> Self {
        Self {
            candle: Candle::flat(time_secs, tick.value),
            open_time: tick.time,
            close_time: tick.time,
        }
    }

    fn absorb(&mut self, tick: &Tick, tie_break: TieBreak) {
        let candle = &mut self.candle;
        candle.high = candle.high.max(tick.value);
        candle.low = candle.low.min(tick.value);

        match tie_break {
            TieBreak::ArrivalOrder => candle.close = tick.value,
            TieBreak::Timestamp => {
                if tick.time < self.open_time {
                    candle.open = tick.value;
                    self.open_time = tick.time;
                }
                if tick.time >= self.close_time {
                    candle.close = tick.value;
                    self.close_time = tick.time;
                }
            }
        }
    }
}

/// Folds a tick slice into one candle per distinct bucket.
///
/// Every call recomputes from scratch; nothing is carried between calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickAggregator {
    interval: TimeInterval,
    tie_break: TieBreak,
}

impl TickAggregator {
    pub fn new(interval: TimeInterval, tie_break: TieBreak) -> Self {
        Self { interval, tie_break }
    }

    pub fn interval(&self) -> TimeInterval {
        self.interval
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Candles sorted ascending by bucket start, whatever the input order.
    pub fn aggregate(&self, ticks: &[Tick]) -> Vec<Candle> {
        let mut buckets: BTreeMap<i64, Bucket> = BTreeMap::new();
        let mut skipped = 0usize;

        for tick in ticks {
            if !tick.value.is_finite() {
                skipped += 1;
                continue;
            }

            let key = self.interval.bucket_key(tick.time);
            buckets
                .entry(key)
                .and_modify(|bucket| bucket.absorb(tick, self.tie_break))
                .or_insert_with(|| Bucket::seed(self.interval.bucket_start_secs(key), tick));
        }

        if skipped > 0 {
            log_warn!(
                LogComponent::Domain("Aggregator"),
                "skipped {} ticks with non-finite values",
                skipped
            );
        }

        log_trace!(
            LogComponent::Domain("Aggregator"),
            "{} ticks -> {} candles ({})",
            ticks.len(),
            buckets.len(),
            self.interval
        );

        buckets.into_values().map(|bucket| bucket.candle).collect()
    }
}

/// Shorthand for the default one-second, arrival-order aggregation.
pub fn aggregate_ticks(ticks: &[Tick]) -> Vec<Candle> {
    TickAggregator::default().aggregate(ticks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_ticks_do_not_poison_a_bucket() {
        let candles = aggregate_ticks(&[
            Tick::new(1000, 10.0),
            Tick::new(1100, f64::NAN),
            Tick::new(1200, 11.0),
        ]);
        assert_eq!(candles, vec![Candle::new(1, 10.0, 11.0, 10.0, 11.0)]);
    }

    #[test]
    fn timestamp_tie_break_keeps_arrival_order_for_equal_times() {
        let aggregator = TickAggregator::new(TimeInterval::OneSecond, TieBreak::Timestamp);
        let candles = aggregator.aggregate(&[
            Tick::new(1500, 10.0),
            Tick::new(1500, 12.0),
            Tick::new(1000, 9.0),
        ]);
        assert_eq!(candles, vec![Candle::new(1, 9.0, 12.0, 9.0, 12.0)]);
    }
}
