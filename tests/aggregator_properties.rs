use quickcheck_macros::quickcheck;
use std::collections::BTreeSet;
use trade_chart_wasm::domain::market_data::{
    Tick, TickAggregator, TieBreak, TimeInterval, aggregate_ticks,
};

fn ticks_from(raw: &[(u32, i32)]) -> Vec<Tick> {
    raw.iter()
        .map(|&(offset, cents)| Tick::new(offset as i64 % 600_000, cents as f64 / 100.0))
        .collect()
}

#[quickcheck]
fn candles_keep_ohlc_invariants(raw: Vec<(u32, i32)>) -> bool {
    aggregate_ticks(&ticks_from(&raw)).iter().all(|c| {
        c.low <= c.open.min(c.close) && c.high >= c.open.max(c.close) && c.low <= c.high
    })
}

#[quickcheck]
fn one_candle_per_distinct_second(raw: Vec<(u32, i32)>) -> bool {
    let ticks = ticks_from(&raw);
    let seconds: BTreeSet<i64> = ticks.iter().map(|t| t.time.div_euclid(1000)).collect();
    let candles = aggregate_ticks(&ticks);

    candles.len() == seconds.len() && candles.iter().map(|c| c.time).eq(seconds.into_iter())
}

#[quickcheck]
fn open_and_close_follow_arrival(raw: Vec<(u32, i32)>) -> bool {
    let ticks = ticks_from(&raw);
    aggregate_ticks(&ticks).iter().all(|candle| {
        let mut in_bucket = ticks.iter().filter(|t| t.time.div_euclid(1000) == candle.time);
        let first = in_bucket.next().map(|t| t.value);
        let last = in_bucket.last().map(|t| t.value).or(first);
        first == Some(candle.open) && last == Some(candle.close)
    })
}

#[quickcheck]
fn output_strictly_ascending(raw: Vec<(u32, i32)>) -> bool {
    let candles = aggregate_ticks(&ticks_from(&raw));
    candles.windows(2).all(|pair| pair[0].time < pair[1].time)
}

#[quickcheck]
fn timestamp_policy_ignores_input_order(raw: Vec<(u32, i32)>) -> bool {
    let mut seen = BTreeSet::new();
    let ticks: Vec<Tick> =
        ticks_from(&raw).into_iter().filter(|t| seen.insert(t.time)).collect();
    let reversed: Vec<Tick> = ticks.iter().rev().copied().collect();
    let aggregator = TickAggregator::new(TimeInterval::FiveMinutes, TieBreak::Timestamp);

    aggregator.aggregate(&ticks) == aggregator.aggregate(&reversed)
}
