use trade_chart_wasm::domain::market_data::{
    Candle, Tick, TickAggregator, TieBreak, TimeInterval, aggregate_ticks,
};
use wasm_bindgen_test::*;

#[wasm_bindgen_test(unsupported = test)]
fn single_second_folds_into_one_candle() {
    let ticks = vec![
        Tick::new(1000, 10.0),
        Tick::new(1400, 12.0),
        Tick::new(1900, 8.0),
    ];

    assert_eq!(aggregate_ticks(&ticks), vec![Candle::new(1, 10.0, 12.0, 8.0, 8.0)]);
}

#[wasm_bindgen_test(unsupported = test)]
fn one_tick_per_second_gives_flat_candles() {
    let ticks = vec![Tick::new(1000, 10.0), Tick::new(2000, 20.0)];

    assert_eq!(aggregate_ticks(&ticks), vec![Candle::flat(1, 10.0), Candle::flat(2, 20.0)]);
}

#[wasm_bindgen_test(unsupported = test)]
fn consecutive_seconds_become_separate_candles() {
    let ticks = vec![
        Tick::new(1000, 10.0),
        Tick::new(1999, 11.0),
        Tick::new(2000, 5.0),
    ];

    assert_eq!(
        aggregate_ticks(&ticks),
        vec![Candle::new(1, 10.0, 11.0, 10.0, 11.0), Candle::new(2, 5.0, 5.0, 5.0, 5.0)]
    );
}

#[wasm_bindgen_test(unsupported = test)]
fn empty_input_yields_no_candles() {
    assert!(aggregate_ticks(&[]).is_empty());
}

#[wasm_bindgen_test(unsupported = test)]
fn output_is_sorted_even_when_input_is_not() {
    let ticks = vec![Tick::new(5000, 3.0), Tick::new(1000, 1.0), Tick::new(3000, 2.0)];

    let times: Vec<i64> = aggregate_ticks(&ticks).iter().map(|c| c.time).collect();
    assert_eq!(times, vec![1, 3, 5]);
}

#[wasm_bindgen_test(unsupported = test)]
fn arrival_order_decides_open_and_close() {
    let ticks = vec![Tick::new(1900, 20.0), Tick::new(1100, 10.0)];

    assert_eq!(aggregate_ticks(&ticks), vec![Candle::new(1, 20.0, 20.0, 10.0, 10.0)]);
}

#[wasm_bindgen_test(unsupported = test)]
fn timestamp_policy_decides_open_and_close_by_time() {
    let aggregator = TickAggregator::new(TimeInterval::OneSecond, TieBreak::Timestamp);
    let ticks = vec![Tick::new(1900, 20.0), Tick::new(1100, 10.0)];

    assert_eq!(aggregator.aggregate(&ticks), vec![Candle::new(1, 10.0, 20.0, 10.0, 20.0)]);
}

#[wasm_bindgen_test(unsupported = test)]
fn minute_buckets_start_on_the_minute() {
    let aggregator = TickAggregator::new(TimeInterval::OneMinute, TieBreak::ArrivalOrder);
    let ticks = vec![
        Tick::new(60_000, 100.0),
        Tick::new(90_000, 104.0),
        Tick::new(119_999, 99.0),
        Tick::new(120_000, 101.0),
    ];

    let candles = aggregator.aggregate(&ticks);

    assert_eq!(candles.len(), 2);
    assert_eq!(candles[0], Candle::new(60, 100.0, 104.0, 99.0, 99.0));
    assert_eq!(candles[1].time, 120);
}

#[wasm_bindgen_test(unsupported = test)]
fn negative_times_floor_into_earlier_bucket() {
    let candles = aggregate_ticks(&[Tick::new(-500, 1.0), Tick::new(500, 2.0)]);

    let times: Vec<i64> = candles.iter().map(|c| c.time).collect();
    assert_eq!(times, vec![-1, 0]);
}

#[wasm_bindgen_test(unsupported = test)]
fn non_finite_values_are_skipped() {
    let ticks = vec![
        Tick::new(1000, f64::INFINITY),
        Tick::new(1100, 7.0),
        Tick::new(2000, f64::NAN),
    ];

    assert_eq!(aggregate_ticks(&ticks), vec![Candle::new(1, 7.0, 7.0, 7.0, 7.0)]);
}

#[wasm_bindgen_test(unsupported = test)]
fn every_call_starts_from_scratch() {
    let aggregator = TickAggregator::default();
    let first = aggregator.aggregate(&[Tick::new(1000, 1.0)]);
    let second = aggregator.aggregate(&[Tick::new(1000, 2.0)]);

    assert_eq!(first, vec![Candle::flat(1, 1.0)]);
    assert_eq!(second, vec![Candle::flat(1, 2.0)]);
}
