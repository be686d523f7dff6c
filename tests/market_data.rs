use trade_chart_wasm::application::MockTickFeed;
use trade_chart_wasm::domain::market_data::{
    DepthSnapshot, Tick, TickBuffer, TimeInterval, aggregate_ticks,
};
use wasm_bindgen_test::*;

#[wasm_bindgen_test(unsupported = test)]
fn tick_buffer_evicts_oldest() {
    let mut buffer = TickBuffer::new(3);
    buffer.extend((0..5).map(|i| Tick::new(i * 1000, i as f64)));

    assert_eq!(buffer.len(), 3);
    assert_eq!(buffer.to_vec().first().map(|t| t.time), Some(2000));
    assert_eq!(buffer.latest().map(|t| t.value), Some(4.0));
}

#[wasm_bindgen_test(unsupported = test)]
fn tick_json_uses_time_and_value() {
    let ticks: Vec<Tick> =
        serde_json::from_str(r#"[{"time": 1000, "value": 10.5}, {"time": 1500, "value": 11}]"#)
            .unwrap();

    assert_eq!(ticks, vec![Tick::new(1000, 10.5), Tick::new(1500, 11.0)]);
}

#[wasm_bindgen_test(unsupported = test)]
fn depth_snapshot_sides_default_to_empty() {
    let snapshot = DepthSnapshot::from_json(r#"{"bids": [[99.0, 1.0]]}"#).unwrap();

    assert_eq!(snapshot.bids.len(), 1);
    assert!(snapshot.asks.is_empty());
    assert!(DepthSnapshot::from_json("{}").unwrap().is_empty());
}

#[wasm_bindgen_test(unsupported = test)]
fn interval_durations_grow_monotonically() {
    use strum::IntoEnumIterator;

    let durations: Vec<i64> = TimeInterval::iter().map(|i| i.duration_ms()).collect();
    assert!(durations.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(durations.first(), Some(&1000));
}

#[wasm_bindgen_test(unsupported = test)]
fn mock_feed_produces_one_candle_per_second() {
    let mut seed = 0.3_f64;
    let random = move || {
        seed = (seed * 9301.0 + 0.49297) % 1.0;
        seed
    };
    let mut feed = MockTickFeed::new(random, 100.0, 0);

    let ticks = feed.take_ticks(40);
    let candles = aggregate_ticks(&ticks);

    // 250ms steps from 250 to 10000 cover seconds 0 through 10
    assert_eq!(candles.len(), 11);
    assert!(candles.iter().all(|c| c.is_valid()));
}

#[wasm_bindgen_test(unsupported = test)]
fn mock_depth_sizes_stay_in_range() {
    let mut feed = MockTickFeed::new(|| 0.999, 50.0, 0).with_depth_levels(5);
    let depth = feed.depth();

    assert!(depth.bids.iter().chain(&depth.asks).all(|l| (0.1..=5.0).contains(&l.size)));
    assert!(depth.bids.windows(2).all(|pair| pair[0].price > pair[1].price));
}
