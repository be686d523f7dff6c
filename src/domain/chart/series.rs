use super::ports::ChartSurface;
use super::value_objects::{SeriesData, SeriesHandle, SeriesKind, SeriesPoint};
use crate::domain::errors::ChartResult;
use crate::domain::logging::LogComponent;
use crate::domain::market_data::Candle;
use crate::log_debug;
use derive_more::Display;

/// One step of the series-creation fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SeriesStrategy {
    #[display(fmt = "native")]
    Native,
    #[display(fmt = "generic")]
    Generic,
    #[display(fmt = "line-substitute")]
    LineSubstitute,
}

impl SeriesStrategy {
    /// Fallible strategies in the order they are tried.
    pub const PROBES: [SeriesStrategy; 2] = [SeriesStrategy::Native, SeriesStrategy::Generic];

    fn attempt<S: ChartSurface + ?Sized>(
        &self,
        surface: &mut S,
        kind: SeriesKind,
    ) -> ChartResult<SeriesHandle> {
        match self {
            SeriesStrategy::Native => surface.add_native_series(kind),
            SeriesStrategy::Generic => surface.add_series(kind),
            SeriesStrategy::LineSubstitute => Ok(surface.add_line_series()),
        }
    }
}

/// A series on a surface together with the kind it actually ended up as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundSeries {
    pub handle: SeriesHandle,
    pub requested: SeriesKind,
    pub kind: SeriesKind,
    pub strategy: SeriesStrategy,
}

impl BoundSeries {
    /// Create a `requested` series, degrading to a line series when the
    /// surface lacks the capability. Never fails.
    pub fn create<S: ChartSurface + ?Sized>(surface: &mut S, requested: SeriesKind) -> Self {
        if requested != SeriesKind::Line {
            for strategy in SeriesStrategy::PROBES {
                match strategy.attempt(surface, requested) {
                    Ok(handle) => {
                        return Self { handle, requested, kind: requested, strategy };
                    }
                    Err(err) => {
                        log_debug!(LogComponent::Domain("Series"), "{}", err);
                    }
                }
            }
        }

        Self {
            handle: surface.add_line_series(),
            requested,
            kind: SeriesKind::Line,
            strategy: SeriesStrategy::LineSubstitute,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.kind != self.requested
    }

    /// Candle dataset shaped for this series: line series get close prices.
    pub fn candle_data(&self, candles: Vec<Candle>) -> SeriesData {
        match self.kind {
            SeriesKind::Candlestick => SeriesData::Candles(candles),
            SeriesKind::Area | SeriesKind::Line => SeriesData::Points(
                candles.iter().map(|c| SeriesPoint::new(c.time, c.close)).collect(),
            ),
        }
    }
}
