use serde::{Deserialize, Serialize};

/// Portfolio-level state published by the simulation.
/// Decoded from a positional 5-field array: capital, seq, year, month, day.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GlobalState {
    pub capital: f64,
    /// Strictly increasing simulation-day counter, doubles as the
    /// dashboard's day counter.
    pub seq: f64,
    pub year: f64,
    pub month: f64,
    pub day: f64,
}

impl GlobalState {
    pub fn date_string(&self) -> String {
        format!(
            "{:04}-{:02}-{:02}",
            self.year as i64, self.month as i64, self.day as i64
        )
    }
}

/// The six strategies the simulation runs, in snapshot-file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyId {
    PelosiTracker,
    NgSeasonal,
    NqTrend,
    SvxyVol,
    LinReg,
    GoldTrend,
}

impl StrategyId {
    pub const ALL: [StrategyId; 6] = [
        StrategyId::PelosiTracker,
        StrategyId::NgSeasonal,
        StrategyId::NqTrend,
        StrategyId::SvxyVol,
        StrategyId::LinReg,
        StrategyId::GoldTrend,
    ];
}

/// Fields every strategy snapshot carries.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StratCore {
    /// -1 short, 0 flat, 1 long.
    pub pos: f64,
    pub alloc: f64,
    pub pnl: f64,
    pub trades: f64,
    pub eq: f64,
}

/// Strategy-specific extension fields. Variants mirror the per-strategy
/// snapshot shapes; most track one reference price, the NG seasonal
/// strategy also carries a trailing peak and a stopped-out flag.
#[derive(Debug, Clone, Copy, Serialize)]
pub enum StratExtra {
    PelosiTracker { nanc: f64 },
    NgSeasonal { peak_ng: f64, ng: f64, stopped: f64 },
    NqTrend { nq: f64 },
    SvxyVol { svxy: f64 },
    LinReg { nq: f64 },
    GoldTrend { gold: f64 },
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct StrategySnapshot {
    pub id: StrategyId,
    pub core: StratCore,
    pub extra: StratExtra,
}

/// Six equity curves with the same implicit time steps as the portfolio
/// curve, keyed s1..s6 in the snapshot file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StratEquities {
    pub s1: Vec<f64>,
    pub s2: Vec<f64>,
    pub s3: Vec<f64>,
    pub s4: Vec<f64>,
    pub s5: Vec<f64>,
    pub s6: Vec<f64>,
}

impl StratEquities {
    pub fn by_id(&self, id: StrategyId) -> &[f64] {
        match id {
            StrategyId::PelosiTracker => &self.s1,
            StrategyId::NgSeasonal => &self.s2,
            StrategyId::NqTrend => &self.s3,
            StrategyId::SvxyVol => &self.s4,
            StrategyId::LinReg => &self.s5,
            StrategyId::GoldTrend => &self.s6,
        }
    }
}

/// One line of the append-only event log: `seq|date|type|detail|detail|...`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEvent {
    pub seq: i64,
    pub date: String,
    pub event_type: String,
    pub details: Vec<String>,
}

impl LogEvent {
    /// Decode the type-dependent detail fields into a typed view.
    pub fn kind(&self) -> EventKind<'_> {
        EventKind::decode(self)
    }
}

/// Typed view over `LogEvent.details`, keyed by the event type. Unknown
/// types fall back to the raw field list so new producer-side event types
/// never break the consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind<'a> {
    Trade {
        strat: &'a str,
        action: &'a str,
        price: &'a str,
    },
    Price {
        fields: &'a [String],
    },
    Equity {
        value: f64,
    },
    Strat {
        strat: &'a str,
        pos: Option<&'a str>,
        eq: Option<&'a str>,
    },
    Raw {
        event_type: &'a str,
        fields: &'a [String],
    },
}

impl<'a> EventKind<'a> {
    fn decode(event: &'a LogEvent) -> Self {
        let d = &event.details;
        match event.event_type.as_str() {
            "TRADE" if d.len() >= 3 => EventKind::Trade {
                strat: &d[0],
                action: &d[1],
                price: &d[2],
            },
            "PRICE" => EventKind::Price { fields: d },
            "EQUITY" if !d.is_empty() => EventKind::Equity {
                value: d[0].parse().unwrap_or(f64::NAN),
            },
            "STRAT" if !d.is_empty() => EventKind::Strat {
                strat: &d[0],
                pos: d.get(1).and_then(|s| s.strip_prefix("pos=")),
                eq: d.get(2).and_then(|s| s.strip_prefix("eq=")),
            },
            _ => EventKind::Raw {
                event_type: &event.event_type,
                fields: d,
            },
        }
    }
}

/// The full decoded snapshot set. Rebuilt from scratch on every commit
/// change and swapped in as one unit, never mutated field by field.
#[derive(Debug, Clone, Serialize)]
pub struct AppData {
    pub state: GlobalState,
    pub strategies: Vec<StrategySnapshot>,
    pub equity: Vec<f64>,
    pub strat_equities: StratEquities,
    pub events: Vec<LogEvent>,
    /// Best-effort comparison curve; empty when the benchmark file is
    /// missing or unreadable.
    pub benchmark: Vec<f64>,
    pub commit: i64,
}
