//! Decoders for the raw snapshot payloads the simulation publishes.
//!
//! Strategy and state records arrive as positional JSON arrays; the
//! index→field mapping is a versioned contract with the producer, so it
//! lives in one offset table per variant here rather than at call sites.
//! Malformed numeric fields decode to NaN, never to an error — a bad field
//! must not take down the record around it.

use serde_json::Value;

use super::types::{
    GlobalState, LogEvent, StratCore, StratEquities, StratExtra, StrategyId, StrategySnapshot,
};

/// Positions of the shared core fields within one strategy's array.
struct CoreOffsets {
    pos: usize,
    alloc: usize,
    pnl: usize,
    trades: usize,
    eq: usize,
}

/// Five of the six strategies share this layout; the extension field sits
/// at index 3.
const STANDARD_CORE: CoreOffsets = CoreOffsets {
    pos: 0,
    alloc: 1,
    pnl: 2,
    trades: 4,
    eq: 5,
};

/// NG seasonal carries a trailing peak at index 1 and a stopped flag at
/// index 7, which shifts the rest of the record.
const NG_SEASONAL_CORE: CoreOffsets = CoreOffsets {
    pos: 0,
    alloc: 2,
    pnl: 3,
    trades: 5,
    eq: 6,
};

fn field(arr: &[Value], idx: usize) -> f64 {
    arr.get(idx).and_then(Value::as_f64).unwrap_or(f64::NAN)
}

/// Decode the global state record: capital, seq, year, month, day.
pub fn parse_state(arr: &[Value]) -> GlobalState {
    GlobalState {
        capital: field(arr, 0),
        seq: field(arr, 1),
        year: field(arr, 2),
        month: field(arr, 3),
        day: field(arr, 4),
    }
}

/// Decode one strategy's positional record through its variant's offset
/// table.
pub fn parse_strategy(id: StrategyId, arr: &[Value]) -> StrategySnapshot {
    let offsets = match id {
        StrategyId::NgSeasonal => &NG_SEASONAL_CORE,
        _ => &STANDARD_CORE,
    };

    let core = StratCore {
        pos: field(arr, offsets.pos),
        alloc: field(arr, offsets.alloc),
        pnl: field(arr, offsets.pnl),
        trades: field(arr, offsets.trades),
        eq: field(arr, offsets.eq),
    };

    let extra = match id {
        StrategyId::PelosiTracker => StratExtra::PelosiTracker { nanc: field(arr, 3) },
        StrategyId::NgSeasonal => StratExtra::NgSeasonal {
            peak_ng: field(arr, 1),
            ng: field(arr, 4),
            stopped: field(arr, 7),
        },
        StrategyId::NqTrend => StratExtra::NqTrend { nq: field(arr, 3) },
        StrategyId::SvxyVol => StratExtra::SvxyVol { svxy: field(arr, 3) },
        StrategyId::LinReg => StratExtra::LinReg { nq: field(arr, 3) },
        StrategyId::GoldTrend => StratExtra::GoldTrend { gold: field(arr, 3) },
    };

    StrategySnapshot { id, core, extra }
}

/// Decode a flat numeric series (portfolio equity, benchmark).
pub fn parse_series(arr: &[Value]) -> Vec<f64> {
    arr.iter()
        .map(|v| v.as_f64().unwrap_or(f64::NAN))
        .collect()
}

/// Decode the per-strategy equity bundle: an object keyed s1..s6, each
/// value a flat numeric array. Missing keys decode to empty curves.
pub fn parse_strat_equities(value: &Value) -> StratEquities {
    let series = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_array)
            .map(|arr| parse_series(arr))
            .unwrap_or_default()
    };
    StratEquities {
        s1: series("s1"),
        s2: series("s2"),
        s3: series("s3"),
        s4: series("s4"),
        s5: series("s5"),
        s6: series("s6"),
    }
}

/// Decode the append-only, pipe-delimited event log.
///
/// The first three fields of every line are fixed as seq, date and type;
/// everything after is the type-dependent `details` sequence, kept verbatim
/// regardless of count. Blank lines are skipped.
pub fn parse_events(text: &str) -> Vec<LogEvent> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut parts = line.split('|');
            let seq = parts
                .next()
                .and_then(|s| s.trim().parse::<i64>().ok())
                .unwrap_or(0);
            let date = parts.next().unwrap_or("").to_string();
            let event_type = parts.next().unwrap_or("").to_string();
            let details = parts.map(|s| s.to_string()).collect();
            LogEvent {
                seq,
                date,
                event_type,
                details,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values(raw: Value) -> Vec<Value> {
        raw.as_array().cloned().expect("test payload is an array")
    }

    #[test]
    fn state_decodes_in_fixed_field_order() {
        let state = parse_state(&values(json!([201543.22, 812, 2024, 3, 1])));
        assert_eq!(state.capital, 201543.22);
        assert_eq!(state.seq, 812.0);
        assert_eq!(state.date_string(), "2024-03-01");
    }

    #[test]
    fn standard_strategy_record_decodes_through_offset_table() {
        let arr = values(json!([1, 0.25, 1520.5, 182.4, 14, 35200.0]));
        let snap = parse_strategy(StrategyId::SvxyVol, &arr);
        assert_eq!(snap.core.pos, 1.0);
        assert_eq!(snap.core.alloc, 0.25);
        assert_eq!(snap.core.pnl, 1520.5);
        assert_eq!(snap.core.trades, 14.0);
        assert_eq!(snap.core.eq, 35200.0);
        match snap.extra {
            StratExtra::SvxyVol { svxy } => assert_eq!(svxy, 182.4),
            other => panic!("unexpected extra: {:?}", other),
        }
    }

    #[test]
    fn ng_seasonal_uses_its_shifted_layout() {
        let arr = values(json!([-1, 4.12, 0.15, -230.0, 3.48, 9, 29770.0, 1]));
        let snap = parse_strategy(StrategyId::NgSeasonal, &arr);
        assert_eq!(snap.core.pos, -1.0);
        assert_eq!(snap.core.alloc, 0.15);
        assert_eq!(snap.core.pnl, -230.0);
        assert_eq!(snap.core.trades, 9.0);
        assert_eq!(snap.core.eq, 29770.0);
        match snap.extra {
            StratExtra::NgSeasonal { peak_ng, ng, stopped } => {
                assert_eq!(peak_ng, 4.12);
                assert_eq!(ng, 3.48);
                assert_eq!(stopped, 1.0);
            }
            other => panic!("unexpected extra: {:?}", other),
        }
    }

    #[test]
    fn malformed_numeric_field_becomes_nan_not_an_error() {
        let arr = values(json!([1, "bogus", 2.0, 3.0, 4, 5.0]));
        let snap = parse_strategy(StrategyId::GoldTrend, &arr);
        assert!(snap.core.alloc.is_nan());
        assert_eq!(snap.core.pnl, 2.0);
    }

    #[test]
    fn short_record_pads_with_nan() {
        let snap = parse_strategy(StrategyId::NqTrend, &values(json!([0, 0.1])));
        assert!(snap.core.eq.is_nan());
        assert!(snap.core.trades.is_nan());
    }

    #[test]
    fn series_tolerates_mixed_entries() {
        let series = parse_series(&values(json!([200000.0, null, 201100.5])));
        assert_eq!(series.len(), 3);
        assert!(series[1].is_nan());
        assert_eq!(series[2], 201100.5);
    }

    #[test]
    fn event_line_splits_into_fixed_head_and_details() {
        let events = parse_events("7|2024-03-01|TRADE|1|ENTRY|123.45\n");
        assert_eq!(events.len(), 1);
        let ev = &events[0];
        assert_eq!(ev.seq, 7);
        assert_eq!(ev.date, "2024-03-01");
        assert_eq!(ev.event_type, "TRADE");
        assert_eq!(ev.details, vec!["1", "ENTRY", "123.45"]);
    }

    #[test]
    fn blank_lines_are_skipped_and_details_arity_is_open() {
        let text = "1|2024-01-02|EQUITY|200000\n\n2|2024-01-03|PRICE|nq=17890|gold=2034.5|ng=2.71\n";
        let events = parse_events(text);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].details.len(), 1);
        assert_eq!(events[1].details.len(), 3);
    }

    #[test]
    fn strat_equity_bundle_decodes_per_key() {
        let bundle = parse_strat_equities(&json!({
            "s1": [1.0, 2.0],
            "s2": [3.0],
            "s3": [],
            "s4": [4.0],
            "s5": [5.0],
            "s6": [6.0, "bad"]
        }));
        assert_eq!(bundle.s1, vec![1.0, 2.0]);
        assert!(bundle.s3.is_empty());
        assert!(bundle.s6[1].is_nan());
    }

    #[test]
    fn missing_strat_equity_keys_decode_to_empty_curves() {
        let bundle = parse_strat_equities(&json!({ "s1": [1.0] }));
        assert_eq!(bundle.s1.len(), 1);
        assert!(bundle.s2.is_empty());
        assert!(bundle.s6.is_empty());
    }

    #[test]
    fn unparseable_seq_defaults_to_zero() {
        let events = parse_events("x|2024-01-02|EQUITY|1");
        assert_eq!(events[0].seq, 0);
    }
}
