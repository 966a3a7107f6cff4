//! Raw frame → canonical bar series.
//!
//! Sources disagree on column naming (`Close`, `close`, `Close_GC=F`,
//! `GC=F_Close`, ...). Columns are resolved by case-insensitive label lookup,
//! first by exact match, then by suffix, then by substring.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use common::{Bar, BarSeries, Cell, Error, RawColumn, RawFrame, Result};

/// Find the column for `key`: exact, then suffix, then substring match,
/// all case-insensitive. Within a strategy the first column in frame order wins.
pub fn pick<'a>(frame: &'a RawFrame, key: &str) -> Option<&'a RawColumn> {
    let key = key.to_lowercase();
    let lowered: Vec<(String, &RawColumn)> = frame
        .columns()
        .iter()
        .map(|c| (c.label.to_lowercase(), c))
        .collect();

    let find = |matches: &dyn Fn(&str) -> bool| {
        lowered
            .iter()
            .find(|(label, _)| matches(label))
            .map(|(_, col)| *col)
    };

    find(&|l: &str| l == key)
        .or_else(|| find(&|l: &str| l.ends_with(&key)))
        .or_else(|| find(&|l: &str| l.contains(&key)))
}

/// The column holding bar times: a datetime-like label first, then a
/// date-like label, then whatever column comes first.
pub fn time_column(frame: &RawFrame) -> Option<&RawColumn> {
    let columns = frame.columns();
    columns
        .iter()
        .find(|c| {
            let l = c.label.to_lowercase();
            l == "datetime" || l == "timestamp" || l == "time"
        })
        .or_else(|| columns.iter().find(|c| c.label.to_lowercase().contains("date")))
        .or_else(|| columns.first())
}

/// Interpret a cell as a UTC instant.
///
/// Numbers are epoch seconds, or epoch milliseconds above 10^11. Text may be
/// RFC 3339, `Y-m-d H:M:S` with an offset, naive `Y-m-d H:M[:S]` (taken as
/// UTC) or a bare `Y-m-d` (UTC midnight).
pub fn parse_time(cell: &Cell) -> Option<DateTime<Utc>> {
    match cell {
        Cell::Number(v) => from_epoch(*v),
        Cell::Text(s) => parse_time_text(s.trim()),
        Cell::Missing => None,
    }
}

fn from_epoch(v: f64) -> Option<DateTime<Utc>> {
    if !v.is_finite() {
        return None;
    }
    if v.abs() > 1e11 {
        DateTime::from_timestamp_millis(v as i64)
    } else {
        DateTime::from_timestamp(v as i64, 0)
    }
}

fn parse_time_text(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|n| n.and_utc());
    }
    s.parse::<f64>().ok().and_then(from_epoch)
}

fn cell_at(col: &RawColumn, row: usize) -> &Cell {
    col.cells.get(row).unwrap_or(&Cell::Missing)
}

/// Normalize `frame` into a series tagged with `symbol`.
///
/// Fails with `MissingColumn` when open/high/low/close cannot be resolved,
/// so the caller can try another fetch method. A missing volume column is
/// zero-filled. Rows with an unparseable time or non-numeric value are
/// dropped; a frame with no surviving rows is `EmptyData`.
pub fn normalize(symbol: &str, frame: &RawFrame) -> Result<BarSeries> {
    let resolve = |key: &str| pick(frame, key).ok_or_else(|| Error::MissingColumn(key.to_string()));
    let open = resolve("open")?;
    let high = resolve("high")?;
    let low = resolve("low")?;
    let close = resolve("close")?;
    let volume = pick(frame, "volume");
    let time = time_column(frame).ok_or_else(|| Error::MissingColumn("time".to_string()))?;

    let bars: Vec<Bar> = (0..frame.row_count())
        .filter_map(|i| {
            Some(Bar {
                time: parse_time(cell_at(time, i))?,
                open: cell_at(open, i).as_f64()?,
                high: cell_at(high, i).as_f64()?,
                low: cell_at(low, i).as_f64()?,
                close: cell_at(close, i).as_f64()?,
                volume: match volume {
                    Some(col) => cell_at(col, i).as_f64()?,
                    None => 0.0,
                },
            })
        })
        .collect();

    if bars.is_empty() {
        return Err(Error::EmptyData("no usable rows".to_string()));
    }
    Ok(BarSeries::new(symbol, bars))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn num(values: &[f64]) -> Vec<Cell> {
        values.iter().map(|v| Cell::Number(*v)).collect()
    }

    fn text(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|v| Cell::Text(v.to_string())).collect()
    }

    fn frame_with(labels: [&str; 5]) -> RawFrame {
        let mut f = RawFrame::new();
        f.push_column("Datetime", num(&[1_714_521_600.0, 1_714_521_900.0]));
        f.push_column(labels[0], num(&[1.0, 11.0]));
        f.push_column(labels[1], num(&[2.0, 12.0]));
        f.push_column(labels[2], num(&[0.5, 10.5]));
        f.push_column(labels[3], num(&[1.5, 11.5]));
        f.push_column(labels[4], num(&[100.0, 200.0]));
        f
    }

    #[test]
    fn label_variants_resolve_to_same_fields() {
        let variants = [
            ["Open", "High", "Low", "Close", "Volume"],
            ["open", "HIGH", "low", "CLOSE", "volume"],
            ["GC=F_Open", "GC=F_High", "GC=F_Low", "GC=F_Close", "GC=F_Volume"],
            ["Open_GC=F", "High_GC=F", "Low_GC=F", "Close_GC=F", "Volume_GC=F"],
        ];
        let expected = normalize("GC=F", &frame_with(variants[0])).unwrap();
        for labels in variants {
            let series = normalize("GC=F", &frame_with(labels)).unwrap();
            assert_eq!(series, expected, "labels {labels:?}");
        }
        assert_eq!(expected.bars[1].close, 11.5);
        assert_eq!(expected.bars[1].volume, 200.0);
    }

    #[test]
    fn exact_match_beats_substring() {
        let mut f = RawFrame::new();
        f.push_column("Adj Close", num(&[9.0]));
        f.push_column("Close", num(&[1.0]));
        assert_eq!(pick(&f, "close").unwrap().label, "Close");
    }

    #[test]
    fn suffix_match_beats_substring() {
        let mut f = RawFrame::new();
        f.push_column("close_adjusted", num(&[9.0]));
        f.push_column("gc_close", num(&[1.0]));
        assert_eq!(pick(&f, "Close").unwrap().label, "gc_close");
    }

    #[test]
    fn missing_ohlc_is_missing_column() {
        let mut f = RawFrame::new();
        f.push_column("Datetime", num(&[0.0]));
        f.push_column("Open", num(&[1.0]));
        f.push_column("High", num(&[1.0]));
        f.push_column("Last", num(&[1.0]));
        let err = normalize("GC=F", &f).unwrap_err();
        assert!(matches!(err, Error::MissingColumn(ref c) if c == "low"));
    }

    #[test]
    fn missing_volume_is_zero_filled() {
        let full = frame_with(["Open", "High", "Low", "Close", "Volume"]);
        let mut f = RawFrame::new();
        for c in full.columns().iter().filter(|c| c.label != "Volume") {
            f.push_column(c.label.clone(), c.cells.clone());
        }
        let series = normalize("GC=F", &f).unwrap();
        assert!(series.bars.iter().all(|b| b.volume == 0.0));
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn non_numeric_rows_are_dropped() {
        let mut f = RawFrame::new();
        f.push_column("Date", text(&["2024-05-01", "2024-05-02", "2024-05-03"]));
        f.push_column("Open", text(&["1", "oops", "3"]));
        f.push_column("High", text(&["1", "2", "3"]));
        f.push_column("Low", text(&["1", "2", "3"]));
        f.push_column("Close", vec![Cell::Text("1".into()), Cell::Text("2".into()), Cell::Missing]);
        let series = normalize("GC=F", &f).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.bars[0].time, Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn all_rows_bad_is_empty_data() {
        let mut f = RawFrame::new();
        f.push_column("Datetime", num(&[0.0]));
        for label in ["Open", "High", "Low", "Close"] {
            f.push_column(label, vec![Cell::Missing]);
        }
        assert!(matches!(normalize("X", &f), Err(Error::EmptyData(_))));
    }

    #[test]
    fn datetime_column_preferred_over_date() {
        let mut f = RawFrame::new();
        f.push_column("Date", text(&["2020-01-01"]));
        f.push_column("Datetime", text(&["2024-05-01 09:30:00+07:00"]));
        assert_eq!(time_column(&f).unwrap().label, "Datetime");
    }

    #[test]
    fn first_column_is_last_resort_for_time() {
        let mut f = RawFrame::new();
        f.push_column("index", text(&["2024-05-01T00:05:00Z"]));
        f.push_column("Open", num(&[1.0]));
        f.push_column("High", num(&[1.0]));
        f.push_column("Low", num(&[1.0]));
        f.push_column("Close", num(&[1.0]));
        let series = normalize("GC=F", &f).unwrap();
        assert_eq!(series.bars[0].time, Utc.with_ymd_and_hms(2024, 5, 1, 0, 5, 0).unwrap());
    }

    #[test]
    fn time_formats_convert_to_utc() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 2, 30, 0).unwrap();
        for cell in [
            Cell::Text("2024-05-01T09:30:00+07:00".into()),
            Cell::Text("2024-05-01 09:30:00+07:00".into()),
            Cell::Text("2024-05-01 09:30:00+0700".into()),
            Cell::Text("2024-05-01 02:30:00".into()),
            Cell::Text("2024-05-01 02:30".into()),
            Cell::Number(1_714_530_600.0),
            Cell::Number(1_714_530_600_000.0),
            Cell::Text("1714530600".into()),
        ] {
            assert_eq!(parse_time(&cell), Some(expected), "cell {cell:?}");
        }
        assert_eq!(parse_time(&Cell::Text("yesterday".into())), None);
        assert_eq!(parse_time(&Cell::Missing), None);
    }
}
