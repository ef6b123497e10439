//! Record set -> line/point graphics.
//!
//! Mover records become lines from origin to destination, stroked by a log
//! width and a blue-to-orange ramp over the thresholded count range. Stayer
//! records become fixed-hue markers at the origin.

use foundation::{Rgba, format_count, format_fraction_percent};
use tracing::{debug, warn};

use crate::graphic::{Geometry, Graphic, PopupTemplate};
use crate::record::MigrationRecord;
use crate::resolver::{OriginIndex, find_matching_pair};
use crate::symbol::{Outline, Symbol};

pub const FLOW_COLOR_LOW: Rgba = Rgba::new(51, 102, 204, 0.85);
pub const FLOW_COLOR_HIGH: Rgba = Rgba::new(253, 141, 60, 0.85);
pub const STAYER_COLOR: Rgba = Rgba::new(0, 153, 51, 0.7);
pub const STAYER_OUTLINE: Outline = Outline::new(Rgba::new(255, 255, 255, 0.8), 1.5);

pub const MIN_STROKE_WIDTH: f64 = 1.0;
pub const MAX_STROKE_WIDTH: f64 = 12.0;
pub const MIN_MARKER_SIZE: f64 = 8.0;

/// Shown in popups when the stay percentage cannot be resolved.
pub const UNKNOWN_MARKER: &str = "unknown";

const LINE_TITLE: &str = "{o_cz_name}, {o_state_name} → {d_cz_name}, {d_state_name}";
const POINT_TITLE: &str = "{o_cz_name}, {o_state_name}";
const MOVE_PREAMBLE: &str = "Of the individuals that moved between childhood (measured by location at age 16) and young adulthood (location at age 26)";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodedFlows {
    pub lines: Vec<Graphic>,
    pub points: Vec<Graphic>,
}

impl EncodedFlows {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.points.is_empty()
    }
}

/// `clamp(log10(n) - 1, 1, 12)`.
pub fn stroke_width(n: u64) -> f64 {
    let w = (n as f64).log10() - 1.0;
    if w.is_nan() {
        return MIN_STROKE_WIDTH;
    }
    w.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH)
}

pub fn marker_size(width: f64) -> f64 {
    (width * 2.0).max(MIN_MARKER_SIZE)
}

/// Min/max raw flow count over records at or above `threshold`.
pub fn normalization_bounds(records: &[MigrationRecord], threshold: f64) -> Option<(u64, u64)> {
    records
        .iter()
        .map(MigrationRecord::flow_count)
        .filter(|&n| n as f64 >= threshold)
        .fold(None, |acc, n| match acc {
            None => Some((n, n)),
            Some((lo, hi)) => Some((lo.min(n), hi.max(n))),
        })
}

/// Position of `n` inside `bounds`, in `[0, 1]`.
///
/// Degenerate ranges (no bounds, or `min == max`) yield 0.
pub fn normalize(n: u64, bounds: Option<(u64, u64)>) -> f64 {
    let Some((lo, hi)) = bounds else {
        return 0.0;
    };
    let t = (n as f64 - lo as f64) / (hi as f64 - lo as f64);
    if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 }
}

/// Share of `total_out` carried by one flow, in percent.
pub fn out_share_percent(n: u64, total_out: u64) -> f64 {
    if total_out == 0 {
        return 0.0;
    }
    n as f64 / total_out as f64 * 100.0
}

/// Encodes `records` into graphics for every record at or above `threshold`.
///
/// Negative or NaN thresholds are read as 0. Output order follows input order,
/// but callers should treat both collections as unordered.
pub fn encode(records: &[MigrationRecord], threshold: f64) -> EncodedFlows {
    let threshold = if threshold.is_nan() {
        0.0
    } else {
        threshold.max(0.0)
    };
    let bounds = normalization_bounds(records, threshold);
    let index = OriginIndex::build(records);
    let mut out = EncodedFlows::default();

    for (i, record) in records.iter().enumerate() {
        if record.is_mover() {
            if let Some(line) = encode_mover(records, &index, record, threshold, bounds) {
                out.lines.push(line);
            }
        } else if let Some(point) = encode_stayer(records, i, record, threshold) {
            out.points.push(point);
        }
    }

    debug!(
        records = records.len(),
        threshold,
        lines = out.lines.len(),
        points = out.points.len(),
        "encoded flows"
    );
    out
}

fn passes(n: u64, threshold: f64) -> bool {
    n > 0 && n as f64 >= threshold
}

fn encode_mover(
    records: &[MigrationRecord],
    index: &OriginIndex,
    record: &MigrationRecord,
    threshold: f64,
    bounds: Option<(u64, u64)>,
) -> Option<Graphic> {
    let n = record.flow_count();
    if !passes(n, threshold) {
        return None;
    }
    let (Some(from), Some(to)) = (record.origin(), record.destination()) else {
        warn!(o_cz = %record.o_cz, d_cz = %record.d_cz, "mover record without coordinates");
        return None;
    };

    let percent = out_share_percent(n, index.total_out(record.o_cz));
    let color = FLOW_COLOR_LOW.lerp(FLOW_COLOR_HIGH, normalize(n, bounds));
    let stayed = index
        .stayer(records, record.o_cz)
        .and_then(|s| s.pr_d_o)
        .map(|pr| format!("{}%", format_fraction_percent(pr)))
        .unwrap_or_else(|| UNKNOWN_MARKER.to_string());

    let content = format!(
        "<br/>{MOVE_PREAMBLE}, <b>{count}</b> people moved from <b>{{o_cz_name}}</b> to <b>{{d_cz_name}}</b>. \
         This represents <b>{percent:.1}%</b> of young adults that left <b>{{o_cz_name}}</b>. \
         <b>{stayed}</b> of young adults stayed in the <b>{{o_cz_name}}</b> commuting zone.<br/>",
        count = format_count(n),
    );

    Some(Graphic {
        geometry: Geometry::segment(from, to),
        symbol: Symbol::SimpleLine {
            color,
            width: stroke_width(n),
        },
        attributes: record.clone(),
        popup: PopupTemplate::new(LINE_TITLE, content),
    })
}

fn encode_stayer(
    records: &[MigrationRecord],
    position: usize,
    record: &MigrationRecord,
    threshold: f64,
) -> Option<Graphic> {
    let n = record.stayer_count();
    if !passes(n, threshold) {
        return None;
    }
    let Some(at) = record.origin() else {
        warn!(cz = %record.o_cz, "stayer record without coordinates");
        return None;
    };

    let pr_d_o = find_matching_pair(records, record.o_cz, record.d_cz, position)
        .and_then(|other| other.pr_d_o)
        .or(record.pr_d_o);
    let stayed = pr_d_o
        .map(|pr| format!("{}%", format_fraction_percent(pr)))
        .unwrap_or_else(|| UNKNOWN_MARKER.to_string());

    let content = format!(
        "<br/>{MOVE_PREAMBLE}, <b>{stayed}</b> ({count}) of young adults stayed in the <b>{{o_cz_name}} Commuting Zone</b>.",
        count = format_count(n),
    );

    Some(Graphic {
        geometry: Geometry::point(at),
        symbol: Symbol::SimpleMarker {
            color: STAYER_COLOR,
            size: marker_size(stroke_width(n)),
            outline: Some(STAYER_OUTLINE),
        },
        attributes: record.clone(),
        popup: PopupTemplate::new(POINT_TITLE, content),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphic::GeometryKind;
    use foundation::ZoneId;
    use pretty_assertions::assert_eq;

    fn rec(o: i64, d: i64, n: Option<u64>) -> MigrationRecord {
        let mut r = MigrationRecord::new(ZoneId(o), ZoneId(d));
        r.n = n;
        r.o_x_coord = Some(-90.0 + o as f64);
        r.o_y_coord = Some(40.0);
        r.d_x_coord = Some(-90.0 + d as f64);
        r.d_y_coord = Some(35.0);
        r.o_cz_name = Some(format!("Zone {o}"));
        r.d_cz_name = Some(format!("Zone {d}"));
        r
    }

    fn line_width(g: &Graphic) -> f64 {
        match g.symbol {
            Symbol::SimpleLine { width, .. } => width,
            _ => panic!("not a line"),
        }
    }

    #[test]
    fn width_is_clamped_at_both_ends() {
        assert_eq!(stroke_width(1), MIN_STROKE_WIDTH);
        assert_eq!(stroke_width(0), MIN_STROKE_WIDTH);
        assert!((stroke_width(1_000_000_000) - 8.0).abs() < 1e-9);
        assert_eq!(stroke_width(u64::MAX), MAX_STROKE_WIDTH);
        assert!((stroke_width(600) - (600f64.log10() - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn normalization_is_finite_for_degenerate_ranges() {
        assert_eq!(normalize(5, None), 0.0);
        assert_eq!(normalize(5, Some((5, 5))), 0.0);
        assert_eq!(normalize(10, Some((0, 20))), 0.5);

        let records = vec![rec(1, 2, Some(700)), rec(1, 3, Some(700))];
        let out = encode(&records, 0.0);
        for g in &out.lines {
            assert_eq!(g.symbol.color(), FLOW_COLOR_LOW);
        }
    }

    #[test]
    fn every_graphic_meets_the_threshold() {
        let records = vec![
            rec(1, 2, Some(50)),
            rec(1, 3, Some(499)),
            rec(1, 4, Some(500)),
            rec(1, 5, Some(0)),
            rec(1, 6, None),
            rec(1, 1, Some(9400)),
            rec(2, 2, Some(10)),
        ];
        for threshold in [0.0, 1.0, 50.0, 500.0, 9400.0, 9401.0] {
            let out = encode(&records, threshold);
            for g in out.lines.iter() {
                let n = g.attributes.flow_count();
                assert!(n > 0 && n as f64 >= threshold, "line n={n} t={threshold}");
            }
            for g in out.points.iter() {
                let n = g.attributes.stayer_count();
                assert!(n > 0 && n as f64 >= threshold, "point n={n} t={threshold}");
            }
        }
    }

    #[test]
    fn shares_of_one_origin_sum_to_one_hundred() {
        let records = vec![
            rec(1, 2, Some(123)),
            rec(1, 3, Some(456)),
            rec(1, 4, Some(789)),
            rec(1, 1, Some(10_000)),
            rec(5, 1, Some(77)),
        ];
        let index = OriginIndex::build(&records);
        let total: f64 = records
            .iter()
            .filter(|r| r.is_mover() && r.o_cz == ZoneId(1))
            .map(|r| out_share_percent(r.flow_count(), index.total_out(r.o_cz)))
            .sum();
        assert!((total - 100.0).abs() < 1e-9, "{total}");

        let out = encode(&records, 0.0);
        assert_eq!(out.lines.len(), 4);
        assert!(out.lines[0].popup.content.contains("<b>9.0%</b>"));
    }

    #[test]
    fn stayer_with_zero_count_uses_origin_total() {
        let mut stayer = rec(3, 3, Some(0));
        stayer.n_tot_o = Some(5000);
        let out = encode(&[stayer], 1000.0);
        assert_eq!(out.points.len(), 1);
        assert!(out.points[0].popup.content.contains("(5,000)"));
        match out.points[0].symbol {
            Symbol::SimpleMarker { size, .. } => {
                assert_eq!(size, marker_size(stroke_width(5000)));
            }
            _ => panic!("not a marker"),
        }
    }

    #[test]
    fn duplicate_stayers_read_each_other() {
        let mut a = rec(7, 7, Some(2000));
        a.pr_d_o = Some(0.25);
        let mut b = rec(7, 7, Some(2000));
        b.pr_d_o = Some(0.75);
        let out = encode(&[a, b], 0.0);
        assert_eq!(out.points.len(), 2);
        assert!(out.points[0].popup.content.contains("<b>75.0%</b>"));
        assert!(out.points[1].popup.content.contains("<b>25.0%</b>"));
    }

    #[test]
    fn single_mover_and_stayer_scenario() {
        let mover = rec(1, 2, Some(600));
        let mut stayer = rec(1, 1, Some(9400));
        stayer.pr_d_o = Some(0.82);
        let out = encode(&[mover, stayer], 500.0);

        assert_eq!(out.lines.len(), 1);
        assert_eq!(out.points.len(), 1);

        let line = &out.lines[0];
        assert_eq!(line.kind(), GeometryKind::Polyline);
        assert_eq!(line.attributes.o_cz, ZoneId(1));
        assert_eq!(line.attributes.d_cz, ZoneId(2));
        assert!((line_width(line) - 1.778).abs() < 1e-3);
        assert!(line.popup.content.contains("<b>600</b> people"));
        assert!(line.popup.content.contains("<b>100.0%</b>"));
        assert!(line.popup.content.contains("<b>82.0%</b> of young adults stayed"));

        let point = &out.points[0];
        assert_eq!(point.kind(), GeometryKind::Point);
        assert_eq!(point.geometry, Geometry::point(stayer_origin()));
        assert!(point.popup.content.contains("(9,400)"));
        assert!(point.popup.content.contains("<b>82.0%</b>"));

        let popup = line.rendered_popup();
        assert_eq!(popup.title, "Zone 1, {o_state_name} → Zone 2, {d_state_name}");
    }

    fn stayer_origin() -> foundation::LonLat {
        foundation::LonLat::new(-89.0, 40.0)
    }

    #[test]
    fn missing_stayer_shows_placeholder() {
        let out = encode(&[rec(1, 2, Some(600))], 0.0);
        assert!(out.lines[0].popup.content.contains("<b>unknown</b>"));
    }

    #[test]
    fn threshold_above_everything_yields_nothing() {
        let records = vec![rec(1, 2, Some(600)), rec(1, 1, Some(9400))];
        let out = encode(&records, 1.0e9);
        assert!(out.is_empty());
        assert!(encode(&[], 0.0).is_empty());
    }

    #[test]
    fn color_ramps_from_low_to_high() {
        let records = vec![rec(1, 2, Some(100)), rec(1, 3, Some(1000))];
        let out = encode(&records, 0.0);
        assert_eq!(out.lines[0].symbol.color(), FLOW_COLOR_LOW);
        assert_eq!(out.lines[1].symbol.color(), FLOW_COLOR_HIGH);
    }

    #[test]
    fn records_without_coordinates_are_skipped() {
        let mut r = rec(1, 2, Some(600));
        r.d_x_coord = None;
        let out = encode(&[r], 0.0);
        assert!(out.lines.is_empty());
    }
}
