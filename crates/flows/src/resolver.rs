//! Stayer and pair lookups over one loaded record set.
//!
//! Record sets are bounded by the flow degree of a single zone, so the plain
//! lookups are linear scans. `OriginIndex` precomputes the per-origin values
//! the encoder needs for every record.

use std::collections::BTreeMap;

use foundation::ZoneId;

use crate::record::MigrationRecord;

/// First record with `o_cz == d_cz == origin`.
pub fn find_stayer(records: &[MigrationRecord], origin: ZoneId) -> Option<&MigrationRecord> {
    records
        .iter()
        .find(|r| r.o_cz == origin && r.d_cz == origin)
}

/// First record matching both ids, other than the record at index `exclude`.
///
/// The exclusion is by position, so a record is never resolved to itself even
/// when an identical copy of it appears elsewhere in the set.
pub fn find_matching_pair(
    records: &[MigrationRecord],
    origin: ZoneId,
    destination: ZoneId,
    exclude: usize,
) -> Option<&MigrationRecord> {
    records
        .iter()
        .enumerate()
        .find(|(i, r)| *i != exclude && r.o_cz == origin && r.d_cz == destination)
        .map(|(_, r)| r)
}

/// Per-origin aggregates over a record set.
#[derive(Debug, Clone, Default)]
pub struct OriginIndex {
    mover_totals: BTreeMap<ZoneId, u64>,
    stayers: BTreeMap<ZoneId, usize>,
}

impl OriginIndex {
    pub fn build(records: &[MigrationRecord]) -> Self {
        let mut out = Self::default();
        for (i, r) in records.iter().enumerate() {
            if r.is_stayer() {
                out.stayers.entry(r.o_cz).or_insert(i);
            } else {
                let total = out.mover_totals.entry(r.o_cz).or_insert(0);
                *total = total.saturating_add(r.flow_count());
            }
        }
        out
    }

    /// Sum of `n` over the mover records leaving `origin`.
    ///
    /// The stayer row is left out, so this is the number of people who left
    /// and the shares of one origin's flows add up to 100%.
    pub fn total_out(&self, origin: ZoneId) -> u64 {
        self.mover_totals.get(&origin).copied().unwrap_or(0)
    }

    /// Position of the first stayer record of `origin`.
    pub fn stayer_index(&self, origin: ZoneId) -> Option<usize> {
        self.stayers.get(&origin).copied()
    }

    pub fn stayer<'a>(
        &self,
        records: &'a [MigrationRecord],
        origin: ZoneId,
    ) -> Option<&'a MigrationRecord> {
        self.stayer_index(origin).and_then(|i| records.get(i))
    }
}
