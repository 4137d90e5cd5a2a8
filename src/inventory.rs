use crate::types::NetworkRecord;
use std::collections::HashMap;

/// Observations at or below this level are dropped before merging
pub const DEFAULT_SIGNAL_FLOOR: i32 = -80;

/// Insertion-ordered set of networks, one entry per BSSID.
///
/// A BSSID keeps the position it was first seen at for the lifetime of the
/// inventory. Later sightings overwrite its readings in place. Entries are
/// never removed: networks that drop out of range stay listed until exit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    records: Vec<NetworkRecord>,
    index: HashMap<String, usize>,
}

/// What a single merge did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub inserted: usize,
    pub updated: usize,
    pub suppressed: usize,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one snapshot into the inventory.
    ///
    /// Records with `signal <= signal_floor` are discarded. Unknown BSSIDs are
    /// appended; known ones have signal, frequency, channel, security and
    /// encryption overwritten. The SSID stays as first seen.
    pub fn merge<I>(&mut self, records: I, signal_floor: i32) -> MergeStats
    where
        I: IntoIterator<Item = NetworkRecord>,
    {
        let mut stats = MergeStats::default();

        for record in records {
            if record.signal <= signal_floor {
                log::trace!("[inventory] suppressed: bssid={} signal={} floor={}",
                    record.bssid, record.signal, signal_floor);
                stats.suppressed += 1;
                continue;
            }

            match self.index.get(&record.bssid) {
                Some(&position) => {
                    let existing = &mut self.records[position];
                    existing.signal = record.signal;
                    existing.frequency_mhz = record.frequency_mhz;
                    existing.channel = record.channel;
                    existing.security = record.security;
                    existing.encryption = record.encryption;
                    stats.updated += 1;
                }
                None => {
                    log::debug!("[inventory] new_network: bssid={} ssid={:?} position={}",
                        record.bssid, record.ssid, self.records.len());
                    self.index.insert(record.bssid.clone(), self.records.len());
                    self.records.push(record);
                    stats.inserted += 1;
                }
            }
        }

        log::debug!("[inventory] merge: inserted={} updated={} suppressed={} total={}",
            stats.inserted, stats.updated, stats.suppressed, self.records.len());

        stats
    }

    pub fn get(&self, bssid: &str) -> Option<&NetworkRecord> {
        self.index.get(bssid).map(|&position| &self.records[position])
    }

    /// 0-based display position of a BSSID
    pub fn position(&self, bssid: &str) -> Option<usize> {
        self.index.get(bssid).copied()
    }

    pub fn records(&self) -> &[NetworkRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &NetworkRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
