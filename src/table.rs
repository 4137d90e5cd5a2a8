use crate::inventory::Inventory;
use crate::types::{Encryption, NetworkRecord, Security};

pub const TABLE_TITLE: &str = "Wi-Fi Networks";

pub const COLUMN_HEADERS: [&str; 8] = [
    "No.",
    "SSID",
    "BSSID",
    "Signal Strength",
    "Frequency",
    "Channel",
    "Security",
    "Encryption",
];

/// One display row: 1-based rank plus the record's seven fields
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub rank: usize,
    pub ssid: String,
    pub bssid: String,
    pub signal: i32,
    pub frequency: String,
    pub channel: i32,
    pub security: Security,
    pub encryption: Encryption,
}

impl TableRow {
    fn from_record(rank: usize, record: &NetworkRecord) -> Self {
        Self {
            rank,
            ssid: record.ssid.clone(),
            bssid: record.bssid.clone(),
            signal: record.signal,
            frequency: record.frequency_label(),
            channel: record.channel,
            security: record.security,
            encryption: record.encryption,
        }
    }

    /// Cell text in [`COLUMN_HEADERS`] order
    pub fn cells(&self) -> [String; 8] {
        [
            self.rank.to_string(),
            self.ssid.clone(),
            self.bssid.clone(),
            self.signal.to_string(),
            self.frequency.clone(),
            self.channel.to_string(),
            self.security.to_string(),
            self.encryption.to_string(),
        ]
    }
}

/// Renderable projection of the inventory
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub title: &'static str,
    pub header: [&'static str; 8],
    pub rows: Vec<TableRow>,
    pub caption: Option<String>,
}

impl Table {
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Project the inventory into a table, in inventory order
pub fn render(inventory: &Inventory) -> Table {
    let rows = inventory
        .iter()
        .enumerate()
        .map(|(i, record)| TableRow::from_record(i + 1, record))
        .collect();

    Table {
        title: TABLE_TITLE,
        header: COLUMN_HEADERS,
        rows,
        caption: None,
    }
}
