use serde::{Deserialize, Serialize};
use std::fmt;

/// Authentication/key-management suite advertised by an access point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AkmTag {
    /// No authentication (open network)
    None,
    /// WPA with 802.1X
    Wpa,
    /// WPA with pre-shared key
    WpaPsk,
    /// WPA2 (RSN) with 802.1X
    Wpa2,
    /// WPA2 (RSN) with pre-shared key
    Wpa2Psk,
    /// Anything else the scan backend reports (SAE, WEP, vendor suites)
    Unknown,
}

/// One network as reported by the scan backend, before normalization.
///
/// Everything but the BSSID is optional: backends drop fields they could
/// not read, and the normalizer fills in defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawObservation {
    pub ssid: Option<String>,
    pub bssid: String,
    pub signal: Option<i32>,
    pub frequency: Option<u32>,
    pub akm: Vec<AkmTag>,
}

impl RawObservation {
    pub fn new(bssid: impl Into<String>) -> Self {
        Self {
            bssid: bssid.into(),
            ..Self::default()
        }
    }

    pub fn with_ssid(mut self, ssid: impl Into<String>) -> Self {
        self.ssid = Some(ssid.into());
        self
    }

    pub fn with_signal(mut self, signal: i32) -> Self {
        self.signal = Some(signal);
        self
    }

    pub fn with_frequency(mut self, frequency: u32) -> Self {
        self.frequency = Some(frequency);
        self
    }

    pub fn with_akm(mut self, akm: impl IntoIterator<Item = AkmTag>) -> Self {
        self.akm = akm.into_iter().collect();
        self
    }

    /// Whether the backend left out any field the normalizer needs
    pub fn is_incomplete(&self) -> bool {
        self.ssid.is_none() || self.signal.is_none() || self.frequency.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Security {
    Open,
    Secured,
}

impl Security {
    pub fn as_str(&self) -> &'static str {
        match self {
            Security::Open => "Open",
            Security::Secured => "Secured",
        }
    }
}

impl fmt::Display for Security {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encryption {
    None,
    #[serde(rename = "WPA")]
    Wpa,
    #[serde(rename = "WPA2")]
    Wpa2,
    Unknown,
}

impl Encryption {
    pub fn as_str(&self) -> &'static str {
        match self {
            Encryption::None => "None",
            Encryption::Wpa => "WPA",
            Encryption::Wpa2 => "WPA2",
            Encryption::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Encryption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical view of one access point, keyed by `bssid` in the inventory.
///
/// The serde field names are the export column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkRecord {
    #[serde(rename = "SSID")]
    pub ssid: String,
    #[serde(rename = "BSSID")]
    pub bssid: String,
    #[serde(rename = "Signal")]
    pub signal: i32,
    #[serde(rename = "Frequency")]
    pub frequency_mhz: u32,
    #[serde(rename = "Channel")]
    pub channel: i32,
    #[serde(rename = "Security")]
    pub security: Security,
    #[serde(rename = "Encryption")]
    pub encryption: Encryption,
}

impl NetworkRecord {
    /// Frequency with its unit, as shown in the table and the CSV export
    pub fn frequency_label(&self) -> String {
        format!("{} MHz", self.frequency_mhz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_observation_builder() {
        let raw = RawObservation::new("aa:bb:cc:dd:ee:ff")
            .with_ssid("HomeNetwork")
            .with_signal(-52)
            .with_frequency(5180)
            .with_akm([AkmTag::Wpa2Psk]);

        assert_eq!(raw.bssid, "aa:bb:cc:dd:ee:ff");
        assert_eq!(raw.ssid.as_deref(), Some("HomeNetwork"));
        assert_eq!(raw.akm, vec![AkmTag::Wpa2Psk]);
        assert!(!raw.is_incomplete());
        assert!(RawObservation::new("aa:bb:cc:dd:ee:ff").is_incomplete());
    }

    #[test]
    fn test_record_serializes_with_column_names() {
        let record = NetworkRecord {
            ssid: "Cafe".to_string(),
            bssid: "11:22:33:44:55:66".to_string(),
            signal: -61,
            frequency_mhz: 2437,
            channel: 6,
            security: Security::Secured,
            encryption: Encryption::Wpa2,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["SSID"], "Cafe");
        assert_eq!(value["Signal"], -61);
        assert_eq!(value["Frequency"], 2437);
        assert_eq!(value["Channel"], 6);
        assert_eq!(value["Security"], "Secured");
        assert_eq!(value["Encryption"], "WPA2");
        assert_eq!(value.as_object().unwrap().len(), 7);
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(Security::Open.to_string(), "Open");
        assert_eq!(Encryption::Wpa.to_string(), "WPA");
        assert_eq!(Encryption::None.to_string(), "None");
    }
}
