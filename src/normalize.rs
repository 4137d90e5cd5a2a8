use crate::types::{AkmTag, Encryption, NetworkRecord, RawObservation, Security};

/// Signal assumed when the backend did not report one; sits below any sane floor
pub const MISSING_SIGNAL_DBM: i32 = -100;

const BAND_2_4_GHZ_CEILING_MHZ: u32 = 2500;
const BAND_2_4_GHZ_BASE_MHZ: f64 = 2407.0;
const BAND_5_GHZ_BASE_MHZ: f64 = 5000.0;
const CHANNEL_SPACING_MHZ: f64 = 5.0;

/// Turn a raw observation into a canonical record.
///
/// Never fails: missing fields become an empty SSID, [`MISSING_SIGNAL_DBM`],
/// frequency 0 (channel 0), and an empty tag set classifies as `Secured`/`Unknown`.
pub fn normalize(raw: RawObservation) -> NetworkRecord {
    if raw.is_incomplete() {
        log::debug!("[normalize] incomplete_observation: bssid={} ssid={:?} signal={:?} frequency={:?}",
            raw.bssid, raw.ssid, raw.signal, raw.frequency);
    }

    let frequency_mhz = raw.frequency.unwrap_or(0);
    let record = NetworkRecord {
        security: classify_security(&raw.akm),
        encryption: classify_encryption(&raw.akm),
        channel: derive_channel(frequency_mhz),
        ssid: raw.ssid.unwrap_or_default(),
        bssid: raw.bssid,
        signal: raw.signal.unwrap_or(MISSING_SIGNAL_DBM),
        frequency_mhz,
    };

    log::trace!("[normalize] record: {:?}", record);
    record
}

/// Channel number for a centre frequency.
///
/// Below 2500 MHz the 2.4 GHz plan applies, everything else is counted from
/// 5000 MHz. A frequency of 0 means "unknown" and maps to channel 0.
pub fn derive_channel(frequency_mhz: u32) -> i32 {
    if frequency_mhz == 0 {
        return 0;
    }

    let base = if frequency_mhz < BAND_2_4_GHZ_CEILING_MHZ {
        BAND_2_4_GHZ_BASE_MHZ
    } else {
        BAND_5_GHZ_BASE_MHZ
    };

    ((frequency_mhz as f64 - base) / CHANNEL_SPACING_MHZ).round() as i32
}

/// `Open` only when the first advertised suite is "no authentication"
pub fn classify_security(akm: &[AkmTag]) -> Security {
    match akm.first() {
        Some(AkmTag::None) => Security::Open,
        _ => Security::Secured,
    }
}

/// First match in priority order None, WPA, WPA2; `Unknown` otherwise
pub fn classify_encryption(akm: &[AkmTag]) -> Encryption {
    if akm.contains(&AkmTag::None) {
        Encryption::None
    } else if akm.iter().any(|tag| matches!(tag, AkmTag::Wpa | AkmTag::WpaPsk)) {
        Encryption::Wpa
    } else if akm.iter().any(|tag| matches!(tag, AkmTag::Wpa2 | AkmTag::Wpa2Psk)) {
        Encryption::Wpa2
    } else {
        Encryption::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_channel() {
        assert_eq!(derive_channel(2412), 1);
        assert_eq!(derive_channel(2437), 6);
        assert_eq!(derive_channel(2472), 13);
        assert_eq!(derive_channel(2484), 15);
        assert_eq!(derive_channel(5180), 36);
        assert_eq!(derive_channel(5745), 149);
        assert_eq!(derive_channel(0), 0);
    }

    #[test]
    fn test_open_network_classification() {
        let akm = [AkmTag::None];
        assert_eq!(classify_security(&akm), Security::Open);
        assert_eq!(classify_encryption(&akm), Encryption::None);
    }

    #[test]
    fn test_secured_network_classification() {
        let akm = [AkmTag::Wpa2];
        assert_eq!(classify_security(&akm), Security::Secured);
        assert_eq!(classify_encryption(&akm), Encryption::Wpa2);

        let psk = [AkmTag::Wpa2Psk];
        assert_eq!(classify_encryption(&psk), Encryption::Wpa2);
    }

    #[test]
    fn test_encryption_priority_order() {
        // Mixed-mode access points report both generations; WPA wins.
        let mixed = [AkmTag::Wpa2Psk, AkmTag::WpaPsk];
        assert_eq!(classify_encryption(&mixed), Encryption::Wpa);

        // "None" anywhere in the set beats everything, even when not first.
        let odd = [AkmTag::Wpa2, AkmTag::None];
        assert_eq!(classify_encryption(&odd), Encryption::None);
        assert_eq!(classify_security(&odd), Security::Secured);
    }

    #[test]
    fn test_empty_or_unrecognized_tags() {
        assert_eq!(classify_security(&[]), Security::Secured);
        assert_eq!(classify_encryption(&[]), Encryption::Unknown);

        let sae = [AkmTag::Unknown];
        assert_eq!(classify_security(&sae), Security::Secured);
        assert_eq!(classify_encryption(&sae), Encryption::Unknown);
    }

    #[test]
    fn test_normalize_complete_observation() {
        let raw = RawObservation::new("aa:bb:cc:dd:ee:ff")
            .with_ssid("HomeNetwork")
            .with_signal(-52)
            .with_frequency(5180)
            .with_akm([AkmTag::Wpa2Psk]);

        let record = normalize(raw);
        assert_eq!(record.ssid, "HomeNetwork");
        assert_eq!(record.bssid, "aa:bb:cc:dd:ee:ff");
        assert_eq!(record.signal, -52);
        assert_eq!(record.frequency_mhz, 5180);
        assert_eq!(record.channel, 36);
        assert_eq!(record.security, Security::Secured);
        assert_eq!(record.encryption, Encryption::Wpa2);
    }

    #[test]
    fn test_normalize_malformed_observation_uses_defaults() {
        let record = normalize(RawObservation::new("de:ad:be:ef:ca:fe"));

        assert_eq!(record.ssid, "");
        assert_eq!(record.signal, MISSING_SIGNAL_DBM);
        assert_eq!(record.frequency_mhz, 0);
        assert_eq!(record.channel, 0);
        assert_eq!(record.security, Security::Secured);
        assert_eq!(record.encryption, Encryption::Unknown);
    }
}
