use crate::scanner::{ScanError, ScanSource};
use crate::types::{AkmTag, RawObservation};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::time::{Duration, Instant};
use tokio::process::Command;

const IW_BINARY: &str = "iw";
const DEFAULT_SETTLE_SECS: u64 = 2;
const MAC_ADDRESS_LEN: usize = 17;

/// Scan backend built on `iw`.
///
/// Each scan triggers a fresh radio sweep, waits `settle` for results to
/// accumulate, then reads the kernel's BSS cache with `scan dump`.
pub struct IwScanner {
    interface: Option<String>,
    settle: Duration,
}

impl IwScanner {
    /// `interface` of `None` means "first wireless interface `iw dev` lists"
    pub fn new(interface: Option<String>, settle: Duration) -> Self {
        log::debug!("[scan::iw] new: interface={:?} settle={}ms", interface, settle.as_millis());

        Self { interface, settle }
    }

    async fn resolve_interface(&self) -> Result<String, ScanError> {
        if let Some(interface) = &self.interface {
            return Ok(interface.clone());
        }

        let output = run_iw(&["dev"]).await?;
        let interface = parse_interfaces(&output)
            .into_iter()
            .next()
            .ok_or_else(|| ScanError::Unavailable("no wireless interface found".to_string()))?;

        log::debug!("[scan::iw] interface_detected: {}", interface);
        Ok(interface)
    }

    async fn do_scan(&self) -> Result<Vec<RawObservation>, ScanError> {
        let interface = self.resolve_interface().await?;

        // Triggering needs CAP_NET_ADMIN and fails while another sweep is in
        // flight; the dump still returns whatever the kernel has cached.
        if let Err(e) = run_iw(&["dev", &interface, "scan", "trigger"]).await {
            log::warn!("[scan::iw] trigger_failed: interface={} error={}", interface, e);
        }

        tokio::time::sleep(self.settle).await;

        let dump = run_iw(&["dev", &interface, "scan", "dump"]).await?;
        let observations = parse_scan_dump(&dump);

        log::debug!("[scan::iw] dump_parsed: interface={} observations={}", interface, observations.len());
        Ok(observations)
    }
}

impl Default for IwScanner {
    fn default() -> Self {
        Self::new(None, Duration::from_secs(DEFAULT_SETTLE_SECS))
    }
}

#[async_trait]
impl ScanSource for IwScanner {
    fn name(&self) -> &'static str {
        "iw"
    }

    async fn scan(&self, timeout: Duration) -> Result<Vec<RawObservation>, ScanError> {
        let scan_start = Instant::now();
        let result = tokio::time::timeout(timeout, self.do_scan())
            .await
            .map_err(|_| ScanError::Timeout(timeout))?;

        match &result {
            Ok(observations) => log::trace!("[scan::iw] scan_completed: duration={}ms observations={}",
                scan_start.elapsed().as_millis(), observations.len()),
            Err(e) => log::error!("[scan::iw] scan_failed: duration={}ms error={}",
                scan_start.elapsed().as_millis(), e),
        }

        result
    }
}

async fn run_iw(args: &[&str]) -> Result<String, ScanError> {
    let command = format!("{} {}", IW_BINARY, args.join(" "));
    log::trace!("[scan::iw] run: {}", command);

    let output = match Command::new(IW_BINARY).args(args).output().await {
        Ok(output) => output,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ScanError::Unavailable(format!("`{}` is not installed", IW_BINARY)));
        }
        Err(e) => {
            return Err(ScanError::CommandFailed { command, reason: e.to_string() });
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ScanError::CommandFailed {
            command,
            reason: format!("{}: {}", output.status, stderr.trim()),
        });
    }

    String::from_utf8(output.stdout).map_err(|e| ScanError::InvalidOutput(e.to_string()))
}

/// Interface names from `iw dev` output, in listed order
pub fn parse_interfaces(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.trim().strip_prefix("Interface "))
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Rsn,
    Wpa,
    Other,
}

/// Fields collected from one `BSS` stanza
#[derive(Default)]
struct BssStanza {
    bssid: String,
    ssid: Option<String>,
    signal: Option<i32>,
    frequency: Option<u32>,
    privacy: bool,
    akm: Vec<AkmTag>,
}

impl BssStanza {
    fn new(bssid: String) -> Self {
        Self { bssid, ..Self::default() }
    }

    fn flush(self) -> RawObservation {
        let akm = if !self.akm.is_empty() {
            self.akm
        } else if self.privacy {
            // WEP or a suite iw does not spell out
            vec![AkmTag::Unknown]
        } else {
            vec![AkmTag::None]
        };

        RawObservation {
            ssid: self.ssid,
            bssid: self.bssid,
            signal: self.signal,
            frequency: self.frequency,
            akm,
        }
    }
}

/// Parse `iw dev <iface> scan dump` output.
///
/// Stanzas open with `BSS aa:bb:cc:dd:ee:ff(on wlan0)` at column 0; the
/// indented lines after it belong to that BSS. Unparseable fields are left
/// empty rather than failing the whole snapshot.
pub fn parse_scan_dump(output: &str) -> Vec<RawObservation> {
    let mut results = Vec::new();
    let mut current: Option<BssStanza> = None;
    let mut section = Section::Other;

    for line in output.lines() {
        if let Some(rest) = line.strip_prefix("BSS ") {
            if let Some(stanza) = current.take() {
                results.push(stanza.flush());
            }
            section = Section::Other;

            let mac_end = rest
                .find(|c: char| !c.is_ascii_hexdigit() && c != ':')
                .unwrap_or(rest.len());
            let mac = &rest[..mac_end];

            if mac.len() == MAC_ADDRESS_LEN {
                current = Some(BssStanza::new(mac.to_lowercase()));
            } else {
                log::warn!("[scan::iw] malformed_bss_line: {}", line);
            }
            continue;
        }

        let Some(stanza) = current.as_mut() else {
            continue;
        };
        let trimmed = line.trim();

        if let Some(rest) = trimmed.strip_prefix("SSID:") {
            stanza.ssid = Some(decode_ssid(rest.trim()));
        } else if let Some(rest) = trimmed.strip_prefix("signal:") {
            stanza.signal = parse_leading_number(rest).map(|dbm| dbm.round() as i32);
        } else if let Some(rest) = trimmed.strip_prefix("freq:") {
            stanza.frequency = parse_leading_number(rest)
                .filter(|mhz| *mhz > 0.0)
                .map(|mhz| mhz.round() as u32);
        } else if let Some(rest) = trimmed.strip_prefix("capability:") {
            stanza.privacy = rest.split_whitespace().any(|flag| flag == "Privacy");
        } else if trimmed.starts_with("RSN:") {
            section = Section::Rsn;
        } else if trimmed.starts_with("WPA:") {
            section = Section::Wpa;
        } else if let Some(rest) = trimmed
            .strip_prefix("* ")
            .and_then(|item| item.strip_prefix("Authentication suites:"))
        {
            for suite in rest.split_whitespace() {
                let tag = akm_tag(section, suite);
                if !stanza.akm.contains(&tag) {
                    stanza.akm.push(tag);
                }
            }
        } else if !trimmed.starts_with('*') {
            section = Section::Other;
        }
    }

    if let Some(stanza) = current.take() {
        results.push(stanza.flush());
    }

    results
}

fn akm_tag(section: Section, suite: &str) -> AkmTag {
    match (section, suite) {
        (Section::Wpa, "PSK") => AkmTag::WpaPsk,
        (Section::Wpa, "IEEE") | (Section::Wpa, "802.1X") => AkmTag::Wpa,
        (Section::Rsn, "PSK") | (Section::Rsn, "PSK/SHA-256") => AkmTag::Wpa2Psk,
        (Section::Rsn, "IEEE") | (Section::Rsn, "802.1X") | (Section::Rsn, "802.1X/SHA-256") => AkmTag::Wpa2,
        _ => AkmTag::Unknown,
    }
}

/// Undo iw's SSID escaping.
///
/// iw prints bytes outside printable ASCII (and the backslash itself) as
/// `\xNN`, so UTF-8 names arrive as escaped byte runs. Hidden networks that
/// broadcast a zeroed SSID decode to an empty name.
fn decode_ssid(escaped: &str) -> String {
    let bytes = escaped.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\\' {
            match bytes.get(i + 1) {
                Some(b'\\') => {
                    decoded.push(b'\\');
                    i += 2;
                    continue;
                }
                Some(b'x') => {
                    let byte = escaped
                        .get(i + 2..i + 4)
                        .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
                        .and_then(|hex| u8::from_str_radix(hex, 16).ok());
                    if let Some(byte) = byte {
                        decoded.push(byte);
                        i += 4;
                        continue;
                    }
                }
                _ => {}
            }
        }
        decoded.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&decoded).trim_matches('\0').to_string()
}

/// "-52.00 dBm" -> -52.0, "5180.0" -> 5180.0
fn parse_leading_number(s: &str) -> Option<f64> {
    s.split_whitespace().next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_SCAN_DUMP: &str = "\
BSS aa:bb:cc:dd:ee:ff(on wlan0)
\tTSF: 123456789 usec
\tfreq: 5180
\tbeacon interval: 100 TUs
\tcapability: ESS Privacy (0x0011)
\tsignal: -52.00 dBm
\tSSID: HomeNetwork
\tDS Parameter set: channel 36
\tRSN:\t * Version: 1
\t\t * Group cipher: CCMP
\t\t * Pairwise ciphers: CCMP
\t\t * Authentication suites: PSK
\t\t * Capabilities: 16-PTKSA-RC 1-GTKSA-RC (0x000c)
BSS 11:22:33:44:55:66(on wlan0)
\tfreq: 2437.0
\tcapability: ESS ShortSlotTime (0x0401)
\tsignal: -71.00 dBm
\tSSID: GuestWifi
BSS DE:AD:BE:EF:CA:FE(on wlan0) -- associated
\tfreq: 2412
\tcapability: ESS Privacy (0x0011)
\tsignal: -45.00 dBm
\tSSID: OfficeNet
\tWPA:\t * Version: 1
\t\t * Group cipher: TKIP
\t\t * Pairwise ciphers: TKIP
\t\t * Authentication suites: IEEE 802.1X
\tRSN:\t * Version: 1
\t\t * Authentication suites: IEEE 802.1X
\tExtended capabilities:
\t\t * Extended Channel Switching
";

    #[test]
    fn test_parse_scan_dump() {
        let observations = parse_scan_dump(SAMPLE_SCAN_DUMP);
        assert_eq!(observations.len(), 3);

        let home = &observations[0];
        assert_eq!(home.bssid, "aa:bb:cc:dd:ee:ff");
        assert_eq!(home.ssid.as_deref(), Some("HomeNetwork"));
        assert_eq!(home.signal, Some(-52));
        assert_eq!(home.frequency, Some(5180));
        assert_eq!(home.akm, vec![AkmTag::Wpa2Psk]);

        let guest = &observations[1];
        assert_eq!(guest.frequency, Some(2437));
        assert_eq!(guest.signal, Some(-71));
        assert_eq!(guest.akm, vec![AkmTag::None]);

        let office = &observations[2];
        assert_eq!(office.bssid, "de:ad:be:ef:ca:fe");
        assert_eq!(office.akm, vec![AkmTag::Wpa, AkmTag::Wpa2]);
    }

    #[test]
    fn test_privacy_without_suites_is_unknown() {
        let output = "\
BSS 00:11:22:33:44:55(on wlan0)
\tfreq: 2462
\tcapability: ESS Privacy (0x0011)
\tsignal: -60.00 dBm
\tSSID: OldRouter
";
        let observations = parse_scan_dump(output);
        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].akm, vec![AkmTag::Unknown]);
    }

    #[test]
    fn test_missing_fields_stay_empty() {
        let output = "BSS 11:22:33:44:55:66(on wlan0)\n\tTSF: 1 usec\n";
        let observations = parse_scan_dump(output);

        assert_eq!(observations.len(), 1);
        assert!(observations[0].ssid.is_none());
        assert!(observations[0].signal.is_none());
        assert!(observations[0].frequency.is_none());
        assert!(observations[0].is_incomplete());
    }

    #[test]
    fn test_malformed_bss_line_is_skipped() {
        let output = "\
BSS not-a-mac(on wlan0)
\tSSID: Ghost
BSS 11:22:33:44:55:66(on wlan0)
\tSSID: Real
";
        let observations = parse_scan_dump(output);
        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].ssid.as_deref(), Some("Real"));
    }

    #[test]
    fn test_escaped_ssid_is_decoded() {
        let output = "\
BSS 00:11:22:33:44:55(on wlan0)
\tSSID: Caf\\xc3\\xa9
BSS 00:11:22:33:44:56(on wlan0)
\tSSID: \\x20back\\x5cslash\\x20
BSS 00:11:22:33:44:57(on wlan0)
\tSSID: \\x00\\x00\\x00\\x00
";
        let observations = parse_scan_dump(output);
        assert_eq!(observations.len(), 3);
        assert_eq!(observations[0].ssid.as_deref(), Some("Café"));
        assert_eq!(observations[1].ssid.as_deref(), Some(" back\\slash "));
        assert_eq!(observations[2].ssid.as_deref(), Some(""));
    }

    #[test]
    fn test_decode_ssid_edge_cases() {
        assert_eq!(decode_ssid("Plain Name"), "Plain Name");
        assert_eq!(decode_ssid("a\\\\b"), "a\\b");
        // Not a complete escape, kept as written
        assert_eq!(decode_ssid("tail\\x4"), "tail\\x4");
        assert_eq!(decode_ssid("bad\\xzz"), "bad\\xzz");
        // Invalid UTF-8 is replaced rather than rejected
        assert_eq!(decode_ssid("\\xff"), "\u{fffd}");
    }

    #[test]
    fn test_empty_dump() {
        assert!(parse_scan_dump("").is_empty());
    }

    #[test]
    fn test_parse_interfaces() {
        let output = "\
phy#0
\tInterface wlp2s0
\t\tifindex 3
\t\ttype managed
phy#1
\tInterface wlan1
\t\ttype monitor
";
        assert_eq!(parse_interfaces(output), vec!["wlp2s0", "wlan1"]);
        assert!(parse_interfaces("phy#0\n").is_empty());
    }

    #[test]
    fn test_scanner_defaults() {
        let scanner = IwScanner::default();
        assert!(scanner.interface.is_none());
        assert_eq!(scanner.settle, Duration::from_secs(2));
        assert_eq!(scanner.name(), "iw");
    }
}
