use crate::driver::{DriverConfig, DEFAULT_INTERVAL_MS};
use crate::inventory::DEFAULT_SIGNAL_FLOOR;
use clap::Parser;
use std::time::Duration;

const DEFAULT_SETTLE_MS: u64 = 2000;
const DEFAULT_SCAN_TIMEOUT_MS: u64 = 10_000;

#[derive(Parser, Debug)]
#[command(name = "wifiscan")]
#[command(about = "Live Wi-Fi network inventory with CSV/JSON export")]
pub struct Cli {
    /// Wireless interface to scan on (default: first interface `iw dev` reports)
    #[arg(short, long)]
    pub interface: Option<String>,

    /// Pause between scan cycles in milliseconds
    #[arg(long, default_value_t = DEFAULT_INTERVAL_MS)]
    pub interval: u64,

    /// Delay between triggering a scan and reading its results, in milliseconds
    #[arg(long, default_value_t = DEFAULT_SETTLE_MS)]
    pub settle: u64,

    /// Give up on a single scan after this many milliseconds
    #[arg(long, default_value_t = DEFAULT_SCAN_TIMEOUT_MS)]
    pub scan_timeout: u64,

    /// Hide networks at or below this signal level (dBm)
    #[arg(long, default_value_t = DEFAULT_SIGNAL_FLOOR, allow_hyphen_values = true)]
    pub signal_floor: i32,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Do not draw the banner above the table
    #[arg(long)]
    pub no_banner: bool,
}

impl Cli {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle)
    }

    pub fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            interval: Duration::from_millis(self.interval),
            scan_timeout: Duration::from_millis(self.scan_timeout),
            signal_floor: self.signal_floor,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
