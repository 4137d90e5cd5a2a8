use crate::export::{self, ExportError, ExportFormat};
use crate::inventory::{Inventory, DEFAULT_SIGNAL_FLOOR};
use crate::normalize::normalize;
use crate::prompt::{PromptError, Prompter};
use crate::scanner::{ScanError, ScanSource, DEFAULT_SCAN_TIMEOUT_SECS};
use crate::table;
use crate::tui::RenderSink;
use crate::types::RawObservation;
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

pub const DEFAULT_INTERVAL_MS: u64 = 1000;
pub const SCANNING_MESSAGE: &str = "Scanning for networks...";

/// Placeholder redraw rate until the first table replaces it
const SPINNER_TICK: Duration = Duration::from_millis(120);

const EXPORT_CONFIRM_LABEL: &str = "Do you want to export the results?";
const EXPORT_CONFIRM_OPTIONS: [&str; 2] = ["y", "n"];
const EXPORT_FORMAT_LABEL: &str = "Choose export format";
const EXPORT_FILENAME_LABEL: &str = "Enter the filename (without extension)";

/// Phases of the scan loop.
///
/// `Scanning -> Merging -> Rendering -> Waiting -> Scanning` repeats until the
/// interrupt fires, then `Terminating -> ExportPrompt -> Exited`. A new
/// driver starts in `Waiting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Scanning,
    Merging,
    Rendering,
    Waiting,
    Terminating,
    ExportPrompt,
    Exited,
}

impl LoopState {
    pub fn can_transition_to(self, next: LoopState) -> bool {
        use LoopState::*;

        matches!(
            (self, next),
            (Waiting, Scanning)
                | (Scanning, Merging)
                | (Merging, Rendering)
                | (Rendering, Waiting)
                | (Scanning | Merging | Rendering | Waiting, Terminating)
                | (Terminating, ExportPrompt)
                | (ExportPrompt, Exited)
        )
    }
}

#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Pause between the end of one cycle and the next scan
    pub interval: Duration,
    /// Upper bound on one scan invocation
    pub scan_timeout: Duration,
    pub signal_floor: i32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            scan_timeout: Duration::from_secs(DEFAULT_SCAN_TIMEOUT_SECS),
            signal_floor: DEFAULT_SIGNAL_FLOOR,
        }
    }
}

/// How the export prompt ended
#[derive(Debug)]
pub enum ExportOutcome {
    Declined,
    Exported(PathBuf),
    Failed(ExportError),
    /// The operator's terminal went away mid-prompt
    Aborted(PromptError),
}

impl fmt::Display for ExportOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportOutcome::Declined => write!(f, "Export skipped"),
            ExportOutcome::Exported(path) => write!(f, "Exported results to {}", path.display()),
            ExportOutcome::Failed(e) => write!(f, "Export failed: {}", e),
            ExportOutcome::Aborted(e) => write!(f, "Export cancelled: {}", e),
        }
    }
}

/// Runs the scan/merge/render cycle and the export handoff.
///
/// The driver owns the inventory outright; it is only mutated between a scan
/// returning and the next render.
pub struct LoopDriver<S: ScanSource> {
    source: S,
    config: DriverConfig,
    interrupt: CancellationToken,
    inventory: Inventory,
    state: LoopState,
    cycles: u64,
    failed_scans: u64,
}

impl<S: ScanSource> LoopDriver<S> {
    pub fn new(source: S, config: DriverConfig, interrupt: CancellationToken) -> Self {
        log::debug!("[driver] new: source={} interval={}ms scan_timeout={}ms signal_floor={}",
            source.name(), config.interval.as_millis(), config.scan_timeout.as_millis(), config.signal_floor);

        Self {
            source,
            config,
            interrupt,
            inventory: Inventory::new(),
            state: LoopState::Waiting,
            cycles: 0,
            failed_scans: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Completed scan/merge cycles
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn failed_scans(&self) -> u64 {
        self.failed_scans
    }

    /// Cycle until the interrupt token is cancelled, leaving the driver in
    /// `Terminating`.
    ///
    /// The interrupt is honoured while scanning, right after a merge, and
    /// while waiting. A scan in flight is dropped; a merge always completes.
    /// A scan that outlives `scan_timeout` is dropped and counted as failed.
    pub async fn run<R: RenderSink>(&mut self, sink: &mut R) {
        log::info!("[driver] run: source={}", self.source.name());

        if let Err(e) = sink.present_placeholder(SCANNING_MESSAGE) {
            log::warn!("[driver] render_failed: error={}", e);
        }

        while !self.interrupt.is_cancelled() {
            self.transition(LoopState::Scanning);
            let scan_start = Instant::now();

            let scanned = {
                let scan_timeout = self.config.scan_timeout;
                let scan = tokio::time::timeout(scan_timeout, self.source.scan(scan_timeout));
                tokio::pin!(scan);
                let mut spinner = tokio::time::interval_at(tokio::time::Instant::now() + SPINNER_TICK, SPINNER_TICK);

                loop {
                    tokio::select! {
                        biased;
                        _ = self.interrupt.cancelled() => break None,
                        // Sources are not trusted to honour their own timeout
                        result = &mut scan => break Some(result.unwrap_or(Err(ScanError::Timeout(scan_timeout)))),
                        _ = spinner.tick(), if self.cycles == 0 => {
                            if let Err(e) = sink.present_placeholder(SCANNING_MESSAGE) {
                                log::warn!("[driver] render_failed: error={}", e);
                            }
                        }
                    }
                }
            };
            let Some(result) = scanned else {
                log::debug!("[driver] scan_abandoned: elapsed={}ms", scan_start.elapsed().as_millis());
                break;
            };

            self.transition(LoopState::Merging);
            let snapshot = self.recover(result);
            self.merge(snapshot);

            if self.interrupt.is_cancelled() {
                break;
            }

            self.transition(LoopState::Rendering);
            let table = table::render(&self.inventory).with_caption(self.caption());
            if let Err(e) = sink.present(&table) {
                log::warn!("[driver] render_failed: error={}", e);
            }

            self.transition(LoopState::Waiting);
            tokio::select! {
                biased;
                _ = self.interrupt.cancelled() => {}
                _ = tokio::time::sleep(self.config.interval) => {}
            }
        }

        self.transition(LoopState::Terminating);
        log::info!("[driver] run_completed: cycles={} failed_scans={} networks={}",
            self.cycles, self.failed_scans, self.inventory.len());
    }

    /// Ask whether to export, export if asked to, and move to `Exited`
    pub fn finish<P: Prompter>(&mut self, prompter: &mut P) -> ExportOutcome {
        if self.state != LoopState::Terminating {
            self.transition(LoopState::Terminating);
        }
        self.transition(LoopState::ExportPrompt);

        let outcome = match ask_export(prompter) {
            Ok(Some((format, destination))) => match export::export(&self.inventory, &format, &destination) {
                Ok(path) => ExportOutcome::Exported(path),
                Err(e) => ExportOutcome::Failed(e),
            },
            Ok(None) => ExportOutcome::Declined,
            Err(e) => ExportOutcome::Aborted(e),
        };

        log::info!("[driver] export_outcome: {}", outcome);
        self.transition(LoopState::Exited);
        outcome
    }

    /// A failed scan counts as an empty snapshot
    fn recover(&mut self, result: Result<Vec<RawObservation>, ScanError>) -> Vec<RawObservation> {
        match result {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.failed_scans += 1;
                log::warn!("[driver] scan_unavailable: source={} failed_scans={} error={}",
                    self.source.name(), self.failed_scans, e);
                Vec::new()
            }
        }
    }

    fn merge(&mut self, snapshot: Vec<RawObservation>) {
        let observed = snapshot.len();
        let stats = self
            .inventory
            .merge(snapshot.into_iter().map(normalize), self.config.signal_floor);
        self.cycles += 1;

        log::debug!("[driver] cycle_merged: cycle={} observed={} inserted={} updated={} suppressed={}",
            self.cycles, observed, stats.inserted, stats.updated, stats.suppressed);
    }

    fn caption(&self) -> String {
        format!("Cycle {} | {} networks | floor {} dBm",
            self.cycles, self.inventory.len(), self.config.signal_floor)
    }

    fn transition(&mut self, next: LoopState) {
        if !self.state.can_transition_to(next) {
            log::error!("[driver] invalid_transition: from={:?} to={:?}", self.state, next);
            debug_assert!(false, "invalid loop transition {:?} -> {:?}", self.state, next);
        }

        log::trace!("[driver] transition: {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

fn ask_export<P: Prompter>(prompter: &mut P) -> Result<Option<(String, String)>, PromptError> {
    let answer = prompter.prompt_choice(EXPORT_CONFIRM_LABEL, &EXPORT_CONFIRM_OPTIONS)?;
    if !answer.trim().eq_ignore_ascii_case("y") {
        return Ok(None);
    }

    let labels = ExportFormat::ALL.map(|format| format.label());
    let format = prompter.prompt_choice(EXPORT_FORMAT_LABEL, &labels)?;
    let destination = prompter.prompt_text(EXPORT_FILENAME_LABEL)?;

    Ok(Some((format, destination)))
}
