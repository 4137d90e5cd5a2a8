use eyre::{Result, WrapErr};
use tokio_util::sync::CancellationToken;
use wifiscan::{
    cli, init_logging, init_terminal, restore_terminal, shutdown, tui, DialoguerPrompter, ExportOutcome, IwScanner,
    LoopDriver, TuiSink,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::parse();

    // Initialize logging first
    if let Err(e) = init_logging(args.verbose) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    // Add a gigantic divider to separate runs
    log::info!("================================================================================");
    log::info!("NEW WIFISCAN SESSION STARTING");
    log::info!("================================================================================");

    let interrupt = CancellationToken::new();
    let signal_watcher = shutdown::spawn_signal_watcher(interrupt.clone());

    let scanner = IwScanner::new(args.interface.clone(), args.settle());
    let mut driver = LoopDriver::new(scanner, args.driver_config(), interrupt.clone());

    let terminal = init_terminal().wrap_err("failed to initialize terminal")?;
    let key_watcher = tui::spawn_key_watcher(interrupt.clone());
    let mut sink = TuiSink::new(terminal, !args.no_banner);

    driver.run(&mut sink).await;

    // Stop both watchers so nothing else reads stdin during the prompt
    interrupt.cancel();
    if let Err(e) = key_watcher.await {
        log::warn!("[main] key_watcher_join_failed: error={}", e);
    }
    if let Err(e) = signal_watcher.await {
        log::warn!("[main] signal_watcher_join_failed: error={}", e);
    }

    let mut terminal = sink.into_terminal();
    restore_terminal(&mut terminal).wrap_err("failed to restore terminal")?;

    println!("\nExiting Wi-Fi scanner. Goodbye!\n");
    println!("Networks seen: {}", driver.inventory().len());

    let mut prompter = DialoguerPrompter::new();
    match driver.finish(&mut prompter) {
        ExportOutcome::Declined => {}
        outcome @ ExportOutcome::Exported(_) => println!("{}", outcome),
        outcome => eprintln!("{}", outcome),
    }

    log::info!("[main] exited: cycles={} networks={}", driver.cycles(), driver.inventory().len());
    Ok(())
}
