//! Example of using the rotating file logger
//!
//! Run with: cargo run --example rotating_logger

use std::sync::Arc;
use std::thread;
use std::time::Duration;
use trion::{init_diagnostics, RotatingFileLogger};

fn main() {
    // Failures inside the logger show up on stderr
    init_diagnostics(Some("warn"), None);

    let logger = Arc::new(
        RotatingFileLogger::builder()
            .with_path("example_logs/example.log")
            .with_max_size(4 * 1024) // Rotate at 4KB (small for demo)
            .with_max_backups(5)
            .with_console_echo(true)
            .build(),
    );

    logger.info("Starting rotating logger example");
    logger.warning("This is a warning message");
    logger.debug("Debug information here");

    let err = std::fs::read("example_logs/does-not-exist").unwrap_err();
    logger.error_with("This is an error report (not a real error!)", &err);

    // Several threads writing at once; every entry lands on its own line
    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..50 {
                    logger.info(format!("worker {worker} entry {i}: The quick brown fox jumps over the lazy dog"));
                    thread::sleep(Duration::from_millis(5));
                }
            })
        })
        .collect();

    for worker in workers {
        let _ = worker.join();
    }

    logger.set_console_echo(false);
    for file in logger.log_files() {
        println!("{} ({} bytes)", file.path.display(), file.size);
    }
}
