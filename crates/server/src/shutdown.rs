//! Graceful shutdown on Ctrl-C, SIGTERM or a `quit` line on stdin.
//!
//! Stdin is read on a plain OS thread. A blocking read there cannot hold up
//! runtime teardown, so the process exits as soon as the server has drained.

use std::io::{self, BufRead, BufReader};
use std::thread;

use tokio::sync::oneshot;
use tracing::{info, warn};

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "could not listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };
    let quit = wait_for_quit(spawn_command_reader(BufReader::new(io::stdin())));

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl-C, shutting down"),
        _ = terminate() => info!("received SIGTERM, shutting down"),
        _ = quit => info!("quit requested, shutting down"),
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            warn!(error = %e, "could not listen for SIGTERM");
            std::future::pending::<()>().await
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await
}

/// Reads commands until `quit` or end of input.
///
/// Returns `true` when `quit` was seen.
fn read_commands<R: BufRead>(reader: R) -> bool {
    for line in reader.lines() {
        match line {
            Ok(line) => match line.trim() {
                "quit" => return true,
                "" => {}
                other => warn!(command = other, "command not supported"),
            },
            Err(e) => {
                warn!(error = %e, "stopped reading commands");
                break;
            }
        }
    }
    false
}

/// Watches `reader` on a detached thread.
///
/// The receiver gets a value on `quit`. It sees the sender dropped once the
/// input ends without one.
fn spawn_command_reader<R: BufRead + Send + 'static>(reader: R) -> oneshot::Receiver<()> {
    let (tx, rx) = oneshot::channel();

    let spawned = thread::Builder::new().name("stdin-commands".into()).spawn(move || {
        if read_commands(reader) {
            let _ = tx.send(());
        }
    });
    if let Err(e) = spawned {
        warn!(error = %e, "could not start the command reader");
    }

    rx
}

/// Resolves once `quit` arrives. Closed input never resolves, so a server
/// started without a terminal keeps running until it gets a signal.
async fn wait_for_quit(quit: oneshot::Receiver<()>) {
    if quit.await.is_err() {
        std::future::pending::<()>().await
    }
}
