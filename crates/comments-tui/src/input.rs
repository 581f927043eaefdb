//! Terminal key reader and the switch that hands the tty to `$EDITOR`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::mpsc;

use crate::app::AppEvent;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Shared flag that stops the input task from reading the terminal.
///
/// While a child process owns the tty, every byte must reach the child; a
/// concurrent `event::read` would steal keys and replay them into the app
/// once the child exits.
#[derive(Debug, Clone, Default)]
pub struct InputGate {
    paused: Arc<AtomicBool>,
}

impl InputGate {
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Stop reading until the returned guard is dropped.
    pub fn pause(&self) -> PauseGuard {
        self.paused.store(true, Ordering::SeqCst);
        PauseGuard {
            paused: Arc::clone(&self.paused),
        }
    }
}

/// Resumes input on drop, including on early return from the editor.
#[derive(Debug)]
pub struct PauseGuard {
    paused: Arc<AtomicBool>,
}

impl Drop for PauseGuard {
    fn drop(&mut self) {
        self.paused.store(false, Ordering::SeqCst);
    }
}

/// Read key presses and emit ticks until the receiver goes away.
pub fn spawn_input_task(tx: mpsc::Sender<AppEvent>, gate: InputGate) {
    tokio::spawn(async move {
        loop {
            if gate.is_paused() {
                tokio::time::sleep(POLL_INTERVAL).await;
                continue;
            }

            // Re-check after the poll; the gate may have closed while waiting
            if event::poll(POLL_INTERVAL).unwrap_or(false) && !gate.is_paused() {
                if let Ok(Event::Key(key)) = event::read() {
                    if key.kind == KeyEventKind::Press {
                        let _ = tx.send(AppEvent::Key(key)).await;
                    }
                }
            }

            // Tick drives toast expiry and redraws
            if tx.send(AppEvent::Tick).await.is_err() {
                break;
            }
        }
    });
}

/// Empty the queue after the terminal comes back from a child process.
/// Keys that slipped through are dropped; everything else is returned in
/// arrival order so it can still be handled.
pub fn discard_queued_keys(rx: &mut mpsc::Receiver<AppEvent>) -> Vec<AppEvent> {
    let mut kept = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if !matches!(event, AppEvent::Key(_)) {
            kept.push(event);
        }
    }
    kept
}
