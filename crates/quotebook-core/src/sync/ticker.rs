//! Scheduled sync trigger
//!
//! A background task that emits a tick every interval. The owner of the
//! store receives ticks and runs the reconcile itself, so ticks and user
//! commands are handled one after another.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// Commands sent to the ticker task
#[derive(Debug)]
pub enum TickerCommand {
    /// Stop the ticker
    Shutdown,
}

/// Events from the ticker task
#[derive(Debug, PartialEq, Eq)]
pub enum TickerEvent {
    /// Time for a scheduled sync
    Tick,
}

/// Handle for controlling the ticker task
pub struct SyncTicker {
    pub command_tx: mpsc::Sender<TickerCommand>,
    pub event_rx: mpsc::Receiver<TickerEvent>,
    task: JoinHandle<()>,
}

impl SyncTicker {
    /// Stop the ticker and wait for the task to end
    pub async fn shutdown(self) {
        let _ = self.command_tx.send(TickerCommand::Shutdown).await;
        let _ = self.task.await;
    }
}

/// Spawn a ticker firing every `period`, first tick one period from now
pub fn spawn_sync_ticker(period: Duration) -> SyncTicker {
    let (command_tx, command_rx) = mpsc::channel(4);
    // A slow consumer only ever needs one pending tick
    let (event_tx, event_rx) = mpsc::channel(1);

    let task = tokio::spawn(ticker_task(period, command_rx, event_tx));

    SyncTicker {
        command_tx,
        event_rx,
        task,
    }
}

async fn ticker_task(
    period: Duration,
    mut command_rx: mpsc::Receiver<TickerCommand>,
    event_tx: mpsc::Sender<TickerEvent>,
) {
    let mut ticks = interval_at(Instant::now() + period, period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticks.tick() => {
                if event_tx.try_send(TickerEvent::Tick).is_err() && event_tx.is_closed() {
                    break;
                }
            }
            cmd = command_rx.recv() => {
                if matches!(cmd, Some(TickerCommand::Shutdown) | None) {
                    break;
                }
            }
        }
    }

    debug!("Sync ticker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ticker_emits_ticks() {
        let mut ticker = spawn_sync_ticker(Duration::from_millis(10));

        let event = tokio::time::timeout(Duration::from_secs(2), ticker.event_rx.recv())
            .await
            .unwrap();
        assert_eq!(event, Some(TickerEvent::Tick));

        ticker.shutdown().await;
    }

    #[tokio::test]
    async fn test_ticker_shutdown_closes_events() {
        let ticker = spawn_sync_ticker(Duration::from_secs(3600));
        let SyncTicker {
            command_tx,
            mut event_rx,
            task,
        } = ticker;

        command_tx.send(TickerCommand::Shutdown).await.unwrap();
        task.await.unwrap();

        assert_eq!(event_rx.recv().await, None);
    }
}
