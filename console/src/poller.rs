use crate::app::Message;
use log::warn;
use scoreboard_common::control::ControlClient;
use std::sync::Arc;
use tokio::{
    sync::mpsc::UnboundedSender,
    task::{self, JoinHandle},
    time::{Duration, MissedTickBehavior, interval},
};

pub const DEFAULT_POLL_PERIOD: Duration = Duration::from_millis(2000);

/// Requests a fresh status snapshot on a fixed cadence and feeds it into
/// the app loop. A failed cycle is logged and skipped; the next regular
/// tick is the only retry. Each request runs in its own task so a stalled
/// one never delays the cadence.
pub struct StatusPoller {
    client: Arc<ControlClient>,
    tx: UnboundedSender<Message>,
    period: Duration,
}

impl StatusPoller {
    pub fn new(client: Arc<ControlClient>, tx: UnboundedSender<Message>, period: Duration) -> Self {
        Self { client, tx, period }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        task::spawn(self.run_loop())
    }

    async fn run_loop(self) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if self.tx.is_closed() {
                break;
            }

            let client = self.client.clone();
            let tx = self.tx.clone();
            task::spawn(async move {
                match client.get_status().await {
                    Ok(snapshot) => {
                        let _ = tx.send(Message::StatusReceived(snapshot));
                    }
                    Err(e) => warn!("Status update failed: {e}"),
                }
            });
        }
    }
}
