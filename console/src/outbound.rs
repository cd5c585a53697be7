use crate::dispatcher::CommandRequest;
use log::{error, warn};
use scoreboard_common::control::{ClientError, ControlClient};
use std::{future::Future, sync::Arc};
use tokio::{
    sync::mpsc::UnboundedReceiver,
    task::{self, JoinHandle},
    time::{Duration, sleep},
};

/// How many times a failed mutation is re-sent, and how long to wait
/// between attempts. The default preserves the device's original
/// fire-and-forget contract: no retries at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub const NONE: Self = Self {
        attempts: 0,
        backoff: Duration::ZERO,
    };

    fn total_tries(&self) -> u32 {
        self.attempts + 1
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::NONE
    }
}

/// Runs `op` until it succeeds or the policy's tries are exhausted,
/// returning the last error.
pub async fn with_retry<F, Fut>(retry: RetryPolicy, mut op: F) -> Result<(), ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), ClientError>>,
{
    let mut tries = 0;
    loop {
        tries += 1;
        match op().await {
            Ok(()) => return Ok(()),
            Err(e) if tries < retry.total_tries() => {
                warn!("Request failed on try {tries}: {e}");
                sleep(retry.backoff).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Drains queued [`CommandRequest`]s and performs the corresponding HTTP
/// calls. Exhausted requests are logged and dropped; view state is healed
/// by the next successful poll, not by this task.
pub struct OutboundSender {
    join: JoinHandle<()>,
}

impl OutboundSender {
    pub fn spawn(
        client: Arc<ControlClient>,
        rx: UnboundedReceiver<CommandRequest>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            join: task::spawn(run_loop(client, rx, retry)),
        }
    }

    /// Stops the sender task; queued requests that have not been sent are
    /// dropped. Returns once the task is fully gone.
    pub async fn shutdown(self) {
        self.join.abort();
        let _ = self.join.await;
    }
}

async fn run_loop(
    client: Arc<ControlClient>,
    mut rx: UnboundedReceiver<CommandRequest>,
    retry: RetryPolicy,
) {
    while let Some(request) = rx.recv().await {
        if let Err(e) = with_retry(retry, || perform(&client, &request)).await {
            error!("{request:?} failed: {e}");
        }
    }
}

async fn perform(client: &ControlClient, request: &CommandRequest) -> Result<(), ClientError> {
    match request {
        CommandRequest::SetScore { team, score } => client.set_score(*team, *score).await,
        CommandRequest::ResumeTimer => client.resume_timer().await,
        CommandRequest::PauseTimer => client.pause_timer().await,
        CommandRequest::SetTimer { minutes } => client.set_timer(*minutes).await,
        CommandRequest::SetMode { mode } => client.set_display_mode(*mode).await,
        CommandRequest::SetText { text } => client.set_display_text(text).await,
        CommandRequest::SetPower { enabled } => client.set_display_power(*enabled).await,
        CommandRequest::SetBrightness { brightness } => client.set_brightness(*brightness).await,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use reqwest::StatusCode;
    use std::{cell::Cell, rc::Rc};

    fn failing(calls: Rc<Cell<u32>>) -> impl FnMut() -> std::future::Ready<Result<(), ClientError>>
    {
        move || {
            calls.set(calls.get() + 1);
            std::future::ready(Err(ClientError::Status(StatusCode::INTERNAL_SERVER_ERROR)))
        }
    }

    #[tokio::test]
    async fn test_default_policy_tries_once() {
        let calls = Rc::new(Cell::new(0));
        let result = with_retry(RetryPolicy::NONE, failing(calls.clone())).await;
        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_bounded_retries() {
        let calls = Rc::new(Cell::new(0));
        let policy = RetryPolicy {
            attempts: 2,
            backoff: Duration::ZERO,
        };
        let result = with_retry(policy, failing(calls.clone())).await;
        assert!(result.is_err());
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_shutdown_stops_the_sender() {
        let client = Arc::new(
            ControlClient::new("http://127.0.0.1:9", Duration::from_millis(10)).unwrap(),
        );
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let sender = OutboundSender::spawn(client, rx, RetryPolicy::NONE);

        sender.shutdown().await;
        assert!(tx.send(CommandRequest::ResumeTimer).is_err());
    }

    #[tokio::test]
    async fn test_retry_stops_on_success() {
        let calls = Rc::new(Cell::new(0));
        let policy = RetryPolicy {
            attempts: 5,
            backoff: Duration::ZERO,
        };
        let counter = calls.clone();
        let result = with_retry(policy, move || {
            counter.set(counter.get() + 1);
            std::future::ready(if counter.get() < 3 {
                Err(ClientError::Status(StatusCode::INTERNAL_SERVER_ERROR))
            } else {
                Ok(())
            })
        })
        .await;
        assert!(result.is_ok());
        assert_eq!(calls.get(), 3);
    }
}
