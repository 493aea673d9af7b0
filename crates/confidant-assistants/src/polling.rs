use std::time::{Duration, Instant};

use crate::error::{AssistantsError, Result};
use crate::traits::AssistantsClient;
use crate::types::{Run, RunStatus};

/// How often and how long to poll a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
    /// Wall-clock limit on the whole wait, status checks included
    pub deadline: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            max_attempts: 240,
            deadline: None,
        }
    }
}

impl PollConfig {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Upper bound on the whole wait
    pub fn max_wait(&self) -> Duration {
        let sleeping = self.interval * self.max_attempts;
        match self.deadline {
            Some(deadline) => sleeping.min(deadline),
            None => sleeping,
        }
    }

    fn remaining(&self, elapsed: Duration) -> Duration {
        match self.deadline {
            Some(deadline) => deadline.saturating_sub(elapsed),
            None => Duration::MAX,
        }
    }
}

/// Poll a run until it leaves the pending statuses
///
/// Returns the run in whatever terminal status it reached. A run that stops
/// in `requires_action` is cancelled (best effort) since no tool outputs will
/// ever be submitted for it. When the attempt budget or the deadline runs out,
/// a cancel is requested as well and [`AssistantsError::RunTimedOut`] is
/// returned.
pub async fn wait_on_run(
    client: &dyn AssistantsClient,
    run: Run,
    config: &PollConfig,
) -> Result<Run> {
    let started = Instant::now();
    let mut run = run;
    let mut attempts = 0u32;

    while run.status.is_pending() {
        let remaining = config.remaining(started.elapsed());
        if attempts >= config.max_attempts || remaining.is_zero() {
            return Err(give_up(client, run, attempts).await);
        }

        tokio::time::sleep(config.interval.min(remaining)).await;
        let previous = run.status;
        let checked = tokio::time::timeout(
            config.remaining(started.elapsed()),
            client.retrieve_run(&run.thread_id, &run.id),
        )
        .await;
        attempts += 1;

        run = match checked {
            Ok(result) => result?,
            Err(_) => return Err(give_up(client, run, attempts).await),
        };

        if run.status != previous {
            tracing::debug!(run_id = %run.id, from = %previous, to = %run.status, "Run status changed");
        }
    }

    if run.status == RunStatus::RequiresAction {
        tracing::warn!(run_id = %run.id, thread_id = %run.thread_id, "Run requires action, cancelling");
        cancel_quietly(client, &run).await;
    }

    Ok(run)
}

async fn give_up(client: &dyn AssistantsClient, run: Run, attempts: u32) -> AssistantsError {
    tracing::warn!(
        run_id = %run.id,
        thread_id = %run.thread_id,
        status = %run.status,
        attempts,
        "Run did not finish in time, cancelling"
    );
    cancel_quietly(client, &run).await;
    AssistantsError::RunTimedOut {
        run_id: run.id,
        attempts,
    }
}

async fn cancel_quietly(client: &dyn AssistantsClient, run: &Run) {
    if let Err(e) = client.cancel_run(&run.thread_id, &run.id).await {
        tracing::warn!(run_id = %run.id, "Failed to cancel run: {}", e);
    }
}

/// Turn any terminal status other than `completed` into an error
pub fn ensure_completed(run: Run) -> Result<Run> {
    if run.status.is_completed() {
        return Ok(run);
    }

    tracing::warn!(run_id = %run.id, status = %run.status, "Run did not complete");
    Err(AssistantsError::RunIncomplete {
        reason: run.last_error.map(|e| e.message),
        run_id: run.id,
        status: run.status,
    })
}
