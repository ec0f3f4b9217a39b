use std::sync::Arc;
use std::time::Duration;

use tokio::{sync::Mutex, task::JoinHandle, time};
use tracing::{debug, info, warn};

use super::persistence::SnapshotStore;
use super::service::InterviewService;
use super::session::{Advance, TickOutcome};
use super::state::InterviewError;

/// Background countdown driving the current question once per period.
///
/// At most one countdown task exists; arming a new one aborts the previous task.
/// Each task is tagged with the question it was armed for, so a tick that lands
/// after a manual answer is rejected as stale instead of touching the next question.
pub struct QuestionTicker {
    period: Duration,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Default for QuestionTicker {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl QuestionTicker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            handle: Mutex::new(None),
        }
    }

    /// Starts counting down `question_index`, replacing any running countdown.
    pub async fn arm<S>(&self, service: Arc<InterviewService<S>>, question_index: usize)
    where
        S: SnapshotStore + 'static,
    {
        let mut guard = self.handle.lock().await;
        if let Some(handle) = guard.take() {
            handle.abort();
        }

        let period = self.period;
        let handle = tokio::spawn(async move {
            run_countdown(service, period, question_index).await;
        });
        *guard = Some(handle);
    }

    pub async fn cancel(&self) {
        if let Some(handle) = self.handle.lock().await.take() {
            handle.abort();
        }
    }

    pub async fn is_running(&self) -> bool {
        self.handle
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

async fn run_countdown<S>(service: Arc<InterviewService<S>>, period: Duration, start_index: usize)
where
    S: SnapshotStore + 'static,
{
    let mut question_index = start_index;
    let mut interval = time::interval(period);
    // first tick completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;

        match service.tick(question_index) {
            Ok(TickOutcome::Running { .. }) => continue,
            Ok(TickOutcome::Paused { .. }) => {
                debug!(question_index, "countdown stopped while paused");
                break;
            }
            Ok(TickOutcome::Expired { .. }) => match service.time_up(question_index) {
                Ok(outcome) => match outcome.next {
                    Advance::Next {
                        question_index: next,
                    } => {
                        question_index = next;
                        interval.reset();
                    }
                    Advance::Completed { final_score, .. } => {
                        info!(final_score, "countdown finished the interview");
                        break;
                    }
                },
                Err(InterviewError::Snapshot(err)) => {
                    warn!(question_index, error = %err, "time-up not saved; retrying next tick");
                }
                Err(err) => {
                    debug!(question_index, error = %err, "time-up superseded");
                    break;
                }
            },
            Err(err) => {
                debug!(question_index, error = %err, "countdown ended");
                break;
            }
        }
    }
}
