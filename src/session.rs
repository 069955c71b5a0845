// file: src/session.rs
// description: asynchronous submit and completion cycle shared by the front ends
// reference: https://docs.rs/tokio/latest/tokio/sync/mpsc

use crate::composer::QueryComposer;
use crate::error::{QueryError, Result};
use crate::launcher::{LaunchTarget, Launcher};
use crate::models::{QueryRequest, QueryResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Progress of a submitted request, in the order they are sent.
#[derive(Debug)]
pub enum SessionEvent {
    Composed { seq: u64, result: QueryResult },
    Launched { seq: u64, target: LaunchTarget },
    Failed { seq: u64, error: QueryError },
    /// A newer request was issued before this one composed; nothing is opened.
    Superseded { seq: u64 },
}

impl SessionEvent {
    pub fn seq(&self) -> u64 {
        match self {
            SessionEvent::Composed { seq, .. }
            | SessionEvent::Launched { seq, .. }
            | SessionEvent::Failed { seq, .. }
            | SessionEvent::Superseded { seq } => *seq,
        }
    }

    /// True once nothing more will arrive for this request.
    pub fn is_final(&self) -> bool {
        !matches!(self, SessionEvent::Composed { .. })
    }
}

#[derive(Debug, Clone)]
pub struct Outcome {
    pub result: QueryResult,
    pub target: LaunchTarget,
    pub opened: bool,
}

struct SessionInner {
    composer: QueryComposer,
    launcher: Launcher,
    in_flight: AtomicBool,
    latest: AtomicU64,
}

/// Clears the in-flight flag however the request ends.
struct InFlightGuard {
    inner: Arc<SessionInner>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.inner.in_flight.store(false, Ordering::SeqCst);
    }
}

#[derive(Clone)]
pub struct SearchSession {
    inner: Arc<SessionInner>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl SearchSession {
    pub fn new(
        composer: QueryComposer,
        launcher: Launcher,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let inner = Arc::new(SessionInner {
            composer,
            launcher,
            in_flight: AtomicBool::new(false),
            latest: AtomicU64::new(0),
        });

        (Self { inner, events }, receiver)
    }

    pub fn is_busy(&self) -> bool {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    pub fn launcher(&self) -> &Launcher {
        &self.inner.launcher
    }

    /// Starts a compose-then-launch task and returns its sequence number.
    ///
    /// Empty input fails with `InvalidInput` and a submission while another
    /// request is outstanding fails with `Busy`; neither spawns anything.
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, raw_text: &str) -> Result<u64> {
        let request = QueryRequest::new(raw_text)?;
        let guard = self.acquire()?;
        let seq = self.inner.latest.fetch_add(1, Ordering::SeqCst) + 1;

        info!(seq, request_id = %request.id, "Submitting search request");

        let inner = Arc::clone(&self.inner);
        let events = self.events.clone();
        tokio::spawn(async move {
            run_request(inner, guard, seq, request, events).await;
        });

        Ok(seq)
    }

    /// Awaited variant for one-shot use; `open` false resolves the target without launching.
    pub async fn compose_and_launch(&self, raw_text: &str, open: bool) -> Result<Outcome> {
        let request = QueryRequest::new(raw_text)?;
        let guard = self.acquire()?;
        self.inner.latest.fetch_add(1, Ordering::SeqCst);

        let result = self.inner.composer.compose_request(&request).await?;
        drop(guard);

        let target = if open {
            self.inner.launcher.launch(&result.refined_query).await?
        } else {
            self.inner.launcher.target(&result.refined_query)?
        };

        Ok(Outcome {
            result,
            target,
            opened: open,
        })
    }

    fn acquire(&self) -> Result<InFlightGuard> {
        self.inner
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| QueryError::Busy)?;

        Ok(InFlightGuard {
            inner: Arc::clone(&self.inner),
        })
    }
}

async fn run_request(
    inner: Arc<SessionInner>,
    guard: InFlightGuard,
    seq: u64,
    request: QueryRequest,
    events: mpsc::UnboundedSender<SessionEvent>,
) {
    let is_latest = || inner.latest.load(Ordering::SeqCst) == seq;

    let result = match inner.composer.compose_request(&request).await {
        Ok(result) => result,
        Err(err) => {
            error!(seq, "Compose failed: {}", err);
            drop(guard);
            let _ = events.send(SessionEvent::Failed { seq, error: err });
            return;
        }
    };

    // Cleared before launching, the opener may run for as long as the browser does.
    drop(guard);

    if !is_latest() {
        warn!(seq, "Discarding response for superseded request");
        let _ = events.send(SessionEvent::Superseded { seq });
        return;
    }

    let refined_query = result.refined_query.clone();
    let _ = events.send(SessionEvent::Composed { seq, result });

    let launched = inner.launcher.launch(&refined_query).await;

    let event = match launched {
        Ok(target) => SessionEvent::Launched { seq, target },
        Err(err) => {
            error!(seq, "Launch failed: {}", err);
            SessionEvent::Failed { seq, error: err }
        }
    };
    let _ = events.send(event);
}
