use parking_lot::Mutex;
use plantmap_types::ViewportBounds;
use tokio::sync::watch;

use super::report::FetchOutcome;

/// Issues monotonic ids for the requests of one resource, lets in-flight requests learn that
/// they were superseded and lets other callers wait for the result of a running request.
#[derive(Debug)]
pub(super) struct RequestTracker {
    latest: watch::Sender<u64>,
    in_flight: Mutex<Option<(u64, ViewportBounds)>>,
    finished: watch::Sender<Option<(u64, FetchOutcome)>>,
}

impl RequestTracker {
    pub(super) fn new() -> Self {
        Self {
            latest: watch::channel(0).0,
            in_flight: Mutex::new(None),
            finished: watch::channel(None).0,
        }
    }

    /// Registers a new request for the bounds. Every request issued before it becomes stale.
    pub(super) fn issue(&self, bounds: ViewportBounds) -> u64 {
        self.latest.send_modify(|id| *id += 1);
        let id = *self.latest.borrow();
        *self.in_flight.lock() = Some((id, bounds));
        id
    }

    pub(super) fn is_latest(&self, id: u64) -> bool {
        *self.latest.borrow() == id
    }

    /// Id of the running request for exactly these bounds, if it is still the latest one.
    pub(super) fn pending_for(&self, bounds: &ViewportBounds) -> Option<u64> {
        match *self.in_flight.lock() {
            Some((id, pending)) if pending == *bounds && self.is_latest(id) => Some(id),
            _ => None,
        }
    }

    /// Records the outcome of the request. Outcomes of requests older than the last recorded one
    /// are dropped.
    pub(super) fn finish(&self, id: u64, outcome: &FetchOutcome) {
        {
            let mut in_flight = self.in_flight.lock();
            if matches!(*in_flight, Some((pending, _)) if pending == id) {
                *in_flight = None;
            }
        }

        self.finished.send_if_modified(|finished| match finished {
            Some((done, _)) if *done > id => false,
            _ => {
                *finished = Some((id, outcome.clone()));
                true
            }
        });
    }

    /// Completes once a request newer than `id` is issued.
    pub(super) async fn superseded(&self, id: u64) {
        let mut receiver = self.latest.subscribe();
        if receiver.wait_for(|latest| *latest != id).await.is_err() {
            std::future::pending::<()>().await;
        }
    }

    /// Waits until the request finishes and returns its outcome. A request that is superseded
    /// before it finishes yields [`FetchOutcome::Superseded`].
    pub(super) async fn outcome_of(&self, id: u64) -> FetchOutcome {
        let mut finished = self.finished.subscribe();
        tokio::select! {
            result = finished.wait_for(|finished| matches!(finished, Some((done, _)) if *done >= id)) => {
                match result.as_deref() {
                    Ok(Some((done, outcome))) if *done == id => outcome.clone(),
                    _ => FetchOutcome::Superseded,
                }
            }
            _ = self.superseded(id) => FetchOutcome::Superseded,
        }
    }
}
