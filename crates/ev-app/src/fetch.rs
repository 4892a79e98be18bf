//! Background fetches that supersede each other.
//!
//! Every request belongs to a [`QueryKind`]. Issuing a new request of a kind
//! cancels the one in flight and bumps that kind's generation; only
//! completions carrying the current generation are handed back, so a slow
//! response for an old city or time can never overwrite a newer one.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::thread;
use std::time::{Duration, Instant as WallClock};

use ev_api::{ApiResult, Backend, City};
use ev_core::time::to_wire;
use ev_core::{CityId, Instant, RegionQuery, StationMarker, TimeRange};

use crate::query::{ChartData, ChartKind, fetch_chart};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Locations,
    /// City and custom-region marker requests supersede each other.
    Markers,
    Chart(ChartKind),
}

#[derive(Clone, Debug, PartialEq)]
pub enum FetchRequest {
    Locations,
    MarkersByCity { city: CityId, at: Instant },
    MarkersInRegion { at: Instant, region: RegionQuery },
    Chart { kind: ChartKind, city: CityId, range: TimeRange },
}

/// What a request is about: its kind plus the location/region and time it
/// was issued for.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RequestSignature {
    pub kind: QueryKind,
    pub scope: String,
    pub time: String,
}

impl FetchRequest {
    pub fn kind(&self) -> QueryKind {
        match self {
            FetchRequest::Locations => QueryKind::Locations,
            FetchRequest::MarkersByCity { .. } | FetchRequest::MarkersInRegion { .. } => {
                QueryKind::Markers
            }
            FetchRequest::Chart { kind, .. } => QueryKind::Chart(*kind),
        }
    }

    pub fn signature(&self) -> RequestSignature {
        let (scope, time) = match self {
            FetchRequest::Locations => (String::new(), String::new()),
            FetchRequest::MarkersByCity { city, at } => {
                (format!("city:{}", city.as_str()), to_wire(*at))
            }
            FetchRequest::MarkersInRegion { at, region } => (
                format!("region:{}:{}", region.location1, region.location2),
                to_wire(*at),
            ),
            FetchRequest::Chart { kind, city, range } => {
                let scope = if kind.is_city_scoped() {
                    format!("city:{}", city.as_str())
                } else {
                    String::new()
                };
                (scope, format!("{}/{}", to_wire(range.start), to_wire(range.end)))
            }
        };
        RequestSignature {
            kind: self.kind(),
            scope,
            time,
        }
    }

    pub(crate) fn execute<B: Backend + ?Sized>(&self, backend: &B) -> ApiResult<FetchOutput> {
        Ok(match self {
            FetchRequest::Locations => FetchOutput::Locations(backend.cities()?),
            FetchRequest::MarkersByCity { city, at } => {
                FetchOutput::Markers(backend.markers_by_city(city, *at)?)
            }
            FetchRequest::MarkersInRegion { at, region } => {
                FetchOutput::Markers(backend.markers_in_region(*at, region)?)
            }
            FetchRequest::Chart { kind, city, range } => {
                FetchOutput::Chart(fetch_chart(backend, *kind, city, *range)?)
            }
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FetchOutput {
    Locations(Vec<City>),
    Markers(Vec<StationMarker>),
    Chart(ChartData),
}

/// Handle to an issued request.
#[derive(Clone, Debug)]
pub struct Ticket {
    pub signature: RequestSignature,
    pub generation: u64,
    cancelled: Arc<AtomicBool>,
}

impl Ticket {
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct Completion {
    pub signature: RequestSignature,
    pub generation: u64,
    pub result: ApiResult<FetchOutput>,
}

pub struct FetchCoordinator<B: Backend + 'static> {
    backend: Arc<B>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    generations: HashMap<QueryKind, u64>,
    in_flight: HashMap<QueryKind, Ticket>,
    dropped: u64,
}

impl<B: Backend + 'static> FetchCoordinator<B> {
    pub fn new(backend: Arc<B>) -> Self {
        let (tx, rx) = channel();
        Self {
            backend,
            tx,
            rx,
            generations: HashMap::new(),
            in_flight: HashMap::new(),
            dropped: 0,
        }
    }

    /// Start `request` on a worker thread.
    ///
    /// An identical request already in flight is reused. Any other request of
    /// the same kind is cancelled and its eventual result discarded.
    pub fn issue(&mut self, request: FetchRequest) -> Ticket {
        let signature = request.signature();
        let kind = signature.kind;

        if let Some(existing) = self.in_flight.get(&kind)
            && existing.signature == signature
            && !existing.is_cancelled()
        {
            tracing::debug!(?signature, "identical request already in flight");
            return existing.clone();
        }

        if let Some(previous) = self.in_flight.remove(&kind) {
            previous.cancelled.store(true, Ordering::SeqCst);
            tracing::debug!(
                superseded = ?previous.signature,
                by = ?signature,
                "request superseded"
            );
        }

        let generation = {
            let g = self.generations.entry(kind).or_insert(0);
            *g += 1;
            *g
        };
        let ticket = Ticket {
            signature: signature.clone(),
            generation,
            cancelled: Arc::new(AtomicBool::new(false)),
        };
        self.in_flight.insert(kind, ticket.clone());

        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        let cancelled = Arc::clone(&ticket.cancelled);
        thread::spawn(move || {
            if cancelled.load(Ordering::SeqCst) {
                return;
            }
            let result = request.execute(backend.as_ref());
            if cancelled.load(Ordering::SeqCst) {
                return;
            }
            let _ = tx.send(Completion {
                signature,
                generation,
                result,
            });
        });

        ticket
    }

    /// Cancel whatever is in flight for `kind`.
    pub fn cancel(&mut self, kind: QueryKind) {
        if let Some(ticket) = self.in_flight.remove(&kind) {
            ticket.cancelled.store(true, Ordering::SeqCst);
        }
    }

    pub fn is_current(&self, completion: &Completion) -> bool {
        self.in_flight
            .get(&completion.signature.kind)
            .is_some_and(|t| t.generation == completion.generation)
    }

    pub fn pending(&self) -> usize {
        self.in_flight.len()
    }

    /// Number of stale completions discarded so far.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    fn accept(&mut self, completion: Completion) -> Option<Completion> {
        if self.is_current(&completion) {
            self.in_flight.remove(&completion.signature.kind);
            Some(completion)
        } else {
            self.dropped += 1;
            tracing::warn!(
                signature = ?completion.signature,
                generation = completion.generation,
                "dropping superseded response"
            );
            None
        }
    }

    /// Current completions that have already arrived.
    pub fn drain(&mut self) -> Vec<Completion> {
        let mut out = Vec::new();
        while let Ok(c) = self.rx.try_recv() {
            if let Some(c) = self.accept(c) {
                out.push(c);
            }
        }
        out
    }

    /// Block until a current completion arrives, nothing is pending, or
    /// `timeout` elapses.
    pub fn wait(&mut self, timeout: Duration) -> Option<Completion> {
        let deadline = WallClock::now() + timeout;
        while !self.in_flight.is_empty() {
            let left = deadline.saturating_duration_since(WallClock::now());
            match self.rx.recv_timeout(left) {
                Ok(c) => {
                    if let Some(c) = self.accept(c) {
                        return Some(c);
                    }
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return None;
                }
            }
        }
        None
    }

    /// Wait for every pending request, returning the current completions.
    pub fn wait_all(&mut self, timeout: Duration) -> Vec<Completion> {
        let deadline = WallClock::now() + timeout;
        let mut out = Vec::new();
        while let Some(c) = self.wait(deadline.saturating_duration_since(WallClock::now())) {
            out.push(c);
        }
        out
    }
}
