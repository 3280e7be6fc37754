//! # Lifecycle Trace Module
//!
//! Every lifecycle transition of a [`Vector3D`](crate::vector::Vector3D)
//! (construction, copy, move, destruction) is reported as a [`TraceRecord`]
//! to a [`TraceObserver`]. Vectors hold a [`Tracer`] handle, which owns the
//! observer and hands out [`InstanceId`]s.
//!
//! ## Observers
//!
//! - [`LogObserver`]: forwards events to the `log` facade (the default)
//! - [`ConsoleObserver`]: one human-readable line per event, stdout by default
//! - [`JsonLinesObserver`]: one JSON object per event, stdout by default
//! - [`RecordingObserver`]: keeps events in memory so tests can assert on
//!   the exact sequence
//!
//! ## Examples
//!
//! ```rust
//! use lifetrace::trace::{LifecycleEvent, Tracer};
//! use lifetrace::vector::Vector3D;
//!
//! let (tracer, recording) = Tracer::recording();
//! {
//!     let _v = Vector3D::new_in(&tracer, 1.0, 2.0, 3.0);
//! }
//! assert_eq!(
//!     recording.events(),
//!     vec![
//!         LifecycleEvent::Constructed { x: 1.0, y: 2.0, z: 3.0 },
//!         LifecycleEvent::Destroyed { coords: Some([1.0, 2.0, 3.0]) },
//!     ]
//! );
//! ```

use serde::Serialize;
use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

/// Identity of one vector instance, unique per [`Tracer`]
///
/// Ids start at 1 and increase in construction order. A moved-into vector
/// receives a fresh id; ids never travel with the storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct InstanceId(u64);

impl InstanceId {
    /// The raw numeric id
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Formats three components as `(x, y, z)`
///
/// Uses the shortest representation that round-trips, so `1.0` renders as
/// `1` and `0.6` as `0.6`.
pub fn format_coords(coords: &[f64; 3]) -> String {
    format!("({}, {}, {})", coords[0], coords[1], coords[2])
}

/// A single lifecycle transition
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// Constructed with all components zero
    DefaultConstructed,
    /// Constructed from explicit components
    Constructed { x: f64, y: f64, z: f64 },
    /// Deep-copied from another instance into fresh storage
    CopyConstructed,
    /// Components overwritten from another instance
    CopyAssigned,
    /// Constructed by taking over another instance's storage
    MoveConstructed,
    /// Storage replaced by another instance's storage
    MoveAssigned,
    /// End of life; `coords` is `None` for a moved-from instance
    Destroyed { coords: Option<[f64; 3]> },
}

impl LifecycleEvent {
    /// Short machine-friendly name of the event kind
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleEvent::DefaultConstructed => "default_constructed",
            LifecycleEvent::Constructed { .. } => "constructed",
            LifecycleEvent::CopyConstructed => "copy_constructed",
            LifecycleEvent::CopyAssigned => "copy_assigned",
            LifecycleEvent::MoveConstructed => "move_constructed",
            LifecycleEvent::MoveAssigned => "move_assigned",
            LifecycleEvent::Destroyed { .. } => "destroyed",
        }
    }

    /// True for events that bring a new instance into existence
    pub fn is_construction(&self) -> bool {
        matches!(
            self,
            LifecycleEvent::DefaultConstructed
                | LifecycleEvent::Constructed { .. }
                | LifecycleEvent::CopyConstructed
                | LifecycleEvent::MoveConstructed
        )
    }

    pub fn is_destruction(&self) -> bool {
        matches!(self, LifecycleEvent::Destroyed { .. })
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleEvent::DefaultConstructed => write!(f, "Vector3D default constructed"),
            LifecycleEvent::Constructed { x, y, z } => {
                write!(f, "Vector3D constructed {}", format_coords(&[*x, *y, *z]))
            }
            LifecycleEvent::CopyConstructed => write!(f, "Vector3D copy constructed"),
            LifecycleEvent::CopyAssigned => write!(f, "Vector3D copy assigned"),
            LifecycleEvent::MoveConstructed => write!(f, "Vector3D move constructed"),
            LifecycleEvent::MoveAssigned => write!(f, "Vector3D move assigned"),
            LifecycleEvent::Destroyed { coords: Some(c) } => {
                write!(f, "Vector3D destroyed - coordinates: {}", format_coords(c))
            }
            LifecycleEvent::Destroyed { coords: None } => {
                write!(f, "Vector3D destroyed - no coordinates (moved-from)")
            }
        }
    }
}

/// An event attributed to the instance it happened to
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TraceRecord {
    pub instance: InstanceId,
    #[serde(flatten)]
    pub event: LifecycleEvent,
}

/// Receiver of lifecycle events
///
/// Observers are shared by every vector built against the same [`Tracer`], so
/// they take `&self` and use interior mutability where they keep state.
pub trait TraceObserver {
    fn on_event(&self, record: &TraceRecord);
}

impl<O: TraceObserver + ?Sized> TraceObserver for Rc<O> {
    fn on_event(&self, record: &TraceRecord) {
        (**self).on_event(record)
    }
}

/// Forwards events to the `log` facade at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl TraceObserver for LogObserver {
    fn on_event(&self, record: &TraceRecord) {
        log::debug!("#{} {}", record.instance, record.event);
    }
}

fn write_line<W: Write>(out: &RefCell<W>, line: impl fmt::Display) {
    let mut out = out.borrow_mut();
    if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
        log::warn!("failed to write trace event: {}", e);
    }
}

/// Writes one human-readable line per event
#[derive(Debug)]
pub struct ConsoleObserver<W: Write = io::Stdout> {
    out: RefCell<W>,
}

impl ConsoleObserver {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleObserver<W> {
    pub fn new(out: W) -> Self {
        ConsoleObserver {
            out: RefCell::new(out),
        }
    }

    /// The underlying writer
    pub fn writer(&self) -> Ref<'_, W> {
        self.out.borrow()
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write> TraceObserver for ConsoleObserver<W> {
    fn on_event(&self, record: &TraceRecord) {
        write_line(&self.out, record.event);
    }
}

/// Writes one JSON object per event
///
/// Each line looks like `{"instance":1,"event":"constructed","x":1.0,"y":2.0,"z":3.0}`.
#[derive(Debug)]
pub struct JsonLinesObserver<W: Write = io::Stdout> {
    out: RefCell<W>,
}

impl JsonLinesObserver {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonLinesObserver<W> {
    pub fn new(out: W) -> Self {
        JsonLinesObserver {
            out: RefCell::new(out),
        }
    }

    /// The underlying writer
    pub fn writer(&self) -> Ref<'_, W> {
        self.out.borrow()
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write> TraceObserver for JsonLinesObserver<W> {
    fn on_event(&self, record: &TraceRecord) {
        match serde_json::to_string(record) {
            Ok(line) => write_line(&self.out, line),
            Err(e) => log::warn!("failed to serialize trace event: {}", e),
        }
    }
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingObserver {
    records: RefCell<Vec<TraceRecord>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records received so far, in order
    pub fn records(&self) -> Vec<TraceRecord> {
        self.records.borrow().clone()
    }

    /// The events received so far, without instance attribution
    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.records.borrow().iter().map(|r| r.event).collect()
    }

    /// Instances in the order they were destroyed
    pub fn destroyed_order(&self) -> Vec<InstanceId> {
        self.records
            .borrow()
            .iter()
            .filter(|r| r.event.is_destruction())
            .map(|r| r.instance)
            .collect()
    }

    /// Number of events of the given kind (see [`LifecycleEvent::name`])
    pub fn count(&self, name: &str) -> usize {
        self.records
            .borrow()
            .iter()
            .filter(|r| r.event.name() == name)
            .count()
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.records.borrow_mut().clear();
    }
}

impl TraceObserver for RecordingObserver {
    fn on_event(&self, record: &TraceRecord) {
        self.records.borrow_mut().push(*record);
    }
}

/// How the demonstration binary renders trace events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TraceFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

struct TracerInner {
    observer: Box<dyn TraceObserver>,
    next_id: Cell<u64>,
}

/// Shared handle to an observer and the instance-id counter
///
/// Cloning is cheap and every clone reports to the same observer. The handle
/// is reference counted with `Rc`, so it stays on one thread.
#[derive(Clone)]
pub struct Tracer {
    inner: Rc<TracerInner>,
}

impl Tracer {
    pub fn new(observer: impl TraceObserver + 'static) -> Self {
        Tracer {
            inner: Rc::new(TracerInner {
                observer: Box::new(observer),
                next_id: Cell::new(1),
            }),
        }
    }

    /// Tracer printing each event as a line of text on stdout
    pub fn console() -> Self {
        Self::new(ConsoleObserver::stdout())
    }

    /// Tracer printing each event as a JSON line on stdout
    pub fn json_lines() -> Self {
        Self::new(JsonLinesObserver::stdout())
    }

    /// Tracer rendering events in the given format on stdout
    pub fn for_format(format: TraceFormat) -> Self {
        match format {
            TraceFormat::Text => Self::console(),
            TraceFormat::Json => Self::json_lines(),
        }
    }

    /// Tracer recording into memory, together with the recording to inspect
    pub fn recording() -> (Self, Rc<RecordingObserver>) {
        let recording = Rc::new(RecordingObserver::new());
        (Self::new(Rc::clone(&recording)), recording)
    }

    /// Number of instance ids handed out so far
    pub fn issued(&self) -> u64 {
        self.inner.next_id.get() - 1
    }

    pub(crate) fn issue_id(&self) -> InstanceId {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        InstanceId(id)
    }

    pub(crate) fn emit(&self, instance: InstanceId, event: LifecycleEvent) {
        log::trace!("#{} {}", instance, event.name());
        self.inner
            .observer
            .on_event(&TraceRecord { instance, event });
    }
}

impl Default for Tracer {
    /// A tracer forwarding to the `log` facade
    fn default() -> Self {
        Self::new(LogObserver)
    }
}

impl fmt::Debug for Tracer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracer")
            .field("issued", &self.issued())
            .finish()
    }
}
