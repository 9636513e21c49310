//! # Flowbal: Mass-Balance Propagation for Small Flowsheets
//!
//! A minimal process-flowsheet model: named streams carrying a scalar mass
//! flow, connected through devices that consume input streams and compute
//! output streams. Devices track a `calculated` flag and refuse to re-solve
//! themselves without an explicit reset, so an accidental recycle is caught
//! before it corrupts results.
//!
//! ## Example
//!
//! ```
//! use flowbal::{Device, Mixer, Reactor, StreamRegistry};
//!
//! // Create a registry to manage shared stream state
//! let streams = StreamRegistry::new();
//! let feed_a = streams.create(); // "s1"
//! let feed_b = streams.create(); // "s2"
//! let mixed = streams.create();  // "s3"
//! let product = streams.create();
//!
//! feed_a.set_mass_flow(10.0);
//! feed_b.set_mass_flow(5.0);
//!
//! // Mixer combines both feeds into the mixed stream
//! let mut mixer = Mixer::new(2);
//! mixer.add_input(feed_a)?;
//! mixer.add_input(feed_b)?;
//! mixer.add_output(mixed.clone())?;
//! mixer.update_outputs()?;
//! assert_eq!(mixed.mass_flow(), 15.0);
//!
//! // The mixed stream doubles as the reactor feed: the handle is shared
//! let mut reactor = Reactor::new(false);
//! reactor.add_input(mixed)?;
//! reactor.add_output(product.clone())?;
//! reactor.update_outputs()?;
//! assert_eq!(product.mass_flow(), 15.0);
//! # Ok::<(), flowbal::DeviceError>(())
//! ```
//!
//! Re-running a solved device without resetting it is refused:
//!
//! ```
//! use flowbal::{Device, DeviceError, Reactor, StreamRegistry};
//!
//! let streams = StreamRegistry::new();
//! let mut reactor = Reactor::new(false);
//! reactor.add_input(streams.create())?;
//! reactor.add_output(streams.create())?;
//! reactor.update_outputs()?;
//!
//! assert!(matches!(reactor.update_outputs(), Err(DeviceError::Recycle { .. })));
//!
//! // An explicit reset is the only path back
//! reactor.set_calculated(false);
//! reactor.update_outputs()?;
//! # Ok::<(), flowbal::DeviceError>(())
//! ```
//!
//! The crate does no graph traversal or scheduling of its own: the caller
//! decides which devices to construct, how to wire them, and in what order
//! to call [`Device::update_outputs`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub mod devices;

pub use devices::{
    Device, DeviceError, DeviceResult, DeviceType, Mixer, PortKind, Ports, Precondition, Reactor,
};

/// Unique identifier for a stream in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamId(pub usize);

impl StreamId {
    /// Gets the index value.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Central registry for stream state.
///
/// Streams need shared state so that one stream can simultaneously be the
/// output of one device and the input of another: both devices hold handles
/// to the same slot, and a mass flow written by the upstream device is read
/// by the downstream one. The registry also owns stream naming, replacing a
/// process-wide counter with an explicit, injectable value.
///
/// # Examples
///
/// ```
/// use flowbal::StreamRegistry;
///
/// let streams = StreamRegistry::new();
/// let feed = streams.create();
/// assert_eq!(feed.name(), "s1");
///
/// // A clone of the handle aliases the same slot
/// let same_feed = feed.clone();
/// feed.set_mass_flow(42.0);
/// assert_eq!(same_feed.mass_flow(), 42.0);
/// ```
#[derive(Debug, Clone)]
pub struct StreamRegistry {
    /// Storage for all mass-flow values
    flows: Rc<RefCell<Vec<f64>>>,
    /// Display names, parallel to `flows`
    names: Rc<RefCell<Vec<String>>>,
}

impl StreamRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        StreamRegistry {
            flows: Rc::new(RefCell::new(Vec::new())),
            names: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Registers a new stream slot and returns its ID.
    fn register(&self, name: String, mass_flow: f64) -> StreamId {
        let mut flows = self.flows.borrow_mut();
        let mut names = self.names.borrow_mut();
        let id = StreamId(flows.len());
        flows.push(mass_flow);
        names.push(name);
        id
    }

    /// Creates a new stream with the next sequential name.
    ///
    /// Names are 1-based: the first stream created is `s1`. Mass flow
    /// starts at zero.
    pub fn create(&self) -> Stream {
        let ordinal = self.flows.borrow().len() + 1;
        let id = self.register(format!("s{}", ordinal), 0.0);
        Stream { id, registry: self.clone() }
    }

    /// Creates a new stream with an explicit name.
    pub fn create_named(&self, name: &str) -> Stream {
        let id = self.register(name.to_string(), 0.0);
        Stream { id, registry: self.clone() }
    }

    /// Gets the current mass flow of a stream.
    pub fn get(&self, id: StreamId) -> f64 {
        self.flows.borrow()[id.0]
    }

    /// Sets the mass flow of a stream.
    pub fn set(&self, id: StreamId, mass_flow: f64) {
        self.flows.borrow_mut()[id.0] = mass_flow;
    }

    /// Gets the display name of a stream.
    pub fn name(&self, id: StreamId) -> String {
        self.names.borrow()[id.0].clone()
    }

    /// Renames a stream.
    pub fn set_name(&self, id: StreamId, name: &str) {
        self.names.borrow_mut()[id.0] = name.to_string();
    }

    /// Returns the total number of streams.
    pub fn len(&self) -> usize {
        self.flows.borrow().len()
    }

    /// Returns whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.flows.borrow().is_empty()
    }
}

impl Default for StreamRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A named carrier for one scalar mass-flow value.
///
/// `Stream` is a cheap-to-clone handle: clones alias the same underlying
/// slot, which is how a stream connects two devices. Devices never create
/// streams; the caller creates them (through a [`StreamRegistry`] or
/// [`Stream::new`]) and attaches them to whichever devices need them.
///
/// Mass flow accepts any `f64`, negative values included. The model layer
/// imposes no sign convention.
///
/// # Examples
///
/// ```
/// use flowbal::StreamRegistry;
///
/// let streams = StreamRegistry::new();
/// let feed = streams.create();
/// feed.set_mass_flow(10.0);
///
/// assert_eq!(feed.name(), "s1");
/// assert_eq!(feed.mass_flow(), 10.0);
/// assert_eq!(feed.to_string(), "Stream s1 flow = 10");
/// ```
#[derive(Debug, Clone)]
pub struct Stream {
    /// Index into the stream registry
    id: StreamId,
    /// Reference to the shared registry
    registry: StreamRegistry,
}

impl Stream {
    /// Creates a standalone stream named from a caller-supplied sequence
    /// number (`7` becomes `"s7"`).
    ///
    /// The stream lives in its own single-slot registry. Prefer
    /// [`StreamRegistry::create`] when several streams belong to one
    /// flowsheet; this constructor exists for quick, isolated use.
    pub fn new(seq: usize) -> Self {
        let registry = StreamRegistry::new();
        let id = registry.register(format!("s{}", seq), 0.0);
        Stream { id, registry }
    }

    /// Gets the stream's ID.
    pub fn id(&self) -> StreamId {
        self.id
    }

    /// Gets the display name.
    pub fn name(&self) -> String {
        self.registry.name(self.id)
    }

    /// Assigns a new display name.
    pub fn set_name(&self, name: &str) {
        self.registry.set_name(self.id, name);
    }

    /// Gets the current mass flow.
    pub fn mass_flow(&self) -> f64 {
        self.registry.get(self.id)
    }

    /// Sets the mass flow.
    pub fn set_mass_flow(&self, mass_flow: f64) {
        self.registry.set(self.id, mass_flow);
    }

    /// Gets a reference to the registry this stream belongs to.
    pub fn registry(&self) -> &StreamRegistry {
        &self.registry
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stream {} flow = {}", self.name(), self.mass_flow())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_sequential_names() {
        let streams = StreamRegistry::new();
        let s1 = streams.create();
        let s2 = streams.create();
        let s3 = streams.create();

        assert_eq!(s1.name(), "s1");
        assert_eq!(s2.name(), "s2");
        assert_eq!(s3.name(), "s3");
        assert_eq!(streams.len(), 3);
    }

    #[test]
    fn test_registry_named_stream() {
        let streams = StreamRegistry::new();
        let feed = streams.create_named("fresh_feed");

        assert_eq!(feed.name(), "fresh_feed");
        assert_eq!(feed.mass_flow(), 0.0);
    }

    #[test]
    fn test_clone_aliases_same_slot() {
        let streams = StreamRegistry::new();
        let original = streams.create();
        let alias = original.clone();

        original.set_mass_flow(12.5);
        assert_eq!(alias.mass_flow(), 12.5);

        alias.set_mass_flow(-3.0); // no sign convention
        assert_eq!(original.mass_flow(), -3.0);
    }

    #[test]
    fn test_standalone_stream() {
        let stream = Stream::new(7);
        assert_eq!(stream.name(), "s7");

        stream.set_mass_flow(100.0);
        assert_eq!(stream.mass_flow(), 100.0);
        assert_eq!(stream.registry().len(), 1);
    }

    #[test]
    fn test_rename() {
        let stream = Stream::new(1);
        stream.set_name("recycle");
        assert_eq!(stream.name(), "recycle");
    }

    #[test]
    fn test_display_matches_report_line() {
        let stream = Stream::new(2);
        stream.set_mass_flow(15.0);
        assert_eq!(stream.to_string(), "Stream s2 flow = 15");
    }
}
