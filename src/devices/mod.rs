//! Device capability layer: port attachment, the calculated flag, and
//! recycle detection.
//!
//! A device is a unit that consumes input streams and produces output
//! streams under a fixed capacity contract. The closed set of variants
//! lives behind the [`Device`] trait:
//!
//! - [`Mixer`]: combines N inlets into 1 outlet by flow summation
//! - [`Reactor`]: splits 1 inlet evenly across 1 or 2 outlets
//!
//! Shared state (port lists, capacities, the `calculated` flag) is held by
//! composition: each variant embeds a [`Ports`] value rather than
//! inheriting from a base class.
//!
//! # Calculation state machine
//!
//! Every [`Device::update_outputs`] implementation follows the same
//! contract:
//!
//! 1. Run the recycle check first — a device already marked calculated
//!    refuses to solve again, whatever else is wrong with it.
//! 2. Validate variant-specific preconditions.
//! 3. Compute and assign the output mass flows.
//! 4. Set `calculated = true` only after successful computation.
//!
//! A failed call never partially mutates outputs, and the flag never resets
//! on its own: [`Device::set_calculated`] with `false` is the only way to
//! legitimately re-run a solved device.

use std::fmt;

use crate::Stream;

pub mod mixer;
pub mod reactor;

pub use mixer::Mixer;
pub use reactor::Reactor;

/// Result type for device operations.
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Variant tag for the closed set of device types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    /// N inlets combined into one outlet
    Mixer,
    /// One inlet split evenly across the outlets
    Reactor,
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceType::Mixer => write!(f, "Mixer"),
            DeviceType::Reactor => write!(f, "Reactor"),
        }
    }
}

/// Which port list a capacity failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortKind {
    Input,
    Output,
}

impl fmt::Display for PortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortKind::Input => write!(f, "INPUT"),
            PortKind::Output => write!(f, "OUTPUT"),
        }
    }
}

/// Precondition violated by an `update_outputs` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// No output stream attached before the update
    MissingOutputs,
    /// No input stream attached before the update
    MissingInput,
    /// Attached outputs do not exactly match the device's output capacity
    WrongOutputCount,
}

impl fmt::Display for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precondition::MissingOutputs => write!(f, "Should set outputs before update"),
            Precondition::MissingInput => write!(f, "No input stream"),
            Precondition::WrongOutputCount => write!(f, "Wrong number of outputs"),
        }
    }
}

/// Errors signaled by device operations.
///
/// All kinds are non-fatal and surface to the immediate caller, who decides
/// whether to retry, abort the flowsheet solve, or report and continue.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    /// Attaching one more stream would exceed the device's fixed capacity.
    /// The attachment is rejected atomically; the port list is unchanged.
    #[error("{0} STREAM LIMIT")]
    CapacityExceeded(PortKind),
    /// Required inputs or outputs are missing or mismatched in count.
    /// Device state and stream values are left unchanged.
    #[error("{0}")]
    Precondition(Precondition),
    /// The device is already marked calculated. Re-solving without an
    /// explicit reset indicates a cycle in the flowsheet graph or a caller
    /// bug; the solve is refused before any output is touched.
    #[error("RECYCLE DETECTED: {device_type} has calculated output stream {stream_name}")]
    Recycle {
        /// Variant tag of the offending device
        device_type: DeviceType,
        /// Name of the first output stream found while the flag was set
        stream_name: String,
    },
}

/// Stream attachment state shared by every device variant.
///
/// Port lists keep insertion order (connection order). A capacity of zero
/// leaves the corresponding list unbounded; the concrete variants always
/// set positive capacities.
#[derive(Debug, Clone)]
pub struct Ports {
    /// Input streams, in connection order
    inputs: Vec<Stream>,
    /// Output streams, in connection order
    outputs: Vec<Stream>,
    input_capacity: usize,
    output_capacity: usize,
    /// True once an update has completed without error
    calculated: bool,
}

impl Ports {
    /// Creates an empty port set with the given capacities.
    pub fn new(input_capacity: usize, output_capacity: usize) -> Self {
        Ports {
            inputs: Vec::new(),
            outputs: Vec::new(),
            input_capacity,
            output_capacity,
            calculated: false,
        }
    }

    /// Appends an input stream, rejecting the attachment if the input
    /// capacity is already reached.
    pub fn add_input(&mut self, stream: Stream) -> DeviceResult<()> {
        if self.input_capacity > 0 && self.inputs.len() >= self.input_capacity {
            return Err(DeviceError::CapacityExceeded(PortKind::Input));
        }
        self.inputs.push(stream);
        Ok(())
    }

    /// Appends an output stream, rejecting the attachment if the output
    /// capacity is already reached.
    pub fn add_output(&mut self, stream: Stream) -> DeviceResult<()> {
        if self.output_capacity > 0 && self.outputs.len() >= self.output_capacity {
            return Err(DeviceError::CapacityExceeded(PortKind::Output));
        }
        self.outputs.push(stream);
        Ok(())
    }

    /// Refuses to re-solve a device that is already marked calculated.
    ///
    /// The check keys on the device's own flag, not on stream provenance:
    /// re-running an isolated device is indistinguishable from a true cyclic
    /// flowsheet. The error names the first output stream attached while
    /// the flag was set; with no outputs attached the check passes.
    pub fn check_for_recycle(&self, device_type: DeviceType) -> DeviceResult<()> {
        if !self.calculated {
            return Ok(());
        }
        match self.outputs.first() {
            Some(output) => {
                Err(DeviceError::Recycle { device_type, stream_name: output.name() })
            }
            None => Ok(()),
        }
    }

    /// Read-only view of the input streams.
    pub fn inputs(&self) -> &[Stream] {
        &self.inputs
    }

    /// Read-only view of the output streams.
    pub fn outputs(&self) -> &[Stream] {
        &self.outputs
    }

    /// Number of attached input streams.
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Number of attached output streams.
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Declared input capacity (zero means unbounded).
    pub fn input_capacity(&self) -> usize {
        self.input_capacity
    }

    /// Declared output capacity (zero means unbounded).
    pub fn output_capacity(&self) -> usize {
        self.output_capacity
    }

    /// Whether the last update completed without error.
    pub fn is_calculated(&self) -> bool {
        self.calculated
    }

    /// Sets the calculated flag.
    pub fn set_calculated(&mut self, calculated: bool) {
        self.calculated = calculated;
    }
}

/// Capability interface for the closed set of device variants.
///
/// Callers construct a variant with its capacities fixed, attach streams
/// with [`Device::add_input`] / [`Device::add_output`], then invoke
/// [`Device::update_outputs`]. Attachment views returned by
/// [`Device::inputs`] / [`Device::outputs`] are read-only with respect to
/// membership; the values inside the streams are read and written through
/// the handles themselves.
///
/// The `calculated` flag flips `false -> true` on the first successful
/// update and never resets automatically — not even when new streams are
/// attached afterwards. [`Device::set_calculated`] with `false` is the
/// explicit escape hatch for legitimate re-runs such as iterative
/// flowsheet convergence.
pub trait Device {
    /// Variant tag of this device.
    fn device_type(&self) -> DeviceType;

    /// Shared port and flag state.
    fn ports(&self) -> &Ports;

    /// Mutable shared port and flag state.
    fn ports_mut(&mut self) -> &mut Ports;

    /// Recomputes the output streams from the current inputs.
    ///
    /// Every implementation runs [`Ports::check_for_recycle`] first, then
    /// validates its own preconditions, then writes outputs, and only then
    /// marks the device calculated. A failed call leaves outputs and the
    /// flag untouched.
    fn update_outputs(&mut self) -> DeviceResult<()>;

    /// Attaches an input stream.
    fn add_input(&mut self, stream: Stream) -> DeviceResult<()> {
        self.ports_mut().add_input(stream)
    }

    /// Attaches an output stream.
    fn add_output(&mut self, stream: Stream) -> DeviceResult<()> {
        self.ports_mut().add_output(stream)
    }

    /// Fails if this device is already marked calculated.
    fn check_for_recycle(&self) -> DeviceResult<()> {
        self.ports().check_for_recycle(self.device_type())
    }

    /// Read-only view of the input streams.
    fn inputs(&self) -> &[Stream] {
        self.ports().inputs()
    }

    /// Read-only view of the output streams.
    fn outputs(&self) -> &[Stream] {
        self.ports().outputs()
    }

    /// Number of attached input streams.
    fn input_count(&self) -> usize {
        self.ports().input_count()
    }

    /// Number of attached output streams.
    fn output_count(&self) -> usize {
        self.ports().output_count()
    }

    /// Whether the last update completed without error.
    fn is_calculated(&self) -> bool {
        self.ports().is_calculated()
    }

    /// Sets the calculated flag (explicit external reset).
    fn set_calculated(&mut self, calculated: bool) {
        self.ports_mut().set_calculated(calculated)
    }
}
