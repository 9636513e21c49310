//! Reactor model splitting one inlet evenly across its outlets.

use crate::devices::{Device, DeviceError, DeviceResult, DeviceType, Ports, Precondition};

/// Reactor consuming a single inlet and splitting it evenly across one or
/// two outlets.
///
/// Unlike the mixer, the reactor demands its outlet count to exactly match
/// the declared capacity before an update: a double-outlet reactor with one
/// outlet attached is an error, not a partial split.
///
/// # Example
///
/// ```
/// use flowbal::{Device, Reactor, StreamRegistry};
///
/// let streams = StreamRegistry::new();
/// let feed = streams.create();
/// let overhead = streams.create();
/// let bottoms = streams.create();
/// feed.set_mass_flow(10.0);
///
/// let mut reactor = Reactor::new(true);
/// reactor.add_input(feed)?;
/// reactor.add_output(overhead.clone())?;
/// reactor.add_output(bottoms.clone())?;
/// reactor.update_outputs()?;
///
/// assert_eq!(overhead.mass_flow(), 5.0);
/// assert_eq!(bottoms.mass_flow(), 5.0);
/// # Ok::<(), flowbal::DeviceError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Reactor {
    ports: Ports,
}

impl Reactor {
    /// Creates a reactor with one inlet and, when `double_output` is set,
    /// two outlets instead of one.
    pub fn new(double_output: bool) -> Self {
        let output_capacity = if double_output { 2 } else { 1 };
        Reactor { ports: Ports::new(1, output_capacity) }
    }
}

impl Device for Reactor {
    fn device_type(&self) -> DeviceType {
        DeviceType::Reactor
    }

    fn ports(&self) -> &Ports {
        &self.ports
    }

    fn ports_mut(&mut self) -> &mut Ports {
        &mut self.ports
    }

    fn update_outputs(&mut self) -> DeviceResult<()> {
        self.check_for_recycle()?;

        if self.ports.inputs().is_empty() {
            return Err(DeviceError::Precondition(Precondition::MissingInput));
        }
        if self.ports.output_count() != self.ports.output_capacity() {
            return Err(DeviceError::Precondition(Precondition::WrongOutputCount));
        }

        // Even split of the single inlet across the fixed outlet count
        let per_output = self.ports.inputs()[0].mass_flow() / self.ports.output_capacity() as f64;

        for output in self.ports.outputs() {
            output.set_mass_flow(per_output);
        }

        self.ports.set_calculated(true);
        Ok(())
    }
}
