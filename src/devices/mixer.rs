//! Mixer model combining multiple inlet streams.

use crate::devices::{Device, DeviceError, DeviceResult, DeviceType, Ports, Precondition};
use crate::Stream;

/// Every mixer drives exactly one outlet.
pub const MIXER_OUTPUTS: usize = 1;

/// Mixer combining N inlet streams into a single outlet by flow summation.
///
/// The inlet capacity is chosen at construction; the outlet capacity is
/// fixed at [`MIXER_OUTPUTS`].
///
/// # Example
///
/// ```
/// use flowbal::{Device, Mixer, StreamRegistry};
///
/// let streams = StreamRegistry::new();
/// let feed_a = streams.create();
/// let feed_b = streams.create();
/// let product = streams.create();
/// feed_a.set_mass_flow(10.0);
/// feed_b.set_mass_flow(5.0);
///
/// let mut mixer = Mixer::new(2);
/// mixer.add_input(feed_a)?;
/// mixer.add_input(feed_b)?;
/// mixer.add_output(product.clone())?;
/// mixer.update_outputs()?;
///
/// assert_eq!(product.mass_flow(), 15.0);
/// # Ok::<(), flowbal::DeviceError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Mixer {
    ports: Ports,
}

impl Mixer {
    /// Creates a mixer accepting up to `input_count` inlet streams.
    ///
    /// An `input_count` of zero leaves the inlet side unbounded.
    pub fn new(input_count: usize) -> Self {
        Mixer { ports: Ports::new(input_count, MIXER_OUTPUTS) }
    }
}

impl Device for Mixer {
    fn device_type(&self) -> DeviceType {
        DeviceType::Mixer
    }

    fn ports(&self) -> &Ports {
        &self.ports
    }

    fn ports_mut(&mut self) -> &mut Ports {
        &mut self.ports
    }

    fn update_outputs(&mut self) -> DeviceResult<()> {
        self.check_for_recycle()?;

        if self.ports.outputs().is_empty() {
            return Err(DeviceError::Precondition(Precondition::MissingOutputs));
        }

        // Mass balance: the summed inlet flow is spread over the attached
        // outlets. Capacity fixes the outlet count at one, so in practice
        // this assigns the direct sum.
        let total_flow: f64 = self.ports.inputs().iter().map(Stream::mass_flow).sum();
        let output_mass = total_flow / self.ports.output_count() as f64;

        for output in self.ports.outputs() {
            output.set_mass_flow(output_mass);
        }

        self.ports.set_calculated(true);
        Ok(())
    }
}
