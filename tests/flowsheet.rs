//! Cross-device scenarios over small flowsheets.
//!
//! Single-device behavior is covered by the unit tests next to each model;
//! these tests wire devices together through shared stream handles and
//! check mass balances and recycle detection across the chain.

use flowbal::{Device, DeviceError, DeviceType, Mixer, PortKind, Reactor, StreamRegistry};
use proptest::prelude::*;

const TOLERANCE: f64 = 0.01;

#[test]
fn mixer_combines_two_feeds() {
    let streams = StreamRegistry::new();
    let s1 = streams.create();
    let s2 = streams.create();
    let s3 = streams.create();
    s1.set_mass_flow(10.0);
    s2.set_mass_flow(5.0);

    let mut mixer = Mixer::new(2);
    mixer.add_input(s1).unwrap();
    mixer.add_input(s2).unwrap();
    mixer.add_output(s3.clone()).unwrap();
    mixer.update_outputs().unwrap();

    assert!((s3.mass_flow() - 15.0).abs() < TOLERANCE);
}

#[test]
fn double_outlet_reactor_conserves_mass() {
    let streams = StreamRegistry::new();
    let feed = streams.create();
    let overhead = streams.create();
    let bottoms = streams.create();
    feed.set_mass_flow(10.0);

    let mut reactor = Reactor::new(true);
    reactor.add_input(feed.clone()).unwrap();
    reactor.add_output(overhead.clone()).unwrap();
    reactor.add_output(bottoms.clone()).unwrap();
    reactor.update_outputs().unwrap();

    assert!((overhead.mass_flow() - 5.0).abs() < TOLERANCE);
    assert!((bottoms.mass_flow() - 5.0).abs() < TOLERANCE);
    assert!((overhead.mass_flow() + bottoms.mass_flow() - feed.mass_flow()).abs() < TOLERANCE);
}

#[test]
fn single_outlet_reactor_rejects_second_outlet() {
    let streams = StreamRegistry::new();
    let mut reactor = Reactor::new(false);
    reactor.add_input(streams.create()).unwrap();
    reactor.add_output(streams.create()).unwrap();

    let err = reactor.add_output(streams.create()).unwrap_err();
    assert_eq!(err, DeviceError::CapacityExceeded(PortKind::Output));
    assert_eq!(err.to_string(), "OUTPUT STREAM LIMIT");
}

#[test]
fn solved_reactor_refuses_resolve() {
    let streams = StreamRegistry::new();
    let feed = streams.create();
    feed.set_mass_flow(10.0);

    let mut reactor = Reactor::new(false);
    reactor.add_input(feed).unwrap();
    reactor.add_output(streams.create()).unwrap();
    reactor.update_outputs().unwrap();
    assert!(reactor.is_calculated());

    let err = reactor.update_outputs().unwrap_err();
    assert_eq!(err.to_string(), "RECYCLE DETECTED: Reactor has calculated output stream s2");
}

#[test]
fn chained_mixer_reinvocation_is_recycle() {
    let streams = StreamRegistry::new();
    let s1 = streams.create();
    let s2 = streams.create();
    let s3 = streams.create();
    let s4 = streams.create();
    s1.set_mass_flow(10.0);
    s2.set_mass_flow(5.0);

    let mut mixer = Mixer::new(2);
    mixer.add_input(s1).unwrap();
    mixer.add_input(s2).unwrap();
    mixer.add_output(s3.clone()).unwrap();

    // The mixer's product stream feeds the reactor: one shared handle
    let mut reactor = Reactor::new(false);
    reactor.add_input(s3).unwrap();
    reactor.add_output(s4.clone()).unwrap();

    mixer.update_outputs().unwrap();
    reactor.update_outputs().unwrap();
    assert!((s4.mass_flow() - 15.0).abs() < TOLERANCE);

    // Re-invoking the upstream mixer without a reset closes the loop
    let err = mixer.update_outputs().unwrap_err();
    assert_eq!(
        err,
        DeviceError::Recycle { device_type: DeviceType::Mixer, stream_name: "s3".to_string() }
    );
}

#[test]
fn explicit_reset_reruns_a_chain() {
    let streams = StreamRegistry::new();
    let feed = streams.create();
    let mid = streams.create();
    let product = streams.create();
    feed.set_mass_flow(8.0);

    let mut mixer = Mixer::new(1);
    mixer.add_input(feed.clone()).unwrap();
    mixer.add_output(mid.clone()).unwrap();

    let mut reactor = Reactor::new(false);
    reactor.add_input(mid).unwrap();
    reactor.add_output(product.clone()).unwrap();

    mixer.update_outputs().unwrap();
    reactor.update_outputs().unwrap();
    assert!((product.mass_flow() - 8.0).abs() < TOLERANCE);

    // Second pass with a new feed flow, after resetting both devices
    feed.set_mass_flow(20.0);
    mixer.set_calculated(false);
    reactor.set_calculated(false);
    mixer.update_outputs().unwrap();
    reactor.update_outputs().unwrap();
    assert!((product.mass_flow() - 20.0).abs() < TOLERANCE);
}

#[test]
fn failed_solve_does_not_mark_calculated() {
    let streams = StreamRegistry::new();
    let mut mixer = Mixer::new(2);
    mixer.add_input(streams.create()).unwrap();

    assert!(mixer.update_outputs().is_err()); // no outputs attached
    assert!(!mixer.is_calculated());

    // Attaching the missing outlet makes the same call succeed
    mixer.add_output(streams.create()).unwrap();
    mixer.update_outputs().unwrap();
    assert!(mixer.is_calculated());
}

proptest! {
    /// The single mixer outlet carries the sum of all inlet flows.
    #[test]
    fn mixer_outlet_equals_inlet_sum(flows in proptest::collection::vec(0.0f64..1e6, 1..8)) {
        let streams = StreamRegistry::new();
        let mut mixer = Mixer::new(flows.len());
        for &flow in &flows {
            let feed = streams.create();
            feed.set_mass_flow(flow);
            mixer.add_input(feed).unwrap();
        }
        let product = streams.create();
        mixer.add_output(product.clone()).unwrap();
        mixer.update_outputs().unwrap();

        let expected: f64 = flows.iter().sum();
        prop_assert!((product.mass_flow() - expected).abs() < TOLERANCE);
    }

    /// A double-outlet reactor halves the feed and conserves total mass.
    #[test]
    fn reactor_split_conserves_mass(feed_flow in 0.0f64..1e6) {
        let streams = StreamRegistry::new();
        let feed = streams.create();
        feed.set_mass_flow(feed_flow);

        let mut reactor = Reactor::new(true);
        reactor.add_input(feed).unwrap();
        let overhead = streams.create();
        let bottoms = streams.create();
        reactor.add_output(overhead.clone()).unwrap();
        reactor.add_output(bottoms.clone()).unwrap();
        reactor.update_outputs().unwrap();

        prop_assert!((overhead.mass_flow() - feed_flow / 2.0).abs() < TOLERANCE);
        prop_assert!((overhead.mass_flow() + bottoms.mass_flow() - feed_flow).abs() < TOLERANCE);
    }
}
