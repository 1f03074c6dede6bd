#![cfg(target_arch = "wasm32")]

use site_visuals::clock::FrameClock;
use site_visuals::config::NetworkConfig;
use site_visuals::frame::Scene;
use site_visuals::ParticleNetwork;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn network_seeds_from_browser_entropy() {
    let mut rng = rand::thread_rng();
    let mut network = ParticleNetwork::new(NetworkConfig::default(), &mut rng);
    assert_eq!(network.points().len(), 60);

    let frame = network.advance(0.016);
    assert_eq!(frame.layers.len(), 2);
}

#[wasm_bindgen_test]
fn clock_reads_performance_timestamps() {
    let now = web_sys::window().unwrap().performance().unwrap().now();
    let mut clock = FrameClock::new();
    clock.tick(now);
    let (elapsed, delta) = clock.tick(now + 16.0);
    assert!(elapsed > 0.0 && delta > 0.0);
}
