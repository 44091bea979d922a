//! Browser smoke test, run with `wasm-pack test --headless --chrome`

#![cfg(target_arch = "wasm32")]

use flowfield_engine::Simulation;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn tick_and_extract_in_browser() {
    flowfield_engine::init();
    let mut sim = Simulation::new(500).unwrap();
    sim.tick(1.0 / 60.0, 1.0, 0.1);
    assert_eq!(sim.frame(), 1);
    assert_eq!(sim.extract_render_buffer(), 500 * 7);
    assert!(!sim.render_buffer_ptr().is_null());
}

#[wasm_bindgen_test]
fn bad_boundary_policy_is_a_js_error() {
    let mut sim = Simulation::new(100).unwrap();
    assert!(sim.set_boundary_policy("sticky").is_err());
    assert!(sim.set_boundary_policy("wrap").is_ok());
}
