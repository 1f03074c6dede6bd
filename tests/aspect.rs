#![cfg(target_arch = "wasm32")]

use glam::Vec4;
use site_visuals::camera::Camera;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn to_ndc(camera: &Camera, p: Vec4) -> (f32, f32) {
    let clip = camera.view_projection() * p;
    (clip.x / clip.w, clip.y / clip.w)
}

#[wasm_bindgen_test]
fn vertical_extent_is_aspect_invariant() {
    // Perspective keeps the vertical field of view fixed, so a point's NDC y
    // must not depend on the viewport's width.
    let wide = Camera::new(5.0, 1920, 1080);
    let tall = Camera::new(5.0, 1080, 1920);

    for &(x, y, z) in &[(0.0, 1.0, 0.0), (0.5, -2.0, 1.0), (-3.0, 0.25, -2.0)] {
        let p = Vec4::new(x, y, z, 1.0);
        let (_, y_wide) = to_ndc(&wide, p);
        let (_, y_tall) = to_ndc(&tall, p);
        assert!((y_wide - y_tall).abs() < 1e-5, "y_wide={y_wide} y_tall={y_tall}");
    }
}

#[wasm_bindgen_test]
fn horizontal_extent_scales_with_aspect() {
    let wide = Camera::new(5.0, 2000, 1000);
    let square = Camera::new(5.0, 1000, 1000);
    let p = Vec4::new(1.0, 0.0, 0.0, 1.0);

    let (x_wide, _) = to_ndc(&wide, p);
    let (x_square, _) = to_ndc(&square, p);
    assert!((x_square / x_wide - 2.0).abs() < 1e-4);
}
