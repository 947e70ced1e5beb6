use rustc_hash::FxHashMap;
use crate::camera::Camera;
use crate::config::{BloomParams, CameraConfig};
use crate::error::Error;
use crate::graphics_device::mock_graphics_device::{MockCommand, MockGraphicsDevice};
use crate::render_graph::{ComposerOutput, FrameContext, PassComposer, ScenePass};
use crate::scene::{Layer, Scene};
use super::*;

fn bloom_composer() -> PassComposer {
    PassComposer::new("bloom", Layer::Bloom, ComposerOutput::Offscreen)
        .with_pass(ScenePass::new())
        .with_pass(BloomPass::new(BloomParams::default()))
}

// ============================================================================
// Mip chain
// ============================================================================

#[test]
fn test_mip_sizes_halve_with_rounding() {
    assert_eq!(
        BloomPass::mip_sizes(800, 600),
        [(400, 300), (200, 150), (100, 75), (50, 38), (25, 19)]
    );
}

#[test]
fn test_mip_sizes_never_reach_zero() {
    let sizes = BloomPass::mip_sizes(3, 1);
    assert!(sizes.iter().all(|(w, h)| *w >= 1 && *h >= 1));
}

#[test]
fn test_resize_recreates_mip_chain() {
    let mut device = MockGraphicsDevice::new(800, 600);
    let mut pass = BloomPass::new(BloomParams::default());
    assert!(pass.mip_textures().is_empty());

    pass.resize(&mut device, 800, 600).unwrap();
    let mips = pass.mip_textures();
    assert_eq!(mips.len(), BLOOM_MIP_COUNT);
    assert_eq!(mips[0].0.info().width, 400);

    pass.resize(&mut device, 1600, 900).unwrap();
    let mips = pass.mip_textures();
    assert_eq!((mips[0].1.info().width, mips[0].1.info().height), (800, 450));
    assert_eq!((mips[4].1.info().width, mips[4].1.info().height), (50, 29));
}

// ============================================================================
// Recorded programs
// ============================================================================

#[test]
fn test_bloom_records_high_pass_blur_chain_and_mix() {
    let mut device = MockGraphicsDevice::new(64, 64);
    let mut composer = bloom_composer();
    composer.resize(&mut device, 64, 64).unwrap();

    let scene = Scene::new();
    let camera = Camera::from_config(&CameraConfig::default());
    let frame = FrameContext { scene: &scene, camera: &camera, pixel_ratio: 1.0, tick: 1 };
    composer.render(frame, &FxHashMap::default(), &mut device).unwrap();

    let log = device.log();
    let log = log.lock().unwrap();
    let programs: Vec<(&str, Vec<String>)> = log
        .iter()
        .filter_map(|c| match c {
            MockCommand::DrawFullscreen { program, inputs } => {
                Some((*program, inputs.iter().map(|(n, _)| n.clone()).collect()))
            }
            _ => None,
        })
        .collect();

    assert_eq!(programs.len(), 1 + 2 * BLOOM_MIP_COUNT + 1);
    assert_eq!(programs[0], ("LuminosityHighPass", vec!["bloom.rt0".to_string()]));
    assert_eq!(programs[1], ("SeparableBlur", vec!["bloom.bright".to_string()]));
    assert_eq!(programs[2], ("SeparableBlur", vec!["bloom.mip0.h".to_string()]));
    assert_eq!(programs[3], ("SeparableBlur", vec!["bloom.mip0.v".to_string()]));

    let (mix, inputs) = &programs[programs.len() - 1];
    assert_eq!(*mix, "BloomMix");
    let expected: Vec<String> = (0..BLOOM_MIP_COUNT).map(|i| format!("bloom.mip{}.v", i)).collect();
    assert_eq!(*inputs, expected);

    // Mix went to the write buffer, which is now the composer's output
    assert_eq!(composer.output_image().unwrap().info().name, "bloom.rt1");
}

#[test]
fn test_render_before_resize_fails() {
    let mut device = MockGraphicsDevice::new(64, 64);
    let mut composer = bloom_composer();
    let scene = Scene::new();
    let camera = Camera::from_config(&CameraConfig::default());
    let frame = FrameContext { scene: &scene, camera: &camera, pixel_ratio: 1.0, tick: 1 };

    let result = composer.render(frame, &FxHashMap::default(), &mut device);
    assert!(matches!(result, Err(Error::InvalidResource(_))));
}
