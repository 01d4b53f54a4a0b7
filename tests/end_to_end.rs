use std::time::Duration;

use sphere_viewer::{
    pack_rgb, CameraState, ExecutionStrategy, Reprojector, Rotation, SourcePanorama, ViewerConfig,
    ViewerError,
};

/// 4x2 source, one marker color per texel.
fn markers() -> SourcePanorama {
    let pixels = (0..8u8).map(|i| pack_rgb(i * 30, 255 - i * 30, i)).collect();
    SourcePanorama::from_raw(4, 2, pixels).unwrap()
}

fn small_config() -> ViewerConfig {
    ViewerConfig {
        width: 4,
        height: 4,
        fov_degrees: 90.0,
        accuracy: 2048,
        ..ViewerConfig::default()
    }
}

#[test]
fn test_center_pixels_sample_center_texels() {
    let source = markers();
    let engine = Reprojector::new(source.clone(), &small_config()).unwrap();
    let mut frame = engine.new_frame().unwrap();
    engine.render(&Rotation::default(), &mut frame).unwrap();

    // 中心四个像素 → 源图中间两列，上一行取顶行，下一行取底行
    assert_eq!(frame.get(1, 1), source.get(1, 0));
    assert_eq!(frame.get(2, 1), source.get(2, 0));
    assert_eq!(frame.get(1, 2), source.get(1, 1));
    assert_eq!(frame.get(2, 2), source.get(2, 1));
}

#[test]
fn test_resting_pointer_renders_zero_rotation_frame() {
    let config = ViewerConfig {
        width: 64,
        height: 48,
        accuracy: 512,
        ..ViewerConfig::default()
    };
    let source = SourcePanorama::from_raw(
        128,
        64,
        (0..128u32 * 64).map(|i| i.wrapping_mul(2_654_435_761) & 0x00ff_ffff).collect(),
    )
    .unwrap();
    let engine = Reprojector::new(source, &config).unwrap();

    let mut reference = engine.new_frame().unwrap();
    engine.render(&Rotation::default(), &mut reference).unwrap();

    let mut camera = CameraState::new(&config);
    camera.pointer(10.0, 40.0);
    let mut frame = engine.new_frame().unwrap();
    for _ in 0..20 {
        engine.render(&camera.tick(Duration::from_millis(16)), &mut frame).unwrap();
    }
    assert_ne!(frame, reference);

    camera.pointer(32.0, 24.0);
    for _ in 0..1000 {
        camera.tick(Duration::from_millis(16));
    }
    assert!(camera.is_settled());
    assert_eq!(camera.snapshot(), Rotation::default());

    engine.render(&camera.snapshot(), &mut frame).unwrap();
    assert_eq!(frame, reference);
}

#[test]
fn test_strategies_agree() {
    let source = markers();
    let mut config = ViewerConfig {
        width: 40,
        height: 30,
        accuracy: 256,
        ..ViewerConfig::default()
    };
    config.execution = ExecutionStrategy::Sequential;
    let mut engine = Reprojector::new(source, &config).unwrap();
    let rotation = Rotation::new(-0.8, 2.9);

    let mut sequential = engine.new_frame().unwrap();
    engine.render(&rotation, &mut sequential).unwrap();
    engine.set_strategy(ExecutionStrategy::Parallel);
    let mut parallel = engine.new_frame().unwrap();
    engine.render(&rotation, &mut parallel).unwrap();

    assert_eq!(sequential.as_bgra_bytes(), parallel.as_bgra_bytes());
}

#[test]
fn test_degenerate_inputs_fail_at_construction() {
    let mut config = small_config();
    config.width = 0;
    assert!(matches!(
        Reprojector::new(markers(), &config),
        Err(ViewerError::DegenerateViewport { width: 0, height: 4 })
    ));

    assert!(matches!(
        SourcePanorama::from_raw(0, 0, Vec::new()),
        Err(ViewerError::EmptyImage { .. })
    ));
}
