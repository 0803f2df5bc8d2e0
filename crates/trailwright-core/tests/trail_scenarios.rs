use glam::Vec3;
use trailwright_core::{CameraBasis, FrameInput, TrailConfig, TrailError, TrailFilter};

fn filter(min_vertex_distance: f32, lifetime: f32) -> TrailFilter {
    let config = TrailConfig {
        min_vertex_distance,
        lifetime,
        ..TrailConfig::default()
    };
    TrailFilter::new(config, Vec3::ZERO).unwrap()
}

fn tick(f: &mut TrailFilter, now: f64, p: Vec3) -> bool {
    f.update(&FrameInput::new(now, p, CameraBasis::default())).unwrap().emitted
}

#[test]
fn threshold_scenario() {
    let mut f = filter(1.0, 10.0);
    assert!(tick(&mut f, 0.0, Vec3::new(2.0, 0.0, 0.0)));
    assert_eq!(f.points().len(), 1);
    assert_eq!(f.points().newest().unwrap().position, Vec3::new(2.0, 0.0, 0.0));

    assert!(!tick(&mut f, 0.016, Vec3::new(2.5, 0.0, 0.0)));
    assert_eq!(f.points().len(), 1);
}

#[test]
fn lifetime_scenario() {
    let mut f = filter(0.0, 1.0);
    tick(&mut f, 0.0, Vec3::ZERO);
    assert_eq!(f.points().oldest().unwrap().created_at, 0.0);

    // anchor stays put, but a zero threshold still emits a fresh point each tick
    tick(&mut f, 0.999, Vec3::ZERO);
    assert_eq!(f.points().oldest().unwrap().created_at, 0.0);

    tick(&mut f, 1.0, Vec3::ZERO);
    assert!(f.points().iter().all(|p| p.created_at > 0.0));
}

#[test]
fn emission_matches_distance_rule_over_a_path() {
    let path = [0.0f32, 0.4, 0.9, 1.5, 1.6, 3.0, 3.05, 2.0, 2.0];
    let mut f = filter(1.0, 100.0);
    let mut last = 0.0f32;
    for (i, &x) in path.iter().enumerate() {
        let expected = (x - last).abs() >= 1.0;
        assert_eq!(tick(&mut f, i as f64 * 0.1, Vec3::new(x, 0.0, 0.0)), expected, "tick {i}");
        if expected {
            last = x;
        }
    }
}

#[test]
fn evicted_points_never_return() {
    let mut f = filter(0.0, 0.5);
    let mut evicted_upto = f64::NEG_INFINITY;
    for i in 0..40 {
        let now = i as f64 * 0.05;
        tick(&mut f, now, Vec3::new(i as f32, 0.0, 0.0));
        let oldest = f.points().oldest().map(|p| p.created_at).unwrap_or(now);
        assert!(oldest >= evicted_upto);
        assert!(f.points().iter().all(|p| now - p.created_at < 0.5));
        evicted_upto = oldest;
    }
}

#[test]
fn geometry_parity_as_history_grows_and_shrinks() {
    let mut f = filter(0.0, 0.35);
    for i in 0..20 {
        let now = i as f64 * 0.1;
        tick(&mut f, now, Vec3::new(i as f32, (i as f32).sin(), 0.0));
        let n = f.points().len();
        let mesh = f.mesh();
        if n < 2 {
            assert!(mesh.vertices.is_empty() && mesh.indices.is_empty());
        } else {
            assert_eq!(mesh.vertices.len(), 2 * n);
            assert_eq!(mesh.indices.len(), 6 * (n - 1));
        }
    }
}

#[test]
fn clear_then_single_point_is_degenerate_then_accumulates() {
    let mut f = filter(0.5, 10.0);
    for i in 0..5 {
        tick(&mut f, i as f64 * 0.1, Vec3::new(i as f32, 0.0, 0.0));
    }
    assert!(f.is_renderable());

    f.clear().unwrap();
    assert!(f.points().is_empty());
    assert!(f.mesh().is_empty());

    tick(&mut f, 1.0, Vec3::new(10.0, 0.0, 0.0));
    assert_eq!(f.points().len(), 1);
    assert!(f.mesh().is_empty());
    assert!(f.bounds().is_degenerate());

    tick(&mut f, 1.1, Vec3::new(11.0, 0.0, 0.0));
    tick(&mut f, 1.2, Vec3::new(12.0, 0.0, 0.0));
    assert_eq!(f.points().len(), 3);
    assert_eq!(f.mesh().vertices.len(), 6);
    assert_eq!(f.mesh().indices.len(), 12);
}

#[test]
fn non_positive_lifetime_never_renders() {
    let mut f = filter(0.0, 0.0);
    for i in 0..5 {
        tick(&mut f, i as f64, Vec3::new(i as f32, 0.0, 0.0));
        assert!(f.points().is_empty());
        assert!(!f.is_renderable());
    }
}

#[test]
fn backwards_clock_cannot_smuggle_stale_points_into_the_mesh() {
    let mut f = filter(0.0, 1.0);
    tick(&mut f, 5.0, Vec3::ZERO);

    let late = f.update(&FrameInput::new(2.0, Vec3::X, CameraBasis::default()));
    assert!(matches!(late, Err(TrailError::TimeNotIncreasing { .. })));

    tick(&mut f, 5.5, Vec3::new(2.0, 0.0, 0.0));
    let stamps: Vec<f64> = f.points().iter().map(|p| p.created_at).collect();
    assert_eq!(stamps, vec![5.0, 5.5]);
    assert_eq!(f.mesh().vertices.len(), 4);
    assert!(f.points().iter().all(|p| 5.5 - p.created_at < 1.0));
}

#[test]
fn nan_clock_is_rejected_and_history_still_ages() {
    let mut f = filter(0.0, 1.0);
    let nan = f.update(&FrameInput::new(f64::NAN, Vec3::ZERO, CameraBasis::default()));
    assert!(matches!(nan, Err(TrailError::NonFiniteTime(_))));
    assert!(f.points().is_empty());

    tick(&mut f, 100.0, Vec3::ZERO);
    tick(&mut f, 100.5, Vec3::X);
    tick(&mut f, 101.2, Vec3::new(2.0, 0.0, 0.0));
    let stamps: Vec<f64> = f.points().iter().map(|p| p.created_at).collect();
    assert_eq!(stamps, vec![100.5, 101.2]);
}
