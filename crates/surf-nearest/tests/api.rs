//! Public API integration tests for surf-nearest.

use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use surf_nearest::{
    nearest_on_curve, nearest_on_surface, CircularCurve, ProjectError, SphericalSurface,
    SurfaceProjector,
};

/// Random query points in a cube, kept away from `center` so the projection
/// direction is well defined.
fn random_query_points(n: usize, seed: u64, extent: f64, center: DVec3) -> Vec<DVec3> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut points = Vec::with_capacity(n);
    while points.len() < n {
        let p = DVec3::new(
            rng.gen_range(-extent..extent),
            rng.gen_range(-extent..extent),
            rng.gen_range(-extent..extent),
        );
        if (p - center).length() > 1.0 {
            points.push(p);
        }
    }
    points
}

fn closed_form_on_sphere(point: DVec3, center: DVec3, radius: f64) -> DVec3 {
    center + (point - center).normalize() * radius
}

#[test]
fn test_nearest_matches_closed_form() {
    let sphere = SphericalSurface::new(DVec3::ZERO, 50.0);
    let mut projector = SurfaceProjector::new(&sphere);

    for point in random_query_points(200, 4242, 100.0, DVec3::ZERO) {
        projector.init(point);
        let hit = projector.nearest().expect("projection should succeed");

        let expected = closed_form_on_sphere(point, DVec3::ZERO, 50.0);
        assert!(
            (hit.point - expected).length() < 1e-8,
            "projection off by {:.3e} for {:?}",
            (hit.point - expected).length(),
            point
        );
        let expected_dist = (point.length() - 50.0).abs();
        assert!((hit.distance - expected_dist).abs() < 1e-8);
    }
}

#[test]
fn test_interior_points_project_outward() {
    let center = DVec3::new(10.0, -5.0, 2.0);
    let sphere = SphericalSurface::new(center, 20.0);
    let mut projector = SurfaceProjector::new(&sphere);

    for point in random_query_points(100, 777, 8.0, DVec3::ZERO) {
        let query = center + point;
        projector.init(query);
        let hit = projector.nearest().expect("projection should succeed");
        let expected = closed_form_on_sphere(query, center, 20.0);
        assert!(
            (hit.point - expected).length() < 1e-8,
            "interior projection off for {:?}",
            query
        );
    }
}

#[test]
fn test_reused_projector_matches_per_call() {
    let sphere = SphericalSurface::new(DVec3::ZERO, 50.0);
    let mut reused = SurfaceProjector::new(&sphere);

    for point in random_query_points(50, 99, 100.0, DVec3::ZERO) {
        reused.init(point);
        let a = reused.nearest().expect("reused projection should succeed");
        let b = nearest_on_surface(point, &sphere).expect("one-shot projection should succeed");
        assert!((a.point - b.point).length() < 1e-12);
        assert!((a.distance - b.distance).abs() < 1e-12);
    }
}

#[test]
fn test_reported_parameters_locate_the_point() {
    use surf_nearest::ParametricSurface;

    let sphere = SphericalSurface::new(DVec3::new(-3.0, 1.0, 6.0), 12.0);
    let mut projector = SurfaceProjector::new(&sphere);

    for point in random_query_points(100, 31337, 60.0, sphere.center()) {
        projector.init(point);
        let hit = projector.nearest().expect("projection should succeed");
        let roundtrip = sphere.value(hit.u, hit.v);
        assert!(
            (roundtrip - hit.point).length() < 1e-9,
            "value(u, v) does not reproduce the hit point"
        );
    }
}

#[test]
fn test_off_axis_sphere_matches_closed_form() {
    let center = DVec3::new(3.0, -2.0, 7.0);
    let sphere = SphericalSurface::with_axis(center, DVec3::new(1.0, 1.0, 1.0), 5.0);
    let mut projector = SurfaceProjector::new(&sphere);

    for point in random_query_points(100, 2024, 40.0, center) {
        projector.init(point);
        let hit = projector.nearest().expect("projection should succeed");
        let expected = closed_form_on_sphere(point, center, 5.0);
        assert!(
            (hit.point - expected).length() < 1e-8,
            "off-axis projection off for {:?}",
            point
        );
    }
}

#[test]
fn test_pole_queries_project_to_poles() {
    let sphere = SphericalSurface::new(DVec3::ZERO, 50.0);
    let mut projector = SurfaceProjector::new(&sphere);

    projector.init(DVec3::new(0.0, 0.0, 80.0));
    let north = projector.nearest().expect("north pole query");
    assert!((north.point - DVec3::new(0.0, 0.0, 50.0)).length() < 1e-8);
    assert!((north.distance - 30.0).abs() < 1e-8);

    projector.init(DVec3::new(0.0, 0.0, -80.0));
    let south = projector.nearest().expect("south pole query");
    assert!((south.point - DVec3::new(0.0, 0.0, -50.0)).length() < 1e-8);
}

#[test]
fn test_degenerate_sphere_is_a_projection_failure() {
    for radius in [0.0, -1.0] {
        let sphere = SphericalSurface::new(DVec3::ZERO, radius);
        let mut projector = SurfaceProjector::new(&sphere);
        projector.init(DVec3::new(60.0, 0.0, 0.0));

        assert_eq!(projector.num_solutions(), 0);
        assert!(matches!(
            projector.nearest(),
            Err(ProjectError::DegenerateGeometry)
        ));
    }
}

#[test]
fn test_circle_projection_matches_closed_form() {
    use surf_nearest::ParametricCurve;

    let circle = CircularCurve::new(DVec3::ZERO, 10.0);

    let mut rng = ChaCha8Rng::seed_from_u64(555);
    for _ in 0..100 {
        let point = DVec3::new(
            rng.gen_range(-30.0..30.0),
            rng.gen_range(-30.0..30.0),
            rng.gen_range(-30.0..30.0),
        );
        let planar = DVec3::new(point.x, point.y, 0.0);
        if planar.length() < 1.0 {
            continue;
        }

        let hit = nearest_on_curve(point, &circle).expect("curve projection should succeed");
        let expected = planar.normalize() * 10.0;
        assert!(
            (hit.point - expected).length() < 1e-8,
            "curve projection off for {:?}",
            point
        );
        assert!((circle.value(hit.t) - hit.point).length() < 1e-9);
    }
}

#[test]
fn test_tilted_circle_stays_in_plane() {
    let normal = DVec3::new(1.0, 2.0, 2.0);
    let circle = CircularCurve::with_normal(DVec3::new(1.0, 0.0, -1.0), normal, 4.0);

    for point in random_query_points(50, 808, 20.0, circle.center()) {
        let hit = nearest_on_curve(point, &circle).expect("curve projection should succeed");
        assert!(((hit.point - circle.center()).length() - 4.0).abs() < 1e-9);
        assert!(
            (hit.point - circle.center()).dot(normal.normalize()).abs() < 1e-9,
            "hit point left the circle plane"
        );
    }
}
