use checkin_geo::{distance_meters, haversine_meters, GeoCoordinate, GeoError, EARTH_RADIUS_M};
use std::f64::consts::PI;

const TRIANGLE_EPSILON_M: f64 = 1.0;

fn sample_points() -> Vec<GeoCoordinate> {
    [
        (0.0, 0.0),
        (0.0, 1.0),
        (51.5074, -0.1278),
        (48.8566, 2.3522),
        (40.7128, -74.0060),
        (-33.8688, 151.2093),
        (35.6762, 139.6503),
        (-54.8019, -68.3030),
        (64.1466, -21.9426),
        (90.0, 0.0),
        (-90.0, 0.0),
        (0.0, 180.0),
        (0.0, -180.0),
        (12.9716, 77.5946),
        (-1.2921, 36.8219),
    ]
    .iter()
    .map(|&(lat, lon)| GeoCoordinate::new(lat, lon).unwrap())
    .collect()
}

#[test]
fn test_identity() {
    for p in sample_points() {
        assert_eq!(haversine_meters(&p, &p), 0.0, "{:?}", p);
    }
}

#[test]
fn test_symmetry_and_non_negativity() {
    let points = sample_points();
    for p in &points {
        for q in &points {
            let pq = haversine_meters(p, q);
            let qp = haversine_meters(q, p);
            assert!(pq >= 0.0);
            assert!(pq.is_finite());
            assert!((pq - qp).abs() < 1e-6, "{:?} {:?}: {} vs {}", p, q, pq, qp);
        }
    }
}

#[test]
fn test_triangle_inequality() {
    let points = sample_points();
    for p in &points {
        for q in &points {
            for r in &points {
                let direct = haversine_meters(p, r);
                let via = haversine_meters(p, q) + haversine_meters(q, r);
                assert!(
                    direct <= via + TRIANGLE_EPSILON_M,
                    "{:?} -> {:?} -> {:?}: {} > {}",
                    p,
                    q,
                    r,
                    direct,
                    via
                );
            }
        }
    }
}

#[test]
fn test_bounded_by_half_circumference() {
    let points = sample_points();
    for p in &points {
        for q in &points {
            assert!(haversine_meters(p, q) <= PI * EARTH_RADIUS_M + 1e-6);
        }
    }
}

#[test]
fn test_antipodes_are_half_circumference() {
    for p in sample_points() {
        let d = haversine_meters(&p, &p.antipode());
        assert!((d - PI * EARTH_RADIUS_M).abs() < 1.0, "{:?}: {}", p, d);
    }
}

#[test]
fn test_landmark_distances() {
    let equator_degree = distance_meters(0.0, 0.0, 0.0, 1.0).unwrap();
    assert!((equator_degree - 111_195.0).abs() < 50.0);

    let london_paris = distance_meters(51.5074, -0.1278, 48.8566, 2.3522).unwrap();
    assert!((london_paris - 343_556.0).abs() < 1_000.0);

    let poles = distance_meters(90.0, 0.0, -90.0, 0.0).unwrap();
    assert!((poles - 20_015_087.0).abs() < 10.0);

    let new_york = distance_meters(40.7128, -74.0060, 40.7128, -74.0060).unwrap();
    assert_eq!(new_york, 0.0);
}

#[test]
fn test_dateline_crossing_is_short() {
    let west = distance_meters(0.0, 179.5, 0.0, -179.5).unwrap();
    let east = distance_meters(0.0, -0.5, 0.0, 0.5).unwrap();
    assert!((west - east).abs() < 1e-6);
}

#[test]
fn test_invalid_arguments_fail_without_result() {
    for (lat1, lon1, lat2, lon2) in [
        (-90.1, 0.0, 0.0, 0.0),
        (0.0, 180.1, 0.0, 0.0),
        (0.0, 0.0, f64::NAN, 0.0),
        (0.0, 0.0, 0.0, f64::INFINITY),
    ] {
        match distance_meters(lat1, lon1, lat2, lon2) {
            Err(GeoError::InvalidArgument { .. }) => {}
            other => panic!("expected InvalidArgument, got {:?}", other),
        }
    }
}

#[test]
fn test_concurrent_callers_agree() {
    let expected = distance_meters(51.5074, -0.1278, 48.8566, 2.3522).unwrap();
    let handles: Vec<_> = (0..8)
        .map(|_| {
            std::thread::spawn(|| distance_meters(51.5074, -0.1278, 48.8566, 2.3522).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
