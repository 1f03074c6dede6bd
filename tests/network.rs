use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use site_visuals::config::NetworkConfig;
use site_visuals::{ParticleNetwork, Point};

fn random_network(seed: u64) -> ParticleNetwork {
    ParticleNetwork::new(NetworkConfig::default(), &mut StdRng::seed_from_u64(seed))
}

/// Brute-force link set for the current positions.
fn expected_links(network: &ParticleNetwork) -> Vec<(usize, usize)> {
    let points = network.points();
    let threshold = f64::from(network.config().link_distance);
    let mut links = Vec::new();
    for i in 0..points.len() {
        for j in i + 1..points.len() {
            let distance = points[i].position.as_dvec3().distance(points[j].position.as_dvec3());
            if distance < threshold {
                links.push((i, j));
            }
        }
    }
    links
}

#[test]
fn every_step_integrates_velocity() {
    let mut network = random_network(11);
    for _ in 0..50 {
        let before: Vec<Point> = network.points().to_vec();
        network.step();
        for (old, new) in before.iter().zip(network.points()) {
            assert_eq!(new.position, old.position + old.velocity);
        }
    }
}

#[test]
fn out_of_bounds_axes_flip_before_next_step() {
    let half_extent = NetworkConfig::default().half_extent;
    let mut network = random_network(12);
    for _ in 0..2_000 {
        let before: Vec<Point> = network.points().to_vec();
        network.step();
        for (old, new) in before.iter().zip(network.points()) {
            for axis in 0..3 {
                let flipped = new.position[axis].abs() > half_extent;
                let expected = if flipped {
                    -old.velocity[axis]
                } else {
                    old.velocity[axis]
                };
                assert_eq!(new.velocity[axis], expected);
            }
        }
    }
}

#[test]
fn points_never_escape_by_more_than_one_step() {
    let config = NetworkConfig::default();
    let slack = config.max_speed / 2.0;
    let mut network = random_network(13);
    for _ in 0..5_000 {
        network.step();
        for p in network.points() {
            assert!(p.position.abs().max_element() <= config.half_extent + slack + 1e-4);
        }
    }
}

#[test]
fn links_match_brute_force_every_step() {
    let mut network = random_network(14);
    for _ in 0..200 {
        network.step();
        let links = network.links();
        assert_eq!(links, expected_links(&network).as_slice());
        assert!(links.len() <= network.max_links());
        assert_eq!(network.segments().len(), links.len() * 6);
    }
}

#[test]
fn segments_join_linked_positions() {
    let mut network = random_network(15);
    network.step();
    for (k, &(i, j)) in network.links().iter().enumerate() {
        let segment = &network.segments()[k * 6..k * 6 + 6];
        assert_eq!(segment[..3], network.points()[i].position.to_array());
        assert_eq!(segment[3..], network.points()[j].position.to_array());
    }
}

#[test]
fn zero_velocity_is_a_fixed_point() {
    let mut rng = StdRng::seed_from_u64(16);
    let points: Vec<Point> = (0..40)
        .map(|_| {
            let position = Vec3::new(
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
            );
            Point::new(position, Vec3::ZERO)
        })
        .collect();
    let mut network = ParticleNetwork::from_points(NetworkConfig::default(), points.clone());

    network.step();
    let links = network.links().to_vec();
    let segments = network.segments().to_vec();
    for _ in 0..100 {
        network.step();
        assert_eq!(network.points(), points.as_slice());
        assert_eq!(network.links(), links.as_slice());
        assert_eq!(network.segments(), segments.as_slice());
    }
}

#[test]
fn fully_clustered_points_link_every_pair() {
    let points = (0..10)
        .map(|i| Point::new(Vec3::splat(i as f32 * 0.01), Vec3::ZERO))
        .collect();
    let mut network = ParticleNetwork::from_points(NetworkConfig::default(), points);
    network.step();
    assert_eq!(network.links().len(), network.max_links());
    assert_eq!(network.max_links(), 45);
}

#[test]
fn boundary_scenario() {
    let mut network = ParticleNetwork::from_points(
        NetworkConfig::default(),
        vec![Point::new(Vec3::new(4.99, 0.0, 0.0), Vec3::new(0.02, 0.0, 0.0))],
    );
    network.step();
    let p = network.points()[0];
    assert!((p.position.x - 5.01).abs() < 1e-5);
    assert_eq!(p.velocity, Vec3::new(-0.02, 0.0, 0.0));
}
