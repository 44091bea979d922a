use flowfield_engine::glam::Vec2;
use flowfield_engine::{
    BoundaryPolicy, ConfigError, DomainBounds, ParticleSeed, SimError, SimulationConfig,
    SimulationCore,
};

fn core(json: &str) -> SimulationCore {
    SimulationCore::new(SimulationConfig::from_json(json).unwrap()).unwrap()
}

#[test]
fn json_config_drives_the_core() {
    let sim = core(
        r#"{
            "particleCount": 750,
            "fluidResolution": 64,
            "bounds": { "min": [0.0, 0.0], "max": [3.0, 2.0] },
            "boundary": "wrap",
            "seed": 4
        }"#,
    );
    assert_eq!(sim.particle_count(), 750);
    assert_eq!(sim.fluid_resolution(), 64);
    assert_eq!(sim.config().boundary, BoundaryPolicy::Wrap);
    let bounds = *sim.bounds();
    assert!(sim.particle_snapshot().iter().all(|p| bounds.contains(p.position)));
}

#[test]
fn out_of_range_count_is_a_configuration_error() {
    let err = SimulationCore::new(SimulationConfig::default().with_particle_count(99)).err();
    assert!(matches!(
        err,
        Some(SimError::Configuration(ConfigError::ParticleCount {
            requested: 99,
            min: 100,
            max: 100_000
        }))
    ));
}

#[test]
fn overlapping_pair_separates_in_one_tick() {
    let mut sim = core("{}");
    sim.set_fluid_coupling(0.0).unwrap();
    sim.load_particles(&[
        ParticleSeed::at_rest(0.2, 0.2, 0.02),
        ParticleSeed::at_rest(0.2, 0.21, 0.02),
    ])
    .unwrap();

    let gap = |sim: &SimulationCore| {
        let s = sim.particle_snapshot();
        s.get(0).unwrap().position.distance(s.get(1).unwrap().position)
    };
    let before = gap(&sim);
    sim.tick(1.0 / 60.0, 1.0, 0.1);

    let s = sim.particle_snapshot();
    let (a, b) = (s.get(0).unwrap(), s.get(1).unwrap());
    assert_eq!((a.collision_count, b.collision_count), (1, 1));
    assert!(a.velocity.y < 0.0 && b.velocity.y > 0.0);
    assert!(a.temperature > 0.0);
    assert!(gap(&sim) > before);
}

#[test]
fn long_run_stays_finite_and_contained() {
    let mut sim = core(r#"{"particleCount": 3000, "fluidResolution": 128}"#);
    let bounds = DomainBounds::unit();
    for frame in 0..120 {
        sim.tick(1.0 / 60.0, 1.5, 0.2);
        for p in sim.particle_snapshot().iter() {
            assert!(bounds.contains(p.position), "frame {}: {:?}", frame, p.position);
        }
    }
    assert_eq!(sim.frame(), 120);
    assert!(sim.fluid().max_speed().is_finite());
    assert!(sim.sample_velocity(Vec2::new(0.0, 0.0)).is_finite());
}
