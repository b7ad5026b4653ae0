//! Headless frame-loop scenarios driven by the manual scheduler.

use fringe_core::{Controls, Mode, SimulationParams};
use fringe_render::CapturePresenter;
use fringe_runtime::{AnimationLoop, ManualScheduler, Particle, RuntimeConfig, Simulation};

fn headless(
    config: RuntimeConfig,
    controls: Controls,
) -> AnimationLoop<ManualScheduler, CapturePresenter> {
    let mut anim = AnimationLoop::new(
        Simulation::new(config),
        ManualScheduler::new(),
        CapturePresenter::new(),
        controls,
    );
    anim.start();
    anim
}

fn particle_controls(speed: f64) -> Controls {
    Controls {
        mode: Mode::Particle,
        particle_speed: speed,
        ..Controls::default()
    }
}

#[test]
fn axial_particle_lands_once_after_expected_frames() {
    let config = RuntimeConfig {
        emission_probability: 0.0,
        ..RuntimeConfig::default().with_seed(1)
    };
    let speed = 7.0;
    let mut anim = headless(config, particle_controls(speed));
    // Settle the mode before injecting.
    anim.run_frames(1).unwrap();
    anim.simulation_mut()
        .engine_mut()
        .spawn(Particle::new(200.0, 200.0, 0.0, speed));

    let frames = ((500.0_f64 - 200.0) / speed).ceil() as usize;
    anim.run_frames(frames - 1).unwrap();
    assert!(anim.simulation().screen().is_empty());
    anim.run_frames(1).unwrap();

    let screen = anim.simulation().screen();
    assert_eq!(screen.len(), 1);
    assert_eq!(screen.points()[0].y, 200.0);
    assert!(anim.simulation().engine().is_empty());
}

#[test]
fn mode_round_trip_empties_screen() {
    let mut anim = headless(RuntimeConfig::default().with_seed(9), particle_controls(4.0));
    anim.run_frames(800).unwrap();
    assert!(!anim.simulation().screen().is_empty());

    let mut controls = *anim.controls();
    controls.mode = Mode::Wave;
    anim.set_controls(controls);
    assert_eq!(anim.simulation().screen().len(), 0);

    controls.mode = Mode::Particle;
    anim.set_controls(controls);
    assert_eq!(anim.simulation().screen().len(), 0);
    assert!(anim.simulation().engine().is_empty());
}

#[test]
fn landings_cluster_on_bright_fringes() {
    let mut anim = headless(RuntimeConfig::default().with_seed(21), particle_controls(6.0));
    anim.run_frames(3000).unwrap();
    let screen = anim.simulation().screen();
    assert!(screen.len() > 50, "only {} landings", screen.len());

    // The central band holds more landings than an equally wide band near
    // the edge of the pattern.
    let bins = screen.histogram(20, 400.0);
    let center = bins[9] + bins[10];
    let edge = bins[0] + bins[1];
    assert!(center > edge, "center {center} vs edge {edge}");
}

#[test]
fn geometry_change_mid_flight_restarts_cleanly() {
    let mut anim = headless(RuntimeConfig::default().with_seed(4), particle_controls(2.0));
    anim.run_frames(100).unwrap();
    let mut controls = *anim.controls();
    controls.params = SimulationParams {
        slit_distance_um: 40.0,
        ..controls.params
    };
    anim.set_controls(controls);
    assert!(anim.simulation().engine().is_empty());
    assert!(anim.is_running());
    assert_eq!(anim.run_frames(10).unwrap(), 10);
}
