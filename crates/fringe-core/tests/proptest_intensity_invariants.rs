//! Property-based invariants for the intensity model and landing sampler.
//!
//! Verifies:
//! 1. Intensity stays in [0, 1] for every valid parameter set and row
//! 2. Intensity is mirror-symmetric about the optical axis
//! 3. The optical axis is never darker than any other row
//! 4. Landing distributions are normalized
//! 5. Cached and uncached evaluation agree bit for bit

use fringe_core::intensity::compute_intensity;
use fringe_core::{IntensityModel, LandingDistribution, SceneGeometry, SimulationParams};
use proptest::prelude::*;

fn arb_params() -> impl Strategy<Value = SimulationParams> {
    (380.0f64..=750.0, 0.5f64..20.0, 1.0f64..100.0, 220.0f64..2000.0).prop_map(
        |(wavelength, width, distance, screen)| {
            SimulationParams::new(wavelength, width, distance, screen)
        },
    )
}

proptest! {
    #[test]
    fn intensity_is_bounded(params in arb_params(), y in -100.0f64..500.0) {
        let v = compute_intensity(&SceneGeometry::DEFAULT, &params, y);
        prop_assert!((0.0..=1.0).contains(&v), "intensity {} out of range", v);
    }

    #[test]
    fn intensity_is_symmetric(params in arb_params(), dy in 0.0f64..200.0) {
        let g = SceneGeometry::DEFAULT;
        let c = g.center_y();
        let above = compute_intensity(&g, &params, c - dy);
        let below = compute_intensity(&g, &params, c + dy);
        prop_assert!((above - below).abs() < 1e-9);
    }

    #[test]
    fn axis_is_brightest(params in arb_params(), y in 0.0f64..400.0) {
        let g = SceneGeometry::DEFAULT;
        let peak = compute_intensity(&g, &params, g.center_y());
        prop_assert!(compute_intensity(&g, &params, y) <= peak);
    }

    #[test]
    fn distribution_is_normalized(params in arb_params()) {
        let mut model = IntensityModel::new(SceneGeometry::DEFAULT);
        let d = LandingDistribution::build(&mut model, &params).unwrap();
        prop_assert!((d.total() - 1.0).abs() < 1e-9);
        prop_assert!(d.probabilities().iter().all(|p| *p >= 0.0));
    }

    #[test]
    fn cache_matches_direct(params in arb_params(), y in 0.0f64..400.0) {
        let mut model = IntensityModel::new(SceneGeometry::DEFAULT);
        let cached = model.intensity(&params, y);
        let again = model.intensity(&params, y);
        let direct = compute_intensity(&SceneGeometry::DEFAULT, &params, y);
        prop_assert_eq!(cached.to_bits(), direct.to_bits());
        prop_assert_eq!(again.to_bits(), direct.to_bits());
    }
}
