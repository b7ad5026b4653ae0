#![forbid(unsafe_code)]

//! Keyboard and environment input for the demo.

use crossterm::event::KeyCode;
use fringe_core::params::clamp_wavelength;
use fringe_core::{Controls, Mode, ParamError, SceneGeometry, SimulationParams};
use fringe_runtime::ConfigError;
use fringe_runtime::config::env_parse;
use std::fmt;

const WAVELENGTH_STEP_NM: f64 = 10.0;
const SLIT_WIDTH_STEP_UM: f64 = 0.5;
const SLIT_DISTANCE_STEP_UM: f64 = 2.0;
const SCREEN_STEP: f64 = 20.0;

/// What a key press asks the host to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyAction {
    /// Leave the demo.
    Quit,
    /// Apply new controls.
    Update(Controls),
    /// Nothing bound to this key.
    Ignore,
}

/// Map a key press onto the current controls.
pub fn handle_key(controls: &Controls, code: KeyCode, geometry: &SceneGeometry) -> KeyAction {
    let mut next = *controls;
    let params = &mut next.params;
    match code {
        KeyCode::Char('q') | KeyCode::Esc => return KeyAction::Quit,
        KeyCode::Char('m') => next.mode = controls.mode.toggled(),
        KeyCode::Char('+' | '=') => {
            params.wavelength_nm = clamp_wavelength(params.wavelength_nm + WAVELENGTH_STEP_NM);
        }
        KeyCode::Char('-') => {
            params.wavelength_nm = clamp_wavelength(params.wavelength_nm - WAVELENGTH_STEP_NM);
        }
        KeyCode::Char('}') => params.slit_width_um += SLIT_WIDTH_STEP_UM,
        KeyCode::Char('{') => {
            params.slit_width_um =
                (params.slit_width_um - SLIT_WIDTH_STEP_UM).max(SLIT_WIDTH_STEP_UM);
        }
        KeyCode::Char(']') => params.slit_distance_um += SLIT_DISTANCE_STEP_UM,
        KeyCode::Char('[') => {
            params.slit_distance_um =
                (params.slit_distance_um - SLIT_DISTANCE_STEP_UM).max(SLIT_DISTANCE_STEP_UM);
        }
        KeyCode::Char('>') => params.screen_distance += SCREEN_STEP,
        KeyCode::Char('<') => {
            params.screen_distance =
                (params.screen_distance - SCREEN_STEP).max(geometry.barrier_x + SCREEN_STEP);
        }
        _ => return KeyAction::Ignore,
    }
    KeyAction::Update(next)
}

/// One-line summary of the controls for the status row.
pub fn status_line(controls: &Controls, landed: usize) -> String {
    let p: &SimulationParams = &controls.params;
    format!(
        " {mode} | {w:.0} nm | slit {sw:.1} um | gap {sd:.1} um | screen {sc:.0} | landed {landed} | m mode  +/- wavelength  {{}} width  [] gap  <> screen  q quit",
        mode = controls.mode,
        w = p.wavelength_nm,
        sw = p.slit_width_um,
        sd = p.slit_distance_um,
        sc = p.screen_distance,
    )
}

/// Initial controls from `FRINGE_*` variables, validated against
/// `geometry`.
pub fn controls_from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
    geometry: &SceneGeometry,
) -> Result<Controls, InputError> {
    let mut controls = Controls::default();
    if let Some(mode) = env_parse::<Mode>(&lookup, "FRINGE_MODE")? {
        controls.mode = mode;
    }
    let params = &mut controls.params;
    if let Some(v) = env_parse::<f64>(&lookup, "FRINGE_WAVELENGTH")? {
        params.wavelength_nm = v;
    }
    if let Some(v) = env_parse::<f64>(&lookup, "FRINGE_SLIT_WIDTH")? {
        params.slit_width_um = v;
    }
    if let Some(v) = env_parse::<f64>(&lookup, "FRINGE_SLIT_DISTANCE")? {
        params.slit_distance_um = v;
    }
    if let Some(v) = env_parse::<f64>(&lookup, "FRINGE_SCREEN_DISTANCE")? {
        params.screen_distance = v;
    }
    if let Some(v) = env_parse::<f64>(&lookup, "FRINGE_PARTICLE_SPEED")? {
        controls.particle_speed = v;
    }
    if let Some(v) = env_parse::<f64>(&lookup, "FRINGE_THRESHOLD")? {
        controls.intensity_threshold = v;
    }
    controls.validate(geometry)?;
    Ok(controls)
}

/// Bad startup input.
#[derive(Debug)]
pub enum InputError {
    /// A variable could not be parsed.
    Config(ConfigError),
    /// The parsed controls are out of range.
    Param(ParamError),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid environment: {err}"),
            Self::Param(err) => write!(f, "invalid controls: {err}"),
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Param(err) => Some(err),
        }
    }
}

impl From<ConfigError> for InputError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<ParamError> for InputError {
    fn from(err: ParamError) -> Self {
        Self::Param(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn updated(action: KeyAction) -> Controls {
        match action {
            KeyAction::Update(controls) => controls,
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn quit_keys() {
        let c = Controls::default();
        let g = SceneGeometry::DEFAULT;
        assert_eq!(handle_key(&c, KeyCode::Char('q'), &g), KeyAction::Quit);
        assert_eq!(handle_key(&c, KeyCode::Esc, &g), KeyAction::Quit);
        assert_eq!(handle_key(&c, KeyCode::Char('z'), &g), KeyAction::Ignore);
    }

    #[test]
    fn mode_key_toggles() {
        let c = Controls::default();
        let next = updated(handle_key(&c, KeyCode::Char('m'), &SceneGeometry::DEFAULT));
        assert_eq!(next.mode, Mode::Particle);
    }

    #[test]
    fn wavelength_keys_clamp() {
        let g = SceneGeometry::DEFAULT;
        let mut c = Controls::default();
        c.params.wavelength_nm = 745.0;
        assert_eq!(updated(handle_key(&c, KeyCode::Char('+'), &g)).params.wavelength_nm, 750.0);
        c.params.wavelength_nm = 385.0;
        assert_eq!(updated(handle_key(&c, KeyCode::Char('-'), &g)).params.wavelength_nm, 380.0);
    }

    #[test]
    fn geometry_keys_stay_valid() {
        let g = SceneGeometry::DEFAULT;
        let mut c = Controls::default();
        c.params.screen_distance = 210.0;
        c.params.slit_width_um = 0.5;
        let next = updated(handle_key(&c, KeyCode::Char('<'), &g));
        assert_eq!(next.params.screen_distance, 220.0);
        let next = updated(handle_key(&next, KeyCode::Char('{'), &g));
        assert_eq!(next.params.slit_width_um, 0.5);
        assert!(next.validate(&g).is_ok());
    }

    #[test]
    fn env_controls_parse() {
        let controls = controls_from_lookup(
            lookup(&[
                ("FRINGE_MODE", "particle"),
                ("FRINGE_WAVELENGTH", "450"),
                ("FRINGE_SCREEN_DISTANCE", "600"),
            ]),
            &SceneGeometry::DEFAULT,
        )
        .unwrap();
        assert_eq!(controls.mode, Mode::Particle);
        assert_eq!(controls.params.wavelength_nm, 450.0);
        assert_eq!(controls.params.screen_distance, 600.0);
    }

    #[test]
    fn env_controls_reject_bad_values() {
        let g = SceneGeometry::DEFAULT;
        let err = controls_from_lookup(lookup(&[("FRINGE_MODE", "laser")]), &g).unwrap_err();
        assert!(matches!(err, InputError::Config(_)));
        let err = controls_from_lookup(lookup(&[("FRINGE_SCREEN_DISTANCE", "100")]), &g)
            .unwrap_err();
        assert!(matches!(err, InputError::Param(_)));
    }

    #[test]
    fn status_mentions_mode_and_wavelength() {
        let line = status_line(&Controls::default(), 3);
        assert!(line.contains("wave"));
        assert!(line.contains("550 nm"));
        assert!(line.contains("landed 3"));
    }
}
