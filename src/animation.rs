use std::f32::consts::TAU;

use cgmath::Rad;
use instant::{Duration, Instant};

use crate::{data_structures::instance::Instance, landing::Landing};

/// Main cube yaw per elapsed millisecond.
pub const MAIN_CUBE_YAW_PER_MS: f32 = 0.0006;
/// Button yaw per elapsed millisecond (turns the other way).
pub const BUTTON_YAW_PER_MS: f32 = -0.0005;
/// Small cube rotation per frame, independent of the frame rate.
pub const SMALL_CUBE_PITCH_PER_FRAME: f32 = 0.015;
pub const SMALL_CUBE_YAW_PER_FRAME: f32 = 0.014;

/// Measures the time between two redraws.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_tick: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
        }
    }

    /// Time since the previous call (or since creation).
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now - self.last_tick;
        self.last_tick = now;
        elapsed
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// `angle` mapped into `[0, 2π)`.
pub fn wrap(angle: f32) -> Rad<f32> {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid may round up to TAU for tiny negative inputs
    Rad(if wrapped >= TAU { 0.0 } else { wrapped })
}

/// Adds `pitch` (x) and `yaw` (y) to the rotation of `instance`.
pub fn turn(instance: &mut Instance, pitch: f32, yaw: f32) {
    instance.rotation.x = wrap(instance.rotation.x.0 + pitch);
    instance.rotation.y = wrap(instance.rotation.y.0 + yaw);
}

/**
 * One animation step. The main cube and the button turn proportionally to
 * `elapsed`, the small cubes by a fixed amount per call.
 */
pub fn advance(landing: &mut Landing, elapsed: Duration) {
    let ms = elapsed.as_secs_f32() * 1000.0;
    let scene = &mut landing.scene;
    turn(
        scene.node_mut(landing.main_cube).local_transform_mut(),
        0.0,
        MAIN_CUBE_YAW_PER_MS * ms,
    );
    for &cube in &landing.small_cubes {
        turn(
            scene.node_mut(cube).local_transform_mut(),
            SMALL_CUBE_PITCH_PER_FRAME,
            SMALL_CUBE_YAW_PER_FRAME,
        );
    }
    turn(
        scene.node_mut(landing.button).local_transform_mut(),
        0.0,
        BUTTON_YAW_PER_MS * ms,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_stays_in_range() {
        assert_eq!(wrap(0.0), Rad(0.0));
        assert!((wrap(-0.5).0 - (TAU - 0.5)).abs() < 1e-6);
        assert!((wrap(TAU + 1.0).0 - 1.0).abs() < 1e-5);
        assert!(wrap(-1e-9).0 < TAU);
    }

    #[test]
    fn clock_is_monotonic() {
        let mut clock = FrameClock::new();
        let first = clock.tick();
        let second = clock.tick();
        assert!(first >= Duration::ZERO);
        assert!(second >= Duration::ZERO);
    }
}
