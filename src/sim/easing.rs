//! Easing curves used by the stroke and soap mechanics
//!
//! All functions take a normalised `t` in [0, 1].

use std::f32::consts::FRAC_PI_2;

#[inline]
pub fn ease_in_quad(t: f32) -> f32 {
    t * t
}

#[inline]
pub fn ease_out_sine(t: f32) -> f32 {
    (t * FRAC_PI_2).sin()
}

/// Flat for most of the range, then climbs steeply towards 1
#[inline]
pub fn ease_in_expo(t: f32) -> f32 {
    if t <= 0.0 {
        0.0
    } else {
        2.0_f32.powf(10.0 * t - 10.0)
    }
}
