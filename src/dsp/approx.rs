//! Fast approximations of the transcendental functions used per sample.

/*
Why Approximate?
================

Oscillators convert a 1V/octave pitch into a frequency with `2^x` and turn a
phase into a sine with `sin(2πx)`. With sixteen voices and several outputs
these calls happen hundreds of thousands of times per second, so the modules
use short polynomials instead of the libm functions.

  exp2_taylor5   split x into integer and fractional parts. The integer
                 part is written straight into the float exponent bits, the
                 fractional part goes through a 5th-order polynomial fitted
                 on [0, 1). Relative error stays below 2e-7 (well under a
                 hundredth of a cent).

  sin_2pi        fold the phase into the quarter-wave [-0.25, 0.25] using
                 the symmetries of sine, then evaluate the odd Taylor series
                 up to x^9. Absolute error stays below 5e-6, which is about
                 -106 dB relative to full scale.
*/

use std::f32::consts::TAU;

/// `2^x` using a bit-shifted integer part and a 5th-order polynomial.
#[inline]
pub fn exp2_taylor5(x: f32) -> f32 {
    let xi = x.floor().clamp(-126.0, 127.0);
    let xf = (x - xi).clamp(0.0, 1.0);

    let yi = f32::from_bits(((xi as i32 + 127) as u32) << 23);
    let yf = 1.0
        + xf * (0.693_153_08
            + xf * (0.240_153_61 + xf * (0.055_826_31 + xf * (0.008_989_34 + xf * 0.001_877_57))));

    yi * yf
}

/// `sin(2π·phase)` via quarter-wave folding and a 9th-order odd polynomial.
#[inline]
pub fn sin_2pi(phase: f32) -> f32 {
    let mut x = phase - phase.floor();
    if x > 0.75 {
        x -= 1.0;
    } else if x > 0.25 {
        x = 0.5 - x;
    }

    let y = TAU * x;
    let y2 = y * y;
    y * (1.0
        + y2 * (-1.0 / 6.0 + y2 * (1.0 / 120.0 + y2 * (-1.0 / 5040.0 + y2 * (1.0 / 362_880.0)))))
}

/// Linearly map `x` from `[x_min, x_max]` onto `[y_min, y_max]`.
#[inline]
pub fn rescale(x: f32, x_min: f32, x_max: f32, y_min: f32, y_max: f32) -> f32 {
    y_min + (x - x_min) / (x_max - x_min) * (y_max - y_min)
}
