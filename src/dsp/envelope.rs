use super::trigger::SchmittTrigger;

/*
ADSR Envelope Implementation
============================

This module implements the per-voice state machine behind the ADSR module:
an exponential envelope driven by a gate and an optional retrigger.

Vocabulary
----------

  env         The envelope's current value (0.0 to 1.0). The module sends it
              out as 0..10 V.

  decaying    Whether the attack has finished. While the gate is held the
              voice is either rising (attack) or settling towards the
              sustain level (decay/sustain).

  gate        High (≥ 1 V) while a note is held. Dropping the gate starts
              the release from wherever the envelope currently is.

  retrigger   A rising edge restarts the attack without waiting for the gate
              to drop, so repeated notes under a held gate stay distinct.

  rate        Speed of a segment in 1/seconds, from a knob position.


The Shape: Exponential Segments
-------------------------------

  Level
   1.2 ┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄  attack target (overshoot ceiling)
    1.0 ┐    ╭╮
        │   ╱  ╲___________
    S   │  ╱               ╲
        │ ╱                 ╲__
    0.0 └╱─────────────────────╲___→ Time
        Attack Decay  Sustain  Release

Each segment moves a fixed fraction of the remaining distance to its target
every sample:

    env += rate · (target − env) · dt

The attack aims at 1.2 instead of 1.0 so the curve crosses 1.0 in finite
time; at that point the value is clamped and the voice starts decaying.
Decay and release approach their targets asymptotically.


The Math: Knob to Rate
----------------------

    rate(x) = 20000^(1 − x) / 10

    knob 0.0    2000 /s   (sub-millisecond)
    knob 0.5    14.1 /s   (~70 ms time constant)
    knob 1.0    0.1  /s   (10 s time constant)

Knob positions below 1e-4 snap the segment to its target in a single sample:
an attack of 0 jumps to full level on the first gated sample, a decay of 0
lands on the sustain level on the next one.


The State Machine
-----------------

    gate low                       → release towards 0, decaying = false
    gate high, !decaying           → attack towards 1.2, at ≥ 1: clamp, decaying
    gate high, decaying            → decay towards sustain
    retrigger edge (before above)  → decaying = false
*/

/// Attack target. Above 1 so the exponential attack reaches full level.
pub const ATTACK_CEILING: f32 = 1.2;
/// Knob positions below this snap their segment to its target.
pub const INSTANT_SEGMENT: f32 = 1e-4;
/// Distance from a target below which the envelope is considered settled.
pub const SETTLED: f32 = 1e-3;
/// Gate voltage at or above which a note is held.
pub const GATE_HIGH: f32 = 1.0;
/// Release snaps to 0 below this level, before the tail turns subnormal.
pub const RELEASE_FLOOR: f32 = 1e-6;

/// Segment speed in 1/seconds for a knob position in [0, 1].
#[inline]
pub fn exp_rate(knob: f32) -> f32 {
    20_000.0_f32.powf(1.0 - knob) / 10.0
}

/// Knob positions for the four segments, each in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EnvelopeShape {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

/// Which segment indicators are lit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnvelopeLights {
    pub attack: bool,
    pub decay: bool,
    pub sustain: bool,
    pub release: bool,
}

impl EnvelopeLights {
    /// OR two sets of lights, used to summarise every active voice.
    pub fn merge(self, other: Self) -> Self {
        Self {
            attack: self.attack || other.attack,
            decay: self.decay || other.decay,
            sustain: self.sustain || other.sustain,
            release: self.release || other.release,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeVoice {
    env: f32,
    decaying: bool,
    gated: bool,
    retrigger: SchmittTrigger,
    lights: EnvelopeLights,
}

impl EnvelopeVoice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one sample. `gate` and `retrigger` are input voltages, `dt` the
    /// sample period in seconds. Returns the new envelope value.
    pub fn process(&mut self, gate: f32, retrigger: f32, shape: &EnvelopeShape, dt: f32) -> f32 {
        let gated = gate >= GATE_HIGH;
        if self.retrigger.process(retrigger) {
            self.decaying = false;
        }

        let attack = knob(shape.attack);
        let decay = knob(shape.decay);
        let sustain = knob(shape.sustain);
        let release = knob(shape.release);

        if gated {
            if !self.decaying {
                if attack < INSTANT_SEGMENT {
                    self.env = 1.0;
                } else {
                    self.env += segment_step(attack, dt) * (ATTACK_CEILING - self.env);
                }
                if self.env >= 1.0 {
                    self.env = 1.0;
                    self.decaying = true;
                }
            } else if decay < INSTANT_SEGMENT {
                self.env = sustain;
            } else {
                self.env += segment_step(decay, dt) * (sustain - self.env);
            }
        } else {
            self.decaying = false;
            if release < INSTANT_SEGMENT {
                self.env = 0.0;
            } else {
                self.env -= segment_step(release, dt) * self.env;
                if self.env < RELEASE_FLOOR {
                    self.env = 0.0;
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.env));

        self.gated = gated;
        let settled_on_sustain = (self.env - sustain).abs() < SETTLED;
        self.lights = EnvelopeLights {
            attack: gated && !self.decaying,
            decay: gated && self.decaying && !settled_on_sustain,
            sustain: gated && self.decaying && settled_on_sustain,
            release: !gated && self.env >= SETTLED,
        };

        self.env
    }

    pub fn level(&self) -> f32 {
        self.env
    }

    pub fn is_decaying(&self) -> bool {
        self.decaying
    }

    pub fn is_gated(&self) -> bool {
        self.gated
    }

    pub fn lights(&self) -> EnvelopeLights {
        self.lights
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Knob value clamped to [0, 1]; NaN reads as 0.
#[inline]
fn knob(x: f32) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// Fraction of the remaining distance covered in one sample, capped at 1 so
/// fast segments land on their target instead of overshooting it.
#[inline]
fn segment_step(knob: f32, dt: f32) -> f32 {
    (exp_rate(knob) * dt).min(1.0)
}
