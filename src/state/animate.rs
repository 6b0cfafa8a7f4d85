//! Motion Sampling - Easing curves and style interpolation
//!
//! Animations are sampled, never scheduled: given the time an element was
//! revealed and the current time, [`Transition::progress`] returns how far
//! along its entrance it is. Nothing here reads a clock, so every frame is
//! reproducible from `(revealed_at, now)`.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use spark_folio::state::animate::{Easing, Transition};
//!
//! let t = Transition::tween(Duration::from_millis(600), Easing::Linear)
//!     .with_delay(Duration::from_millis(300));
//!
//! assert_eq!(t.progress(Duration::from_millis(300)), 0.0);
//! assert_eq!(t.progress(Duration::from_millis(600)), 0.5);
//! assert_eq!(t.progress(Duration::from_secs(5)), 1.0);
//! ```

use std::time::Duration;

// =============================================================================
// EASING
// =============================================================================

/// Progress curve of a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Damped spring from 0 to 1. Its length is its settle time, not
    /// the transition duration.
    Spring {
        stiffness: f32,
        damping: f32,
        mass: f32,
    },
}

/// Spring considered settled once its envelope drops below this.
const SPRING_REST: f32 = 0.001;

impl Easing {
    pub const fn spring(stiffness: f32, damping: f32) -> Self {
        Self::Spring {
            stiffness,
            damping,
            mass: 1.0,
        }
    }

    /// Eased value for a tween at linear progress `t` (0..=1).
    ///
    /// Springs are time based; use [`Easing::spring_at`] for them. Here they
    /// fall back to ease-out.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t * t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::Spring { .. } => Self::EaseOut.apply(t),
        }
    }

    /// Position of a spring released from rest at 0 towards 1, `secs` later.
    ///
    /// Under-damped springs overshoot past 1 before settling.
    pub fn spring_at(stiffness: f32, damping: f32, mass: f32, secs: f32) -> f32 {
        if secs <= 0.0 {
            return 0.0;
        }
        let mass = mass.max(f32::EPSILON);
        let stiffness = stiffness.max(f32::EPSILON);
        let omega = (stiffness / mass).sqrt();
        let zeta = damping / (2.0 * (stiffness * mass).sqrt());

        if zeta < 1.0 {
            let omega_d = omega * (1.0 - zeta * zeta).sqrt();
            let envelope = (-zeta * omega * secs).exp();
            1.0 - envelope
                * ((omega_d * secs).cos() + (zeta * omega / omega_d) * (omega_d * secs).sin())
        } else if (zeta - 1.0).abs() < 1e-4 {
            1.0 - (-omega * secs).exp() * (1.0 + omega * secs)
        } else {
            let root = (zeta * zeta - 1.0).sqrt();
            let r1 = -omega * (zeta - root);
            let r2 = -omega * (zeta + root);
            1.0 - (r2 * (r1 * secs).exp() - r1 * (r2 * secs).exp()) / (r2 - r1)
        }
    }

    /// Time for a spring to come to rest.
    pub fn spring_settle_time(stiffness: f32, damping: f32, mass: f32) -> Duration {
        let mass = mass.max(f32::EPSILON);
        let stiffness = stiffness.max(f32::EPSILON);
        let omega = (stiffness / mass).sqrt();
        let zeta = damping / (2.0 * (stiffness * mass).sqrt());
        // Slowest decaying mode governs the tail.
        let rate = if zeta < 1.0 {
            zeta * omega
        } else {
            omega * (zeta - (zeta * zeta - 1.0).sqrt())
        };
        if !rate.is_finite() || rate <= 0.0 {
            return Duration::from_secs(10);
        }
        Duration::from_secs_f32(((1.0 / SPRING_REST).ln() / rate).min(10.0))
    }
}

// =============================================================================
// TRANSITION
// =============================================================================

/// How a property travels from its hidden value to its visible value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub duration: Duration,
    pub delay: Duration,
    pub easing: Easing,
}

impl Transition {
    pub const fn tween(duration: Duration, easing: Easing) -> Self {
        Self {
            duration,
            delay: Duration::ZERO,
            easing,
        }
    }

    /// A spring transition; duration is derived from settle time.
    pub fn spring(stiffness: f32, damping: f32) -> Self {
        Self {
            duration: Easing::spring_settle_time(stiffness, damping, 1.0),
            delay: Duration::ZERO,
            easing: Easing::spring(stiffness, damping),
        }
    }

    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Eased progress `elapsed` after the reveal. Springs may exceed 1.0
    /// while overshooting; tweens are clamped to 0..=1.
    pub fn progress(&self, elapsed: Duration) -> f32 {
        let Some(active) = elapsed.checked_sub(self.delay) else {
            return 0.0;
        };

        match self.easing {
            Easing::Spring {
                stiffness,
                damping,
                mass,
            } => {
                if active >= self.duration {
                    1.0
                } else {
                    Easing::spring_at(stiffness, damping, mass, active.as_secs_f32())
                }
            }
            easing => {
                if self.duration.is_zero() {
                    return 1.0;
                }
                let t = active.as_secs_f32() / self.duration.as_secs_f32();
                easing.apply(t)
            }
        }
    }

    /// Whether the transition has fully played `elapsed` after reveal.
    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.delay.saturating_add(self.duration)
    }
}

// =============================================================================
// MOTION STYLE
// =============================================================================

/// Animatable visual properties of an element.
///
/// Offsets are in CSS pixels of the original design; the renderer converts
/// them to rows and columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionStyle {
    pub opacity: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    /// Horizontal scale (underline growth).
    pub scale_x: f32,
    /// Fill fraction of bar-like elements (0..=1).
    pub fill: f32,
}

impl Default for MotionStyle {
    fn default() -> Self {
        Self::VISIBLE
    }
}

impl MotionStyle {
    /// Fully shown, at rest.
    pub const VISIBLE: Self = Self {
        opacity: 1.0,
        offset_x: 0.0,
        offset_y: 0.0,
        scale_x: 1.0,
        fill: 1.0,
    };

    /// Transparent, otherwise at rest.
    pub const TRANSPARENT: Self = Self {
        opacity: 0.0,
        ..Self::VISIBLE
    };

    pub const fn faded() -> Self {
        Self::TRANSPARENT
    }

    pub const fn offset_y(mut self, y: f32) -> Self {
        self.offset_y = y;
        self
    }

    pub const fn offset_x(mut self, x: f32) -> Self {
        self.offset_x = x;
        self
    }

    pub const fn scale_x(mut self, scale: f32) -> Self {
        self.scale_x = scale;
        self
    }

    pub const fn fill(mut self, fill: f32) -> Self {
        self.fill = fill;
        self
    }

    pub const fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Interpolate from `from` to `to` by `t`. `t` is not clamped so springs
    /// can overshoot; opacity and fill are clamped on output.
    pub fn mix(from: Self, to: Self, t: f32) -> Self {
        let lerp = |a: f32, b: f32| a + (b - a) * t;
        Self {
            opacity: lerp(from.opacity, to.opacity).clamp(0.0, 1.0),
            offset_x: lerp(from.offset_x, to.offset_x),
            offset_y: lerp(from.offset_y, to.offset_y),
            scale_x: lerp(from.scale_x, to.scale_x).max(0.0),
            fill: lerp(from.fill, to.fill).clamp(0.0, 1.0),
        }
    }
}
