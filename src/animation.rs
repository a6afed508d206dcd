//! Animation of the nested content of a [`TreeNode`](crate::TreeNode).
//!
//! The node hands a [`Transition`] to an [`Animator`] whenever its state changes.
//! The host drives the [`Animator`] with [`Animator::tick`] once per frame and renders the current [`Keyframe`].

use std::time::Duration;

/// Columns the nested content is shifted to the right while collapsed.
pub const DEFAULT_OUTSET: f32 = 2.0;

/// Fixed integration step of the [`Spring`].
const STEP: f32 = 0.001;
/// Longer ticks are shortened to this. The default spring settles well before.
const MAX_TICK: Duration = Duration::from_secs(10);

/// Visual values of the nested content wrapper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    /// Share of the intrinsic height of the nested content. `1.0` shows all of it.
    pub height: f32,
    /// `0.0` is invisible, `1.0` is fully shown.
    pub opacity: f32,
    /// Horizontal offset in columns.
    pub offset: f32,
}

impl Keyframe {
    pub const EXPANDED: Self = Self {
        height: 1.0,
        opacity: 1.0,
        offset: 0.0,
    };

    #[must_use]
    pub const fn collapsed(outset: f32) -> Self {
        Self {
            height: 0.0,
            opacity: 0.0,
            offset: outset,
        }
    }

    /// Where the nested content should end up for the given open state.
    #[must_use]
    pub const fn target(open: bool, outset: f32) -> Self {
        if open {
            Self::EXPANDED
        } else {
            Self::collapsed(outset)
        }
    }

    const fn to_array(self) -> [f32; 3] {
        [self.height, self.opacity, self.offset]
    }

    const fn from_array([height, opacity, offset]: [f32; 3]) -> Self {
        Self {
            height,
            opacity,
            offset,
        }
    }
}

/// A [`Keyframe`] where every field is optional.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PartialKeyframe {
    pub height: Option<f32>,
    pub opacity: Option<f32>,
    pub offset: Option<f32>,
}

impl PartialKeyframe {
    /// Fill the missing fields from `defaults`.
    #[must_use]
    pub fn or(self, defaults: Keyframe) -> Keyframe {
        Keyframe {
            height: self.height.unwrap_or(defaults.height),
            opacity: self.opacity.unwrap_or(defaults.opacity),
            offset: self.offset.unwrap_or(defaults.offset),
        }
    }
}

/// Timing of a [`Spring`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    pub tension: f32,
    pub friction: f32,
    pub mass: f32,
    /// A channel only rests when its speed is below this.
    pub rest_speed_threshold: f32,
    /// A channel only rests when its distance to the target is below this.
    pub rest_displacement_threshold: f32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            tension: 170.0,
            friction: 26.0,
            mass: 1.0,
            rest_speed_threshold: 1.0,
            rest_displacement_threshold: 0.01,
        }
    }
}

/// Caller supplied overrides of the animation defaults.
///
/// Returned by the `animation_config` function of the [`NodeProps`](crate::NodeProps) for the current open state.
/// Every field left as `None` uses its default.
/// The target of the transition and whether it is immediate can not be overridden.
///
/// # Example
///
/// ```
/// # use tui_tree_node::{AnimationOverrides, NodeProps};
/// let props = NodeProps::new("a", "Alfa").animation_config(|open| AnimationOverrides {
///     friction: Some(if open { 20.0 } else { 40.0 }),
///     ..AnimationOverrides::default()
/// });
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct AnimationOverrides {
    pub tension: Option<f32>,
    pub friction: Option<f32>,
    pub mass: Option<f32>,
    pub rest_speed_threshold: Option<f32>,
    pub rest_displacement_threshold: Option<f32>,
    /// Where the nested content starts when the node is mounted.
    pub from: PartialKeyframe,
    /// Replaces [`DEFAULT_OUTSET`].
    pub outset: Option<f32>,
}

impl AnimationOverrides {
    #[must_use]
    pub fn spring_config(&self) -> SpringConfig {
        let defaults = SpringConfig::default();
        SpringConfig {
            tension: self.tension.unwrap_or(defaults.tension),
            friction: self.friction.unwrap_or(defaults.friction),
            mass: self.mass.unwrap_or(defaults.mass),
            rest_speed_threshold: self
                .rest_speed_threshold
                .unwrap_or(defaults.rest_speed_threshold),
            rest_displacement_threshold: self
                .rest_displacement_threshold
                .unwrap_or(defaults.rest_displacement_threshold),
        }
    }

    #[must_use]
    pub fn outset(&self) -> f32 {
        self.outset.unwrap_or(DEFAULT_OUTSET)
    }

    /// Build the [`Transition`] towards the given open state.
    #[must_use]
    pub fn transition(&self, open: bool, immediate: bool) -> Transition {
        let outset = self.outset();
        Transition {
            from: self.from.or(Keyframe::collapsed(outset)),
            to: Keyframe::target(open, outset),
            config: self.spring_config(),
            immediate,
        }
    }
}

/// Everything an [`Animator`] needs to move the nested content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// Start of the very first transition. Later transitions start where the previous one currently is.
    pub from: Keyframe,
    pub to: Keyframe,
    pub config: SpringConfig,
    /// Snap to `to` instead of easing.
    pub immediate: bool,
}

/// Produces the frames of the nested content.
///
/// [`Spring`] is the default. Implement this to use another interpolation.
pub trait Animator {
    /// Move towards a new target.
    ///
    /// A running animation is retargeted from its current position.
    fn animate(&mut self, transition: &Transition);

    /// Advance the animation by `dt`.
    ///
    /// Returns `true` while the animation still moves.
    fn tick(&mut self, dt: Duration) -> bool;

    /// The current values.
    fn frame(&self) -> Keyframe;

    fn is_running(&self) -> bool;

    /// Stop without reaching the target. Further ticks do nothing until the next [`animate`](Self::animate).
    fn cancel(&mut self);
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Channel {
    position: f32,
    velocity: f32,
    target: f32,
}

impl Channel {
    fn step(&mut self, config: &SpringConfig, dt: f32) {
        let spring = -config.tension * (self.position - self.target);
        let damper = -config.friction * self.velocity;
        let acceleration = (spring + damper) / config.mass.max(f32::EPSILON);
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    fn is_resting(&self, config: &SpringConfig) -> bool {
        self.velocity.abs() < config.rest_speed_threshold
            && (self.position - self.target).abs() < config.rest_displacement_threshold
    }

    fn snap(&mut self) {
        self.position = self.target;
        self.velocity = 0.0;
    }
}

/// Damped spring moving every field of a [`Keyframe`] on its own.
///
/// # Example
///
/// ```
/// # use std::time::Duration;
/// # use tui_tree_node::{AnimationOverrides, Animator, Keyframe, Spring};
/// let mut spring = Spring::default();
/// spring.animate(&AnimationOverrides::default().transition(true, false));
/// while spring.tick(Duration::from_millis(16)) {}
/// assert_eq!(spring.frame(), Keyframe::EXPANDED);
/// ```
#[derive(Debug, Default, Clone)]
pub struct Spring {
    channels: [Channel; 3],
    config: SpringConfig,
    started: bool,
    running: bool,
    /// Time not yet integrated, in seconds.
    pending: f32,
}

impl Animator for Spring {
    fn animate(&mut self, transition: &Transition) {
        if !self.started {
            self.started = true;
            for (channel, position) in self.channels.iter_mut().zip(transition.from.to_array()) {
                channel.position = position;
                channel.velocity = 0.0;
            }
        }
        for (channel, target) in self.channels.iter_mut().zip(transition.to.to_array()) {
            channel.target = target;
        }
        self.config = transition.config;

        if transition.immediate {
            self.channels.iter_mut().for_each(Channel::snap);
            self.running = false;
            self.pending = 0.0;
        } else {
            self.running = !self
                .channels
                .iter()
                .all(|channel| channel.is_resting(&self.config));
            if !self.running {
                self.channels.iter_mut().for_each(Channel::snap);
            }
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn tick(&mut self, dt: Duration) -> bool {
        if !self.running {
            return false;
        }

        self.pending += dt.min(MAX_TICK).as_secs_f32();
        let steps = (self.pending / STEP).floor();
        self.pending = (self.pending - steps * STEP).max(0.0);
        for _ in 0..steps as u32 {
            for channel in &mut self.channels {
                channel.step(&self.config, STEP);
            }
            if self
                .channels
                .iter()
                .all(|channel| channel.is_resting(&self.config))
            {
                break;
            }
        }

        let mut resting = true;
        for channel in &mut self.channels {
            if channel.is_resting(&self.config) {
                channel.snap();
            } else {
                resting = false;
            }
        }
        if resting {
            tracing::trace!(target: "tui_tree_node::animation", "spring settled");
            self.running = false;
            self.pending = 0.0;
        }
        self.running
    }

    fn frame(&self) -> Keyframe {
        Keyframe::from_array(self.channels.map(|channel| channel.position))
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn cancel(&mut self) {
        self.running = false;
        self.pending = 0.0;
        for channel in &mut self.channels {
            channel.velocity = 0.0;
        }
    }
}

#[cfg(test)]
fn advance(spring: &mut Spring, millis: u64) {
    spring.tick(Duration::from_millis(millis));
}

#[test]
fn overrides_fall_back_per_field() {
    let overrides = AnimationOverrides {
        tension: Some(300.0),
        from: PartialKeyframe {
            opacity: Some(0.5),
            ..PartialKeyframe::default()
        },
        ..AnimationOverrides::default()
    };
    let config = overrides.spring_config();
    assert!((config.tension - 300.0).abs() < f32::EPSILON);
    assert!((config.friction - 26.0).abs() < f32::EPSILON);

    let transition = overrides.transition(true, true);
    assert_eq!(
        transition.from,
        Keyframe {
            height: 0.0,
            opacity: 0.5,
            offset: DEFAULT_OUTSET,
        }
    );
    assert_eq!(transition.to, Keyframe::EXPANDED);
    assert!(transition.immediate);
}

#[test]
fn outset_override_moves_collapsed_target() {
    let overrides = AnimationOverrides {
        outset: Some(5.0),
        ..AnimationOverrides::default()
    };
    assert_eq!(overrides.transition(false, false).to, Keyframe::collapsed(5.0));
}

#[test]
fn first_animation_starts_at_from() {
    let mut spring = Spring::default();
    spring.animate(&AnimationOverrides::default().transition(true, false));
    assert_eq!(spring.frame(), Keyframe::collapsed(DEFAULT_OUTSET));
    assert!(spring.is_running());
}

#[test]
fn eases_towards_target() {
    let mut spring = Spring::default();
    spring.animate(&AnimationOverrides::default().transition(true, false));
    advance(&mut spring, 100);
    let frame = spring.frame();
    assert!(frame.height > 0.0 && frame.height < 1.0, "{frame:?}");
    assert!(frame.offset > 0.0 && frame.offset < DEFAULT_OUTSET, "{frame:?}");
    assert!(spring.is_running());

    advance(&mut spring, 2000);
    assert_eq!(spring.frame(), Keyframe::EXPANDED);
    assert!(!spring.is_running());
    assert!(!spring.tick(Duration::from_millis(16)));
}

#[test]
fn immediate_snaps() {
    let mut spring = Spring::default();
    spring.animate(&AnimationOverrides::default().transition(true, true));
    assert_eq!(spring.frame(), Keyframe::EXPANDED);
    assert!(!spring.is_running());
}

#[test]
fn retarget_continues_from_current_position() {
    let mut spring = Spring::default();
    spring.animate(&AnimationOverrides::default().transition(true, false));
    advance(&mut spring, 100);
    let before = spring.frame();

    spring.animate(&AnimationOverrides::default().transition(false, false));
    assert_eq!(spring.frame(), before);
    assert!(spring.is_running());

    advance(&mut spring, 2000);
    assert_eq!(spring.frame(), Keyframe::collapsed(DEFAULT_OUTSET));
}

#[test]
fn animate_to_current_position_does_not_run() {
    let mut spring = Spring::default();
    spring.animate(&AnimationOverrides::default().transition(false, false));
    assert!(!spring.is_running());
    assert_eq!(spring.frame(), Keyframe::collapsed(DEFAULT_OUTSET));
}

#[test]
fn very_long_tick_is_bounded_and_settles() {
    let mut spring = Spring::default();
    spring.animate(&AnimationOverrides::default().transition(true, false));
    assert!(!spring.tick(Duration::from_secs(40_000)));
    assert_eq!(spring.frame(), Keyframe::EXPANDED);
    assert!(!spring.is_running());
}

#[test]
fn short_ticks_carry_the_remainder() {
    let mut spring = Spring::default();
    spring.animate(&AnimationOverrides::default().transition(true, false));
    // Each tick is below one integration step
    for _ in 0..10 {
        spring.tick(Duration::from_micros(500));
    }
    assert!(spring.frame().height > 0.0);
}

#[test]
fn cancel_stops_in_place() {
    let mut spring = Spring::default();
    spring.animate(&AnimationOverrides::default().transition(true, false));
    advance(&mut spring, 50);
    let before = spring.frame();

    spring.cancel();
    assert!(!spring.is_running());
    advance(&mut spring, 500);
    assert_eq!(spring.frame(), before);
}
