//=========================================================================
// Tween Description
//=========================================================================
//
// A single-property animation request, built fluently:
//
// ```text
// Tween::to(node, TweenProperty::Alpha, 0.0, 0.8)
//     .ease(Easing::Power2InOut)
//     .delay(0.5)
//     .yoyo(true)
//     .repeat(Repeat::Forever)
// ```
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::easing::Easing;
use crate::core::display::{Node, NodeId};

//=== TweenId =============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(pub(super) u64);

//=== TweenProperty =======================================================

/// Animatable node property. `Scale` drives both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TweenProperty {
    Alpha,
    X,
    Y,
    Scale,
}

impl TweenProperty {
    pub(super) fn read(self, node: &Node) -> f32 {
        match self {
            Self::Alpha => node.alpha,
            Self::X => node.x,
            Self::Y => node.y,
            Self::Scale => node.scale_x,
        }
    }

    pub(super) fn write(self, node: &mut Node, value: f32) {
        match self {
            Self::Alpha => node.alpha = value,
            Self::X => node.x = value,
            Self::Y => node.y = value,
            Self::Scale => node.set_scale(value),
        }
    }
}

//=== Repeat ==============================================================

/// Extra cycles after the first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Repeat {
    #[default]
    Never,
    Times(u32),
    Forever,
}

impl Repeat {
    /// Total number of cycles, `None` for endless.
    pub(super) fn cycles(self) -> Option<u64> {
        match self {
            Self::Never => Some(1),
            Self::Times(n) => Some(u64::from(n) + 1),
            Self::Forever => None,
        }
    }
}

//=== TweenEnd ============================================================

/// Where the property ends up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenEnd {
    /// Absolute value.
    To(f32),
    /// Offset from the value captured at start.
    By(f32),
}

//=== Tween ===============================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub target: NodeId,
    pub property: TweenProperty,
    pub end: TweenEnd,
    /// Seconds per cycle.
    pub duration: f32,
    pub easing: Easing,
    /// Seconds before the first cycle starts.
    pub delay: f32,
    pub yoyo: bool,
    pub repeat: Repeat,
}

impl Tween {
    pub fn to(target: NodeId, property: TweenProperty, value: f32, duration: f32) -> Self {
        Self::new(target, property, TweenEnd::To(value), duration)
    }

    pub fn by(target: NodeId, property: TweenProperty, delta: f32, duration: f32) -> Self {
        Self::new(target, property, TweenEnd::By(delta), duration)
    }

    fn new(target: NodeId, property: TweenProperty, end: TweenEnd, duration: f32) -> Self {
        Self {
            target,
            property,
            end,
            duration: duration.max(0.0),
            easing: Easing::Linear,
            delay: 0.0,
            yoyo: false,
            repeat: Repeat::Never,
        }
    }

    pub fn ease(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn delay(mut self, seconds: f32) -> Self {
        self.delay = seconds.max(0.0);
        self
    }

    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    /// Value the property holds once the tween has finished.
    pub(super) fn final_value(&self, start: f32, end: f32) -> f32 {
        match self.repeat.cycles() {
            Some(cycles) if self.yoyo && cycles % 2 == 0 => start,
            _ => end,
        }
    }

    /// Value at `elapsed` seconds past the delay, or `None` once finished.
    pub(super) fn sample(&self, start: f32, end: f32, elapsed: f32) -> Option<f32> {
        if self.duration <= 0.0 {
            return None;
        }

        let cycle = (elapsed / self.duration).floor() as u64;
        if let Some(cycles) = self.repeat.cycles() {
            if cycle >= cycles {
                return None;
            }
        }

        let mut progress = (elapsed - cycle as f32 * self.duration) / self.duration;
        if self.yoyo && cycle % 2 == 1 {
            progress = 1.0 - progress;
        }

        Some(start + (end - start) * self.easing.apply(progress))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn node() -> NodeId {
        NodeId(0)
    }

    #[test]
    fn sample_interpolates_linearly() {
        let tween = Tween::to(node(), TweenProperty::X, 100.0, 1.0);
        assert_relative_eq!(tween.sample(0.0, 100.0, 0.25).unwrap(), 25.0);
        assert!(tween.sample(0.0, 100.0, 1.0).is_none());
    }

    #[test]
    fn yoyo_runs_back_on_odd_cycles() {
        let tween = Tween::to(node(), TweenProperty::Scale, 0.95, 0.1)
            .yoyo(true)
            .repeat(Repeat::Times(1));

        assert_relative_eq!(tween.sample(1.0, 0.95, 0.05).unwrap(), 0.975, epsilon = 1e-5);
        assert_relative_eq!(tween.sample(1.0, 0.95, 0.15).unwrap(), 0.975, epsilon = 1e-5);
        assert!(tween.sample(1.0, 0.95, 0.2).is_none());
        assert_relative_eq!(tween.final_value(1.0, 0.95), 1.0);
    }

    #[test]
    fn forever_never_finishes() {
        let tween = Tween::by(node(), TweenProperty::Y, -10.0, 3.0)
            .yoyo(true)
            .repeat(Repeat::Forever);
        assert!(tween.sample(0.0, -10.0, 3600.0).is_some());
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let tween = Tween::to(node(), TweenProperty::Alpha, 1.0, 0.0);
        assert!(tween.sample(0.0, 1.0, 0.0).is_none());
        assert_relative_eq!(tween.final_value(0.0, 1.0), 1.0);
    }
}
