//=========================================================================
// Tween Engine
//=========================================================================
//
// Frame-driven interpolation of node properties.
//
// Lifecycle of one tween:
//   animate() → waiting (delay) → start captured → cycles → final value
//                                                           → reported
//
// A new tween on the same (target, property) replaces the running one.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::trace;

//=== Internal Dependencies ===============================================

use super::tween::{Tween, TweenEnd, TweenId};
use super::Animator;
use crate::core::display::{DisplayTree, NodeId};

//=== ActiveTween =========================================================

struct ActiveTween {
    id: TweenId,
    tween: Tween,
    elapsed: f32,
    // (start, end), captured on first activation
    range: Option<(f32, f32)>,
}

//=== TweenEngine =========================================================

#[derive(Default)]
pub struct TweenEngine {
    tweens: Vec<ActiveTween>,
    next_id: u64,
}

impl TweenEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tweens not yet finished or cancelled.
    pub fn running_count(&self) -> usize {
        self.tweens.len()
    }

    /// Returns `true` if any tween targets `node`.
    pub fn is_animating(&self, node: NodeId) -> bool {
        self.tweens.iter().any(|t| t.tween.target == node)
    }
}

impl Animator for TweenEngine {
    fn animate(&mut self, tween: Tween) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;

        self.tweens
            .retain(|t| !(t.tween.target == tween.target && t.tween.property == tween.property));

        trace!("Tween {:?}: {:?} {:?} over {}s", id, tween.target, tween.property, tween.duration);
        self.tweens.push(ActiveTween {
            id,
            tween,
            elapsed: 0.0,
            range: None,
        });
        id
    }

    fn cancel(&mut self, id: TweenId) -> bool {
        let before = self.tweens.len();
        self.tweens.retain(|t| t.id != id);
        self.tweens.len() != before
    }

    fn cancel_target(&mut self, target: NodeId) {
        self.tweens.retain(|t| t.tween.target != target);
    }

    fn is_running(&self, id: TweenId) -> bool {
        self.tweens.iter().any(|t| t.id == id)
    }

    fn update(&mut self, dt: Duration, tree: &mut DisplayTree) -> Vec<TweenId> {
        let dt = dt.as_secs_f32();
        let mut completed = Vec::new();

        self.tweens.retain_mut(|active| {
            let Some(node) = tree.node_mut(active.tween.target) else {
                trace!("Tween {:?} dropped: target released", active.id);
                return false;
            };

            active.elapsed += dt;
            let local = active.elapsed - active.tween.delay;
            if local < 0.0 {
                return true;
            }

            let property = active.tween.property;
            let (start, end) = *active.range.get_or_insert_with(|| {
                let start = property.read(node);
                let end = match active.tween.end {
                    TweenEnd::To(value) => value,
                    TweenEnd::By(delta) => start + delta,
                };
                (start, end)
            });

            match active.tween.sample(start, end, local) {
                Some(value) => {
                    property.write(node, value);
                    true
                }
                None => {
                    property.write(node, active.tween.final_value(start, end));
                    completed.push(active.id);
                    false
                }
            }
        });

        completed
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::animation::{Easing, Repeat, TweenProperty};
    use approx::assert_relative_eq;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn setup() -> (DisplayTree, NodeId, TweenEngine) {
        let mut tree = DisplayTree::default();
        let node = tree.create_container();
        (tree, node, TweenEngine::new())
    }

    #[test]
    fn fade_reaches_target_and_reports_completion() {
        let (mut tree, node, mut engine) = setup();
        let id = engine.animate(Tween::to(node, TweenProperty::Alpha, 0.0, 0.8).ease(Easing::Power2InOut));

        assert!(engine.update(ms(400), &mut tree).is_empty());
        assert_relative_eq!(tree.node(node).unwrap().alpha, 0.5, epsilon = 1e-3);

        let done = engine.update(ms(400), &mut tree);
        assert_eq!(done, vec![id]);
        assert_relative_eq!(tree.node(node).unwrap().alpha, 0.0);
        assert!(!engine.is_running(id));
    }

    #[test]
    fn start_is_captured_after_delay() {
        let (mut tree, node, mut engine) = setup();
        engine.animate(Tween::to(node, TweenProperty::X, 100.0, 1.0).delay(0.5));

        engine.update(ms(250), &mut tree);
        // Moved by someone else before the tween becomes active
        tree.node_mut(node).unwrap().x = 50.0;

        engine.update(ms(750), &mut tree);
        assert_relative_eq!(tree.node(node).unwrap().x, 75.0, epsilon = 1e-3);
    }

    #[test]
    fn same_property_overwrites() {
        let (_tree, node, mut engine) = setup();
        let first = engine.animate(Tween::to(node, TweenProperty::Scale, 1.05, 0.3));
        let alpha = engine.animate(Tween::to(node, TweenProperty::Alpha, 0.7, 0.2));
        let second = engine.animate(Tween::to(node, TweenProperty::Scale, 1.0, 0.3));

        assert!(!engine.is_running(first));
        assert!(engine.is_running(alpha));
        assert!(engine.is_running(second));
    }

    #[test]
    fn yoyo_press_returns_to_start() {
        let (mut tree, node, mut engine) = setup();
        engine.animate(
            Tween::to(node, TweenProperty::Scale, 0.95, 0.1)
                .yoyo(true)
                .repeat(Repeat::Times(1))
                .ease(Easing::Power2InOut),
        );

        engine.update(ms(100), &mut tree);
        engine.update(ms(150), &mut tree);
        assert_relative_eq!(tree.node(node).unwrap().scale_x, 1.0);
        assert_eq!(engine.running_count(), 0);
    }

    #[test]
    fn relative_float_loops_forever() {
        let (mut tree, node, mut engine) = setup();
        tree.node_mut(node).unwrap().y = 300.0;
        let id = engine.animate(
            Tween::by(node, TweenProperty::Y, -10.0, 3.0)
                .ease(Easing::SineInOut)
                .yoyo(true)
                .repeat(Repeat::Forever),
        );

        engine.update(ms(1500), &mut tree);
        assert_relative_eq!(tree.node(node).unwrap().y, 295.0, epsilon = 1e-3);

        for _ in 0..20 {
            engine.update(ms(1000), &mut tree);
        }
        assert!(engine.is_running(id));
        let y = tree.node(node).unwrap().y;
        assert!((290.0..=300.0).contains(&y));
    }

    #[test]
    fn released_target_is_dropped() {
        let (mut tree, node, mut engine) = setup();
        let id = engine.animate(Tween::to(node, TweenProperty::Alpha, 0.0, 1.0));
        tree.release(node);

        assert!(engine.update(ms(16), &mut tree).is_empty());
        assert!(!engine.is_running(id));
    }

    #[test]
    fn cancel_target_stops_all_its_tweens() {
        let (mut tree, node, mut engine) = setup();
        engine.animate(Tween::to(node, TweenProperty::Alpha, 0.0, 1.0));
        engine.animate(Tween::to(node, TweenProperty::X, 10.0, 1.0));
        engine.cancel_target(node);

        assert_eq!(engine.running_count(), 0);
        engine.update(ms(500), &mut tree);
        assert_relative_eq!(tree.node(node).unwrap().alpha, 1.0);
    }
}
