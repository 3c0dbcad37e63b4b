//! Tests for hinge rotation service.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::door::TransitionKind;
    use crate::tween::{Easing, HingeAnimator, HingeTween};

    #[test]
    fn test_easing_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::EaseInSine,
            Easing::EaseOutSine,
            Easing::EaseInOutSine,
            Easing::EaseInOutQuad,
            Easing::EaseOutCubic,
        ] {
            assert!(easing.sample(0.0).abs() < 1e-5, "{:?} at 0", easing);
            assert!((easing.sample(1.0) - 1.0).abs() < 1e-5, "{:?} at 1", easing);
        }
    }

    #[test]
    fn test_easing_clamps_out_of_range() {
        assert!((Easing::Linear.sample(2.0) - 1.0).abs() < 1e-5);
        assert!(Easing::Linear.sample(-1.0).abs() < 1e-5);
    }

    #[test]
    fn test_linear_tween_halfway() {
        let mut tween = HingeTween::new(0.0, 90.0, 1.0, Easing::Linear);

        let angle = tween.advance(0.5);
        assert!((angle - 45.0).abs() < 1e-3, "angle = {}", angle);
        assert!(!tween.is_finished());

        let angle = tween.advance(0.5);
        assert_eq!(angle, 90.0);
        assert!(tween.is_finished());
    }

    #[test]
    fn test_zero_duration_tween_is_finished() {
        let tween = HingeTween::new(0.0, -90.0, 0.0, Easing::EaseOutSine);
        assert!(tween.is_finished());
        assert_eq!(tween.angle(), -90.0);
    }

    #[test]
    fn test_animator_reports_completion_once() {
        let mut animator = HingeAnimator::new(Entity::PLACEHOLDER);
        animator.rotate_to(TransitionKind::Open, 90.0, 1.0, Easing::Linear);

        assert!(animator.advance(0.6).is_empty());
        assert_eq!(animator.advance(0.6), vec![TransitionKind::Open]);
        assert!(animator.advance(0.6).is_empty());
        assert_eq!(animator.angle(), 90.0);
        assert!(animator.is_idle());
    }

    #[test]
    fn test_stopped_tween_never_completes() {
        let mut animator = HingeAnimator::new(Entity::PLACEHOLDER);
        animator.rotate_to(TransitionKind::Open, 90.0, 1.0, Easing::Linear);
        animator.advance(0.5);

        assert!(animator.stop(TransitionKind::Open));
        assert!(!animator.stop(TransitionKind::Open)); // повторная отмена: no-op

        assert!(animator.advance(5.0).is_empty());
        // Угол остался там, где tween был прерван
        assert!((animator.angle() - 45.0).abs() < 1e-3);
    }

    #[test]
    fn test_close_starts_from_interrupted_angle() {
        let mut animator = HingeAnimator::new(Entity::PLACEHOLDER);
        animator.rotate_to(TransitionKind::Open, 90.0, 1.0, Easing::Linear);
        animator.advance(0.5);

        animator.stop(TransitionKind::Open);
        animator.rotate_to(TransitionKind::Close, 0.0, 1.0, Easing::Linear);

        animator.advance(0.5);
        assert!((animator.angle() - 22.5).abs() < 1e-3, "angle = {}", animator.angle());

        assert_eq!(animator.advance(0.5), vec![TransitionKind::Close]);
        assert_eq!(animator.angle(), 0.0);
    }

    #[test]
    fn test_same_name_replaces_running_tween() {
        let mut animator = HingeAnimator::new(Entity::PLACEHOLDER);
        animator.rotate_to(TransitionKind::Open, 90.0, 1.0, Easing::Linear);
        animator.advance(0.5);
        animator.rotate_to(TransitionKind::Open, -90.0, 1.0, Easing::Linear);

        // Старый tween (→ 90) не завершится: финиш только один, у нового
        assert!(animator.advance(0.6).is_empty());
        assert_eq!(animator.advance(0.6), vec![TransitionKind::Open]);
        assert_eq!(animator.angle(), -90.0);
    }

    #[test]
    fn test_degenerate_duration_is_instant() {
        for duration in [f32::NAN, f32::INFINITY, -1.0] {
            let mut tween = HingeTween::new(0.0, 90.0, duration, Easing::Linear);
            assert!(tween.is_finished(), "duration {}", duration);
            assert_eq!(tween.advance(0.1), 90.0);
        }
    }
}
