use std::collections::HashSet;

use winit::event::{Touch, TouchPhase};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionAction
{
        Down,
        Move,
        Up,
        Cancel,
}

impl From<TouchPhase> for MotionAction
{
        fn from(phase: TouchPhase) -> Self
        {
                match phase
                {
                        TouchPhase::Started => MotionAction::Down,
                        TouchPhase::Moved => MotionAction::Move,
                        TouchPhase::Ended => MotionAction::Up,
                        TouchPhase::Cancelled => MotionAction::Cancel,
                }
        }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionEvent
{
        pub action: MotionAction,
        /// Pointers down while the event happened, the reporting one included.
        pub pointer_count: usize,
        pub x: f64,
        pub y: f64,
}

/// Folds per-finger touch events into motion events with a pointer count.
#[derive(Debug, Default)]
pub struct MotionTracker
{
        active: HashSet<u64>,
}

impl MotionTracker
{
        pub fn new() -> Self
        {
                Self::default()
        }

        pub fn pointer_count(&self) -> usize
        {
                self.active.len()
        }

        pub fn on_touch(
                &mut self,
                touch: &Touch,
        ) -> MotionEvent
        {
                self.track(touch.id, touch.phase, touch.location.x, touch.location.y)
        }

        pub fn track(
                &mut self,
                id: u64,
                phase: TouchPhase,
                x: f64,
                y: f64,
        ) -> MotionEvent
        {
                let action = MotionAction::from(phase);

                // Ending pointers still count for the event they end.
                let pointer_count = match action
                {
                        MotionAction::Down | MotionAction::Move =>
                        {
                                self.active.insert(id);
                                self.active.len()
                        }
                        MotionAction::Up | MotionAction::Cancel =>
                        {
                                let count = self.active.len().max(1);
                                self.active.remove(&id);
                                count
                        }
                };

                let event = MotionEvent {
                        action,
                        pointer_count,
                        x,
                        y,
                };

                log::info!(
                        target: "sensor",
                        "motion {:?}: pointers={} x={:.1} y={:.1}",
                        event.action,
                        event.pointer_count,
                        event.x,
                        event.y
                );

                event
        }
}

#[cfg(test)]
mod tests
{
        use super::*;

        #[test]
        fn phases_map_to_actions()
        {
                assert_eq!(MotionAction::from(TouchPhase::Started), MotionAction::Down);
                assert_eq!(MotionAction::from(TouchPhase::Moved), MotionAction::Move);
                assert_eq!(MotionAction::from(TouchPhase::Ended), MotionAction::Up);
                assert_eq!(
                        MotionAction::from(TouchPhase::Cancelled),
                        MotionAction::Cancel
                );
        }

        #[test]
        fn pointer_count_follows_fingers()
        {
                let mut tracker = MotionTracker::new();

                let first = tracker.track(1, TouchPhase::Started, 10.0, 20.0);

                assert_eq!(first.action, MotionAction::Down);
                assert_eq!(first.pointer_count, 1);
                assert_eq!((first.x, first.y), (10.0, 20.0));

                assert_eq!(tracker.track(2, TouchPhase::Started, 0.0, 0.0).pointer_count, 2);
                assert_eq!(tracker.track(1, TouchPhase::Moved, 11.0, 21.0).pointer_count, 2);

                let lifted = tracker.track(2, TouchPhase::Ended, 0.0, 0.0);

                assert_eq!(lifted.action, MotionAction::Up);
                assert_eq!(lifted.pointer_count, 2);
                assert_eq!(tracker.pointer_count(), 1);

                assert_eq!(tracker.track(1, TouchPhase::Cancelled, 0.0, 0.0).pointer_count, 1);
                assert_eq!(tracker.pointer_count(), 0);
        }

        #[test]
        fn stray_end_reports_one_pointer()
        {
                let mut tracker = MotionTracker::new();

                assert_eq!(tracker.track(7, TouchPhase::Ended, 0.0, 0.0).pointer_count, 1);
                assert_eq!(tracker.pointer_count(), 0);
        }
}
