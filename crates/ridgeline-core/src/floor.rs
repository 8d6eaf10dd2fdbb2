use serde::{Deserialize, Serialize};

use crate::segment::Segment;
use crate::vector::Vec2;

/// One entry of a floor's cyclic motion: move by `velocity` each tick for
/// `frames` ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionStep {
    pub velocity: Vec2,
    pub frames: u32,
}

/// Cyclic, piecewise-constant velocity schedule of an animated floor.
///
/// `index` always points at a valid step; the active velocity only changes
/// when a step's frame budget is used up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MotionSchedule {
    steps: Vec<MotionStep>,
    index: usize,
    frame: u32,
    velocity: Vec2,
}

impl MotionSchedule {
    /// Returns `None` for an empty step list. Callers validate `frames > 0`
    /// (see [`crate::map::Map::new`]).
    pub fn new(steps: Vec<MotionStep>) -> Option<Self> {
        let velocity = steps.first()?.velocity;
        Some(Self {
            steps,
            index: 0,
            frame: 0,
            velocity,
        })
    }

    pub fn steps(&self) -> &[MotionStep] {
        &self.steps
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Count one tick against the active step, rolling over to the next step
    /// (wrapping) once its frame budget is spent.
    fn tick(&mut self) {
        self.frame += 1;
        if self.frame >= self.steps[self.index].frames {
            self.index = (self.index + 1) % self.steps.len();
            self.frame = 0;
            self.velocity = self.steps[self.index].velocity;
        }
    }
}

/// A walkable segment, optionally carried along a motion schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Floor {
    pub segment: Segment,
    pub motion: Option<MotionSchedule>,
}

impl Floor {
    pub fn fixed(segment: Segment) -> Self {
        Self {
            segment,
            motion: None,
        }
    }

    /// An empty step list yields a fixed floor.
    pub fn animated(segment: Segment, steps: Vec<MotionStep>) -> Self {
        Self {
            segment,
            motion: MotionSchedule::new(steps),
        }
    }

    pub fn is_animated(&self) -> bool {
        self.motion.is_some()
    }

    /// Velocity the floor moves with during the current tick.
    pub fn velocity(&self) -> Vec2 {
        self.motion
            .as_ref()
            .map_or(Vec2::ZERO, MotionSchedule::velocity)
    }

    /// Advance one tick: translate by the active velocity, then step the
    /// schedule. Fixed floors are left untouched.
    pub fn advance(&mut self) {
        let Some(motion) = self.motion.as_mut() else {
            return;
        };
        self.segment.translate(motion.velocity);
        motion.tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat() -> Segment {
        Segment::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0))
    }

    fn down_then_up() -> Floor {
        Floor::animated(
            flat(),
            vec![
                MotionStep {
                    velocity: Vec2::new(0.0, -1.0),
                    frames: 10,
                },
                MotionStep {
                    velocity: Vec2::new(0.0, 1.0),
                    frames: 10,
                },
            ],
        )
    }

    #[test]
    fn fixed_floor_never_moves() {
        let mut floor = Floor::fixed(flat());
        for _ in 0..50 {
            floor.advance();
        }
        assert_eq!(floor.segment, flat());
        assert_eq!(floor.velocity(), Vec2::ZERO);
        assert!(!floor.is_animated());
    }

    #[test]
    fn empty_schedule_is_fixed() {
        let floor = Floor::animated(flat(), Vec::new());
        assert!(!floor.is_animated());
    }

    #[test]
    fn schedule_displacement_and_return() {
        let mut floor = down_then_up();
        for _ in 0..10 {
            floor.advance();
        }
        assert_eq!(floor.segment.p, Vec2::new(0.0, -10.0));
        assert_eq!(floor.segment.q, Vec2::new(10.0, -10.0));

        for _ in 0..10 {
            floor.advance();
        }
        assert_eq!(floor.segment, flat());
    }

    #[test]
    fn velocity_switches_at_step_boundary() {
        let mut floor = down_then_up();
        for _ in 0..9 {
            floor.advance();
        }
        assert_eq!(floor.velocity(), Vec2::new(0.0, -1.0));
        floor.advance();
        assert_eq!(floor.velocity(), Vec2::new(0.0, 1.0));
        let motion = floor.motion.as_ref().unwrap();
        assert_eq!(motion.index(), 1);
        assert_eq!(motion.frame(), 0);
    }

    #[test]
    fn schedule_wraps_to_first_step() {
        let mut floor = down_then_up();
        for _ in 0..20 {
            floor.advance();
        }
        let motion = floor.motion.as_ref().unwrap();
        assert_eq!(motion.index(), 0);
        assert_eq!(floor.velocity(), Vec2::new(0.0, -1.0));
    }

    #[test]
    fn single_step_schedule_keeps_velocity() {
        let mut floor = Floor::animated(
            flat(),
            vec![MotionStep {
                velocity: Vec2::new(0.5, 0.0),
                frames: 3,
            }],
        );
        for _ in 0..7 {
            floor.advance();
        }
        assert_eq!(floor.velocity(), Vec2::new(0.5, 0.0));
        assert_eq!(floor.segment.p, Vec2::new(3.5, 0.0));
    }
}
