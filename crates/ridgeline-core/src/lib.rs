pub mod config;
pub mod error;
pub mod floor;
pub mod geometry;
pub mod input;
pub mod locomotion;
pub mod map;
pub mod segment;
pub mod vector;

pub use config::LocomotionConfig;
pub use error::{ConfigError, MapError};
pub use floor::{Floor, MotionSchedule, MotionStep};
pub use input::InputSnapshot;
pub use locomotion::{CharacterSnapshot, JumpLevel, Locomotion, MovementState};
pub use map::Map;
pub use segment::Segment;
pub use vector::Vec2;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::config::LocomotionConfig;
    use crate::floor::{Floor, MotionStep};
    use crate::input::InputSnapshot;
    use crate::locomotion::{Locomotion, MovementState};
    use crate::map::Map;
    use crate::segment::Segment;
    use crate::vector::Vec2;

    pub fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
        Segment::new(Vec2::new(x1, y1), Vec2::new(x2, y2))
    }

    /// One flat floor from `(0, 0)` to `(width, 0)`, spawn above its middle.
    pub fn flat_floor_map(width: f64, spawn_height: f64) -> Map {
        Map::new(
            Vec2::new(width / 2.0, spawn_height),
            vec![Floor::fixed(seg(0.0, 0.0, width, 0.0))],
            Vec::new(),
        )
        .expect("flat floor map is valid")
    }

    /// A flat floor closed by a wall on each side. The left wall is authored
    /// bottom-up so it pushes right; the right wall top-down so it pushes left.
    pub fn walled_room_map(width: f64, height: f64) -> Map {
        Map::new(
            Vec2::new(width / 2.0, 10.0),
            vec![Floor::fixed(seg(-10.0, 0.0, width + 10.0, 0.0))],
            vec![seg(0.0, height, 0.0, 1.0), seg(width, 1.0, width, height)],
        )
        .expect("walled room map is valid")
    }

    /// A small course: ground, a slope, a ledge, two walls and a platform
    /// bobbing up and down.
    pub fn course_map() -> Map {
        let platform = Floor::animated(
            seg(150.0, 40.0, 190.0, 40.0),
            vec![
                MotionStep {
                    velocity: Vec2::new(0.0, 0.5),
                    frames: 60,
                },
                MotionStep {
                    velocity: Vec2::new(0.0, -0.5),
                    frames: 60,
                },
            ],
        );
        Map::new(
            Vec2::new(20.0, 30.0),
            vec![
                Floor::fixed(seg(0.0, 0.0, 100.0, 0.0)),
                Floor::fixed(seg(100.0, 0.0, 140.0, 20.0)),
                Floor::fixed(seg(140.0, 20.0, 260.0, 20.0)),
                platform,
            ],
            vec![
                seg(0.0, 200.0, 0.0, 1.0),
                seg(260.0, 21.0, 260.0, 200.0),
            ],
        )
        .expect("course map is valid")
    }

    /// Locomotion with the default config.
    pub fn locomotion(map: Map) -> Locomotion {
        Locomotion::new(LocomotionConfig::default(), map).expect("default config is valid")
    }

    /// Feed `inputs` one per tick.
    pub fn run_inputs(loco: &mut Locomotion, inputs: &[InputSnapshot]) {
        for input in inputs {
            loco.update(input);
        }
    }

    /// Tick with `input` until the character stands, up to `max_ticks`.
    /// Returns the ticks taken, or `None` if it never landed.
    pub fn ticks_until_standing(
        loco: &mut Locomotion,
        input: &InputSnapshot,
        max_ticks: usize,
    ) -> Option<usize> {
        for tick in 1..=max_ticks {
            loco.update(input);
            if loco.state() == MovementState::Standing {
                return Some(tick);
            }
        }
        None
    }

    /// Assert the invariants that hold at every tick boundary.
    pub fn assert_tick_invariants(loco: &Locomotion) {
        let p = loco.position();
        assert!(p.is_finite(), "position must stay finite: {p:?}");
        assert!(loco.horizontal_speed().is_finite());
        assert!(loco.vertical_speed().is_finite());
        assert!(
            loco.horizontal_speed().abs() <= loco.config().max_walking_speed,
            "horizontal speed over cap: {}",
            loco.horizontal_speed()
        );
        assert!(loco.vertical_speed() >= loco.config().y_min_speed);
        if loco.state() == MovementState::Standing {
            assert!(loco.current_floor().is_some(), "Standing without a floor");
            assert_eq!(loco.vertical_speed(), 0.0, "Standing with vertical speed");
        }
        assert!(loco.frames_since_landed() <= crate::locomotion::FRAME_COUNTER_CAP);
        assert!(loco.frames_since_touched_wall() <= crate::locomotion::FRAME_COUNTER_CAP);
    }
}
