use std::path::Path;

use serde::Deserialize;

use crate::error::MapError;
use crate::floor::{Floor, MotionStep};
use crate::segment::Segment;
use crate::vector::Vec2;

/// Validated map geometry: spawn point, floors and walls.
///
/// Floor and wall order is significant: collision scans take the first hit.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    initial_position: Vec2,
    floors: Vec<Floor>,
    walls: Vec<Segment>,
}

impl Map {
    /// Rejects non-finite coordinates or velocities and zero-length motion
    /// steps.
    pub fn new(
        initial_position: Vec2,
        floors: Vec<Floor>,
        walls: Vec<Segment>,
    ) -> Result<Self, MapError> {
        if !initial_position.is_finite() {
            return Err(MapError::NonFinite {
                what: "initial position".into(),
            });
        }
        for (i, floor) in floors.iter().enumerate() {
            if !floor.segment.is_finite() {
                return Err(MapError::NonFinite {
                    what: format!("floor {i}"),
                });
            }
            let Some(motion) = &floor.motion else {
                continue;
            };
            for (step_idx, step) in motion.steps().iter().enumerate() {
                if !step.velocity.is_finite() {
                    return Err(MapError::NonFinite {
                        what: format!("floor {i} motion step {step_idx}"),
                    });
                }
                if step.frames == 0 {
                    return Err(MapError::ZeroFrames {
                        floor: i,
                        step: step_idx,
                    });
                }
            }
        }
        for (i, wall) in walls.iter().enumerate() {
            if !wall.is_finite() {
                return Err(MapError::NonFinite {
                    what: format!("wall {i}"),
                });
            }
        }
        Ok(Self {
            initial_position,
            floors,
            walls,
        })
    }

    /// Parse the JSON map format:
    ///
    /// ```json
    /// {
    ///   "initial": [340, 455],
    ///   "floors": [[0, 0, 100, 100], [350, 300, 450, 300, [{"v": [0, -0.8], "frames": 100}]]],
    ///   "walls": [[100, 400, 100, 100]]
    /// }
    /// ```
    ///
    /// A floor entry with a fifth element moves along that schedule.
    pub fn from_json_str(content: &str) -> Result<Self, MapError> {
        let file: MapFile =
            serde_json::from_str(content).map_err(|e| MapError::Parse(e.to_string()))?;

        let floors = file.floors.into_iter().map(SegmentEntry::into_floor).collect();

        let walls = file
            .walls
            .into_iter()
            .enumerate()
            .map(|(i, entry)| match entry {
                SegmentEntry::Fixed(x1, y1, x2, y2) => Ok(segment(x1, y1, x2, y2)),
                SegmentEntry::Animated(x1, y1, x2, y2, steps) if steps.is_empty() => {
                    Ok(segment(x1, y1, x2, y2))
                },
                SegmentEntry::Animated(..) => Err(MapError::AnimatedWall { wall: i }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(file.initial.into(), floors, walls)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| MapError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&content)
    }

    pub fn initial_position(&self) -> Vec2 {
        self.initial_position
    }

    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    pub fn walls(&self) -> &[Segment] {
        &self.walls
    }

    pub fn into_parts(self) -> (Vec2, Vec<Floor>, Vec<Segment>) {
        (self.initial_position, self.floors, self.walls)
    }
}

#[derive(Deserialize)]
struct MapFile {
    initial: [f64; 2],
    #[serde(default)]
    floors: Vec<SegmentEntry>,
    #[serde(default)]
    walls: Vec<SegmentEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SegmentEntry {
    Fixed(f64, f64, f64, f64),
    Animated(f64, f64, f64, f64, Vec<StepEntry>),
}

#[derive(Deserialize)]
struct StepEntry {
    v: [f64; 2],
    frames: u32,
}

impl SegmentEntry {
    fn into_floor(self) -> Floor {
        match self {
            Self::Fixed(x1, y1, x2, y2) => Floor::fixed(segment(x1, y1, x2, y2)),
            Self::Animated(x1, y1, x2, y2, steps) => Floor::animated(
                segment(x1, y1, x2, y2),
                steps
                    .into_iter()
                    .map(|s| MotionStep {
                        velocity: s.v.into(),
                        frames: s.frames,
                    })
                    .collect(),
            ),
        }
    }
}

fn segment(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
    Segment::new(Vec2::new(x1, y1), Vec2::new(x2, y2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fixed_and_animated_entries() {
        let map = Map::from_json_str(
            r#"{
                "initial": [340, 455],
                "floors": [
                    [0, 0, 100, 100],
                    [350, 300, 450, 300, [{"v": [0, -0.8], "frames": 100}, {"v": [0, 0.8], "frames": 100}]]
                ],
                "walls": [[100, 400, 100, 100]]
            }"#,
        )
        .unwrap();

        assert_eq!(map.initial_position(), Vec2::new(340.0, 455.0));
        assert_eq!(map.floors().len(), 2);
        assert!(!map.floors()[0].is_animated());
        assert!(map.floors()[1].is_animated());
        assert_eq!(map.floors()[1].velocity(), Vec2::new(0.0, -0.8));
        assert_eq!(map.walls(), &[segment(100.0, 400.0, 100.0, 100.0)]);
    }

    #[test]
    fn empty_schedule_yields_fixed_floor() {
        let map = Map::from_json_str(r#"{"initial": [0, 0], "floors": [[0, 0, 10, 0, []]]}"#)
            .unwrap();
        assert!(!map.floors()[0].is_animated());
    }

    #[test]
    fn animated_wall_rejected() {
        let err = Map::from_json_str(
            r#"{"initial": [0, 0], "walls": [[0, 0, 0, 10], [5, 0, 5, 10, [{"v": [1, 0], "frames": 2}]]]}"#,
        )
        .unwrap_err();
        assert_eq!(err, MapError::AnimatedWall { wall: 1 });
    }

    #[test]
    fn wall_with_empty_schedule_is_static() {
        let map = Map::from_json_str(r#"{"initial": [0, 0], "walls": [[5, 0, 5, 10, []]]}"#)
            .unwrap();
        assert_eq!(map.walls(), &[segment(5.0, 0.0, 5.0, 10.0)]);
    }

    #[test]
    fn zero_frame_step_rejected() {
        let err = Map::from_json_str(
            r#"{"initial": [0, 0], "floors": [[0, 0, 10, 0, [{"v": [1, 0], "frames": 0}]]]}"#,
        )
        .unwrap_err();
        assert_eq!(err, MapError::ZeroFrames { floor: 0, step: 0 });
    }

    #[test]
    fn wrong_arity_is_parse_error() {
        let err = Map::from_json_str(r#"{"initial": [0, 0], "floors": [[0, 0, 10]]}"#).unwrap_err();
        assert!(matches!(err, MapError::Parse(_)));
    }

    #[test]
    fn non_finite_geometry_rejected() {
        let err = Map::new(
            Vec2::new(0.0, 0.0),
            vec![Floor::fixed(segment(0.0, 0.0, f64::INFINITY, 0.0))],
            Vec::new(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            MapError::NonFinite {
                what: "floor 0".into()
            }
        );

        let err = Map::new(Vec2::new(f64::NAN, 0.0), Vec::new(), Vec::new()).unwrap_err();
        assert!(matches!(err, MapError::NonFinite { .. }));
    }

    #[test]
    fn non_finite_motion_velocity_rejected() {
        let floor = Floor::animated(
            segment(0.0, 0.0, 10.0, 0.0),
            vec![MotionStep {
                velocity: Vec2::new(f64::NAN, 0.0),
                frames: 4,
            }],
        );
        let err = Map::new(Vec2::ZERO, vec![floor], Vec::new()).unwrap_err();
        assert!(matches!(err, MapError::NonFinite { .. }));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = Map::load("no/such/map.json").unwrap_err();
        assert!(matches!(err, MapError::Read { .. }));
    }
}
