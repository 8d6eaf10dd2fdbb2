use serde::Serialize;

use ridgeline_core::{CharacterSnapshot, JumpLevel, Locomotion, MovementState};

use crate::script::InputScript;

/// One line of the per-tick trace.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TickRecord {
    pub tick: u64,
    #[serde(flatten)]
    pub snapshot: CharacterSnapshot,
}

/// Aggregate counts over a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub landings: u64,
    pub takeoffs: u64,
    pub wall_contacts: u64,
    pub highest_jump_level: JumpLevel,
    pub last: CharacterSnapshot,
}

/// Drive `loco` for `ticks` ticks with inputs from `script`, handing every
/// post-tick snapshot to `observer`. The first observer error aborts the run.
pub fn run<E>(
    loco: &mut Locomotion,
    script: &InputScript,
    ticks: u64,
    mut observer: impl FnMut(&TickRecord) -> Result<(), E>,
) -> Result<RunSummary, E> {
    let mut summary = RunSummary {
        ticks: 0,
        landings: 0,
        takeoffs: 0,
        wall_contacts: 0,
        highest_jump_level: loco.jump_level(),
        last: loco.snapshot(),
    };

    for (tick, input) in script.inputs(ticks).enumerate() {
        let before = loco.snapshot();
        loco.update(&input);
        let after = loco.snapshot();

        match (before.state, after.state) {
            (MovementState::MidAir, MovementState::Standing) => summary.landings += 1,
            (MovementState::Standing, MovementState::MidAir) if after.vertical_speed > 0.0 => {
                summary.takeoffs += 1;
            },
            _ => {},
        }
        if before.touching_wall.is_none() && after.touching_wall.is_some() {
            summary.wall_contacts += 1;
        }
        if after.jump_level.as_u8() > summary.highest_jump_level.as_u8() {
            summary.highest_jump_level = after.jump_level;
        }

        observer(&TickRecord {
            tick: tick as u64,
            snapshot: after,
        })?;
        summary.ticks += 1;
        summary.last = after;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use ridgeline_core::test_helpers::{flat_floor_map, locomotion, walled_room_map};

    use super::*;
    use crate::script::InputSpan;

    fn span(ticks: u32, left: bool, right: bool, up: bool) -> InputSpan {
        InputSpan {
            ticks,
            left,
            right,
            up,
        }
    }

    #[test]
    fn idle_run_lands_once() {
        let mut loco = locomotion(flat_floor_map(100.0, 30.0));
        let mut seen = Vec::new();
        let summary = run(&mut loco, &InputScript::default(), 40, |rec| {
            seen.push(rec.tick);
            Ok::<_, Infallible>(())
        })
        .unwrap();

        assert_eq!(summary.ticks, 40);
        assert_eq!(summary.landings, 1);
        assert_eq!(summary.takeoffs, 0);
        assert_eq!(summary.last.state, MovementState::Standing);
        assert_eq!(seen, (0..40).collect::<Vec<_>>());
    }

    #[test]
    fn jumps_are_counted() {
        let mut loco = locomotion(flat_floor_map(100.0, 0.0));
        let script = InputScript {
            spans: vec![
                span(12, false, false, false),
                span(1, false, false, true),
                span(40, false, false, false),
                span(1, false, false, true),
                span(40, false, false, false),
            ],
        };
        let summary = run(&mut loco, &script, script.total_ticks(), |_| {
            Ok::<_, Infallible>(())
        })
        .unwrap();

        assert_eq!(summary.takeoffs, 2);
        assert_eq!(summary.landings, 3);
        assert_eq!(summary.last.state, MovementState::Standing);
    }

    #[test]
    fn wall_contact_is_counted() {
        let mut loco = locomotion(walled_room_map(40.0, 100.0));
        let script = InputScript {
            spans: vec![span(200, false, true, false)],
        };
        let summary = run(&mut loco, &script, 200, |_| Ok::<_, Infallible>(())).unwrap();
        assert!(summary.wall_contacts >= 1);
        assert!(summary.last.touching_wall.is_some());
    }

    #[test]
    fn observer_error_stops_run() {
        let mut loco = locomotion(flat_floor_map(100.0, 30.0));
        let mut calls = 0;
        let err = run(&mut loco, &InputScript::default(), 100, |rec| {
            calls += 1;
            if rec.tick == 4 { Err("stop") } else { Ok(()) }
        })
        .unwrap_err();
        assert_eq!(err, "stop");
        assert_eq!(calls, 5);
    }

    #[test]
    fn tick_record_flattens_snapshot() {
        let loco = locomotion(flat_floor_map(100.0, 30.0));
        let record = TickRecord {
            tick: 7,
            snapshot: loco.snapshot(),
        };
        let json = serde_json::to_value(record).unwrap();
        assert_eq!(json["tick"], 7);
        assert_eq!(json["state"], "MidAir");
        assert_eq!(json["position"]["y"], 30.0);
    }
}
