//! Character locomotion: the Standing / MidAir state machine, jump combos,
//! wall contact and wall-kicks, and platform riding.
//!
//! One [`Locomotion::update`] call advances the whole system by one tick:
//! the state-specific step, then the wall-collision pass, then every animated
//! floor.

use std::fmt;

use serde::Serialize;

use crate::config::LocomotionConfig;
use crate::error::ConfigError;
use crate::floor::Floor;
use crate::geometry::{
    clamp, converge_to_zero, eval_at_x, eval_at_y, movement_direction, sgn, wall_below_character,
    wall_below_floor, wall_direction,
};
use crate::input::InputSnapshot;
use crate::map::Map;
use crate::segment::Segment;
use crate::vector::Vec2;

/// Saturation value of the frame counters; stands for "a very long time ago".
pub const FRAME_COUNTER_CAP: u32 = 100_000_000;
/// Divisor applied to horizontal speed while pressing into a wall.
pub const WALL_CONTACT_DAMPING: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MovementState {
    Standing,
    MidAir,
}

impl fmt::Display for MovementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standing => write!(f, "Standing"),
            Self::MidAir => write!(f, "Mid-air"),
        }
    }
}

/// Jump-combo tier, chained by re-jumping shortly after landing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum JumpLevel {
    #[default]
    One,
    Two,
    Three,
}

impl JumpLevel {
    /// Multiplier applied to the base jump speed.
    pub fn factor(self, config: &LocomotionConfig) -> f64 {
        match self {
            Self::One => 1.0,
            Self::Two => config.jump_factor_2,
            Self::Three => config.jump_factor_3,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    /// Level reached by re-jumping inside the combo window. Reaching three
    /// needs a horizontal speed above `third_level_jump_speed_required`;
    /// three always wraps back to one.
    pub fn chained(self, horizontal_speed: f64, config: &LocomotionConfig) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two if horizontal_speed.abs() > config.third_level_jump_speed_required => {
                Self::Three
            },
            Self::Two | Self::Three => Self::One,
        }
    }
}

impl fmt::Display for JumpLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Read-only copy of the character state after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CharacterSnapshot {
    pub position: Vec2,
    pub horizontal_speed: f64,
    pub vertical_speed: f64,
    pub state: MovementState,
    pub jump_level: JumpLevel,
    pub current_floor: Option<usize>,
    pub touching_wall: Option<usize>,
    pub frames_since_touched_wall: u32,
    pub frames_since_landed: u32,
    pub jump_blocked: bool,
}

/// The character and the map geometry it moves through.
///
/// Floors and walls are owned here and referenced by index from the
/// current-floor and touching-wall caches.
#[derive(Debug, Clone)]
pub struct Locomotion {
    config: LocomotionConfig,
    floors: Vec<Floor>,
    walls: Vec<Segment>,
    position: Vec2,
    horizontal_speed: f64,
    vertical_speed: f64,
    state: MovementState,
    current_floor: Option<usize>,
    jump_blocked: bool,
    touching_wall: Option<usize>,
    frames_since_touched_wall: u32,
    frames_since_landed: u32,
    jump_level: JumpLevel,
}

impl Locomotion {
    /// Validates `config` and places the character, airborne and at rest, at
    /// the map's initial position.
    pub fn new(config: LocomotionConfig, map: Map) -> Result<Self, ConfigError> {
        config.validate()?;
        let (position, floors, walls) = map.into_parts();
        Ok(Self {
            config,
            floors,
            walls,
            position,
            horizontal_speed: 0.0,
            vertical_speed: 0.0,
            state: MovementState::MidAir,
            current_floor: None,
            jump_blocked: false,
            touching_wall: None,
            frames_since_touched_wall: 0,
            frames_since_landed: FRAME_COUNTER_CAP,
            jump_level: JumpLevel::One,
        })
    }

    /// Advance one tick.
    pub fn update(&mut self, input: &InputSnapshot) {
        match self.state {
            MovementState::Standing => self.standing_step(input),
            MovementState::MidAir => self.mid_air_step(input),
        }
        self.resolve_wall_contact();
        for floor in &mut self.floors {
            floor.advance();
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn horizontal_speed(&self) -> f64 {
        self.horizontal_speed
    }

    pub fn vertical_speed(&self) -> f64 {
        self.vertical_speed
    }

    pub fn state(&self) -> MovementState {
        self.state
    }

    pub fn jump_level(&self) -> JumpLevel {
        self.jump_level
    }

    pub fn current_floor(&self) -> Option<&Floor> {
        self.current_floor.and_then(|i| self.floors.get(i))
    }

    pub fn current_floor_index(&self) -> Option<usize> {
        self.current_floor
    }

    pub fn touching_wall(&self) -> Option<&Segment> {
        self.touching_wall.and_then(|i| self.walls.get(i))
    }

    pub fn is_touching_wall(&self) -> bool {
        self.touching_wall.is_some()
    }

    pub fn frames_since_touched_wall(&self) -> u32 {
        self.frames_since_touched_wall
    }

    pub fn frames_since_landed(&self) -> u32 {
        self.frames_since_landed
    }

    pub fn jump_blocked(&self) -> bool {
        self.jump_blocked
    }

    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    pub fn walls(&self) -> &[Segment] {
        &self.walls
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn snapshot(&self) -> CharacterSnapshot {
        CharacterSnapshot {
            position: self.position,
            horizontal_speed: self.horizontal_speed,
            vertical_speed: self.vertical_speed,
            state: self.state,
            jump_level: self.jump_level,
            current_floor: self.current_floor,
            touching_wall: self.touching_wall,
            frames_since_touched_wall: self.frames_since_touched_wall,
            frames_since_landed: self.frames_since_landed,
            jump_blocked: self.jump_blocked,
        }
    }

    // ---- State steps ----

    fn standing_step(&mut self, input: &InputSnapshot) {
        if !input.up {
            self.jump_blocked = false;
        }

        let Some(floor_idx) = self.regrounded_floor() else {
            tracing::debug!(x = self.position.x, y = self.position.y, "Left floor");
            self.state = MovementState::MidAir;
            self.current_floor = None;
            self.frames_since_touched_wall = 0;
            return;
        };
        self.current_floor = Some(floor_idx);
        let floor = &self.floors[floor_idx];

        // Re-snap every tick; slopes otherwise let the character drift through walls.
        self.position.y = eval_at_x(&floor.segment, self.position.x);

        self.update_speed(input, self.config.x_acceleration);

        self.frames_since_landed = saturating_tick(self.frames_since_landed);
        if self.frames_since_landed >= self.config.repeated_jump_frames {
            self.jump_level = JumpLevel::One;
        }

        let floor = &self.floors[floor_idx];
        self.position += movement_direction(&floor.segment) * self.horizontal_speed;
        if floor.is_animated() {
            self.position += floor.velocity();
        }

        if input.up && !self.jump_blocked {
            self.jump_blocked = true;
            self.state = MovementState::MidAir;
            if self.frames_since_landed < self.config.repeated_jump_frames {
                self.jump_level = self.jump_level.chained(self.horizontal_speed, &self.config);
            }
            self.vertical_speed = self.config.jump_initial_speed * self.jump_level.factor(&self.config);
            self.frames_since_touched_wall = 0;
            self.current_floor = None;
            tracing::debug!(
                level = self.jump_level.as_u8(),
                speed = self.vertical_speed,
                "Jump"
            );
        }

        self.try_wall_kick(input);
    }

    fn mid_air_step(&mut self, input: &InputSnapshot) {
        self.position += Vec2::new(self.horizontal_speed, self.vertical_speed);
        self.vertical_speed -= self.config.y_deceleration;

        if self.vertical_speed <= 0.0 {
            self.vertical_speed = self.vertical_speed.max(self.config.y_min_speed);
            if let Some(floor_idx) = self.first_colliding_floor() {
                self.land(floor_idx);
                return;
            }
        }

        self.update_speed(input, self.config.x_acceleration_mid_air);
        self.try_wall_kick(input);
    }

    fn land(&mut self, floor_idx: usize) {
        self.position.y = eval_at_x(&self.floors[floor_idx].segment, self.position.x);
        self.state = MovementState::Standing;
        self.vertical_speed = 0.0;
        self.jump_blocked = true;
        self.frames_since_landed = 0;
        self.current_floor = Some(floor_idx);
        tracing::debug!(floor = floor_idx, x = self.position.x, y = self.position.y, "Landed");
    }

    fn try_wall_kick(&mut self, input: &InputSnapshot) {
        if !input.up {
            self.jump_blocked = false;
        }

        if self.horizontal_speed.abs() < self.config.wallkick_necessary_speed {
            return;
        }
        let Some(wall) = self.touching_wall else {
            return;
        };
        if self.jump_blocked || !input.up {
            return;
        }
        if self.frames_since_touched_wall >= self.config.wallkick_frames {
            return;
        }

        self.jump_blocked = true;
        self.jump_level = JumpLevel::One;
        self.state = MovementState::MidAir;
        self.vertical_speed = self.config.jump_initial_speed;
        self.frames_since_touched_wall = 0;
        self.horizontal_speed = -self.horizontal_speed;
        tracing::debug!(wall, speed = self.horizontal_speed, "Wall-kick");
    }

    // ---- Collision ----

    fn collides(&self, segment: &Segment) -> bool {
        segment.intersects_circle(self.position, self.config.character_size)
    }

    fn first_colliding_floor(&self) -> Option<usize> {
        self.floors.iter().position(|f| self.collides(&f.segment))
    }

    /// Keep the cached floor while it still touches the character, otherwise
    /// rescan. Earlier floors win ties.
    fn regrounded_floor(&self) -> Option<usize> {
        match self.current_floor {
            Some(i) if self.collides(&self.floors[i].segment) => Some(i),
            _ => self.first_colliding_floor(),
        }
    }

    /// First touching wall that is not hidden under the cached floor or the
    /// character itself.
    fn first_colliding_wall(&self) -> Option<usize> {
        let floor = self.current_floor.map(|i| &self.floors[i].segment);
        self.walls.iter().position(|wall| {
            if floor.is_some_and(|floor| wall_below_floor(wall, floor)) {
                return false;
            }
            if wall_below_character(wall, self.position) {
                return false;
            }
            self.collides(wall)
        })
    }

    fn resolve_wall_contact(&mut self) {
        self.touching_wall = self.first_colliding_wall();
        let Some(wall_idx) = self.touching_wall else {
            self.frames_since_touched_wall = 0;
            return;
        };
        let wall = self.walls[wall_idx];
        let direction = wall_direction(&wall);

        self.position.x = eval_at_y(&wall, self.position.y) + direction * self.config.character_size;

        // Moving away from the wall keeps full speed. Airborne contact is only
        // damped once the wall-kick window has passed.
        if sgn(self.horizontal_speed) != direction
            && (self.state == MovementState::Standing
                || self.frames_since_touched_wall > self.config.wallkick_frames)
        {
            self.horizontal_speed /= WALL_CONTACT_DAMPING;
        }

        self.frames_since_touched_wall = saturating_tick(self.frames_since_touched_wall);
        tracing::trace!(
            wall = wall_idx,
            frames = self.frames_since_touched_wall,
            "Wall contact"
        );
    }

    fn update_speed(&mut self, input: &InputSnapshot, accel: f64) {
        if !input.is_steering() {
            self.horizontal_speed = converge_to_zero(self.horizontal_speed, accel);
            return;
        }
        let max = self.config.max_walking_speed;
        self.horizontal_speed = clamp(
            self.horizontal_speed + input.horizontal_sign() * accel,
            -max,
            max,
        );
    }
}

fn saturating_tick(counter: u32) -> u32 {
    counter.saturating_add(1).min(FRAME_COUNTER_CAP)
}
