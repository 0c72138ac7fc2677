use super::{overlaps, Entity, Sprite};
use crate::config::GameConfig;
use crate::engine::Point;
use crate::state::GameState;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Arrow keys only, by `KeyboardEvent.code`
    pub fn from_key_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" => Some(Direction::Left),
            "ArrowRight" => Some(Direction::Right),
            "ArrowUp" => Some(Direction::Up),
            "ArrowDown" => Some(Direction::Down),
            _ => None,
        }
    }
}

/// ┌──────────── Player tick ────────────┐
/// │  enemy overlap      →  Dying        │
/// │  powerup overlap    →  collect      │
/// │  above goal line    →  Winning      │
/// │  otherwise          →  Active       │
/// └─────────────────────────────────────┘
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Status {
    Active,
    Dying,
    Winning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    entity: Entity,
}

impl Player {
    pub fn new(config: &GameConfig) -> Self {
        Player {
            entity: Entity::new(
                config.player_sprite.as_str(),
                config.start,
                &config.player,
                config.player_step,
            ),
        }
    }

    pub fn position(&self) -> Point {
        self.entity.position
    }

    pub fn move_to(&mut self, position: Point) {
        self.entity.position = position;
    }

    /// Collision scan for one tick. Collected powerups are applied to `state`
    /// and dropped from it; the Dying and Winning transitions themselves are
    /// left to the caller.
    pub fn update(&self, state: &mut GameState) -> Status {
        // one death per tick no matter how many bugs overlap, and it beats
        // both powerups and the goal
        if state.enemies.iter().any(|enemy| overlaps(self, enemy)) {
            return Status::Dying;
        }

        let GameState {
            powerups,
            points,
            lives,
            ..
        } = state;
        powerups.retain(|powerup| {
            if overlaps(self, powerup) {
                *points += powerup.point_value;
                *lives += powerup.life_value;
                false
            } else {
                true
            }
        });

        if self.hitbox().y() < state.config.goal_line {
            Status::Winning
        } else {
            Status::Active
        }
    }

    /// Steps one `speed` along `direction`, then pulls the hitbox back inside
    /// [0, board width) x [top boundary, board height)
    pub fn handle_input(&mut self, direction: Direction, config: &GameConfig) {
        let step = self.entity.speed;
        let position = &mut self.entity.position;
        match direction {
            Direction::Left => position.x -= step,
            Direction::Right => position.x += step,
            Direction::Up => position.y -= step,
            Direction::Down => position.y += step,
        }
        self.clamp(config);
    }

    fn clamp(&mut self, config: &GameConfig) {
        let hitbox = self.hitbox();
        let Entity {
            position,
            offset,
            size,
            ..
        } = &mut self.entity;

        if hitbox.x() < 0.0 {
            position.x = -offset.x;
        } else if hitbox.right() > config.board.width {
            position.x = config.board.width - offset.x - size.width;
        }

        if hitbox.y() < config.top_boundary {
            position.y = config.top_boundary - offset.y;
        } else if hitbox.bottom() > config.board.height {
            position.y = config.board.height - offset.y - size.height;
        }
    }
}

impl Sprite for Player {
    fn entity(&self) -> &Entity {
        &self.entity
    }
}
