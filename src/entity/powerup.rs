use super::{Entity, Sprite};
use crate::engine::Point;
use crate::level::PowerupType;

/// Stationary collectible, picked up once
#[derive(Debug, Clone, PartialEq)]
pub struct Powerup {
    entity: Entity,
    pub point_value: i32,
    pub life_value: i32,
}

impl Powerup {
    pub fn new(kind: &PowerupType, position: Point) -> Self {
        Powerup {
            entity: Entity::new(kind.sprite.as_str(), position, &kind.geometry(), 0.0),
            point_value: kind.point,
            life_value: kind.life,
        }
    }

    pub fn position(&self) -> Point {
        self.entity.position
    }
}

impl Sprite for Powerup {
    fn entity(&self) -> &Entity {
        &self.entity
    }
}
