use super::{Entity, Sprite};
use crate::config::GameConfig;
use crate::engine::{Point, Size};

/// Bug crawling along its lane, looping around the board edges
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    entity: Entity,
}

impl Enemy {
    /// A missing or non-finite speed falls back to `config.enemy_speed`.
    /// Positive speeds crawl right, anything else uses the mirrored sprite.
    pub fn new(position: Point, speed: Option<f32>, config: &GameConfig) -> Self {
        let speed = speed
            .filter(|speed| speed.is_finite())
            .unwrap_or(config.enemy_speed);
        let sprite = if speed > 0.0 {
            &config.enemy_sprite
        } else {
            &config.enemy_sprite_mirrored
        };
        Enemy {
            entity: Entity::new(sprite.as_str(), position, &config.enemy, speed),
        }
    }

    pub fn position(&self) -> Point {
        self.entity.position
    }

    pub fn speed(&self) -> f32 {
        self.entity.speed
    }
}

impl Sprite for Enemy {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    /// Moves by `dt * speed`, then wraps on the hitbox. The hitbox's trailing
    /// edge loops over [0, board width + hitbox width), so a bug leaving one
    /// side reenters just outside the other with its overshoot carried over.
    fn update(&mut self, dt: f32, board: Size) {
        let entity = &mut self.entity;
        entity.position.x += dt * entity.speed;

        let period = board.width + entity.size.width;
        let trailing = entity.position.x + entity.offset.x + entity.size.width;
        if !(0.0..period).contains(&trailing) {
            entity.position.x += trailing.rem_euclid(period) - trailing;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn board() -> Size {
        GameConfig::default().board
    }

    #[test]
    fn moves_by_dt_times_speed() {
        let config = GameConfig::default();
        let mut enemy = Enemy::new(Point::new(100.0, 200.0), Some(80.0), &config);
        enemy.update(0.5, board());
        assert_relative_eq!(enemy.position().x, 140.0);
        assert_relative_eq!(enemy.position().y, 200.0);
    }

    #[test]
    fn negative_speed_moves_left_with_mirrored_sprite() {
        let config = GameConfig::default();
        let mut enemy = Enemy::new(Point::new(100.0, 200.0), Some(-50.0), &config);
        assert_eq!(enemy.entity().sprite, config.enemy_sprite_mirrored);
        enemy.update(1.0, board());
        assert_relative_eq!(enemy.position().x, 50.0);
    }

    #[test]
    fn zero_speed_uses_mirrored_sprite_and_stays() {
        let config = GameConfig::default();
        let mut enemy = Enemy::new(Point::new(100.0, 200.0), Some(0.0), &config);
        assert_eq!(enemy.entity().sprite, config.enemy_sprite_mirrored);
        enemy.update(3.0, board());
        assert_relative_eq!(enemy.position().x, 100.0);
    }

    #[test]
    fn invalid_speed_falls_back_to_default() {
        let config = GameConfig::default();
        let missing = Enemy::new(Point::new(0.0, 0.0), None, &config);
        let nan = Enemy::new(Point::new(0.0, 0.0), Some(f32::NAN), &config);
        assert_relative_eq!(missing.speed(), config.enemy_speed);
        assert_relative_eq!(nan.speed(), config.enemy_speed);
        assert_eq!(missing.entity().sprite, config.enemy_sprite);
    }

    #[test]
    fn wraps_to_left_side_after_leaving_right_edge() {
        let config = GameConfig::default();
        let width = config.board.width;
        let offx = config.enemy.offset.x;
        // hitbox left edge sits 5px before the right border
        let mut enemy = Enemy::new(Point::new(width - offx - 5.0, 200.0), Some(10.0), &config);
        enemy.update(1.0, board());
        // 5px past the border -> 5px past the left outside position
        let hitbox = enemy.hitbox();
        assert_relative_eq!(hitbox.right(), 5.0, epsilon = 1e-3);
    }

    #[test]
    fn wraps_to_right_side_after_leaving_left_edge() {
        let config = GameConfig::default();
        let offx = config.enemy.offset.x;
        let hitbox_width = config.enemy.size.width;
        // hitbox right edge 2px inside the left border
        let mut enemy = Enemy::new(
            Point::new(2.0 - hitbox_width - offx, 200.0),
            Some(-10.0),
            &config,
        );
        enemy.update(1.0, board());
        let hitbox = enemy.hitbox();
        assert_relative_eq!(hitbox.x(), config.board.width - 8.0, epsilon = 1e-3);
    }

    #[test]
    fn hitbox_stays_in_range_after_every_update() {
        let config = GameConfig::default();
        let width = config.board.width;
        for &speed in [-400.0_f32, -35.0, 0.0, 45.0, 700.0].iter() {
            let mut enemy = Enemy::new(Point::new(-900.0, 100.0), Some(speed), &config);
            for _ in 0..200 {
                enemy.update(0.37, board());
                let hitbox = enemy.hitbox();
                assert!(hitbox.right() >= 0.0, "speed {}: {:?}", speed, hitbox);
                assert!(hitbox.x() < width, "speed {}: {:?}", speed, hitbox);
            }
        }
    }
}
