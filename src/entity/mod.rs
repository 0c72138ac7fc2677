use crate::config::Geometry;
use crate::engine::{Point, Rect, Size, Surface};

mod enemy;
mod player;
mod powerup;

pub use enemy::Enemy;
pub use player::{Direction, Player, Status};
pub use powerup::Powerup;

/// Shared data for everything drawn on the board
/// - display : sprite id + position
/// - collision : hitbox offset + size
/// - motion : signed speed
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub sprite: String,
    pub position: Point,
    pub offset: Point,
    pub size: Size,
    pub speed: f32,
}

impl Entity {
    pub fn new(sprite: impl Into<String>, position: Point, geometry: &Geometry, speed: f32) -> Self {
        Entity {
            sprite: sprite.into(),
            position,
            offset: geometry.offset,
            size: geometry.size,
            speed,
        }
    }

    /// [x + offx, x + offx + width) x [y + offy, y + offy + height)
    pub fn hitbox(&self) -> Rect {
        Rect::new(
            Point::new(
                self.position.x + self.offset.x,
                self.position.y + self.offset.y,
            ),
            self.size,
        )
    }
}

/// Behavior every entity variant shares: drawing, ticking, colliding
pub trait Sprite {
    fn entity(&self) -> &Entity;

    fn hitbox(&self) -> Rect {
        self.entity().hitbox()
    }

    /// Entities stay put unless they say otherwise
    fn update(&mut self, _dt: f32, _board: Size) {}

    fn render(&self, surface: &dyn Surface) {
        let entity = self.entity();
        surface.draw_sprite(&entity.sprite, entity.position);
    }
}

pub fn overlaps<A, B>(a: &A, b: &B) -> bool
where
    A: Sprite + ?Sized,
    B: Sprite + ?Sized,
{
    a.hitbox().intersects(&b.hitbox())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use approx::assert_relative_eq;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<(String, Point)>>,
    }

    impl Surface for Recorder {
        fn draw_sprite(&self, sprite: &str, position: Point) {
            self.calls.borrow_mut().push((sprite.to_string(), position));
        }
    }

    #[test]
    fn hitbox_applies_offset() {
        let geometry = Geometry {
            offset: Point::new(3.0, 7.0),
            size: Size::new(10.0, 20.0),
        };
        let hitbox = Entity::new("bug.png", Point::new(100.0, 50.0), &geometry, 0.0).hitbox();
        assert_relative_eq!(hitbox.x(), 103.0);
        assert_relative_eq!(hitbox.y(), 57.0);
        assert_relative_eq!(hitbox.right(), 113.0);
        assert_relative_eq!(hitbox.bottom(), 77.0);
    }

    #[test]
    fn render_draws_sprite_at_origin_not_hitbox() {
        let config = GameConfig::default();
        let enemy = Enemy::new(Point::new(40.0, 60.0), Some(50.0), &config);
        let recorder = Recorder::default();
        enemy.render(&recorder);
        assert_eq!(
            recorder.calls.into_inner(),
            vec![(config.enemy_sprite.clone(), Point::new(40.0, 60.0))]
        );
    }

    #[test]
    fn overlap_is_symmetric() {
        let config = GameConfig::default();
        let player = Player::new(&config);
        let start = config.start;
        let positions = [
            Point::new(start.x, start.y),
            Point::new(start.x + 80.0, start.y),
            Point::new(start.x - 97.0, start.y + 20.0),
            Point::new(start.x + 10.0, start.y - 300.0),
        ];
        for position in positions.iter() {
            let enemy = Enemy::new(*position, None, &config);
            assert_eq!(overlaps(&player, &enemy), overlaps(&enemy, &player));
        }
    }
}
