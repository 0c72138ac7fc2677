use crate::engine::{Point, Size};
use crate::level::LevelTable;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Hitbox geometry shared by every instance of a kind of entity
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Geometry {
    pub offset: Point,
    pub size: Size,
}

/// Bounds for the randomly generated levels past the end of the level table
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProceduralRanges {
    /// `None` spans the whole board width
    pub x: Option<Range<f32>>,
    pub y: Range<f32>,
    pub speed: Range<f32>,
}

impl Default for ProceduralRanges {
    fn default() -> Self {
        ProceduralRanges {
            x: None,
            y: 100.0..400.0,
            speed: 0.0..200.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GameConfig {
    pub board: Size,
    pub start: Point,
    pub lives: i32,
    /// The player wins once the top of its hitbox passes above this line
    pub goal_line: f32,
    /// The player's hitbox never moves above this line
    pub top_boundary: f32,
    pub level_bonus: i32,
    pub player_step: f32,
    pub player_sprite: String,
    pub player: Geometry,
    pub enemy_speed: f32,
    pub enemy_sprite: String,
    pub enemy_sprite_mirrored: String,
    pub enemy: Geometry,
    pub procedural: ProceduralRanges,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            board: Size::new(505.0, 550.0),
            start: Point::new(202.0, 450.0),
            lives: 3,
            goal_line: 50.0,
            top_boundary: 40.0,
            level_bonus: 10,
            player_step: 30.0,
            player_sprite: "images/char-princess-girl.png".to_string(),
            player: Geometry {
                offset: Point::new(17.0, 10.0),
                size: Size::new(67.0, 90.0),
            },
            enemy_speed: 100.0,
            enemy_sprite: "images/enemy-bug.png".to_string(),
            enemy_sprite_mirrored: "images/enemy-bug-left.png".to_string(),
            enemy: Geometry {
                offset: Point::new(1.0, 5.0),
                size: Size::new(98.0, 66.0),
            },
            procedural: ProceduralRanges::default(),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.board.width > 0.0 && self.board.height > 0.0) {
            return Err(anyhow!(
                "board must have a positive size, got {}x{}",
                self.board.width,
                self.board.height
            ));
        }
        if self.top_boundary >= self.goal_line {
            return Err(anyhow!(
                "top boundary ({}) must lie above the goal line ({})",
                self.top_boundary,
                self.goal_line
            ));
        }
        if !self.enemy_speed.is_finite() {
            return Err(anyhow!("default enemy speed must be finite"));
        }
        let ranges = [
            ("x", self.procedural_x()),
            ("y", self.procedural.y.clone()),
            ("speed", self.procedural.speed.clone()),
        ];
        for (name, range) in ranges.iter() {
            if range.is_empty() {
                return Err(anyhow!(
                    "procedural {} range {:?} is empty",
                    name,
                    range
                ));
            }
        }
        Ok(())
    }

    pub fn procedural_x(&self) -> Range<f32> {
        self.procedural
            .x
            .clone()
            .unwrap_or(0.0..self.board.width)
    }
}

/// Shape of `config.json`, every part optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfigFile {
    pub game: GameConfig,
    pub levels: LevelTable,
}

impl ConfigFile {
    pub fn validate(&self) -> Result<()> {
        self.game.validate()?;
        self.levels.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_are_valid() {
        assert!(ConfigFile::default().validate().is_ok());
    }

    #[test]
    fn procedural_x_defaults_to_board_width() {
        let config = GameConfig::default();
        let x = config.procedural_x();
        assert_relative_eq!(x.start, 0.0);
        assert_relative_eq!(x.end, config.board.width);
    }

    #[test]
    fn top_boundary_below_goal_line_is_rejected() {
        let config = GameConfig {
            top_boundary: 80.0,
            goal_line: 50.0,
            ..GameConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("goal line"));
    }

    #[test]
    fn empty_board_is_rejected() {
        let config = GameConfig {
            board: Size::new(0.0, 550.0),
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_procedural_range_is_rejected() {
        let mut config = GameConfig::default();
        config.procedural.speed = 50.0..50.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("speed"));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let file: ConfigFile =
            serde_json::from_str(r#"{ "game": { "lives": 5, "goal_line": 60.0 } }"#).unwrap();
        assert_eq!(file.game.lives, 5);
        assert_relative_eq!(file.game.goal_line, 60.0);
        assert_relative_eq!(file.game.top_boundary, 40.0);
        assert_eq!(file.levels, LevelTable::default());
        assert!(file.validate().is_ok());
    }
}
