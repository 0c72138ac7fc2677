use crate::config::Geometry;
use crate::engine::{Point, Size};
use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EnemyPlacement {
    pub x: f32,
    pub y: f32,
    /// Missing speeds fall back to the configured default
    #[serde(default)]
    pub speed: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PowerupPlacement {
    /// Index into the powerup type table
    #[serde(rename = "type")]
    pub kind: usize,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LevelDescriptor {
    pub enemies: Vec<EnemyPlacement>,
    pub powerups: Vec<PowerupPlacement>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PowerupType {
    pub sprite: String,
    pub offx: f32,
    pub offy: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub life: i32,
    #[serde(default)]
    pub point: i32,
}

impl PowerupType {
    pub fn geometry(&self) -> Geometry {
        Geometry {
            offset: Point::new(self.offx, self.offy),
            size: Size::new(self.width, self.height),
        }
    }
}

/// Authored levels plus the powerup types they refer to
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LevelTable {
    pub levels: Vec<LevelDescriptor>,
    pub powerup_types: Vec<PowerupType>,
}

impl Default for LevelTable {
    fn default() -> Self {
        BUILTIN_LEVELS.clone()
    }
}

impl LevelTable {
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LevelDescriptor> {
        self.levels.get(index)
    }

    pub fn powerup_type(&self, kind: usize) -> Option<&PowerupType> {
        self.powerup_types.get(kind)
    }

    /// Every powerup placement must name a known type
    pub fn validate(&self) -> Result<()> {
        for (index, level) in self.levels.iter().enumerate() {
            for placement in level.powerups.iter() {
                if self.powerup_type(placement.kind).is_none() {
                    return Err(anyhow!(
                        "level {} places powerup type {} but only {} types exist",
                        index,
                        placement.kind,
                        self.powerup_types.len()
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn powerup_sprites(&self) -> impl Iterator<Item = &str> {
        self.powerup_types.iter().map(|kind| kind.sprite.as_str())
    }
}

fn enemy(x: f32, y: f32, speed: f32) -> EnemyPlacement {
    EnemyPlacement {
        x,
        y,
        speed: Some(speed),
    }
}

fn powerup(kind: usize, x: f32, y: f32) -> PowerupPlacement {
    PowerupPlacement { kind, x, y }
}

fn powerup_type(sprite: &str, geometry: (f32, f32, f32, f32), life: i32, point: i32) -> PowerupType {
    let (offx, offy, width, height) = geometry;
    PowerupType {
        sprite: sprite.to_string(),
        offx,
        offy,
        width,
        height,
        life,
        point,
    }
}

const GEM: (f32, f32, f32, f32) = (10.0, 10.0, 80.0, 60.0);

static BUILTIN_LEVELS: Lazy<LevelTable> = Lazy::new(|| LevelTable {
    levels: vec![
        LevelDescriptor {
            enemies: vec![
                enemy(100.0, 200.0, 100.0),
                enemy(200.0, 375.0, 70.0),
                enemy(0.0, 170.0, 180.0),
            ],
            powerups: vec![powerup(0, 200.0, 350.0)],
        },
        LevelDescriptor {
            enemies: vec![
                enemy(100.0, 360.0, 100.0),
                enemy(300.0, 300.0, 70.0),
                enemy(0.0, 130.0, 180.0),
                enemy(200.0, 300.0, 130.0),
                enemy(20.0, 130.0, 150.0),
            ],
            powerups: vec![powerup(0, 100.0, 300.0)],
        },
        LevelDescriptor {
            enemies: vec![
                enemy(0.0, 130.0, 160.0),
                enemy(300.0, 130.0, 160.0),
                enemy(400.0, 215.0, -120.0),
                enemy(100.0, 215.0, -120.0),
                enemy(50.0, 300.0, 90.0),
                enemy(250.0, 375.0, -200.0),
            ],
            powerups: vec![
                powerup(3, 404.0, 130.0),
                powerup(2, 101.0, 215.0),
                powerup(4, 303.0, 300.0),
            ],
        },
    ],
    powerup_types: vec![
        powerup_type("images/Gem Blue.png", GEM, 0, 1),
        powerup_type("images/Gem Green.png", GEM, 0, 2),
        powerup_type("images/Gem Orange.png", GEM, 0, 3),
        powerup_type("images/Heart.png", (10.0, 10.0, 80.0, 70.0), 1, 0),
        powerup_type("images/Key.png", (25.0, 10.0, 50.0, 70.0), 3, 2),
    ],
});
