use crate::browser;
use crate::config::ConfigFile;
use crate::engine::{Canvas, Game, Point, Rect, Renderer, Resources, Size, Surface};
use crate::entity::Direction;
use crate::state::{GameOver, Session, Tick};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;

/// ┌──────────────────── Frame ────────────────────┐
/// │  GameLoop  ─ key_down ─►  Crossing            │
/// │            ─ update   ─►  Session::update     │
/// │            ─ draw     ─►  board, entities,    │
/// │                           HUD, game over      │
/// └───────────────────────────────────────────────┘
pub enum Crossing {
    /// Waiting on config and images
    Loading,
    Loaded(Round),
}

pub struct Round {
    session: Session,
    resources: Resources,
}

/// Tile rows, top to bottom
const ROW_IMAGES: [&str; 6] = [
    "images/water-block.png",
    "images/stone-block.png",
    "images/stone-block.png",
    "images/stone-block.png",
    "images/grass-block.png",
    "images/grass-block.png",
];
const COLUMNS: usize = 5;
const TILE: Size = Size {
    width: 101.0,
    height: 83.0,
};
const CANVAS: Size = Size {
    width: 505.0,
    height: 606.0,
};

impl Crossing {
    const CONFIG_PATH: &'static str = "config.json";

    pub fn new() -> Self {
        Crossing::Loading
    }

    /// A missing or broken config is not fatal, the built-in one is used
    async fn load_config() -> ConfigFile {
        let loaded = browser::fetch_json::<ConfigFile>(Self::CONFIG_PATH)
            .await
            .and_then(|config| config.validate().map(|_| config));
        match loaded {
            Ok(config) => config,
            Err(err) => {
                log!(
                    "Using built-in config, could not load {} : {:#}",
                    Self::CONFIG_PATH,
                    err
                );
                ConfigFile::default()
            }
        }
    }

    fn sprites(config: &ConfigFile) -> Vec<String> {
        let mut sprites: Vec<String> = ROW_IMAGES.iter().map(|row| row.to_string()).collect();
        sprites.extend(
            [
                &config.game.player_sprite,
                &config.game.enemy_sprite,
                &config.game.enemy_sprite_mirrored,
            ]
            .iter()
            .map(|sprite| sprite.to_string()),
        );
        sprites.extend(config.levels.powerup_sprites().map(str::to_string));
        sprites.sort();
        sprites.dedup();
        sprites
    }
}

impl Default for Crossing {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl Game for Crossing {
    async fn initialize(&self) -> Result<Box<dyn Game>> {
        match self {
            Crossing::Loading => {
                let config = Self::load_config().await;
                let resources = Resources::load(&Self::sprites(&config))
                    .await
                    .context("Failed to load sprites")?;
                let session = Session::new(config.game, config.levels)?;
                Ok(Box::new(Crossing::Loaded(Round { session, resources })))
            }
            Crossing::Loaded(_) => Err(anyhow!("Game is already initialized")),
        }
    }

    fn key_down(&mut self, code: &str) {
        if let (Crossing::Loaded(round), Some(direction)) = (self, Direction::from_key_code(code)) {
            round.session.handle_input(direction);
        }
    }

    fn update(&mut self, dt: f32) {
        if let Crossing::Loaded(round) = self {
            match round.session.update(dt) {
                Tick::Running | Tick::GameOver(_) => {}
                Tick::Died { lives } => log!("{} lives left", lives),
                Tick::LevelComplete { level } => log!("On to level {}", level),
            }
        }
    }

    fn draw(&self, renderer: &Renderer) {
        if let Crossing::Loaded(round) = self {
            renderer.clear(&Rect::new(Point::default(), CANVAS));
            let canvas = Canvas {
                renderer,
                resources: &round.resources,
            };
            draw_board(&canvas);
            round.session.render(&canvas);

            let state = &round.session.state;
            renderer.draw_hud(
                &format!(
                    "Level {}   Lives {}   Points {}",
                    state.level + 1,
                    state.lives,
                    state.points
                ),
                &Point::new(10.0, 40.0),
            );
            if let Some(GameOver {
                points,
                levels_completed,
            }) = round.session.game_over()
            {
                renderer.draw_game_over(points, levels_completed);
            }
        }
    }
}

fn draw_board(surface: &dyn Surface) {
    for (row, image) in ROW_IMAGES.iter().enumerate() {
        for column in 0..COLUMNS {
            surface.draw_sprite(
                image,
                Point::new(column as f32 * TILE.width, row as f32 * TILE.height),
            );
        }
    }
}
