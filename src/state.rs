use crate::config::GameConfig;
use crate::engine::{Point, Surface};
use crate::entity::{Direction, Enemy, Player, Powerup, Sprite, Status};
use crate::level::LevelTable;
use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Everything a run mutates, apart from the player itself
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub config: GameConfig,
    /// Current level, which is also the number of levels completed
    pub level: usize,
    pub lives: i32,
    pub points: i32,
    pub enemies: Vec<Enemy>,
    pub powerups: Vec<Powerup>,
}

impl GameState {
    pub fn new(config: GameConfig) -> Self {
        GameState {
            lives: config.lives,
            config,
            level: 0,
            points: 0,
            enemies: Vec::new(),
            powerups: Vec::new(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GameOver {
    pub points: i32,
    pub levels_completed: usize,
}

/// What one `Session::update` did
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Tick {
    Running,
    Died { lives: i32 },
    LevelComplete { level: usize },
    GameOver(GameOver),
}

/// One run of the game: the player, the state it plays in, and the levels
/// that state is rebuilt from.
pub struct Session {
    pub player: Player,
    pub state: GameState,
    levels: LevelTable,
    rng: StdRng,
    game_over: Option<GameOver>,
}

impl Session {
    pub fn new(config: GameConfig, levels: LevelTable) -> Result<Self> {
        Self::with_rng(config, levels, StdRng::from_entropy())
    }

    /// Same as `new` with reproducible procedural levels
    pub fn with_seed(config: GameConfig, levels: LevelTable, seed: u64) -> Result<Self> {
        Self::with_rng(config, levels, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, levels: LevelTable, rng: StdRng) -> Result<Self> {
        config.validate().context("invalid game config")?;
        levels.validate().context("invalid level table")?;
        let mut session = Session {
            player: Player::new(&config),
            state: GameState::new(config),
            levels,
            rng,
            game_over: None,
        };
        session.load_level(0);
        Ok(session)
    }

    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    pub fn game_over(&self) -> Option<GameOver> {
        self.game_over
    }

    /// Rebuilds enemies and powerups for `index`; negative indices mean the
    /// first level. Does not touch `state.level`.
    pub fn init_level(&mut self, index: i64) {
        self.load_level(usize::try_from(index).unwrap_or(0));
    }

    fn load_level(&mut self, index: usize) {
        let config = &self.state.config;
        let (enemies, powerups): (Vec<Enemy>, Vec<Powerup>) = match self.levels.get(index) {
            Some(level) => (
                level
                    .enemies
                    .iter()
                    .map(|placement| {
                        Enemy::new(
                            Point::new(placement.x, placement.y),
                            placement.speed,
                            config,
                        )
                    })
                    .collect(),
                level
                    .powerups
                    .iter()
                    .filter_map(|placement| {
                        self.levels
                            .powerup_type(placement.kind)
                            .map(|kind| Powerup::new(kind, Point::new(placement.x, placement.y)))
                    })
                    .collect(),
            ),
            // past the authored levels: one random bug per level index
            None => {
                let x = config.procedural_x();
                let y = config.procedural.y.clone();
                let speed = config.procedural.speed.clone();
                let rng = &mut self.rng;
                let enemies = (0..index)
                    .map(|_| {
                        let position = Point::new(rng.gen_range(x.clone()), rng.gen_range(y.clone()));
                        Enemy::new(position, Some(rng.gen_range(speed.clone())), config)
                    })
                    .collect();
                (enemies, Vec::new())
            }
        };

        log!(
            "Level {} ready : {} enemies, {} powerups{}",
            index,
            enemies.len(),
            powerups.len(),
            if index < self.levels.len() { "" } else { " (procedural)" }
        );
        self.state.enemies = enemies;
        self.state.powerups = powerups;
    }

    /// One frame: bugs move, then the player checks what it touches.
    /// Once the game is over nothing changes anymore.
    pub fn update(&mut self, dt: f32) -> Tick {
        if let Some(game_over) = self.game_over {
            return Tick::GameOver(game_over);
        }

        let board = self.state.config.board;
        for enemy in self.state.enemies.iter_mut() {
            enemy.update(dt, board);
        }

        match self.player.update(&mut self.state) {
            Status::Active => Tick::Running,
            Status::Dying => self.die(),
            Status::Winning => self.win(),
        }
    }

    pub fn handle_input(&mut self, direction: Direction) {
        if self.game_over.is_none() {
            self.player.handle_input(direction, &self.state.config);
        }
    }

    /// Powerups under bugs under the player
    pub fn render(&self, surface: &dyn Surface) {
        for powerup in self.state.powerups.iter() {
            powerup.render(surface);
        }
        for enemy in self.state.enemies.iter() {
            enemy.render(surface);
        }
        self.player.render(surface);
    }

    fn die(&mut self) -> Tick {
        self.player.move_to(self.state.config.start);
        self.state.lives -= 1;
        if self.state.lives <= 0 {
            let game_over = GameOver {
                points: self.state.points,
                levels_completed: self.state.level,
            };
            log!(
                "Game over : {} points, {} levels completed",
                game_over.points,
                game_over.levels_completed
            );
            self.game_over = Some(game_over);
            return Tick::GameOver(game_over);
        }

        log!("Squashed on level {}, {} lives left", self.state.level, self.state.lives);
        self.load_level(self.state.level);
        Tick::Died {
            lives: self.state.lives,
        }
    }

    fn win(&mut self) -> Tick {
        self.player.move_to(self.state.config.start);
        self.state.points += self.state.config.level_bonus;
        self.state.level += 1;
        log!(
            "Crossed level {}, {} points",
            self.state.level - 1,
            self.state.points
        );
        self.load_level(self.state.level);
        Tick::LevelComplete {
            level: self.state.level,
        }
    }
}
