//! Rules of a player-vs-AI match, free of any terminal I/O.

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::info;

use crate::ai::AiPilot;
use crate::config::GameConfig;
use crate::food::Food;
use crate::snake::{Direction, MoveResult, Snake};
use crate::surface::{Surface, SurfaceError};
use crate::PixelInt;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error("a {columns}x{rows} board has no room for two snakes and food")]
    TooSmall { columns: PixelInt, rows: PixelInt },
}

/// Why a match stopped.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Ending {
    PlayerHitSelf,
    PlayerHitAi,
    AiHitSelf,
    /// No free cell is left for food; the higher score wins.
    BoardFull { player_won: bool },
}

impl Ending {
    pub fn headline(&self) -> &'static str {
        match self {
            Ending::PlayerHitSelf => "Game over - you ran into yourself",
            Ending::PlayerHitAi => "Game over - you ran into the AI snake",
            Ending::AiHitSelf => "You win - the AI snake ran into itself",
            Ending::BoardFull { player_won: true } => "You win - the board is full",
            Ending::BoardFull { player_won: false } => "Game over - the board is full",
        }
    }

    pub fn player_won(&self) -> bool {
        matches!(self, Ending::AiHitSelf | Ending::BoardFull { player_won: true })
    }
}

/// Everything that changed during one [`Match::tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub player: MoveResult,
    pub ai: MoveResult,
    /// Heading the AI asked for this tick, before the anti-reversal rule
    pub ai_command: Option<Direction>,
    pub food_respawned: bool,
    pub ending: Option<Ending>,
}

pub struct Match {
    surface: Surface,
    player: Snake,
    ai: Snake,
    pilot: AiPilot,
    food: Food,
    rng: StdRng,
}

impl Match {
    /// Starts a match, seeding food placement from the config when asked to.
    pub fn new(config: &GameConfig) -> Result<Self, MatchError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self::with_rng(config, rng)
    }

    pub fn with_rng(config: &GameConfig, mut rng: StdRng) -> Result<Self, MatchError> {
        let surface = config.surface()?;
        let too_small = MatchError::TooSmall { columns: surface.columns(), rows: surface.rows() };

        let row = surface.rows() / 2;
        let player_head = surface.to_pixels(surface.columns() * 6 / 40, row);
        let ai_head = surface.to_pixels(surface.columns() * 34 / 40, row);

        let player = Snake::new(player_head, config.initial_length, Direction::Right, &surface);
        let ai = Snake::new(ai_head, config.initial_length, Direction::Right, &surface);

        if player.body().iter().any(|segment| ai.occupies(*segment)) {
            return Err(too_small);
        }

        let food = Food::spawn(&surface, &[&player, &ai], &mut rng).ok_or(too_small)?;

        info!(
            columns = surface.columns(),
            rows = surface.rows(),
            unit = surface.unit(),
            "match started"
        );

        Ok(Match { surface, player, ai, pilot: AiPilot::new(surface), food, rng })
    }

    /// Builds a match from explicit pieces.
    pub fn from_parts(surface: Surface, player: Snake, ai: Snake, food: Food, rng: StdRng) -> Self {
        Match { surface, player, ai, pilot: AiPilot::new(surface), food, rng }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn player(&self) -> &Snake {
        &self.player
    }

    pub fn ai(&self) -> &Snake {
        &self.ai
    }

    pub fn food(&self) -> &Food {
        &self.food
    }

    pub fn scores(&self) -> (u32, u32) {
        (self.player.score(), self.ai.score())
    }

    /// Keyboard input for the player, subject to the same anti-reversal rule.
    pub fn steer_player(&mut self, direction: Direction) -> bool {
        self.player.set_direction(direction)
    }

    /// Advances both snakes by one step.
    pub fn tick(&mut self) -> TickReport {
        let mut food_respawned = false;
        let mut board_full = false;

        let player = self.player.move_step(&self.surface, self.food.position());
        if player.ate {
            food_respawned = true;
            board_full |= !self.respawn_food();
        }

        let ai_command = self.pilot.steer(&mut self.ai, self.food.position());
        let ai = self.ai.move_step(&self.surface, self.food.position());
        if ai.ate {
            food_respawned = true;
            board_full |= !self.respawn_food();
        }

        let ending = if self.player.hits_itself() {
            Some(Ending::PlayerHitSelf)
        } else if self.player.hits(&self.ai) {
            Some(Ending::PlayerHitAi)
        } else if self.ai.hits_itself() {
            Some(Ending::AiHitSelf)
        } else if board_full {
            Some(Ending::BoardFull { player_won: self.player.score() > self.ai.score() })
        } else {
            None
        };

        if let Some(ending) = ending {
            let (player_score, ai_score) = self.scores();
            info!(?ending, player_score, ai_score, "match over");
        }

        TickReport { player, ai, ai_command, food_respawned, ending }
    }

    /// Moves the food to a free cell, returning `false` when none is left.
    fn respawn_food(&mut self) -> bool {
        match Food::spawn(&self.surface, &[&self.player, &self.ai], &mut self.rng) {
            Some(food) => {
                self.food = food;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::food::FoodKind;

    fn seeded(config: &GameConfig) -> Match {
        Match::with_rng(config, StdRng::seed_from_u64(5)).unwrap()
    }

    #[test]
    fn default_match_places_snakes_like_the_classic_layout() {
        let game = seeded(&GameConfig::default());

        assert_eq!(game.player().head(), (120, 300));
        assert_eq!(game.ai().head(), (680, 300));
        assert_eq!(game.player().len(), 3);
        assert_eq!(game.ai().len(), 3);
        assert!(!game.player().occupies(game.food().position()));
        assert!(!game.ai().occupies(game.food().position()));
    }

    #[test]
    fn tiny_board_is_rejected() {
        let config = GameConfig::new(2, 1);

        assert!(matches!(Match::new(&config), Err(MatchError::TooSmall { .. })));
    }

    #[test]
    fn untiled_config_is_a_surface_error() {
        let config = GameConfig { unit: -5, ..GameConfig::default() };

        assert_eq!(
            Match::new(&config).err(),
            Some(MatchError::Surface(SurfaceError::InvalidUnit(-5)))
        );
    }

    #[test]
    fn player_eating_scores_and_respawns_food() {
        let surface = Surface::from_cells(40, 30, 20).unwrap();
        let player = Snake::new((120, 300), 3, Direction::Right, &surface);
        let ai = Snake::new((680, 300), 3, Direction::Right, &surface);
        let food = Food::new((140, 300), FoodKind::Apple);
        let mut game = Match::from_parts(surface, player, ai, food, StdRng::seed_from_u64(3));

        let report = game.tick();

        assert!(report.player.ate);
        assert!(report.food_respawned);
        assert_eq!(report.ending, None);
        assert_eq!(game.scores().0, 1);
        assert_eq!(game.player().len(), 4);
        assert_ne!(game.food().position(), (140, 300));
    }

    #[test]
    fn player_running_into_ai_ends_the_match() {
        let surface = Surface::from_cells(40, 30, 20).unwrap();
        let player = Snake::new((100, 100), 3, Direction::Right, &surface);
        let ai = Snake::new((120, 60), 4, Direction::Up, &surface);
        let food = Food::new((600, 500), FoodKind::Berry);
        let mut game = Match::from_parts(surface, player, ai, food, StdRng::seed_from_u64(3));

        let report = game.tick();

        assert_eq!(report.ending, Some(Ending::PlayerHitAi));
        assert!(!report.ending.unwrap().player_won());
    }

    /// Pixel positions for lattice cells on a 40x30 board.
    fn cells(lattice: &[(PixelInt, PixelInt)]) -> Vec<crate::Coords> {
        let surface = Surface::from_cells(40, 30, 20).unwrap();
        lattice.iter().map(|&(c, r)| surface.to_pixels(c, r)).collect()
    }

    /// An AI curled around its own head so every neighbour is body.
    fn coiled_ai(surface: &Surface) -> Snake {
        let body = cells(&[(10, 10), (10, 9), (11, 9), (11, 10), (11, 11), (10, 11), (9, 11), (9, 10)]);
        Snake::from_segments(body, Direction::Down, surface).unwrap()
    }

    #[test]
    fn player_turning_into_its_own_body_ends_the_match() {
        let surface = Surface::from_cells(40, 30, 20).unwrap();
        let player = Snake::from_segments(cells(&[(5, 5), (5, 4), (6, 4), (6, 5), (6, 6)]), Direction::Right, &surface)
            .unwrap();
        let ai = Snake::new(surface.to_pixels(30, 5), 3, Direction::Right, &surface);
        let food = Food::new(surface.to_pixels(30, 20), FoodKind::Apple);
        let mut game = Match::from_parts(surface, player, ai, food, StdRng::seed_from_u64(3));

        let report = game.tick();

        assert_eq!(game.player().head(), surface.to_pixels(6, 5));
        assert_eq!(report.ending, Some(Ending::PlayerHitSelf));
        assert!(!Ending::PlayerHitSelf.player_won());
    }

    #[test]
    fn boxed_in_ai_runs_into_itself() {
        let surface = Surface::from_cells(40, 30, 20).unwrap();
        let player = Snake::new(surface.to_pixels(2, 2), 3, Direction::Right, &surface);
        let ai = coiled_ai(&surface);
        let food = Food::new(surface.to_pixels(30, 20), FoodKind::Banana);
        let mut game = Match::from_parts(surface, player, ai, food, StdRng::seed_from_u64(3));

        let report = game.tick();

        assert_eq!(report.ai_command, None);
        assert_eq!(game.ai().head(), surface.to_pixels(10, 11));
        assert_eq!(report.ending, Some(Ending::AiHitSelf));
        assert!(report.ending.unwrap().player_won());
    }

    #[test]
    fn player_collision_outranks_the_ai_hitting_itself() {
        let surface = Surface::from_cells(40, 30, 20).unwrap();
        // Stepping left lands the player on (11, 9), part of the coil.
        let player = Snake::new(surface.to_pixels(12, 9), 3, Direction::Left, &surface);
        let ai = coiled_ai(&surface);
        let food = Food::new(surface.to_pixels(30, 20), FoodKind::Apple);
        let mut game = Match::from_parts(surface, player, ai, food, StdRng::seed_from_u64(3));

        let report = game.tick();

        assert!(game.ai().hits_itself());
        assert!(game.player().hits(game.ai()));
        assert_eq!(report.ending, Some(Ending::PlayerHitAi));
    }

    #[test]
    fn eating_the_last_free_cell_fills_the_board() {
        // 3x2 board: player on the top row, AI across the bottom, food in the last gap.
        let surface = Surface::from_cells(3, 2, 20).unwrap();
        let player = Snake::new(surface.to_pixels(1, 0), 2, Direction::Right, &surface);
        let ai = Snake::new(surface.to_pixels(0, 1), 3, Direction::Left, &surface);
        let food = Food::new(surface.to_pixels(2, 0), FoodKind::Berry);
        let mut game = Match::from_parts(surface, player, ai, food, StdRng::seed_from_u64(3));

        let report = game.tick();

        assert!(report.player.ate);
        assert!(report.food_respawned);
        assert_eq!(game.scores(), (1, 0));
        assert_eq!(report.ending, Some(Ending::BoardFull { player_won: true }));
    }

    #[test]
    fn endings_name_the_winner() {
        assert!(Ending::AiHitSelf.player_won());
        assert!(!Ending::PlayerHitSelf.player_won());
        assert!(Ending::BoardFull { player_won: true }.player_won());
        assert!(Ending::AiHitSelf.headline().starts_with("You win"));
    }
}
