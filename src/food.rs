use rand::seq::SliceRandom;
use rand::Rng;

use crate::snake::Snake;
use crate::surface::Surface;
use crate::Coords;

/// Cosmetic flavour of a food item. Every kind scores one point.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FoodKind {
    Apple,
    Banana,
    Berry,
}

const KINDS: [FoodKind; 3] = [FoodKind::Apple, FoodKind::Banana, FoodKind::Berry];

impl FoodKind {
    pub fn glyph(self) -> char {
        match self {
            FoodKind::Apple => 'O',
            FoodKind::Banana => ')',
            FoodKind::Berry => '*',
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Food {
    position: Coords,
    kind: FoodKind,
}

impl Food {
    pub fn new(position: Coords, kind: FoodKind) -> Self {
        Food { position, kind }
    }

    /// Places food on a random cell that no snake occupies.
    ///
    /// Returns `None` once the snakes cover the whole board.
    pub fn spawn<R: Rng + ?Sized>(surface: &Surface, snakes: &[&Snake], rng: &mut R) -> Option<Self> {
        let choices: Vec<Coords> = surface
            .positions()
            .filter(|pos| !snakes.iter().any(|snake| snake.occupies(*pos)))
            .collect();

        let position = *choices.choose(rng)?;
        let kind = *KINDS.choose(rng)?;
        Some(Food { position, kind })
    }

    pub fn position(&self) -> Coords {
        self.position
    }

    pub fn kind(&self) -> FoodKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::snake::Direction;

    #[test]
    fn spawn_avoids_every_snake() {
        let surface = Surface::from_cells(4, 1, 10).unwrap();
        let left = Snake::new((10, 0), 2, Direction::Right, &surface);
        let right = Snake::new((30, 0), 1, Direction::Right, &surface);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let food = Food::spawn(&surface, &[&left, &right], &mut rng).unwrap();
            assert_eq!(food.position(), (20, 0));
        }
    }

    #[test]
    fn spawn_lands_on_aligned_cells() {
        let surface = Surface::from_cells(40, 30, 20).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..50 {
            let food = Food::spawn(&surface, &[], &mut rng).unwrap();
            assert!(surface.is_aligned(food.position()));
        }
    }

    #[test]
    fn spawn_fails_on_full_board() {
        let surface = Surface::from_cells(3, 1, 10).unwrap();
        let snake = Snake::new((20, 0), 3, Direction::Right, &surface);
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(Food::spawn(&surface, &[&snake], &mut rng), None);
    }

    #[test]
    fn spawn_is_deterministic_for_a_seed() {
        let surface = Surface::from_cells(40, 30, 20).unwrap();
        let mut first = StdRng::seed_from_u64(99);
        let mut second = StdRng::seed_from_u64(99);

        assert_eq!(
            Food::spawn(&surface, &[], &mut first),
            Food::spawn(&surface, &[], &mut second)
        );
    }
}
