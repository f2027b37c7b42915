//! Terminal session: input, the fixed-rate tick scheduler and drawing.

use std::thread::sleep;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::style::Color;
use tracing::info;

use crate::config::GameConfig;
use crate::snake::{Direction, MoveResult, Snake};
use crate::state::{Ending, Match};
use crate::term::{TermCoords, TermManager};
use crate::Coords;

const POLL_INTERVAL_MS: u64 = 5;

const SNAKE_BODY_CHAR: char = '█';
const PLAYER_COLOR: Color = Color::Blue;
const AI_COLOR: Color = Color::Green;
const FOOD_COLOR: Color = Color::Red;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Phase {
    Ready,
    Running,
    Paused,
    Over,
}

enum Control {
    Continue,
    Quit,
}

pub struct SnakeGame {
    config: GameConfig,
    term: TermManager,
    game: Match,
    phase: Phase,
    dir_change: Option<Direction>,
}

impl SnakeGame {
    /// Prepares a session, failing early when the board does not fit the terminal.
    pub fn new(config: GameConfig) -> Result<Self> {
        let term = TermManager::new().context("reading terminal size")?;
        let game = Match::new(&config)?;

        let (board_w, board_h) = board_size(&config);
        let (term_w, term_h) = term.get_terminal_size();
        if board_w > term_w || board_h + 1 > term_h {
            bail!(
                "a {}x{} board needs a {}x{} terminal, this one is {}x{}",
                config.columns,
                config.rows,
                board_w,
                board_h + 1,
                term_w,
                term_h
            );
        }

        Ok(SnakeGame { config, term, game, phase: Phase::Ready, dir_change: None })
    }

    /// Runs until the user quits, leaving the terminal as it was found.
    pub fn run(&mut self) -> Result<()> {
        self.term.setup().context("entering raw mode")?;
        let result = self.main_loop();
        self.term.restore().context("restoring terminal")?;
        result
    }

    ///////////////////////////////////////////////////////////////////////////

    fn main_loop(&mut self) -> Result<()> {
        self.draw_board()?;
        self.term.show_message(&[
            "Arrow keys or WASD to move",
            "Space to pause, Esc to stop",
            "CTRL+C to quit",
            "",
            "Press Enter to begin",
        ])?;

        let mut last_step = Instant::now();

        loop {
            sleep(Duration::from_millis(POLL_INTERVAL_MS));

            for key_ev in self.term.read_key_events_queue()? {
                if let Control::Quit = self.handle_key(&key_ev)? {
                    return Ok(());
                }
            }

            // Steps happen only once the interval has elapsed; a slow step
            // just pushes the next one back.
            if self.phase == Phase::Running && last_step.elapsed() >= self.config.tick_interval {
                last_step = Instant::now();
                self.step()?;
            }
        }
    }

    fn handle_key(&mut self, ev: &KeyEvent) -> Result<Control> {
        if is_ctrl_c(ev) {
            return Ok(Control::Quit);
        }

        match ev.code {
            KeyCode::Char('w') | KeyCode::Up => self.queue_turn(Direction::Up),
            KeyCode::Char('a') | KeyCode::Left => self.queue_turn(Direction::Left),
            KeyCode::Char('s') | KeyCode::Down => self.queue_turn(Direction::Down),
            KeyCode::Char('d') | KeyCode::Right => self.queue_turn(Direction::Right),
            KeyCode::Char(' ') => self.toggle_pause()?,
            KeyCode::Enter => {
                if matches!(self.phase, Phase::Ready | Phase::Over) {
                    self.restart()?;
                }
            }
            KeyCode::Esc => self.stop()?,
            _ => {}
        }

        Ok(Control::Continue)
    }

    fn queue_turn(&mut self, direction: Direction) {
        if self.phase == Phase::Running {
            self.dir_change = Some(direction);
        }
    }

    fn restart(&mut self) -> Result<()> {
        if self.phase == Phase::Over {
            self.game = Match::new(&self.config)?;
        }

        self.dir_change = None;
        self.phase = Phase::Running;
        self.term.hide_message()?;
        self.draw_board()
    }

    fn stop(&mut self) -> Result<()> {
        if !matches!(self.phase, Phase::Running | Phase::Paused) {
            return Ok(());
        }

        info!("match stopped by player");
        self.phase = Phase::Over;
        let (player, ai) = self.game.scores();
        self.term.show_message(&[
            "Game stopped",
            &format!("You: {}  AI: {}", player, ai),
            "",
            "Press Enter to play again,",
            "or CTRL+C to quit.",
        ])?;
        Ok(())
    }

    fn toggle_pause(&mut self) -> Result<()> {
        match self.phase {
            Phase::Running => {
                self.phase = Phase::Paused;
                self.term.show_message(&["Paused", "Press Space to resume", "or CTRL+C to quit"])?;
            }
            Phase::Paused => {
                self.phase = Phase::Running;
                self.term.hide_message()?;
            }
            Phase::Ready | Phase::Over => {}
        }
        Ok(())
    }

    fn step(&mut self) -> Result<()> {
        if let Some(dir) = self.dir_change.take() {
            self.game.steer_player(dir);
        }

        let report = self.game.tick();

        self.erase_tail(&report.player)?;
        self.erase_tail(&report.ai)?;
        let tips = [(tip(self.game.player()), PLAYER_COLOR), (tip(self.game.ai()), AI_COLOR)];
        for (tip, color) in tips {
            self.draw_tip(tip, color)?;
        }
        self.draw_food()?;
        self.draw_scores()?;
        self.term.flush()?;

        if let Some(ending) = report.ending {
            self.game_over(ending)?;
        }
        Ok(())
    }

    fn game_over(&mut self, ending: Ending) -> Result<()> {
        self.phase = Phase::Over;

        let body_color = if ending.player_won() { AI_COLOR } else { PLAYER_COLOR };
        let loser = if ending.player_won() { self.game.ai() } else { self.game.player() };
        let wreck: Vec<Coords> = loser.body().iter().copied().collect();
        for pos in wreck {
            let at = self.cell(pos);
            self.term.print_at(at, 'X', body_color)?;
        }

        let (player, ai) = self.game.scores();
        let (title, detail) = ending.headline().split_once(" - ").unwrap_or((ending.headline(), ""));
        self.term.show_message(&[
            title,
            detail,
            &format!("You: {}  AI: {}", player, ai),
            "",
            "Press Enter to play again,",
            "or CTRL+C to quit.",
        ])?;
        Ok(())
    }

    fn draw_board(&mut self) -> Result<()> {
        self.term.clear()?;
        self.term.draw_borders(board_size(&self.config))?;

        let mut glyphs = snake_glyphs(self.game.player(), PLAYER_COLOR);
        glyphs.extend(snake_glyphs(self.game.ai(), AI_COLOR));
        for (pos, ch, color) in glyphs {
            let at = self.cell(pos);
            self.term.print_at(at, ch, color)?;
        }

        self.draw_food()?;
        self.draw_scores()?;
        self.term.flush()?;
        Ok(())
    }

    /// Redraws only what a single step changes: the new head and the old one behind it.
    fn draw_tip(&mut self, (head, head_char, neck): Tip, color: Color) -> Result<()> {
        if let Some(neck) = neck {
            let at = self.cell(neck);
            self.term.print_at(at, SNAKE_BODY_CHAR, color)?;
        }
        let at = self.cell(head);
        self.term.print_at(at, head_char, color)?;
        Ok(())
    }

    fn erase_tail(&mut self, mov: &MoveResult) -> Result<()> {
        if let Some(old_tail) = mov.old_tail {
            let at = self.cell(old_tail);
            self.term.print_at(at, ' ', Color::Reset)?;
        }
        Ok(())
    }

    fn draw_food(&mut self) -> Result<()> {
        let food = *self.game.food();
        let at = self.cell(food.position());
        self.term.print_at(at, food.kind().glyph(), FOOD_COLOR)?;
        Ok(())
    }

    fn draw_scores(&mut self) -> Result<()> {
        let (player, ai) = self.game.scores();
        let (_, board_h) = board_size(&self.config);
        let line = format!("You: {:<4} AI: {:<4}", player, ai);
        self.term.print_line((1, board_h), &line, Color::White)?;
        Ok(())
    }

    /// Terminal cell inside the border for a board position.
    fn cell(&self, pos: Coords) -> TermCoords {
        let (column, row) = self.game.surface().to_lattice(pos);
        (column as u16 + 1, row as u16 + 1)
    }
}

/// Head position, head glyph and the segment right behind the head.
type Tip = (Coords, char, Option<Coords>);

fn tip(snake: &Snake) -> Tip {
    (snake.head(), snake.head_char(), snake.body().get(1).copied())
}

fn snake_glyphs(snake: &Snake, color: Color) -> Vec<(Coords, char, Color)> {
    snake
        .body()
        .iter()
        .enumerate()
        .map(|(i, pos)| {
            let ch = if i == 0 { snake.head_char() } else { SNAKE_BODY_CHAR };
            (*pos, ch, color)
        })
        .collect()
}

/// Board dimensions in terminal cells, border included.
fn board_size(config: &GameConfig) -> TermCoords {
    let width = u16::try_from(config.columns + 2).unwrap_or(u16::MAX);
    let height = u16::try_from(config.rows + 2).unwrap_or(u16::MAX);
    (width, height)
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}
