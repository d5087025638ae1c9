use crate::collision::{check_collision, CollisionKind};
use crate::food::place_food;
use crate::grid::{Cell, Grid};
use crate::highscore::HighScoreStore;
use crate::log;
use crate::rng::GameRng;
use crate::scheduler::{TickHandle, TickScheduler};
use crate::snake::{Direction::{*, self}, Snake};
use crate::speed::SpeedState;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GamePhase {
    Ready,
    Running,
    Paused,
    GameOver,
    /// The snake filled the board, no cell left for food.
    Won,
}

impl GamePhase {
    pub fn is_finished(&self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Won)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running, or a stale timer fired.
    Ignored,
    Moved,
    Ate,
    GameOver { reason: CollisionKind, score: u32, new_record: bool },
    Won { score: u32, new_record: bool },
}

/// What the renderer needs for a full redraw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameView {
    pub grid_size: i32,
    pub snake: Vec<Cell>,
    pub direction: Direction,
    pub food: Option<Cell>,
    pub score: u32,
    pub level: u32,
    pub high_score: u32,
    pub new_record: bool,
    pub phase: GamePhase,
}

/// Owns one game's state plus the process-wide high score, and the single
/// live tick timer.
pub struct SnakeGame<T: TickScheduler, H: HighScoreStore> {
    grid: Grid,
    snake: Snake,
    food: Option<Cell>,
    direction: Direction,
    next_direction: Direction,
    score: u32,
    speed: SpeedState,
    phase: GamePhase,
    high_score: u32,
    new_record: bool,
    active_tick: Option<TickHandle>,
    scheduler: T,
    store: H,
    rng: GameRng,
}

impl<T: TickScheduler, H: HighScoreStore> SnakeGame<T, H> {
    pub fn new(grid: Grid, scheduler: T, store: H, rng: GameRng) -> Self {
        let high_score = store.load().unwrap_or_else(|e| {
            log!("Could not load high score, starting from 0: {}", e);
            0
        });
        log!("New session, seed {}, high score {}", rng.seed(), high_score);

        let mut game = SnakeGame {
            grid,
            snake: Snake::new(grid.origin()),
            food: None,
            direction: Right,
            next_direction: Right,
            score: 0,
            speed: SpeedState::default(),
            phase: GamePhase::Ready,
            high_score,
            new_record: false,
            active_tick: None,
            scheduler,
            store,
            rng,
        };
        game.init();
        game
    }

    /// Resets everything but the high score and waits for `start`.
    pub fn init(&mut self) {
        self.stop_ticking();

        self.snake = Snake::new(self.grid.origin());
        self.direction = Right;
        self.next_direction = Right;
        self.score = 0;
        self.speed.reset();
        self.new_record = false;
        self.food = place_food(&self.grid, self.snake.cell_set(), &mut self.rng);
        self.phase = GamePhase::Ready;
    }

    pub fn start(&mut self) {
        if !matches!(self.phase, GamePhase::Ready | GamePhase::Paused) {
            return;
        }

        self.phase = GamePhase::Running;
        self.reschedule();
    }

    pub fn pause(&mut self) {
        if self.phase != GamePhase::Running {
            return;
        }

        self.phase = GamePhase::Paused;
        self.stop_ticking();
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Running => self.pause(),
            phase if phase.is_finished() => {}
            _ => self.start(),
        }
    }

    /// Buffers a turn for the next tick. Reversing onto the neck is ignored.
    pub fn set_intent(&mut self, direction: Direction) {
        if direction.is_opposite(&self.direction) {
            return;
        }

        self.next_direction = direction;
    }

    /// Entry point for the scheduler. Ticks from cancelled or replaced
    /// timers are dropped.
    pub fn on_timer(&mut self, handle: TickHandle) -> TickOutcome {
        if self.active_tick != Some(handle) {
            return TickOutcome::Ignored;
        }

        self.tick()
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != GamePhase::Running {
            return TickOutcome::Ignored;
        }

        self.direction = self.next_direction;
        let head = self.snake.head().step(self.direction);

        if let Some(reason) = check_collision(&self.grid, head, &self.snake) {
            self.phase = GamePhase::GameOver;
            self.stop_ticking();
            let new_record = self.finalize_score();
            return TickOutcome::GameOver { reason, score: self.score, new_record };
        }

        let grew = self.food == Some(head);
        self.snake.advance(head, grew);

        if !grew {
            return TickOutcome::Moved;
        }

        self.score += 1;
        self.speed.food_eaten();
        self.reschedule();
        log!(
            "Ate food at {}, score {}, interval {}ms, level {}",
            head,
            self.score,
            self.speed.interval_ms(),
            self.speed.level()
        );

        self.food = place_food(&self.grid, self.snake.cell_set(), &mut self.rng);
        if self.food.is_none() {
            self.phase = GamePhase::Won;
            self.stop_ticking();
            let new_record = self.finalize_score();
            return TickOutcome::Won { score: self.score, new_record };
        }

        TickOutcome::Ate
    }

    pub fn view(&self) -> GameView {
        GameView {
            grid_size: self.grid.size(),
            snake: self.snake.cells().copied().collect(),
            direction: self.direction,
            food: self.food,
            score: self.score,
            level: self.speed.level(),
            high_score: self.high_score,
            new_record: self.new_record,
            phase: self.phase,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn scheduler_mut(&mut self) -> &mut T {
        &mut self.scheduler
    }

    ///////////////////////////////////////////////////////////////////////////

    /// Replaces the live timer with one at the current interval.
    fn reschedule(&mut self) {
        self.stop_ticking();
        self.active_tick = Some(self.scheduler.schedule(self.speed.interval()));
    }

    fn stop_ticking(&mut self) {
        if let Some(handle) = self.active_tick.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn finalize_score(&mut self) -> bool {
        if self.score <= self.high_score {
            return false;
        }

        self.high_score = self.score;
        self.new_record = true;
        if let Err(e) = self.store.save(self.score) {
            log!("Could not save high score {}: {}", self.score, e);
        }
        true
    }

    #[cfg(test)]
    fn set_state(&mut self, snake: &[Cell], direction: Direction, food: Option<Cell>) {
        self.snake = Snake::from_cells(snake);
        self.direction = direction;
        self.next_direction = direction;
        self.food = food;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::time::{Duration, Instant};

    use super::*;
    use crate::highscore::MemoryHighScoreStore;
    use crate::speed::{INITIAL_SPEED, MAX_SPEED};

    /// Records what the controller asks of the timer; ticks are driven by hand.
    #[derive(Default)]
    struct ManualScheduler {
        next_id: u64,
        active: Option<TickHandle>,
        scheduled: Vec<Duration>,
        cancelled: usize,
    }

    impl TickScheduler for ManualScheduler {
        fn schedule(&mut self, interval: Duration) -> TickHandle {
            assert!(self.active.is_none(), "a timer is already live");
            self.next_id += 1;
            let handle = TickHandle::new(self.next_id);
            self.active = Some(handle);
            self.scheduled.push(interval);
            handle
        }

        fn cancel(&mut self, handle: TickHandle) {
            if self.active == Some(handle) {
                self.active = None;
                self.cancelled += 1;
            }
        }

        fn poll(&mut self, _now: Instant) -> Option<TickHandle> {
            self.active
        }
    }

    type TestGame = SnakeGame<ManualScheduler, MemoryHighScoreStore>;

    fn create_game(high_score: u32) -> TestGame {
        SnakeGame::new(
            Grid::default(),
            ManualScheduler::default(),
            MemoryHighScoreStore::with_score(high_score),
            GameRng::new(42),
        )
    }

    fn running_game() -> TestGame {
        let mut game = create_game(0);
        game.start();
        game
    }

    fn assert_snake_valid(game: &TestGame) {
        let view = game.view();
        let distinct: HashSet<Cell> = view.snake.iter().copied().collect();
        assert_eq!(distinct.len(), view.snake.len());
        assert!(view.snake.iter().all(|c| game.grid.in_bounds(*c)));
        if let Some(food) = view.food {
            assert!(!distinct.contains(&food));
        }
    }

    #[test]
    fn test_init_gives_ready_single_cell_snake() {
        let game = create_game(0);
        let view = game.view();
        assert_eq!(view.phase, GamePhase::Ready);
        assert_eq!(view.snake, vec![Cell::new(10, 10)]);
        assert_eq!(view.direction, Right);
        assert_eq!(view.score, 0);
        assert_eq!(view.level, 1);
        assert!(view.food.is_some());
        assert_ne!(view.food, Some(Cell::new(10, 10)));
    }

    #[test]
    fn test_tick_does_nothing_before_start() {
        let mut game = create_game(0);
        assert_eq!(game.tick(), TickOutcome::Ignored);
        assert_eq!(game.view().snake, vec![Cell::new(10, 10)]);
        assert!(game.scheduler.scheduled.is_empty());
    }

    #[test]
    fn test_plain_move() {
        let mut game = running_game();
        game.set_state(&[Cell::new(10, 10)], Right, Some(Cell::new(0, 0)));

        assert_eq!(game.tick(), TickOutcome::Moved);
        assert_eq!(game.view().snake, vec![Cell::new(11, 10)]);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_eating_grows_scores_and_speeds_up() {
        let mut game = running_game();
        game.set_state(&[Cell::new(10, 10)], Right, Some(Cell::new(11, 10)));

        assert_eq!(game.tick(), TickOutcome::Ate);
        let view = game.view();
        assert_eq!(view.snake, vec![Cell::new(11, 10), Cell::new(10, 10)]);
        assert_eq!(view.score, 1);
        assert_eq!(view.level, 2);
        assert_eq!(game.speed.interval_ms(), 145);
        let food = view.food.unwrap();
        assert!(food != Cell::new(11, 10) && food != Cell::new(10, 10));

        // old timer cancelled, exactly one new one at the faster interval
        assert_eq!(
            game.scheduler.scheduled,
            vec![Duration::from_millis(INITIAL_SPEED), Duration::from_millis(145)]
        );
        assert_eq!(game.scheduler.cancelled, 1);
    }

    #[test]
    fn test_wall_hit_ends_game_and_sets_record() {
        let mut game = create_game(0);
        game.start();
        game.set_state(&[Cell::new(19, 10)], Right, Some(Cell::new(0, 0)));
        game.score = 3;

        let outcome = game.tick();
        assert_eq!(
            outcome,
            TickOutcome::GameOver { reason: CollisionKind::Wall, score: 3, new_record: true }
        );
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(game.high_score(), 3);
        assert_eq!(game.store.load(), Ok(3));
        assert!(game.scheduler.active.is_none());
    }

    #[test]
    fn test_lower_score_keeps_high_score() {
        let mut game = create_game(10);
        game.start();
        game.set_state(&[Cell::new(19, 10)], Right, Some(Cell::new(0, 0)));
        game.score = 4;

        game.tick();
        assert_eq!(game.high_score(), 10);
        assert_eq!(game.store.save_count(), 0);
        assert!(!game.view().new_record);
    }

    #[test]
    fn test_moving_away_from_body_is_safe() {
        let mut game = running_game();
        game.set_state(
            &[Cell::new(5, 5), Cell::new(4, 5), Cell::new(3, 5)],
            Right,
            Some(Cell::new(0, 0)),
        );

        assert_eq!(game.tick(), TickOutcome::Moved);
        assert_eq!(game.view().snake[0], Cell::new(6, 5));
    }

    #[test]
    fn test_chasing_own_tail_is_fatal() {
        let mut game = running_game();
        game.set_state(
            &[Cell::new(5, 5), Cell::new(6, 5), Cell::new(6, 6), Cell::new(5, 6)],
            Left,
            Some(Cell::new(0, 0)),
        );
        game.set_intent(Down);

        assert!(matches!(
            game.tick(),
            TickOutcome::GameOver { reason: CollisionKind::SelfCollision, .. }
        ));
    }

    #[test]
    fn test_reversal_is_rejected() {
        let mut game = running_game();
        game.set_state(&[Cell::new(10, 10)], Right, Some(Cell::new(0, 0)));

        game.set_intent(Left);
        game.tick();
        assert_eq!(game.view().snake[0], Cell::new(11, 10));

        game.set_intent(Up);
        game.tick();
        assert_eq!(game.view().snake[0], Cell::new(11, 9));
    }

    #[test]
    fn test_intent_only_applies_on_next_tick() {
        let mut game = running_game();
        game.set_state(&[Cell::new(10, 10)], Right, Some(Cell::new(0, 0)));

        game.set_intent(Down);
        assert_eq!(game.view().direction, Right);
        // Left is opposite of the committed direction, Down stays buffered
        game.set_intent(Left);
        game.tick();
        assert_eq!(game.view().snake[0], Cell::new(10, 11));
    }

    #[test]
    fn test_pause_cancels_and_stale_timer_is_ignored() {
        let mut game = running_game();
        let handle = game.active_tick.unwrap();

        game.pause();
        assert_eq!(game.phase(), GamePhase::Paused);
        assert_eq!(game.on_timer(handle), TickOutcome::Ignored);
        assert_eq!(game.view().snake, vec![Cell::new(10, 10)]);

        game.start();
        let resumed = game.active_tick.unwrap();
        assert_ne!(resumed, handle);
        assert_eq!(game.on_timer(handle), TickOutcome::Ignored);
        assert_ne!(game.on_timer(resumed), TickOutcome::Ignored);
    }

    #[test]
    fn test_start_and_pause_are_noops_in_wrong_phase() {
        let mut game = create_game(0);
        game.pause();
        assert_eq!(game.phase(), GamePhase::Ready);

        game.start();
        game.start();
        assert_eq!(game.scheduler.scheduled.len(), 1);

        game.set_state(&[Cell::new(19, 10)], Right, Some(Cell::new(0, 0)));
        game.tick();
        game.start();
        game.toggle_pause();
        assert_eq!(game.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_toggle_pause_round_trip() {
        let mut game = create_game(0);
        game.toggle_pause();
        assert_eq!(game.phase(), GamePhase::Running);
        game.toggle_pause();
        assert_eq!(game.phase(), GamePhase::Paused);
        game.toggle_pause();
        assert_eq!(game.phase(), GamePhase::Running);
    }

    #[test]
    fn test_init_after_game_over_keeps_high_score() {
        let mut game = create_game(0);
        game.start();
        game.set_state(&[Cell::new(19, 10)], Right, Some(Cell::new(0, 0)));
        game.score = 6;
        game.tick();

        game.init();
        let view = game.view();
        assert_eq!(view.phase, GamePhase::Ready);
        assert_eq!(view.score, 0);
        assert_eq!(view.snake, vec![Cell::new(10, 10)]);
        assert_eq!(view.high_score, 6);
        assert!(!view.new_record);
        assert_eq!(game.speed.interval_ms(), INITIAL_SPEED);
    }

    #[test]
    fn test_init_while_running_stops_timer() {
        let mut game = running_game();
        let handle = game.active_tick.unwrap();
        game.init();

        assert!(game.scheduler.active.is_none());
        assert_eq!(game.on_timer(handle), TickOutcome::Ignored);
    }

    #[test]
    fn test_filling_small_board_wins() {
        let mut game = SnakeGame::new(
            Grid::new(2),
            ManualScheduler::default(),
            MemoryHighScoreStore::default(),
            GameRng::new(1),
        );
        game.start();
        game.set_state(
            &[Cell::new(0, 1), Cell::new(0, 0), Cell::new(1, 0)],
            Right,
            Some(Cell::new(1, 1)),
        );
        game.score = 2;

        assert_eq!(game.tick(), TickOutcome::Won { score: 3, new_record: true });
        assert_eq!(game.phase(), GamePhase::Won);
        assert_eq!(game.view().food, None);
        assert!(game.scheduler.active.is_none());
    }

    #[test]
    fn test_random_play_keeps_invariants() {
        let mut game = running_game();
        let mut rng = GameRng::new(5);
        let turns = [Up, Down, Left, Right];
        let mut eaten = 0;
        let mut last_interval = game.speed.interval_ms();

        for _ in 0..2000 {
            if game.phase().is_finished() {
                game.init();
                game.start();
                eaten = 0;
                last_interval = game.speed.interval_ms();
            }
            if let Some(dir) = rng.choose(&turns) {
                game.set_intent(*dir);
            }
            let score_before = game.score();
            match game.tick() {
                TickOutcome::Ate => eaten += 1,
                TickOutcome::Ignored => panic!("running game ignored a tick"),
                _ => {}
            }
            assert!(game.score() >= score_before || game.phase().is_finished());
            assert_eq!(game.score(), eaten);
            assert!(game.speed.interval_ms() <= last_interval);
            assert!(game.speed.interval_ms() >= MAX_SPEED);
            last_interval = game.speed.interval_ms();
            if !game.phase().is_finished() {
                assert_snake_valid(&game);
            }
        }
    }
}
