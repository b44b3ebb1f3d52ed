use std::time::Duration;

use tracing::debug;

use super::{
    action::Direction,
    config::GameConfig,
    food::FoodSpawner,
    particles::ParticleSystem,
    state::{Cell, CollisionType, Snake},
};

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The snake slid one cell forward
    Moved,
    /// The snake ate the food at `cell` and grew by one segment
    Ate { cell: Cell },
    /// The move was fatal; the snake was left as it was before the tick
    Collided(CollisionType),
    /// The snake ate and no free cell is left for new food
    BoardFull,
}

impl TickOutcome {
    /// Returns true if the run cannot continue after this tick
    pub fn is_terminal(&self) -> bool {
        matches!(self, TickOutcome::Collided(_) | TickOutcome::BoardFull)
    }
}

/// Movement, collision and scoring rules for one run
#[derive(Clone)]
pub struct SnakeSimulation {
    config: GameConfig,
    snake: Snake,
    pending_direction: Option<Direction>,
    food: Option<Cell>,
    score: u32,
    tick_interval_ms: u64,
    spawner: FoodSpawner,
}

impl SnakeSimulation {
    /// Create a simulation already reset to the start of a run
    pub fn new(config: GameConfig, spawner: FoodSpawner) -> Self {
        let snake = Snake::new(config.start_cell, config.initial_direction, 1);
        let mut simulation = Self {
            snake,
            pending_direction: None,
            food: None,
            score: 0,
            tick_interval_ms: config.base_tick_ms,
            spawner,
            config,
        };
        simulation.reset();
        simulation
    }

    /// Put the snake back at the start and clear score and speed
    pub fn reset(&mut self) {
        self.snake = Snake::new(self.config.start_cell, self.config.initial_direction, 1);
        self.pending_direction = None;
        self.score = 0;
        self.tick_interval_ms = self.config.base_tick_ms;
        self.food = self.spawner.spawn(&self.snake);
    }

    /// Request a new heading for the next tick.
    ///
    /// A reversal of the current heading is ignored. Among several accepted
    /// requests between two ticks the latest one wins. Returns whether the
    /// request was accepted.
    pub fn steer(&mut self, direction: Direction) -> bool {
        if self.snake.direction.is_opposite(direction) {
            return false;
        }
        self.pending_direction = Some(direction);
        true
    }

    /// Advance the snake by one cell
    pub fn tick(&mut self, particles: &mut ParticleSystem) -> TickOutcome {
        if let Some(direction) = self.pending_direction.take() {
            self.snake.direction = direction;
        }

        let new_head = self.snake.head().moved_in_direction(self.snake.direction);

        // Collisions are judged against the body before the tail moves
        if let Some(collision) = self.check_collision(new_head) {
            return TickOutcome::Collided(collision);
        }

        self.snake.push_head(new_head);

        if self.food != Some(new_head) {
            self.snake.pop_tail();
            return TickOutcome::Moved;
        }

        self.score += self.config.food_reward;
        particles.burst(new_head, self.config.burst_size);
        self.tick_interval_ms = self
            .tick_interval_ms
            .saturating_sub(self.config.tick_decrement_ms)
            .max(self.config.min_tick_ms);
        self.food = self.spawner.spawn(&self.snake);

        debug!(
            score = self.score,
            length = self.snake.len(),
            tick_ms = self.tick_interval_ms,
            "food eaten"
        );

        match self.food {
            Some(_) => TickOutcome::Ate { cell: new_head },
            None => TickOutcome::BoardFull,
        }
    }

    fn check_collision(&self, cell: Cell) -> Option<CollisionType> {
        if !self.config.contains(cell) {
            return Some(CollisionType::Wall);
        }

        if self.snake.occupies(cell) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    /// Heading the next tick will use
    pub fn heading(&self) -> Direction {
        self.pending_direction.unwrap_or(self.snake.direction)
    }

    /// Current food cell; `None` only once the board is full
    pub fn food(&self) -> Option<Cell> {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[cfg(test)]
    pub(crate) fn set_state(&mut self, snake: Snake, food: Option<Cell>) {
        self.snake = snake;
        self.food = food;
        self.pending_direction = None;
    }

    #[cfg(test)]
    pub(crate) fn set_tick_interval_ms(&mut self, tick_interval_ms: u64) {
        self.tick_interval_ms = tick_interval_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn simulation(config: GameConfig) -> (SnakeSimulation, ParticleSystem) {
        let spawner = FoodSpawner::seeded(config.tile_count, config.max_spawn_attempts, 3);
        let particles = ParticleSystem::seeded(&config, 4);
        (SnakeSimulation::new(config, spawner), particles)
    }

    fn assert_distinct(snake: &Snake) {
        let unique: HashSet<_> = snake.body().iter().collect();
        assert_eq!(unique.len(), snake.len());
    }

    #[test]
    fn test_reset() {
        let (sim, _) = simulation(GameConfig::default());

        assert_eq!(sim.snake().body(), &[Cell::new(10, 10)]);
        assert_eq!(sim.snake().direction, Direction::Right);
        assert_eq!(sim.score(), 0);
        assert_eq!(sim.tick_interval(), Duration::from_millis(150));
        let food = sim.food().unwrap();
        assert!(!sim.snake().occupies(food));
    }

    #[test]
    fn test_basic_movement() {
        let (mut sim, mut particles) = simulation(GameConfig::default());
        sim.set_state(
            Snake::new(Cell::new(10, 10), Direction::Right, 1),
            Some(Cell::new(0, 0)),
        );

        let outcome = sim.tick(&mut particles);

        assert_eq!(outcome, TickOutcome::Moved);
        assert_eq!(sim.snake().body(), &[Cell::new(11, 10)]);
        assert_eq!(sim.score(), 0);
        assert!(particles.is_empty());
    }

    #[test]
    fn test_food_consumption() {
        let (mut sim, mut particles) = simulation(GameConfig::default());
        sim.set_state(
            Snake::new(Cell::new(10, 10), Direction::Right, 2),
            Some(Cell::new(11, 10)),
        );

        let outcome = sim.tick(&mut particles);

        assert_eq!(outcome, TickOutcome::Ate { cell: Cell::new(11, 10) });
        assert_eq!(
            sim.snake().body(),
            &[Cell::new(11, 10), Cell::new(10, 10), Cell::new(9, 10)]
        );
        assert_eq!(sim.score(), 10);
        assert_eq!(sim.tick_interval(), Duration::from_millis(147));
        assert_eq!(particles.len(), 12);
        let food = sim.food().unwrap();
        assert!(!sim.snake().occupies(food));
    }

    #[test]
    fn test_tick_interval_floor() {
        let (mut sim, mut particles) = simulation(GameConfig::default());
        sim.set_state(
            Snake::new(Cell::new(10, 10), Direction::Right, 1),
            Some(Cell::new(11, 10)),
        );
        sim.set_tick_interval_ms(81);

        sim.tick(&mut particles);

        assert_eq!(sim.tick_interval(), Duration::from_millis(80));
    }

    #[test]
    fn test_wall_collision_leaves_snake_untouched() {
        let (mut sim, mut particles) = simulation(GameConfig::default());
        let snake = Snake::new(Cell::new(19, 4), Direction::Right, 3);
        sim.set_state(snake.clone(), Some(Cell::new(0, 0)));

        let outcome = sim.tick(&mut particles);

        assert_eq!(outcome, TickOutcome::Collided(CollisionType::Wall));
        assert!(outcome.is_terminal());
        assert_eq!(sim.snake(), &snake);

        let top = Snake::new(Cell::new(3, 0), Direction::Up, 1);
        sim.set_state(top.clone(), Some(Cell::new(5, 5)));
        assert_eq!(
            sim.tick(&mut particles),
            TickOutcome::Collided(CollisionType::Wall)
        );
        assert_eq!(sim.snake(), &top);
    }

    #[test]
    fn test_self_collision() {
        let (mut sim, mut particles) = simulation(GameConfig::small());
        sim.set_state(
            Snake::new(Cell::new(5, 5), Direction::Right, 5),
            Some(Cell::new(0, 9)),
        );

        sim.steer(Direction::Down);
        assert_eq!(sim.tick(&mut particles), TickOutcome::Moved);
        sim.steer(Direction::Left);
        assert_eq!(sim.tick(&mut particles), TickOutcome::Moved);
        sim.steer(Direction::Up);
        let outcome = sim.tick(&mut particles);

        assert_eq!(outcome, TickOutcome::Collided(CollisionType::SelfCollision));
    }

    #[test]
    fn test_moving_into_vacating_tail_is_fatal() {
        let (mut sim, mut particles) = simulation(GameConfig::small());
        // A 2x2 loop: head (5,5) heading Left, tail at (5,6) right below it
        let body = vec![
            Cell::new(5, 5),
            Cell::new(6, 5),
            Cell::new(6, 6),
            Cell::new(5, 6),
        ];
        sim.set_state(
            Snake::from_body(body.clone(), Direction::Left).unwrap(),
            Some(Cell::new(0, 0)),
        );

        sim.steer(Direction::Down);
        let outcome = sim.tick(&mut particles);

        assert_eq!(outcome, TickOutcome::Collided(CollisionType::SelfCollision));
        assert_eq!(sim.snake().body(), body.as_slice());
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let (mut sim, mut particles) = simulation(GameConfig::default());
        sim.set_state(
            Snake::new(Cell::new(10, 10), Direction::Right, 1),
            Some(Cell::new(0, 0)),
        );

        assert!(!sim.steer(Direction::Left));
        sim.tick(&mut particles);

        assert_eq!(sim.snake().direction, Direction::Right);
        assert_eq!(sim.snake().head(), Cell::new(11, 10));
    }

    #[test]
    fn test_latest_accepted_direction_wins() {
        let (mut sim, mut particles) = simulation(GameConfig::default());
        sim.set_state(
            Snake::new(Cell::new(10, 10), Direction::Right, 1),
            Some(Cell::new(0, 0)),
        );

        assert!(sim.steer(Direction::Up));
        assert!(sim.steer(Direction::Down));
        // Reversal of the current heading is rejected and keeps Down pending
        assert!(!sim.steer(Direction::Left));
        assert_eq!(sim.heading(), Direction::Down);

        sim.tick(&mut particles);
        assert_eq!(sim.snake().head(), Cell::new(10, 11));
    }

    #[test]
    fn test_board_full_is_terminal() {
        let mut config = GameConfig::new(2);
        config.start_cell = Cell::new(0, 0);
        let (mut sim, mut particles) = simulation(config);
        let body = vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 1)];
        sim.set_state(
            Snake::from_body(body, Direction::Right).unwrap(),
            Some(Cell::new(1, 0)),
        );

        let outcome = sim.tick(&mut particles);

        assert_eq!(outcome, TickOutcome::BoardFull);
        assert!(outcome.is_terminal());
        assert_eq!(sim.snake().len(), 4);
        assert_eq!(sim.food(), None);
    }

    #[test]
    fn test_body_stays_distinct_over_long_run() {
        let (mut sim, mut particles) = simulation(GameConfig::default());
        let turns = [Direction::Down, Direction::Left, Direction::Up, Direction::Right];

        for step in 0..500 {
            if step % 7 == 0 {
                sim.steer(turns[(step / 7) % turns.len()]);
            }
            let outcome = sim.tick(&mut particles);
            assert_distinct(sim.snake());
            if let Some(food) = sim.food() {
                assert!(!sim.snake().occupies(food));
            }
            if outcome.is_terminal() {
                sim.reset();
            }
        }
    }
}
