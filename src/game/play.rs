//=========================================================================
// Play State
//=========================================================================
//
// One puzzle session, from a fresh grid to the winning click.
//
// Architecture:
//   PlayState
//     ├─ game bus: EventBus<GameEvent>    (per session)
//     ├─ Board  ── listens for SquareClicked, posts GridUpdated
//     └─ Tally  ── listens for GridUpdated, counts clicks, sees the win
//
// Flow on a left click:
//   MouseButtonDown → cell index → post SquareClicked on the game bus
//     → Board merges → GridUpdated → Tally counts
//     → PlayState reads the tally → change_state(GameOverState) if solved
//
// A fresh session never starts on a solved grid.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};
use rand::Rng;

//=== Internal Dependencies ===============================================

use super::board::Board;
use super::events::GameEvent;
use super::game_over::GameOverState;
use super::grid::PuzzleGrid;
use super::scores::ScoreStore;
use crate::config::GameConfig;
use crate::core::event::SystemEvent;
use crate::core::event_bus::{EventBus, Listener, Subscription};
use crate::core::input::{InputEvent, KeyCode, MouseButton};
use crate::core::render::{Color, GameObject, Surface};
use crate::core::state::{State, StateContext};

//=== PlayResult ==========================================================

/// What a won session hands to the game-over screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayResult {
    pub clicks: u32,
    pub fps: u32,
    pub elapsed_ticks: u64,
}

impl PlayResult {
    /// Elapsed time in seconds.
    pub fn seconds(&self) -> f64 {
        ticks_to_seconds(self.elapsed_ticks, self.fps)
    }
}

pub(crate) fn ticks_to_seconds(ticks: u64, fps: u32) -> f64 {
    if fps == 0 {
        0.0
    } else {
        ticks as f64 / fps as f64
    }
}

//=== Tally ===============================================================

/// Click counter on the game bus.
struct Tally {
    board: Rc<RefCell<Board>>,
    clicks: u32,
    solved: bool,
}

impl Listener<GameEvent> for Tally {
    fn notify(&mut self, event: &GameEvent) {
        if let GameEvent::GridUpdated = event {
            self.clicks += 1;
            self.solved = self.board.borrow().grid().is_solved();
        }
    }
}

//=== Caption =============================================================

const CAPTION_COLOR: Color = Color::rgb(255, 255, 255);

/// Gap between the bottom of the grid and the caption line.
const CAPTION_GAP: f32 = 10.0;

/// "Clicks: N  Time: S.Ss" line drawn in the strip below the grid.
struct Caption {
    text: String,
    y: f32,
}

impl GameObject for Caption {
    fn render(&self, surface: &mut dyn Surface) {
        surface.draw_centered_text(&self.text, self.y, CAPTION_COLOR);
    }
}

//=== PlayState ===========================================================

pub struct PlayState {
    config: Rc<GameConfig>,
    scores: Rc<dyn ScoreStore>,
    fps: u32,
    game_bus: EventBus<GameEvent>,
    board: Rc<RefCell<Board>>,
    tally: Rc<RefCell<Tally>>,
    caption: Caption,
    elapsed_ticks: u64,
    finished: bool,
    _subscriptions: [Subscription<GameEvent>; 2],
}

impl PlayState {
    //--- Construction -----------------------------------------------------

    /// Starts a session on a random unsolved grid.
    pub fn new(config: Rc<GameConfig>, scores: Rc<dyn ScoreStore>, fps: u32) -> Self {
        Self::with_rng(config, scores, fps, &mut rand::rng())
    }

    /// Like [`PlayState::new`] with a caller-supplied generator.
    ///
    /// Regeneration needs a side of at least 2 and two colours; on a
    /// config below that the first grid is kept as is.
    pub fn with_rng<R: Rng + ?Sized>(
        config: Rc<GameConfig>,
        scores: Rc<dyn ScoreStore>,
        fps: u32,
        rng: &mut R,
    ) -> Self {
        let side = config.side();
        let colors = config.palette.len();

        let mut grid = PuzzleGrid::random(side, colors, rng);
        if side < 2 || colors < 2 {
            warn!(
                target: "game",
                "{}x{} grid with {} colour(s) cannot be unsolved",
                side,
                side,
                colors
            );
            return Self::from_grid(config, scores, fps, grid);
        }

        while grid.is_solved() {
            debug!(target: "game", "Generated a solved grid, regenerating");
            grid = PuzzleGrid::random(side, colors, rng);
        }

        Self::from_grid(config, scores, fps, grid)
    }

    /// Starts a session on `grid`, which should not already be solved.
    pub fn from_grid(
        config: Rc<GameConfig>,
        scores: Rc<dyn ScoreStore>,
        fps: u32,
        grid: PuzzleGrid,
    ) -> Self {
        let game_bus = EventBus::new();
        let board = Rc::new(RefCell::new(Board::new(grid, game_bus.clone(), &config)));
        let tally = Rc::new(RefCell::new(Tally {
            board: Rc::clone(&board),
            clicks: 0,
            solved: false,
        }));

        // Board first: GridUpdated is posted during its SquareClicked pass
        // and reaches the tally afterwards.
        let subscriptions = [game_bus.register(&board), game_bus.register(&tally)];

        info!(
            target: "game",
            "New puzzle: {}x{} cells, {} colours",
            config.side(),
            config.side(),
            config.palette.len()
        );

        let mut state = Self {
            caption: Caption {
                text: String::new(),
                y: config.grid_extent() + CAPTION_GAP,
            },
            config,
            scores,
            fps,
            game_bus,
            board,
            tally,
            elapsed_ticks: 0,
            finished: false,
            _subscriptions: subscriptions,
        };
        state.refresh_caption();
        state
    }

    //--- Query API --------------------------------------------------------

    pub fn clicks(&self) -> u32 {
        self.tally.borrow().clicks
    }

    pub fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn seconds(&self) -> f64 {
        ticks_to_seconds(self.elapsed_ticks, self.fps)
    }

    /// Snapshot of the current grid.
    pub fn grid(&self) -> PuzzleGrid {
        self.board.borrow().grid().clone()
    }

    //--- Event Handling ---------------------------------------------------

    fn click(&mut self, index: usize, ctx: &mut StateContext<'_>) {
        self.game_bus.post(GameEvent::SquareClicked { index });

        let (clicks, solved) = {
            let tally = self.tally.borrow();
            (tally.clicks, tally.solved)
        };
        self.refresh_caption();

        if solved && !self.finished {
            self.finished = true;
            info!(
                target: "game",
                "Puzzle solved in {} clicks, {:.1}s",
                clicks,
                self.seconds()
            );

            let result = PlayResult {
                clicks,
                fps: self.fps,
                elapsed_ticks: self.elapsed_ticks,
            };
            ctx.change_state(Box::new(GameOverState::new(
                Rc::clone(&self.config),
                Rc::clone(&self.scores),
                result,
            )));
        }
    }

    fn refresh_caption(&mut self) {
        self.caption.text = format!("Clicks: {}  Time: {:.1}s", self.clicks(), self.seconds());
    }
}

impl State for PlayState {
    fn name(&self) -> &'static str {
        "Play"
    }

    fn notify(&mut self, event: &SystemEvent, ctx: &mut StateContext<'_>) {
        match event {
            SystemEvent::Tick => {
                self.elapsed_ticks += 1;
                self.refresh_caption();
            }
            SystemEvent::Input(InputEvent::KeyDown {
                key: KeyCode::Escape,
            }) => ctx.quit(),
            SystemEvent::Input(InputEvent::MouseButtonDown {
                button: MouseButton::Left,
                position,
            }) => {
                let index = self.board.borrow().index_at(*position);
                match index {
                    Some(index) => self.click(index, ctx),
                    None => debug!(target: "game", "Click outside the grid at {:?}", position),
                }
            }
            _ => {}
        }
    }

    fn game_objects(&self) -> Vec<&dyn GameObject> {
        vec![&*self.board as &dyn GameObject, &self.caption]
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event_bus::EventBus;
    use crate::core::input::Position;
    use crate::core::render::{DrawCommand, Frame};
    use crate::game::scores::{MemoryScoreStore, ScoreRecord};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    //--- Test Helpers -----------------------------------------------------

    fn config(cell_count: usize, palette_len: usize) -> Rc<GameConfig> {
        let mut config = GameConfig {
            cell_count,
            screen_width: 100,
            screen_height: 100,
            ..GameConfig::default()
        };
        config.palette.truncate(palette_len);
        Rc::new(config)
    }

    fn play(cells: &[usize]) -> (PlayState, Rc<MemoryScoreStore>) {
        let store = Rc::new(MemoryScoreStore::with_record(ScoreRecord::new(5, 1000)));
        let grid = PuzzleGrid::from_cells(cells.to_vec()).unwrap();
        let state = PlayState::from_grid(config(cells.len(), 6), store.clone(), 30, grid);
        (state, store)
    }

    #[derive(Default)]
    struct Posted(Vec<SystemEvent>);

    impl Listener<SystemEvent> for Posted {
        fn notify(&mut self, event: &SystemEvent) {
            self.0.push(event.clone());
        }
    }

    /// Feeds one event through a throwaway context and returns the
    /// requested transition with whatever the state posted.
    fn feed(state: &mut PlayState, event: SystemEvent) -> (Option<Box<dyn State>>, Vec<SystemEvent>) {
        let bus = EventBus::new();
        let posted = Rc::new(RefCell::new(Posted::default()));
        let _sub = bus.register(&posted);

        let mut ctx = StateContext::new(&bus);
        state.notify(&event, &mut ctx);
        let transition = ctx.take_transition();

        let posted = posted.borrow().0.clone();
        (transition, posted)
    }

    fn left_click(x: f32, y: f32) -> SystemEvent {
        SystemEvent::Input(InputEvent::MouseButtonDown {
            button: MouseButton::Left,
            position: Position::new(x, y),
        })
    }

    //=====================================================================
    // Construction
    //=====================================================================

    #[test]
    fn degenerate_config_does_not_spin() {
        let store: Rc<dyn ScoreStore> = Rc::new(MemoryScoreStore::default());
        let mut rng = StdRng::seed_from_u64(11);

        let single_colour = PlayState::with_rng(config(4, 1), Rc::clone(&store), 30, &mut rng);
        assert!(single_colour.grid().is_solved());

        let single_cell = PlayState::with_rng(config(1, 6), Rc::clone(&store), 30, &mut rng);
        assert_eq!(single_cell.grid().len(), 1);
    }

    #[test]
    fn caption_sits_below_the_grid() {
        let store: Rc<dyn ScoreStore> = Rc::new(MemoryScoreStore::default());
        let config = Rc::new(GameConfig::default());
        let grid = PuzzleGrid::from_cells((0..144).map(|i| i % 2).collect()).unwrap();
        let state = PlayState::from_grid(Rc::clone(&config), store, 30, grid);

        let bottom_row = state.board.borrow().index_at(Position::new(10.0, 599.0));
        assert_eq!(bottom_row, Some(132));
        assert!(state.caption.y >= config.grid_extent());
        assert!(state.caption.y < (config.window_size().1) as f32);
    }

    #[test]
    fn fresh_session_is_never_solved() {
        // Two colours on a 2x2 grid: 2 of 16 layouts are solved.
        let store: Rc<dyn ScoreStore> = Rc::new(MemoryScoreStore::default());
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let state = PlayState::with_rng(config(4, 2), Rc::clone(&store), 30, &mut rng);
            assert!(!state.grid().is_solved());
            assert_eq!(state.clicks(), 0);
        }
    }

    //=====================================================================
    // Input
    //=====================================================================

    #[test]
    fn ticks_advance_elapsed_time() {
        let (mut state, _) = play(&[0, 1, 1, 1]);
        for _ in 0..45 {
            feed(&mut state, SystemEvent::Tick);
        }
        assert_eq!(state.elapsed_ticks(), 45);
        assert!((state.seconds() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn escape_posts_quit() {
        let (mut state, _) = play(&[0, 1, 1, 1]);
        let (transition, posted) = feed(
            &mut state,
            SystemEvent::Input(InputEvent::KeyDown {
                key: KeyCode::Escape,
            }),
        );
        assert!(transition.is_none());
        assert_eq!(posted, vec![SystemEvent::Quit]);
    }

    #[test]
    fn legal_click_counts_once() {
        // 0 1 2
        // 1 1 2
        // 2 2 2
        let (mut state, _) = play(&[0, 1, 2, 1, 1, 2, 2, 2, 2]);

        let (transition, _) = feed(&mut state, left_click(40.0, 10.0));

        assert!(transition.is_none());
        assert_eq!(state.clicks(), 1);
        assert_eq!(state.grid().cells(), &[1, 1, 2, 1, 1, 2, 2, 2, 2]);
    }

    #[test]
    fn illegal_and_outside_clicks_are_ignored() {
        let (mut state, _) = play(&[0, 1, 2, 1, 1, 2, 2, 2, 2]);

        feed(&mut state, left_click(90.0, 90.0)); // not on the border
        feed(&mut state, left_click(150.0, 10.0)); // off the grid
        feed(
            &mut state,
            SystemEvent::Input(InputEvent::MouseButtonDown {
                button: MouseButton::Right,
                position: Position::new(40.0, 10.0),
            }),
        );

        assert_eq!(state.clicks(), 0);
        assert_eq!(state.grid().cells(), &[0, 1, 2, 1, 1, 2, 2, 2, 2]);
    }

    //=====================================================================
    // Winning
    //=====================================================================

    #[test]
    fn winning_click_requests_game_over() {
        let (mut state, store) = play(&[0, 1, 1, 1]);
        feed(&mut state, SystemEvent::Tick);

        let (transition, _) = feed(&mut state, left_click(75.0, 10.0));

        let next = transition.expect("Solved grid must end the session");
        assert_eq!(next.name(), "GameOver");
        assert_eq!(state.clicks(), 1);
        assert_eq!(store.record(), ScoreRecord::new(1, 1));
    }

    #[test]
    fn frame_contains_grid_then_caption() {
        let (mut state, _) = play(&[0, 1, 2, 3]);
        for _ in 0..15 {
            feed(&mut state, SystemEvent::Tick);
        }

        let frame = Frame::capture(state.game_objects());

        assert_eq!(frame.commands().len(), 5);
        assert!(matches!(frame.commands()[0], DrawCommand::FillRect { .. }));
        assert_eq!(
            frame.text_lines().collect::<Vec<_>>(),
            vec!["Clicks: 0  Time: 0.5s"]
        );
    }
}
