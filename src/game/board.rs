//=========================================================================
// Board
//=========================================================================
//
// The puzzle grid as a bus participant and a drawable.
//
// Listens on the game bus for SquareClicked, applies the click, and
// posts GridUpdated back on the same bus when the region changed.
// Illegal clicks produce no event.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::events::GameEvent;
use super::grid::PuzzleGrid;
use crate::config::GameConfig;
use crate::core::event_bus::{EventBus, Listener};
use crate::core::input::Position;
use crate::core::render::{Color, GameObject, Rect, Surface};

//=== Board ===============================================================

pub struct Board {
    grid: PuzzleGrid,
    home: EventBus<GameEvent>,
    palette: Vec<Color>,
    cell_size: f32,
}

impl Board {
    /// Wraps `grid`; `home` is the bus GridUpdated is posted on.
    pub fn new(grid: PuzzleGrid, home: EventBus<GameEvent>, config: &GameConfig) -> Self {
        Self {
            grid,
            home,
            palette: config.palette.clone(),
            cell_size: config.cell_size(),
        }
    }

    pub fn grid(&self) -> &PuzzleGrid {
        &self.grid
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cell under a screen position, if any.
    pub fn index_at(&self, position: Position) -> Option<usize> {
        self.grid.index_at(position, self.cell_size)
    }

    fn cell_rect(&self, idx: usize) -> Rect {
        let side = self.grid.side();
        let column = (idx % side) as f32;
        let row = (idx / side) as f32;
        Rect::new(
            column * self.cell_size,
            row * self.cell_size,
            self.cell_size,
            self.cell_size,
        )
    }
}

impl Listener<GameEvent> for Board {
    fn notify(&mut self, event: &GameEvent) {
        let GameEvent::SquareClicked { index } = *event else {
            return;
        };

        if self.grid.apply_click(index) {
            debug!(
                target: "game",
                "Cell {} merged, region now {} cells",
                index,
                self.grid.connected_region(super::grid::ORIGIN).len()
            );
            self.home.post(GameEvent::GridUpdated);
        } else {
            trace!(target: "game", "Click on {} is not on the border", index);
        }
    }
}

impl GameObject for Board {
    fn render(&self, surface: &mut dyn Surface) {
        for (idx, &color) in self.grid.cells().iter().enumerate() {
            let Some(&color) = self.palette.get(color) else {
                continue;
            };
            surface.fill_rect(self.cell_rect(idx), color);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::{DrawCommand, Frame};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorder(Vec<GameEvent>);

    impl Listener<GameEvent> for Recorder {
        fn notify(&mut self, event: &GameEvent) {
            self.0.push(*event);
        }
    }

    fn config_2x2() -> GameConfig {
        GameConfig {
            cell_count: 4,
            screen_width: 100,
            screen_height: 100,
            ..GameConfig::default()
        }
    }

    fn board(cells: &[usize]) -> (EventBus<GameEvent>, Rc<RefCell<Board>>) {
        let bus = EventBus::new();
        let grid = PuzzleGrid::from_cells(cells.to_vec()).unwrap();
        let board = Rc::new(RefCell::new(Board::new(grid, bus.clone(), &config_2x2())));
        (bus, board)
    }

    #[test]
    fn legal_click_posts_grid_updated() {
        let (bus, board) = board(&[0, 1, 1, 1]);
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let _b = bus.register(&board);
        let _r = bus.register(&recorder);

        bus.post(GameEvent::SquareClicked { index: 1 });

        assert_eq!(
            recorder.borrow().0,
            vec![
                GameEvent::SquareClicked { index: 1 },
                GameEvent::GridUpdated
            ]
        );
        assert!(board.borrow().grid().is_solved());
    }

    #[test]
    fn illegal_click_posts_nothing() {
        let (bus, board) = board(&[0, 1, 2, 1]);
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let _b = bus.register(&board);
        let _r = bus.register(&recorder);

        bus.post(GameEvent::SquareClicked { index: 3 });
        bus.post(GameEvent::SquareClicked { index: 0 });

        assert_eq!(recorder.borrow().0.len(), 2);
        assert!(!recorder.borrow().0.contains(&GameEvent::GridUpdated));
        assert_eq!(board.borrow().grid().cells(), &[0, 1, 2, 1]);
    }

    #[test]
    fn renders_one_rect_per_cell_in_palette_colour() {
        let (_bus, board) = board(&[0, 1, 2, 3]);
        let frame = Frame::capture(vec![&*board as &dyn GameObject]);

        assert_eq!(frame.commands().len(), 4);
        let DrawCommand::FillRect { rect, color } = frame.commands()[3] else {
            panic!("Expected a rect");
        };
        assert_eq!(rect, Rect::new(50.0, 50.0, 50.0, 50.0));
        assert_eq!(color, GameConfig::default().palette[3]);
    }

    #[test]
    fn index_at_uses_cell_size() {
        let (_bus, board) = board(&[0, 1, 2, 3]);
        let board = board.borrow();
        assert_eq!(board.index_at(Position::new(75.0, 10.0)), Some(1));
        assert_eq!(board.index_at(Position::new(10.0, 75.0)), Some(2));
        assert_eq!(board.index_at(Position::new(100.0, 10.0)), None);
    }

    #[test]
    fn every_cell_reachable_on_wide_screen() {
        let config = GameConfig {
            screen_width: 800,
            screen_height: 600,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));

        let grid = PuzzleGrid::from_cells(vec![0; config.cell_count]).unwrap();
        let board = Board::new(grid, EventBus::new(), &config);

        let mut reached = vec![false; config.cell_count];
        for y in (0..config.screen_height).step_by(5) {
            for x in (0..config.screen_width).step_by(5) {
                if let Some(idx) = board.index_at(Position::new(x as f32, y as f32)) {
                    reached[idx] = true;
                }
            }
        }
        assert!(reached.iter().all(|&r| r), "Every cell must be clickable inside the window");
    }
}
