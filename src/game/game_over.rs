//=========================================================================
// Game Over State
//=========================================================================
//
// Result screen shown after a solved puzzle.
//
// On creation the stored record is read, compared with the finished
// game and rewritten if either the click count or the time improved.
// A failed write is logged and the screen is shown anyway.
//
// Any key starts a fresh PlayState; Escape also quits.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;

use log::{info, warn};

//=== Internal Dependencies ===============================================

use super::play::{ticks_to_seconds, PlayResult, PlayState};
use super::scores::{ScoreRecord, ScoreStore, Verdict};
use crate::config::GameConfig;
use crate::core::event::SystemEvent;
use crate::core::input::{InputEvent, KeyCode};
use crate::core::render::{Color, GameObject, Surface};
use crate::core::state::{State, StateContext};

//=== Layout ==============================================================

const RED: Color = Color::rgb(255, 0, 0);
const GREEN: Color = Color::rgb(0, 255, 0);
const BLUE: Color = Color::rgb(0, 0, 255);
const MAGENTA: Color = Color::rgb(255, 0, 255);
const WHITE: Color = Color::rgb(255, 255, 255);

//=== TextLine ============================================================

/// One centred line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub y: f32,
    pub color: Color,
}

impl TextLine {
    fn new(text: impl Into<String>, y: f32, color: Color) -> Self {
        Self {
            text: text.into(),
            y,
            color,
        }
    }
}

impl GameObject for TextLine {
    fn render(&self, surface: &mut dyn Surface) {
        surface.draw_centered_text(&self.text, self.y, self.color);
    }
}

//=== GameOverState =======================================================

pub struct GameOverState {
    config: Rc<GameConfig>,
    scores: Rc<dyn ScoreStore>,
    result: PlayResult,
    verdict: Verdict,
    lines: Vec<TextLine>,
}

impl GameOverState {
    pub fn new(config: Rc<GameConfig>, scores: Rc<dyn ScoreStore>, result: PlayResult) -> Self {
        let previous = scores.read();
        let (verdict, updated) = previous.evaluate(result.clicks, result.elapsed_ticks);

        if verdict != Verdict::Unchanged {
            info!(
                target: "game",
                "{:?}: {} clicks in {} ticks",
                verdict,
                result.clicks,
                result.elapsed_ticks
            );
            if let Err(err) = scores.write(updated) {
                warn!(target: "game", "Could not save the new record: {}", err);
            }
        }

        let lines = Self::layout(&result, verdict, previous);

        Self {
            config,
            scores,
            result,
            verdict,
            lines,
        }
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn result(&self) -> PlayResult {
        self.result
    }

    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    fn layout(result: &PlayResult, verdict: Verdict, previous: ScoreRecord) -> Vec<TextLine> {
        let mut lines = vec![
            TextLine::new("GAME OVER", 20.0, RED),
            TextLine::new(format!("It took you {} clicks!", result.clicks), 100.0, WHITE),
            TextLine::new(format!("Time: {:.1}s", result.seconds()), 130.0, WHITE),
        ];

        match verdict {
            Verdict::NewHighScore => {
                lines.push(TextLine::new("!!!NEW HIGH SCORE!!!", 170.0, GREEN));
            }
            Verdict::NewBestTime => {
                lines.push(TextLine::new("!!!NEW BEST TIME!!!", 170.0, GREEN));
            }
            Verdict::Unchanged => {}
        }

        let score_line = match verdict {
            Verdict::NewHighScore => format!("Old high score: {} clicks!", previous.best_clicks),
            _ => format!("High score: {} clicks!", previous.best_clicks),
        };
        lines.push(TextLine::new(score_line, 210.0, BLUE));

        if previous.has_time() {
            let seconds = ticks_to_seconds(previous.best_elapsed, result.fps);
            let time_line = match verdict {
                Verdict::NewBestTime => format!("Old best time: {:.1}s", seconds),
                _ => format!("Best time: {:.1}s", seconds),
            };
            lines.push(TextLine::new(time_line, 240.0, BLUE));
        }

        lines.push(TextLine::new("Press any key to continue.", 290.0, MAGENTA));
        lines
    }
}

impl State for GameOverState {
    fn name(&self) -> &'static str {
        "GameOver"
    }

    fn notify(&mut self, event: &SystemEvent, ctx: &mut StateContext<'_>) {
        let SystemEvent::Input(InputEvent::KeyDown { key }) = event else {
            return;
        };

        if *key == KeyCode::Escape {
            ctx.quit();
        }

        ctx.change_state(Box::new(PlayState::new(
            Rc::clone(&self.config),
            Rc::clone(&self.scores),
            self.result.fps,
        )));
    }

    fn game_objects(&self) -> Vec<&dyn GameObject> {
        self.lines.iter().map(|line| line as &dyn GameObject).collect()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
