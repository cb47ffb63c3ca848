//=========================================================================
// Game Configuration
//=========================================================================
//
// Immutable configuration shared by the engine and the puzzle.
//
// Every value the game needs at construction time (grid size, screen
// size, palette, frame rate, score file) lives here and is passed by
// reference. Nothing reaches through a back-reference or a module
// constant to find them.
//
// Validation happens once, at startup. A config that fails validation
// is a fatal configuration error; nothing downstream re-checks it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::path::PathBuf;

//=== Internal Dependencies ===============================================

use crate::core::render::Color;

//=== Defaults ============================================================

/// Number of cells in the default puzzle (12 x 12).
pub const DEFAULT_CELL_COUNT: usize = 144;

/// Default frame / tick rate.
pub const DEFAULT_FPS: u32 = 30;

/// Default square play area, in pixels.
pub const DEFAULT_SCREEN_SIZE: u32 = 600;

/// Strip below the play area that holds the caption line.
pub const CAPTION_STRIP: u32 = 40;

/// Default palette: red, yellow, magenta, green, blue, cyan.
pub const DEFAULT_PALETTE: [Color; 6] = [
    Color::rgb(255, 0, 0),
    Color::rgb(255, 255, 0),
    Color::rgb(255, 0, 255),
    Color::rgb(0, 255, 0),
    Color::rgb(0, 0, 255),
    Color::rgb(0, 255, 255),
];

//=== ConfigError =========================================================

/// Configuration rejected at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Cell count is not a perfect square.
    NotPerfectSquare(usize),

    /// Grid side below 2 (a single cell is always solved).
    GridTooSmall(usize),

    /// Fewer than two colours (a fresh grid would always be solved).
    PaletteTooSmall(usize),

    /// A zero screen dimension.
    InvalidScreenSize { width: u32, height: u32 },

    /// Zero frames per second.
    InvalidFps(u32),

    /// Zero-capacity platform channel.
    ZeroChannelCapacity,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPerfectSquare(n) => write!(f, "cell count {} is not a perfect square", n),
            Self::GridTooSmall(side) => write!(f, "grid side {} is too small (minimum 2)", side),
            Self::PaletteTooSmall(n) => {
                write!(f, "palette has {} colour(s), at least 2 are required", n)
            }
            Self::InvalidScreenSize { width, height } => {
                write!(f, "invalid screen size {}x{}", width, height)
            }
            Self::InvalidFps(fps) => write!(f, "invalid frame rate {}", fps),
            Self::ZeroChannelCapacity => write!(f, "channel capacity must be positive"),
        }
    }
}

impl std::error::Error for ConfigError {}

//=== Helpers =============================================================

/// Returns the integer square root of `n` if `n` is a perfect square.
pub fn exact_sqrt(n: usize) -> Option<usize> {
    let mut root = (n as f64).sqrt() as usize;
    // Correct float rounding in either direction.
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    (root * root == n).then_some(root)
}

//=== GameConfig ==========================================================

/// Immutable game configuration.
///
/// Construct with [`GameConfig::default`] and adjust fields, then call
/// [`GameConfig::validate`]. The engine builder does this for you.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Window title.
    pub title: String,

    /// Play area width in pixels. The grid fits the shorter side.
    pub screen_width: u32,

    /// Play area height in pixels.
    pub screen_height: u32,

    /// Number of puzzle cells. Must be a perfect square.
    pub cell_count: usize,

    /// Colours a cell can take. Cells store an index into this list.
    pub palette: Vec<Color>,

    /// Ticks per second.
    pub fps: u32,

    /// Location of the persisted high-score record.
    pub score_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: "Flood".to_string(),
            screen_width: DEFAULT_SCREEN_SIZE,
            screen_height: DEFAULT_SCREEN_SIZE,
            cell_count: DEFAULT_CELL_COUNT,
            palette: DEFAULT_PALETTE.to_vec(),
            fps: DEFAULT_FPS,
            score_path: PathBuf::from("data").join("high_score.txt"),
        }
    }
}

impl GameConfig {
    /// Checks every startup precondition.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let side = exact_sqrt(self.cell_count)
            .ok_or(ConfigError::NotPerfectSquare(self.cell_count))?;

        if side < 2 {
            return Err(ConfigError::GridTooSmall(side));
        }

        if self.palette.len() < 2 {
            return Err(ConfigError::PaletteTooSmall(self.palette.len()));
        }

        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(ConfigError::InvalidScreenSize {
                width: self.screen_width,
                height: self.screen_height,
            });
        }

        if self.fps == 0 {
            return Err(ConfigError::InvalidFps(self.fps));
        }

        Ok(())
    }

    /// Grid side length (√N). Only meaningful on a validated config.
    pub fn side(&self) -> usize {
        exact_sqrt(self.cell_count).unwrap_or(0)
    }

    /// Pixel size of one cell so that the whole grid fits the play area.
    pub fn cell_size(&self) -> f32 {
        match self.side() {
            0 => 0.0,
            side => self.screen_width.min(self.screen_height) as f32 / side as f32,
        }
    }

    /// Edge length of the drawn grid in pixels.
    pub fn grid_extent(&self) -> f32 {
        self.cell_size() * self.side() as f32
    }

    /// Window size: the play area plus the caption strip below it.
    pub fn window_size(&self) -> (u32, u32) {
        (self.screen_width, self.screen_height + CAPTION_STRIP)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //=====================================================================
    // exact_sqrt
    //=====================================================================

    #[test]
    fn exact_sqrt_of_squares() {
        assert_eq!(exact_sqrt(0), Some(0));
        assert_eq!(exact_sqrt(1), Some(1));
        assert_eq!(exact_sqrt(4), Some(2));
        assert_eq!(exact_sqrt(144), Some(12));
        assert_eq!(exact_sqrt(1_000_000), Some(1000));
    }

    #[test]
    fn exact_sqrt_of_non_squares() {
        assert_eq!(exact_sqrt(2), None);
        assert_eq!(exact_sqrt(143), None);
        assert_eq!(exact_sqrt(145), None);
    }

    //=====================================================================
    // Validation
    //=====================================================================

    #[test]
    fn default_config_is_valid() {
        let config = GameConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.side(), 12);
        assert_eq!(config.cell_size(), 50.0);
    }

    #[test]
    fn rejects_non_square_cell_count() {
        let config = GameConfig { cell_count: 150, ..GameConfig::default() };
        assert_eq!(config.validate(), Err(ConfigError::NotPerfectSquare(150)));
    }

    #[test]
    fn rejects_single_cell_grid() {
        let config = GameConfig { cell_count: 1, ..GameConfig::default() };
        assert_eq!(config.validate(), Err(ConfigError::GridTooSmall(1)));
    }

    #[test]
    fn rejects_single_colour_palette() {
        let config = GameConfig {
            palette: vec![Color::rgb(1, 2, 3)],
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::PaletteTooSmall(1)));
    }

    #[test]
    fn rejects_zero_screen_and_fps() {
        let config = GameConfig { screen_width: 0, ..GameConfig::default() };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidScreenSize { width: 0, .. })
        ));

        let config = GameConfig { fps: 0, ..GameConfig::default() };
        assert_eq!(config.validate(), Err(ConfigError::InvalidFps(0)));
    }

    //=====================================================================
    // Geometry
    //=====================================================================

    #[test]
    fn grid_fits_shorter_screen_side() {
        let wide = GameConfig { screen_width: 800, screen_height: 600, ..GameConfig::default() };
        assert_eq!(wide.cell_size(), 50.0);
        assert_eq!(wide.grid_extent(), 600.0);

        let tall = GameConfig { screen_width: 300, screen_height: 600, ..GameConfig::default() };
        assert_eq!(tall.cell_size(), 25.0);
        assert_eq!(tall.grid_extent(), 300.0);
    }

    #[test]
    fn window_reserves_caption_strip() {
        let config = GameConfig::default();
        assert_eq!(config.window_size(), (600, 600 + CAPTION_STRIP));
        assert!(config.grid_extent() <= config.screen_height as f32);
    }

    #[test]
    fn error_display_mentions_value() {
        let msg = ConfigError::NotPerfectSquare(150).to_string();
        assert!(msg.contains("150"), "Display should include the bad count: {}", msg);
    }
}
