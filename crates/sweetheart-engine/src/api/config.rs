use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a [`PageConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse page config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Top-level configuration for both page modules.
/// Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub animator: AnimatorConfig,
    pub puzzle: PuzzleConfig,
    /// Console log level name ("error", "warn", "info", "debug", "trace").
    pub log_level: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            animator: AnimatorConfig::default(),
            puzzle: PuzzleConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl PageConfig {
    /// Parse and validate a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: PageConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.animator.validate()?;
        self.puzzle.validate()?;
        if log_level_filter(&self.log_level).is_none() {
            return Err(invalid("log_level", format!("unknown level {:?}", self.log_level)));
        }
        Ok(())
    }

    /// The configured level as a `log` level, falling back to `Info`.
    pub fn log_level(&self) -> log::Level {
        log_level_filter(&self.log_level).unwrap_or(log::Level::Info)
    }
}

fn log_level_filter(name: &str) -> Option<log::Level> {
    name.parse().ok()
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field, reason: reason.into() }
}

fn check_range(field: &'static str, range: [f32; 2]) -> Result<(), ConfigError> {
    if !(range[0].is_finite() && range[1].is_finite()) || range[0] > range[1] {
        return Err(invalid(field, format!("expected [lo, hi] with lo <= hi, got {:?}", range)));
    }
    Ok(())
}

/// One color stop of the sprite fill gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position along the gradient, 0.0 to 1.0.
    pub offset: f32,
    /// CSS color string.
    pub color: String,
}

impl GradientStop {
    pub fn new(offset: f32, color: &str) -> Self {
        Self { offset, color: color.to_string() }
    }
}

/// Floating-heart animator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimatorConfig {
    /// Id of the full-viewport canvas. Missing element disables the animator.
    pub canvas_id: String,
    /// Number of sprites in the pool.
    pub pool_size: usize,
    pub size_range: [f32; 2],
    pub vx_range: [f32; 2],
    pub vy_range: [f32; 2],
    pub opacity_range: [f32; 2],
    /// Rotation step in degrees per frame.
    pub spin_per_frame: f32,
    /// Distance past an edge before a sprite respawns.
    pub margin: f32,
    pub glyph: String,
    pub gradient: Vec<GradientStop>,
    /// Fixed RNG seed; random per page load when unset.
    pub seed: Option<u64>,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            canvas_id: "hearts-canvas".to_string(),
            pool_size: 30,
            size_range: [10.0, 30.0],
            vx_range: [-1.0, 1.0],
            vy_range: [-3.0, -1.0],
            opacity_range: [0.3, 0.8],
            spin_per_frame: 1.0,
            margin: 50.0,
            glyph: "\u{2764}\u{fe0f}".to_string(),
            gradient: vec![
                GradientStop::new(0.0, "#FF1744"),
                GradientStop::new(0.5, "#F50057"),
                GradientStop::new(1.0, "#FF4081"),
            ],
            seed: None,
        }
    }
}

impl AnimatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_size == 0 {
            return Err(invalid("animator.pool_size", "must be at least 1"));
        }
        check_range("animator.size_range", self.size_range)?;
        check_range("animator.vx_range", self.vx_range)?;
        check_range("animator.vy_range", self.vy_range)?;
        check_range("animator.opacity_range", self.opacity_range)?;
        if self.opacity_range[0] < 0.0 || self.opacity_range[1] > 1.0 {
            return Err(invalid("animator.opacity_range", "must lie within [0, 1]"));
        }
        if self.margin.is_nan() || self.margin <= 0.0 {
            return Err(invalid("animator.margin", "must be positive"));
        }
        if self.gradient.iter().any(|s| !(0.0..=1.0).contains(&s.offset)) {
            return Err(invalid("animator.gradient", "stop offsets must lie within [0, 1]"));
        }
        Ok(())
    }
}

/// Sliding puzzle settings, including the DOM anchors it binds to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleConfig {
    /// Tiles per side.
    pub size: usize,
    /// Random empty-cell steps per shuffle.
    pub shuffle_steps: usize,
    /// Clock refresh period in milliseconds.
    pub clock_interval_ms: u32,
    pub board_id: String,
    pub moves_id: String,
    pub timer_id: String,
    pub shuffle_button_id: String,
    pub win_message_id: String,
    pub seed: Option<u64>,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            size: 3,
            shuffle_steps: 100,
            clock_interval_ms: 1000,
            board_id: "puzzleBoard".to_string(),
            moves_id: "movesCount".to_string(),
            timer_id: "timer".to_string(),
            shuffle_button_id: "shuffleBtn".to_string(),
            win_message_id: "winMessage".to_string(),
            seed: None,
        }
    }
}

impl PuzzleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size < 2 {
            return Err(invalid("puzzle.size", format!("must be at least 2, got {}", self.size)));
        }
        if self.clock_interval_ms == 0 {
            return Err(invalid("puzzle.clock_interval_ms", "must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = PageConfig::from_json("{}").unwrap();
        assert_eq!(config, PageConfig::default());
        assert_eq!(config.animator.pool_size, 30);
        assert_eq!(config.puzzle.size, 3);
        assert_eq!(config.puzzle.shuffle_steps, 100);
        assert_eq!(config.log_level(), log::Level::Info);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let json = r#"{
            "animator": { "pool_size": 12, "seed": 5 },
            "puzzle": { "board_id": "board" },
            "log_level": "debug"
        }"#;
        let config = PageConfig::from_json(json).unwrap();
        assert_eq!(config.animator.pool_size, 12);
        assert_eq!(config.animator.seed, Some(5));
        assert_eq!(config.animator.margin, 50.0);
        assert_eq!(config.puzzle.board_id, "board");
        assert_eq!(config.puzzle.timer_id, "timer");
        assert_eq!(config.log_level(), log::Level::Debug);
    }

    #[test]
    fn default_gradient_has_three_stops() {
        let config = AnimatorConfig::default();
        let colors: Vec<_> = config.gradient.iter().map(|s| s.color.as_str()).collect();
        assert_eq!(colors, ["#FF1744", "#F50057", "#FF4081"]);
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = PageConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_pool_rejected() {
        let err = PageConfig::from_json(r#"{ "animator": { "pool_size": 0 } }"#).unwrap_err();
        match err {
            ConfigError::Invalid { field, .. } => assert_eq!(field, "animator.pool_size"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn tiny_board_rejected() {
        let err = PageConfig::from_json(r#"{ "puzzle": { "size": 1 } }"#).unwrap_err();
        assert!(err.to_string().contains("puzzle.size"));
    }

    #[test]
    fn inverted_range_rejected() {
        let err = PageConfig::from_json(r#"{ "animator": { "vy_range": [-1.0, -3.0] } }"#)
            .unwrap_err();
        assert!(err.to_string().contains("animator.vy_range"));
    }

    #[test]
    fn unknown_log_level_rejected() {
        let err = PageConfig::from_json(r#"{ "log_level": "loud" }"#).unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }
}
