//! Severity filter with a single-slot debug toggle

use super::log_level::LogLevel;

/// Current minimum level plus the level remembered by the last debug toggle.
///
/// The remembered slot is overwritten on every toggle into debug; it is not a
/// stack. A level set directly between two toggles is not recorded, so the
/// second toggle restores whatever was remembered by the first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelFilter {
    current: LogLevel,
    previous: Option<LogLevel>,
}

impl LevelFilter {
    pub fn new(level: LogLevel) -> Self {
        Self {
            current: level,
            previous: None,
        }
    }

    #[inline]
    pub fn accepts(&self, level: LogLevel) -> bool {
        level.index() >= self.current.index()
    }

    #[inline]
    pub fn level(&self) -> LogLevel {
        self.current
    }

    /// Set the level without touching the remembered slot
    pub fn set_level(&mut self, level: LogLevel) {
        self.current = level;
    }

    pub fn previous(&self) -> Option<LogLevel> {
        self.previous
    }

    /// Flip between debug and the remembered level. Returns the new level.
    pub fn toggle_debug(&mut self) -> LogLevel {
        self.current = match self.current {
            LogLevel::Debug => self.previous.unwrap_or(LogLevel::Info),
            level => {
                self.previous = Some(level);
                LogLevel::Debug
            }
        };
        self.current
    }
}
