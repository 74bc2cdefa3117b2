use anyhow::{bail, Result};

use crate::TermInt;

/// Smallest field the game is playable on, in cells.
const MIN_FIELD_WIDTH: u16 = 8;
const MIN_FIELD_HEIGHT: u16 = 6;

/// Startup configuration. Fixed for the lifetime of the process.
#[derive(Clone, Debug)]
pub struct Config {
    pub tick_ms: u64,
    width_cap: Option<u16>,
    height_cap: Option<u16>,
}

impl Config {
    pub fn new(tick_ms: u64, width_cap: Option<u16>, height_cap: Option<u16>) -> Result<Self> {
        if !(20..=2000).contains(&tick_ms) {
            bail!("tick period must be between 20 and 2000 ms, got {}", tick_ms);
        }
        Ok(Config {
            tick_ms,
            width_cap,
            height_cap,
        })
    }

    /// Resolves the playing field dimensions from the terminal size:
    /// the interior inside the one-cell border, optionally capped by
    /// the CLI flags.
    pub fn field_dims(&self, term_width: TermInt, term_height: TermInt) -> Result<(i16, i16)> {
        let width = Self::capped(term_width, self.width_cap);
        let height = Self::capped(term_height, self.height_cap);

        if width < MIN_FIELD_WIDTH || height < MIN_FIELD_HEIGHT {
            bail!(
                "terminal yields a {}x{} field, need at least {}x{}",
                width,
                height,
                MIN_FIELD_WIDTH,
                MIN_FIELD_HEIGHT
            );
        }

        Ok((width as i16, height as i16))
    }

    fn capped(term_dim: TermInt, cap: Option<u16>) -> u16 {
        let interior = term_dim.saturating_sub(2);
        cap.unwrap_or(u16::MAX)
            .min(interior)
            .min(i16::MAX as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_period_is_validated() {
        assert!(Config::new(100, None, None).is_ok());
        assert!(Config::new(20, None, None).is_ok());
        assert!(Config::new(2000, None, None).is_ok());

        assert!(Config::new(5, None, None).is_err());
        assert!(Config::new(5000, None, None).is_err());
    }

    #[test]
    fn field_fills_the_terminal_interior() {
        let config = Config::new(100, None, None).unwrap();
        assert_eq!(config.field_dims(80, 24).unwrap(), (78, 22));
    }

    #[test]
    fn caps_shrink_the_field() {
        let config = Config::new(100, Some(20), Some(10)).unwrap();
        assert_eq!(config.field_dims(80, 24).unwrap(), (20, 10));
    }

    #[test]
    fn caps_never_exceed_the_terminal() {
        let config = Config::new(100, Some(500), Some(500)).unwrap();
        assert_eq!(config.field_dims(80, 24).unwrap(), (78, 22));
    }

    #[test]
    fn tiny_terminals_are_rejected() {
        let config = Config::new(100, None, None).unwrap();
        assert!(config.field_dims(9, 24).is_err());
        assert!(config.field_dims(80, 7).is_err());
        assert!(config.field_dims(0, 0).is_err());
    }
}
