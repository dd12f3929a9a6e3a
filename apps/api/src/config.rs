use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Chance that a plain paragraph line (after the first) gets a leading emoji.
    pub emoji_paragraph_probability: f64,
    /// Fixed-budget character limit for 3:4 cards.
    pub char_budget_portrait: usize,
    /// Fixed-budget character limit for 9:16 cards.
    pub char_budget_story: usize,
    /// Simulated frame delay between committing a probe and reading its height.
    /// Zero means a plain scheduler yield.
    pub surface_frame_ms: u64,
    /// Live pagination sessions kept before the least recently used one is evicted.
    pub session_capacity: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            emoji_paragraph_probability: probability(
                "EMOJI_PARAGRAPH_PROBABILITY",
                env_or::<f64>("EMOJI_PARAGRAPH_PROBABILITY", 0.3)?,
            )?,
            char_budget_portrait: env_or::<usize>("CHAR_BUDGET_3_4", 150)?.max(1),
            char_budget_story: env_or::<usize>("CHAR_BUDGET_9_16", 250)?.max(1),
            surface_frame_ms: env_or("SURFACE_FRAME_MS", 0)?,
            session_capacity: env_or::<usize>("SESSION_CAPACITY", 1024)?.max(1),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            emoji_paragraph_probability: 0.3,
            char_budget_portrait: 150,
            char_budget_story: 250,
            surface_frame_ms: 0,
            session_capacity: 1024,
        }
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}

/// Rejects NaN and infinities, clamps everything else into [0, 1].
fn probability(key: &str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        bail!("{key} must be a finite number, got {value}");
    }
    Ok(value.clamp(0.0, 1.0))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── probability ─────────────────────────────────────────────────────────

    #[test]
    fn test_probability_rejects_non_finite() {
        let nan = "NaN".parse::<f64>().unwrap();
        assert!(probability("EMOJI_PARAGRAPH_PROBABILITY", nan).is_err());
        assert!(probability("EMOJI_PARAGRAPH_PROBABILITY", f64::INFINITY).is_err());
        assert!(probability("EMOJI_PARAGRAPH_PROBABILITY", f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_probability_clamps_finite_values() {
        assert_eq!(probability("P", 0.3).unwrap(), 0.3);
        assert_eq!(probability("P", 7.0).unwrap(), 1.0);
        assert_eq!(probability("P", -2.0).unwrap(), 0.0);
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.emoji_paragraph_probability, 0.3);
        assert_eq!(config.session_capacity, 1024);
    }
}
