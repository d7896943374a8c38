/*!
 * Token usage accounting and cost estimation.
 */

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Token consumption reported by a single provider call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Prompt (input) tokens
    pub input_tokens: u64,
    /// Completion (output) tokens
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }
}

/// Usage accumulated over every successful translation call of a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsageTotals {
    /// Sum of input tokens
    pub input_tokens: u64,

    /// Sum of output tokens
    pub output_tokens: u64,

    /// Number of calls accounted for
    pub calls: usize,

    /// Total time spent waiting on the provider
    pub api_duration: Duration,
}

impl UsageTotals {
    /// Create empty totals
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one successful call
    pub fn add(&mut self, usage: TokenUsage, elapsed: Duration) {
        self.input_tokens += usage.input_tokens;
        self.output_tokens += usage.output_tokens;
        self.calls += 1;
        self.api_duration += elapsed;
    }

    /// Input plus output tokens
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }

    /// Estimated cost in USD for the given model; unknown models cost nothing
    pub fn cost_usd(&self, model: &str) -> f64 {
        match ModelPrice::for_model(model) {
            Some(price) => {
                self.input_tokens as f64 * price.input_per_million / 1_000_000.0
                    + self.output_tokens as f64 * price.output_per_million / 1_000_000.0
            }
            None => 0.0,
        }
    }

    /// Calculate tokens per minute of provider time
    pub fn tokens_per_minute(&self) -> f64 {
        let minutes = self.api_duration.as_secs_f64() / 60.0;
        if minutes > 0.0 {
            self.total_tokens() as f64 / minutes
        } else {
            0.0
        }
    }

    /// Generate a human readable summary of token usage
    pub fn summary(&self, provider: &str, model: &str) -> String {
        format!(
            "Token Usage Summary:\n\
             Provider: {}\n\
             Model: {}\n\
             Calls: {}\n\
             Input tokens: {}\n\
             Output tokens: {}\n\
             Total tokens: {}\n\
             API request time: {:.2} minutes\n\
             Throughput: {:.0} tokens/minute\n\
             Estimated cost: ${:.6}",
            provider,
            model,
            self.calls,
            self.input_tokens,
            self.output_tokens,
            self.total_tokens(),
            self.api_duration.as_secs_f64() / 60.0,
            self.tokens_per_minute(),
            self.cost_usd(model)
        )
    }
}

/// Per-million-token prices for a model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPrice {
    pub input_per_million: f64,
    pub output_per_million: f64,
}

impl ModelPrice {
    /// Look up the price table entry for a model
    pub fn for_model(model: &str) -> Option<Self> {
        let (input_per_million, output_per_million) = match model {
            "gemini-2.5-pro" => (1.25, 10.00),
            "gemini-2.5-flash" => (0.30, 2.50),
            "gemini-2.5-flash-lite" => (0.10, 0.40),
            "claude-3-5-haiku-latest" | "claude-3-5-haiku-20241022" => (0.80, 4.00),
            "claude-3-haiku-20240307" => (0.25, 1.25),
            "claude-sonnet-4-0" | "claude-sonnet-4-20250514" => (3.00, 15.00),
            _ => return None,
        };
        Some(Self {
            input_per_million,
            output_per_million,
        })
    }
}
