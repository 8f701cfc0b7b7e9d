//! Token-usage cost estimation

use serde::{Deserialize, Serialize};

use crate::core::models::TokenUsage;

/// Per-thousand-token prices for one model tier, in USD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub input_per_1k: f64,
    pub output_per_1k: f64,
}

/// Cost of one call together with the counts it was derived from
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostEstimate {
    pub cost: f64,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl CostEstimate {
    pub fn zero() -> Self {
        Self {
            cost: 0.0,
            input_tokens: 0,
            output_tokens: 0,
        }
    }
}

impl Pricing {
    pub fn new(input_per_1k: f64, output_per_1k: f64) -> Self {
        Self {
            input_per_1k,
            output_per_1k,
        }
    }

    /// Cost for the given counts
    pub fn cost(&self, input_tokens: u64, output_tokens: u64) -> f64 {
        (input_tokens as f64 / 1000.0 * self.input_per_1k)
            + (output_tokens as f64 / 1000.0 * self.output_per_1k)
    }

    /// Estimate from a usage report; missing usage costs nothing
    pub fn estimate(&self, usage: Option<&TokenUsage>) -> CostEstimate {
        match usage {
            Some(usage) => CostEstimate {
                cost: self.cost(usage.input_tokens, usage.output_tokens),
                input_tokens: usage.input_tokens,
                output_tokens: usage.output_tokens,
            },
            None => CostEstimate::zero(),
        }
    }
}

impl Default for Pricing {
    fn default() -> Self {
        Self::new(0.00015, 0.0006)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_formula() {
        let pricing = Pricing::default();
        let usage = TokenUsage {
            input_tokens: 5,
            output_tokens: 4,
        };
        let estimate = pricing.estimate(Some(&usage));

        let expected = 5.0 / 1000.0 * 0.00015 + 4.0 / 1000.0 * 0.0006;
        assert!((estimate.cost - expected).abs() < 1e-15);
        assert_eq!(estimate.input_tokens, 5);
        assert_eq!(estimate.output_tokens, 4);
    }

    #[test]
    fn test_cost_formula_various_counts() {
        let pricing = Pricing::new(0.5, 1.5);
        for (i, o) in [(0u64, 0u64), (1000, 0), (0, 1000), (1234, 5678)] {
            let expected = i as f64 / 1000.0 * 0.5 + o as f64 / 1000.0 * 1.5;
            assert!((pricing.cost(i, o) - expected).abs() < 1e-12);
        }
        assert_eq!(pricing.cost(2000, 2000), 4.0);
    }

    #[test]
    fn test_missing_usage_falls_back_to_zero() {
        let estimate = Pricing::default().estimate(None);
        assert_eq!(estimate, CostEstimate::zero());
        assert_eq!(estimate.cost, 0.0);
        assert_eq!(estimate.input_tokens, 0);
        assert_eq!(estimate.output_tokens, 0);
    }
}
