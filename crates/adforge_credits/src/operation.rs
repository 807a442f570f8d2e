//! Metered operation kinds and their pricing.

use adforge_rate_limit::CreditCosts;

/// A billable operation against the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// First draft for a listing.
    Generation,
    /// SEO keyword rewrite of an existing draft.
    Optimization,
    /// Repeat draft for the same listing, billed at a discount.
    Regeneration,
}

impl Operation {
    /// The credit price of this operation under `costs`.
    pub fn cost(&self, costs: &CreditCosts) -> f64 {
        match self {
            Operation::Generation => costs.generation_cost,
            Operation::Optimization => costs.optimization_cost,
            Operation::Regeneration => costs.regeneration_cost,
        }
    }

    /// Ledger description recorded with the debit.
    pub fn description(&self) -> &'static str {
        match self {
            Operation::Generation => "Ad generation",
            Operation::Optimization => "SEO optimization",
            Operation::Regeneration => "Ad regeneration",
        }
    }
}
