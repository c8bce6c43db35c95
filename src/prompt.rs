//! Prompt assembly for the financial assistant
//!
//! Combines the fixed instructional text, the user's financial profile,
//! the static investment catalog and the rendered conversation history
//! into a single completion prompt.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::models::RiskTolerance;

/// Persona and answering rules sent ahead of every request
const ASSISTANT_INSTRUCTIONS: &str = "You are a financial assistant designed for beginners. \
Your goal is to provide simple, accurate, and helpful advice about investing, budgeting, \
saving, and other financial topics. Use beginner-friendly language.\n\n\
If the user asks for investment suggestions, use the investment options to recommend \
specific products. If you don't have enough info, respond with your best financial advice \
based on the query.";

lazy_static! {
    /// Reference catalog of investment products: name to product type,
    /// risk band, average return and minimum investment.
    static ref INVESTMENT_OPTIONS: serde_json::Value = json!({
        "SBI Bluechip Fund": { "type": "Mutual Fund", "risk": "Medium", "avg_return": "10%", "min_investment": 5000 },
        "HDFC Small Cap Fund": { "type": "Mutual Fund", "risk": "High", "avg_return": "12%", "min_investment": 5000 },
        "NIFTY 50 Index Fund": { "type": "Mutual Fund", "risk": "Low", "avg_return": "8%", "min_investment": 1000 },
        "Axis Long Term Equity Fund": { "type": "Mutual Fund", "risk": "Medium", "avg_return": "11%", "min_investment": 5000 }
    });
}

/// Financial profile embedded in the prompt
///
/// Defaults apply whenever the user record lacks a value or the user does
/// not exist at all.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub monthly_income: f64,
    pub risk_tolerance: RiskTolerance,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            monthly_income: 5000.0,
            risk_tolerance: RiskTolerance::Medium,
        }
    }
}

/// Compose the full completion prompt for one user message
pub fn build_prompt(profile: &UserProfile, history: &str, input: &str) -> String {
    let profile_json = serde_json::to_string(profile).unwrap_or_else(|_| "{}".to_string());

    format!(
        "{}\n\nConversation history: {}\nUser profile: {}\nInvestment options: {}\n\nUser input: {}\nAnswer:",
        ASSISTANT_INSTRUCTIONS, history, profile_json, *INVESTMENT_OPTIONS, input
    )
}
