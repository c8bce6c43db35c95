//! Core data models for the personal finance dashboard
//!
//! All records serialize with camelCase field names, matching the JSON
//! shapes the dashboard front end reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

//
// ================= Enums =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Savings,
    Credit,
    Investment,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

//
// ================= User =================
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub name: String,
    pub email: String,
    pub monthly_income: Option<f64>,
    pub risk_tolerance: Option<RiskTolerance>,
    pub created_at: DateTime<Utc>,
}

/// User shape returned over the API: a [`User`] with the password removed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub email: String,
    pub monthly_income: Option<f64>,
    pub risk_tolerance: Option<RiskTolerance>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            email: user.email,
            monthly_income: user.monthly_income,
            risk_tolerance: user.risk_tolerance,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub name: String,
    pub email: String,
    pub monthly_income: Option<f64>,
    pub risk_tolerance: Option<RiskTolerance>,
}

/// Partial update for a user record. `None` leaves the field untouched;
/// the id and creation timestamp are never updatable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub username: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub monthly_income: Option<f64>,
    pub risk_tolerance: Option<RiskTolerance>,
}

//
// ================= Account =================
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub number: String,
    pub balance: f64,
    pub last_transaction: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub user_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub number: String,
    pub balance: f64,
    pub last_transaction: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub account_type: Option<AccountType>,
    pub number: Option<String>,
    pub balance: Option<f64>,
    pub last_transaction: Option<DateTime<Utc>>,
}

//
// ================= Savings Goal =================
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub current: f64,
    pub target: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSavingsGoal {
    pub user_id: i64,
    pub name: String,
    pub current: f64,
    pub target: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoalUpdate {
    pub name: Option<String>,
    pub current: Option<f64>,
    pub target: Option<f64>,
}

//
// ================= Chat Message =================
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: i64,
    pub user_id: i64,
    /// Random identifier exposed to clients alongside the store id
    pub message_id: Uuid,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChatMessage {
    pub user_id: i64,
    pub role: ChatRole,
    pub content: String,
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskTolerance::Low => "low",
            RiskTolerance::Medium => "medium",
            RiskTolerance::High => "high",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChatRole::User => "User",
            ChatRole::Assistant => "Assistant",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_wire_shape() {
        let account = Account {
            id: 1,
            user_id: 1,
            name: "Checking Account".to_string(),
            account_type: AccountType::Checking,
            number: "**** 4567".to_string(),
            balance: 12458.32,
            last_transaction: Some(Utc::now()),
        };

        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["type"], "checking");
        assert_eq!(json["userId"], 1);
        assert!(json.get("lastTransaction").is_some());
        assert!(json.get("account_type").is_none());
    }

    #[test]
    fn test_public_user_has_no_password() {
        let user = User {
            id: 1,
            username: "alexmorgan".to_string(),
            password: "password123".to_string(),
            name: "Alex Morgan".to_string(),
            email: "alex@example.com".to_string(),
            monthly_income: Some(5000.0),
            risk_tolerance: Some(RiskTolerance::Medium),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(PublicUser::from(user)).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["username"], "alexmorgan");
        assert_eq!(json["monthlyIncome"], 5000.0);
        assert_eq!(json["riskTolerance"], "medium");
    }

    #[test]
    fn test_chat_role_round_trip() {
        let json = serde_json::to_string(&ChatRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");

        let role: ChatRole = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, ChatRole::User);
    }
}
