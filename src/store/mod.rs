//! Record store for dashboard entities
//!
//! Process-lifetime storage for users, accounts, savings goals and chat
//! messages, each with its own auto-incrementing id sequence starting at 1.
//! Lookups that miss resolve to `Ok(None)`; the store raises no domain
//! errors of its own.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    Account, AccountType, AccountUpdate, ChatMessage, ChatRole, NewAccount, NewChatMessage,
    NewSavingsGoal, NewUser, RiskTolerance, SavingsGoal, SavingsGoalUpdate, User, UserUpdate,
};

/// Trait for record storage
///
/// `username` is not checked for uniqueness on create; when duplicates
/// exist, [`get_user_by_username`](Storage::get_user_by_username) resolves
/// to the one created first.
#[async_trait]
pub trait Storage: Send + Sync {
    // User operations
    async fn get_user(&self, id: i64) -> Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn create_user(&self, new_user: NewUser) -> Result<User>;
    async fn update_user(&self, id: i64, updates: UserUpdate) -> Result<Option<User>>;

    // Account operations
    async fn get_account(&self, id: i64) -> Result<Option<Account>>;
    async fn get_accounts(&self, user_id: i64) -> Result<Vec<Account>>;
    async fn create_account(&self, new_account: NewAccount) -> Result<Account>;
    async fn update_account(&self, id: i64, updates: AccountUpdate) -> Result<Option<Account>>;

    // Savings goal operations
    async fn get_savings_goal(&self, id: i64) -> Result<Option<SavingsGoal>>;
    async fn get_savings_goals(&self, user_id: i64) -> Result<Vec<SavingsGoal>>;
    async fn create_savings_goal(&self, new_goal: NewSavingsGoal) -> Result<SavingsGoal>;
    async fn update_savings_goal(
        &self,
        id: i64,
        updates: SavingsGoalUpdate,
    ) -> Result<Option<SavingsGoal>>;

    // Chat message operations
    async fn get_chat_message(&self, id: i64) -> Result<Option<ChatMessage>>;
    async fn get_chat_messages(&self, user_id: i64) -> Result<Vec<ChatMessage>>;
    async fn create_chat_message(&self, new_message: NewChatMessage) -> Result<ChatMessage>;
}

/// Ordering for chat history: ascending by timestamp, with records that
/// carry no timestamp sorted first.
pub fn chat_timestamp_order(a: &ChatMessage, b: &ChatMessage) -> Ordering {
    match (a.timestamp, b.timestamp) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a_ts), Some(b_ts)) => a_ts.cmp(&b_ts),
    }
}

/// In-memory implementation of [`Storage`]
///
/// Tables are keyed by id in `BTreeMap`s, so iteration order is id order,
/// which for records created through this store is also creation order.
pub struct MemStorage {
    users: RwLock<BTreeMap<i64, User>>,
    accounts: RwLock<BTreeMap<i64, Account>>,
    savings_goals: RwLock<BTreeMap<i64, SavingsGoal>>,
    chat_messages: RwLock<BTreeMap<i64, ChatMessage>>,
    next_user_id: AtomicI64,
    next_account_id: AtomicI64,
    next_goal_id: AtomicI64,
    next_message_id: AtomicI64,
}

impl MemStorage {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(BTreeMap::new()),
            accounts: RwLock::new(BTreeMap::new()),
            savings_goals: RwLock::new(BTreeMap::new()),
            chat_messages: RwLock::new(BTreeMap::new()),
            next_user_id: AtomicI64::new(1),
            next_account_id: AtomicI64::new(1),
            next_goal_id: AtomicI64::new(1),
            next_message_id: AtomicI64::new(1),
        }
    }

    /// Insert the fixed demo bootstrap: one user, three accounts, three
    /// savings goals and a single assistant greeting. Used by the demo
    /// binaries and as a test fixture.
    pub async fn seed_demo_data(&self) -> Result<()> {
        let user = self
            .create_user(NewUser {
                username: "alexmorgan".to_string(),
                password: "password123".to_string(),
                name: "Alex Morgan".to_string(),
                email: "alex@example.com".to_string(),
                monthly_income: Some(5000.0),
                risk_tolerance: Some(RiskTolerance::Medium),
            })
            .await?;

        let now = Utc::now();

        self.create_account(NewAccount {
            user_id: user.id,
            name: "Checking Account".to_string(),
            account_type: AccountType::Checking,
            number: "**** 4567".to_string(),
            balance: 12458.32,
            last_transaction: Some(now - Duration::days(1)),
        })
        .await?;

        self.create_account(NewAccount {
            user_id: user.id,
            name: "Savings Account".to_string(),
            account_type: AccountType::Savings,
            number: "**** 7890".to_string(),
            balance: 28745.16,
            last_transaction: Some(now - Duration::days(3)),
        })
        .await?;

        self.create_account(NewAccount {
            user_id: user.id,
            name: "Credit Card".to_string(),
            account_type: AccountType::Credit,
            number: "**** 2345".to_string(),
            balance: 1846.29,
            last_transaction: Some(now - Duration::days(5)),
        })
        .await?;

        self.create_savings_goal(NewSavingsGoal {
            user_id: user.id,
            name: "Emergency Fund".to_string(),
            current: 6800.0,
            target: 10000.0,
        })
        .await?;

        self.create_savings_goal(NewSavingsGoal {
            user_id: user.id,
            name: "Vacation".to_string(),
            current: 1750.0,
            target: 5000.0,
        })
        .await?;

        self.create_savings_goal(NewSavingsGoal {
            user_id: user.id,
            name: "New Car".to_string(),
            current: 3600.0,
            target: 30000.0,
        })
        .await?;

        self.create_chat_message(NewChatMessage {
            user_id: user.id,
            role: ChatRole::Assistant,
            content: "Hello! I'm your financial assistant. I can help you with budgeting, \
                      saving strategies, investment insights, and more. How can I assist you today?"
                .to_string(),
        })
        .await?;

        Ok(())
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User> {
        let id = self.next_user_id.fetch_add(1, AtomicOrdering::SeqCst);
        let user = User {
            id,
            username: new_user.username,
            password: new_user.password,
            name: new_user.name,
            email: new_user.email,
            monthly_income: new_user.monthly_income,
            risk_tolerance: new_user.risk_tolerance,
            created_at: Utc::now(),
        };

        let mut users = self.users.write().await;
        users.insert(id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: i64, updates: UserUpdate) -> Result<Option<User>> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(username) = updates.username {
            user.username = username;
        }
        if let Some(password) = updates.password {
            user.password = password;
        }
        if let Some(name) = updates.name {
            user.name = name;
        }
        if let Some(email) = updates.email {
            user.email = email;
        }
        if let Some(monthly_income) = updates.monthly_income {
            user.monthly_income = Some(monthly_income);
        }
        if let Some(risk_tolerance) = updates.risk_tolerance {
            user.risk_tolerance = Some(risk_tolerance);
        }

        Ok(Some(user.clone()))
    }

    async fn get_account(&self, id: i64) -> Result<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&id).cloned())
    }

    async fn get_accounts(&self, user_id: i64) -> Result<Vec<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_account(&self, new_account: NewAccount) -> Result<Account> {
        let id = self.next_account_id.fetch_add(1, AtomicOrdering::SeqCst);
        let account = Account {
            id,
            user_id: new_account.user_id,
            name: new_account.name,
            account_type: new_account.account_type,
            number: new_account.number,
            balance: new_account.balance,
            last_transaction: new_account.last_transaction,
        };

        let mut accounts = self.accounts.write().await;
        accounts.insert(id, account.clone());
        Ok(account)
    }

    async fn update_account(&self, id: i64, updates: AccountUpdate) -> Result<Option<Account>> {
        let mut accounts = self.accounts.write().await;
        let Some(account) = accounts.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = updates.name {
            account.name = name;
        }
        if let Some(account_type) = updates.account_type {
            account.account_type = account_type;
        }
        if let Some(number) = updates.number {
            account.number = number;
        }
        if let Some(balance) = updates.balance {
            account.balance = balance;
        }
        if let Some(last_transaction) = updates.last_transaction {
            account.last_transaction = Some(last_transaction);
        }

        Ok(Some(account.clone()))
    }

    async fn get_savings_goal(&self, id: i64) -> Result<Option<SavingsGoal>> {
        let goals = self.savings_goals.read().await;
        Ok(goals.get(&id).cloned())
    }

    async fn get_savings_goals(&self, user_id: i64) -> Result<Vec<SavingsGoal>> {
        let goals = self.savings_goals.read().await;
        Ok(goals
            .values()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_savings_goal(&self, new_goal: NewSavingsGoal) -> Result<SavingsGoal> {
        let id = self.next_goal_id.fetch_add(1, AtomicOrdering::SeqCst);
        let goal = SavingsGoal {
            id,
            user_id: new_goal.user_id,
            name: new_goal.name,
            current: new_goal.current,
            target: new_goal.target,
            created_at: Utc::now(),
        };

        let mut goals = self.savings_goals.write().await;
        goals.insert(id, goal.clone());
        Ok(goal)
    }

    async fn update_savings_goal(
        &self,
        id: i64,
        updates: SavingsGoalUpdate,
    ) -> Result<Option<SavingsGoal>> {
        let mut goals = self.savings_goals.write().await;
        let Some(goal) = goals.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = updates.name {
            goal.name = name;
        }
        if let Some(current) = updates.current {
            goal.current = current;
        }
        if let Some(target) = updates.target {
            goal.target = target;
        }

        Ok(Some(goal.clone()))
    }

    async fn get_chat_message(&self, id: i64) -> Result<Option<ChatMessage>> {
        let messages = self.chat_messages.read().await;
        Ok(messages.get(&id).cloned())
    }

    async fn get_chat_messages(&self, user_id: i64) -> Result<Vec<ChatMessage>> {
        let messages = self.chat_messages.read().await;
        let mut history: Vec<ChatMessage> = messages
            .values()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();

        // Stable sort: equal timestamps keep id order
        history.sort_by(chat_timestamp_order);
        Ok(history)
    }

    async fn create_chat_message(&self, new_message: NewChatMessage) -> Result<ChatMessage> {
        let id = self.next_message_id.fetch_add(1, AtomicOrdering::SeqCst);
        let message = ChatMessage {
            id,
            user_id: new_message.user_id,
            message_id: Uuid::new_v4(),
            role: new_message.role,
            content: new_message.content,
            timestamp: Some(Utc::now()),
        };

        let mut messages = self.chat_messages.write().await;
        messages.insert(id, message.clone());
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password: "secret".to_string(),
            name: "Test User".to_string(),
            email: format!("{}@example.com", username),
            monthly_income: None,
            risk_tolerance: None,
        }
    }

    fn new_account(user_id: i64, name: &str) -> NewAccount {
        NewAccount {
            user_id,
            name: name.to_string(),
            account_type: AccountType::Checking,
            number: "**** 0000".to_string(),
            balance: 100.0,
            last_transaction: None,
        }
    }

    #[tokio::test]
    async fn test_create_then_get_by_id_matches() {
        let store = MemStorage::new();

        let user = store.create_user(new_user("alice")).await.unwrap();
        assert_eq!(store.get_user(user.id).await.unwrap(), Some(user.clone()));

        let account = store.create_account(new_account(user.id, "Main")).await.unwrap();
        assert_eq!(store.get_account(account.id).await.unwrap(), Some(account));

        let goal = store
            .create_savings_goal(NewSavingsGoal {
                user_id: user.id,
                name: "Bike".to_string(),
                current: 50.0,
                target: 500.0,
            })
            .await
            .unwrap();
        assert_eq!(store.get_savings_goal(goal.id).await.unwrap(), Some(goal));

        let message = store
            .create_chat_message(NewChatMessage {
                user_id: user.id,
                role: ChatRole::User,
                content: "hello".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(
            store.get_chat_message(message.id).await.unwrap(),
            Some(message)
        );
    }

    #[tokio::test]
    async fn test_ids_increment_independently_per_kind() {
        let store = MemStorage::new();

        let u1 = store.create_user(new_user("a")).await.unwrap();
        let u2 = store.create_user(new_user("b")).await.unwrap();
        assert_eq!((u1.id, u2.id), (1, 2));

        let a1 = store.create_account(new_account(1, "A")).await.unwrap();
        let a2 = store.create_account(new_account(1, "B")).await.unwrap();
        assert_eq!((a1.id, a2.id), (1, 2));

        let m1 = store
            .create_chat_message(NewChatMessage {
                user_id: 1,
                role: ChatRole::User,
                content: "hi".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(m1.id, 1);
    }

    #[tokio::test]
    async fn test_get_by_owner_filters_and_preserves_creation_order() {
        let store = MemStorage::new();
        store.create_user(new_user("a")).await.unwrap();
        store.create_user(new_user("b")).await.unwrap();

        store.create_account(new_account(1, "First")).await.unwrap();
        store.create_account(new_account(2, "Other")).await.unwrap();
        store.create_account(new_account(1, "Second")).await.unwrap();
        store.create_account(new_account(1, "Third")).await.unwrap();

        let accounts = store.get_accounts(1).await.unwrap();
        let names: Vec<&str> = accounts.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
        assert!(accounts.iter().all(|a| a.user_id == 1));

        assert!(store.get_accounts(42).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_merges_fields_and_preserves_the_rest() {
        let store = MemStorage::new();
        let created = store.create_user(new_user("alice")).await.unwrap();

        let updated = store
            .update_user(
                created.id,
                UserUpdate {
                    monthly_income: Some(7500.0),
                    risk_tolerance: Some(RiskTolerance::High),
                    ..UserUpdate::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.username, "alice");
        assert_eq!(updated.monthly_income, Some(7500.0));
        assert_eq!(updated.risk_tolerance, Some(RiskTolerance::High));
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_id_returns_none_and_changes_nothing() {
        let store = MemStorage::new();
        let user = store.create_user(new_user("alice")).await.unwrap();

        let result = store
            .update_user(
                999,
                UserUpdate {
                    name: Some("Ghost".to_string()),
                    ..UserUpdate::default()
                },
            )
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(store.get_user(user.id).await.unwrap(), Some(user));

        let result = store
            .update_account(999, AccountUpdate::default())
            .await
            .unwrap();
        assert!(result.is_none());

        let result = store
            .update_savings_goal(999, SavingsGoalUpdate::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_get_user_by_username_exact_match() {
        let store = MemStorage::new();
        store.create_user(new_user("alice")).await.unwrap();

        let found = store.get_user_by_username("alice").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(1));

        assert!(store.get_user_by_username("Alice").await.unwrap().is_none());
        assert!(store.get_user_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_usernames_are_not_rejected() {
        let store = MemStorage::new();
        let first = store.create_user(new_user("alice")).await.unwrap();
        let second = store.create_user(new_user("alice")).await.unwrap();

        assert_ne!(first.id, second.id);

        // Lookup resolves to the earliest record
        let found = store.get_user_by_username("alice").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(first.id));
    }

    #[tokio::test]
    async fn test_chat_history_sorted_by_timestamp() {
        let store = MemStorage::new();
        for content in ["one", "two", "three"] {
            store
                .create_chat_message(NewChatMessage {
                    user_id: 1,
                    role: ChatRole::User,
                    content: content.to_string(),
                })
                .await
                .unwrap();
        }

        let history = store.get_chat_messages(1).await.unwrap();
        let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
        assert!(history.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn test_absent_timestamps_sort_first() {
        let make = |id: i64, timestamp| ChatMessage {
            id,
            user_id: 1,
            message_id: Uuid::new_v4(),
            role: ChatRole::User,
            content: String::new(),
            timestamp,
        };

        let mut messages = vec![
            make(1, Some(Utc::now())),
            make(2, None),
            make(3, Some(Utc::now() - Duration::hours(1))),
        ];
        messages.sort_by(chat_timestamp_order);

        let ids: Vec<i64> = messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn test_seed_demo_data_bootstrap() {
        let store = MemStorage::new();
        store.seed_demo_data().await.unwrap();

        let user = store.get_user(1).await.unwrap().unwrap();
        assert_eq!(user.username, "alexmorgan");
        assert_eq!(user.risk_tolerance, Some(RiskTolerance::Medium));

        let accounts = store.get_accounts(1).await.unwrap();
        assert_eq!(accounts.len(), 3);
        assert_eq!(accounts[0].name, "Checking Account");
        assert_eq!(accounts[2].account_type, AccountType::Credit);

        let goals = store.get_savings_goals(1).await.unwrap();
        assert_eq!(goals.len(), 3);
        assert_eq!(goals[1].name, "Vacation");

        let history = store.get_chat_messages(1).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].role, ChatRole::Assistant);
        assert!(history[0].content.starts_with("Hello!"));
    }
}
