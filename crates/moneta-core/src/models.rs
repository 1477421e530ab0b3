//! Domain models for Moneta

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Transaction source - how a record was created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionSource {
    /// Entered by the user
    #[default]
    Manual,
    /// Generated from a recurring template
    Recurring,
    /// Loaded from a bank statement
    Import,
}

impl TransactionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Recurring => "recurring",
            Self::Import => "import",
        }
    }
}

impl std::str::FromStr for TransactionSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manual" => Ok(Self::Manual),
            "recurring" => Ok(Self::Recurring),
            "import" => Ok(Self::Import),
            _ => Err(format!("Unknown transaction source: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which records to include when listing a month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    #[default]
    All,
    /// amount > 0
    Income,
    /// amount < 0
    Expense,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Whether a signed amount belongs to this kind
    pub fn includes(&self, amount: f64) -> bool {
        match self {
            Self::All => true,
            Self::Income => amount > 0.0,
            Self::Expense => amount < 0.0,
        }
    }
}

impl std::str::FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown record kind: {}", s)),
        }
    }
}

/// Recurrence schedule of a template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Schedule {
    #[default]
    Monthly,
    Weekly,
    Biweekly,
}

impl Schedule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
        }
    }
}

impl std::str::FromStr for Schedule {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monthly" => Ok(Self::Monthly),
            "weekly" => Ok(Self::Weekly),
            "biweekly" => Ok(Self::Biweekly),
            _ => Err(format!("Unknown schedule: {}", s)),
        }
    }
}

impl std::fmt::Display for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Traffic-light status of a month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Red,
    Yellow,
    Green,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Green => "green",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A classified transaction, as consumed by the monthly aggregator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    /// Negative = expense, positive = income
    pub amount: f64,
    pub category: String,
    /// Trust in the category, 0.0 - 1.0
    pub confidence: f64,
}

/// A stored transaction record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub description: String,
    /// Negative = expense, positive = income
    pub amount: f64,
    pub category: String,
    pub confidence: f64,
    pub source: TransactionSource,
    pub created_at: DateTime<Utc>,
}

impl Record {
    pub fn transaction(&self) -> Transaction {
        Transaction {
            date: self.date,
            description: self.description.clone(),
            amount: self.amount,
            category: self.category.clone(),
            confidence: self.confidence,
        }
    }
}

/// A record to be classified and stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecord {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    #[serde(default)]
    pub source: TransactionSource,
}

/// A record produced by the recurring generator, already categorized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDraft {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub confidence: f64,
    pub source: TransactionSource,
}

/// A learned "description contains pattern => category" rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnedRule {
    /// Normalized: uppercase, trimmed, single spaces, at most 120 chars
    pub pattern: String,
    pub category: String,
}

impl LearnedRule {
    pub fn new(pattern: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            category: category.into(),
        }
    }
}

/// A learned rule as stored for a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRule {
    pub id: i64,
    pub user_id: i64,
    pub pattern: String,
    pub category: String,
}

impl StoredRule {
    pub fn learned(&self) -> LearnedRule {
        LearnedRule::new(self.pattern.clone(), self.category.clone())
    }
}

/// A recurring income/expense template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringTemplate {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    /// Positive = income, negative = expense
    pub amount: f64,
    pub category: String,
    pub schedule: Schedule,
    /// As entered; clamped to 1-28 at generation time
    pub day_of_month: u32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a recurring template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecurringTemplate {
    pub name: String,
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub schedule: Schedule,
    #[serde(default = "default_day_of_month")]
    pub day_of_month: u32,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_day_of_month() -> u32 {
    1
}

fn default_active() -> bool {
    true
}

/// Category and confidence assigned to a transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub category: String,
    pub confidence: f64,
}

impl Classification {
    pub fn new(category: impl Into<String>, confidence: f64) -> Self {
        Self {
            category: category.into(),
            confidence,
        }
    }
}

/// Spending in one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpend {
    pub category: String,
    /// Positive magnitude
    pub amount: f64,
}

/// Derived monthly summary (never stored)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub month: String,
    pub income: f64,
    /// Positive magnitude
    pub expense: f64,
    pub net: f64,
    pub status: Status,
    /// Up to 5 categories, largest first
    pub top_spend: Vec<CategorySpend>,
    pub count_records: usize,
}

/// Monthly summary with its narrative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReport {
    #[serde(flatten)]
    pub summary: MonthlySummary,
    pub message: String,
}

/// Outcome of a manual category correction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionResult {
    pub record_id: i64,
    pub category: String,
    /// The learned rule written as part of the correction (none for an empty description)
    pub rule: Option<LearnedRule>,
}
