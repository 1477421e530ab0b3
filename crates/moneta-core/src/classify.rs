//! Transaction classifier
//!
//! Assigns a category and a confidence to a transaction:
//! 1. The user's learned rules, in insertion order. A hit is fully trusted (1.0).
//! 2. Global keyword tiers, keyed by the sign of the amount.
//!
//! ## Configuration Resolution
//!
//! The global tiers are configuration, not code. They are loaded with a
//! two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/moneta/config/rules.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Tier order is significant: expense tiers are evaluated top to bottom and
//! the first tier with a matching keyword wins.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{Classification, LearnedRule};
use crate::rules::match_user_rules;

/// Embedded default rules (compiled into binary)
const DEFAULT_RULES: &str = include_str!("../../../config/rules.toml");

/// Confidence of a learned-rule hit
pub const LEARNED_CONFIDENCE: f64 = 1.0;

/// Income tier (amount > 0)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IncomeTier {
    pub category: String,
    /// Payroll keywords ("NOMINA", "SUELDO")
    pub keywords: Vec<String>,
    /// Confidence when a keyword matches
    pub confidence: f64,
    /// Confidence for any other positive amount
    pub fallback_confidence: f64,
}

/// One expense tier: any keyword match assigns the category
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KeywordTier {
    pub category: String,
    pub confidence: f64,
    pub keywords: Vec<String>,
}

impl KeywordTier {
    fn matches(&self, description: &str) -> bool {
        self.keywords.iter().any(|k| description.contains(k.as_str()))
    }
}

/// Category used when nothing else matches an expense
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FallbackTier {
    pub category: String,
    pub confidence: f64,
}

/// The ordered global keyword rules
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GlobalRules {
    pub income: IncomeTier,
    #[serde(default)]
    pub expense: Vec<KeywordTier>,
    pub fallback: FallbackTier,
}

impl GlobalRules {
    /// The embedded default rules, parsed once per process
    pub fn builtin() -> &'static GlobalRules {
        static BUILTIN: OnceLock<GlobalRules> = OnceLock::new();
        BUILTIN.get_or_init(|| Self::parse(DEFAULT_RULES).expect("embedded rules.toml is valid"))
    }

    /// Parse rules from TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let rules: GlobalRules = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid rules TOML: {}", e)))?;
        rules.validate()?;
        Ok(rules)
    }

    /// Load rules (override first, then embedded defaults)
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let path = match override_path {
            Some(path) => Some(path.to_path_buf()),
            None => default_rules_path(),
        };

        match path {
            Some(path) if path.exists() => {
                debug!("Loading keyword rules from {}", path.display());
                let content = fs::read_to_string(&path).map_err(|e| {
                    Error::Config(format!("Failed to read {}: {}", path.display(), e))
                })?;
                Self::parse(&content)
            }
            Some(path) => {
                if override_path.is_some() {
                    warn!(
                        "Rules file {} not found, using built-in rules",
                        path.display()
                    );
                }
                Ok(Self::builtin().clone())
            }
            None => Ok(Self::builtin().clone()),
        }
    }

    fn validate(&self) -> Result<()> {
        check_tier("income", &self.income.category, self.income.confidence)?;
        check_tier(
            "income fallback",
            &self.income.category,
            self.income.fallback_confidence,
        )?;
        for tier in &self.expense {
            check_tier("expense", &tier.category, tier.confidence)?;
            if tier.keywords.iter().any(|k| k.is_empty()) {
                return Err(Error::Config(format!(
                    "Tier '{}' has an empty keyword",
                    tier.category
                )));
            }
        }
        check_tier("fallback", &self.fallback.category, self.fallback.confidence)
    }

    /// Classify by keywords alone
    pub fn classify(&self, description: &str, amount: f64) -> Classification {
        let desc = description.to_uppercase();

        if amount > 0.0 {
            let payroll = self.income.keywords.iter().any(|k| desc.contains(k.as_str()));
            let confidence = if payroll {
                self.income.confidence
            } else {
                self.income.fallback_confidence
            };
            return Classification::new(self.income.category.clone(), confidence);
        }

        self.expense
            .iter()
            .find(|tier| tier.matches(&desc))
            .map(|tier| Classification::new(tier.category.clone(), tier.confidence))
            .unwrap_or_else(|| {
                Classification::new(self.fallback.category.clone(), self.fallback.confidence)
            })
    }
}

impl Default for GlobalRules {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

fn check_tier(kind: &str, category: &str, confidence: f64) -> Result<()> {
    if category.trim().is_empty() {
        return Err(Error::Config(format!("{} tier has an empty category", kind)));
    }
    if !(0.0..=1.0).contains(&confidence) {
        return Err(Error::Config(format!(
            "{} tier '{}' confidence {} is outside 0.0-1.0",
            kind, category, confidence
        )));
    }
    Ok(())
}

/// Default rules override path
pub fn default_rules_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("moneta").join("config").join("rules.toml"))
}

/// Classifier over a set of global keyword rules
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    rules: GlobalRules,
}

impl Classifier {
    pub fn new(rules: GlobalRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &GlobalRules {
        &self.rules
    }

    /// Classify a transaction: learned rules first, then global keywords
    pub fn classify(
        &self,
        description: &str,
        amount: f64,
        user_rules: &[LearnedRule],
    ) -> Classification {
        classify_with(&self.rules, description, amount, user_rules)
    }
}

/// Classify with the built-in keyword rules
pub fn classify(description: &str, amount: f64, user_rules: &[LearnedRule]) -> Classification {
    classify_with(GlobalRules::builtin(), description, amount, user_rules)
}

fn classify_with(
    rules: &GlobalRules,
    description: &str,
    amount: f64,
    user_rules: &[LearnedRule],
) -> Classification {
    // A learned rule with an empty category is no hit
    if let Some(category) = match_user_rules(description, user_rules) {
        if !category.is_empty() {
            debug!("Learned rule matched '{}': {}", description, category);
            return Classification::new(category, LEARNED_CONFIDENCE);
        }
    }

    let result = rules.classify(description, amount);
    debug!(
        "Keyword rules classified '{}' ({}): {} ({:.2})",
        description, amount, result.category, result.confidence
    );
    result
}
