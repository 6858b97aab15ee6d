use std::fmt;
use std::str::FromStr;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::common::ValidationError;

/// Shown in place of an empty category.
pub(crate) const UNCATEGORIZED: &str = "(uncategorized)";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub(crate) enum TransactionType {
    Income,
    Expense,
    /// Any type string written by something other than this program. Kept so the record still
    /// shows up, but never counted as income or expense.
    #[serde(other)]
    Other,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TransactionType::Income => write!(f, "income"),
            TransactionType::Expense => write!(f, "expense"),
            TransactionType::Other => write!(f, "other"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(ValidationError::UnknownType),
        }
    }
}

/// A single income or expense record, as persisted in storage.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub(crate) struct Transaction {
    pub(crate) id: String,
    #[serde(rename = "type")]
    pub(crate) kind: TransactionType,
    pub(crate) amount: f64,
    #[serde(default)]
    pub(crate) description: String,
    #[serde(default)]
    pub(crate) category: String,
    pub(crate) date: NaiveDate,
}

impl Transaction {
    pub(crate) fn new(id: String, draft: Draft) -> Transaction {
        Transaction {
            id,
            kind: draft.kind,
            amount: draft.amount,
            description: draft.description,
            category: draft.category,
            date: draft.date,
        }
    }

    /// Replace every field except `id` with the draft's values.
    pub(crate) fn apply(&mut self, draft: Draft) {
        self.kind = draft.kind;
        self.amount = draft.amount;
        self.description = draft.description;
        self.category = draft.category;
        self.date = draft.date;
    }

    pub(crate) fn category_display(&self) -> &str {
        if self.category.is_empty() {
            UNCATEGORIZED
        } else {
            self.category.as_str()
        }
    }
}

/// Validated transaction fields without an id. Only constructible through [`Draft::new`], so a
/// draft always carries a finite, positive amount.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Draft {
    kind: TransactionType,
    amount: f64,
    description: String,
    category: String,
    date: NaiveDate,
}

impl Draft {
    pub(crate) fn new(kind: TransactionType, amount: f64, description: &str, category: &str, date: NaiveDate) -> Result<Draft, ValidationError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ValidationError::InvalidAmount(amount.to_string()));
        }
        if kind == TransactionType::Other {
            return Err(ValidationError::UnknownType);
        }

        Ok(Draft {
            kind,
            amount,
            description: description.trim().to_string(),
            category: category.trim().to_string(),
            date,
        })
    }

    pub(crate) fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn category(&self) -> &str {
        &self.category
    }

    pub(crate) fn with_category(mut self, category: &str) -> Draft {
        self.category = category.trim().to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn march(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn test_transaction_serde() {
        let draft = Draft::new(TransactionType::Expense, 1200.0, "groceries", "food", march(15)).unwrap();
        let t = Transaction::new("abc123".to_string(), draft);

        let s = serde_json::to_string(&t).unwrap();
        assert_eq!(s, r#"{"id":"abc123","type":"expense","amount":1200.0,"description":"groceries","category":"food","date":"2024-03-15"}"#);

        let parsed: Transaction = serde_json::from_str(&s).unwrap();
        assert_eq!(parsed, t);
    }

    #[test]
    fn test_deserialize_lenient_fields() {
        let json = r#"{"id":"lx1","type":"income","amount":5000,"date":"2024-03-01"}"#;
        let t: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(t.kind, TransactionType::Income);
        assert_eq!(t.description, "");
        assert_eq!(t.category_display(), UNCATEGORIZED);

        let json = r#"{"id":"lx2","type":"transfer","amount":10,"description":"","category":"","date":"2024-03-01"}"#;
        let t: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(t.kind, TransactionType::Other);
    }

    #[test]
    fn test_draft_validation() {
        assert_eq!(
            Draft::new(TransactionType::Expense, -5.0, "", "", march(1)),
            Err(ValidationError::InvalidAmount("-5".to_string()))
        );
        assert!(Draft::new(TransactionType::Expense, 0.0, "", "", march(1)).is_err());
        assert!(Draft::new(TransactionType::Expense, f64::NAN, "", "", march(1)).is_err());
        assert!(Draft::new(TransactionType::Expense, f64::INFINITY, "", "", march(1)).is_err());
        assert_eq!(Draft::new(TransactionType::Other, 1.0, "", "", march(1)), Err(ValidationError::UnknownType));

        let draft = Draft::new(TransactionType::Income, 0.01, "  salary ", " work ", march(1)).unwrap();
        assert_eq!(draft.description(), "salary");
        assert_eq!(draft.category(), "work");
    }

    #[test]
    fn test_apply_keeps_id() {
        let draft = Draft::new(TransactionType::Expense, 10.0, "coffee", "", march(2)).unwrap();
        let mut t = Transaction::new("keep-me".to_string(), draft);
        let replacement = Draft::new(TransactionType::Income, 20.0, "refund", "misc", march(3)).unwrap();
        t.apply(replacement);

        assert_eq!(t.id, "keep-me");
        assert_eq!(t.kind, TransactionType::Income);
        assert_eq!(t.amount, 20.0);
        assert_eq!(t.description, "refund");
        assert_eq!(t.category, "misc");
        assert_eq!(t.date, march(3));
    }

    #[test]
    fn test_transaction_type_from_str() {
        assert_eq!("Income".parse::<TransactionType>(), Ok(TransactionType::Income));
        assert_eq!(" expense".parse::<TransactionType>(), Ok(TransactionType::Expense));
        assert_eq!("transfer".parse::<TransactionType>(), Err(ValidationError::UnknownType));
    }
}
