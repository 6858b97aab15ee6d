use std::path::Path;
use anyhow::Context;
use csv::WriterBuilder;
use log::info;
use crate::transaction::Transaction;

/// Export transactions to a CSV file, oldest first. Returns how many were written.
pub(crate) fn execute_export(transactions: &[Transaction], file_path: &Path) -> anyhow::Result<usize> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by_key(|t| t.date);

    let mut csv_writer = WriterBuilder::new().has_headers(true).from_path(file_path)
        .with_context(|| format!("Unable to create {}", file_path.display()))?;
    for t in &sorted {
        csv_writer.serialize(t)?;
    }
    csv_writer.flush()?;

    info!("Exported {} transactions to {}", sorted.len(), file_path.display());
    Ok(sorted.len())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use crate::transaction::{Draft, TransactionType};
    use crate::util::parse_date;
    use super::*;

    fn transaction(id: &str, kind: TransactionType, amount: f64, description: &str, category: &str, date: &str) -> Transaction {
        Transaction::new(id.into(), Draft::new(kind, amount, description, category, parse_date(date).unwrap()).unwrap())
    }

    #[test]
    fn test_export_sorted_by_date() {
        let transactions = vec![
            transaction("b", TransactionType::Expense, 1200.0, "weekly shop", "food", "2024-03-15"),
            transaction("a", TransactionType::Income, 5000.0, "", "", "2024-03-01"),
        ];
        let path = std::env::temp_dir().join(format!("expense-export-{}.csv", uuid::Uuid::new_v4()));

        assert_eq!(execute_export(&transactions, &path).unwrap(), 2);

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec![
            "id,type,amount,description,category,date",
            "a,income,5000.0,,,2024-03-01",
            "b,expense,1200.0,weekly shop,food,2024-03-15",
        ]);
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_export_bad_path() {
        let path = std::env::temp_dir().join("missing-dir-for-export").join("out.csv");
        assert!(execute_export(&[], &path).is_err());
    }
}
