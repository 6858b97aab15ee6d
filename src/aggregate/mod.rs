use std::collections::HashMap;
use std::ops::Add;
use crate::transaction::{Transaction, TransactionType};

/// Income, expense and balance over a set of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct Summary {
    pub(crate) income_total: f64,
    pub(crate) expense_total: f64,
    pub(crate) balance: f64,
}

impl Summary {
    fn new(income_total: f64, expense_total: f64) -> Summary {
        Summary { income_total, expense_total, balance: income_total - expense_total }
    }
}

/// Summaries of disjoint sets add up to the summary of their union.
impl Add for Summary {
    type Output = Summary;

    fn add(self, rhs: Summary) -> Summary {
        Summary::new(self.income_total + rhs.income_total, self.expense_total + rhs.expense_total)
    }
}

pub(crate) fn summarize<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Summary {
    let (mut income, mut expense) = (0.0, 0.0);
    for t in transactions {
        match t.kind {
            TransactionType::Income => income += t.amount,
            TransactionType::Expense => expense += t.amount,
            TransactionType::Other => {}
        }
    }
    Summary::new(income, expense)
}

/// How much of the income has been spent, as a whole percentage capped at 100. With no income,
/// any spending at all counts as 100.
pub(crate) fn spending_ratio(income_total: f64, expense_total: f64) -> u8 {
    if income_total > 0.0 {
        (expense_total / income_total * 100.0).round().clamp(0.0, 100.0) as u8
    } else if expense_total > 0.0 {
        100
    } else {
        0
    }
}

/// Summed amount of one (type, category) group.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CategoryGroup {
    pub(crate) kind: TransactionType,
    /// Category as displayed, `(uncategorized)` when empty.
    pub(crate) category: String,
    pub(crate) amount: f64,
    /// Share of the breakdown total, 0 to 100.
    pub(crate) percent: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct Breakdown {
    pub(crate) groups: Vec<CategoryGroup>,
    pub(crate) total: f64,
}

impl Breakdown {
    /// True when there is nothing to chart.
    pub(crate) fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Group transactions by (type, category) in the order each group is first seen.
pub(crate) fn breakdown_by_category<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Breakdown {
    let mut groups: Vec<CategoryGroup> = vec![];
    let mut index: HashMap<(TransactionType, &str), usize> = HashMap::new();

    for t in transactions {
        let category = t.category_display();
        let i = *index.entry((t.kind, category)).or_insert_with(|| {
            groups.push(CategoryGroup { kind: t.kind, category: category.to_string(), amount: 0.0, percent: 0.0 });
            groups.len() - 1
        });
        groups[i].amount += t.amount;
    }

    let total: f64 = groups.iter().map(|g| g.amount).sum();
    if groups.is_empty() || total <= 0.0 {
        return Breakdown::default();
    }

    for g in groups.iter_mut() {
        g.percent = g.amount / total * 100.0;
    }

    Breakdown { groups, total }
}
