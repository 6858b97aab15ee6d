use std::fmt::Write;
use comfy_table::{Cell, CellAlignment, Color, Table, TableComponent};
use crossterm::style::{style, Stylize};
use crate::aggregate::{breakdown_by_category, spending_ratio, summarize, Summary};
use crate::chart::{self, Chart};
use crate::form::{FormController, Mode};
use crate::repository::TransactionRepository;
use crate::store::KeyValueStorage;
use crate::transaction::{Transaction, TransactionType};
use crate::util::{format_currency, format_date, MonthKey};

const EMPTY_MONTH: &str = "No transactions for selected month.";
const NO_DATA: &str = "No data";
const CHART_RADIUS: usize = 6;
const PROGRESS_WIDTH: usize = 30;
const SHORT_ID_LEN: usize = 8;

/// Everything shown for the selected month, computed from the repository.
pub(crate) struct MonthView<'a> {
    pub(crate) month: MonthKey,
    /// Most recent first
    pub(crate) rows: Vec<&'a Transaction>,
    pub(crate) monthly: Summary,
    pub(crate) all_time: Summary,
    pub(crate) spending_ratio: u8,
    pub(crate) chart: Chart,
}

impl<'a> MonthView<'a> {
    pub(crate) fn build<S: KeyValueStorage>(repo: &'a TransactionRepository<S>, month: MonthKey, currency: &str) -> MonthView<'a> {
        let monthly = summarize(repo.in_month(month));
        let all_time = summarize(repo.all());
        let breakdown = breakdown_by_category(repo.in_month(month));

        MonthView {
            month,
            rows: repo.by_month(month),
            monthly,
            all_time,
            spending_ratio: spending_ratio(monthly.income_total, monthly.expense_total),
            chart: chart::render(&breakdown, currency),
        }
    }
}

/// Render the full screen for a month: transactions, summary figures, progress bar and chart.
pub(crate) fn render(view: &MonthView, currency: &str) -> String {
    let mut out = String::new();
    let money = |amount: f64| format_currency(amount, currency);

    let _ = writeln!(out, "Transactions for {}", view.month);
    if view.rows.is_empty() {
        let _ = writeln!(out, "{EMPTY_MONTH}");
    } else {
        let _ = writeln!(out, "{}", transaction_table(&view.rows, currency));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Income:  {}", money(view.monthly.income_total));
    let _ = writeln!(out, "Expense: {}", money(view.monthly.expense_total));
    let _ = writeln!(out, "Balance: {}", money(view.monthly.balance));
    let _ = writeln!(out, "Spent    {} {}%", progress_bar(view.spending_ratio, PROGRESS_WIDTH), view.spending_ratio);
    let _ = writeln!(out, "All time: income {}, expense {}", money(view.all_time.income_total), money(view.all_time.expense_total));

    let _ = writeln!(out);
    match &view.chart {
        Chart::NoData => {
            let _ = writeln!(out, "{NO_DATA}");
        }
        Chart::Pie(pie) => {
            for row in pie.rasterize(CHART_RADIUS) {
                let mut line = String::new();
                for cell in row {
                    match cell {
                        Some(i) => {
                            let _ = write!(line, "{}", style('█').with(pie.slices[i].color.terminal()));
                        }
                        None => line.push(' '),
                    }
                }
                let _ = writeln!(out, "{}", line.trim_end());
            }
            for entry in &pie.legend {
                let _ = writeln!(out, "{} {}", style('■').with(entry.color.terminal()), entry);
            }
        }
    }

    out
}

fn transaction_table(rows: &[&Transaction], currency: &str) -> Table {
    let mut table = Table::new();
    table.remove_style(TableComponent::HorizontalLines);
    table.remove_style(TableComponent::MiddleIntersections);
    table.remove_style(TableComponent::LeftBorderIntersections);
    table.remove_style(TableComponent::RightBorderIntersections);
    table.set_header(vec!["", "ID", "Date", "Description", "Amount"]);

    for t in rows {
        let (badge, color) = match t.kind {
            TransactionType::Income => ("+", Color::Green),
            TransactionType::Expense => ("-", Color::Red),
            TransactionType::Other => ("·", Color::Grey),
        };
        table.add_row(vec![
            Cell::new(badge).fg(color),
            Cell::new(short_id(&t.id)),
            Cell::new(format_date(t.date)),
            Cell::new(describe(t)),
            Cell::new(format_currency(t.amount, currency)).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

/// Description, or a placeholder, followed by the category when there is one.
fn describe(t: &Transaction) -> String {
    let description = if t.description.is_empty() { "(no description)" } else { t.description.as_str() };
    if t.category.is_empty() {
        description.to_string()
    } else {
        format!("{description} • {}", t.category)
    }
}

fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// A bar like `███░░░░░░░` filled to `percent` of `width`.
fn progress_bar(percent: u8, width: usize) -> String {
    let filled = (usize::from(percent.min(100)) * width / 100).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Render the form with its current mode labels, field values and error message.
pub(crate) fn render_form(form: &FormController) -> String {
    let fields = form.fields();
    let mut out = String::new();
    let _ = writeln!(out, "{}", form.title());
    let _ = writeln!(out, "  type:        {}", fields.kind);
    let _ = writeln!(out, "  amount:      {}", fields.amount);
    let _ = writeln!(out, "  description: {}", fields.description);
    let _ = writeln!(out, "  category:    {}", fields.category);
    let _ = writeln!(out, "  date:        {}", fields.date);
    let _ = write!(out, "[{}]", form.submit_label());
    if let Mode::Edit(_) = form.mode() {
        let _ = write!(out, " [Cancel]");
    }
    let _ = writeln!(out);
    if let Some(error) = form.error() {
        let _ = writeln!(out, "{}", style(error).red());
    }
    out
}

#[cfg(test)]
mod tests {
    use crate::store::{MemoryStorage, Store};
    use crate::transaction::Draft;
    use crate::util::parse_date;
    use super::*;

    fn repo_with(entries: &[(TransactionType, f64, &str, &str, &str)]) -> TransactionRepository<MemoryStorage> {
        let mut repo = TransactionRepository::load(Store::new(MemoryStorage::default()));
        for (kind, amount, description, category, date) in entries {
            repo.add(Draft::new(*kind, *amount, description, category, parse_date(date).unwrap()).unwrap()).unwrap();
        }
        repo
    }

    #[test]
    fn test_month_view() {
        let repo = repo_with(&[
            (TransactionType::Income, 5000.0, "salary", "", "2024-03-01"),
            (TransactionType::Expense, 1200.0, "", "food", "2024-03-15"),
            (TransactionType::Expense, 80.0, "old", "food", "2024-02-10"),
        ]);
        let view = MonthView::build(&repo, "2024-03".parse().unwrap(), "₹");

        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0].amount, 1200.0);
        assert_eq!(view.monthly, Summary { income_total: 5000.0, expense_total: 1200.0, balance: 3800.0 });
        assert_eq!(view.all_time.expense_total, 1280.0);
        assert_eq!(view.spending_ratio, 24);

        let pie = match &view.chart {
            Chart::Pie(pie) => pie,
            Chart::NoData => panic!("Expected a chart"),
        };
        // Breakdown follows insertion order, not display order
        assert_eq!(pie.legend[0].to_string(), "INCOME • (uncategorized) — 80.6% (₹5,000.00)");
        assert_eq!(pie.legend[1].to_string(), "EXPENSE • food — 19.4% (₹1,200.00)");
    }

    #[test]
    fn test_render() {
        let repo = repo_with(&[
            (TransactionType::Income, 5000.0, "salary", "", "2024-03-01"),
            (TransactionType::Expense, 1200.0, "", "food", "2024-03-15"),
        ]);
        let view = MonthView::build(&repo, "2024-03".parse().unwrap(), "₹");
        let screen = render(&view, "₹");

        assert!(screen.contains("Transactions for 2024-03"));
        assert!(screen.contains("salary"));
        assert!(screen.contains("(no description) • food"));
        assert!(screen.contains("2024-03-15"));
        assert!(screen.contains("Balance: ₹3,800.00"));
        assert!(screen.contains("24%"));
        assert!(screen.contains("All time: income ₹5,000.00, expense ₹1,200.00"));
        assert!(screen.contains("EXPENSE • food — 19.4% (₹1,200.00)"));
        assert!(!screen.contains(EMPTY_MONTH));
        // Most recent first
        assert!(screen.find("2024-03-15").unwrap() < screen.find("2024-03-01").unwrap());
    }

    #[test]
    fn test_render_empty_month() {
        let repo = repo_with(&[(TransactionType::Income, 5000.0, "salary", "", "2024-03-01")]);
        let view = MonthView::build(&repo, "2024-04".parse().unwrap(), "$");
        let screen = render(&view, "$");

        assert!(screen.contains(EMPTY_MONTH));
        assert!(screen.contains(NO_DATA));
        assert!(screen.contains("Income:  $0.00"));
        assert!(screen.contains("All time: income $5,000.00, expense $0.00"));
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0, 10), "░░░░░░░░░░");
        assert_eq!(progress_bar(24, 10), "██░░░░░░░░");
        assert_eq!(progress_bar(100, 10), "██████████");
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("lx1"), "lx1");
    }

    #[test]
    fn test_render_form() {
        let mut form = FormController::new();
        assert!(render_form(&form).starts_with("Add Transaction"));

        let repo = repo_with(&[(TransactionType::Income, 5000.0, "salary", "", "2024-03-01")]);
        let id = repo.all()[0].id.clone();
        form.start_edit(&id, &repo);
        let screen = render_form(&form);
        assert!(screen.starts_with("Edit Transaction"));
        assert!(screen.contains("amount:      5000"));
        assert!(screen.contains("[Update] [Cancel]"));
    }
}
