use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt;
use crossterm::style::Color;
use crate::aggregate::Breakdown;
use crate::transaction::TransactionType;
use crate::util::format_currency;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ChartColor {
    rgb: (u8, u8, u8),
}

impl ChartColor {
    const fn new(r: u8, g: u8, b: u8) -> ChartColor {
        ChartColor { rgb: (r, g, b) }
    }

    pub(crate) fn terminal(&self) -> Color {
        let (r, g, b) = self.rgb;
        Color::Rgb { r, g, b }
    }
}

// #2ecc71, #e74c3c and #9ca3af
pub(crate) const INCOME_COLOR: ChartColor = ChartColor::new(0x2e, 0xcc, 0x71);
pub(crate) const EXPENSE_COLOR: ChartColor = ChartColor::new(0xe7, 0x4c, 0x3c);
pub(crate) const NEUTRAL_COLOR: ChartColor = ChartColor::new(0x9c, 0xa3, 0xaf);

/// Slice color depends on the transaction type only.
pub(crate) fn color_of(kind: TransactionType) -> ChartColor {
    match kind {
        TransactionType::Income => INCOME_COLOR,
        TransactionType::Expense => EXPENSE_COLOR,
        TransactionType::Other => NEUTRAL_COLOR,
    }
}

/// One pie slice. Angles are in radians, clockwise, with -π/2 pointing straight up.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Slice {
    pub(crate) start_angle: f64,
    pub(crate) end_angle: f64,
    pub(crate) color: ChartColor,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LegendEntry {
    pub(crate) type_label: String,
    pub(crate) category: String,
    /// Percentage with one decimal place, without the `%` sign.
    pub(crate) percent: String,
    pub(crate) amount: String,
    pub(crate) color: ChartColor,
}

impl fmt::Display for LegendEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} • {} — {}% ({})", self.type_label, self.category, self.percent, self.amount)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Chart {
    /// Nothing to draw for the selected month.
    NoData,
    Pie(PieChart),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PieChart {
    pub(crate) slices: Vec<Slice>,
    pub(crate) legend: Vec<LegendEntry>,
}

/// Lay out one slice and one legend entry per breakdown group, in breakdown order.
pub(crate) fn render(breakdown: &Breakdown, currency: &str) -> Chart {
    if breakdown.is_empty() {
        return Chart::NoData;
    }

    let mut slices = Vec::with_capacity(breakdown.groups.len());
    let mut legend = Vec::with_capacity(breakdown.groups.len());
    let mut start = -FRAC_PI_2;

    for group in &breakdown.groups {
        let color = color_of(group.kind);
        let end = start + group.amount / breakdown.total * TAU;
        slices.push(Slice { start_angle: start, end_angle: end, color });
        legend.push(LegendEntry {
            type_label: group.kind.to_string().to_uppercase(),
            category: group.category.clone(),
            percent: format!("{:.1}", round_half_up(group.percent)),
            amount: format_currency(group.amount, currency),
            color,
        });
        start = end;
    }

    Chart::Pie(PieChart { slices, legend })
}

/// One decimal, with ties rounded away from zero (`0.25` shows as `0.3`).
fn round_half_up(percent: f64) -> f64 {
    (percent * 10.0).round() / 10.0
}

impl PieChart {
    /// Index of the slice covering `angle`, which may be any value in radians.
    pub(crate) fn slice_at(&self, angle: f64) -> Option<usize> {
        // Bring the angle into [-π/2, 3π/2) where the slices live
        let angle = (angle + FRAC_PI_2).rem_euclid(TAU) - FRAC_PI_2;
        self.slices.iter()
            .position(|s| angle >= s.start_angle && angle < s.end_angle)
            // Rounding can leave a sliver just before 3π/2 uncovered
            .or_else(|| self.slices.len().checked_sub(1))
    }

    /// Rasterise the pie onto a character grid of `2 * radius + 1` rows. Each row is twice as
    /// wide as it is tall, since terminal cells are roughly twice as tall as they are wide.
    /// A cell holds the index of the slice it belongs to, `None` outside the circle.
    pub(crate) fn rasterize(&self, radius: usize) -> Vec<Vec<Option<usize>>> {
        let r = radius as f64;
        let rows = 2 * radius + 1;
        let cols = 4 * radius + 1;

        (0..rows).map(|row| {
            (0..cols).map(|col| {
                let dx = (col as f64 - 2.0 * r) / 2.0;
                let dy = row as f64 - r;
                if dx * dx + dy * dy > r * r {
                    None
                } else {
                    // y grows downwards, so atan2 already runs clockwise
                    self.slice_at(dy.atan2(dx))
                }
            }).collect()
        }).collect()
    }
}
