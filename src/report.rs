//! Report
//!
//! Renders a [`CostingResult`] as terminal tables: tiers, ingredients, decorations and labor,
//! followed by a summary of subtotals and prices and any warnings.

use std::{fmt::Write as _, io, time::Duration};

use humanize_duration::{Truncate, prelude::DurationExt};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    costing::{CostingError, CostingResult, TierCosting, to_money},
    geometry::TierSize,
};

/// Errors that can occur when writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// An amount could not be shown as money.
    #[error(transparent)]
    Costing(#[from] CostingError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Writes the full report for a costing result.
///
/// # Errors
///
/// Returns a [`ReportError`] if writing fails or a line amount cannot be shown as money.
pub fn write_report(result: &CostingResult, mut out: impl io::Write) -> Result<(), ReportError> {
    write_table(&mut out, tier_table(result), &[2, 3, 5])?;
    write_table(&mut out, ingredient_table(result)?, &[1, 2, 3])?;

    if !result.decorations().is_empty() {
        write_table(&mut out, decoration_table(result)?, &[2, 3, 4])?;
    }

    if !result.labor().is_empty() {
        write_table(&mut out, labor_table(result)?, &[1, 2, 3])?;
    }

    write_summary(&mut out, result)?;
    write_warnings(&mut out, result)
}

fn tier_table(result: &CostingResult) -> Builder {
    let mut builder = Builder::default();

    builder.push_record(["", "Size", "Volume", "Servings", "Recipes", "Assembly"]);

    for tier in result.tiers() {
        builder.push_record([
            format!("#{:<3}", tier.index + 1),
            tier.size.map_or_else(String::new, |size| size_label(&size)),
            format!("{} ml", tier.volume_ml.normalize()),
            tier.servings.to_string(),
            recipe_lines(tier),
            minutes_label(tier.assembly_minutes),
        ]);
    }

    builder
}

fn ingredient_table(result: &CostingResult) -> Result<Builder, ReportError> {
    let mut builder = Builder::default();
    let currency = result.currency();

    builder.push_record(["Ingredient", "Quantity", "Unit Cost", "Cost"]);

    for line in result.ingredients() {
        builder.push_record([
            line.name.clone(),
            format!("{} {}", line.quantity.round_dp(2).normalize(), line.unit),
            format!("{}", line.cost_per_unit.normalize()),
            money_label(line.cost, currency)?,
        ]);
    }

    Ok(builder)
}

fn decoration_table(result: &CostingResult) -> Result<Builder, ReportError> {
    let mut builder = Builder::default();
    let currency = result.currency();

    builder.push_record(["Decoration", "Unit", "Quantity", "Materials", "Labor"]);

    for line in result.decorations() {
        builder.push_record([
            format!("{}\n{}", line.name, line.category),
            line.unit.as_str().to_string(),
            line.quantity_multiplier.normalize().to_string(),
            money_label(line.material_cost, currency)?,
            format!(
                "{}\n{}",
                money_label(line.labor_cost, currency)?,
                minutes_label(line.labor_minutes)
            ),
        ]);
    }

    Ok(builder)
}

fn labor_table(result: &CostingResult) -> Result<Builder, ReportError> {
    let mut builder = Builder::default();
    let currency = result.currency();

    builder.push_record(["Role", "Time", "Rate", "Cost"]);

    for line in result.labor() {
        builder.push_record([
            line.role.clone(),
            minutes_label(line.minutes),
            format!("{}/h", money_label(line.hourly_rate, currency)?),
            money_label(line.cost, currency)?,
        ]);
    }

    Ok(builder)
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    numeric_columns: &[usize],
) -> Result<(), ReportError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(
        1,
        HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
    );

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);

    for &column in numeric_columns {
        table.modify(Columns::new(column..column + 1), Alignment::right());
    }

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}").map_err(|_err| ReportError::IO)
}

fn write_summary(out: &mut impl io::Write, result: &CostingResult) -> Result<(), ReportError> {
    let markup_points = (result.markup() * Decimal::ONE * Decimal::ONE_HUNDRED)
        .round_dp(2)
        .normalize();

    let rows = [
        (" Ingredients:", format!("{}", result.ingredient_cost())),
        (
            " Decoration materials:",
            format!("{}", result.decoration_material_cost()),
        ),
        (" Topper:", format!("{}", result.topper_cost())),
        (" Labor:", format!("{}", result.total_labor_cost())),
        (
            " Cost before delivery:",
            format!("{}", result.total_cost_before_delivery()),
        ),
        (
            " Suggested price:",
            format!("({markup_points}%) {}", result.suggested_price()),
        ),
        (" Discount:", format!("-{}", result.discount_amount())),
        (" Delivery:", format!("{}", result.delivery_cost())),
    ];

    let final_label = " \x1b[1mFinal price:\x1b[0m";
    let final_value = format!("{}", result.final_price());
    let per_serving = format!(
        "{} cost, {} price ({} servings)",
        result.cost_per_serving(),
        result.suggested_price_per_serving(),
        result.total_servings()
    );

    let label_width = rows
        .iter()
        .map(|(label, _)| visible_width(label))
        .chain([visible_width(final_label)])
        .max()
        .unwrap_or_default();

    let value_width = rows
        .iter()
        .map(|(_, value)| value.len())
        .chain([final_value.len()])
        .max()
        .unwrap_or_default();

    writeln!(out).map_err(|_err| ReportError::IO)?;

    for (label, value) in &rows {
        write_summary_line(out, label, value, label_width, value_width)?;
    }

    write_summary_line(
        out,
        final_label,
        &format!("\x1b[1m{final_value}\x1b[0m"),
        label_width,
        value_width,
    )?;

    writeln!(out, "\n {per_serving}").map_err(|_err| ReportError::IO)
}

fn write_warnings(out: &mut impl io::Write, result: &CostingResult) -> Result<(), ReportError> {
    if result.warnings().is_empty() {
        return Ok(());
    }

    writeln!(out, "\n \x1b[33mWarnings:\x1b[0m").map_err(|_err| ReportError::IO)?;

    for warning in result.warnings() {
        writeln!(out, "  - {warning}").map_err(|_err| ReportError::IO)?;
    }

    writeln!(out).map_err(|_err| ReportError::IO)
}

fn money_label(amount: Decimal, currency: &'static Currency) -> Result<String, ReportError> {
    let money: Money<'static, Currency> = to_money(amount, currency)?;

    Ok(format!("{money}"))
}

fn size_label(size: &TierSize) -> String {
    match size.length_in {
        Some(length) => format!("{}x{}\" {}", size.diameter_in, length, size.shape),
        None => format!("{}\" {}", size.diameter_in, size.shape),
    }
}

fn recipe_lines(tier: &TierCosting) -> String {
    let mut lines = String::new();

    for recipe in &tier.recipes {
        if !lines.is_empty() {
            lines.push('\n');
        }

        _ = write!(lines, "{} x{}", recipe.name, recipe.multiplier.normalize());
    }

    lines
}

/// Formats labor minutes as a human-readable duration, to the second.
fn minutes_label(minutes: Decimal) -> String {
    let seconds = (minutes * Decimal::from(60))
        .round()
        .to_u64()
        .unwrap_or_default();

    format!("{}", Duration::from_secs(seconds).human(Truncate::Nano))
}

/// Wraps runs of UTF-8 box-drawing characters in ANSI dark-grey escape codes.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char && !in_run {
            out.push_str("\x1b[90m");
            in_run = true;
        } else if !box_char && in_run {
            out.push_str("\x1b[0m");
            in_run = false;
        }

        out.push(ch);
    }

    if in_run {
        out.push_str("\x1b[0m");
    }

    out
}

/// Returns the visible (non-ANSI) width of a string.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            if ch.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

/// Writes a summary line with a right-aligned label and a fixed-width value column.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), ReportError> {
    let label_pad = label_col_width.saturating_sub(visible_width(label));
    let value_pad = value_col_width.saturating_sub(visible_width(value));

    writeln!(
        out,
        "{:>label_pad$}{label}  {value_pad}{value}",
        "",
        value_pad = " ".repeat(value_pad)
    )
    .map_err(|_err| ReportError::IO)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        catalog::{CostingCatalog, Ingredient, Recipe, RecipeKind},
        costing::calculate_cost,
        geometry::Shape,
        settings::CostingSettings,
        snapshot::{CostingInput, Tier},
    };

    use super::*;

    fn result() -> Result<CostingResult, CostingError> {
        let mut catalog = CostingCatalog::default();
        let flour = catalog.add_ingredient(Ingredient::new("Flour", "g", Decimal::new(2, 2)));

        catalog.add_recipe(
            Recipe::new("Vanilla Batter", RecipeKind::Batter)
                .with_yield_ml(Decimal::new(6000, 0))
                .with_line(flour, Decimal::new(1500, 0)),
        );

        let input = CostingInput {
            tiers: vec![Tier::new(0, 24).with_size_name("8\" round")],
            ..CostingInput::default()
        };

        calculate_cost(&input, &catalog, &CostingSettings::default())
    }

    #[test]
    fn report_lists_ingredients_and_final_price() -> TestResult {
        let mut out = Vec::new();

        write_report(&result()?, &mut out)?;

        let report = String::from_utf8(out)?;

        assert!(report.contains("Vanilla Batter x1.03"));
        assert!(report.contains("Flour"));
        assert!(report.contains("$30.90"));
        assert!(report.contains("Final price:"));
        assert!(!report.contains("Warnings:"));

        Ok(())
    }

    #[test]
    fn sizes_show_length_when_present() {
        assert_eq!(
            size_label(&TierSize::with_length(Shape::Rectangle, 9.0, 13.0)),
            "9x13\" rectangle"
        );
        assert_eq!(size_label(&TierSize::new(Shape::Round, 8.0)), "8\" round");
    }

    #[test]
    fn colorize_borders_wraps_box_drawing_runs() {
        assert_eq!(colorize_borders("─x"), "\x1b[90m─\x1b[0mx");
    }
}
