use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use geoclima_cli::types::{ApplyPlan, BucketOutcome, PeriodRow, ReplayOutcome};
use geoclima_config::TableIssue;
use geoclima_model::{Effect, UpdateInstruction, ValidationResult, WidgetId};

pub fn print_periods(widget: WidgetId, rows: &[PeriodRow], issues: &[TableIssue]) {
    println!("Picker: {widget}");
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Key"),
        header_cell("Label"),
        header_cell("Min days"),
        header_cell("Max days"),
        header_cell("Default"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.key)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&row.label),
            Cell::new(row.min),
            Cell::new(row.max),
            if row.is_default {
                Cell::new("✓")
                    .fg(Color::Green)
                    .add_attribute(Attribute::Bold)
            } else {
                dim_cell("-")
            },
        ]);
    }
    println!("{table}");
    if issues.is_empty() {
        return;
    }
    println!();
    println!("Issues:");
    for issue in issues {
        println!("- {issue}");
    }
}

pub fn print_bucket(outcome: &BucketOutcome) {
    let period = match &outcome.period {
        Some(key) => key.to_string(),
        None => "none".to_string(),
    };
    println!(
        "{} .. {}: {} days -> period {period}",
        outcome.from, outcome.to, outcome.span_days
    );
}

pub fn print_validation(result: &ValidationResult) {
    match result.error_message {
        None => println!("valid"),
        Some(kind) => println!("invalid: {kind} ({})", kind.message_key()),
    }
}

pub fn print_plan(plan: &ApplyPlan) {
    let period = plan
        .period
        .as_ref()
        .map_or_else(|| "-".to_string(), ToString::to_string);
    println!(
        "Range: {} .. {} (period {period})",
        plan.from_formatted, plan.to_formatted
    );
    if plan.instructions.is_empty() {
        println!("No catalogued layer carries a map file; nothing to update.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Instruction"),
        header_cell("Layer"),
        header_cell("Map"),
        header_cell("From"),
        header_cell("To"),
    ]);
    apply_wide_table_style(&mut table);
    for instruction in &plan.instructions {
        let (kind, layer, params) = match instruction {
            UpdateInstruction::UpdateSettings { params } => ("settings", None, params),
            UpdateInstruction::UpdateNode { layer_id, patch } => {
                ("node", Some(layer_id.as_str()), &patch.params)
            }
        };
        table.add_row(vec![
            Cell::new(kind),
            layer.map_or_else(|| dim_cell("-"), Cell::new),
            optional_cell(params.map.as_deref()),
            optional_cell(params.from_data.as_deref()),
            optional_cell(params.to_data.as_deref()),
        ]);
    }
    println!("{table}");
}

pub fn print_replay(outcome: &ReplayOutcome) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Step"),
        header_cell("Action"),
        header_cell("Effect"),
        header_cell("Detail"),
    ]);
    apply_wide_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (index, step) in outcome.steps.iter().enumerate() {
        if step.effects.is_empty() {
            table.add_row(vec![
                Cell::new(index + 1),
                Cell::new(step.action),
                dim_cell("-"),
                dim_cell(""),
            ]);
            continue;
        }
        for (position, effect) in step.effects.iter().enumerate() {
            let (step_cell, action_cell) = if position == 0 {
                (Cell::new(index + 1), Cell::new(step.action))
            } else {
                (dim_cell(""), dim_cell(""))
            };
            table.add_row(vec![
                step_cell,
                action_cell,
                effect_cell(effect),
                Cell::new(effect_detail(effect)),
            ]);
        }
    }
    println!("{table}");
    println!("{} effects over {} actions", outcome.effect_count(), outcome.steps.len());
}

fn effect_cell(effect: &Effect) -> Cell {
    let cell = Cell::new(effect.name());
    match effect {
        Effect::AlertRaised { .. } => cell.fg(Color::Red).add_attribute(Attribute::Bold),
        Effect::AlertCleared { .. } => cell.fg(Color::Green),
        Effect::RangeApplied { .. } => cell.fg(Color::Cyan).add_attribute(Attribute::Bold),
        Effect::FetchBounds { .. } => cell.fg(Color::Yellow),
        Effect::Update { .. } | Effect::RangeChanged { .. } => cell,
    }
}

fn effect_detail(effect: &Effect) -> String {
    match effect {
        Effect::FetchBounds { request } => format!(
            "{} for {} (ticket {})",
            request.variable, request.widget, request.ticket
        ),
        Effect::Update { instruction } => match instruction {
            UpdateInstruction::UpdateSettings { params } => {
                format!("settings map={}", params.map.as_deref().unwrap_or("-"))
            }
            UpdateInstruction::UpdateNode { layer_id, patch } => format!(
                "{layer_id} map={}",
                patch.params.map.as_deref().unwrap_or("-")
            ),
        },
        Effect::RangeApplied {
            map_file_name,
            from_formatted,
            to_formatted,
            layer_ids,
            ..
        } => format!(
            "{map_file_name} {from_formatted}..{to_formatted} [{}]",
            layer_ids.join(", ")
        ),
        Effect::AlertRaised {
            widget,
            message_key,
            ..
        } => format!("{widget}: {message_key}"),
        Effect::AlertCleared { widget } => widget.to_string(),
        Effect::RangeChanged {
            widget,
            from,
            to,
            period_key,
        } => {
            let from = from.map_or_else(|| "-".to_string(), |date| date.to_string());
            match period_key {
                Some(key) => format!("{widget}: {from}..{to} period {key}"),
                None => format!("{widget}: {from}..{to}"),
            }
        }
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn apply_wide_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn optional_cell(value: Option<&str>) -> Cell {
    value.map_or_else(|| dim_cell("-"), Cell::new)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
