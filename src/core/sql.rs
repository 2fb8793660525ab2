use crate::domain::model::{DishRecord, GroupOrder, MenuGroups, RestaurantGroup};
use std::fmt::Write;

pub const DEFAULT_VERIFICATION_EXCLUDES: [&str; 2] =
    ["Bangkok Cuisine", "Vineyard Caribbean Cuisine"];

const INSERT_HEADER: &str = "INSERT INTO dishes (restaurant_id, name, category, price) VALUES";

/// Shape of a generated script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptFlavor {
    /// Insert-only script over sorted groups, followed by a dish-count query.
    Append { verification_excludes: Vec<String> },
    /// Delete-then-insert per restaurant, in input order.
    Replace { source_name: String },
}

impl ScriptFlavor {
    pub fn group_order(&self) -> GroupOrder {
        match self {
            ScriptFlavor::Append { .. } => GroupOrder::Sorted,
            ScriptFlavor::Replace { .. } => GroupOrder::FirstSeen,
        }
    }
}

pub fn escape_sql_string(s: &str) -> String {
    s.replace('\'', "''")
}

/// Text placed after `--` must stay on one line, or the rest of it becomes SQL.
fn comment_text(s: &str) -> String {
    s.replace(['\r', '\n'], " ")
}

fn restaurant_lookup(restaurant_name: &str) -> String {
    format!(
        "(SELECT id FROM restaurants WHERE name = '{}')",
        escape_sql_string(restaurant_name)
    )
}

fn dish_row(lookup: &str, dish: &DishRecord) -> String {
    format!(
        "({}, '{}', '{}', {})",
        lookup,
        escape_sql_string(&dish.dish_name),
        escape_sql_string(&dish.category),
        dish.price
    )
}

fn write_insert(out: &mut String, group: &RestaurantGroup) {
    let lookup = restaurant_lookup(&group.restaurant_name);
    let _ = writeln!(out, "{}", INSERT_HEADER);
    let last = group.dishes.len().saturating_sub(1);
    for (i, dish) in group.dishes.iter().enumerate() {
        let terminator = if i < last { ',' } else { ';' };
        let _ = writeln!(out, "{}{}", dish_row(&lookup, dish), terminator);
    }
}

fn write_verification(out: &mut String, excludes: &[String]) {
    out.push_str("-- Verify all dishes were added\n");
    out.push_str("SELECT\n");
    out.push_str("  r.name as restaurant,\n");
    out.push_str("  COUNT(d.id) as dish_count\n");
    out.push_str("FROM restaurants r\n");
    out.push_str("LEFT JOIN dishes d ON r.id = d.restaurant_id\n");
    if !excludes.is_empty() {
        let names: Vec<String> = excludes
            .iter()
            .map(|name| format!("'{}'", escape_sql_string(name)))
            .collect();
        let _ = writeln!(out, "WHERE r.name NOT IN ({})", names.join(", "));
    }
    out.push_str("GROUP BY r.name\n");
    out.push_str("ORDER BY dish_count DESC, r.name;\n");
}

fn render_append(groups: &MenuGroups, excludes: &[String]) -> String {
    let mut out = String::new();
    out.push_str("-- Import Full Restaurant Menus\n");
    out.push_str("-- Run this in Supabase SQL Editor\n\n");
    out.push_str(
        "-- IMPORTANT: This will ADD to existing dishes. Run delete-old-dishes.sql first if needed.\n\n",
    );

    for group in groups {
        let _ = writeln!(
            out,
            "-- {} ({} dishes)",
            comment_text(&group.restaurant_name),
            group.dishes.len()
        );
        write_insert(&mut out, group);
        out.push('\n');
    }

    write_verification(&mut out, excludes);
    out
}

fn render_replace(groups: &MenuGroups, source_name: &str) -> String {
    let mut out = String::new();
    out.push_str("-- Bulk Import Script\n");
    let _ = writeln!(out, "-- Generated from {}", comment_text(source_name));
    let _ = writeln!(out, "-- Total dishes: {}", groups.total_dishes());
    out.push('\n');
    let _ = writeln!(out, "-- Found {} restaurants", groups.len());
    out.push('\n');

    for group in groups {
        let _ = writeln!(
            out,
            "-- {} ({} dishes)",
            comment_text(&group.restaurant_name),
            group.dishes.len()
        );
        out.push_str("DELETE FROM dishes\n");
        let _ = writeln!(
            out,
            "WHERE restaurant_id = {};",
            restaurant_lookup(&group.restaurant_name)
        );
        out.push('\n');
        write_insert(&mut out, group);
        out.push_str("\n\n");
    }

    out
}

pub fn render_script(flavor: &ScriptFlavor, groups: &MenuGroups) -> String {
    match flavor {
        ScriptFlavor::Append {
            verification_excludes,
        } => render_append(groups, verification_excludes),
        ScriptFlavor::Replace { source_name } => render_replace(groups, source_name),
    }
}
