use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{self, Write};

/// One row of a menu file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishRecord {
    pub restaurant_name: String,
    pub dish_name: String,
    pub category: String,
    pub price: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOrder {
    /// Restaurants in the order they first appear in the input.
    FirstSeen,
    /// Restaurants sorted by name.
    Sorted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantGroup {
    pub restaurant_name: String,
    pub dishes: Vec<DishRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuGroups {
    groups: Vec<RestaurantGroup>,
}

impl MenuGroups {
    /// Buckets records by `restaurant_name`. Dishes keep their input order inside a group.
    pub fn group(records: Vec<DishRecord>, order: GroupOrder) -> Self {
        let mut groups: Vec<RestaurantGroup> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for record in records {
            match index.get(&record.restaurant_name) {
                Some(&position) => groups[position].dishes.push(record),
                None => {
                    index.insert(record.restaurant_name.clone(), groups.len());
                    groups.push(RestaurantGroup {
                        restaurant_name: record.restaurant_name.clone(),
                        dishes: vec![record],
                    });
                }
            }
        }

        if order == GroupOrder::Sorted {
            groups.sort_by(|a, b| a.restaurant_name.cmp(&b.restaurant_name));
        }

        Self { groups }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RestaurantGroup> {
        self.groups.iter()
    }

    pub fn total_dishes(&self) -> usize {
        self.groups.iter().map(|g| g.dishes.len()).sum()
    }

    pub fn restaurant_counts(&self) -> Vec<(String, usize)> {
        self.groups
            .iter()
            .map(|g| (g.restaurant_name.clone(), g.dishes.len()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a MenuGroups {
    type Item = &'a RestaurantGroup;
    type IntoIter = std::slice::Iter<'a, RestaurantGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Primary key of a row in the remote `restaurants` table, kept exactly as the store returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestaurantId(pub serde_json::Value);

impl fmt::Display for RestaurantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            serde_json::Value::String(s) => f.write_str(s),
            other => write!(f, "{}", other),
        }
    }
}

/// Row payload for the remote `dishes` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewDish {
    pub restaurant_id: RestaurantId,
    pub name: String,
    pub category: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptReport {
    pub destination: String,
    pub restaurant_counts: Vec<(String, usize)>,
    pub total_dishes: usize,
}

impl ScriptReport {
    /// The block printed after a script has been written to a file.
    pub fn render_summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "✅ Created {}", self.destination);
        out.push_str("📊 Summary:\n");
        for (restaurant, count) in &self.restaurant_counts {
            let _ = writeln!(out, "  {}: {} dishes", restaurant, count);
        }
        let _ = writeln!(
            out,
            "\nTotal: {} dishes across {} restaurants",
            self.total_dishes,
            self.restaurant_counts.len()
        );
        out
    }

    /// One-line summary for when stdout carries the script itself.
    pub fn render_one_line(&self) -> String {
        format!(
            "✅ Generated SQL for {} dishes across {} restaurants",
            self.total_dishes,
            self.restaurant_counts.len()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncFailure {
    pub restaurant_name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub restaurants: usize,
    pub total_synced: usize,
    pub synced: Vec<(String, usize)>,
    pub failures: Vec<SyncFailure>,
}

impl SyncReport {
    /// Lists the restaurants that were not synced; empty when every group went through.
    pub fn render_failures(&self) -> String {
        let mut out = String::new();
        if self.failures.is_empty() {
            return out;
        }
        let _ = writeln!(out, "⚠️  {} restaurants were not synced:", self.failures.len());
        for failure in &self.failures {
            let _ = writeln!(out, "  {}: {}", failure.restaurant_name, failure.reason);
        }
        out.push('\n');
        out
    }

    /// Final report of a sync. The restaurant count includes groups that failed.
    pub fn render(&self) -> String {
        let mut out = self.render_failures();
        let _ = writeln!(
            out,
            "🎉 Sync complete! {} dishes synced across {} restaurants",
            self.total_synced, self.restaurants
        );
        out
    }
}
