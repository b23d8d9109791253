use std::cmp::Ordering;

use serde::Serialize;

use crate::family::{resolve_generations, FamilyTree};

/// One row of the health overview table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverviewRow {
    pub id: String,
    pub full_name: String,
    pub generation: u32,
    pub blood_type: Option<String>,
    pub conditions: Vec<String>,
}

impl OverviewRow {
    pub fn has_condition(&self, condition: &str) -> bool {
        self.conditions.iter().any(|c| c == condition)
    }
}

/// Build overview rows for every member of `tree`, in input order.
pub fn overview_rows(tree: &FamilyTree) -> Vec<OverviewRow> {
    let generations = resolve_generations(tree);
    tree.members()
        .iter()
        .enumerate()
        .map(|(i, m)| OverviewRow {
            id: m.id.clone(),
            full_name: m.full_name(),
            generation: generations.at(i),
            blood_type: m.blood_type.clone(),
            conditions: m.medical_conditions.clone(),
        })
        .collect()
}

/// Column the overview table is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Name,
    #[default]
    Generation,
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "generation" | "gen" => Ok(SortKey::Generation),
            other => Err(format!(
                "Unknown sort key '{}'. Use 'name' or 'generation'.",
                other
            )),
        }
    }
}

/// Filter and sort settings for the overview table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewQuery {
    /// Keep only members having this exact condition key.
    pub condition: Option<String>,
    /// Keep only members whose full name contains this text (any case).
    pub search: Option<String>,
    pub sort: SortKey,
    pub ascending: bool,
}

impl Default for OverviewQuery {
    fn default() -> Self {
        Self {
            condition: None,
            search: None,
            sort: SortKey::Generation,
            ascending: true,
        }
    }
}

impl OverviewQuery {
    /// Apply the filters, then a stable sort, returning the visible rows.
    /// Rows with equal keys keep their input order in either direction.
    pub fn apply(&self, rows: &[OverviewRow]) -> Vec<OverviewRow> {
        // Blank search text disables the filter; otherwise it is matched
        // as typed, surrounding spaces included.
        let needle = self
            .search
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::to_lowercase);

        let mut visible: Vec<OverviewRow> = rows
            .iter()
            .filter(|r| {
                self.condition
                    .as_deref()
                    .map_or(true, |c| r.has_condition(c))
            })
            .filter(|r| {
                needle
                    .as_deref()
                    .map_or(true, |n| r.full_name.to_lowercase().contains(n))
            })
            .cloned()
            .collect();

        let ascending = self.ascending;
        let directed = |o: Ordering| if ascending { o } else { o.reverse() };
        match self.sort {
            SortKey::Generation => {
                visible.sort_by(|a, b| directed(a.generation.cmp(&b.generation)))
            }
            SortKey::Name => visible.sort_by(|a, b| {
                directed(a.full_name.to_lowercase().cmp(&b.full_name.to_lowercase()))
            }),
        }

        visible
    }
}
