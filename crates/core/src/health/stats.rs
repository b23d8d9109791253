use indexmap::IndexMap;
use serde::Serialize;

use super::overview::OverviewRow;

/// Aggregated health figures for the overview dashboard.
///
/// Count tables keep first-seen order, so "most common" ties resolve to the
/// condition or blood type encountered first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthStats {
    pub total_members: usize,
    /// Members having each condition key.
    pub condition_counts: IndexMap<String, usize>,
    /// Members having each recorded blood type.
    pub blood_type_counts: IndexMap<String, usize>,
    /// Display label of the most common condition, or `"None"`.
    pub most_common_condition: String,
    /// Most common blood type, or `"Unknown"`.
    pub most_common_blood_type: String,
}

impl HealthStats {
    pub fn compute(rows: &[OverviewRow]) -> Self {
        let mut condition_counts: IndexMap<String, usize> = IndexMap::new();
        let mut blood_type_counts: IndexMap<String, usize> = IndexMap::new();

        for row in rows {
            // A condition listed twice on one member still counts once.
            for (i, condition) in row.conditions.iter().enumerate() {
                if !row.conditions[..i].contains(condition) {
                    *condition_counts.entry(condition.clone()).or_insert(0) += 1;
                }
            }
            if let Some(blood_type) = row.blood_type.as_deref().filter(|b| !b.is_empty()) {
                *blood_type_counts.entry(blood_type.to_string()).or_insert(0) += 1;
            }
        }

        let most_common_condition = most_common(&condition_counts)
            .map(condition_label)
            .unwrap_or_else(|| "None".to_string());
        let most_common_blood_type = most_common(&blood_type_counts)
            .map(str::to_string)
            .unwrap_or_else(|| "Unknown".to_string());

        log::debug!(
            "Health stats: {} members, {} conditions, {} blood types",
            rows.len(),
            condition_counts.len(),
            blood_type_counts.len()
        );

        Self {
            total_members: rows.len(),
            condition_counts,
            blood_type_counts,
            most_common_condition,
            most_common_blood_type,
        }
    }

    /// Unique condition keys in first-seen order.
    pub fn conditions(&self) -> Vec<&str> {
        self.condition_counts.keys().map(String::as_str).collect()
    }

    pub fn unique_conditions(&self) -> usize {
        self.condition_counts.len()
    }

    /// Share of members having `condition`, in `[0, 1]`. Zero for an empty
    /// overview or an unknown condition.
    pub fn condition_prevalence(&self, condition: &str) -> f64 {
        if self.total_members == 0 {
            return 0.0;
        }
        let count = self.condition_counts.get(condition).copied().unwrap_or(0);
        count as f64 / self.total_members as f64
    }
}

/// Key with the strictly highest count; the earliest key wins ties.
fn most_common(counts: &IndexMap<String, usize>) -> Option<&str> {
    let mut best: Option<(&str, usize)> = None;
    for (key, &count) in counts {
        if best.map_or(true, |(_, max)| count > max) {
            best = Some((key.as_str(), count));
        }
    }
    best.map(|(key, _)| key)
}

/// Turn a camelCase condition key into a display label:
/// `heartDisease` becomes `Heart Disease`.
pub fn condition_label(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_uppercase() {
            spaced.push(' ');
        }
        spaced.push(ch);
    }

    let trimmed = spaced.trim_start();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
