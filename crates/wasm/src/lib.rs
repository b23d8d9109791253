//! TreeTrace browser module.
//!
//! JSON-in/JSON-out wrappers over `treetrace-core` for the web client.
//! Inputs are the member documents returned by the family-members endpoint,
//! either as a bare array or wrapped in `{ "data": [...] }`. No file I/O.

use serde::{Deserialize, Serialize};

use treetrace_core::family::{FamilyStats, FamilyTree};
use treetrace_core::health::{overview_rows, HealthStats, OverviewRow};
use treetrace_core::{max_generation_depth, resolve_generations};

/// Generation assigned to one member.
#[derive(Serialize, Deserialize)]
pub struct GenerationEntry {
    pub id: String,
    pub generation: u32,
}

/// Output of [`resolve_generations_json`].
#[derive(Serialize, Deserialize)]
pub struct GenerationOutput {
    pub members: Vec<GenerationEntry>,
    pub max_depth: u32,
}

/// Output of [`health_stats_json`].
#[derive(Serialize)]
pub struct HealthOutput {
    pub stats: HealthStats,
    pub members: Vec<OverviewRow>,
}

fn parse_tree(members_json: &str) -> Result<FamilyTree, String> {
    FamilyTree::from_json_str(members_json).map_err(|e| format!("Member parse error: {}", e))
}

/// Assign generations to the members in `members_json`.
pub fn resolve_generations_json(members_json: &str) -> Result<String, String> {
    let tree = parse_tree(members_json)?;
    let generations = resolve_generations(&tree);

    let output = GenerationOutput {
        members: generations
            .iter()
            .map(|(id, generation)| GenerationEntry {
                id: id.to_string(),
                generation,
            })
            .collect(),
        max_depth: max_generation_depth(&tree),
    };

    serde_json::to_string(&output).map_err(|e| format!("JSON serialize error: {}", e))
}

/// Tree-view statistics for the members in `members_json`.
pub fn family_stats_json(members_json: &str) -> Result<String, String> {
    let tree = parse_tree(members_json)?;
    let stats = FamilyStats::compute(&tree);
    serde_json::to_string(&stats).map_err(|e| format!("JSON serialize error: {}", e))
}

/// Health overview rows and aggregate statistics for `members_json`.
pub fn health_stats_json(members_json: &str) -> Result<String, String> {
    let tree = parse_tree(members_json)?;
    let members = overview_rows(&tree);
    let output = HealthOutput {
        stats: HealthStats::compute(&members),
        members,
    };
    serde_json::to_string(&output).map_err(|e| format!("JSON serialize error: {}", e))
}
