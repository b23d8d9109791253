use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use treetrace_core::family::{FamilyStats, FamilyTree};
use treetrace_core::health::{
    condition_label, export_csv_file, overview_rows, HealthStats, OverviewQuery, SortKey,
};
use treetrace_core::resolve_generations;

#[derive(Parser)]
#[command(name = "treetrace")]
#[command(version)]
#[command(about = "Generation depth, family statistics and health overview for family trees")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assign a generation number to every member
    Generations {
        /// Path to members file (.json, otherwise CSV with columns id, father, mother)
        #[arg(short, long)]
        members: String,

        /// Output format: "text" (default) or "json"
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Summarise the tree: member count, generation depth, oldest and youngest
    Stats {
        /// Path to members file
        #[arg(short, long)]
        members: String,

        /// Output format: "text" (default) or "json"
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Health overview table with condition and blood-type statistics
    Health {
        /// Path to members file
        #[arg(short, long)]
        members: String,

        /// Only show members with this condition key (e.g. heartDisease)
        #[arg(long)]
        condition: Option<String>,

        /// Only show members whose name contains this text
        #[arg(long)]
        search: Option<String>,

        /// Sort column: "generation" (default) or "name"
        #[arg(long, default_value = "generation")]
        sort: String,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Write the filtered table to this CSV file
        #[arg(long)]
        export: Option<String>,

        /// Output format: "text" (default) or "json"
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Check parent links for self-parenting and cycles
    Validate {
        /// Path to members file
        #[arg(short, long)]
        members: String,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generations { members, format } => cmd_generations(&members, &format),
        Commands::Stats { members, format } => cmd_stats(&members, &format),
        Commands::Health {
            members,
            condition,
            search,
            sort,
            desc,
            export,
            format,
        } => {
            let sort: SortKey = sort.parse().map_err(anyhow::Error::msg)?;
            let query = OverviewQuery {
                condition,
                search,
                sort,
                ascending: !desc,
            };
            cmd_health(&members, &query, export.as_deref(), &format)
        }
        Commands::Validate { members } => cmd_validate(&members),
    }
}

fn load_tree(path: &str) -> Result<FamilyTree> {
    let is_json = Path::new(path)
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));

    let tree = if is_json {
        FamilyTree::from_json_file(path)
    } else {
        FamilyTree::from_csv(path)
    }
    .with_context(|| format!("Failed to load members from '{}'", path))?;

    eprintln!("Loaded {} members from '{}'", tree.len(), path);
    for (member, parent) in tree.dangling_parents() {
        log::warn!(
            "Member '{}' references parent '{}' which is not in the tree",
            member,
            parent
        );
    }
    Ok(tree)
}

fn is_json(format: &str) -> Result<bool> {
    match format.to_lowercase().as_str() {
        "json" => Ok(true),
        "text" => Ok(false),
        other => anyhow::bail!("Unknown format '{}'. Use 'text' (default) or 'json'.", other),
    }
}

fn cmd_generations(path: &str, format: &str) -> Result<()> {
    let json = is_json(format)?;
    let tree = load_tree(path)?;
    let generations = resolve_generations(&tree);

    if json {
        let entries: Vec<serde_json::Value> = generations
            .iter()
            .map(|(id, generation)| serde_json::json!({ "id": id, "generation": generation }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let width = tree
        .members()
        .iter()
        .map(|m| m.id.len())
        .max()
        .unwrap_or(2)
        .max(2);
    println!("{:<width$}  {:>10}  name", "id", "generation", width = width);
    for (member, generation) in tree.with_generations() {
        println!(
            "{:<width$}  {:>10}  {}",
            member.id,
            generation,
            member.full_name(),
            width = width
        );
    }
    println!("\nDeepest generation: {}", generations.max());
    Ok(())
}

fn cmd_stats(path: &str, format: &str) -> Result<()> {
    let json = is_json(format)?;
    let tree = load_tree(path)?;
    let stats = FamilyStats::compute(&tree);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let describe = |id: &Option<String>| match id.as_deref().and_then(|id| tree.index_of(id)) {
        Some(i) => {
            let m = tree.member(i);
            format!(
                "{} ({})",
                m.full_name(),
                m.birth_date.as_deref().unwrap_or("unknown")
            )
        }
        None => "-".to_string(),
    };

    println!("Total members:  {}", stats.total_members);
    println!("Generations:    {}", stats.generations);
    println!("Oldest member:  {}", describe(&stats.oldest_member));
    println!("Youngest member: {}", describe(&stats.youngest_member));
    Ok(())
}

fn cmd_health(path: &str, query: &OverviewQuery, export: Option<&str>, format: &str) -> Result<()> {
    let json = is_json(format)?;
    let tree = load_tree(path)?;

    let rows = overview_rows(&tree);
    let stats = HealthStats::compute(&rows);
    let visible = query.apply(&rows);
    let conditions = stats.conditions();

    if let Some(export_path) = export {
        export_csv_file(&visible, &conditions, export_path)
            .with_context(|| format!("Failed to export overview to '{}'", export_path))?;
        eprintln!("Exported {} rows to '{}'", visible.len(), export_path);
    }

    if json {
        let out = serde_json::json!({
            "stats": stats,
            "members": visible,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Total members:          {}", stats.total_members);
    println!("Unique conditions:      {}", stats.unique_conditions());
    println!("Most common condition:  {}", stats.most_common_condition);
    println!("Most common blood type: {}", stats.most_common_blood_type);

    if !conditions.is_empty() {
        println!("\nConditions:");
        for condition in &conditions {
            println!(
                "  {:<24} {:>4}  ({:.1}%)",
                condition_label(condition),
                stats.condition_counts[*condition],
                100.0 * stats.condition_prevalence(condition)
            );
        }
    }

    println!("\nMembers ({} shown):", visible.len());
    for row in &visible {
        println!(
            "  gen {:>2}  {:<28} {:<4} {}",
            row.generation,
            row.full_name,
            row.blood_type.as_deref().unwrap_or("-"),
            row.conditions
                .iter()
                .map(|c| condition_label(c))
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    Ok(())
}

fn cmd_validate(path: &str) -> Result<()> {
    let tree = load_tree(path)?;

    let dangling = tree.dangling_parents();
    for (member, parent) in &dangling {
        println!("warning: '{}' references missing parent '{}'", member, parent);
    }

    tree.validate().context("Family tree failed validation")?;
    println!(
        "OK: {} members, {} roots, {} dangling parent links",
        tree.len(),
        tree.roots().len(),
        dangling.len()
    );
    Ok(())
}
