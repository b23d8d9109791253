use serde::Serialize;

use super::generation::max_generation_depth;
use super::tree::FamilyTree;

/// Summary figures for the tree view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyStats {
    pub total_members: usize,
    /// Deepest root-to-descendant chain, see [`max_generation_depth`].
    pub generations: u32,
    /// ID of the member with the earliest known birth date.
    pub oldest_member: Option<String>,
    /// ID of the member with the latest known birth date.
    pub youngest_member: Option<String>,
}

impl FamilyStats {
    /// Compute the statistics for `tree`. Members without a parseable
    /// birth date are ignored for oldest/youngest; ties keep the member
    /// listed first.
    pub fn compute(tree: &FamilyTree) -> Self {
        let mut oldest = None;
        let mut youngest = None;

        for member in tree.members() {
            let Some(born) = member.birth_date() else {
                continue;
            };
            if oldest.map_or(true, |(date, _)| born < date) {
                oldest = Some((born, member.id.as_str()));
            }
            if youngest.map_or(true, |(date, _)| born > date) {
                youngest = Some((born, member.id.as_str()));
            }
        }

        Self {
            total_members: tree.len(),
            generations: max_generation_depth(tree),
            oldest_member: oldest.map(|(_, id)| id.to_string()),
            youngest_member: youngest.map(|(_, id)| id.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::Member;

    #[test]
    fn test_family_stats() {
        let tree = FamilyTree::from_members(vec![
            Member::new("nobirth"),
            Member::new("g1").with_birth_date("1931-05-02"),
            Member::new("p1").with_father("g1").with_birth_date("1960-01-20"),
            Member::new("p2").with_birth_date("1931-05-02"),
            Member::new("c1")
                .with_father("p1")
                .with_mother("p2")
                .with_birth_date("1994-11-30T00:00:00Z"),
        ])
        .unwrap();

        let stats = FamilyStats::compute(&tree);
        assert_eq!(stats.total_members, 5);
        assert_eq!(stats.generations, 3);
        assert_eq!(stats.oldest_member.as_deref(), Some("g1"));
        assert_eq!(stats.youngest_member.as_deref(), Some("c1"));
    }

    #[test]
    fn test_family_stats_empty() {
        let stats = FamilyStats::compute(&FamilyTree::from_members(Vec::new()).unwrap());
        assert_eq!(stats.total_members, 0);
        assert_eq!(stats.generations, 0);
        assert_eq!(stats.oldest_member, None);
        assert_eq!(stats.youngest_member, None);
    }
}
