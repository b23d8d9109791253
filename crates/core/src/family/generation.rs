//! Generation numbers over a parent-linked family graph.
//!
//! A root (no resolvable father or mother) is generation 1; every other
//! member sits one generation below its deepest resolvable parent. Both
//! walks below carry an on-path guard so that corrupted data containing a
//! parent cycle still terminates.

use indexmap::IndexMap;

use super::member::Member;
use super::tree::FamilyTree;

/// Generation assigned to each member, keyed by member ID in tree order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generations {
    values: IndexMap<String, u32>,
}

impl Generations {
    /// Generation of the member with ID `id`, if it is part of the tree.
    pub fn get(&self, id: &str) -> Option<u32> {
        self.values.get(id).copied()
    }

    /// Generation of the member at tree index `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn at(&self, index: usize) -> u32 {
        self.values[index]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Largest generation assigned, or 0 for an empty tree.
    pub fn max(&self) -> u32 {
        self.values.values().copied().max().unwrap_or(0)
    }

    /// `(member id, generation)` pairs in tree order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.values.iter().map(|(id, &g)| (id.as_str(), g))
    }
}

/// Per-walk bookkeeping shared by both traversals.
///
/// `on_path` marks members on the current walk (the cycle guard). `memo`
/// holds finished results, but only for members whose whole subtree was
/// walked without hitting the guard: those values do not depend on the path
/// that reached them, so shared ancestors are resolved once.
struct Walk {
    on_path: Vec<bool>,
    memo: Vec<Option<u32>>,
    guard_hits: usize,
}

impl Walk {
    fn new(n: usize) -> Self {
        Self {
            on_path: vec![false; n],
            memo: vec![None; n],
            guard_hits: 0,
        }
    }
}

/// Assign a generation to every member of `tree`.
///
/// `generation(m) = 1 + max(generation(father), generation(mother))`, an
/// unresolvable parent contributing 0. A walk that reaches a member already
/// on its current path treats that member as generation 1 and stops there.
/// Acyclic input is resolved in linear time.
///
/// Never fails: dangling parents and parent cycles degrade to shallow
/// values.
pub fn resolve_generations(tree: &FamilyTree) -> Generations {
    let n = tree.len();
    let mut values = IndexMap::with_capacity(n);
    let mut walk = Walk::new(n);

    for i in 0..n {
        let (generation, _) = ancestor_depth(tree, i, &mut walk);
        values.insert(tree.member(i).id.clone(), generation);
    }

    if walk.guard_hits > 0 {
        log::warn!(
            "Parent cycle detected while resolving generations ({} guard hits); \
             affected members get shallow generations",
            walk.guard_hits
        );
    }
    log::debug!("Resolved generations for {} members", n);

    Generations { values }
}

/// Generation of `index` and whether its ancestry was walked without a
/// guard hit.
fn ancestor_depth(tree: &FamilyTree, index: usize, walk: &mut Walk) -> (u32, bool) {
    if let Some(generation) = walk.memo[index] {
        return (generation, true);
    }
    if walk.on_path[index] {
        walk.guard_hits += 1;
        return (1, false);
    }
    walk.on_path[index] = true;

    let (father, father_clean) = match tree.father(index) {
        Some(f) => ancestor_depth(tree, f, walk),
        None => (0, true),
    };
    let (mother, mother_clean) = match tree.mother(index) {
        Some(m) => ancestor_depth(tree, m, walk),
        None => (0, true),
    };

    walk.on_path[index] = false;
    let generation = 1 + father.max(mother);
    let clean = father_clean && mother_clean;
    if clean {
        walk.memo[index] = Some(generation);
    }
    (generation, clean)
}

/// Deepest descendant chain reachable from any root, counting the root as 1.
///
/// Walks forward from each root through its children. Returns 0 for an
/// empty tree and 1 when every member has a resolvable parent (only
/// possible with a parent cycle).
pub fn max_generation_depth(tree: &FamilyTree) -> u32 {
    if tree.is_empty() {
        return 0;
    }

    let mut walk = Walk::new(tree.len());
    tree.roots()
        .into_iter()
        .map(|root| descendant_height(tree, root, &mut walk).0)
        .max()
        .unwrap_or(1)
}

/// Levels from `index` down to its deepest descendant, `index` included.
/// A member reached again on the current path counts as one level.
fn descendant_height(tree: &FamilyTree, index: usize, walk: &mut Walk) -> (u32, bool) {
    if let Some(height) = walk.memo[index] {
        return (height, true);
    }
    if walk.on_path[index] {
        walk.guard_hits += 1;
        return (1, false);
    }
    walk.on_path[index] = true;

    let mut below = 0;
    let mut clean = true;
    for &child in tree.children(index) {
        let (height, child_clean) = descendant_height(tree, child, walk);
        below = below.max(height);
        clean &= child_clean;
    }

    walk.on_path[index] = false;
    let height = 1 + below;
    if clean {
        walk.memo[index] = Some(height);
    }
    (height, clean)
}

impl FamilyTree {
    /// Members paired with their resolved generation, in input order.
    pub fn with_generations(&self) -> Vec<(&Member, u32)> {
        let generations = resolve_generations(self);
        self.members()
            .iter()
            .enumerate()
            .map(|(i, m)| (m, generations.at(i)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(members: Vec<Member>) -> FamilyTree {
        FamilyTree::from_members(members).unwrap()
    }

    #[test]
    fn test_single_root() {
        let gens = resolve_generations(&tree(vec![Member::new("r1")]));
        assert_eq!(gens.get("r1"), Some(1));
        assert_eq!(gens.len(), 1);
    }

    #[test]
    fn test_two_parents_one_child() {
        let gens = resolve_generations(&tree(vec![
            Member::new("p1"),
            Member::new("p2"),
            Member::new("c1").with_father("p1").with_mother("p2"),
        ]));
        assert_eq!(gens.get("p1"), Some(1));
        assert_eq!(gens.get("p2"), Some(1));
        assert_eq!(gens.get("c1"), Some(2));
    }

    #[test]
    fn test_three_generation_chain() {
        let t = tree(vec![
            Member::new("g1"),
            Member::new("p1").with_father("g1"),
            Member::new("c1").with_father("p1"),
        ]);
        let gens = resolve_generations(&t);
        assert_eq!(gens.get("g1"), Some(1));
        assert_eq!(gens.get("p1"), Some(2));
        assert_eq!(gens.get("c1"), Some(3));
        assert_eq!(gens.max(), 3);
        assert_eq!(max_generation_depth(&t), 3);
    }

    #[test]
    fn test_dangling_parent_contributes_zero() {
        let gens = resolve_generations(&tree(vec![Member::new("c1").with_father("ghost-id")]));
        assert_eq!(gens.get("c1"), Some(1));
    }

    #[test]
    fn test_deeper_parent_wins() {
        // Father is generation 3, mother a root: child is 4.
        let gens = resolve_generations(&tree(vec![
            Member::new("gg"),
            Member::new("g").with_father("gg"),
            Member::new("f").with_mother("g"),
            Member::new("m"),
            Member::new("c").with_father("f").with_mother("m"),
        ]));
        assert_eq!(gens.get("f"), Some(3));
        assert_eq!(gens.get("m"), Some(1));
        assert_eq!(gens.get("c"), Some(4));
    }

    #[test]
    fn test_shared_ancestor_through_both_parents() {
        let gens = resolve_generations(&tree(vec![
            Member::new("g"),
            Member::new("a").with_father("g"),
            Member::new("b").with_mother("g"),
            Member::new("c").with_father("a").with_mother("b"),
        ]));
        assert_eq!(gens.get("c"), Some(3));
    }

    #[test]
    fn test_two_member_cycle_terminates() {
        let gens = resolve_generations(&tree(vec![
            Member::new("a").with_father("b"),
            Member::new("b").with_father("a"),
        ]));
        let a = gens.get("a").unwrap();
        let b = gens.get("b").unwrap();
        assert!(a >= 1 && b >= 1);
        // Walk from a: a -> b -> a (guard, 1) => b = 2, a = 3.
        assert_eq!(a, 3);
        assert_eq!(b, 3);
    }

    #[test]
    fn test_self_parent_terminates() {
        let gens = resolve_generations(&tree(vec![Member::new("x").with_father("x")]));
        assert_eq!(gens.get("x"), Some(2));
    }

    #[test]
    fn test_idempotent() {
        let t = tree(vec![
            Member::new("g1"),
            Member::new("p1").with_father("g1"),
            Member::new("p2"),
            Member::new("c1").with_father("p1").with_mother("p2"),
        ]);
        assert_eq!(resolve_generations(&t), resolve_generations(&t));
    }

    #[test]
    fn test_iteration_follows_input_order() {
        let t = tree(vec![
            Member::new("c1").with_father("p1"),
            Member::new("p1"),
        ]);
        let gens = resolve_generations(&t);
        let pairs: Vec<(&str, u32)> = gens.iter().collect();
        assert_eq!(pairs, vec![("c1", 2), ("p1", 1)]);

        let annotated = t.with_generations();
        assert_eq!(annotated[0].0.id, "c1");
        assert_eq!(annotated[0].1, 2);
    }

    #[test]
    fn test_max_depth_empty_and_cyclic() {
        assert_eq!(max_generation_depth(&tree(Vec::new())), 0);
        let cyclic = tree(vec![
            Member::new("a").with_father("b"),
            Member::new("b").with_father("a"),
        ]);
        assert_eq!(max_generation_depth(&cyclic), 1);
    }

    #[test]
    fn test_max_depth_picks_longest_branch() {
        let t = tree(vec![
            Member::new("r1"),
            Member::new("r2"),
            Member::new("a").with_father("r1"),
            Member::new("b").with_mother("a"),
            Member::new("c").with_father("r2"),
        ]);
        assert_eq!(max_generation_depth(&t), 3);
    }

    /// Pairs (aK, bK) whose parents are a(K-1) and b(K-1): every member of
    /// generation K reaches each founder through 2^(K-1) paths.
    fn ladder(generations: usize) -> FamilyTree {
        let mut members = vec![Member::new("a1"), Member::new("b1")];
        for k in 2..=generations {
            let father = format!("a{}", k - 1);
            let mother = format!("b{}", k - 1);
            for side in ["a", "b"] {
                members.push(
                    Member::new(&format!("{}{}", side, k))
                        .with_father(&father)
                        .with_mother(&mother),
                );
            }
        }
        tree(members)
    }

    #[test]
    fn test_ladder_pedigree_resolves_shared_ancestors_once() {
        let t = ladder(100);
        assert_eq!(t.len(), 200);

        let gens = resolve_generations(&t);
        assert_eq!(gens.get("a1"), Some(1));
        assert_eq!(gens.get("b50"), Some(50));
        assert_eq!(gens.get("a100"), Some(100));
        assert_eq!(gens.get("b100"), Some(100));
        assert_eq!(gens.max(), 100);
        assert_eq!(max_generation_depth(&t), 100);
    }

    #[test]
    fn test_cycle_below_shared_ancestor_still_terminates() {
        // x and y form a cycle; both ladder members hang off it.
        let gens = resolve_generations(&tree(vec![
            Member::new("x").with_father("y"),
            Member::new("y").with_father("x"),
            Member::new("p").with_father("x").with_mother("y"),
            Member::new("q").with_father("x").with_mother("y"),
            Member::new("c").with_father("p").with_mother("q"),
        ]));
        assert_eq!(gens.get("x"), Some(3));
        assert_eq!(gens.get("p"), Some(4));
        assert_eq!(gens.get("c"), Some(5));
    }
}
