//! Category tree construction.
//!
//! Rebuilds the whole forest from the current definition set on every pass;
//! nodes are never mutated incrementally.

use fabrica_model::{CategoryNode, Definition, PathOverrides};
use fabrica_types::DefinitionId;
use std::collections::BTreeMap;

/// Default icon for a root-level grouping node.
pub const ROOT_ICON: &str = "folder-root";
/// Default icon for any deeper grouping node.
pub const FOLDER_ICON: &str = "folder";
/// Default ordering hint for nodes without an override.
pub const DEFAULT_ORDER: i32 = 999;

/// Builds the category forest for a definition set.
///
/// Walks each definition's path from the root, creating an intermediate
/// node for every prefix not yet present; the definition attaches at the
/// terminal segment, which becomes a leaf. Icons and orders come from
/// `overrides` keyed by full prefix path, falling back to the folder
/// defaults. A definition's own icon overrides its leaf node's icon; with
/// several definitions on one leaf, the last writer wins.
///
/// Callers must pass `definitions` sorted by path — that is what makes the
/// last-writer-wins collisions deterministic.
pub fn build(definitions: &[Definition], overrides: &PathOverrides) -> Vec<CategoryNode> {
    let mut roots: BTreeMap<String, CategoryNode> = BTreeMap::new();

    for definition in definitions {
        let segments: Vec<&str> = definition.path.segments().collect();
        let last = segments.len() - 1;
        let mut children = &mut roots;
        let mut prefix = String::new();

        for (depth, segment) in segments.iter().enumerate() {
            if depth > 0 {
                prefix.push('/');
            }
            prefix.push_str(segment);

            let node = children.entry((*segment).to_string()).or_insert_with(|| {
                let (icon, order) = node_style(&prefix, depth, overrides);
                let mut created = CategoryNode::group(*segment, icon, order);
                // Path-derived id: rebuilding the forest from the same
                // definition set yields identical nodes.
                created.id = DefinitionId::derived(&prefix);
                created
            });

            if depth == last {
                if let Some(icon) = &definition.icon {
                    node.icon = Some(icon.clone());
                }
                node.definitions.push(definition.clone());
                node.leaf = true;
            }
            children = &mut node.children;
        }
    }

    roots.into_values().collect()
}

/// The pure-grouping view for category-only consumers: leaf collection
/// containers are pruned, recursively.
pub fn grouping_roots(forest: &[CategoryNode]) -> Vec<CategoryNode> {
    forest
        .iter()
        .filter(|node| !node.leaf)
        .map(prune_leaves)
        .collect()
}

fn prune_leaves(node: &CategoryNode) -> CategoryNode {
    let mut pruned = node.clone();
    pruned.definitions.clear();
    pruned.children = node
        .children
        .iter()
        .filter(|(_, child)| !child.leaf)
        .map(|(name, child)| (name.clone(), prune_leaves(child)))
        .collect();
    pruned
}

fn node_style(prefix: &str, depth: usize, overrides: &PathOverrides) -> (Option<String>, i32) {
    let default_icon = if depth == 0 { ROOT_ICON } else { FOLDER_ICON };
    match overrides.get(prefix) {
        Some(entry) => (
            Some(entry.icon.clone().unwrap_or_else(|| default_icon.to_string())),
            entry.order.unwrap_or(DEFAULT_ORDER),
        ),
        None => (Some(default_icon.to_string()), DEFAULT_ORDER),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fabrica_model::PathOverride;
    use fabrica_types::ContentPath;

    fn definition(path: &str) -> Definition {
        Definition::new(ContentPath::parse(path).unwrap())
    }

    fn sorted(mut defs: Vec<Definition>) -> Vec<Definition> {
        defs.sort_by(|a, b| a.path.cmp(&b.path));
        defs
    }

    #[test]
    fn sibling_collections_group_under_shared_parents() {
        let defs = sorted(vec![definition("a/x"), definition("a/y"), definition("b/z")]);
        let forest = build(&defs, &PathOverrides::new());

        assert_eq!(forest.len(), 2);
        let a = &forest[0];
        assert_eq!(a.name, "a");
        assert!(!a.leaf);
        assert!(a.definitions.is_empty());
        assert_eq!(a.children.len(), 2);
        assert!(a.children["x"].leaf);
        assert!(a.children["y"].leaf);
        assert_eq!(a.children["x"].definitions.len(), 1);

        let b = &forest[1];
        assert_eq!(b.name, "b");
        assert!(b.children["z"].leaf);
    }

    #[test]
    fn every_definition_reachable_by_its_own_path() {
        let defs = sorted(vec![
            definition("shop/products/article"),
            definition("shop/products/variant"),
            definition("shop/orders"),
            definition("blog/post"),
        ]);
        let forest = build(&defs, &PathOverrides::new());

        for def in &defs {
            let mut segments = def.path.segments();
            let root = segments.next().unwrap();
            let node = forest
                .iter()
                .find(|n| n.name == root)
                .and_then(|n| n.descend(segments))
                .unwrap();
            assert!(node.leaf);
            assert!(node.definitions.iter().any(|d| d.id == def.id));
        }
    }

    #[test]
    fn only_terminal_nodes_hold_definitions() {
        let defs = sorted(vec![definition("a/b/c"), definition("a/b/d")]);
        let forest = build(&defs, &PathOverrides::new());

        let mut carriers = 0;
        for root in &forest {
            root.walk(&mut |node| {
                if !node.definitions.is_empty() {
                    assert!(node.leaf);
                    assert!(node.children.is_empty());
                    carriers += 1;
                }
            });
        }
        assert_eq!(carriers, 2);
    }

    #[test]
    fn two_definitions_on_one_path_share_a_leaf() {
        let defs = sorted(vec![definition("a/x"), definition("a/x")]);
        let forest = build(&defs, &PathOverrides::new());
        assert_eq!(forest[0].children["x"].definitions.len(), 2);
    }

    #[test]
    fn overrides_style_intermediate_nodes() {
        let mut overrides = PathOverrides::new();
        overrides.insert(
            "shop",
            PathOverride {
                icon: Some("cart".into()),
                order: Some(1),
            },
        );
        let defs = sorted(vec![definition("shop/products/article")]);
        let forest = build(&defs, &overrides);

        let shop = &forest[0];
        assert_eq!(shop.icon.as_deref(), Some("cart"));
        assert_eq!(shop.order, 1);
        // Un-overridden deeper node falls back to the folder default.
        assert_eq!(shop.children["products"].icon.as_deref(), Some(FOLDER_ICON));
        assert_eq!(shop.children["products"].order, DEFAULT_ORDER);
    }

    #[test]
    fn root_and_folder_defaults_differ() {
        let defs = sorted(vec![definition("top/mid/leaf")]);
        let forest = build(&defs, &PathOverrides::new());
        let top = &forest[0];
        assert_eq!(top.icon.as_deref(), Some(ROOT_ICON));
        assert_eq!(top.children["mid"].icon.as_deref(), Some(FOLDER_ICON));
    }

    #[test]
    fn definition_icon_wins_on_its_leaf() {
        let mut def = definition("a/x");
        def.icon = Some("star".into());
        let forest = build(&[def], &PathOverrides::new());
        assert_eq!(forest[0].children["x"].icon.as_deref(), Some("star"));
    }

    #[test]
    fn last_writer_wins_on_shared_leaf_icon() {
        let mut first = definition("a/x");
        first.icon = Some("one".into());
        first.slug = "first".into();
        let mut second = definition("a/x");
        second.icon = Some("two".into());
        second.slug = "second".into();
        // Same path: input order decides, and input is pre-sorted by path.
        let forest = build(&[first, second], &PathOverrides::new());
        assert_eq!(forest[0].children["x"].icon.as_deref(), Some("two"));
    }

    #[test]
    fn grouping_roots_exclude_collection_containers() {
        let defs = sorted(vec![definition("a/x"), definition("b/y/z"), definition("solo")]);
        let forest = build(&defs, &PathOverrides::new());
        let groups = grouping_roots(&forest);

        // "solo" is a root-level leaf and drops out of the grouping view.
        let names: Vec<_> = groups.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        for group in &groups {
            group.walk(&mut |node| {
                assert!(node.definitions.is_empty());
                assert!(!node.leaf);
            });
        }
    }
}
