//! Property tests for tree construction, traversal, validation and synthesis

use proptest::prelude::*;
use trellis_core::{
    validate_tree, Construct, ConstructError, ConstructTree, Declaration, Group, NodeId,
    Synthesizer,
};

#[derive(Debug)]
struct Flagged(bool);

impl Construct for Flagged {
    fn kind(&self) -> &'static str {
        "Flagged"
    }

    fn validate(&self) -> Vec<String> {
        if self.0 {
            vec!["flagged".to_string()]
        } else {
            Vec::new()
        }
    }
}

/// Build a tree from a parent list: node `i + 1` hangs under node
/// `parents[i] % (i + 1)`, so every list describes a valid tree.
fn build(parents: &[usize], flags: &[bool]) -> (ConstructTree, Vec<NodeId>) {
    let mut tree = ConstructTree::new("Root").unwrap();
    let mut handles = vec![tree.root()];
    for (i, &p) in parents.iter().enumerate() {
        let parent = handles[p % (i + 1)];
        let flagged = flags.get(i).copied().unwrap_or(false);
        let node = tree.add_child(parent, format!("N{i}"), Flagged(flagged)).unwrap();
        tree.declare(node, Declaration::new("Leaf").with_property("Index", i))
            .unwrap();
        handles.push(node);
    }
    (tree, handles)
}

fn recursive_preorder(tree: &ConstructTree, node: NodeId, out: &mut Vec<NodeId>) {
    out.push(node);
    for &child in tree.children(node).unwrap() {
        recursive_preorder(tree, child, out);
    }
}

fn tree_shape() -> impl Strategy<Value = (Vec<usize>, Vec<bool>)> {
    (0..24usize).prop_flat_map(|n| {
        (
            prop::collection::vec(any::<usize>(), n),
            prop::collection::vec(any::<bool>(), n),
        )
    })
}

proptest! {
    #[test]
    fn prop_traversal_matches_recursive_preorder((parents, flags) in tree_shape()) {
        let (tree, _) = build(&parents, &flags);

        let iterative: Vec<_> = tree.traverse().map(|n| n.handle()).collect();
        let mut recursive = Vec::new();
        recursive_preorder(&tree, tree.root(), &mut recursive);

        prop_assert_eq!(iterative.len(), tree.node_count());
        prop_assert_eq!(iterative, recursive);
    }

    #[test]
    fn prop_paths_extend_parent_paths((parents, flags) in tree_shape()) {
        let (tree, _) = build(&parents, &flags);

        for node in tree.traverse() {
            match node.parent() {
                Some(parent) => {
                    let parent_path = tree.path(parent).unwrap();
                    prop_assert_eq!(node.path().parent(), Some(parent_path.clone()));
                    prop_assert!(parent_path.is_ancestor_of(node.path()));
                }
                None => prop_assert_eq!(node.path().len(), 1),
            }
            prop_assert_eq!(tree.find(node.path()), Some(node.handle()));
        }
    }

    #[test]
    fn prop_duplicate_sibling_always_rejected(
        (parents, flags) in tree_shape(),
        pick in any::<usize>(),
    ) {
        let (mut tree, handles) = build(&parents, &flags);
        let parent = handles[pick % handles.len()];
        let before = tree.node_count();

        tree.add_child(parent, "Twin", Group).unwrap();
        let err = tree.add_child(parent, "Twin", Group).unwrap_err();

        let is_duplicate = matches!(err, ConstructError::DuplicateIdentity { .. });
        prop_assert!(is_duplicate);
        prop_assert_eq!(tree.node_count(), before + 1);
    }

    #[test]
    fn prop_validation_reports_every_flagged_node_in_preorder((parents, flags) in tree_shape()) {
        let (tree, _) = build(&parents, &flags);

        let expected: Vec<_> = tree
            .traverse()
            .filter(|n| !n.construct().validate().is_empty())
            .map(|n| n.path().clone())
            .collect();
        let reported: Vec<_> = validate_tree(&tree).into_iter().map(|p| p.path).collect();

        prop_assert_eq!(reported, expected);
    }

    #[test]
    fn prop_synthesis_is_deterministic_or_fails_whole((parents, flags) in tree_shape()) {
        let (tree, _) = build(&parents, &flags);
        let any_flagged = flags.iter().any(|&f| f);

        let first = Synthesizer::new().synthesize(&tree);
        let second = Synthesizer::new().synthesize(&tree);

        match (first, second) {
            (Ok(a), Ok(b)) => {
                prop_assert!(!any_flagged);
                prop_assert_eq!(a.len(), parents.len());
                prop_assert_eq!(a.to_json_pretty().unwrap(), b.to_json_pretty().unwrap());
                prop_assert_eq!(a, b);
            }
            (Err(a), Err(b)) => {
                prop_assert!(any_flagged);
                prop_assert!(a.is_validation_failure());
                prop_assert_eq!(a, b);
            }
            _ => prop_assert!(false, "synthesis outcome changed between runs"),
        }
    }
}

#[test]
fn same_id_under_different_parents_is_allowed() {
    let mut tree = ConstructTree::new("Root").unwrap();
    let root = tree.root();
    let a = tree.add_child(root, "A", Group).unwrap();
    let b = tree.add_child(root, "B", Group).unwrap();

    let under_a = tree.add_child(a, "Shared", Group).unwrap();
    let under_b = tree.add_child(b, "Shared", Group).unwrap();

    assert_ne!(under_a, under_b);
    assert_eq!(tree.path(under_a).unwrap().to_string(), "Root/A/Shared");
    assert_eq!(tree.path(under_b).unwrap().to_string(), "Root/B/Shared");
}

#[test]
fn invalid_ids_are_rejected() {
    let mut tree = ConstructTree::new("Root").unwrap();
    let root = tree.root();

    for bad in ["", "a/b"] {
        let err = tree.add_child(root, bad, Group).unwrap_err();
        assert!(matches!(err, ConstructError::InvalidIdentity { .. }), "{bad:?}");
    }
    assert_eq!(tree.node_count(), 1);
}
