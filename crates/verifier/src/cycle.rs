// Path: crates/verifier/src/cycle.rs

//! AST dependency-graph cycle detection.
//!
//! The AST is interpreted as a directed graph over an arena of
//! path-indexed vertices: one vertex per JSON node reachable from the
//! root. Edges come from (i) string values that name an entry key visible
//! in an enclosing scope, and (ii) `dependencies`/`deps`/`requires` arrays
//! whose string elements name other entries — those edges originate from
//! the object that declares the array, so `{"a":{"dependencies":["b"]}}`
//! reads as "a depends on b". Tarjan's SCC runs over the flat adjacency
//! list; a component larger than one vertex, or any self-edge, is a cycle.
//!
//! The arena holds indices only; no shared mutable structures exist even
//! when the described graph is cyclic.

use serde_json::Value;
use std::collections::BTreeMap;

/// Keys whose array elements declare explicit dependency edges.
const DEPENDENCY_KEYS: [&str; 3] = ["dependencies", "deps", "requires"];

#[derive(Default)]
struct Vertex {
    parent: Option<usize>,
    /// The object key this vertex is the value of, when it is one.
    key: Option<String>,
    /// For object vertices: entry key to value-vertex index.
    children: Option<BTreeMap<String, usize>>,
}

struct Arena {
    vertices: Vec<Vertex>,
    /// String leaves: (vertex index, string value).
    strings: Vec<(usize, String)>,
}

/// Returns `true` when the AST's dependency graph contains a cycle.
pub fn detect(ast: &Value) -> bool {
    let arena = build_arena(ast);
    let edges = resolve_edges(&arena);

    // Self-edges count as cycles outright.
    if edges
        .iter()
        .enumerate()
        .any(|(v, targets)| targets.contains(&v))
    {
        return true;
    }

    any_scc_larger_than_one(arena.vertices.len(), &edges)
}

// Arena indices are produced by the build itself and are in-bounds by
// construction.
#[allow(clippy::indexing_slicing)]
fn build_arena(root: &Value) -> Arena {
    let mut arena = Arena {
        vertices: Vec::new(),
        strings: Vec::new(),
    };

    // Iterative walk; (value, parent, key) work items.
    let mut work: Vec<(&Value, Option<usize>, Option<String>)> = vec![(root, None, None)];
    while let Some((value, parent, key)) = work.pop() {
        let idx = arena.vertices.len();
        arena.vertices.push(Vertex {
            parent,
            key,
            children: None,
        });

        match value {
            Value::Object(map) => {
                let mut children = BTreeMap::new();
                // Child indices are assigned in reverse pop order; the map
                // records them exactly, so ordering never leaks into the
                // verdict.
                let mut pending: Vec<(&String, &Value)> = map.iter().collect();
                // Reserve ids depth-first in key order for reproducibility.
                pending.sort_by(|a, b| a.0.cmp(b.0));
                for (k, v) in pending.into_iter().rev() {
                    work.push((v, Some(idx), Some(k.clone())));
                    children.insert(k.clone(), 0); // patched below
                }
                arena.vertices[idx].children = Some(children);
            }
            Value::Array(items) => {
                for item in items.iter().rev() {
                    work.push((item, Some(idx), None));
                }
            }
            Value::String(s) => {
                arena.strings.push((idx, s.clone()));
            }
            _ => {}
        }
    }

    // Second pass: patch object children maps with the indices the walk
    // actually assigned. A child's (parent, key) pair identifies it.
    for idx in 0..arena.vertices.len() {
        let (parent, key) = (arena.vertices[idx].parent, arena.vertices[idx].key.clone());
        if let (Some(p), Some(k)) = (parent, key) {
            if let Some(children) = arena.vertices[p].children.as_mut() {
                children.insert(k, idx);
            }
        }
    }

    arena
}

/// Resolves every string leaf against the entry keys visible from its
/// position, innermost scope first, and records the resulting edges.
#[allow(clippy::indexing_slicing)]
fn resolve_edges(arena: &Arena) -> Vec<Vec<usize>> {
    let mut edges: Vec<Vec<usize>> = vec![Vec::new(); arena.vertices.len()];

    for (leaf, name) in &arena.strings {
        let Some(target) = resolve_name(arena, *leaf, name) else {
            continue;
        };
        let source = edge_source(arena, *leaf);
        edges[source].push(target);
    }

    edges
}

/// Walks the ancestor chain from `leaf` looking for an object entry named
/// `name`; nearest enclosing scope wins.
#[allow(clippy::indexing_slicing)]
fn resolve_name(arena: &Arena, leaf: usize, name: &str) -> Option<usize> {
    let mut cursor = arena.vertices[leaf].parent;
    while let Some(v) = cursor {
        if let Some(children) = arena.vertices[v].children.as_ref() {
            if let Some(&target) = children.get(name) {
                return Some(target);
            }
        }
        cursor = arena.vertices[v].parent;
    }
    None
}

/// Picks the vertex an edge originates from.
///
/// A string inside a dependency array speaks for the object declaring the
/// array; any other string speaks for the nearest enclosing entry value
/// (possibly itself).
#[allow(clippy::indexing_slicing)]
fn edge_source(arena: &Arena, leaf: usize) -> usize {
    if let Some(parent) = arena.vertices[leaf].parent {
        let parent_key = arena.vertices[parent].key.as_deref();
        if let Some(k) = parent_key {
            if DEPENDENCY_KEYS.contains(&k) && arena.vertices[parent].children.is_none() {
                // Dependency array: hoist to the declaring object's entry.
                if let Some(grandparent) = arena.vertices[parent].parent {
                    return grandparent;
                }
            }
        }
    }

    // Nearest enclosing entry value, starting at the leaf itself.
    let mut cursor = leaf;
    loop {
        if arena.vertices[cursor].key.is_some() || arena.vertices[cursor].parent.is_none() {
            return cursor;
        }
        match arena.vertices[cursor].parent {
            Some(p) => cursor = p,
            None => return cursor,
        }
    }
}

/// Iterative Tarjan strongly-connected-components; returns `true` as soon
/// as a component with more than one vertex is found.
#[allow(clippy::indexing_slicing)]
fn any_scc_larger_than_one(n: usize, edges: &[Vec<usize>]) -> bool {
    const UNVISITED: usize = usize::MAX;

    let mut index = vec![UNVISITED; n];
    let mut low = vec![0usize; n];
    let mut on_stack = vec![false; n];
    let mut scc_stack: Vec<usize> = Vec::new();
    let mut next_index = 0usize;

    for start in 0..n {
        if index[start] != UNVISITED {
            continue;
        }

        let mut call_stack: Vec<(usize, usize)> = vec![(start, 0)];
        while let Some((v, edge_pos)) = call_stack.pop() {
            if edge_pos == 0 {
                index[v] = next_index;
                low[v] = next_index;
                next_index += 1;
                scc_stack.push(v);
                on_stack[v] = true;
            }

            if let Some(&w) = edges[v].get(edge_pos) {
                call_stack.push((v, edge_pos + 1));
                if index[w] == UNVISITED {
                    call_stack.push((w, 0));
                } else if on_stack[w] {
                    low[v] = low[v].min(index[w]);
                }
                continue;
            }

            // v is fully explored.
            if let Some(&(parent, _)) = call_stack.last() {
                low[parent] = low[parent].min(low[v]);
            }
            if low[v] == index[v] {
                let mut size = 0usize;
                loop {
                    let Some(w) = scc_stack.pop() else { break };
                    on_stack[w] = false;
                    size += 1;
                    if w == v {
                        break;
                    }
                }
                if size > 1 {
                    return true;
                }
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mutual_dependencies_cycle() {
        let ast = json!({"a": {"dependencies": ["b"]}, "b": {"dependencies": ["a"]}});
        assert!(detect(&ast));
    }

    #[test]
    fn linear_dependencies_do_not_cycle() {
        let ast = json!({"a": {"dependencies": ["b"]}, "b": {"dependencies": ["c"]}, "c": {}});
        assert!(!detect(&ast));
    }

    #[test]
    fn self_reference_is_a_cycle() {
        assert!(detect(&json!({"x": "x"})));
        assert!(detect(&json!({"a": {"deps": ["a"]}})));
    }

    #[test]
    fn mutual_string_references_cycle() {
        assert!(detect(&json!({"a": "b", "b": "a"})));
    }

    #[test]
    fn three_party_requires_ring_cycles() {
        let ast = json!({
            "a": {"requires": ["b"]},
            "b": {"requires": ["c"]},
            "c": {"requires": ["a"]}
        });
        assert!(detect(&ast));
    }

    #[test]
    fn unresolvable_names_are_inert() {
        let ast = json!({"a": {"dependencies": ["nonexistent"]}, "b": "also-nowhere"});
        assert!(!detect(&ast));
    }

    #[test]
    fn plain_payloads_do_not_cycle() {
        assert!(!detect(&json!({})));
        assert!(!detect(&json!({"action": "transfer", "amount": 100})));
        assert!(!detect(&json!([1, 2, 3])));
        assert!(!detect(&json!("just a string")));
    }
}
