//! Schema reference graph.
//!
//! Every nested reference is resolved against the whole schema set before
//! anything is emitted. Imports are derived per edge, so mutually referencing
//! schemas simply import each other; cycles are reported for inspection but
//! never need to be broken.

use crate::descriptor::SchemaDescriptor;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::paths::relative_specifier;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// A cross-file dependency of one generated file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ImportRequirement {
    /// Referenced interface name.
    pub name: String,
    /// Extension-less relative module specifier, e.g. `../users/User`.
    pub specifier: String,
}

/// A set of schemas that reference each other in a loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cycle {
    /// Qualified schema names along the loop, starting anywhere.
    pub schemas: Vec<String>,
}

/// Resolved references between schemas.
///
/// Node `i` is `schemas[i]` of the slice the graph was built from.
#[derive(Debug)]
pub struct SchemaGraph<'a> {
    schemas: &'a [SchemaDescriptor],
    edges: Vec<BTreeSet<usize>>,
    self_refs: Vec<bool>,
    imports: Vec<Vec<ImportRequirement>>,
    degraded: Vec<HashSet<usize>>,
    diagnostics: Vec<Diagnostic>,
}

enum Resolution {
    Found(usize),
    Missing,
    Ambiguous(Vec<usize>),
}

impl<'a> SchemaGraph<'a> {
    pub fn build(schemas: &'a [SchemaDescriptor]) -> Self {
        let mut by_name: HashMap<&str, Vec<usize>> = HashMap::new();
        for (i, schema) in schemas.iter().enumerate() {
            by_name.entry(schema.name.as_str()).or_default().push(i);
        }

        let mut graph = SchemaGraph {
            schemas,
            edges: vec![BTreeSet::new(); schemas.len()],
            self_refs: vec![false; schemas.len()],
            imports: Vec::with_capacity(schemas.len()),
            degraded: vec![HashSet::new(); schemas.len()],
            diagnostics: Vec::new(),
        };

        for (i, schema) in schemas.iter().enumerate() {
            let mut imports: BTreeMap<&str, String> = BTreeMap::new();

            for (f, field) in schema.fields.iter().enumerate() {
                let Some(target) = field.kind.referenced_schema() else {
                    continue;
                };
                match resolve(schemas, &by_name, i, target) {
                    Resolution::Found(j) if j == i => graph.self_refs[i] = true,
                    Resolution::Found(j) => {
                        let other = &schemas[j];
                        graph.edges[i].insert(j);
                        imports.entry(other.name.as_str()).or_insert_with(|| {
                            relative_specifier(&schema.module_path, &other.module_path, &other.name)
                        });
                    }
                    Resolution::Missing => {
                        graph.degraded[i].insert(f);
                        graph.diagnostics.push(Diagnostic::new(
                            schema.display_path(),
                            &schema.name,
                            Some(&field.name),
                            DiagnosticKind::UnresolvedReference {
                                referenced: target.to_string(),
                            },
                        ));
                    }
                    Resolution::Ambiguous(candidates) => {
                        graph.degraded[i].insert(f);
                        graph.diagnostics.push(Diagnostic::new(
                            schema.display_path(),
                            &schema.name,
                            Some(&field.name),
                            DiagnosticKind::AmbiguousReference {
                                referenced: target.to_string(),
                                candidates: candidates
                                    .iter()
                                    .map(|&c| qualified_name(&schemas[c]))
                                    .collect(),
                            },
                        ));
                    }
                }
            }

            graph.imports.push(
                imports
                    .into_iter()
                    .map(|(name, specifier)| ImportRequirement {
                        name: name.to_string(),
                        specifier,
                    })
                    .collect(),
            );
        }

        tracing::debug!(
            schemas = schemas.len(),
            edges = graph.edges.iter().map(BTreeSet::len).sum::<usize>(),
            unresolved = graph.diagnostics.len(),
            "built schema graph"
        );
        graph
    }

    pub fn schemas(&self) -> &'a [SchemaDescriptor] {
        self.schemas
    }

    /// Imports of schema `i`, sorted by referenced name.
    pub fn imports(&self, i: usize) -> &[ImportRequirement] {
        &self.imports[i]
    }

    /// Schemas that schema `i` references, excluding itself.
    pub fn dependencies(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        self.edges[i].iter().copied()
    }

    pub fn has_self_reference(&self, i: usize) -> bool {
        self.self_refs[i]
    }

    /// Whether field `field` of schema `i` failed to resolve.
    pub fn is_degraded(&self, i: usize, field: usize) -> bool {
        self.degraded[i].contains(&field)
    }

    pub fn degraded_fields(&self, i: usize) -> &HashSet<usize> {
        &self.degraded[i]
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Reference cycles between distinct schemas.
    ///
    /// The depth-first search keeps its own frame stack, so arbitrarily long
    /// reference chains are fine.
    pub fn cycles(&self) -> Vec<Cycle> {
        let n = self.schemas.len();
        let mut visited = vec![false; n];
        let mut on_stack = vec![false; n];
        let mut path: Vec<usize> = Vec::new();
        let mut found: Vec<Vec<usize>> = Vec::new();
        let mut frames: Vec<std::collections::btree_set::Iter<'_, usize>> = Vec::new();

        for start in 0..n {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            on_stack[start] = true;
            path.push(start);
            frames.push(self.edges[start].iter());

            while let Some(frame) = frames.last_mut() {
                match frame.next().copied() {
                    Some(next) if !visited[next] => {
                        visited[next] = true;
                        on_stack[next] = true;
                        path.push(next);
                        frames.push(self.edges[next].iter());
                    }
                    Some(next) => {
                        if on_stack[next] {
                            if let Some(pos) = path.iter().position(|&p| p == next) {
                                found.push(path[pos..].to_vec());
                            }
                        }
                    }
                    None => {
                        frames.pop();
                        if let Some(node) = path.pop() {
                            on_stack[node] = false;
                        }
                    }
                }
            }
        }

        // The same loop can be entered from several nodes.
        let mut seen: HashSet<Vec<usize>> = HashSet::new();
        found
            .into_iter()
            .filter(|cycle: &Vec<usize>| {
                let mut key = cycle.clone();
                key.sort_unstable();
                seen.insert(key)
            })
            .map(|cycle| Cycle {
                schemas: cycle
                    .into_iter()
                    .map(|i| qualified_name(&self.schemas[i]))
                    .collect(),
            })
            .collect()
    }
}

/// `module/path/Name`, or `Name` at the root.
pub fn qualified_name(schema: &SchemaDescriptor) -> String {
    if schema.module_path.is_empty() {
        schema.name.clone()
    } else {
        format!("{}/{}", schema.display_path(), schema.name)
    }
}

fn resolve(
    schemas: &[SchemaDescriptor],
    by_name: &HashMap<&str, Vec<usize>>,
    from: usize,
    target: &str,
) -> Resolution {
    let Some(candidates) = by_name.get(target) else {
        return Resolution::Missing;
    };
    if candidates.contains(&from) {
        return Resolution::Found(from);
    }
    if let [only] = candidates.as_slice() {
        return Resolution::Found(*only);
    }
    // Prefer the schema living next to the referrer.
    let local: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|&c| schemas[c].module_path == schemas[from].module_path)
        .collect();
    match local.as_slice() {
        [only] => Resolution::Found(*only),
        _ => Resolution::Ambiguous(candidates.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{FieldDescriptor, PrimitiveType};

    fn names(imports: &[ImportRequirement]) -> Vec<(&str, &str)> {
        imports
            .iter()
            .map(|i| (i.name.as_str(), i.specifier.as_str()))
            .collect()
    }

    #[test]
    fn mutual_references_import_each_other() {
        let schemas = vec![
            SchemaDescriptor::new("A", &["x"], vec![FieldDescriptor::nested("b", "B")]),
            SchemaDescriptor::new("B", &["y"], vec![FieldDescriptor::nested_list("a", "A")]),
        ];
        let graph = SchemaGraph::build(&schemas);

        assert_eq!(names(graph.imports(0)), [("B", "../y/B")]);
        assert_eq!(names(graph.imports(1)), [("A", "../x/A")]);
        assert!(graph.diagnostics().is_empty());

        let cycles = graph.cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].schemas, ["x/A", "y/B"]);
    }

    #[test]
    fn self_reference_has_no_import() {
        let schemas = vec![SchemaDescriptor::new(
            "Category",
            &["shop"],
            vec![
                FieldDescriptor::nested("parent", "Category").nullable(),
                FieldDescriptor::nested_list("children", "Category"),
            ],
        )];
        let graph = SchemaGraph::build(&schemas);
        assert!(graph.imports(0).is_empty());
        assert!(graph.has_self_reference(0));
        assert!(graph.cycles().is_empty());
    }

    #[test]
    fn repeated_references_import_once() {
        let schemas = vec![
            SchemaDescriptor::new(
                "Post",
                &["blog"],
                vec![
                    FieldDescriptor::nested("author", "User"),
                    FieldDescriptor::nested_list("editors", "User"),
                    FieldDescriptor::nested("tag", "Tag"),
                ],
            ),
            SchemaDescriptor::new("User", &["blog"], vec![]),
            SchemaDescriptor::new("Tag", &[], vec![]),
        ];
        let graph = SchemaGraph::build(&schemas);
        assert_eq!(
            names(graph.imports(0)),
            [("Tag", "../Tag"), ("User", "./User")]
        );
        assert_eq!(graph.dependencies(0).collect::<Vec<_>>(), [1, 2]);
    }

    #[test]
    fn missing_reference_degrades_only_that_field() {
        let schemas = vec![
            SchemaDescriptor::new(
                "Post",
                &["blog"],
                vec![
                    FieldDescriptor::primitive("id", PrimitiveType::Integer),
                    FieldDescriptor::nested("author", "Ghost"),
                ],
            ),
            SchemaDescriptor::new("User", &["blog"], vec![]),
        ];
        let graph = SchemaGraph::build(&schemas);
        assert!(graph.is_degraded(0, 1));
        assert!(!graph.is_degraded(0, 0));
        assert!(graph.imports(0).is_empty());

        let diag = &graph.diagnostics()[0];
        assert_eq!(diag.schema, "Post");
        assert_eq!(diag.field.as_deref(), Some("author"));
        assert_eq!(
            diag.kind,
            DiagnosticKind::UnresolvedReference {
                referenced: "Ghost".into()
            }
        );
    }

    #[test]
    fn duplicate_names_prefer_local_module() {
        let schemas = vec![
            SchemaDescriptor::new("Item", &["catalog"], vec![]),
            SchemaDescriptor::new("Item", &["orders"], vec![]),
            SchemaDescriptor::new("Order", &["orders"], vec![FieldDescriptor::nested_list("items", "Item")]),
            SchemaDescriptor::new("Cart", &["cart"], vec![FieldDescriptor::nested("item", "Item")]),
        ];
        let graph = SchemaGraph::build(&schemas);
        assert_eq!(names(graph.imports(2)), [("Item", "./Item")]);

        assert!(graph.is_degraded(3, 0));
        assert_eq!(
            graph.diagnostics()[0].kind,
            DiagnosticKind::AmbiguousReference {
                referenced: "Item".into(),
                candidates: vec!["catalog/Item".into(), "orders/Item".into()],
            }
        );
    }

    #[test]
    fn longer_cycle_is_reported_once() {
        let schemas = vec![
            SchemaDescriptor::new("A", &[], vec![FieldDescriptor::nested("b", "B")]),
            SchemaDescriptor::new("B", &[], vec![FieldDescriptor::nested("c", "C")]),
            SchemaDescriptor::new("C", &[], vec![FieldDescriptor::nested("a", "A")]),
        ];
        let graph = SchemaGraph::build(&schemas);
        let cycles = graph.cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].schemas, ["A", "B", "C"]);
    }

    #[test]
    fn long_chain_does_not_exhaust_the_stack() {
        let n = 100_000;
        let schemas: Vec<_> = (0..n)
            .map(|i| {
                let fields = if i + 1 < n {
                    vec![FieldDescriptor::nested("next", format!("S{}", i + 1))]
                } else {
                    vec![FieldDescriptor::nested("first", "S0")]
                };
                SchemaDescriptor::new(format!("S{i}"), &[], fields)
            })
            .collect();
        let graph = SchemaGraph::build(&schemas);
        let cycles = graph.cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].schemas.len(), n);
    }
}
