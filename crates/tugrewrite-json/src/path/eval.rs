// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Path expression interpreter.
//!
//! Evaluation threads a scope through the steps: a single node or a list of
//! nodes. After every step the result is deduplicated by [`NodeId`] and
//! collapsed, so a one-element list becomes that element and an empty list
//! becomes no match.

use std::collections::HashSet;

use tugrewrite_core::{Cursor, NodeId, Tree};

use super::ast::{Anchor, CompareOp, FilterExpr, Operand, PathExpr, Step};
use super::{PathError, PathValue};
use crate::tree::{Json, LiteralValue};

/// Evaluates one compiled expression against one cursor.
pub(crate) struct Evaluator<'e, 'c> {
    expression: &'e str,
    compiled: &'e PathExpr,
    cursor: &'c Cursor<'c, Json>,
}

impl<'e, 'c> Evaluator<'e, 'c> {
    pub(crate) fn new(
        expression: &'e str,
        compiled: &'e PathExpr,
        cursor: &'c Cursor<'c, Json>,
    ) -> Self {
        Self {
            expression,
            compiled,
            cursor,
        }
    }

    pub(crate) fn find(&self) -> Result<Option<PathValue>, PathError> {
        if let Some(construct) = self.compiled.logical_operator() {
            return Err(PathError::Unsupported {
                input: self.expression.to_string(),
                construct: construct.to_string(),
            });
        }

        match self.compiled.anchor {
            Anchor::Root => match self.root() {
                Some(root) => self.apply_steps(PathValue::Node(root), &self.compiled.steps),
                None => Ok(None),
            },
            Anchor::Current => self.apply_steps(
                PathValue::Node(self.cursor.value().clone()),
                &self.compiled.steps,
            ),
            Anchor::AncestorScan => {
                let mut found = Vec::new();
                for ancestor in self.cursor.path() {
                    let scope = PathValue::Node(ancestor.clone());
                    if let Some(value) = self.apply_steps(scope, &self.compiled.steps)? {
                        found.extend(value.into_nodes());
                    }
                }
                Ok(collapse(found))
            }
        }
    }

    /// The top-level value: a document's value, or the outermost object or
    /// array on the cursor path.
    fn root(&self) -> Option<Json> {
        if let Some(document) = self.cursor.path().find_map(Json::as_document) {
            return Some(document.value().clone());
        }
        self.cursor
            .path()
            .filter(|value| matches!(value, Json::Object(_) | Json::Array(_)))
            .last()
            .cloned()
    }

    fn apply_steps(&self, scope: PathValue, steps: &[Step]) -> Result<Option<PathValue>, PathError> {
        let mut scope = scope;
        let mut descended = false;
        for step in steps {
            let next = if descended {
                self.apply_step_per_container(&scope, step)?
            } else {
                self.apply_step(&scope, step)?
            };
            match next {
                Some(next) => scope = next,
                None => return Ok(None),
            }
            descended = matches!(step, Step::Descend);
        }
        Ok(Some(scope))
    }

    fn apply_step(&self, scope: &PathValue, step: &Step) -> Result<Option<PathValue>, PathError> {
        let found = match step {
            Step::Property(names) => scope
                .nodes()
                .iter()
                .flat_map(|node| property(node, names))
                .collect(),
            Step::Wildcard => scope.nodes().iter().flat_map(children).collect(),
            Step::Index(indexes) => array_items(scope)
                .map(|items| select_indexes(&items, indexes))
                .unwrap_or_default(),
            Step::Slice { start, end } => array_items(scope)
                .map(|items| select_slice(&items, *start, *end))
                .unwrap_or_default(),
            Step::Filter(filter) => {
                let mut kept = Vec::new();
                for candidate in filter_candidates(scope) {
                    if self.test(filter, &candidate)? {
                        kept.push(candidate);
                    }
                }
                kept
            }
            Step::Descend => {
                let mut containers = Vec::new();
                for node in scope.nodes() {
                    collect_containers(node, &mut containers);
                }
                containers
            }
        };
        Ok(collapse(found))
    }

    /// After `..`, indexes and slices select from every array the descent
    /// reached rather than from the list of containers itself.
    fn apply_step_per_container(
        &self,
        scope: &PathValue,
        step: &Step,
    ) -> Result<Option<PathValue>, PathError> {
        let found: Vec<Json> = match step {
            Step::Index(indexes) => scope
                .nodes()
                .iter()
                .filter_map(array_elements)
                .flat_map(|items| select_indexes(&items, indexes))
                .collect(),
            Step::Slice { start, end } => scope
                .nodes()
                .iter()
                .filter_map(array_elements)
                .flat_map(|items| select_slice(&items, *start, *end))
                .collect(),
            _ => return self.apply_step(scope, step),
        };
        Ok(collapse(found))
    }

    fn test(&self, filter: &FilterExpr, candidate: &Json) -> Result<bool, PathError> {
        match filter {
            FilterExpr::Exists(operand) => Ok(self.operand(operand, candidate)?.is_some()),
            FilterExpr::Compare { left, op, right } => {
                let equal = match self.operand(left, candidate)? {
                    Some(value) => scalars(&value).iter().any(|scalar| scalar == right),
                    None => false,
                };
                Ok(match op {
                    CompareOp::Eq => equal,
                    CompareOp::Ne => !equal,
                })
            }
            FilterExpr::Matches { left, regex } => match self.operand(left, candidate)? {
                Some(value) => Ok(scalars(&value)
                    .iter()
                    .any(|scalar| regex.is_match(&scalar.to_string()))),
                None => Ok(false),
            },
            FilterExpr::And(..) | FilterExpr::Or(..) => Err(PathError::Unsupported {
                input: self.expression.to_string(),
                construct: filter.logical_operator().unwrap_or("&&").to_string(),
            }),
        }
    }

    fn operand(&self, operand: &Operand, candidate: &Json) -> Result<Option<PathValue>, PathError> {
        match operand {
            Operand::Current(steps) => self.apply_steps(PathValue::Node(candidate.clone()), steps),
            Operand::Root(steps) => match self.root() {
                Some(root) => self.apply_steps(PathValue::Node(root), steps),
                None => Ok(None),
            },
        }
    }
}

// ============================================================================
// Step helpers
// ============================================================================

/// Deduplicate by id, keeping first occurrences, then collapse.
fn collapse(nodes: Vec<Json>) -> Option<PathValue> {
    let mut seen: HashSet<NodeId> = HashSet::with_capacity(nodes.len());
    let mut unique: Vec<Json> = nodes
        .into_iter()
        .filter(|node| seen.insert(node.id()))
        .collect();
    match unique.len() {
        0 => None,
        1 => unique.pop().map(PathValue::Node),
        _ => Some(PathValue::Nodes(unique)),
    }
}

/// Members named by `names`. Documents and members are looked through to
/// their values; arrays are mapped over.
fn property(node: &Json, names: &[String]) -> Vec<Json> {
    match node {
        Json::Document(document) => property(document.value(), names),
        Json::Member(member) => property(member.value(), names),
        Json::Object(object) => object
            .member_nodes()
            .filter(|member| {
                member
                    .key_name()
                    .is_some_and(|key| names.iter().any(|name| name == key))
            })
            .map(|member| Json::Member(member.clone()))
            .collect(),
        Json::Array(array) => array
            .elements()
            .flat_map(|element| property(element, names))
            .collect(),
        _ => Vec::new(),
    }
}

/// An object's members or an array's elements.
fn children(node: &Json) -> Vec<Json> {
    match node {
        Json::Document(document) => children(document.value()),
        Json::Member(member) => children(member.value()),
        Json::Object(object) => object
            .member_nodes()
            .map(|member| Json::Member(member.clone()))
            .collect(),
        Json::Array(array) => array.elements().cloned().collect(),
        _ => Vec::new(),
    }
}

/// The items of an array-shaped scope: an array (possibly behind a
/// document or member), or a list standing in for one.
fn array_items(scope: &PathValue) -> Option<Vec<Json>> {
    match scope {
        PathValue::Nodes(nodes) => Some(nodes.clone()),
        PathValue::Node(node) => array_elements(node),
    }
}

fn array_elements(node: &Json) -> Option<Vec<Json>> {
    match node {
        Json::Array(array) => Some(array.elements().cloned().collect()),
        Json::Member(member) => array_elements(member.value()),
        Json::Document(document) => array_elements(document.value()),
        _ => None,
    }
}

fn filter_candidates(scope: &PathValue) -> Vec<Json> {
    match scope {
        PathValue::Nodes(nodes) => nodes.clone(),
        PathValue::Node(node) => match array_elements(node) {
            Some(elements) => elements,
            None => match node {
                Json::Member(member) => vec![member.value().clone()],
                Json::Document(document) => vec![document.value().clone()],
                other => vec![other.clone()],
            },
        },
    }
}

fn select_indexes(items: &[Json], indexes: &[i64]) -> Vec<Json> {
    indexes
        .iter()
        .filter_map(|&index| resolve_index(index, items.len()))
        .map(|index| items[index].clone())
        .collect()
}

/// Exclusive-end slice; out-of-range bounds are clamped.
fn select_slice(items: &[Json], start: Option<i64>, end: Option<i64>) -> Vec<Json> {
    let len = items.len();
    let start = start.map_or(0, |start| clamp_index(start, len));
    let end = end.map_or(len, |end| clamp_index(end, len));
    if start < end {
        items[start..end].to_vec()
    } else {
        Vec::new()
    }
}

/// Every object and array at or below `node`, in document order.
fn collect_containers(node: &Json, out: &mut Vec<Json>) {
    match node {
        Json::Document(document) => collect_containers(document.value(), out),
        Json::Member(member) => collect_containers(member.value(), out),
        Json::Object(object) => {
            out.push(node.clone());
            for member in object.member_nodes() {
                collect_containers(member.value(), out);
            }
        }
        Json::Array(array) => {
            out.push(node.clone());
            for element in array.elements() {
                collect_containers(element, out);
            }
        }
        _ => {}
    }
}

/// An index into `len` items; negative indexes count from the end.
fn resolve_index(index: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let resolved = if index < 0 { len + index } else { index };
    if (0..len).contains(&resolved) {
        usize::try_from(resolved).ok()
    } else {
        None
    }
}

/// A slice bound clamped to `0..=len`.
fn clamp_index(index: i64, len: usize) -> usize {
    let signed_len = i64::try_from(len).unwrap_or(i64::MAX);
    let resolved = if index < 0 { signed_len + index } else { index };
    usize::try_from(resolved.clamp(0, signed_len)).unwrap_or(len)
}

/// The literal values a filter operand compares against.
fn scalars(value: &PathValue) -> Vec<LiteralValue> {
    value
        .nodes()
        .iter()
        .filter_map(|node| match node {
            Json::Member(member) => member.value().literal_value().cloned(),
            Json::Literal(literal) => Some(literal.value().clone()),
            _ => None,
        })
        .collect()
}
