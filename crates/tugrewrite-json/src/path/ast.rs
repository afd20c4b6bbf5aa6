// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Compiled form of a path expression.

use regex::Regex;

use crate::tree::LiteralValue;

/// Where evaluation starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// `$`: the top-level value of the tree the cursor is in.
    Root,

    /// A leading `.`, `[` or bare name: the cursor's own value.
    Current,

    /// A leading `..` (or `$..`): the steps are evaluated against every
    /// value on the cursor path and the results unioned.
    AncestorScan,
}

/// A parsed path expression.
#[derive(Debug, Clone)]
pub struct PathExpr {
    pub anchor: Anchor,
    pub steps: Vec<Step>,
}

impl PathExpr {
    /// The first `&&` or `||` anywhere in the expression.
    pub fn logical_operator(&self) -> Option<&'static str> {
        steps_logical_operator(&self.steps)
    }
}

fn steps_logical_operator(steps: &[Step]) -> Option<&'static str> {
    steps.iter().find_map(|step| match step {
        Step::Filter(filter) => filter.logical_operator(),
        _ => None,
    })
}

#[derive(Debug, Clone)]
pub enum Step {
    /// `.name`, `['name']` or `['a','b']`.
    Property(Vec<String>),

    /// `.*` or `[*]`.
    Wildcard,

    /// `[i]` or `[i,j,...]`; negative indexes count from the end.
    Index(Vec<i64>),

    /// `[start:end]`, end exclusive.
    Slice {
        start: Option<i64>,
        end: Option<i64>,
    },

    /// `[?(expr)]`.
    Filter(FilterExpr),

    /// A non-leading `..`: every object and array at or below the scope.
    Descend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
}

/// The left-hand side of a filter predicate.
#[derive(Debug, Clone)]
pub enum Operand {
    /// `@` followed by steps, relative to the candidate.
    Current(Vec<Step>),

    /// `$` followed by steps.
    Root(Vec<Step>),
}

impl Operand {
    fn steps(&self) -> &[Step] {
        match self {
            Operand::Current(steps) | Operand::Root(steps) => steps,
        }
    }
}

#[derive(Debug, Clone)]
pub enum FilterExpr {
    /// `@.name`: the operand resolves to something.
    Exists(Operand),

    /// `@.name == 'x'` or `@.name != 'x'`.
    Compare {
        left: Operand,
        op: CompareOp,
        right: LiteralValue,
    },

    /// `@.name =~ /pattern/flags`, anchored at both ends.
    Matches { left: Operand, regex: Regex },

    /// Parsed, but rejected at evaluation.
    And(Box<FilterExpr>, Box<FilterExpr>),

    /// Parsed, but rejected at evaluation.
    Or(Box<FilterExpr>, Box<FilterExpr>),
}

impl FilterExpr {
    pub fn logical_operator(&self) -> Option<&'static str> {
        match self {
            FilterExpr::And(..) => Some("&&"),
            FilterExpr::Or(..) => Some("||"),
            FilterExpr::Exists(left)
            | FilterExpr::Compare { left, .. }
            | FilterExpr::Matches { left, .. } => steps_logical_operator(left.steps()),
        }
    }
}
