// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Recipes and the runner that applies them across many documents.
//!
//! A [`Recipe`] supplies a visitor per document. A [`ScanningRecipe`] runs in
//! two phases: a read-only scan over *every* document that fills a shared
//! accumulator, then a transform phase over every document that reads the
//! finished accumulator. The runner treats the phase boundary as a hard
//! barrier.
//!
//! # Concurrency
//!
//! Documents are independent: each gets its own visitor instance and its own
//! [`ExecutionContext`], and with [`RunOptions::parallel`] they are visited
//! on the rayon pool. Within a document the visit is single-threaded. The
//! accumulator of a scanning recipe is shared by reference across scan
//! visits, so its type must provide its own synchronization.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::{Diagnostic, ExecutionContext};
use crate::tree::Tree;
use crate::visitor::TreeVisitor;

/// A boxed document visitor driven with an [`ExecutionContext`].
pub type BoxedVisitor<'a, T> = Box<dyn TreeVisitor<T, ExecutionContext> + 'a>;

/// A single-pass transformation.
pub trait Recipe<T>: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// A fresh visitor for one document.
    fn visitor(&self) -> BoxedVisitor<'_, T>;
}

/// A transformation that first gathers information from the whole corpus.
pub trait ScanningRecipe<T>: Send + Sync {
    /// Corpus-wide state shared by all scan visits.
    type Acc: Send + Sync;

    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    fn initial_value(&self) -> Self::Acc;

    /// A read-only visitor that records into `acc`.
    fn scanner<'a>(&'a self, acc: &'a Self::Acc) -> BoxedVisitor<'a, T>;

    /// The rewriting visitor, run after every scan has finished.
    fn visitor<'a>(&'a self, acc: &'a Self::Acc) -> BoxedVisitor<'a, T>;
}

/// Options for [`RecipeRunner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Visit documents on the rayon thread pool.
    pub parallel: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl RunOptions {
    pub fn sequential() -> Self {
        Self { parallel: false }
    }
}

/// The outcome of running a recipe over one document.
#[derive(Debug, Clone)]
pub struct Change<T> {
    pub before: T,
    pub after: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T: Tree> Change<T> {
    /// True when the recipe produced a different tree (by identity).
    pub fn is_changed(&self) -> bool {
        !self.before.is_same(&self.after)
    }
}

/// Applies recipes to a batch of documents.
#[derive(Debug, Clone, Default)]
pub struct RecipeRunner {
    options: RunOptions,
}

impl RecipeRunner {
    pub fn new(options: RunOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> RunOptions {
        self.options
    }

    /// Run a single-pass recipe. Results are in input order.
    pub fn run<T, R>(&self, recipe: &R, documents: &[T]) -> Vec<Change<T>>
    where
        T: Tree,
        R: Recipe<T> + ?Sized,
    {
        debug!(
            recipe = recipe.name(),
            documents = documents.len(),
            parallel = self.options.parallel,
            "running recipe"
        );
        self.for_each_document(documents, |document| {
            let mut ctx = ExecutionContext::new();
            let mut visitor = recipe.visitor();
            let after = visitor.visit_if_applicable(document, &mut ctx);
            Change {
                before: document.clone(),
                after,
                diagnostics: ctx.take_diagnostics(),
            }
        })
    }

    /// Run a two-phase recipe: scan every document, then transform every
    /// document against the finished accumulator.
    pub fn run_scanning<T, R>(&self, recipe: &R, documents: &[T]) -> Vec<Change<T>>
    where
        T: Tree,
        R: ScanningRecipe<T> + ?Sized,
    {
        let acc = recipe.initial_value();

        debug!(
            recipe = recipe.name(),
            documents = documents.len(),
            "scan phase"
        );
        // Collecting here is the barrier: every scan returns before any
        // transform visitor is created.
        let scan_diagnostics: Vec<Vec<Diagnostic>> = self.for_each_document(documents, |document| {
            let mut ctx = ExecutionContext::new();
            let mut scanner = recipe.scanner(&acc);
            scanner.visit_if_applicable(document, &mut ctx);
            ctx.take_diagnostics()
        });

        debug!(recipe = recipe.name(), "transform phase");
        let changes = self.for_each_document(documents, |document| {
            let mut ctx = ExecutionContext::new();
            let mut visitor = recipe.visitor(&acc);
            let after = visitor.visit_if_applicable(document, &mut ctx);
            Change {
                before: document.clone(),
                after,
                diagnostics: ctx.take_diagnostics(),
            }
        });

        changes
            .into_iter()
            .zip(scan_diagnostics)
            .map(|(mut change, mut scanned)| {
                scanned.append(&mut change.diagnostics);
                change.diagnostics = scanned;
                change
            })
            .collect()
    }

    fn for_each_document<T, U, F>(&self, documents: &[T], f: F) -> Vec<U>
    where
        T: Sync,
        U: Send,
        F: Fn(&T) -> U + Sync + Send,
    {
        if self.options.parallel {
            documents.par_iter().map(f).collect()
        } else {
            documents.iter().map(f).collect()
        }
    }
}
