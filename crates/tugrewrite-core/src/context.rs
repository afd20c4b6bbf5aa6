// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Per-document mutable state threaded through a traversal.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// How serious a [`Diagnostic`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A message recorded while visiting a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Name of the recipe or visitor that produced it, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            source: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// The context object passed by `&mut` through every visit call.
///
/// One context belongs to one document visit. It is the only intentionally
/// mutable state during a traversal: diagnostics, plus a typed message map
/// visitors use to hand flags to later calls.
#[derive(Default)]
pub struct ExecutionContext {
    diagnostics: Vec<Diagnostic>,
    messages: HashMap<String, Box<dyn Any + Send>>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(severity = ?diagnostic.severity, "{}", diagnostic.message);
        self.diagnostics.push(diagnostic);
    }

    /// Record an error without interrupting the traversal.
    pub fn on_error(&mut self, error: &dyn std::error::Error) {
        self.add_diagnostic(Diagnostic::new(Severity::Error, error.to_string()));
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.add_diagnostic(Diagnostic::new(Severity::Warning, message));
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn put_message<V: Any + Send>(&mut self, key: impl Into<String>, value: V) {
        self.messages.insert(key.into(), Box::new(value));
    }

    pub fn get_message<V: Any + Send>(&self, key: &str) -> Option<&V> {
        self.messages.get(key)?.downcast_ref::<V>()
    }

    pub fn get_message_mut<V: Any + Send>(&mut self, key: &str) -> Option<&mut V> {
        self.messages.get_mut(key)?.downcast_mut::<V>()
    }

    /// Get the message under `key`, inserting `default()` first if absent.
    pub fn compute_message<V: Any + Send>(
        &mut self,
        key: &str,
        default: impl FnOnce() -> V,
    ) -> Option<&mut V> {
        self.messages
            .entry(key.to_string())
            .or_insert_with(|| Box::new(default()) as Box<dyn Any + Send>)
            .downcast_mut::<V>()
    }

    pub fn remove_message(&mut self, key: &str) -> bool {
        self.messages.remove(key).is_some()
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("diagnostics", &self.diagnostics)
            .field("messages", &self.messages.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_typed() {
        let mut ctx = ExecutionContext::new();
        ctx.put_message("count", 3usize);
        assert_eq!(ctx.get_message::<usize>("count"), Some(&3));
        assert_eq!(ctx.get_message::<String>("count"), None);
        *ctx.get_message_mut::<usize>("count").unwrap() += 1;
        assert_eq!(ctx.get_message::<usize>("count"), Some(&4));
        assert!(ctx.remove_message("count"));
        assert!(!ctx.remove_message("count"));
    }

    #[test]
    fn test_compute_message() {
        let mut ctx = ExecutionContext::new();
        ctx.compute_message("seen", Vec::<String>::new)
            .unwrap()
            .push("a".to_string());
        ctx.compute_message("seen", Vec::<String>::new)
            .unwrap()
            .push("b".to_string());
        assert_eq!(ctx.get_message::<Vec<String>>("seen").unwrap().len(), 2);
    }

    #[test]
    fn test_diagnostics_serialize() {
        let mut ctx = ExecutionContext::new();
        ctx.warn("odd key");
        let diagnostics = ctx.take_diagnostics();
        assert!(ctx.diagnostics().is_empty());
        let json = serde_json::to_string(&diagnostics).unwrap();
        assert_eq!(json, r#"[{"severity":"warning","message":"odd key"}]"#);
    }
}
