//! Reconciliation of an account's product bindings.

use std::collections::BTreeSet;

/// Difference between the bound product set and the submitted one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingChange {
    /// Submitted but not yet bound
    pub added: BTreeSet<String>,
    /// Bound but no longer submitted
    pub removed: BTreeSet<String>,
}

impl BindingChange {
    /// Computes `added = new - old` and `removed = old - new`.
    ///
    /// An empty `new` set removes every binding.
    pub fn between(old: &BTreeSet<String>, new: &BTreeSet<String>) -> Self {
        Self {
            added: new.difference(old).cloned().collect(),
            removed: old.difference(new).cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    pub fn added_ids(&self) -> Vec<String> {
        self.added.iter().cloned().collect()
    }

    pub fn removed_ids(&self) -> Vec<String> {
        self.removed.iter().cloned().collect()
    }
}

/// Collapses a submitted product list into a set.
pub fn product_set<I, S>(ids: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ids.into_iter().map(Into::into).collect()
}
