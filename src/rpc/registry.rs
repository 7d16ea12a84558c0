//! Procedure registry: name → [`ProcedureEntry`].
//!
//! Populated during startup, then only read by the request loop. Entries
//! are never removed; registering an existing name replaces it (last
//! registration wins). Iteration is lexicographic by name, which is also
//! the order of the built-in `help` listing.

use alloc::collections::BTreeMap;
use alloc::string::String;
use core::fmt::Write as _;

use log::debug;

use super::codec::{Codec, PostcardCodec};
use super::procedure::{Procedure, ProcedureEntry};

/// Name under which the built-in listing is registered.
pub const HELP: &str = "help";

const HELP_DESCRIPTION: &str = "@brief Built-in method describing all available procedures";

/// Registered procedures for codec `C`.
///
/// # Usage
/// ```ignore
/// let mut registry = Registry::<PostcardCodec>::new();
/// registry.register("add", |a: i32, b: i32| a + b, "@brief Add two integers");
/// ```
pub struct Registry<C = PostcardCodec> {
    entries: BTreeMap<String, ProcedureEntry<C>>,
}

impl<C: Codec> Registry<C> {
    /// A registry holding only the built-in `help` procedure.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry
            .entries
            .insert(HELP.into(), ProcedureEntry::help(HELP_DESCRIPTION));
        registry
    }

    /// A registry with no procedures at all, not even `help`.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Register `procedure` under `name`.
    ///
    /// Returns `true` when an earlier entry with the same name was replaced.
    pub fn register<F, Args>(
        &mut self,
        name: impl Into<String>,
        procedure: F,
        description: &'static str,
    ) -> bool
    where
        F: Procedure<Args>,
        Args: 'static,
    {
        let name = name.into();
        let entry = ProcedureEntry::native(procedure, description);
        let replaced = self.entries.insert(name.clone(), entry).is_some();
        if replaced {
            debug!("RPC: '{}' re-registered, previous entry replaced", name);
        } else {
            debug!("RPC: registered '{}'", name);
        }
        replaced
    }

    pub fn get(&self, name: &str) -> Option<&ProcedureEntry<C>> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names in listing order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `help` text: one `@entry <name> - <description>` line per entry.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for (name, entry) in &self.entries {
            // Writing into a String cannot fail.
            let _ = writeln!(out, "@entry {} - {}", name, entry.description());
        }
        out
    }
}

impl<C: Codec> Default for Registry<C> {
    fn default() -> Self {
        Self::new()
    }
}
