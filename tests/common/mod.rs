//! Shared helpers for integration tests.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use pathmint::{ErrorPolicy, FileContext, MetaValue, Provider, ProviderRegistry, TemplateEngine};

/// A provider backed by a fixed `name` / `name:subfield` table, standing in
/// for the heavyweight extractors a host would register.
pub struct TableProvider {
    values: HashMap<String, MetaValue>,
}

impl TableProvider {
    pub fn new(entries: &[(&str, MetaValue)]) -> Self {
        Self {
            values: entries
                .iter()
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect(),
        }
    }
}

impl Provider for TableProvider {
    fn lookup(&self, name: &str, subfield: Option<&str>, _ctx: &FileContext) -> Result<MetaValue> {
        let key = match subfield {
            Some(sub) => format!("{name}:{sub}"),
            None => name.to_string(),
        };
        Ok(self
            .values
            .get(&key)
            .cloned()
            .unwrap_or(MetaValue::Null))
    }
}

/// An engine whose registry has the built-in defaults plus a table provider
/// registered for `names`.
pub fn engine_with_table(names: &[&str], entries: &[(&str, MetaValue)]) -> TemplateEngine {
    let mut registry = ProviderRegistry::with_defaults();
    registry.register(names, Arc::new(TableProvider::new(entries)), ErrorPolicy::Hard);
    TemplateEngine::new(registry)
}

pub fn list(values: &[&str]) -> MetaValue {
    MetaValue::List(values.iter().map(|v| v.to_string()).collect())
}
