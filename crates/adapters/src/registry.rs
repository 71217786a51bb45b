// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The process-wide, thread-safe map from category name to runner factory.
//! Populated once at startup by `register_default_runners` and never
//! mutated afterward.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::contract::Runner;
use crate::error::RunnerError;

pub type Factory = fn() -> Box<dyn Runner>;

pub struct RunnerRegistry {
    factories: RwLock<HashMap<String, Factory>>,
}

impl Default for RunnerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RunnerRegistry {
    pub fn new() -> Self {
        Self {
            factories: RwLock::new(HashMap::new()),
        }
    }

    fn normalize(category: &str) -> String {
        category.trim().to_ascii_lowercase()
    }

    pub fn register(&self, category: &str, factory: Factory) {
        self.factories
            .write()
            .insert(Self::normalize(category), factory);
    }

    pub fn create(&self, category: &str) -> Result<Box<dyn Runner>, RunnerError> {
        let key = Self::normalize(category);
        let factories = self.factories.read();
        let factory = factories
            .get(&key)
            .ok_or_else(|| RunnerError::UnknownCategory(category.to_string()))?;
        Ok(factory())
    }

    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.read().keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
