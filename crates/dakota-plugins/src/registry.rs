//! Plugin registration table

use crate::error::PluginError;
use crate::hydrotrend::{self, HydroTrend};
use crate::plugin::Plugin;
use crate::Result;
use std::collections::BTreeMap;

/// Checks that a plugin's underlying model can run on this machine.
pub type Probe = Box<dyn Fn() -> bool + Send + Sync>;

/// Creates a fresh plugin for one evaluation.
pub type Factory = Box<dyn Fn() -> Box<dyn Plugin> + Send + Sync>;

/// Capability probe and factory of one registered plugin.
pub struct PluginEntry {
    pub probe: Probe,
    pub factory: Factory,
}

/// Plugins known to the broker, by name.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: BTreeMap<String, PluginEntry>,
}

impl PluginRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the plugins shipped with Dakotathon.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.plugins.insert(
            hydrotrend::PLUGIN_NAME.to_string(),
            PluginEntry {
                probe: Box::new(hydrotrend::is_installed),
                factory: Box::new(|| Box::new(HydroTrend::default()) as Box<dyn Plugin>),
            },
        );
        registry
    }

    pub fn register<P, F>(&mut self, name: &str, probe: P, factory: F) -> Result<()>
    where
        P: Fn() -> bool + Send + Sync + 'static,
        F: Fn() -> Box<dyn Plugin> + Send + Sync + 'static,
    {
        if self.plugins.contains_key(name) {
            return Err(PluginError::DuplicatePlugin(name.to_string()));
        }
        self.plugins.insert(
            name.to_string(),
            PluginEntry {
                probe: Box::new(probe),
                factory: Box::new(factory),
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&PluginEntry> {
        self.plugins.get(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.plugins.keys().map(String::as_str)
    }
}
