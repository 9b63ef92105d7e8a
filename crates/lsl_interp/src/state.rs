use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::value::Value;
use crate::Fault;

/// Name/value pairs the dispatcher exposes to a single call.
///
/// Entries are visible to identifier resolution after locals and before
/// constants, and are cleared once the call returns.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    entries: HashMap<String, Value>,
}

impl ExecutionContext {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.entries.insert(name.into(), value);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything that changes while a script runs.
pub struct RuntimeState {
    globals: HashMap<String, Value>,
    pub context: ExecutionContext,
    /// Active user-function frames.
    pub depth: usize,
    /// Avatars reported by `llDetectedKey` during `touch_start`.
    pub detected: Vec<String>,
    faults: Vec<Fault>,
    rng: StdRng,
}

impl RuntimeState {
    /// A fresh state. With a seed every random draw is reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        RuntimeState {
            globals: HashMap::new(),
            context: ExecutionContext::default(),
            depth: 0,
            detected: Vec::new(),
            faults: Vec::new(),
            rng,
        }
    }

    pub fn global(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    pub fn set_global(&mut self, name: impl Into<String>, value: Value) {
        self.globals.insert(name.into(), value);
    }

    pub fn has_global(&self, name: &str) -> bool {
        self.globals.contains_key(name)
    }

    /// Globals sorted by name.
    pub fn globals(&self) -> Vec<(&str, &Value)> {
        let mut all: Vec<_> = self.globals.iter().map(|(k, v)| (k.as_str(), v)).collect();
        all.sort_by_key(|(k, _)| *k);
        all
    }

    pub fn record_fault(&mut self, fault: Fault) {
        tracing::warn!(%fault, "fault");
        self.faults.push(fault);
    }

    pub fn faults(&self) -> &[Fault] {
        &self.faults
    }

    pub fn clear_faults(&mut self) {
        self.faults.clear();
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}
