use crate::value::MonkeyValue;
use compact_str::{CompactString, ToCompactString};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

/// A lexically nested binding table. Cloning shares the underlying frame, so
/// every closure capturing a frame observes bindings declared in it later.
#[derive(Debug, Clone)]
pub struct Environment {
    inner: Arc<Mutex<EnvironmentImpl>>,
}

#[derive(Debug)]
struct EnvironmentImpl {
    values: HashMap<CompactString, MonkeyValue>,
    parent: Option<Environment>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(EnvironmentImpl {
                values: HashMap::new(),
                parent: None,
            })),
        }
    }

    pub fn new_scope(&self) -> Self {
        Self {
            inner: Arc::new(Mutex::new(EnvironmentImpl {
                values: HashMap::new(),
                parent: Some(self.clone()),
            })),
        }
    }

    pub fn access(&self, name: &str) -> Option<MonkeyValue> {
        let inner = self.inner.lock().unwrap();
        inner.access(name)
    }

    /// Binds (or rebinds) a name in the current frame. Outer frames are
    /// never written to, so rebinding an outer name shadows it.
    pub fn declare(&mut self, name: &str, value: MonkeyValue) {
        let mut inner = self.inner.lock().unwrap();
        inner.declare(name, value)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvironmentImpl {
    pub fn access(&self, name: &str) -> Option<MonkeyValue> {
        if let Some(value) = self.values.get(name) {
            Some(value.clone())
        } else if let Some(parent) = self.parent.clone() {
            parent.access(name)
        } else {
            None
        }
    }

    pub fn declare(&mut self, name: &str, value: MonkeyValue) {
        self.values.insert(name.to_compact_string(), value);
    }
}
