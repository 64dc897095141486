use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::{Result, bail};

use super::KeyValueStore;

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, String>,
    writes: usize,
    quota: Option<usize>,
    fail_writes: bool,
}

/// In-memory store. Clones share the same map, so a test can keep a handle
/// while the `TaskStore` owns another one.
#[derive(Debug, Clone, Default)]
pub struct MemoryKv {
    inner: Rc<RefCell<Inner>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose `set` fails once a single value exceeds `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        let kv = Self::default();
        kv.inner.borrow_mut().quota = Some(bytes);
        kv
    }

    /// Seed a raw value without counting it as a write.
    pub fn seed(&self, key: &str, value: &str) {
        self.inner
            .borrow_mut()
            .entries
            .insert(key.to_string(), value.to_string());
    }

    /// Number of successful `set` calls so far.
    pub fn writes(&self) -> usize {
        self.inner.borrow().writes
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.borrow_mut().fail_writes = fail;
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().entries.get(key).cloned()
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.raw(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_writes {
            bail!("write to '{key}' rejected");
        }
        if let Some(quota) = inner.quota
            && value.len() > quota
        {
            bail!("quota exceeded writing '{key}' ({} > {quota} bytes)", value.len());
        }
        inner.entries.insert(key.to_string(), value.to_string());
        inner.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.inner.borrow_mut().entries.remove(key);
        Ok(())
    }
}
