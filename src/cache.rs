// ============================================
// src/cache.rs
// Write-buffering storage overlay

use std::collections::BTreeMap;
use std::ops::Bound;

use cosmwasm_std::{Order, Record, Storage};

/// Buffers writes on top of a parent store. Nothing reaches the parent until
/// [`CacheStorage::commit`]; dropping the cache discards every write.
pub struct CacheStorage<'a> {
    parent: &'a mut dyn Storage,
    /// `None` marks a pending delete.
    pending: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a> CacheStorage<'a> {
    pub fn new(parent: &'a mut dyn Storage) -> Self {
        CacheStorage {
            parent,
            pending: BTreeMap::new(),
        }
    }

    pub fn pending_writes(&self) -> usize {
        self.pending.len()
    }

    /// Flushes buffered writes to the parent in key order.
    pub fn commit(self) {
        let CacheStorage { parent, pending } = self;
        for (key, value) in pending {
            match value {
                Some(value) => parent.set(&key, &value),
                None => parent.remove(&key),
            }
        }
    }
}

impl Storage for CacheStorage<'_> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.pending.get(key) {
            Some(value) => value.clone(),
            None => self.parent.get(key),
        }
    }

    fn range<'b>(
        &'b self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Record> + 'b> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> = self
            .parent
            .range(start, end, Order::Ascending)
            .collect();

        let lower = start.map_or(Bound::Unbounded, |s| Bound::Included(s.to_vec()));
        let upper = end.map_or(Bound::Unbounded, |e| Bound::Excluded(e.to_vec()));
        if !matches!((&lower, &upper), (Bound::Included(s), Bound::Excluded(e)) if s >= e) {
            for (key, value) in self.pending.range((lower, upper)) {
                match value {
                    Some(value) => {
                        merged.insert(key.clone(), value.clone());
                    }
                    None => {
                        merged.remove(key);
                    }
                }
            }
        }

        match order {
            Order::Ascending => Box::new(merged.into_iter()),
            Order::Descending => Box::new(merged.into_iter().rev()),
        }
    }

    fn set(&mut self, key: &[u8], value: &[u8]) {
        self.pending.insert(key.to_vec(), Some(value.to_vec()));
    }

    fn remove(&mut self, key: &[u8]) {
        self.pending.insert(key.to_vec(), None);
    }
}
