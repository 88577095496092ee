mod bucket;
pub mod dump;

pub use crate::table::bucket::Bucket;
pub use crate::table::dump::Dump;

use std::{collections::TryReserveError, num::NonZeroUsize};

use thiserror::Error;

use crate::hash;

// Bucket count of the reference table.
pub const DEFAULT_BUCKETS: usize = 10;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("table has no buckets to hash into")]
    NoBuckets,
    #[error("empty key")]
    EmptyKey,
    #[error("failed to allocate table storage")]
    Allocation(#[from] TryReserveError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insert {
    // Stored at the tail of this bucket's chain
    Inserted(usize),
    // Already present in its bucket; nothing was written
    Duplicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    // `position` entries precede the match in the chain
    Found { bucket: usize, position: usize },
    // `searched` entries were compared before the chain ran out
    NotFound { bucket: usize, searched: usize },
}

impl Lookup {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found { .. })
    }

    // The bucket holding the value, if it was found.
    pub fn found_at(&self) -> Option<usize> {
        match *self {
            Lookup::Found { bucket, .. } => Some(bucket),
            Lookup::NotFound { .. } => None,
        }
    }
}

// A fixed-size, separately chained set of strings. Each key lives in the chain
// of bucket `djb2(key) % N`; `N` never changes and nothing is ever removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashTable {
    buckets: Box<[Bucket]>,
    count: NonZeroUsize,
    items: usize,
}

impl HashTable {
    pub fn new() -> HashTable {
        const COUNT: NonZeroUsize = match NonZeroUsize::new(DEFAULT_BUCKETS) {
            Some(count) => count,
            None => panic!("DEFAULT_BUCKETS is zero"),
        };
        HashTable {
            buckets: (0..DEFAULT_BUCKETS).map(|_| Bucket::new()).collect(),
            count: COUNT,
            items: 0,
        }
    }

    pub fn with_buckets(buckets: usize) -> Result<HashTable, TableError> {
        let count = NonZeroUsize::new(buckets).ok_or(TableError::NoBuckets)?;
        let mut slots = Vec::new();
        slots.try_reserve_exact(count.get())?;
        slots.resize_with(count.get(), Bucket::new);
        Ok(HashTable {
            buckets: slots.into_boxed_slice(),
            count,
            items: 0,
        })
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn len(&self) -> usize {
        self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items == 0
    }

    pub fn bucket(&self, index: usize) -> Option<&[String]> {
        self.buckets.get(index).map(Bucket::as_slice)
    }

    pub fn bucket_of(&self, key: &str) -> usize {
        hash::bucket_index(key.as_bytes(), self.count)
    }

    pub fn insert(&mut self, key: &str) -> Result<Insert, TableError> {
        if key.is_empty() {
            return Err(TableError::EmptyKey);
        }
        let index = self.bucket_of(key);
        let bucket = &mut self.buckets[index];
        if let Some(position) = bucket.position(key) {
            tracing::debug!(key, bucket = index, position, "duplicate rejected");
            return Ok(Insert::Duplicate);
        }
        bucket.push(key).map_err(|e| {
            tracing::warn!(key, bucket = index, "allocation failed: {e}");
            TableError::Allocation(e)
        })?;
        self.items += 1;
        tracing::debug!(key, bucket = index, chain = bucket.len(), "inserted");
        Ok(Insert::Inserted(index))
    }

    pub fn lookup(&self, key: &str) -> Lookup {
        let index = self.bucket_of(key);
        let bucket = &self.buckets[index];
        match bucket.position(key) {
            Some(position) => {
                tracing::debug!(key, bucket = index, position, "found");
                Lookup::Found {
                    bucket: index,
                    position,
                }
            }
            None => {
                tracing::debug!(key, bucket = index, searched = bucket.len(), "not found");
                Lookup::NotFound {
                    bucket: index,
                    searched: bucket.len(),
                }
            }
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_found()
    }

    // Every bucket in index order, with its chain.
    pub fn dump(&self) -> Dump<'_> {
        Dump::new(&self.buckets)
    }
}

impl Default for HashTable {
    fn default() -> Self {
        HashTable::new()
    }
}
