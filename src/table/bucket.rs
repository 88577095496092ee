use std::collections::TryReserveError;

// One chain of the table. Values keep insertion order and are never removed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Bucket {
    entries: Vec<String>,
}

impl Bucket {
    pub fn new() -> Bucket {
        Bucket {
            entries: Vec::new(),
        }
    }

    pub fn position(&self, value: &str) -> Option<usize> {
        self.entries.iter().position(|e| e == value)
    }

    // Appends at the tail. On failure nothing has been written.
    pub fn push(&mut self, value: &str) -> Result<(), TryReserveError> {
        let mut owned = String::new();
        owned.try_reserve_exact(value.len())?;
        owned.push_str(value);
        self.entries.try_reserve(1)?;
        self.entries.push(owned);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.entries
    }
}
