use std::{fmt, iter::Enumerate, slice};

use crate::table::{Bucket, HashTable};

// Walks the table bucket by bucket, yielding `(index, chain)`.
// Empty buckets are yielded too, with an empty chain.
pub struct Dump<'a> {
    buckets: Enumerate<slice::Iter<'a, Bucket>>,
}

impl<'a> Dump<'a> {
    pub(crate) fn new(buckets: &'a [Bucket]) -> Dump<'a> {
        Dump {
            buckets: buckets.iter().enumerate(),
        }
    }
}

impl<'a> Iterator for Dump<'a> {
    type Item = (usize, &'a [String]);

    fn next(&mut self) -> Option<Self::Item> {
        self.buckets
            .next()
            .map(|(index, bucket)| (index, bucket.as_slice()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.buckets.size_hint()
    }
}

impl ExactSizeIterator for Dump<'_> {}

// # 0 - (Empty)
// # 3 - dog - (End)
impl fmt::Display for HashTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for (index, values) in self.dump() {
            write!(f, "# {} - ", index)?;
            if values.is_empty() {
                writeln!(f, "(Empty)")?;
                continue;
            }
            for value in values {
                write!(f, "{} - ", value)?;
            }
            writeln!(f, "(End)")?;
        }
        writeln!(f)
    }
}
