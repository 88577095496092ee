pub mod console;
pub mod hash;
pub mod table;

pub use crate::table::{HashTable, Insert, Lookup, TableError};
