use crate::domain::customer::{Cart, User};
use crate::error::{PayLaterError, Result};
use serde::de::DeserializeOwned;
use std::io::Read;
use std::marker::PhantomData;

/// Reads seed records (users or carts) from a CSV source.
///
/// Headers name the record fields in snake_case. Whitespace around fields is
/// trimmed and an empty optional field reads as `None`.
pub struct RecordReader<R: Read, T> {
    reader: csv::Reader<R>,
    _record: PhantomData<T>,
}

impl<R: Read, T: DeserializeOwned> RecordReader<R, T> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        Self {
            reader,
            _record: PhantomData,
        }
    }

    /// Lazily deserializes records, one `Result` per row.
    pub fn records(self) -> impl Iterator<Item = Result<T>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(PayLaterError::from))
    }
}

pub type UserReader<R> = RecordReader<R, User>;
pub type CartReader<R> = RecordReader<R, Cart>;
