//! Repository interface and its in-memory implementation.
//!
//! Every entity table is an insertion-ordered map guarded by its own
//! `RwLock`. Queries are linear scans; iteration order is insertion order,
//! which the batch planner and the analytics reducers rely on.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// A value stored in a repository under a single `Uuid` key.
pub trait Record: Clone + Send + Sync + 'static {
    fn key(&self) -> Uuid;
}

pub trait Repository<T: Record>: Send + Sync {
    /// Insert or replace the record stored under `record.key()`.
    fn insert(&self, record: T) -> AppResult<T>;

    fn get(&self, key: &Uuid) -> AppResult<Option<T>>;

    fn list(&self) -> AppResult<Vec<T>>;

    fn filter<P>(&self, predicate: P) -> AppResult<Vec<T>>
    where
        P: FnMut(&T) -> bool;

    /// Mutate a record in place under the write lock.
    ///
    /// Returns `Ok(None)` when the key is absent. An error from `f` aborts the
    /// update; `f` must leave the record untouched when it fails.
    fn update<R, F>(&self, key: &Uuid, f: F) -> AppResult<Option<R>>
    where
        F: FnOnce(&mut T) -> AppResult<R>;

    /// Fetch the record under `key`, inserting `make()` first when missing.
    fn get_or_insert_with<F>(&self, key: Uuid, make: F) -> AppResult<T>
    where
        F: FnOnce() -> T;

    fn remove(&self, key: &Uuid) -> AppResult<bool>;

    fn count(&self) -> AppResult<usize>;
}

pub struct InMemoryRepository<T: Record> {
    name: &'static str,
    rows: RwLock<IndexMap<Uuid, T>>,
}

impl<T: Record> InMemoryRepository<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            rows: RwLock::new(IndexMap::new()),
        }
    }

    fn read(&self) -> AppResult<RwLockReadGuard<'_, IndexMap<Uuid, T>>> {
        self.rows.read().map_err(|e| self.poisoned(e))
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, IndexMap<Uuid, T>>> {
        self.rows.write().map_err(|e| self.poisoned(e))
    }

    fn poisoned<G>(&self, err: PoisonError<G>) -> AppError {
        AppError::Internal(anyhow::anyhow!("{} table lock poisoned: {}", self.name, err))
    }
}

impl<T: Record> Repository<T> for InMemoryRepository<T> {
    fn insert(&self, record: T) -> AppResult<T> {
        let mut rows = self.write()?;
        rows.insert(record.key(), record.clone());
        Ok(record)
    }

    fn get(&self, key: &Uuid) -> AppResult<Option<T>> {
        Ok(self.read()?.get(key).cloned())
    }

    fn list(&self) -> AppResult<Vec<T>> {
        Ok(self.read()?.values().cloned().collect())
    }

    fn filter<P>(&self, mut predicate: P) -> AppResult<Vec<T>>
    where
        P: FnMut(&T) -> bool,
    {
        Ok(self
            .read()?
            .values()
            .filter(|row| predicate(row))
            .cloned()
            .collect())
    }

    fn update<R, F>(&self, key: &Uuid, f: F) -> AppResult<Option<R>>
    where
        F: FnOnce(&mut T) -> AppResult<R>,
    {
        let mut rows = self.write()?;
        match rows.get_mut(key) {
            Some(row) => f(row).map(Some),
            None => Ok(None),
        }
    }

    fn get_or_insert_with<F>(&self, key: Uuid, make: F) -> AppResult<T>
    where
        F: FnOnce() -> T,
    {
        let mut rows = self.write()?;
        Ok(rows.entry(key).or_insert_with(make).clone())
    }

    fn remove(&self, key: &Uuid) -> AppResult<bool> {
        Ok(self.write()?.shift_remove(key).is_some())
    }

    fn count(&self) -> AppResult<usize> {
        Ok(self.read()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Row {
        id: Uuid,
        value: i64,
    }

    impl Record for Row {
        fn key(&self) -> Uuid {
            self.id
        }
    }

    fn row(value: i64) -> Row {
        Row {
            id: Uuid::new_v4(),
            value,
        }
    }

    #[test]
    fn list_keeps_insertion_order_after_removal() {
        let repo = InMemoryRepository::new("rows");
        let rows: Vec<Row> = (0..5).map(row).collect();
        for r in &rows {
            repo.insert(r.clone()).unwrap();
        }
        assert!(repo.remove(&rows[1].id).unwrap());

        let values: Vec<i64> = repo.list().unwrap().iter().map(|r| r.value).collect();
        assert_eq!(values, vec![0, 2, 3, 4]);
    }

    #[test]
    fn failed_update_leaves_row_untouched() {
        let repo = InMemoryRepository::new("rows");
        let r = repo.insert(row(10)).unwrap();

        let result = repo.update(&r.id, |_row: &mut Row| -> AppResult<()> {
            Err(AppError::bad_request("nope"))
        });
        assert!(result.is_err());
        assert_eq!(repo.get(&r.id).unwrap().unwrap().value, 10);
    }

    #[test]
    fn update_on_missing_key_is_none() {
        let repo: InMemoryRepository<Row> = InMemoryRepository::new("rows");
        let out = repo
            .update(&Uuid::new_v4(), |r| {
                r.value += 1;
                Ok(())
            })
            .unwrap();
        assert!(out.is_none());
    }
}
