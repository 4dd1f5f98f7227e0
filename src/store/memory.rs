//! In-process store keyed by kind and integer primary key. Counts writes, which makes it
//! usable as a spy in tests.

use crate::error::AppError;
use crate::model::Instance;
use crate::store::Store;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

#[derive(Default)]
pub struct MemoryStore {
    rows: RwLock<HashMap<String, BTreeMap<i64, Instance>>>,
    next_pk: RwLock<HashMap<String, i64>>,
    saves: AtomicUsize,
    deletes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Number of successful `delete` calls.
    pub fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub fn len(&self, kind: &str) -> usize {
        self.read_rows().get(kind).map(|m| m.len()).unwrap_or(0)
    }

    fn read_rows(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, BTreeMap<i64, Instance>>> {
        self.rows.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_rows(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, BTreeMap<i64, Instance>>> {
        self.rows.write().unwrap_or_else(|e| e.into_inner())
    }

    fn allocate_pk(&self, kind: &str) -> i64 {
        let mut next = self.next_pk.write().unwrap_or_else(|e| e.into_inner());
        let slot = next.entry(kind.to_string()).or_insert(0);
        *slot += 1;
        *slot
    }
}

fn pk_of(instance: &Instance) -> Result<i64, AppError> {
    match &instance.pk {
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| AppError::BadRequest(format!("invalid id: {}", n))),
        Some(Value::String(s)) => s
            .parse()
            .map_err(|_| AppError::BadRequest(format!("invalid id: {}", s))),
        _ => Err(AppError::BadRequest(format!("{} has no primary key", instance.kind))),
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, kind: &str, pk: &str) -> Result<Option<Instance>, AppError> {
        let Ok(pk) = pk.parse::<i64>() else {
            return Ok(None);
        };
        Ok(self.read_rows().get(kind).and_then(|m| m.get(&pk)).cloned())
    }

    async fn all(&self, kind: &str) -> Result<Vec<Instance>, AppError> {
        Ok(self
            .read_rows()
            .get(kind)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn save(&self, instance: &mut Instance) -> Result<(), AppError> {
        let existing = if instance.is_saved() { Some(pk_of(instance)?) } else { None };
        let pk = {
            let mut rows = self.write_rows();
            let table = rows.entry(instance.kind.clone()).or_default();
            let pk = match existing {
                Some(pk) if !table.contains_key(&pk) => {
                    return Err(AppError::NotFound(format!("{} {}", instance.kind, pk)));
                }
                Some(pk) => pk,
                None => {
                    let pk = self.allocate_pk(&instance.kind);
                    instance.pk = Some(Value::Number(pk.into()));
                    pk
                }
            };
            table.insert(pk, instance.clone());
            pk
        };
        self.saves.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(kind = %instance.kind, pk, "memory store save");
        Ok(())
    }

    async fn delete(&self, instance: &Instance) -> Result<(), AppError> {
        let pk = pk_of(instance)?;
        let removed = self
            .write_rows()
            .get_mut(&instance.kind)
            .and_then(|m| m.remove(&pk));
        if removed.is_none() {
            return Err(AppError::NotFound(format!("{} {}", instance.kind, pk)));
        }
        self.deletes.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(kind = %instance.kind, pk, "memory store delete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_assigns_increasing_pks_per_kind() {
        let store = MemoryStore::new();
        let mut a = Instance::new("book").field("name", "A");
        let mut b = Instance::new("book").field("name", "B");
        let mut c = Instance::new("author");
        store.save(&mut a).await.unwrap();
        store.save(&mut b).await.unwrap();
        store.save(&mut c).await.unwrap();
        assert_eq!(a.pk_string().as_deref(), Some("1"));
        assert_eq!(b.pk_string().as_deref(), Some("2"));
        assert_eq!(c.pk_string().as_deref(), Some("1"));
        let all = store.all("book").await.unwrap();
        assert_eq!(all.iter().map(|i| i.to_string()).collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn update_and_delete() {
        let store = MemoryStore::new();
        let mut a = Instance::new("book").field("name", "A");
        store.save(&mut a).await.unwrap();
        a.fields.insert("name".into(), "A2".into());
        store.save(&mut a).await.unwrap();
        assert_eq!(store.get("book", "1").await.unwrap().unwrap().to_string(), "A2");
        assert_eq!(store.save_count(), 2);

        store.delete(&a).await.unwrap();
        assert_eq!(store.delete_count(), 1);
        assert!(store.get("book", "1").await.unwrap().is_none());
        assert!(matches!(store.delete(&a).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn saving_a_deleted_row_does_not_restore_it() {
        let store = MemoryStore::new();
        let mut a = Instance::new("book").field("name", "A");
        store.save(&mut a).await.unwrap();
        store.delete(&a).await.unwrap();
        assert!(matches!(store.save(&mut a).await, Err(AppError::NotFound(_))));
        assert_eq!(store.len("book"), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_save_and_delete_never_resurrect() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let mut rows = Vec::new();
        for i in 0..64 {
            let mut row = Instance::new("book").field("name", format!("B{i}"));
            store.save(&mut row).await.unwrap();
            rows.push(row);
        }
        let mut tasks = Vec::new();
        for row in rows {
            let (s1, s2) = (store.clone(), store.clone());
            let mut edited = row.clone();
            tasks.push(tokio::spawn(async move { s1.delete(&row).await.map(|_| ()) }));
            tasks.push(tokio::spawn(async move { s2.save(&mut edited).await }));
        }
        for task in tasks {
            let _ = task.await.unwrap();
        }
        assert_eq!(store.len("book"), 0);
    }

    #[tokio::test]
    async fn non_numeric_pk_is_simply_missing() {
        let store = MemoryStore::new();
        assert!(store.get("book", "abc").await.unwrap().is_none());
    }
}
