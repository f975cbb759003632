use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::store::{Entity, NameRotation, Store};
use crate::models::OffTopicChannelName;

/// In-process store with the same semantics as the Postgres one. Backs the test
/// suite and local runs without a database.
pub struct MemoryStore<T: Entity> {
    rows: Arc<RwLock<BTreeMap<T::Key, T>>>,
    sequence: AtomicI64,
}

impl<T: Entity> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(BTreeMap::new())),
            sequence: AtomicI64::new(1),
        }
    }

    /// Seed the store with already-built entities.
    pub fn with_rows(rows: impl IntoIterator<Item = T>) -> Self {
        let mut map = BTreeMap::new();
        let mut max_id = 0;
        for row in rows {
            // generated keys continue after the highest numeric key seeded
            if let Ok(id) = row.key().to_string().parse::<i64>() {
                max_id = max_id.max(id);
            }
            map.insert(row.key(), row);
        }
        Self {
            rows: Arc::new(RwLock::new(map)),
            sequence: AtomicI64::new(max_id + 1),
        }
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

impl<T: Entity> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> Store<T> for MemoryStore<T> {
    async fn list(&self, filter: &T::Filter) -> Result<Vec<T>, DatabaseError> {
        let rows = self.rows.read().await;
        Ok(rows.values().filter(|row| row.matches(filter)).cloned().collect())
    }

    async fn get(&self, key: &T::Key) -> Result<Option<T>, DatabaseError> {
        Ok(self.rows.read().await.get(key).cloned())
    }

    async fn create(&self, draft: T::Draft) -> Result<T, DatabaseError> {
        let generated_id = self.sequence.fetch_add(1, Ordering::SeqCst);
        let entity = T::from_draft(draft, generated_id);
        let mut rows = self.rows.write().await;
        if rows.contains_key(&entity.key()) {
            return Err(DatabaseError::Conflict(format!("{} {}", T::NAME, entity.key())));
        }
        rows.insert(entity.key(), entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: &T) -> Result<(), DatabaseError> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&entity.key()) {
            Some(row) => {
                *row = entity.clone();
                Ok(())
            }
            None => Err(DatabaseError::NotFound(format!("{} {} not found", T::NAME, entity.key()))),
        }
    }

    async fn delete(&self, key: &T::Key) -> Result<(), DatabaseError> {
        match self.rows.write().await.remove(key) {
            Some(_) => Ok(()),
            None => Err(DatabaseError::NotFound(format!("{} {} not found", T::NAME, key))),
        }
    }
}

#[async_trait]
impl NameRotation for MemoryStore<OffTopicChannelName> {
    async fn mark_used(&self, picked: &[String], new_rotation: bool) -> Result<(), DatabaseError> {
        let mut rows = self.rows.write().await;
        for row in rows.values_mut() {
            let is_picked = picked.contains(&row.name);
            row.used = is_picked || (row.used && !new_rotation);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewReminder, OffTopicChannelName, Reminder, ReminderFilter};
    use chrono::Utc;

    fn draft(author_id: i64) -> NewReminder {
        NewReminder::new(author_id, vec![], "water plants".into(), Utc::now(), 1, "u".into()).unwrap()
    }

    #[tokio::test]
    async fn create_assigns_increasing_ids() {
        let store = MemoryStore::<Reminder>::new();
        let first = store.create(draft(1)).await.unwrap();
        let second = store.create(draft(1)).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn list_applies_the_filter() {
        let store = MemoryStore::<Reminder>::new();
        store.create(draft(1)).await.unwrap();
        store.create(draft(2)).await.unwrap();

        let filter = ReminderFilter {
            author_id: Some(2),
            active: None,
        };
        let found = store.list(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].author_id, 2);
        assert_eq!(store.list(&ReminderFilter::default()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn seeded_rows_keep_generated_ids_unique() {
        let seeded = Reminder::from_draft(draft(1), 7);
        let store = MemoryStore::with_rows(vec![seeded]);
        let created = store.create(draft(1)).await.unwrap();
        assert_eq!(created.id, 8);
    }

    #[tokio::test]
    async fn duplicate_keys_conflict() {
        let store = MemoryStore::<OffTopicChannelName>::new();
        store.create(OffTopicChannelName::new("fun").unwrap()).await.unwrap();
        let err = store
            .create(OffTopicChannelName::new("fun").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
    }

    fn names(rows: &[(&str, bool)]) -> MemoryStore<OffTopicChannelName> {
        MemoryStore::with_rows(rows.iter().map(|(name, used)| OffTopicChannelName {
            name: name.to_string(),
            used: *used,
        }))
    }

    async fn used_names(store: &MemoryStore<OffTopicChannelName>) -> Vec<String> {
        let rows = store.list(&()).await.unwrap();
        rows.into_iter().filter(|n| n.used).map(|n| n.name).collect()
    }

    #[tokio::test]
    async fn mark_used_keeps_the_current_rotation() {
        let store = names(&[("a", true), ("b", false), ("c", false)]);
        store.mark_used(&["b".to_string()], false).await.unwrap();
        assert_eq!(used_names(&store).await, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn mark_used_starts_a_new_rotation() {
        let store = names(&[("a", true), ("b", true), ("c", false)]);
        store.mark_used(&["b".to_string(), "c".to_string()], true).await.unwrap();
        assert_eq!(used_names(&store).await, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn update_and_delete_missing_rows_are_not_found() {
        let store = MemoryStore::<Reminder>::new();
        let ghost = Reminder::from_draft(draft(1), 99);
        assert!(matches!(store.update(&ghost).await, Err(DatabaseError::NotFound(_))));
        assert!(matches!(store.delete(&99).await, Err(DatabaseError::NotFound(_))));

        let stored = store.create(draft(1)).await.unwrap();
        let mut changed = stored.clone();
        changed.active = false;
        store.update(&changed).await.unwrap();
        assert_eq!(store.get(&stored.id).await.unwrap(), Some(changed));
        store.delete(&stored.id).await.unwrap();
        assert!(store.is_empty().await);
    }
}
