use async_trait::async_trait;
use std::fmt;

use crate::database::manager::DatabaseError;
use crate::models::OffTopicChannelName;

/// A persisted entity as seen by the persistence gateway.
///
/// `Draft` is the validated input for `create`; the store turns it into the entity,
/// assigning a generated key where the table has one.
pub trait Entity: Clone + Send + Sync + 'static {
    type Key: Ord + Clone + Send + Sync + fmt::Debug + fmt::Display;
    type Filter: Default + Send + Sync;
    type Draft: Send + Sync;

    /// Human readable name used in error messages
    const NAME: &'static str;

    fn key(&self) -> Self::Key;

    fn matches(&self, filter: &Self::Filter) -> bool;

    fn from_draft(draft: Self::Draft, generated_id: i64) -> Self;
}

/// Generic CRUD access to one entity type.
#[async_trait]
pub trait Store<T: Entity>: Send + Sync {
    async fn list(&self, filter: &T::Filter) -> Result<Vec<T>, DatabaseError>;

    async fn get(&self, key: &T::Key) -> Result<Option<T>, DatabaseError>;

    async fn create(&self, draft: T::Draft) -> Result<T, DatabaseError>;

    /// Replace the stored entity with the same key. `NotFound` if absent.
    async fn update(&self, entity: &T) -> Result<(), DatabaseError>;

    /// `NotFound` if absent.
    async fn delete(&self, key: &T::Key) -> Result<(), DatabaseError>;
}

/// Off-topic channel names plus the rotation bookkeeping, applied as one unit.
#[async_trait]
pub trait NameRotation: Store<OffTopicChannelName> {
    /// Mark `picked` as used. With `new_rotation` every other name becomes unused
    /// in the same step.
    async fn mark_used(&self, picked: &[String], new_rotation: bool) -> Result<(), DatabaseError>;
}
