//! Shared state handed to every handler.

use std::sync::Arc;

use crate::auth::TokenAuthentication;
use crate::config::Settings;
use crate::database::{DatabaseManager, MemoryStore, NameRotation, PgStore, Store};
use crate::models::{OffTopicChannelName, Reminder, User};
use crate::proxy::{LegacyProxy, ProxyError};

/// Read-only after startup. Cloning is cheap; every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub auth: Arc<TokenAuthentication>,
    pub proxy: Arc<LegacyProxy>,
    pub users: Arc<dyn Store<User>>,
    pub reminders: Arc<dyn Store<Reminder>>,
    pub off_topic_channel_names: Arc<dyn NameRotation>,
}

/// The persistence backends the handlers talk to.
pub struct Stores {
    pub users: Arc<dyn Store<User>>,
    pub reminders: Arc<dyn Store<Reminder>>,
    pub off_topic_channel_names: Arc<dyn NameRotation>,
}

impl Stores {
    pub fn postgres(database: &DatabaseManager) -> Self {
        let pool = database.pool().clone();
        Self {
            users: Arc::new(PgStore::<User>::new(pool.clone())),
            reminders: Arc::new(PgStore::<Reminder>::new(pool.clone())),
            off_topic_channel_names: Arc::new(PgStore::<OffTopicChannelName>::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(MemoryStore::<User>::new()),
            reminders: Arc::new(MemoryStore::<Reminder>::new()),
            off_topic_channel_names: Arc::new(MemoryStore::<OffTopicChannelName>::new()),
        }
    }
}

impl AppState {
    pub fn new(settings: Settings, stores: Stores) -> Result<Self, ProxyError> {
        let auth = TokenAuthentication::new(&settings.auth_token, settings.debug);
        let proxy = LegacyProxy::new(&settings)?;
        Ok(Self {
            settings: Arc::new(settings),
            auth: Arc::new(auth),
            proxy: Arc::new(proxy),
            users: stores.users,
            reminders: stores.reminders,
            off_topic_channel_names: stores.off_topic_channel_names,
        })
    }
}
