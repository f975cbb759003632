//! Endpoints under `/api/bot`.

pub mod off_topic_channel_names;
pub mod reminders;
