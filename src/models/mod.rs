//! Entities of the bot database and the field rules they enforce.
//!
//! Every constructor runs its validators and returns `ValidationResult`, so an
//! entity value that exists has already passed its invariants.

pub mod datetime;
pub mod documentation_link;
pub mod filter_list;
pub mod infraction;
pub mod message;
pub mod off_topic_channel_name;
pub mod offensive_message;
pub mod reminder;
pub mod role;
pub mod user;
pub mod validation;

pub use off_topic_channel_name::OffTopicChannelName;
pub use reminder::{NewReminder, Reminder, ReminderFilter, ReminderPatch};
pub use user::{User, UserFilter};
pub use validation::{ValidationError, ValidationResult};
