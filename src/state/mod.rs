//! Application state
//!
//! - [`AppStore`]: the single writer of [`AppSnapshot`], with persistence
//!   mirroring and subscriber fan-out
//! - [`NotificationQueue`]: ordered, id-unique transient messages
//! - [`Identity`] / [`Theme`]: the persisted parts of the snapshot

pub mod identity;
pub mod notifications;
pub mod store;
pub mod theme;

pub use identity::{Identity, Profile};
pub use notifications::{Notification, NotificationId, NotificationKind, NotificationQueue};
pub use store::{AppSnapshot, AppStore};
pub use theme::{ParseThemeError, Theme};
