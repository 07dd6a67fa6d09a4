//! `ledger-events` — per-entity change notification bus.
//!
//! A record store is the single source of truth for its entity type; other
//! parties register listeners with it to be told when records of that type
//! are added, updated, deleted, or upserted. Notifications carry the list
//! of fully resolved entities affected by one write.

pub mod listener;
pub mod notifier;

pub use listener::{ChangeSource, ModelChangedListener};
pub use notifier::ChangeNotifier;
