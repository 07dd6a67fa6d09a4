//! Record trait: a persistable entity with a nullable identifier.

/// Marker + minimal interface for persistable records.
///
/// A record's identifier is `None` until the persistence collaborator has
/// assigned one on insert.
pub trait Record {
    /// Strongly-typed record identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + Send + Sync + 'static;

    /// Returns the record identifier, if the record has been persisted.
    fn id(&self) -> Option<Self::Id>;
}
