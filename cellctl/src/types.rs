//! Common type definitions.
//!
//! All entity IDs are UUIDs wrapped in type aliases so signatures say which table an ID belongs to:
//!
//! - [`CellId`]: Cell group identifier
//! - [`ContactId`]: Member/contact identifier
//! - [`ProfileId`]: Staff/leader account identifier
//! - [`PipelineStageId`]: Discipleship pipeline stage identifier
//! - [`CityId`], [`NeighborhoodId`], [`MinistryId`]: Reference data identifiers
//!
//! # Utility Functions
//!
//! - [`abbrev_uuid`]: Abbreviate UUIDs to first 8 chars for logging

use uuid::Uuid;

// Type aliases for IDs
pub type CellId = Uuid;
pub type ContactId = Uuid;
pub type ProfileId = Uuid;
pub type PipelineStageId = Uuid;
pub type CityId = Uuid;
pub type NeighborhoodId = Uuid;
pub type MinistryId = Uuid;

/// A contact's referrer is either another contact or a profile, so it has no single table.
pub type ReferrerId = Uuid;

/// Abbreviate a UUID to its first 8 characters for more readable logs and traces
/// Example: "550e8400-e29b-41d4-a716-446655440000" -> "550e8400"
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbrev_uuid() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(abbrev_uuid(&id), "550e8400");
    }
}
