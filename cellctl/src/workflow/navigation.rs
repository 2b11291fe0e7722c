//! Client-side routes.

use crate::types::{CellId, ContactId};
use std::fmt;

/// A page the client can navigate to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Cells,
    Cell(CellId),
    CellAttendance(CellId),
    Contact(ContactId),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Cells => "/cells".to_string(),
            Route::Cell(id) => format!("/cells/{id}"),
            Route::CellAttendance(id) => format!("/cells/{id}/attendance"),
            Route::Contact(id) => format!("/contacts/{id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_paths() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(Route::Cells.path(), "/cells");
        assert_eq!(Route::Cell(id).to_string(), "/cells/550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(
            Route::CellAttendance(id).path(),
            "/cells/550e8400-e29b-41d4-a716-446655440000/attendance"
        );
        assert_eq!(Route::Contact(id).path(), "/contacts/550e8400-e29b-41d4-a716-446655440000");
    }
}
