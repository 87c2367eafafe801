//! Mobile unit kinds.

use serde::{Deserialize, Serialize};

/// Broad kind of a mobile unit. Facilities host exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Air,
    Ground,
    Naval,
}

impl UnitKind {
    pub const ALL: [UnitKind; 3] = [UnitKind::Air, UnitKind::Ground, UnitKind::Naval];
}

impl std::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            UnitKind::Air => "air",
            UnitKind::Ground => "ground",
            UnitKind::Naval => "naval",
        };
        f.write_str(name)
    }
}
