use serde::{Deserialize, Serialize};

/// A security team. Only rotating teams take part in the weekly F/N/S cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub is_rotating: bool,
}

impl Team {
    pub fn new(id: i64, name: impl Into<String>, is_rotating: bool) -> Self {
        Self {
            id,
            name: name.into(),
            is_rotating,
        }
    }
}
