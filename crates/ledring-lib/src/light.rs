//! Light records as returned by the light service.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::color;
use crate::error::Result;

/// Group a light belongs to (`groupByGroup` on the wire).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One light. Fields the service sends beyond these are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub id: u32,
    pub color: String,
    pub on: bool,
    /// Absent or `null` means ungrouped.
    #[serde(
        rename = "groupByGroup",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub group: Option<Group>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Light {
    pub fn new(id: u32, color: &str, on: bool) -> Self {
        Self {
            id,
            color: color.to_string(),
            on,
            group: None,
            extra: Map::new(),
        }
    }

    pub fn in_group(mut self, name: &str) -> Self {
        self.group = Some(Group {
            name: Some(name.to_string()),
            extra: Map::new(),
        });
        self
    }

    /// The group name, when the light has a group with a non-empty name.
    pub fn group_name(&self) -> Option<&str> {
        self.group
            .as_ref()
            .and_then(|g| g.name.as_deref())
            .filter(|n| !n.is_empty())
    }

    pub fn is_grouped(&self) -> bool {
        self.group_name().is_some()
    }

    /// The color in canonical `#rrggbb` form.
    pub fn normalized_color(&self) -> Result<String> {
        color::normalize_color(&self.color)
    }
}

/// Envelope returned by both the collection and the per-id endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LightsResponse {
    pub lights: Vec<Light>,
}
