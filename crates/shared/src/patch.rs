//! Partial element updates

use serde::{Deserialize, Serialize};

use crate::{ElementProperties, Transform};

/// Partial update applied to a `BuildingElement`.
///
/// Fields left as `None` keep the element's current value. Applying a patch
/// never changes the element id or kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<ElementProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
}

impl ElementPatch {
    /// Patch that only replaces the transform
    pub fn transform(transform: Transform) -> Self {
        Self {
            transform: Some(transform),
            ..Self::default()
        }
    }

    /// Patch that only replaces the properties
    pub fn properties(properties: ElementProperties) -> Self {
        Self {
            properties: Some(properties),
            ..Self::default()
        }
    }

    /// True if the patch would not change anything
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.transform.is_none()
            && self.properties.is_none()
            && self.visible.is_none()
            && self.locked.is_none()
    }
}
