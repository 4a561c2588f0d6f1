use crate::content::{ComponentContent, ComponentType};
use crate::ids::{ComponentId, SectionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single typed content unit inside a section.
///
/// `order` is dense within the owning section. `parent_id` links nested
/// components to another component of the same section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,
    pub section_id: SectionId,
    pub name: String,
    pub order: u32,
    pub content: ComponentContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ComponentId>,
    #[serde(default)]
    pub hidden: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Component {
    pub fn new(section_id: SectionId, name: impl Into<String>, content: ComponentContent) -> Self {
        let now = Utc::now();
        Self {
            id: ComponentId::new(),
            section_id,
            name: name.into(),
            order: 0,
            content,
            parent_id: None,
            hidden: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_parent(mut self, parent_id: ComponentId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn component_type(&self) -> ComponentType {
        self.content.component_type()
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
