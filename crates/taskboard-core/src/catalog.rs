use crate::id::{AssigneeId, TagId};
use serde::{Deserialize, Serialize};

/// Label that can be attached to tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Catalog identifier.
    pub id: TagId,
    /// Display name.
    pub name: String,
    /// CSS-style colour used by the presentation layer.
    pub color: String,
}

/// Person a task can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    /// Catalog identifier.
    pub id: AssigneeId,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
}

/// Reference data available for selection. Tasks only hold ids into it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCatalog {
    /// Known tags.
    pub tags: Vec<Tag>,
    /// Known assignees.
    pub assignees: Vec<Assignee>,
}

impl EntityCatalog {
    /// Catalog shipped with the seeded demo board.
    #[must_use]
    pub fn seed() -> Self {
        let tags = [
            (1, "Design", "#7c3aed"),
            (2, "Development", "#2563eb"),
            (3, "Bug", "#dc2626"),
            (4, "Documentation", "#059669"),
            (5, "Research", "#d97706"),
            (6, "Marketing", "#db2777"),
        ]
        .into_iter()
        .map(|(id, name, color)| Tag {
            id: TagId(id),
            name: name.to_owned(),
            color: color.to_owned(),
        })
        .collect();

        let assignees = [
            (1, "Alice Johnson", "alice@example.invalid"),
            (2, "Bob Smith", "bob@example.invalid"),
            (3, "Carol White", "carol@example.invalid"),
            (4, "David Brown", "david@example.invalid"),
            (5, "Eve Davis", "eve@example.invalid"),
        ]
        .into_iter()
        .map(|(id, name, email)| Assignee {
            id: AssigneeId(id),
            name: name.to_owned(),
            email: email.to_owned(),
        })
        .collect();

        Self { tags, assignees }
    }

    /// Look up a tag by id.
    #[must_use]
    pub fn tag(&self, id: TagId) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.id == id)
    }

    /// Look up an assignee by id.
    #[must_use]
    pub fn assignee(&self, id: AssigneeId) -> Option<&Assignee> {
        self.assignees.iter().find(|assignee| assignee.id == id)
    }

    /// Resolve tag ids to display names, skipping unknown ids.
    pub fn tag_names<'a>(&'a self, ids: &'a [TagId]) -> impl Iterator<Item = &'a str> + 'a {
        ids.iter().filter_map(|id| self.tag(*id)).map(|tag| tag.name.as_str())
    }

    /// Resolve assignee ids to display names, skipping unknown ids.
    pub fn assignee_names<'a>(
        &'a self,
        ids: &'a [AssigneeId],
    ) -> impl Iterator<Item = &'a str> + 'a {
        ids.iter()
            .filter_map(|id| self.assignee(*id))
            .map(|assignee| assignee.name.as_str())
    }
}
