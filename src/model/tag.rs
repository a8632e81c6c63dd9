use chrono::{DateTime, Utc};

pub type TagId = i64;
pub type TagGroupId = i64;

/// Name of the seeded mutually-exclusive group
pub const STATUS_GROUP: &str = "Status";

/// Tasks carrying this tag are hidden from the default list
pub const COMPLETE_TAG: &str = "complete";

/// Tags seeded into the Status group: (name, color)
pub const STATUS_TAGS: [(&str, &str); 4] = [
    ("design", "#bb9af7"),
    ("todo", "#7aa2f7"),
    ("active", "#e0af68"),
    (COMPLETE_TAG, "#9ece6a"),
];

/// A tag. Names are unique ignoring case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    /// Hex color like "#7aa2f7"
    pub color: String,
    /// Tags in the same group are mutually exclusive on a task
    pub group_id: Option<TagGroupId>,
    pub created_at: DateTime<Utc>,
}

impl Tag {
    pub fn is_complete_tag(&self) -> bool {
        self.name.eq_ignore_ascii_case(COMPLETE_TAG)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagGroup {
    pub id: TagGroupId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Find the tag with the given id in a tag list
pub fn find_tag(tags: &[Tag], id: TagId) -> Option<&Tag> {
    tags.iter().find(|t| t.id == id)
}
