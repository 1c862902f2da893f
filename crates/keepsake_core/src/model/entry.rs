//! Entry domain model.
//!
//! # Responsibility
//! - Define the canonical record shared by mood/item/recipe/victory
//!   projections.
//! - Provide field-level validation used by every write path.
//!
//! # Invariants
//! - `id` is stable and never reused for another entry.
//! - `created_at` is immutable; `updated_at` is bumped only by store
//!   updates and never decreases.
//! - Kind-specific fields are `Some` exactly when the kind requires them.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

use crate::model::collection::CollectionId;
use crate::time::now_ms;

/// Stable identifier for every entry.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type EntryId = Uuid;

pub const TITLE_MAX_CHARS: usize = 120;
pub const BODY_MAX_CHARS: usize = 4000;
pub const CATEGORY_MAX_CHARS: usize = 60;
pub const INGREDIENT_MAX_CHARS: usize = 200;

/// Unified category for all entry projections.
///
/// One canonical record backs several apps; the kind selects which
/// optional fields are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Dated mood diary entry with a level and an optional comment.
    Mood,
    /// Cataloged possession (tool, beauty tool, collectible, heirloom).
    Item,
    /// Recipe with ingredient lines and instructions.
    Recipe,
    /// Dated victory-journal entry.
    Victory,
}

impl EntryKind {
    /// Returns whether this kind is anchored to a calendar date.
    pub fn is_dated(self) -> bool {
        matches!(self, Self::Mood | Self::Victory)
    }
}

impl Display for EntryKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Mood => "mood",
            Self::Item => "item",
            Self::Recipe => "recipe",
            Self::Victory => "victory",
        };
        write!(f, "{label}")
    }
}

/// Five-step mood scale for `EntryKind::Mood`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodLevel {
    Awful,
    Bad,
    Okay,
    Good,
    Great,
}

impl MoodLevel {
    /// Numeric score used by averages and best/worst lookups. 1 is worst.
    pub fn score(self) -> u8 {
        match self {
            Self::Awful => 1,
            Self::Bad => 2,
            Self::Okay => 3,
            Self::Good => 4,
            Self::Great => 5,
        }
    }
}

impl Display for MoodLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Awful => "awful",
            Self::Bad => "bad",
            Self::Okay => "okay",
            Self::Good => "good",
            Self::Great => "great",
        };
        write!(f, "{label}")
    }
}

/// Item lifecycle state for `EntryKind::Item`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Actively used.
    InUse,
    /// Put away but kept.
    Stored,
    /// Lent out to someone.
    Loaned,
    /// No longer in rotation.
    Retired,
}

impl ItemStatus {
    /// Domain sort order. Lower sorts first.
    pub fn priority(self) -> u8 {
        match self {
            Self::InUse => 0,
            Self::Stored => 1,
            Self::Loaned => 2,
            Self::Retired => 3,
        }
    }
}

impl Display for ItemStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::InUse => "in use",
            Self::Stored => "stored",
            Self::Loaned => "loaned",
            Self::Retired => "retired",
        };
        write!(f, "{label}")
    }
}

/// Physical condition scale for `EntryKind::Item`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCondition {
    Mint,
    Good,
    Fair,
    Worn,
    Damaged,
}

impl ItemCondition {
    /// Ordinal rank used by sorting and best/worst lookups. 5 is best.
    pub fn rank(self) -> u8 {
        match self {
            Self::Mint => 5,
            Self::Good => 4,
            Self::Fair => 3,
            Self::Worn => 2,
            Self::Damaged => 1,
        }
    }
}

impl Display for ItemCondition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Mint => "mint",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Worn => "worn",
            Self::Damaged => "damaged",
        };
        write!(f, "{label}")
    }
}

/// Canonical domain record for all tracked data.
///
/// Kind-specific fields are optional so one storage shape can back
/// several apps without data copying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Stable global ID used for linking and favorites references.
    pub id: EntryId,
    pub kind: EntryKind,
    /// Name or title. Required for every kind except `Mood`.
    pub title: String,
    /// Comment, story, description or instructions. May be empty.
    pub body: String,
    /// Meaningful only when `kind == EntryKind::Mood`.
    pub mood: Option<MoodLevel>,
    /// Calendar anchor in epoch milliseconds. Required for dated kinds.
    pub entry_date: Option<i64>,
    /// Facet for items and recipes.
    pub category: Option<String>,
    /// Meaningful only when `kind == EntryKind::Item`.
    pub status: Option<ItemStatus>,
    /// Meaningful only when `kind == EntryKind::Item`.
    pub condition: Option<ItemCondition>,
    /// Recipe ingredient lines. Owned by the entry; they cannot outlive it.
    pub ingredients: Vec<String>,
    /// Owning collection, when the entry lives inside one.
    pub collection_id: Option<CollectionId>,
    /// Opaque identifiers handed out by the photo collaborator.
    pub photo_ids: Vec<String>,
    pub is_favorite: bool,
    /// Unix epoch milliseconds. Immutable after creation.
    pub created_at: i64,
    /// Unix epoch milliseconds. Never decreases; >= `created_at`.
    pub updated_at: i64,
}

impl Entry {
    /// Creates a new entry with a generated stable ID and current
    /// timestamps. Optional projection fields start empty.
    pub fn new(kind: EntryKind, title: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), kind, title)
    }

    /// Creates a new entry with a caller-provided stable ID.
    ///
    /// Used by import paths and by tests that need deterministic ordering.
    pub fn with_id(id: EntryId, kind: EntryKind, title: impl Into<String>) -> Self {
        let now = now_ms();
        Self {
            id,
            kind,
            title: title.into(),
            body: String::new(),
            mood: None,
            entry_date: None,
            category: None,
            status: None,
            condition: None,
            ingredients: Vec::new(),
            collection_id: None,
            photo_ids: Vec::new(),
            is_favorite: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks structural field rules for this entry's kind.
    ///
    /// Store-level rules that need sibling entries or a clock (duplicate
    /// mood days, future dates, unknown collections) live in the store.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.kind != EntryKind::Mood && self.title.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "title" });
        }
        check_len("title", &self.title, TITLE_MAX_CHARS)?;
        check_len("body", &self.body, BODY_MAX_CHARS)?;
        if let Some(category) = self.category.as_deref() {
            if category.trim().is_empty() {
                return Err(ValidationError::EmptyField { field: "category" });
            }
            check_len("category", category, CATEGORY_MAX_CHARS)?;
        }

        match self.kind {
            EntryKind::Mood => {
                if self.mood.is_none() {
                    return Err(ValidationError::MissingField {
                        field: "mood",
                        kind: self.kind,
                    });
                }
            }
            EntryKind::Item | EntryKind::Recipe | EntryKind::Victory => {
                if self.mood.is_some() {
                    return Err(ValidationError::UnexpectedField {
                        field: "mood",
                        kind: self.kind,
                    });
                }
            }
        }

        if self.kind.is_dated() {
            if self.entry_date.is_none() {
                return Err(ValidationError::MissingField {
                    field: "entry_date",
                    kind: self.kind,
                });
            }
        } else if self.entry_date.is_some() {
            return Err(ValidationError::UnexpectedField {
                field: "entry_date",
                kind: self.kind,
            });
        }

        if self.kind != EntryKind::Item && (self.status.is_some() || self.condition.is_some()) {
            return Err(ValidationError::UnexpectedField {
                field: "status/condition",
                kind: self.kind,
            });
        }

        if self.kind == EntryKind::Recipe {
            for line in &self.ingredients {
                if line.trim().is_empty() {
                    return Err(ValidationError::EmptyField {
                        field: "ingredients",
                    });
                }
                check_len("ingredients", line, INGREDIENT_MAX_CHARS)?;
            }
        } else if !self.ingredients.is_empty() {
            return Err(ValidationError::UnexpectedField {
                field: "ingredients",
                kind: self.kind,
            });
        }

        Ok(())
    }
}

fn check_len(field: &'static str, value: &str, max_chars: usize) -> Result<(), ValidationError> {
    let actual_chars = value.chars().count();
    if actual_chars > max_chars {
        return Err(ValidationError::FieldTooLong {
            field,
            max_chars,
            actual_chars,
        });
    }
    Ok(())
}

/// Validation error for entry and collection write paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is empty or whitespace.
    EmptyField { field: &'static str },
    /// Text field exceeds its character limit.
    FieldTooLong {
        field: &'static str,
        max_chars: usize,
        actual_chars: usize,
    },
    /// Field the kind requires is absent.
    MissingField {
        field: &'static str,
        kind: EntryKind,
    },
    /// Field is set on a kind that has no use for it.
    UnexpectedField {
        field: &'static str,
        kind: EntryKind,
    },
    /// Dated entry placed on a future calendar day.
    FutureDate { date_ms: i64, now_ms: i64 },
    /// Another entry already occupies this calendar day.
    DuplicateEntryDate { day: i64 },
    /// A record with this ID already exists in the store.
    DuplicateId(EntryId),
    /// A collection with this name (case-insensitive) already exists.
    DuplicateCollectionName(String),
    /// Entry references a collection the store does not know.
    UnknownCollection(CollectionId),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField { field } => write!(f, "required field `{field}` is empty"),
            Self::FieldTooLong {
                field,
                max_chars,
                actual_chars,
            } => write!(
                f,
                "field `{field}` is {actual_chars} chars, limit is {max_chars}"
            ),
            Self::MissingField { field, kind } => {
                write!(f, "kind `{kind}` requires field `{field}`")
            }
            Self::UnexpectedField { field, kind } => {
                write!(f, "kind `{kind}` does not accept field `{field}`")
            }
            Self::FutureDate { date_ms, now_ms } => {
                write!(f, "entry date {date_ms} is in the future (now {now_ms})")
            }
            Self::DuplicateEntryDate { day } => {
                write!(f, "an entry already exists for calendar day {day}")
            }
            Self::DuplicateId(id) => write!(f, "record id already present: {id}"),
            Self::DuplicateCollectionName(name) => {
                write!(f, "collection name already taken: `{name}`")
            }
            Self::UnknownCollection(id) => write!(f, "unknown collection: {id}"),
        }
    }
}

impl Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::{Entry, EntryKind, MoodLevel, ValidationError, BODY_MAX_CHARS};

    #[test]
    fn item_requires_title() {
        let entry = Entry::new(EntryKind::Item, "  ");
        assert_eq!(
            entry.validate(),
            Err(ValidationError::EmptyField { field: "title" })
        );
    }

    #[test]
    fn mood_requires_level_and_allows_blank_title() {
        let mut entry = Entry::new(EntryKind::Mood, "");
        entry.entry_date = Some(0);
        assert!(matches!(
            entry.validate(),
            Err(ValidationError::MissingField { field: "mood", .. })
        ));

        entry.mood = Some(MoodLevel::Good);
        assert_eq!(entry.validate(), Ok(()));
    }

    #[test]
    fn dated_kinds_require_entry_date() {
        let mut entry = Entry::new(EntryKind::Victory, "first 5k run");
        assert!(matches!(
            entry.validate(),
            Err(ValidationError::MissingField {
                field: "entry_date",
                ..
            })
        ));

        entry.entry_date = Some(1_000);
        assert_eq!(entry.validate(), Ok(()));
    }

    #[test]
    fn undated_kinds_reject_entry_date() {
        let mut entry = Entry::new(EntryKind::Item, "hammer");
        entry.entry_date = Some(1_000);
        assert!(matches!(
            entry.validate(),
            Err(ValidationError::UnexpectedField {
                field: "entry_date",
                ..
            })
        ));
    }

    #[test]
    fn body_length_is_capped() {
        let mut entry = Entry::new(EntryKind::Item, "hammer");
        entry.body = "x".repeat(BODY_MAX_CHARS + 1);
        assert!(matches!(
            entry.validate(),
            Err(ValidationError::FieldTooLong { field: "body", .. })
        ));
    }

    #[test]
    fn recipe_rejects_blank_ingredient_lines() {
        let mut entry = Entry::new(EntryKind::Recipe, "lemon tart");
        entry.ingredients = vec!["4 lemons".to_string(), "   ".to_string()];
        assert!(matches!(
            entry.validate(),
            Err(ValidationError::EmptyField {
                field: "ingredients"
            })
        ));
    }

    #[test]
    fn non_recipe_rejects_ingredients() {
        let mut entry = Entry::new(EntryKind::Item, "whisk");
        entry.ingredients = vec!["flour".to_string()];
        assert!(matches!(
            entry.validate(),
            Err(ValidationError::UnexpectedField {
                field: "ingredients",
                ..
            })
        ));
    }
}
