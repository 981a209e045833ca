//! The fixed expense category taxonomy.

use std::{collections::HashMap, fmt, str::FromStr};

use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Closed set of expense categories. Unknown identifiers normalize to [`Category::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Category {
    Food,
    Transport,
    Shopping,
    Housing,
    Entertainment,
    Medical,
    Education,
    #[default]
    Other,
}

/// Static display metadata for a taxonomy member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryInfo {
    pub id: Category,
    pub name: &'static str,
    pub emoji: &'static str,
    pub color: &'static str,
}

/// Taxonomy table in display order.
pub static CATEGORIES: [CategoryInfo; 8] = [
    CategoryInfo {
        id: Category::Food,
        name: "Food",
        emoji: "🍽️",
        color: "#f97316",
    },
    CategoryInfo {
        id: Category::Transport,
        name: "Transport",
        emoji: "🚗",
        color: "#3b82f6",
    },
    CategoryInfo {
        id: Category::Shopping,
        name: "Shopping",
        emoji: "🛒",
        color: "#a855f7",
    },
    CategoryInfo {
        id: Category::Housing,
        name: "Housing",
        emoji: "🏠",
        color: "#10b981",
    },
    CategoryInfo {
        id: Category::Entertainment,
        name: "Entertainment",
        emoji: "🎮",
        color: "#ec4899",
    },
    CategoryInfo {
        id: Category::Medical,
        name: "Medical",
        emoji: "🏥",
        color: "#ef4444",
    },
    CategoryInfo {
        id: Category::Education,
        name: "Education",
        emoji: "📚",
        color: "#06b6d4",
    },
    CategoryInfo {
        id: Category::Other,
        name: "Other",
        emoji: "💼",
        color: "#6b7280",
    },
];

static BY_ID: Lazy<HashMap<&'static str, Category>> = Lazy::new(|| {
    CATEGORIES
        .iter()
        .map(|info| (info.id.as_str(), info.id))
        .collect()
});

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Transport => "transport",
            Category::Shopping => "shopping",
            Category::Housing => "housing",
            Category::Entertainment => "entertainment",
            Category::Medical => "medical",
            Category::Education => "education",
            Category::Other => "other",
        }
    }

    /// Resolves an identifier, falling back to `Other` for anything outside the taxonomy.
    pub fn normalize(id: &str) -> Self {
        let key = id.trim().to_ascii_lowercase();
        BY_ID.get(key.as_str()).copied().unwrap_or(Category::Other)
    }

    /// Strict lookup, `None` when the identifier is not a taxonomy member.
    pub fn lookup(id: &str) -> Option<Self> {
        BY_ID.get(id.trim().to_ascii_lowercase().as_str()).copied()
    }

    pub fn info(self) -> &'static CategoryInfo {
        // Table order mirrors declaration order.
        &CATEGORIES[self as usize]
    }

    pub fn all() -> impl Iterator<Item = Category> {
        CATEGORIES.iter().map(|info| info.id)
    }
}

impl CategoryInfo {
    /// Emoji-prefixed label, e.g. `🍽️ Food`.
    pub fn label(&self) -> String {
        format!("{} {}", self.emoji, self.name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Category::normalize(s))
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Category::normalize(&raw))
    }
}
