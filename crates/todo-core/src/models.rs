//! Data models for todo
//!
//! Defines the task item as the remote collection reports it, its opaque
//! identifier, the create request body and the view filter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Identifier assigned by the remote collection
///
/// Servers may send ids as JSON numbers or strings; both are kept as-is so
/// the id can be echoed back in request paths unchanged. Any JSON number is
/// accepted, including ids beyond `i64` and non-integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(Number),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{}", n),
            ItemId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl FromStr for ItemId {
    type Err = std::convert::Infallible;

    /// Text that prints back identically as an integer becomes a number;
    /// anything else (`"007"`, `"+5"`, `" 4"`) stays text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number = s
            .parse::<i64>()
            .map(Number::from)
            .or_else(|_| s.parse::<u64>().map(Number::from))
            .ok();

        Ok(match number {
            Some(n) if n.to_string() == s => ItemId::Number(n),
            _ => ItemId::Text(s.to_string()),
        })
    }
}

impl From<i64> for ItemId {
    fn from(n: i64) -> Self {
        ItemId::Number(n.into())
    }
}

impl From<i32> for ItemId {
    fn from(n: i32) -> Self {
        ItemId::Number(n.into())
    }
}

impl From<u64> for ItemId {
    fn from(n: u64) -> Self {
        ItemId::Number(n.into())
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId::Text(s.to_string())
    }
}

/// A single task as reported by the remote collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    /// Server-assigned identifier
    pub id: ItemId,
    /// Task text
    pub text: String,
    /// Whether the task is done
    #[serde(default)]
    pub completed: bool,
    /// Any further fields the server includes, kept so a server copy
    /// replaces the local one completely
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    /// Create a pending item with the given id and text
    pub fn new(id: impl Into<ItemId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            completed: false,
            extra: Map::new(),
        }
    }

    /// Builder-style completion flag
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

/// Request body for creating a task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewItem {
    pub text: String,
}

impl NewItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Which items the filtered view shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Completed,
    Pending,
}

impl Filter {
    /// All filters in display order
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Completed, Filter::Pending];

    /// Whether an item belongs in the view under this filter
    pub fn matches(self, item: &Item) -> bool {
        match self {
            Filter::All => true,
            Filter::Completed => item.completed,
            Filter::Pending => !item.completed,
        }
    }

    /// Next filter, wrapping
    pub fn next(self) -> Self {
        match self {
            Filter::All => Filter::Completed,
            Filter::Completed => Filter::Pending,
            Filter::Pending => Filter::All,
        }
    }

    /// Lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Completed => "completed",
            Filter::Pending => "pending",
        }
    }

    /// Label shown on filter buttons
    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Completed => "Completed",
            Filter::Pending => "Pending",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "completed" | "done" => Ok(Filter::Completed),
            "pending" | "todo" => Ok(Filter::Pending),
            other => Err(format!(
                "Unknown filter '{}'. Use all, completed or pending.",
                other
            )),
        }
    }
}
