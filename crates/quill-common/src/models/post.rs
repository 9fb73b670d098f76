use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The fixed set of post categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    General,
    Technology,
    Lifestyle,
    Travel,
    Food,
    Health,
    Education,
    Business,
    Entertainment,
    Tutorial,
    Sports,
}

impl Category {
    pub const ALL: [Category; 11] = [
        Category::General,
        Category::Technology,
        Category::Lifestyle,
        Category::Travel,
        Category::Food,
        Category::Health,
        Category::Education,
        Category::Business,
        Category::Entertainment,
        Category::Tutorial,
        Category::Sports,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "General",
            Category::Technology => "Technology",
            Category::Lifestyle => "Lifestyle",
            Category::Travel => "Travel",
            Category::Food => "Food",
            Category::Health => "Health",
            Category::Education => "Education",
            Category::Business => "Business",
            Category::Entertainment => "Entertainment",
            Category::Tutorial => "Tutorial",
            Category::Sports => "Sports",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ();

    /// Case-sensitive: category values are stored exactly as listed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or(())
    }
}

/// Post model as returned to clients.
///
/// `author_name` is a snapshot of the author's username taken at creation;
/// it never updates afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub post_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub author_id: Uuid,
    pub author_name: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_round_trip() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn test_category_parse_rejects_unknown() {
        assert!("Gardening".parse::<Category>().is_err());
        assert!("".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_parse_is_case_sensitive() {
        assert!("technology".parse::<Category>().is_err());
        assert_eq!("Technology".parse::<Category>(), Ok(Category::Technology));
    }
}
