use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Generate a fresh random identifier.
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Stable identifier of a registered user.
    UserId
);
string_id!(
    /// Identifier of a skill offering or request.
    SkillId
);
string_id!(
    /// Identifier of a two-party conversation.
    ConversationId
);
string_id!(MessageId);

/// Which side of the exchange a skill entry sits on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SkillKind {
    /// The owner can teach it.
    Offering,
    /// The owner wants to learn it.
    Requesting,
}

impl SkillKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Offering => "offering",
            Self::Requesting => "requesting",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "offering" => Some(Self::Offering),
            "requesting" => Some(Self::Requesting),
            _ => None,
        }
    }

    /// The kind an entry must have to pair with this one.
    pub fn opposite(&self) -> Self {
        match self {
            Self::Offering => Self::Requesting,
            Self::Requesting => Self::Offering,
        }
    }
}

impl fmt::Display for SkillKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a user turned up in someone's match list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// The other user requests a category the viewer offers.
    WantsToLearn,
    /// The other user offers a category the viewer requests.
    CanTeach,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WantsToLearn => "wants_to_learn",
            Self::CanTeach => "can_teach",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Skill category.
///
/// Values outside the known set are kept verbatim in [`Category::Other`] so
/// they still compare equal to each other and round-trip through storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Programming,
    Design,
    Language,
    Music,
    Fitness,
    Cooking,
    Business,
    Academic,
    Other(String),
}

impl Category {
    /// Storage key, e.g. `"music"`.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Programming => "programming",
            Self::Design => "design",
            Self::Language => "language",
            Self::Music => "music",
            Self::Fitness => "fitness",
            Self::Cooking => "cooking",
            Self::Business => "business",
            Self::Academic => "academic",
            Self::Other(s) => s,
        }
    }

    /// Human-readable label; unknown categories fall back to their key.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Programming => "Programming",
            Self::Design => "Design",
            Self::Language => "Languages",
            Self::Music => "Music",
            Self::Fitness => "Fitness",
            Self::Cooking => "Cooking",
            Self::Business => "Business",
            Self::Academic => "Academic",
            Self::Other(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        match s {
            "programming" => Self::Programming,
            "design" => Self::Design,
            "language" => Self::Language,
            "music" => Self::Music,
            "fitness" => Self::Fitness,
            "cooking" => Self::Cooking,
            "business" => Self::Business,
            "academic" => Self::Academic,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        match Category::from(s.as_str()) {
            Self::Other(_) => Self::Other(s),
            known => known,
        }
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        match c {
            Category::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_known_and_fallback() {
        assert_eq!(Category::from("language"), Category::Language);
        assert_eq!(Category::Language.display_name(), "Languages");

        let odd = Category::from("woodwork");
        assert!(!odd.is_known());
        assert_eq!(odd.display_name(), "woodwork");
        assert_eq!(odd, Category::from("woodwork".to_string()));
        assert_ne!(odd, Category::from("Woodwork"));
    }

    #[test]
    fn test_category_serde_as_plain_string() {
        let json = serde_json::to_string(&Category::Cooking).unwrap();
        assert_eq!(json, "\"cooking\"");

        let parsed: Category = serde_json::from_str("\"knitting\"").unwrap();
        assert_eq!(parsed, Category::Other("knitting".into()));
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"knitting\"");
    }

    #[test]
    fn test_kind_and_match_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&SkillKind::Requesting).unwrap(),
            "\"requesting\""
        );
        assert_eq!(
            serde_json::to_string(&MatchType::WantsToLearn).unwrap(),
            "\"wants_to_learn\""
        );
        assert_eq!(SkillKind::parse("offering"), Some(SkillKind::Offering));
        assert_eq!(SkillKind::parse("all"), None);
        assert_eq!(SkillKind::Offering.opposite(), SkillKind::Requesting);
    }

    #[test]
    fn test_generated_ids_unique() {
        let a = UserId::generate();
        let b = UserId::generate();
        assert_ne!(a, b);
        assert_eq!(UserId::from("user1").to_string(), "user1");
    }
}
