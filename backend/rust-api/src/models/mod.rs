use serde::{Deserialize, Serialize};
use std::fmt;

pub mod analysis;
pub mod question;
pub mod quiz;
pub mod student;

/// Top-level quiz category. The platform tracks performance per
/// "category - subcategory" key derived from this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Coding,
    Aptitude,
    Verbal,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Coding, Category::Aptitude, Category::Verbal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Coding => "Coding",
            Category::Aptitude => "Aptitude",
            Category::Verbal => "Verbal",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Serde converters for chrono::DateTime <-> mongodb::bson::DateTime
pub(crate) mod bson_datetime_as_chrono {
    use chrono::{DateTime, Utc};
    use mongodb::bson;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let bson_dt = bson::DateTime::from_millis(date.timestamp_millis());
        bson_dt.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bson_dt = bson::DateTime::deserialize(deserializer)?;
        Ok(DateTime::from_timestamp_millis(bson_dt.timestamp_millis()).unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_serializes_to_plain_name() {
        let json = serde_json::to_string(&Category::Aptitude).unwrap();
        assert_eq!(json, "\"Aptitude\"");
        let back: Category = serde_json::from_str("\"Coding\"").unwrap();
        assert_eq!(back, Category::Coding);
    }
}
