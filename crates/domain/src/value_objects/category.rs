//! Category - the closed set of knowledge classifications.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// Classification of a knowledge item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    ErrorHandling,
    Testing,
    Performance,
    Security,
    CleanCode,
    Architecture,
    Other,
}

impl Category {
    /// Stable key used in storage and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::ErrorHandling => "error_handling",
            Category::Testing => "testing",
            Category::Performance => "performance",
            Category::Security => "security",
            Category::CleanCode => "clean_code",
            Category::Architecture => "architecture",
            Category::Other => "other",
        }
    }

    /// Japanese label rendered into the knowledge prompt.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::ErrorHandling => "エラーハンドリング",
            Category::Testing => "テスト",
            Category::Performance => "パフォーマンス",
            Category::Security => "セキュリティ",
            Category::CleanCode => "クリーンコード",
            Category::Architecture => "アーキテクチャ",
            Category::Other => "その他",
        }
    }

    /// Parse from the stable key.
    pub fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "error_handling" => Ok(Category::ErrorHandling),
            "testing" => Ok(Category::Testing),
            "performance" => Ok(Category::Performance),
            "security" => Ok(Category::Security),
            "clean_code" => Ok(Category::CleanCode),
            "architecture" => Ok(Category::Architecture),
            "other" => Ok(Category::Other),
            _ => Err(DomainError::InvalidCategory(s.to_string())),
        }
    }

    /// All categories, in stats display order.
    pub fn all() -> [Category; 7] {
        [
            Category::ErrorHandling,
            Category::Testing,
            Category::Performance,
            Category::Security,
            Category::CleanCode,
            Category::Architecture,
            Category::Other,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
