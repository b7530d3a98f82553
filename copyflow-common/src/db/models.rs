//! Typed row models
//!
//! One struct per table, mapped at the persistence boundary. Engine code
//! never touches raw rows outside the db modules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a page.
///
/// `Draft`, `AwaitingSeo`, `AwaitingContent` and the exit from
/// `RevisionRequested` are derived from artifact presence by the transition
/// engine; `PendingReview`, `Approved` and `Rejected` change only through
/// reviewer actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageStatus {
    Draft,
    AwaitingSeo,
    AwaitingContent,
    PendingReview,
    Approved,
    Rejected,
    RevisionRequested,
}

impl PageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageStatus::Draft => "draft",
            PageStatus::AwaitingSeo => "awaiting_seo",
            PageStatus::AwaitingContent => "awaiting_content",
            PageStatus::PendingReview => "pending_review",
            PageStatus::Approved => "approved",
            PageStatus::Rejected => "rejected",
            PageStatus::RevisionRequested => "revision_requested",
        }
    }

    pub fn parse(s: &str) -> Option<PageStatus> {
        match s {
            "draft" => Some(PageStatus::Draft),
            "awaiting_seo" => Some(PageStatus::AwaitingSeo),
            "awaiting_content" => Some(PageStatus::AwaitingContent),
            "pending_review" => Some(PageStatus::PendingReview),
            "approved" => Some(PageStatus::Approved),
            "rejected" => Some(PageStatus::Rejected),
            "revision_requested" => Some(PageStatus::RevisionRequested),
            _ => None,
        }
    }
}

impl std::fmt::Display for PageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Project record (container for pages)
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub website_url: String,
    pub description: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Page record. `status` is the only engine-mutable field.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    /// URL slug, stored lowercased; unique within the project.
    pub slug: String,
    pub status: PageStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Versioned SEO keyword set for a page. Immutable once written, apart from
/// the narrow current-version correction path.
#[derive(Debug, Clone, Serialize)]
pub struct SeoArtifact {
    pub id: Uuid,
    pub page_id: Uuid,
    pub primary_keywords: Vec<String>,
    pub secondary_keywords: Vec<String>,
    pub uploaded_by: Uuid,
    pub version: i64,
    pub uploaded_at: DateTime<Utc>,
}

/// Normalized content payload produced by the content file parser.
///
/// Identical regardless of source format (CSV or spreadsheet), so the
/// content manager stays format-unaware.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedContent {
    #[serde(default)]
    pub meta_title: String,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub h1: Vec<String>,
    #[serde(default)]
    pub h2: Vec<String>,
    #[serde(default)]
    pub h3: Vec<String>,
    #[serde(default)]
    pub paragraphs: Vec<String>,
    #[serde(default)]
    pub alt_texts: Vec<String>,
}

impl NormalizedContent {
    /// True when every field is empty; such a payload is rejected at upload.
    pub fn is_empty(&self) -> bool {
        self.meta_title.is_empty()
            && self.meta_description.is_empty()
            && self.h1.is_empty()
            && self.h2.is_empty()
            && self.h3.is_empty()
            && self.paragraphs.is_empty()
            && self.alt_texts.is_empty()
    }
}

/// Versioned content body for a page.
#[derive(Debug, Clone, Serialize)]
pub struct ContentArtifact {
    pub id: Uuid,
    pub page_id: Uuid,
    pub parsed_content: NormalizedContent,
    pub source_document_url: Option<String>,
    pub uploaded_by: Uuid,
    pub version: i64,
    pub uploaded_at: DateTime<Utc>,
}

/// Classification of a keyword within one SEO artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordClass {
    Primary,
    Secondary,
}

impl KeywordClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeywordClass::Primary => "primary",
            KeywordClass::Secondary => "secondary",
        }
    }

    pub fn parse(s: &str) -> Option<KeywordClass> {
        match s {
            "primary" => Some(KeywordClass::Primary),
            "secondary" => Some(KeywordClass::Secondary),
            _ => None,
        }
    }
}

/// Market metrics for one keyword of one SEO artifact version.
/// Natural key: (seo_artifact_id, keyword); re-fetching overwrites.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordMetric {
    pub seo_artifact_id: Uuid,
    pub keyword: String,
    pub keyword_class: KeywordClass,
    pub search_volume: Option<i64>,
    pub cpc: Option<f64>,
    pub competition: Option<String>,
    pub competition_index: Option<i64>,
    pub low_top_of_page_bid: Option<f64>,
    pub high_top_of_page_bid: Option<f64>,
    pub fetched_at: DateTime<Utc>,
}

/// Automated analysis output for a page, produced outside the engine and
/// consumed read-only.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub id: Uuid,
    pub page_id: Uuid,
    pub overall_score: f64,
    pub seo_score: Option<f64>,
    pub readability_score: Option<f64>,
    pub keyword_density_score: Option<f64>,
    pub grammar_score: Option<f64>,
    pub detailed_feedback: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}
