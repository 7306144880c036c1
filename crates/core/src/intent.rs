//! Keyword intent classification.
//!
//! Deliberately simple: lowercase substring matching against fixed
//! keyword lists, first category wins. Precision is not the goal; the
//! selector only needs a coarse signal to pick between personas, and a
//! miss degrades to the first agent rather than an error.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Content,
    Seo,
    Marketing,
    Support,
    Analytics,
    General,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Seo => "seo",
            Self::Marketing => "marketing",
            Self::Support => "support",
            Self::Analytics => "analytics",
            Self::General => "general",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const CONTENT_KEYWORDS: &[&str] =
    &["write", "post", "blog", "article", "content", "social media", "tweet"];
const SEO_KEYWORDS: &[&str] = &["seo", "keyword", "ranking", "google", "search", "optimize"];
const MARKETING_KEYWORDS: &[&str] =
    &["marketing", "ad", "advertisement", "campaign", "email", "copy"];
const SUPPORT_KEYWORDS: &[&str] =
    &["help", "support", "faq", "question", "issue", "problem", "ticket"];
const ANALYTICS_KEYWORDS: &[&str] =
    &["analytics", "report", "data", "chart", "stats", "metrics"];

/// Classify a message. Categories are checked in a fixed priority order
/// (content, seo, marketing, support, analytics) so multi-topic messages
/// resolve deterministically; anything unmatched is `General`.
pub fn classify(text: &str) -> Intent {
    let lowered = text.to_lowercase();
    let hit = |keywords: &[&str]| keywords.iter().any(|keyword| lowered.contains(keyword));

    if hit(CONTENT_KEYWORDS) {
        Intent::Content
    } else if hit(SEO_KEYWORDS) {
        Intent::Seo
    } else if hit(MARKETING_KEYWORDS) {
        Intent::Marketing
    } else if hit(SUPPORT_KEYWORDS) {
        Intent::Support
    } else if hit(ANALYTICS_KEYWORDS) {
        Intent::Analytics
    } else {
        Intent::General
    }
}

#[cfg(test)]
mod tests {
    use super::{classify, Intent};

    #[test]
    fn each_category_has_a_trigger() {
        assert_eq!(classify("please write a blog post"), Intent::Content);
        assert_eq!(classify("improve my google ranking"), Intent::Seo);
        assert_eq!(classify("draft an email campaign"), Intent::Marketing);
        assert_eq!(classify("I have a problem with my ticket"), Intent::Support);
        assert_eq!(classify("show me the stats chart"), Intent::Analytics);
    }

    #[test]
    fn unmatched_text_is_general() {
        assert_eq!(classify("good morning"), Intent::General);
    }

    #[test]
    fn empty_text_is_general() {
        assert_eq!(classify(""), Intent::General);
    }

    #[test]
    fn priority_order_wins_on_multi_topic_text() {
        // Both "write" (content) and "seo" (seo) appear; content is
        // checked first.
        assert_eq!(classify("write seo keywords"), Intent::Content);
        // "campaign" (marketing) and "report" (analytics); marketing
        // outranks analytics.
        assert_eq!(classify("campaign report"), Intent::Marketing);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(classify("WRITE ME A TWEET"), Intent::Content);
    }

    #[test]
    fn substring_matching_is_preserved() {
        // "badge" contains "ad"; loose substring matching is the
        // long-standing observed behavior, kept on purpose.
        assert_eq!(classify("my badge broke"), Intent::Marketing);
    }
}
