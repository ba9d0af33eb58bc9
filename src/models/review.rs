use serde::{Deserialize, Serialize};

/// Safety summary and keywords extracted from one free-text review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewAnalysis {
    pub summary: String,
    pub keywords: Vec<String>,
}
