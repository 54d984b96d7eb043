//! Recall collections prepared at startup

/// Payload field carrying the content tag, indexed as a keyword
pub const TAG_FIELD: &str = "tag";

/// Collections downstream components fill with embedding vectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecallCollection {
    /// Fine-grained recall vectors
    Precise,
    /// Coarse candidate recall vectors
    Candidate,
}

impl RecallCollection {
    pub const ALL: [RecallCollection; 2] = [RecallCollection::Precise, RecallCollection::Candidate];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecallCollection::Precise => "recall_precise",
            RecallCollection::Candidate => "recall_candidate",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RecallCollection::Precise => "precise recall vectors",
            RecallCollection::Candidate => "coarse recall vectors",
        }
    }

    /// Collection name scoped to a logical database
    pub fn name(&self, database: &str) -> String {
        format!("{}_{}", database, self.as_str())
    }
}
