//! Article context
//!
//! Which article of the run is being worked on, for log lines.

use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArticleCtx {
    /// 1-based position
    pub index: usize,
    pub total: usize,
}

impl ArticleCtx {
    pub fn new(index: usize, total: usize) -> Self {
        Self { index, total }
    }
}

impl Display for ArticleCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Article {}", self.index)
    }
}
