//! Search input and the last issued query.

use tasktree::TaskQuery;

#[derive(Debug, Clone, Default)]
pub struct QueryState {
    /// Contents of the search box
    search_text: String,
    /// Query of the most recent fetch, reissued by "Reload"
    last_query: TaskQuery,
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn search_text_mut(&mut self) -> &mut String {
        &mut self.search_text
    }

    pub fn last_query(&self) -> &TaskQuery {
        &self.last_query
    }

    pub fn set_last_query(&mut self, query: TaskQuery) {
        self.last_query = query;
    }
}
