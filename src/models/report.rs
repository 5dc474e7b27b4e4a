/// A stored report definition, addressed by its sequential id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDefinition {
    pub id: i64,
    pub name: String,
    pub source_id: String,
    pub title_search_terms: Vec<String>,
    pub all_search_terms: Vec<String>,
}

/// Input for creating a report definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewReport {
    pub name: String,
    pub source_id: String,
    pub title_search_terms: Vec<String>,
    pub all_search_terms: Vec<String>,
}

impl NewReport {
    pub fn new(name: impl Into<String>, source_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_id: source_id.into(),
            ..Default::default()
        }
    }

    /// Empty terms are skipped: they cannot be told apart from an empty list once stored.
    pub fn title_term(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        if !term.is_empty() {
            self.title_search_terms.push(term);
        }
        self
    }

    pub fn all_term(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        if !term.is_empty() {
            self.all_search_terms.push(term);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_order_and_skips_empty_terms() {
        let report = NewReport::new("Sports", "cbc-news")
            .title_term("nba")
            .title_term("")
            .title_term("nhl")
            .all_term("raptors");

        assert_eq!(report.title_search_terms, vec!["nba", "nhl"]);
        assert_eq!(report.all_search_terms, vec!["raptors"]);
    }
}
