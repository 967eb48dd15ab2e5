#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterClause {
    pub property: String, // bind parameter name
    pub column: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryFragment {
    pub list_statement_id: String,
    pub count_statement_id: String,
    pub select_body: String,
    pub count_body: String,
    pub filter_clauses: Vec<FilterClause>,
}

impl QueryFragment {
    /// Both statements, ready to be spliced in front of the mapper's closing tag.
    pub fn mapper_fragment(&self) -> String {
        format!("\n{}\n{}", self.select_body, self.count_body)
    }
}
