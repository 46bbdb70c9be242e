use crate::database::models::Post;

use super::post_filter::PostFilter;
use super::types::SqlParam;

pub struct FilterWhere {
    param_values: Vec<SqlParam>,
    param_index: usize,
    conditions: Vec<String>,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
            conditions: vec![],
        }
    }

    /// Render `filter` as a WHERE predicate over the table aliased `alias`.
    /// Returns an empty string when the filter matches everything.
    pub fn generate(filter: &PostFilter, alias: &str, starting_param_index: usize) -> (String, Vec<SqlParam>) {
        let mut filter_where = Self::new(starting_param_index);
        filter_where.build(filter, alias);
        (filter_where.conditions.join(" AND "), filter_where.param_values)
    }

    fn build(&mut self, filter: &PostFilter, alias: &str) {
        if let Some(id) = filter.id {
            let p = self.param(SqlParam::Uuid(id));
            self.conditions.push(format!("{}.\"id\" = {}", alias, p));
        }
        if let Some(owner) = filter.owner {
            let p = self.param(SqlParam::Uuid(owner));
            self.conditions.push(format!("{}.\"updated_by\" = {}", alias, p));
        }
        if let Some(search) = &filter.search {
            let p = self.param(SqlParam::Text(format!("%{}%", Self::escape_like(search))));
            self.conditions.push(format!("{}.\"title\" ILIKE {}", alias, p));
        }
        if let Some(category) = filter.category {
            let p = self.param(SqlParam::Uuid(category));
            self.conditions.push(format!("{}.\"category_id\" = {}", alias, p));
        }
    }

    fn param(&mut self, value: SqlParam) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }

    /// Escape LIKE wildcards so the search text matches literally.
    pub fn escape_like(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            if matches!(c, '\\' | '%' | '_') {
                out.push('\\');
            }
            out.push(c);
        }
        out
    }

    /// Evaluate `filter` against an in-memory post with the same semantics as the SQL.
    pub fn matches(filter: &PostFilter, post: &Post) -> bool {
        if filter.id.is_some_and(|id| id != post.id) {
            return false;
        }
        if filter.owner.is_some_and(|owner| owner != post.updated_by) {
            return false;
        }
        if filter.category.is_some_and(|category| category != post.category) {
            return false;
        }
        match &filter.search {
            Some(search) => post.title.to_lowercase().contains(&search.to_lowercase()),
            None => true,
        }
    }
}
