use uuid::Uuid;

use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::pagination::Pagination;
use super::types::{FilterOrderInfo, Populate, SortDirection, SqlParam, SqlResult, POST_RELATIONS};

/// Table alias used for the posts table in generated SQL.
pub(crate) const POST_ALIAS: &str = "p";

/// Selection criteria for posts. Every field that is set narrows the match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostFilter {
    pub id: Option<Uuid>,
    pub owner: Option<Uuid>,
    /// Case-insensitive substring of the title.
    pub search: Option<String>,
    pub category: Option<Uuid>,
}

impl PostFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(id: Uuid) -> Self {
        Self { id: Some(id), ..Self::default() }
    }

    pub fn owned_by(mut self, owner: Uuid) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Empty search text is the same as no search.
    pub fn search(mut self, text: Option<&str>) -> Self {
        self.search = text.filter(|s| !s.is_empty()).map(str::to_string);
        self
    }

    pub fn category(mut self, category: Option<Uuid>) -> Self {
        self.category = category;
        self
    }

    pub fn to_where_sql(&self) -> SqlResult {
        let (query, params) = FilterWhere::generate(self, POST_ALIAS, 0);
        SqlResult { query, params }
    }

    pub fn to_count_sql(&self) -> SqlResult {
        let where_result = self.to_where_sql();
        let query = if where_result.query.is_empty() {
            format!("SELECT COUNT(*) AS count FROM \"posts\" {}", POST_ALIAS)
        } else {
            format!("SELECT COUNT(*) AS count FROM \"posts\" {} WHERE {}", POST_ALIAS, where_result.query)
        };
        SqlResult { query, params: where_result.params }
    }
}

/// A complete find: criteria, ordering, window and the relations to expand.
#[derive(Debug, Clone, PartialEq)]
pub struct PostQuery {
    pub filter: PostFilter,
    pub order: Vec<FilterOrderInfo>,
    pub limit: Option<u64>,
    pub offset: u64,
    pub populate: &'static [Populate],
}

impl PostQuery {
    /// Newest first, every relation expanded, no window.
    pub fn new(filter: PostFilter) -> Self {
        Self {
            filter,
            order: vec![FilterOrderInfo { column: "id", sort: SortDirection::Desc }],
            limit: None,
            offset: 0,
            populate: POST_RELATIONS,
        }
    }

    pub fn single(filter: PostFilter) -> Self {
        let mut query = Self::new(filter);
        query.limit = Some(1);
        query
    }

    pub fn paginate(mut self, pagination: &Pagination) -> Self {
        self.limit = Some(pagination.limit());
        self.offset = pagination.offset();
        self
    }

    pub fn to_sql(&self) -> SqlResult {
        let (where_clause, mut params) = FilterWhere::generate(&self.filter, POST_ALIAS, 0);

        let mut columns = vec![
            format!("{}.\"id\"", POST_ALIAS),
            format!("{}.\"title\"", POST_ALIAS),
            format!("{}.\"description\"", POST_ALIAS),
            format!("{}.\"created_at\"", POST_ALIAS),
            format!("{}.\"updated_at\"", POST_ALIAS),
        ];
        let mut joins = Vec::with_capacity(self.populate.len());
        for (index, relation) in self.populate.iter().enumerate() {
            let alias = format!("r{}", index);
            let stripped: String = relation.exclude.iter().map(|f| format!(" - '{}'", f)).collect();
            columns.push(format!(
                "CASE WHEN {alias}.\"id\" IS NULL THEN NULL ELSE to_jsonb({alias}){stripped} END AS \"{field}\"",
                alias = alias,
                stripped = stripped,
                field = relation.field,
            ));
            joins.push(format!(
                "LEFT JOIN \"{}\" {} ON {}.\"id\" = {}.\"{}\"",
                relation.table, alias, alias, POST_ALIAS, relation.column
            ));
        }

        let mut limit_clause = String::new();
        if let Some(limit) = self.limit {
            params.push(SqlParam::Int(to_i64(limit)));
            params.push(SqlParam::Int(to_i64(self.offset)));
            limit_clause = format!("LIMIT ${} OFFSET ${}", params.len() - 1, params.len());
        }

        let query = [
            format!("SELECT {}", columns.join(", ")),
            format!("FROM \"posts\" {}", POST_ALIAS),
            joins.join(" "),
            if where_clause.is_empty() { String::new() } else { format!("WHERE {}", where_clause) },
            FilterOrder::generate(&self.order, POST_ALIAS),
            limit_clause,
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        SqlResult { query, params }
    }
}

fn to_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
