use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOrderInfo {
    pub column: &'static str,
    pub sort: SortDirection,
}

/// Positional parameter produced by the SQL generators, bound in order as `$1..$n`.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Uuid(Uuid),
    Text(String),
    Int(i64),
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}

/// A foreign-key relation expanded inline into the referenced record.
///
/// `column` is the key on the post, `table` the referenced table, `field` the
/// name the expanded record is returned under, and `exclude` the columns that
/// are stripped from the expanded record before it leaves the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Populate {
    pub field: &'static str,
    pub column: &'static str,
    pub table: &'static str,
    pub exclude: &'static [&'static str],
}

/// User columns that never appear in a post response.
pub const SENSITIVE_USER_FIELDS: &[&str] = &["password", "verification_code", "forgot_password_code"];

pub const POST_RELATIONS: &[Populate] = &[
    Populate { field: "file", column: "file_id", table: "files", exclude: &[] },
    Populate { field: "category", column: "category_id", table: "categories", exclude: &[] },
    Populate { field: "updated_by", column: "updated_by", table: "users", exclude: SENSITIVE_USER_FIELDS },
];
