pub mod types;
pub mod pagination;
pub mod post_filter;
pub mod filter_where;
pub mod filter_order;

pub use types::*;
pub use pagination::{Pagination, GLOBAL_PAGE_SIZE, OWNED_PAGE_SIZE};
pub use post_filter::{PostFilter, PostQuery};
