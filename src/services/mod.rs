pub mod post_service;

pub use post_service::{ListParams, PostError, PostInput, PostPage, PostService};
