pub mod post;

pub use post::{ExpandedPost, Post};
