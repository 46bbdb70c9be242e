// handlers/public/mod.rs - Public handlers (no authentication)
pub mod health;
pub mod posts;

pub use health::{health, root};
pub use posts::{list as public_post_list, show as public_post_show};
