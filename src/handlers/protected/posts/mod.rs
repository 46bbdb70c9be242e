// handlers/protected/posts/mod.rs - /api/posts handlers, one file per operation
pub mod create;
pub mod delete;
pub mod list;
pub mod show;
pub mod update;

pub use create::create as post_create;
pub use delete::delete as post_delete;
pub use list::list as post_list;
pub use show::show as post_show;
pub use update::update as post_update;
