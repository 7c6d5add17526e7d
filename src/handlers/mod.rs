pub mod create;
pub mod destroy;
pub mod health;
pub mod list;
pub mod show;
pub mod update;

pub use create::create_handler;
pub use destroy::destroy_handler;
pub use health::health_handler;
pub use list::list_handler;
pub use show::show_handler;
pub use update::update_handler;
