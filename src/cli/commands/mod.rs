mod config;
mod embed;
mod query;
mod status;
mod upsert;

pub use config::ConfigCommand;
pub use embed::EmbedArgs;
pub use query::QueryArgs;
pub use status::StatusArgs;
pub use upsert::UpsertArgs;

pub use config::handle_config;
pub use embed::handle_embed;
pub use query::handle_query;
pub use status::handle_status;
pub use upsert::handle_upsert;
