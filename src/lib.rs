pub mod answers;
pub mod assessment;
pub mod db;
pub mod inventory;
pub mod schema;
pub mod scoring;
pub mod settings;
pub mod share;
pub mod sink;
pub mod terminal;
pub mod utils;
pub mod wizard;
