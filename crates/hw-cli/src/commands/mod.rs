//! Command implementations for hw-cli

pub mod init;
pub mod list;
pub mod node;
pub mod status;
pub mod sync;
pub mod tag;

pub use init::run_init;
pub use list::run_list;
pub use node::{run_node_add, run_node_list, run_node_remove};
pub use status::run_status;
pub use sync::run_sync;
pub use tag::run_tag;
