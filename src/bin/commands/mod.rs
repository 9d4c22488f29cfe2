pub mod match_cmd;
pub mod project_cmd;
pub mod validate_cmd;

pub use match_cmd::{cmd_match, MatchOptions};
pub use project_cmd::cmd_project;
pub use validate_cmd::cmd_validate;
