pub mod output;
pub mod walker;
pub mod workspace;

pub use output::{create_route_writer, write_declarations, OutputFormat, RouteWriter};
pub use walker::{find_source_files, FileWalker, WalkResult};
pub use workspace::{validate_repo_url, Workspace};
