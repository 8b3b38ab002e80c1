// Export modules for library usage
pub mod analyzers;
pub mod cli;
pub mod config;
pub mod core;
pub mod declarations;
pub mod detection;
pub mod errors;
pub mod extraction;
pub mod io;
pub mod observability;
pub mod pipeline;

// Re-export commonly used types
pub use crate::core::{
    ControllerInfo, DataLayer, DeclarationSet, DetectionResult, Framework, HttpMethod, Language,
    ModelInfo, RouteRecord, TypeInfo,
};

pub use crate::config::{load_config, RoutemapConfig, ScanConfig, WorkspaceConfig};

pub use crate::errors::{ErrorKind, ErrorReport, ScanError, SkippedFile};

pub use crate::detection::{detect, detect_with_config};

pub use crate::extraction::{
    extract_routes, extract_routes_with, normalize, RouteIter, RouteScan, RouteStrategy,
    ScanSummary,
};

pub use crate::declarations::{declarations_from_source, extract_declarations, DeclarationScan};

pub use crate::io::output::{create_route_writer, OutputFormat, RouteWriter};
pub use crate::io::{FileWalker, Workspace};

pub use crate::pipeline::{scan_declarations, scan_repository, stream_routes, RouteStream};
