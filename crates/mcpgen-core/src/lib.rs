pub mod catalog;
pub mod command;
pub mod error;
pub mod generator;
pub mod guide;
pub mod identity;
pub mod merge;
pub mod region;
pub mod render;
pub mod report;
pub mod request;
pub mod sanitize;
pub mod schema;
pub mod templates;
pub mod validate;

pub use catalog::{search_tools, tool_info, CatalogEntry, DetailLevel, SearchResult, ToolView, CATALOG};
pub use command::{generate_command_file, CommandKind, CommandRequest, CommandResult};
pub use error::{GeneratorError, RenderError, Result};
pub use generator::{GenerationPlan, Generator, Target};
pub use guide::{guide_overview, guide_step, practice, GuideOverview, GuideStep, Practice, GUIDE_STEPS, PRACTICES};
pub use identity::{GitIdentity, IdentityLookup};
pub use merge::{
    append_to_readme, append_to_usage, merge_gitignore, merge_manifest, FilePlan, FilePolicy,
    MergeEngine, RenderedFile,
};
pub use region::RegionKind;
pub use report::{ErrorInfo, FileReport, GenerationResult, MergeOutcome};
pub use request::{GenerationRequest, PrefixPolicy, RuntimeVersion, ValidatedRequest};
pub use sanitize::sanitize_description;
pub use schema::{generate_tool_schema, parse_tools, Schema, ToolDefinition, ToolParameter};
pub use validate::{validate_project_name, validate_tool_name};
