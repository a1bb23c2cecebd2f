use starling_api::StarlingApiError;
use thiserror::Error;

/// Everything that can go wrong between a `tools/call` request and its result.
///
/// None of these escape to the protocol layer: the registry renders each one as an
/// error-flagged tool result (`Error: <message>`).
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Arguments failed the tool's input schema. The handler never ran.
    #[error("Invalid arguments for tool {tool}: {details}")]
    InvalidArguments { tool: String, details: String },

    /// The API answered, but not in the shape the tool promises.
    #[error("Unexpected response for tool {tool}: {details}")]
    InvalidOutput { tool: String, details: String },

    /// Handler-level argument problems (unreadable file, bad base64, missing input).
    #[error("{0}")]
    Input(String),

    #[error(transparent)]
    Api(#[from] StarlingApiError),

    /// A catalog entry is malformed (duplicate name, uncompilable schema).
    #[error("Invalid tool definition '{tool}': {details}")]
    Definition { tool: String, details: String },
}

pub type Result<T> = std::result::Result<T, ToolError>;
