//! Error handling for jvplots
//!
//! Configuration errors (style bounds, color schemes, catalog registration) are
//! returned to the caller directly. Failures while building a single plot are
//! wrapped in [`PlotError::Construction`] and downgraded to warnings by the
//! render pipeline.

use thiserror::Error;

/// Main error type for plot configuration, construction and export
#[derive(Error, Debug)]
pub enum PlotError {
    /// A style value outside its declared bound
    #[error("invalid {field}: {value} is outside [{min}, {max}]")]
    Validation {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A color scheme without any colors
    #[error("color scheme must contain at least one color")]
    EmptyColorScheme,

    /// A color token that could not be parsed
    #[error("invalid color `{0}`")]
    InvalidColor(String),

    /// A requested token with no catalog entry
    #[error("unknown plot type `{0}`")]
    UnknownPlotType(String),

    /// A family code or alias registered twice
    #[error("plot type `{0}` is already registered")]
    DuplicatePlotType(String),

    /// A family code or alias that cannot be registered (empty, or an alias
    /// pointing nowhere)
    #[error("invalid plot code `{0}`")]
    InvalidPlotCode(String),

    /// A construction routine failed for one token
    #[error("failed to build `{token}`: {source}")]
    Construction {
        token: String,
        #[source]
        source: Box<PlotError>,
    },

    /// A column required by a construction routine is absent from every record
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    /// Grouping by condition was requested but no conditions are assigned
    #[error("no condition assignments available")]
    MissingConditions,

    /// Nothing to plot
    #[error("no data: {0}")]
    NoData(String),

    /// Drawing backend failures
    #[error("render error: {0}")]
    Render(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PlotError {
    /// Wrap an error raised while building the plot for `token`
    pub fn construction(token: impl Into<String>, source: PlotError) -> Self {
        PlotError::Construction {
            token: token.into(),
            source: Box::new(source),
        }
    }

    /// Whether this error is a per-token rendering failure rather than a
    /// configuration error
    pub fn is_per_token(&self) -> bool {
        matches!(
            self,
            PlotError::UnknownPlotType(_) | PlotError::Construction { .. }
        )
    }
}

/// Result type alias for jvplots operations
pub type Result<T> = std::result::Result<T, PlotError>;
