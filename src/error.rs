use thiserror::Error;

/// Conditions the query engine reports instead of producing a value.
///
/// All of them are recoverable: the dashboard branches on them to show a
/// placeholder or a status message.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// An extremal pick (best value, top rated, …) was asked of an empty view.
    #[error("cannot rank an empty record set ({0})")]
    EmptyInput(&'static str),

    #[error("unknown sort key '{0}' (expected rating, price, capacity or spin)")]
    UnknownSortKey(String),

    #[error("unknown sort direction '{0}' (expected asc or desc)")]
    UnknownSortDirection(String),

    #[error(
        "unknown group key '{0}' (expected brand, function_type, heater, capacity_bucket or capacity_lb)"
    )]
    UnknownGroupKey(String),

    #[error("unknown reducer '{0}' (expected count, listings, mean_price or mean_rating)")]
    UnknownReducer(String),

    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
