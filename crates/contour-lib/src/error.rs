use thiserror::Error;

/// Validation failures raised by the pipeline stages.
///
/// Every variant is detected before a stage produces output, so a failing
/// stage never returns partial results.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContourError {
    #[error("malformed interval {interval_index} in group '{group_id}': {reason}")]
    MalformedInterval {
        group_id: String,
        interval_index: usize,
        reason: String,
    },
    #[error("interval {interval_index} in group '{group_id}' has zero or non-finite duration")]
    DegenerateInterval {
        group_id: String,
        interval_index: usize,
    },
    #[error(
        "interval {interval_index} in group '{group_id}' has {found} point(s); at least 2 are needed to interpolate"
    )]
    InsufficientPoints {
        group_id: String,
        interval_index: usize,
        found: usize,
    },
    /// A configured pulse count below 1. `group_id`, `interval_index` and
    /// `label` name the first partition the count applies to; they are `None`
    /// when the count applies to no labeled point.
    #[error(
        "invalid pulse count {count} for {}; counts must be >= 1",
        count_target(.group_id, .interval_index, .label)
    )]
    InvalidCount {
        group_id: Option<String>,
        interval_index: Option<usize>,
        label: Option<String>,
        count: usize,
    },
    #[error("no pulse count configured for interval {interval_index} ('{label}') in group '{group_id}'")]
    MissingCount {
        group_id: String,
        interval_index: usize,
        label: String,
    },
}

fn count_target(
    group_id: &Option<String>,
    interval_index: &Option<usize>,
    label: &Option<String>,
) -> String {
    let mut target = match (interval_index, label) {
        (Some(index), Some(label)) => format!("interval {} ('{}')", index, label),
        (Some(index), None) => format!("interval {}", index),
        (None, Some(label)) => format!("label '{}'", label),
        (None, None) => "every interval".to_string(),
    };
    if let Some(group_id) = group_id {
        target.push_str(&format!(" in group '{}'", group_id));
    }
    target
}

pub type Result<T> = std::result::Result<T, ContourError>;
