pub mod config;
pub mod error;
pub mod intervals;
pub mod io;
pub mod labeling;
pub mod normalize;
pub mod overlap;
pub mod pipeline;
pub mod resample;
pub mod signal;

pub use config::PipelineConfig;
pub use error::ContourError;
pub use intervals::{BoundaryPolicy, IntervalIndex};
pub use overlap::Keep;
pub use pipeline::run_pipeline;
pub use resample::{PartitionSummary, PulseCounts};
pub use signal::*;
