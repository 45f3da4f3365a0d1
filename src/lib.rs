pub mod apis;
pub mod config;
pub mod constants;
pub mod error;
pub mod geojson;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod server;
pub mod types;

pub use config::Config;
pub use error::{PipelineError, Result};
pub use geojson::{Feature, FeatureCollection, ResolvedLink};
pub use pipeline::{Pipeline, RequestContext};
