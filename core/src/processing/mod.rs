pub mod doppler;
pub mod magnitude;
pub mod mti;
pub mod pipeline;
pub mod quantize;
pub mod range;

pub use doppler::DopplerStage;
pub use magnitude::MagnitudeStage;
pub use mti::MtiStage;
pub use pipeline::RangeDopplerPipeline;
pub use quantize::ImageQuantizer;
pub use range::RangeStage;
