pub mod script_pipeline;
pub mod sync_pipeline;

pub use script_pipeline::ScriptPipeline;
pub use sync_pipeline::SyncPipeline;
