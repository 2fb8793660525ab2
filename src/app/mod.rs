// Application layer: pipelines wiring menu sources to script and remote targets.

pub mod pipelines;
