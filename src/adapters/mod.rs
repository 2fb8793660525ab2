// Adapters layer: concrete implementations for external systems (storage, remote table store).

pub mod dry_run;
pub mod storage;
pub mod supabase;
