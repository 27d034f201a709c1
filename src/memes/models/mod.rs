pub mod generated_asset;
pub mod generation_outcome;
