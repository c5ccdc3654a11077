//! Algorithms over mesh values: extraction, pruning and the conversion pipeline.

pub mod convert;
pub mod extract;
pub mod prune;

pub use convert::{ConvertOptions, convert, convert_file, prepare};
pub use extract::{extract, extract_by_name, extract_field};
pub use prune::prune_z_0;
