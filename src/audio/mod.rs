pub mod analysis;
pub mod decode;
pub mod features;

pub use analysis::{extract, extract_recording, Recording};
pub use features::{AudioFeatures, ExtractOptions};
