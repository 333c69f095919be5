pub mod config;
pub mod construction;
pub mod domain;
pub mod fitness;
pub mod launcher;
pub mod progress;
pub mod selection;

pub use config::{Initialization, SearchConfig, SearchConfigBuilder, MAX_STREAMS};
pub use construction::{ConstructionDomain, SetGenome};
pub use domain::SearchDomain;
pub use fitness::Fitness;
pub use launcher::{optimize_barcode_sets, select_barcode_sets, GeneticSearch};
pub use progress::{ProgressListener, SilentProgress};
pub use selection::{IndexGenome, SelectionDomain};
