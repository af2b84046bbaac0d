// Adapters layer: concrete implementations of the domain ports over HTTP.

pub mod classifier;
pub mod csv_source;
pub mod gviz;
pub mod sheet;

pub use classifier::HttpClassifier;
pub use csv_source::CsvSource;
pub use gviz::GvizSource;
pub use sheet::SheetLocation;
