pub mod charts;
pub mod csv_export;
pub mod readme;

pub use charts::{write_charts, ChartOptions};
pub use csv_export::export_csv;
pub use readme::{write_readme, ReadmeOptions};
