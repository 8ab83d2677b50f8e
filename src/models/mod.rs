// Data models shared by analyzers, the rep counter and scoring

pub mod analysis;
pub mod calibration;
pub mod exercise;
pub mod landmark;
pub mod rep;
pub mod summary;

pub use analysis::*;
pub use calibration::*;
pub use exercise::*;
pub use landmark::*;
pub use rep::*;
pub use summary::*;
