pub mod scenarios;
pub mod util;

pub use util::split_csv;
