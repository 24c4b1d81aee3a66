pub mod sampling;

pub use sampling::{pick_one, sample, sample_with};
