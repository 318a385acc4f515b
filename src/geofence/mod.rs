mod detector;

pub use detector::{Evaluation, evaluate};
