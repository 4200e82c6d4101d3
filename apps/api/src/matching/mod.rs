//! Application matching: resolve each application's job, score it against
//! the job's criteria, keep what clears the threshold.

pub mod batch;
pub mod criteria;
pub mod handlers;
pub mod resolver;

#[cfg(test)]
pub mod testing;
