//! # Integration Scenarios

pub mod harness;

#[cfg(test)]
mod concurrency;
#[cfg(test)]
mod lifecycle;
#[cfg(test)]
mod logout;
