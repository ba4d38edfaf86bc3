pub mod engine;
pub mod rng;
pub mod weather;

#[cfg(test)]
mod tests;
