pub mod frequency;
pub mod logging;

#[cfg(test)]
pub mod testing;
