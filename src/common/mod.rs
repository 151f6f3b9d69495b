pub mod budget;
pub mod format;

#[cfg(test)]
mod tests;
