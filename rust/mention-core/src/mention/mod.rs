pub mod config;
pub mod matcher;
pub mod highlight;
pub mod template;
pub mod candidate;
pub mod session;
pub mod editing;

pub use config::*;
pub use matcher::*;
pub use highlight::*;
pub use template::*;
pub use candidate::*;
pub use session::*;
pub use editing::*;

#[cfg(test)]
mod tests;
