pub mod catalog;
pub mod client;
pub mod error;
pub mod factory;
pub mod interface;
pub mod resolver;

#[cfg(test)]
pub mod testing;

pub use catalog::{LanguageCatalog, PIVOT_LANGUAGE};
pub use error::TranslationError;
pub use factory::TranslationFactory;
pub use interface::{ModelProvider, TranslateResponse};
pub use resolver::TranslationResolver;
