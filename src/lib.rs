//! OpenAPI 3 → GraphQL SDL.
//!
//! `loader` gets a validated [`openapi::Document`], `translate` turns it into
//! the [`ir::GqlSpec`] model, `codegen` prints that model as SDL.
pub mod codegen;
pub mod config;
pub mod error;
pub mod ir;
pub mod loader;
pub mod openapi;
pub mod path_de;
pub mod translate;

pub use codegen::Codegen;
pub use config::Config;
pub use error::TranslateError;
pub use ir::GqlSpec;
pub use translate::translate_document;

/// Translate and render in one go.
pub fn generate_sdl(doc: &openapi::Document, config: &Config) -> Result<String, TranslateError> {
    let spec = translate_document(doc, config)?;
    Ok(codegen::render(&spec, config.timestamp))
}
