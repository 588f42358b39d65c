/*!
 * Translation pipeline for chapter text.
 *
 * This module contains the functionality for translating chapter markup
 * using an LLM provider. It is split into two submodules:
 *
 * - `chunk`: Sentence-based splitting of chapter text into model-sized pieces
 * - `core`: Core translation service wrapping a provider
 */

// Re-export main types for easier usage
pub use self::chunk::split_by_sentence;
pub use self::core::TranslationService;

// Submodules
pub mod chunk;
pub mod core;
