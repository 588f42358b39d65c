/*!
 * Application controller for chapter translation.
 *
 * The controller owns the configuration and the translation service and
 * drives the two top-level operations: the translate pipeline, which walks
 * the book's document sections in manifest order and rewrites the sections
 * inside the requested chapter range, and the inspector, which prints a
 * short preview of every chapter without touching the book.
 */

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};

use crate::app_config::Config;
use crate::book::Book;
use crate::language_utils;
use crate::markup;
use crate::providers::Provider;
use crate::providers::openai::OpenAI;
use crate::translation::{TranslationService, split_by_sentence};

/// Number of characters of rendered text shown per chapter by the inspector
const PREVIEW_LENGTH: usize = 250;

/// Main application controller for book translation
pub struct Controller<P: Provider> {
    /// App configuration
    config: Config,
    /// Translation service driving the provider
    service: TranslationService<P>,
}

impl Controller<OpenAI> {
    /// Create a controller backed by the OpenAI client described in the configuration
    pub fn with_config(config: Config) -> Self {
        let service = TranslationService::new(&config);
        Self { config, service }
    }
}

impl<P: Provider> Controller<P> {
    /// Create a controller from an existing translation service
    ///
    /// Used by tests to substitute a stub provider for the real client.
    pub fn with_service(config: Config, service: TranslationService<P>) -> Self {
        Self { config, service }
    }

    /// Run the translation pipeline over one book.
    ///
    /// Document sections are numbered 1-based in manifest order; a section
    /// is translated iff its number falls inside the inclusive
    /// `[from_chapter, to_chapter]` range, where an absent `to_chapter`
    /// means unbounded. Everything outside the range is written back
    /// byte-for-byte untouched.
    pub async fn run(
        &self,
        input_path: &Path,
        output_path: &Path,
        from_chapter: usize,
        to_chapter: Option<usize>,
        source_language: &str,
        target_language: &str,
    ) -> Result<()> {
        let start_time = Instant::now();

        if !input_path.exists() {
            return Err(anyhow!("Input file does not exist: {:?}", input_path));
        }

        let source_name = language_utils::get_language_name(source_language)
            .with_context(|| format!("Invalid source language code: {}", source_language))?;
        let target_name = language_utils::get_language_name(target_language)
            .with_context(|| format!("Invalid target language code: {}", target_language))?;

        let mut book = Book::open(input_path)
            .with_context(|| format!("Failed to open book: {:?}", input_path))?;
        let total = book.document_count();
        if total == 0 {
            return Err(anyhow!("Book contains no document sections"));
        }

        // Surface authentication failures before any chapter is processed
        self.service.test_connection().await?;

        let system_prompt = self.service.format_system_prompt(&source_name, &target_name);
        let max_chunk_size = self.config.translation.max_chunk_size;

        info!(
            "Translating {} to {} ({} chapter(s) in the book)",
            source_name, target_name, total
        );

        let mut translated_count = 0usize;
        for index in 0..total {
            let chapter = index + 1;
            if chapter < from_chapter || to_chapter.is_some_and(|to| chapter > to) {
                continue;
            }

            info!("Processing chapter {}/{}", chapter, total);

            let entry = book
                .document(index)
                .ok_or_else(|| anyhow!("Chapter {} disappeared during traversal", chapter))?;
            let raw = String::from_utf8_lossy(&entry.content).into_owned();
            let canonical = markup::canonicalize(&raw)
                .with_context(|| format!("Failed to parse chapter {} markup", chapter))?;

            let chunks = split_by_sentence(&canonical, max_chunk_size);
            let translated = self.translate_chunks(&system_prompt, &chunks, chapter).await?;

            let section = book
                .document_mut(index)
                .ok_or_else(|| anyhow!("Chapter {} disappeared during traversal", chapter))?;
            section.content = translated.join(" ").into_bytes();
            translated_count += 1;
        }

        book.write_to_file(output_path)
            .with_context(|| format!("Failed to write book: {:?}", output_path))?;

        info!(
            "Translated {} chapter(s) in {} - {}",
            translated_count,
            format_duration(start_time.elapsed()),
            output_path.display()
        );

        Ok(())
    }

    /// Translate every chunk of one chapter, strictly in order.
    ///
    /// Each request is awaited to completion before the next is issued, so
    /// the service never sees more than one in-flight chunk.
    async fn translate_chunks(
        &self,
        system_prompt: &str,
        chunks: &[String],
        chapter: usize,
    ) -> Result<Vec<String>> {
        let total_chunks = chunks.len();
        let progress_bar = ProgressBar::new(total_chunks as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message("Translating");

        let mut translated = Vec::with_capacity(total_chunks);
        for (i, chunk) in chunks.iter().enumerate() {
            debug!("Translating chunk {}/{}", i + 1, total_chunks);
            let result = self
                .service
                .translate_chunk(system_prompt, chunk)
                .await
                .with_context(|| {
                    format!(
                        "Failed to translate chunk {}/{} of chapter {}",
                        i + 1,
                        total_chunks,
                        chapter
                    )
                })?;
            translated.push(result);
            progress_bar.inc(1);
        }

        progress_bar.finish_and_clear();
        Ok(translated)
    }
}

/// Print a preview of every document section of a book to stdout.
///
/// Each chapter gets a one-line header with its 1-based number, the total
/// chapter count and the raw byte length of the section, followed by the
/// first 250 characters of its plain text. Performs no mutation and no
/// output write.
pub fn show_chapters(book: &Book) -> Result<()> {
    let total = book.document_count();

    for index in 0..total {
        let entry = book
            .document(index)
            .ok_or_else(|| anyhow!("Chapter {} disappeared during traversal", index + 1))?;
        let raw = String::from_utf8_lossy(&entry.content);
        let preview = chapter_preview(&raw)?;

        println!(
            "▶️  Chapter {}/{} ({} characters)",
            index + 1,
            total,
            entry.content.len()
        );
        println!("{}", preview);
        println!();
    }

    Ok(())
}

/// Build the inspector preview of one chapter's markup.
///
/// The rendered plain text is truncated to the first 250 characters and
/// runs of two-or-more newlines are collapsed to a single newline.
pub fn chapter_preview(markup_text: &str) -> Result<String> {
    let text = markup::extract_text(markup_text)?;
    let truncated: String = text.chars().take(PREVIEW_LENGTH).collect();
    Ok(markup::collapse_newlines(&truncated))
}

/// Format duration in a human-readable format
fn format_duration(duration: std::time::Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}.{:03}s", seconds, duration.subsec_millis())
    }
}
