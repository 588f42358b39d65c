/*!
 * Tests for the inspector's chapter preview
 */

use lexibook::app_controller::chapter_preview;

/// Test that the preview strips markup tags
#[test]
fn test_chapter_preview_withMarkup_shouldStripTags() {
    let markup = "<html><body><p>Plain chapter text</p></body></html>";
    let preview = chapter_preview(markup).unwrap();

    assert_eq!(preview, "Plain chapter text");
}

/// Test that the preview contains no run of more than one newline
#[test]
fn test_chapter_preview_withConsecutiveNewlines_shouldCollapseThem() {
    let markup = "<body><p>First line\n\n\nSecond line\n\nThird line</p></body>";
    let preview = chapter_preview(markup).unwrap();

    assert!(!preview.contains("\n\n"), "preview still has a newline run: {:?}", preview);
    assert!(preview.contains("First line\nSecond line\nThird line"));
}

/// Test that the preview is cut to the first 250 characters
#[test]
fn test_chapter_preview_withLongChapter_shouldTruncate() {
    let body: String = "x".repeat(600);
    let markup = format!("<body><p>{}</p></body>", body);
    let preview = chapter_preview(&markup).unwrap();

    assert_eq!(preview.chars().count(), 250);
    assert!(preview.chars().all(|c| c == 'x'));
}

/// Test that surrounding whitespace is shown as-is, not trimmed away
#[test]
fn test_chapter_preview_withInterTagWhitespace_shouldNotTrim() {
    let markup = "<body>\n<p>Text</p>\n</body>";
    let preview = chapter_preview(markup).unwrap();

    assert_eq!(preview, "\nText\n");
}

/// Test that a short chapter is shown in full
#[test]
fn test_chapter_preview_withShortChapter_shouldShowEverything() {
    let markup = "<body><p>Short</p></body>";
    let preview = chapter_preview(markup).unwrap();

    assert_eq!(preview, "Short");
}
