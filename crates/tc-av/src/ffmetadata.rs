//! FFMETADATA1 side-channel rendering.
//!
//! The encoder reads this file as its second input and copies the global
//! tags and chapter table from it (`-map_metadata 1`).

use std::fmt::Write;

use tc_core::OutputMetadata;

/// Value written to the `encoded_by` tag.
pub const ENCODED_BY: &str = "tomecat";

/// Render `metadata` as an FFMETADATA1 document.
pub fn render(metadata: &OutputMetadata) -> String {
    let mut out = String::from(";FFMETADATA1\n");

    // The album tag carries the book title; players group on it.
    let header = [
        ("album", metadata.title.as_str()),
        ("artist", metadata.author.as_str()),
        ("title", metadata.title.as_str()),
        ("genre", metadata.genre.as_str()),
    ];
    for (key, value) in header {
        writeln!(out, "{key}={}", escape(value)).unwrap();
    }
    writeln!(out, "TLEN={}", metadata.total_duration_ms).unwrap();
    writeln!(out, "encoded_by={ENCODED_BY}").unwrap();
    writeln!(out, "date={}", escape(&metadata.date)).unwrap();

    for chapter in &metadata.chapters {
        out.push_str("[CHAPTER]\nTIMEBASE=1/1000\n");
        writeln!(out, "START={}", chapter.start_ms).unwrap();
        writeln!(out, "END={}", chapter.end_ms).unwrap();
        writeln!(out, "title={}", escape(&chapter.title)).unwrap();
    }

    out
}

/// Backslash-escape the characters FFMETADATA treats specially.
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '=' | ';' | '#' | '\\' | '\n') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use tc_core::Chapter;

    #[test]
    fn renders_header_and_chapters() {
        let metadata = OutputMetadata {
            title: "Road Trip".into(),
            author: "Jane Author".into(),
            genre: "Audiobook".into(),
            date: "2019".into(),
            total_duration_ms: 5000,
            bitrate_kbps: 48,
            source_bitrate_kbps: Some(64),
            chapters: vec![
                Chapter {
                    start_ms: 0,
                    end_ms: 2000,
                    title: "Intro".into(),
                },
                Chapter {
                    start_ms: 2000,
                    end_ms: 5000,
                    title: "Outro".into(),
                },
            ],
        };

        let expected = "\
;FFMETADATA1
album=Road Trip
artist=Jane Author
title=Road Trip
genre=Audiobook
TLEN=5000
encoded_by=tomecat
date=2019
[CHAPTER]
TIMEBASE=1/1000
START=0
END=2000
title=Intro
[CHAPTER]
TIMEBASE=1/1000
START=2000
END=5000
title=Outro
";
        assert_eq!(render(&metadata), expected);
    }

    #[test]
    fn empty_metadata_keeps_every_header_line() {
        let text = render(&OutputMetadata::default());
        assert_eq!(text.lines().count(), 8);
        assert!(text.contains("\nartist=\n"));
        assert!(!text.contains("[CHAPTER]"));
    }

    #[test]
    fn escapes_special_characters() {
        assert_eq!(escape("a=b;c#d\\e"), "a\\=b\\;c\\#d\\\\e");
        assert_eq!(escape("two\nlines"), "two\\\nlines");
        assert_eq!(escape("plain - text"), "plain - text");
    }
}
