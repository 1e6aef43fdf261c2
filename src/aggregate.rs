//! Metadata aggregation.
//!
//! Folds the probed input files into a single [`OutputMetadata`]: majority
//! vote over the tags, bitrate negotiation, and a contiguous chapter table
//! with titles derived from the file names.

use std::sync::OnceLock;

use regex::Regex;
use tc_core::{Chapter, FileDescriptor, OutputMetadata};

/// Counts distinct non-empty values in insertion order.
///
/// The most frequent value wins; on a tie the value seen first wins.
#[derive(Debug, Default)]
pub struct Tally {
    entries: Vec<(String, usize)>,
}

impl Tally {
    pub fn add(&mut self, value: &str) {
        if value.is_empty() {
            return;
        }
        match self.entries.iter_mut().find(|(v, _)| v == value) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((value.to_string(), 1)),
        }
    }

    /// The winning value, or `""` when nothing was added.
    pub fn winner(&self) -> &str {
        let mut best: Option<&(String, usize)> = None;
        for entry in &self.entries {
            if best.map_or(true, |b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map_or("", |(v, _)| v.as_str())
    }
}

/// Build the output metadata for `files`, in order.
///
/// `max_bitrate_kbps` caps the chosen bitrate.
pub fn aggregate(files: &[FileDescriptor], max_bitrate_kbps: u32) -> OutputMetadata {
    let mut title = Tally::default();
    let mut album = Tally::default();
    let mut artist = Tally::default();
    let mut genre = Tally::default();
    let mut date = Tally::default();

    for f in files {
        title.add(&f.tags.title);
        album.add(&f.tags.album);
        artist.add(&f.tags.artist);
        genre.add(&f.tags.genre);
        date.add(&f.tags.date);
    }

    let mut book_title = title.winner();
    if book_title.is_empty() {
        book_title = album.winner();
    }

    let (bitrate_kbps, source_bitrate_kbps) = negotiate_bitrate(files, max_bitrate_kbps);
    let chapters = chapters(files);

    OutputMetadata {
        title: book_title.to_string(),
        author: artist.winner().to_string(),
        genre: genre.winner().to_string(),
        date: date.winner().to_string(),
        total_duration_ms: files.iter().map(|f| f.duration_ms).sum(),
        bitrate_kbps,
        source_bitrate_kbps,
        chapters,
    }
}

/// Returns the chosen bitrate and the lowest source bitrate, both in kbit/s.
pub fn negotiate_bitrate(files: &[FileDescriptor], max_kbps: u32) -> (u32, Option<u32>) {
    let source = files
        .iter()
        .filter_map(|f| f.bitrate)
        .min()
        .map(|bps| u32::try_from(bps / 1000).unwrap_or(u32::MAX));

    let chosen = match source {
        Some(kbps) => kbps.min(max_kbps),
        None => max_kbps,
    };
    (chosen, source)
}

fn non_title_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\s\w\-]").expect("title regex is valid"))
}

fn clean_title(name: &str) -> String {
    non_title_re().replace_all(name, "").trim().to_string()
}

/// Chapter titles from base names, with shared affixes removed.
pub fn chapter_titles(names: &[&str]) -> Vec<String> {
    if names.len() < 2 {
        return names.iter().map(|n| clean_title(n)).collect();
    }

    let prefix = common_prefix_chars(names);
    let stripped: Vec<String> = names.iter().map(|n| n.chars().skip(prefix).collect()).collect();
    let stripped_refs: Vec<&str> = stripped.iter().map(String::as_str).collect();

    let suffix = common_suffix_chars(&stripped_refs);
    names
        .iter()
        .zip(&stripped)
        .map(|(full, s)| {
            let keep = s.chars().count() - suffix;
            let title = clean_title(&s.chars().take(keep).collect::<String>());
            if title.is_empty() {
                clean_title(full)
            } else {
                title
            }
        })
        .collect()
}

fn common_prefix_chars(names: &[&str]) -> usize {
    let Some((first, rest)) = names.split_first() else {
        return 0;
    };
    rest.iter().fold(first.chars().count(), |len, name| {
        first
            .chars()
            .zip(name.chars())
            .take(len)
            .take_while(|(a, b)| a == b)
            .count()
    })
}

fn common_suffix_chars(names: &[&str]) -> usize {
    let Some((first, rest)) = names.split_first() else {
        return 0;
    };
    rest.iter().fold(first.chars().count(), |len, name| {
        first
            .chars()
            .rev()
            .zip(name.chars().rev())
            .take(len)
            .take_while(|(a, b)| a == b)
            .count()
    })
}

fn chapters(files: &[FileDescriptor]) -> Vec<Chapter> {
    let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
    let mut offset = 0;
    chapter_titles(&names)
        .into_iter()
        .zip(files)
        .map(|(title, f)| {
            let start_ms = offset;
            offset += f.duration_ms;
            Chapter {
                start_ms,
                end_ms: offset,
                title,
            }
        })
        .collect()
}
