//! Text chunking for large scraped pages
//!
//! Chunks are produced lazily by [`Chunks`], which borrows the input and can
//! be cloned to restart. Offsets are byte offsets into the input.

use crate::config::ChunkStrategy;
use crate::error::ExtractorError;

/// Smallest chunk size that always fits one UTF-8 character plus overlap
pub const MIN_CHUNK_SIZE: usize = 16;

/// Where a chunk may end relative to a marker
#[derive(Debug, Clone, Copy)]
enum Boundary {
    /// Split so the marker starts the next chunk
    Before(&'static str),
    /// Split right after the marker
    After(&'static str),
}

impl Boundary {
    /// Offset of the last split point of this kind inside `window`
    fn last_split(&self, window: &str) -> Option<usize> {
        match *self {
            Boundary::Before(marker) => window.rfind(marker),
            Boundary::After(marker) => window.rfind(marker).map(|i| i + marker.len()),
        }
    }
}

const RECORD_BOUNDARIES: &[Boundary] = &[
    Boundary::Before("Library ID:"),
    Boundary::After("\n\n"),
    Boundary::After("\n"),
    Boundary::After(". "),
    Boundary::After(" "),
];

const PARAGRAPH_BOUNDARIES: &[Boundary] = &[
    Boundary::After("\n\n"),
    Boundary::After("\n"),
    Boundary::After(" "),
];

impl ChunkStrategy {
    fn boundaries(self) -> &'static [Boundary] {
        match self {
            ChunkStrategy::ByRecord => RECORD_BOUNDARIES,
            ChunkStrategy::ByParagraph => PARAGRAPH_BOUNDARIES,
            ChunkStrategy::ByCharacter => &[],
        }
    }
}

/// One bounded, possibly overlapping slice of the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Position in the chunk sequence
    pub index: usize,

    /// Byte offset of the chunk in the input
    pub start: usize,

    /// Byte offset where content not seen in earlier chunks begins
    pub fresh_start: usize,

    /// Chunk text
    pub text: &'a str,
}

impl<'a> Chunk<'a> {
    /// Byte offset one past the end of the chunk
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    /// The part of the chunk not covered by the previous chunk
    pub fn fresh_text(&self) -> &'a str {
        &self.text[self.fresh_start - self.start..]
    }
}

/// Chunks text according to the specified strategy
#[derive(Debug, Clone)]
pub struct TextChunker {
    strategy: ChunkStrategy,
    max_chunk_size: usize,
    overlap: usize,
}

impl TextChunker {
    /// Create a new text chunker
    ///
    /// Fails with [`ExtractorError::Config`] when `max_chunk_size` is below
    /// [`MIN_CHUNK_SIZE`] or `overlap` is not less than half of it.
    pub fn new(
        strategy: ChunkStrategy,
        max_chunk_size: usize,
        overlap: usize,
    ) -> Result<Self, ExtractorError> {
        if max_chunk_size < MIN_CHUNK_SIZE {
            return Err(ExtractorError::Config(format!(
                "max_chunk_size must be at least {}",
                MIN_CHUNK_SIZE
            )));
        }
        if overlap * 2 >= max_chunk_size {
            return Err(ExtractorError::Config(
                "chunk_overlap must be less than half of max_chunk_size".to_string(),
            ));
        }
        Ok(Self {
            strategy,
            max_chunk_size,
            overlap,
        })
    }

    /// Lazily chunk the given text
    pub fn chunks<'a>(&self, text: &'a str) -> Chunks<'a> {
        Chunks {
            text,
            boundaries: self.strategy.boundaries(),
            max_chunk_size: self.max_chunk_size,
            overlap: self.overlap,
            next_start: 0,
            covered: 0,
            index: 0,
        }
    }
}

/// Iterator over the chunks of one text
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    text: &'a str,
    boundaries: &'static [Boundary],
    max_chunk_size: usize,
    overlap: usize,
    next_start: usize,
    covered: usize,
    index: usize,
}

impl<'a> Chunks<'a> {
    /// End offset for a chunk starting at `start` that cannot take the rest
    fn split_point(&self, start: usize) -> usize {
        let limit = floor_char_boundary(self.text, start + self.max_chunk_size);
        let window = &self.text[start..limit];

        // The next chunk starts `overlap` bytes before this one ends, so a
        // split must leave room for it to move forward.
        let min_offset = self.overlap + 1;
        for boundary in self.boundaries {
            if let Some(offset) = boundary.last_split(window) {
                if offset >= min_offset {
                    return start + offset;
                }
            }
        }

        if limit > start {
            limit
        } else {
            ceil_char_boundary(self.text, start + 1)
        }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let len = self.text.len();
        if self.covered >= len {
            return None;
        }

        let start = self.next_start;
        let end = if len - start <= self.max_chunk_size {
            len
        } else {
            self.split_point(start)
        };

        let chunk = Chunk {
            index: self.index,
            start,
            fresh_start: self.covered,
            text: &self.text[start..end],
        };

        self.index += 1;
        self.covered = end;
        if end < len {
            let next = ceil_char_boundary(self.text, end.saturating_sub(self.overlap));
            self.next_start = if next > start { next } else { end };
        }

        Some(chunk)
    }
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_page() -> String {
        let mut page = String::new();
        for i in 0..40 {
            page.push_str(&format!(
                "Library ID: {}\nStarted running on 1 Jan 2025. Active\n\
                 Shop {} অর্ডার করতে ইনবক্স করুন. facebook.com/shop{}\n\n",
                100_000 + i,
                i,
                i
            ));
        }
        page
    }

    #[test]
    fn test_rejects_sizes_that_cannot_progress() {
        assert!(matches!(
            TextChunker::new(ChunkStrategy::ByRecord, MIN_CHUNK_SIZE - 1, 0),
            Err(ExtractorError::Config(_))
        ));
        assert!(matches!(
            TextChunker::new(ChunkStrategy::ByRecord, 100, 50),
            Err(ExtractorError::Config(_))
        ));
        assert!(TextChunker::new(ChunkStrategy::ByRecord, MIN_CHUNK_SIZE, 7).is_ok());
    }

    #[test]
    fn test_small_text_single_chunk() {
        let chunker = TextChunker::new(ChunkStrategy::ByRecord, 3000, 500).unwrap();
        let chunks: Vec<_> = chunker.chunks("Short text.").collect();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Short text.");
        assert_eq!(chunks[0].fresh_start, 0);
    }

    #[test]
    fn test_empty_text_has_no_chunks() {
        let chunker = TextChunker::new(ChunkStrategy::ByRecord, 3000, 500).unwrap();
        assert_eq!(chunker.chunks("").count(), 0);
    }

    #[test]
    fn test_fresh_regions_reconstruct_input() {
        let page = sample_page();
        for strategy in [
            ChunkStrategy::ByRecord,
            ChunkStrategy::ByParagraph,
            ChunkStrategy::ByCharacter,
        ] {
            for (max, overlap) in [(64, 10), (200, 50), (500, 120), (3000, 500)] {
                let chunker = TextChunker::new(strategy, max, overlap).unwrap();
                let rebuilt: String = chunker.chunks(&page).map(|c| c.fresh_text()).collect();
                assert_eq!(rebuilt, page, "{:?} max={} overlap={}", strategy, max, overlap);
            }
        }
    }

    #[test]
    fn test_no_chunk_exceeds_max() {
        let page = sample_page();
        for max in [16, 33, 100, 257, 1000] {
            let chunker = TextChunker::new(ChunkStrategy::ByRecord, max, max / 4).unwrap();
            for chunk in chunker.chunks(&page) {
                assert!(chunk.text.len() <= max, "chunk of {} > {}", chunk.text.len(), max);
                assert_eq!(&page[chunk.start..chunk.end()], chunk.text);
            }
        }
    }

    #[test]
    fn test_adjacent_chunks_overlap() {
        let page = sample_page();
        let chunker = TextChunker::new(ChunkStrategy::ByRecord, 300, 60).unwrap();
        let chunks: Vec<_> = chunker.chunks(&page).collect();
        assert!(chunks.len() > 2);
        for pair in chunks.windows(2) {
            assert!(pair[1].start < pair[0].end());
            assert!(pair[0].end() - pair[1].start <= 60 + 3);
            assert_eq!(pair[1].fresh_start, pair[0].end());
        }
    }

    #[test]
    fn test_prefers_record_marker() {
        let text = "Library ID: 111 Foo shoes.\nLibrary ID: 222 Bar bags.\n\ntrailing words to pad it out";

        let by_record: Vec<_> = TextChunker::new(ChunkStrategy::ByRecord, 60, 5)
            .unwrap()
            .chunks(text)
            .collect();
        assert_eq!(by_record[0].text, "Library ID: 111 Foo shoes.\n");

        let by_paragraph: Vec<_> = TextChunker::new(ChunkStrategy::ByParagraph, 60, 5)
            .unwrap()
            .chunks(text)
            .collect();
        assert_eq!(
            by_paragraph[0].text,
            "Library ID: 111 Foo shoes.\nLibrary ID: 222 Bar bags.\n\n"
        );
    }

    #[test]
    fn test_does_not_split_words_when_spaces_exist() {
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa ".repeat(10);
        let chunker = TextChunker::new(ChunkStrategy::ByParagraph, 40, 8).unwrap();
        let chunks: Vec<_> = chunker.chunks(&text).collect();
        for chunk in &chunks[..chunks.len() - 1] {
            assert!(chunk.text.ends_with(' '), "split mid-word: {:?}", chunk.text);
        }
    }

    #[test]
    fn test_hard_cut_without_boundaries() {
        let text = "x".repeat(100);
        let chunker = TextChunker::new(ChunkStrategy::ByRecord, 30, 5).unwrap();
        let lengths: Vec<_> = chunker.chunks(&text).map(|c| c.text.len()).collect();
        assert_eq!(lengths, vec![30, 30, 30, 25]);
    }

    #[test]
    fn test_hard_cut_respects_utf8() {
        let text = "অ".repeat(100);
        let chunker = TextChunker::new(ChunkStrategy::ByCharacter, 32, 4).unwrap();
        let rebuilt: String = chunker.chunks(&text).map(|c| c.fresh_text()).collect();
        assert_eq!(rebuilt, text);
        assert!(chunker.chunks(&text).all(|c| c.text.len() <= 32));
    }

    #[test]
    fn test_chunks_are_restartable() {
        let page = sample_page();
        let chunker = TextChunker::new(ChunkStrategy::ByRecord, 256, 40).unwrap();
        let iter = chunker.chunks(&page);
        let first: Vec<_> = iter.clone().collect();
        let second: Vec<_> = iter.collect();
        assert_eq!(first, second);
        assert_eq!(first.last().map(|c| c.index + 1), Some(first.len()));
    }
}
