//! Page selection over whole-document text.
//!
//! The parsing backend returns one text stream per document, so page
//! boundaries are estimated by splitting the text into equal character
//! runs: `chars_per_page = total_chars / page_count`. Boundaries will not
//! line up with real page breaks when pages differ in text density.

/// Which pages a caller asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    /// Explicit 1-indexed page numbers
    Numbers(Vec<u32>),
    /// Inclusive range; missing ends default to the document bounds
    Range { start: Option<u32>, end: Option<u32> },
}

impl PageRequest {
    pub fn new(page_numbers: Option<&[u32]>, start: Option<u32>, end: Option<u32>) -> Self {
        match page_numbers {
            Some(numbers) if !numbers.is_empty() => PageRequest::Numbers(numbers.to_vec()),
            _ => PageRequest::Range { start, end },
        }
    }
}

/// Text selected for a page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEstimate {
    pub text: String,
    pub pages: Vec<u32>,
    /// False when the whole document was returned untouched
    pub approximate: bool,
}

/// Select the estimated text for `request` out of `text`.
pub fn estimate_pages(text: &str, page_count: u32, request: &PageRequest) -> PageEstimate {
    if page_count == 0 {
        return PageEstimate {
            text: text.to_string(),
            pages: Vec::new(),
            approximate: false,
        };
    }

    let total_chars = text.chars().count();
    let chars_per_page = total_chars / page_count as usize;

    match request {
        PageRequest::Numbers(numbers) => {
            let pages: Vec<u32> = numbers
                .iter()
                .copied()
                .filter(|&p| p >= 1 && p <= page_count)
                .collect();

            let text = pages
                .iter()
                .map(|&page| {
                    let start = (page as usize - 1) * chars_per_page;
                    let end = page as usize * chars_per_page;
                    format!(
                        "--- Page {} (estimated) ---\n{}\n",
                        page,
                        char_slice(text, start, end)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");

            PageEstimate {
                text,
                pages,
                approximate: true,
            }
        }
        PageRequest::Range { start, end } => {
            let start_page = start.unwrap_or(1).max(1);
            let end_page = end.unwrap_or(page_count).min(page_count);

            if start_page == 1 && end_page == page_count {
                return PageEstimate {
                    text: text.to_string(),
                    pages: (1..=page_count).collect(),
                    approximate: false,
                };
            }

            if start_page > end_page {
                return PageEstimate {
                    text: String::new(),
                    pages: Vec::new(),
                    approximate: true,
                };
            }

            let from = (start_page as usize - 1) * chars_per_page;
            let to = end_page as usize * chars_per_page;

            PageEstimate {
                text: format!(
                    "--- Pages {}-{} (estimated) ---\n{}",
                    start_page,
                    end_page,
                    char_slice(text, from, to)
                ),
                pages: (start_page..=end_page).collect(),
                approximate: true,
            }
        }
    }
}

/// Slice `text` by character positions `[start, end)`, clamped to its length.
pub fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let byte_at = |n: usize| {
        text.char_indices()
            .nth(n)
            .map(|(i, _)| i)
            .unwrap_or(text.len())
    };
    let from = byte_at(start);
    let to = byte_at(end.max(start));
    &text[from..to]
}

/// First `max_chars` characters of `text`, with `...` appended when cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte, _)) => format!("{}...", &text[..byte]),
        None => text.to_string(),
    }
}
