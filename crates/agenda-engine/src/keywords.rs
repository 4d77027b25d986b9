//! Keyword lists for the show/hide filters.
//!
//! A keyword list is separated by commas or spaces. A phrase enclosed in
//! single or double quotes is kept whole, so `"do it"` matches only that exact
//! phrase. Matching is case-insensitive substring search.

const DOUBLE_QUOTE: char = '"';
const SINGLE_QUOTE: char = '\'';

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeywordsFilter {
    keywords: Vec<String>,
    /// Result of [`KeywordsFilter::matches`] when the list is empty.
    match_on_empty: bool,
}

impl KeywordsFilter {
    /// Parse `text` into keywords. `match_on_empty` decides what an empty list matches.
    pub fn parse(text: &str, match_on_empty: bool) -> Self {
        let mut keywords: Vec<String> = Vec::new();
        let chars: Vec<char> = text.chars().collect();
        let mut quote: Option<char> = None;
        let mut at = 0;
        while at < chars.len() {
            let end = match quote {
                Some(q) => find_from(&chars, at, |c| c == q),
                None => find_from(&chars, at, |c| matches!(c, ',' | ' ' | DOUBLE_QUOTE | SINGLE_QUOTE)),
            };
            let item: String = chars[at..end].iter().collect();
            let item = item.to_lowercase();
            if !item.is_empty() && !keywords.contains(&item) {
                keywords.push(item);
            }
            if let Some(&c) = chars.get(end) {
                if c == DOUBLE_QUOTE || c == SINGLE_QUOTE {
                    quote = match quote {
                        Some(_) => None,
                        None => Some(c),
                    };
                }
            }
            at = end + 1;
        }
        Self {
            keywords,
            match_on_empty,
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Whether any of `texts` contains any keyword.
    pub fn matches<'a>(&self, texts: impl IntoIterator<Item = &'a str>) -> bool {
        if self.keywords.is_empty() {
            return self.match_on_empty;
        }
        texts.into_iter().any(|text| {
            let text = text.to_lowercase();
            self.keywords.iter().any(|k| text.contains(k.as_str()))
        })
    }
}

fn find_from(chars: &[char], from: usize, pred: impl Fn(char) -> bool) -> usize {
    chars[from..]
        .iter()
        .position(|&c| pred(c))
        .map_or(chars.len(), |i| from + i)
}
