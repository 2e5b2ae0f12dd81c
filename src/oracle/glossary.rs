//! Glossary parsing and lexical retrieval.
//!
//! Glossary files hold one `tag = description` entry per line, e.g.
//!
//! ```text
//! us-gaap:NetIncomeLoss = The portion of profit or loss for the period ...
//! ```
//!
//! Lines without `=` are ignored.

use std::collections::HashSet;
use std::path::Path;

use crate::error::OracleError;
use crate::oracle::Oracle;

/// Score given to an entry whose tag appears verbatim in the question.
const TAG_MENTION_SCORE: usize = 100;

const STOPWORDS: [&str; 16] = [
    "what", "is", "the", "a", "an", "of", "for", "and", "to", "in", "how", "does", "mean", "are", "define", "explain",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlossaryEntry {
    pub tag: String,
    pub description: String,
}

/// Parsed glossary corpus.
#[derive(Debug, Clone)]
pub struct Glossary {
    pub(crate) entries: Vec<GlossaryEntry>,
}

impl Glossary {
    pub fn load(path: &Path) -> Result<Self, OracleError> {
        let text = std::fs::read_to_string(path).map_err(|source| OracleError::Glossary {
            path: path.to_path_buf(),
            source,
        })?;
        let glossary = Self::parse(&text);
        if glossary.is_empty() {
            return Err(OracleError::EmptyGlossary {
                path: path.to_path_buf(),
            });
        }
        Ok(glossary)
    }

    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .filter_map(|line| {
                let (tag, description) = line.split_once('=')?;
                Some(GlossaryEntry {
                    tag: tag.trim().to_string(),
                    description: description.trim().to_string(),
                })
            })
            .collect();
        Self { entries }
    }

    pub(crate) fn from_entries(entries: Vec<GlossaryEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Up to `k` entries relevant to `question`, best first.
    ///
    /// Ties keep file order. Entries with a zero score are never returned.
    pub fn retrieve(&self, question: &str, k: usize) -> Vec<&GlossaryEntry> {
        let question_lower = question.to_lowercase();
        let question_terms = terms(&question_lower);

        let mut scored: Vec<(usize, &GlossaryEntry)> = self
            .entries
            .iter()
            .map(|entry| (score(entry, &question_lower, &question_terms), entry))
            .filter(|(score, _)| *score > 0)
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().take(k).map(|(_, entry)| entry).collect()
    }
}

fn score(entry: &GlossaryEntry, question_lower: &str, question_terms: &HashSet<String>) -> usize {
    let mut total = 0;
    if !entry.tag.is_empty() && question_lower.contains(&entry.tag.to_lowercase()) {
        total += TAG_MENTION_SCORE;
    }

    let mut entry_terms = terms(&split_camel_case(&entry.tag).to_lowercase());
    entry_terms.extend(terms(&entry.description.to_lowercase()));
    total + question_terms.intersection(&entry_terms).count()
}

fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 1 && !STOPWORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// `NetIncomeLoss` -> `Net Income Loss`, so tag words match question words.
fn split_camel_case(tag: &str) -> String {
    let mut out = String::with_capacity(tag.len() + 8);
    let mut prev_lower = false;
    for c in tag.chars() {
        if c.is_uppercase() && prev_lower {
            out.push(' ');
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        out.push(c);
    }
    out
}

/// Answers with the retrieved glossary entries verbatim.
#[derive(Debug, Clone)]
pub struct GlossaryOracle {
    glossary: Glossary,
    top_k: usize,
}

impl GlossaryOracle {
    pub fn new(glossary: Glossary, top_k: usize) -> Self {
        Self {
            glossary,
            top_k: top_k.max(1),
        }
    }
}

impl Oracle for GlossaryOracle {
    fn answer(&self, question: &str) -> Result<String, OracleError> {
        let hits = self.glossary.retrieve(question, self.top_k);
        if hits.is_empty() {
            return Err(OracleError::NoMatch);
        }
        Ok(hits
            .iter()
            .map(|entry| format!("{}: {}", entry.tag, entry.description))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
us-gaap:NetIncomeLoss = The portion of profit or loss for the period, net of income taxes.
us-gaap:Assets = Sum of the carrying amounts of all assets recognized.
# comment line without separator
us-gaap:InterestExpense = Amount of the cost of borrowed funds accounted for as interest expense.
";

    #[test]
    fn parses_entries_and_skips_lines_without_separator() {
        let glossary = Glossary::parse(SAMPLE);
        assert_eq!(glossary.len(), 3);
        assert_eq!(glossary.entries[1].tag, "us-gaap:Assets");
        assert_eq!(
            glossary.entries[1].description,
            "Sum of the carrying amounts of all assets recognized."
        );
    }

    #[test]
    fn description_may_contain_equals_sign() {
        let glossary = Glossary::parse("ROE = Net income / equity = return\n");
        assert_eq!(glossary.entries[0].description, "Net income / equity = return");
    }

    #[test]
    fn tag_mention_ranks_first() {
        let glossary = Glossary::parse(SAMPLE);
        let hits = glossary.retrieve("What is us-gaap:NetIncomeLoss?", 2);
        assert_eq!(hits[0].tag, "us-gaap:NetIncomeLoss");
    }

    #[test]
    fn word_overlap_matches_camel_case_tags() {
        let glossary = Glossary::parse(SAMPLE);
        let hits = glossary.retrieve("explain interest expense", 1);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].tag, "us-gaap:InterestExpense");
    }

    #[test]
    fn unrelated_question_retrieves_nothing() {
        let glossary = Glossary::parse(SAMPLE);
        assert!(glossary.retrieve("weather tomorrow", 2).is_empty());
    }

    #[test]
    fn oracle_reports_no_match() {
        let oracle = GlossaryOracle::new(Glossary::parse(SAMPLE), 2);
        assert!(matches!(oracle.answer("weather tomorrow"), Err(OracleError::NoMatch)));
    }

    #[test]
    fn oracle_renders_tag_and_description() {
        let oracle = GlossaryOracle::new(Glossary::parse(SAMPLE), 1);
        let answer = oracle.answer("What is us-gaap:Assets?").unwrap();
        assert_eq!(
            answer,
            "us-gaap:Assets: Sum of the carrying amounts of all assets recognized."
        );
    }

    #[test]
    fn loading_empty_glossary_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glossary.txt");
        std::fs::write(&path, "no separators here\n").unwrap();
        assert!(matches!(Glossary::load(&path), Err(OracleError::EmptyGlossary { .. })));
    }

    #[test]
    fn loading_missing_glossary_fails() {
        let err = Glossary::load(Path::new("/no/such/glossary.txt")).unwrap_err();
        assert!(matches!(err, OracleError::Glossary { .. }));
    }
}
