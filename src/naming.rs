use anyhow::{Context, Result};
use regex::Regex;
use tracing::warn;

use crate::cli::IdFormat;

const CPF_PATTERN: &str = r"\d{3}\.\d{3}\.\d{3}-\d{2}";
const CNPJ_PATTERN: &str = r"\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2}";

/// Longest leading run of letters (accented Latin included), whitespace,
/// and the punctuation that legitimately occurs in personal and corporate
/// names. Anchors the candidate to its well-formed head and discards
/// trailing addresses, dates, and codes.
const LEADING_NAME_PATTERN: &str = r"^[A-Za-zÀ-ú\s.,\-&]+";

pub struct NamingConfig {
    pub keywords: Vec<String>,
    pub id_formats: Vec<IdFormat>,
    pub trailing_markers: Vec<String>,
}

/// The locate -> strip -> sanitize chain that turns extracted page text
/// into a filename candidate. Patterns are compiled once per batch.
pub struct NamingPipeline {
    keyword_patterns: Vec<Regex>,
    id_patterns: Vec<Regex>,
    leading_name: Regex,
    trailing_markers: Vec<String>,
}

impl NamingPipeline {
    pub fn new(config: &NamingConfig) -> Result<Self> {
        // CNPJ values carry a forward slash, so the capture class only
        // admits one when that format is configured.
        let capture_class = if config.id_formats.contains(&IdFormat::Cnpj) {
            r"[\w\s.,\-/]+"
        } else {
            r"[\w\s.,\-]+"
        };

        let mut keyword_patterns = Vec::with_capacity(config.keywords.len());
        for keyword in &config.keywords {
            let pattern = format!(r"(?i){}\s*:?\s*({})", regex::escape(keyword), capture_class);
            let compiled = Regex::new(&pattern)
                .with_context(|| format!("failed to compile keyword pattern for {keyword:?}"))?;
            keyword_patterns.push(compiled);
        }

        let mut id_patterns = Vec::with_capacity(config.id_formats.len());
        for format in &config.id_formats {
            let pattern = match format {
                IdFormat::Cpf => CPF_PATTERN,
                IdFormat::Cnpj => CNPJ_PATTERN,
            };
            let compiled = Regex::new(pattern).with_context(|| {
                format!("failed to compile {} identifier pattern", format.as_str())
            })?;
            id_patterns.push(compiled);
        }

        let leading_name =
            Regex::new(LEADING_NAME_PATTERN).context("failed to compile leading-name pattern")?;

        Ok(Self {
            keyword_patterns,
            id_patterns,
            leading_name,
            trailing_markers: config.trailing_markers.clone(),
        })
    }

    /// Scans pages in order, trying each keyword in priority order per
    /// page; the first non-empty capture wins. Falls back to the first
    /// non-empty line of the first page when no keyword matches anywhere.
    pub fn locate(&self, pages: &[String]) -> Option<String> {
        for (index, text) in pages.iter().enumerate() {
            if text.trim().is_empty() {
                warn!(page = index + 1, "page has no extractable text, skipping");
                continue;
            }

            for pattern in &self.keyword_patterns {
                if let Some(captures) = pattern.captures(text) {
                    let value = captures.get(1).map_or("", |m| m.as_str()).trim();
                    if !value.is_empty() {
                        return Some(value.to_string());
                    }
                }
            }
        }

        let fallback = pages
            .first()?
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty());

        match fallback {
            Some(line) => {
                warn!("no keyword matched on any page, falling back to the first line");
                Some(line.to_string())
            }
            None => {
                warn!("no keyword matched and the first page has no usable text");
                None
            }
        }
    }

    /// Cuts the text at the first taxpayer identifier or boilerplate
    /// marker, deletes any identifier-shaped leftovers, then keeps the
    /// leading well-formed name run. Idempotent: one pass leaves nothing
    /// for a second pass to remove.
    pub fn strip_identifiers(&self, raw: &str) -> String {
        let mut cut = raw.len();

        for marker in &self.trailing_markers {
            if let Some(position) = raw.find(marker.as_str()) {
                cut = cut.min(position);
            }
        }
        for pattern in &self.id_patterns {
            if let Some(found) = pattern.find(raw) {
                cut = cut.min(found.start());
            }
        }

        let mut head = raw[..cut].to_string();
        for pattern in &self.id_patterns {
            head = pattern.replace_all(&head, "").into_owned();
        }

        let trimmed = head.trim();
        match self.leading_name.find(trimmed) {
            Some(found) => found.as_str().trim().to_string(),
            None => trimmed.to_string(),
        }
    }
}

/// Deletes characters illegal in common filesystems and collapses every
/// whitespace run (newlines included) to a single space.
pub fn sanitize_filename(text: &str) -> String {
    let kept: String = text
        .chars()
        .filter(|c| {
            !matches!(
                c,
                '/' | '\\' | '*' | '?' | ':' | '"' | '<' | '>' | '|'
            )
        })
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}
