//! Candidate handle generation.
//!
//! A name is turned into the handles people commonly register: the name in
//! several separator and case styles, initials, "chess" decorations and
//! numeric suffixes. Birth year and federation hints expand the whole set
//! once more.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use chrono::Datelike;
use regex::Regex;

use crate::error::FinderError;
use crate::hints::NameInput;
use crate::MIN_LOOKUP_LEN;

const SEPARATORS: [&str; 4] = ["", "_", "-", "."];
const NUMERIC_SUFFIXES: [&str; 6] = ["1", "2", "3", "123", "007", "777"];
const LAST_SWEPT_YEAR: u32 = 20;

static PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("valid punctuation regex"));

/// De-duplicated candidate handles in first-generated order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    handles: Vec<String>,
    exact: HashSet<String>,
    lowercase: HashSet<String>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false for duplicates and empty handles.
    pub fn insert(&mut self, handle: impl Into<String>) -> bool {
        let handle = handle.into();
        if handle.is_empty() || self.exact.contains(&handle) {
            return false;
        }
        self.lowercase.insert(handle.to_lowercase());
        self.exact.insert(handle.clone());
        self.handles.push(handle);
        true
    }

    pub fn contains(&self, handle: &str) -> bool {
        self.exact.contains(handle)
    }

    pub fn contains_ignore_case(&self, handle: &str) -> bool {
        self.lowercase.contains(&handle.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.handles.iter().map(String::as_str)
    }

    /// Handles long enough to be worth a platform request.
    pub fn lookup_candidates(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|h| h.chars().count() >= MIN_LOOKUP_LEN)
    }

    /// Add `pattern{sep}value` and `value{sep}pattern` for every pattern in
    /// `base` and every separator.
    fn expand_with(&mut self, base: &[String], value: &str) {
        for pattern in base {
            for sep in SEPARATORS {
                self.insert(format!("{pattern}{sep}{value}"));
                self.insert(format!("{value}{sep}{pattern}"));
            }
        }
    }

    fn snapshot(&self) -> Vec<String> {
        self.handles.clone()
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a str;
    type IntoIter = Box<dyn Iterator<Item = &'a str> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Extra handles for specific names that no generic rule produces.
/// Keys are normalized names: lowercase tokens joined by single spaces.
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    entries: HashMap<String, Vec<String>>,
}

impl OverrideTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Overrides shipped with the service.
    pub fn builtin() -> Self {
        Self::empty().with_entry("derek yuan", &["Derekyuan"])
    }

    pub fn with_entry(mut self, name: &str, handles: &[&str]) -> Self {
        let key = normalize(name).join(" ").to_lowercase();
        self.entries
            .entry(key)
            .or_default()
            .extend(handles.iter().map(|h| h.to_string()));
        self
    }

    pub fn lookup(&self, tokens: &[String]) -> &[String] {
        let key = tokens.join(" ").to_lowercase();
        self.entries.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }
}

pub struct PatternGenerator {
    current_year: i32,
    overrides: OverrideTable,
}

impl Default for PatternGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternGenerator {
    pub fn new() -> Self {
        Self::with_year(chrono::Local::now().year())
    }

    /// Generator with a fixed "current" year.
    pub fn with_year(current_year: i32) -> Self {
        Self {
            current_year,
            overrides: OverrideTable::builtin(),
        }
    }

    pub fn with_overrides(mut self, overrides: OverrideTable) -> Self {
        self.overrides = overrides;
        self
    }

    /// Build the full candidate set for one search.
    pub fn generate(&self, input: &NameInput) -> Result<CandidateSet, FinderError> {
        if input.full_name().trim().is_empty() {
            return Err(FinderError::InvalidInput("Name is required".into()));
        }

        let tokens = normalize(input.full_name());
        let mut set = CandidateSet::new();
        if tokens.is_empty() {
            return Ok(set);
        }

        for handle in self.name_patterns(&tokens) {
            set.insert(handle);
        }
        for handle in self.overrides.lookup(&tokens) {
            set.insert(handle.clone());
        }

        if let Some(year) = input.birth_year() {
            let base = set.snapshot();
            let full = year.to_string();
            set.expand_with(&base, &full);
            if let Some(short) = full.get(2..).filter(|s| !s.is_empty()) {
                set.expand_with(&base, short);
            }
        }

        if let Some(federation) = input.federation() {
            let base = set.snapshot();
            set.expand_with(&base, federation);
        }

        tracing::debug!(
            name = input.full_name(),
            count = set.len(),
            "Generated candidate handles"
        );
        Ok(set)
    }

    /// Handles derived from the name alone, before contextual expansion.
    pub fn name_patterns(&self, tokens: &[String]) -> Vec<String> {
        match tokens {
            [] => Vec::new(),
            [only] => {
                let t = only.to_lowercase();
                vec![
                    t.clone(),
                    format!("{t}chess"),
                    format!("chess{t}"),
                    format!("{t}player"),
                ]
            }
            [first, middle @ .., last] => self.multi_token_patterns(tokens, first, middle, last),
        }
    }

    fn multi_token_patterns(
        &self,
        tokens: &[String],
        first: &str,
        middle: &[String],
        last: &str,
    ) -> Vec<String> {
        let f = first.to_lowercase();
        let l = last.to_lowercase();
        let fi = initial(&f);
        let li = initial(&l);
        let mut out = Vec::new();

        // Whole name
        out.push(tokens.join(" ").to_lowercase());
        out.push(tokens.concat().to_lowercase());
        out.push(format!("{f}{l}"));
        out.push(format!("{first}{last}"));
        out.push(format!("{}{}", capitalize(first), capitalize(last)));

        // Initial + last name, first name + initial
        out.push(format!("{fi}{l}"));
        out.push(format!("{fi}_{l}"));
        out.push(format!("{fi}.{l}"));
        out.push(format!("{fi}{l}").to_uppercase());
        out.push(format!("{f}{li}"));
        out.push(format!("{f}_{li}"));
        out.push(format!("{f}.{li}"));

        for sep in SEPARATORS {
            out.push(format!("{f}{sep}{l}"));
            out.push(format!("{l}{sep}{f}"));
        }
        out.push(f.clone());
        out.push(l.clone());

        let initials: String = tokens.iter().map(|t| initial(t)).collect();
        let acronym = initials.to_lowercase();
        out.push(acronym.clone());
        out.push(initials.to_uppercase());

        for stem in [f.clone(), l.clone(), format!("{f}{l}"), acronym] {
            out.push(format!("{stem}chess"));
            out.push(format!("chess{stem}"));
        }

        if !middle.is_empty() {
            let mi: String = middle.iter().map(|t| initial(t)).collect::<String>().to_lowercase();
            out.push(format!("{f}{mi}{l}"));
            out.push(format!("{fi}{mi}{l}"));
            out.push(format!("{fi}{}{l}", initial(&mi)));
        }

        let mut suffixes = vec![format!("{:02}", self.current_year.rem_euclid(100))];
        suffixes.extend((0..=LAST_SWEPT_YEAR).map(|y| format!("{y:02}")));
        suffixes.extend(NUMERIC_SUFFIXES.iter().map(|s| s.to_string()));
        for suffix in &suffixes {
            out.push(format!("{f}{l}{suffix}"));
            out.push(format!("{fi}{l}{suffix}"));
        }

        out
    }
}

/// Generate candidates with the current calendar year and built-in overrides.
pub fn generate(input: &NameInput) -> Result<CandidateSet, FinderError> {
    PatternGenerator::new().generate(input)
}

/// Strip punctuation and split on whitespace.
pub fn normalize(full_name: &str) -> Vec<String> {
    PUNCTUATION_RE
        .replace_all(full_name, "")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn initial(token: &str) -> String {
    token.chars().next().map(String::from).unwrap_or_default()
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}
