use serde::{Deserialize, Serialize};

use crate::error::FinderError;

/// What the user knows about the person being searched for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NameInput {
    full_name: String,
    fide_id: Option<String>,
    federation: Option<String>,
    fide_rating: Option<i32>,
    birth_year: Option<i32>,
}

impl NameInput {
    /// Fails when the name is blank.
    pub fn new(full_name: &str) -> Result<Self, FinderError> {
        if full_name.trim().is_empty() {
            return Err(FinderError::InvalidInput("Name is required".into()));
        }
        Ok(Self {
            full_name: full_name.to_string(),
            fide_id: None,
            federation: None,
            fide_rating: None,
            birth_year: None,
        })
    }

    pub fn with_fide_id(mut self, fide_id: Option<&str>) -> Self {
        self.fide_id = non_blank(fide_id);
        self
    }

    pub fn with_federation(mut self, federation: Option<&str>) -> Self {
        self.federation = non_blank(federation);
        self
    }

    pub fn with_fide_rating(mut self, rating: Option<i32>) -> Self {
        self.fide_rating = rating;
        self
    }

    pub fn with_birth_year(mut self, year: Option<i32>) -> Self {
        self.birth_year = year;
        self
    }

    /// Fill hints from a FIDE profile. Values found there take precedence;
    /// the FIDE id itself is never dropped.
    pub fn merge_reference(mut self, info: &ReferenceInfo) -> Self {
        if let Some(fed) = non_blank(info.federation.as_deref()) {
            self.federation = Some(fed);
        }
        if info.rating.is_some() {
            self.fide_rating = info.rating;
        }
        if info.birth_year.is_some() {
            self.birth_year = info.birth_year;
        }
        self
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn fide_id(&self) -> Option<&str> {
        self.fide_id.as_deref()
    }

    pub fn federation(&self) -> Option<&str> {
        self.federation.as_deref()
    }

    pub fn fide_rating(&self) -> Option<i32> {
        self.fide_rating
    }

    pub fn birth_year(&self) -> Option<i32> {
        self.birth_year
    }
}

/// Player facts scraped from the FIDE rating site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceInfo {
    pub name: String,
    pub federation: Option<String>,
    pub birth_year: Option<i32>,
    pub rating: Option<i32>,
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
