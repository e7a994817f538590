//! Email column detection and synthetic email substitution.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use viewexport_core::{Error, Result, Table};

/// Header names that select a column outright (after lower-casing and trimming).
const EXACT_PATTERNS: &[&str] = &[
    "email",
    "e-mail",
    "mail",
    "email address",
    "e-mail address",
    "emailaddress",
];

/// Fragments that select a column when no header matches exactly.
/// The longer patterns all contain one of these.
const SUBSTRING_PATTERNS: &[&str] = &["email", "e-mail", "mail"];

const FIRST_NAMES: &[&str] = &[
    "john", "jane", "alex", "sarah", "mike", "lisa", "david", "emma", "chris", "anna",
];
const LAST_NAMES: &[&str] = &[
    "smith", "johnson", "brown", "davis", "miller", "wilson", "moore", "taylor", "anderson",
    "thomas",
];
const SYNTHETIC_DOMAINS: &[&str] = &[
    "example.com",
    "test.org",
    "demo.net",
    "sample.co",
    "placeholder.io",
];
const MAX_SUFFIX: u32 = 999;

/// Word lists and suffix range synthetic addresses are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticPool {
    pub first_names: &'static [&'static str],
    pub last_names: &'static [&'static str],
    pub domains: &'static [&'static str],
    /// Suffixes run `1..=max_suffix`.
    pub max_suffix: u32,
}

impl SyntheticPool {
    /// Number of distinct addresses this pool can produce.
    pub fn capacity(&self) -> usize {
        self.first_names.len()
            * self.last_names.len()
            * self.max_suffix as usize
            * self.domains.len()
    }
}

impl Default for SyntheticPool {
    fn default() -> Self {
        Self {
            first_names: FIRST_NAMES,
            last_names: LAST_NAMES,
            domains: SYNTHETIC_DOMAINS,
            max_suffix: MAX_SUFFIX,
        }
    }
}

/// How a header was recognised as an email column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderMatch {
    Exact,
    Substring,
}

/// The column chosen for anonymization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailColumn {
    pub index: usize,
    pub name: String,
    #[serde(rename = "matchedBy")]
    pub matched_by: HeaderMatch,
}

/// Outcome of one anonymization pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnonymizationReport {
    pub column: Option<EmailColumn>,
    pub replaced: usize,
}

/// Find the email-like column.
///
/// Exact matches win over substring matches; within each tier the first
/// header in table order is chosen.
pub fn detect_email_column(headers: &[String]) -> Option<EmailColumn> {
    let normalized: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();

    let exact = normalized
        .iter()
        .position(|h| EXACT_PATTERNS.contains(&h.as_str()))
        .map(|index| (index, HeaderMatch::Exact));

    let found = exact.or_else(|| {
        normalized
            .iter()
            .position(|h| SUBSTRING_PATTERNS.iter().any(|p| h.contains(p)))
            .map(|index| (index, HeaderMatch::Substring))
    });

    found.map(|(index, matched_by)| EmailColumn {
        index,
        name: headers[index].clone(),
        matched_by,
    })
}

/// Replaces email values with synthetic, per-export-unique addresses.
///
/// Uniqueness is tracked only for the lifetime of one [`anonymize`] call.
///
/// [`anonymize`]: EmailAnonymizer::anonymize
pub struct EmailAnonymizer<R = StdRng> {
    rng: R,
    pool: SyntheticPool,
}

impl EmailAnonymizer<StdRng> {
    /// Seeded generator when `seed` is given, OS entropy otherwise.
    pub fn from_seed(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(rng)
    }
}

impl<R: Rng> EmailAnonymizer<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            pool: SyntheticPool::default(),
        }
    }

    pub fn with_pool(mut self, pool: SyntheticPool) -> Self {
        self.pool = pool;
        self
    }

    /// Anonymize the detected email column of `table` in place.
    ///
    /// Blank and whitespace-only cells are left as they are. Tables without
    /// an email-like header are not touched.
    pub fn anonymize(&mut self, table: &mut Table) -> Result<AnonymizationReport> {
        let Some(column) = detect_email_column(table.headers()) else {
            debug!("No email column found, leaving table unchanged");
            return Ok(AnonymizationReport::default());
        };

        info!(
            "Anonymizing email column \"{}\" (index {}, {:?} match)",
            column.name, column.index, column.matched_by
        );

        let to_replace = table
            .rows()
            .iter()
            .filter(|row| !row.get(column.index).trim().is_empty())
            .count();
        let capacity = self.pool.capacity();
        if to_replace > capacity {
            return Err(Error::Anonymize(format!(
                "{} emails exceed the {} available synthetic addresses",
                to_replace, capacity
            )));
        }

        let mut used: HashSet<String> = HashSet::with_capacity(to_replace);
        for row in table.rows_mut() {
            if row.get(column.index).trim().is_empty() {
                continue;
            }
            let email = loop {
                let candidate = self.generate();
                if !used.contains(&candidate) {
                    break candidate;
                }
            };
            used.insert(email.clone());
            row.set(column.index, email);
        }

        info!("Email anonymization complete: {} values replaced", used.len());
        Ok(AnonymizationReport {
            column: Some(column),
            replaced: used.len(),
        })
    }

    /// `first.last<1-999>@domain`
    fn generate(&mut self) -> String {
        let pool = self.pool;
        let first = pool.first_names[self.rng.gen_range(0..pool.first_names.len())];
        let last = pool.last_names[self.rng.gen_range(0..pool.last_names.len())];
        let domain = pool.domains[self.rng.gen_range(0..pool.domains.len())];
        let suffix = self.rng.gen_range(1..=pool.max_suffix);
        format!("{}.{}{}@{}", first, last, suffix, domain)
    }
}
