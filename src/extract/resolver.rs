//! Selector Strategy Resolver.
//!
//! A [`SelectorStrategy`] is an ordered list of [`Candidate`] locators for one
//! logical field. Candidates are probed in order; the first one whose value
//! passes every [`Validator`] wins and nothing after it is evaluated. An
//! absent element, an unparseable selector or a failed validation are all
//! plain non-matches: resolution never errors.

use scraper::{ElementRef, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::normalize::clean_text;

// ─────────────────────────────────────────────────────────────────────────────
// Locators
// ─────────────────────────────────────────────────────────────────────────────

/// Scoped element locator.
///
/// `css` is matched against descendants of the scope. The optional filters
/// narrow those matches: `has` requires a descendant matching another
/// selector, `has_text` requires the element's text to contain a needle
/// (ASCII case-insensitive). `then` descends from each surviving element into
/// a nested selector. `index` picks the n-th final match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    pub css: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub then: Option<String>,
    #[serde(default)]
    pub index: usize,
}

impl Locator {
    pub fn new(css: impl Into<String>) -> Self {
        Self {
            css: css.into(),
            has: None,
            has_text: None,
            then: None,
            index: 0,
        }
    }

    /// Every element this locator designates inside `scope`, in document order.
    pub fn locate_all<'a>(&self, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        let Some(primary) = parse_selector(&self.css) else {
            return Vec::new();
        };
        let has = match self.has.as_deref().map(parse_selector) {
            Some(None) => return Vec::new(),
            Some(Some(sel)) => Some(sel),
            None => None,
        };
        let needle = self.has_text.as_deref().map(str::to_ascii_lowercase);

        let filtered: Vec<ElementRef<'a>> = scope
            .select(&primary)
            .filter(|el| has.as_ref().map_or(true, |sel| el.select(sel).next().is_some()))
            .filter(|el| {
                needle
                    .as_deref()
                    .map_or(true, |n| element_text(*el).to_ascii_lowercase().contains(n))
            })
            .collect();

        match self.then.as_deref() {
            None => filtered,
            Some(nested) => {
                let Some(nested) = parse_selector(nested) else {
                    return Vec::new();
                };
                filtered
                    .into_iter()
                    .flat_map(|el| el.select(&nested).collect::<Vec<_>>())
                    .collect()
            }
        }
    }

    /// The `index`-th designated element.
    pub fn locate<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.locate_all(scope).into_iter().nth(self.index)
    }
}

fn parse_selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            debug!("resolver: unparseable selector '{}': {:?}", css, e);
            None
        }
    }
}

/// Whitespace-collapsed text content of an element. Text nodes are joined
/// with a space so sibling blocks (`<h3>Email</h3><a>..</a>`) stay apart.
pub fn element_text(el: ElementRef<'_>) -> String {
    clean_text(&el.text().collect::<Vec<_>>().join(" "))
}

// ─────────────────────────────────────────────────────────────────────────────
// Candidates and validators
// ─────────────────────────────────────────────────────────────────────────────

/// What to read from a located element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extract {
    #[default]
    Text,
    Attr(String),
}

/// Already-resolved values a validator may compare against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextField {
    FullName,
    Headline,
}

#[derive(Debug, Clone, Default)]
pub struct FieldContext {
    pub full_name: String,
    pub headline: String,
}

impl FieldContext {
    fn get(&self, field: ContextField) -> &str {
        match field {
            ContextField::FullName => &self.full_name,
            ContextField::Headline => &self.headline,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Validator {
    NonEmpty,
    MinLen { chars: usize },
    DiffersFrom { field: ContextField },
    Contains { needle: String },
    NotContains { needle: String },
    HasDigit,
}

impl Validator {
    pub fn accepts(&self, value: &str, ctx: &FieldContext) -> bool {
        match self {
            Validator::NonEmpty => !value.trim().is_empty(),
            Validator::MinLen { chars } => value.chars().count() >= *chars,
            Validator::DiffersFrom { field } => value != ctx.get(*field),
            Validator::Contains { needle } => value.contains(needle.as_str()),
            Validator::NotContains { needle } => !value.contains(needle.as_str()),
            Validator::HasDigit => value.chars().any(|c| c.is_ascii_digit()),
        }
    }
}

fn default_validators() -> Vec<Validator> {
    vec![Validator::NonEmpty]
}

/// One `(locator, validators)` pair of a strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(flatten)]
    pub locator: Locator,
    #[serde(default)]
    pub extract: Extract,
    #[serde(default = "default_validators")]
    pub validators: Vec<Validator>,
}

impl Candidate {
    /// Text of the first element matching `css`, required to be non-empty.
    pub fn css(css: impl Into<String>) -> Self {
        Self {
            locator: Locator::new(css),
            extract: Extract::Text,
            validators: default_validators(),
        }
    }

    pub fn has(mut self, css: impl Into<String>) -> Self {
        self.locator.has = Some(css.into());
        self
    }

    pub fn has_text(mut self, needle: impl Into<String>) -> Self {
        self.locator.has_text = Some(needle.into());
        self
    }

    pub fn then(mut self, css: impl Into<String>) -> Self {
        self.locator.then = Some(css.into());
        self
    }

    pub fn nth(mut self, index: usize) -> Self {
        self.locator.index = index;
        self
    }

    pub fn attr(mut self, name: impl Into<String>) -> Self {
        self.extract = Extract::Attr(name.into());
        self
    }

    pub fn check(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn accepts(&self, value: &str, ctx: &FieldContext) -> bool {
        self.validators.iter().all(|v| v.accepts(value, ctx))
    }

    /// Raw value of this candidate inside `scope`, before validation.
    pub fn probe(&self, scope: ElementRef<'_>) -> Option<String> {
        let el = self.locator.locate(scope)?;
        Some(read(el, &self.extract))
    }
}

fn read(el: ElementRef<'_>, extract: &Extract) -> String {
    match extract {
        Extract::Text => element_text(el),
        Extract::Attr(name) => el.value().attr(name).unwrap_or_default().trim().to_string(),
    }
}

/// Ordered candidates for one logical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorStrategy {
    pub field: String,
    pub candidates: Vec<Candidate>,
}

impl SelectorStrategy {
    pub fn new(field: impl Into<String>, candidates: Vec<Candidate>) -> Self {
        Self {
            field: field.into(),
            candidates,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Resolution
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Validated value, or `""` when nothing matched.
    pub value: String,
    pub matched: bool,
    /// Position of the winning candidate.
    pub candidate: Option<usize>,
}

/// Browser-independent core: `probe` yields the raw value of one candidate
/// (`None` when its element is absent). Candidates after the first validated
/// one are never probed.
pub fn resolve_with<F>(strategy: &SelectorStrategy, ctx: &FieldContext, mut probe: F) -> Resolution
where
    F: FnMut(&Candidate) -> Option<String>,
{
    for (i, candidate) in strategy.candidates.iter().enumerate() {
        let Some(value) = probe(candidate) else {
            continue;
        };
        if candidate.accepts(&value, ctx) {
            debug!(
                "resolver: '{}' matched candidate #{} ({})",
                strategy.field, i, candidate.locator.css
            );
            return Resolution {
                value,
                matched: true,
                candidate: Some(i),
            };
        }
    }
    debug!("resolver: '{}' exhausted {} candidate(s)", strategy.field, strategy.candidates.len());
    Resolution::default()
}

pub fn resolve(strategy: &SelectorStrategy, scope: ElementRef<'_>, ctx: &FieldContext) -> Resolution {
    resolve_with(strategy, ctx, |candidate| candidate.probe(scope))
}

/// Shorthand for [`resolve`] with an empty context, returning only the value.
pub fn resolve_value(strategy: &SelectorStrategy, scope: ElementRef<'_>) -> String {
    resolve(strategy, scope, &FieldContext::default()).value
}

/// First element designated by any candidate, for section containers.
/// Validators are not applied.
pub fn resolve_element<'a>(strategy: &SelectorStrategy, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
    strategy
        .candidates
        .iter()
        .find_map(|candidate| candidate.locator.locate(scope))
}

/// Every element designated by the first candidate that designates any,
/// for item enumeration.
pub fn resolve_all<'a>(strategy: &SelectorStrategy, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    strategy
        .candidates
        .iter()
        .map(|candidate| candidate.locator.locate_all(scope))
        .find(|found| !found.is_empty())
        .unwrap_or_default()
}

/// Text of every element designated by the first productive candidate,
/// empty strings dropped.
pub fn resolve_texts(strategy: &SelectorStrategy, scope: ElementRef<'_>) -> Vec<String> {
    strategy
        .candidates
        .iter()
        .map(|candidate| {
            candidate
                .locator
                .locate_all(scope)
                .into_iter()
                .map(|el| read(el, &candidate.extract))
                .filter(|v| !v.is_empty())
                .collect::<Vec<_>>()
        })
        .find(|found| !found.is_empty())
        .unwrap_or_default()
}
