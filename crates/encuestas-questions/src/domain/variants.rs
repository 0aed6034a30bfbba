//! The closed set of question kinds and their per-kind settings.
//!
//! Each settings type validates itself on construction and on
//! deserialization, so a `QuestionVariant` held in memory is always
//! consistent.

use std::collections::{BTreeMap, HashSet};

use encuestas_core::error::DomainError;
use encuestas_core::text::normalize_optional;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::{ChoiceOption, MatchingItem, SelectionMode, TextMode};

/// Default label of the "true" option.
pub const DEFAULT_TRUE_LABEL: &str = "Verdadero";

/// Default label of the "false" option.
pub const DEFAULT_FALSE_LABEL: &str = "Falso";

/// Rendered in place of the right item when a left item has no mapping.
pub const UNMAPPED_MARKER: &str = "(unmapped)";

/// A question's kind together with its kind-specific settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionVariant {
    /// Pick one or more options.
    Choice(ChoiceSettings),
    /// Pick between two options.
    TrueFalse(TrueFalseSettings),
    /// Free-text answer.
    Text(TextSettings),
    /// Pair left items with right items.
    Matching(MatchingSettings),
}

impl QuestionVariant {
    /// The wire name of this kind, as used in `WrongVariant` errors.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Choice(_) => "CHOICE",
            Self::TrueFalse(_) => "TRUE_FALSE",
            Self::Text(_) => "TEXT",
            Self::Matching(_) => "MATCHING",
        }
    }

    pub(crate) fn wrong(&self, expected: &'static str) -> DomainError {
        DomainError::WrongVariant {
            expected,
            actual: self.kind(),
        }
    }
}

fn ensure_distinct_labels(options: &[ChoiceOption]) -> Result<(), DomainError> {
    let mut seen = HashSet::with_capacity(options.len());
    for option in options {
        if !seen.insert(option.label().to_lowercase()) {
            return Err(DomainError::invalid(format!(
                "duplicate option label: {}",
                option.label()
            )));
        }
    }
    Ok(())
}

fn option_count(options: &[ChoiceOption]) -> u32 {
    u32::try_from(options.len()).unwrap_or(u32::MAX)
}

#[derive(Deserialize)]
struct RawChoiceSettings {
    mode: SelectionMode,
    options: Vec<ChoiceOption>,
    #[serde(default)]
    min_selections: Option<u32>,
    #[serde(default)]
    max_selections: Option<u32>,
    #[serde(default)]
    shuffle_options: bool,
}

/// Settings of a choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawChoiceSettings")]
pub struct ChoiceSettings {
    mode: SelectionMode,
    options: Vec<ChoiceOption>,
    min_selections: Option<u32>,
    max_selections: Option<u32>,
    shuffle_options: bool,
}

impl ChoiceSettings {
    /// Validates a choice configuration.
    ///
    /// Correctness flags are unconstrained: zero, one or many options may be
    /// marked correct.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` if there are fewer than two
    /// options, labels repeat (ignoring case), a SINGLE question carries
    /// bounds, or MULTI bounds fall outside `0 ≤ min ≤ max ≤ options` with
    /// `max ≥ 1`.
    pub fn new(
        mode: SelectionMode,
        options: Vec<ChoiceOption>,
        min_selections: Option<u32>,
        max_selections: Option<u32>,
        shuffle_options: bool,
    ) -> Result<Self, DomainError> {
        if options.len() < 2 {
            return Err(DomainError::invalid(
                "a choice question needs at least 2 options",
            ));
        }
        ensure_distinct_labels(&options)?;
        match mode {
            SelectionMode::Single => {
                if min_selections.is_some() || max_selections.is_some() {
                    return Err(DomainError::invalid(
                        "selection bounds apply only to MULTI questions",
                    ));
                }
            }
            SelectionMode::Multi => {
                let count = option_count(&options);
                let min = min_selections.unwrap_or(0);
                let max = max_selections.unwrap_or(count);
                if max < 1 {
                    return Err(DomainError::invalid("max_selections must be at least 1"));
                }
                if min > max {
                    return Err(DomainError::invalid(
                        "min_selections cannot exceed max_selections",
                    ));
                }
                if max > count {
                    return Err(DomainError::invalid(format!(
                        "max_selections cannot exceed the {count} options"
                    )));
                }
            }
        }
        Ok(Self {
            mode,
            options,
            min_selections,
            max_selections,
            shuffle_options,
        })
    }

    /// Single or multi selection.
    #[must_use]
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Options in display order.
    #[must_use]
    pub fn options(&self) -> &[ChoiceOption] {
        &self.options
    }

    /// Declared lower bound (MULTI only).
    #[must_use]
    pub fn min_selections(&self) -> Option<u32> {
        self.min_selections
    }

    /// Declared upper bound (MULTI only).
    #[must_use]
    pub fn max_selections(&self) -> Option<u32> {
        self.max_selections
    }

    /// Effective `(min, max)` for a MULTI question, with absent bounds
    /// filled in; `None` for SINGLE.
    #[must_use]
    pub fn effective_bounds(&self) -> Option<(u32, u32)> {
        match self.mode {
            SelectionMode::Single => None,
            SelectionMode::Multi => Some((
                self.min_selections.unwrap_or(0),
                self.max_selections
                    .unwrap_or_else(|| option_count(&self.options)),
            )),
        }
    }

    /// Whether options are presented in random order.
    #[must_use]
    pub fn shuffle_options(&self) -> bool {
        self.shuffle_options
    }

    /// Replaces the options, keeping the mode and any declared bounds.
    ///
    /// # Errors
    ///
    /// Fails as [`ChoiceSettings::new`] does, notably when kept bounds no
    /// longer fit the new option count.
    pub fn replace_options(&self, options: Vec<ChoiceOption>) -> Result<Self, DomainError> {
        Self::new(
            self.mode,
            options,
            self.min_selections,
            self.max_selections,
            self.shuffle_options,
        )
    }

    /// Sets MULTI selection bounds.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` for a SINGLE question or
    /// out-of-range bounds.
    pub fn with_bounds(
        &self,
        min_selections: Option<u32>,
        max_selections: Option<u32>,
    ) -> Result<Self, DomainError> {
        if self.mode == SelectionMode::Single {
            return Err(DomainError::invalid(
                "selection bounds apply only to MULTI questions",
            ));
        }
        Self::new(
            self.mode,
            self.options.clone(),
            min_selections,
            max_selections,
            self.shuffle_options,
        )
    }

    #[must_use]
    pub(crate) fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle_options = shuffle;
        self
    }
}

impl TryFrom<RawChoiceSettings> for ChoiceSettings {
    type Error = DomainError;

    fn try_from(raw: RawChoiceSettings) -> Result<Self, Self::Error> {
        Self::new(
            raw.mode,
            raw.options,
            raw.min_selections,
            raw.max_selections,
            raw.shuffle_options,
        )
    }
}

#[derive(Deserialize)]
struct RawTrueFalseSettings {
    options: Vec<ChoiceOption>,
    #[serde(default)]
    shuffle_options: bool,
}

/// Settings of a true/false question: always two options, exactly one
/// correct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTrueFalseSettings")]
pub struct TrueFalseSettings {
    options: Vec<ChoiceOption>,
    shuffle_options: bool,
}

impl TrueFalseSettings {
    /// Builds the two options from `true_is_correct`; blank or absent labels
    /// fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` if a label is too long or both
    /// labels are the same.
    pub fn new(
        true_is_correct: bool,
        true_label: Option<String>,
        false_label: Option<String>,
        shuffle_options: bool,
    ) -> Result<Self, DomainError> {
        let true_label =
            normalize_optional(true_label).unwrap_or_else(|| DEFAULT_TRUE_LABEL.to_owned());
        let false_label =
            normalize_optional(false_label).unwrap_or_else(|| DEFAULT_FALSE_LABEL.to_owned());
        Self::from_options(
            vec![
                ChoiceOption::new(&true_label, true_is_correct)?,
                ChoiceOption::new(&false_label, !true_is_correct)?,
            ],
            shuffle_options,
        )
    }

    /// Accepts an explicit option pair.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` unless there are exactly two
    /// distinct options with exactly one marked correct.
    pub fn from_options(
        options: Vec<ChoiceOption>,
        shuffle_options: bool,
    ) -> Result<Self, DomainError> {
        if options.len() != 2 {
            return Err(DomainError::invalid(
                "a true/false question has exactly 2 options",
            ));
        }
        if options.iter().filter(|o| o.is_correct()).count() != 1 {
            return Err(DomainError::invalid(
                "a true/false question has exactly one correct option",
            ));
        }
        ensure_distinct_labels(&options)?;
        Ok(Self {
            options,
            shuffle_options,
        })
    }

    /// The two options, "true" first.
    #[must_use]
    pub fn options(&self) -> &[ChoiceOption] {
        &self.options
    }

    /// Whether the first option is the correct one.
    #[must_use]
    pub fn true_is_correct(&self) -> bool {
        self.options.first().is_some_and(ChoiceOption::is_correct)
    }

    #[must_use]
    pub fn shuffle_options(&self) -> bool {
        self.shuffle_options
    }

    #[must_use]
    pub(crate) fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle_options = shuffle;
        self
    }
}

impl TryFrom<RawTrueFalseSettings> for TrueFalseSettings {
    type Error = DomainError;

    fn try_from(raw: RawTrueFalseSettings) -> Result<Self, Self::Error> {
        Self::from_options(raw.options, raw.shuffle_options)
    }
}

#[derive(Deserialize)]
struct RawTextSettings {
    #[serde(default)]
    mode: TextMode,
    #[serde(default)]
    placeholder: Option<String>,
    #[serde(default)]
    min_length: Option<u32>,
    #[serde(default)]
    max_length: Option<u32>,
}

/// Settings of a free-text question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTextSettings")]
pub struct TextSettings {
    mode: TextMode,
    placeholder: Option<String>,
    min_length: Option<u32>,
    max_length: Option<u32>,
}

impl TextSettings {
    /// Validates length bounds; the placeholder is trimmed and blank becomes
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` if `max_length` is zero or
    /// `min_length` exceeds `max_length`.
    pub fn new(
        mode: TextMode,
        placeholder: Option<String>,
        min_length: Option<u32>,
        max_length: Option<u32>,
    ) -> Result<Self, DomainError> {
        if max_length == Some(0) {
            return Err(DomainError::invalid("max_length must be at least 1"));
        }
        if matches!((min_length, max_length), (Some(min), Some(max)) if min > max) {
            return Err(DomainError::invalid("min_length cannot exceed max_length"));
        }
        Ok(Self {
            mode,
            placeholder: normalize_optional(placeholder),
            min_length,
            max_length,
        })
    }

    #[must_use]
    pub fn mode(&self) -> TextMode {
        self.mode
    }

    #[must_use]
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    #[must_use]
    pub fn min_length(&self) -> Option<u32> {
        self.min_length
    }

    #[must_use]
    pub fn max_length(&self) -> Option<u32> {
        self.max_length
    }
}

impl TryFrom<RawTextSettings> for TextSettings {
    type Error = DomainError;

    fn try_from(raw: RawTextSettings) -> Result<Self, Self::Error> {
        Self::new(raw.mode, raw.placeholder, raw.min_length, raw.max_length)
    }
}

#[derive(Deserialize)]
struct RawMatchingSettings {
    left: Vec<MatchingItem>,
    right: Vec<MatchingItem>,
    answer_key: BTreeMap<Uuid, Uuid>,
    #[serde(default)]
    shuffle_right_column: bool,
}

/// Settings of a matching question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMatchingSettings")]
pub struct MatchingSettings {
    left: Vec<MatchingItem>,
    right: Vec<MatchingItem>,
    answer_key: BTreeMap<Uuid, Uuid>,
    shuffle_right_column: bool,
}

fn ensure_column(side: &str, items: &[MatchingItem]) -> Result<HashSet<Uuid>, DomainError> {
    if items.is_empty() {
        return Err(DomainError::invalid(format!(
            "the {side} column needs at least one item"
        )));
    }
    let mut ids = HashSet::with_capacity(items.len());
    for item in items {
        if !ids.insert(item.id()) {
            return Err(DomainError::invalid(format!(
                "duplicate {side} item id: {}",
                item.id()
            )));
        }
    }
    Ok(ids)
}

fn validate_key(
    left: &[MatchingItem],
    right: &[MatchingItem],
    key: &BTreeMap<Uuid, Uuid>,
) -> Result<(), DomainError> {
    let left_ids: HashSet<Uuid> = left.iter().map(MatchingItem::id).collect();
    let right_ids: HashSet<Uuid> = right.iter().map(MatchingItem::id).collect();
    for (l, r) in key {
        if !left_ids.contains(l) {
            return Err(DomainError::InvalidMatchingKey(format!(
                "unknown left item: {l}"
            )));
        }
        if !right_ids.contains(r) {
            return Err(DomainError::InvalidMatchingKey(format!(
                "unknown right item: {r}"
            )));
        }
    }
    if key.len() != left.len() {
        return Err(DomainError::InvalidMatchingKey(format!(
            "every left item needs a match: {} of {} mapped",
            key.len(),
            left.len()
        )));
    }
    Ok(())
}

impl MatchingSettings {
    /// Validates both columns and the answer key.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` if a column is empty or repeats
    /// an id or the columns differ in length, and
    /// `DomainError::InvalidMatchingKey` if the key is not a total mapping
    /// from left ids onto right ids.
    pub fn new(
        left: Vec<MatchingItem>,
        right: Vec<MatchingItem>,
        answer_key: BTreeMap<Uuid, Uuid>,
        shuffle_right_column: bool,
    ) -> Result<Self, DomainError> {
        ensure_column("left", &left)?;
        ensure_column("right", &right)?;
        if left.len() != right.len() {
            return Err(DomainError::invalid(format!(
                "left and right columns must have the same number of items: {} vs {}",
                left.len(),
                right.len()
            )));
        }
        validate_key(&left, &right, &answer_key)?;
        Ok(Self {
            left,
            right,
            answer_key,
            shuffle_right_column,
        })
    }

    /// Builds the key from `(left_index, right_index)` pairs into the two
    /// columns.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidMatchingKey` for an out-of-range index
    /// or a left item mapped twice, and otherwise fails as
    /// [`MatchingSettings::new`] does.
    pub fn from_index_pairs(
        left: Vec<MatchingItem>,
        right: Vec<MatchingItem>,
        pairs: &[(usize, usize)],
        shuffle_right_column: bool,
    ) -> Result<Self, DomainError> {
        let mut key = BTreeMap::new();
        for &(l, r) in pairs {
            let left_item = left.get(l).ok_or_else(|| {
                DomainError::InvalidMatchingKey(format!("left index out of range: {l}"))
            })?;
            let right_item = right.get(r).ok_or_else(|| {
                DomainError::InvalidMatchingKey(format!("right index out of range: {r}"))
            })?;
            if key.insert(left_item.id(), right_item.id()).is_some() {
                return Err(DomainError::InvalidMatchingKey(format!(
                    "left index mapped twice: {l}"
                )));
            }
        }
        Self::new(left, right, key, shuffle_right_column)
    }

    #[must_use]
    pub fn left(&self) -> &[MatchingItem] {
        &self.left
    }

    #[must_use]
    pub fn right(&self) -> &[MatchingItem] {
        &self.right
    }

    /// Left item id to right item id.
    #[must_use]
    pub fn answer_key(&self) -> &BTreeMap<Uuid, Uuid> {
        &self.answer_key
    }

    #[must_use]
    pub fn shuffle_right_column(&self) -> bool {
        self.shuffle_right_column
    }

    /// Replaces the answer key, validated against the current items.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidMatchingKey` if a key is not a left id,
    /// a value is not a right id, or some left item is unmapped.
    pub fn with_key(&self, answer_key: BTreeMap<Uuid, Uuid>) -> Result<Self, DomainError> {
        validate_key(&self.left, &self.right, &answer_key)?;
        Ok(Self {
            answer_key,
            ..self.clone()
        })
    }

    /// One `"left -> right"` line per left item, in left-column order.
    #[must_use]
    pub fn export_key_as_pairs(&self) -> Vec<String> {
        self.left
            .iter()
            .map(|l| {
                let right = self
                    .answer_key
                    .get(&l.id())
                    .and_then(|r| self.right.iter().find(|item| item.id() == *r))
                    .map_or(UNMAPPED_MARKER, MatchingItem::text);
                format!("{} -> {right}", l.text())
            })
            .collect()
    }

    #[must_use]
    pub(crate) fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle_right_column = shuffle;
        self
    }
}

impl TryFrom<RawMatchingSettings> for MatchingSettings {
    type Error = DomainError;

    fn try_from(raw: RawMatchingSettings) -> Result<Self, Self::Error> {
        Self::new(raw.left, raw.right, raw.answer_key, raw.shuffle_right_column)
    }
}
