use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::core::schedule;
use crate::utils::error::{AdminError, Result};
use crate::utils::validation::{
    validate_length, validate_non_empty_string, validate_non_negative, Validate,
};

/// One recurring weekly interval during which a shop is open.
///
/// `day` is 1 (Monday) through 7 (Sunday). The interval is half-open:
/// `[opens_at, closes_at)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningWindow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub day: u8,
    #[serde(rename = "openAt", deserialize_with = "whole_seconds")]
    pub opens_at: NaiveTime,
    #[serde(rename = "closeAt", deserialize_with = "whole_seconds")]
    pub closes_at: NaiveTime,
}

impl OpeningWindow {
    pub fn new(day: u8, opens_at: NaiveTime, closes_at: NaiveTime) -> Self {
        Self {
            id: None,
            day,
            opens_at,
            closes_at,
        }
    }

    /// Builds a window from `HH:MM:SS` (or `HH:MM`) strings.
    pub fn parse(day: u8, opens_at: &str, closes_at: &str) -> Result<Self> {
        Ok(Self::new(
            day,
            parse_time_of_day("openAt", opens_at)?,
            parse_time_of_day("closeAt", closes_at)?,
        ))
    }

    pub fn opens_at_seconds(&self) -> u32 {
        self.opens_at.num_seconds_from_midnight()
    }

    pub fn closes_at_seconds(&self) -> u32 {
        self.closes_at.num_seconds_from_midnight()
    }

    pub fn has_positive_duration(&self) -> bool {
        self.opens_at_seconds() < self.closes_at_seconds()
    }
}

impl Default for OpeningWindow {
    /// The window a form adds when the user asks for a new row.
    fn default() -> Self {
        Self::new(
            1,
            NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default(),
        )
    }
}

pub fn parse_time_of_day(field: &str, value: &str) -> Result<NaiveTime> {
    let time = NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|e| AdminError::validation(field, format!("'{}' is not a time of day: {}", value, e)))?;
    ensure_whole_seconds(field, time)
}

/// Times carry second precision. Fractions and leap seconds would be dropped
/// by the comparisons, so they are refused outright.
pub fn ensure_whole_seconds(field: &str, time: NaiveTime) -> Result<NaiveTime> {
    if time.nanosecond() != 0 {
        return Err(AdminError::validation(
            field,
            format!("'{}' must be a whole second (HH:MM:SS)", time),
        ));
    }
    Ok(time)
}

fn whole_seconds<'de, D>(deserializer: D) -> std::result::Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let time = NaiveTime::deserialize(deserializer)?;
    ensure_whole_seconds("time", time).map_err(serde::de::Error::custom)
}

/// A single change to one field of one window, as produced by a form widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEdit {
    Day(u8),
    OpensAt(NaiveTime),
    ClosesAt(NaiveTime),
}

impl WindowEdit {
    pub fn apply_to(self, window: &OpeningWindow) -> OpeningWindow {
        let mut edited = *window;
        match self {
            WindowEdit::Day(day) => edited.day = day,
            WindowEdit::OpensAt(time) => edited.opens_at = time,
            WindowEdit::ClosesAt(time) => edited.closes_at = time,
        }
        edited
    }
}

/// The ordered list of windows owned by one shop draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpeningSchedule {
    windows: Vec<OpeningWindow>,
}

impl OpeningSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn windows(&self) -> &[OpeningWindow] {
        &self.windows
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&OpeningWindow> {
        self.windows
            .get(index)
            .ok_or(AdminError::WindowNotFound { index })
    }

    pub fn push(&mut self, window: OpeningWindow) {
        self.windows.push(window);
    }

    pub fn remove(&mut self, index: usize) -> Result<OpeningWindow> {
        if index >= self.windows.len() {
            return Err(AdminError::WindowNotFound { index });
        }
        Ok(self.windows.remove(index))
    }

    /// Replaces the window at `index` without any checks. Callers go through
    /// `apply_edit` to keep the schedule consistent.
    pub(crate) fn replace(&mut self, index: usize, window: OpeningWindow) -> Result<()> {
        let slot = self
            .windows
            .get_mut(index)
            .ok_or(AdminError::WindowNotFound { index })?;
        *slot = window;
        Ok(())
    }
}

impl From<Vec<OpeningWindow>> for OpeningSchedule {
    fn from(windows: Vec<OpeningWindow>) -> Self {
        Self { windows }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
    pub visible: bool,
}

impl Notification {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            visible: true,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    /// Notification for a form-layer validation failure.
    pub fn from_validation(err: &AdminError) -> Self {
        Self::error(err.user_friendly_message())
    }

    pub fn hidden() -> Self {
        Self {
            severity: Severity::Success,
            message: String::new(),
            visible: false,
        }
    }
}

/// A route the navigator can go to after a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Destination(String);

impl Destination {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Destination {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for Destination {
    fn from(path: String) -> Self {
        Self(path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateKind {
    Shop,
    Product,
    Category,
}

impl AggregateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateKind::Shop => "shop",
            AggregateKind::Product => "product",
            AggregateKind::Category => "category",
        }
    }
}

impl fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl MutationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationKind::Create => "create",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub in_vacations: bool,
    #[serde(default)]
    pub opening_hours: OpeningSchedule,
}

impl Validate for ShopDraft {
    fn validate(&self) -> Result<()> {
        schedule::validate_schedule(self.opening_hours.windows()).into_result()?;
        validate_non_empty_string("name", &self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
}

impl Validate for CategoryDraft {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name", &self.name)?;
        validate_length("name", &self.name, 1, 255)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizedProduct {
    pub locale: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub price: f64,
    #[serde(default)]
    pub localized_product: Vec<LocalizedProduct>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop: Option<EntityRef>,
    #[serde(default)]
    pub categories: Vec<EntityRef>,
}

impl Validate for ProductDraft {
    fn validate(&self) -> Result<()> {
        validate_non_negative("price", self.price)?;
        if self.localized_product.is_empty() {
            return Err(AdminError::validation(
                "localizedProduct",
                "At least one name and description must be provided",
            ));
        }
        for localized in &self.localized_product {
            validate_non_empty_string("localizedProduct.name", &localized.name)?;
            validate_non_empty_string("localizedProduct.locale", &localized.locale)?;
        }
        Ok(())
    }
}
