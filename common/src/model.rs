use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("invalid sort field: '{0}'")]
    InvalidSortField(String),
    #[error("invalid limit: {0}")]
    InvalidLimit(u64),
    #[error("empty sort field")]
    EmptySortField,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderField {
    pub name: String,
    pub direction: OrderDirection,
}

impl OrderField {
    pub fn asc(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: OrderDirection::Ascending,
        }
    }

    pub fn desc(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: OrderDirection::Descending,
        }
    }
}

impl FromStr for OrderField {
    type Err = QueryError;

    /// Parse a single field, a leading `-` sorts descending, a leading `+` ascending.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, direction) = match s.strip_prefix('-') {
            Some(name) => (name, OrderDirection::Descending),
            None => (s.strip_prefix('+').unwrap_or(s), OrderDirection::Ascending),
        };

        if name.is_empty() {
            return Err(QueryError::EmptySortField);
        }

        Ok(Self {
            name: name.to_string(),
            direction,
        })
    }
}

impl Display for OrderField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.direction {
            OrderDirection::Ascending => write!(f, "{}", self.name),
            OrderDirection::Descending => write!(f, "-{}", self.name),
        }
    }
}

/// Paging and sorting of list queries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQueryParameters {
    #[serde(default)]
    pub sort_fields: Vec<OrderField>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
}

impl Default for ListQueryParameters {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl ListQueryParameters {
    pub const DEFAULT_LIMIT: u64 = 20;

    pub const DEFAULT: Self = Self {
        sort_fields: vec![],
        limit: None,
        offset: None,
    };

    /// Parse query parameters in the form used by the HTTP layer, for example `sort=name,-createdAt`.
    pub fn parse(
        sort: Option<&str>,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Self, QueryError> {
        let sort_fields = match sort {
            Some(sort) if !sort.trim().is_empty() => sort
                .split(',')
                .map(OrderField::from_str)
                .collect::<Result<Vec<_>, _>>()?,
            _ => vec![],
        };

        Ok(Self {
            sort_fields,
            limit,
            offset,
        })
    }

    pub fn with_sort(mut self, field: OrderField) -> Self {
        self.sort_fields.push(field);
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT)
    }

    pub fn offset(&self) -> u64 {
        self.offset.unwrap_or_default()
    }

    /// Ensure that only supported sort fields are used and the limit is positive.
    pub fn validate(&self, allowed_sort_fields: &[&str]) -> Result<(), QueryError> {
        if let Some(field) = self
            .sort_fields
            .iter()
            .find(|field| !allowed_sort_fields.contains(&field.name.as_str()))
        {
            return Err(QueryError::InvalidSortField(field.name.clone()));
        }

        match self.limit {
            Some(0) => Err(QueryError::InvalidLimit(0)),
            _ => Ok(()),
        }
    }

    /// The sort fields, or the given default if none were requested.
    pub fn sort_or(&self, default: OrderField) -> Vec<OrderField> {
        if self.sort_fields.is_empty() {
            vec![default]
        } else {
            self.sort_fields.clone()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQueryResult<T> {
    pub data: Vec<T>,
    pub params: ListQueryParameters,
    pub total_count: u64,
}

impl<T> ListQueryResult<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ListQueryResult<U> {
        ListQueryResult {
            data: self.data.into_iter().map(f).collect(),
            params: self.params,
            total_count: self.total_count,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComparisonOperator {
    Equals,
    NotEquals,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    In,
    NotIn,
    Ilike,
    Regex,
}

/// A filter on a single field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOperatorAndValue<T> {
    pub operator: ComparisonOperator,
    pub value: T,
}

impl<T> FilterOperatorAndValue<T> {
    pub fn new(operator: ComparisonOperator, value: T) -> Self {
        Self { operator, value }
    }
}

/// A value of an update request, distinguishing "not given" from a given value.
///
/// `Present(None)` clears a nullable field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptionalValue<T> {
    Present(T),
    Absent,
}

impl<T> Default for OptionalValue<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> OptionalValue<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Apply the value onto a target, if present.
    pub fn if_present(self, f: impl FnOnce(T)) {
        if let Self::Present(value) = self {
            f(value)
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent => None,
        }
    }
}

impl<T> From<Option<T>> for OptionalValue<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Present(value),
            None => Self::Absent,
        }
    }
}

impl<T: Serialize> Serialize for OptionalValue<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Present(value) => value.serialize(serializer),
            Self::Absent => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OptionalValue<T> {
    /// Combined with `#[serde(default)]` a missing field is `Absent`, an explicit `null` is `Present(None)`.
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Self::Present)
    }
}
