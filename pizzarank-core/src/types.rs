use std::cmp::Ordering;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::constants::TIE_TOLERANCE;
use crate::error::{ParseSortKeyError, ValidationError};

/// Opaque creation-order token. Only meaningful within the store that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EntryId(pub(crate) u64);

impl EntryId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// The four base fields of an offer, as typed in by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryInput {
    pub name: String,
    pub quantity: u32,
    pub diameter: f64,
    pub unit_price: f64,
}

impl EntryInput {
    pub fn new(name: impl Into<String>, quantity: u32, diameter: f64, unit_price: f64) -> Self {
        EntryInput {
            name: name.into(),
            quantity,
            diameter,
            unit_price,
        }
    }

    /// Check every base field. Stops at the first problem.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.quantity == 0 {
            return Err(ValidationError::ZeroQuantity);
        }
        if !self.diameter.is_finite() {
            return Err(ValidationError::NonFiniteDiameter(self.diameter));
        }
        if self.diameter <= 0.0 {
            return Err(ValidationError::NonPositiveDiameter(self.diameter));
        }
        if !self.unit_price.is_finite() {
            return Err(ValidationError::NonFinitePrice(self.unit_price));
        }
        if self.unit_price <= 0.0 {
            return Err(ValidationError::NonPositivePrice(self.unit_price));
        }
        let (total_area, total_price, price_per_area) = self.derived();
        if !(total_area.is_finite() && total_price.is_finite() && price_per_area.is_finite()) {
            return Err(ValidationError::DerivedOutOfRange);
        }
        Ok(())
    }

    /// Total area, total price and price per area.
    fn derived(&self) -> (f64, f64, f64) {
        let radius = self.diameter / 2.0;
        let total_area = PI * radius.powi(2) * f64::from(self.quantity);
        let total_price = self.unit_price * f64::from(self.quantity);
        (total_area, total_price, total_price / total_area)
    }
}

/// One priced offer. Derived fields are computed once, at construction,
/// from the base fields and cannot be set independently.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Entry {
    id: EntryId,
    name: String,
    quantity: u32,
    diameter: f64,
    unit_price: f64,
    total_area: f64,
    total_price: f64,
    price_per_area: f64,
}

impl Entry {
    /// Validate `input` and derive area and price figures from it.
    pub(crate) fn new(id: EntryId, input: EntryInput) -> Result<Self, ValidationError> {
        input.validate()?;

        let (total_area, total_price, price_per_area) = input.derived();
        let EntryInput { name, quantity, diameter, unit_price } = input;

        Ok(Entry {
            id,
            name,
            quantity,
            diameter,
            unit_price,
            total_area,
            total_price,
            price_per_area,
        })
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    /// π × (diameter / 2)² × quantity.
    pub fn total_area(&self) -> f64 {
        self.total_area
    }

    /// unit price × quantity.
    pub fn total_price(&self) -> f64 {
        self.total_price
    }

    /// total price / total area. Lower is a better deal.
    pub fn price_per_area(&self) -> f64 {
        self.price_per_area
    }

    /// Base fields only, e.g. to pre-fill an edit form.
    pub fn to_input(&self) -> EntryInput {
        EntryInput::new(self.name.clone(), self.quantity, self.diameter, self.unit_price)
    }

    pub(crate) fn with_id(mut self, id: EntryId) -> Self {
        self.id = id;
        self
    }

    /// The value this entry is ordered by under `key`.
    pub fn sort_value(&self, key: SortKey) -> SortValue<'_> {
        match key {
            SortKey::Quantity => SortValue::Number(f64::from(self.quantity)),
            SortKey::Diameter => SortValue::Number(self.diameter),
            SortKey::UnitPrice => SortValue::Number(self.unit_price),
            SortKey::TotalArea => SortValue::Number(self.total_area),
            SortKey::TotalPrice => SortValue::Number(self.total_price),
            SortKey::PricePerArea => SortValue::Number(self.price_per_area),
            SortKey::Name => SortValue::Text(&self.name),
        }
    }
}

/// A field value as seen by the ranking engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortValue<'a> {
    Number(f64),
    Text(&'a str),
}

impl SortValue<'_> {
    /// Plain less-than / greater-than ordering. Values of different kinds
    /// never appear under the same key and compare equal.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }

    /// Numbers tie within [`TIE_TOLERANCE`]; text only on exact equality.
    pub fn is_tied_with(&self, other: &Self) -> bool {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => a == b || (a - b).abs() <= TIE_TOLERANCE,
            (SortValue::Text(a), SortValue::Text(b)) => a == b,
            _ => false,
        }
    }
}

/// Column an ordering can be derived from.
///
/// The rank column is deliberately absent: ranking by rank is circular and
/// `"rank"` fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SortKey {
    Quantity,
    Diameter,
    UnitPrice,
    TotalArea,
    TotalPrice,
    PricePerArea,
    Name,
}

impl SortKey {
    /// Every key that can be requested through a sort toggle.
    pub const SORTABLE: [SortKey; 6] = [
        SortKey::Quantity,
        SortKey::Diameter,
        SortKey::UnitPrice,
        SortKey::TotalArea,
        SortKey::TotalPrice,
        SortKey::PricePerArea,
    ];

    /// Keys where a smaller value is a better deal.
    pub fn is_price_like(self) -> bool {
        matches!(self, SortKey::PricePerArea | SortKey::UnitPrice | SortKey::TotalPrice)
    }

    /// `Name` is a display order only; sort requests must not select it.
    pub fn is_sortable(self) -> bool {
        self != SortKey::Name
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Quantity => "quantity",
            SortKey::Diameter => "diameter",
            SortKey::UnitPrice => "unit-price",
            SortKey::TotalArea => "total-area",
            SortKey::TotalPrice => "total-price",
            SortKey::PricePerArea => "price-per-area",
            SortKey::Name => "name",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "quantity" | "amount" | "qty" => Ok(SortKey::Quantity),
            "diameter" => Ok(SortKey::Diameter),
            "unit-price" | "price" => Ok(SortKey::UnitPrice),
            "total-area" | "area" => Ok(SortKey::TotalArea),
            "total-price" | "total" => Ok(SortKey::TotalPrice),
            "price-per-area" | "ppa" => Ok(SortKey::PricePerArea),
            "name" => Ok(SortKey::Name),
            "rank" => Err(ParseSortKeyError::Circular),
            _ => Err(ParseSortKeyError::Unknown(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Turn an ascending comparison into one for this direction.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        })
    }
}

/// Current sort column and direction of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        SortState {
            key: SortKey::PricePerArea,
            direction: SortDirection::Ascending,
        }
    }
}

/// An entry with the ranks assigned by one ranking pass.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RankedEntry {
    pub entry: Entry,
    /// Dense rank under the sort key, starting at 1.
    pub rank: usize,
    /// 1 = best deal, 6 = worst (or tied for worst), whatever the sort direction.
    pub value_rank: u8,
}
