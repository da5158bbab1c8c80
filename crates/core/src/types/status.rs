//! Status and ordering enums shared by every product view.

use serde::{Deserialize, Serialize};

/// Stock level classification used to color-code products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockSeverity {
    /// More than ten units on hand.
    Ok,
    /// Between one and ten units on hand.
    Low,
    /// Nothing on hand (or a negative total after over-adjustment).
    Critical,
}

impl StockSeverity {
    /// Hex color the product list and detail views use for this level.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Ok => "#4CAF50",
            Self::Low => "#FF9800",
            Self::Critical => "#F44336",
        }
    }
}

impl std::fmt::Display for StockSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Low => write!(f, "low"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Display order for product lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Alphabetical by name, ignoring case.
    #[default]
    Name,
    /// Cheapest first.
    PriceAsc,
    /// Most expensive first.
    PriceDesc,
    /// Least stock first.
    StockAsc,
    /// Most stock first.
    StockDesc,
}

impl SortKey {
    /// Every sort key, in menu order.
    pub const ALL: [Self; 5] = [
        Self::Name,
        Self::PriceAsc,
        Self::PriceDesc,
        Self::StockAsc,
        Self::StockDesc,
    ];

    /// The kebab-case token for this key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::StockAsc => "stock-asc",
            Self::StockDesc => "stock-desc",
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("invalid sort key: {s}"))
    }
}
