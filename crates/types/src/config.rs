use serde::{Deserialize, Serialize};

/// How grid cells without a matching post appear in the output collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmptyCellPolicy {
    /// Drop empty cells; the collection holds only real posts.
    #[default]
    Omit,
    /// Emit a geometry-less placeholder feature in the cell's position.
    Marker,
}

/// What a grid query does when one of its cell queries fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Abort the remaining cells and return the first store error.
    #[default]
    FailFast,
    /// Keep going and report failed cell indices alongside the result.
    Partial,
}

/// Which post represents a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CellRanking {
    /// Most recently inserted post wins.
    #[default]
    Recency,
    /// Highest `relevance` score wins, recency breaks ties.
    Relevance,
    /// Post closest to the cell centroid wins, recency breaks ties.
    CellCenter,
}
