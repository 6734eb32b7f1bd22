//! Domain types shared by the search client, the engine, and the CLI.

use std::fmt;

/// A point on the earth's surface in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// `true` when both components are finite real numbers.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Formats as `"<lat>,<lng>"`, the shape of the `location` query parameter.
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// A coordinate as the user wrote it, kept for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateText {
    pub latitude: String,
    pub longitude: String,
}

impl From<Coordinate> for CoordinateText {
    fn from(coordinate: Coordinate) -> Self {
        Self {
            latitude: coordinate.latitude.to_string(),
            longitude: coordinate.longitude.to_string(),
        }
    }
}

/// One validated input coordinate together with its caller-facing id.
///
/// `index` is the line position in the original input and is never
/// re-numbered after lines are skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateRecord {
    pub index: usize,
    pub id: String,
    pub coordinate: Coordinate,
    pub text: CoordinateText,
}

impl CoordinateRecord {
    /// Builds a record, falling back to `ID-<index+1>` when `id` is blank.
    #[must_use]
    pub fn new(index: usize, id: &str, coordinate: Coordinate) -> Self {
        let id = id.trim();
        let id = if id.is_empty() {
            format!("ID-{}", index + 1)
        } else {
            id.to_owned()
        };
        Self {
            index,
            id,
            coordinate,
            text: coordinate.into(),
        }
    }

    /// Replaces the display text with the trimmed input cells.
    #[must_use]
    pub fn with_text(mut self, latitude: &str, longitude: &str) -> Self {
        self.text = CoordinateText {
            latitude: latitude.trim().to_owned(),
            longitude: longitude.trim().to_owned(),
        };
        self
    }
}

/// The fixed set of place categories searched for every coordinate.
///
/// Variant order is the output column order and is part of the export
/// contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    School,
    College,
    BusinessPark,
    Office,
    Hospital,
    Society,
    Mall,
    Theater,
    Restaurant,
    Hotel,
    Shop,
    Transit,
}

impl Category {
    /// Every category, in column order.
    pub const ALL: [Category; 12] = [
        Category::School,
        Category::College,
        Category::BusinessPark,
        Category::Office,
        Category::Hospital,
        Category::Society,
        Category::Mall,
        Category::Theater,
        Category::Restaurant,
        Category::Hotel,
        Category::Shop,
        Category::Transit,
    ];

    /// Free-text query sent to the places search endpoint.
    #[must_use]
    pub fn query(self) -> &'static str {
        match self {
            Category::School => "school",
            Category::College => "college",
            Category::BusinessPark => "business park",
            Category::Office => "office",
            Category::Hospital => "hospital",
            Category::Society => "society",
            Category::Mall => "mall",
            Category::Theater => "theater",
            Category::Restaurant => "restaurant",
            Category::Hotel => "hotel",
            Category::Shop => "shop",
            Category::Transit => "transit",
        }
    }

    /// Column header used by the table renderer and the export.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::School => "School",
            Category::College => "College",
            Category::BusinessPark => "Business Park",
            Category::Office => "Office",
            Category::Hospital => "Hospital",
            Category::Society => "Society",
            Category::Mall => "Mall",
            Category::Theater => "Theater",
            Category::Restaurant => "Restaurant",
            Category::Hotel => "Hotel",
            Category::Shop => "Shop",
            Category::Transit => "Transit",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query())
    }
}

/// A single place returned by the search API. Locations may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaceResult {
    pub location: Option<Coordinate>,
}

impl PlaceResult {
    #[must_use]
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            location: Some(Coordinate::new(latitude, longitude)),
        }
    }
}

/// Minimum distance from a coordinate to the nearest place of one category.
///
/// `min_distance_meters` is `f64::INFINITY` when nothing with a usable
/// location was found, or when the category's fetch failed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryOutcome {
    pub category: Category,
    pub min_distance_meters: f64,
}

impl CategoryOutcome {
    #[must_use]
    pub fn not_found(category: Category) -> Self {
        Self {
            category,
            min_distance_meters: f64::INFINITY,
        }
    }

    #[must_use]
    pub fn is_found(&self) -> bool {
        self.min_distance_meters.is_finite()
    }
}

/// One coordinate's complete set of per-category minimum distances.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub id: String,
    pub coordinate: Coordinate,
    pub text: CoordinateText,
    /// Always in [`Category::ALL`] order, one entry per category.
    pub outcomes: Vec<CategoryOutcome>,
}

/// A coordinate whose every category fetch failed.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedRow {
    pub id: String,
    pub coordinate: Coordinate,
    pub text: CoordinateText,
    pub reason: String,
}

/// What the engine hands to the rendering boundary for each coordinate.
///
/// `Failed` keeps "the query failed" distinct from "nothing nearby"
/// (a `Complete` row whose outcomes are all infinite).
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Complete(ResultRow),
    Failed(FailedRow),
}

impl RowOutcome {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            RowOutcome::Complete(row) => &row.id,
            RowOutcome::Failed(row) => &row.id,
        }
    }

    /// The coordinate as it appeared in the input.
    #[must_use]
    pub fn text(&self) -> &CoordinateText {
        match self {
            RowOutcome::Complete(row) => &row.text,
            RowOutcome::Failed(row) => &row.text,
        }
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, RowOutcome::Failed(_))
    }
}
