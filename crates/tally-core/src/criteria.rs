//! Static criteria catalogs.
//!
//! Each category carries a fixed table of judgeable criteria whose
//! maximum points sum to 100. The catalogs drive score validation in
//! the scoring session and the entry grid layout.

use crate::category::Category;

/// A single judgeable criterion within a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Criterion {
    pub name: &'static str,
    pub description: &'static str,
    /// Maximum score a judge may award for this criterion.
    pub max_points: u8,
}

/// Festival category criteria.
pub const FESTIVAL_CRITERIA: &[Criterion] = &[
    Criterion {
        name: "Performance Quality",
        description: "Precision, coordination, energy, focus, and synchronization among dancers",
        max_points: 25,
    },
    Criterion {
        name: "Choreography",
        description: "Creativity, originality of steps, use of floor space, transitions, and group formations",
        max_points: 20,
    },
    Criterion {
        name: "Theme Interpretation",
        description: "Clear and meaningful representation of the theme",
        max_points: 20,
    },
    Criterion {
        name: "Costume & Props",
        description: "Appropriateness, artistry, symbolism, and how well costumes and props support the theme",
        max_points: 15,
    },
    Criterion {
        name: "Musicality",
        description: "Rhythm, timing, and harmony of movement",
        max_points: 10,
    },
    Criterion {
        name: "Overall Impact",
        description: "Unity, stage presence, emotional appeal, and lasting impression",
        max_points: 10,
    },
];

/// Street category criteria.
pub const STREET_CRITERIA: &[Criterion] = &[
    Criterion {
        name: "Theme/Concept",
        description: "Thematic interpretation, relevance and representation",
        max_points: 35,
    },
    Criterion {
        name: "Choreography",
        description: "Creativity, artistry of movement patterns, formations, transitions",
        max_points: 30,
    },
    Criterion {
        name: "Performance",
        description: "Execution, synchronicity, precision and projection",
        max_points: 25,
    },
    Criterion {
        name: "Props and Costume",
        description: "Color, design, appropriateness and effectivity",
        max_points: 10,
    },
];

impl Category {
    /// The criteria judges score in this category.
    pub fn criteria(self) -> &'static [Criterion] {
        match self {
            Category::Festival => FESTIVAL_CRITERIA,
            Category::Street => STREET_CRITERIA,
        }
    }
}

/// Looks up a criterion by exact name within a category.
pub fn find(category: Category, name: &str) -> Option<&'static Criterion> {
    category.criteria().iter().find(|c| c.name == name)
}

/// Contestant numbers used when no roster is configured.
pub fn default_contestants() -> Vec<i64> {
    (1..=6).collect()
}
