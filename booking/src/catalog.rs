//! The static service catalog.
//!
//! The catalog is external input to the workflow: a fixed list supplied by
//! the business, consumed read-only. Durations and prices stay in their
//! human-formatted string shape; see [`crate::duration`] for the parsers.

use crate::types::Service;

fn entry(
    id: u32,
    name: &str,
    description: &str,
    price: &str,
    duration: &str,
    category: &str,
) -> Service {
    Service {
        id,
        name: name.to_owned(),
        description: description.to_owned(),
        price: price.to_owned(),
        duration: duration.to_owned(),
        category: category.to_owned(),
    }
}

/// The salon's current offering.
#[must_use]
pub fn default_catalog() -> Vec<Service> {
    vec![
        entry(
            1,
            "Dry E-file Manicure technique + Hard Gel Extension",
            "Gel color, Gels build the shape, Extension, Gel polish permanent + Russian manicure (Cuticle cleaning)",
            "$100",
            "2h 30m",
            "Extensions",
        ),
        entry(
            2,
            "Dry E-file Manicure technique + Gel polish (Shellac)",
            "Russian manicure Dry E-file Manicure technique with color gel polish",
            "$70",
            "2h",
            "Manicure",
        ),
        entry(
            3,
            "Pedicure combo technique + Gel polish (Shellac)",
            "Pedicure cleaning with color gel polish",
            "$80",
            "2h",
            "Pedicure",
        ),
        entry(
            4,
            "Pedicure combo technique (without any polish)",
            "No polish, just cleaning",
            "$60",
            "1h 15m",
            "Pedicure",
        ),
        entry(
            5,
            "Dry E-file Manicure technique (without any polish)",
            "No polish, just cleaning cuticle",
            "$50",
            "1h",
            "Manicure",
        ),
        entry(
            6,
            "Russian classic soak-off technique Manicure (without any polish)",
            "No polish, just cleaning cuticle",
            "$50",
            "1h",
            "Manicure",
        ),
        entry(
            7,
            "Nail Polish Permanent",
            "Gel polish, Shellac, Nail polish permanent",
            "$20",
            "1h",
            "Polish",
        ),
        entry(
            8,
            "Gel polish removal",
            "Gel polish removal which liquid or machine",
            "$15",
            "30m",
            "Removal",
        ),
        entry(
            9,
            "Gel extension removal",
            "Gel extension removal which a machine",
            "$20",
            "1h",
            "Removal",
        ),
        entry(
            10,
            "Nail Polish regular",
            "Regular Nail polish",
            "$10",
            "30m",
            "Polish",
        ),
    ]
}

/// Looks a service up by catalog id.
#[must_use]
pub fn find(id: u32) -> Option<Service> {
    default_catalog().into_iter().find(|s| s.id == id)
}
