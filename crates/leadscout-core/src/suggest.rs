//! Keyword suggestions for the search box.

/// Maximum number of suggestions returned by [`suggest`].
pub const MAX_SUGGESTIONS: usize = 6;

pub const KEYWORDS: &[&str] = &[
    "Real Estate",
    "Dentists",
    "Lawyers",
    "Marketing Agencies",
    "Accounting Firms",
    "Roofing Contractors",
    "Plumbers",
    "Electricians",
    "HVAC Services",
    "Chiropractors",
    "Physical Therapists",
    "Med Spas",
    "Car Dealerships",
    "Auto Repair",
    "Restaurants",
    "Coffee Shops",
    "Gyms",
    "Personal Trainers",
    "Insurance Brokers",
    "Mortgage Brokers",
    "Real Estate Agents",
    "IT Consultants",
    "Software Companies",
    "Web Design Agencies",
    "SEO Agencies",
    "Managed IT Services",
    "Cybersecurity Firms",
    "Logistics Companies",
    "Freight Forwarders",
    "Construction Companies",
    "Architects",
    "Interior Designers",
    "Event Planners",
    "Catering Companies",
    "Hotels",
    "Property Management",
    "Dental Labs",
    "Veterinary Clinics",
    "Optometrists",
    "Pharmacies",
    "Home Health Care",
    "Legal Consultants",
    "Recruiting Agencies",
    "Staffing Firms",
    "E-commerce Brands",
    "Manufacturers",
    "Wholesalers",
    "B2B SaaS",
    "Coworking Spaces",
    "Cleaning Services",
];

/// Case-insensitive substring match over [`KEYWORDS`].
///
/// A blank query returns the first [`MAX_SUGGESTIONS`] keywords.
#[must_use]
pub fn suggest(query: &str) -> Vec<&'static str> {
    let needle = query.trim().to_lowercase();
    KEYWORDS
        .iter()
        .copied()
        .filter(|k| needle.is_empty() || k.to_lowercase().contains(&needle))
        .take(MAX_SUGGESTIONS)
        .collect()
}
