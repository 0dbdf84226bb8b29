/// Canonical set of standard divisions seeded for a new project.
///
/// Codes follow the CSI MasterFormat numbering the estimating team budgets
/// against; the bootstrap creates one zeroed commitment per division.
pub const STANDARD_DIVISIONS: &[(&str, &str)] = &[
    ("02-4100", "Demolition"),
    ("03-3000", "Cast-in-Place Concrete"),
    ("04-2000", "Unit Masonry"),
    ("05-1000", "Structural Metal Framing"),
    ("06-1000", "Rough Carpentry"),
    ("07-5000", "Membrane Roofing"),
    ("08-1000", "Doors and Frames"),
    ("09-2900", "Gypsum Board"),
    ("09-6500", "Resilient Flooring"),
    ("21-1000", "Fire Suppression"),
    ("22-1000", "Plumbing"),
    ("23-1000", "HVAC"),
    ("26-1000", "Electrical"),
    ("31-2000", "Earth Moving"),
    ("32-1000", "Paving"),
];
