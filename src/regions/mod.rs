//! Fixed table of the directory's regions (Swedish counties)
//!
//! The listing API filters by these numeric ids. The table is ordered by id,
//! which is also the order the runner walks it in.

use std::fmt;

/// One administrative region of the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    /// Id used by the listing API filter
    pub id: u32,

    /// Display name written to every CSV row of the region
    pub name: &'static str,
}

impl Region {
    const fn new(id: u32, name: &'static str) -> Self {
        Self { id, name }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// All harvested regions, ascending by id
pub const REGIONS: [Region; 20] = [
    Region::new(1, "Blekinge län"),
    Region::new(2, "Dalarnas län"),
    Region::new(3, "Gotlands län"),
    Region::new(4, "Gävleborgs län"),
    Region::new(5, "Hallands län"),
    Region::new(6, "Jämtlands län"),
    Region::new(7, "Jönköpings län"),
    Region::new(8, "Kalmar län"),
    Region::new(9, "Kronobergs län"),
    Region::new(10, "Norrbottens län"),
    Region::new(11, "Skåne län"),
    Region::new(12, "Stockholms län"),
    Region::new(13, "Södermanlands län"),
    Region::new(14, "Uppsala län"),
    Region::new(15, "Värmlands län"),
    Region::new(16, "Västerbottens län"),
    Region::new(17, "Västernorrlands län"),
    Region::new(18, "Västmanlands län"),
    Region::new(19, "Västra Götalands län"),
    Region::new(20, "Örebro län"),
];

/// Looks up a region by its listing id
pub fn region_by_id(id: u32) -> Option<Region> {
    REGIONS.iter().find(|region| region.id == id).copied()
}

/// Returns the regions to harvest, ascending by id
///
/// `None` selects the whole table. Unknown ids are skipped; the configuration
/// layer rejects them before a run starts.
pub fn select_regions(ids: Option<&[u32]>) -> Vec<Region> {
    match ids {
        None => REGIONS.to_vec(),
        Some(ids) => REGIONS
            .iter()
            .filter(|region| ids.contains(&region.id))
            .copied()
            .collect(),
    }
}
