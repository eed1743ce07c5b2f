//! This file is pretty much a periodic table

use c_enum::*;

c_enum! {
    /// Elements by atomic number, as far as the organic and aromatic
    /// subsets reach
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Element: u8 {
        Unknown,
        Hydrogen,
        Helium,
        Lithium,
        Beryllium,
        Boron,
        Carbon,
        Nitrogen,
        Oxygen,
        Fluorine,
        Neon,
        Sodium,
        Magnesium,
        Aluminium,
        Silicon,
        Phosphorus,
        Sulfur,
        Chlorine,
        Argon,
        Potassium,
        Calcium,
        Scandium,
        Titanium,
        Vanadium,
        Chromium,
        Manganese,
        Iron,
        Cobalt,
        Nickel,
        Copper,
        Zinc,
        Gallium,
        Germanium,
        Arsenic,
        Selenium,
        Bromine,
        Krypton,
        Rubidium,
        Strontium,
        Yttrium,
        Zirconium,
        Niobium,
        Molybdenum,
        Technetium,
        Ruthenium,
        Rhodium,
        Palladium,
        Silver,
        Cadmium,
        Indium,
        Tin,
        Antimony,
        Tellurium,
        Iodine,
        Xenon,
    }
}

impl Element {
    #[inline(always)]
    pub fn atomic_number(self) -> u8 {
        self.0
    }
    #[inline(always)]
    pub fn data(self) -> &'static ElementData {
        &ELEMENT_DATA[self.0 as usize]
    }
    /// Member of the organic subset, writable without brackets
    pub fn organic(self) -> bool {
        self.data().organic
    }
    /// Allowed to sit in a delocalised ring
    pub fn aromatic(self) -> bool {
        self.data().aromatic
    }
    /// Hydrogens implied by the lowest default valence that fits the bonded
    /// valence `v`; zero when no default valence accommodates it
    pub fn implicit_hydrogens(self, v: u32) -> u8 {
        self.data()
            .valences
            .iter()
            .map(|&d| d as u32)
            .find(|&d| d >= v)
            .map_or(0, |d| (d - v) as u8)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ElementData {
    pub name: &'static str,
    pub sym: &'static str,
    /// Default valences, used to derive implied hydrogen counts
    pub valences: &'static [u8],
    pub organic: bool,
    pub aromatic: bool,
}
impl ElementData {
    pub const fn new(
        name: &'static str,
        sym: &'static str,
        valences: &'static [u8],
        organic: bool,
        aromatic: bool,
    ) -> Self {
        Self {
            name,
            sym,
            valences,
            organic,
            aromatic,
        }
    }
}

/// All of the data, just index the array by the atomic number
#[rustfmt::skip]
pub static ELEMENT_DATA: &[ElementData] = &[
    ElementData::new("unknown",      "R",  &[],        false, false),
    ElementData::new("hydrogen",     "H",  &[],        false, false),
    ElementData::new("helium",       "He", &[],        false, false),
    ElementData::new("lithium",      "Li", &[],        false, false),
    ElementData::new("beryllium",    "Be", &[],        false, false),
    ElementData::new("boron",        "B",  &[3],       true,  true ),
    ElementData::new("carbon",       "C",  &[4],       true,  true ),
    ElementData::new("nitrogen",     "N",  &[3, 5],    true,  true ),
    ElementData::new("oxygen",       "O",  &[2],       true,  true ),
    ElementData::new("fluorine",     "F",  &[1],       true,  false),
    ElementData::new("neon",         "Ne", &[],        false, false),
    ElementData::new("sodium",       "Na", &[],        false, false),
    ElementData::new("magnesium",    "Mg", &[],        false, false),
    ElementData::new("aluminium",    "Al", &[],        false, false),
    ElementData::new("silicon",      "Si", &[],        false, false),
    ElementData::new("phosphorus",   "P",  &[3, 5],    true,  true ),
    ElementData::new("sulfur",       "S",  &[2, 4, 6], true,  true ),
    ElementData::new("chlorine",     "Cl", &[1],       true,  false),
    ElementData::new("argon",        "Ar", &[],        false, false),
    ElementData::new("potassium",    "K",  &[],        false, false),
    ElementData::new("calcium",      "Ca", &[],        false, false),
    ElementData::new("scandium",     "Sc", &[],        false, false),
    ElementData::new("titanium",     "Ti", &[],        false, false),
    ElementData::new("vanadium",     "V",  &[],        false, false),
    ElementData::new("chromium",     "Cr", &[],        false, false),
    ElementData::new("manganese",    "Mn", &[],        false, false),
    ElementData::new("iron",         "Fe", &[],        false, false),
    ElementData::new("cobalt",       "Co", &[],        false, false),
    ElementData::new("nickel",       "Ni", &[],        false, false),
    ElementData::new("copper",       "Cu", &[],        false, false),
    ElementData::new("zinc",         "Zn", &[],        false, false),
    ElementData::new("gallium",      "Ga", &[],        false, false),
    ElementData::new("germanium",    "Ge", &[],        false, false),
    ElementData::new("arsenic",      "As", &[],        false, true ),
    ElementData::new("selenium",     "Se", &[],        false, true ),
    ElementData::new("bromine",      "Br", &[1],       true,  false),
    ElementData::new("krypton",      "Kr", &[],        false, false),
    ElementData::new("rubidium",     "Rb", &[],        false, false),
    ElementData::new("strontium",    "Sr", &[],        false, false),
    ElementData::new("yttrium",      "Y",  &[],        false, false),
    ElementData::new("zirconium",    "Zr", &[],        false, false),
    ElementData::new("niobium",      "Nb", &[],        false, false),
    ElementData::new("molybdenum",   "Mo", &[],        false, false),
    ElementData::new("technetium",   "Tc", &[],        false, false),
    ElementData::new("ruthenium",    "Ru", &[],        false, false),
    ElementData::new("rhodium",      "Rh", &[],        false, false),
    ElementData::new("palladium",    "Pd", &[],        false, false),
    ElementData::new("silver",       "Ag", &[],        false, false),
    ElementData::new("cadmium",      "Cd", &[],        false, false),
    ElementData::new("indium",       "In", &[],        false, false),
    ElementData::new("tin",          "Sn", &[],        false, false),
    ElementData::new("antimony",     "Sb", &[],        false, false),
    ElementData::new("tellurium",    "Te", &[],        false, false),
    ElementData::new("iodine",       "I",  &[1],       true,  false),
    ElementData::new("xenon",        "Xe", &[],        false, false),
];
