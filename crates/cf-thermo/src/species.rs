//! Chemical species definitions.

use crate::error::ThermoError;

/// Per-species values indexed by [`Species::index`].
pub type SpeciesArray = [f64; Species::COUNT];

/// Species carried by the bundled thermochemistry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Species {
    /// Ethane (C₂H₆)
    C2H6,
    /// Oxygen (O₂)
    O2,
    /// Hydrogen radical (H)
    H,
    /// Hydrogen (H₂)
    H2,
    /// Water (H₂O)
    H2O,
    /// Carbon monoxide (CO)
    CO,
    /// Carbon dioxide (CO₂)
    CO2,
    /// Nitrogen (N₂), inert
    N2,
}

/// Element counts of one molecule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Atoms {
    pub c: u8,
    pub h: u8,
    pub o: u8,
    pub n: u8,
}

impl Atoms {
    const fn new(c: u8, h: u8, o: u8, n: u8) -> Self {
        Self { c, h, o, n }
    }

    /// Counts as `[C, H, O, N]`.
    pub fn as_array(&self) -> [f64; 4] {
        [self.c as f64, self.h as f64, self.o as f64, self.n as f64]
    }
}

/// Standard atomic weights [kg/kmol] for C, H, O, N.
const ATOMIC_WEIGHTS: [f64; 4] = [12.011, 1.008, 15.999, 14.007];

impl Species {
    pub const COUNT: usize = 8;

    pub const ALL: [Species; Species::COUNT] = [
        Species::C2H6,
        Species::O2,
        Species::H,
        Species::H2,
        Species::H2O,
        Species::CO,
        Species::CO2,
        Species::N2,
    ];

    /// Position of this species in a [`SpeciesArray`].
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn key(&self) -> &'static str {
        match self {
            Species::C2H6 => "C2H6",
            Species::O2 => "O2",
            Species::H => "H",
            Species::H2 => "H2",
            Species::H2O => "H2O",
            Species::CO => "CO",
            Species::CO2 => "CO2",
            Species::N2 => "N2",
        }
    }

    /// Get human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Species::C2H6 => "Ethane",
            Species::O2 => "Oxygen",
            Species::H => "Atomic Hydrogen",
            Species::H2 => "Hydrogen",
            Species::H2O => "Water",
            Species::CO => "Carbon Monoxide",
            Species::CO2 => "Carbon Dioxide",
            Species::N2 => "Nitrogen",
        }
    }

    pub fn atoms(&self) -> Atoms {
        match self {
            Species::C2H6 => Atoms::new(2, 6, 0, 0),
            Species::O2 => Atoms::new(0, 0, 2, 0),
            Species::H => Atoms::new(0, 1, 0, 0),
            Species::H2 => Atoms::new(0, 2, 0, 0),
            Species::H2O => Atoms::new(0, 2, 1, 0),
            Species::CO => Atoms::new(1, 0, 1, 0),
            Species::CO2 => Atoms::new(1, 0, 2, 0),
            Species::N2 => Atoms::new(0, 0, 0, 2),
        }
    }

    /// Molar mass [kg/kmol], summed from atomic weights.
    ///
    /// Deriving it from the element counts keeps every balanced reaction
    /// exactly mass-conserving.
    pub fn molar_mass(&self) -> f64 {
        self.atoms()
            .as_array()
            .iter()
            .zip(ATOMIC_WEIGHTS)
            .map(|(n, w)| n * w)
            .sum()
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Species {
    type Err = ThermoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "C2H6" | "ETHANE" => Ok(Species::C2H6),
            "O2" | "OXYGEN" => Ok(Species::O2),
            "H" | "ATOMIC HYDROGEN" | "HYDROGEN RADICAL" => Ok(Species::H),
            "H2" | "HYDROGEN" => Ok(Species::H2),
            "H2O" | "WATER" => Ok(Species::H2O),
            "CO" | "CARBONMONOXIDE" | "CARBON MONOXIDE" => Ok(Species::CO),
            "CO2" | "CARBONDIOXIDE" | "CARBON DIOXIDE" => Ok(Species::CO2),
            "N2" | "NITROGEN" => Ok(Species::N2),
            _ => Err(ThermoError::UnknownSpecies {
                name: s.trim().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_all_order() {
        for (i, s) in Species::ALL.iter().enumerate() {
            assert_eq!(s.index(), i);
        }
    }

    #[test]
    fn molar_masses_match_reference() {
        assert!((Species::C2H6.molar_mass() - 30.070).abs() < 1e-3);
        assert!((Species::O2.molar_mass() - 31.998).abs() < 1e-3);
        assert!((Species::H2O.molar_mass() - 18.015).abs() < 1e-3);
        assert!((Species::CO2.molar_mass() - 44.009).abs() < 1e-3);
        assert!((Species::H.molar_mass() - 1.008).abs() < 1e-12);
    }

    #[test]
    fn parse_aliases() {
        assert_eq!("ethane".parse::<Species>().unwrap(), Species::C2H6);
        assert_eq!(" O2 ".parse::<Species>().unwrap(), Species::O2);
        assert_eq!("Carbon Dioxide".parse::<Species>().unwrap(), Species::CO2);
    }

    #[test]
    fn unknown_species_reports_name() {
        let err = "CH4".parse::<Species>().unwrap_err();
        assert_eq!(
            err,
            ThermoError::UnknownSpecies {
                name: "CH4".to_string()
            }
        );
    }

    #[test]
    fn canonical_key_roundtrip() {
        for s in Species::ALL {
            assert_eq!(s.key().parse::<Species>().unwrap(), s);
        }
    }
}
