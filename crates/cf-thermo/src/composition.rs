//! Mixture composition.

use crate::error::{ThermoError, ThermoResult};
use crate::species::{Species, SpeciesArray};
use cf_core::numeric::{Tolerances, nearly_equal};

/// Mass fractions below this are dropped when normalizing.
const NEGLIGIBLE_FRACTION: f64 = 1e-15;

/// Mixture composition stored as normalized mass fractions.
///
/// Fractions are non-negative and sum to 1.0. Mole-fraction constructors
/// convert on the way in.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    y: SpeciesArray,
}

impl Composition {
    /// Create a pure-species composition.
    pub fn pure(species: Species) -> Self {
        let mut y = [0.0; Species::COUNT];
        y[species.index()] = 1.0;
        Self { y }
    }

    /// Create a composition from (possibly unnormalized) mass fractions.
    pub fn new_mass_fractions(fractions: Vec<(Species, f64)>) -> ThermoResult<Self> {
        let mut y = [0.0; Species::COUNT];
        for (species, frac) in fractions {
            y[species.index()] += validated_fraction(frac)?;
        }
        Ok(Self { y: normalize(y)? })
    }

    /// Create a composition from (possibly unnormalized) mole fractions.
    pub fn new_mole_fractions(fractions: Vec<(Species, f64)>) -> ThermoResult<Self> {
        let mut y = [0.0; Species::COUNT];
        for (species, frac) in fractions {
            // Mass is proportional to x_i * M_i.
            y[species.index()] += validated_fraction(frac)? * species.molar_mass();
        }
        Ok(Self { y: normalize(y)? })
    }

    /// Composition of a species mass inventory.
    ///
    /// Slightly negative inventories (integration round-off) count as zero.
    pub fn from_species_masses(masses: &SpeciesArray) -> ThermoResult<Self> {
        let mut y = [0.0; Species::COUNT];
        for (dst, &m) in y.iter_mut().zip(masses) {
            if !m.is_finite() {
                return Err(ThermoError::NonPhysical {
                    what: "non-finite species mass",
                });
            }
            *dst = m.max(0.0);
        }
        Ok(Self { y: normalize(y)? })
    }

    /// Parse a Cantera-style mole-fraction string such as `"C2H6:1.0, O2:2"`.
    pub fn parse_mole_fractions(input: &str) -> ThermoResult<Self> {
        let invalid = |reason| ThermoError::InvalidComposition {
            input: input.to_string(),
            reason,
        };

        let mut fractions = Vec::new();
        for item in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (name, value) = item.split_once(':').ok_or_else(|| invalid("expected NAME:VALUE"))?;
            let species: Species = name.parse()?;
            let value: f64 = value
                .trim()
                .parse()
                .map_err(|_| invalid("fraction is not a number"))?;
            fractions.push((species, value));
        }
        if fractions.is_empty() {
            return Err(invalid("no species given"));
        }
        Self::new_mole_fractions(fractions)
    }

    /// Get mass fraction of a species (0.0 if not present).
    pub fn mass_fraction(&self, species: Species) -> f64 {
        self.y[species.index()]
    }

    pub fn mass_fractions(&self) -> &SpeciesArray {
        &self.y
    }

    /// Get mole fraction of a species (0.0 if not present).
    pub fn mole_fraction(&self, species: Species) -> f64 {
        self.y[species.index()] / species.molar_mass() * self.molar_mass()
    }

    pub fn mole_fractions(&self) -> SpeciesArray {
        let m_mix = self.molar_mass();
        let mut x = [0.0; Species::COUNT];
        for s in Species::ALL {
            x[s.index()] = self.y[s.index()] / s.molar_mass() * m_mix;
        }
        x
    }

    /// Mixture molar mass [kg/kmol]: 1 / Σ (y_i / M_i).
    pub fn molar_mass(&self) -> f64 {
        let inv: f64 = Species::ALL
            .iter()
            .map(|s| self.y[s.index()] / s.molar_mass())
            .sum();
        1.0 / inv
    }

    /// Check if this is a pure-species composition.
    pub fn is_pure(&self) -> Option<Species> {
        let tol = Tolerances {
            abs: 1e-10,
            rel: 1e-10,
        };
        Species::ALL
            .into_iter()
            .find(|s| nearly_equal(self.y[s.index()], 1.0, tol))
    }

    /// Iterate over species with non-zero mass fractions.
    pub fn iter(&self) -> impl Iterator<Item = (Species, f64)> + '_ {
        Species::ALL
            .into_iter()
            .map(|s| (s, self.y[s.index()]))
            .filter(|(_, y)| *y > 0.0)
    }
}

impl std::str::FromStr for Composition {
    type Err = ThermoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_mole_fractions(s)
    }
}

impl std::fmt::Display for Composition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (s, y) in self.iter().filter(|(_, y)| *y >= 1e-6) {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{s}:{y:.6}")?;
            first = false;
        }
        Ok(())
    }
}

fn validated_fraction(frac: f64) -> ThermoResult<f64> {
    if !frac.is_finite() {
        return Err(ThermoError::NonPhysical {
            what: "non-finite fraction",
        });
    }
    if frac < 0.0 {
        return Err(ThermoError::NonPhysical {
            what: "negative fraction",
        });
    }
    Ok(frac)
}

fn normalize(mut y: SpeciesArray) -> ThermoResult<SpeciesArray> {
    let sum: f64 = y.iter().sum();
    if sum <= 0.0 || !sum.is_finite() {
        return Err(ThermoError::NonPhysical {
            what: "fractions sum to zero or non-finite",
        });
    }
    for v in y.iter_mut() {
        *v /= sum;
        if *v < NEGLIGIBLE_FRACTION {
            *v = 0.0;
        }
    }
    Ok(y)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn normalized_sum_is_one(fracs in prop::collection::vec(0.0_f64..1.0_f64, 1..8)) {
            let input: Vec<(Species, f64)> = fracs
                .iter()
                .enumerate()
                .map(|(i, &f)| (Species::ALL[i % Species::COUNT], f))
                .collect();

            if let Ok(comp) = Composition::new_mole_fractions(input) {
                let sum: f64 = comp.mass_fractions().iter().sum();
                let tol = Tolerances { abs: 1e-9, rel: 1e-9 };
                prop_assert!(nearly_equal(sum, 1.0, tol));

                let x_sum: f64 = comp.mole_fractions().iter().sum();
                prop_assert!(nearly_equal(x_sum, 1.0, tol));
            }
        }
    }
}
