//! NASA 7-coefficient polynomial thermodynamics.
//!
//! Coefficients are the GRI-Mech 3.0 fits. Enthalpies include the standard
//! enthalpy of formation at 298.15 K, so mixture energies carry the chemical
//! heat release.

use crate::species::Species;

/// Two-range NASA-7 fit for one species.
///
/// `cp/R = a0 + a1 T + a2 T² + a3 T³ + a4 T⁴`, `a5` and `a6` are the enthalpy
/// and entropy integration constants. Outside `[t_low, t_high]` the nearest
/// range is extrapolated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nasa7 {
    pub t_low: f64,
    pub t_mid: f64,
    pub t_high: f64,
    pub low: [f64; 7],
    pub high: [f64; 7],
}

impl Nasa7 {
    #[inline]
    fn coeffs(&self, t: f64) -> &[f64; 7] {
        if t < self.t_mid { &self.low } else { &self.high }
    }

    /// Dimensionless heat capacity cp/R.
    pub fn cp_r(&self, t: f64) -> f64 {
        let a = self.coeffs(t);
        a[0] + t * (a[1] + t * (a[2] + t * (a[3] + t * a[4])))
    }

    /// Dimensionless enthalpy h/(R T).
    pub fn h_rt(&self, t: f64) -> f64 {
        let a = self.coeffs(t);
        a[0] + t * (a[1] / 2.0 + t * (a[2] / 3.0 + t * (a[3] / 4.0 + t * a[4] / 5.0))) + a[5] / t
    }
}

const C2H6: Nasa7 = Nasa7 {
    t_low: 200.0,
    t_mid: 1000.0,
    t_high: 3500.0,
    low: [
        4.29142492E+00,
        -5.50154270E-03,
        5.99438288E-05,
        -7.08466285E-08,
        2.68685771E-11,
        -1.15222055E+04,
        2.66682316E+00,
    ],
    high: [
        1.07188150E+00,
        2.16852677E-02,
        -1.00256067E-05,
        2.21412001E-09,
        -1.90002890E-13,
        -1.14263932E+04,
        1.51156107E+01,
    ],
};

const O2: Nasa7 = Nasa7 {
    t_low: 200.0,
    t_mid: 1000.0,
    t_high: 3500.0,
    low: [
        3.78245636E+00,
        -2.99673416E-03,
        9.84730201E-06,
        -9.68129509E-09,
        3.24372837E-12,
        -1.06394356E+03,
        3.65767573E+00,
    ],
    high: [
        3.28253784E+00,
        1.48308754E-03,
        -7.57966669E-07,
        2.09470555E-10,
        -2.16717794E-14,
        -1.08845772E+03,
        5.45323129E+00,
    ],
};

const H: Nasa7 = Nasa7 {
    t_low: 200.0,
    t_mid: 1000.0,
    t_high: 3500.0,
    low: [
        2.50000000E+00,
        7.05332819E-13,
        -1.99591964E-15,
        2.30081632E-18,
        -9.27732332E-22,
        2.54736599E+04,
        -4.46682853E-01,
    ],
    high: [
        2.50000001E+00,
        -2.30842973E-11,
        1.61561948E-14,
        -4.73515235E-18,
        4.98197357E-22,
        2.54736599E+04,
        -4.46682914E-01,
    ],
};

const H2: Nasa7 = Nasa7 {
    t_low: 200.0,
    t_mid: 1000.0,
    t_high: 3500.0,
    low: [
        2.34433112E+00,
        7.98052075E-03,
        -1.94781510E-05,
        2.01572094E-08,
        -7.37611761E-12,
        -9.17935173E+02,
        6.83010238E-01,
    ],
    high: [
        3.33727920E+00,
        -4.94024731E-05,
        4.99456778E-07,
        -1.79566394E-10,
        2.00255376E-14,
        -9.50158922E+02,
        -3.20502331E+00,
    ],
};

const H2O: Nasa7 = Nasa7 {
    t_low: 200.0,
    t_mid: 1000.0,
    t_high: 3500.0,
    low: [
        4.19864056E+00,
        -2.03643410E-03,
        6.52040211E-06,
        -5.48797062E-09,
        1.77197817E-12,
        -3.02937267E+04,
        -8.49032208E-01,
    ],
    high: [
        3.03399249E+00,
        2.17691804E-03,
        -1.64072518E-07,
        -9.70419870E-11,
        1.68200992E-14,
        -3.00042971E+04,
        4.96677010E+00,
    ],
};

const CO: Nasa7 = Nasa7 {
    t_low: 200.0,
    t_mid: 1000.0,
    t_high: 3500.0,
    low: [
        3.57953347E+00,
        -6.10353680E-04,
        1.01681433E-06,
        9.07005884E-10,
        -9.04424499E-13,
        -1.43440860E+04,
        3.50840928E+00,
    ],
    high: [
        2.71518561E+00,
        2.06252743E-03,
        -9.98825771E-07,
        2.30053008E-10,
        -2.03647716E-14,
        -1.41518724E+04,
        7.81868772E+00,
    ],
};

const CO2: Nasa7 = Nasa7 {
    t_low: 200.0,
    t_mid: 1000.0,
    t_high: 3500.0,
    low: [
        2.35677352E+00,
        8.98459677E-03,
        -7.12356269E-06,
        2.45919022E-09,
        -1.43699548E-13,
        -4.83719697E+04,
        9.90105222E+00,
    ],
    high: [
        3.85746029E+00,
        4.41437026E-03,
        -2.21481404E-06,
        5.23490188E-10,
        -4.72084164E-14,
        -4.87591660E+04,
        2.27163806E+00,
    ],
};

const N2: Nasa7 = Nasa7 {
    t_low: 300.0,
    t_mid: 1000.0,
    t_high: 5000.0,
    low: [
        3.298677E+00,
        1.4082404E-03,
        -3.963222E-06,
        5.641515E-09,
        -2.444854E-12,
        -1.0208999E+03,
        3.950372E+00,
    ],
    high: [
        2.92664E+00,
        1.4879768E-03,
        -5.68476E-07,
        1.0097038E-10,
        -6.753351E-15,
        -9.227977E+02,
        5.980528E+00,
    ],
};

impl Species {
    /// NASA-7 fit for this species.
    pub fn nasa7(&self) -> &'static Nasa7 {
        match self {
            Species::C2H6 => &C2H6,
            Species::O2 => &O2,
            Species::H => &H,
            Species::H2 => &H2,
            Species::H2O => &H2O,
            Species::CO => &CO,
            Species::CO2 => &CO2,
            Species::N2 => &N2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_core::units::constants::R_UNIVERSAL;

    const T_REF: f64 = 298.15;

    /// Molar enthalpy [J/mol] at temperature `t`.
    fn h_molar(s: Species, t: f64) -> f64 {
        s.nasa7().h_rt(t) * R_UNIVERSAL * 1e-3 * t
    }

    #[test]
    fn formation_enthalpies_at_reference_temperature() {
        let cases = [
            (Species::C2H6, -83_851.0),
            (Species::H2O, -241_826.0),
            (Species::CO, -110_535.0),
            (Species::CO2, -393_510.0),
            (Species::H, 217_999.0),
            (Species::O2, 0.0),
            (Species::H2, 0.0),
            (Species::N2, 0.0),
        ];
        for (s, expected) in cases {
            let h = h_molar(s, T_REF);
            assert!(
                (h - expected).abs() < 150.0,
                "{s}: h = {h:.1} J/mol, expected {expected:.1}"
            );
        }
    }

    #[test]
    fn ranges_join_continuously() {
        for s in Species::ALL {
            let fit = s.nasa7();
            let below = fit.t_mid - 1e-9;
            let above = fit.t_mid;
            let rel = |a: f64, b: f64| (a - b).abs() / a.abs().max(1.0);
            assert!(rel(fit.cp_r(below), fit.cp_r(above)) < 1e-3, "{s} cp");
            assert!(rel(fit.h_rt(below), fit.h_rt(above)) < 1e-3, "{s} h");
        }
    }

    #[test]
    fn monatomic_hydrogen_has_constant_cp() {
        let fit = Species::H.nasa7();
        for t in [300.0, 1500.0, 3000.0] {
            assert!((fit.cp_r(t) - 2.5).abs() < 1e-6);
        }
    }

    #[test]
    fn heat_capacity_exceeds_gas_constant() {
        for s in Species::ALL {
            for t in [150.0, 300.0, 1000.0, 3000.0, 6000.0] {
                assert!(s.nasa7().cp_r(t) > 1.0, "{s} at {t} K");
            }
        }
    }
}
