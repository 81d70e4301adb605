// cf-core/src/units.rs

use uom::si::f64::{
    Area as UomArea, Mass as UomMass, MassDensity as UomMassDensity, MassRate as UomMassRate,
    Pressure as UomPressure, ThermodynamicTemperature as UomThermodynamicTemperature,
    Time as UomTime, Velocity as UomVelocity, Volume as UomVolume,
};

// Public canonical unit types (SI, f64)
pub type Area = UomArea;
pub type Mass = UomMass;
pub type Density = UomMassDensity;
pub type MassRate = UomMassRate;
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;
pub type Time = UomTime;
pub type Velocity = UomVelocity;
pub type Volume = UomVolume;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

/// Pressure given in standard atmospheres.
#[inline]
pub fn atm(v: f64) -> Pressure {
    pa(v * constants::ONE_ATM_PA)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn kg(v: f64) -> Mass {
    use uom::si::mass::kilogram;
    Mass::new::<kilogram>(v)
}

#[inline]
pub fn kgps(v: f64) -> MassRate {
    use uom::si::mass_rate::kilogram_per_second;
    MassRate::new::<kilogram_per_second>(v)
}

#[inline]
pub fn m2(v: f64) -> Area {
    use uom::si::area::square_meter;
    Area::new::<square_meter>(v)
}

#[inline]
pub fn m3(v: f64) -> Volume {
    use uom::si::volume::cubic_meter;
    Volume::new::<cubic_meter>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

pub mod constants {
    /// Universal gas constant [J/(kmol·K)]; molar masses are carried in kg/kmol.
    pub const R_UNIVERSAL: f64 = 8_314.462_618;

    /// Standard atmosphere [Pa].
    pub const ONE_ATM_PA: f64 = 101_325.0;

    /// Offset between kelvin and degrees Celsius.
    pub const ZERO_CELSIUS_K: f64 = 273.15;
}
