// vle-core/src/units.rs
//
// Internally every quantity is a plain f64 in the mol / litre / Pa / K
// convention. The uom types are used at the edges (display, conversions).

use uom::si::f64::{
    AmountOfSubstance as UomAmountOfSubstance, Pressure as UomPressure,
    ThermodynamicTemperature as UomThermodynamicTemperature, Volume as UomVolume,
};

// Public canonical unit types (SI, f64)
pub type Amount = UomAmountOfSubstance;
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;
pub type Volume = UomVolume;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn liters(v: f64) -> Volume {
    use uom::si::volume::liter;
    Volume::new::<liter>(v)
}

#[inline]
pub fn mol(v: f64) -> Amount {
    use uom::si::amount_of_substance::mole;
    Amount::new::<mole>(v)
}

#[inline]
pub fn to_kpa(p: Pressure) -> f64 {
    use uom::si::pressure::kilopascal;
    p.get::<kilopascal>()
}

#[inline]
pub fn to_celsius(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::degree_celsius;
    t.get::<degree_celsius>()
}

pub mod constants {
    /// Gas constant in J/(kmol·K). With moles and litres, `n·R·T/V` is in Pa.
    pub const R_GAS: f64 = 8_314.551_0;

    /// One standard atmosphere (Pa).
    pub const ATM_PA: f64 = 101_325.0;

    /// Saturation pressure used for gases that never condense (Pa).
    pub const INERT_SATURATION_PA: f64 = 1.0e7;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _p = pa(101_325.0);
        let _t = k(300.0);
        let _v = liters(22.4);
        let _n = mol(1.0);
    }

    #[test]
    fn edge_conversions() {
        assert!((to_kpa(pa(101_325.0)) - 101.325).abs() < 1e-9);
        assert!((to_celsius(k(373.15)) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn gas_constant_gives_pascal_from_mol_and_litre() {
        // 1 mol at 273.15 K in 22.414 L is one atmosphere.
        let p = 1.0 * constants::R_GAS * 273.15 / 22.414;
        assert!((p - constants::ATM_PA).abs() / constants::ATM_PA < 1e-3);
    }
}
