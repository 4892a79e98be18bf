// ev-core/src/units.rs

use uom::si::f64::{Energy as UomEnergy, Power as UomPower, Ratio as UomRatio};

// Public canonical unit types (SI, f64)
pub type Energy = UomEnergy;
pub type Power = UomPower;
pub type Ratio = UomRatio;

#[inline]
pub fn kw(v: f64) -> Power {
    use uom::si::power::kilowatt;
    Power::new::<kilowatt>(v)
}

#[inline]
pub fn mw(v: f64) -> Power {
    use uom::si::power::megawatt;
    Power::new::<megawatt>(v)
}

#[inline]
pub fn kwh(v: f64) -> Energy {
    use uom::si::energy::kilowatt_hour;
    Energy::new::<kilowatt_hour>(v)
}

#[inline]
pub fn unitless(v: f64) -> Ratio {
    use uom::si::ratio::ratio;
    Ratio::new::<ratio>(v)
}

#[inline]
pub fn as_kw(p: Power) -> f64 {
    use uom::si::power::kilowatt;
    p.get::<kilowatt>()
}

#[inline]
pub fn as_mw(p: Power) -> f64 {
    use uom::si::power::megawatt;
    p.get::<megawatt>()
}

#[inline]
pub fn as_kwh(e: Energy) -> f64 {
    use uom::si::energy::kilowatt_hour;
    e.get::<kilowatt_hour>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn megawatts_to_kilowatts() {
        assert!((as_kw(mw(1.5)) - 1500.0).abs() < 1e-9);
        assert!((as_mw(kw(250.0)) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn energy_round_trip() {
        assert!((as_kwh(kwh(12.5)) - 12.5).abs() < 1e-9);
        let _r = unitless(0.4);
    }
}
