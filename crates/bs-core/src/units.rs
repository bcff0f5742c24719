// bs-core/src/units.rs

use uom::si::f64::{
    ElectricCharge as UomElectricCharge, ElectricCurrent as UomElectricCurrent,
    ElectricPotential as UomElectricPotential, ElectricalResistance as UomElectricalResistance,
    Power as UomPower, ThermodynamicTemperature as UomThermodynamicTemperature, Time as UomTime,
};

// Public canonical unit types (SI, f64)
pub type Charge = UomElectricCharge;
pub type Current = UomElectricCurrent;
pub type Potential = UomElectricPotential;
pub type Resistance = UomElectricalResistance;
pub type Power = UomPower;
pub type Temperature = UomThermodynamicTemperature;
pub type Time = UomTime;

#[inline]
pub fn volts(v: f64) -> Potential {
    use uom::si::electric_potential::volt;
    Potential::new::<volt>(v)
}

#[inline]
pub fn amps(v: f64) -> Current {
    use uom::si::electric_current::ampere;
    Current::new::<ampere>(v)
}

#[inline]
pub fn ohms(v: f64) -> Resistance {
    use uom::si::electrical_resistance::ohm;
    Resistance::new::<ohm>(v)
}

#[inline]
pub fn watts(v: f64) -> Power {
    use uom::si::power::watt;
    Power::new::<watt>(v)
}

#[inline]
pub fn amp_hours(v: f64) -> Charge {
    use uom::si::electric_charge::ampere_hour;
    Charge::new::<ampere_hour>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

/// Plain-number accessors in the units used by solver instruction strings.
pub mod value {
    use super::*;

    #[inline]
    pub fn in_volts(v: Potential) -> f64 {
        v.get::<uom::si::electric_potential::volt>()
    }

    #[inline]
    pub fn in_amps(i: Current) -> f64 {
        i.get::<uom::si::electric_current::ampere>()
    }

    #[inline]
    pub fn in_ohms(r: Resistance) -> f64 {
        r.get::<uom::si::electrical_resistance::ohm>()
    }

    #[inline]
    pub fn in_watts(p: Power) -> f64 {
        p.get::<uom::si::power::watt>()
    }

    #[inline]
    pub fn in_amp_hours(q: Charge) -> f64 {
        q.get::<uom::si::electric_charge::ampere_hour>()
    }

    #[inline]
    pub fn in_seconds(t: Time) -> f64 {
        t.get::<uom::si::time::second>()
    }

    #[inline]
    pub fn in_hours(t: Time) -> f64 {
        t.get::<uom::si::time::hour>()
    }
}

pub mod constants {
    /// Seconds per hour; durations are written in hours, knobs arrive in seconds.
    pub const SECONDS_PER_HOUR: f64 = 3600.0;

    /// Nominal voltage used to turn an ampere knob into a power setpoint.
    pub const NOMINAL_POWER_VOLTAGE_V: f64 = 3.7;
}

#[cfg(test)]
mod tests {
    use super::value::*;
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _v = volts(4.2);
        let _i = amps(5.0);
        let _r = ohms(0.2);
        let _p = watts(18.5);
        let _q = amp_hours(5.0);
        let _t = k(298.15);
        let _dt = s(10.0);
    }

    #[test]
    fn hours_from_seconds() {
        assert!((in_hours(s(1800.0)) - 0.5).abs() < 1e-12);
        assert!((in_seconds(s(3600.0)) - 3600.0).abs() < 1e-9);
    }

    #[test]
    fn amp_hours_round_trip() {
        assert!((in_amp_hours(amp_hours(5.0)) - 5.0).abs() < 1e-12);
    }
}
