//! Turbine desuperheater enthalpy balance.
//!
//! Same balance as the attemperator but with separate inlet and outlet
//! headers, and every raw reading is read NaN-as-zero. The measured set-point
//! enthalpy is optional; without it the set point is derived from the set
//! temperature.

use crate::engine::{EngineOutput, FeatureEngine, FieldSpec, FormulaStage, SampleTimeStage, Stage};
use crate::error::EnrichResult;
use crate::fields::*;
use crate::formulas;
use sf_core::units::labels;
use sf_core::Derived;
use sf_records::{keys, Record, RowAccessor};
use sf_steam::{PropertyResolver, SteamModel};
use tracing::debug;

const REQUIRED_HEADERS: [&str; 8] = [
    keys::STEAM_INLET_PRESSURE,
    keys::STEAM_OUTLET_PRESSURE,
    keys::STEAM_INLET_TEMP,
    keys::STEAM_OUTLET_TEMP,
    keys::WATER_INLET_PRESSURE,
    keys::WATER_INLET_TEMP,
    keys::WATER_MASS_FLOW,
    keys::INLET_STEAM_MASS_FLOW,
];

pub struct DesuperheaterPipeline<'a, M: SteamModel> {
    resolver: &'a PropertyResolver<M>,
    accessor: RowAccessor<'a>,
}

impl<'a, M: SteamModel + 'a> DesuperheaterPipeline<'a, M> {
    pub fn new(resolver: &'a PropertyResolver<M>, accessor: RowAccessor<'a>) -> EnrichResult<Self> {
        accessor.headers().require(&REQUIRED_HEADERS)?;
        Ok(Self { resolver, accessor })
    }

    pub fn engine(&self) -> FeatureEngine<'a> {
        let stages: Vec<Box<dyn Stage + 'a>> = vec![
            Box::new(SampleTimeStage),
            Box::new(self.saturation()),
            Box::new(self.steam_enthalpies()),
            Box::new(self.set_point()),
            Box::new(self.water()),
            Box::new(ratio_and_superheat(self.accessor)),
            Box::new(heat_balance(self.accessor)),
        ];
        FeatureEngine::new().pass(stages)
    }

    pub fn run(&self, records: &mut [Record]) -> EnrichResult<EngineOutput> {
        let out = self.engine().run(records)?;
        debug!(
            rows = records.len(),
            property_failures = self.resolver.failure_count(),
            "desuperheater balance complete"
        );
        Ok(out)
    }

    fn saturation(&self) -> FormulaStage<'a> {
        let (resolver, acc) = (self.resolver, self.accessor);
        FormulaStage::new(
            "saturation",
            &[
                FieldSpec::new(T_SAT_INLET, labels::DEG_F),
                FieldSpec::new(T_SAT_OUTLET, labels::DEG_F),
            ],
            move |rec, _, _| {
                let p_in = acc.absolute_or_zero(rec, keys::STEAM_INLET_PRESSURE)?;
                let p_out = acc.absolute_or_zero(rec, keys::STEAM_OUTLET_PRESSURE)?;
                rec.set(T_SAT_INLET, resolver.saturation_temperature(p_in));
                rec.set(T_SAT_OUTLET, resolver.saturation_temperature(p_out));
                Ok(())
            },
        )
    }

    fn steam_enthalpies(&self) -> FormulaStage<'a> {
        let (resolver, acc) = (self.resolver, self.accessor);
        FormulaStage::new(
            "steam_enthalpy",
            &[
                FieldSpec::new(STEAM_INLET_ENTHALPY, labels::BTU_PER_LB),
                FieldSpec::new(STEAM_OUTLET_ENTHALPY, labels::BTU_PER_LB),
            ],
            move |rec, _, _| {
                let p_in = acc.absolute_or_zero(rec, keys::STEAM_INLET_PRESSURE)?;
                let t_in = acc.value_or_zero(rec, keys::STEAM_INLET_TEMP)?;
                let h_in = resolver.steam_enthalpy(p_in, t_in, rec.get(T_SAT_INLET));

                let p_out = acc.absolute_or_zero(rec, keys::STEAM_OUTLET_PRESSURE)?;
                let t_out = acc.value_or_zero(rec, keys::STEAM_OUTLET_TEMP)?;
                let h_out = resolver.steam_enthalpy(p_out, t_out, rec.get(T_SAT_OUTLET));

                rec.set(STEAM_INLET_ENTHALPY, h_in);
                rec.set(STEAM_OUTLET_ENTHALPY, h_out);
                Ok(())
            },
        )
    }

    fn set_point(&self) -> FormulaStage<'a> {
        let (resolver, acc) = (self.resolver, self.accessor);
        FormulaStage::new(
            "set_point",
            &[FieldSpec::new(DESUP_SET_ENTHALPY_CALC, labels::BTU_PER_LB)],
            move |rec, _, _| {
                let value = set_point_enthalpy(resolver, acc, rec)?;
                rec.set(DESUP_SET_ENTHALPY_CALC, value);
                Ok(())
            },
        )
    }

    fn water(&self) -> FormulaStage<'a> {
        let (resolver, acc) = (self.resolver, self.accessor);
        FormulaStage::new(
            "water",
            &[
                FieldSpec::new(WATER_INLET_ENTHALPY, labels::BTU_PER_LB),
                FieldSpec::new(WATER_VAPOR_PRESSURE, labels::PSI_G),
            ],
            move |rec, _, _| {
                let p = acc.absolute_or_zero(rec, keys::WATER_INLET_PRESSURE)?;
                let t = acc.value_or_zero(rec, keys::WATER_INLET_TEMP)?;
                rec.set(WATER_INLET_ENTHALPY, resolver.enthalpy(p, t));
                let psat = resolver.saturation_pressure(t);
                rec.set(
                    WATER_VAPOR_PRESSURE,
                    formulas::gauge_vapor_pressure(psat, acc.barometric(rec)),
                );
                Ok(())
            },
        )
    }
}

/// Measured set-point enthalpy, else enthalpy at outlet pressure and set
/// temperature, else null.
fn set_point_enthalpy<M: SteamModel>(
    resolver: &PropertyResolver<M>,
    acc: RowAccessor<'_>,
    rec: &Record,
) -> EnrichResult<Derived> {
    let raw = |logical: &str| {
        acc.headers()
            .optional(logical)
            .map_or(f64::NAN, |col| rec.raw(col))
    };

    let measured = raw(keys::DESUP_SET_ENTHALPY);
    if !measured.is_nan() {
        return Ok(sf_core::finite_or_none(measured));
    }
    let set_temp = raw(keys::DESUP_SET_TEMP);
    if set_temp.is_nan() {
        return Ok(None);
    }
    let p_out = acc.absolute_or_zero(rec, keys::STEAM_OUTLET_PRESSURE)?;
    Ok(resolver.enthalpy(p_out, set_temp))
}

fn ratio_and_superheat(acc: RowAccessor<'_>) -> FormulaStage<'_> {
    FormulaStage::new(
        "ratio_superheat",
        &[
            FieldSpec::new(WATER_STEAM_RATIO, labels::PERCENT),
            FieldSpec::new(OUTLET_STEAM_SUPERHEAT, labels::DEG_F),
        ],
        move |rec, _, _| {
            let water = acc.value_or_zero(rec, keys::WATER_MASS_FLOW)?;
            let steam = acc.value_or_zero(rec, keys::INLET_STEAM_MASS_FLOW)?;
            let t_out = acc.value_or_zero(rec, keys::STEAM_OUTLET_TEMP)?;
            rec.set(WATER_STEAM_RATIO, formulas::water_steam_ratio(water, steam));
            let tsat = rec.get(T_SAT_OUTLET);
            rec.set(OUTLET_STEAM_SUPERHEAT, formulas::superheat(t_out, tsat));
            Ok(())
        },
    )
}

fn heat_balance(acc: RowAccessor<'_>) -> FormulaStage<'_> {
    FormulaStage::new(
        "heat_balance",
        &[
            FieldSpec::new(HB_WATER_FLOW, labels::KPPH),
            FieldSpec::new(EXCESS_WATER, labels::KPPH),
            FieldSpec::new(EXCESS_WATER_PER, labels::PERCENT),
        ],
        move |rec, _, _| {
            let water = acc.value_or_zero(rec, keys::WATER_MASS_FLOW)?;
            let steam = acc.value_or_zero(rec, keys::INLET_STEAM_MASS_FLOW)?;
            let hb = formulas::heat_balance_water_flow(
                steam,
                rec.get(STEAM_INLET_ENTHALPY),
                rec.get(STEAM_OUTLET_ENTHALPY),
                rec.get(WATER_INLET_ENTHALPY),
            );
            rec.set(HB_WATER_FLOW, hb);
            rec.set(EXCESS_WATER, formulas::excess_water(water, hb));
            rec.set(EXCESS_WATER_PER, formulas::excess_water_percent(water, hb));
            Ok(())
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{minutes, SteamTable};
    use sf_records::HeaderMapping;

    fn headers(with_set_point: bool) -> HeaderMapping {
        let mut pairs = vec![
            ("time", "Time"),
            ("steam-inlet-pressure", "P_IN"),
            ("steam-outlet-pressure", "P_OUT"),
            ("steam-inlet-temp", "T_IN"),
            ("steam-outlet-temp", "T_OUT"),
            ("water-inlet-pressure", "P_W"),
            ("water-inlet-temp", "T_W"),
            ("water-mass-flow", "F_W"),
            ("inlet-steam-mass-flow", "F_STM"),
        ];
        if with_set_point {
            pairs.push(("desup-set-enthalpy", "H_SET"));
            pairs.push(("desp-set-temp", "T_SET"));
        }
        HeaderMapping::new(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn row(i: i64) -> Record {
        Record::new(minutes(i))
            .with("P_IN", 585.0)
            .with("P_OUT", 185.0)
            .with("T_IN", 800.0)
            .with("T_OUT", 450.0)
            .with("P_W", 785.0)
            .with("T_W", 200.0)
            .with("F_W", 20.0)
            .with("F_STM", 400.0)
    }

    fn run(h: &HeaderMapping, rows: &mut [Record]) {
        let resolver = PropertyResolver::new(SteamTable);
        let acc = RowAccessor::new(h).with_atmospheric(15.0);
        DesuperheaterPipeline::new(&resolver, acc)
            .unwrap()
            .run(rows)
            .unwrap();
    }

    #[test]
    fn inlet_and_outlet_saturation_are_separate() {
        let h = headers(false);
        let mut rows = vec![row(0), row(1)];
        run(&h, &mut rows);
        let r = &rows[0];
        assert_eq!(r.get(T_SAT_INLET), Some(600.0));
        assert_eq!(r.get(T_SAT_OUTLET), Some(200.0));
        assert_eq!(r.get(STEAM_INLET_ENTHALPY), Some(860.0));
        assert_eq!(r.get(STEAM_OUTLET_ENTHALPY), Some(470.0));
        assert_eq!(r.get(OUTLET_STEAM_SUPERHEAT), Some(250.0));
        assert_eq!(r.get(WATER_STEAM_RATIO), Some(5.0));
        // no set-point columns mapped
        assert_eq!(r.get(DESUP_SET_ENTHALPY_CALC), None);
    }

    #[test]
    fn missing_readings_are_read_as_zero() {
        let h = headers(false);
        let mut first = row(0);
        first.set_raw("F_STM", f64::NAN);
        first.set_raw("F_W", f64::NAN);
        let mut rows = vec![first, row(1)];
        run(&h, &mut rows);
        let r = &rows[0];
        assert_eq!(r.get(WATER_STEAM_RATIO), Some(0.0));
        assert_eq!(r.get(HB_WATER_FLOW), Some(0.0));
        assert_eq!(r.get(EXCESS_WATER), Some(0.0));
        assert_eq!(r.get(EXCESS_WATER_PER), Some(0.0));
    }

    #[test]
    fn set_point_prefers_measured_enthalpy() {
        let h = headers(true);
        let mut rows = vec![
            row(0).with("H_SET", 1250.0).with("T_SET", 500.0),
            row(1).with("H_SET", f64::NAN).with("T_SET", 500.0),
            row(2).with("H_SET", f64::NAN).with("T_SET", f64::NAN),
        ];
        run(&h, &mut rows);
        assert_eq!(rows[0].get(DESUP_SET_ENTHALPY_CALC), Some(1250.0));
        // 500 + 200 / 10
        assert_eq!(rows[1].get(DESUP_SET_ENTHALPY_CALC), Some(520.0));
        assert_eq!(rows[2].get(DESUP_SET_ENTHALPY_CALC), None);
    }
}
