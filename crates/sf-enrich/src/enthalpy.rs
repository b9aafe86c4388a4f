//! Boiler attemperator enthalpy balance.
//!
//! Steam leaves the interstage header, is sprayed with feedwater and leaves
//! toward the HRSG outlet. Every pressure reading is gauge and is corrected
//! to absolute before a property lookup.

use crate::engine::{EngineOutput, FeatureEngine, FieldSpec, FormulaStage, SampleTimeStage, Stage};
use crate::error::EnrichResult;
use crate::fields::*;
use crate::formulas;
use sf_core::units::labels;
use sf_records::{keys, Record, RowAccessor};
use sf_steam::{PropertyResolver, SteamModel};
use tracing::debug;

const REQUIRED_HEADERS: [&str; 10] = [
    keys::STEAM_PRESSURE,
    keys::STEAM_INLET_TEMP,
    keys::STEAM_OUTLET_TEMP,
    keys::OUTLET_PRESSURE,
    keys::HRSG_OUTLET_TEMP,
    keys::SET_TEMP,
    keys::WATER_INLET_PRESSURE,
    keys::WATER_INLET_TEMP,
    keys::WATER_MASS_FLOW,
    keys::INLET_STEAM_MASS_FLOW,
];

pub struct AttemperatorPipeline<'a, M: SteamModel> {
    resolver: &'a PropertyResolver<M>,
    accessor: RowAccessor<'a>,
}

impl<'a, M: SteamModel + 'a> AttemperatorPipeline<'a, M> {
    /// Fails when a column the balance reads has no header entry.
    pub fn new(resolver: &'a PropertyResolver<M>, accessor: RowAccessor<'a>) -> EnrichResult<Self> {
        accessor.headers().require(&REQUIRED_HEADERS)?;
        Ok(Self { resolver, accessor })
    }

    pub fn engine(&self) -> FeatureEngine<'a> {
        let stages: Vec<Box<dyn Stage + 'a>> = vec![
            Box::new(SampleTimeStage),
            Box::new(self.saturation()),
            Box::new(self.steam_enthalpies()),
            Box::new(self.hrsg_enthalpies()),
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
            "attemperator balance complete"
        );
        Ok(out)
    }

    fn saturation(&self) -> FormulaStage<'a> {
        let (resolver, acc) = (self.resolver, self.accessor);
        FormulaStage::new(
            "saturation",
            &[FieldSpec::new(T_SAT_INTERSTAGE, labels::DEG_F)],
            move |rec, _, _| {
                let p = acc.value(rec, keys::STEAM_PRESSURE, true)?;
                rec.set(T_SAT_INTERSTAGE, resolver.saturation_temperature(p));
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
                let p = acc.value(rec, keys::STEAM_PRESSURE, true)?;
                let tsat = rec.get(T_SAT_INTERSTAGE);
                let t_in = acc.value(rec, keys::STEAM_INLET_TEMP, false)?;
                let t_out = acc.value(rec, keys::STEAM_OUTLET_TEMP, false)?;
                rec.set(STEAM_INLET_ENTHALPY, resolver.steam_enthalpy(p, t_in, tsat));
                rec.set(STEAM_OUTLET_ENTHALPY, resolver.steam_enthalpy(p, t_out, tsat));
                Ok(())
            },
        )
    }

    fn hrsg_enthalpies(&self) -> FormulaStage<'a> {
        let (resolver, acc) = (self.resolver, self.accessor);
        FormulaStage::new(
            "hrsg_enthalpy",
            &[
                FieldSpec::new(HRSG_OUTLET_ENTHALPY, labels::BTU_PER_LB),
                FieldSpec::new(HRSG_SET_ENTHALPY, labels::BTU_PER_LB),
            ],
            move |rec, _, _| {
                let p = acc.value(rec, keys::OUTLET_PRESSURE, true)?;
                let t_out = acc.value(rec, keys::HRSG_OUTLET_TEMP, false)?;
                let t_set = acc.value(rec, keys::SET_TEMP, false)?;
                rec.set(HRSG_OUTLET_ENTHALPY, resolver.enthalpy(p, t_out));
                rec.set(HRSG_SET_ENTHALPY, resolver.enthalpy(p, t_set));
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
                let p = acc.value(rec, keys::WATER_INLET_PRESSURE, true)?;
                let t = acc.value(rec, keys::WATER_INLET_TEMP, false)?;
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

fn ratio_and_superheat(acc: RowAccessor<'_>) -> FormulaStage<'_> {
    FormulaStage::new(
        "ratio_superheat",
        &[
            FieldSpec::new(WATER_STEAM_RATIO, labels::PERCENT),
            FieldSpec::new(OUTLET_STEAM_SUPERHEAT, labels::DEG_F),
        ],
        move |rec, _, _| {
            let water = acc.value(rec, keys::WATER_MASS_FLOW, false)?;
            let steam = acc.value(rec, keys::INLET_STEAM_MASS_FLOW, false)?;
            let t_out = acc.value(rec, keys::STEAM_OUTLET_TEMP, false)?;
            rec.set(WATER_STEAM_RATIO, formulas::water_steam_ratio(water, steam));
            let tsat = rec.get(T_SAT_INTERSTAGE);
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
            let water = acc.value(rec, keys::WATER_MASS_FLOW, false)?;
            let steam = acc.value(rec, keys::INLET_STEAM_MASS_FLOW, false)?;
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
