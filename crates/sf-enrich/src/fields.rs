//! Derived field names written by the pipelines.

pub use crate::engine::{DATA_SAMPLE_TIME, DATA_SAMPLE_TIME_SECONDS, TIME_DIFF_MINUTES};

// Enthalpy balance
pub const T_SAT_INTERSTAGE: &str = "t_sat_interstage";
pub const T_SAT_INLET: &str = "t_sat_inlet";
pub const T_SAT_OUTLET: &str = "t_sat_outlet";
pub const STEAM_INLET_ENTHALPY: &str = "steam_inlet_enthalpy";
pub const STEAM_OUTLET_ENTHALPY: &str = "steam_outlet_enthalpy";
pub const HRSG_OUTLET_ENTHALPY: &str = "hrsg_outlet_enthalpy";
pub const HRSG_SET_ENTHALPY: &str = "hrsg_set_enthalpy";
pub const DESUP_SET_ENTHALPY_CALC: &str = "desup_set_enthalpy_calc";
pub const WATER_INLET_ENTHALPY: &str = "water_inlet_enthalpy";
pub const WATER_VAPOR_PRESSURE: &str = "water_vapor_pressure";
pub const WATER_STEAM_RATIO: &str = "water_steam_ratio";
pub const OUTLET_STEAM_SUPERHEAT: &str = "outlet_steam_superheat";
pub const HB_WATER_FLOW: &str = "hb_water_flow";
pub const EXCESS_WATER: &str = "excess_water";
pub const EXCESS_WATER_PER: &str = "excess_water_per";

// Valve cycles
pub const ZEROED_DEMAND: &str = "zeroed_demand";
pub const ZEROED_FEEDBACK: &str = "zeroed_feedback";
pub const DEMAND_FEEDBACK_DELTA: &str = "demand_feedback_delta";
pub const ABS_DEMAND_FEEDBACK_DELTA: &str = "abs_demand_feedback_delta";
pub const VALUE_POSITION_CHANGE: &str = "value_position_change";
pub const ABS_VALUE_POSITION_CHANGE: &str = "abs_value_position_change";
pub const VALVE_STROKE_SPEED: &str = "valve_stroke_speed";
pub const SIGN: &str = "sign";
pub const MAGNITUDE: &str = "magnitude";
pub const COUNT: &str = "count";
pub const CYCLE_MAGNITUDE: &str = "cycle_magnitude";
pub const ABS_CYCLE_MAGNITUDE: &str = "abs_cycle_magnitude";
pub const CYCLE_AVG_RATE_CHANGE: &str = "cycle_avg_rate_change";
pub const MAX_RATE_CHANGE: &str = "max_rate_change";
pub const INCH_CYCLE_AVG_RATE_CHANGE: &str = "inch_cycle_avg_rate_change";
pub const INCH_MAX_RATE_CHANGE: &str = "inch_max_rate_change";

// Events
pub const STATUS: &str = "Status";
pub const EVENT_TYPE: &str = "Event-Type";
pub const EVENT_TIMESTAMP: &str = "Event-Timestamp";
pub const STARTUP_TYPE: &str = "Startup-Type";
pub const TIME_BETWEEN_EVENTS: &str = "Time-between-events";

// Temperature overlay
pub const SECONDS: &str = "Seconds";
pub const LABEL: &str = "Label";
