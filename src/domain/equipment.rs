//! User-configured equipment profile.
//!
//! The caller owns and mutates this between engine invocations; the engine
//! works on a sanitized copy so malformed numbers never reach a computation.

use serde::{Deserialize, Serialize};

/// Inverter topology, which determines the DC/AC sizing ratio.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InverterType {
    OffGrid,
    Hybrid,
    GridTie,
}

impl InverterType {
    /// Typical DC/AC oversizing ratio used by the inverter suggestion.
    pub fn dc_ac_ratio(&self) -> f64 {
        match self {
            Self::OffGrid => 1.1,
            Self::Hybrid => 1.25,
            Self::GridTie => 1.2,
        }
    }
}

impl std::fmt::Display for InverterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::OffGrid => "off_grid",
            Self::Hybrid => "hybrid",
            Self::GridTie => "grid_tie",
        };
        write!(f, "{s}")
    }
}

/// DC voltage bus of the system.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VoltageBus {
    #[serde(rename = "12")]
    V12,
    #[serde(rename = "24")]
    V24,
    #[serde(rename = "48")]
    V48,
}

impl VoltageBus {
    pub fn volts(&self) -> f64 {
        match self {
            Self::V12 => 12.0,
            Self::V24 => 24.0,
            Self::V48 => 48.0,
        }
    }
}

/// Panel mounting. Ground mounts additionally harvest rainfall off the panel
/// surface itself.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MountType {
    Roof,
    Ground,
}

/// Energy storage selection with kind-specific parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageSpec {
    None,
    Battery {
        autonomy_days: f64,
        /// Usable depth of discharge, fraction of nameplate capacity.
        usable_dod: f64,
        round_trip_efficiency: f64,
        cost_per_kwh: f64,
    },
    Gravity {
        autonomy_days: f64,
        lift_height_m: f64,
        cost_per_kwh: f64,
    },
    Custom {
        capacity_kwh: f64,
        cost: f64,
    },
}

/// Full equipment profile for one estimation run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EquipmentConfig {
    /// Nameplate wattage of a single panel.
    pub panel_watts: f64,
    /// Physical area of a single panel (m²).
    pub panel_area_m2: f64,
    /// Unit cost of a single panel.
    pub panel_cost: f64,
    /// Real-world footprint multiplier for row spacing and access (≥ 1).
    pub spacing_factor: f64,

    pub inverter_type: InverterType,
    /// Manual inverter size override (kW). When unset the engine applies its
    /// own suggestion.
    pub inverter_size_kw: Option<f64>,
    pub voltage_bus: VoltageBus,
    pub inverter_cost_per_kw: f64,

    /// Balance-of-system cost per installed kW (mounts, wiring, breakers).
    pub bos_cost_per_kw: f64,
    /// Fixed balance-of-system cost regardless of size.
    pub bos_fixed_cost: f64,

    pub storage: StorageSpec,

    /// Value of a generated kWh (currency/kWh).
    pub energy_value_per_kwh: f64,
    /// Solar derate for soiling, wiring and inverter losses, fraction.
    pub loss_factor: f64,

    pub mount: MountType,
}

impl EquipmentConfig {
    /// Copy with all fractions clamped to [0, 1], costs and areas floored at
    /// 0, spacing floored at 1, and non-finite values coerced to 0.
    pub fn sanitized(&self) -> Self {
        let pos = |v: f64| super::finite_or_zero(v).max(0.0);
        let frac = |v: f64| super::finite_or_zero(v).clamp(0.0, 1.0);

        Self {
            panel_watts: pos(self.panel_watts),
            panel_area_m2: pos(self.panel_area_m2),
            panel_cost: pos(self.panel_cost),
            spacing_factor: super::finite_or_zero(self.spacing_factor).max(1.0),
            inverter_type: self.inverter_type,
            inverter_size_kw: self.inverter_size_kw.map(pos),
            voltage_bus: self.voltage_bus,
            inverter_cost_per_kw: pos(self.inverter_cost_per_kw),
            bos_cost_per_kw: pos(self.bos_cost_per_kw),
            bos_fixed_cost: pos(self.bos_fixed_cost),
            storage: match &self.storage {
                StorageSpec::None => StorageSpec::None,
                StorageSpec::Battery {
                    autonomy_days,
                    usable_dod,
                    round_trip_efficiency,
                    cost_per_kwh,
                } => StorageSpec::Battery {
                    autonomy_days: pos(*autonomy_days),
                    usable_dod: frac(*usable_dod),
                    round_trip_efficiency: frac(*round_trip_efficiency),
                    cost_per_kwh: pos(*cost_per_kwh),
                },
                StorageSpec::Gravity {
                    autonomy_days,
                    lift_height_m,
                    cost_per_kwh,
                } => StorageSpec::Gravity {
                    autonomy_days: pos(*autonomy_days),
                    lift_height_m: pos(*lift_height_m),
                    cost_per_kwh: pos(*cost_per_kwh),
                },
                StorageSpec::Custom { capacity_kwh, cost } => StorageSpec::Custom {
                    capacity_kwh: pos(*capacity_kwh),
                    cost: pos(*cost),
                },
            },
            energy_value_per_kwh: pos(self.energy_value_per_kwh),
            loss_factor: frac(self.loss_factor),
            mount: self.mount,
        }
    }
}

impl Default for EquipmentConfig {
    fn default() -> Self {
        Self {
            panel_watts: 400.0,
            panel_area_m2: 1.9,
            panel_cost: 180.0,
            spacing_factor: 1.3,
            inverter_type: InverterType::OffGrid,
            inverter_size_kw: None,
            voltage_bus: VoltageBus::V48,
            inverter_cost_per_kw: 300.0,
            bos_cost_per_kw: 250.0,
            bos_fixed_cost: 500.0,
            storage: StorageSpec::Battery {
                autonomy_days: 2.0,
                usable_dod: 0.8,
                round_trip_efficiency: 0.9,
                cost_per_kwh: 400.0,
            },
            energy_value_per_kwh: 0.25,
            loss_factor: 0.85,
            mount: MountType::Roof,
        }
    }
}
