//! Annual carbon footprint estimate from a handful of lifestyle inputs.
//! All figures are tonnes CO2e per year unless noted.

use serde::{Deserialize, Serialize};

/// World average annual footprint, tonnes CO2e.
pub const GLOBAL_AVERAGE_TONNES: f64 = 4.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Diet {
    HeavyMeat,
    MediumMeat,
    LightMeat,
    Vegetarian,
    Vegan,
}

impl Diet {
    fn annual_tonnes(&self) -> f64 {
        match self {
            Diet::HeavyMeat => 3.3,
            Diet::MediumMeat => 2.5,
            Diet::LightMeat => 1.9,
            Diet::Vegetarian => 1.4,
            Diet::Vegan => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shopping {
    High,
    Medium,
    Low,
}

impl Shopping {
    fn annual_tonnes(&self) -> f64 {
        match self {
            Shopping::High => 1.8,
            Shopping::Medium => 1.0,
            Shopping::Low => 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonInputs {
    pub car_km_per_day: f64,
    pub flights_per_year: f64,
    pub transit_km_per_day: f64,
    pub diet: Diet,
    pub electricity_kwh_per_month: f64,
    pub gas_heating: bool,
    pub shopping: Shopping,
    pub recycling: bool,
}

impl CarbonInputs {
    /// All numeric inputs must be finite and non-negative.
    pub fn is_valid(&self) -> bool {
        [
            self.car_km_per_day,
            self.flights_per_year,
            self.transit_km_per_day,
            self.electricity_kwh_per_month,
        ]
        .iter()
        .all(|value| value.is_finite() && *value >= 0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonEstimate {
    pub transport: f64,
    pub diet: f64,
    pub energy: f64,
    pub lifestyle: f64,
    pub total: f64,
    pub global_average: f64,
    pub tips: Vec<String>,
}

/// Weighted-sum estimate: car ~0.21 kg/km, flights ~0.255 t per round trip,
/// transit ~0.089 kg/km, electricity ~0.5 kg/kWh, gas heating ~2.0 t/year.
pub fn estimate(inputs: &CarbonInputs) -> CarbonEstimate {
    let car = inputs.car_km_per_day * 365.0 * 0.21 / 1000.0;
    let flights = inputs.flights_per_year * 0.255;
    let transit = inputs.transit_km_per_day * 365.0 * 0.089 / 1000.0;
    let transport = car + flights + transit;

    let diet = inputs.diet.annual_tonnes();

    let electricity = inputs.electricity_kwh_per_month * 12.0 * 0.5 / 1000.0;
    let heating = if inputs.gas_heating { 2.0 } else { 0.5 };
    let energy = electricity + heating;

    let recycling_reduction = if inputs.recycling { -0.3 } else { 0.0 };
    let lifestyle = (inputs.shopping.annual_tonnes() + recycling_reduction).max(0.0);

    let total = transport + diet + energy + lifestyle;

    let transport = round2(transport);
    let energy = round2(energy);
    let tips = reduction_tips(inputs, transport, energy);

    CarbonEstimate {
        transport,
        diet: round2(diet),
        energy,
        lifestyle: round2(lifestyle),
        total: round2(total),
        global_average: GLOBAL_AVERAGE_TONNES,
        tips,
    }
}

fn reduction_tips(inputs: &CarbonInputs, transport: f64, energy: f64) -> Vec<String> {
    let mut tips = Vec::new();
    if transport > 3.0 {
        tips.push(
            "Consider carpooling or switching to an electric vehicle to cut transport emissions."
                .to_string(),
        );
    }
    if inputs.flights_per_year > 3.0 {
        tips.push("Reducing flights by even one per year saves ~0.25 tonnes of CO2.".to_string());
    }
    if inputs.diet == Diet::HeavyMeat {
        tips.push("Shifting to a lighter meat diet can save over 1 tonne of CO2 annually.".to_string());
    }
    if energy > 3.0 {
        tips.push(
            "Switch to renewable energy providers or install solar panels to reduce energy emissions."
                .to_string(),
        );
    }
    if !inputs.recycling {
        tips.push("Recycling can reduce your carbon footprint by up to 0.3 tonnes per year.".to_string());
    }
    if inputs.shopping == Shopping::High {
        tips.push("Buying less fast fashion and choosing durable goods reduces lifestyle emissions.".to_string());
    }
    if tips.is_empty() {
        tips.push("Great job! Your footprint is relatively low. Keep up the sustainable practices!".to_string());
    }
    tips
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
