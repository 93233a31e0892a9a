//! Atmospheric composition of enclosed regions

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Scalar components of an atmosphere, in fixed order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtmosphereComponent {
    GasX,
    GasY,
    GasZ,
    Temperature,
}

impl AtmosphereComponent {
    pub const ALL: [AtmosphereComponent; 4] = [
        AtmosphereComponent::GasX,
        AtmosphereComponent::GasY,
        AtmosphereComponent::GasZ,
        AtmosphereComponent::Temperature,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AtmosphereComponent::GasX => "gas_x",
            AtmosphereComponent::GasY => "gas_y",
            AtmosphereComponent::GasZ => "gas_z",
            AtmosphereComponent::Temperature => "temperature",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "gas_x" => Some(AtmosphereComponent::GasX),
            "gas_y" => Some(AtmosphereComponent::GasY),
            "gas_z" => Some(AtmosphereComponent::GasZ),
            "temperature" => Some(AtmosphereComponent::Temperature),
            _ => None,
        }
    }
}

/// Atmospheric composition of one enclosed region
///
/// Gas components are fractions; temperature is in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AtmosphericComposition {
    pub gas_x: f32,
    pub gas_y: f32,
    pub gas_z: f32,
    pub temperature: f32,
}

impl AtmosphericComposition {
    pub fn new(gas_x: f32, gas_y: f32, gas_z: f32, temperature: f32) -> Self {
        Self { gas_x, gas_y, gas_z, temperature }
    }

    /// Random composition for a freshly sealed region on the first flood fill
    pub fn generate<R: Rng>(rng: &mut R, temperature_max: f32) -> Self {
        Self {
            gas_x: rng.gen::<f32>(),
            gas_y: rng.gen::<f32>(),
            gas_z: rng.gen::<f32>(),
            temperature: rng.gen::<f32>() * temperature_max,
        }
    }

    /// Elementwise average of two compositions
    ///
    /// This is the merge rule for joined regions. It is deliberately lossy
    /// (not area-weighted) and non-associative when folded over three or
    /// more regions.
    pub fn mix(&self, other: &AtmosphericComposition) -> Self {
        Self {
            gas_x: (self.gas_x + other.gas_x) / 2.0,
            gas_y: (self.gas_y + other.gas_y) / 2.0,
            gas_z: (self.gas_z + other.gas_z) / 2.0,
            temperature: (self.temperature + other.temperature) / 2.0,
        }
    }

    pub fn component(&self, component: AtmosphereComponent) -> f32 {
        match component {
            AtmosphereComponent::GasX => self.gas_x,
            AtmosphereComponent::GasY => self.gas_y,
            AtmosphereComponent::GasZ => self.gas_z,
            AtmosphereComponent::Temperature => self.temperature,
        }
    }
}

impl std::fmt::Display for AtmosphericComposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "gas_x = {:.2} gas_y = {:.2} gas_z = {:.2} temp = {:.1}",
            self.gas_x, self.gas_y, self.gas_z, self.temperature
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_is_elementwise_average() {
        let a = AtmosphericComposition::new(0.2, 0.4, 0.6, 20.0);
        let b = AtmosphericComposition::new(0.4, 0.0, 0.6, 40.0);
        let mixed = a.mix(&b);
        assert_eq!(mixed, AtmosphericComposition::new(0.3, 0.2, 0.6, 30.0));
    }

    #[test]
    fn test_mix_is_order_independent_for_two() {
        let a = AtmosphericComposition::new(0.1, 0.2, 0.3, 10.0);
        let b = AtmosphericComposition::new(0.9, 0.8, 0.7, 90.0);
        assert_eq!(a.mix(&b), b.mix(&a));
    }

    #[test]
    fn test_pairwise_fold_is_order_dependent_for_three() {
        // The successive pairwise average weights later operands more.
        let a = AtmosphericComposition::new(1.0, 0.0, 0.0, 0.0);
        let b = AtmosphericComposition::new(0.0, 0.0, 0.0, 0.0);
        let c = AtmosphericComposition::new(0.0, 0.0, 0.0, 100.0);
        let abc = a.mix(&b).mix(&c);
        let cba = c.mix(&b).mix(&a);
        assert_ne!(abc, cba);
    }

    #[test]
    fn test_component_order_matches_enum() {
        let comp = AtmosphericComposition::new(0.1, 0.2, 0.3, 42.0);
        assert_eq!(comp.component(AtmosphereComponent::GasX), 0.1);
        assert_eq!(comp.component(AtmosphereComponent::GasY), 0.2);
        assert_eq!(comp.component(AtmosphereComponent::GasZ), 0.3);
        assert_eq!(comp.component(AtmosphereComponent::Temperature), 42.0);
    }

    #[test]
    fn test_generate_stays_in_range() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let comp = AtmosphericComposition::generate(&mut rng, 100.0);
            assert!((0.0..=1.0).contains(&comp.gas_x));
            assert!((0.0..=1.0).contains(&comp.gas_y));
            assert!((0.0..=1.0).contains(&comp.gas_z));
            assert!((0.0..=100.0).contains(&comp.temperature));
        }
    }
}
