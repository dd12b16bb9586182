use serde::{Deserialize, Serialize};

/// The fixed set of class labels the network is trained against. Order
/// matters: the classifier output index selects into this array.
pub const LABELS: [&str; 10] = [
    "Tomato_Bacterial_Spot",
    "Tomato_Early_Blight",
    "Tomato_Leaf_Mold",
    "Tomato_Septoria_Spot",
    "Tomato_Yellow_Leaf_Curl",
    "Tomato_Healthy",
    "Potato_Early_Blight",
    "Potato_Late_Blight",
    "Potato_Healthy",
    "Corn_Common_Rust",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Static descriptive metadata attached to a label.
#[derive(Debug, Clone, Copy)]
pub struct DiseaseInfo {
    pub definition: &'static str,
    pub color: &'static str,
    pub health_status: HealthStatus,
}

impl DiseaseInfo {
    pub fn is_healthy(&self) -> bool {
        self.health_status == HealthStatus::Healthy
    }
}

pub fn disease_info(label: &str) -> DiseaseInfo {
    use HealthStatus::{Healthy, Unhealthy};
    let (definition, color, health_status) = match label {
        "Tomato_Bacterial_Spot" => ("Bacterial spots on leaves and fruits.", "red", Unhealthy),
        "Tomato_Early_Blight" => ("Fungal dark spots on older leaves.", "brown", Unhealthy),
        "Tomato_Leaf_Mold" => ("Yellow spots with mold under leaves.", "orange", Unhealthy),
        "Tomato_Septoria_Spot" => ("Gray-centered circular spots.", "gray", Unhealthy),
        "Tomato_Yellow_Leaf_Curl" => ("Curling and yellowing of leaves.", "yellow", Unhealthy),
        "Tomato_Healthy" => ("Healthy tomato leaf.", "green", Healthy),
        "Potato_Early_Blight" => ("Brown spots with rings on leaves.", "brown", Unhealthy),
        "Potato_Late_Blight" => ("Rapid lesions on leaves and stems.", "darkred", Unhealthy),
        "Potato_Healthy" => ("Healthy potato foliage.", "green", Healthy),
        "Corn_Common_Rust" => ("Red-brown pustules on corn leaves.", "red", Unhealthy),
        _ => ("Unknown disease.", "gray", Unhealthy),
    };
    DiseaseInfo {
        definition,
        color,
        health_status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_label_has_metadata() {
        for label in LABELS {
            let info = disease_info(label);
            assert_ne!(info.definition, "Unknown disease.", "missing entry: {label}");
            assert!(!info.color.is_empty());
        }
    }

    #[test]
    fn health_status_matches_label_suffix() {
        for label in LABELS {
            let info = disease_info(label);
            assert_eq!(label.ends_with("_Healthy"), info.is_healthy(), "{label}");
        }
    }

    #[test]
    fn unknown_label_falls_back() {
        let info = disease_info("Wheat_Rust");
        assert_eq!(info.definition, "Unknown disease.");
        assert_eq!(info.color, "gray");
    }
}
