use serde::{Deserialize, Serialize};

/// One vehicle service entry
///
/// The same plate may appear on several rows: each row is a visit, which is
/// what the plate history lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(rename = "Idauto")]
    pub id: u64,
    #[serde(rename = "Patente")]
    pub plate: String,
    #[serde(rename = "Marca")]
    pub make: String,
    #[serde(rename = "Modelo")]
    pub model: String,
    #[serde(rename = "Kilometraje")]
    pub mileage: String,
    #[serde(rename = "TipoAceite")]
    pub oil_type: String,
    #[serde(rename = "Fecha")]
    pub date: String,
}

/// Vehicle to create; `id` is assigned when absent
#[derive(Debug, Clone, Default)]
pub struct NewVehicle {
    pub id: Option<u64>,
    pub plate: String,
    pub make: String,
    pub model: String,
    pub mileage: String,
    pub oil_type: String,
    pub date: String,
}

impl NewVehicle {
    pub fn with_id(self, id: u64) -> Vehicle {
        Vehicle {
            id,
            plate: self.plate,
            make: self.make,
            model: self.model,
            mileage: self.mileage,
            oil_type: self.oil_type,
            date: self.date,
        }
    }
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct VehicleChanges {
    pub plate: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub mileage: Option<String>,
    pub oil_type: Option<String>,
    pub date: Option<String>,
}

impl VehicleChanges {
    pub fn apply(&self, vehicle: &mut Vehicle) {
        let fields = [
            (&self.plate, &mut vehicle.plate),
            (&self.make, &mut vehicle.make),
            (&self.model, &mut vehicle.model),
            (&self.mileage, &mut vehicle.mileage),
            (&self.oil_type, &mut vehicle.oil_type),
            (&self.date, &mut vehicle.date),
        ];
        for (new, old) in fields {
            if let Some(value) = new {
                *old = value.trim().to_string();
            }
        }
    }
}

/// Plates are compared without case or surrounding space
pub fn normalize_plate(plate: &str) -> String {
    plate.trim().to_uppercase()
}
