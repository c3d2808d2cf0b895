//! Vehicle service-entry use cases

use std::sync::Arc;

use tracing::info;

use taller_domain::model::{NewVehicle, Vehicle, VehicleChanges};
use taller_domain::repository::VehicleRepository;
use taller_types::{Error, Result};

use super::auth_service::{AuthService, Credentials};

pub struct VehicleService {
    vehicles: Arc<dyn VehicleRepository>,
    auth: Arc<AuthService>,
}

impl VehicleService {
    pub fn new(vehicles: Arc<dyn VehicleRepository>, auth: Arc<AuthService>) -> Self {
        Self { vehicles, auth }
    }

    pub fn list(&self) -> Result<Vec<Vehicle>> {
        self.vehicles.find_all()
    }

    pub fn search(&self, plate: &str) -> Result<Vec<Vehicle>> {
        if plate.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.vehicles.search_by_plate(plate)
    }

    pub fn history(&self, plate: &str) -> Result<Vec<Vehicle>> {
        if plate.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.vehicles.history(plate)
    }

    pub fn next_id(&self) -> Result<u64> {
        self.vehicles.next_id()
    }

    pub fn create(&self, mut vehicle: NewVehicle) -> Result<u64> {
        for field in [
            &mut vehicle.plate,
            &mut vehicle.make,
            &mut vehicle.model,
            &mut vehicle.mileage,
            &mut vehicle.oil_type,
            &mut vehicle.date,
        ] {
            *field = field.trim().to_string();
        }
        if vehicle.plate.is_empty() || vehicle.make.is_empty() || vehicle.model.is_empty() {
            return Err(Error::validation(
                "Faltan datos obligatorios (patente, marca, modelo)",
            ));
        }
        let plate = vehicle.plate.clone();
        let id = self.vehicles.insert(vehicle)?;
        info!(id, plate = %plate, "vehicle created");
        Ok(id)
    }

    pub fn update(&self, id: u64, changes: &VehicleChanges) -> Result<Vehicle> {
        let updated = self
            .vehicles
            .update(id, changes)?
            .ok_or_else(|| Error::not_found("Vehículo no encontrado"))?;
        info!(id, "vehicle updated");
        Ok(updated)
    }

    /// Admin-gated removal of every entry with `id`
    pub fn delete(&self, id: u64, admin: &Credentials) -> Result<usize> {
        let actor = self.auth.require_admin(admin)?;
        let removed = self.vehicles.remove(id)?;
        if removed == 0 {
            return Err(Error::not_found("Vehículo no encontrado"));
        }
        info!(id, removed, admin = %actor.username, "vehicle deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taller_infra::{FileUserRepository, FileVehicleRepository};
    use taller_types::ErrorKind;

    #[test]
    fn test_create_validates_and_trims() {
        let dir = tempfile::tempdir().unwrap();
        let users = Arc::new(FileUserRepository::open(dir.path().join("usuarios.csv")));
        let auth = Arc::new(AuthService::new(users, None));
        let repo = Arc::new(FileVehicleRepository::open(dir.path().join("vehiculos.csv")));
        let svc = VehicleService::new(repo, auth);

        let err = svc
            .create(NewVehicle {
                plate: "AB123CD".into(),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let id = svc
            .create(NewVehicle {
                plate: " AB123CD ".into(),
                make: "Fiat".into(),
                model: "Palio".into(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(id, 1);
        assert_eq!(svc.history("ab123cd").unwrap()[0].plate, "AB123CD");
        assert!(svc.search("").unwrap().is_empty());

        let err = svc.delete(id, &Credentials::new("x", "y")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(svc.list().unwrap().len(), 1);
    }
}
