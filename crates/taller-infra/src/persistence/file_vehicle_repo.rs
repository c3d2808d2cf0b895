//! Vehicles table (`vehiculos.csv`)

use std::path::PathBuf;

use tracing::debug;

use taller_domain::model::{NewVehicle, Vehicle, VehicleChanges};
use taller_domain::repository::VehicleRepository;
use taller_store::{Edit, Row, SchemaStatus, Table};
use taller_types::Error;

use crate::tables::VEHICLES;

pub struct FileVehicleRepository {
    table: Table,
}

impl FileVehicleRepository {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            table: Table::new(path, &VEHICLES),
        }
    }

    pub fn ensure_schema(&self) -> Result<SchemaStatus, Error> {
        Ok(self.table.ensure_schema()?)
    }
}

fn row_id(row: &Row) -> Option<u64> {
    row.get(0).parse().ok()
}

fn from_row(row: &Row) -> Option<Vehicle> {
    let id = row_id(row)?;
    Some(Vehicle {
        id,
        plate: row.get(1).to_string(),
        make: row.get(2).to_string(),
        model: row.get(3).to_string(),
        mileage: row.get(4).to_string(),
        oil_type: row.get(5).to_string(),
        date: row.get(6).to_string(),
    })
}

fn to_fields(vehicle: &Vehicle) -> Vec<String> {
    vec![
        vehicle.id.to_string(),
        vehicle.plate.clone(),
        vehicle.make.clone(),
        vehicle.model.clone(),
        vehicle.mileage.clone(),
        vehicle.oil_type.clone(),
        vehicle.date.clone(),
    ]
}

fn next_id_of(rows: &[Row]) -> u64 {
    rows.iter().filter_map(row_id).max().map_or(1, |max| max + 1)
}

impl VehicleRepository for FileVehicleRepository {
    fn find_all(&self) -> Result<Vec<Vehicle>, Error> {
        let rows = self.table.load()?;
        let vehicles: Vec<Vehicle> = rows.iter().filter_map(from_row).collect();
        if vehicles.len() < rows.len() {
            debug!(skipped = rows.len() - vehicles.len(), "vehicle rows without numeric Idauto");
        }
        Ok(vehicles)
    }

    fn next_id(&self) -> Result<u64, Error> {
        Ok(next_id_of(&self.table.load()?))
    }

    fn insert(&self, vehicle: NewVehicle) -> Result<u64, Error> {
        let mut assigned = 0;
        self.table.append_with(|rows| {
            assigned = match vehicle.id {
                Some(id) if id > 0 => id,
                _ => next_id_of(rows),
            };
            Ok::<_, Error>(to_fields(&vehicle.with_id(assigned)))
        })?;
        Ok(assigned)
    }

    fn update(&self, id: u64, changes: &VehicleChanges) -> Result<Option<Vehicle>, Error> {
        self.table.modify(|rows| {
            for row in rows.iter_mut() {
                let Some(mut vehicle) = from_row(row).filter(|v| v.id == id) else {
                    continue;
                };
                changes.apply(&mut vehicle);
                *row = Row::new(to_fields(&vehicle));
                return Ok::<_, Error>(Edit::Changed(Some(vehicle)));
            }
            Ok(Edit::Unchanged(None))
        })
    }

    fn remove(&self, id: u64) -> Result<usize, Error> {
        self.table.modify(|rows| {
            let before = rows.len();
            rows.retain(|row| row_id(row) != Some(id));
            let removed = before - rows.len();
            Ok::<_, Error>(if removed > 0 {
                Edit::Changed(removed)
            } else {
                Edit::Unchanged(0)
            })
        })
    }
}
