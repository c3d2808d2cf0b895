//! Repository trait definitions for data persistence

use chrono::{DateTime, Utc};

use crate::model::{
    Client, ClientChanges, ClientRecord, FilterApplication, Message, MessageDraft, NewVehicle, PriceItem, User,
    Vehicle, VehicleChanges,
};
use crate::model::vehicle::normalize_plate;
use taller_types::Error;

/// Repository for user accounts
pub trait UserRepository: Send + Sync {
    /// Load all users in file order
    fn find_all(&self) -> Result<Vec<User>, Error>;

    /// Find a user by exact username
    fn find_by_username(&self, username: &str) -> Result<Option<User>, Error> {
        Ok(self.find_all()?.into_iter().find(|u| u.username == username))
    }

    /// Add a user; a taken username is a conflict
    fn insert(&self, user: &User) -> Result<(), Error>;

    /// Replace the stored row of `user.username`; false when missing
    fn update(&self, user: &User) -> Result<bool, Error>;

    /// Remove a user; false when missing
    fn remove(&self, username: &str) -> Result<bool, Error>;

    /// Edit every user in one rewrite, returning how many `edit` changed
    fn update_each(&self, edit: &mut dyn FnMut(&mut User) -> bool) -> Result<usize, Error>;
}

/// Repository for clients (identified by position)
pub trait ClientRepository: Send + Sync {
    fn find_all(&self) -> Result<Vec<ClientRecord>, Error>;

    /// Case-insensitive substring match on the name
    fn find_by_name(&self, fragment: &str) -> Result<Vec<ClientRecord>, Error> {
        let needle = fragment.trim().to_lowercase();
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|r| r.client.name.to_lowercase().contains(&needle))
            .collect())
    }

    /// Exact match on the email
    fn find_by_email(&self, email: &str) -> Result<Vec<ClientRecord>, Error> {
        let email = email.trim();
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|r| r.client.email == email)
            .collect())
    }

    /// Append a client and return its id
    fn insert(&self, client: &Client) -> Result<usize, Error>;

    /// Apply changes to the client at `id`; None when out of range
    fn update(&self, id: usize, changes: &ClientChanges) -> Result<Option<ClientRecord>, Error>;

    /// Remove the client at `id`; None when out of range
    fn remove(&self, id: usize) -> Result<Option<Client>, Error>;
}

/// Repository for vehicle service entries
pub trait VehicleRepository: Send + Sync {
    fn find_all(&self) -> Result<Vec<Vehicle>, Error>;

    /// Case-insensitive substring match on the plate
    fn search_by_plate(&self, fragment: &str) -> Result<Vec<Vehicle>, Error> {
        let needle = normalize_plate(fragment);
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|v| normalize_plate(&v.plate).contains(&needle))
            .collect())
    }

    /// Every entry recorded for one plate
    fn history(&self, plate: &str) -> Result<Vec<Vehicle>, Error> {
        let plate = normalize_plate(plate);
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|v| normalize_plate(&v.plate) == plate)
            .collect())
    }

    /// Next free id (max + 1)
    fn next_id(&self) -> Result<u64, Error>;

    /// Append a vehicle and return its id
    fn insert(&self, vehicle: NewVehicle) -> Result<u64, Error>;

    /// Apply changes to the first entry with `id`
    fn update(&self, id: u64, changes: &VehicleChanges) -> Result<Option<Vehicle>, Error>;

    /// Remove every entry with `id`, returning how many were removed
    fn remove(&self, id: u64) -> Result<usize, Error>;
}

/// Repository for internal messages
pub trait MessageRepository: Send + Sync {
    fn find_all(&self) -> Result<Vec<Message>, Error>;

    /// Store a draft with the next id
    fn insert(&self, draft: MessageDraft, sent_at: DateTime<Utc>) -> Result<Message, Error>;

    /// Edit one message in place
    ///
    /// `edit` returns whether the row is kept; dropping it removes the line.
    /// None when no message has `id`.
    fn update(
        &self,
        id: u64,
        edit: &mut dyn FnMut(&mut Message) -> Result<bool, Error>,
    ) -> Result<Option<Message>, Error>;
}

/// Read-only access to the price list
pub trait PriceListRepository: Send + Sync {
    fn find_all(&self) -> Result<Vec<PriceItem>, Error>;

    /// Code lookup ignoring case and surrounding spaces
    fn find_by_code(&self, code: &str) -> Result<Option<PriceItem>, Error> {
        let code = code.trim();
        Ok(self
            .find_all()?
            .into_iter()
            .find(|item| item.code.eq_ignore_ascii_case(code)))
    }

    fn find_by_category(&self, category: &str) -> Result<Vec<PriceItem>, Error> {
        let category = category.trim();
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|item| item.category.trim().eq_ignore_ascii_case(category))
            .collect())
    }
}

/// Read-only access to the vehicle to filter catalog
pub trait FilterCatalogRepository: Send + Sync {
    fn find_all(&self) -> Result<Vec<FilterApplication>, Error>;

    /// Rows of one vehicle, matched ignoring case and surrounding spaces
    fn find_for_vehicle(
        &self,
        make: &str,
        model: &str,
        engine: &str,
    ) -> Result<Vec<FilterApplication>, Error> {
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|row| row.is_vehicle(make, model, engine))
            .collect())
    }
}
