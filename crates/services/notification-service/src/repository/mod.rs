//! Repository layer for data access.

mod data_store;
mod device_repository;
pub mod entities;

pub use data_store::{DataStore, PgDataStore};
pub use device_repository::{DeviceRepository, DeviceStore};

#[cfg(any(test, feature = "test-utils"))]
pub use data_store::MockDataStore;
#[cfg(any(test, feature = "test-utils"))]
pub use device_repository::MockDeviceRepository;
