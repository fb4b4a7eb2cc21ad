//! Indoor floor plans: configuration and coordinate mapping.
//!
//! - [`mapper`] - Conversion between geographic points and floor-local coordinates
//! - [`catalog`] - Building/floor configuration loading, lookup and floor selection
//!
//! # Example
//!
//! ```
//! use campusnav_lib::indoor::IndoorCatalog;
//! use campusnav_lib::Point;
//!
//! let catalog = IndoorCatalog::builtin().unwrap();
//! let hall = catalog.get("H").unwrap();
//! let floor = hall.select_floor(8).unwrap();
//! let local = floor.to_local(Point::new(45.4972, -73.5789)).unwrap();
//! assert!(local.x > 0.0 && local.y > 0.0);
//! ```

pub mod catalog;
pub mod mapper;

pub use catalog::{
    default_indoor_config_path, load_indoor_catalog, resolve_indoor_config_path, ArtworkKind,
    BuildingIndoorConfig, FloorArtwork, FloorDescriptor, IndoorCatalog, INDOOR_CONFIG_ENV,
};
pub use mapper::{geo_to_local, local_to_geo, projected_height, Bounds, LocalExtent, LocalPoint};
