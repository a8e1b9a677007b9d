//! Reference datasets loaded once at startup: the QCT list and DDA boundaries.

mod crs;
mod dda;
mod qct;
mod shape;

use std::io;
use std::path::Path;

use tracing::info;

pub use crs::{epsg_from_crs_name, epsg_from_wkt, to_wgs84};
pub use dda::load_dda_zones;
pub use qct::{load_qct_set, read_qct_set, QctSet};
pub use shape::{rings_to_polygons, shape_to_multipolygon};

use crate::config::DataConfig;
use crate::error::ReferenceError;
use crate::pip::DdaZones;

/// Immutable reference data shared by every address in a run
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub qct: QctSet,
    pub dda: DdaZones,
}

impl ReferenceData {
    pub fn new(qct: QctSet, dda: DdaZones) -> Self {
        Self { qct, dda }
    }

    /// Load both datasets; any failure is fatal for the run
    pub fn load(config: &DataConfig) -> Result<Self, ReferenceError> {
        let qct = load_qct_set(&config.qct_file)?;
        let dda = load_dda_zones(&config.dda_file, config.dda_epsg)?;

        info!(
            "Reference data ready: {} QCT codes, {} DDA zones",
            qct.len(),
            dda.len()
        );

        Ok(Self { qct, dda })
    }
}

fn open_error(path: &Path, source: io::Error) -> ReferenceError {
    if source.kind() == io::ErrorKind::NotFound {
        ReferenceError::Missing {
            path: path.to_path_buf(),
        }
    } else {
        ReferenceError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
