//! PIN-code reference data and address reconciliation.

mod directory;
mod reconcile;

pub use directory::{PincodeDirectory, ReferenceEntry, Region, StaticDirectory};
pub use reconcile::Reconciler;
