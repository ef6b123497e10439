//! Typed requests issued by the viewer.

use flows::{CovariateRow, MIGRATION_FIELDS, MigrationRecord};
use foundation::ZoneId;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::QueryError;
use crate::filter::{FeatureQuery, Filter, OutFields};
use crate::service::FeatureService;

/// Zone-id column shared by the flow and covariate tables.
pub const ZONE_FIELD: &str = "cz";
/// Zone-id attribute carried by region polygons.
pub const REGION_ID_FIELD: &str = "cz_id";

/// All flows touching `zone`, attributes only.
pub fn migration_query(zone: ZoneId) -> FeatureQuery {
    FeatureQuery::new(Filter::equals(ZONE_FIELD, zone))
        .with_out_fields(OutFields::only(MIGRATION_FIELDS))
        .with_geometry(false)
}

/// Covariate rows of both ends of a flow.
pub fn covariate_query(origin: ZoneId, destination: ZoneId) -> FeatureQuery {
    FeatureQuery::new(Filter::is_in(ZONE_FIELD, [origin, destination]))
        .with_out_fields(OutFields::All)
        .with_geometry(false)
}

/// Full attribute row of one polygon, by object id.
pub fn region_lookup_query(object_id: i64) -> FeatureQuery {
    FeatureQuery::by_object_ids([object_id])
        .with_out_fields(OutFields::All)
        .with_geometry(false)
}

pub async fn fetch_migration_records(
    service: &dyn FeatureService,
    zone: ZoneId,
) -> Result<Vec<MigrationRecord>, QueryError> {
    let set = service.query(&migration_query(zone)).await?;
    let records = set.decode(MigrationRecord::from_attributes);
    debug!(%zone, records = records.len(), "loaded migration records");
    Ok(records)
}

pub async fn fetch_covariates(
    service: &dyn FeatureService,
    origin: ZoneId,
    destination: ZoneId,
) -> Result<Vec<CovariateRow>, QueryError> {
    let set = service
        .query(&covariate_query(origin, destination))
        .await?;
    Ok(set.decode(CovariateRow::from_attributes))
}

/// Reads the zone id of a region from an attribute value.
pub fn zone_id_from_value(value: &Value) -> Option<ZoneId> {
    serde_json::from_value::<ZoneId>(value.clone()).ok()
}

/// Looks up a polygon's zone id by object id.
///
/// `Ok(None)` means the row was found without a usable id, or not found.
pub async fn lookup_region_id(
    service: &dyn FeatureService,
    object_id: i64,
) -> Result<Option<ZoneId>, QueryError> {
    let set = service.query(&region_lookup_query(object_id)).await?;
    let Some(feature) = set.features.first() else {
        warn!(object_id, service = service.name(), "region lookup matched no feature");
        return Ok(None);
    };
    Ok(feature.get(REGION_ID_FIELD).and_then(zone_id_from_value))
}
