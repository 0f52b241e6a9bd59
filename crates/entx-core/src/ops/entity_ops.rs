//! Entity pipelines
//!
//! Each public function wires the pure components to the persistence
//! collaborator and brackets the work with the canonical logging macros:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure

use serde_json::Value;

use super::repository::{EntityRepository, NewDef};
use super::store::MemoryStore;
use crate::conflict::{list_with_conflicts, CreationAuditPolicy, VersionConflict};
use crate::diff::{history_diff, PropertyChange};
use crate::errors::{EntityError, Result};
use crate::extract::{extract_from_instance, extract_from_request, FormField, SubmissionRecord};
use crate::model::{Actor, Def, PropertyMap, LABEL_KEY};
use crate::projection::{project, resolve_selection};
use crate::rules::{canonical_uuid, validate_entity};
use crate::{log_op_end, log_op_error, log_op_start};
use entx_core_types::RequestContext;

fn elapsed_ms(start: std::time::Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// Apply the entity mutation carried by a form submission
///
/// Extraction, then validation, then a create or (with `update` set) an
/// update based on the submitted `baseVersion`. Update data is merged onto
/// the current version.
///
/// # Errors
///
/// Any extraction or validation error, `RequiredParameterMissing("dataset")`
/// for a create without a dataset, `EntityNotFound` for an update of an
/// unknown uuid, and the store's create/append errors.
pub fn submit_instance(
    store: &mut MemoryStore,
    fields: &[FormField],
    record: &SubmissionRecord,
    actor: &Actor,
    ctx: &RequestContext,
) -> Result<Def> {
    log_op_start!("submit_instance", request_id = ctx.request_id.as_str());
    let start = std::time::Instant::now();

    let result = submit_instance_impl(store, fields, record, actor).map_err(|e| {
        log_op_error!(
            "submit_instance",
            e.clone(),
            duration_ms = elapsed_ms(start),
            request_id = ctx.request_id.as_str()
        );
        e
    })?;

    log_op_end!(
        "submit_instance",
        duration_ms = elapsed_ms(start),
        request_id = ctx.request_id.as_str(),
        version = result.version
    );
    Ok(result)
}

fn submit_instance_impl(
    store: &mut MemoryStore,
    fields: &[FormField],
    record: &SubmissionRecord,
    actor: &Actor,
) -> Result<Def> {
    let validated = validate_entity(extract_from_instance(fields, record)?)?;

    let mut data_received = PropertyMap::new();
    data_received.insert(LABEL_KEY, validated.label.as_str());
    for (k, v) in validated.data.iter() {
        data_received.insert(k, v);
    }

    if validated.update {
        let current = store.get_entity(&validated.uuid)?.current()?;
        let def = NewDef {
            label: validated.label,
            data: current.data.merged_with(&validated.data),
            data_received,
            base_version: validated.base_version,
        };
        store.update_entity(&validated.uuid, actor, def)
    } else {
        let dataset = validated
            .dataset
            .ok_or_else(|| EntityError::required("dataset"))?;
        let def = NewDef {
            label: validated.label,
            data: validated.data,
            data_received,
            base_version: None,
        };
        store.create_entity(&dataset, &validated.uuid, actor, def)
    }
}

/// Create an entity from an API request body
///
/// # Errors
///
/// Any extraction error, `InvalidDataType` for a malformed uuid,
/// `RequiredParameterMissing("label")` when the body has data but no label,
/// and the store's create errors.
pub fn create_from_request(
    store: &mut MemoryStore,
    dataset: &str,
    body: &Value,
    actor: &Actor,
    ctx: &RequestContext,
) -> Result<Def> {
    log_op_start!(
        "create_from_request",
        request_id = ctx.request_id.as_str(),
        dataset = dataset
    );
    let start = std::time::Instant::now();

    let result = create_from_request_impl(store, dataset, body, actor).map_err(|e| {
        log_op_error!(
            "create_from_request",
            e.clone(),
            duration_ms = elapsed_ms(start),
            request_id = ctx.request_id.as_str()
        );
        e
    })?;

    log_op_end!(
        "create_from_request",
        duration_ms = elapsed_ms(start),
        request_id = ctx.request_id.as_str()
    );
    Ok(result)
}

fn create_from_request_impl(
    store: &mut MemoryStore,
    dataset: &str,
    body: &Value,
    actor: &Actor,
) -> Result<Def> {
    let properties = store.get_dataset(dataset)?.clone();
    let extracted = extract_from_request(body, &properties.property_names(), None)?;
    let uuid = canonical_uuid(&extracted.system.uuid)?;
    let label = extracted
        .system
        .label
        .ok_or_else(|| EntityError::required("label"))?;

    let def = NewDef {
        label,
        data: extracted.data,
        data_received: extracted.data_received,
        base_version: None,
    };
    store.create_entity(dataset, &uuid, actor, def)
}

/// Update an entity from an API request body
///
/// `base_version` is the version the client edited; `None` means the
/// current version.
///
/// # Errors
///
/// `EntityNotFound`, any extraction error, and the store's append errors.
pub fn update_from_request(
    store: &mut MemoryStore,
    uuid: &str,
    base_version: Option<u32>,
    body: &Value,
    actor: &Actor,
    ctx: &RequestContext,
) -> Result<Def> {
    log_op_start!(
        "update_from_request",
        request_id = ctx.request_id.as_str(),
        entity_uuid = uuid
    );
    let start = std::time::Instant::now();

    let result = update_from_request_impl(store, uuid, base_version, body, actor).map_err(|e| {
        log_op_error!(
            "update_from_request",
            e.clone(),
            duration_ms = elapsed_ms(start),
            request_id = ctx.request_id.as_str(),
            entity_uuid = uuid
        );
        e
    })?;

    log_op_end!(
        "update_from_request",
        duration_ms = elapsed_ms(start),
        request_id = ctx.request_id.as_str(),
        entity_uuid = uuid,
        version = result.version
    );
    Ok(result)
}

fn update_from_request_impl(
    store: &mut MemoryStore,
    uuid: &str,
    base_version: Option<u32>,
    body: &Value,
    actor: &Actor,
) -> Result<Def> {
    let uuid = canonical_uuid(uuid)?;
    let entity = store.get_entity(&uuid)?.clone();
    let dataset = store.get_dataset(&entity.dataset)?.clone();
    let extracted = extract_from_request(body, &dataset.property_names(), Some(&entity))?;

    let current = entity.current()?;
    let label = extracted
        .system
        .label
        .unwrap_or_else(|| current.label.clone());

    let def = NewDef {
        label,
        data: extracted.data,
        data_received: extracted.data_received,
        base_version: Some(base_version.unwrap_or(current.version)),
    };
    store.update_entity(&uuid, actor, def)
}

/// Read view of an entity, pruned to a `$select` query
///
/// # Errors
///
/// `InvalidDataType` for a malformed uuid, `EntityNotFound`,
/// `PropertyNotFound` for a bad selection, and history precondition errors.
pub fn read_entity<R: EntityRepository>(
    repo: &R,
    uuid: &str,
    select: Option<&str>,
    ctx: &RequestContext,
) -> Result<Value> {
    log_op_start!(
        "read_entity",
        request_id = ctx.request_id.as_str(),
        entity_uuid = uuid
    );
    let start = std::time::Instant::now();

    let result = read_entity_impl(repo, uuid, select).map_err(|e| {
        log_op_error!(
            "read_entity",
            e.clone(),
            duration_ms = elapsed_ms(start),
            request_id = ctx.request_id.as_str(),
            entity_uuid = uuid
        );
        e
    })?;

    log_op_end!(
        "read_entity",
        duration_ms = elapsed_ms(start),
        request_id = ctx.request_id.as_str(),
        entity_uuid = uuid
    );
    Ok(result)
}

fn read_entity_impl<R: EntityRepository>(
    repo: &R,
    uuid: &str,
    select: Option<&str>,
) -> Result<Value> {
    let history = repo.fetch_history(&canonical_uuid(uuid)?)?;
    let dataset = repo.fetch_dataset(&history.entity.dataset)?;
    let properties = dataset.property_names();
    let selection = resolve_selection(select, &properties)?;
    project(&history.entity, &properties, &selection)
}

/// Classified version history of an entity
///
/// # Errors
///
/// `EntityNotFound`, history precondition errors, and `MissingCreationAudit`
/// under [`CreationAuditPolicy::Require`].
pub fn list_versions<R: EntityRepository>(
    repo: &R,
    uuid: &str,
    only_conflicting: bool,
    policy: CreationAuditPolicy,
    ctx: &RequestContext,
) -> Result<Vec<VersionConflict>> {
    log_op_start!(
        "list_versions",
        request_id = ctx.request_id.as_str(),
        entity_uuid = uuid,
        only_conflicting = only_conflicting
    );
    let start = std::time::Instant::now();

    let result = canonical_uuid(uuid)
        .and_then(|uuid| repo.fetch_history(&uuid))
        .and_then(|history| {
            list_with_conflicts(&history.entity.defs, &history.audits, only_conflicting, policy)
        })
        .map_err(|e| {
            log_op_error!(
                "list_versions",
                e.clone(),
                duration_ms = elapsed_ms(start),
                request_id = ctx.request_id.as_str(),
                entity_uuid = uuid
            );
            e
        })?;

    log_op_end!(
        "list_versions",
        duration_ms = elapsed_ms(start),
        request_id = ctx.request_id.as_str(),
        entity_uuid = uuid,
        def_count = result.len(),
        conflict_count = result.iter().filter(|v| v.conflict.is_conflict()).count()
    );
    Ok(result)
}

/// Property changes between consecutive versions, label included
///
/// # Errors
///
/// `InvalidDataType` for a malformed uuid and `EntityNotFound`.
pub fn version_diffs<R: EntityRepository>(
    repo: &R,
    uuid: &str,
    ctx: &RequestContext,
) -> Result<Vec<Vec<PropertyChange>>> {
    log_op_start!(
        "version_diffs",
        request_id = ctx.request_id.as_str(),
        entity_uuid = uuid
    );
    let start = std::time::Instant::now();

    let result = canonical_uuid(uuid)
        .and_then(|uuid| repo.fetch_history(&uuid))
        .map(|history| {
            let snapshots: Vec<PropertyMap> =
                history.entity.defs.iter().map(Def::snapshot).collect();
            history_diff(&snapshots)
        })
        .map_err(|e| {
            log_op_error!(
                "version_diffs",
                e.clone(),
                duration_ms = elapsed_ms(start),
                request_id = ctx.request_id.as_str(),
                entity_uuid = uuid
            );
            e
        })?;

    log_op_end!(
        "version_diffs",
        duration_ms = elapsed_ms(start),
        request_id = ctx.request_id.as_str(),
        entity_uuid = uuid
    );
    Ok(result)
}
