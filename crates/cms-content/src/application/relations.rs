//! Audit relation lookup shared by the services

use cms_common::CmsResult;

use crate::application::dto::AuditRelations;
use crate::domain::value_objects::EntityId;
use crate::ports::outbound::DirectoryRepository;

/// Resolve creator, updater and organization
pub(crate) async fn audit_relations(
    directory: &dyn DirectoryRepository,
    created_by: &EntityId,
    updated_by: &EntityId,
    organization_id: &EntityId,
) -> CmsResult<AuditRelations> {
    let creator = directory.find_user(created_by).await?;
    let updater = if updated_by == created_by {
        creator.clone()
    } else {
        directory.find_user(updated_by).await?
    };
    let organization = directory.find_organization(organization_id).await?;

    Ok(AuditRelations {
        creator,
        updater,
        organization,
    })
}
