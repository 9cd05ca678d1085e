use crate::error::CheckError;
use crate::types::ResourceSpec;

/// Resolve the ARM path of the resource whose metrics are queried.
///
/// A non-empty `resource_id` always wins and the name tuple is ignored. Otherwise
/// subscription, group, namespace, type and name are all required; the parent is
/// optional and slots in between namespace and type.
pub fn resolve(spec: &ResourceSpec) -> Result<String, CheckError> {
    let resource_id = spec.resource_id.trim();
    if !resource_id.is_empty() {
        return Ok(normalize_leading_slash(resource_id));
    }

    let missing: Vec<&str> = [
        ("resource name", &spec.name),
        ("resource type", &spec.resource_type),
        ("resource namespace", &spec.namespace),
        ("resource group", &spec.resource_group),
        ("subscription id", &spec.subscription_id),
    ]
    .iter()
    .filter(|(_, v)| v.trim().is_empty())
    .map(|(label, _)| *label)
    .collect();

    if missing.len() == 5 {
        return Err(CheckError::Configuration(
            "resource id or resource name/group/type/namespace and subscription id must be provided".to_string(),
        ));
    }
    if !missing.is_empty() {
        return Err(CheckError::Configuration(format!(
            "When the resource id is not given, resource name, type, namespace, group and subscription id are all required (missing: {})",
            missing.join(", ")
        )));
    }

    Ok(format!(
        "/subscriptions/{}/resourceGroups/{}/providers/{}/{}",
        spec.subscription_id.trim(),
        spec.resource_group.trim(),
        providers_segment(spec),
        spec.name.trim()
    ))
}

fn providers_segment(spec: &ResourceSpec) -> String {
    let parent = spec.parent.trim();
    if parent.is_empty() {
        format!("{}/{}", spec.namespace.trim(), spec.resource_type.trim())
    } else {
        format!("{}/{}/{}", spec.namespace.trim(), parent, spec.resource_type.trim())
    }
}

fn normalize_leading_slash(id: &str) -> String {
    if id.starts_with('/') {
        id.to_string()
    } else {
        format!("/{}", id)
    }
}
