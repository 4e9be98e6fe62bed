/**
 * Shared assets declared once and referenced by id from markup.
 *
 * Resolving a reference to the actual asset is the job of the resource
 * container; descriptors only need to recognize one.
 */

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceReference {
    pub resource_id: String,
}

impl ResourceReference {
    pub fn new(resource_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
        }
    }
}
