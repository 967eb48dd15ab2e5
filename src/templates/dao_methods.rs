use crate::config::ModulePaths;
use crate::entity_fields::EntityModel;

/// List and count declarations spliced into the base mapper trait.
///
/// Kept as text so the trait's existing formatting is left untouched.
pub fn generate_dao_methods(entity: &EntityModel, modules: &ModulePaths) -> String {
    let naming = &entity.naming;
    let request_path = modules.request_path(naming);

    format!(
        "\n    fn {list}(&self, {var}: &{req}) -> Result<Vec<{entity}>, Self::Error>;\n\n    fn {count}(&self, {var}: &{req}) -> Result<i64, Self::Error>;\n",
        list = naming.list_method,
        count = naming.count_method,
        var = naming.request_variable,
        req = request_path,
        entity = modules.entity_path(naming),
    )
}
