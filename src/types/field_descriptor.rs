use super::field_policy::{FieldPolicy, FieldRole};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,      // Rust identifier, raw prefix stripped
    pub wire_name: String, // serialized name after serde renames
    pub label: String,
    pub role: FieldRole,
    pub is_excluded_from_forms: bool,
}

impl FieldDescriptor {
    pub fn policy(&self) -> FieldPolicy {
        self.role.policy()
    }

    pub fn in_list(&self) -> bool {
        self.policy().include_in_list
    }

    pub fn in_form(&self) -> bool {
        !self.is_excluded_from_forms
    }

    pub fn list_header(&self) -> &str {
        self.policy().list_header.unwrap_or(self.label.as_str())
    }
}
