/// Role a base entity field plays in the derived artifacts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldRole {
    Identity,
    CreatedAt,
    UpdatedAt,
    SoftDelete,
    Regular,
}

/// How a field is drawn in the list grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListRenderer {
    Plain,
    DetailLink,
    SplitDateTime,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldPolicy {
    pub include_in_list: bool,
    pub include_in_form: bool,
    pub list_renderer: ListRenderer,
    pub list_header: Option<&'static str>, // None -> field label
    pub list_width: u32,
}

const POLICY_TABLE: [(FieldRole, FieldPolicy); 5] = [
    (
        FieldRole::Identity,
        FieldPolicy {
            include_in_list: true,
            include_in_form: false,
            list_renderer: ListRenderer::DetailLink,
            list_header: Some("No."),
            list_width: 60,
        },
    ),
    (
        FieldRole::CreatedAt,
        FieldPolicy {
            include_in_list: true,
            include_in_form: false,
            list_renderer: ListRenderer::SplitDateTime,
            list_header: Some("Created At"),
            list_width: 80,
        },
    ),
    (
        FieldRole::UpdatedAt,
        FieldPolicy {
            include_in_list: true,
            include_in_form: false,
            list_renderer: ListRenderer::SplitDateTime,
            list_header: Some("Updated At"),
            list_width: 80,
        },
    ),
    (
        FieldRole::SoftDelete,
        FieldPolicy {
            include_in_list: false,
            include_in_form: false,
            list_renderer: ListRenderer::Plain,
            list_header: None,
            list_width: 0,
        },
    ),
    (
        FieldRole::Regular,
        FieldPolicy {
            include_in_list: true,
            include_in_form: true,
            list_renderer: ListRenderer::Plain,
            list_header: None,
            list_width: 80,
        },
    ),
];

impl FieldRole {
    pub fn policy(self) -> FieldPolicy {
        POLICY_TABLE
            .iter()
            .find(|(role, _)| *role == self)
            .map(|(_, policy)| *policy)
            .unwrap_or(POLICY_TABLE[4].1)
    }
}
