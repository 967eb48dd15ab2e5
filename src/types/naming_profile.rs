use heck::ToSnakeCase;

/// Endpoints exposed by the generated handler and called by the scripts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Query,
    Save,
    FindById,
    Delete,
    Update,
}

impl Route {
    pub const ALL: [Route; 5] = [
        Route::Query,
        Route::Save,
        Route::FindById,
        Route::Delete,
        Route::Update,
    ];

    pub fn segment(self) -> &'static str {
        match self {
            Route::Query => "query",
            Route::Save => "save",
            Route::FindById => "findById",
            Route::Delete => "delete",
            Route::Update => "update",
        }
    }
}

/// Every name derived from the base entity, computed once and shared by all templates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamingProfile {
    pub entity: String,           // as declared
    pub variable: String,         // entity with a lower-cased first letter
    pub module: String,           // snake_case
    pub request_type: String,     // <Entity>Req
    pub request_variable: String, // snake_case
    pub request_module: String,
    pub mapper_trait: String, // <Entity>Mapper
    pub mapper_variable: String,
    pub mapper_module: String,
    pub mapping_file: String, // <Entity>Mapper.xml
    pub controller_type: String,
    pub controller_module: String,
    pub list_statement: String,  // query<Entity>List
    pub count_statement: String, // query<Entity>Count
    pub list_method: String,     // query_<entity>_list
    pub count_method: String,    // query_<entity>_count
    pub route_base: String,
    pub list_view: String,   // <Entity>List
    pub form_script: String, // <Entity>Create
    pub grid_element: String,
}

impl NamingProfile {
    pub fn new(entity_name: &str) -> Self {
        let entity = entity_name.to_string();
        let variable = lower_first(&entity);
        let module = entity.to_snake_case();

        Self {
            request_type: format!("{}Req", entity),
            request_variable: format!("{}_req", module),
            request_module: format!("{}_req", module),
            mapper_trait: format!("{}Mapper", entity),
            mapper_variable: format!("{}_mapper", module),
            mapper_module: format!("{}_mapper", module),
            mapping_file: format!("{}Mapper.xml", entity),
            controller_type: format!("{}Controller", entity),
            controller_module: format!("{}_controller", module),
            list_statement: format!("query{}List", entity),
            count_statement: format!("query{}Count", entity),
            list_method: format!("query_{}_list", module),
            count_method: format!("query_{}_count", module),
            route_base: variable.clone(),
            list_view: format!("{}List", entity),
            form_script: format!("{}Create", entity),
            grid_element: format!("{}List", variable),
            entity,
            variable,
            module,
        }
    }

    pub fn route_path(&self, route: Route) -> String {
        format!("/{}/{}", self.route_base, route.segment())
    }

    pub fn handler_fn(&self, route: Route) -> String {
        match route {
            Route::Query => self.list_method.clone(),
            Route::Save => format!("save_{}", self.module),
            Route::FindById => format!("find_{}_by_id", self.module),
            Route::Delete => format!("delete_{}", self.module),
            Route::Update => format!("update_{}", self.module),
        }
    }
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
