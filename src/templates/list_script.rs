use super::escape_js;
use crate::entity_fields::EntityModel;
use crate::types::{FieldDescriptor, ListRenderer, Route};

pub fn generate_list_script(entity: &EntityModel) -> String {
    let naming = &entity.naming;
    let id_wire = &entity.identity.wire_name;
    let id_list_wire = entity.request_wire_name("id_list");

    let columns: String = entity
        .list_fields()
        .map(|field: &FieldDescriptor| generate_column(field))
        .collect();

    format!(
        r##"function {list}(config) {{
    $.extend(this, {{ baseUrl: "" }}, config);
    this.init();
}}

$.extend({list}.prototype, {{
    init: function() {{
        var self = this;
        self.{grid} = new DataGrid(self.gridConf($("#{grid}")));
        self.bindEvent();
        self.reloadList();
    }},

    bindEvent: function() {{
        var self = this;
        $("#searchBtn").off("click").on("click", function() {{
            self.reloadList();
        }});
        $("#clearBtn").off("click").on("click", function() {{
            self.clearFilterParam();
        }});
        $("#addBtn").off("click").on("click", function() {{
            self.openForm("add");
        }});
        $("#batchDeleteBtn").off("click").on("click", function() {{
            self.batchDelete();
        }});
    }},

    openForm: function(operate, data) {{
        this.showContent = $("#createContent").clone();
        return new {form}(this, {{ operate: operate, data: data }});
    }},

    renderDateTime: function(n, value) {{
        if (value) {{
            var index = value.indexOf(" ");
            var date = index < 0 ? value : value.substring(0, index);
            var time = index < 0 ? "" : value.substring(index + 1);
            n.attr("title", value);
            n.html(date + "<br/>" + time);
        }} else {{
            n.attr("title", "/");
            n.html("/");
        }}
    }},

    gridConf: function(element) {{
        var self = this;
        return {{
            url: self.getAction().query,
            type: "GET",
            el: element,
            colModel: [{{
                display: "checkbox",
                name: "checkbox",
                width: 20,
                handler: function(v, data, n) {{
                    n.html($("<input type='checkbox'/>"));
                }}
            }},
{columns}            {{
                display: "Operate",
                name: "operate",
                width: 180,
                handler: function(v, data, n, i, row) {{
                    var copy = $("<a>Copy</a>").click(function() {{
                        self.openForm("copy", data);
                    }});
                    var edit = $("<a>Edit</a>").click(function() {{
                        self.openForm("edit", data);
                    }});
                    var del = $("<a>Delete</a>").click(function() {{
                        self.delFun(row, data);
                    }});
                    n.append(copy).append(edit).append(del);
                }}
            }}],
            height: "auto",
            autoload: false
        }};
    }},

    buildQueryParam: function() {{
        var param = {{}};
        $.each($("#queryForm").serializeArray(), function(i, item) {{
            if (item.value !== "") {{
                param[item.name] = item.value;
            }}
        }});
        return param;
    }},

    reloadList: function() {{
        this.{grid}.reload(this.buildQueryParam());
    }},

    clearFilterParam: function() {{
        $("#queryForm input").val("");
    }},

    delFun: function(row, data) {{
        this.deleteByIds([data["{id}"]]);
    }},

    batchDelete: function() {{
        var ids = this.getBatchParamIds();
        if (ids.length > 0) {{
            this.deleteByIds(ids);
        }}
    }},

    getBatchParamIds: function() {{
        var ids = [];
        $.each(this.{grid}.getCheckedRowsData(), function(i, item) {{
            ids.push(item["{id}"]);
        }});
        return ids;
    }},

    deleteByIds: function(ids) {{
        var self = this;
        if (!window.confirm("Delete " + ids.length + " record(s)?")) {{
            return;
        }}
        $.ajax({{
            type: "POST",
            url: self.getAction().delete,
            contentType: "application/json",
            data: JSON.stringify({{ "{id_list}": ids }}),
            success: function(json) {{
                if (!json || json.success !== true) {{
                    alert((json && json.msg) || "Delete failed");
                }}
                self.reloadList();
            }},
            error: function() {{
                alert("Request failed");
            }}
        }});
    }},

    getAction: function() {{
        return {{
            query: this.baseUrl + "{query}",
            delete: this.baseUrl + "{delete}"
        }};
    }}
}});
"##,
        list = naming.list_view,
        form = naming.form_script,
        grid = naming.grid_element,
        columns = columns,
        id = escape_js(id_wire),
        id_list = escape_js(&id_list_wire),
        query = naming.route_path(Route::Query),
        delete = naming.route_path(Route::Delete),
    )
}

fn generate_column(field: &FieldDescriptor) -> String {
    let policy = field.policy();
    let header = escape_js(field.list_header());
    let name = escape_js(&field.wire_name);

    let handler = match policy.list_renderer {
        ListRenderer::DetailLink => format!(
            r#",
                handler: function(v, data, n) {{
                    n.html($("<a style='cursor:pointer;'></a>").text(data["{name}"]));
                    n.find("a").click(function() {{
                        self.openForm("view", data);
                    }});
                }}"#,
            name = name,
        ),
        ListRenderer::SplitDateTime => format!(
            r#",
                handler: function(v, data, n) {{
                    self.renderDateTime(n, data["{name}"]);
                }}"#,
            name = name,
        ),
        ListRenderer::Plain => String::new(),
    };

    format!(
        "            {{\n                display: \"{header}\",\n                name: \"{name}\",\n                width: {width}{handler}\n            }},\n",
        header = header,
        name = name,
        width = policy.list_width,
        handler = handler,
    )
}
