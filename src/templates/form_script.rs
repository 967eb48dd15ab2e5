use super::escape_js;
use crate::entity_fields::EntityModel;
use crate::types::{FieldDescriptor, Route};

pub fn generate_form_script(entity: &EntityModel) -> String {
    let naming = &entity.naming;
    let id_wire = escape_js(&entity.identity.wire_name);

    let show_data: String = entity
        .form_fields()
        .map(|field: &FieldDescriptor| {
            format!(
                "        field(\"{name}\").val(data[\"{name}\"]);\n",
                name = escape_js(&field.wire_name),
            )
        })
        .collect();

    let checks: String = entity
        .form_fields()
        .map(|field: &FieldDescriptor| {
            format!(
                "        checkRequired(\"{name}\", \"{label}\");\n",
                name = escape_js(&field.wire_name),
                label = escape_js(&field.label),
            )
        })
        .collect();

    format!(
        r##"function {form}(config, datas) {{
    var $detailContent = config.showContent;
    var win;

    initWindow(datas);
    $detailContent.find("legend").text(initTitle(datas));

    win = new WinForm({{
        title: initTitle(datas),
        node: $detailContent,
        buttons: initWindowButtons(datas)
    }});
    return win;

    function initWindow(datas) {{
        if (datas.operate != "add") {{
            showData(datas.data);
        }}
        if (datas.operate == "view") {{
            $detailContent.find("input").attr("disabled", true);
        }} else {{
            $detailContent.find("input").removeAttr("disabled");
            bindBlurFunction();
        }}
    }}

    function initTitle(datas) {{
        switch (datas.operate) {{
            case "add": return "Add";
            case "copy": return "Copy";
            case "edit": return "Edit";
            case "view": return "Detail";
            default: return "";
        }}
    }}

    function initWindowButtons(datas) {{
        var confirm = {{
            name: "Confirm",
            class: "btn btn-primary",
            click: function() {{
                if (datas.operate == "add" || datas.operate == "copy") {{
                    save(datas);
                }} else if (datas.operate == "edit") {{
                    update(datas);
                }}
            }}
        }};
        var reset = {{
            name: "Reset",
            class: "btn btn-primary",
            click: function() {{
                initControlsTipState();
                $detailContent.find("input[type='text']").val("");
            }}
        }};
        var close = {{
            name: "Close",
            class: "btn btn-danger",
            click: function() {{
                win.hide();
            }}
        }};

        if (datas.operate == "edit") {{
            return [confirm, close];
        }}
        if (datas.operate == "view") {{
            return [close];
        }}
        return [confirm, reset, close];
    }}

    function bindBlurFunction() {{
        $detailContent.find(".validate").blur(function(e) {{
            var target = $(e.currentTarget);
            target.removeAttr("data-original-title").removeClass("ver-error");
            if (target.val() == "") {{
                target.addClass("ver-error").attr("data-original-title", target.attr("placeholder") + " is required");
            }}
        }});
    }}

    function field(name) {{
        return $detailContent.find("input").filter(function() {{
            return this.name === name;
        }});
    }}

    function showData(data) {{
        if (!data) {{
            return;
        }}
{show_data}    }}

    function checkRequired(name, label) {{
        var input = field(name);
        if (input.val() == "") {{
            input.addClass("ver-error").attr("data-original-title", label + " is required");
        }}
    }}

    function checkDataValid() {{
        initControlsTipState();
{checks}        return $detailContent.find(".ver-error").length == 0;
    }}

    function initControlsTipState() {{
        $detailContent.find("input").removeClass("ver-error").removeAttr("data-original-title");
    }}

    function createData(datas) {{
        var submitData = {{}};
        $.each($detailContent.find("form").serializeArray(), function(i, item) {{
            submitData[item.name] = item.value === "" ? null : item.value;
        }});
        if (datas.operate == "edit") {{
            submitData["{id}"] = datas.data["{id}"];
        }}
        return submitData;
    }}

    function submit(url, datas) {{
        if (!checkDataValid()) {{
            return;
        }}
        $.ajax({{
            type: "POST",
            url: url,
            contentType: "application/json",
            data: JSON.stringify(createData(datas)),
            success: function(json) {{
                if (json && json.success === true) {{
                    closeWindow();
                }} else {{
                    alert((json && json.msg) || "Request failed");
                }}
            }},
            error: function() {{
                alert("Request failed");
            }}
        }});
    }}

    function save(datas) {{
        submit(getAction().save, datas);
    }}

    function update(datas) {{
        submit(getAction().update, datas);
    }}

    function closeWindow() {{
        win.hide();
        config.reloadList();
    }}

    function getAction() {{
        return {{
            save: config.baseUrl + "{save}",
            update: config.baseUrl + "{update}"
        }};
    }}
}}
"##,
        form = naming.form_script,
        show_data = show_data,
        checks = checks,
        id = id_wire,
        save = naming.route_path(Route::Save),
        update = naming.route_path(Route::Update),
    )
}
