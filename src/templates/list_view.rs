use super::escape_html;
use crate::entity_fields::EntityModel;
use crate::types::FieldDescriptor;

pub fn generate_list_view(entity: &EntityModel) -> String {
    let naming = &entity.naming;

    let filter_inputs: String = entity
        .form_fields()
        .map(|field: &FieldDescriptor| {
            format!(
                "        <label>{label}:</label>\n        <input type=\"text\" name=\"{name}\" class=\"input-size\" />\n",
                label = escape_html(&field.label),
                name = escape_html(&field.wire_name),
            )
        })
        .collect();

    let detail_inputs: String = entity
        .form_fields()
        .map(|field: &FieldDescriptor| {
            let label = escape_html(&field.label);
            format!(
                "          <tr>\n            <th>{label}:</th>\n            <td><input type=\"text\" name=\"{name}\" class=\"input-size validate\" placeholder=\"{label}\" /></td>\n          </tr>\n",
                label = label,
                name = escape_html(&field.wire_name),
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8" />
  <title>{entity}</title>
</head>
<body>
  <div class="container-fluid">
    <fieldset>
      <legend>Filter</legend>
      <form id="queryForm" class="search" autocomplete="off">
{filter_inputs}      </form>
      <a id="searchBtn" class="btn btn-primary">Search</a>
      <a id="clearBtn" class="btn btn-primary">Clear</a>
    </fieldset>
    <fieldset>
      <legend>List</legend>
      <a id="addBtn" class="btn btn-tool">Add</a>
      <a id="batchDeleteBtn" class="btn btn-tool">Delete Selected</a>
      <div id="{grid}" class="grid-auto"></div>
    </fieldset>
  </div>
  <div id="createContent" style="display:none;">
    <fieldset>
      <legend></legend>
      <form autocomplete="off">
        <table id="detailInputs">
{detail_inputs}        </table>
      </form>
    </fieldset>
  </div>
  <script src="{list_script}.js"></script>
  <script src="{form_script}.js"></script>
  <script>
    $(function () {{
      new {list_script}({{ baseUrl: "" }});
    }});
  </script>
</body>
</html>
"#,
        entity = escape_html(&naming.entity),
        filter_inputs = filter_inputs,
        grid = naming.grid_element,
        detail_inputs = detail_inputs,
        list_script = naming.list_view,
        form_script = naming.form_script,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::fixtures;

    fn query_form(html: &str) -> &str {
        let start = html.find("<form id=\"queryForm\"").unwrap();
        let end = start + html[start..].find("</form>").unwrap();
        &html[start..end]
    }

    #[test]
    fn filter_form_has_one_input_per_form_field() {
        let html = generate_list_view(&fixtures::entity(fixtures::ORDER));
        let form = query_form(&html);

        assert_eq!(form.matches("<input").count(), 1);
        assert!(form.contains("name=\"customerName\""));
        assert!(!html.contains("name=\"delFlag\""));
        assert!(!html.contains("name=\"id\""));
    }

    #[test]
    fn detail_form_validates_with_label() {
        let html = generate_list_view(&fixtures::entity(fixtures::ORDER));

        assert!(html.contains(
            "<input type=\"text\" name=\"customerName\" class=\"input-size validate\" placeholder=\"Customer\" />"
        ));
        assert!(html.contains("<div id=\"orderList\""));
        assert!(html.contains("<script src=\"OrderCreate.js\"></script>"));
    }

    #[test]
    fn zero_field_entity_renders_empty_sections() {
        let html = generate_list_view(&fixtures::entity(fixtures::PING));

        assert_eq!(query_form(&html).matches("<input").count(), 0);
        assert!(!html.contains("validate"));
        assert!(html.contains("new PingList({ baseUrl: \"\" });"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn input_names_are_attribute_escaped() {
        let html = generate_list_view(&fixtures::entity(fixtures::KEBAB));
        let form = query_form(&html);

        assert!(form.contains("name=\"customer-name\""));
        assert!(form.contains("name=\"memo&quot;x\""));
        assert!(!html.contains("name=\"memo\"x\""));
    }
}
