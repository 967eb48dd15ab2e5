use crate::config::Dialect;
use crate::mapping_document::MappingInspection;
use crate::types::{FilterClause, NamingProfile, QueryFragment};

pub fn synthesize(
    naming: &NamingProfile,
    mapping: &MappingInspection,
    dialect: Dialect,
) -> QueryFragment {
    let filter_clauses: Vec<FilterClause> = mapping
        .properties
        .iter()
        .map(|(property, column): (&str, &str)| FilterClause {
            property: property.to_string(),
            column: column.to_string(),
        })
        .collect();

    let filters: String = filter_clauses.iter().map(render_filter).collect();

    let select_body = format!(
        r#"  <select id="{id}" resultMap="{result_map}">
    select
    <include refid="{column_list}" />
{from}
    where 1 = 1
{filters}    order by {identity} desc
    {pagination}
  </select>
"#,
        id = naming.list_statement,
        result_map = mapping.result_map_id,
        column_list = mapping.column_list_id,
        from = mapping.from_clause,
        filters = filters,
        identity = mapping.identity_column,
        pagination = dialect.pagination_clause(),
    );

    let count_body = format!(
        r#"  <select id="{id}" resultType="i64">
    select
    count(1)
{from}
    where 1 = 1
{filters}  </select>
"#,
        id = naming.count_statement,
        from = mapping.from_clause,
        filters = filters,
    );

    QueryFragment {
        list_statement_id: naming.list_statement.clone(),
        count_statement_id: naming.count_statement.clone(),
        select_body,
        count_body,
        filter_clauses,
    }
}

fn render_filter(clause: &FilterClause) -> String {
    format!(
        "    <if test=\"{property} != null\">\n      and {column} = #{{{property}}}\n    </if>\n",
        property = clause.property,
        column = clause.column,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PropertyColumnMap;
    use std::path::PathBuf;

    fn inspection(properties: PropertyColumnMap) -> MappingInspection {
        MappingInspection {
            path: PathBuf::from("OrderMapper.xml"),
            result_map_id: "BaseResultMap".into(),
            column_list_id: "Base_Column_List".into(),
            identity_column: "order_id".into(),
            from_clause: "    from order_tbl".into(),
            properties,
        }
    }

    #[test]
    fn one_filter_per_property_in_both_queries() {
        let map: PropertyColumnMap = vec![
            ("customerName", "cust_name"),
            ("status", "status"),
            ("refNumber", "ref_no"),
        ]
        .into_iter()
        .collect();
        let fragment = synthesize(&NamingProfile::new("Order"), &inspection(map), Dialect::MySql);

        assert_eq!(fragment.filter_clauses.len(), 3);
        assert_eq!(fragment.select_body.matches("<if test=").count(), 3);
        assert_eq!(fragment.count_body.matches("<if test=").count(), 3);
        assert!(fragment
            .select_body
            .contains("<if test=\"customerName != null\">\n      and cust_name = #{customerName}\n    </if>"));
    }

    #[test]
    fn only_list_query_is_ordered_and_paged() {
        let fragment = synthesize(
            &NamingProfile::new("Order"),
            &inspection(PropertyColumnMap::new()),
            Dialect::MySql,
        );

        assert!(fragment.select_body.contains("order by order_id desc"));
        assert!(fragment.select_body.contains("limit #{start},#{limit}"));
        assert!(!fragment.count_body.contains("order by"));
        assert!(!fragment.count_body.contains("limit"));
        assert!(fragment.count_body.contains("count(1)"));
    }

    #[test]
    fn empty_map_degrades_to_filterless_queries() {
        let fragment = synthesize(
            &NamingProfile::new("Order"),
            &inspection(PropertyColumnMap::new()),
            Dialect::MySql,
        );

        assert!(fragment.filter_clauses.is_empty());
        assert!(!fragment.select_body.contains("<if"));
        assert!(fragment
            .select_body
            .contains("\n    from order_tbl\n    where 1 = 1\n    order by"));
    }

    #[test]
    fn statement_ids_and_from_clause_are_reused() {
        let fragment = synthesize(
            &NamingProfile::new("Order"),
            &inspection(PropertyColumnMap::new()),
            Dialect::PostgreSql,
        );

        assert!(fragment
            .select_body
            .starts_with("  <select id=\"queryOrderList\" resultMap=\"BaseResultMap\">"));
        assert!(fragment
            .count_body
            .starts_with("  <select id=\"queryOrderCount\" resultType=\"i64\">"));
        assert!(fragment.select_body.contains("limit #{limit} offset #{start}"));
        assert_eq!(fragment.count_body.matches("    from order_tbl\n").count(), 1);
    }
}
