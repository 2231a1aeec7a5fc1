//! Where-clauses selecting the members of each list endpoint.
//!
//! Columns of the outer table are referenced with `$col` inside sub-queries so
//! they are not captured by same-named columns of the inner table.

use serde_json::{json, Value};
use uuid::Uuid;

/// Notes by the viewer, mentioning the viewer, or by accounts the viewer
/// follows, minus notes matching one of the viewer's `hide` keyword filters
/// for the home context
pub fn home_timeline(viewer: Uuid) -> Value {
    json!({
        "$and": [
            {
                "$or": [
                    { "author_id": viewer },
                    { "$exists": {
                        "from": "note_mentions",
                        "where": { "note_id": { "$col": "notes.id" }, "user_id": viewer }
                    } },
                    { "$exists": {
                        "from": "relationships",
                        "where": {
                            "subject_id": { "$col": "notes.author_id" },
                            "owner_id": viewer,
                            "following": true
                        }
                    } }
                ]
            },
            { "$nexists": {
                "from": "filters",
                "where": {
                    "user_id": viewer,
                    "filter_action": "hide",
                    "context": { "$all": ["home"] },
                    "$exists": {
                        "from": "filter_keywords",
                        "where": {
                            "filter_id": { "$col": "filters.id" },
                            "notes.content": { "$contains": { "$col": "filter_keywords.keyword" } }
                        }
                    }
                }
            } }
        ]
    })
}

pub fn authored_by(account: Uuid) -> Value {
    json!({ "author_id": account })
}

pub fn muted_by(viewer: Uuid) -> Value {
    relationship_flag(viewer, "muting")
}

pub fn blocked_by(viewer: Uuid) -> Value {
    relationship_flag(viewer, "blocking")
}

fn relationship_flag(viewer: Uuid, flag: &str) -> Value {
    let mut conditions = json!({
        "subject_id": { "$col": "users.id" },
        "owner_id": viewer
    });
    conditions[flag] = Value::Bool(true);
    json!({ "$exists": { "from": "relationships", "where": conditions } })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::filter_where::FilterWhere;
    use crate::filter::FilterWhereOptions;

    #[test]
    fn home_timeline_compiles_to_correlated_subqueries() {
        let viewer = Uuid::now_v7();
        let (sql, params) =
            FilterWhere::generate(&home_timeline(viewer), 0, &FilterWhereOptions::default()).unwrap();
        assert_eq!(
            sql,
            "((((\"author_id\" = $1) OR \
             (EXISTS (SELECT 1 FROM \"note_mentions\" WHERE \"note_id\" = \"notes\".\"id\" AND \"user_id\" = $2)) OR \
             (EXISTS (SELECT 1 FROM \"relationships\" WHERE \"following\" = $3 AND \"owner_id\" = $4 \
             AND \"subject_id\" = \"notes\".\"author_id\")))) AND \
             (NOT EXISTS (SELECT 1 FROM \"filters\" WHERE \
             EXISTS (SELECT 1 FROM \"filter_keywords\" WHERE \"filter_id\" = \"filters\".\"id\" \
             AND \"notes\".\"content\" LIKE '%' || \"filter_keywords\".\"keyword\" || '%') \
             AND \"context\" @> ARRAY[$5] AND \"filter_action\" = $6 AND \"user_id\" = $7)))"
        );
        assert_eq!(
            params,
            vec![
                json!(viewer),
                json!(viewer),
                json!(true),
                json!(viewer),
                json!("home"),
                json!("hide"),
                json!(viewer),
            ]
        );
    }

    #[test]
    fn home_timeline_excludes_hidden_keywords() {
        let viewer = Uuid::now_v7();
        let (sql, _) =
            FilterWhere::generate(&home_timeline(viewer), 0, &FilterWhereOptions::default()).unwrap();
        let exclusion = &sql[sql.find("NOT EXISTS").unwrap()..];
        assert!(exclusion.starts_with("NOT EXISTS (SELECT 1 FROM \"filters\""));
        assert!(exclusion.contains("LIKE '%' || \"filter_keywords\".\"keyword\" || '%'"));
        assert!(exclusion.contains("\"user_id\" = $7"));
    }

    #[test]
    fn relationship_lists_use_their_flag() {
        let viewer = Uuid::now_v7();
        let (muted, _) = FilterWhere::generate(&muted_by(viewer), 0, &FilterWhereOptions::default()).unwrap();
        assert!(muted.contains("\"muting\" = $1"));
        assert!(muted.contains("\"subject_id\" = \"users\".\"id\""));

        let (blocked, _) = FilterWhere::generate(&blocked_by(viewer), 0, &FilterWhereOptions::default()).unwrap();
        assert!(blocked.contains("\"blocking\" = $1"));
        assert!(!blocked.contains("muting"));
    }
}
