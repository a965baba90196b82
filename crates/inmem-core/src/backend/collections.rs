//! Collection handlers: GET, POST, PUT and DELETE against the store.

use crate::backend::Store;
use crate::error::BackendError;
use crate::matching::QueryFilter;
use crate::overrides::OverridePolicy;
use crate::types::record::{
    id_key, next_integer_id, parse_id, position_of, record_id, Record, ID_FIELD,
};
use crate::types::response::{status, Response};
use serde_json::Value;

/// Collection addressed by a request.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Target<'a> {
    pub base: &'a str,
    pub collection: &'a str,
    pub id: Option<&'a str>,
}

impl Target<'_> {
    fn location(&self, id: &str) -> String {
        let path = [self.base, self.collection, id]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("/");
        format!("/{path}")
    }

    fn not_found(&self, id: &str) -> BackendError {
        BackendError::RecordNotFound {
            collection: self.collection.to_owned(),
            id: id.to_owned(),
        }
    }

    fn conflict(&self, id: String) -> BackendError {
        BackendError::Conflict {
            collection: self.collection.to_owned(),
            id,
        }
    }
}

fn record_from_body(body: Option<&Value>) -> Result<Record, BackendError> {
    match body {
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(_) => Err(BackendError::invalid_body("body must be a JSON object")),
        None => Err(BackendError::invalid_body("missing body")),
    }
}

/// Checks that the id of a body is valid and equals the id in the URL.
fn check_ids_match(url_id: &str, body_id: &Value) -> Result<(), BackendError> {
    let body_key = id_key(body_id)
        .ok_or_else(|| BackendError::invalid_body("id must be a string or an integer"))?;
    if body_key != url_id {
        return Err(BackendError::IdMismatch {
            url_id: url_id.to_owned(),
            body_id: body_key,
        });
    }
    Ok(())
}

impl Store {
    fn records(&self, collection: &str) -> Result<&[Record], BackendError> {
        self.db
            .collection(collection)
            .ok_or_else(|| BackendError::CollectionNotFound {
                collection: collection.to_owned(),
            })
    }

    fn records_mut(&mut self, collection: &str) -> Result<&mut Vec<Record>, BackendError> {
        self.db
            .collection_mut(collection)
            .ok_or_else(|| BackendError::CollectionNotFound {
                collection: collection.to_owned(),
            })
    }

    fn created(&self, target: &Target<'_>, key: &str, item: Record) -> Response {
        Response::new(status::CREATED)
            .with_header("Location", target.location(key))
            .with_body(self.envelope(Value::Object(item)))
    }

    pub(crate) fn get_collection(
        &self,
        target: &Target<'_>,
        query: &[(String, String)],
    ) -> Result<Response, BackendError> {
        let records = self.records(target.collection)?;
        let filter = QueryFilter::new(query, self.config.case_sensitive_search);
        let data = if filter.is_empty() {
            records.to_vec()
        } else {
            filter.apply(records)
        };

        let data = Value::Array(data.into_iter().map(Value::Object).collect());
        Ok(Response::new(status::OK).with_body(self.envelope(data)))
    }

    pub(crate) fn get_record(
        &self,
        target: &Target<'_>,
        id: &str,
    ) -> Result<Response, BackendError> {
        let records = self.records(target.collection)?;
        let pos = position_of(records, id).ok_or_else(|| target.not_found(id))?;
        let item = Value::Object(records[pos].clone());
        Ok(Response::new(status::OK).with_body(self.envelope(item)))
    }

    /// Add a record, or replace the record with the same id.
    ///
    /// The id comes from the body, then the URL, then the override generator,
    /// then the default generator.
    pub(crate) fn post(
        &mut self,
        target: &Target<'_>,
        body: Option<&Value>,
        overrides: &dyn OverridePolicy,
    ) -> Result<Response, BackendError> {
        let records = self.records(target.collection)?;
        let mut item = record_from_body(body)?;

        let id = match (record_id(&item).cloned(), target.id) {
            (Some(body_id), Some(url_id)) => {
                check_ids_match(url_id, &body_id)?;
                body_id
            }
            (Some(body_id), None) => body_id,
            (None, Some(url_id)) => parse_id(records, url_id),
            (None, None) => {
                let id = overrides
                    .gen_id(target.collection, records)
                    .or_else(|| next_integer_id(records))
                    .ok_or_else(|| BackendError::IdsExhausted {
                        collection: target.collection.to_owned(),
                    })?;
                let key = id_key(&id).ok_or_else(|| {
                    BackendError::invalid_body("generated id must be a string or an integer")
                })?;
                if position_of(records, &key).is_some() {
                    return Err(target.conflict(key));
                }
                id
            }
        };

        let key = id_key(&id)
            .ok_or_else(|| BackendError::invalid_body("id must be a string or an integer"))?;
        let existing = position_of(records, &key);
        item.insert(ID_FIELD.to_owned(), id);

        match existing {
            Some(_) if self.config.post_409 => Err(target.conflict(key)),
            Some(pos) => {
                self.records_mut(target.collection)?[pos] = item;
                Ok(Response::new(status::NO_CONTENT))
            }
            None => {
                self.records_mut(target.collection)?.push(item.clone());
                Ok(self.created(target, &key, item))
            }
        }
    }

    /// Replace the record with the URL id, creating it unless `put_404` is set.
    pub(crate) fn put(
        &mut self,
        target: &Target<'_>,
        url_id: &str,
        body: Option<&Value>,
    ) -> Result<Response, BackendError> {
        let records = self.records(target.collection)?;
        let mut item = record_from_body(body)?;

        match record_id(&item) {
            Some(body_id) => check_ids_match(url_id, body_id)?,
            None => {
                let id = parse_id(records, url_id);
                item.insert(ID_FIELD.to_owned(), id);
            }
        }

        match position_of(records, url_id) {
            Some(pos) => {
                self.records_mut(target.collection)?[pos] = item;
                Ok(Response::new(status::NO_CONTENT))
            }
            None if self.config.put_404 => Err(target.not_found(url_id)),
            None => {
                self.records_mut(target.collection)?.push(item.clone());
                Ok(self.created(target, url_id, item))
            }
        }
    }

    pub(crate) fn delete(
        &mut self,
        target: &Target<'_>,
        url_id: &str,
    ) -> Result<Response, BackendError> {
        let delete_404 = self.config.delete_404;
        let records = self.records_mut(target.collection)?;

        match position_of(records, url_id) {
            Some(pos) => {
                records.remove(pos);
                Ok(Response::new(status::NO_CONTENT))
            }
            None if delete_404 => Err(target.not_found(url_id)),
            None => Ok(Response::new(status::NO_CONTENT)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::backend::BackendConfig;
    use crate::overrides::NoOverrides;
    use crate::types::database::Database;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn store() -> Store {
        let db: Database = serde_json::from_value(json!({
            "heroes": [{"id": 1, "name": "Windstorm"}, {"id": 2, "name": "Bombasto"}],
            "codes": [{"id": "a", "name": "Alpha"}],
            "nobodies": []
        }))
        .expect("db");
        Store {
            db,
            config: BackendConfig::default(),
        }
    }

    fn target<'a>(collection: &'a str, id: Option<&'a str>) -> Target<'a> {
        Target {
            base: "app",
            collection,
            id,
        }
    }

    fn names(store: &Store, collection: &str) -> Vec<Value> {
        store
            .db
            .collection(collection)
            .expect("collection")
            .iter()
            .map(|r| r["name"].clone())
            .collect()
    }

    #[rstest]
    #[case("heroes", None, "/app/heroes/7")]
    #[case("heroes", Some("7"), "/app/heroes/7")]
    fn test_location(#[case] collection: &str, #[case] id: Option<&str>, #[case] expected: &str) {
        assert_eq!(target(collection, id).location("7"), expected);
    }

    #[rstest]
    fn test_location_without_base() {
        let target = Target {
            base: "",
            collection: "heroes",
            id: None,
        };
        assert_eq!(target.location("3"), "/heroes/3");
    }

    #[rstest]
    fn test_post_generates_next_integer_id(mut store: Store) {
        let response = store
            .post(&target("heroes", None), Some(&json!({"name": "Magneta"})), &NoOverrides)
            .expect("post");

        assert_eq!(response.status, status::CREATED);
        assert_eq!(response.data(), Some(&json!({"id": 3, "name": "Magneta"})));
        assert_eq!(
            response.headers.get("Location").map(String::as_str),
            Some("/app/heroes/3")
        );
    }

    #[rstest]
    fn test_post_url_id_uses_collection_id_type(mut store: Store) {
        store
            .post(&target("heroes", Some("10")), Some(&json!({"name": "Tornado"})), &NoOverrides)
            .expect("post");
        store
            .post(&target("codes", Some("10")), Some(&json!({"name": "Ten"})), &NoOverrides)
            .expect("post");

        let heroes = store.db.collection("heroes").expect("heroes");
        assert_eq!(heroes[2]["id"], json!(10));
        let codes = store.db.collection("codes").expect("codes");
        assert_eq!(codes[1]["id"], json!("10"));
    }

    #[rstest]
    fn test_post_existing_id_replaces_in_place(mut store: Store) {
        let response = store
            .post(
                &target("heroes", None),
                Some(&json!({"id": 1, "name": "Dynama"})),
                &NoOverrides,
            )
            .expect("post");

        assert_eq!(response.status, status::NO_CONTENT);
        assert_eq!(names(&store, "heroes"), vec![json!("Dynama"), json!("Bombasto")]);
    }

    #[rstest]
    fn test_post_409(mut store: Store) {
        store.config.post_409 = true;
        let result = store.post(
            &target("heroes", None),
            Some(&json!({"id": "1", "name": "Dynama"})),
            &NoOverrides,
        );

        assert!(matches!(result, Err(BackendError::Conflict { .. })));
        assert_eq!(names(&store, "heroes"), vec![json!("Windstorm"), json!("Bombasto")]);
    }

    #[rstest]
    #[case(Some(json!([1, 2])))]
    #[case(Some(json!("hero")))]
    #[case(None)]
    #[case(Some(json!({"id": 1.5, "name": "Fraction"})))]
    #[case(Some(json!({"id": {"nested": 1}})))]
    fn test_post_invalid_body_leaves_store_unchanged(
        mut store: Store,
        #[case] body: Option<Value>,
    ) {
        let result = store.post(&target("heroes", None), body.as_ref(), &NoOverrides);

        assert!(matches!(result, Err(BackendError::InvalidBody { .. })));
        assert_eq!(store.db.collection("heroes").map(<[Record]>::len), Some(2));
    }

    #[rstest]
    fn test_post_id_mismatch(mut store: Store) {
        let result = store.post(
            &target("heroes", Some("5")),
            Some(&json!({"id": 6, "name": "Mismatch"})),
            &NoOverrides,
        );
        assert!(matches!(result, Err(BackendError::IdMismatch { .. })));
    }

    #[rstest]
    #[case(Some(json!({})))]
    #[case(Some(json!("oops")))]
    #[case(None)]
    fn test_post_unknown_collection(mut store: Store, #[case] body: Option<Value>) {
        let result = store.post(&target("unknown", None), body.as_ref(), &NoOverrides);
        assert!(matches!(result, Err(BackendError::CollectionNotFound { .. })));
    }

    #[rstest]
    #[case(Some(json!({"name": "Casper"})))]
    #[case(Some(json!([1, 2])))]
    #[case(None)]
    fn test_put_unknown_collection(mut store: Store, #[case] body: Option<Value>) {
        let result = store.put(&target("unknown", Some("1")), "1", body.as_ref());
        assert!(matches!(result, Err(BackendError::CollectionNotFound { .. })));
    }

    #[rstest]
    fn test_post_ids_exhausted_leaves_store_unchanged(mut store: Store) {
        let maxed = serde_json::from_value(json!({"id": i64::MAX})).expect("record");
        store.db.insert_collection("maxed", vec![maxed]);

        let result = store.post(
            &target("maxed", None),
            Some(&json!({"name": "x"})),
            &NoOverrides,
        );

        assert_eq!(result.map_err(|e| e.status()), Err(status::CONFLICT));
        assert_eq!(store.db.collection("maxed").map(<[Record]>::len), Some(1));
    }

    #[rstest]
    fn test_put_replaces_and_creates(mut store: Store) {
        let response = store
            .put(&target("heroes", Some("2")), "2", Some(&json!({"name": "Bombastic"})))
            .expect("put");
        assert_eq!(response.status, status::NO_CONTENT);

        let response = store
            .put(&target("heroes", Some("9")), "9", Some(&json!({"name": "Celeritas"})))
            .expect("put");
        assert_eq!(response.status, status::CREATED);
        assert_eq!(response.data(), Some(&json!({"id": 9, "name": "Celeritas"})));

        assert_eq!(
            names(&store, "heroes"),
            vec![json!("Windstorm"), json!("Bombastic"), json!("Celeritas")]
        );
    }

    #[rstest]
    fn test_put_404(mut store: Store) {
        store.config.put_404 = true;
        let result = store.put(&target("heroes", Some("9")), "9", Some(&json!({"name": "X"})));
        assert!(matches!(result, Err(BackendError::RecordNotFound { .. })));
    }

    #[rstest]
    fn test_put_id_mismatch(mut store: Store) {
        let result = store.put(&target("heroes", Some("1")), "1", Some(&json!({"id": 2})));
        assert!(matches!(result, Err(BackendError::IdMismatch { .. })));
    }

    #[rstest]
    #[case(false, "9", Ok(status::NO_CONTENT))]
    #[case(true, "9", Err(status::NOT_FOUND))]
    #[case(true, "1", Ok(status::NO_CONTENT))]
    fn test_delete(
        mut store: Store,
        #[case] delete_404: bool,
        #[case] id: &str,
        #[case] expected: Result<u16, u16>,
    ) {
        store.config.delete_404 = delete_404;
        let result = store
            .delete(&target("heroes", Some(id)), id)
            .map(|r| r.status)
            .map_err(|e| e.status());
        assert_eq!(result, expected);
    }

    #[rstest]
    fn test_delete_removes_record(mut store: Store) {
        store.delete(&target("heroes", Some("1")), "1").expect("delete");
        assert_eq!(names(&store, "heroes"), vec![json!("Bombasto")]);
    }

    #[rstest]
    fn test_get_record_not_found(store: Store) {
        let result = store.get_record(&target("heroes", Some("123456")), "123456");
        assert_eq!(result.map_err(|e| e.status()), Err(status::NOT_FOUND));
    }
}
