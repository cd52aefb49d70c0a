//! In-memory backend used by the flow tests. Records every call and can be
//! told to fail specific operations.

use super::query::Filter;
use super::{
    AuthBackend, BackendError, BackendResult, Bucket, DataBackend, Query, StorageBackend, Table,
    UploadOptions,
};
use crate::models::{Session, User};
use serde_json::{json, Value};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

#[derive(Default)]
pub(crate) struct MemoryBackend {
    tables: RefCell<HashMap<Table, Vec<Value>>>,
    objects: RefCell<HashMap<(Bucket, String), Vec<u8>>>,
    uploads: RefCell<Vec<(Bucket, String, UploadOptions)>>,
    inserts: RefCell<Vec<(Table, Value)>>,
    calls: RefCell<Vec<String>>,
    failing: RefCell<HashSet<String>>,
    next_id: Cell<u64>,
    user: RefCell<Option<User>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, table: Table, row: Value) {
        self.tables.borrow_mut().entry(table).or_default().push(row);
    }

    pub fn rows(&self, table: Table) -> Vec<Value> {
        self.tables
            .borrow()
            .get(&table)
            .cloned()
            .unwrap_or_default()
    }

    pub fn put_object(&self, bucket: Bucket, path: &str, bytes: &[u8]) {
        self.objects
            .borrow_mut()
            .insert((bucket, path.to_string()), bytes.to_vec());
    }

    pub fn object(&self, bucket: Bucket, path: &str) -> Option<Vec<u8>> {
        self.objects
            .borrow()
            .get(&(bucket, path.to_string()))
            .cloned()
    }

    pub fn uploads(&self) -> Vec<(Bucket, String, UploadOptions)> {
        self.uploads.borrow().clone()
    }

    /// Insert payloads exactly as sent, before any column defaults apply.
    pub fn inserts(&self, table: Table) -> Vec<Value> {
        self.inserts
            .borrow()
            .iter()
            .filter(|(t, _)| *t == table)
            .map(|(_, row)| row.clone())
            .collect()
    }

    pub fn set_user(&self, user: Option<User>) {
        *self.user.borrow_mut() = user;
    }

    /// Calls so far, as `"op:target"` (e.g. `"select:notes"`).
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Make the given `"op:target"` fail with an HTTP 500 from now on.
    pub fn fail_on(&self, call: &str) {
        self.failing.borrow_mut().insert(call.to_string());
    }

    pub fn fail_with(&self, call: &str) -> Option<BackendError> {
        self.failing.borrow().contains(call).then(|| BackendError::Http {
            status: 500,
            body: format!("{call} failed"),
        })
    }

    fn record(&self, op: &str, target: &str) -> BackendResult<()> {
        let call = format!("{op}:{target}");
        self.calls.borrow_mut().push(call.clone());
        match self.fail_with(&call) {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn fresh_id(&self) -> String {
        let n = self.next_id.get() + 1;
        self.next_id.set(n);
        format!("id-{n}")
    }
}

fn matches(row: &Value, query: &Query) -> bool {
    query.filters.iter().all(|f| match f {
        Filter::Eq(col, v) => row.get(*col) == Some(v),
        Filter::In(col, vs) => row.get(*col).is_some_and(|x| vs.contains(x)),
    })
}

fn compare(a: &Value, b: &Value) -> std::cmp::Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(std::cmp::Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => std::cmp::Ordering::Equal,
    }
}

impl DataBackend for MemoryBackend {
    async fn select(&self, table: Table, query: &Query) -> BackendResult<Vec<Value>> {
        self.record("select", table.as_ref())?;

        let mut rows: Vec<Value> = self
            .rows(table)
            .into_iter()
            .filter(|r| matches(r, query))
            .collect();

        if let Some(o) = &query.order {
            let null = Value::Null;
            rows.sort_by(|a, b| {
                let ord = compare(a.get(o.column).unwrap_or(&null), b.get(o.column).unwrap_or(&null));
                if o.ascending {
                    ord
                } else {
                    ord.reverse()
                }
            });
        }
        if let Some(n) = query.limit {
            rows.truncate(n);
        }
        Ok(rows)
    }

    async fn insert(&self, table: Table, mut row: Value) -> BackendResult<Vec<Value>> {
        self.record("insert", table.as_ref())?;
        self.inserts.borrow_mut().push((table, row.clone()));

        if table == Table::NoteLikes {
            let dup = Query::new()
                .eq("note_id", row["note_id"].clone())
                .eq("user_id", row["user_id"].clone());
            if self.rows(table).iter().any(|r| matches(r, &dup)) {
                return Err(BackendError::Http {
                    status: 409,
                    body: "duplicate key value violates unique constraint".to_string(),
                });
            }
        }

        if let Some(obj) = row.as_object_mut() {
            if !obj.contains_key("id") {
                obj.insert("id".to_string(), json!(self.fresh_id()));
            }
            if table == Table::Notes {
                obj.entry("created_at")
                    .or_insert_with(|| json!("2024-01-01T00:00:00Z"));
                obj.entry("likes").or_insert_with(|| json!(0));
                obj.entry("views").or_insert_with(|| json!(0));
                obj.entry("is_verified").or_insert_with(|| json!(false));
            }
        }

        if table == Table::Notes {
            let id = row["id"].clone();
            if self.rows(table).iter().any(|r| r["id"] == id) {
                return Err(BackendError::Http {
                    status: 409,
                    body: "duplicate key value violates unique constraint \"notes_pkey\""
                        .to_string(),
                });
            }
        }

        self.seed(table, row.clone());
        Ok(vec![row])
    }

    async fn update(&self, table: Table, query: &Query, patch: Value) -> BackendResult<()> {
        self.record("update", table.as_ref())?;

        let mut tables = self.tables.borrow_mut();
        for row in tables.entry(table).or_default().iter_mut() {
            if !matches(row, query) {
                continue;
            }
            if let (Some(obj), Some(p)) = (row.as_object_mut(), patch.as_object()) {
                for (k, v) in p {
                    obj.insert(k.clone(), v.clone());
                }
            }
        }
        Ok(())
    }

    async fn delete(&self, table: Table, query: &Query) -> BackendResult<()> {
        self.record("delete", table.as_ref())?;

        self.tables
            .borrow_mut()
            .entry(table)
            .or_default()
            .retain(|r| !matches(r, query));
        Ok(())
    }

    async fn rpc(&self, function: &str, args: Value) -> BackendResult<Value> {
        self.record("rpc", function)?;

        if function == "increment_note_views" {
            let id = args["note_uuid"].clone();
            let mut tables = self.tables.borrow_mut();
            for row in tables.entry(Table::Notes).or_default().iter_mut() {
                if row["id"] == id {
                    let views = row["views"].as_i64().unwrap_or(0);
                    row["views"] = json!(views + 1);
                }
            }
        }
        Ok(Value::Null)
    }
}

impl StorageBackend for MemoryBackend {
    async fn upload(
        &self,
        bucket: Bucket,
        path: &str,
        bytes: Vec<u8>,
        options: &UploadOptions,
    ) -> BackendResult<()> {
        self.record("upload", bucket.as_ref())?;

        let key = (bucket, path.to_string());
        if !options.upsert && self.objects.borrow().contains_key(&key) {
            return Err(BackendError::Http {
                status: 409,
                body: "The resource already exists".to_string(),
            });
        }
        self.objects.borrow_mut().insert(key, bytes);
        self.uploads
            .borrow_mut()
            .push((bucket, path.to_string(), options.clone()));
        Ok(())
    }

    fn public_url(&self, bucket: Bucket, path: &str) -> String {
        format!(
            "https://demo.supabase.co/storage/v1/object/public/{}/{path}",
            bucket.as_ref()
        )
    }

    async fn download(&self, bucket: Bucket, path: &str) -> BackendResult<Vec<u8>> {
        self.record("download", bucket.as_ref())?;

        self.object(bucket, path).ok_or_else(|| BackendError::Http {
            status: 404,
            body: "Object not found".to_string(),
        })
    }

    async fn remove(&self, bucket: Bucket, paths: &[String]) -> BackendResult<()> {
        self.record("remove", bucket.as_ref())?;

        let mut objects = self.objects.borrow_mut();
        for p in paths {
            objects.remove(&(bucket, p.clone()));
        }
        Ok(())
    }
}

impl AuthBackend for MemoryBackend {
    async fn sign_in(&self, email: &str, password: &str) -> BackendResult<Session> {
        self.record("auth", "sign_in")?;

        if password.is_empty() {
            return Err(BackendError::Http {
                status: 400,
                body: "Invalid login credentials".to_string(),
            });
        }
        let user = User {
            id: "u1".to_string(),
            email: Some(email.to_string()),
            created_at: None,
        };
        self.set_user(Some(user.clone()));
        Ok(Session {
            access_token: "jwt".to_string(),
            user,
        })
    }

    async fn sign_up(&self, email: &str, _password: &str, _full_name: &str) -> BackendResult<User> {
        self.record("auth", "sign_up")?;
        Ok(User {
            id: self.fresh_id(),
            email: Some(email.to_string()),
            created_at: None,
        })
    }

    async fn sign_out(&self) -> BackendResult<()> {
        self.record("auth", "sign_out")?;
        self.set_user(None);
        Ok(())
    }

    async fn current_user(&self) -> BackendResult<Option<User>> {
        self.record("auth", "current_user")?;
        Ok(self.user.borrow().clone())
    }
}
