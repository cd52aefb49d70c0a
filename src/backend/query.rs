use serde_json::Value;

/// One row predicate. Filters in a [`Query`] are AND-ed.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Filter {
    Eq(&'static str, Value),
    In(&'static str, Vec<Value>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Order {
    pub column: &'static str,
    pub ascending: bool,
}

/// Filter/order/limit specification for a table read or a filtered write.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Query {
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq(column, value.into()));
        self
    }

    pub fn is_in<V: Into<Value>>(
        mut self,
        column: &'static str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.filters
            .push(Filter::In(column, values.into_iter().map(Into::into).collect()));
        self
    }

    pub fn order_by(mut self, column: &'static str, ascending: bool) -> Self {
        self.order = Some(Order { column, ascending });
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// PostgREST query-string pairs (`col=eq.v`, `col=in.(a,b)`, `order=`, `limit=`).
    ///
    /// Values are left raw; the HTTP client percent-encodes them.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut out = Vec::with_capacity(self.filters.len() + 2);

        for f in &self.filters {
            match f {
                Filter::Eq(col, v) => out.push((col.to_string(), format!("eq.{}", scalar(v)))),
                Filter::In(col, vs) => {
                    let items: Vec<String> = vs.iter().map(list_item).collect();
                    out.push((col.to_string(), format!("in.({})", items.join(","))));
                }
            }
        }

        if let Some(o) = &self.order {
            let dir = if o.ascending { "asc" } else { "desc" };
            out.push(("order".to_string(), format!("{}.{dir}", o.column)));
        }

        if let Some(n) = self.limit {
            out.push(("limit".to_string(), n.to_string()));
        }

        out
    }
}

fn scalar(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

// Inside `in.(...)` the characters `,().:"` and spaces are reserved.
fn list_item(v: &Value) -> String {
    let s = scalar(v);
    let reserved = s
        .chars()
        .any(|c| matches!(c, ',' | '(' | ')' | '.' | ':' | '"' | '\\' | ' '));
    if !reserved {
        return s;
    }

    let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_has_no_params() {
        assert!(Query::new().to_params().is_empty());
    }

    #[test]
    fn test_equality_order_and_limit() {
        let q = Query::new()
            .eq("is_verified", true)
            .eq("grade", 9)
            .eq("subject", "Social Science")
            .order_by("created_at", false)
            .limit(6);

        assert_eq!(
            q.to_params(),
            vec![
                ("is_verified".to_string(), "eq.true".to_string()),
                ("grade".to_string(), "eq.9".to_string()),
                ("subject".to_string(), "eq.Social Science".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
                ("limit".to_string(), "6".to_string()),
            ]
        );
    }

    #[test]
    fn test_membership_quotes_reserved_items() {
        let q = Query::new().is_in("id", ["a1", "b,2", "say \"hi\""]);
        assert_eq!(
            q.to_params(),
            vec![(
                "id".to_string(),
                r#"in.(a1,"b,2","say \"hi\"")"#.to_string()
            )]
        );
    }
}
