use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::{Error, Result};

/// Add the fields of `opts` to `base` as URL query parameters.
///
/// `opts` must serialize to a flat map; serde field names are the parameter
/// names and `None` fields are left out. The encoded query replaces any query
/// already present on `base`. Passing `None` returns `base` untouched.
pub fn add_options<O: Serialize>(base: &str, opts: Option<&O>) -> Result<String> {
    let Some(opts) = opts else {
        return Ok(base.to_owned());
    };

    let mut url = Url::parse(base)?;
    let pairs = query_pairs(opts)?;

    url.set_query(None);
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }

    Ok(url.into())
}

fn query_pairs<O: Serialize>(opts: &O) -> Result<Vec<(String, String)>> {
    let fields = match serde_json::to_value(opts).map_err(|err| Error::Options(err.to_string()))? {
        Value::Object(fields) => fields,
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(Error::Options(format!("expected a struct of query fields, got {other}")));
        }
    };

    let mut pairs = Vec::new();
    for (key, value) in fields {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = scalar(&key, item)? {
                        pairs.push((key.clone(), text));
                    }
                }
            }
            value => {
                if let Some(text) = scalar(&key, value)? {
                    pairs.push((key, text));
                }
            }
        }
    }
    Ok(pairs)
}

fn scalar(key: &str, value: Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Array(_) | Value::Object(_) => Err(Error::Options(format!(
            "field `{key}` is not a scalar value"
        ))),
    }
}
