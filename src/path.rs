//! Reading and writing dotted paths (`user.address.0.street`) on data values. Object members are
//! addressed by name and array elements by decimal index.

use serde_json::Value;
use tracing::warn;

use crate::error::PathError;

/// Split a path into its segments. An empty path has no segments and addresses the data itself.
fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('.').filter(|segment| !segment.is_empty())
}

/// Step from `value` into its `segment` member, if it has one.
fn step<'a>(value: &'a Value, segment: &str, path: &str) -> Result<Option<&'a Value>, PathError> {
    match value {
        Value::Object(map) => Ok(map.get(segment)),
        Value::Array(items) => segment
            .parse::<usize>()
            .map(|index| items.get(index))
            .map_err(|_| PathError::BadIndex {
                path: path.to_string(),
                segment: segment.to_string(),
            }),
        _ => Err(PathError::NotAContainer {
            path: path.to_string(),
            segment: segment.to_string(),
        }),
    }
}

/// Resolve `path` against `data`.
///
/// Walking through a member that does not exist is an error, however a missing final member
/// resolves to [`Value::Null`].
pub fn resolve(data: &Value, path: &str) -> Result<Value, PathError> {
    let mut current = data;
    let mut segments = segments(path).peekable();

    while let Some(segment) = segments.next() {
        match step(current, segment, path)? {
            Some(next) => current = next,
            None if segments.peek().is_none() => return Ok(Value::Null),
            None => {
                return Err(PathError::MissingSegment {
                    path: path.to_string(),
                    segment: segment.to_string(),
                })
            }
        }
    }

    Ok(current.clone())
}

/// Write `value` at `path` within `data`. The final member is created on objects if it does not
/// exist yet, but intermediate members must already exist.
pub fn assign(data: &mut Value, path: &str, value: Value) -> Result<(), PathError> {
    let segments = segments(path).collect::<Vec<_>>();

    let Some((last, parents)) = segments.split_last() else {
        *data = value;
        return Ok(());
    };

    let mut current = data;
    for segment in parents {
        current = match current {
            Value::Object(map) => map.get_mut(*segment),
            Value::Array(items) => {
                let index = segment.parse::<usize>().map_err(|_| PathError::BadIndex {
                    path: path.to_string(),
                    segment: segment.to_string(),
                })?;
                items.get_mut(index)
            }
            _ => {
                return Err(PathError::NotAContainer {
                    path: path.to_string(),
                    segment: segment.to_string(),
                })
            }
        }
        .ok_or_else(|| PathError::MissingSegment {
            path: path.to_string(),
            segment: segment.to_string(),
        })?;
    }

    match current {
        Value::Object(map) => {
            map.insert(last.to_string(), value);
            Ok(())
        }
        Value::Array(items) => {
            let slot = last
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get_mut(index))
                .ok_or_else(|| PathError::BadIndex {
                    path: path.to_string(),
                    segment: last.to_string(),
                })?;
            *slot = value;
            Ok(())
        }
        _ => Err(PathError::NotAContainer {
            path: path.to_string(),
            segment: last.to_string(),
        }),
    }
}

/// Read `path` from `data`, logging a warning and yielding [`Value::Null`] when the path cannot
/// be walked.
pub fn extract_value(data: &Value, path: &str) -> Value {
    resolve(data, path).unwrap_or_else(|error| {
        warn!(%error, "failed to read data path");
        Value::Null
    })
}

/// Write `value` at `path` within `data`, logging a warning and leaving `data` untouched when the
/// path cannot be walked.
pub fn inject_value(data: &mut Value, path: &str, value: Value) {
    if let Err(error) = assign(data, path, value) {
        warn!(%error, "failed to write data path");
    }
}

/// Render a value the way it is written into markup. Strings are written verbatim, `null` as
/// nothing, and containers as compact JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(string) => string.clone(),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
