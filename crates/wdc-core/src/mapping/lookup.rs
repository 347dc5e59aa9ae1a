//! Dot/bracket path resolution over JSON records.

use serde_json::Value;

/// One step of a parsed lookup path.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Object member access.
    Key(String),
    /// Array element access.
    Index(usize),
}

/// A parsed lookup path such as `track.artists[0].name`.
///
/// The special path `"."` denotes the whole record.
#[derive(Debug, Clone)]
pub struct Lookup {
    raw: String,
    segments: Vec<Segment>,
}

impl Lookup {
    /// Parses a dot/bracket path.
    pub fn parse(path: &str) -> Self {
        let segments = if path == "." {
            Vec::new()
        } else {
            parse_segments(path)
        };

        Self {
            raw: path.to_owned(),
            segments,
        }
    }

    /// Returns the original path text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns true for the identity path `"."`.
    pub fn is_identity(&self) -> bool {
        self.raw == "."
    }

    /// Walks the path against a record.
    ///
    /// Returns `None` when any step is absent. A JSON `null` stored at the
    /// path is present and resolves to `Some(Value::Null)`, so defaults only
    /// apply to genuinely missing fields.
    pub fn resolve<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        let mut current = record;

        for segment in &self.segments {
            current = match segment {
                Segment::Key(key) => current.get(key.as_str())?,
                Segment::Index(index) => current.get(*index)?,
            };
        }

        Some(current)
    }
}

fn parse_segments(path: &str) -> Vec<Segment> {
    let mut segments = Vec::new();

    for part in path.split('.') {
        if part.is_empty() {
            continue;
        }

        let mut rest = part;
        if let Some(bracket) = rest.find('[') {
            if bracket > 0 {
                segments.push(Segment::Key(rest[..bracket].to_owned()));
            }
            rest = &rest[bracket..];

            while let Some(close) = rest.find(']') {
                let inner = &rest[1..close];
                match inner.parse::<usize>() {
                    Ok(index) => segments.push(Segment::Index(index)),
                    Err(_) => segments.push(Segment::Key(inner.trim_matches(['\'', '"']).to_owned())),
                }
                rest = &rest[close + 1..];
                if !rest.starts_with('[') {
                    break;
                }
            }
        } else {
            segments.push(Segment::Key(rest.to_owned()));
        }
    }

    segments
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn resolves_plain_keys() {
        let record = json!({ "name": "Bar" });
        let lookup = Lookup::parse("name");
        assert_eq!(lookup.resolve(&record), Some(&json!("Bar")));
    }

    #[test]
    fn resolves_nested_and_indexed_paths() {
        let record = json!({
            "followers": { "total": 42 },
            "images": [{ "url": "https://img" }],
            "genres": ["rock", "jazz"]
        });

        assert_eq!(
            Lookup::parse("followers.total").resolve(&record),
            Some(&json!(42))
        );
        assert_eq!(
            Lookup::parse("images[0].url").resolve(&record),
            Some(&json!("https://img"))
        );
        assert_eq!(
            Lookup::parse("genres[1]").resolve(&record),
            Some(&json!("jazz"))
        );
    }

    #[test]
    fn missing_path_is_none_but_null_is_present() {
        let record = json!({ "preview_url": null });

        assert_eq!(Lookup::parse("nope.deep").resolve(&record), None);
        assert_eq!(
            Lookup::parse("preview_url").resolve(&record),
            Some(&Value::Null)
        );
    }

    #[test]
    fn identity_path_returns_whole_record() {
        let record = json!({ "id": 1 });
        let lookup = Lookup::parse(".");
        assert!(lookup.is_identity());
        assert_eq!(lookup.resolve(&record), Some(&record));
    }

    #[test]
    fn out_of_bounds_index_is_none() {
        let record = json!({ "genres": ["rock"] });
        assert_eq!(Lookup::parse("genres[5]").resolve(&record), None);
    }
}
