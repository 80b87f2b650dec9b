use serde::Serialize;
use std::fmt;

/// One problem reported by a validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaIssue {
    /// Location of the offending value, outermost key first; empty for the root
    pub path: Vec<String>,
    pub message: String,
}

impl SchemaIssue {
    pub fn new<I, S>(path: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SchemaIssue {
            path: path.into_iter().map(Into::into).collect(),
            message: message.into(),
        }
    }

    /// An issue about the value as a whole.
    pub fn root(message: impl Into<String>) -> Self {
        SchemaIssue {
            path: Vec::new(),
            message: message.into(),
        }
    }

    /// Top-level field this issue belongs to, if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }
}

/// All issues from one failed `parse`, in the order the validator reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SchemaIssues(Vec<SchemaIssue>);

/// Issues grouped by top-level field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlattenedIssues {
    /// Messages about the value as a whole
    pub form_errors: Vec<String>,
    /// Messages per field, fields in order of first appearance
    pub field_errors: Vec<(String, Vec<String>)>,
}

impl FlattenedIssues {
    /// First message of the first invalid field.
    #[must_use]
    pub fn first_field_error(&self) -> Option<(&str, &str)> {
        self.field_errors
            .first()
            .and_then(|(field, msgs)| msgs.first().map(|m| (field.as_str(), m.as_str())))
    }

    /// Messages for the named field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&[String]> {
        self.field_errors
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, msgs)| msgs.as_slice())
    }
}

impl SchemaIssues {
    #[must_use]
    pub fn new(issues: Vec<SchemaIssue>) -> Self {
        SchemaIssues(issues)
    }

    /// A single root-level issue.
    pub fn single(message: impl Into<String>) -> Self {
        SchemaIssues(vec![SchemaIssue::root(message)])
    }

    pub fn push(&mut self, issue: SchemaIssue) {
        self.0.push(issue);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaIssue> {
        self.0.iter()
    }

    /// Group issues by their top-level field.
    #[must_use]
    pub fn flatten(&self) -> FlattenedIssues {
        self.0
            .iter()
            .fold(FlattenedIssues::default(), |mut flat, issue| {
                match issue.field() {
                    None => flat.form_errors.push(issue.message.clone()),
                    Some(field) => {
                        match flat.field_errors.iter_mut().find(|(f, _)| f == field) {
                            Some((_, msgs)) => msgs.push(issue.message.clone()),
                            None => flat
                                .field_errors
                                .push((field.to_string(), vec![issue.message.clone()])),
                        }
                    }
                }
                flat
            })
    }
}

impl From<Vec<SchemaIssue>> for SchemaIssues {
    fn from(issues: Vec<SchemaIssue>) -> Self {
        SchemaIssues(issues)
    }
}

impl IntoIterator for SchemaIssues {
    type Item = SchemaIssue;
    type IntoIter = std::vec::IntoIter<SchemaIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for SchemaIssues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            if issue.path.is_empty() {
                write!(f, "{}", issue.message)?;
            } else {
                write!(f, "{}: {}", issue.path.join("."), issue.message)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for SchemaIssues {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_groups_by_first_field() {
        let issues = SchemaIssues::new(vec![
            SchemaIssue::root("bad shape"),
            SchemaIssue::new(["name"], "too short"),
            SchemaIssue::new(["age"], "not a number"),
            SchemaIssue::new(["name"], "not capitalised"),
            SchemaIssue::new(["address", "zip"], "invalid zip"),
        ]);

        let flat = issues.flatten();
        assert_eq!(flat.form_errors, vec!["bad shape"]);
        assert_eq!(
            flat.field_errors
                .iter()
                .map(|(f, _)| f.as_str())
                .collect::<Vec<_>>(),
            vec!["name", "age", "address"]
        );
        assert_eq!(flat.first_field_error(), Some(("name", "too short")));
        assert_eq!(flat.field("name").unwrap().len(), 2);
    }

    #[test]
    fn test_flatten_without_fields() {
        let flat = SchemaIssues::single("expected object").flatten();
        assert!(flat.first_field_error().is_none());
        assert_eq!(flat.form_errors, vec!["expected object"]);
    }

    #[test]
    fn test_display() {
        let issues = SchemaIssues::new(vec![
            SchemaIssue::new(["a", "b"], "bad"),
            SchemaIssue::root("worse"),
        ]);
        assert_eq!(issues.to_string(), "a.b: bad; worse");
    }
}
