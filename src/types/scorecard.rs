use serde::Serialize;
use std::fmt;

/// Severity verdict. Declaration order makes `Critical < Warning < AllOK`,
/// so the worst grade of a set is its minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Grade {
    #[serde(rename = "critical")]
    Critical,
    #[serde(rename = "warning")]
    Warning,
    #[serde(rename = "ok")]
    AllOK,
}

impl Grade {
    /// Worst grade present, or `AllOK` for an empty set.
    pub fn worst(grades: impl IntoIterator<Item = Grade>) -> Grade {
        grades.into_iter().min().unwrap_or(Grade::AllOK)
    }

    pub fn label(self) -> &'static str {
        match self {
            Grade::Critical => "CRITICAL",
            Grade::Warning => "WARNING",
            Grade::AllOK => "OK",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub path: String,
    pub summary: String,
    pub description: String,
}

impl Comment {
    pub fn new(
        path: impl Into<String>,
        summary: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            summary: summary.into(),
            description: description.into(),
        }
    }
}

/// Result of one check against one object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestScore {
    pub check: String,
    pub title: String,
    pub grade: Grade,
    pub comments: Vec<Comment>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub skipped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ObjectIdentity {
    pub api_version: String,
    pub kind: String,
    pub namespace: String,
    pub name: String,
}

impl fmt::Display for ObjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} {} in {}",
            self.api_version, self.kind, self.name, self.namespace
        )
    }
}

/// Where an object was read from. `line` is the 1-based start of its document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FileLocation {
    pub name: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectScore {
    identity: ObjectIdentity,
    location: FileLocation,
    grade: Grade,
    scores: Vec<TestScore>,
}

impl ObjectScore {
    pub fn new(identity: ObjectIdentity, location: FileLocation, scores: Vec<TestScore>) -> Self {
        let grade = Grade::worst(
            scores
                .iter()
                .filter(|score| !score.skipped)
                .map(|score| score.grade),
        );
        Self {
            identity,
            location,
            grade,
            scores,
        }
    }

    pub fn identity(&self) -> &ObjectIdentity {
        &self.identity
    }

    pub fn location(&self) -> &FileLocation {
        &self.location
    }

    pub fn grade(&self) -> Grade {
        self.grade
    }

    pub fn scores(&self) -> &[TestScore] {
        &self.scores
    }

    pub fn score(&self, check: &str) -> Option<&TestScore> {
        self.scores.iter().find(|score| score.check == check)
    }
}

/// Complete report for one run. Built in one piece and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scorecard {
    grade: Grade,
    objects: Vec<ObjectScore>,
}

impl Scorecard {
    pub fn new(objects: Vec<ObjectScore>) -> Self {
        let grade = Grade::worst(objects.iter().map(ObjectScore::grade));
        Self { grade, objects }
    }

    pub fn grade(&self) -> Grade {
        self.grade
    }

    pub fn objects(&self) -> &[ObjectScore] {
        &self.objects
    }

    pub fn has_grade(&self, grade: Grade) -> bool {
        self.objects.iter().any(|object| object.grade() == grade)
    }
}
